//! Generation of fresh names with a user-supplied prefix and suffix.

use std::collections::HashSet;

/// Hands out names of the form `<prefix><n><suffix>` that collide with
/// neither registered names nor earlier generated ones.
pub struct NameMgr {
    prefix: String,
    suffix: String,
    used: HashSet<String>,
    next: usize,
}

impl NameMgr {
    /// Creates a manager with the given prefix and suffix.
    pub fn new(prefix: &str, suffix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            used: HashSet::new(),
            next: 0,
        }
    }

    /// Registers an existing name so that it is never generated.
    pub fn add(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }

    /// Returns `true` if the name is already taken.
    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Generates the next free name and registers it.
    pub fn new_name(&mut self) -> String {
        loop {
            let candidate = format!("{}{}{}", self.prefix, self.next, self.suffix);
            self.next += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_names() {
        let mut mgr = NameMgr::new("__node", "");
        assert_eq!(mgr.new_name(), "__node0");
        assert_eq!(mgr.new_name(), "__node1");
    }

    #[test]
    fn registered_names_are_skipped() {
        let mut mgr = NameMgr::new("n", "_x");
        mgr.add("n0_x");
        mgr.add("n2_x");
        assert_eq!(mgr.new_name(), "n1_x");
        assert_eq!(mgr.new_name(), "n3_x");
    }

    #[test]
    fn is_used_tracks_generated_names() {
        let mut mgr = NameMgr::new("w", "");
        assert!(!mgr.is_used("w0"));
        let name = mgr.new_name();
        assert!(mgr.is_used(&name));
    }
}

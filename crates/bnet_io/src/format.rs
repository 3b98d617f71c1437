//! Network file formats and extension-based dispatch.

use bnet_common::{BnetError, Result};
use bnet_core::Network;
use std::path::Path;

/// A network interchange format.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Format {
    /// Berkeley Logic Interchange Format (`.blif`).
    Blif,
    /// ISCAS-89 bench format (`.bench`).
    Iscas89,
    /// ASCII AIGER (`.aag`).
    Aag,
    /// Binary AIGER (`.aig`).
    Aig,
    /// Dense truth-table dump (`.truth`), read-only.
    Truth,
    /// The native binary dump (`.bnet`).
    Bnet,
    /// Gate-level Verilog (`.v`), write-only.
    Verilog,
}

impl Format {
    /// Infers a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension()?.to_str()? {
            "blif" => Some(Format::Blif),
            "bench" => Some(Format::Iscas89),
            "aag" => Some(Format::Aag),
            "aig" => Some(Format::Aig),
            "truth" => Some(Format::Truth),
            "bnet" => Some(Format::Bnet),
            "v" => Some(Format::Verilog),
            _ => None,
        }
    }

    /// Parses a format name as accepted on a command line.
    pub fn from_name(name: &str) -> Option<Format> {
        match name {
            "blif" => Some(Format::Blif),
            "bench" | "iscas89" => Some(Format::Iscas89),
            "aag" => Some(Format::Aag),
            "aig" => Some(Format::Aig),
            "truth" => Some(Format::Truth),
            "bnet" => Some(Format::Bnet),
            "v" | "verilog" => Some(Format::Verilog),
            _ => None,
        }
    }

    /// Reads a network from a file in this format.
    pub fn read(self, path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        match self {
            Format::Blif => crate::blif::read_blif(path),
            Format::Iscas89 => crate::iscas89::read_iscas89(path),
            Format::Aag => crate::aig::read_aag(path),
            Format::Aig => crate::aig::read_aig(path),
            Format::Truth => crate::truth::read_truth(path),
            Format::Bnet => Network::restore_from(path),
            Format::Verilog => Err(BnetError::unsupported(
                "Verilog is an output-only format here",
            )),
        }
    }

    /// Writes a network to a file in this format.
    pub fn write(self, net: &Network, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match self {
            Format::Blif => crate::blif::write_blif_file(net, path),
            Format::Iscas89 => crate::iscas89::write_iscas89_file(net, path),
            Format::Aag => crate::aig::write_aag_file(net, path, ""),
            Format::Aig => crate::aig::write_aig_file(net, path, ""),
            Format::Truth => Err(BnetError::unsupported(
                "the truth-table format is input-only",
            )),
            Format::Bnet => net.dump_to(path),
            Format::Verilog => crate::verilog::write_verilog_file(net, path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_inference() {
        assert_eq!(Format::from_path(Path::new("x.blif")), Some(Format::Blif));
        assert_eq!(Format::from_path(Path::new("x.bench")), Some(Format::Iscas89));
        assert_eq!(Format::from_path(Path::new("x.aag")), Some(Format::Aag));
        assert_eq!(Format::from_path(Path::new("x.aig")), Some(Format::Aig));
        assert_eq!(Format::from_path(Path::new("x.v")), Some(Format::Verilog));
        assert_eq!(Format::from_path(Path::new("x.xyz")), None);
        assert_eq!(Format::from_path(Path::new("x")), None);
    }

    #[test]
    fn name_parsing() {
        assert_eq!(Format::from_name("iscas89"), Some(Format::Iscas89));
        assert_eq!(Format::from_name("verilog"), Some(Format::Verilog));
        assert_eq!(Format::from_name("nope"), None);
    }
}

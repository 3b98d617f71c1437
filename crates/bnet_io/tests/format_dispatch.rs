//! File-level conversion through the [`Format`] dispatch.

use bnet_common::BnetError;
use bnet_io::Format;
use std::fs;
use std::path::Path;

const COUNTER_BENCH: &str = "\
INPUT(en)
OUTPUT(q0)
OUTPUT(q1)
q0 = DFF(n0)
q1 = DFF(n1)
n0 = XOR(q0, en)
t0 = AND(q0, en)
n1 = XOR(q1, t0)
";

fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("counter.bench");
    fs::write(&path, COUNTER_BENCH).unwrap();
    path
}

#[test]
fn bench_through_every_writable_format() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path());
    let net = Format::from_path(&src).unwrap().read(&src).unwrap();
    assert_eq!(net.dff_num(), 2);
    assert_eq!(net.logic_num(), 3);

    for name in ["blif", "bench", "aag", "aig", "bnet", "v"] {
        let out = dir.path().join(format!("counter.{name}"));
        let format = Format::from_path(&out).unwrap();
        format.write(&net, &out).unwrap();
        assert!(out.exists(), "{name} file missing");
    }

    // Every readable rendition reproduces the same external shape.
    for name in ["blif", "bench", "aag", "aig", "bnet"] {
        let out = dir.path().join(format!("counter.{name}"));
        let back = Format::from_path(&out).unwrap().read(&out).unwrap();
        assert_eq!(back.dff_num(), 2, "{name}");
        assert_eq!(back.primary_output_ids().len(), 2, "{name}");
    }
}

#[test]
fn truth_is_input_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.truth");
    fs::write(&path, "0110\n").unwrap();
    let net = Format::Truth.read(&path).unwrap();
    assert_eq!(net.input_num(), 2);
    let err = Format::Truth.write(&net, dir.path().join("g.truth")).unwrap_err();
    assert!(matches!(err, BnetError::Unsupported { .. }));
}

#[test]
fn verilog_is_output_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.v");
    fs::write(&path, "module x; endmodule\n").unwrap();
    assert!(matches!(
        Format::Verilog.read(&path),
        Err(BnetError::Unsupported { .. })
    ));
}

#[test]
fn missing_input_file_reports_its_path() {
    let err = Format::Blif.read("/nonexistent/net.blif").unwrap_err();
    match err {
        BnetError::Io { path, .. } => assert!(path.ends_with("net.blif")),
        other => panic!("unexpected error {other}"),
    }
}

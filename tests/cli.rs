// ==============================================================================
// CLI Integration Tests: Exercise the `xsd-avro` Binary via Subprocess
// ==============================================================================
//
// Runs the compiled binary through `assert_cmd`, verifying exit codes and
// stdout/stderr content for both subcommands.

use assert_cmd::Command;

#[allow(deprecated)] // cargo_bin() warns about custom build-dir; acceptable here
fn xsd_avro_cmd() -> Command {
    Command::cargo_bin("xsd-avro").expect("xsd-avro binary should be built by cargo")
}

fn write_temp(contents: &str, suffix: &str) -> tempfile_path::TempPath {
    tempfile_path::TempPath::with_contents(contents, suffix)
}

#[test]
fn schema_subcommand_prints_json_to_stdout() {
    let xsd = write_temp(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:element name="count" type="xs:int"/>
        </xs:schema>"#,
        ".xsd",
    );

    xsd_avro_cmd()
        .args(["schema", xsd.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("\"int\""));
}

#[test]
fn datum_subcommand_prints_built_datum() {
    let xsd = write_temp(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:element name="count" type="xs:int"/>
        </xs:schema>"#,
        ".xsd",
    );
    let xml = write_temp("<count>42</count>", ".xml");

    xsd_avro_cmd()
        .args(["datum", xsd.path().to_str().unwrap(), xml.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("42"));
}

#[test]
fn missing_subcommand_exits_nonzero() {
    xsd_avro_cmd().assert().failure();
}

#[test]
fn unknown_namespace_reports_error_on_stderr() {
    let xsd = write_temp("<schema><element name=\"a\" type=\"int\"/></schema>", ".xsd");
    xsd_avro_cmd()
        .args(["schema", xsd.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicates::str::contains("namespace"));
}

/// Tiny local stand-in for a fixture file, since this crate's CLI tests
/// generate their XSD/XML input inline rather than reading checked-in
/// fixtures -- one file each for XSD and XML input is all they need.
mod tempfile_path {
    use std::io::Write as _;
    use std::path::{Path, PathBuf};

    pub struct TempPath(PathBuf);

    impl TempPath {
        pub fn with_contents(contents: &str, suffix: &str) -> Self {
            let mut path = std::env::temp_dir();
            path.push(format!(
                "xsd-avro-test-{}-{}{}",
                std::process::id(),
                contents.len(),
                suffix
            ));
            let mut file = std::fs::File::create(&path).expect("create temp file");
            file.write_all(contents.as_bytes()).expect("write temp file");
            TempPath(path)
        }

        pub fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }
}

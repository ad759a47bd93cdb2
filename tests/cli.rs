use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;

#[test]
fn html_on_stdin_converts_to_jsonml() {
    let mut cmd = cargo_bin_cmd!("jsonml");
    cmd.write_stdin("<div id=\"a\">hi <b>there</b></div>\n");

    cmd.assert()
        .success()
        .stdout(predicate::eq("[\"div\",{\"id\":\"a\"},\"hi \",[\"b\",\"there\"]]\n"));
}

#[test]
fn xml_file_converts_to_jsonml() {
    let mut file = tempfile::Builder::new()
        .suffix(".xml")
        .tempfile()
        .expect("temp file");
    write!(file, "<foo a=\"1\"><bar>x</bar></foo>").expect("write input");

    let mut cmd = cargo_bin_cmd!("jsonml");
    cmd.arg(file.path()).arg("--from").arg("xml");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[\"foo\",{\"a\":\"1\"},[\"bar\",\"x\"]]"));
}

#[test]
fn jsonml_converts_to_html() {
    let mut cmd = cargo_bin_cmd!("jsonml");
    cmd.args(["--from", "jsonml", "--to", "html"])
        .write_stdin(r#"["table", ["tr", ["td", "1"]]]"#);

    cmd.assert().success().stdout(predicate::str::contains(
        "<table><tbody><tr><td>1</td></tr></tbody></table>",
    ));
}

#[test]
fn pretty_output_spans_lines() {
    let mut cmd = cargo_bin_cmd!("jsonml");
    cmd.arg("--pretty").write_stdin("<p>x</p>");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[\n  \"p\",\n  \"x\"\n]"));
}

#[test]
fn malformed_jsonml_fails() {
    let mut cmd = cargo_bin_cmd!("jsonml");
    cmd.args(["--from", "jsonml", "--to", "xml"]).write_stdin("{\"not\": \"markup\"}");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error decoding JsonML"));
}

#[test]
fn jsonml_to_jsonml_is_rejected() {
    let mut cmd = cargo_bin_cmd!("jsonml");
    cmd.args(["--from", "jsonml", "--to", "jsonml"]).write_stdin("[\"p\"]");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("is not supported"));
}

#[test]
fn config_file_changes_whitespace_handling() {
    let mut config = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(config, "[reader]\nwhitespace = \"preserve\"").expect("write config");

    let mut cmd = cargo_bin_cmd!("jsonml");
    cmd.arg("--config")
        .arg(config.path())
        .write_stdin("<ul>\n<li>a</li>\n</ul>");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[\"ul\",\"\\n\",[\"li\",\"a\"],\"\\n\"]"));
}

#[test]
fn missing_config_file_fails() {
    let mut cmd = cargo_bin_cmd!("jsonml");
    cmd.args(["--config", "/nonexistent/jsonml.toml"]).write_stdin("<p>x</p>");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error loading configuration"));
}

//! Driver tests: argument validation, file and stdin input, output targets.

use clap::Parser;
use std::io::Write;

use esup_cli::args::CliArgs;
use esup_cli::driver::{self, Input};
use esup_core::{TransformConfig, TransformerName, transform_source};

fn args(argv: &[&str]) -> CliArgs {
    let mut full = vec!["esup"];
    full.extend_from_slice(argv);
    CliArgs::try_parse_from(full).expect("args should parse")
}

/// Run the driver with `stdin` as input and return stdout or the error
/// message as the user would see it.
fn run(argv: &[&str], stdin: &str) -> Result<String, String> {
    let mut input = stdin.as_bytes();
    let mut output = Vec::new();
    driver::run(&args(argv), &mut input, &mut output).map_err(|err| format!("{err:#}"))?;
    Ok(String::from_utf8(output).expect("utf-8 output"))
}

fn source_file(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".js")
        .tempfile()
        .expect("create temp file");
    file.write_all(text.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_reads_stdin_without_file() {
    let output = run(&["-t", "let"], "var x = 42;\n").expect("run");
    assert_eq!(output, "const x = 42;\n");
}

#[test]
fn test_reads_named_file() {
    let file = source_file("var a = function (x) { return x * 2; };\n");
    let path = file.path().to_str().expect("utf-8 path");
    let output = run(&["--transformers", "arrowFunctions,let", path], "").expect("run");
    assert_eq!(output, "const a = x => x * 2;\n");
}

#[test]
fn test_writes_out_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("out.js");
    let out_arg = out.to_str().expect("utf-8 path");

    let stdout = run(&["-o", out_arg, "-t", "let"], "var x = 1;\n").expect("run");
    assert_eq!(stdout, "");
    let written = std::fs::read_to_string(&out).expect("output file");
    assert_eq!(written, "const x = 1;\n");
}

#[test]
fn test_default_transformers() {
    let source = "'use strict';\nvar greet = function (name) {\n  return 'Hi ' + name;\n};\n";
    let output = run(&[], source).expect("run");
    assert_eq!(output, "const greet = name => `Hi ${name}`;\n");
}

#[test]
fn test_rejects_several_files() {
    let a = source_file("var a;");
    let b = source_file("var b;");
    let err = run(
        &[
            a.path().to_str().expect("utf-8 path"),
            b.path().to_str().expect("utf-8 path"),
        ],
        "",
    )
    .expect_err("two files");
    assert_eq!(err, "Only one input file allowed, but 2 given instead.");
}

#[test]
fn test_rejects_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing.js");
    let missing_arg = missing.to_str().expect("utf-8 path");
    let err = run(&[missing_arg], "").expect_err("missing file");
    assert_eq!(err, format!("File {missing_arg} does not exist."));
}

#[test]
fn test_file_checked_before_transformers() {
    let err = run(&["-t", "nope", "a.js", "b.js"], "").expect_err("two files");
    assert_eq!(err, "Only one input file allowed, but 2 given instead.");
}

#[test]
fn test_config_errors() {
    let err = run(&["-t", "let", "--disable-transformers", "classes"], "").expect_err("conflict");
    assert_eq!(
        err,
        "Options --transformers and --disable-transformers can not be used together."
    );

    let err = run(&["-t", "let,nope"], "").expect_err("unknown");
    assert_eq!(err, "Unknown transformer \"nope\".");

    let err = run(&["--module", "amd"], "").expect_err("module");
    assert_eq!(err, "Unsupported module system \"amd\".");
}

#[test]
fn test_parse_error_message_is_unmodified() {
    let err = run(&["-t", "let"], "var = ;").expect_err("parse error");
    let config = TransformConfig::only(&[TransformerName::Let]);
    let expected = transform_source("var = ;", &config).expect_err("parse error");
    assert_eq!(err, expected.to_string());
}

#[test]
fn test_show_config() {
    let output = run(&["--show-config", "-t", "classes", "--module", "commonjs"], "").expect("run");
    let json: serde_json::Value = serde_json::from_str(&output).expect("json output");
    assert_eq!(json["classes"], true);
    assert_eq!(json["let"], false);
    assert_eq!(json["importCommonjs"], true);
    assert_eq!(json["exportCommonjs"], true);
    assert_eq!(json.as_object().map(|o| o.len()), Some(10));
}

#[test]
fn test_parse_options_stdin() {
    let options = driver::parse_options(&args(&["-t", "let"])).expect("options");
    assert_eq!(options.input, Input::Stdin);
    assert!(options.out_file.is_none());
    assert_eq!(options.config.enabled_count(), 1);
}

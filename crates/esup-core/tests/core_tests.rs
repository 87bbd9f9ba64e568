//! End-to-end tests: text in, text out.

use esup_core::{
    ConfigError, TransformConfig, TransformError, TransformerName, transform_many, transform_source,
    transform_with_options,
};

fn only_let() -> TransformConfig {
    TransformConfig::only(&[TransformerName::Let])
}

#[test]
fn test_empty_config_returns_input() {
    let source = "// header\n\nvar a = function () { return 1; };\n\n\n";
    let output = transform_source(source, &TransformConfig::none()).expect("valid input");
    assert_eq!(output, source);
}

#[test]
fn test_indented_document_returns_input() {
    let sources = ["  a;\n  b;", "\ta();\n\tb();", "  if (x) {\n    y();\n  }"];
    for source in sources {
        let output = transform_source(source, &TransformConfig::none()).expect("valid input");
        assert_eq!(output, source);
    }
}

#[test]
fn test_indented_document_with_let() {
    let source = "  var a = 1;\n  if (a) {\n    var b = a;\n    use(b);\n  }\n";
    let output = transform_source(source, &only_let()).expect("valid input");
    assert_eq!(output, "  const a = 1;\n  if (a) {\n    const b = a;\n    use(b);\n  }\n");
}

#[test]
fn test_leading_blank_lines_preserved() {
    let output = transform_source("\n\nvar x = 42;", &only_let()).expect("valid input");
    assert_eq!(output, "\n\nconst x = 42;");
}

#[test]
fn test_trailing_blank_lines_preserved() {
    let output = transform_source("var x = 42;\n\n", &only_let()).expect("valid input");
    assert_eq!(output, "const x = 42;\n\n");
}

#[test]
fn test_interpreter_directive_preserved() {
    let output = transform_source("#!/usr/bin/env node\nvar x = 42;", &only_let()).expect("valid input");
    assert_eq!(output, "#!/usr/bin/env node\nconst x = 42;");
}

#[test]
fn test_interpreter_directive_after_blank_line() {
    let source = "\n#!/usr/local/bin/node\nif (true) {\n  var foo = 42;\n}";
    let output = transform_source(source, &only_let()).expect("valid input");
    assert_eq!(output, "\n#!/usr/local/bin/node\nif (true) {\n  const foo = 42;\n}");
}

#[test]
fn test_parse_error_is_reported() {
    let err = transform_source("var = ;", &only_let()).expect_err("invalid input");
    assert!(matches!(err, TransformError::Parse(_)), "got {err:?}");
    assert!(!err.is_config());
}

#[test]
fn test_parse_error_even_with_nothing_enabled() {
    let err = transform_source("function (", &TransformConfig::none()).expect_err("invalid input");
    assert!(matches!(err, TransformError::Parse(_)));
}

#[test]
fn test_config_error_before_parsing() {
    let err = transform_with_options("this is not javascript (", Some(&["let"][..]), Some(&["classes"][..]), None)
        .expect_err("conflicting options");
    assert_eq!(err, TransformError::Config(ConfigError::ConflictingOptions));
    assert_eq!(
        err.to_string(),
        "Options --transformers and --disable-transformers can not be used together."
    );
}

#[test]
fn test_unknown_transformer_message() {
    let err = transform_with_options("var a = 1;", Some(&["nope"][..]), None, None).expect_err("unknown name");
    assert!(err.is_config());
    assert_eq!(err.to_string(), "Unknown transformer \"nope\".");
}

#[test]
fn test_options_select_transformers() {
    let output = transform_with_options(
        "var a = 1;\nvar f = function (x) { return x; };\n",
        Some(&["arrowFunctions"][..]),
        None,
        None,
    )
    .expect("valid input");
    assert_eq!(output, "var a = 1;\nvar f = x => x;\n");
}

#[test]
fn test_options_module_commonjs() {
    let output = transform_with_options(
        "var fs = require('fs');\nmodule.exports = fs;\n",
        Some(&["classes"][..]),
        None,
        Some("commonjs"),
    )
    .expect("valid input");
    assert_eq!(output, "import fs from 'fs';\nexport default fs;\n");
}

#[test]
fn test_transform_many_keeps_order() {
    let sources = vec![
        "var a = 1;".to_string(),
        "var = ;".to_string(),
        "var b = 2;\nb++;".to_string(),
    ];
    let results = transform_many(&sources, &only_let());
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_deref(), Ok("const a = 1;"));
    assert!(matches!(results[1], Err(TransformError::Parse(_))));
    assert_eq!(results[2].as_deref(), Ok("let b = 2;\nb++;"));
}

use clap::Parser;

use super::CliArgs;

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["esup"]).expect("default args should parse");

    assert!(args.out_file.is_none());
    assert!(args.transformers.is_none());
    assert!(args.disable_transformers.is_none());
    assert!(args.module.is_none());
    assert!(!args.show_config);
    assert!(args.files.is_empty());
}

#[test]
fn parses_comma_lists() {
    let args = CliArgs::try_parse_from(["esup", "-t", "let,arrowFunctions", "src/app.js"])
        .expect("transformer list should parse");

    assert_eq!(
        args.transformers,
        Some(vec!["let".to_string(), "arrowFunctions".to_string()])
    );
    assert_eq!(args.files, vec![std::path::PathBuf::from("src/app.js")]);

    let args = CliArgs::try_parse_from(["esup", "--disable-transformers", "classes"])
        .expect("disable list should parse");
    assert_eq!(args.disable_transformers, Some(vec!["classes".to_string()]));
}

#[test]
fn parses_output_and_module() {
    let args = CliArgs::try_parse_from([
        "esup",
        "--out-file",
        "out.js",
        "--module",
        "commonjs",
        "--show-config",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.out_file.as_deref(), Some(std::path::Path::new("out.js")));
    assert_eq!(args.module.as_deref(), Some("commonjs"));
    assert!(args.show_config);

    let args = CliArgs::try_parse_from(["esup", "-o", "short.js"]).expect("short flag should parse");
    assert_eq!(args.out_file.as_deref(), Some(std::path::Path::new("short.js")));
}

#[test]
fn accepts_several_files_for_the_driver_to_reject() {
    let args = CliArgs::try_parse_from(["esup", "a.js", "b.js"]).expect("files should parse");
    assert_eq!(args.files.len(), 2);
}

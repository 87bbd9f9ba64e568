use super::*;

const NONE: Option<&[&str]> = None;

fn enabled_names(config: &TransformConfig) -> Vec<&'static str> {
    config
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| name.as_str())
        .collect()
}

#[test]
fn test_defaults_follow_catalog() {
    let config = resolve(NONE, NONE, None).expect("defaults");
    assert_eq!(config, TransformConfig::defaults());
    assert!(config.is_enabled(TransformerName::Classes));
    assert!(!config.is_enabled(TransformerName::ImportCommonjs));
    assert!(!config.is_enabled(TransformerName::ExportCommonjs));
    assert_eq!(config.enabled_count(), 8);
}

#[test]
fn test_selected_enables_only_named() {
    let config = resolve(Some(&["let", "noStrict"][..]), NONE, None).expect("resolve");
    assert_eq!(enabled_names(&config), vec!["let", "noStrict"]);
}

#[test]
fn test_disabled_turns_off_named() {
    let config = resolve(NONE, Some(&["classes", "let"][..]), None).expect("resolve");
    assert!(!config.is_enabled(TransformerName::Classes));
    assert!(!config.is_enabled(TransformerName::Let));
    assert!(config.is_enabled(TransformerName::ArrowFunctions));
    assert_eq!(config.enabled_count(), 6);
}

#[test]
fn test_both_lists_conflict() {
    let err = resolve(Some(&["let"][..]), Some(&["classes"][..]), None).unwrap_err();
    assert_eq!(err, ConfigError::ConflictingOptions);
    assert_eq!(
        err.to_string(),
        "Options --transformers and --disable-transformers can not be used together."
    );

    // Conflict is reported before names are validated.
    let err = resolve(Some(&["nope"][..]), Some(&["nope"][..]), Some("amd")).unwrap_err();
    assert_eq!(err, ConfigError::ConflictingOptions);
}

#[test]
fn test_unknown_names_are_rejected() {
    let err = resolve(Some(&["let", "letDeclarations"][..]), NONE, None).unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownTransformer("letDeclarations".to_string())
    );
    assert_eq!(err.to_string(), "Unknown transformer \"letDeclarations\".");

    let err = resolve(NONE, Some(&["Let"][..]), None).unwrap_err();
    assert_eq!(err, ConfigError::UnknownTransformer("Let".to_string()));
}

#[test]
fn test_commonjs_module_forces_module_transforms() {
    let config = resolve(Some(&["classes"][..]), NONE, Some("commonjs")).expect("resolve");
    assert_eq!(
        enabled_names(&config),
        vec!["classes", "importCommonjs", "exportCommonjs"]
    );

    let config = resolve(NONE, Some(&["importCommonjs"][..]), Some("commonjs")).expect("resolve");
    assert!(config.is_enabled(TransformerName::ImportCommonjs));
}

#[test]
fn test_unsupported_module_system() {
    let err = resolve(NONE, NONE, Some("amd")).unwrap_err();
    assert_eq!(err, ConfigError::UnsupportedModuleSystem("amd".to_string()));
    assert_eq!(err.to_string(), "Unsupported module system \"amd\".");

    let config = resolve(NONE, NONE, Some("")).expect("empty module is absent");
    assert_eq!(config, TransformConfig::defaults());
}

#[test]
fn test_resolution_is_total_and_deterministic() {
    for entry in &CATALOG {
        let names = [entry.name.as_str()];
        let first = resolve(Some(&names[..]), NONE, None).expect("resolve");
        let second = resolve(Some(&names[..]), NONE, None).expect("resolve");
        assert_eq!(first, second);
        assert_eq!(first.iter().count(), TransformerName::COUNT);
        assert_eq!(enabled_names(&first), vec![entry.name.as_str()]);
    }
}

#[test]
fn test_config_serializes_in_catalog_order() {
    let json = serde_json::to_string(&TransformConfig::defaults()).expect("serialize");
    assert_eq!(
        json,
        "{\"classes\":true,\"stringTemplates\":true,\"arrowFunctions\":true,\"let\":true,\
         \"defaultArguments\":true,\"objectMethods\":true,\"objectShorthands\":true,\
         \"noStrict\":true,\"importCommonjs\":false,\"exportCommonjs\":false}"
    );
}

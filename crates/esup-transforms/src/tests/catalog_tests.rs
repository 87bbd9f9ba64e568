use super::*;

#[test]
fn test_catalog_is_indexed_by_name() {
    for (i, entry) in CATALOG.iter().enumerate() {
        assert_eq!(entry.name.index(), i, "{} out of place", entry.name);
    }
}

#[test]
fn test_from_name_round_trips() {
    for entry in &CATALOG {
        assert_eq!(TransformerName::from_name(entry.name.as_str()), Some(entry.name));
    }
    assert_eq!(TransformerName::from_name("Classes"), None);
    assert_eq!(TransformerName::from_name("template"), None);
    assert_eq!(TransformerName::from_name(""), None);
}

#[test]
fn test_only_module_transforms_are_opt_in() {
    let disabled: Vec<&str> = CATALOG
        .iter()
        .filter(|entry| !entry.enabled_by_default)
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(disabled, vec!["importCommonjs", "exportCommonjs"]);
    assert!(default_enabled(TransformerName::Let));
}

#[test]
fn test_serialized_names_match_command_line_names() {
    for entry in &CATALOG {
        let json = serde_json::to_string(&entry.name).expect("serialize");
        assert_eq!(json, format!("\"{}\"", entry.name.as_str()));
    }
}

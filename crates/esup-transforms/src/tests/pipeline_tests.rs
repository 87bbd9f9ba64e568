use super::*;
use crate::catalog::CATALOG;
use esup_common::SourceDocument;
use esup_parser::parse_document;

fn parse(source: &str) -> SyntaxTree {
    parse_document(&SourceDocument::new(source)).expect("parse")
}

#[test]
fn test_pipeline_order_is_a_permutation_of_the_catalog() {
    let mut ordered: Vec<TransformerName> = PIPELINE_ORDER.to_vec();
    ordered.sort();
    let mut catalog: Vec<TransformerName> = CATALOG.iter().map(|entry| entry.name).collect();
    catalog.sort();
    assert_eq!(ordered, catalog);
}

#[test]
fn test_pipeline_order_constraints() {
    let position = |name| PIPELINE_ORDER.iter().position(|n| *n == name).expect("listed");
    assert!(position(TransformerName::Classes) < position(TransformerName::ArrowFunctions));
    assert!(position(TransformerName::ObjectMethods) < position(TransformerName::ArrowFunctions));
    assert!(position(TransformerName::DefaultArguments) < position(TransformerName::ArrowFunctions));
    assert_eq!(PIPELINE_ORDER.last(), Some(&TransformerName::Let));
}

#[test]
fn test_disabled_transformers_do_not_run() {
    let tree = parse("var a = 1;\n'use strict';\n");
    let mut tree = tree;
    let report = apply_in_place(&mut tree, &TransformConfig::none());
    assert!(report.rewrites.is_empty());
    assert!(tree.is_pristine(tree.root()));
}

#[test]
fn test_report_follows_pipeline_order() {
    let mut tree = parse("var a = 1;\nvar o = {a: a};\n");
    let config = TransformConfig::only(&[TransformerName::Let, TransformerName::ObjectShorthands]);
    let report = apply_in_place(&mut tree, &config);
    let names: Vec<TransformerName> = report.rewrites.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        vec![TransformerName::ObjectShorthands, TransformerName::Let]
    );
    assert_eq!(report.total(), 3);
}

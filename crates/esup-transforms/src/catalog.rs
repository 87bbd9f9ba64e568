//! The transformer catalog.
//!
//! A closed registry: every transformer esup knows about, with its default
//! enabled state. User input is checked against it by name and never
//! extends it.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformerName {
    Classes,
    StringTemplates,
    ArrowFunctions,
    Let,
    DefaultArguments,
    ObjectMethods,
    ObjectShorthands,
    NoStrict,
    ImportCommonjs,
    ExportCommonjs,
}

impl TransformerName {
    pub const COUNT: usize = 10;

    /// The name used on the command line and in `--show-config` output.
    pub const fn as_str(self) -> &'static str {
        match self {
            TransformerName::Classes => "classes",
            TransformerName::StringTemplates => "stringTemplates",
            TransformerName::ArrowFunctions => "arrowFunctions",
            TransformerName::Let => "let",
            TransformerName::DefaultArguments => "defaultArguments",
            TransformerName::ObjectMethods => "objectMethods",
            TransformerName::ObjectShorthands => "objectShorthands",
            TransformerName::NoStrict => "noStrict",
            TransformerName::ImportCommonjs => "importCommonjs",
            TransformerName::ExportCommonjs => "exportCommonjs",
        }
    }

    /// Look a name up in the catalog. Exact, case-sensitive match.
    pub fn from_name(name: &str) -> Option<TransformerName> {
        CATALOG
            .iter()
            .map(|entry| entry.name)
            .find(|candidate| candidate.as_str() == name)
    }

    /// Position in catalog order.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TransformerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: TransformerName,
    pub enabled_by_default: bool,
}

const fn entry(name: TransformerName, enabled_by_default: bool) -> CatalogEntry {
    CatalogEntry {
        name,
        enabled_by_default,
    }
}

/// Every transformer in catalog order. The CommonJS module transforms are
/// opt-in; everything else runs by default.
pub static CATALOG: [CatalogEntry; TransformerName::COUNT] = [
    entry(TransformerName::Classes, true),
    entry(TransformerName::StringTemplates, true),
    entry(TransformerName::ArrowFunctions, true),
    entry(TransformerName::Let, true),
    entry(TransformerName::DefaultArguments, true),
    entry(TransformerName::ObjectMethods, true),
    entry(TransformerName::ObjectShorthands, true),
    entry(TransformerName::NoStrict, true),
    entry(TransformerName::ImportCommonjs, false),
    entry(TransformerName::ExportCommonjs, false),
];

pub fn default_enabled(name: TransformerName) -> bool {
    CATALOG[name.index()].enabled_by_default
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;

//! Centralized limits and thresholds.

/// Maximum nesting depth the parser accepts before reporting an error.
///
/// Each nested statement or expression adds a frame to the recursive-descent
/// call stack; past this depth parsing fails with a diagnostic instead of
/// overflowing the stack.
pub const MAX_AST_DEPTH: u32 = 500;

/// Maximum depth for walking the syntax tree in transforms and the printer.
///
/// Trees produced by the parser never exceed `MAX_AST_DEPTH`; transforms only
/// add a handful of wrapper levels on top.
pub const MAX_VISIT_DEPTH: u32 = MAX_AST_DEPTH + 64;

/// Indentation used when the source gives no hint.
pub const DEFAULT_INDENT_UNIT: &str = "  ";

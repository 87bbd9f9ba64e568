use super::*;

fn kinds(source: &str) -> Vec<SyntaxKind> {
    let mut scanner = ScannerState::new(source.to_string(), true);
    let mut out = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        out.push(kind);
    }
    out
}

#[test]
fn test_scan_empty() {
    let mut scanner = ScannerState::new(String::new(), true);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_scan_whitespace_skip() {
    let mut scanner = ScannerState::new("   foo".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value(), "foo");
    assert_eq!(scanner.get_token_start(), 3);
    assert_eq!(scanner.get_token_full_start(), 0);
}

#[test]
fn test_scan_punctuation() {
    assert_eq!(
        kinds("{}()[];,"),
        vec![
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            SyntaxKind::SemicolonToken,
            SyntaxKind::CommaToken,
        ]
    );
}

#[test]
fn test_scan_compound_operators() {
    assert_eq!(
        kinds("=== !== == != => && || ?? >>>= ... ?."),
        vec![
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::ExclamationEqualsEqualsToken,
            SyntaxKind::EqualsEqualsToken,
            SyntaxKind::ExclamationEqualsToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::BarBarToken,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::QuestionDotToken,
        ]
    );
}

#[test]
fn test_scan_keywords_and_contextual_words() {
    assert_eq!(
        kinds("var let const function of"),
        vec![
            SyntaxKind::VarKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::ConstKeyword,
            SyntaxKind::FunctionKeyword,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_scan_string_with_escapes() {
    let mut scanner = ScannerState::new("'it\\'s\\n\\u0041'".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value(), "it's\nA");
    assert_eq!(scanner.get_token_text(), "'it\\'s\\n\\u0041'");
    assert!(!scanner.is_unterminated());
}

#[test]
fn test_scan_unterminated_string() {
    let mut scanner = ScannerState::new("\"abc\nx".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert!(scanner.is_unterminated());
}

#[test]
fn test_scan_numbers() {
    let mut scanner = ScannerState::new("0x1F 1.5e-3 .5 10n 1_000".to_string(), true);
    let mut values = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        values.push((kind, scanner.get_token_value().to_string()));
    }
    assert_eq!(
        values,
        vec![
            (SyntaxKind::NumericLiteral, "0x1F".to_string()),
            (SyntaxKind::NumericLiteral, "1.5e-3".to_string()),
            (SyntaxKind::NumericLiteral, ".5".to_string()),
            (SyntaxKind::BigIntLiteral, "10n".to_string()),
            (SyntaxKind::NumericLiteral, "1_000".to_string()),
        ]
    );
}

#[test]
fn test_comments_are_recorded_once() {
    let mut scanner = ScannerState::new("// a\nx /* b */ y".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
    let snapshot = scanner.save_state();
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    scanner.restore_state(snapshot);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value(), "y");
    let comments = scanner.comments();
    assert_eq!(comments.len(), 2);
    assert!(!comments[0].is_multi_line);
    assert!(comments[0].has_trailing_new_line);
    assert!(comments[1].is_multi_line);
}

#[test]
fn test_multi_line_comment_counts_as_line_break() {
    let mut scanner = ScannerState::new("a /*\n*/ b".to_string(), true);
    scanner.scan();
    scanner.scan();
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_re_scan_regex() {
    let mut scanner = ScannerState::new("/[/]a\\/b/gi.test".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
    assert_eq!(scanner.re_scan_slash_token(), SyntaxKind::RegularExpressionLiteral);
    assert_eq!(scanner.get_token_text(), "/[/]a\\/b/gi");
    assert_eq!(scanner.scan(), SyntaxKind::DotToken);
}

#[test]
fn test_template_parts() {
    let mut scanner = ScannerState::new("`a${x}b${y}c`".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
    assert_eq!(scanner.get_token_value(), "a");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.re_scan_template_token(), SyntaxKind::TemplateMiddle);
    assert_eq!(scanner.get_token_value(), "b");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.re_scan_template_token(), SyntaxKind::TemplateTail);
    assert_eq!(scanner.get_token_value(), "c");
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_no_substitution_template() {
    let mut scanner = ScannerState::new("`plain \\` text`".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::NoSubstitutionTemplateLiteral);
    assert_eq!(scanner.get_token_value(), "plain \\` text");
}

#[test]
fn test_set_text_pos_skips_prefix() {
    let mut scanner = ScannerState::new("#!/bin/node\nfoo".to_string(), true);
    scanner.set_text_pos(11);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value(), "foo");
    assert!(scanner.has_preceding_line_break());
}

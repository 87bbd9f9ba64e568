use super::*;

fn ranges(source: &str) -> Vec<CommentRange> {
    // Minimal comment finder for tests; the scanner is the real producer.
    let mut out = Vec::new();
    let mut i = 0;
    let bytes = source.as_bytes();
    while i + 1 < bytes.len() {
        if bytes[i] == b'/' && bytes[i + 1] == b'/' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            out.push(CommentRange::new(start as u32, i as u32, false, i < bytes.len()));
        } else if bytes[i] == b'/' && bytes[i + 1] == b'*' {
            let start = i;
            let close = source[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2);
            i = close;
            out.push(CommentRange::new(start as u32, i as u32, true, false));
        } else {
            i += 1;
        }
    }
    out
}

#[test]
fn leading_comments_are_collected_across_lines() {
    let source = "a();\n// one\n/* two */\nb();";
    let comments = ranges(source);
    let pos = source.find("b()").unwrap() as u32;
    let start = leading_comment_start(source, &comments, 0, pos);
    assert_eq!(&source[start as usize..], "// one\n/* two */\nb();");
}

#[test]
fn trailing_comment_of_previous_statement_is_not_leading() {
    let source = "a(); // about a\nb();";
    let comments = ranges(source);
    let pos = source.find("b()").unwrap() as u32;
    assert_eq!(leading_comment_start(source, &comments, 0, pos), pos);
}

#[test]
fn floor_stops_the_walk() {
    let source = "// head\nb();";
    let comments = ranges(source);
    let pos = source.find("b()").unwrap() as u32;
    assert_eq!(leading_comment_start(source, &comments, 3, pos), pos);
}

#[test]
fn jsdoc_detection() {
    let source = "/** doc */ /*** banner */";
    let comments = ranges(source);
    assert!(is_jsdoc_comment(&comments[0], source));
    assert!(!is_jsdoc_comment(&comments[1], source));
}

//! `stringTemplates`: string concatenation → template literals.
//!
//! `'Hello ' + name + '!'` becomes `` `Hello ${name}!` ``. A chain converts
//! when it mixes at least one string literal with at least one other
//! operand. Operands added before the first string literal are numeric
//! addition as far as the chain is concerned, so they stay together in one
//! substitution: `a + b + 'px'` becomes `` `${a + b}px` ``.

use esup_parser::{LiteralKind, NodeData, NodeIndex, SyntaxTree};
use esup_scanner::SyntaxKind;

use super::find_all;

pub fn run(tree: &mut SyntaxTree) -> usize {
    let parents = tree.parents();
    let roots: Vec<NodeIndex> = find_all(tree, |data| is_concatenation(data))
        .into_iter()
        .filter(|idx| {
            // Only the outermost `+` of a left-nested chain.
            !parents[idx.index()].is_some_and(|parent| {
                matches!(tree.data(parent), NodeData::Binary { operator: SyntaxKind::PlusToken, left, .. } if *left == *idx)
            })
        })
        .collect();

    let mut rewritten = 0;
    for root in roots {
        let Some(template) = build_template(tree, root) else {
            continue;
        };
        tracing::trace!(pos = tree.span(root).start, "template literal");
        tree.replace(root, template);
        rewritten += 1;
    }
    rewritten
}

fn is_concatenation(data: &NodeData) -> bool {
    matches!(
        data,
        NodeData::Binary {
            operator: SyntaxKind::PlusToken,
            ..
        }
    )
}

/// Operands of a left-nested `+` chain, left to right, with the node that
/// covers each prefix of the chain.
fn flatten(tree: &SyntaxTree, root: NodeIndex) -> (Vec<NodeIndex>, Vec<NodeIndex>) {
    let mut operands = Vec::new();
    let mut prefixes = Vec::new();
    let mut current = root;
    while let NodeData::Binary {
        operator: SyntaxKind::PlusToken,
        left,
        right,
    } = *tree.data(current)
    {
        operands.push(right);
        prefixes.push(current);
        current = left;
    }
    operands.push(current);
    prefixes.push(current);
    operands.reverse();
    prefixes.reverse();
    (operands, prefixes)
}

fn build_template(tree: &SyntaxTree, root: NodeIndex) -> Option<NodeData> {
    let (operands, prefixes) = flatten(tree, root);
    let is_string = |idx: NodeIndex| tree.string_value(idx).is_some();

    let first_string = operands.iter().position(|idx| is_string(*idx))?;
    if operands.iter().all(|idx| is_string(*idx)) {
        return None;
    }

    let mut quasis = vec![String::new()];
    let mut expressions = Vec::new();

    // Everything before the first string is one substitution.
    if first_string > 0 {
        expressions.push(tree.skip_parens(prefixes[first_string - 1]));
        quasis.push(String::new());
    }

    for &operand in &operands[first_string..] {
        match tree.data(operand) {
            NodeData::Literal(literal) if literal.kind == LiteralKind::String => {
                let text = template_text(&literal.raw)?;
                if let Some(last) = quasis.last_mut() {
                    append_quasi(last, &text);
                }
            }
            _ => {
                expressions.push(tree.skip_parens(operand));
                quasis.push(String::new());
            }
        }
    }

    Some(NodeData::Template {
        quasis,
        expressions,
    })
}

/// Append literal text to a quasi. A `$` closing the previous literal and a
/// `{` opening this one would read as a substitution once joined.
fn append_quasi(quasi: &mut String, text: &str) {
    if text.starts_with('{') && ends_with_unescaped_dollar(quasi) {
        quasi.pop();
        quasi.push_str("\\$");
    }
    quasi.push_str(text);
}

fn ends_with_unescaped_dollar(text: &str) -> bool {
    let Some(rest) = text.strip_suffix('$') else {
        return false;
    };
    let backslashes = rest.len() - rest.trim_end_matches('\\').len();
    backslashes % 2 == 0
}

/// Raw template text for a quoted string literal. Quote escapes are dropped,
/// backticks and `${` are escaped. Legacy octal escapes have no template
/// equivalent.
fn template_text(raw: &str) -> Option<String> {
    let inner = raw.get(1..raw.len().saturating_sub(1))?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                let next = chars.next()?;
                match next {
                    '\'' | '"' => out.push(next),
                    '0' if chars.peek().is_some_and(char::is_ascii_digit) => return None,
                    '1'..='9' => return None,
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(ch),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::{append_quasi, template_text};

    #[test]
    fn test_template_text_escapes() {
        assert_eq!(template_text("'it\\'s'").as_deref(), Some("it's"));
        assert_eq!(template_text("\"a`b\"").as_deref(), Some("a\\`b"));
        assert_eq!(template_text("'${x}'").as_deref(), Some("\\${x}"));
        assert_eq!(template_text("'line\\n'").as_deref(), Some("line\\n"));
        assert_eq!(template_text("'\\01'"), None);
        assert_eq!(template_text("'\\0'").as_deref(), Some("\\0"));
    }

    #[test]
    fn test_append_quasi_escapes_joined_substitution() {
        let mut quasi = String::from("$");
        append_quasi(&mut quasi, "{");
        assert_eq!(quasi, "\\${");

        let mut quasi = String::from("\\$");
        append_quasi(&mut quasi, "{");
        assert_eq!(quasi, "\\${");

        let mut quasi = String::from("\\\\$");
        append_quasi(&mut quasi, "{");
        assert_eq!(quasi, "\\\\\\${");

        let mut quasi = String::from("$");
        append_quasi(&mut quasi, "x{");
        assert_eq!(quasi, "$x{");
    }
}

use esup_parser::{NodeData, NodeIndex};
use esup_scanner::SyntaxKind;

use super::Printer;

impl<'a> Printer<'a> {
    // =========================================================================
    // Expressions
    // =========================================================================

    pub(super) fn emit_expression_data(&mut self, data: &'a NodeData) {
        match data {
            NodeData::Identifier { name } => self.write(name),
            NodeData::This => self.write("this"),
            NodeData::Super => self.write("super"),
            NodeData::Literal(literal) => self.write(&literal.raw),
            NodeData::DeclarationKeyword(kind) => self.write(kind.as_str()),
            NodeData::VariableDeclarator { id, init } => {
                self.emit(*id);
                if let Some(init) = init {
                    self.write(" = ");
                    self.emit(*init);
                }
            }
            NodeData::Function(function) => self.emit_function(function),
            NodeData::Arrow {
                is_async,
                params,
                body,
            } => self.emit_arrow(*is_async, params, *body),
            NodeData::Template {
                quasis,
                expressions,
            } => self.emit_template(quasis, expressions),
            NodeData::TaggedTemplate { tag, quasi } => {
                self.emit(*tag);
                self.emit(*quasi);
            }
            NodeData::Array { elements } => {
                self.write("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(element) = element {
                        self.emit(*element);
                    }
                }
                // A trailing hole needs its own comma.
                if matches!(elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            NodeData::Object { properties } => {
                if properties.iter().all(|p| self.tree.is_removed(*p)) {
                    self.write("{}");
                } else {
                    self.write("{");
                    self.emit_comma_separated(properties);
                    self.write("}");
                }
            }
            NodeData::Property {
                key,
                value,
                computed,
                shorthand,
            } => {
                if *shorthand {
                    self.emit(*value);
                    return;
                }
                if *computed {
                    self.write("[");
                    self.emit(*key);
                    self.write("]");
                } else {
                    self.emit(*key);
                }
                self.write(": ");
                self.emit(*value);
            }
            NodeData::Unary { operator, argument } => {
                self.write(operator.text());
                if operator.is_keyword() {
                    self.write_space();
                }
                self.emit(*argument);
            }
            NodeData::Update {
                operator,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.write(operator.text());
                    self.emit(*argument);
                } else {
                    self.emit(*argument);
                    self.write(operator.text());
                }
            }
            NodeData::Binary {
                operator,
                left,
                right,
            }
            | NodeData::Assignment {
                operator,
                left,
                right,
            } => self.emit_binary(*operator, *left, *right),
            NodeData::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.emit(*test);
                self.write(" ? ");
                self.emit(*consequent);
                self.write(" : ");
                self.emit(*alternate);
            }
            NodeData::Call {
                callee,
                arguments,
                optional,
            } => {
                self.emit(*callee);
                if *optional {
                    self.write("?.");
                }
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            NodeData::New { callee, arguments } => {
                self.write("new ");
                self.emit(*callee);
                if let Some(arguments) = arguments {
                    self.write("(");
                    self.emit_comma_separated(arguments);
                    self.write(")");
                }
            }
            NodeData::Member {
                object,
                property,
                computed,
                optional,
            } => {
                self.emit(*object);
                match (*computed, *optional) {
                    (true, true) => self.write("?.["),
                    (true, false) => self.write("["),
                    (false, true) => self.write("?."),
                    (false, false) => self.write("."),
                }
                self.emit(*property);
                if *computed {
                    self.write("]");
                }
            }
            NodeData::Sequence { expressions } => self.emit_comma_separated(expressions),
            NodeData::Paren { expression } => {
                self.write("(");
                self.emit(*expression);
                self.write(")");
            }
            NodeData::Spread { argument } => {
                self.write("...");
                self.emit(*argument);
            }
            NodeData::Yield { argument, delegate } => {
                self.write("yield");
                if *delegate {
                    self.write_char('*');
                }
                if let Some(argument) = argument {
                    self.write_space();
                    self.emit(*argument);
                }
            }
            NodeData::Await { argument } => {
                self.write("await ");
                self.emit(*argument);
            }
            NodeData::AssignmentPattern { left, right } => {
                self.emit(*left);
                self.write(" = ");
                self.emit(*right);
            }
            _ => self.emit_statement_data(data),
        }
    }

    fn emit_binary(&mut self, operator: SyntaxKind, left: NodeIndex, right: NodeIndex) {
        self.emit(left);
        self.write_space();
        self.write(operator.text());
        self.write_space();
        self.emit(right);
    }

    /// `x => body`, `(a, b) => body`, `async () => body`. An object literal
    /// or sequence body gets parentheses.
    fn emit_arrow(&mut self, is_async: bool, params: &'a [NodeIndex], body: NodeIndex) {
        if is_async {
            self.write("async ");
        }
        match params {
            [param] if self.tree.identifier_name(*param).is_some() => self.emit(*param),
            _ => {
                self.write("(");
                self.emit_comma_separated(params);
                self.write(")");
            }
        }
        self.write(" => ");
        let wrap = matches!(
            self.tree.data(body),
            NodeData::Object { .. } | NodeData::Sequence { .. }
        );
        if wrap {
            self.write("(");
        }
        self.emit(body);
        if wrap {
            self.write(")");
        }
    }

    /// Quasis are raw template text; the transform that built them escaped
    /// backticks and `${`.
    fn emit_template(&mut self, quasis: &'a [String], expressions: &'a [NodeIndex]) {
        self.write_char('`');
        for (i, quasi) in quasis.iter().enumerate() {
            self.write(quasi);
            if let Some(expression) = expressions.get(i) {
                self.write("${");
                self.emit(*expression);
                self.write_char('}');
            }
        }
        self.write_char('`');
    }
}

//! Syntax tree nodes.
//!
//! Every node records the span of the slot it occupies in the original
//! text and whether it came from the parser (`Origin::Original`) or was
//! produced by a transform (`Origin::Synthesized`). The printer copies
//! original bytes for clean original subtrees and re-serializes everything
//! else; it never compares node values.

use esup_common::Span;
use esup_scanner::SyntaxKind;
use serde::Serialize;

/// Handle to a node in a [`crate::SyntaxTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Origin {
    /// Produced by the parser; its span text is its exact source.
    Original,
    /// Produced or rewritten by a transform.
    Synthesized,
}

#[derive(Clone, Debug, Serialize)]
pub struct Node {
    pub span: Span,
    pub origin: Origin,
    pub data: NodeData,
}

impl Node {
    pub fn is_original(&self) -> bool {
        self.origin == Origin::Original
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LiteralKind {
    String,
    Number,
    BigInt,
    Boolean,
    Null,
    RegExp,
}

#[derive(Clone, Debug, Serialize)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Cooked value (string contents without quotes and escapes).
    pub value: String,
    /// Source text, quotes included.
    pub raw: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Function {
    pub is_expression: bool,
    pub is_async: bool,
    pub is_generator: bool,
    pub id: Option<NodeIndex>,
    pub params: Vec<NodeIndex>,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct Class {
    pub is_expression: bool,
    pub id: Option<NodeIndex>,
    pub super_class: Option<NodeIndex>,
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

/// A method in a class body or object literal.
#[derive(Clone, Debug, Serialize)]
pub struct Method {
    pub kind: MethodKind,
    pub is_static: bool,
    pub is_async: bool,
    pub is_generator: bool,
    pub computed: bool,
    pub key: NodeIndex,
    pub params: Vec<NodeIndex>,
    pub body: NodeIndex,
    /// Comments moved along with a synthesized member.
    pub leading_comments: Option<Span>,
}

#[derive(Clone, Debug, Serialize)]
pub enum NodeData {
    Program {
        body: Vec<NodeIndex>,
    },
    /// A node deleted by a transform. Prints nothing.
    Removed,

    // Declarations
    VariableDeclaration {
        keyword: NodeIndex,
        declarators: Vec<NodeIndex>,
    },
    VariableDeclarator {
        id: NodeIndex,
        init: Option<NodeIndex>,
    },
    DeclarationKeyword(DeclarationKind),
    Function(Function),
    Arrow {
        is_async: bool,
        params: Vec<NodeIndex>,
        body: NodeIndex,
    },
    Class(Class),
    Method(Method),

    // Statements
    Block {
        body: Vec<NodeIndex>,
    },
    Empty,
    ExpressionStatement {
        expression: NodeIndex,
    },
    If {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: Option<NodeIndex>,
    },
    For {
        init: Option<NodeIndex>,
        test: Option<NodeIndex>,
        update: Option<NodeIndex>,
        body: NodeIndex,
    },
    ForIn {
        is_of: bool,
        left: NodeIndex,
        right: NodeIndex,
        body: NodeIndex,
    },
    While {
        test: NodeIndex,
        body: NodeIndex,
    },
    DoWhile {
        body: NodeIndex,
        test: NodeIndex,
    },
    Return {
        argument: Option<NodeIndex>,
    },
    Throw {
        argument: NodeIndex,
    },
    Break {
        label: Option<NodeIndex>,
    },
    Continue {
        label: Option<NodeIndex>,
    },
    Try {
        block: NodeIndex,
        handler: Option<NodeIndex>,
        finalizer: Option<NodeIndex>,
    },
    CatchClause {
        param: Option<NodeIndex>,
        body: NodeIndex,
    },
    Switch {
        discriminant: NodeIndex,
        cases: Vec<NodeIndex>,
    },
    SwitchCase {
        test: Option<NodeIndex>,
        consequent: Vec<NodeIndex>,
    },
    Labeled {
        label: NodeIndex,
        body: NodeIndex,
    },
    Debugger,
    With {
        object: NodeIndex,
        body: NodeIndex,
    },

    // Modules
    Import {
        specifiers: Vec<NodeIndex>,
        source: NodeIndex,
    },
    ImportDefault {
        local: NodeIndex,
    },
    ImportNamespace {
        local: NodeIndex,
    },
    ImportSpecifier {
        imported: NodeIndex,
        local: Option<NodeIndex>,
    },
    ExportNamed {
        declaration: Option<NodeIndex>,
        specifiers: Vec<NodeIndex>,
        source: Option<NodeIndex>,
    },
    ExportSpecifier {
        local: NodeIndex,
        exported: Option<NodeIndex>,
    },
    ExportDefault {
        declaration: NodeIndex,
    },
    ExportAll {
        exported: Option<NodeIndex>,
        source: NodeIndex,
    },

    // Expressions
    Identifier {
        name: String,
    },
    This,
    Super,
    Literal(Literal),
    /// Template literal. `quasis` hold the raw text between substitutions;
    /// there is always one more quasi than expressions.
    Template {
        quasis: Vec<String>,
        expressions: Vec<NodeIndex>,
    },
    TaggedTemplate {
        tag: NodeIndex,
        quasi: NodeIndex,
    },
    Array {
        elements: Vec<Option<NodeIndex>>,
    },
    Object {
        properties: Vec<NodeIndex>,
    },
    /// `key: value`, or a shorthand `key` (then `value` is the key itself or
    /// an `AssignmentPattern` for `key = default` in patterns).
    Property {
        key: NodeIndex,
        value: NodeIndex,
        computed: bool,
        shorthand: bool,
    },
    Unary {
        operator: SyntaxKind,
        argument: NodeIndex,
    },
    Update {
        operator: SyntaxKind,
        prefix: bool,
        argument: NodeIndex,
    },
    Binary {
        operator: SyntaxKind,
        left: NodeIndex,
        right: NodeIndex,
    },
    Assignment {
        operator: SyntaxKind,
        left: NodeIndex,
        right: NodeIndex,
    },
    Conditional {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    },
    Call {
        callee: NodeIndex,
        arguments: Vec<NodeIndex>,
        optional: bool,
    },
    New {
        callee: NodeIndex,
        arguments: Option<Vec<NodeIndex>>,
    },
    Member {
        object: NodeIndex,
        property: NodeIndex,
        computed: bool,
        optional: bool,
    },
    Sequence {
        expressions: Vec<NodeIndex>,
    },
    Paren {
        expression: NodeIndex,
    },
    /// `...argument` in calls, arrays, objects, and rest patterns.
    Spread {
        argument: NodeIndex,
    },
    Yield {
        argument: Option<NodeIndex>,
        delegate: bool,
    },
    Await {
        argument: NodeIndex,
    },
    /// `left = right` in parameters and destructuring patterns.
    AssignmentPattern {
        left: NodeIndex,
        right: NodeIndex,
    },
}

impl NodeData {
    pub fn is_statement_like(&self) -> bool {
        matches!(
            self,
            NodeData::VariableDeclaration { .. }
                | NodeData::Block { .. }
                | NodeData::Empty
                | NodeData::ExpressionStatement { .. }
                | NodeData::If { .. }
                | NodeData::For { .. }
                | NodeData::ForIn { .. }
                | NodeData::While { .. }
                | NodeData::DoWhile { .. }
                | NodeData::Return { .. }
                | NodeData::Throw { .. }
                | NodeData::Break { .. }
                | NodeData::Continue { .. }
                | NodeData::Try { .. }
                | NodeData::Switch { .. }
                | NodeData::Labeled { .. }
                | NodeData::Debugger
                | NodeData::With { .. }
                | NodeData::Import { .. }
                | NodeData::ExportNamed { .. }
                | NodeData::ExportDefault { .. }
                | NodeData::ExportAll { .. }
        ) || matches!(self, NodeData::Function(f) if !f.is_expression)
            || matches!(self, NodeData::Class(c) if !c.is_expression)
    }

    /// Child nodes in source order.
    ///
    /// The printer relies on this order: the text between consecutive
    /// children of an original node is copied from the source verbatim.
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        match self {
            NodeData::Program { body } | NodeData::Block { body } => out.extend(body),
            NodeData::Removed
            | NodeData::DeclarationKeyword(_)
            | NodeData::Empty
            | NodeData::Debugger
            | NodeData::Identifier { .. }
            | NodeData::This
            | NodeData::Super
            | NodeData::Literal(_) => {}
            NodeData::VariableDeclaration {
                keyword,
                declarators,
            } => {
                out.push(*keyword);
                out.extend(declarators);
            }
            NodeData::VariableDeclarator { id, init } => {
                out.push(*id);
                out.extend(init);
            }
            NodeData::Function(function) => {
                out.extend(function.id);
                out.extend(&function.params);
                out.push(function.body);
            }
            NodeData::Arrow { params, body, .. } => {
                out.extend(params);
                out.push(*body);
            }
            NodeData::Class(class) => {
                out.extend(class.id);
                out.extend(class.super_class);
                out.extend(&class.members);
            }
            NodeData::Method(method) => {
                out.push(method.key);
                out.extend(&method.params);
                out.push(method.body);
            }
            NodeData::ExpressionStatement { expression } => out.push(*expression),
            NodeData::If {
                test,
                consequent,
                alternate,
            } => {
                out.push(*test);
                out.push(*consequent);
                out.extend(alternate);
            }
            NodeData::For {
                init,
                test,
                update,
                body,
            } => {
                out.extend(init);
                out.extend(test);
                out.extend(update);
                out.push(*body);
            }
            NodeData::ForIn {
                left, right, body, ..
            } => out.extend([*left, *right, *body]),
            NodeData::While { test, body } => out.extend([*test, *body]),
            NodeData::DoWhile { body, test } => out.extend([*body, *test]),
            NodeData::Return { argument } => out.extend(argument),
            NodeData::Throw { argument } => out.push(*argument),
            NodeData::Break { label } | NodeData::Continue { label } => out.extend(label),
            NodeData::Try {
                block,
                handler,
                finalizer,
            } => {
                out.push(*block);
                out.extend(handler);
                out.extend(finalizer);
            }
            NodeData::CatchClause { param, body } => {
                out.extend(param);
                out.push(*body);
            }
            NodeData::Switch {
                discriminant,
                cases,
            } => {
                out.push(*discriminant);
                out.extend(cases);
            }
            NodeData::SwitchCase { test, consequent } => {
                out.extend(test);
                out.extend(consequent);
            }
            NodeData::Labeled { label, body } => out.extend([*label, *body]),
            NodeData::With { object, body } => out.extend([*object, *body]),
            NodeData::Import { specifiers, source } => {
                out.extend(specifiers);
                out.push(*source);
            }
            NodeData::ImportDefault { local } | NodeData::ImportNamespace { local } => {
                out.push(*local)
            }
            NodeData::ImportSpecifier { imported, local } => {
                out.push(*imported);
                out.extend(local);
            }
            NodeData::ExportNamed {
                declaration,
                specifiers,
                source,
            } => {
                out.extend(declaration);
                out.extend(specifiers);
                out.extend(source);
            }
            NodeData::ExportSpecifier { local, exported } => {
                out.push(*local);
                out.extend(exported);
            }
            NodeData::ExportDefault { declaration } => out.push(*declaration),
            NodeData::ExportAll { exported, source } => {
                out.extend(exported);
                out.push(*source);
            }
            NodeData::Template { expressions, .. } => out.extend(expressions),
            NodeData::TaggedTemplate { tag, quasi } => out.extend([*tag, *quasi]),
            NodeData::Array { elements } => out.extend(elements.iter().flatten()),
            NodeData::Object { properties } => out.extend(properties),
            NodeData::Property {
                key,
                value,
                shorthand,
                ..
            } => {
                if !*shorthand {
                    out.push(*key);
                }
                out.push(*value);
            }
            NodeData::Unary { argument, .. }
            | NodeData::Update { argument, .. }
            | NodeData::Spread { argument }
            | NodeData::Await { argument } => out.push(*argument),
            NodeData::Binary { left, right, .. }
            | NodeData::Assignment { left, right, .. }
            | NodeData::AssignmentPattern { left, right } => out.extend([*left, *right]),
            NodeData::Conditional {
                test,
                consequent,
                alternate,
            } => out.extend([*test, *consequent, *alternate]),
            NodeData::Call {
                callee, arguments, ..
            } => {
                out.push(*callee);
                out.extend(arguments);
            }
            NodeData::New { callee, arguments } => {
                out.push(*callee);
                if let Some(arguments) = arguments {
                    out.extend(arguments);
                }
            }
            NodeData::Member {
                object, property, ..
            } => out.extend([*object, *property]),
            NodeData::Sequence { expressions } => out.extend(expressions),
            NodeData::Paren { expression } => out.push(*expression),
            NodeData::Yield { argument, .. } => out.extend(argument),
        }
        out
    }
}

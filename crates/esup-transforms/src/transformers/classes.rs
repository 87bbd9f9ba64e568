//! `classes`: constructor functions and their prototype assignments →
//! `class` declarations.
//!
//! ```javascript
//! function Dog(name) {
//!   Animal.call(this, name);
//! }
//! Dog.prototype = Object.create(Animal.prototype);
//! Dog.prototype.constructor = Dog;
//! Dog.prototype.bark = function () {};
//! ```
//!
//! becomes `class Dog extends Animal { constructor(name) { super(name); }
//! bark() {} }`. Member statements are collected from the statements that
//! follow the constructor in the same block, until a statement that uses
//! the class name in some other way.
//!
//! Candidates are processed last to first, so a subclass is converted (and
//! its `Parent.call(this)` rewritten to `super()`) before its parent is
//! checked for non-constructor calls.

use esup_common::Span;
use esup_common::comments::leading_comment_start;
use esup_parser::syntax::transform_utils::contains_this_reference;
use esup_parser::{Class, LiteralKind, Method, MethodKind, NodeData, NodeIndex, SyntaxTree};

use super::object_methods::refers_to_own_name;
use super::{find_all, simple_assignment, statement_comment_start, statement_expression};
use crate::scope::ScopeAnalysis;

pub fn run(tree: &mut SyntaxTree) -> usize {
    let analysis = ScopeAnalysis::analyze(tree);
    if analysis.incomplete {
        return 0;
    }
    let lists = find_all(tree, |data| {
        matches!(data, NodeData::Program { .. } | NodeData::Block { .. })
    });

    let mut rewritten = 0;
    for list in lists.into_iter().rev() {
        let statements = tree.live_statements(list);
        for (i, &stmt) in statements.iter().enumerate().rev() {
            if tree.is_removed(stmt) {
                continue;
            }
            let Some(candidate) = Candidate::match_statement(tree, stmt) else {
                continue;
            };
            if !candidate.is_safe(tree, &analysis) {
                continue;
            }
            let Some(plan) = candidate.collect_members(tree, &statements[i + 1..]) else {
                continue;
            };
            if apply_plan(tree, list, &candidate, plan) {
                tracing::trace!(class = candidate.name.as_str(), "class declaration");
                rewritten += 1;
            }
        }
    }
    rewritten
}

/// A constructor function: `function Foo() {}` or `var Foo = function () {};`.
struct Candidate {
    stmt: NodeIndex,
    name: String,
    id: NodeIndex,
    function: NodeIndex,
}

enum Member {
    /// `Foo.prototype.m = function () {}` / `Foo.m = function () {}`.
    Method {
        stmt: NodeIndex,
        key: NodeIndex,
        function: NodeIndex,
        is_static: bool,
    },
    /// `Object.defineProperty(Foo.prototype, 'p', { get, set })`.
    Accessors {
        stmt: NodeIndex,
        key: NodeIndex,
        getter: Option<NodeIndex>,
        setter: Option<NodeIndex>,
    },
    /// `Foo.prototype = { ... }`.
    PrototypeObject { stmt: NodeIndex, object: NodeIndex },
    /// `Foo.prototype = Object.create(Bar.prototype)`.
    Inherit { stmt: NodeIndex, super_class: NodeIndex },
    /// `Foo.prototype.constructor = Foo`.
    DropConstructor { stmt: NodeIndex },
}

impl Member {
    fn stmt(&self) -> NodeIndex {
        match self {
            Member::Method { stmt, .. }
            | Member::Accessors { stmt, .. }
            | Member::PrototypeObject { stmt, .. }
            | Member::Inherit { stmt, .. }
            | Member::DropConstructor { stmt } => *stmt,
        }
    }

    fn replaces_prototype(&self) -> bool {
        matches!(self, Member::PrototypeObject { .. } | Member::Inherit { .. })
    }
}

impl Candidate {
    fn match_statement(tree: &SyntaxTree, stmt: NodeIndex) -> Option<Candidate> {
        match tree.data(stmt) {
            NodeData::Function(function) if !function.is_expression => {
                if function.is_async || function.is_generator {
                    return None;
                }
                let id = function.id?;
                Some(Candidate {
                    stmt,
                    name: tree.identifier_name(id)?.to_string(),
                    id,
                    function: stmt,
                })
            }
            NodeData::VariableDeclaration { declarators, .. } => {
                let [declarator] = declarators.as_slice() else {
                    return None;
                };
                let NodeData::VariableDeclarator {
                    id,
                    init: Some(init),
                } = tree.data(*declarator)
                else {
                    return None;
                };
                let name = tree.identifier_name(*id)?;
                let NodeData::Function(function) = tree.data(*init) else {
                    return None;
                };
                if function.is_async || function.is_generator {
                    return None;
                }
                if let Some(own) = function.id
                    && !tree.is_identifier(own, name)
                {
                    return None;
                }
                Some(Candidate {
                    stmt,
                    name: name.to_string(),
                    id: *id,
                    function: *init,
                })
            }
            _ => None,
        }
    }

    /// Class bindings are not hoisted and class constructors cannot be
    /// called without `new`.
    fn is_safe(&self, tree: &SyntaxTree, analysis: &ScopeAnalysis) -> bool {
        let scope = match tree.data(self.stmt) {
            NodeData::VariableDeclaration { .. } => analysis.declaration_scopes.get(&self.stmt).copied(),
            _ => analysis
                .scope_of_node(self.function)
                .and_then(|own| analysis.scope(own).parent),
        };
        let Some(scope) = scope else {
            return false;
        };
        if analysis.scope(scope).dynamic || analysis.bindings(scope, &self.name).len() != 1 {
            return false;
        }
        let start = tree.span(self.stmt).start;
        if analysis
            .references_to(scope, &self.name)
            .any(|reference| reference.pos < start)
        {
            return false;
        }
        !self.called_as_function(tree)
    }

    /// `Foo()`, `Foo.call(...)` or `Foo.apply(...)` anywhere.
    fn called_as_function(&self, tree: &SyntaxTree) -> bool {
        tree.preorder(tree.root()).into_iter().any(|idx| {
            let NodeData::Call { callee, .. } = tree.data(idx) else {
                return false;
            };
            let callee = tree.skip_parens(*callee);
            if tree.is_identifier(callee, &self.name) {
                return true;
            }
            tree.as_member(callee).is_some_and(|(object, property)| {
                matches!(property, "call" | "apply") && tree.is_identifier(object, &self.name)
            })
        })
    }

    fn collect_members(&self, tree: &SyntaxTree, following: &[NodeIndex]) -> Option<Vec<Member>> {
        let mut members: Vec<Member> = Vec::new();
        for &stmt in following {
            if tree.is_removed(stmt) {
                continue;
            }
            match self.match_member(tree, stmt) {
                Some(member) => {
                    // Replacing the prototype after members were added to it
                    // discards them; a class cannot express that.
                    if member.replaces_prototype() && !members.is_empty() {
                        return None;
                    }
                    members.push(member);
                }
                None if self.mentions_name(tree, stmt) => break,
                None => {}
            }
        }
        members
            .iter()
            .any(|m| !matches!(m, Member::DropConstructor { .. }))
            .then_some(members)
    }

    fn mentions_name(&self, tree: &SyntaxTree, stmt: NodeIndex) -> bool {
        tree.preorder(stmt)
            .into_iter()
            .any(|idx| tree.is_identifier(idx, &self.name))
    }

    fn is_prototype(&self, tree: &SyntaxTree, idx: NodeIndex) -> bool {
        tree.as_member(idx).is_some_and(|(object, property)| {
            property == "prototype" && tree.is_identifier(object, &self.name)
        })
    }

    fn match_member(&self, tree: &SyntaxTree, stmt: NodeIndex) -> Option<Member> {
        let expression = statement_expression(tree, stmt)?;
        if let Some((left, right)) = simple_assignment(tree, expression) {
            return self.match_assignment(tree, stmt, left, right);
        }
        self.match_define_property(tree, stmt, expression)
    }

    fn match_assignment(
        &self,
        tree: &SyntaxTree,
        stmt: NodeIndex,
        left: NodeIndex,
        right: NodeIndex,
    ) -> Option<Member> {
        if self.is_prototype(tree, left) {
            return match tree.data(right) {
                NodeData::Object { .. } => self
                    .prototype_object_is_convertible(tree, right)
                    .then_some(Member::PrototypeObject { stmt, object: right }),
                _ => {
                    let super_class = object_create_parent(tree, right)?;
                    Some(Member::Inherit { stmt, super_class })
                }
            };
        }

        let NodeData::Member { object, property, .. } = *tree.data(left) else {
            return None;
        };
        let (_, name) = tree.as_member(left)?;
        if self.is_prototype(tree, object) {
            if name == "constructor" {
                return tree
                    .is_identifier(right, &self.name)
                    .then_some(Member::DropConstructor { stmt });
            }
            let function = method_function(tree, right)?;
            return Some(Member::Method {
                stmt,
                key: property,
                function,
                is_static: false,
            });
        }
        if tree.is_identifier(object, &self.name) && !matches!(name, "name" | "length" | "prototype") {
            let function = method_function(tree, right)?;
            return Some(Member::Method {
                stmt,
                key: property,
                function,
                is_static: true,
            });
        }
        None
    }

    /// Every property is a method, an accessor, or `constructor: Foo`.
    fn prototype_object_is_convertible(&self, tree: &SyntaxTree, object: NodeIndex) -> bool {
        let NodeData::Object { properties } = tree.data(object) else {
            return false;
        };
        properties.iter().all(|property| match tree.data(*property) {
            NodeData::Property {
                key,
                value,
                computed,
                shorthand: false,
            } => {
                let is_constructor = !computed && tree.property_key_name(*key) == Some("constructor");
                if is_constructor {
                    tree.is_identifier(*value, &self.name)
                } else {
                    method_function(tree, *value).is_some()
                }
            }
            NodeData::Method(method) => {
                method.computed || tree.property_key_name(method.key) != Some("constructor")
            }
            _ => false,
        })
    }

    fn match_define_property(
        &self,
        tree: &SyntaxTree,
        stmt: NodeIndex,
        expression: NodeIndex,
    ) -> Option<Member> {
        let NodeData::Call {
            callee,
            arguments,
            optional: false,
        } = tree.data(expression)
        else {
            return None;
        };
        let (object, property) = tree.as_member(*callee)?;
        if !tree.is_identifier(object, "Object") || property != "defineProperty" {
            return None;
        }
        let [target, key, descriptor] = arguments.as_slice() else {
            return None;
        };
        if !self.is_prototype(tree, *target) || tree.string_value(*key).is_none() {
            return None;
        }
        let NodeData::Object { properties } = tree.data(*descriptor) else {
            return None;
        };

        let mut getter = None;
        let mut setter = None;
        for property in properties {
            let NodeData::Property {
                key: entry,
                value,
                computed: false,
                shorthand: false,
            } = tree.data(*property)
            else {
                return None;
            };
            match tree.property_key_name(*entry)? {
                "get" => getter = Some(method_function(tree, *value)?),
                "set" => setter = Some(method_function(tree, *value)?),
                // Class accessors are configurable and not enumerable.
                "configurable" if is_boolean(tree, *value, true) => {}
                "enumerable" if is_boolean(tree, *value, false) => {}
                _ => return None,
            }
        }
        if getter.is_none() && setter.is_none() {
            return None;
        }
        Some(Member::Accessors {
            stmt,
            key: *key,
            getter,
            setter,
        })
    }
}

/// An anonymous (or not self-referencing) plain function expression.
fn method_function(tree: &SyntaxTree, value: NodeIndex) -> Option<NodeIndex> {
    let NodeData::Function(function) = tree.data(value) else {
        return None;
    };
    if let Some(id) = function.id
        && refers_to_own_name(tree, value, id)
    {
        return None;
    }
    Some(value)
}

/// `Object.create(Bar.prototype)` → `Bar`.
fn object_create_parent(tree: &SyntaxTree, value: NodeIndex) -> Option<NodeIndex> {
    let NodeData::Call {
        callee,
        arguments,
        optional: false,
    } = tree.data(value)
    else {
        return None;
    };
    let (object, property) = tree.as_member(*callee)?;
    if !tree.is_identifier(object, "Object") || property != "create" {
        return None;
    }
    let [argument] = arguments.as_slice() else {
        return None;
    };
    let (parent, property) = tree.as_member(*argument)?;
    (property == "prototype" && tree.identifier_name(parent).is_some()).then_some(parent)
}

fn is_boolean(tree: &SyntaxTree, idx: NodeIndex, expected: bool) -> bool {
    match tree.data(idx) {
        NodeData::Literal(literal) => {
            literal.kind == LiteralKind::Boolean && literal.raw == if expected { "true" } else { "false" }
        }
        _ => false,
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

// =============================================================================
// Rewriting
// =============================================================================

fn apply_plan(tree: &mut SyntaxTree, list: NodeIndex, candidate: &Candidate, plan: Vec<Member>) -> bool {
    let NodeData::Function(constructor) = tree.data(candidate.function).clone() else {
        return false;
    };
    let super_class = plan.iter().find_map(|member| match member {
        Member::Inherit { super_class, .. } => Some(*super_class),
        _ => None,
    });

    if let Some(super_class) = super_class {
        let Some(parent_name) = tree.identifier_name(super_class).map(str::to_string) else {
            return false;
        };
        if !rewrite_super_constructor_call(tree, constructor.body, &parent_name) {
            return false;
        }
    }

    let mut members = Vec::new();
    let constructor_is_empty = tree.live_statements(constructor.body).is_empty()
        && !has_comments_inside(tree, tree.span(constructor.body));
    if super_class.is_some() || !constructor_is_empty || !constructor.params.is_empty() {
        let key = tree.alloc_identifier("constructor", Span::at(tree.span(candidate.function).start));
        members.push(tree.alloc(
            NodeData::Method(Method {
                kind: MethodKind::Constructor,
                is_static: false,
                is_async: false,
                is_generator: false,
                computed: false,
                key,
                params: constructor.params.clone(),
                body: constructor.body,
                leading_comments: None,
            }),
            tree.span(candidate.function),
        ));
    }

    for member in &plan {
        let stmt = member.stmt();
        let comment_start = statement_comment_start(tree, list, stmt);
        let comments = (comment_start < tree.span(stmt).start)
            .then(|| Span::new(comment_start, tree.span(stmt).start));

        let mut added = Vec::new();
        match member {
            Member::Method {
                key,
                function,
                is_static,
                ..
            } => {
                added.push(method_from_function(
                    tree,
                    *key,
                    *function,
                    MethodKind::Method,
                    *is_static,
                    false,
                ));
            }
            Member::Accessors {
                key, getter, setter, ..
            } => {
                for (function, kind) in [(getter, MethodKind::Get), (setter, MethodKind::Set)] {
                    if let Some(function) = function {
                        let key = accessor_key(tree, *key);
                        added.push(method_from_function(tree, key, *function, kind, false, false));
                    }
                }
            }
            Member::PrototypeObject { object, .. } => {
                added.extend(methods_from_object(tree, *object, &candidate.name));
            }
            Member::Inherit { .. } | Member::DropConstructor { .. } => {}
        }

        if let (Some(comments), Some(first)) = (comments, added.first()) {
            set_leading_comments(tree, *first, comments);
        }
        members.extend(added);
        tree.remove_from(stmt, comment_start);
    }

    if let Some(parent_name) = super_class
        .and_then(|super_class| tree.identifier_name(super_class))
        .map(str::to_string)
    {
        for member in &members {
            if let NodeData::Method(method) = tree.data(*member) {
                let body = method.body;
                rewrite_super_method_calls(tree, body, &parent_name);
            }
        }
    }

    tree.replace(
        candidate.stmt,
        NodeData::Class(Class {
            is_expression: false,
            id: Some(candidate.id),
            super_class,
            members,
        }),
    );
    true
}

fn method_from_function(
    tree: &mut SyntaxTree,
    key: NodeIndex,
    function: NodeIndex,
    kind: MethodKind,
    is_static: bool,
    computed: bool,
) -> NodeIndex {
    let span = tree.span(function);
    let method = match tree.data(function) {
        NodeData::Function(f) => Method {
            kind,
            is_static,
            is_async: f.is_async,
            is_generator: f.is_generator,
            computed,
            key,
            params: f.params.clone(),
            body: f.body,
            leading_comments: None,
        },
        _ => return function,
    };
    tree.alloc(NodeData::Method(method), span)
}

/// `'name'` → `name` when it is a valid identifier.
fn accessor_key(tree: &mut SyntaxTree, key: NodeIndex) -> NodeIndex {
    let span = tree.span(key);
    match tree.string_value(key).map(str::to_string) {
        Some(name) if is_identifier_name(&name) => tree.alloc_identifier(&name, span),
        _ => key,
    }
}

fn methods_from_object(tree: &mut SyntaxTree, object: NodeIndex, class_name: &str) -> Vec<NodeIndex> {
    let NodeData::Object { properties } = tree.data(object).clone() else {
        return Vec::new();
    };
    let mut methods = Vec::new();
    let mut floor = tree.span(object).start + 1;
    for property in properties {
        let start = tree.span(property).start;
        let comment_start = leading_comment_start(tree.source(), tree.comments(), floor, start);
        floor = tree.span(property).end;

        let method = match tree.data(property).clone() {
            // `constructor: Foo`
            NodeData::Property { value, .. } if tree.is_identifier(value, class_name) => continue,
            NodeData::Property {
                key,
                value,
                computed,
                ..
            } => method_from_function(tree, key, value, MethodKind::Method, false, computed),
            NodeData::Method(_) => property,
            _ => continue,
        };
        if comment_start < start {
            set_leading_comments(tree, method, Span::new(comment_start, start));
        }
        methods.push(method);
    }
    methods
}

fn set_leading_comments(tree: &mut SyntaxTree, method: NodeIndex, comments: Span) {
    if let NodeData::Method(m) = tree.data(method).clone() {
        tree.replace(
            method,
            NodeData::Method(Method {
                leading_comments: Some(comments),
                ..m
            }),
        );
    }
}

fn has_comments_inside(tree: &SyntaxTree, span: Span) -> bool {
    tree.comments().iter().any(|comment| span.contains(comment.span()))
}

/// `Bar.call(this, ...)` / `Bar.apply(this, args)` at the top of the
/// constructor → `super(...)`. Nothing before it may touch `this`.
fn rewrite_super_constructor_call(tree: &mut SyntaxTree, body: NodeIndex, parent: &str) -> bool {
    for stmt in tree.live_statements(body) {
        if let Some(expression) = statement_expression(tree, stmt)
            && let Some((method, arguments)) = this_call(tree, expression, |tree, callee| {
                tree.is_identifier(callee, parent)
            })
        {
            let callee_span = match tree.data(expression) {
                NodeData::Call { callee, .. } => tree.span(*callee),
                _ => tree.span(expression),
            };
            let super_node = tree.alloc(NodeData::Super, callee_span);
            let arguments = forwarded_arguments(tree, &method, &arguments);
            tree.replace(
                expression,
                NodeData::Call {
                    callee: super_node,
                    arguments,
                    optional: false,
                },
            );
            return true;
        }
        if contains_this_reference(tree, stmt) {
            return false;
        }
    }
    false
}

/// `Bar.prototype.m.call(this, ...)` → `super.m(...)`, not looking inside
/// nested functions (arrows share `this` and are searched).
fn rewrite_super_method_calls(tree: &mut SyntaxTree, body: NodeIndex, parent: &str) {
    let mut sites = Vec::new();
    let mut stack = vec![body];
    while let Some(idx) = stack.pop() {
        if matches!(tree.data(idx), NodeData::Function(_) | NodeData::Class(_)) {
            continue;
        }
        if let Some(site) = this_call(tree, idx, |tree, callee| {
            tree.as_member(callee).is_some_and(|(proto, _)| {
                tree.as_member(proto)
                    .is_some_and(|(owner, name)| name == "prototype" && tree.is_identifier(owner, parent))
            })
        }) {
            sites.push((idx, site));
        }
        stack.extend(tree.children(idx));
    }

    for (call, (method, arguments)) in sites {
        let NodeData::Call { callee, .. } = *tree.data(call) else {
            continue;
        };
        let Some((target, _)) = tree.as_member(callee) else {
            continue;
        };
        let NodeData::Member { object, property, .. } = *tree.data(target) else {
            continue;
        };
        let super_node = tree.alloc(NodeData::Super, tree.span(object));
        let member = tree.alloc(
            NodeData::Member {
                object: super_node,
                property,
                computed: false,
                optional: false,
            },
            tree.span(target),
        );
        let arguments = forwarded_arguments(tree, &method, &arguments);
        tree.replace(
            call,
            NodeData::Call {
                callee: member,
                arguments,
                optional: false,
            },
        );
    }
}

/// `target.call(this, ...)` or `target.apply(this[, args])` where `target`
/// satisfies `is_target`. Returns `call`/`apply` and the arguments after
/// `this`.
fn this_call(
    tree: &SyntaxTree,
    idx: NodeIndex,
    is_target: impl Fn(&SyntaxTree, NodeIndex) -> bool,
) -> Option<(String, Vec<NodeIndex>)> {
    let NodeData::Call {
        callee,
        arguments,
        optional: false,
    } = tree.data(idx)
    else {
        return None;
    };
    let (target, method) = tree.as_member(*callee)?;
    if !matches!(method, "call" | "apply") || !is_target(tree, target) {
        return None;
    }
    let (first, rest) = arguments.split_first()?;
    if !matches!(tree.data(*first), NodeData::This) {
        return None;
    }
    if method == "apply" && rest.len() > 1 {
        return None;
    }
    Some((method.to_string(), rest.to_vec()))
}

fn forwarded_arguments(tree: &mut SyntaxTree, method: &str, arguments: &[NodeIndex]) -> Vec<NodeIndex> {
    if method != "apply" {
        return arguments.to_vec();
    }
    arguments
        .iter()
        .map(|argument| {
            let span = tree.span(*argument);
            tree.alloc(NodeData::Spread { argument: *argument }, span)
        })
        .collect()
}

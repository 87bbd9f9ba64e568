//! Parser state - statement and declaration parsing methods

use esup_scanner::SyntaxKind;

use super::{CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParseResult, ParserState};
use crate::node::{Class, DeclarationKind, Function, Method, MethodKind, NodeData, NodeIndex};

impl ParserState {
    // =========================================================================
    // Statements
    // =========================================================================

    pub fn parse_statement(&mut self) -> ParseResult<NodeIndex> {
        self.enter()?;
        let result = self.parse_statement_worker();
        self.leave();
        result
    }

    fn parse_statement_worker(&mut self) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                let start = self.token_start();
                self.next_token();
                Ok(self.finish_node(NodeData::Empty, start))
            }
            SyntaxKind::VarKeyword => self.parse_variable_statement(DeclarationKind::Var),
            SyntaxKind::ConstKeyword => self.parse_variable_statement(DeclarationKind::Const),
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(self.token_start(), false),
            SyntaxKind::ClassKeyword => self.parse_class(false),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => {
                self.parse_break_or_continue_statement()
            }
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::WithKeyword => self.parse_with_statement(),
            SyntaxKind::DebuggerKeyword => {
                let start = self.token_start();
                self.next_token();
                self.parse_semicolon()?;
                Ok(self.finish_node(NodeData::Debugger, start))
            }
            SyntaxKind::ImportKeyword if !self.look_ahead_is_import_call() => {
                self.parse_import_declaration()
            }
            SyntaxKind::ExportKeyword => self.parse_export_declaration(),
            SyntaxKind::Identifier => {
                if self.is_contextual("let") && self.look_ahead_is_let_declaration() {
                    return self.parse_variable_statement(DeclarationKind::Let);
                }
                if self.is_contextual("async")
                    && self.look_ahead_next_is_on_same_line(SyntaxKind::FunctionKeyword)
                {
                    let start = self.token_start();
                    self.next_token();
                    return self.parse_function_declaration(start, true);
                }
                if self.look_ahead_is_labeled_statement() {
                    return self.parse_labeled_statement();
                }
                self.parse_expression_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Look ahead to see if we have "import (" or "import ." (dynamic import, import.meta)
    fn look_ahead_is_import_call(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            matches!(p.token(), SyntaxKind::OpenParenToken | SyntaxKind::DotToken)
        })
    }

    /// `let` followed by a binding starts a declaration; otherwise it is an
    /// identifier.
    fn look_ahead_is_let_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            matches!(
                p.token(),
                SyntaxKind::Identifier | SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken
            ) && !p.is_contextual("in")
        })
    }

    pub(crate) fn parse_block(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut body = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return Err(self.error("'}' expected."));
            }
            body.push(self.parse_statement()?);
        }
        self.next_token();
        Ok(self.finish_node(NodeData::Block { body }, start))
    }

    /// Block body of a function, with `in` allowed again.
    pub(crate) fn parse_function_body(&mut self, flags: u8) -> ParseResult<NodeIndex> {
        self.with_context(flags, |p| p.parse_block())
    }

    fn parse_expression_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let expression = self.parse_expression()?;
        self.parse_semicolon()?;
        Ok(self.finish_node(NodeData::ExpressionStatement { expression }, start))
    }

    fn parse_labeled_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let label = self.parse_identifier()?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let body = self.parse_statement()?;
        Ok(self.finish_node(NodeData::Labeled { label, body }, start))
    }

    // =========================================================================
    // Variable declarations
    // =========================================================================

    fn parse_variable_statement(&mut self, kind: DeclarationKind) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let (keyword, declarators) = self.parse_variable_declaration_list(kind, true)?;
        self.parse_semicolon()?;
        Ok(self.finish_node(
            NodeData::VariableDeclaration {
                keyword,
                declarators,
            },
            start,
        ))
    }

    /// The keyword and the comma-separated declarators. `require_const_init`
    /// is false in `for` heads, where `for (const x of xs)` has no initializer.
    pub(crate) fn parse_variable_declaration_list(
        &mut self,
        kind: DeclarationKind,
        require_const_init: bool,
    ) -> ParseResult<(NodeIndex, Vec<NodeIndex>)> {
        let keyword_start = self.token_start();
        self.next_token();
        let keyword = self.finish_node(NodeData::DeclarationKeyword(kind), keyword_start);

        let mut declarators = Vec::new();
        loop {
            let start = self.token_start();
            let id = self.parse_binding_target()?;
            let init = if self.parse_optional(SyntaxKind::EqualsToken) {
                Some(self.parse_assignment_expression()?)
            } else {
                if require_const_init && kind == DeclarationKind::Const {
                    return Err(self.error("'=' expected."));
                }
                None
            };
            declarators.push(self.finish_node(NodeData::VariableDeclarator { id, init }, start));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        Ok((keyword, declarators))
    }

    // =========================================================================
    // Binding patterns and parameters
    // =========================================================================

    /// A binding identifier or an object/array destructuring pattern.
    pub(crate) fn parse_binding_target(&mut self) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => self.parse_binding_identifier(),
        }
    }

    pub(crate) fn parse_binding_identifier(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::Identifier) {
            return Err(self.error("Identifier expected."));
        }
        self.parse_identifier()
    }

    /// `target` or `target = default`.
    fn parse_binding_element(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let left = self.parse_binding_target()?;
        if self.parse_optional(SyntaxKind::EqualsToken) {
            let right = self.allow_in(|p| p.parse_assignment_expression())?;
            return Ok(self.finish_node(NodeData::AssignmentPattern { left, right }, start));
        }
        Ok(left)
    }

    fn parse_rest_element(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.parse_expected(SyntaxKind::DotDotDotToken)?;
        let argument = self.parse_binding_target()?;
        Ok(self.finish_node(NodeData::Spread { argument }, start))
    }

    fn parse_object_binding_pattern(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut properties = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.is_token(SyntaxKind::DotDotDotToken) {
                properties.push(self.parse_rest_element()?);
            } else {
                properties.push(self.parse_binding_property()?);
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish_node(NodeData::Object { properties }, start))
    }

    fn parse_binding_property(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let is_plain_name = self.is_token(SyntaxKind::Identifier);
        let (key, computed) = self.parse_property_name()?;
        if self.parse_optional(SyntaxKind::ColonToken) {
            let value = self.parse_binding_element()?;
            return Ok(self.finish_node(
                NodeData::Property {
                    key,
                    value,
                    computed,
                    shorthand: false,
                },
                start,
            ));
        }
        if !is_plain_name || computed {
            return Err(self.error("':' expected."));
        }
        let value = if self.parse_optional(SyntaxKind::EqualsToken) {
            let right = self.allow_in(|p| p.parse_assignment_expression())?;
            self.finish_node(NodeData::AssignmentPattern { left: key, right }, start)
        } else {
            key
        };
        Ok(self.finish_node(
            NodeData::Property {
                key,
                value,
                computed: false,
                shorthand: true,
            },
            start,
        ))
    }

    fn parse_array_binding_pattern(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) {
            if self.is_token(SyntaxKind::CommaToken) {
                self.next_token();
                elements.push(None);
                continue;
            }
            let element = if self.is_token(SyntaxKind::DotDotDotToken) {
                self.parse_rest_element()?
            } else {
                self.parse_binding_element()?
            };
            elements.push(Some(element));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        Ok(self.finish_node(NodeData::Array { elements }, start))
    }

    /// `( params )`. Parameter defaults are parsed in the function's own
    /// context, `flags`.
    pub(crate) fn parse_parameter_list(&mut self, flags: u8) -> ParseResult<Vec<NodeIndex>> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let params = self.with_context(flags, |p| {
            let mut params = Vec::new();
            while !p.is_token(SyntaxKind::CloseParenToken) {
                if p.is_token(SyntaxKind::DotDotDotToken) {
                    params.push(p.parse_rest_element()?);
                    break;
                }
                params.push(p.parse_binding_element()?);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            Ok(params)
        })?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(params)
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    /// `function` is the current token; `start` is where the declaration
    /// begins (before `async` when present).
    fn parse_function_declaration(&mut self, start: u32, is_async: bool) -> ParseResult<NodeIndex> {
        self.parse_function(start, is_async, false)
    }

    /// Shared by function declarations and expressions. The current token is
    /// `function`.
    pub(crate) fn parse_function(
        &mut self,
        start: u32,
        is_async: bool,
        is_expression: bool,
    ) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let id = if self.is_token(SyntaxKind::Identifier) {
            Some(self.parse_identifier()?)
        } else if !is_expression && !self.is_token(SyntaxKind::OpenParenToken) {
            return Err(self.error("Identifier expected."));
        } else {
            None
        };
        let flags = function_flags(is_async, is_generator);
        let params = self.parse_parameter_list(flags)?;
        let body = self.parse_function_body(flags)?;
        Ok(self.finish_node(
            NodeData::Function(Function {
                is_expression,
                is_async,
                is_generator,
                id,
                params,
                body,
            }),
            start,
        ))
    }

    pub(crate) fn parse_class(&mut self, is_expression: bool) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.parse_expected(SyntaxKind::ClassKeyword)?;
        let id = if self.is_token(SyntaxKind::Identifier) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let super_class = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            Some(self.parse_left_hand_side_expression()?)
        } else {
            None
        };
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return Err(self.error("'}' expected."));
            }
            members.push(self.parse_class_member()?);
        }
        self.next_token();
        Ok(self.finish_node(
            NodeData::Class(Class {
                is_expression,
                id,
                super_class,
                members,
            }),
            start,
        ))
    }

    fn parse_class_member(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let is_static = self.is_contextual("static") && self.look_ahead_is_member_modifier(true);
        if is_static {
            self.next_token();
        }
        self.parse_method(start, is_static, true)
    }

    /// A modifier word (`static`, `async`, `get`, `set`) is only a modifier
    /// when a property name follows it; otherwise it is the name itself.
    pub(crate) fn look_ahead_is_member_modifier(&mut self, allow_line_break: bool) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if !allow_line_break && p.has_preceding_line_break() {
                return false;
            }
            !matches!(
                p.token(),
                SyntaxKind::OpenParenToken
                    | SyntaxKind::EqualsToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::ColonToken
                    | SyntaxKind::EndOfFileToken
            )
        })
    }

    /// A method in a class body or object literal: modifiers, name,
    /// parameters, and body.
    pub(crate) fn parse_method(
        &mut self,
        start: u32,
        is_static: bool,
        in_class: bool,
    ) -> ParseResult<NodeIndex> {
        let mut is_async = false;
        let mut kind = MethodKind::Method;
        if self.is_contextual("async") && self.look_ahead_is_member_modifier(false) {
            self.next_token();
            is_async = true;
        }
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        if !is_async
            && !is_generator
            && (self.is_contextual("get") || self.is_contextual("set"))
            && self.look_ahead_is_member_modifier(true)
        {
            kind = if self.is_contextual("get") {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.next_token();
        }
        let (key, computed) = self.parse_property_name()?;
        if in_class
            && !is_static
            && !computed
            && kind == MethodKind::Method
            && self.property_key_is(key, "constructor")
        {
            kind = MethodKind::Constructor;
        }
        let flags = function_flags(is_async, is_generator);
        let params = self.parse_parameter_list(flags)?;
        let body = self.parse_function_body(flags)?;
        Ok(self.finish_node(
            NodeData::Method(Method {
                kind,
                is_static,
                is_async,
                is_generator,
                computed,
                key,
                params,
                body,
                leading_comments: None,
            }),
            start,
        ))
    }

    fn property_key_is(&self, key: NodeIndex, name: &str) -> bool {
        match self.node_data(key) {
            NodeData::Identifier { name: n } => n == name,
            NodeData::Literal(literal) => literal.value == name,
            _ => false,
        }
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_parenthesized_condition(&mut self) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let test = self.allow_in(|p| p.parse_expression())?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(test)
    }

    fn parse_if_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        let test = self.parse_parenthesized_condition()?;
        let consequent = self.parse_statement()?;
        let alternate = if self.parse_optional(SyntaxKind::ElseKeyword) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.finish_node(
            NodeData::If {
                test,
                consequent,
                alternate,
            },
            start,
        ))
    }

    fn parse_for_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken)?;

        let init_start = self.token_start();
        let declaration_kind = match self.token() {
            SyntaxKind::VarKeyword => Some(DeclarationKind::Var),
            SyntaxKind::ConstKeyword => Some(DeclarationKind::Const),
            SyntaxKind::Identifier
                if self.is_contextual("let") && self.look_ahead_is_let_declaration() =>
            {
                Some(DeclarationKind::Let)
            }
            _ => None,
        };

        let flags = self.context_flags | CONTEXT_FLAG_DISALLOW_IN;
        let init = if let Some(kind) = declaration_kind {
            let (keyword, declarators) =
                self.with_context(flags, |p| p.parse_variable_declaration_list(kind, false))?;
            Some(self.finish_node(
                NodeData::VariableDeclaration {
                    keyword,
                    declarators,
                },
                init_start,
            ))
        } else if self.is_token(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(self.with_context(flags, |p| p.parse_expression())?)
        };

        if let Some(left) = init {
            let is_of = self.is_contextual("of");
            if is_of || self.is_token(SyntaxKind::InKeyword) {
                self.next_token();
                let right = if is_of {
                    self.allow_in(|p| p.parse_assignment_expression())?
                } else {
                    self.allow_in(|p| p.parse_expression())?
                };
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                let body = self.parse_statement()?;
                return Ok(self.finish_node(
                    NodeData::ForIn {
                        is_of,
                        left,
                        right,
                        body,
                    },
                    start,
                ));
            }
        }

        self.parse_expected(SyntaxKind::SemicolonToken)?;
        let test = if self.is_token(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(self.allow_in(|p| p.parse_expression())?)
        };
        self.parse_expected(SyntaxKind::SemicolonToken)?;
        let update = if self.is_token(SyntaxKind::CloseParenToken) {
            None
        } else {
            Some(self.allow_in(|p| p.parse_expression())?)
        };
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        let body = self.parse_statement()?;
        Ok(self.finish_node(
            NodeData::For {
                init,
                test,
                update,
                body,
            },
            start,
        ))
    }

    fn parse_while_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        let test = self.parse_parenthesized_condition()?;
        let body = self.parse_statement()?;
        Ok(self.finish_node(NodeData::While { test, body }, start))
    }

    fn parse_do_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        let body = self.parse_statement()?;
        self.parse_expected(SyntaxKind::WhileKeyword)?;
        let test = self.parse_parenthesized_condition()?;
        // The semicolon after `do ... while (x)` is always optional.
        self.parse_optional(SyntaxKind::SemicolonToken);
        Ok(self.finish_node(NodeData::DoWhile { body, test }, start))
    }

    fn parse_return_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        let argument = if self.can_parse_semicolon() {
            None
        } else {
            Some(self.allow_in(|p| p.parse_expression())?)
        };
        self.parse_semicolon()?;
        Ok(self.finish_node(NodeData::Return { argument }, start))
    }

    fn parse_throw_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        if self.has_preceding_line_break() {
            return Err(self.error("Line break not permitted here."));
        }
        let argument = self.allow_in(|p| p.parse_expression())?;
        self.parse_semicolon()?;
        Ok(self.finish_node(NodeData::Throw { argument }, start))
    }

    fn parse_break_or_continue_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let is_break = self.is_token(SyntaxKind::BreakKeyword);
        self.next_token();
        let label = if self.is_token(SyntaxKind::Identifier) && !self.has_preceding_line_break() {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        self.parse_semicolon()?;
        let data = if is_break {
            NodeData::Break { label }
        } else {
            NodeData::Continue { label }
        };
        Ok(self.finish_node(data, start))
    }

    fn parse_try_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        let block = self.parse_block()?;
        let handler = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_start = self.token_start();
            self.next_token();
            let param = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let param = self.parse_binding_target()?;
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(self.finish_node(NodeData::CatchClause { param, body }, catch_start))
        } else {
            None
        };
        let finalizer = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.error("'catch' or 'finally' expected."));
        }
        Ok(self.finish_node(
            NodeData::Try {
                block,
                handler,
                finalizer,
            },
            start,
        ))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        let discriminant = self.parse_parenthesized_condition()?;
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut cases = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let case_start = self.token_start();
            let test = if self.parse_optional(SyntaxKind::CaseKeyword) {
                Some(self.allow_in(|p| p.parse_expression())?)
            } else if self.parse_optional(SyntaxKind::DefaultKeyword) {
                None
            } else {
                return Err(self.error("'case' or 'default' expected."));
            };
            self.parse_expected(SyntaxKind::ColonToken)?;
            let mut consequent = Vec::new();
            while !matches!(
                self.token(),
                SyntaxKind::CaseKeyword
                    | SyntaxKind::DefaultKeyword
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::EndOfFileToken
            ) {
                consequent.push(self.parse_statement()?);
            }
            cases.push(self.finish_node(NodeData::SwitchCase { test, consequent }, case_start));
        }
        self.next_token();
        Ok(self.finish_node(
            NodeData::Switch {
                discriminant,
                cases,
            },
            start,
        ))
    }

    fn parse_with_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        let object = self.parse_parenthesized_condition()?;
        let body = self.parse_statement()?;
        Ok(self.finish_node(NodeData::With { object, body }, start))
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn parse_module_specifier(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::StringLiteral) {
            return Err(self.error("String literal expected."));
        }
        self.parse_literal()
    }

    /// An export/import name: any identifier or keyword (`default`).
    fn parse_module_export_name(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::StringLiteral) {
            return self.parse_literal();
        }
        if !self.token().is_identifier_or_keyword() {
            return Err(self.error("Identifier expected."));
        }
        self.parse_identifier_name()
    }

    fn parse_import_declaration(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        let mut specifiers = Vec::new();

        if !self.is_token(SyntaxKind::StringLiteral) {
            if self.is_token(SyntaxKind::Identifier) {
                let local_start = self.token_start();
                let local = self.parse_binding_identifier()?;
                specifiers.push(self.finish_node(NodeData::ImportDefault { local }, local_start));
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    return self.finish_import(start, specifiers);
                }
            }
            if self.is_token(SyntaxKind::AsteriskToken) {
                let ns_start = self.token_start();
                self.next_token();
                if !self.is_contextual("as") {
                    return Err(self.error("'as' expected."));
                }
                self.next_token();
                let local = self.parse_binding_identifier()?;
                specifiers.push(self.finish_node(NodeData::ImportNamespace { local }, ns_start));
            } else if self.parse_optional(SyntaxKind::OpenBraceToken) {
                while !self.is_token(SyntaxKind::CloseBraceToken) {
                    let spec_start = self.token_start();
                    let imported = self.parse_module_export_name()?;
                    let local = if self.is_contextual("as") {
                        self.next_token();
                        Some(self.parse_binding_identifier()?)
                    } else {
                        None
                    };
                    specifiers.push(
                        self.finish_node(NodeData::ImportSpecifier { imported, local }, spec_start),
                    );
                    if !self.parse_optional(SyntaxKind::CommaToken) {
                        break;
                    }
                }
                self.parse_expected(SyntaxKind::CloseBraceToken)?;
            } else {
                return Err(self.unexpected_token());
            }
        }
        self.finish_import(start, specifiers)
    }

    fn finish_import(&mut self, start: u32, specifiers: Vec<NodeIndex>) -> ParseResult<NodeIndex> {
        if !specifiers.is_empty() {
            if !self.is_contextual("from") {
                return Err(self.error("'from' expected."));
            }
            self.next_token();
        }
        let source = self.parse_module_specifier()?;
        self.parse_semicolon()?;
        Ok(self.finish_node(NodeData::Import { specifiers, source }, start))
    }

    fn parse_export_declaration(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();

        if self.parse_optional(SyntaxKind::DefaultKeyword) {
            let declaration = match self.token() {
                SyntaxKind::FunctionKeyword => self.parse_function(self.token_start(), false, false),
                SyntaxKind::ClassKeyword => self.parse_class(false),
                SyntaxKind::Identifier
                    if self.is_contextual("async")
                        && self.look_ahead_next_is_on_same_line(SyntaxKind::FunctionKeyword) =>
                {
                    let async_start = self.token_start();
                    self.next_token();
                    self.parse_function(async_start, true, false)
                }
                _ => {
                    let expression = self.allow_in(|p| p.parse_assignment_expression())?;
                    self.parse_semicolon()?;
                    Ok(expression)
                }
            }?;
            return Ok(self.finish_node(NodeData::ExportDefault { declaration }, start));
        }

        if self.parse_optional(SyntaxKind::AsteriskToken) {
            let exported = if self.is_contextual("as") {
                self.next_token();
                Some(self.parse_module_export_name()?)
            } else {
                None
            };
            if !self.is_contextual("from") {
                return Err(self.error("'from' expected."));
            }
            self.next_token();
            let source = self.parse_module_specifier()?;
            self.parse_semicolon()?;
            return Ok(self.finish_node(NodeData::ExportAll { exported, source }, start));
        }

        if self.parse_optional(SyntaxKind::OpenBraceToken) {
            let mut specifiers = Vec::new();
            while !self.is_token(SyntaxKind::CloseBraceToken) {
                let spec_start = self.token_start();
                let local = self.parse_module_export_name()?;
                let exported = if self.is_contextual("as") {
                    self.next_token();
                    Some(self.parse_module_export_name()?)
                } else {
                    None
                };
                specifiers
                    .push(self.finish_node(NodeData::ExportSpecifier { local, exported }, spec_start));
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken)?;
            let source = if self.is_contextual("from") {
                self.next_token();
                Some(self.parse_module_specifier()?)
            } else {
                None
            };
            self.parse_semicolon()?;
            return Ok(self.finish_node(
                NodeData::ExportNamed {
                    declaration: None,
                    specifiers,
                    source,
                },
                start,
            ));
        }

        let declaration = match self.token() {
            SyntaxKind::VarKeyword => self.parse_variable_statement(DeclarationKind::Var)?,
            SyntaxKind::ConstKeyword => self.parse_variable_statement(DeclarationKind::Const)?,
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(self.token_start(), false)?,
            SyntaxKind::ClassKeyword => self.parse_class(false)?,
            SyntaxKind::Identifier if self.is_contextual("let") => {
                self.parse_variable_statement(DeclarationKind::Let)?
            }
            SyntaxKind::Identifier
                if self.is_contextual("async")
                    && self.look_ahead_next_is_on_same_line(SyntaxKind::FunctionKeyword) =>
            {
                let async_start = self.token_start();
                self.next_token();
                self.parse_function_declaration(async_start, true)?
            }
            _ => return Err(self.error("Declaration or statement expected.")),
        };
        Ok(self.finish_node(
            NodeData::ExportNamed {
                declaration: Some(declaration),
                specifiers: Vec::new(),
                source: None,
            },
            start,
        ))
    }
}

pub(crate) fn function_flags(is_async: bool, is_generator: bool) -> u8 {
    let mut flags = 0;
    if is_async {
        flags |= CONTEXT_FLAG_ASYNC;
    }
    if is_generator {
        flags |= CONTEXT_FLAG_GENERATOR;
    }
    flags
}

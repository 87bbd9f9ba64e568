//! Parser state - expression parsing methods

use esup_scanner::SyntaxKind;

use super::statements::function_flags;
use super::{CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParseResult, ParserState};
use crate::node::{Literal, LiteralKind, NodeData, NodeIndex};

impl ParserState {
    // =========================================================================
    // Comma, assignment, and arrow functions
    // =========================================================================

    pub(crate) fn parse_expression(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let first = self.parse_assignment_expression()?;
        if !self.is_token(SyntaxKind::CommaToken) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.parse_optional(SyntaxKind::CommaToken) {
            expressions.push(self.parse_assignment_expression()?);
        }
        Ok(self.finish_node(NodeData::Sequence { expressions }, start))
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> ParseResult<NodeIndex> {
        self.enter()?;
        let result = self.parse_assignment_expression_worker();
        self.leave();
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> ParseResult<NodeIndex> {
        if self.in_context(CONTEXT_FLAG_GENERATOR) && self.is_contextual("yield") {
            return self.parse_yield_expression();
        }
        if let Some(arrow) = self.parse_arrow_function_if_present()? {
            return Ok(arrow);
        }

        let start = self.token_start();
        let left = self.parse_conditional_expression()?;
        let operator = self.token();
        if !operator.is_assignment_operator() {
            return Ok(left);
        }
        if !self.is_valid_assignment_target(left) {
            return Err(self.error("Invalid left-hand side in assignment."));
        }
        self.next_token();
        let right = self.parse_assignment_expression()?;
        Ok(self.finish_node(
            NodeData::Assignment {
                operator,
                left,
                right,
            },
            start,
        ))
    }

    fn is_valid_assignment_target(&self, idx: NodeIndex) -> bool {
        match self.node_data(idx) {
            NodeData::Identifier { .. } | NodeData::Member { .. } => true,
            NodeData::Object { .. } | NodeData::Array { .. } => true,
            NodeData::Paren { expression } => self.is_valid_assignment_target(*expression),
            _ => false,
        }
    }

    fn parse_yield_expression(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.next_token();
        let mut delegate = false;
        let mut argument = None;
        if !self.has_preceding_line_break() {
            delegate = self.parse_optional(SyntaxKind::AsteriskToken);
            let ends_expression = matches!(
                self.token(),
                SyntaxKind::CloseParenToken
                    | SyntaxKind::CloseBracketToken
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::ColonToken
                    | SyntaxKind::EndOfFileToken
            );
            if delegate || !ends_expression {
                argument = Some(self.parse_assignment_expression()?);
            }
        }
        Ok(self.finish_node(NodeData::Yield { argument, delegate }, start))
    }

    /// Arrow functions: `x => ...`, `(a, b) => ...`, and their `async` forms.
    /// A parenthesized head is parsed speculatively and rewound when no `=>`
    /// follows.
    fn parse_arrow_function_if_present(&mut self) -> ParseResult<Option<NodeIndex>> {
        let start = self.token_start();
        let mut is_async = false;

        if self.is_contextual("async") && self.look_ahead_is_async_arrow() {
            self.next_token();
            is_async = true;
        }

        let flags = function_flags(is_async, false);
        if self.is_token(SyntaxKind::Identifier) && self.look_ahead_is_simple_arrow() {
            let param = self.parse_binding_identifier()?;
            self.parse_expected(SyntaxKind::EqualsGreaterThanToken)?;
            return self.parse_arrow_body(start, is_async, vec![param]).map(Some);
        }
        if self.is_token(SyntaxKind::OpenParenToken) {
            let params = self.try_parse(|p| p.parse_arrow_head(flags).ok());
            if let Some(params) = params {
                return self.parse_arrow_body(start, is_async, params).map(Some);
            }
        }
        if is_async {
            return Err(self.error("'=>' expected."));
        }
        Ok(None)
    }

    /// Look ahead to see if we have "identifier =>"
    fn look_ahead_is_simple_arrow(&mut self) -> bool {
        self.look_ahead_next_is_on_same_line(SyntaxKind::EqualsGreaterThanToken)
    }

    /// Look ahead to see if we have "async identifier =>" or "async (...) =>"
    fn look_ahead_is_async_arrow(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.has_preceding_line_break() {
                return false;
            }
            if p.is_token(SyntaxKind::Identifier) {
                p.next_token();
                return p.is_token(SyntaxKind::EqualsGreaterThanToken)
                    && !p.has_preceding_line_break();
            }
            p.is_token(SyntaxKind::OpenParenToken) && p.parse_arrow_head(CONTEXT_FLAG_ASYNC).is_ok()
        })
    }

    /// `( params ) =>`, failing when the parentheses are not a parameter list.
    fn parse_arrow_head(&mut self, flags: u8) -> ParseResult<Vec<NodeIndex>> {
        let params = self.parse_parameter_list(flags)?;
        if !self.is_token(SyntaxKind::EqualsGreaterThanToken) || self.has_preceding_line_break() {
            return Err(self.error("'=>' expected."));
        }
        self.next_token();
        Ok(params)
    }

    fn parse_arrow_body(
        &mut self,
        start: u32,
        is_async: bool,
        params: Vec<NodeIndex>,
    ) -> ParseResult<NodeIndex> {
        let flags = function_flags(is_async, false);
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_function_body(flags)?
        } else {
            let flags = flags | (self.context_flags & CONTEXT_FLAG_DISALLOW_IN);
            self.with_context(flags, |p| p.parse_assignment_expression())?
        };
        Ok(self.finish_node(
            NodeData::Arrow {
                is_async,
                params,
                body,
            },
            start,
        ))
    }

    // =========================================================================
    // Conditional and binary operators
    // =========================================================================

    fn parse_conditional_expression(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let test = self.parse_binary_expression(0)?;
        if !self.parse_optional(SyntaxKind::QuestionToken) {
            return Ok(test);
        }
        let consequent = self.allow_in(|p| p.parse_assignment_expression())?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let alternate = self.parse_assignment_expression()?;
        Ok(self.finish_node(
            NodeData::Conditional {
                test,
                consequent,
                alternate,
            },
            start,
        ))
    }

    fn binary_precedence(&self, kind: SyntaxKind) -> u8 {
        match kind {
            SyntaxKind::QuestionQuestionToken => 1,
            SyntaxKind::BarBarToken => 2,
            SyntaxKind::AmpersandAmpersandToken => 3,
            SyntaxKind::BarToken => 4,
            SyntaxKind::CaretToken => 5,
            SyntaxKind::AmpersandToken => 6,
            SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken
            | SyntaxKind::EqualsEqualsEqualsToken
            | SyntaxKind::ExclamationEqualsEqualsToken => 7,
            SyntaxKind::InKeyword if self.in_context(CONTEXT_FLAG_DISALLOW_IN) => 0,
            SyntaxKind::LessThanToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanEqualsToken
            | SyntaxKind::InstanceOfKeyword
            | SyntaxKind::InKeyword => 8,
            SyntaxKind::LessThanLessThanToken
            | SyntaxKind::GreaterThanGreaterThanToken
            | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => 9,
            SyntaxKind::PlusToken | SyntaxKind::MinusToken => 10,
            SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 11,
            SyntaxKind::AsteriskAsteriskToken => 12,
            _ => 0,
        }
    }

    /// Operators binding tighter than `min_precedence`. `**` is right
    /// associative; everything else associates to the left.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let mut left = self.parse_unary_expression()?;
        loop {
            let operator = self.token();
            let precedence = self.binary_precedence(operator);
            if precedence == 0 || precedence <= min_precedence {
                break;
            }
            self.next_token();
            let right = if operator == SyntaxKind::AsteriskAsteriskToken {
                self.parse_binary_expression(precedence - 1)?
            } else {
                self.parse_binary_expression(precedence)?
            };
            left = self.finish_node(
                NodeData::Binary {
                    operator,
                    left,
                    right,
                },
                start,
            );
        }
        Ok(left)
    }

    // =========================================================================
    // Unary and update
    // =========================================================================

    fn parse_unary_expression(&mut self) -> ParseResult<NodeIndex> {
        self.enter()?;
        let result = self.parse_unary_expression_worker();
        self.leave();
        result
    }

    fn parse_unary_expression_worker(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let operator = self.token();
        match operator {
            SyntaxKind::DeleteKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken => {
                self.next_token();
                let argument = self.parse_unary_expression()?;
                Ok(self.finish_node(NodeData::Unary { operator, argument }, start))
            }
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                self.next_token();
                let argument = self.parse_unary_expression()?;
                Ok(self.finish_node(
                    NodeData::Update {
                        operator,
                        prefix: true,
                        argument,
                    },
                    start,
                ))
            }
            SyntaxKind::Identifier
                if self.in_context(CONTEXT_FLAG_ASYNC) && self.is_contextual("await") =>
            {
                self.next_token();
                let argument = self.parse_unary_expression()?;
                Ok(self.finish_node(NodeData::Await { argument }, start))
            }
            _ => {
                let argument = self.parse_left_hand_side_expression()?;
                let operator = self.token();
                if matches!(operator, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
                    && !self.has_preceding_line_break()
                {
                    self.next_token();
                    return Ok(self.finish_node(
                        NodeData::Update {
                            operator,
                            prefix: false,
                            argument,
                        },
                        start,
                    ));
                }
                Ok(argument)
            }
        }
    }

    // =========================================================================
    // Calls, members, and `new`
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        self.parse_member_and_call_tail(start, expression, true)
    }

    fn parse_new_expression(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.parse_expected(SyntaxKind::NewKeyword)?;

        if self.is_token(SyntaxKind::DotToken) {
            // new.target
            let object = self.finish_node(
                NodeData::Identifier {
                    name: "new".to_string(),
                },
                start,
            );
            self.next_token();
            let property = self.parse_identifier_name()?;
            return Ok(self.finish_node(
                NodeData::Member {
                    object,
                    property,
                    computed: false,
                    optional: false,
                },
                start,
            ));
        }

        let callee_start = self.token_start();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        let callee = self.parse_member_and_call_tail(callee_start, callee, false)?;
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_arguments()?)
        } else {
            None
        };
        Ok(self.finish_node(NodeData::New { callee, arguments }, start))
    }

    fn parse_member_and_call_tail(
        &mut self,
        start: u32,
        mut expression: NodeIndex,
        allow_call: bool,
    ) -> ParseResult<NodeIndex> {
        loop {
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let property = self.parse_identifier_name()?;
                    expression = self.finish_node(
                        NodeData::Member {
                            object: expression,
                            property,
                            computed: false,
                            optional: false,
                        },
                        start,
                    );
                }
                SyntaxKind::QuestionDotToken => {
                    self.next_token();
                    expression = match self.token() {
                        SyntaxKind::OpenParenToken => {
                            let arguments = self.parse_arguments()?;
                            self.finish_node(
                                NodeData::Call {
                                    callee: expression,
                                    arguments,
                                    optional: true,
                                },
                                start,
                            )
                        }
                        SyntaxKind::OpenBracketToken => {
                            let property = self.parse_computed_member()?;
                            self.finish_node(
                                NodeData::Member {
                                    object: expression,
                                    property,
                                    computed: true,
                                    optional: true,
                                },
                                start,
                            )
                        }
                        _ => {
                            let property = self.parse_identifier_name()?;
                            self.finish_node(
                                NodeData::Member {
                                    object: expression,
                                    property,
                                    computed: false,
                                    optional: true,
                                },
                                start,
                            )
                        }
                    };
                }
                SyntaxKind::OpenBracketToken => {
                    let property = self.parse_computed_member()?;
                    expression = self.finish_node(
                        NodeData::Member {
                            object: expression,
                            property,
                            computed: true,
                            optional: false,
                        },
                        start,
                    );
                }
                SyntaxKind::OpenParenToken if allow_call => {
                    let arguments = self.parse_arguments()?;
                    expression = self.finish_node(
                        NodeData::Call {
                            callee: expression,
                            arguments,
                            optional: false,
                        },
                        start,
                    );
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    let quasi = self.parse_template_literal()?;
                    expression = self.finish_node(
                        NodeData::TaggedTemplate {
                            tag: expression,
                            quasi,
                        },
                        start,
                    );
                }
                _ => return Ok(expression),
            }
        }
    }

    fn parse_computed_member(&mut self) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let property = self.allow_in(|p| p.parse_expression())?;
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        Ok(property)
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<NodeIndex>> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let arguments = self.allow_in(|p| {
            let mut arguments = Vec::new();
            while !p.is_token(SyntaxKind::CloseParenToken) {
                arguments.push(p.parse_spread_or_assignment()?);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            Ok(arguments)
        })?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(arguments)
    }

    fn parse_spread_or_assignment(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_assignment_expression();
        }
        let start = self.token_start();
        self.next_token();
        let argument = self.parse_assignment_expression()?;
        Ok(self.finish_node(NodeData::Spread { argument }, start))
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        match self.token() {
            SyntaxKind::ThisKeyword => {
                self.next_token();
                Ok(self.finish_node(NodeData::This, start))
            }
            SyntaxKind::SuperKeyword => {
                self.next_token();
                Ok(self.finish_node(NodeData::Super, start))
            }
            SyntaxKind::Identifier => {
                if self.is_contextual("async")
                    && self.look_ahead_next_is_on_same_line(SyntaxKind::FunctionKeyword)
                {
                    self.next_token();
                    return self.parse_function(start, true, true);
                }
                self.parse_identifier()
            }
            SyntaxKind::ImportKeyword => self.parse_identifier_name(),
            SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => self.parse_literal(),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.current_token = self.scanner.re_scan_slash_token();
                self.parse_literal()
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                self.parse_template_literal()
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self.allow_in(|p| p.parse_expression())?;
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                Ok(self.finish_node(NodeData::Paren { expression }, start))
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function(start, false, true),
            SyntaxKind::ClassKeyword => self.parse_class(true),
            _ => Err(self.unexpected_token()),
        }
    }

    pub(crate) fn parse_identifier(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::Identifier) {
            return Err(self.error("Identifier expected."));
        }
        self.parse_identifier_name()
    }

    /// Any identifier or reserved word, as after `.` or in a property key.
    pub(crate) fn parse_identifier_name(&mut self) -> ParseResult<NodeIndex> {
        if !self.token().is_identifier_or_keyword() {
            return Err(self.error("Identifier expected."));
        }
        let start = self.token_start();
        let name = self.scanner.get_token_text().to_string();
        self.next_token();
        Ok(self.finish_node(NodeData::Identifier { name }, start))
    }

    pub(crate) fn parse_literal(&mut self) -> ParseResult<NodeIndex> {
        if self.scanner.is_unterminated() {
            return Err(self.error("Unterminated literal."));
        }
        let start = self.token_start();
        let kind = match self.token() {
            SyntaxKind::StringLiteral => LiteralKind::String,
            SyntaxKind::NumericLiteral => LiteralKind::Number,
            SyntaxKind::BigIntLiteral => LiteralKind::BigInt,
            SyntaxKind::RegularExpressionLiteral => LiteralKind::RegExp,
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => LiteralKind::Boolean,
            SyntaxKind::NullKeyword => LiteralKind::Null,
            _ => return Err(self.unexpected_token()),
        };
        let raw = self.scanner.get_token_text().to_string();
        let value = if kind == LiteralKind::String {
            self.token_value().to_string()
        } else {
            raw.clone()
        };
        self.next_token();
        Ok(self.finish_node(NodeData::Literal(Literal { kind, value, raw }), start))
    }

    /// Template literal; each `}` closing a substitution is re-scanned as the
    /// next template part.
    fn parse_template_literal(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        if self.scanner.is_unterminated() {
            return Err(self.error("Unterminated template literal."));
        }
        let mut quasis = vec![self.token_value().to_string()];
        let mut expressions = Vec::new();
        if self.is_token(SyntaxKind::TemplateHead) {
            loop {
                self.next_token();
                expressions.push(self.allow_in(|p| p.parse_expression())?);
                if !self.is_token(SyntaxKind::CloseBraceToken) {
                    return Err(self.error("'}' expected."));
                }
                self.current_token = self.scanner.re_scan_template_token();
                if self.scanner.is_unterminated() {
                    return Err(self.error("Unterminated template literal."));
                }
                quasis.push(self.token_value().to_string());
                if self.is_token(SyntaxKind::TemplateTail) {
                    break;
                }
            }
        }
        self.next_token();
        Ok(self.finish_node(
            NodeData::Template {
                quasis,
                expressions,
            },
            start,
        ))
    }

    fn parse_array_literal(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let elements = self.allow_in(|p| {
            let mut elements = Vec::new();
            while !p.is_token(SyntaxKind::CloseBracketToken) {
                if p.parse_optional(SyntaxKind::CommaToken) {
                    elements.push(None);
                    continue;
                }
                elements.push(Some(p.parse_spread_or_assignment()?));
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            Ok(elements)
        })?;
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        Ok(self.finish_node(NodeData::Array { elements }, start))
    }

    // =========================================================================
    // Object literals
    // =========================================================================

    fn parse_object_literal(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let properties = self.allow_in(|p| {
            let mut properties = Vec::new();
            while !p.is_token(SyntaxKind::CloseBraceToken) {
                properties.push(p.parse_object_member()?);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            Ok(properties)
        })?;
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish_node(NodeData::Object { properties }, start))
    }

    fn parse_object_member(&mut self) -> ParseResult<NodeIndex> {
        let start = self.token_start();
        if self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_spread_or_assignment();
        }
        if self.look_ahead_is_object_method() {
            return self.parse_method(start, false, false);
        }

        let is_plain_name = self.is_token(SyntaxKind::Identifier);
        let (key, computed) = self.parse_property_name()?;
        if self.parse_optional(SyntaxKind::ColonToken) {
            let value = self.parse_assignment_expression()?;
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
        // `{a = 1}` only appears as a destructuring assignment target.
        let value = if self.parse_optional(SyntaxKind::EqualsToken) {
            let right = self.parse_assignment_expression()?;
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

    /// Look ahead to see if an object member is a method: a modifier or `*`
    /// before the name, or `(` right after it.
    fn look_ahead_is_object_method(&mut self) -> bool {
        if self.is_token(SyntaxKind::AsteriskToken) {
            return true;
        }
        if self.is_contextual("async") && self.look_ahead_is_member_modifier(false) {
            return true;
        }
        if (self.is_contextual("get") || self.is_contextual("set"))
            && self.look_ahead_is_member_modifier(true)
        {
            return true;
        }
        self.look_ahead(|p| p.parse_property_name().is_ok() && p.is_token(SyntaxKind::OpenParenToken))
    }

    /// A property key and whether it is computed (`[expr]`).
    pub(crate) fn parse_property_name(&mut self) -> ParseResult<(NodeIndex, bool)> {
        match self.token() {
            SyntaxKind::OpenBracketToken => Ok((self.parse_computed_member()?, true)),
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                Ok((self.parse_literal()?, false))
            }
            kind if kind.is_identifier_or_keyword() => Ok((self.parse_identifier_name()?, false)),
            _ => Err(self.error("Property name expected.")),
        }
    }
}

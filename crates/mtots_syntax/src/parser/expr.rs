/// Expression parsing (Pratt-style).
///
/// Precedence levels live in `mtots_core::lang::operators::prec`; the loop in [`Parser::parse_prec`] keeps
/// extending the left-hand side while the next token binds at least as tightly as the requested level.
///
/// ## Notes
/// - Binary symbol operators become method calls on magic names (`a + b` → `a.__add__(b)`); `>` and `<=` swap
///   their operands and `!=`, `<=`, `>=` wrap the call in a logical `not`.
/// - `and`, `or`, `is`, `not` and `if ... then ... else` stay [`Operation`] nodes.
/// - Every synthesized method identifier is located at its operator token, which is where hover and
///   go-to-definition land.
impl Parser {
    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> Expression {
        self.parse_prec(prec::OR)
    }

    fn parse_prec(&mut self, precedence: u8) -> Expression {
        let start = self.peek().location.clone();
        let mut expression = self.prefix();
        while precedence <= self.infix_precedence() {
            expression = self.infix(expression, &start);
        }
        expression
    }

    /// Binding power of the current token as an infix operator, or `prec::NONE`.
    fn infix_precedence(&self) -> u8 {
        match self.peek().kind {
            TokenKind::Symbol(id) => operators::symbol_precedence(id).unwrap_or(prec::NONE),
            TokenKind::Keyword(id) => operators::keyword_precedence(id).unwrap_or(prec::NONE),
            _ => prec::NONE,
        }
    }

    // ========================================================================
    // Arguments
    // ========================================================================

    /// Parse call arguments up to (not including) the closing `)`.
    ///
    /// Returns positional args, keyword args, and one location per argument slot. A slot runs from the start of the
    /// argument to the start of whatever follows it, so a cursor sitting after a comma is inside the next slot.
    fn arguments_and_locations(&mut self) -> (Vec<Expression>, Vec<(Ident, Expression)>, Vec<Location>) {
        let mut args = Vec::new();
        let mut kwargs = Vec::new();
        let mut arg_locations = Vec::new();
        loop {
            let slot_start = self.peek().location.range.start;
            if self.at_symbol(SymbolId::RParen) {
                arg_locations.push(self.slot_location(slot_start));
                break;
            }
            let keyword_arg = self.at(TokenType::Ident)
                && self.peek_next_raw().is_some_and(|t| t.is_symbol(SymbolId::Eq));
            if keyword_arg {
                let name = self.identifier();
                self.expect_symbol(SymbolId::Eq);
                kwargs.push((name, self.parse_expression()));
            } else if !kwargs.is_empty() {
                self.error("Positional arguments cannot follow keyword arguments");
                let location = self.peek().location.clone();
                let name = self.make_ident("<positional>", location);
                kwargs.push((name, self.parse_expression()));
            } else {
                args.push(self.parse_expression());
            }
            arg_locations.push(self.slot_location(slot_start));
            if !self.consume_symbol(SymbolId::Comma) {
                break;
            }
        }
        while !self.at_symbol(SymbolId::RParen) {
            args.push(self.parse_expression());
            if !self.consume_symbol(SymbolId::Comma) {
                break;
            }
        }
        (args, kwargs, arg_locations)
    }

    fn arguments(&mut self) -> Vec<Expression> {
        self.arguments_and_locations().0
    }

    fn slot_location(&self, slot_start: Position) -> Location {
        let end = self.peek().location.range.start;
        Location::new(self.source.clone(), Range::new(slot_start, end))
    }

    /// Comma-separated expressions up to `close`, returning the items and the closing token's location.
    fn display_items(&mut self, close: SymbolId) -> (Vec<Expression>, Location) {
        let mut items = Vec::new();
        while !self.at_symbol(close) {
            items.push(self.parse_expression());
            if !self.consume_symbol(SymbolId::Comma) {
                break;
            }
        }
        let end = self.expect_symbol(close).location;
        (items, end)
    }

    /// `key[: value], ...` up to `}`. A key with no value pairs with `nil`, making `{a, b}` a set-like dict.
    fn dict_pairs(&mut self) -> (Vec<(Expression, Expression)>, Location) {
        let mut pairs = Vec::new();
        while !self.at_symbol(SymbolId::RBrace) {
            let key = self.parse_expression();
            let value = if self.consume_symbol(SymbolId::Colon) {
                self.parse_expression()
            } else {
                Expression::new(Expr::Nil, key.location.clone())
            };
            pairs.push((key, value));
            if !self.consume_symbol(SymbolId::Comma) {
                break;
            }
        }
        let end = self.expect_symbol(SymbolId::RBrace).location;
        (pairs, end)
    }

    // ========================================================================
    // Prefix
    // ========================================================================

    fn prefix(&mut self) -> Expression {
        let start = self.peek().location.clone();
        let kind = self.peek().kind.clone();
        if let Some(method) = kind.symbol_id().and_then(operators::unary_method) {
            return self.unary(start, method);
        }
        match kind {
            TokenKind::Symbol(SymbolId::LParen) => {
                self.advance();
                let expression = self.parse_expression();
                self.expect_symbol(SymbolId::RParen);
                expression
            }
            TokenKind::Symbol(SymbolId::LBracket) => {
                self.advance();
                let (items, end) = self.display_items(SymbolId::RBracket);
                Expression::new(Expr::List(items), start.merge(&end))
            }
            TokenKind::Symbol(SymbolId::LBrace) => {
                self.advance();
                let (pairs, end) = self.dict_pairs();
                Expression::new(Expr::Dict(pairs), start.merge(&end))
            }
            TokenKind::Keyword(KeywordId::Final) => {
                self.advance();
                if self.consume_symbol(SymbolId::LBracket) {
                    let (items, end) = self.display_items(SymbolId::RBracket);
                    Expression::new(Expr::FrozenList(items), start.merge(&end))
                } else if self.consume_symbol(SymbolId::LBrace) {
                    let (pairs, end) = self.dict_pairs();
                    Expression::new(Expr::FrozenDict(pairs), start.merge(&end))
                } else {
                    self.error("Expected '[' or '{' following 'final' in expression");
                    self.error_expression()
                }
            }
            TokenKind::Number(value) => {
                self.advance();
                Expression::new(Expr::Number(value), start)
            }
            TokenKind::String(value) => {
                self.advance();
                Expression::new(Expr::String(value), start)
            }
            TokenKind::Keyword(KeywordId::True) => {
                self.advance();
                Expression::new(Expr::Bool(true), start)
            }
            TokenKind::Keyword(KeywordId::False) => {
                self.advance();
                Expression::new(Expr::Bool(false), start)
            }
            TokenKind::Keyword(KeywordId::Nil) => {
                self.advance();
                Expression::new(Expr::Nil, start)
            }
            TokenKind::Keyword(KeywordId::Def) => self.lambda(start),
            TokenKind::Keyword(id @ (KeywordId::This | KeywordId::Super)) => {
                self.advance();
                let name = mtots_core::lang::keywords::as_str(id);
                let identifier = self.make_ident(name, start.clone());
                Expression::new(Expr::GetVariable(identifier), start)
            }
            TokenKind::Ident(_) => self.name_expression(start),
            TokenKind::Keyword(KeywordId::Not) => {
                self.advance();
                let arg = self.parse_prec(prec::UNARY_NOT);
                let location = start.merge(&arg.location);
                logical_not(location, arg)
            }
            TokenKind::Keyword(KeywordId::If) => self.conditional(),
            TokenKind::Keyword(KeywordId::Raise) => {
                self.advance();
                let exception = self.parse_expression();
                let location = start.merge(&exception.location);
                Expression::new(Expr::Raise(Box::new(exception)), location)
            }
            _ => {
                let found = self.peek().token_type();
                self.error(format!("Expected expression but got '{found}'"));
                self.error_expression()
            }
        }
    }

    /// `-x`, `+x`, `~x` as calls to `__neg__`, `__pos__`, `__not__`.
    fn unary(&mut self, start: Location, method: MagicMethodId) -> Expression {
        let identifier = self.make_ident(magic_methods::as_str(method), start.clone());
        self.advance();
        let arg = self.parse_prec(prec::UNARY_MINUS);
        let location = start.merge(&arg.location);
        method_call(location, arg, identifier, Vec::new())
    }

    /// `def (params) [ReturnType]: expr`
    fn lambda(&mut self, start: Location) -> Expression {
        self.advance();
        let parameters = self.parameters();
        let return_type = if self.at_symbol(SymbolId::Colon) {
            None
        } else {
            Some(self.type_expression())
        };
        self.expect_symbol(SymbolId::Colon);
        let body = self.parse_expression();
        let location = start.merge(&body.location);
        let lambda = Lambda {
            parameters,
            return_type,
            body: Box::new(body),
        };
        Expression::new(Expr::Lambda(lambda), location)
    }

    /// An identifier in prefix position: a variable read, an assignment, or a `Tuple(...)` display.
    fn name_expression(&mut self, start: Location) -> Expression {
        let identifier = self.identifier();
        if identifier.name == "Tuple" {
            self.expect_symbol(SymbolId::LParen);
            let items = self.arguments();
            self.expect_symbol(SymbolId::RParen);
            let location = identifier.location.clone();
            return Expression::new(Expr::Tuple { identifier, items }, location);
        }
        if self.consume_symbol(SymbolId::Eq) {
            let value = self.parse_expression();
            return Expression::new(
                Expr::SetVariable {
                    identifier,
                    value: Box::new(value),
                },
                start,
            );
        }
        Expression::new(Expr::GetVariable(identifier), start)
    }

    /// `if cond then a else b`, located at the `if` keyword.
    fn conditional(&mut self) -> Expression {
        let location = self.advance().location;
        let condition = Box::new(self.parse_expression());
        let placeholder = || Box::new(Expression::new(Expr::Error, location.clone()));
        if !self.consume_keyword(KeywordId::Then) {
            self.error("Expected 'then' for 'if' expression");
            let operation = Operation::If(condition, placeholder(), placeholder());
            return Expression::new(Expr::Operation(operation), location.clone());
        }
        let left = Box::new(self.parse_expression());
        if !self.consume_keyword(KeywordId::Else) {
            self.error("Expected 'else' for 'if' expression");
            let operation = Operation::If(condition, left, placeholder());
            return Expression::new(Expr::Operation(operation), location.clone());
        }
        let right = Box::new(self.parse_expression());
        Expression::new(Expr::Operation(Operation::If(condition, left, right)), location.clone())
    }

    // ========================================================================
    // Infix
    // ========================================================================

    fn infix(&mut self, lhs: Expression, start: &Location) -> Expression {
        let kind = self.peek().kind.clone();
        let precedence = self.infix_precedence();
        if precedence == prec::NONE {
            let found = self.peek().token_type();
            self.error(format!(
                "Invalid infix token {found} (invalid precedence, possibly internal error)"
            ));
            return self.error_expression();
        }

        match kind {
            TokenKind::Symbol(SymbolId::Dot) => return self.member_access(lhs, start),
            TokenKind::Symbol(SymbolId::LBracket) => return self.subscript(lhs, start),
            TokenKind::Symbol(SymbolId::LParen) => {
                self.advance();
                let (args, kwargs, arg_locations) = self.arguments_and_locations();
                let end = self.expect_symbol(SymbolId::RParen).location;
                let call = FunctionCall {
                    function: Box::new(lhs),
                    args,
                    kwargs,
                    arg_locations: Some(arg_locations),
                };
                return Expression::new(Expr::FunctionCall(call), start.merge(&end));
            }
            TokenKind::Keyword(KeywordId::As) => {
                self.advance();
                let type_expr = self.type_expression();
                let location = start.merge(&type_expr.location);
                return Expression::new(
                    Expr::TypeAssertion {
                        expression: Box::new(lhs),
                        type_expr,
                    },
                    location,
                );
            }
            _ => {}
        }

        let binary = kind
            .symbol_id()
            .and_then(|id| operators::binary_method(id).map(|binary| (id, binary)));
        if let Some((id, binary)) = binary {
            let operator_location = self.advance().location;
            let rhs = match operators::associativity(id) {
                Associativity::Right => self.parse_prec(precedence),
                Associativity::Left => self.parse_prec(precedence + 1),
            };
            let location = start.merge(&rhs.location);
            let identifier = self.make_ident(magic_methods::as_str(binary.method), operator_location);
            let core = if binary.swap {
                method_call(location.clone(), rhs, identifier, vec![lhs])
            } else {
                method_call(location.clone(), lhs, identifier, vec![rhs])
            };
            return if binary.negate { logical_not(location, core) } else { core };
        }

        match kind {
            TokenKind::Keyword(KeywordId::In) => {
                let operator_location = self.advance().location;
                let rhs = self.parse_prec(precedence + 1);
                let location = start.merge(&rhs.location);
                let identifier = self.make_ident(magic_methods::as_str(MagicMethodId::Contains), operator_location);
                method_call(location, rhs, identifier, vec![lhs])
            }
            TokenKind::Keyword(KeywordId::Not) => {
                let not_location = self.advance().location;
                let operator_location = not_location.merge(&self.expect_keyword(KeywordId::In).location);
                let rhs = self.parse_prec(precedence + 1);
                let location = start.merge(&rhs.location);
                let identifier = self.make_ident(magic_methods::as_str(MagicMethodId::Contains), operator_location);
                let contains = method_call(location.clone(), rhs, identifier, vec![lhs]);
                logical_not(location, contains)
            }
            TokenKind::Keyword(KeywordId::Is) => {
                self.advance();
                let negate = self.consume_keyword(KeywordId::Not);
                let rhs = self.parse_prec(precedence + 1);
                let location = start.merge(&rhs.location);
                let core = Expression::new(
                    Expr::Operation(Operation::Is(Box::new(lhs), Box::new(rhs))),
                    location.clone(),
                );
                if negate { logical_not(location, core) } else { core }
            }
            TokenKind::Keyword(id @ (KeywordId::And | KeywordId::Or)) => {
                self.advance();
                let rhs = self.parse_prec(precedence + 1);
                let location = start.merge(&rhs.location);
                let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
                let operation = if id == KeywordId::And {
                    Operation::And(lhs, rhs)
                } else {
                    Operation::Or(lhs, rhs)
                };
                Expression::new(Expr::Operation(operation), location)
            }
            _ => {
                let found = self.peek().token_type();
                self.error(format!("Invalid infix token {found} (possibly internal error)"));
                self.error_expression()
            }
        }
    }

    /// `.name`, `.name(args)`, `.name = value`, or a dangling `.`.
    fn member_access(&mut self, lhs: Expression, start: &Location) -> Expression {
        let dot_location = self.advance().location;
        if !self.at(TokenType::Ident) {
            let follow_location = self.peek().location.clone();
            let location = start.merge(&dot_location);
            let dot = Dot {
                owner: Box::new(lhs),
                dot_location,
                follow_location,
            };
            return Expression::new(Expr::Dot(dot), location);
        }
        let identifier = self.identifier();
        if self.consume_symbol(SymbolId::LParen) {
            let (args, kwargs, arg_locations) = self.arguments_and_locations();
            let end = self.expect_symbol(SymbolId::RParen).location;
            let call = MethodCall {
                owner: Box::new(lhs),
                identifier,
                args,
                kwargs,
                arg_locations: Some(arg_locations),
            };
            return Expression::new(Expr::MethodCall(call), start.merge(&end));
        }
        if self.consume_symbol(SymbolId::Eq) {
            let value = self.parse_expression();
            let location = start.merge(&value.location);
            return Expression::new(
                Expr::SetField {
                    owner: Box::new(lhs),
                    identifier,
                    value: Box::new(value),
                },
                location,
            );
        }
        let location = start.merge(&identifier.location);
        Expression::new(
            Expr::GetField {
                owner: Box::new(lhs),
                identifier,
            },
            location,
        )
    }

    /// `[i]`, `[i] = v`, `[lo:hi]`, `[:hi]`, `[lo:]` and `[:]`.
    fn subscript(&mut self, lhs: Expression, start: &Location) -> Expression {
        let open_location = self.advance().location;
        let slice_method = magic_methods::as_str(MagicMethodId::Slice);

        if self.at_symbol(SymbolId::Colon) {
            let colon_location = self.advance().location;
            let low = Expression::new(Expr::Nil, colon_location.clone());
            let high = self.slice_upper_bound(&colon_location);
            let end = self.expect_symbol(SymbolId::RBracket).location;
            let identifier = self.make_ident(slice_method, open_location);
            return method_call(start.merge(&end), lhs, identifier, vec![low, high]);
        }

        let index = self.parse_expression();
        if self.at_symbol(SymbolId::Colon) {
            let colon_location = self.advance().location;
            let high = self.slice_upper_bound(&colon_location);
            let end = self.expect_symbol(SymbolId::RBracket).location;
            let identifier = self.make_ident(slice_method, open_location);
            return method_call(start.merge(&end), lhs, identifier, vec![index, high]);
        }

        let end = self.expect_symbol(SymbolId::RBracket).location;
        if self.consume_symbol(SymbolId::Eq) {
            let value = self.parse_expression();
            let location = start.merge(&value.location);
            let identifier = self.make_ident(magic_methods::as_str(MagicMethodId::SetItem), open_location);
            return method_call(location, lhs, identifier, vec![index, value]);
        }
        let identifier = self.make_ident(magic_methods::as_str(MagicMethodId::GetItem), open_location);
        method_call(start.merge(&end), lhs, identifier, vec![index])
    }

    fn slice_upper_bound(&mut self, colon_location: &Location) -> Expression {
        if self.at_symbol(SymbolId::RBracket) {
            Expression::new(Expr::Nil, colon_location.clone())
        } else {
            self.parse_expression()
        }
    }

    /// Placeholder expression at the current token.
    fn error_expression(&self) -> Expression {
        Expression::new(Expr::Error, self.peek().location.clone())
    }
}

fn logical_not(location: Location, arg: Expression) -> Expression {
    Expression::new(Expr::Operation(Operation::Not(Box::new(arg))), location)
}

/// A synthesized method call with no keyword args and no argument slots.
fn method_call(location: Location, owner: Expression, identifier: Ident, args: Vec<Expression>) -> Expression {
    let call = MethodCall {
        owner: Box::new(owner),
        identifier,
        args,
        kwargs: Vec::new(),
        arg_locations: None,
    };
    Expression::new(Expr::MethodCall(call), location)
}

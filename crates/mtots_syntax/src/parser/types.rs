/// Type expression parsing.
///
/// ## Notes
/// - `T?` and `A | B` are sugar; they come out as `Optional[T]` and `Union[A, B]` with the synthesized name
///   located at the `?` / `|` token.
/// - `module.` with nothing after the dot still produces a node (named `" "`), so member completion can fire
///   while the user is typing.
impl Parser {
    // ========================================================================
    // Types
    // ========================================================================

    fn at_type_expression(&self) -> bool {
        self.at(TokenType::Ident) || self.at_keyword(KeywordId::Nil)
    }

    fn type_expression(&mut self) -> TypeExpr {
        if self.at_keyword(KeywordId::Nil) {
            let location = self.advance().location;
            let identifier = self.make_ident("nil", location.clone());
            return TypeExpr {
                location,
                qualifier: None,
                identifier,
                args: Vec::new(),
            };
        }

        let first = self.identifier();
        let dot_location = self.peek().location.clone();
        let second = if self.consume_symbol(SymbolId::Dot) {
            if self.at(TokenType::Ident) {
                Some(self.identifier())
            } else {
                Some(self.make_ident(" ", dot_location))
            }
        } else {
            None
        };

        let mut end = second.as_ref().unwrap_or(&first).location.clone();
        let mut args = Vec::new();
        if self.consume_symbol(SymbolId::LBracket) {
            while !self.at_symbol(SymbolId::RBracket) {
                args.push(self.type_expression());
                if !self.consume_symbol(SymbolId::Comma) {
                    break;
                }
            }
            end = self.expect_symbol(SymbolId::RBracket).location;
        }

        let mut location = first.location.merge(&end);
        let (qualifier, identifier) = match second {
            Some(second) => (Some(first), second),
            None => (None, first),
        };
        let mut type_expr = TypeExpr {
            location: location.clone(),
            qualifier,
            identifier,
            args,
        };

        if self.at_symbol(SymbolId::Question) {
            let qmark_location = self.advance().location;
            location = location.merge(&qmark_location);
            let identifier = self.make_ident("Optional", qmark_location);
            type_expr = TypeExpr {
                location: location.clone(),
                qualifier: None,
                identifier,
                args: vec![type_expr],
            };
        }
        if self.at_symbol(SymbolId::Pipe) {
            let pipe_location = self.advance().location;
            let rhs = self.type_expression();
            location = location.merge(&rhs.location);
            let identifier = self.make_ident("Union", pipe_location);
            type_expr = TypeExpr {
                location,
                qualifier: None,
                identifier,
                args: vec![type_expr, rhs],
            };
        }
        type_expr
    }
}

/// Statement parsing methods.
///
/// This chunk parses statement forms (`if`, `while`, `for`, `return`, `pass`, expression statements)
/// as well as indentation-based blocks.
///
/// ## Notes
/// - Block parsing relies on `Indent` / `Dedent` layout tokens produced by the lexer.
/// - A `:` with no indented block after it is reported but yields an empty block, since that is the normal state
///   of code being typed.
impl Parser {
    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self) -> Statement {
        match self.peek().kind {
            TokenKind::Keyword(KeywordId::For) => self.for_statement(),
            TokenKind::Keyword(KeywordId::If) => self.if_statement(),
            TokenKind::Keyword(KeywordId::Return) => self.return_statement(),
            TokenKind::Keyword(KeywordId::While) => self.while_statement(),
            TokenKind::Newline | TokenKind::Symbol(SymbolId::Semicolon) | TokenKind::Keyword(KeywordId::Pass) => {
                let location = self.peek().location.clone();
                while self.consume_keyword(KeywordId::Pass) {}
                self.expect_statement_delimiter();
                self.skip_separators();
                Statement::new(Stmt::Nop, location)
            }
            _ => self.expression_statement(),
        }
    }

    fn for_statement(&mut self) -> Statement {
        let start = self.expect_keyword(KeywordId::For).location;
        let variable = self.identifier();
        self.expect_keyword(KeywordId::In);
        let container = self.parse_expression();
        let body = self.block();
        let location = start.merge(&body.location);
        Statement::new(
            Stmt::For(ForStmt {
                variable,
                container,
                body,
            }),
            location,
        )
    }

    fn if_statement(&mut self) -> Statement {
        let start = self.expect_keyword(KeywordId::If).location;
        let mut branches = Vec::new();
        let condition = self.parse_expression();
        branches.push((condition, self.block()));
        while self.consume_keyword(KeywordId::Elif) {
            let condition = self.parse_expression();
            branches.push((condition, self.block()));
        }
        let fallback = if self.consume_keyword(KeywordId::Else) {
            Some(self.block())
        } else {
            None
        };
        let last = match (&fallback, branches.last()) {
            (Some(block), _) | (None, Some((_, block))) => block.location.clone(),
            (None, None) => start.clone(),
        };
        let location = start.merge(&last);
        Statement::new(Stmt::If(IfStmt { branches, fallback }), location)
    }

    /// `return [expr]`; a bare `return` returns a `nil` located at the keyword.
    fn return_statement(&mut self) -> Statement {
        let start = self.expect_keyword(KeywordId::Return).location;
        let expression = if self.at(TokenType::Newline) || self.at_symbol(SymbolId::Semicolon) {
            Expression::new(Expr::Nil, start.clone())
        } else {
            self.parse_expression()
        };
        let location = start.merge(&expression.location);
        self.expect_statement_delimiter();
        Statement::new(Stmt::Return(expression), location)
    }

    fn while_statement(&mut self) -> Statement {
        let start = self.expect_keyword(KeywordId::While).location;
        let condition = self.parse_expression();
        let body = self.block();
        let location = start.merge(&body.location);
        Statement::new(Stmt::While(WhileStmt { condition, body }), location)
    }

    fn expression_statement(&mut self) -> Statement {
        let start = self.peek().location.clone();
        let expression = self.parse_expression();
        let location = start.merge(&expression.location);
        self.expect_statement_delimiter();
        Statement::new(Stmt::Expression(expression), location)
    }

    /// `: NEWLINE INDENT declaration* DEDENT`
    fn block(&mut self) -> Located<Block> {
        let start = self.expect(TokenType::Symbol(SymbolId::Colon), true).location;
        self.skip_separators();
        if !self.consume(TokenType::Indent) {
            self.error("Expected INDENT after \":\"");
            return Located::new(Block::default(), start);
        }
        let mut statements = Vec::new();
        self.skip_separators();
        while !self.at(TokenType::Dedent) && !self.at(TokenType::Eof) {
            statements.push(self.declaration());
            self.skip_separators();
        }
        let end = self.expect(TokenType::Dedent, false).location;
        self.skip_separators();
        Located::new(Block { statements }, start.merge(&end))
    }
}

/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting token types, keywords, and symbols
/// - Layout handling (`skip_separators`, `expect_statement_delimiter`)
///
/// ## Notes
/// - `Error` tokens from the lexer are never seen by the grammar: `advance` steps over them and records each
///   one as a lexical diagnostic.
impl Parser {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Return the raw token after the current one, without skipping `Error` tokens.
    fn peek_next_raw(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    /// Advance to the next token and return the token we just consumed.
    ///
    /// At `Eof` this is a no-op that keeps returning `Eof`.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
            self.skip_error_tokens();
        }
        token
    }

    fn skip_error_tokens(&mut self) {
        while self.pos + 1 < self.tokens.len() {
            let token = &self.tokens[self.pos];
            let TokenKind::Error(message) = &token.kind else {
                break;
            };
            let diagnostic = Diagnostic::lexical(token.location.clone(), message.clone());
            self.errors.push(diagnostic);
            self.pos += 1;
        }
    }

    /// Return `true` if the current token has the given type.
    fn at(&self, token_type: TokenType) -> bool {
        self.peek().token_type() == token_type
    }

    /// Return `true` if the current token is the given keyword.
    fn at_keyword(&self, id: KeywordId) -> bool {
        self.peek().is_keyword(id)
    }

    /// Return `true` if the current token is the given symbol.
    fn at_symbol(&self, id: SymbolId) -> bool {
        self.peek().is_symbol(id)
    }

    /// If the current token has type `token_type`, consume it and return `true`.
    fn consume(&mut self, token_type: TokenType) -> bool {
        if self.at(token_type) {
            self.advance();
            return true;
        }
        false
    }

    fn consume_keyword(&mut self, id: KeywordId) -> bool {
        self.consume(TokenType::Keyword(id))
    }

    fn consume_symbol(&mut self, id: SymbolId) -> bool {
        self.consume(TokenType::Symbol(id))
    }

    /// Consume a token of type `token_type`, or report it missing.
    ///
    /// ## Notes
    /// - On a mismatch the returned token is a placeholder located at the current token, so callers can keep
    ///   building nodes without special cases.
    /// - With `sync`, the parser then skips up to and including the next token of the expected type.
    fn expect(&mut self, token_type: TokenType, sync: bool) -> Token {
        if self.at(token_type) {
            return self.advance();
        }
        let found = self.peek().token_type();
        self.error(format!("Expected {token_type} but got {found}"));
        let placeholder = Token::placeholder(token_type, self.peek().location.clone());
        if sync {
            while !self.at(token_type) && !self.at(TokenType::Eof) {
                self.advance();
            }
            self.advance();
        }
        placeholder
    }

    fn expect_keyword(&mut self, id: KeywordId) -> Token {
        self.expect(TokenType::Keyword(id), false)
    }

    fn expect_symbol(&mut self, id: SymbolId) -> Token {
        self.expect(TokenType::Symbol(id), false)
    }

    /// A statement ends at `;` or at a newline; anything else is skipped up to the next newline.
    fn expect_statement_delimiter(&mut self) {
        if !self.consume_symbol(SymbolId::Semicolon) {
            self.expect(TokenType::Newline, true);
        }
    }

    /// Skip any run of newlines and semicolons.
    fn skip_separators(&mut self) {
        while self.consume(TokenType::Newline) || self.consume_symbol(SymbolId::Semicolon) {}
    }

    /// Record a syntax error at the current token.
    fn error(&mut self, message: impl Into<String>) {
        let location = self.peek().location.clone();
        self.errors.push(Diagnostic::syntax(location, message));
    }
}

/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse_file()` entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.
/// - Recovery is local: a missing token is reported and replaced by a placeholder, and only statement
///   delimiters and block colons resynchronize by skipping ahead.
pub struct Parser {
    tokens: Vec<Token>,
    /// Index of the current (peeked) token. Never points at an `Error` token except at the very end.
    pos: usize,
    errors: Vec<Diagnostic>,
    next_node_id: u32,
    source: SourceId,
}

impl Parser {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `source`: Source the tokens were lexed from; used for synthesized locations.
    /// - `tokens`: Token stream produced by `mtots_syntax::lexer`. A trailing `Eof` is added if missing.
    pub fn new(source: SourceId, mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.kind == TokenKind::Eof) {
            let end = tokens
                .last()
                .map(|t| Location::new(source.clone(), Range::new(t.location.range.end, t.location.range.end)))
                .unwrap_or_else(|| Location::start_of(source.clone()));
            tokens.push(Token::new(TokenKind::Eof, end));
        }
        let mut parser = Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            next_node_id: 0,
            source,
        };
        parser.skip_error_tokens();
        parser
    }

    /// Parse the entire token stream into a [`File`].
    pub fn parse_file(mut self) -> File {
        let start = self.peek().location.clone();

        self.skip_separators();
        let documentation = if self.at(TokenType::String) {
            self.advance().string_value().map(str::to_string)
        } else {
            None
        };
        self.skip_separators();

        let mut imports = Vec::new();
        while self.at_keyword(KeywordId::Import) || self.at_keyword(KeywordId::From) {
            imports.push(self.import_declaration());
            self.expect_statement_delimiter();
            self.skip_separators();
        }

        let mut statements = Vec::new();
        while !self.at(TokenType::Eof) {
            statements.push(self.module_level_declaration());
        }

        let location = start.merge(&self.peek().location);
        File {
            location,
            documentation,
            imports,
            statements,
            syntax_errors: self.errors,
        }
    }
}

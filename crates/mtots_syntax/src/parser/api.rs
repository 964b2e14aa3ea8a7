/// Lex and parse a source text into a [`File`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `source`: Identity of the document, attached to every location.
/// - `text`: Source text.
///
/// ## Notes
/// - Never fails; lexical and syntax problems are collected in [`File::syntax_errors`].
#[tracing::instrument(skip_all, fields(source = %source, len = text.len()))]
pub fn parse(source: &SourceId, text: &str) -> File {
    let tokens = lexer::lex(source, text);
    parse_tokens(source, tokens)
}

/// Parse an already-lexed token stream.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_tokens(source: &SourceId, tokens: Vec<Token>) -> File {
    let file = Parser::new(source.clone(), tokens).parse_file();
    tracing::debug!(
        statements = file.statements.len(),
        errors = file.syntax_errors.len(),
        "parsed file"
    );
    file
}

/// Miscellaneous parser utilities.
///
/// This chunk contains small shared parsing helpers that don’t cleanly fit into
/// “decl”, “stmt”, “expr”, or “types” (identifier construction and documentation strings).
impl Parser {
    // ========================================================================
    // Utilities
    // ========================================================================

    /// Build an identifier node with a fresh [`NodeId`].
    fn make_ident(&mut self, name: impl Into<String>, location: Location) -> Ident {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        Ident {
            id,
            name: name.into(),
            location,
        }
    }

    /// Parse an identifier; a missing one is reported and named `(missing)`.
    fn identifier(&mut self) -> Ident {
        let token = self.expect(TokenType::Ident, false);
        let name = token.ident_name().unwrap_or(MISSING).to_string();
        self.make_ident(name, token.location)
    }

    /// `a.b.c`
    fn qualified_identifier(&mut self) -> QualifiedIdent {
        let mut identifier = self.identifier();
        let mut location = identifier.location.clone();
        let mut parents = Vec::new();
        while self.consume_symbol(SymbolId::Dot) {
            let member = self.identifier();
            location = location.merge(&member.location);
            parents.push(std::mem::replace(&mut identifier, member));
        }
        QualifiedIdent {
            location,
            parents,
            identifier,
        }
    }

    /// An optional string literal used as documentation.
    fn optional_documentation(&mut self) -> Option<String> {
        if !self.at(TokenType::String) {
            return None;
        }
        self.advance().string_value().map(str::to_string)
    }
}

/// The leading string-literal statement of a block, with its location.
fn leading_documentation(block: &Block) -> Option<(String, Location)> {
    let first = block.statements.first()?;
    let Stmt::Expression(expression) = &first.node else {
        return None;
    };
    match &expression.node {
        Expr::String(doc) => Some((doc.clone(), expression.location.clone())),
        _ => None,
    }
}

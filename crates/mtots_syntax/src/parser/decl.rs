/// Declaration parsing methods.
///
/// This chunk parses declaration forms:
/// - imports (`import a.b as c`, `from a.b import c`)
/// - functions, decorators, and trait method stubs
/// - classes and traits, with their fields
/// - `var` / `final` variables
///
/// ## Notes
/// - Class and trait bodies have a fixed layout: documentation, then statics (classes only), then fields, then
///   methods. Anything out of order surfaces as a missing `DEDENT`.
impl Parser {
    // ========================================================================
    // Dispatch
    // ========================================================================

    fn module_level_declaration(&mut self) -> Statement {
        if self.at_keyword(KeywordId::Class) {
            return self.class_declaration();
        }
        if self.at_keyword(KeywordId::Trait) {
            return self.trait_declaration();
        }
        self.declaration()
    }

    fn declaration(&mut self) -> Statement {
        match self.peek().kind {
            TokenKind::Keyword(KeywordId::Def) => {
                let function = self.function_declaration(true);
                let location = function.location.clone();
                Statement::new(Stmt::Function(function.node), location)
            }
            TokenKind::Keyword(KeywordId::Final | KeywordId::Var) => self.variable_declaration(),
            TokenKind::Symbol(SymbolId::At) => self.decorator_application(),
            _ => self.statement(),
        }
    }

    // ========================================================================
    // Imports
    // ========================================================================

    fn import_declaration(&mut self) -> Import {
        let start = self.peek().location.clone();
        let from_form = self.consume_keyword(KeywordId::From);
        if !from_form {
            self.expect_keyword(KeywordId::Import);
        }
        let module = self.qualified_identifier();
        let member = if from_form {
            self.expect_keyword(KeywordId::Import);
            Some(self.identifier())
        } else {
            None
        };
        let explicit_alias = if self.consume_keyword(KeywordId::As) {
            Some(self.identifier())
        } else {
            None
        };
        let location = start.merge(explicit_alias.as_ref().map_or(&module.location, |alias| &alias.location));
        let alias = explicit_alias
            .or_else(|| member.clone())
            .unwrap_or_else(|| module.identifier.clone());
        Import {
            location,
            module,
            member,
            alias,
        }
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// `def [name] [type params] (params) [return type]: block`
    ///
    /// Decorated functions may omit the name; they get the placeholder name `<def>`.
    fn function_declaration(&mut self, name_required: bool) -> Located<FunctionDecl> {
        let start = self.expect_keyword(KeywordId::Def).location;
        let identifier = if self.at(TokenType::Ident) || name_required {
            self.identifier()
        } else {
            self.make_ident("<def>", start.clone())
        };
        let type_parameters = self.optional_type_parameters();
        let parameters = self.parameters();
        let return_type = self.optional_return_type();
        let body = self.block();
        let documentation = leading_documentation(&body.node).map(|(doc, _)| doc);
        let location = start.merge(&body.location);
        Located::new(
            FunctionDecl {
                identifier,
                type_parameters,
                parameters,
                return_type,
                documentation,
                body,
            },
            location,
        )
    }

    /// A trait method: like a function, but the body may hold nothing except documentation.
    fn function_stub(&mut self) -> Located<FunctionDecl> {
        let start = self.expect_keyword(KeywordId::Def).location;
        let identifier = self.identifier();
        let type_parameters = self.optional_type_parameters();
        let parameters = self.parameters();
        let return_type = self.optional_return_type();
        let after_parameters = self.peek().location.clone();

        let mut body = Located::new(Block::default(), start.clone());
        let mut documentation = None;
        if self.at_symbol(SymbolId::Colon) {
            body = self.block();
            if let Some((doc, doc_location)) = leading_documentation(&body.node) {
                documentation = Some((doc, doc_location));
                body.node.statements.remove(0);
            }
            if !body.node.statements.is_empty() {
                self.error(
                    "Body of a function stub must be empty (potentially aside from documentation), \
                     but found a non-empty body",
                );
            }
        }

        let mut location = start
            .merge(&after_parameters)
            .merge_opt(return_type.as_ref().map(|t| &t.location))
            .merge(&body.location);
        if let Some((_, doc_location)) = &documentation {
            location = location.merge(doc_location);
        }
        Located::new(
            FunctionDecl {
                identifier,
                type_parameters,
                parameters,
                return_type,
                documentation: documentation.map(|(doc, _)| doc),
                body,
            },
            location,
        )
    }

    fn optional_return_type(&mut self) -> Option<TypeExpr> {
        if self.at_symbol(SymbolId::Colon) || self.at(TokenType::Newline) || self.at(TokenType::Eof) {
            None
        } else {
            Some(self.type_expression())
        }
    }

    /// `@decorator` or `@decorator.method` applied to the function on the following line.
    ///
    /// Desugars into a block holding the function declaration followed by the call
    /// `decorator(function)` (or `decorator.method(function)`).
    fn decorator_application(&mut self) -> Statement {
        let at_location = self.expect_symbol(SymbolId::At).location;
        let mut decorator = self.parse_prec(prec::PRIMARY);
        let mut method_name = None;
        let dot_location = self.peek().location.clone();
        if self.consume_symbol(SymbolId::Dot) {
            if self.at(TokenType::Ident) {
                method_name = Some(self.identifier());
            } else {
                let follow_location = self.peek().location.clone();
                decorator = Expression::new(
                    Expr::Dot(Dot {
                        owner: Box::new(decorator),
                        dot_location: dot_location.clone(),
                        follow_location: follow_location.clone(),
                    }),
                    dot_location.merge(&follow_location),
                );
            }
        }
        self.expect_statement_delimiter();

        let function = self.function_declaration(false);
        let function_ref = Expression::new(
            Expr::GetVariable(function.node.identifier.clone()),
            function.node.identifier.location.clone(),
        );
        let location = at_location.merge(&function.location);
        let application = match method_name {
            Some(identifier) => Expr::MethodCall(MethodCall {
                owner: Box::new(decorator),
                identifier,
                args: vec![function_ref],
                kwargs: Vec::new(),
                arg_locations: None,
            }),
            None => Expr::FunctionCall(FunctionCall {
                function: Box::new(decorator),
                args: vec![function_ref],
                kwargs: Vec::new(),
                arg_locations: None,
            }),
        };

        let function_location = function.location.clone();
        let statements = vec![
            Statement::new(Stmt::Function(function.node), function_location),
            Statement::new(
                Stmt::Expression(Expression::new(application, location.clone())),
                location,
            ),
        ];
        Statement::new(Stmt::Block(Block { statements }), at_location)
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// `name [Type] [= default]`
    fn parameter(&mut self) -> Parameter {
        let identifier = self.identifier();
        let type_expr = if self.at_type_expression() {
            Some(self.type_expression())
        } else {
            None
        };
        let default = if self.consume_symbol(SymbolId::Eq) {
            Some(self.parse_expression())
        } else {
            None
        };
        let end = default
            .as_ref()
            .map(|d| &d.location)
            .or(type_expr.as_ref().map(|t| &t.location))
            .unwrap_or(&identifier.location);
        let location = identifier.location.merge(end);
        Parameter {
            location,
            identifier,
            type_expr,
            default,
        }
    }

    fn parameters(&mut self) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        self.expect_symbol(SymbolId::LParen);
        while !self.at_symbol(SymbolId::RParen) && !self.at(TokenType::Eof) {
            parameters.push(self.parameter());
            if !self.consume_symbol(SymbolId::Comma) {
                break;
            }
        }
        self.expect_symbol(SymbolId::RParen);
        parameters
    }

    /// `Name [Bound]`
    fn type_parameter(&mut self) -> TypeParameter {
        let location = self.peek().location.clone();
        let identifier = self.identifier();
        let bound = if self.at(TokenType::Ident) {
            Some(self.type_expression())
        } else {
            None
        };
        TypeParameter {
            location,
            identifier,
            bound,
        }
    }

    fn optional_type_parameters(&mut self) -> Vec<TypeParameter> {
        if !self.at_symbol(SymbolId::LBracket) {
            return Vec::new();
        }
        let mut type_parameters = Vec::new();
        self.expect_symbol(SymbolId::LBracket);
        while self.at(TokenType::Ident) {
            type_parameters.push(self.type_parameter());
            if !self.consume_symbol(SymbolId::Comma) {
                break;
            }
        }
        self.expect_symbol(SymbolId::RBracket);
        type_parameters
    }

    // ========================================================================
    // Classes and traits
    // ========================================================================

    /// `(Base, Other[T])` after a class or trait name.
    fn optional_bases(&mut self) -> Vec<TypeExpr> {
        let mut bases = Vec::new();
        if self.consume_symbol(SymbolId::LParen) {
            if !self.at_symbol(SymbolId::RParen) {
                loop {
                    bases.push(self.type_expression());
                    if !self.consume_symbol(SymbolId::Comma) {
                        break;
                    }
                }
            }
            self.expect_symbol(SymbolId::RParen);
        }
        bases
    }

    /// Shared head of a class or trait body: `:` INDENT [doc] [pass...]
    fn type_body_preamble(&mut self) -> Option<String> {
        self.expect_symbol(SymbolId::Colon);
        self.skip_separators();
        self.expect(TokenType::Indent, false);
        self.skip_separators();
        let documentation = if self.at(TokenType::String) {
            self.advance().string_value().map(str::to_string)
        } else {
            None
        };
        self.skip_separators();
        while self.consume_keyword(KeywordId::Pass) {}
        self.skip_separators();
        documentation
    }

    fn fields(&mut self) -> Vec<Field> {
        let mut fields = Vec::new();
        while self.at_keyword(KeywordId::Var) || self.at_keyword(KeywordId::Final) {
            fields.push(self.field_declaration());
            self.skip_separators();
        }
        fields
    }

    fn class_declaration(&mut self) -> Statement {
        let start = self.expect_keyword(KeywordId::Class).location;
        let identifier = self.identifier();
        let type_parameters = self.optional_type_parameters();
        let bases = self.optional_bases();
        let documentation = self.type_body_preamble();

        let mut static_methods = Vec::new();
        while self.at_keyword(KeywordId::Static) {
            self.expect_keyword(KeywordId::Static);
            static_methods.push(self.function_declaration(true));
            self.skip_separators();
        }
        let fields = self.fields();
        let mut methods = Vec::new();
        while self.at_keyword(KeywordId::Def) {
            methods.push(self.function_declaration(true));
            self.skip_separators();
        }

        let end = self.expect(TokenType::Dedent, false).location;
        self.skip_separators();
        let class = ClassDecl {
            identifier,
            type_parameters,
            bases,
            documentation,
            static_methods,
            fields,
            methods,
        };
        Statement::new(Stmt::Class(class), start.merge(&end))
    }

    fn trait_declaration(&mut self) -> Statement {
        let start = self.expect_keyword(KeywordId::Trait).location;
        let identifier = self.identifier();
        let type_parameters = self.optional_type_parameters();
        let bases = self.optional_bases();
        let documentation = self.type_body_preamble();

        let fields = self.fields();
        let mut methods = Vec::new();
        while self.at_keyword(KeywordId::Def) {
            methods.push(self.function_stub());
            self.skip_separators();
        }

        let end = self.expect(TokenType::Dedent, false).location;
        self.skip_separators();
        let trait_decl = TraitDecl {
            identifier,
            type_parameters,
            bases,
            documentation,
            fields,
            methods,
        };
        Statement::new(Stmt::Trait(trait_decl), start.merge(&end))
    }

    /// `var name Type ["doc"]` or `final name Type ["doc"]`
    fn field_declaration(&mut self) -> Field {
        let start = self.peek().location.clone();
        let is_final = self.consume_keyword(KeywordId::Final);
        if !is_final {
            self.expect_keyword(KeywordId::Var);
        }
        let identifier = self.identifier();
        let type_expr = self.type_expression();
        let documentation = self.optional_documentation();
        let location = start.merge(&type_expr.location);
        self.expect_statement_delimiter();
        Field {
            location,
            is_final,
            identifier,
            type_expr,
            documentation,
        }
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// `var name [Type] ["doc"] = value`
    ///
    /// The trailing delimiter is left in place and parses as a separate `Nop`.
    fn variable_declaration(&mut self) -> Statement {
        let start = self.peek().location.clone();
        let is_final = self.consume_keyword(KeywordId::Final);
        if !is_final {
            self.expect_keyword(KeywordId::Var);
        }
        let identifier = self.identifier();
        let type_expr = if self.at_symbol(SymbolId::Eq) || self.at(TokenType::String) {
            None
        } else {
            Some(self.type_expression())
        };
        let documentation = self.optional_documentation();
        self.expect_symbol(SymbolId::Eq);
        let value = self.parse_expression();
        let location = start.merge(&value.location);
        let variable = VariableDecl {
            documentation,
            is_final,
            identifier,
            type_expr,
            value,
        };
        Statement::new(Stmt::Variable(variable), location)
    }
}

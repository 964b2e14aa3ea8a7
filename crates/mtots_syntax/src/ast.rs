//! Abstract Syntax Tree definitions for mtots
//!
//! Statements and expressions are two closed families ([`Stmt`], [`Expr`]); every consumer matches on them
//! exhaustively. Nodes are immutable once the parser returns them.
//!
//! ## Notes
//! - Operators never appear as their own nodes: the parser desugars them into [`MethodCall`]s on magic method
//!   names, except the short-circuiting and identity forms kept in [`Operation`].
//! - Every [`Ident`] carries a [`NodeId`] unique within its file. The solver keys its per-identifier side tables
//!   on it, so a cloned identifier (e.g. an import alias defaulting to the imported member) is the same node.

use std::fmt;

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::position::Location;

/// Identity of an identifier node within one parsed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Identifiers made up after parsing (builtin members, dict-literal keys). They never share side-table
    /// entries with each other or with parsed nodes.
    pub const SYNTHETIC: NodeId = NodeId(u32::MAX);
}

/// A node with source location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Located<T> {
    pub node: T,
    pub location: Location,
}

impl<T> Located<T> {
    pub fn new(node: T, location: Location) -> Self {
        Self { node, location }
    }
}

pub type Expression = Located<Expr>;
pub type Statement = Located<Stmt>;

/// A name occurrence in source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub id: NodeId,
    pub name: String,
    pub location: Location,
}

impl Ident {
    /// An identifier that does not come from the parser.
    pub fn synthetic(name: impl Into<String>, location: Location) -> Self {
        Self {
            id: NodeId::SYNTHETIC,
            name: name.into(),
            location,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A dotted module path such as `a.b.c`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualifiedIdent {
    pub location: Location,
    /// Leading segments (`a`, `b` in `a.b.c`).
    pub parents: Vec<Ident>,
    /// Final segment (`c` in `a.b.c`).
    pub identifier: Ident,
}

impl fmt::Display for QualifiedIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for parent in &self.parents {
            write!(f, "{}.", parent.name)?;
        }
        f.write_str(&self.identifier.name)
    }
}

// ============================================================================
// File
// ============================================================================

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct File {
    pub location: Location,
    pub documentation: Option<String>,
    pub imports: Vec<Import>,
    pub statements: Vec<Statement>,
    /// Lexical and syntax errors collected while parsing.
    pub syntax_errors: Vec<Diagnostic>,
}

/// `import a.b [as c]` or `from a.b import c [as d]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Import {
    pub location: Location,
    pub module: QualifiedIdent,
    pub member: Option<Ident>,
    /// Name bound in the importing module: the explicit alias, else the member, else the module's last segment.
    pub alias: Ident,
}

// ============================================================================
// Type expressions
// ============================================================================

/// `Name`, `module.Name`, `Name[Args...]`.
///
/// ## Notes
/// - `T?` arrives here as `Optional[T]` and `A | B` as `Union[A, B]`.
/// - A dangling `module.` yields an identifier named `" "` at the dot, so member completion still has an anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeExpr {
    pub location: Location,
    pub qualifier: Option<Ident>,
    pub identifier: Ident,
    pub args: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeParameter {
    pub location: Location,
    pub identifier: Ident,
    pub bound: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub location: Location,
    pub identifier: Ident,
    pub type_expr: Option<TypeExpr>,
    pub default: Option<Expression>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Nop,
    Function(FunctionDecl),
    Class(ClassDecl),
    Trait(TraitDecl),
    Variable(VariableDecl),
    While(WhileStmt),
    For(ForStmt),
    If(IfStmt),
    Block(Block),
    Return(Expression),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub identifier: Ident,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeExpr>,
    /// Leading string literal of the body, if any. It stays in the body of ordinary functions.
    pub documentation: Option<String>,
    pub body: Located<Block>,
}

/// A `var`/`final` field declared in a class or trait body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub location: Location,
    pub is_final: bool,
    pub identifier: Ident,
    pub type_expr: TypeExpr,
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDecl {
    pub identifier: Ident,
    pub type_parameters: Vec<TypeParameter>,
    pub bases: Vec<TypeExpr>,
    pub documentation: Option<String>,
    pub static_methods: Vec<Located<FunctionDecl>>,
    pub fields: Vec<Field>,
    pub methods: Vec<Located<FunctionDecl>>,
}

/// Like a class, but with no statics and body-less method stubs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitDecl {
    pub identifier: Ident,
    pub type_parameters: Vec<TypeParameter>,
    pub bases: Vec<TypeExpr>,
    pub documentation: Option<String>,
    pub fields: Vec<Field>,
    pub methods: Vec<Located<FunctionDecl>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDecl {
    pub documentation: Option<String>,
    pub is_final: bool,
    pub identifier: Ident,
    pub type_expr: Option<TypeExpr>,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStmt {
    pub condition: Expression,
    pub body: Located<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStmt {
    pub variable: Ident,
    pub container: Expression,
    pub body: Located<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStmt {
    pub branches: Vec<(Expression, Located<Block>)>,
    pub fallback: Option<Located<Block>>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    GetVariable(Ident),
    SetVariable {
        identifier: Ident,
        value: Box<Expression>,
    },
    /// Placeholder left where an expression failed to parse.
    Error,
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    TypeAssertion {
        expression: Box<Expression>,
        type_expr: TypeExpr,
    },
    List(Vec<Expression>),
    FrozenList(Vec<Expression>),
    Tuple {
        identifier: Ident,
        items: Vec<Expression>,
    },
    Dict(Vec<(Expression, Expression)>),
    FrozenDict(Vec<(Expression, Expression)>),
    Lambda(Lambda),
    FunctionCall(FunctionCall),
    MethodCall(MethodCall),
    GetField {
        owner: Box<Expression>,
        identifier: Ident,
    },
    SetField {
        owner: Box<Expression>,
        identifier: Ident,
        value: Box<Expression>,
    },
    /// `owner.` with no member name yet; exists only to anchor member completion.
    Dot(Dot),
    Operation(Operation),
    Raise(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lambda {
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeExpr>,
    pub body: Box<Expression>,
}

/// Per-argument slot ranges, from the start of one argument to the start of the next (or the closing paren).
pub type ArgLocations = Option<Vec<Location>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub function: Box<Expression>,
    pub args: Vec<Expression>,
    pub kwargs: Vec<(Ident, Expression)>,
    #[serde(skip)]
    pub arg_locations: ArgLocations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodCall {
    pub owner: Box<Expression>,
    pub identifier: Ident,
    pub args: Vec<Expression>,
    pub kwargs: Vec<(Ident, Expression)>,
    #[serde(skip)]
    pub arg_locations: ArgLocations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dot {
    pub owner: Box<Expression>,
    pub dot_location: Location,
    /// Location of the token immediately following the `.`.
    pub follow_location: Location,
}

/// Operators that keep their own node instead of desugaring to a method call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Operation {
    Is(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    /// `if cond then a else b`
    If(Box<Expression>, Box<Expression>, Box<Expression>),
}

impl Expr {
    /// Return `true` for the literal forms that are trivially constant.
    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Nil | Expr::Bool(_) | Expr::Number(_) | Expr::String(_))
    }
}

//! Host syntax-tree and semantic-model query interface.
//!
//! The analysis never touches a concrete compiler API. Everything it needs
//! from the host (node shapes, symbol resolution, declarations, static types,
//! scope enumeration) goes through the [`AstQuery`] trait, so a host adapter
//! only has to answer these few questions.
//!
//! [`SyntaxModel`] is the bundled adapter: a serializable export of one source
//! file that any host can produce as JSON or YAML.
//!
//! ```
//! use sql_param_validator::syntax::{AstQuery, ExprKind, SyntaxModelBuilder};
//!
//! let mut b = SyntaxModelBuilder::new("Repo.cs");
//! let sql = b.literal("SELECT 1");
//! let sym = b.declare("sql", Some(sql));
//! let reference = b.reference(sym);
//! b.scope(&[sql, reference]);
//! let model = b.build().unwrap();
//!
//! assert_eq!(model.symbol(reference), Some(sym));
//! assert!(matches!(model.kind(sql), Some(ExprKind::Literal { .. })));
//! ```

mod builder;
mod model;
mod types;

pub use builder::SyntaxModelBuilder;
use indexmap::IndexSet;
pub use model::{ExprNode, ScopeNode, SymbolNode, SyntaxModel};
pub use types::{Declaration, ExprId, ExprKind, Location, ScopeId, Span, SymbolId};

/// Narrow view of a host's syntax tree and semantic model.
///
/// Every lookup answers `None` when the host has nothing to say; the analysis
/// turns that into an unresolved value instead of an error.
pub trait AstQuery {
    /// Path of the file the nodes belong to.
    fn file(&self) -> &str;

    /// Structural shape of an expression.
    fn kind(&self, expr: ExprId) -> Option<&ExprKind>;

    /// Source range of an expression.
    fn span(&self, expr: ExprId) -> Option<Span>;

    /// Symbol an expression refers to.
    fn symbol(&self, expr: ExprId) -> Option<SymbolId>;

    /// Declaring node of a symbol.
    fn declaration(&self, symbol: SymbolId) -> Option<&Declaration>;

    /// Static type name of an expression.
    fn static_type(&self, expr: ExprId) -> Option<&str>;

    /// Nearest variable declaration whose initializer is or contains `expr`.
    fn enclosing_declaration(&self, expr: ExprId) -> Option<SymbolId>;

    /// Scope whose statements contain `expr`.
    fn enclosing_scope(&self, expr: ExprId) -> Option<ScopeId>;

    /// All scopes of the file.
    fn scopes(&self) -> Vec<ScopeId>;

    /// Statement roots of a scope in source order.
    fn statements(&self, scope: ScopeId) -> &[ExprId];

    /// Location of an expression, falling back to an empty span.
    fn location(&self, expr: ExprId) -> Location {
        Location {
            file: self.file().to_string(),
            span: self.span(expr).unwrap_or_default()
        }
    }
}

/// Pre-order walk of `roots` and everything below them, in source order.
///
/// Each node is yielded once, so a malformed host graph cannot make the walk
/// loop.
pub fn descendants<Q: AstQuery + ?Sized>(query: &Q, roots: &[ExprId]) -> Vec<ExprId> {
    let mut seen = IndexSet::new();
    let mut stack: Vec<ExprId> = roots.iter().rev().copied().collect();
    while let Some(expr) = stack.pop() {
        if !seen.insert(expr) {
            continue;
        }
        if let Some(kind) = query.kind(expr) {
            stack.extend(kind.children().into_iter().rev());
        }
    }
    seen.into_iter().collect()
}

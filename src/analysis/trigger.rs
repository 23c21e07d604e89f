use super::types::ConstructionSite;
use crate::syntax::{AstQuery, ExprKind, ScopeId, descendants};

/// Constructions of `command_type` inside `scope`, in source order.
///
/// Matching is nominal: the constructed type name must equal `command_type`
/// exactly, so subclasses and wrappers are not matched.
pub fn find<Q: AstQuery + ?Sized>(
    query: &Q,
    scope: ScopeId,
    command_type: &str
) -> Vec<ConstructionSite> {
    descendants(query, query.statements(scope))
        .into_iter()
        .filter(|&expr| query.enclosing_scope(expr) == Some(scope))
        .filter(|&expr| {
            matches!(
                query.kind(expr),
                Some(ExprKind::Construct { type_name, .. }) if type_name == command_type
            )
        })
        .map(|expr| ConstructionSite {
            expr,
            scope,
            location: query.location(expr)
        })
        .collect()
}

/// Constructions of `command_type` across every scope of the file.
pub fn find_all<Q: AstQuery + ?Sized>(query: &Q, command_type: &str) -> Vec<ConstructionSite> {
    query
        .scopes()
        .into_iter()
        .flat_map(|scope| find(query, scope, command_type))
        .collect()
}

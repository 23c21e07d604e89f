//! Constant folding of text expressions.
//!
//! Literals fold to themselves, concatenations to the concatenation of their
//! folded sides, and anything else to the folded initializer of the symbol it
//! refers to. Only the first initializer counts; reassignments are not
//! tracked.
//!
//! Each declaration is folded once per call and its text reused, and the
//! folded text is capped at [`MAX_TEXT_LEN`] bytes, so declarations that
//! reference each other repeatedly stay linear in the size of the model.

use std::collections::HashMap;

use smallvec::SmallVec;

use super::types::{ConstantValue, Unresolved};
use crate::syntax::{AstQuery, ExprId, ExprKind, SymbolId};

/// Deepest expression nesting followed before giving up.
const MAX_DEPTH: usize = 512;

/// Longest folded text, in bytes.
pub const MAX_TEXT_LEN: usize = 1 << 20;

/// Fold `expr` to constant text.
pub fn fold<Q: AstQuery + ?Sized>(query: &Q, expr: ExprId) -> ConstantValue {
    ConstantFolder {
        query,
        in_progress: SmallVec::new(),
        resolved: HashMap::new()
    }
    .fold(expr, 0)
}

struct ConstantFolder<'q, Q: ?Sized> {
    query:       &'q Q,
    /// Declarations on the current resolution path
    in_progress: SmallVec<[SymbolId; 8]>,
    /// Declarations already folded during this call
    resolved:    HashMap<SymbolId, ConstantValue>
}

impl<Q: AstQuery + ?Sized> ConstantFolder<'_, Q> {
    fn fold(&mut self, expr: ExprId, depth: usize) -> ConstantValue {
        if depth > MAX_DEPTH {
            return Err(Unresolved::TooDeep);
        }
        let query = self.query;
        match query.kind(expr) {
            None => Err(Unresolved::UnknownNode),
            Some(ExprKind::Literal {
                value
            }) => Ok(value.clone()),
            Some(ExprKind::Concat {
                left,
                right
            }) => {
                let mut text = self.fold(*left, depth + 1)?;
                let right = self.fold(*right, depth + 1)?;
                if text.len() + right.len() > MAX_TEXT_LEN {
                    return Err(Unresolved::TooLong);
                }
                text.push_str(&right);
                Ok(text)
            }
            Some(_) => self.fold_symbol(expr, depth)
        }
    }

    fn fold_symbol(&mut self, expr: ExprId, depth: usize) -> ConstantValue {
        let query = self.query;
        let symbol = query.symbol(expr).ok_or(Unresolved::NoSymbol)?;
        if self.in_progress.contains(&symbol) {
            return Err(Unresolved::Cycle);
        }
        if let Some(value) = self.resolved.get(&symbol) {
            return value.clone();
        }
        let declaration = query.declaration(symbol).ok_or(Unresolved::NoDeclaration)?;
        let initializer = declaration.initializer.ok_or(Unresolved::NoInitializer)?;

        self.in_progress.push(symbol);
        let value = self.fold(initializer, depth + 1);
        self.in_progress.pop();
        // Cycle and depth failures depend on the path taken to get here
        if !matches!(value, Err(Unresolved::Cycle | Unresolved::TooDeep)) {
            self.resolved.insert(symbol, value.clone());
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxModelBuilder;

    #[test]
    fn test_literal_folds_to_itself() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let lit = b.literal("SELECT * FROM T");
        let model = b.build().unwrap();
        assert_eq!(fold(&model, lit), Ok("SELECT * FROM T".to_string()));
    }

    #[test]
    fn test_concat_of_literals() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let left = b.literal("SELECT * FROM ");
        let right = b.literal("T");
        let concat = b.concat(left, right);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, concat), Ok("SELECT * FROM T".to_string()));
    }

    #[test]
    fn test_concat_is_all_or_nothing() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let left = b.literal("SELECT * FROM ");
        let table = b.external("TableName");
        let right = b.identifier("TableName", Some(table));
        let concat = b.concat(left, right);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, concat), Err(Unresolved::NoDeclaration));
    }

    #[test]
    fn test_follows_initializer_chain() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let table_lit = b.literal("Users");
        let table = b.declare("table", Some(table_lit));
        let head = b.literal("SELECT * FROM ");
        let table_ref = b.reference(table);
        let sql_init = b.concat(head, table_ref);
        let sql = b.declare("sql", Some(sql_init));
        let sql_ref = b.reference(sql);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, sql_ref), Ok("SELECT * FROM Users".to_string()));
    }

    #[test]
    fn test_member_access_resolves_through_symbol() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let init = b.literal("SELECT 1");
        let constant = b.declare("Queries.One", Some(init));
        let owner = b.identifier("Queries", None);
        let access = b.member(owner, "One");
        b.bind(access, constant);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, access), Ok("SELECT 1".to_string()));
    }

    #[test]
    fn test_missing_symbol_and_initializer() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let call = b.other(&[]);
        let sym = b.declare("sql", None);
        let reference = b.reference(sym);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, call), Err(Unresolved::NoSymbol));
        assert_eq!(fold(&model, reference), Err(Unresolved::NoInitializer));
        assert_eq!(fold(&model, ExprId(42)), Err(Unresolved::UnknownNode));
    }

    #[test]
    fn test_self_reference_terminates() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let sym = b.declare("sql", None);
        let head = b.literal("SELECT ");
        let reference = b.reference(sym);
        let init = b.concat(head, reference);
        b.initialize(sym, init);
        let outer = b.reference(sym);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, outer), Err(Unresolved::Cycle));
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let a = b.declare("a", None);
        let c = b.declare("c", None);
        let a_init = b.reference(c);
        let c_init = b.reference(a);
        b.initialize(a, a_init).initialize(c, c_init);
        let start = b.reference(a);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, start), Err(Unresolved::Cycle));
    }

    #[test]
    fn test_same_symbol_twice_is_not_a_cycle() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let lit = b.literal("x");
        let sym = b.declare("x", Some(lit));
        let left = b.reference(sym);
        let right = b.reference(sym);
        let concat = b.concat(left, right);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, concat), Ok("xx".to_string()));
    }

    /// `s0 = "<leaf>"` and `s(i) = s(i-1) + s(i-1)`; returns a reference to
    /// the last level.
    fn doubling_chain(b: &mut SyntaxModelBuilder, leaf: &str, levels: usize) -> ExprId {
        let lit = b.literal(leaf);
        let mut previous = b.declare("s0", Some(lit));
        for level in 1..=levels {
            let left = b.reference(previous);
            let right = b.reference(previous);
            let init = b.concat(left, right);
            previous = b.declare(format!("s{}", level), Some(init));
        }
        b.reference(previous)
    }

    #[test]
    fn test_repeated_references_stop_at_length_cap() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let top = doubling_chain(&mut b, "SELECT 1 ", 64);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, top), Err(Unresolved::TooLong));
    }

    #[test]
    fn test_repeated_empty_references_fold_once_each() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let top = doubling_chain(&mut b, "", 64);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, top), Ok(String::new()));
    }

    #[test]
    fn test_text_within_cap_still_folds() {
        let mut b = SyntaxModelBuilder::new("a.cs");
        let top = doubling_chain(&mut b, "ab", 10);
        let model = b.build().unwrap();
        assert_eq!(fold(&model, top).map(|t| t.len()), Ok(2048));
    }
}

mod expr;
mod set_expr;
mod table;

use compact_str::CompactString;
pub use expr::extract_columns_from_expr;
use indexmap::IndexSet;
pub use set_expr::extract_from_set_expr;

/// Context for extracting statement shape
pub struct ExtractionContext<'a> {
    pub tables:      &'a mut IndexSet<CompactString>,
    pub columns:     &'a mut IndexSet<CompactString>,
    pub has_derived: &'a mut bool
}

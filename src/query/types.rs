use compact_str::CompactString;
use serde::Serialize;
use smallvec::SmallVec;

/// Type alias for small column vectors (typically < 8 elements)
pub type ColumnVec = SmallVec<[CompactString; 8]>;

/// Kind of SQL statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other
}

/// Object names a statement touches, as written in the command text.
#[derive(Debug, Clone, Serialize)]
pub struct StatementShape {
    pub raw:         String,
    pub kind:        StatementKind,
    /// Referenced tables and views, qualified names kept whole
    pub tables:      Vec<CompactString>,
    /// Referenced columns, qualifiers dropped
    pub columns:     ColumnVec,
    pub cte_names:   Vec<CompactString>,
    /// A derived table hides which columns are in scope
    pub has_derived: bool
}

impl StatementShape {
    pub fn new(raw: String, kind: StatementKind) -> Self {
        Self {
            raw,
            kind,
            tables: Vec::new(),
            columns: ColumnVec::new(),
            cte_names: Vec::new(),
            has_derived: false
        }
    }

    /// Whether `name` refers to a common table expression of this statement
    pub fn is_cte(&self, name: &str) -> bool {
        self.cte_names.iter().any(|c| c.eq_ignore_ascii_case(name))
    }
}

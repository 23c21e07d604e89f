//! Identifier, position and node-shape types shared by every host adapter.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

macro_rules! node_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Position of the node in its owning table.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

node_id!(
    /// Handle to an expression node in the host syntax tree.
    ExprId
);
node_id!(
    /// Identity of a declared symbol (variable, field, constant).
    SymbolId
);
node_id!(
    /// Handle to a block-like scope whose statements are enumerated in order.
    ScopeId
);

/// One-based source range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub line:       u32,
    pub column:     u32,
    #[serde(default)]
    pub end_line:   u32,
    #[serde(default)]
    pub end_column: u32
}

impl Span {
    pub fn new(line: u32, column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// File plus span; the place a diagnostic is reported at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub span: Span
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.span)
    }
}

/// Structural shape of an expression node.
///
/// Only the shapes the analysis dispatches on are distinguished; everything
/// else is [`ExprKind::Other`], which still exposes its children so nested
/// calls remain reachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprKind {
    /// Text literal, already unescaped by the host
    Literal { value: String },
    /// `left + right` on text operands
    Concat { left: ExprId, right: ExprId },
    /// Bare name reference
    Identifier { name: String },
    /// `target.member`
    MemberAccess { target: ExprId, member: String },
    /// `callee(args...)`
    Call {
        callee: ExprId,
        #[serde(default)]
        args:   Vec<ExprId>
    },
    /// `new type_name(args...)`
    Construct {
        type_name: String,
        #[serde(default)]
        args:      Vec<ExprId>
    },
    /// Any other node
    Other {
        #[serde(default)]
        children: Vec<ExprId>
    }
}

impl ExprKind {
    /// Direct children in source order.
    pub fn children(&self) -> SmallVec<[ExprId; 4]> {
        match self {
            Self::Literal {
                ..
            }
            | Self::Identifier {
                ..
            } => SmallVec::new(),
            Self::Concat {
                left,
                right
            } => smallvec![*left, *right],
            Self::MemberAccess {
                target, ..
            } => smallvec![*target],
            Self::Call {
                callee,
                args
            } => {
                let mut children = SmallVec::with_capacity(args.len() + 1);
                children.push(*callee);
                children.extend(args.iter().copied());
                children
            }
            Self::Construct {
                args, ..
            } => args.iter().copied().collect(),
            Self::Other {
                children
            } => children.iter().copied().collect()
        }
    }
}

/// Declaring node of a symbol.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(default)]
    pub span:        Span,
    /// First initializer; later reassignments are not tracked
    #[serde(default)]
    pub initializer: Option<ExprId>
}

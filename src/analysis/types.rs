use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;

use super::dummy::DummyValue;
use crate::syntax::{ExprId, Location, ScopeId};

/// Why an expression could not be folded to constant text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unresolved {
    /// Not a literal or concatenation and no symbol behind it
    NoSymbol,
    /// Symbol declared outside what the host can see
    NoDeclaration,
    /// Declaration without an initializer
    NoInitializer,
    /// Declaration already being resolved further up
    Cycle,
    /// Node the host does not know
    UnknownNode,
    /// Construction without a command-text argument
    MissingArgument,
    /// Nesting deeper than the folder is willing to follow
    TooDeep,
    /// Folded text longer than the folder is willing to build
    TooLong
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NoSymbol => "expression has no symbol",
            Self::NoDeclaration => "symbol has no visible declaration",
            Self::NoInitializer => "declaration has no initializer",
            Self::Cycle => "declaration refers back to itself",
            Self::UnknownNode => "unknown syntax node",
            Self::MissingArgument => "construction has no command text argument",
            Self::TooDeep => "expression nesting too deep",
            Self::TooLong => "folded text too long"
        };
        f.write_str(reason)
    }
}

/// Resolved constant text, or why it is not a constant.
///
/// Never partial: a concatenation with an unresolved side is unresolved.
pub type ConstantValue = Result<String, Unresolved>;

/// A parameter registered on a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamBinding {
    pub name:     ConstantValue,
    /// Location of the registration call
    pub location: Location,
    /// Placeholder standing in for the runtime value, `None` when strict
    /// synthesis refused the value type
    pub value:    Option<DummyValue>
}

pub type Bindings = SmallVec<[ParamBinding; 4]>;

/// Registration whose value type has no placeholder under strict synthesis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmappedParameter {
    pub name:      ConstantValue,
    /// `None` when the host reported no static type
    pub type_name: Option<String>,
    pub location:  Location
}

/// Construction of the target command type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionSite {
    pub expr:     ExprId,
    pub scope:    ScopeId,
    pub location: Location
}

/// Everything the rules and the probe need to know about one site.
#[derive(Debug, Clone, Serialize)]
pub struct SiteAnalysis {
    /// Position of the site across the whole run
    pub index:        usize,
    pub location:     Location,
    pub command_text: ConstantValue,
    /// Every registration, unmapped ones included
    pub bindings:     Bindings,
    /// Registrations refused under strict synthesis, in source order
    pub unmapped:     Vec<UnmappedParameter>
}

/// Output of binding collection for one site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedBindings {
    pub bindings: Bindings,
    pub unmapped: Vec<UnmappedParameter>
}

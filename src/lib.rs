//! # SQL Parameter Validator Library
//!
//! Static analysis of SQL command construction sites in exported syntax
//! models.
//!
//! For every construction of the configured command type the library folds
//! the command text to a constant, collects the parameters registered on the
//! command, reports each parameter whose placeholder never appears in the
//! text and, when a connection is configured, probes the text against a
//! schema with placeholder values bound in.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod probe;
pub mod query;
pub mod rules;
pub mod schema;
pub mod syntax;

//! Application logic for the SQL Parameter Validator CLI.
//!
//! This module contains the core application logic separated from the main
//! entry point to enable testing.

mod analyze;
mod convert;
mod helpers;
mod types;

pub use analyze::run_analyze;
pub use convert::{convert_dialect, convert_format};
pub use helpers::{
    apply_cli_overrides, calculate_exit_code, create_output_options, load_models, open_connection,
    read_model_input
};
pub use types::{AnalyzeParams, AnalyzeResult};

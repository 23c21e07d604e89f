use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SQL Parameter Validator - Find unused SQL command parameters and probe
/// command text against a schema
#[derive(Parser, Debug)]
#[command(name = "sql-param-validator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze exported syntax models
    Analyze {
        /// Syntax model files, JSON or YAML (use - for JSON on stdin)
        #[arg(required = true)]
        models: Vec<PathBuf>,

        /// Schema probe target: http(s):// URL, file:<path> or a .sql file
        #[arg(short, long)]
        connection: Option<String>,

        /// SQL dialect for schema files and command text
        #[arg(long, value_enum)]
        dialect: Option<Dialect>,

        /// Fail on parameter values with no placeholder type
        #[arg(long)]
        strict_types: bool,

        /// Match placeholders case-insensitively
        #[arg(long)]
        ignore_case: bool,

        /// Skip the schema probe even when a connection is configured
        #[arg(long)]
        no_probe: bool,

        /// Per-site schema probe timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Show resolved command text, bindings and probe outcome per site
        #[arg(short, long)]
        verbose: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Dialect {
    Mssql,
    Generic,
    Mysql,
    Postgresql,
    Sqlite
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml,
    Sarif
}

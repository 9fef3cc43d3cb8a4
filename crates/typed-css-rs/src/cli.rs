//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use dts_content::{CamelCaseMode, DtsOptions};

/// Generate TypeScript declaration files for CSS Modules.
#[derive(Debug, Parser)]
#[command(name = "typed-css-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory (or single stylesheet) to generate declarations for
    #[arg(default_value = ".")]
    pub input: Utf8PathBuf,

    /// Glob pattern selecting stylesheets under the input directory
    #[arg(short = 'p', long, default_value = "**/*.css")]
    pub pattern: String,

    /// Write declarations under this directory instead of next to each
    /// stylesheet
    #[arg(short = 'o', long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Watch for changes and regenerate
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Convert token names (camel, or dashes to convert only `-x` pairs)
    #[arg(short = 'c', long = "camel-case", value_enum, num_args = 0..=1, default_missing_value = "camel")]
    pub camel_case: Option<CamelCaseArg>,

    /// Emit named exports instead of an `export =` object
    #[arg(short = 'e', long = "named-exports")]
    pub named_exports: bool,

    /// Replace the stylesheet extension in the output filename
    /// (`a.css` becomes `a.d.ts` instead of `a.css.d.ts`)
    #[arg(short = 'd', long = "drop-extension")]
    pub drop_extension: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Suppress per-file output
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// List files that would be processed, then exit
    #[arg(long = "list-files")]
    pub list_files: bool,
}

/// Token name conversion options.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CamelCaseArg {
    /// Full camelCase conversion
    Camel,
    /// Convert only dash-separated pairs
    Dashes,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}

impl Args {
    /// Returns the declaration formatting options implied by the flags.
    pub fn dts_options(&self) -> DtsOptions {
        DtsOptions {
            camel_case: match self.camel_case {
                None => CamelCaseMode::Preserve,
                Some(CamelCaseArg::Camel) => CamelCaseMode::Camel,
                Some(CamelCaseArg::Dashes) => CamelCaseMode::Dashes,
            },
            named_exports: self.named_exports,
            drop_extension: self.drop_extension,
        }
    }
}

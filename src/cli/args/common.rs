//! Common CLI types

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - progress lines for humans (default)
    #[default]
    Pretty,
    /// JSON format - a single summary document for scripts/CI
    Json,
}

//! Output for CLI progress and results

use colored::Colorize;

use crate::cli::OutputFormat;

pub mod json;

/// Prints progress lines according to the output format.
///
/// In pretty mode everything goes to stdout. In JSON mode stdout is reserved
/// for the final summary document, so informational lines are dropped and
/// warnings/failures go to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        if self.format == OutputFormat::Pretty {
            println!("{}", message.as_ref());
        }
    }

    pub fn success(&self, message: impl AsRef<str>) {
        if self.format == OutputFormat::Pretty {
            println!("{} {}", "✓".green(), message.as_ref());
        }
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        match self.format {
            OutputFormat::Pretty => println!("{} {}", "⚠".yellow(), message.as_ref()),
            OutputFormat::Json => eprintln!("Warning: {}", message.as_ref()),
        }
    }

    pub fn failure(&self, message: impl AsRef<str>) {
        match self.format {
            OutputFormat::Pretty => println!("{} {}", "✗".red(), message.as_ref()),
            OutputFormat::Json => eprintln!("{}", message.as_ref()),
        }
    }
}

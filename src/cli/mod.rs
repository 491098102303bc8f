//! CLI definition and handlers

use clap::Parser;

use crate::client::models::BusinessCriticality;

pub mod args;
pub mod context;
pub mod link;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;
pub use link::LinkRequest;

const AFTER_HELP: &str = "\
Business criticality (--criticality, -c):
  Mandatory if no application profile exists for <NAME>.
  Sets the business criticality of the new application profile:
    VH - Very High, H - High, M - Medium, L - Low, VL - Very Low
  example: -c VH

Credentials are read from VERACODE_API_KEY_ID and VERACODE_API_KEY_SECRET,
or from the [default] profile of ~/.veracode/credentials.

EXIT STATUS:
  0  run completed (including when the application or scan was rejected)
  1  network, credential or API error
  2  invalid or missing arguments";

/// Start a Dynamic Analysis of a URL linked to a Veracode application profile
#[derive(Parser, Debug)]
#[command(name = "da-app-link")]
#[command(version, about, long_about = None, after_help = AFTER_HELP)]
pub struct Cli {
    /// Application profile to link the scan to (searched by name)
    #[arg(
        short = 'a',
        long = "application_name",
        visible_alias = "application-name",
        value_name = "NAME"
    )]
    pub application_name: String,

    /// URL to scan
    #[arg(
        short = 'u',
        long = "target_url",
        visible_alias = "target-url",
        alias = "url",
        value_name = "URL"
    )]
    pub target_url: String,

    /// Business criticality for a new application profile (VH, H, M, L, VL)
    #[arg(short = 'c', long, value_name = "CRITICALITY")]
    pub criticality: Option<BusinessCriticality>,

    /// Start the scan right away (disabled by default)
    #[arg(short = 'n', long)]
    pub start_now: bool,

    /// Verbose output: log requests and responses
    #[arg(short = 'd', long, env = "DA_APP_LINK_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Output format (pretty, json)
    #[arg(
        long,
        env = "DA_APP_LINK_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Credentials profile to use
    #[arg(long, env = "VERACODE_API_PROFILE", hide_env = true)]
    pub profile: Option<String>,

    /// Override credentials file location
    #[arg(long, env = "VERACODE_API_CREDENTIALS_FILE", hide_env = true)]
    pub credentials_file: Option<String>,

    /// Custom API host for development/testing
    #[arg(long, env = "VERACODE_API_HOST", hide = true)]
    pub api_host: Option<String>,
}

impl Cli {
    /// The linking request described by the parsed flags
    pub fn link_request(&self) -> LinkRequest {
        LinkRequest {
            application_name: self.application_name.clone(),
            target_url: self.target_url.clone(),
            criticality: self.criticality,
            start_now: self.start_now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("da-app-link").chain(args.iter().copied()))
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&["-a", "AcmeApp", "-u", "https://acme.example.com", "-c", "vh", "-n", "-d"])
            .unwrap();

        let request = cli.link_request();
        assert_eq!(request.application_name, "AcmeApp");
        assert_eq!(request.target_url, "https://acme.example.com");
        assert_eq!(request.criticality, Some(BusinessCriticality::VeryHigh));
        assert!(request.start_now);
        assert!(cli.debug);
    }

    #[test]
    fn test_long_flags() {
        let cli = parse(&[
            "--application_name=AcmeApp",
            "--target_url=https://acme.example.com",
            "--criticality=M",
        ])
        .unwrap();

        assert_eq!(cli.application_name, "AcmeApp");
        assert_eq!(cli.target_url, "https://acme.example.com");
        assert_eq!(cli.criticality, Some(BusinessCriticality::Medium));
        assert!(!cli.start_now);
    }

    #[test]
    fn test_url_alias() {
        let cli = parse(&["-a", "AcmeApp", "--url", "https://acme.example.com"]).unwrap();
        assert_eq!(cli.target_url, "https://acme.example.com");
    }

    #[test]
    fn test_missing_required_arguments() {
        let err = parse(&["-a", "AcmeApp"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = parse(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_invalid_criticality() {
        let err = parse(&["-a", "AcmeApp", "-u", "https://a.example", "-c", "extreme"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_unknown_flag() {
        let err = parse(&["-a", "AcmeApp", "-u", "https://a.example", "-z"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help_is_not_an_error_exit() {
        let err = parse(&["-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }
}

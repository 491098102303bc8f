//! Link a dynamic analysis to an application profile
//!
//! The run searches for the application profile, creates it when the search
//! finds nothing usable, and submits a scan linked to the profile's uuid:
//!
//! ```text
//! SEARCHING -> FOUND | AMBIGUOUS_EXACT  -> LAUNCHING
//!           -> EMPTY | AMBIGUOUS_NONE   -> CREATING -> SEARCHING (once) -> LAUNCHING
//! ```
//!
//! A profile is created at most once per run. If the search after creation
//! still cannot pick a profile, the run ends without launching.

use log::debug;
use serde::Serialize;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::models::BusinessCriticality;
use crate::client::{
    AnalysisRequest, ApiReply, CreateApplicationRequest, PlatformApplication, VeracodeApi,
};
use crate::error::Result;
use crate::output::{Reporter, json};

/// Status returned by the platform when an application profile is created
const APPLICATION_CREATED: u16 = 200;

/// Status returned by the platform when an analysis is created
const ANALYSIS_CREATED: u16 = 201;

/// What to link, as given on the command line
#[derive(Debug, Clone)]
pub struct LinkRequest {
    pub application_name: String,
    pub target_url: String,
    pub criticality: Option<BusinessCriticality>,
    pub start_now: bool,
}

/// Classification of an application search
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Exactly one application matched the search
    Found(PlatformApplication),
    /// Several matched and one carries exactly the searched name
    ExactMatch(PlatformApplication),
    /// Several matched but none carries exactly the searched name
    NoExactMatch,
    /// Nothing matched
    Empty,
}

impl Resolution {
    pub fn classify(mut apps: Vec<PlatformApplication>, name: &str) -> Self {
        match apps.len() {
            0 => Resolution::Empty,
            1 => Resolution::Found(apps.remove(0)),
            _ => match apps.into_iter().find(|app| app.name == name) {
                Some(app) => Resolution::ExactMatch(app),
                None => Resolution::NoExactMatch,
            },
        }
    }

    pub fn into_application(self) -> Option<PlatformApplication> {
        match self {
            Resolution::Found(app) | Resolution::ExactMatch(app) => Some(app),
            Resolution::NoExactMatch | Resolution::Empty => None,
        }
    }
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOutcome {
    /// The analysis was created
    ScanCreated,
    /// The platform refused the analysis request
    ScanRejected,
    /// The application profile was needed but could not be created
    ApplicationNotCreated,
    /// The profile was created but the following search still could not pick one
    Unresolved,
}

/// Result of a run, printed with `--format json`
#[derive(Debug, Clone, Serialize)]
pub struct LinkSummary {
    pub outcome: LinkOutcome,
    pub search_term: String,
    pub target_url: String,
    pub application: Option<PlatformApplication>,
    pub application_created: bool,
    pub scan_name: Option<String>,
    pub started_now: bool,
    /// Status of the last write request, if one was made
    pub status: Option<u16>,
}

impl LinkSummary {
    fn new(request: &LinkRequest) -> Self {
        Self {
            outcome: LinkOutcome::Unresolved,
            search_term: request.application_name.clone(),
            target_url: request.target_url.clone(),
            application: None,
            application_created: false,
            scan_name: None,
            started_now: false,
            status: None,
        }
    }

    fn finish(mut self, outcome: LinkOutcome) -> Self {
        self.outcome = outcome;
        self
    }
}

/// Run the link command.
///
/// A run that ends without a scan still completes normally; the outcome is
/// reported on the console and in the JSON summary.
pub async fn run(ctx: &CommandContext, request: &LinkRequest) -> Result<LinkOutcome> {
    let reporter = Reporter::new(ctx.format);
    let summary = link_scan(ctx.client.as_ref(), request, &reporter).await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", json::format_json(&summary)?);
    }

    Ok(summary.outcome)
}

/// Resolve (creating if needed) the application and launch the scan
pub async fn link_scan<C: VeracodeApi + ?Sized>(
    client: &C,
    request: &LinkRequest,
    reporter: &Reporter,
) -> Result<LinkSummary> {
    let mut summary = LinkSummary::new(request);
    let name = request.application_name.as_str();

    reporter.info(format!(
        "Initializing scan for url: {} and search query {}",
        request.target_url, name
    ));

    let mut application = resolve(client, name, reporter).await?;

    if application.is_none() {
        summary.status = create(client, name, request.criticality, reporter).await?;
        if summary.status != Some(APPLICATION_CREATED) {
            return Ok(summary.finish(LinkOutcome::ApplicationNotCreated));
        }
        summary.application_created = true;

        application = resolve(client, name, reporter).await?;
    }

    let Some(application) = application else {
        reporter.failure(format!(
            "Application '{}' was created but could not be selected; not retrying.",
            name
        ));
        return Ok(summary.finish(LinkOutcome::Unresolved));
    };

    let analysis = AnalysisRequest::linked(&application.uuid, &request.target_url, request.start_now);
    let reply = launch(client, &application, name, &analysis, reporter).await?;

    let outcome = if reply.status == ANALYSIS_CREATED {
        reporter.success("Successfully created applinked scan.");
        if request.start_now {
            reporter.success("Successfully started scanning the application");
        }
        summary.started_now = request.start_now;
        LinkOutcome::ScanCreated
    } else {
        reporter.failure(format!("Unable to create DAST scan: {}", reply.status));
        LinkOutcome::ScanRejected
    };

    summary.application = Some(application);
    summary.scan_name = Some(analysis.name);
    summary.status = Some(reply.status);
    Ok(summary.finish(outcome))
}

/// Search for the application and pick one, if possible
async fn resolve<C: VeracodeApi + ?Sized>(
    client: &C,
    name: &str,
    reporter: &Reporter,
) -> Result<Option<PlatformApplication>> {
    let apps = client.search_applications(name).await?;
    let count = apps.len();
    debug!("Search for '{}' returned {} application(s)", name, count);

    if count > 1 {
        reporter.warn(format!("Multiple applications found for {}", name));
        reporter.info("Looking for exact match: ");
    }

    let resolution = Resolution::classify(apps, name);
    match &resolution {
        Resolution::Found(_) => reporter.info("Application found"),
        Resolution::ExactMatch(_) => reporter.info("Exact match found"),
        Resolution::NoExactMatch => reporter.warn("No exact match found."),
        Resolution::Empty => reporter.warn("No applications defined, creating new application."),
    }

    Ok(resolution.into_application())
}

/// Create the application profile.
///
/// Returns the response status, or `None` when no request was sent.
async fn create<C: VeracodeApi + ?Sized>(
    client: &C,
    name: &str,
    criticality: Option<BusinessCriticality>,
    reporter: &Reporter,
) -> Result<Option<u16>> {
    let Some(criticality) = criticality else {
        reporter.failure(
            "To create an application, it is necessary to provide a business criticality (--criticality, -c)",
        );
        return Ok(None);
    };

    reporter.info(format!(
        "Creating application called: {} (business criticality {} - {})",
        name,
        criticality,
        criticality.label()
    ));

    let body = CreateApplicationRequest::new(name, criticality);
    debug!(
        "Create application request:\n{}",
        serde_json::to_string_pretty(&body)?
    );

    let reply = client.create_application(&body).await?;
    log_reply(&reply);

    if reply.status == APPLICATION_CREATED {
        reporter.success("Successfully created application profile.");
    } else {
        reporter.failure(format!(
            "Unable to create application profile: {}",
            reply.status
        ));
    }

    Ok(Some(reply.status))
}

/// Submit the linked analysis
async fn launch<C: VeracodeApi + ?Sized>(
    client: &C,
    application: &PlatformApplication,
    search_term: &str,
    analysis: &AnalysisRequest,
    reporter: &Reporter,
) -> Result<ApiReply> {
    reporter.info(format!(
        "Starting Dynamic Analysis for uuid '{}' and application name '{}' for search term '{}'",
        application.uuid, application.name, search_term
    ));

    debug!(
        "Create analysis request:\n{}",
        serde_json::to_string_pretty(analysis)?
    );

    let reply = client.create_analysis(analysis).await?;
    log_reply(&reply);

    Ok(reply)
}

fn log_reply(reply: &ApiReply) {
    debug!("status code {}", reply.status);
    if let Some(body) = &reply.body {
        debug!("{}", body);
    }
}

//! Veracode API data models
//!
//! Request bodies are typed and serialized with serde; responses are
//! deserialized leniently, ignoring fields the tool does not use.

mod app;
mod scan;

pub use app::{BusinessCriticality, CreateApplicationRequest, PlatformApplication, PlatformApplicationsPage};
pub use scan::AnalysisRequest;

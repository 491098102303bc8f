//! Dynamic analysis (scan) request models

use serde::Serialize;

/// Request body for `POST /was/configservice/v1/analyses`
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    /// Analysis name, shown in the platform
    pub name: String,

    pub scans: Vec<ScanRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

/// One scan inside an analysis, linked to an application profile
#[derive(Debug, Clone, Serialize)]
pub struct ScanRequest {
    pub linked_platform_app_uuid: String,
    pub scan_config_request: ScanConfigRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanConfigRequest {
    pub target_url: TargetUrl,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetUrl {
    pub url: String,

    /// Probe both the HTTP and HTTPS variants of the URL
    pub http_and_https: bool,

    pub directory_restriction_type: DirectoryRestriction,
}

/// How far the crawler may wander from the target URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectoryRestriction {
    DirectoryAndSubdirectory,
}

/// Analysis schedule
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    /// Start as soon as the analysis is created
    pub now: bool,
    pub duration: ScheduleDuration,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDuration {
    pub length: u32,
    pub unit: DurationUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationUnit {
    Day,
}

impl Schedule {
    /// Start immediately and run for at most one day
    pub fn start_now() -> Self {
        Self {
            now: true,
            duration: ScheduleDuration {
                length: 1,
                unit: DurationUnit::Day,
            },
        }
    }
}

impl AnalysisRequest {
    /// Build a scan of `url` linked to the application `app_uuid`.
    ///
    /// The analysis is named after the URL.
    pub fn linked(app_uuid: &str, url: &str, start_now: bool) -> Self {
        Self {
            name: url.to_string(),
            scans: vec![ScanRequest {
                linked_platform_app_uuid: app_uuid.to_string(),
                scan_config_request: ScanConfigRequest {
                    target_url: TargetUrl {
                        url: url.to_string(),
                        http_and_https: true,
                        directory_restriction_type: DirectoryRestriction::DirectoryAndSubdirectory,
                    },
                },
            }],
            schedule: start_now.then(Schedule::start_now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_linked_request_shape() {
        let body =
            serde_json::to_value(AnalysisRequest::linked("1234", "https://acme.example.com", false))
                .unwrap();

        assert_eq!(
            body,
            json!({
                "name": "https://acme.example.com",
                "scans": [{
                    "linked_platform_app_uuid": "1234",
                    "scan_config_request": {
                        "target_url": {
                            "url": "https://acme.example.com",
                            "http_and_https": true,
                            "directory_restriction_type": "DIRECTORY_AND_SUBDIRECTORY"
                        }
                    }
                }]
            })
        );
    }

    #[test]
    fn test_no_schedule_unless_start_now() {
        let body =
            serde_json::to_value(AnalysisRequest::linked("1234", "https://a.example", false))
                .unwrap();
        assert!(body.get("schedule").is_none());
    }

    #[test]
    fn test_start_now_schedule() {
        let body =
            serde_json::to_value(AnalysisRequest::linked("1234", "https://a.example", true))
                .unwrap();

        assert_eq!(body["schedule"]["now"], json!(true));
        assert_eq!(body["schedule"]["duration"]["length"], json!(1));
        assert_eq!(body["schedule"]["duration"]["unit"], json!("DAY"));
    }

    #[test]
    fn test_url_with_json_characters_is_escaped() {
        let url = r#"https://acme.example.com/?q="x"&t={scan_name}"#;
        let request = AnalysisRequest::linked("1234", url, false);
        let text = serde_json::to_string(&request).unwrap();
        let body: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(body["name"], url);
        assert_eq!(body["scans"][0]["scan_config_request"]["target_url"]["url"], url);
    }
}

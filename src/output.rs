//! Structured output writer supporting JSON and styled text modes.

use crate::cli_style;
use crate::config::OutputFormat;
use crate::error::{Ambiguity, FreightyardError};
use freightyard_core_manifest::{Chart, FreightReference, GitCommit, Image, Origin};
use serde::Serialize;

/// An artifact located in the Freight pool
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArtifactRef<'a> {
    Commit(&'a GitCommit),
    Image(&'a Image),
    Chart(&'a Chart),
}

impl ArtifactRef<'_> {
    fn details(&self) -> Vec<(&'static str, String)> {
        match self {
            ArtifactRef::Commit(commit) => {
                let mut rows = vec![
                    ("Repository", commit.repo_url.clone()),
                    ("Commit", commit.id.clone()),
                ];
                if let Some(tag) = &commit.tag {
                    rows.push(("Tag", tag.clone()));
                }
                if let Some(branch) = &commit.branch {
                    rows.push(("Branch", branch.clone()));
                }
                rows
            }
            ArtifactRef::Image(image) => {
                let mut rows = vec![
                    ("Repository", image.repo_url.clone()),
                    ("Tag", image.tag.clone()),
                ];
                if let Some(digest) = &image.digest {
                    rows.push(("Digest", digest.clone()));
                }
                rows
            }
            ArtifactRef::Chart(chart) => vec![
                ("Repository", chart.repo_url.clone()),
                ("Chart", chart.name.clone()),
                ("Version", chart.version.clone()),
            ],
        }
    }
}

/// Outcome of one resolve command
#[derive(Debug, Serialize)]
pub struct ResolutionReport<'a> {
    pub operation: &'static str,
    pub project: &'a str,
    pub repo_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<&'a str>,
    /// Origin the artifact was attributed to, if one could be identified
    pub origin: Option<String>,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactRef<'a>>,
    /// Name of the Freight the artifact came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freight: Option<&'a str>,
    /// Content ID of that Freight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freight_id: Option<String>,
}

impl<'a> ResolutionReport<'a> {
    pub fn new(
        operation: &'static str,
        project: &'a str,
        repo_url: &'a str,
        origin: Option<&Origin>,
        artifact: Option<ArtifactRef<'a>>,
    ) -> Self {
        Self {
            operation,
            project,
            repo_url,
            chart: None,
            origin: origin.map(Origin::to_string),
            found: artifact.is_some(),
            artifact,
            freight: None,
            freight_id: None,
        }
    }

    pub fn with_freight(mut self, freight: &'a FreightReference) -> Self {
        self.freight = (!freight.name.is_empty()).then_some(freight.name.as_str());
        self.freight_id = Some(freight.content_id());
        self
    }

    pub fn with_chart(mut self, chart: &'a str) -> Self {
        self.chart = (!chart.is_empty()).then_some(chart);
        self
    }
}

/// Outcome of the image ambiguity preflight
#[derive(Debug, Serialize)]
pub struct AmbiguityReport {
    pub operation: &'static str,
    pub project: String,
    pub ambiguous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub origins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AmbiguityReport {
    pub fn new(project: &str, ambiguity: Option<&Ambiguity>) -> Self {
        Self {
            operation: "check-ambiguity",
            project: project.to_string(),
            ambiguous: ambiguity.is_some(),
            repo_url: ambiguity.map(|a| a.repo_url.clone()),
            origins: ambiguity
                .map(|a| vec![a.first.to_string(), a.second.to_string()])
                .unwrap_or_default(),
            error: ambiguity.map(|a| a.to_string()),
        }
    }
}

/// Failure report for JSON mode
#[derive(Debug, Serialize)]
struct ErrorReport {
    success: bool,
    exit_code: i32,
    error: String,
}

/// Structured output writer that supports both styled text and JSON output
#[derive(Debug, Clone)]
pub struct OutputWriter {
    pub format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print the result of a resolve command
    pub fn resolution(&self, report: &ResolutionReport<'_>) {
        match self.format {
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(report) {
                    println!("{}", json);
                }
            }
            OutputFormat::Text => match (&report.artifact, &report.origin) {
                (Some(artifact), origin) => {
                    cli_style::print_success(&format!(
                        "Resolved {} from {}",
                        report.repo_url,
                        origin.as_deref().unwrap_or("unknown origin")
                    ));
                    let mut rows = artifact.details();
                    if let Some(id) = &report.freight_id {
                        let label = report
                            .freight
                            .map(str::to_string)
                            .unwrap_or_else(|| id.clone());
                        rows.push(("Freight", label));
                    }
                    println!("{}", cli_style::details_table(&rows));
                }
                (None, Some(origin)) => cli_style::print_warning(&format!(
                    "{} has not contributed Freight from {} to this promotion yet",
                    origin, report.repo_url
                )),
                (None, None) => cli_style::print_warning(&format!(
                    "No requested Freight subscribes to {}",
                    report.repo_url
                )),
            },
        }
    }

    /// Print the result of the ambiguity preflight
    pub fn ambiguity(&self, report: &AmbiguityReport) {
        match self.format {
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(report) {
                    println!("{}", json);
                }
            }
            OutputFormat::Text => match &report.error {
                Some(message) => cli_style::print_error(
                    message,
                    Some("set an explicit Freight origin on the promotion step"),
                ),
                None => cli_style::print_success(&format!(
                    "No ambiguous image requests in project {}",
                    report.project
                )),
            },
        }
    }

    /// Print an error
    pub fn error(&self, err: &FreightyardError) {
        match self.format {
            OutputFormat::Json => {
                let report = ErrorReport {
                    success: false,
                    exit_code: err.exit_code(),
                    error: sanitize_error(&err.to_string()),
                };
                if let Ok(json) = serde_json::to_string(&report) {
                    println!("{}", json);
                }
            }
            OutputFormat::Text => {
                let hint = match err {
                    FreightyardError::Resolve(resolve) if resolve.is_ambiguity() => {
                        Some("pass --origin to pick the Warehouse explicitly")
                    }
                    FreightyardError::Resolve(resolve) if resolve.is_transient() => {
                        Some("the Warehouse directory may be temporarily unavailable; retry later")
                    }
                    _ => None,
                };
                cli_style::print_error(&sanitize_error(&err.to_string()), hint);
            }
        }
    }

    /// Print an info message (suppressed in JSON mode)
    pub fn info(&self, msg: &str) {
        if !self.is_json() {
            cli_style::print_info(msg);
        }
    }
}

/// Sanitize error messages by collapsing whitespace
pub fn sanitize_error(msg: &str) -> String {
    msg.split_whitespace().collect::<Vec<&str>>().join(" ")
}

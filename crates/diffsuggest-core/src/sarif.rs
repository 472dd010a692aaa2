//! SARIF (Static Analysis Results Interchange Format) output renderer.
//!
//! Converts diagnostics to SARIF 2.1.0. Every diagnostic becomes a result
//! whose `fixes` carry the suggested edit as a region replacement.

use serde::Serialize;

use diffsuggest_types::{Diagnostic, DiagnosticResult, Range, Suggestion};

/// SARIF schema URL
const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// SARIF version
const SARIF_VERSION: &str = "2.1.0";

/// Rule id shared by every diff suggestion.
const SUGGESTION_RULE_ID: &str = "diff.suggestion";

/// Root SARIF document structure.
#[derive(Debug, Clone, Serialize)]
pub struct SarifReport {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifDriver {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information_uri: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub short_description: SarifMessage,
}

/// SARIF result (one diagnostic).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub level: SarifLevel,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<SarifFix>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SarifLevel {
    Error,
    Warning,
    Note,
    None,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    pub region: SarifRegion,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifArtifactLocation {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_base_id: Option<String>,
}

/// Region within a file. Columns are only set for insertion points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    pub end_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl From<&Range> for SarifRegion {
    fn from(r: &Range) -> Self {
        Self {
            start_line: r.start.line,
            start_column: r.start.column,
            end_line: r.end.line,
            end_column: r.end.column,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifFix {
    pub description: SarifMessage,
    pub artifact_changes: Vec<SarifArtifactChange>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifArtifactChange {
    pub artifact_location: SarifArtifactLocation,
    pub replacements: Vec<SarifReplacement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifReplacement {
    pub deleted_region: SarifRegion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_content: Option<SarifArtifactContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifArtifactContent {
    pub text: String,
}

/// Renders a diagnostic result as a SARIF 2.1.0 report.
pub fn render_sarif_report(result: &DiagnosticResult) -> SarifReport {
    let results: Vec<SarifResult> = result.diagnostics.iter().map(diagnostic_to_result).collect();

    let rules = if results.is_empty() {
        vec![]
    } else {
        vec![SarifRule {
            id: SUGGESTION_RULE_ID.to_string(),
            short_description: SarifMessage {
                text: "Suggested change from diff".to_string(),
            },
        }]
    };

    SarifReport {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: result.source.name.clone(),
                    information_uri: result.source.url.clone(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Renders a SARIF report as a JSON string.
pub fn render_sarif_json(result: &DiagnosticResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&render_sarif_report(result))
}

fn artifact(path: &str) -> SarifArtifactLocation {
    SarifArtifactLocation {
        uri: path.to_string(),
        uri_base_id: Some("%SRCROOT%".to_string()),
    }
}

fn diagnostic_to_result(d: &Diagnostic) -> SarifResult {
    let fixes = d
        .suggestions
        .iter()
        .map(|s| suggestion_to_fix(&d.location.path, s))
        .collect();

    SarifResult {
        rule_id: SUGGESTION_RULE_ID.to_string(),
        level: SarifLevel::Note,
        message: SarifMessage {
            text: d.original_output.clone(),
        },
        locations: vec![SarifLocation {
            physical_location: SarifPhysicalLocation {
                artifact_location: artifact(&d.location.path),
                region: SarifRegion::from(&d.location.range),
            },
        }],
        fixes,
    }
}

fn suggestion_to_fix(path: &str, s: &Suggestion) -> SarifFix {
    let description = if s.is_deletion() {
        "Delete lines"
    } else if s.range.is_point() && s.range.start.column.is_some() {
        "Insert lines"
    } else {
        "Replace lines"
    };

    SarifFix {
        description: SarifMessage {
            text: description.to_string(),
        },
        artifact_changes: vec![SarifArtifactChange {
            artifact_location: artifact(path),
            replacements: vec![SarifReplacement {
                deleted_region: SarifRegion::from(&s.range),
                inserted_content: s
                    .text
                    .as_ref()
                    .map(|text| SarifArtifactContent { text: text.clone() }),
            }],
        }],
    }
}

//! Data types (diagnostic records + runner config) for diffsuggest.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.
//! JSON field names follow the reviewdog diagnostic format (rdjson).

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Schema Identifiers ─────────────────────────────────────────
pub const DIAGNOSTIC_SCHEMA_NAME: &str = "diffsuggest.diagnostic.v1";
pub const DIAGNOSTIC_RESULT_SCHEMA_NAME: &str = "diffsuggest.diagnostic_result.v1";
pub const RUNNER_CONFIG_SCHEMA_NAME: &str = "diffsuggest.runner_config.v1";

/// Default `source.name` for diagnostics produced from diff input.
pub const DEFAULT_SOURCE_NAME: &str = "diff";

/// A 1-based position in a file.
///
/// `column` is only present for insertion points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Position {
    /// A whole-line position.
    pub fn line(line: u32) -> Self {
        Self { line, column: None }
    }

    pub fn with_column(line: u32, column: u32) -> Self {
        Self {
            line,
            column: Some(column),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// A range whose start and end are the same position.
    pub fn point(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Whole lines `start..=end`.
    pub fn lines(start: u32, end: u32) -> Self {
        Self {
            start: Position::line(start),
            end: Position::line(end),
        }
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Number of whole lines covered (a point covers one).
    pub fn line_span(&self) -> u32 {
        self.end.line.saturating_sub(self.start.line) + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub path: String,
    pub range: Range,
}

/// A proposed edit. Absent `text` means "delete this range".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Suggestion {
    pub range: Range,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Suggestion {
    pub fn is_deletion(&self) -> bool {
        self.text.is_none()
    }
}

/// One diagnostic record: where, what to change, and a raw rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub location: Location,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    pub original_output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Source {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            name: DEFAULT_SOURCE_NAME.to_string(),
            url: None,
        }
    }
}

/// The rdjson envelope: a source plus its diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct DiagnosticResult {
    pub source: Source,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

// ── Runner configuration ───────────────────────────────────────

/// The on-disk runner configuration (`reviewdog.yml` style).
///
/// ```yaml
/// runner:
///   golint:
///     cmd: golint ./...
///     errorformat: "%f:%l:%c: %m"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    #[serde(default)]
    pub runner: BTreeMap<String, Runner>,
}

impl RunnerConfig {
    /// Fill in every runner's `name` from its map key when not set explicitly.
    pub fn with_default_names(mut self) -> Self {
        for (key, runner) in &mut self.runner {
            if runner.name.is_empty() {
                runner.name = key.clone();
            }
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(deny_unknown_fields)]
pub struct Runner {
    pub cmd: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub errorformat: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub level: String,
}

//! Raw rule-engine result types and the normalized report.

use serde::{Deserialize, Serialize};

/// Categorized results as resolved by `axe.run()` in the page.
///
/// The category names and semantics come from axe-core's contract and are
/// preserved verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResults {
    #[serde(default)]
    pub passes: Vec<RuleFinding>,
    #[serde(default)]
    pub violations: Vec<RuleFinding>,
    #[serde(default)]
    pub incomplete: Vec<RuleFinding>,
    #[serde(default)]
    pub inapplicable: Vec<RuleFinding>,
}

/// One rule's raw result, possibly covering many matched DOM nodes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleFinding {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub help: String,
    #[serde(default, rename = "helpUrl")]
    pub help_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<RuleNode>,
}

/// A DOM node matched by a rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleNode {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub target: Option<Vec<String>>,
    /// Individual check results whose messages get flattened into one string.
    #[serde(default)]
    pub any: Vec<CheckResult>,
}

/// A single check under a node's `any` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckResult {
    #[serde(default)]
    pub message: String,
}

/// A normalized finding, ready for the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedFinding {
    pub id: String,
    pub impact: String,
    pub description: String,
    pub help: String,
    #[serde(rename = "helpUrl")]
    pub help_url: String,
    pub tags: Vec<String>,
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    pub nodes: Vec<FormattedNode>,
}

/// A normalized node entry under a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedNode {
    pub html: String,
    pub message: String,
    pub target: Vec<String>,
}

/// One entry in the flattened `testsRun` summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// The full report for one audited page.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub url: String,
    pub passes: Vec<FormattedFinding>,
    pub violations: Vec<FormattedFinding>,
    pub incomplete: Vec<FormattedFinding>,
    pub inapplicable: Vec<FormattedFinding>,
    #[serde(rename = "testsRun")]
    pub tests_run: Vec<TestSummary>,
}

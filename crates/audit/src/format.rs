//! Pure reshaping of raw rule results into report entries.
//!
//! Total over its domain: missing optional fields are defaulted, never
//! rejected, and input order is preserved in the output.

use crate::types::{
    FormattedFinding, FormattedNode, RawResults, RuleFinding, RuleNode, TestSummary,
};

pub const NO_IMPACT: &str = "N/A";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_HTML: &str = "No HTML available";
pub const NO_MESSAGE: &str = "Error message not available";
pub const NO_TARGET: &str = "No target available";

/// Normalize one category of findings for the report.
pub fn format_findings(findings: &[RuleFinding], page_url: &str) -> Vec<FormattedFinding> {
    findings
        .iter()
        .map(|finding| format_finding(finding, page_url))
        .collect()
}

fn format_finding(finding: &RuleFinding, page_url: &str) -> FormattedFinding {
    FormattedFinding {
        id: finding.id.clone(),
        impact: finding
            .impact
            .clone()
            .unwrap_or_else(|| NO_IMPACT.to_string()),
        description: finding
            .description
            .clone()
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        help: finding.help.clone(),
        help_url: finding.help_url.clone(),
        tags: finding.tags.clone(),
        page_url: page_url.to_string(),
        nodes: finding.nodes.iter().map(format_node).collect(),
    }
}

fn format_node(node: &RuleNode) -> FormattedNode {
    let message = if node.any.is_empty() {
        NO_MESSAGE.to_string()
    } else {
        node.any
            .iter()
            .map(|check| check.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    FormattedNode {
        html: node.html.clone().unwrap_or_else(|| NO_HTML.to_string()),
        message,
        target: node
            .target
            .clone()
            .unwrap_or_else(|| vec![NO_TARGET.to_string()]),
    }
}

/// Flatten all four categories into the `testsRun` summary.
///
/// Category order is fixed: passes, violations, inapplicable, incomplete.
pub fn summarize_tests(results: &RawResults) -> Vec<TestSummary> {
    results
        .passes
        .iter()
        .chain(results.violations.iter())
        .chain(results.inapplicable.iter())
        .chain(results.incomplete.iter())
        .map(|finding| TestSummary {
            id: finding.id.clone(),
            title: finding.help.clone(),
            description: finding
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            tags: finding.tags.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CheckResult;

    fn finding(id: &str) -> RuleFinding {
        RuleFinding {
            id: id.to_string(),
            help: format!("{id} help"),
            help_url: format!("https://dequeuniversity.com/rules/axe/4.10/{id}"),
            ..RuleFinding::default()
        }
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let formatted = format_findings(&[finding("image-alt")], "https://example.com");

        assert_eq!(formatted.len(), 1);
        let f = &formatted[0];
        assert_eq!(f.id, "image-alt");
        assert_eq!(f.impact, NO_IMPACT);
        assert_eq!(f.description, NO_DESCRIPTION);
        assert_eq!(f.page_url, "https://example.com");
        assert!(f.tags.is_empty());
    }

    #[test]
    fn node_messages_join_with_comma() {
        let mut f = finding("color-contrast");
        f.nodes.push(RuleNode {
            html: Some("<p class=\"dim\">hi</p>".into()),
            target: Some(vec![".dim".into()]),
            any: vec![
                CheckResult {
                    message: "Element has insufficient color contrast".into(),
                },
                CheckResult {
                    message: "Expected contrast ratio of 4.5:1".into(),
                },
            ],
        });

        let formatted = format_findings(&[f], "https://example.com");
        assert_eq!(
            formatted[0].nodes[0].message,
            "Element has insufficient color contrast, Expected contrast ratio of 4.5:1"
        );
    }

    #[test]
    fn empty_any_list_gets_fallback_message() {
        let mut f = finding("label");
        f.nodes.push(RuleNode::default());

        let formatted = format_findings(&[f], "https://example.com");
        let node = &formatted[0].nodes[0];
        assert_eq!(node.message, NO_MESSAGE);
        assert_eq!(node.html, NO_HTML);
        assert_eq!(node.target, vec![NO_TARGET.to_string()]);
    }

    #[test]
    fn input_order_is_preserved() {
        let input = vec![finding("a"), finding("b"), finding("c")];
        let formatted = format_findings(&input, "https://example.com");

        let ids: Vec<&str> = formatted.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn formatting_is_idempotent() {
        let mut f = finding("link-name");
        f.impact = Some("serious".into());
        f.nodes.push(RuleNode {
            html: Some("<a href=\"#\"></a>".into()),
            target: None,
            any: vec![CheckResult {
                message: "Element does not have text".into(),
            }],
        });
        let input = vec![f];

        let first = format_findings(&input, "https://example.com");
        let second = format_findings(&input, "https://example.com");
        assert_eq!(first, second);
    }

    #[test]
    fn tests_run_order_is_passes_violations_inapplicable_incomplete() {
        let raw = RawResults {
            passes: vec![finding("p1"), finding("p2")],
            violations: vec![finding("v1")],
            incomplete: vec![finding("n1")],
            inapplicable: vec![finding("i1")],
        };

        let summary = summarize_tests(&raw);
        let ids: Vec<&str> = summary.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "v1", "i1", "n1"]);
        assert_eq!(summary[0].title, "p1 help");
        assert_eq!(summary[0].description, NO_DESCRIPTION);
    }
}

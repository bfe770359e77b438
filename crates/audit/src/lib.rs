//! Accessibility audit orchestration.
//!
//! One audit = one browser session: navigate to the target URL, run the
//! axe-core rule engine inside the page, and reshape its four result
//! categories (passes, violations, incomplete, inapplicable) into a
//! normalized report. The rule evaluation itself is delegated entirely to
//! axe-core; this crate only orchestrates and formats.

pub mod engine;
pub mod format;
pub mod service;
pub mod types;

pub use {
    engine::AxeEngine,
    service::{AuditError, AuditService, LiveAuditService},
    types::{AuditReport, FormattedFinding, FormattedNode, RawResults, RuleFinding, TestSummary},
};

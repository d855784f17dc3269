//! Violations and the verification report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;

/// Severity of a violation. Only `Fail` affects the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Fail,
    Warn,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fail => write!(f, "FAIL"),
            Severity::Warn => write!(f, "WARN"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// A single recorded contract breach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub severity: Severity,
    pub check_id: String,
    /// The node (or `Controller.Endpoint`) the violation is about.
    pub subject: String,
    pub message: String,
}

impl Violation {
    pub fn new(
        severity: Severity,
        check_id: &str,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            check_id: check_id.to_string(),
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.severity {
            Severity::Fail => "✗",
            Severity::Warn => "⚠",
            Severity::Info => "ℹ",
        };
        write!(f, "{} {}: {}", icon, self.subject, self.message)
    }
}

/// Which check ran, in run order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub id: String,
    pub title: String,
}

/// Outcome of one verification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True iff no `Fail` violation exists.
    pub passed: bool,
    pub checks: Vec<CheckSummary>,
    pub violations: Vec<Violation>,
}

/// Non-failing violations listed per check before eliding the rest.
const MAX_LISTED: usize = 10;

impl VerificationReport {
    pub fn new(checks: Vec<CheckSummary>, violations: Vec<Violation>) -> Self {
        let passed = !violations.iter().any(|v| v.severity == Severity::Fail);
        Self {
            passed,
            checks,
            violations,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.violations.iter().filter(|v| v.severity == severity).count()
    }

    /// Violations recorded by one check.
    pub fn for_check<'a>(&'a self, check_id: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.check_id == check_id)
    }

    /// Process exit status: 0 passed, 1 at least one FAIL.
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            super::EXIT_PASSED
        } else {
            super::EXIT_FAILED
        }
    }

    /// Human-readable report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(70);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "CONTRACT VERIFICATION");
        let _ = writeln!(out, "{}", rule);

        for (n, check) in self.checks.iter().enumerate() {
            let found: Vec<&Violation> = self.for_check(&check.id).collect();
            let _ = writeln!(out);
            let _ = writeln!(out, "Check {}: {}", n + 1, check.title);
            let _ = writeln!(out, "{}", "-".repeat(50));

            let worst = found.iter().map(|v| v.severity).min();
            match worst {
                None => {
                    let _ = writeln!(out, "  ✓ PASS");
                    continue;
                }
                Some(severity) => {
                    let _ = writeln!(out, "  {} ({} findings)", severity, found.len());
                }
            }

            let mut elided = 0;
            let mut listed = 0;
            for v in &found {
                if v.severity != Severity::Fail && listed >= MAX_LISTED {
                    elided += 1;
                    continue;
                }
                listed += 1;
                let _ = writeln!(out, "    {}", v);
            }
            if elided > 0 {
                let _ = writeln!(out, "    ... and {} more", elided);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "SUMMARY");
        let _ = writeln!(out, "{}", rule);
        if self.passed {
            let _ = writeln!(out, "✓ VERIFICATION PASSED");
        } else {
            let _ = writeln!(out, "✗ VERIFICATION FAILED");
            let _ = writeln!(out, "  Blocking violations: {}", self.count(Severity::Fail));
        }
        let warnings = self.count(Severity::Warn);
        if warnings > 0 {
            let _ = writeln!(out, "  Warnings: {}", warnings);
        }
        let infos = self.count(Severity::Info);
        if infos > 0 {
            let _ = writeln!(out, "  Info: {}", infos);
        }
        out
    }
}

//! Contract verifier.
//!
//! Loads a snapshot, runs every [`ContractCheck`] in order and collects
//! the violations into a [`VerificationReport`]. Violations never abort
//! the pass; only an unloadable snapshot does, or one missing required
//! sections when `require_sections` is set.

pub mod checks;
pub mod report;
pub mod snapshot;

use std::path::Path;
use tracing::{debug, info};

pub use checks::{default_checks, ContractCheck};
pub use report::{CheckSummary, Severity, VerificationReport, Violation};
pub use snapshot::{Controller, Dto, Endpoint, Snapshot};

use crate::config::VerifierConfig;
use crate::error::Result;

/// No FAIL violation.
pub const EXIT_PASSED: i32 = 0;
/// At least one FAIL violation.
pub const EXIT_FAILED: i32 = 1;
/// The snapshot could not be loaded.
pub const EXIT_UNLOADABLE: i32 = 2;

pub struct Verifier {
    checks: Vec<Box<dyn ContractCheck>>,
}

impl Verifier {
    pub fn new(config: &VerifierConfig) -> Self {
        Self::with_checks(default_checks(config))
    }

    pub fn with_checks(checks: Vec<Box<dyn ContractCheck>>) -> Self {
        Self { checks }
    }

    pub fn run(&self, snapshot: &Snapshot) -> VerificationReport {
        let mut summaries = Vec::with_capacity(self.checks.len());
        let mut violations = Vec::new();
        for check in &self.checks {
            let found = check.run(snapshot);
            debug!(check = check.id(), violations = found.len(), "check complete");
            summaries.push(CheckSummary {
                id: check.id().to_string(),
                title: check.title().to_string(),
            });
            violations.extend(found);
        }
        let report = VerificationReport::new(summaries, violations);
        info!(
            passed = report.passed,
            fail = report.count(Severity::Fail),
            warn = report.count(Severity::Warn),
            info = report.count(Severity::Info),
            "verification complete"
        );
        report
    }
}

/// Load `path`, enforcing required sections if the config asks for it.
pub fn load_snapshot(path: &Path, config: &VerifierConfig) -> Result<Snapshot> {
    let snapshot = Snapshot::load(path)?;
    if config.require_sections {
        snapshot.ensure_sections(path)?;
    }
    Ok(snapshot)
}

/// Load `path` and verify it with the default checks.
pub fn verify_file(path: &Path, config: &VerifierConfig) -> Result<VerificationReport> {
    let snapshot = load_snapshot(path, config)?;
    Ok(Verifier::new(config).run(&snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct Always(Severity);

    impl ContractCheck for Always {
        fn id(&self) -> &'static str {
            "always"
        }

        fn title(&self) -> &'static str {
            "Always"
        }

        fn run(&self, _snapshot: &Snapshot) -> Vec<Violation> {
            vec![Violation::new(self.0, self.id(), "x", "found")]
        }
    }

    #[test]
    fn test_exit_code_law() {
        let snapshot = Snapshot::default();
        for (severity, code) in [
            (Severity::Info, EXIT_PASSED),
            (Severity::Warn, EXIT_PASSED),
            (Severity::Fail, EXIT_FAILED),
        ] {
            let report = Verifier::with_checks(vec![Box::new(Always(severity))]).run(&snapshot);
            assert_eq!(report.exit_code(), code);
        }
        let clean = Verifier::new(&VerifierConfig::default()).run(&snapshot);
        assert!(clean.passed);
        assert!(clean.violations.is_empty());
        assert_eq!(clean.checks.len(), 6);
    }

    #[test]
    fn test_all_checks_run_after_a_failure() {
        let snapshot = Snapshot::default();
        let report = Verifier::with_checks(vec![
            Box::new(Always(Severity::Fail)),
            Box::new(Always(Severity::Info)),
        ])
        .run(&snapshot);
        assert_eq!(report.violations.len(), 2);
        assert!(!report.passed);
    }

    #[test]
    fn test_verify_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph-baseline.json");
        assert!(verify_file(&path, &VerifierConfig::default())
            .unwrap_err()
            .is_snapshot_error());

        fs::write(
            &path,
            r#"{
                "controllers": {"PeopleController": {
                    "name": "PeopleController",
                    "patterns": {"response_envelope": true},
                    "endpoints": [{"name": "Get", "method": "GET", "route": "{idKey}"}]
                }},
                "dtos": {"PersonDto": {"name": "PersonDto", "properties": {"Id": "int", "Name": "string"}}},
                "components": {}, "hooks": {}
            }"#,
        )
        .unwrap();
        let report = verify_file(&path, &VerifierConfig::default()).unwrap();
        assert!(!report.passed);
        let fails: Vec<&Violation> = report
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Fail)
            .collect();
        assert_eq!(fails.len(), 1);
        assert_eq!(fails[0].check_id, "numeric_id");
        assert_eq!(fails[0].subject, "PersonDto");
    }

    #[test]
    fn test_required_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frontend-graph.json");
        fs::write(&path, r#"{"types": {}, "components": {}, "hooks": {}, "edges": []}"#).unwrap();

        let lenient = VerifierConfig::default();
        assert!(verify_file(&path, &lenient).unwrap().passed);

        let strict = VerifierConfig {
            require_sections: true,
            ..VerifierConfig::default()
        };
        let err = verify_file(&path, &strict).unwrap_err();
        assert!(err.is_snapshot_error());
        assert!(err.to_string().contains("controllers, dtos"));
    }
}

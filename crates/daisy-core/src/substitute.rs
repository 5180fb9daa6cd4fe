//! Placeholder substitution inside the fetched template
//!
//! The template embeds a fixed placeholder identifier in a known set of
//! manifests and one control script; every occurrence is replaced with
//! the operator's project name. JSON files go through a parse/reserialize
//! pass first so the rewrite never leaves them structurally mangled and
//! the indentation stays stable.

use crate::error::ScaffoldError;
use std::path::Path;

/// The project identifier baked into the template
pub const PLACEHOLDER: &str = "mndb";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Json,
    Text,
}

/// A file known, a priori, to contain the placeholder
#[derive(Debug, Clone, Copy)]
pub struct SubstitutionTarget {
    /// Path relative to the target directory
    pub path: &'static str,
    pub kind: TargetKind,
}

/// The manifests and control script the template ships with
pub const SUBSTITUTION_TARGETS: &[SubstitutionTarget] = &[
    SubstitutionTarget {
        path: "package.json",
        kind: TargetKind::Json,
    },
    SubstitutionTarget {
        path: "server/package.json",
        kind: TargetKind::Json,
    },
    SubstitutionTarget {
        path: "client/package.json",
        kind: TargetKind::Json,
    },
    SubstitutionTarget {
        path: "yunyi/bin/control",
        kind: TargetKind::Text,
    },
];

/// Outcome of one substitution pass
#[derive(Debug, Default)]
pub struct SubstitutionReport {
    /// Relative paths that were rewritten
    pub rewritten: Vec<String>,
    /// Per-file failures; any entry here taints the run's final status
    pub failures: Vec<ScaffoldError>,
}

impl SubstitutionReport {
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Rewrite every known target under `dir`, replacing `placeholder` with
/// `replacement`.
///
/// A missing or unreadable target fails that file only; the remaining
/// targets are still attempted so one absent optional file does not
/// abort manifest rewriting for the files that do exist.
pub fn apply_all(dir: &Path, placeholder: &str, replacement: &str) -> SubstitutionReport {
    let mut report = SubstitutionReport::default();

    for target in SUBSTITUTION_TARGETS {
        match apply_one(dir, target, placeholder, replacement) {
            Ok(()) => report.rewritten.push(target.path.to_string()),
            Err(message) => report.failures.push(ScaffoldError::Substitution {
                path: dir.join(target.path),
                message,
            }),
        }
    }

    report
}

fn apply_one(
    dir: &Path,
    target: &SubstitutionTarget,
    placeholder: &str,
    replacement: &str,
) -> Result<(), String> {
    let path = dir.join(target.path);
    let content = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;

    let rewritten = match target.kind {
        TargetKind::Json => rewrite_json(&content, placeholder, replacement)?,
        TargetKind::Text => content.replace(placeholder, replacement),
    };

    std::fs::write(&path, rewritten).map_err(|e| e.to_string())
}

/// Parse, reserialize with 2-space indentation, then replace textually.
///
/// Reserializing before the replacement keeps diffs stable regardless of
/// how the template author formatted the manifest, and guarantees the
/// input was valid JSON before it is overwritten.
fn rewrite_json(content: &str, placeholder: &str, replacement: &str) -> Result<String, String> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {}", e))?;
    let pretty = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
    Ok(pretty.replace(placeholder, replacement))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_rewrite_replaces_every_occurrence() {
        let out = rewrite_json(r#"{"name":"mndb","dep":"mndb-core"}"#, "mndb", "acme").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["name"], "acme");
        assert_eq!(value["dep"], "acme-core");
        // 2-space indentation from the pretty pass
        assert!(out.contains("\n  \"name\""));
    }

    #[test]
    fn test_json_rewrite_rejects_invalid_input() {
        let err = rewrite_json("{not json", "mndb", "acme").unwrap_err();
        assert!(err.contains("invalid JSON"));
    }

    #[test]
    fn test_apply_all_rewrites_manifests_and_control_script() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("server")).unwrap();
        std::fs::create_dir_all(tmp.path().join("client")).unwrap();
        std::fs::create_dir_all(tmp.path().join("yunyi/bin")).unwrap();
        std::fs::write(tmp.path().join("package.json"), r#"{"name":"mndb"}"#).unwrap();
        std::fs::write(
            tmp.path().join("server/package.json"),
            r#"{"name":"mndb-server"}"#,
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("client/package.json"),
            r#"{"name":"mndb-client"}"#,
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("yunyi/bin/control"),
            "#!/bin/sh\nexec bin/mndb --name mndb\n",
        )
        .unwrap();

        let report = apply_all(tmp.path(), PLACEHOLDER, "acme");
        assert!(report.succeeded());
        assert_eq!(report.rewritten.len(), SUBSTITUTION_TARGETS.len());

        let root = std::fs::read_to_string(tmp.path().join("package.json")).unwrap();
        assert!(root.contains("\"acme\""));
        assert!(!root.contains("mndb"));

        let control = std::fs::read_to_string(tmp.path().join("yunyi/bin/control")).unwrap();
        assert_eq!(control, "#!/bin/sh\nexec bin/acme --name acme\n");
    }

    #[test]
    fn test_missing_target_fails_that_file_only() {
        let tmp = tempfile::tempdir().unwrap();
        // only the root manifest exists
        std::fs::write(tmp.path().join("package.json"), r#"{"name":"mndb"}"#).unwrap();

        let report = apply_all(tmp.path(), PLACEHOLDER, "acme");
        assert!(!report.succeeded());
        assert_eq!(report.rewritten, vec!["package.json".to_string()]);
        assert_eq!(report.failures.len(), SUBSTITUTION_TARGETS.len() - 1);

        // the sibling that existed was still rewritten
        let root = std::fs::read_to_string(tmp.path().join("package.json")).unwrap();
        assert!(root.contains("acme"));
    }
}

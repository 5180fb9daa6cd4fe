//! Target directory classification and resolution
//!
//! The resolver is a small state machine: each candidate path offered to
//! it moves the state to `Accepted` or `Invalid`, and the interactive
//! layer keeps prompting while the state is `Invalid`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What a candidate target path turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetDirState {
    DoesNotExist,
    Empty,
    /// Visible (non dot-prefixed) entries, for the rejection message
    NonEmpty(Vec<String>),
    NotADirectory,
}

/// Classify a candidate path.
///
/// Dot-prefixed entries are ignored when deciding emptiness, so a
/// directory holding only version-control metadata still counts as empty.
pub fn classify(path: &Path) -> io::Result<TargetDirState> {
    if !path.exists() {
        return Ok(TargetDirState::DoesNotExist);
    }
    if !path.is_dir() {
        return Ok(TargetDirState::NotADirectory);
    }

    let mut visible = Vec::new();
    for entry in fs::read_dir(path)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            visible.push(name);
        }
    }

    if visible.is_empty() {
        Ok(TargetDirState::Empty)
    } else {
        visible.sort();
        Ok(TargetDirState::NonEmpty(visible))
    }
}

/// Resolution progress for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveState {
    /// No candidate offered yet
    Unvalidated,
    /// Last candidate was rejected; the caller should prompt for another
    Invalid { reason: String },
    /// Candidate accepted; `overriding` is set when a non-empty
    /// directory was taken because of --force
    Accepted { path: PathBuf, overriding: bool },
}

/// Directory resolver driven by `classify`
#[derive(Debug)]
pub struct DirectoryResolver {
    force: bool,
    state: ResolveState,
}

impl DirectoryResolver {
    pub fn new(force: bool) -> Self {
        Self {
            force,
            state: ResolveState::Unvalidated,
        }
    }

    pub fn state(&self) -> &ResolveState {
        &self.state
    }

    /// Offer a candidate path and transition the state.
    ///
    /// A missing path is created (including intermediate directories)
    /// and accepted. Only I/O errors propagate; every rejection is a
    /// state, not an error.
    pub fn offer(&mut self, candidate: &Path) -> io::Result<&ResolveState> {
        self.state = match classify(candidate)? {
            TargetDirState::DoesNotExist => {
                fs::create_dir_all(candidate)?;
                ResolveState::Accepted {
                    path: candidate.to_path_buf(),
                    overriding: false,
                }
            }
            TargetDirState::Empty => ResolveState::Accepted {
                path: candidate.to_path_buf(),
                overriding: false,
            },
            TargetDirState::NonEmpty(entries) => {
                if self.force {
                    ResolveState::Accepted {
                        path: candidate.to_path_buf(),
                        overriding: true,
                    }
                } else {
                    ResolveState::Invalid {
                        reason: format!(
                            "{} already exists and is not empty: {}",
                            candidate.display(),
                            entries.join(", ")
                        ),
                    }
                }
            }
            TargetDirState::NotADirectory => ResolveState::Invalid {
                reason: format!("{} already exists as a file", candidate.display()),
            },
        };
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_created_and_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("a/b/app");

        let mut resolver = DirectoryResolver::new(false);
        match resolver.offer(&target).unwrap() {
            ResolveState::Accepted { path, overriding } => {
                assert_eq!(path, &target);
                assert!(!overriding);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
        assert!(target.is_dir());
    }

    #[test]
    fn test_file_path_is_rejected_without_changes() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("app");
        std::fs::write(&target, "not a directory").unwrap();

        let mut resolver = DirectoryResolver::new(false);
        match resolver.offer(&target).unwrap() {
            ResolveState::Invalid { reason } => {
                assert!(reason.contains("already exists as a file"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(target.is_file());
    }

    #[test]
    fn test_dotfile_only_directory_counts_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("app");
        std::fs::create_dir_all(target.join(".git")).unwrap();
        std::fs::write(target.join(".env"), "X=1").unwrap();

        assert_eq!(classify(&target).unwrap(), TargetDirState::Empty);

        let mut resolver = DirectoryResolver::new(false);
        assert!(matches!(
            resolver.offer(&target).unwrap(),
            ResolveState::Accepted { .. }
        ));
    }

    #[test]
    fn test_non_empty_directory_rejected_unless_forced() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("app");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("index.js"), "").unwrap();

        let mut resolver = DirectoryResolver::new(false);
        match resolver.offer(&target).unwrap() {
            ResolveState::Invalid { reason } => assert!(reason.contains("index.js")),
            other => panic!("expected rejection, got {:?}", other),
        }

        let mut forced = DirectoryResolver::new(true);
        match forced.offer(&target).unwrap() {
            ResolveState::Accepted { overriding, .. } => assert!(overriding),
            other => panic!("expected forced acceptance, got {:?}", other),
        }
        // resolve never removes anything; that is the fetch step's job
        assert!(target.join("index.js").exists());
    }

    #[test]
    fn test_resolver_starts_unvalidated() {
        let resolver = DirectoryResolver::new(false);
        assert_eq!(resolver.state(), &ResolveState::Unvalidated);
    }
}

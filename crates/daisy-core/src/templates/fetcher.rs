//! Template fetching over HTTP
//!
//! Templates are retrieved as zip archives from the forge's archive
//! endpoint ({origin}/archive/{ref}.zip) and extracted straight into the
//! target directory, stripping the archive's top-level folder.

use crate::templates::spec::TemplateSpec;
use anyhow::{Context, Result};
use std::io::{Cursor, Read};
use std::path::Path;
use url::Url;
use zip::ZipArchive;

/// Template fetcher - one reqwest client per run, proxy applied at
/// construction. This is the only component that touches the network.
pub struct TemplateFetcher {
    client: reqwest::Client,
}

impl TemplateFetcher {
    pub const USER_AGENT: &'static str = "daisy-init";

    /// Build the client, routing through `proxy` when one is configured.
    pub fn new(proxy: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(Self::USER_AGENT);
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .with_context(|| format!("Invalid proxy endpoint: {}", proxy))?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Build the archive URL for a spec, preserving query parameters
    fn archive_url(spec: &TemplateSpec) -> Result<Url> {
        let mut url = Url::parse(&spec.origin)
            .with_context(|| format!("Invalid template origin: {}", spec.origin))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Origin URL cannot have path segments: {}", spec.origin))?
            .pop_if_empty()
            .push("archive")
            .push(&format!("{}.zip", spec.ref_name));
        Ok(url)
    }

    /// Download the template and extract it into `target`.
    ///
    /// Any pre-existing contents at `target` are removed first. The
    /// resolver already guaranteed emptiness or an explicit --force, so
    /// this is an idempotence step rather than data loss. Returns the
    /// number of files written.
    pub async fn fetch(&self, target: &Path, spec: &TemplateSpec) -> Result<usize> {
        clear_target(target)?;

        let url = Self::archive_url(spec)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch template archive from {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch template '{}' at ref '{}' from {}: HTTP {}",
                spec.origin,
                spec.ref_name,
                url,
                response.status()
            );
        }

        let bytes = response.bytes().await?;
        extract_archive(&bytes, target)
    }
}

/// Remove everything at `target` and recreate it empty
fn clear_target(target: &Path) -> Result<()> {
    if target.exists() {
        std::fs::remove_dir_all(target)
            .with_context(|| format!("Failed to clear {}", target.display()))?;
    }
    std::fs::create_dir_all(target)
        .with_context(|| format!("Failed to create {}", target.display()))?;
    Ok(())
}

/// Extract a repository archive into `target`.
///
/// Forge archives wrap everything in a single `{repo}-{ref}/` folder;
/// the first path component of every entry is stripped so files land
/// directly in the target directory.
fn extract_archive(zip_bytes: &[u8], target: &Path) -> Result<usize> {
    let cursor = Cursor::new(zip_bytes);
    let mut archive = ZipArchive::new(cursor).context("Failed to read template archive")?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let full_path = file.name().to_string();
        let relative_path = match full_path.split_once('/') {
            Some((_, rest)) if !rest.is_empty() => rest.to_string(),
            // Entry at the archive root, keep as is
            _ => full_path.clone(),
        };

        // The archive comes off the network; an entry with `..` or an
        // absolute component would land outside the target directory.
        if !is_safe_relative(Path::new(&relative_path)) {
            anyhow::bail!("Archive entry has an unsafe path: {}", full_path);
        }

        let out_path = target.join(&relative_path);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        std::fs::write(&out_path, &contents)
            .with_context(|| format!("Failed to write file: {}", out_path.display()))?;

        // Keep template scripts executable
        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode))?;
        }

        written += 1;
    }

    Ok(written)
}

/// True when every component of `path` is a plain name, so joining it
/// onto the target cannot step outside the target directory
fn is_safe_relative(path: &Path) -> bool {
    use std::path::Component;
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
}

/// Remove incidental version-control metadata left by the fetch step
pub fn remove_vcs_metadata(target: &Path) -> Result<()> {
    let git_dir = target.join(".git");
    if git_dir.is_dir() {
        std::fs::remove_dir_all(&git_dir)
            .with_context(|| format!("Failed to remove {}", git_dir.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            for (path, content) in entries {
                zip.start_file(*path, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_archive_url_appends_ref_zip() {
        let spec = TemplateSpec {
            origin: "https://github.com/daasfe/mndb".to_string(),
            ref_name: "template".to_string(),
        };
        let url = TemplateFetcher::archive_url(&spec).unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.com/daasfe/mndb/archive/template.zip"
        );
    }

    #[test]
    fn test_archive_url_tolerates_trailing_slash() {
        let spec = TemplateSpec {
            origin: "https://github.com/daasfe/mndb/".to_string(),
            ref_name: "master".to_string(),
        };
        let url = TemplateFetcher::archive_url(&spec).unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.com/daasfe/mndb/archive/master.zip"
        );
    }

    #[test]
    fn test_extract_strips_top_level_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = build_archive(&[
            ("mndb-template/package.json", "{\"name\":\"mndb\"}"),
            ("mndb-template/server/package.json", "{\"name\":\"mndb-server\"}"),
            ("mndb-template/yunyi/bin/control", "#!/bin/sh\nstart mndb\n"),
        ]);

        let written = extract_archive(&archive, tmp.path()).unwrap();
        assert_eq!(written, 3);
        assert!(tmp.path().join("package.json").is_file());
        assert!(tmp.path().join("server/package.json").is_file());
        let control = std::fs::read_to_string(tmp.path().join("yunyi/bin/control")).unwrap();
        assert!(control.contains("start mndb"));
    }

    #[test]
    fn test_extract_rejects_entries_that_leave_the_target() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("inner/app");
        std::fs::create_dir_all(&target).unwrap();

        let archive = build_archive(&[
            ("mndb-template/package.json", "{\"name\":\"mndb\"}"),
            ("mndb-template/../../escape.txt", "outside"),
        ]);

        let err = extract_archive(&archive, &target).unwrap_err();
        assert!(err.to_string().contains("unsafe path"));
        assert!(!tmp.path().join("escape.txt").exists());
        assert!(!target.join("escape.txt").exists());
    }

    #[test]
    fn test_unsafe_relative_paths_are_detected() {
        assert!(is_safe_relative(Path::new("server/package.json")));
        assert!(!is_safe_relative(Path::new("../escape.txt")));
        assert!(!is_safe_relative(Path::new("a/../../escape.txt")));
        assert!(!is_safe_relative(Path::new("/etc/passwd")));
    }

    #[test]
    fn test_clear_target_wipes_existing_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("app");
        std::fs::create_dir_all(target.join("old")).unwrap();
        std::fs::write(target.join("old/stale.txt"), "stale").unwrap();

        clear_target(&target).unwrap();
        assert!(target.is_dir());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn test_remove_vcs_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join(".git/objects")).unwrap();
        std::fs::write(tmp.path().join("package.json"), "{}").unwrap();

        remove_vcs_metadata(tmp.path()).unwrap();
        assert!(!tmp.path().join(".git").exists());
        assert!(tmp.path().join("package.json").exists());

        // idempotent when nothing is there
        remove_vcs_metadata(tmp.path()).unwrap();
    }
}

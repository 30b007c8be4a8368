//! On-disk locations for uploads and generated summaries

use crate::config::StorageConfig;
use crate::error::{Result, SummarizerError};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Directory of generated summary PDFs.
///
/// Files are named `summary_<uuid>.pdf`, written once and never removed.
#[derive(Debug, Clone)]
pub struct GeneratedFiles {
    dir: PathBuf,
}

impl GeneratedFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        GeneratedFiles { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fresh, collision-resistant file name and its full path
    pub fn allocate(&self) -> (String, PathBuf) {
        let name = format!("summary_{}.pdf", Uuid::new_v4());
        let path = self.dir.join(&name);
        (name, path)
    }

    /// Path of an existing generated file.
    ///
    /// Only bare file names are accepted, so lookups never leave the directory.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf> {
        if !is_plain_file_name(name) {
            return Err(SummarizerError::FileNotFound(name.to_string()));
        }
        let path = self.dir.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(SummarizerError::FileNotFound(name.to_string())),
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..")
}

/// Create the upload and generated directories if missing
pub fn ensure_directories(config: &StorageConfig) -> Result<()> {
    for dir in [&config.upload_dir, &config.generated_dir] {
        std::fs::create_dir_all(dir)?;
        tracing::debug!(path = %dir.display(), "storage directory ready");
    }
    Ok(())
}

/// Reduce an uploaded file name to a safe single path component.
///
/// Directory parts are dropped, anything outside `[A-Za-z0-9._-]` becomes
/// `_`, repeated underscores collapse and leading dots or underscores are
/// trimmed. The result may be empty.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let mut cleaned = String::with_capacity(base.len());
    for ch in base.trim().chars() {
        let mapped = if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
            ch
        } else {
            '_'
        };
        if mapped == '_' && cleaned.ends_with('_') {
            continue;
        }
        cleaned.push(mapped);
    }

    cleaned.trim_start_matches(['.', '_']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_allocate_names_are_unique() {
        let store = GeneratedFiles::new("out");
        let names: HashSet<String> = (0..1000).map(|_| store.allocate().0).collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn test_allocate_name_shape() {
        let store = GeneratedFiles::new("out");
        let (name, path) = store.allocate();
        assert!(name.starts_with("summary_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), "summary_".len() + 36 + ".pdf".len());
        assert_eq!(path, PathBuf::from("out").join(&name));
    }

    #[tokio::test]
    async fn test_resolve_existing_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = GeneratedFiles::new(dir.path());
        std::fs::write(dir.path().join("summary_a.pdf"), b"%PDF-1.7").unwrap();

        assert_eq!(
            store.resolve("summary_a.pdf").await.unwrap(),
            dir.path().join("summary_a.pdf")
        );
        assert!(matches!(
            store.resolve("summary_b.pdf").await,
            Err(SummarizerError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = GeneratedFiles::new(dir.path().join("generated"));
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

        for name in ["../secret.txt", "..", "", "a/b.pdf", "..\\secret.txt"] {
            assert!(
                matches!(store.resolve(name).await, Err(SummarizerError::FileNotFound(_))),
                "{name:?} should not resolve"
            );
        }
    }

    #[tokio::test]
    async fn test_resolve_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        let store = GeneratedFiles::new(dir.path());
        assert!(matches!(
            store.resolve("nested").await,
            Err(SummarizerError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            upload_dir: dir.path().join("a").join("uploads"),
            generated_dir: dir.path().join("b").join("generated"),
        };
        ensure_directories(&config).unwrap();
        assert!(config.upload_dir.is_dir());
        assert!(config.generated_dir.is_dir());
        // idempotent
        ensure_directories(&config).unwrap();
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("My Report (final).PDF"), "My_Report_final_.PDF");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\doc.pdf"), "doc.pdf");
        assert_eq!(sanitize_filename(".hidden.pdf"), "hidden.pdf");
        assert_eq!(sanitize_filename("relatório.pdf"), "relat_rio.pdf");
        assert_eq!(sanitize_filename("   "), "");
    }
}

//! Module source lookup.
//!
//! The registry never touches the filesystem itself. It asks a [`ModuleFinder`] for the source of a module by
//! name and gets back a [`SourceDocument`]: text plus an identity and a version, which together key the parse
//! cache.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use tokio::sync::RwLock;

use super::RegistryError;
use crate::config::Config;

/// A source text with a stable identity and a version that changes whenever the text does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub uri: String,
    pub version: u64,
    pub text: Arc<str>,
    /// Byte offset of the first invalid UTF-8 sequence in the file, if any. The text is then a lossy decoding.
    pub invalid_utf8_at: Option<usize>,
}

impl SourceDocument {
    pub fn new(uri: impl Into<String>, version: u64, text: impl Into<Arc<str>>) -> Self {
        Self {
            uri: uri.into(),
            version,
            text: text.into(),
            invalid_utf8_at: None,
        }
    }

    /// Decode raw file contents. Invalid UTF-8 is replaced rather than rejected so the module still gets analyzed.
    pub fn from_bytes(uri: impl Into<String>, version: u64, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::new(uri, version, text),
            Err(e) => {
                let offset = e.utf8_error().valid_up_to();
                let text = String::from_utf8_lossy(e.as_bytes()).into_owned();
                Self {
                    invalid_utf8_at: Some(offset),
                    ..Self::new(uri, version, text)
                }
            }
        }
    }
}

/// Name-to-source lookup for imported modules.
pub trait ModuleFinder: Send + Sync {
    /// The source of `module_name`, or `None` if no such module exists.
    fn find(&self, module_name: &str) -> impl Future<Output = Result<Option<SourceDocument>, RegistryError>> + Send;
}

// ============================================================================
// Filesystem
// ============================================================================

/// Looks modules up under the search roots of a [`Config`]. The first existing candidate wins.
#[derive(Debug, Clone)]
pub struct FsModuleFinder {
    config: Config,
}

impl FsModuleFinder {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ModuleFinder for FsModuleFinder {
    async fn find(&self, module_name: &str) -> Result<Option<SourceDocument>, RegistryError> {
        for path in self.config.candidates(module_name) {
            match read_document(&path).await {
                Ok(document) => return Ok(Some(document)),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory | io::ErrorKind::IsADirectory
                    ) => {}
                Err(e) => return Err(RegistryError::io(path, e)),
            }
        }
        Ok(None)
    }
}

/// Read a source file; its version is its modification time in nanoseconds.
pub async fn read_document(path: &Path) -> io::Result<SourceDocument> {
    let bytes = tokio::fs::read(path).await?;
    let version = tokio::fs::metadata(path)
        .await?
        .modified()
        .ok()
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |elapsed| elapsed.as_nanos() as u64);
    Ok(SourceDocument::from_bytes(path.display().to_string(), version, bytes))
}

// ============================================================================
// In memory
// ============================================================================

/// Serves module sources from memory. Every [`insert`](Self::insert) bumps the module's version.
#[derive(Debug, Default)]
pub struct MemoryModuleFinder {
    modules: RwLock<HashMap<String, SourceDocument>>,
}

impl MemoryModuleFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, module_name: &str, text: &str) -> SourceDocument {
        let mut modules = self.modules.write().await;
        let version = modules.get(module_name).map_or(0, |previous| previous.version + 1);
        let document = SourceDocument::new(format!("memory:{module_name}"), version, text);
        modules.insert(module_name.to_string(), document.clone());
        document
    }

    pub async fn remove(&self, module_name: &str) -> bool {
        self.modules.write().await.remove(module_name).is_some()
    }
}

impl ModuleFinder for MemoryModuleFinder {
    async fn find(&self, module_name: &str) -> Result<Option<SourceDocument>, RegistryError> {
        Ok(self.modules.read().await.get(module_name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_finder_versions_increase() {
        let finder = MemoryModuleFinder::new();
        let first = finder.insert("lib", "var x = 1\n").await;
        let second = finder.insert("lib", "var x = 2\n").await;
        assert_eq!(first.uri, second.uri);
        assert!(second.version > first.version);
        assert_eq!(finder.find("lib").await.ok().flatten(), Some(second));
        assert_eq!(finder.find("nope").await.ok().flatten(), None);
    }

    #[tokio::test]
    async fn fs_finder_prefers_package_init() {
        let dir = std::env::temp_dir().join(format!("mtots-finder-{}", std::process::id()));
        tokio::fs::create_dir_all(dir.join("pkg")).await.expect("create dirs");
        tokio::fs::write(dir.join("pkg.mtots"), "var plain = 1\n").await.expect("write");
        tokio::fs::write(dir.join("pkg/__init__.mtots"), "var init = 1\n").await.expect("write");

        let finder = FsModuleFinder::new(Config::new().with_root(&dir).without_env_path());
        let document = finder.find("pkg").await.expect("lookup").expect("found");
        assert!(document.uri.ends_with("__init__.mtots"));
        assert!(finder.find("missing").await.expect("lookup").is_none());

        tokio::fs::remove_dir_all(&dir).await.expect("cleanup");
    }

    #[tokio::test]
    async fn fs_finder_decodes_invalid_utf8_lossily() {
        let dir = std::env::temp_dir().join(format!("mtots-finder-utf8-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.expect("create dirs");
        tokio::fs::write(dir.join("latin.mtots"), b"var s = \"caf\xe9\"\n").await.expect("write");

        let finder = FsModuleFinder::new(Config::new().with_root(&dir).without_env_path());
        let document = finder.find("latin").await.expect("lookup").expect("found");
        assert_eq!(document.invalid_utf8_at, Some(12));
        assert_eq!(&*document.text, "var s = \"caf\u{FFFD}\"\n");

        tokio::fs::remove_dir_all(&dir).await.expect("cleanup");
    }
}

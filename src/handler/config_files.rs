//! Config file lookup module
//!
//! Maps a request path onto a subdirectory of the served root, picks the
//! first JSON file in it and checks that the file parses.

use super::error::LookupError;
use crate::logger;
use serde::de::IgnoredAny;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

pub const JSON_CONTENT_TYPE: &str = "application/json";

const JSON_SUFFIX: &[u8] = b".json";

/// A config file that passed validation, with its bytes exactly as on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

impl ConfigDocument {
    #[allow(clippy::unused_self)]
    pub const fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }
}

/// Resolves request paths against one root directory
///
/// Holds no state besides the root, so a single instance is shared by all
/// connections. Every call goes to the filesystem.
#[derive(Debug, Clone)]
pub struct ConfigRequestHandler {
    root: PathBuf,
}

impl ConfigRequestHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Look up the config document for an already percent-decoded request path
    pub async fn handle(&self, request_path: &str) -> Result<ConfigDocument, LookupError> {
        let relative = request_path.strip_prefix('/').unwrap_or(request_path);
        if relative.is_empty() {
            return Err(LookupError::BadRequest);
        }

        let dir = self.resolve_directory(relative)?;

        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(LookupError::DirectoryNotFound),
        }

        let file = find_json_file(&dir).await?;
        let data = fs::read(&file).await.map_err(LookupError::ReadFile)?;
        serde_json::from_slice::<IgnoredAny>(&data).map_err(LookupError::InvalidJson)?;

        Ok(ConfigDocument { path: file, data })
    }

    /// Join `relative` onto the root lexically; `..` never leaves the root
    ///
    /// A path with no real segment (`//`, `/./`) names the root itself,
    /// which is not a config directory.
    fn resolve_directory(&self, relative: &str) -> Result<PathBuf, LookupError> {
        let mut dir = self.root.clone();
        let mut segments = 0usize;
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(segment) => {
                    dir.push(segment);
                    segments += 1;
                }
                Component::CurDir | Component::RootDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    logger::log_warning(&format!(
                        "Path traversal attempt blocked: /{relative}"
                    ));
                    return Err(LookupError::DirectoryNotFound);
                }
            }
        }
        if segments == 0 {
            return Err(LookupError::BadRequest);
        }
        Ok(dir)
    }
}

/// Pick the first `*.json` entry that is not a directory, by file name
async fn find_json_file(dir: &Path) -> Result<PathBuf, LookupError> {
    let mut entries = fs::read_dir(dir).await.map_err(LookupError::ReadDirectory)?;
    let mut selected: Option<OsString> = None;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(LookupError::ReadDirectory)?
    {
        let name = entry.file_name();
        if !name.as_encoded_bytes().ends_with(JSON_SUFFIX) {
            continue;
        }
        // Unknown file type: skip rather than fail the whole listing
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if file_type.is_dir() {
            continue;
        }
        if selected.as_ref().is_some_and(|current| *current <= name) {
            continue;
        }
        selected = Some(name);
    }

    selected
        .map(|name| dir.join(name))
        .ok_or(LookupError::NoJsonFile)
}

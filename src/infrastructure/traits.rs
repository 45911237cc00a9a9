//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations (filesystem, terminal,
//! platform API), allowing services and the dispatcher to be tested with
//! mock implementations.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{Config, DeployRequest, Deployment, PackageUpload};
use crate::infrastructure::api::HttpPlatformApi;
use crate::infrastructure::error::ApiResult;

/// What a path points to, following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Read file contents as bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Stat a path. Fails with `NotFound` if nothing is there.
    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Canonicalize path (resolve symlinks, make absolute).
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;

    /// List regular files below `root`, relative to it and sorted.
    /// Directories named in `skip_dirs` are not descended into.
    fn list_files(&self, root: &Path, skip_dirs: &[&str]) -> io::Result<Vec<PathBuf>>;
}

/// Interactive list selector abstraction.
pub trait Selector: Send + Sync {
    /// Present items to user and return the index of the selected one.
    /// Returns None if user cancels (Esc/Ctrl-C).
    fn select_one(&self, items: &[String], prompt: &str) -> io::Result<Option<usize>>;
}

/// Free-text terminal input abstraction.
pub trait Prompter: Send + Sync {
    /// Ask for a visible line of input.
    fn input(&self, prompt: &str) -> io::Result<String>;

    /// Ask for a secret without echoing it.
    fn password(&self, prompt: &str) -> io::Result<String>;
}

/// Client for the deployment platform.
pub trait PlatformApi: Send + Sync {
    /// Check that the configured token is accepted.
    fn validate(&self) -> ApiResult<()>;

    /// Exchange credentials for a token.
    fn login(&self, email: &str, password: &str) -> ApiResult<String>;

    /// List all deployments of the account.
    fn inspect(&self) -> ApiResult<Vec<Deployment>>;

    /// Delete one deployment.
    fn delete(&self, prefix: &str, suffix: &str, version: &str) -> ApiResult<()>;

    /// List the branches of a remote repository.
    fn branch_list(&self, url: &str) -> ApiResult<Vec<String>>;

    /// Register a repository branch; returns the resource id used to deploy it.
    fn add_repository(&self, url: &str, branch: &str, jsons: &[String]) -> ApiResult<String>;

    /// Upload a packaged work directory.
    fn upload_package(&self, upload: &PackageUpload) -> ApiResult<()>;

    /// Create a deployment from an uploaded package or registered repository.
    fn deploy(&self, request: &DeployRequest) -> ApiResult<()>;
}

/// Builds a platform client for a given token and endpoint.
pub trait ApiConnector: Send + Sync {
    fn connect(&self, config: &Config) -> ApiResult<Box<dyn PlatformApi>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind> {
        let meta = std::fs::metadata(path)?;
        Ok(if meta.is_dir() {
            EntryKind::Directory
        } else if meta.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        })
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn list_files(&self, root: &Path, skip_dirs: &[&str]) -> io::Result<Vec<PathBuf>> {
        use walkdir::WalkDir;

        let walker = WalkDir::new(root).follow_links(true).into_iter();
        let mut files = Vec::new();
        for entry in walker.filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && skip_dirs.iter().any(|skip| e.file_name() == *skip))
        }) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel_path = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
            files.push(rel_path.to_path_buf());
        }
        files.sort();
        Ok(files)
    }
}

/// Real selector implementation using skim (FZF-like).
#[derive(Debug, Default)]
pub struct SkimSelector;

impl Selector for SkimSelector {
    fn select_one(&self, items: &[String], prompt: &str) -> io::Result<Option<usize>> {
        use skim::prelude::*;
        use std::io::Cursor;

        if items.is_empty() {
            return Ok(None);
        }

        // Build input as newline-separated display strings
        let input = items.join("\n");

        let prompt = format!("{prompt} ");
        let options = SkimOptionsBuilder::default()
            .prompt(Some(prompt.as_str()))
            .height(Some("50%"))
            .multi(false)
            .build()
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::Other,
                    format!("failed to build skim options: {e}"),
                )
            })?;

        let item_reader = SkimItemReader::default();
        let items_arc = item_reader.of_bufread(Cursor::new(input));

        let output = Skim::run_with(&options, Some(items_arc));

        match output {
            Some(out) if out.is_abort => Ok(None),
            Some(out) => Ok(out.selected_items.first().and_then(|selected| {
                let display = selected.output().to_string();
                items.iter().position(|i| *i == display)
            })),
            None => Ok(None),
        }
    }
}

/// Real prompter reading from the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, prompt: &str) -> io::Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(prompt_err)
    }

    fn password(&self, prompt: &str) -> io::Result<String> {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(prompt_err)
    }
}

fn prompt_err(e: dialoguer::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

/// Connector producing blocking HTTP clients.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ApiConnector for HttpConnector {
    fn connect(&self, config: &Config) -> ApiResult<Box<dyn PlatformApi>> {
        Ok(Box::new(HttpPlatformApi::new(config, self.timeout)?))
    }
}

//! Packaging a work directory for upload
//!
//! Collects the files to ship, the runtimes they need and their descriptor
//! files, then bundles them into a gzip'd tarball.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{detect_runner, is_descriptor, Descriptor, Package};
use crate::infrastructure::traits::FileSystem;

/// Directories never shipped with a package.
pub const SKIPPED_DIRS: [&str; 2] = [".git", "node_modules"];

/// Files never shipped with a package; `.env` values go to the deployment instead.
pub const SKIPPED_FILES: [&str; 1] = [".env"];

/// Builds packages from work directories.
pub struct PackageService {
    fs: Arc<dyn FileSystem>,
}

impl PackageService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Scan `root` and describe what would be uploaded.
    ///
    /// Fails with `EmptyRootPath` when there is nothing to ship.
    #[instrument(skip(self))]
    pub fn generate(&self, root: &Path) -> ApplicationResult<Package> {
        let mut files = self
            .fs
            .list_files(root, &SKIPPED_DIRS)
            .with_path_context("list files", root)?;
        files.retain(|f| {
            !f.file_name()
                .is_some_and(|n| SKIPPED_FILES.iter().any(|skip| n == *skip))
        });
        if files.is_empty() {
            return Err(ApplicationError::EmptyRootPath(root.to_path_buf()));
        }

        let mut runners = BTreeSet::new();
        let mut descriptors = Vec::new();
        for file in &files {
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(runner) = detect_runner(name) {
                runners.insert(runner.to_string());
            }
            if is_descriptor(name) {
                let path = root.join(file);
                let content = self
                    .fs
                    .read_to_string(&path)
                    .with_path_context("read descriptor", &path)?;
                debug!("descriptor {}", file.display());
                descriptors.push(Descriptor {
                    path: file.clone(),
                    content,
                });
            }
        }
        debug!(
            "generate: {} files, runners={:?}, {} descriptors",
            files.len(),
            runners,
            descriptors.len()
        );

        Ok(Package {
            root: root.to_path_buf(),
            files,
            runners,
            descriptors,
        })
    }

    /// Bundle the package files into a `.tar.gz` held in memory.
    #[instrument(skip_all, fields(root = %package.root.display()))]
    pub fn archive(&self, package: &Package) -> ApplicationResult<Vec<u8>> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for file in &package.files {
            let path = package.root.join(file);
            let data = self
                .fs
                .read(&path)
                .with_path_context("read package file", &path)?;

            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder
                .append_data(&mut header, file, data.as_slice())
                .with_path_context("archive file", file)?;
        }

        let encoder = builder
            .into_inner()
            .with_path_context("finish archive", &package.root)?;
        let bytes = encoder
            .finish()
            .with_path_context("compress archive", &package.root)?;
        debug!("archive: {} bytes", bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;
    use flate2::read::GzDecoder;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn service() -> PackageService {
        PackageService::new(Arc::new(RealFileSystem))
    }

    #[test]
    fn given_archive_when_unpacking_then_contains_relative_paths_and_content() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("lib")).unwrap();
        std::fs::write(temp.path().join("index.js"), "module.exports = {};").unwrap();
        std::fs::write(temp.path().join("lib/util.js"), "exports.x = 1;").unwrap();

        let svc = service();
        let package = svc.generate(temp.path()).unwrap();
        let bytes = svc.archive(&package).unwrap();

        let mut archive = tar::Archive::new(GzDecoder::new(bytes.as_slice()));
        let mut entries: Vec<(PathBuf, String)> = archive
            .entries()
            .unwrap()
            .map(|e| {
                let mut entry = e.unwrap();
                let path = entry.path().unwrap().into_owned();
                let mut content = String::new();
                std::io::Read::read_to_string(&mut entry, &mut content).unwrap();
                (path, content)
            })
            .collect();
        entries.sort();

        assert_eq!(
            entries,
            vec![
                (PathBuf::from("index.js"), "module.exports = {};".to_string()),
                (PathBuf::from("lib/util.js"), "exports.x = 1;".to_string()),
            ]
        );
    }

    #[test]
    fn given_dotenv_files_when_generating_then_they_are_not_shipped() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("api")).unwrap();
        std::fs::write(temp.path().join("index.js"), "").unwrap();
        std::fs::write(temp.path().join(".env"), "SECRET=1").unwrap();
        std::fs::write(temp.path().join("api/.env"), "SECRET=2").unwrap();
        std::fs::write(temp.path().join("metacall.json"), "{}").unwrap();

        let package = service().generate(temp.path()).unwrap();

        assert_eq!(
            package.files,
            vec![PathBuf::from("index.js"), PathBuf::from("metacall.json")]
        );
        assert_eq!(package.descriptors[0].path, PathBuf::from("metacall.json"));
    }

    #[test]
    fn given_only_dotenv_when_generating_then_empty_root_path() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".env"), "SECRET=1").unwrap();

        let err = service().generate(temp.path()).unwrap_err();

        assert!(matches!(err, ApplicationError::EmptyRootPath(_)));
    }
}

use crate::discovery::domain::DependencyDocument;
use crate::ports::outbound::{HostingProvider, RepositoryInfo, RepositoryRef};
use crate::shared::error::DepGraphError;
use crate::shared::security::{
    validate_not_symlink, validate_regular_file, validate_relative_path, MAX_FILE_SIZE,
};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Build and install outputs that never appear in a hosted tree
const SKIPPED_DIRECTORIES: [&str; 4] = [".git", "node_modules", "target", ".venv"];

/// LocalRepositoryProvider adapter serving a checkout on disk
///
/// Implements the HostingProvider port for the working tree under `root`.
/// There is no SBOM endpoint, so acquisition always starts at the lockfile
/// tier. The branch argument is ignored: the working tree is what gets read.
pub struct LocalRepositoryProvider {
    root: PathBuf,
}

impl LocalRepositoryProvider {
    /// Creates a provider after validating the root directory
    ///
    /// # Errors
    /// Returns `InvalidProjectPath` when the root does not exist, is a
    /// symbolic link, or is not a directory
    pub fn new(root: PathBuf) -> Result<Self> {
        if !root.exists() {
            return Err(DepGraphError::InvalidProjectPath {
                path: root,
                reason: "Directory does not exist".to_string(),
            }
            .into());
        }

        validate_not_symlink(&root, "read").map_err(|e| DepGraphError::InvalidProjectPath {
            path: root.clone(),
            reason: e.to_string(),
        })?;

        if !root.is_dir() {
            return Err(DepGraphError::InvalidProjectPath {
                path: root,
                reason: "Path is not a directory".to_string(),
            }
            .into());
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads `.git/HEAD` to name the checked-out branch
    fn current_branch(root: &Path) -> String {
        fs::read_to_string(root.join(".git").join("HEAD"))
            .ok()
            .and_then(|head| {
                head.trim()
                    .strip_prefix("ref: refs/heads/")
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "HEAD".to_string())
    }

    fn read_file(root: &Path, path: &str) -> Result<Option<String>> {
        validate_relative_path(path)?;
        let full_path = root.join(path);
        if fs::symlink_metadata(&full_path).is_err() {
            return Ok(None);
        }

        validate_regular_file(&full_path, MAX_FILE_SIZE)?;
        let content = fs::read_to_string(&full_path).map_err(|e| DepGraphError::FileReadError {
            path: full_path.clone(),
            details: e.to_string(),
        })?;
        Ok(Some(content))
    }

    /// Breadth-first walk so root-level files come first, sorted per
    /// directory. Symbolic links are neither followed nor listed.
    fn walk(root: &Path, max_files: usize) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let mut queue = VecDeque::from([(root.to_path_buf(), String::new())]);

        while let Some((dir, prefix)) = queue.pop_front() {
            let mut entries: Vec<fs::DirEntry> = fs::read_dir(&dir)
                .map_err(|e| DepGraphError::FileReadError {
                    path: dir.clone(),
                    details: e.to_string(),
                })?
                .filter_map(|entry| entry.ok())
                .collect();
            entries.sort_by_key(|entry| entry.file_name());

            for entry in entries {
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                let name = entry.file_name().to_string_lossy().to_string();
                let relative = format!("{}{}", prefix, name);

                if file_type.is_dir() {
                    if !SKIPPED_DIRECTORIES.contains(&name.as_str()) {
                        queue.push_back((entry.path(), format!("{}/", relative)));
                    }
                } else if file_type.is_file() {
                    files.push(relative);
                    if files.len() >= max_files {
                        return Ok(files);
                    }
                }
            }
        }

        Ok(files)
    }
}

#[async_trait]
impl HostingProvider for LocalRepositoryProvider {
    async fn repository_info(&self, _repo: &RepositoryRef) -> Result<RepositoryInfo> {
        Ok(RepositoryInfo {
            default_branch: Self::current_branch(&self.root),
            languages: Vec::new(),
        })
    }

    async fn get_sbom(&self, _repo: &RepositoryRef) -> Result<Option<DependencyDocument>> {
        Ok(None)
    }

    async fn get_file_content(
        &self,
        _repo: &RepositoryRef,
        _branch: &str,
        path: &str,
    ) -> Result<Option<String>> {
        let root = self.root.clone();
        let path = path.to_string();
        tokio::task::spawn_blocking(move || Self::read_file(&root, &path)).await?
    }

    async fn list_repo_files(
        &self,
        _repo: &RepositoryRef,
        _branch: &str,
        max_files: usize,
    ) -> Result<Vec<String>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || Self::walk(&root, max_files)).await?
    }
}

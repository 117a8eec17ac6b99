use crate::application::dto::{AcquisitionOutcome, AcquisitionSettings, AcquisitionTier, SyncRequest};
use crate::discovery::domain::{DependencyDocument, SbomSource};
use crate::discovery::parsers::LockfileRegistry;
use crate::discovery::services::{DocumentSynthesizer, ImportScanner, MAX_SCANNED_FILES};
use crate::ports::outbound::{HostingProvider, ProgressReporter, RepositoryInfo, RepositoryRef};
use std::sync::Arc;

/// AcquireSbomUseCase - tiered dependency acquisition
///
/// Tries the provider SBOM API, then root-level lockfiles, then an import
/// scan, stopping at the first tier that yields dependencies. Every tier
/// failure is logged and falls through; exhausting all tiers is reported
/// as [`AcquisitionOutcome::NoData`], never as an error.
///
/// # Type Parameters
/// * `H` - HostingProvider implementation
/// * `P` - ProgressReporter implementation
pub struct AcquireSbomUseCase<H: ?Sized, P: ?Sized> {
    provider: Arc<H>,
    progress_reporter: Arc<P>,
    settings: AcquisitionSettings,
}

impl<H, P> AcquireSbomUseCase<H, P>
where
    H: HostingProvider + ?Sized,
    P: ProgressReporter + ?Sized,
{
    pub fn new(provider: Arc<H>, progress_reporter: Arc<P>, settings: AcquisitionSettings) -> Self {
        Self {
            provider,
            progress_reporter,
            settings,
        }
    }

    /// Runs the tiers in order for the requested repository
    ///
    /// # Arguments
    /// * `request` - Sync request naming the product, repository and branch
    ///
    /// # Returns
    /// The first successful tier's document with its provenance tag, or
    /// `NoData` when every enabled tier came up empty
    pub async fn execute(&self, request: &SyncRequest) -> AcquisitionOutcome {
        let repo = &request.repository;
        let mut repository_info = None;

        if self.settings.is_enabled(AcquisitionTier::Api) {
            let (info, document) = self.try_provider_api(repo).await;
            repository_info = info;
            if let Some(document) = document {
                return self.acquired(request, document, SbomSource::Api);
            }
        }

        let lockfile_enabled = self.settings.is_enabled(AcquisitionTier::Lockfile);
        let import_enabled = self.settings.is_enabled(AcquisitionTier::ImportScan);
        if !lockfile_enabled && !import_enabled {
            return self.no_data(request);
        }

        let Some(branch) = self.resolve_branch(request, repository_info).await else {
            return self.no_data(request);
        };

        let files = match self
            .provider
            .list_repo_files(repo, &branch, self.settings.max_repo_files)
            .await
        {
            Ok(files) => Some(files),
            Err(e) => {
                tracing::warn!(product = %request.product, tier = "lockfile", error = %e, "Repository listing failed");
                None
            }
        };

        if lockfile_enabled {
            if let Some((document, source)) =
                self.try_lockfiles(request, &branch, files.as_deref()).await
            {
                return self.acquired(request, document, source);
            }
        }

        if import_enabled {
            if let Some(files) = files.as_deref() {
                if let Some((document, source)) = self.try_import_scan(request, &branch, files).await
                {
                    return self.acquired(request, document, source);
                }
            }
        }

        self.no_data(request)
    }

    /// Tier 1: repository metadata and the provider SBOM, fetched together
    ///
    /// Either call failing fails the whole tier.
    async fn try_provider_api(
        &self,
        repo: &RepositoryRef,
    ) -> (Option<RepositoryInfo>, Option<DependencyDocument>) {
        let joined = tokio::try_join!(
            self.provider.repository_info(repo),
            self.provider.get_sbom(repo)
        );

        match joined {
            Ok((info, Some(document))) if document.dependency_packages().next().is_some() => {
                (Some(info), Some(document))
            }
            Ok((info, _)) => {
                tracing::info!(repository = %repo, tier = "api", "Provider has no SBOM with dependencies");
                (Some(info), None)
            }
            Err(e) => {
                tracing::warn!(repository = %repo, tier = "api", error = %e, "Provider API tier failed");
                (None, None)
            }
        }
    }

    async fn resolve_branch(
        &self,
        request: &SyncRequest,
        repository_info: Option<RepositoryInfo>,
    ) -> Option<String> {
        if let Some(branch) = request.branch.clone() {
            return Some(branch);
        }
        if let Some(info) = repository_info {
            return Some(info.default_branch);
        }
        match self.provider.repository_info(&request.repository).await {
            Ok(info) => Some(info.default_branch),
            Err(e) => {
                tracing::warn!(product = %request.product, error = %e, "Could not resolve default branch");
                None
            }
        }
    }

    /// Tier 2: the first root-level lockfile (in registry order) that parses
    /// to a non-empty dependency list
    ///
    /// Without a listing, every registered filename is fetched directly.
    async fn try_lockfiles(
        &self,
        request: &SyncRequest,
        branch: &str,
        files: Option<&[String]>,
    ) -> Option<(DependencyDocument, SbomSource)> {
        let candidates: Vec<&str> = match files {
            Some(files) => LockfileRegistry::detect(files)
                .into_iter()
                .map(|(_, path)| path)
                .collect(),
            None => LockfileRegistry::formats()
                .iter()
                .map(|format| format.filename)
                .collect(),
        };

        for path in candidates {
            let content = match self
                .provider
                .get_file_content(&request.repository, branch, path)
                .await
            {
                Ok(Some(content)) => content,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(product = %request.product, file = path, error = %e, "Lockfile fetch failed");
                    continue;
                }
            };

            let result = LockfileRegistry::parse(path, &content);
            if result.is_empty() {
                tracing::debug!(product = %request.product, file = path, "Lockfile yielded no dependencies");
                continue;
            }

            let document = DocumentSynthesizer::from_lockfile(&request.product, &result);
            return Some((document, SbomSource::Lockfile(result.lockfile_type)));
        }

        None
    }

    /// Tier 3: import statements in a bounded sample of source files
    async fn try_import_scan(
        &self,
        request: &SyncRequest,
        branch: &str,
        files: &[String],
    ) -> Option<(DependencyDocument, SbomSource)> {
        let selected = ImportScanner::select_sources(files);
        let truncated =
            files.len() >= self.settings.max_repo_files || selected.len() >= MAX_SCANNED_FILES;

        let mut sources = Vec::with_capacity(selected.len());
        for path in selected {
            match self
                .provider
                .get_file_content(&request.repository, branch, path)
                .await
            {
                Ok(Some(content)) => sources.push((path.to_string(), content)),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(product = %request.product, file = path, error = %e, "Source fetch failed");
                }
            }
        }

        let result = ImportScanner::scan(&sources, truncated);
        if result.is_empty() {
            return None;
        }

        let document = DocumentSynthesizer::from_import_scan(&request.product, &result);
        Some((document, SbomSource::ImportScan(result.languages)))
    }

    fn acquired(
        &self,
        request: &SyncRequest,
        document: DependencyDocument,
        source: SbomSource,
    ) -> AcquisitionOutcome {
        let count = document.dependency_packages().count();
        tracing::info!(product = %request.product, source = %source, packages = count, "Acquired dependency data");
        self.progress_reporter.report(&format!(
            "📦 Acquired {} package(s) for {} from {}",
            count, request.product, source
        ));
        AcquisitionOutcome::Acquired { document, source }
    }

    fn no_data(&self, request: &SyncRequest) -> AcquisitionOutcome {
        tracing::info!(product = %request.product, "No dependency data available");
        self.progress_reporter.report(&format!(
            "ℹ️  No dependency data available for {}",
            request.product
        ));
        AcquisitionOutcome::NoData
    }
}

#[cfg(test)]
mod tests;

/// Data Transfer Objects for application layer
///
/// DTOs carry requests, settings and results between the CLI, the use
/// cases and the adapters, keeping the domain layer isolated.
mod acquisition_outcome;
mod output_format;
mod settings;
mod sync_request;
mod sync_response;

pub use acquisition_outcome::{AcquisitionOutcome, GraphSyncSummary};
pub use output_format::OutputFormat;
pub use settings::{AcquisitionSettings, AcquisitionTier, EnrichmentSettings};
pub use sync_request::SyncRequest;
pub use sync_response::{SyncResponse, SyncStatus, SyncSummary};

/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (hosting providers, registries,
/// graph storage, notification, rendering, console).
pub mod compliance_notifier;
pub mod formatter;
pub mod graph_store;
pub mod hosting_provider;
pub mod output_presenter;
pub mod package_registry;
pub mod progress_reporter;
pub mod snapshot_store;

pub use compliance_notifier::ComplianceNotifier;
pub use formatter::ReportFormatter;
pub use graph_store::{GraphStore, NodePredicate};
pub use hosting_provider::{HostingProvider, RepositoryInfo, RepositoryRef};
pub use output_presenter::OutputPresenter;
pub use package_registry::PackageRegistry;
pub use progress_reporter::ProgressReporter;
pub use snapshot_store::SnapshotStore;

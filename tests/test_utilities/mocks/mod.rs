/// Mock implementations for testing
mod mock_hosting_provider;
mod mock_package_registry;
mod mock_progress_reporter;

pub use mock_hosting_provider::MockHostingProvider;
pub use mock_package_registry::MockPackageRegistry;
pub use mock_progress_reporter::MockProgressReporter;

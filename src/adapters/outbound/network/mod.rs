/// Network adapters for hosting providers and package registries
mod caching_registry;
mod crates_io_client;
mod github_provider;
mod npm_client;
mod pypi_client;
mod registry_http;
mod registry_router;
mod rubygems_client;

pub use caching_registry::CachingRegistry;
pub use crates_io_client::CratesIoClient;
pub use github_provider::GitHubProvider;
pub use npm_client::NpmRegistryClient;
pub use pypi_client::PyPiRegistryClient;
pub use registry_http::HttpSettings;
pub use registry_router::RegistryRouter;
pub use rubygems_client::RubyGemsClient;

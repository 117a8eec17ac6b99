/// Use cases module containing application business logic orchestration
mod acquire_sbom;
mod enrich_dependencies;
mod sync_dependency_graph;
mod sync_product;

pub use acquire_sbom::AcquireSbomUseCase;
pub use enrich_dependencies::EnrichDependenciesUseCase;
pub use sync_dependency_graph::SyncDependencyGraphUseCase;
pub use sync_product::{EnrichmentHandle, SyncDependencies, SyncProductUseCase};

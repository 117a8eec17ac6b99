/// Persistence adapters for the dependency graph and snapshots
mod in_memory_graph_store;

pub use in_memory_graph_store::InMemoryGraphStore;

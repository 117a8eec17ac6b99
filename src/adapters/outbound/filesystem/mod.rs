/// Filesystem adapters for repository reads and report output
mod file_writer;
mod local_repository;

pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use local_repository::LocalRepositoryProvider;

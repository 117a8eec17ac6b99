use crate::shared::Result;

/// OutputPresenter port for the rendered sync report
///
/// This port abstracts where the report goes (stdout, a file).
pub trait OutputPresenter {
    /// Presents the rendered report
    ///
    /// # Errors
    /// Returns an error if writing to the destination fails
    fn present(&self, content: &str) -> Result<()>;
}

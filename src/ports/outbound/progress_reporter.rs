/// ProgressReporter port for user-facing feedback
///
/// Structured logs go through `tracing`; this port carries the short
/// human-readable lines (tier outcomes, lookup progress, report summaries).
/// Enrichment reports from a detached task, so implementations must be
/// `Send + Sync`.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: &str);

    /// Reports batch progress
    ///
    /// # Arguments
    /// * `current` - Items processed so far
    /// * `total` - Items in the run
    /// * `message` - Optional label, such as the enrichment kind
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a failure that did not stop the run
    fn report_error(&self, message: &str);

    /// Reports the end of a run
    fn report_completion(&self, message: &str);
}

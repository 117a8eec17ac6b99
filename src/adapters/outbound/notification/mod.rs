/// Notification adapters receiving enrichment gap reports
mod logging_notifier;

pub use logging_notifier::LoggingComplianceNotifier;

/// Formatter adapters for the sync report output formats
mod json_formatter;
mod summary_formatter;

pub use json_formatter::JsonFormatter;
pub use summary_formatter::SummaryFormatter;

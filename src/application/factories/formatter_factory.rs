use crate::adapters::outbound::formatters::{JsonFormatter, SummaryFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ReportFormatter;

/// Factory for creating report formatters
///
/// Selects the formatter adapter for an output format. Colors only apply to
/// the summary format and only when the caller asks for them.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Arguments
    /// * `format` - The output format to create a formatter for
    /// * `colored` - Whether terminal colors may be used
    ///
    /// # Examples
    /// ```
    /// use sbom_depgraph::application::dto::OutputFormat;
    /// use sbom_depgraph::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Json, false);
    /// ```
    pub fn create(format: OutputFormat, colored: bool) -> Box<dyn ReportFormatter> {
        match format {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Summary => Box::new(SummaryFormatter::with_colors(colored)),
        }
    }

    /// Returns the progress message for the specified output format
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Rendering JSON report...",
            OutputFormat::Summary => "📝 Rendering summary report...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::SyncSummary;

    #[test]
    fn test_create_json_formatter() {
        let formatter = FormatterFactory::create(OutputFormat::Json, true);
        let output = formatter.format(&SyncSummary::no_data("acme/app")).unwrap();
        assert!(output.trim_start().starts_with('{'));
    }

    #[test]
    fn test_create_summary_formatter() {
        let formatter = FormatterFactory::create(OutputFormat::Summary, false);
        let output = formatter.format(&SyncSummary::no_data("acme/app")).unwrap();
        assert!(output.starts_with("Product:"));
    }

    #[test]
    fn test_progress_message() {
        assert_eq!(
            FormatterFactory::progress_message(OutputFormat::Summary),
            "📝 Rendering summary report..."
        );
    }
}

use crate::application::dto::{SyncStatus, SyncSummary};
use crate::discovery::domain::{Confidence, EnrichmentGapReport};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use owo_colors::{OwoColorize, Style};
use std::fmt::{self, Write};

/// SummaryFormatter adapter rendering a short human-readable report
///
/// Colors are only applied when `colored` is set, so the same formatter
/// serves terminals and files.
pub struct SummaryFormatter {
    colored: bool,
}

impl SummaryFormatter {
    pub fn new() -> Self {
        Self { colored: false }
    }

    pub fn with_colors(colored: bool) -> Self {
        Self { colored }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.colored {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn confidence_label(confidence: Confidence) -> &'static str {
        match confidence {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }

    fn write_status(&self, out: &mut String, summary: &SyncSummary) -> fmt::Result {
        match summary.status {
            SyncStatus::Acquired => writeln!(
                out,
                "Status:     {} via {}",
                self.paint("acquired", Style::new().green()),
                summary.source.as_deref().unwrap_or("unknown")
            ),
            SyncStatus::NoData => writeln!(
                out,
                "Status:     {}",
                self.paint("no dependency data", Style::new().yellow())
            ),
        }
    }

    fn write_graph(&self, out: &mut String, summary: &SyncSummary) -> fmt::Result {
        let Some(graph) = &summary.graph else {
            return Ok(());
        };
        match (graph.direct, graph.transitive) {
            (Some(direct), Some(transitive)) => writeln!(
                out,
                "Graph:      {} nodes, {} direct, {} transitive",
                graph.nodes, direct, transitive
            ),
            _ => writeln!(
                out,
                "Graph:      {} nodes, depth unclassified",
                graph.nodes
            ),
        }
    }

    fn write_report(&self, out: &mut String, report: &EnrichmentGapReport) -> fmt::Result {
        writeln!(
            out,
            "  {:<8} {} total, {} enriched, {} skipped, {} failed",
            report.kind.to_string(),
            report.total,
            report.enriched,
            report.skipped,
            report.failed
        )?;
        writeln!(
            out,
            "           gaps: noVersion {}, unsupportedEcosystem {}, notFound {}, fetchError {}",
            report.gaps.no_version,
            report.gaps.unsupported_ecosystem,
            report.gaps.not_found,
            report.gaps.fetch_error
        )
    }

    fn render(&self, summary: &SyncSummary) -> std::result::Result<String, fmt::Error> {
        let mut out = String::new();

        writeln!(
            out,
            "Product:    {}",
            self.paint(&summary.product, Style::new().bold())
        )?;
        self.write_status(&mut out, summary)?;
        if summary.status == SyncStatus::NoData {
            return Ok(out);
        }

        writeln!(out, "Packages:   {}", summary.package_count)?;
        self.write_graph(&mut out, summary)?;
        if let Some(confidence) = summary.confidence {
            writeln!(
                out,
                "Confidence: {} ({})",
                Self::confidence_label(confidence),
                summary.detected_languages.join(", ")
            )?;
        }

        if !summary.enrichment.is_empty() {
            writeln!(out, "Enrichment:")?;
            for report in &summary.enrichment {
                self.write_report(&mut out, report)?;
            }
            let gaps = summary.total_gaps();
            let style = if gaps == 0 {
                Style::new().green()
            } else {
                Style::new().red()
            };
            writeln!(out, "Total gaps: {}", self.paint(&gaps.to_string(), style))?;
        }

        Ok(out)
    }
}

impl Default for SummaryFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for SummaryFormatter {
    fn format(&self, summary: &SyncSummary) -> Result<String> {
        Ok(self.render(summary)?)
    }
}

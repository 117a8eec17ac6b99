pub mod depth_classifier;
pub mod document_synthesizer;
pub mod enrichment_triage;
pub mod import_scanner;

pub use depth_classifier::{DepthClassification, DepthClassifier};
pub use document_synthesizer::DocumentSynthesizer;
pub use enrichment_triage::{EnrichmentTriage, TriageDecision};
pub use import_scanner::{ImportScanResult, ImportScanner, MAX_SCANNED_FILES};

pub mod export;
pub mod extractor;
pub mod hotspots;
pub mod layers;
pub mod listing;
pub mod recommendations;
pub mod report;
pub mod scoring;
pub mod service;
pub mod store;

pub use export::{ExportContent, ExportOutput, ExportPipeline, ExportRequest};
pub use extractor::extract_dependencies;
pub use hotspots::detect_hotspots;
pub use layers::{validation_score, LayerValidator};
pub use listing::{paginate, ListQuery, SortKey, SortOrder};
pub use recommendations::generate_recommendations;
pub use report::markdown_report;
pub use scoring::{architecture_score, count_highly_coupled};
pub use service::{build_record, AnalysisOptions, AnalysisService};
pub use store::{AnalysisStore, InMemoryAnalysisStore};

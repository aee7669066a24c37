use archgraph_core::{AnalysisRecord, AnalyzedModule, RecommendationSeverity};
use chrono::SecondsFormat;

const TOP_MODULES: usize = 5;

/// Renders the markdown report for an analysis.
///
/// Sections always appear in the same order, even when a list is empty.
pub fn markdown_report(record: &AnalysisRecord) -> String {
    let summary = &record.summary;
    let mut report = String::new();

    report.push_str("# Module Dependency Analysis\n\n");
    report.push_str(&format!(
        "**Generated:** {}\n\n",
        record.analyzed_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    report.push_str("---\n\n");

    report.push_str("## Summary\n\n");
    report.push_str("| Metric | Value |\n");
    report.push_str("|--------|-------|\n");
    report.push_str(&format!("| Total Modules | {} |\n", summary.total_modules));
    report.push_str(&format!("| Total Files | {} |\n", summary.total_files));
    report.push_str(&format!("| Total Dependencies | {} |\n", summary.total_dependencies));
    report.push_str(&format!("| Average Coupling | {:.2} |\n", summary.average_coupling));
    report.push_str(&format!("| Max Dependencies | {} |\n", summary.max_dependencies));
    report.push_str(&format!(
        "| Circular Dependencies | {} |\n",
        summary.circular_dependencies
    ));
    report.push_str(&format!(
        "| Architecture Score | {}/100 |\n\n",
        summary.architecture_score
    ));
    report.push_str("---\n\n");

    report.push_str("## Top Modules\n\n");
    for (idx, module) in largest_modules(&record.modules).into_iter().enumerate() {
        report.push_str(&format!(
            "{}. **{}** - {} files\n",
            idx + 1,
            module.name,
            module.file_count
        ));
    }
    report.push('\n');

    report.push_str("## Hotspots (Most Used)\n\n");
    for (idx, hotspot) in record.hotspots.iter().enumerate() {
        report.push_str(&format!(
            "{}. **{}** - Used by {} modules\n",
            idx + 1,
            hotspot.module_name,
            hotspot.used_by_count
        ));
    }
    report.push('\n');

    report.push_str("## Recommendations\n\n");
    for rec in &record.recommendations {
        let icon = match rec.severity {
            RecommendationSeverity::Success => '✓',
            RecommendationSeverity::Warning => '⚠',
        };
        report.push_str(&format!("{} {}\n", icon, rec.message));
    }
    report.push('\n');

    report.push_str("---\n\n");
    report.push_str("*Generated by ArchGraph Module Analysis API*\n");
    report
}

/// Top modules by file count, ties in record order.
fn largest_modules(modules: &[AnalyzedModule]) -> Vec<&AnalyzedModule> {
    let mut sorted: Vec<&AnalyzedModule> = modules.iter().collect();
    sorted.sort_by(|a, b| b.file_count.cmp(&a.file_count));
    sorted.truncate(TOP_MODULES);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgraph_core::{
        AnalysisSummary, Hotspot, ModuleMetrics, ModuleProjection, Recommendation,
    };
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn module(name: &str, file_count: usize) -> AnalyzedModule {
        AnalyzedModule {
            id: format!("module:{}", name),
            name: name.to_string(),
            path: name.to_string(),
            files: Vec::new(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
            file_count,
            dependency_count: 0,
            dependent_count: 0,
            metrics: ModuleMetrics::default(),
        }
    }

    fn record() -> AnalysisRecord {
        AnalysisRecord {
            analysis_id: "analysis-42".into(),
            graph_id: "graph-1".into(),
            root_path: "/repo".into(),
            summary: AnalysisSummary {
                total_modules: 7,
                total_files: 30,
                total_dependencies: 9,
                average_coupling: 1.0 / 3.0,
                max_dependencies: 4,
                circular_dependencies: 1,
                architecture_score: 80,
            },
            modules: vec![
                module("a", 1),
                module("b", 9),
                module("c", 3),
                module("d", 9),
                module("e", 2),
                module("f", 7),
                module("g", 0),
            ],
            dependencies: Vec::new(),
            hotspots: vec![Hotspot {
                module_id: "module:b".into(),
                module_name: "b".into(),
                used_by_count: 6,
                reason: "High usage module".into(),
            }],
            recommendations: vec![
                Recommendation::warning("1 circular dependency detected"),
                Recommendation::success("All good"),
            ],
            analyzed_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            projection: Arc::new(ModuleProjection::default()),
        }
    }

    #[test]
    fn sections_appear_in_order() {
        let report = markdown_report(&record());
        let positions: Vec<usize> = [
            "# Module Dependency Analysis",
            "**Generated:** 2024-05-01T12:30:00.000Z",
            "## Summary",
            "## Top Modules",
            "## Hotspots (Most Used)",
            "## Recommendations",
            "*Generated by ArchGraph Module Analysis API*",
        ]
        .iter()
        .map(|marker| report.find(marker).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn summary_table_formats_values() {
        let report = markdown_report(&record());
        assert!(report.contains("| Average Coupling | 0.33 |\n"));
        assert!(report.contains("| Architecture Score | 80/100 |\n"));
        assert!(report.contains("| Circular Dependencies | 1 |\n"));
    }

    #[test]
    fn header_and_summary_layout() {
        let report = markdown_report(&record());
        let expected = "# Module Dependency Analysis\n\n\
**Generated:** 2024-05-01T12:30:00.000Z\n\n\
---\n\n\
## Summary\n\n\
| Metric | Value |\n\
|--------|-------|\n\
| Total Modules | 7 |\n\
| Total Files | 30 |\n\
| Total Dependencies | 9 |\n\
| Average Coupling | 0.33 |\n\
| Max Dependencies | 4 |\n\
| Circular Dependencies | 1 |\n\
| Architecture Score | 80/100 |\n\n\
---\n\n\
## Top Modules\n\n";
        assert!(report.starts_with(expected));
    }

    #[test]
    fn top_modules_are_the_five_largest() {
        let report = markdown_report(&record());
        assert!(report.contains(
            "1. **b** - 9 files\n2. **d** - 9 files\n3. **f** - 7 files\n4. **c** - 3 files\n5. **e** - 2 files\n\n"
        ));
        assert!(!report.contains("**a** - 1 files"));
    }

    #[test]
    fn hotspots_and_recommendations_are_listed() {
        let report = markdown_report(&record());
        assert!(report.contains("1. **b** - Used by 6 modules\n"));
        assert!(report.contains("⚠ 1 circular dependency detected\n✓ All good\n"));
    }

    #[test]
    fn empty_record_still_has_every_section() {
        let mut rec = record();
        rec.modules.clear();
        rec.hotspots.clear();
        rec.recommendations.clear();
        let report = markdown_report(&rec);
        assert!(report.contains("## Top Modules\n\n\n## Hotspots (Most Used)\n\n\n## Recommendations\n\n\n---"));
    }
}

use archgraph_core::{Module, Recommendation};

/// Modules with more declared dependencies than this trigger a coupling warning.
pub const COUPLING_WARNING_THRESHOLD: usize = 5;

/// Advisory messages, in rule order. The cycle rule always fires.
pub fn generate_recommendations(cyclic_dependencies: usize, modules: &[Module]) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if cyclic_dependencies == 0 {
        recommendations.push(Recommendation::success("No circular dependencies detected"));
    } else {
        let noun = if cyclic_dependencies == 1 {
            "dependency"
        } else {
            "dependencies"
        };
        recommendations.push(Recommendation::warning(format!(
            "{} circular {} detected",
            cyclic_dependencies, noun
        )));
    }

    let coupled = modules
        .iter()
        .filter(|m| m.dependency_count() > COUPLING_WARNING_THRESHOLD)
        .count();
    if coupled > 0 {
        recommendations.push(Recommendation::warning(format!(
            "{} module(s) with high coupling (> {} dependencies)",
            coupled, COUPLING_WARNING_THRESHOLD
        )));
    }

    recommendations
}

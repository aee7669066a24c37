use archgraph_core::{Hotspot, Module};

pub const HOTSPOT_MIN_DEPENDENTS: usize = 3;
pub const MAX_HOTSPOTS: usize = 5;
const HOTSPOT_REASON: &str = "High usage module";

/// Top modules by dependent count; ties keep input order.
pub fn detect_hotspots(modules: &[Module]) -> Vec<Hotspot> {
    let mut candidates: Vec<&Module> = modules
        .iter()
        .filter(|m| m.dependent_count() > HOTSPOT_MIN_DEPENDENTS)
        .collect();
    candidates.sort_by(|a, b| b.dependent_count().cmp(&a.dependent_count()));

    candidates
        .into_iter()
        .take(MAX_HOTSPOTS)
        .map(|m| Hotspot {
            module_id: m.id.clone(),
            module_name: m.name.clone(),
            used_by_count: m.dependent_count(),
            reason: HOTSPOT_REASON.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: &str, dependents: usize) -> Module {
        let mut m = Module::new(id, id, id);
        m.dependents = (0..dependents).map(|i| format!("dep-{}", i)).collect();
        m
    }

    #[test]
    fn ranks_by_dependents_with_stable_ties() {
        let modules = vec![
            module("a", 4),
            module("b", 9),
            module("c", 3),
            module("d", 4),
            module("e", 6),
        ];
        let ids: Vec<String> = detect_hotspots(&modules)
            .into_iter()
            .map(|h| h.module_id)
            .collect();
        assert_eq!(ids, vec!["b", "e", "a", "d"]);
    }

    #[test]
    fn keeps_at_most_five() {
        let modules: Vec<Module> = (0..8).map(|i| module(&format!("m{}", i), 10 + i)).collect();
        let hotspots = detect_hotspots(&modules);
        assert_eq!(hotspots.len(), 5);
        assert_eq!(hotspots[0].module_id, "m7");
        assert_eq!(hotspots[0].used_by_count, 17);
        assert_eq!(hotspots[0].reason, "High usage module");
    }
}

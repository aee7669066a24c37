use crate::Recommendation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DOMAIN_LAYER: &str = "domain";
pub const APPLICATION_LAYER: &str = "application";
pub const INFRASTRUCTURE_LAYER: &str = "infrastructure";

/// Layer name to path-substring patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerConfig(BTreeMap<String, Vec<String>>);

impl LayerConfig {
    pub fn new(layers: BTreeMap<String, Vec<String>>) -> Self {
        Self(layers)
    }

    /// Patterns of a layer; an unconfigured layer has none.
    pub fn patterns(&self, layer: &str) -> &[String] {
        self.0.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn matches(&self, layer: &str, path: &str) -> bool {
        self.patterns(layer)
            .iter()
            .any(|pattern| path.contains(pattern.as_str()))
    }

    /// The three standard layers first, then any extra layers by name.
    pub fn layer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = [DOMAIN_LAYER, APPLICATION_LAYER, INFRASTRUCTURE_LAYER]
            .iter()
            .map(|s| s.to_string())
            .collect();
        names.extend(
            self.0
                .keys()
                .filter(|k| !names.contains(k))
                .cloned()
                .collect::<Vec<_>>(),
        );
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        let mut layers = BTreeMap::new();
        for name in [DOMAIN_LAYER, APPLICATION_LAYER, INFRASTRUCTURE_LAYER] {
            layers.insert(name.to_string(), vec![name.to_string()]);
        }
        Self(layers)
    }
}

/// Letter bucket of a validation score.
///
/// No `D` tier is produced: scores below 45 map straight to `F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::APlus,
            75..=89 => Grade::A,
            60..=74 => Grade::B,
            45..=59 => Grade::C,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A domain module depending on an outer-layer module, by module name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerViolation {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub score: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<LayerViolation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycles: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationChecks {
    pub domain_independence: Check,
    pub layered_architecture: Check,
    pub no_cycles: Check,
    pub dependency_direction: Check,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerBreakdown {
    pub name: String,
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub module: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub domain_modules: usize,
    pub application_modules: usize,
    pub infrastructure_modules: usize,
    pub total_violations: usize,
}

/// Ephemeral layering report; recomputed on every validate call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub validation_id: String,
    pub score: u32,
    pub checks: ValidationChecks,
    pub layers: Vec<LayerBreakdown>,
    pub violations: Vec<Violation>,
    pub recommendations: Vec<Recommendation>,
    pub summary: ValidationSummary,
    pub grade: Grade,
    pub validated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_boundaries() {
        let cases = [
            (100, "A+"),
            (90, "A+"),
            (89, "A"),
            (75, "A"),
            (74, "B"),
            (60, "B"),
            (59, "C"),
            (45, "C"),
            (44, "F"),
            (0, "F"),
        ];
        for (score, expected) in cases {
            assert_eq!(Grade::from_score(score).as_str(), expected, "score {}", score);
        }
    }

    #[test]
    fn grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        assert_eq!(serde_json::to_string(&Grade::F).unwrap(), "\"F\"");
    }

    #[test]
    fn missing_standard_layers_have_no_patterns() {
        let mut layers = BTreeMap::new();
        layers.insert("domain".to_string(), vec!["core".to_string()]);
        layers.insert("adapters".to_string(), vec!["adapters".to_string()]);
        let config = LayerConfig::new(layers);

        assert!(config.patterns(APPLICATION_LAYER).is_empty());
        assert!(config.matches(DOMAIN_LAYER, "src/core/user"));
        assert_eq!(
            config.layer_names(),
            vec!["domain", "application", "infrastructure", "adapters"]
        );
    }
}

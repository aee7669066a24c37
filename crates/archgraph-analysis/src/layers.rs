//! Layer classification and inward-dependency validation.
//!
//! Modules are assigned to layers by path-substring patterns. Patterns are not
//! mutually exclusive, so one module may appear in several layers. The only
//! rule enforced is that domain modules must not depend on application or
//! infrastructure modules.

use crate::scoring::{
    clamp_score, count_highly_coupled, penalty, COUPLING_PENALTY, COUPLING_PENALTY_CAP,
    CYCLE_PENALTY, CYCLE_PENALTY_CAP,
};
use archgraph_core::{
    AnalysisRecord, AnalyzedModule, Check, Grade, LayerBreakdown, LayerConfig, LayerViolation,
    ValidationChecks, ValidationResult, ValidationSummary, Violation, ViolationSeverity,
    APPLICATION_LAYER, DOMAIN_LAYER, INFRASTRUCTURE_LAYER,
};
use chrono::{DateTime, Utc};
use tracing::debug;

pub const DOMAIN_INDEPENDENCE_RULE: &str = "domain-independence";

const VIOLATION_PENALTY: i64 = 30;
const VIOLATION_PENALTY_CAP: i64 = 30;
const DIRECTION_PENALTY: i64 = 20;

/// Aggregate validation score, clamped to 0..=100.
pub fn validation_score(
    cyclic_dependencies: usize,
    domain_violations: usize,
    highly_coupled_modules: usize,
) -> u32 {
    let score = 100
        - penalty(cyclic_dependencies, CYCLE_PENALTY, CYCLE_PENALTY_CAP)
        - penalty(domain_violations, VIOLATION_PENALTY, VIOLATION_PENALTY_CAP)
        - penalty(highly_coupled_modules, COUPLING_PENALTY, COUPLING_PENALTY_CAP);
    clamp_score(score)
}

/// Per-check score: full marks when passed, otherwise an uncapped penalty floored at 0.
fn check_score(passed: bool, count: usize, per_item: i64) -> u32 {
    if passed {
        100
    } else {
        clamp_score(100 - penalty(count, per_item, i64::MAX))
    }
}

pub struct LayerValidator {
    layers: LayerConfig,
}

impl LayerValidator {
    pub fn new(layers: LayerConfig) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &LayerConfig {
        &self.layers
    }

    /// Modules whose path contains any pattern of `layer`, in record order.
    pub fn modules_in<'a>(&self, layer: &str, modules: &'a [AnalyzedModule]) -> Vec<&'a AnalyzedModule> {
        modules
            .iter()
            .filter(|m| self.layers.matches(layer, &m.path))
            .collect()
    }

    fn is_outer_layer(&self, module: &AnalyzedModule) -> bool {
        self.layers.matches(APPLICATION_LAYER, &module.path)
            || self.layers.matches(INFRASTRUCTURE_LAYER, &module.path)
    }

    /// Edges leaving a domain module towards an application or infrastructure module.
    pub fn domain_violations(&self, record: &AnalysisRecord) -> Vec<LayerViolation> {
        let mut violations = Vec::new();
        for domain_module in self.modules_in(DOMAIN_LAYER, &record.modules) {
            for edge in record
                .dependencies
                .iter()
                .filter(|d| d.from == domain_module.id)
            {
                let Some(target) = record.module(&edge.to) else {
                    continue;
                };
                if self.is_outer_layer(target) {
                    violations.push(LayerViolation {
                        from: domain_module.name.clone(),
                        to: target.name.clone(),
                    });
                }
            }
        }
        violations
    }

    pub fn validate(&self, record: &AnalysisRecord) -> ValidationResult {
        self.validate_at(record, Utc::now())
    }

    pub fn validate_at(&self, record: &AnalysisRecord, now: DateTime<Utc>) -> ValidationResult {
        let violations = self.domain_violations(record);
        let violation_count = violations.len();
        let cycles = record.summary.circular_dependencies;
        let highly_coupled = count_highly_coupled(record.modules.iter().map(|m| m.dependency_count));

        let score = validation_score(cycles, violation_count, highly_coupled);
        let checks = build_checks(&violations, cycles);

        let layers: Vec<LayerBreakdown> = self
            .layers
            .layer_names()
            .into_iter()
            .map(|name| {
                let modules = self
                    .modules_in(&name, &record.modules)
                    .into_iter()
                    .map(|m| m.id.clone())
                    .collect();
                LayerBreakdown { name, modules }
            })
            .collect();

        let summary = ValidationSummary {
            domain_modules: self.modules_in(DOMAIN_LAYER, &record.modules).len(),
            application_modules: self.modules_in(APPLICATION_LAYER, &record.modules).len(),
            infrastructure_modules: self.modules_in(INFRASTRUCTURE_LAYER, &record.modules).len(),
            total_violations: violation_count + cycles,
        };

        let flat_violations = violations
            .iter()
            .map(|v| Violation {
                rule: DOMAIN_INDEPENDENCE_RULE.to_string(),
                severity: ViolationSeverity::Error,
                message: format!("Domain module \"{}\" depends on \"{}\"", v.from, v.to),
                module: v.from.clone(),
            })
            .collect();

        let grade = Grade::from_score(score);
        debug!(
            analysis_id = %record.analysis_id,
            score,
            grade = %grade,
            violations = violation_count,
            "Layer validation complete"
        );

        ValidationResult {
            validation_id: format!("validation-{}", now.timestamp_millis()),
            score,
            checks,
            layers,
            violations: flat_violations,
            recommendations: record.recommendations.clone(),
            summary,
            grade,
            validated_at: now,
        }
    }
}

impl Default for LayerValidator {
    fn default() -> Self {
        Self::new(LayerConfig::default())
    }
}

fn build_checks(violations: &[LayerViolation], cycles: usize) -> ValidationChecks {
    let count = violations.len();
    let layering_ok = count == 0;
    let acyclic = cycles == 0;

    ValidationChecks {
        domain_independence: Check {
            name: "Domain Independence".to_string(),
            passed: layering_ok,
            score: check_score(layering_ok, count, VIOLATION_PENALTY),
            message: if layering_ok {
                "Domain has 0 dependencies on Infrastructure/Application".to_string()
            } else {
                format!("Domain has {} violation(s)", count)
            },
            violations: Some(violations.to_vec()),
            cycles: None,
        },
        layered_architecture: Check {
            name: "Layered Architecture".to_string(),
            passed: layering_ok,
            score: check_score(layering_ok, count, VIOLATION_PENALTY),
            message: if layering_ok {
                "Layers are properly separated".to_string()
            } else {
                format!("{} layer violation(s) detected", count)
            },
            violations: None,
            cycles: None,
        },
        no_cycles: Check {
            name: "No Circular Dependencies".to_string(),
            passed: acyclic,
            score: check_score(acyclic, cycles, CYCLE_PENALTY),
            message: if acyclic {
                "No circular dependencies detected".to_string()
            } else {
                format!("{} circular dependencies detected", cycles)
            },
            violations: None,
            cycles: Some(Vec::new()),
        },
        dependency_direction: Check {
            name: "Dependency Direction".to_string(),
            passed: layering_ok,
            score: check_score(layering_ok, count, DIRECTION_PENALTY),
            message: if layering_ok {
                "All dependencies flow inward".to_string()
            } else {
                "Some dependencies flow outward".to_string()
            },
            violations: Some(violations.to_vec()),
            cycles: None,
        },
    }
}

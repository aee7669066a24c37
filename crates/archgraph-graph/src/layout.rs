//! Layered layout by iterative layer peeling.
//!
//! Rank 0 holds modules without dependencies; each following rank holds
//! modules whose dependencies all sit in earlier ranks. Modules stuck on a
//! cycle share one rank after the last acyclic layer.

use archgraph_core::{GraphView, LayoutDirection, LayoutEngine, Position, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct LayeredLayoutEngine {
    pub node_gap: f64,
    pub rank_gap: f64,
    pub margin: f64,
}

impl Default for LayeredLayoutEngine {
    fn default() -> Self {
        Self {
            node_gap: 40.0,
            rank_gap: 80.0,
            margin: 20.0,
        }
    }
}

/// Rank of every node, indexed like `view.nodes`.
pub fn assign_ranks(view: &GraphView) -> Vec<usize> {
    let index: HashMap<&str, usize> = view
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut dependencies: Vec<HashSet<usize>> = vec![HashSet::new(); view.nodes.len()];
    for edge in &view.edges {
        if let (Some(&from), Some(&to)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
            if from != to {
                dependencies[from].insert(to);
            }
        }
    }

    let mut ranks: Vec<Option<usize>> = vec![None; view.nodes.len()];
    let mut current = 0;
    loop {
        let ready: Vec<usize> = (0..view.nodes.len())
            .filter(|&i| ranks[i].is_none())
            .filter(|&i| dependencies[i].iter().all(|&d| ranks[d].is_some()))
            .collect();
        if ready.is_empty() {
            break;
        }
        for i in ready {
            ranks[i] = Some(current);
        }
        current += 1;
    }

    ranks.into_iter().map(|r| r.unwrap_or(current)).collect()
}

impl LayeredLayoutEngine {
    fn apply(&self, view: &mut GraphView) {
        if view.nodes.is_empty() {
            view.width = 0.0;
            view.height = 0.0;
            return;
        }

        let ranks = assign_ranks(view);
        let rank_count = ranks.iter().copied().max().map_or(0, |r| r + 1);
        let cell_width = view.nodes.iter().map(|n| n.width).fold(0.0, f64::max);
        let cell_height = view.nodes.iter().map(|n| n.height).fold(0.0, f64::max);

        let mut slots = vec![0usize; rank_count];
        let mut widest = 0usize;
        let direction = view.direction;
        let horizontal = direction.is_horizontal();
        let (rank_step, slot_step) = if horizontal {
            (cell_width + self.rank_gap, cell_height + self.node_gap)
        } else {
            (cell_height + self.rank_gap, cell_width + self.node_gap)
        };

        for (node, &rank) in view.nodes.iter_mut().zip(&ranks) {
            let slot = slots[rank];
            slots[rank] += 1;
            widest = widest.max(slots[rank]);

            let visual_rank = match direction {
                LayoutDirection::TB | LayoutDirection::LR => rank,
                LayoutDirection::BT | LayoutDirection::RL => rank_count - 1 - rank,
            };
            let along = self.margin + visual_rank as f64 * rank_step;
            let across = self.margin + slot as f64 * slot_step;

            node.rank = Some(rank);
            node.position = Some(if horizontal {
                Position {
                    x: along + cell_width / 2.0,
                    y: across + cell_height / 2.0,
                }
            } else {
                Position {
                    x: across + cell_width / 2.0,
                    y: along + cell_height / 2.0,
                }
            });
        }

        let span_ranks = rank_count as f64 * rank_step - self.rank_gap + 2.0 * self.margin;
        let span_slots = widest as f64 * slot_step - self.node_gap + 2.0 * self.margin;
        if horizontal {
            view.width = span_ranks;
            view.height = span_slots;
        } else {
            view.width = span_slots;
            view.height = span_ranks;
        }
        debug!(ranks = rank_count, widest, "Layout assigned");
    }
}

#[async_trait]
impl LayoutEngine for LayeredLayoutEngine {
    async fn layout(&self, view: &mut GraphView) -> Result<()> {
        self.apply(view);
        Ok(())
    }
}

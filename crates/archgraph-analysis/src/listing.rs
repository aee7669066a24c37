use archgraph_core::{AnalysisListItem, AnalysisPage, Pagination};
use std::cmp::Ordering;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    AnalysisId,
    RootPath,
    ModuleCount,
    DependencyCount,
    CircularCount,
    Score,
    #[default]
    CreatedAt,
}

impl SortKey {
    /// Unknown keys fall back to `createdAt`.
    pub fn parse(key: &str) -> Self {
        match key {
            "analysisId" => SortKey::AnalysisId,
            "rootPath" => SortKey::RootPath,
            "moduleCount" => SortKey::ModuleCount,
            "dependencyCount" => SortKey::DependencyCount,
            "circularCount" => SortKey::CircularCount,
            "score" => SortKey::Score,
            _ => SortKey::CreatedAt,
        }
    }

    fn compare(&self, a: &AnalysisListItem, b: &AnalysisListItem) -> Ordering {
        match self {
            SortKey::AnalysisId => a.analysis_id.cmp(&b.analysis_id),
            SortKey::RootPath => a.root_path.cmp(&b.root_path),
            SortKey::ModuleCount => a.module_count.cmp(&b.module_count),
            SortKey::DependencyCount => a.dependency_count.cmp(&b.dependency_count),
            SortKey::CircularCount => a.circular_count.cmp(&b.circular_count),
            SortKey::Score => a.score.cmp(&b.score),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything but `asc` sorts descending.
    pub fn parse(order: &str) -> Self {
        if order == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: usize,
    pub offset: usize,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort: SortKey::default(),
            order: SortOrder::default(),
        }
    }
}

impl ListQuery {
    /// Lenient parsing of raw query parameters; nothing here is ever rejected.
    pub fn from_params(
        limit: Option<&str>,
        offset: Option<&str>,
        sort: Option<&str>,
        order: Option<&str>,
    ) -> Self {
        let limit = limit
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        let offset = offset
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        Self {
            limit,
            offset,
            sort: sort.map(SortKey::parse).unwrap_or_default(),
            order: order.map(SortOrder::parse).unwrap_or_default(),
        }
    }
}

/// Sorts and slices history rows. Ties are broken by analysis id.
pub fn paginate(mut items: Vec<AnalysisListItem>, query: &ListQuery) -> AnalysisPage {
    items.sort_by(|a, b| {
        let ordering = query
            .sort
            .compare(a, b)
            .then_with(|| a.analysis_id.cmp(&b.analysis_id));
        match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let total = items.len();
    let analyses: Vec<AnalysisListItem> = items
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect();

    AnalysisPage {
        analyses,
        pagination: Pagination {
            total,
            limit: query.limit,
            offset: query.offset,
            has_more: query.offset.saturating_add(query.limit) < total,
        },
    }
}

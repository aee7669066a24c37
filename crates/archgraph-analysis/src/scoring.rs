/// A module with more declared dependencies than this is highly coupled.
pub const HIGH_COUPLING_THRESHOLD: usize = 7;

pub(crate) const CYCLE_PENALTY: i64 = 20;
pub(crate) const CYCLE_PENALTY_CAP: i64 = 40;
pub(crate) const COUPLING_PENALTY: i64 = 5;
pub(crate) const COUPLING_PENALTY_CAP: i64 = 20;

pub(crate) fn penalty(count: usize, per_item: i64, cap: i64) -> i64 {
    i64::try_from(count)
        .unwrap_or(i64::MAX)
        .saturating_mul(per_item)
        .min(cap)
}

pub(crate) fn clamp_score(score: i64) -> u32 {
    score.clamp(0, 100) as u32
}

pub fn count_highly_coupled<I>(dependency_counts: I) -> usize
where
    I: IntoIterator<Item = usize>,
{
    dependency_counts
        .into_iter()
        .filter(|&count| count > HIGH_COUPLING_THRESHOLD)
        .count()
}

/// 0..=100 quality score penalizing cycles and highly coupled modules.
pub fn architecture_score(cyclic_dependencies: usize, highly_coupled_modules: usize) -> u32 {
    let score = 100
        - penalty(cyclic_dependencies, CYCLE_PENALTY, CYCLE_PENALTY_CAP)
        - penalty(highly_coupled_modules, COUPLING_PENALTY, COUPLING_PENALTY_CAP);
    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_projection_scores_full_marks() {
        assert_eq!(architecture_score(0, 0), 100);
    }

    #[test]
    fn two_cycles_and_one_coupled_module() {
        assert_eq!(architecture_score(2, 1), 55);
    }

    #[test]
    fn penalties_are_capped() {
        assert_eq!(architecture_score(10, 0), 60);
        assert_eq!(architecture_score(0, 100), 80);
        assert_eq!(architecture_score(usize::MAX, usize::MAX), 40);
    }

    #[test]
    fn coupling_threshold_is_exclusive() {
        assert_eq!(count_highly_coupled([7, 8, 3, 12]), 2);
        assert_eq!(count_highly_coupled(Vec::new()), 0);
    }
}

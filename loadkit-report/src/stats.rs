/// Summary statistics over one ascending-sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
}

impl Stats {
    /// Compute min/max/avg/median for `sorted`, which the caller must have
    /// sorted ascending. Every field is 0.0 for an empty slice; that
    /// sentinel is the single empty-input policy for the whole workspace.
    pub fn from_sorted(sorted: &[f64]) -> Stats {
        if sorted.is_empty() {
            return Stats { min: 0.0, max: 0.0, avg: 0.0, median: 0.0 };
        }
        let sum: f64 = sorted.iter().sum();
        Stats {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            avg: sum / sorted.len() as f64,
            median: percentile(sorted, 50.0),
        }
    }
}

/// Return the element of `sorted` (ascending) at index `floor(k/100 * n)`,
/// clamped to the last element. Returns 0.0 for an empty slice.
///
/// This is the one percentile definition used everywhere; call sites must
/// not introduce their own index formula.
pub fn percentile(sorted: &[f64], k: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (k / 100.0 * sorted.len() as f64).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Sort a duration sequence ascending with a total order over f64.
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

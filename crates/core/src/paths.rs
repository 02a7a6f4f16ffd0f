use super::csr::GraphCSR;
use common::error::Error;

/// Walk counts and weight sums by walk length.
///
/// `count[i][v]` is the number of walks with exactly `i` edges from the source
/// to `v`; `weight_sum[i][v]` is the summed cost of those walks.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCounts {
    pub count: Vec<Vec<u128>>,
    pub weight_sum: Vec<Vec<f64>>,
}

impl PathCounts {
    /// Longest walk length tabulated.
    pub fn max_len(&self) -> usize {
        self.count.len().saturating_sub(1)
    }

    /// Mean cost of the walks with `len` edges ending at `target`; `0` if there are none.
    pub fn average_weight(&self, len: usize, target: usize) -> f64 {
        match (self.count.get(len), self.weight_sum.get(len)) {
            (Some(count), Some(sum)) => match (count.get(target), sum.get(target)) {
                (Some(&c), Some(&s)) if c > 0 => s / c as f64,
                _ => 0.0,
            },
            _ => 0.0,
        }
    }
}

/// Counts walks from `source` of every length `0..=max_len` and sums their costs.
///
/// `max_len` defaults to `n - 1`. Walks may repeat vertices, so counts grow
/// exponentially on dense graphs.
///
/// # Errors
/// - `Error::NodeIndexOutOfBounds` for an unknown source.
/// - `Error::CountOverflow` when a count exceeds `u128`.
pub fn count_paths(
    graph: &GraphCSR,
    source: usize,
    max_len: Option<usize>,
) -> Result<PathCounts, Error> {
    if !graph.has_vertex(source) {
        return Err(Error::NodeIndexOutOfBounds(source));
    }

    let n = graph.num_nodes;
    let limit = max_len.unwrap_or(n - 1);

    let mut count = vec![vec![0u128; n]; limit + 1];
    let mut weight_sum = vec![vec![0.0f64; n]; limit + 1];
    count[0][source] = 1;

    for i in 1..=limit {
        let (previous, current) = count.split_at_mut(i);
        let (previous_sum, current_sum) = weight_sum.split_at_mut(i);
        let (prev_count, next_count) = (&previous[i - 1], &mut current[0]);
        let (prev_sum, next_sum) = (&previous_sum[i - 1], &mut current_sum[0]);

        for (u, v, weight) in graph.edges() {
            let walks = prev_count[u];
            if walks == 0 {
                continue;
            }
            next_count[v] = next_count[v]
                .checked_add(walks)
                .ok_or(Error::CountOverflow(i))?;
            // Every walk to `u` extends by the same edge.
            next_sum[v] += prev_sum[u] + walks as f64 * weight;
        }
    }

    Ok(PathCounts { count, weight_sum })
}

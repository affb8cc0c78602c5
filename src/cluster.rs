use crate::color::Color;
use crate::error::Error;
use crate::membership::{Membership, MembershipTable};
use crate::stats::{ClusterStats, complement_mean, complement_stats, finalize};
use crate::weights::Weights;

fn channel(color: Color, axis: usize) -> f64 {
    match axis {
        0 => f64::from(color.red()),
        1 => f64::from(color.green()),
        _ => f64::from(color.blue()),
    }
}

/// The compacted subsequence of deduplicated points belonging to the
/// cluster currently being split.
///
/// The first split reads straight out of the full deduplicated input (no
/// copy); every split after that reads from an owned scratch buffer that is
/// cleared and refilled in place, sized once to the larger of the two
/// subclusters produced by the first split (no later cluster can exceed
/// that size, since every subsequent split only shrinks its target).
enum ActiveBuffer<'a> {
    Borrowed(&'a [Color]),
    Owned {
        points: Vec<Color>,
        indices: Vec<u32>,
    },
}

impl<'a> ActiveBuffer<'a> {
    fn points(&self) -> &[Color] {
        match self {
            Self::Borrowed(p) => p,
            Self::Owned { points, .. } => points,
        }
    }

    /// Maps a position within the active buffer back to its index in the
    /// original deduplicated point set.
    fn original_index(&self, local: usize) -> usize {
        match self {
            Self::Borrowed(_) => local,
            Self::Owned { indices, .. } => indices[local] as usize,
        }
    }

    fn rebuild(&mut self, points: &[Color], membership: &Membership, target: u32) {
        let indices = membership.indices_with(target);
        match self {
            Self::Borrowed(_) => {
                let owned_points = indices.iter().map(|&i| points[i as usize]).collect();
                *self = Self::Owned {
                    points: owned_points,
                    indices,
                };
            }
            Self::Owned {
                points: owned_points,
                indices: owned_indices,
            } => {
                owned_points.clear();
                owned_points.extend(indices.iter().map(|&i| points[i as usize]));
                *owned_indices = indices;
            }
        }
    }
}

/// The outcome of dividing the deduplicated point set into clusters: final
/// per-cluster statistics (indexed by cluster id, length ≤ `max_clusters`)
/// and the membership table mapping every point to its cluster id.
pub struct SplitResult {
    pub stats: Vec<ClusterStats>,
    pub membership: Membership,
}

/// Computes the weighted mean/variance of the entire point set in one pass.
fn whole_set_stats(points: &[Color], weights: &Weights) -> ClusterStats {
    let mut sum = [0.0; 3];
    let mut sum_sq = [0.0; 3];
    for (i, &p) in points.iter().enumerate() {
        let w = weights.get(i);
        for axis in 0..3 {
            let v = channel(p, axis);
            sum[axis] += w * v;
            sum_sq[axis] += w * v * v;
        }
    }
    let weight_total = weights.total(points.len());
    let (mean, variance) = finalize(weight_total, sum, sum_sq);
    ClusterStats {
        weight: weight_total,
        mean,
        variance,
        count: points.len(),
    }
}

/// Divides `points` into at most `max_clusters` clusters by recursive
/// variance-axis splitting, refining each split with up to `max_iters`
/// rounds of restricted two-centroid k-means.
///
/// `points.len()` must be at least `max_clusters`, and `max_clusters` must
/// be nonzero; both are validated up front so that no split can ever divide
/// by a zero cluster weight.
pub fn split_all(
    points: &[Color],
    weights: &Weights,
    max_clusters: usize,
    max_iters: usize,
) -> Result<SplitResult, Error> {
    if max_clusters == 0 {
        return Err(Error::InvalidClusterCount { k: 0 });
    }
    if max_clusters > points.len() {
        return Err(Error::TooManyClusters {
            k: max_clusters,
            unique: points.len(),
        });
    }

    let n = points.len();
    let mut membership = Membership::new(n, max_clusters);
    let mut stats = vec![ClusterStats::default(); max_clusters];

    stats[0] = whole_set_stats(points, weights);

    if max_clusters == 1 {
        return Ok(SplitResult {
            stats,
            membership,
        });
    }

    let mut active = ActiveBuffer::Borrowed(points);
    let mut old_index = 0usize;

    for new_index in 1..max_clusters {
        let total = stats[old_index];
        if total.count <= 1 {
            // Can't split a singleton cluster further; stop early. Unreachable
            // when max_clusters <= points.len() (guaranteed above), kept as a
            // defensive bound matching the reference implementation's
            // "no cluster has more than one point" termination clause.
            break;
        }

        let cut_axis = total.widest_axis();
        let cut_pos = total.mean[cut_axis];

        // Initial split scan: points strictly greater than cut_pos on the
        // cut axis go to the new cluster.
        let apply_local_kmeans = max_iters > 0;
        let active_points = active.points();

        let mut new_sum = [0.0; 3];
        let mut new_sum_sq = [0.0; 3];
        let mut new_weight = 0.0;
        let mut new_count = 0usize;

        for (ip, &pixel) in active_points.iter().enumerate() {
            if cut_pos >= channel(pixel, cut_axis) {
                continue;
            }
            let point_index = active.original_index(ip);
            let w = weights.get(point_index);
            for axis in 0..3 {
                let v = channel(pixel, axis);
                new_sum[axis] += w * v;
                if !apply_local_kmeans {
                    new_sum_sq[axis] += w * v * v;
                }
            }
            new_weight += w;
            if !apply_local_kmeans {
                membership.set(point_index, new_index as u32);
                new_count += 1;
            }
        }

        if new_weight == 0.0 {
            // The cut axis has zero spread (every active point shares the same
            // value on it): the strict cut test can never peel anything off.
            // Nothing left to split productively; stop here rather than
            // dividing by a zero cluster weight.
            break;
        }

        let old_weight = total.weight - new_weight;
        let mut new_mean = [0.0; 3];
        for axis in 0..3 {
            new_mean[axis] = new_sum[axis] / new_weight;
        }
        let old_mean = complement_mean(&total, new_weight, new_mean);

        if apply_local_kmeans {
            let refined = refine(
                active_points,
                &active,
                weights,
                &mut membership,
                new_index as u32,
                old_index as u32,
                total,
                old_mean,
                new_mean,
                new_weight,
                max_iters,
            );
            new_mean = refined.new_mean;
            new_sum_sq = refined.new_sum_sq;
            new_weight = refined.new_weight;
            new_count = refined.new_count;
        }

        // old_mean above only ever drives the half-space test inside refine;
        // the final stored mean/variance for both clusters comes from the
        // combined-moment identity applied to the finished new-cluster stats.
        let _ = old_weight;

        let (_, new_var) = finalize(new_weight, scale(new_mean, new_weight), new_sum_sq);
        let new_part = ClusterStats {
            weight: new_weight,
            mean: new_mean,
            variance: new_var,
            count: new_count,
        };
        let (old_weight_final, old_mean_final, old_var) = complement_stats(&total, &new_part);

        stats[old_index] = ClusterStats {
            weight: old_weight_final,
            mean: old_mean_final,
            variance: old_var,
            count: total.count - new_count,
        };
        stats[new_index] = new_part;

        if new_index == max_clusters - 1 {
            break;
        }

        // Pick the next cluster to split: maximum TSE among all created so far.
        let mut best = 0usize;
        let mut best_tse = f64::MIN;
        for (id, s) in stats.iter().enumerate().take(new_index + 1) {
            let tse = s.total_squared_error();
            if best_tse < tse {
                best_tse = tse;
                best = id;
            }
        }
        old_index = best;

        let expected = stats[old_index].count;
        active.rebuild(points, &membership, old_index as u32);
        if active.points().len() != expected {
            return Err(Error::InvariantViolation(format!(
                "active buffer rebuild for cluster {old_index} produced {} points, expected {expected}",
                active.points().len()
            )));
        }
    }

    Ok(SplitResult { stats, membership })
}

fn scale(mean: [f64; 3], weight: f64) -> [f64; 3] {
    [mean[0] * weight, mean[1] * weight, mean[2] * weight]
}

struct RefineResult {
    old_mean: [f64; 3],
    new_mean: [f64; 3],
    new_sum_sq: [f64; 3],
    new_weight: f64,
    new_count: usize,
}

/// Local two-centroid k-means restricted to the active buffer: repartitions
/// points between `old_mean` and `new_mean` using the half-space test, then
/// recomputes `new_mean` by weighted averaging and recovers `old_mean` via
/// the combined-mean identity. Membership and the new cluster's
/// sum-of-squares are only written on the final iteration.
#[allow(clippy::too_many_arguments)]
fn refine(
    active_points: &[Color],
    active: &ActiveBuffer<'_>,
    weights: &Weights,
    membership: &mut Membership,
    new_index: u32,
    old_index: u32,
    total: ClusterStats,
    mut old_mean: [f64; 3],
    mut new_mean: [f64; 3],
    mut new_weight: f64,
    max_iters: usize,
) -> RefineResult {
    let mut new_sum_sq = [0.0; 3];
    let mut new_count = 0usize;

    for it in 0..max_iters {
        let last = it == max_iters - 1;
        let lhs = 0.5
            * (old_mean[0] * old_mean[0] - new_mean[0] * new_mean[0]
                + old_mean[1] * old_mean[1]
                - new_mean[1] * new_mean[1]
                + old_mean[2] * old_mean[2]
                - new_mean[2] * new_mean[2]);
        let rhs = [
            old_mean[0] - new_mean[0],
            old_mean[1] - new_mean[1],
            old_mean[2] - new_mean[2],
        ];

        let mut sum = [0.0; 3];
        let mut sum_sq = [0.0; 3];
        let mut weight_acc = 0.0;
        let mut count = 0usize;

        for (ip, &pixel) in active_points.iter().enumerate() {
            let point_index = active.original_index(ip);
            let dot = rhs[0] * channel(pixel, 0)
                + rhs[1] * channel(pixel, 1)
                + rhs[2] * channel(pixel, 2);

            if lhs < dot {
                // Closer to old_mean: stays with the old cluster.
                if last {
                    membership.set(point_index, old_index);
                }
                continue;
            }

            // Closer to new_mean: joins the new cluster.
            let w = weights.get(point_index);
            for axis in 0..3 {
                let v = channel(pixel, axis);
                sum[axis] += w * v;
                if last {
                    sum_sq[axis] += w * v * v;
                }
            }
            weight_acc += w;
            count += 1;
            if last {
                membership.set(point_index, new_index);
            }
        }

        new_weight = weight_acc;
        for axis in 0..3 {
            new_mean[axis] = sum[axis] / new_weight;
        }
        old_mean = complement_mean(&total, new_weight, new_mean);
        new_count = count;
        if last {
            new_sum_sq = sum_sq;
        }
    }

    RefineResult {
        old_mean,
        new_mean,
        new_sum_sq,
        new_weight,
        new_count,
    }
}

use std::collections::HashMap;

use crate::color::Color;
use crate::error::Error;

/// Bucket count for the dedup hash table: a prime near 20,000, matching the
/// reference implementation.
const HASH_SIZE: i64 = 20023;

fn hash(color: Color) -> usize {
    let h = (33023i64 * i64::from(color.red())
        + 30013i64 * i64::from(color.green())
        + 27011i64 * i64::from(color.blue()))
        & 0x7FFF_FFFF;
    (h % HASH_SIZE) as usize
}

/// Result of deduplicating a pixel grid: one entry per unique color, plus a
/// parallel weight derived from how often it occurred among the sampled
/// positions.
pub struct Deduplicated {
    pub colors: Vec<Color>,
    pub weights: Vec<f64>,
}

/// Visits every `(decimation * i, decimation * j)` position of a `rows`-by-
/// `cols` pixel grid, bucketing identical colors by an open hash with
/// chaining, and returns the unique colors plus normalized weights.
///
/// Order of unique colors is bucket-iteration order, i.e. insertion order
/// within a bucket chain, then bucket index order — this crate addresses
/// pixels as `ic + ir * cols`, the indexing consistent with a `rows`-by-
/// `cols` grid (see `SPEC_FULL.md` §9 for why the upstream reference's
/// `ic + ir * numRows` is a latent bug this crate does not reproduce).
pub fn dedup(
    pixels: &[Color],
    rows: usize,
    cols: usize,
    decimation: i64,
) -> Result<Deduplicated, Error> {
    if decimation <= 0 {
        return Err(Error::InvalidDecimation { d: decimation });
    }
    let decimation = decimation as usize;

    // bucket index -> chain of (color, count), in insertion order
    let mut buckets: HashMap<usize, Vec<(Color, u32)>> = HashMap::new();
    let mut num_colors = 0usize;

    let mut ir = 0;
    while ir < rows {
        let mut ic = 0;
        while ic < cols {
            let pixel = pixels[ic + ir * cols];
            let h = hash(pixel);
            let chain = buckets.entry(h).or_default();
            match chain.iter_mut().find(|(c, _)| *c == pixel) {
                Some((_, count)) => *count += 1,
                None => {
                    chain.push((pixel, 1));
                    num_colors += 1;
                }
            }
            ic += decimation;
        }
        ir += decimation;
    }

    let sampled_rows = rows.div_ceil(decimation);
    let sampled_cols = cols.div_ceil(decimation);
    let norm_factor = 1.0 / (sampled_rows * sampled_cols) as f64;

    let mut colors = Vec::with_capacity(num_colors);
    let mut weights = Vec::with_capacity(num_colors);

    let mut bucket_indices: Vec<usize> = buckets.keys().copied().collect();
    bucket_indices.sort_unstable();
    for idx in bucket_indices {
        for (color, count) in &buckets[&idx] {
            colors.push(*color);
            weights.push(norm_factor * f64::from(*count));
        }
    }

    Ok(Deduplicated { colors, weights })
}

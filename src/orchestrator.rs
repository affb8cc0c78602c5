use crate::bitreduce;
use crate::cluster;
use crate::config::QuantizeConfig;
use crate::dedup;
use crate::error::Error;
use crate::nearest;
use crate::palette::{self, Palette};
use crate::color::Color;
use crate::weights::Weights;

/// The result of a full quantize-and-map pass: the reduced palette, and
/// every input pixel rewritten to its nearest palette entry.
#[derive(Debug, Clone)]
pub struct QuantizeResult {
    pub palette: Palette,
    pub mapped: Vec<Color>,
}

/// Builds a palette of at most `config.max_colors` colors from `pixels`
/// (a `rows`-by-`cols` grid in row-major order) and maps every pixel to its
/// nearest entry.
///
/// This ties the whole pipeline together: arrive at a weighted point cloud
/// (skipping deduplication entirely only when `config.assume_unique` holds
/// *and* `bit_depth`/`decimation` are both already at their no-op values;
/// otherwise dedup, reducing bit depth first whenever that isn't a no-op),
/// split into clusters, build the palette at full precision, then map the
/// *original* full-precision pixels against it — clustering and final
/// mapping deliberately operate on different views of the data, the former
/// for speed, the latter for fidelity.
pub fn quantize_and_map(
    pixels: &[Color],
    rows: usize,
    cols: usize,
    config: &QuantizeConfig,
) -> Result<QuantizeResult, Error> {
    // Three ways to arrive at the point cloud clustering runs over, matching
    // the reference dispatch exactly:
    //
    // 1. `assume_unique` *and* full bit depth *and* no decimation: the caller
    //    has asserted there are no duplicates to collapse and there is
    //    nothing left for dedup to do anyway, so skip it entirely and use
    //    the pixels as-is with a uniform weight. Requesting more colors than
    //    the asserted count is a configuration error, not something to
    //    silently paper over, so `max_colors` passes through unclamped.
    // 2. Not asserted unique, but full bit depth: dedup the original pixels
    //    directly (decimation sampling happens inside `dedup`); no bit
    //    reduction is needed first since bit_depth == 8 is already a no-op.
    // 3. Anything else — including `assume_unique` paired with a reduced bit
    //    depth or non-unit decimation, which the caller's assertion alone
    //    cannot make safe to skip — bit-reduce into a scratch buffer first,
    //    then dedup that reduced buffer. In both non-uniform branches the
    //    true unique count is only known after dedup runs, so `max_colors`
    //    is clamped to it instead of erroring.
    let (reduced, weights, max_clusters) =
        if config.assume_unique && config.bit_depth == 8 && config.decimation == 1 {
            let weights = Weights::Uniform(1.0 / pixels.len().max(1) as f64);
            (pixels.to_vec(), weights, config.max_colors)
        } else if config.bit_depth == 8 {
            let deduped = dedup::dedup(pixels, rows, cols, config.decimation)?;
            let max_clusters = config.max_colors.min(deduped.colors.len());
            (deduped.colors, Weights::PerPoint(deduped.weights), max_clusters)
        } else {
            let mut scratch = pixels.to_vec();
            bitreduce::reduce_bits_in_place(&mut scratch, config.bit_depth)?;
            let deduped = dedup::dedup(&scratch, rows, cols, config.decimation)?;
            let max_clusters = config.max_colors.min(deduped.colors.len());
            (deduped.colors, Weights::PerPoint(deduped.weights), max_clusters)
        };

    let split = cluster::split_all(&reduced, &weights, max_clusters, config.max_iters)?;
    let built_palette = palette::build(&split, config.bit_depth);

    let mapped = nearest::map_pixels(pixels, &built_palette)?;

    Ok(QuantizeResult {
        palette: built_palette,
        mapped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: usize, cols: usize, f: impl Fn(usize, usize) -> (u8, u8, u8)) -> Vec<Color> {
        let mut pixels = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let (red, green, blue) = f(r, c);
                pixels.push(Color::from_rgb(red, green, blue));
            }
        }
        pixels
    }

    #[test]
    fn single_cluster_collapses_everything_to_one_color() {
        let pixels = grid(4, 4, |r, c| ((r * 60) as u8, (c * 60) as u8, 10));
        let config = QuantizeConfig::builder().max_colors(1).build();
        let result = quantize_and_map(&pixels, 4, 4, &config).unwrap();
        assert_eq!(result.palette.len(), 1);
        assert!(result.mapped.iter().all(|&c| c == result.mapped[0]));
    }

    #[test]
    fn requesting_more_colors_than_unique_pixels_still_succeeds() {
        let pixels = vec![
            Color::from_rgb(255, 0, 0),
            Color::from_rgb(0, 255, 0),
            Color::from_rgb(0, 0, 255),
        ];
        let config = QuantizeConfig::builder()
            .max_colors(16)
            .bit_depth(8)
            .build();
        let result = quantize_and_map(&pixels, 1, 3, &config).unwrap();
        assert!(result.palette.len() <= 3);
        assert_eq!(result.mapped.len(), 3);
    }

    #[test]
    fn assume_unique_skips_deduplication_at_full_depth_and_no_decimation() {
        let pixels: Vec<Color> = (0..30)
            .map(|i| Color::from_rgb((i * 7) as u8, (i * 11) as u8, (i * 13) as u8))
            .collect();
        let config = QuantizeConfig::builder()
            .max_colors(5)
            .bit_depth(8)
            .assume_unique(true)
            .build();
        let result = quantize_and_map(&pixels, 1, 30, &config).unwrap();
        assert_eq!(result.mapped.len(), 30);
        assert!(result.palette.len() <= 5);
    }

    #[test]
    fn assume_unique_does_not_skip_decimation_sampling() {
        // bit_depth == 8 but decimation != 1: the fast no-dedup path requires
        // *all three* conditions, so this still routes through dedup (which
        // performs the decimation sampling) regardless of assume_unique.
        let pixels = grid(9, 9, |r, c| (((r + c) * 14) as u8, (r * 20) as u8, (c * 20) as u8));
        let config_assumed = QuantizeConfig::builder()
            .max_colors(4)
            .bit_depth(8)
            .decimation(3)
            .assume_unique(true)
            .build();
        let config_not_assumed = QuantizeConfig::builder()
            .max_colors(4)
            .bit_depth(8)
            .decimation(3)
            .assume_unique(false)
            .build();
        let with_assumption = quantize_and_map(&pixels, 9, 9, &config_assumed).unwrap();
        let without_assumption = quantize_and_map(&pixels, 9, 9, &config_not_assumed).unwrap();
        assert_eq!(with_assumption.palette.colors, without_assumption.palette.colors);
        assert_eq!(with_assumption.mapped, without_assumption.mapped);
    }

    #[test]
    fn assume_unique_does_not_skip_bit_reduction_when_depth_is_reduced() {
        // assume_unique with a reduced bit depth (decimation == 1) is still
        // outside the fast path, since that requires bit_depth == 8 too; this
        // routes through bit-reduce-then-dedup regardless of assume_unique.
        let pixels = grid(6, 6, |r, c| ((r * 45) as u8, (c * 45) as u8, ((r + c) * 15) as u8));
        let config_assumed = QuantizeConfig::builder()
            .max_colors(4)
            .bit_depth(3)
            .assume_unique(true)
            .build();
        let config_not_assumed = QuantizeConfig::builder()
            .max_colors(4)
            .bit_depth(3)
            .assume_unique(false)
            .build();
        let with_assumption = quantize_and_map(&pixels, 6, 6, &config_assumed).unwrap();
        let without_assumption = quantize_and_map(&pixels, 6, 6, &config_not_assumed).unwrap();
        assert_eq!(with_assumption.palette.colors, without_assumption.palette.colors);
        assert_eq!(with_assumption.mapped, without_assumption.mapped);
    }

    #[test]
    fn every_mapped_pixel_is_a_palette_member() {
        let pixels = grid(8, 8, |r, c| ((r * 30) as u8, (c * 30) as u8, ((r + c) * 10) as u8));
        let config = QuantizeConfig::builder().max_colors(6).build();
        let result = quantize_and_map(&pixels, 8, 8, &config).unwrap();
        for p in &result.mapped {
            assert!(result.palette.colors.contains(p));
        }
    }

    #[test]
    fn full_bit_depth_with_many_colors_is_stable_on_repeat() {
        let pixels = grid(6, 6, |r, c| ((r * 40) as u8, (c * 40) as u8, 100));
        let config = QuantizeConfig::builder().max_colors(10).max_iters(5).build();
        let a = quantize_and_map(&pixels, 6, 6, &config).unwrap();
        let b = quantize_and_map(&pixels, 6, 6, &config).unwrap();
        assert_eq!(a.palette.colors, b.palette.colors);
        assert_eq!(a.mapped, b.mapped);
    }
}

use crate::color::Color;
use crate::error::Error;
use crate::palette::Palette;

/// Precomputed SSD lower-bound table: `D[k]` is a lower bound on the squared
/// RGB distance between any two colors whose channel sums differ by `k`,
/// derived from Cauchy-Schwarz (the minimum of three squared differences
/// that must sum to at least `k` is achieved when they're spread evenly,
/// giving `k²/3`). Used to prune the outward search once no remaining
/// candidate at a given sum-distance can beat the current best match.
struct SsdLut(Vec<i64>);

impl SsdLut {
    fn build(max_sum: i32) -> Self {
        Self((0..=max_sum as i64).map(|k| (k * k) / 3).collect())
    }

    fn bound(&self, sum_diff: i32) -> i64 {
        self.0[sum_diff as usize]
    }
}

/// A palette sorted by channel sum, plus a start-index lookup table so a
/// search for any given pixel's sum can jump straight to its neighborhood
/// in the sorted order instead of binary-searching per pixel.
pub struct NearestMapper {
    sorted: Vec<Color>,
    /// `start[s]` is the index into `sorted` of the entry whose channel sum
    /// is closest to `s`, for every possible pixel sum `0..=765`.
    start: Vec<usize>,
    ssd_lut: SsdLut,
}

impl NearestMapper {
    /// Builds a mapper over `palette`. Errors if the palette has no colors.
    pub fn new(palette: &Palette) -> Result<Self, Error> {
        if palette.is_empty() {
            return Err(Error::EmptyPalette);
        }
        let mut sorted = palette.colors.clone();
        sorted.sort_unstable_by_key(Color::channel_sum);

        let start = build_start_lut(&sorted);
        let ssd_lut = SsdLut::build(765);

        Ok(Self {
            sorted,
            start,
            ssd_lut,
        })
    }

    /// Finds the palette entry nearest `pixel` by squared RGB distance.
    #[must_use]
    pub fn nearest(&self, pixel: Color) -> Color {
        let sum = pixel.channel_sum();
        let seed = self.start[sum as usize];

        let mut best = self.sorted[seed];
        let mut best_ssd = best.squared_distance(pixel);

        let mut left = seed;
        let mut right = seed;
        loop {
            let can_go_left = left > 0;
            let can_go_right = right + 1 < self.sorted.len();
            if !can_go_left && !can_go_right {
                break;
            }

            if can_go_left {
                let diff = sum - self.sorted[left - 1].channel_sum();
                if self.ssd_lut.bound(diff.abs()) >= best_ssd {
                    left = 0; // prune the rest of this direction
                }
            }
            if can_go_right {
                let diff = self.sorted[right + 1].channel_sum() - sum;
                if self.ssd_lut.bound(diff.abs()) >= best_ssd {
                    right = self.sorted.len() - 1; // prune the rest of this direction
                }
            }

            let mut advanced = false;
            if left > 0 {
                left -= 1;
                advanced = true;
                let candidate = self.sorted[left];
                let ssd = candidate.squared_distance(pixel);
                if ssd < best_ssd {
                    best_ssd = ssd;
                    best = candidate;
                }
            }
            if right + 1 < self.sorted.len() {
                right += 1;
                advanced = true;
                let candidate = self.sorted[right];
                let ssd = candidate.squared_distance(pixel);
                if ssd < best_ssd {
                    best_ssd = ssd;
                    best = candidate;
                }
            }
            if !advanced {
                break;
            }
        }

        best
    }
}

/// For each possible channel sum `0..=765`, finds the sorted-palette index
/// whose sum is closest, rounding an exact tie between two neighbors toward
/// the higher-sum one. Only seeds the outward search — an incorrect seed
/// costs a few extra probes, never correctness.
fn build_start_lut(sorted: &[Color]) -> Vec<usize> {
    let mut lut = vec![0usize; 766];
    let mut idx = 0usize;
    for s in 0..=765i32 {
        while idx + 1 < sorted.len() {
            let cur = sorted[idx].channel_sum();
            let next = sorted[idx + 1].channel_sum();
            let midpoint = cur + next; // compare 2*s against cur+next to avoid fractions
            if 2 * s >= midpoint {
                idx += 1;
            } else {
                break;
            }
        }
        lut[s as usize] = idx;
    }
    lut
}

/// Maps every pixel in `pixels` to its nearest color in `palette`, by
/// squared RGB distance. Operates on full-precision input pixels, not the
/// deduplicated/bit-reduced points clustering ran over.
pub fn map_pixels(pixels: &[Color], palette: &Palette) -> Result<Vec<Color>, Error> {
    let mapper = NearestMapper::new(palette)?;
    Ok(pixels.iter().map(|&p| mapper.nearest(p)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(colors: &[(u8, u8, u8)]) -> Palette {
        Palette {
            colors: colors
                .iter()
                .map(|&(r, g, b)| Color::from_rgb(r, g, b))
                .collect(),
        }
    }

    #[test]
    fn empty_palette_is_rejected() {
        let p = Palette { colors: vec![] };
        assert_eq!(NearestMapper::new(&p).unwrap_err(), Error::EmptyPalette);
    }

    #[test]
    fn exact_match_returns_itself() {
        let p = palette(&[(10, 20, 30), (200, 10, 5), (0, 0, 0)]);
        let mapper = NearestMapper::new(&p).unwrap();
        assert_eq!(mapper.nearest(Color::from_rgb(200, 10, 5)), Color::from_rgb(200, 10, 5));
    }

    #[test]
    fn nearest_neighbor_matches_brute_force_over_random_points() {
        use rand::Rng;

        let colors: Vec<(u8, u8, u8)> = (0..17)
            .map(|i| ((i * 37 % 255) as u8, (i * 53 % 255) as u8, (i * 71 % 255) as u8))
            .collect();
        let p = palette(&colors);
        let mapper = NearestMapper::new(&p).unwrap();

        let mut rng = rand::rng();
        for _ in 0..200 {
            let pixel = Color::from_rgb(rng.random(), rng.random(), rng.random());
            let expected = p
                .colors
                .iter()
                .copied()
                .min_by_key(|c| c.squared_distance(pixel))
                .unwrap();
            let got = mapper.nearest(pixel);
            assert_eq!(got.squared_distance(pixel), expected.squared_distance(pixel));
        }
    }

    #[test]
    fn single_color_palette_maps_everything_to_it() {
        let p = palette(&[(42, 42, 42)]);
        let mapped = map_pixels(
            &[Color::from_rgb(0, 0, 0), Color::from_rgb(255, 255, 255)],
            &p,
        )
        .unwrap();
        assert_eq!(mapped, vec![Color::from_rgb(42, 42, 42); 2]);
    }

    #[test]
    fn ssd_lut_is_nondecreasing_and_zero_at_zero() {
        let lut = SsdLut::build(765);
        assert_eq!(lut.bound(0), 0);
        for k in 1..=765i32 {
            assert!(lut.bound(k) >= lut.bound(k - 1));
        }
    }

    #[test]
    fn ssd_lut_never_overestimates_achievable_squared_distance() {
        // Any two 8-bit channels differing overall by `k` in sum can realize
        // a squared distance as low as k^2/3 (spread evenly across three
        // channels), so the table must never exceed that for any channel
        // split that's actually reachable.
        let lut = SsdLut::build(765);
        for k in 0..=255i32 {
            let a = Color::from_rgb(0, 0, 0);
            let b = Color::from_rgb((k / 3).min(255) as u8, (k / 3).min(255) as u8, (k - 2 * (k / 3)).min(255) as u8);
            assert!(lut.bound(b.channel_sum() - a.channel_sum()) <= a.squared_distance(b));
        }
    }
}

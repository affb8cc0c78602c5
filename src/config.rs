/// Tuning knobs for [`crate::quantize_and_map`].
///
/// Every field has a sensible default, so most callers only set `max_colors`:
///
/// ```ignore
/// let config = QuantizeConfig::builder().max_colors(16).build();
/// ```
#[derive(Debug, Clone, Copy, bon::Builder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizeConfig {
    /// Maximum number of palette entries to produce. The final palette may
    /// be smaller if the image has fewer unique colors than this.
    pub max_colors: usize,

    /// Number of most-significant bits per channel to cluster on. Clustering
    /// runs on a reduced-precision copy of the deduplicated input; the final
    /// palette restores full precision by rounding cluster means. Must be in
    /// `1..=8`.
    #[builder(default = 5)]
    pub bit_depth: u8,

    /// Spatial decimation factor for deduplication: only every
    /// `decimation`-th row and column is sampled when building the weighted
    /// point cloud. `1` samples every pixel. Must be positive.
    #[builder(default = 1)]
    pub decimation: i64,

    /// Number of local two-centroid k-means refinement rounds applied after
    /// each variance-axis split. `0` disables refinement and keeps the
    /// initial split.
    #[builder(default = 10)]
    pub max_iters: usize,

    /// Asserts that every input pixel is already unique, so it can be
    /// weighted uniformly instead of deduplicated. Set this when the caller
    /// already knows the input has no repeated colors (e.g. it was produced
    /// by a prior quantization pass).
    ///
    /// This only actually skips the hash-bucketed deduplication pass when
    /// `bit_depth` is `8` and `decimation` is `1` — the case where dedup
    /// would have nothing left to do anyway (no precision to drop, no rows
    /// or columns to skip). With a reduced `bit_depth` or a `decimation`
    /// other than `1`, dedup still runs (bit-reducing first when
    /// `bit_depth != 8`) regardless of this flag, since only dedup performs
    /// the decimation sampling and the caller's uniqueness assertion alone
    /// can't make skipping that safe.
    #[builder(default = false)]
    pub assume_unique: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = QuantizeConfig::builder().max_colors(16).build();
        assert_eq!(config.max_colors, 16);
        assert_eq!(config.bit_depth, 5);
        assert_eq!(config.decimation, 1);
        assert_eq!(config.max_iters, 10);
        assert!(!config.assume_unique);
    }

    #[test]
    fn every_field_is_overridable() {
        let config = QuantizeConfig::builder()
            .max_colors(4)
            .bit_depth(8)
            .decimation(2)
            .max_iters(0)
            .assume_unique(true)
            .build();
        assert_eq!(config.max_colors, 4);
        assert_eq!(config.bit_depth, 8);
        assert_eq!(config.decimation, 2);
        assert_eq!(config.max_iters, 0);
        assert!(config.assume_unique);
    }
}

use crate::cluster::SplitResult;
use crate::color::Color;

/// The final set of representative colors produced by quantization, in
/// cluster-id order. May be shorter than the requested cluster count: empty
/// clusters (no points ever assigned to them) are dropped, and `nearest`
/// maps every original pixel to one of these entries by id.
#[derive(Debug, Clone)]
pub struct Palette {
    pub colors: Vec<Color>,
}

impl Palette {
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Rounds each non-empty cluster's mean to the nearest integer, restores the
/// bit depth that was stripped before clustering by shifting left by
/// `8 - bits`, and packs the result into a [`Color`].
///
/// Clusters with zero points (possible when the splitter stops early because
/// it ran out of separable clusters) are skipped, so the palette returned
/// may have fewer entries than were requested.
#[must_use]
pub fn build(split: &SplitResult, bits: u8) -> Palette {
    let shift = 8 - bits;
    let mut colors = Vec::with_capacity(split.stats.len());
    for stats in &split.stats {
        if stats.count == 0 {
            continue;
        }
        let channel = |v: f64| -> u8 {
            let rounded = v.round().clamp(0.0, 255.0) as u32;
            (rounded << shift) as u8
        };
        colors.push(Color::from_rgb(
            channel(stats.mean[0]),
            channel(stats.mean[1]),
            channel(stats.mean[2]),
        ));
    }
    Palette { colors }
}

/// The weight associated with each deduplicated point.
///
/// Either every point shares one scalar weight (the common case for an
/// already-unique point set with no accumulated duplicates) or each point
/// carries its own weight (the case after deduplication collapses repeated
/// colors into frequency counts).
#[derive(Debug, Clone)]
pub enum Weights {
    Uniform(f64),
    PerPoint(Vec<f64>),
}

impl Weights {
    #[must_use]
    pub fn get(&self, index: usize) -> f64 {
        match self {
            Self::Uniform(w) => *w,
            Self::PerPoint(ws) => ws[index],
        }
    }

    #[must_use]
    pub fn is_uniform(&self) -> bool {
        matches!(self, Self::Uniform(_))
    }

    #[must_use]
    pub fn total(&self, count: usize) -> f64 {
        match self {
            Self::Uniform(w) => w * count as f64,
            Self::PerPoint(ws) => ws.iter().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_weight_ignores_index() {
        let w = Weights::Uniform(0.25);
        assert_eq!(w.get(0), 0.25);
        assert_eq!(w.get(41), 0.25);
        assert_eq!(w.total(4), 1.0);
    }

    #[test]
    fn per_point_weight_reads_by_index() {
        let w = Weights::PerPoint(vec![0.1, 0.2, 0.3]);
        assert_eq!(w.get(1), 0.2);
        assert!((w.total(3) - 0.6).abs() < 1e-12);
    }
}

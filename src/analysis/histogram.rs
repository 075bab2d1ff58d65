use serde::{Deserialize, Serialize};
use std::fmt;

/// Equal-width histogram of a column, for rendering distribution charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// The last bin is closed on the right so the maximum is counted. A
    /// constant column puts everything in the first bin. Returns `None`
    /// for empty input or zero bins.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        let mut counts = vec![0usize; bins];
        if span <= 0.0 {
            counts[0] = values.len();
            return Some(Self {
                start: min,
                bin_width: 0.0,
                counts,
            });
        }

        let bin_width = span / bins as f64;
        for v in values {
            let idx = (((v - min) / bin_width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Some(Self {
            start: min,
            bin_width,
            counts,
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(left_edge, right_edge)` of bin `i`.
    pub fn edges(&self, i: usize) -> (f64, f64) {
        let left = self.start + i as f64 * self.bin_width;
        (left, left + self.bin_width)
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1);
        for (i, count) in self.counts.iter().enumerate() {
            let (left, right) = self.edges(i);
            let bar = "#".repeat(count * 40 / peak);
            writeln!(f, "  [{:>10.5}, {:>10.5}) {:>6} {}", left, right, count, bar)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_value_counted_once() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 / 10.0).collect();
        let h = Histogram::from_values(&values, 7).unwrap();
        assert_eq!(h.counts.len(), 7);
        assert_eq!(h.total(), 100);
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let h = Histogram::from_values(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(h.counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_constant_column() {
        let h = Histogram::from_values(&[0.5; 12], 5).unwrap();
        assert_eq!(h.counts, vec![12, 0, 0, 0, 0]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(Histogram::from_values(&[], 5).is_none());
        assert!(Histogram::from_values(&[1.0], 0).is_none());
    }
}

//! Axis ranges and histogram binning.

use std::ops::Range;

/// `values` spanned with 5% padding on both sides. Empty input maps to
/// `0..1`; a single distinct value gets a unit-wide window around it.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = 0.05 * (max - min);
    (min - pad)..(max + pad)
}

/// Like [`padded_range`], but always including zero.
pub fn range_with_zero(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    padded_range(values.into_iter().chain(std::iter::once(0.0)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Equal-width bins over the finite `samples`; the last bin is closed.
pub fn histogram(samples: &[f64], bins: usize) -> Vec<Bin> {
    let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let range = padded_range(finite.iter().copied());
    let (lo, hi) = if finite.len() == 1 || finite.iter().all(|&v| v == finite[0]) {
        (range.start, range.end)
    } else {
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for v in finite {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_covers_values() {
        let r = padded_range([1.0, 3.0]);
        assert!((r.start - 0.9).abs() < 1e-12);
        assert!((r.end - 3.1).abs() < 1e-12);
        assert_eq!(padded_range([]), 0.0..1.0);
        assert_eq!(padded_range([2.0, 2.0]), 1.5..2.5);
        assert_eq!(padded_range([f64::NAN]), 0.0..1.0);
    }

    #[test]
    fn range_with_zero_spans_origin() {
        let r = range_with_zero([2.0, 4.0]);
        assert!(r.start < 0.0 && r.end > 4.0);
    }

    #[test]
    fn histogram_counts_every_sample() {
        let samples = [0.0, 0.1, 0.2, 0.5, 0.9, 1.0];
        let bins = histogram(&samples, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), samples.len());
        assert_eq!(bins[3].count, 2);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn degenerate_histograms() {
        assert!(histogram(&[], 5).is_empty());
        let single = histogram(&[0.3, 0.3], 3);
        assert_eq!(single.iter().map(|b| b.count).sum::<usize>(), 2);
    }
}

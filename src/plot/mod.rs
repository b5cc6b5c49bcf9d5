/// Plot layer: offscreen PNG rendering of the categorized views.
///
/// Pure sink over the data layer's outputs — nothing here feeds back into
/// categorization. Each renderer draws one chart type:
///
/// * `traces::render_unit_traces` – per-unit firing-rate traces
/// * `timecourse::render_average_timecourse` – condition means ± std
/// * `timecourse::render_mean_frequency_traces` – condition mean traces
/// * `distribution::render_frequency_distributions` – log mean-rate histograms
pub mod distribution;
pub mod timecourse;
pub mod traces;

use chrono::NaiveDateTime;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::style::{RGBColor, WHITE};
use thiserror::Error;

use crate::data::timeparse::TimeParseError;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to render plot: {0}")]
    Draw(String),
    #[error("nothing to plot: {0}")]
    EmptyInput(&'static str),
    #[error(transparent)]
    Time(#[from] TimeParseError),
}

impl<E: std::error::Error + Send + Sync + 'static> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(value: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Draw(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Shared style
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    /// Height of one per-unit panel in the stacked unit-trace chart.
    pub panel_height: u32,
    pub background: RGBColor,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 960,
            height: 600,
            panel_height: 160,
            background: WHITE,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers shared by the renderers
// ---------------------------------------------------------------------------

/// Seconds elapsed from `origin` to `t`, for plotting datetimes on an f64
/// axis.
pub(crate) fn elapsed_secs(t: NaiveDateTime, origin: NaiveDateTime) -> f64 {
    (t - origin).num_milliseconds() as f64 / 1000.0
}

/// Pad a value range so flat data still produces a drawable chart.
pub(crate) fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

/// Centered moving average of `values` with a box kernel, matching a
/// zero-padded "same" convolution: output length equals input length and
/// edge windows are normalized by the full kernel size.
pub fn smooth(values: &[f64], kernel_size: usize) -> Vec<f64> {
    debug_assert!(kernel_size > 0, "kernel_size must be positive");
    if kernel_size <= 1 || values.is_empty() {
        return values.to_vec();
    }
    let offset = (kernel_size - 1) / 2;
    (0..values.len())
        .map(|i| {
            let n = i + offset;
            let lo = n.saturating_sub(kernel_size - 1);
            let hi = usize::min(n, values.len() - 1);
            values[lo..=hi].iter().sum::<f64>() / kernel_size as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_preserves_length() {
        let v = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(smooth(&v, 5).len(), v.len());
    }

    #[test]
    fn smooth_kernel_one_is_identity() {
        let v = vec![1.0, 5.0, 9.0];
        assert_eq!(smooth(&v, 1), v);
    }

    #[test]
    fn smooth_interior_is_window_mean() {
        let v = vec![0.0, 3.0, 6.0, 9.0, 12.0];
        let s = smooth(&v, 3);
        // Interior points average the full window.
        assert!((s[2] - 6.0).abs() < 1e-12);
        // Edge windows are truncated but still divided by the kernel size.
        assert!((s[0] - (0.0 + 3.0) / 3.0).abs() < 1e-12);
        assert!((s[4] - (9.0 + 12.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn smooth_constant_signal_is_flat_in_the_interior() {
        let v = vec![2.0; 10];
        let s = smooth(&v, 5);
        for x in &s[2..8] {
            assert!((x - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn padded_range_handles_flat_data() {
        let (lo, hi) = padded_range(3.0, 3.0);
        assert!(lo < 3.0 && hi > 3.0);
    }
}

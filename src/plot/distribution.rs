use std::path::Path;

use plotters::prelude::*;

use super::{padded_range, PlotError, PlotStyle};
use crate::color::ConditionColors;
use crate::data::aggregate::unit_mean_frequencies;
use crate::data::model::CategorizedTable;

const BINS: usize = 100;

/// Histogram of `ln(mean unit frequency)` for each condition, overlaid as
/// semi-transparent bars on a shared log-frequency axis.
///
/// Units whose mean frequency is not strictly positive have no logarithm and
/// are skipped.
pub fn render_frequency_distributions(
    table: &CategorizedTable,
    style: &PlotStyle,
    path: &Path,
) -> Result<(), PlotError> {
    let means = unit_mean_frequencies(table);
    let mut per_condition: Vec<(String, Vec<f64>)> = Vec::new();
    for entry in &means {
        let log_mean = entry.mean_freq.ln();
        if !log_mean.is_finite() {
            continue;
        }
        match per_condition.iter_mut().find(|(c, _)| *c == entry.condition) {
            Some((_, values)) => values.push(log_mean),
            None => per_condition.push((entry.condition.clone(), vec![log_mean])),
        }
    }
    if per_condition.is_empty() {
        return Err(PlotError::EmptyInput(
            "no units with positive mean frequency",
        ));
    }

    let all: Vec<f64> = per_condition
        .iter()
        .flat_map(|(_, v)| v.iter().copied())
        .collect();
    let (lo, hi) = padded_range(
        all.iter().cloned().fold(f64::INFINITY, f64::min),
        all.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );
    let bin_width = (hi - lo) / BINS as f64;

    // Bin counts per condition over the shared range.
    let histograms: Vec<(String, Vec<usize>)> = per_condition
        .into_iter()
        .map(|(condition, values)| {
            let mut counts = vec![0usize; BINS];
            for v in values {
                let bin = (((v - lo) / bin_width) as usize).min(BINS - 1);
                counts[bin] += 1;
            }
            (condition, counts)
        })
        .collect();
    let y_max = histograms
        .iter()
        .flat_map(|(_, counts)| counts.iter().copied())
        .max()
        .unwrap_or(1)
        .max(1) as f64;

    let colors = ConditionColors::new(&table.conditions());
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&style.background)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Unit Mean Frequency Distributions", ("sans-serif", 20))
        .x_label_area_size(36)
        .y_label_area_size(44)
        .build_cartesian_2d(lo..hi, 0.0..y_max * 1.05)?;
    chart
        .configure_mesh()
        .x_desc("ln(mean spike frequency)")
        .y_desc("units")
        .light_line_style(BLACK.mix(0.08))
        .draw()?;

    for (condition, counts) in &histograms {
        let color = colors.color_for(condition);
        let bar_style = color.mix(0.45).filled();
        chart
            .draw_series(counts.iter().enumerate().filter(|(_, &c)| c > 0).map(
                |(bin, &count)| {
                    let x0 = lo + bin as f64 * bin_width;
                    Rectangle::new([(x0, 0.0), (x0 + bin_width, count as f64)], bar_style)
                },
            ))?
            .label(condition.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 4), (x + 12, y + 4)], color.mix(0.45).filled())
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK.mix(0.3))
        .background_style(WHITE.mix(0.85))
        .draw()?;
    root.present()?;
    Ok(())
}

use std::path::Path;

use plotters::prelude::*;

use super::{elapsed_secs, padded_range, PlotError, PlotStyle};
use crate::color::ConditionColors;
use crate::data::aggregate::{mean_timecourse, ConditionTrace};
use crate::data::model::CategorizedTable;

/// Global time origin plus padded axis bounds for a set of traces.
fn trace_bounds(
    traces: &[ConditionTrace],
) -> Result<(chrono::NaiveDateTime, f64, f64, f64, f64), PlotError> {
    let origin = traces
        .iter()
        .flat_map(|t| t.points.iter().map(|p| p.time))
        .min()
        .ok_or(PlotError::EmptyInput("categorized table has no rows"))?;

    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for trace in traces {
        for point in &trace.points {
            x_max = x_max.max(elapsed_secs(point.time, origin));
            y_min = y_min.min(point.mean - point.std);
            y_max = y_max.max(point.mean + point.std);
        }
    }
    let (y_min, y_max) = padded_range(y_min, y_max);
    let (x_min, x_max) = padded_range(0.0, x_max);
    Ok((origin, x_min, x_max, y_min, y_max))
}

/// Point plot of the per-condition mean spike frequency at each time point,
/// with symmetric error bars of one sample standard deviation.
pub fn render_average_timecourse(
    table: &CategorizedTable,
    style: &PlotStyle,
    path: &Path,
) -> Result<(), PlotError> {
    let traces = mean_timecourse(table);
    let (origin, x_min, x_max, y_min, y_max) = trace_bounds(&traces)?;
    let colors = ConditionColors::new(&table.conditions());

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&style.background)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Average Timecourse by Condition", ("sans-serif", 20))
        .x_label_area_size(36)
        .y_label_area_size(52)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("time (s)")
        .y_desc("spike frequency")
        .light_line_style(BLACK.mix(0.08))
        .draw()?;

    for trace in &traces {
        let color = colors.color_for(&trace.condition);
        chart
            .draw_series(trace.points.iter().map(|p| {
                let x = elapsed_secs(p.time, origin);
                ErrorBar::new_vertical(x, p.mean - p.std, p.mean, p.mean + p.std, color.filled(), 8)
            }))?
            .label(trace.condition.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
        chart.draw_series(
            trace
                .points
                .iter()
                .map(|p| Circle::new((elapsed_secs(p.time, origin), p.mean), 3, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .border_style(BLACK.mix(0.3))
        .background_style(WHITE.mix(0.85))
        .draw()?;
    root.present()?;
    Ok(())
}

/// Line plot of the mean spike-frequency trace of each condition.
pub fn render_mean_frequency_traces(
    table: &CategorizedTable,
    style: &PlotStyle,
    path: &Path,
) -> Result<(), PlotError> {
    let traces = mean_timecourse(table);
    let (origin, x_min, x_max, y_min, y_max) = trace_bounds(&traces)?;
    let colors = ConditionColors::new(&table.conditions());

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&style.background)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Mean Spike Frequency Traces", ("sans-serif", 20))
        .x_label_area_size(36)
        .y_label_area_size(52)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("time")
        .y_desc("spike frequency")
        .light_line_style(BLACK.mix(0.08))
        .draw()?;

    for trace in &traces {
        let color = colors.color_for(&trace.condition);
        chart
            .draw_series(LineSeries::new(
                trace
                    .points
                    .iter()
                    .map(|p| (elapsed_secs(p.time, origin), p.mean)),
                &color,
            ))?
            .label(trace.condition.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK.mix(0.3))
        .background_style(WHITE.mix(0.85))
        .draw()?;
    root.present()?;
    Ok(())
}

use std::path::Path;

use plotters::prelude::*;

use super::{elapsed_secs, padded_range, smooth, PlotError, PlotStyle};
use crate::data::model::FrequencyTable;
use crate::data::timeparse::parse_timestamp;

/// Render one line chart per unit, stacked vertically in a single PNG.
///
/// The x axis is seconds elapsed since the first time point; each panel is
/// labelled with its unit name. `smoothing` applies a centered moving
/// average of the given kernel size before drawing.
pub fn render_unit_traces(
    table: &FrequencyTable,
    style: &PlotStyle,
    smoothing: Option<usize>,
    path: &Path,
) -> Result<(), PlotError> {
    if table.num_units() == 0 {
        return Err(PlotError::EmptyInput("table has no unit columns"));
    }
    if table.num_rows() == 0 {
        return Err(PlotError::EmptyInput("table has no time points"));
    }

    let times: Vec<_> = table
        .time()
        .iter()
        .map(|raw| parse_timestamp(raw))
        .collect::<Result<_, _>>()?;
    let origin = *times.iter().min().unwrap();
    let xs: Vec<f64> = times.iter().map(|&t| elapsed_secs(t, origin)).collect();
    let (x_min, x_max) = padded_range(
        xs.iter().cloned().fold(f64::INFINITY, f64::min),
        xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );

    let height = style.panel_height * table.num_units() as u32;
    let root = BitMapBackend::new(path, (style.width, height)).into_drawing_area();
    root.fill(&style.background)?;
    let panels = root.split_evenly((table.num_units(), 1));

    for (panel, unit) in panels.iter().zip(table.units()) {
        let values = match smoothing {
            Some(k) if k > 1 => smooth(&unit.values, k),
            _ => unit.values.clone(),
        };
        let (y_min, y_max) = padded_range(
            values.iter().cloned().fold(f64::INFINITY, f64::min),
            values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        );

        let mut chart = ChartBuilder::on(panel)
            .margin(8)
            .x_label_area_size(28)
            .y_label_area_size(48)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
        chart
            .configure_mesh()
            .x_desc(unit.name.as_str())
            .y_desc("spike freq")
            .label_style(("sans-serif", 12))
            .light_line_style(BLACK.mix(0.08))
            .draw()?;
        chart.draw_series(LineSeries::new(
            xs.iter().cloned().zip(values.iter().cloned()),
            &BLUE,
        ))?;
    }

    root.present()?;
    Ok(())
}

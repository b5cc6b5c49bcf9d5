use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use rusty_mea::data::categorize::construct_categorized_dataframe;
use rusty_mea::data::loader::load_file;
use rusty_mea::data::model::ConditionSet;
use rusty_mea::plot::distribution::render_frequency_distributions;
use rusty_mea::plot::timecourse::{render_average_timecourse, render_mean_frequency_traces};
use rusty_mea::plot::traces::render_unit_traces;
use rusty_mea::plot::PlotStyle;

/// Render all plot types for a frequency table.
///
/// Usage:
///   render_plots <table.{csv,json,parquet}> <out-dir> [name=prefix ...]
///
/// Each `name=prefix` pair becomes a condition selecting the units whose
/// name starts with `prefix`. With no pairs, a single condition `all`
/// containing every unit is used.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (input, out_dir) = match (args.next(), args.next()) {
        (Some(input), Some(out_dir)) => (PathBuf::from(input), PathBuf::from(out_dir)),
        _ => bail!("usage: render_plots <table.{{csv,json,parquet}}> <out-dir> [name=prefix ...]"),
    };

    let mut conditions = ConditionSet::new();
    for rule in args {
        let (name, prefix) = rule
            .split_once('=')
            .with_context(|| format!("condition rule '{rule}' is not of the form name=prefix"))?;
        let prefix = prefix.to_string();
        conditions.insert(name, move |unit: &str| unit.starts_with(&prefix));
    }
    if conditions.is_empty() {
        conditions.insert("all", |_: &str| true);
    }

    let table = load_file(&input).with_context(|| format!("loading {}", input.display()))?;
    let categorized = construct_categorized_dataframe(&table, &conditions)
        .context("categorizing frequency table")?;
    log::info!(
        "categorized {} rows across {} conditions",
        categorized.len(),
        conditions.len()
    );

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let style = PlotStyle::default();

    render_unit_traces(&table, &style, Some(5), &out_dir.join("unit_traces.png"))?;
    render_average_timecourse(&categorized, &style, &out_dir.join("average_timecourse.png"))?;
    render_mean_frequency_traces(&categorized, &style, &out_dir.join("mean_freq_traces.png"))?;
    render_frequency_distributions(&categorized, &style, &out_dir.join("freq_distributions.png"))?;

    println!("Wrote 4 plots to {}", out_dir.display());
    Ok(())
}

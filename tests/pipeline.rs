//! End-to-end: load a CSV frequency table, categorize by well prefix,
//! aggregate, and render every plot type.

use std::io::Write;

use rusty_mea::data::aggregate::{mean_timecourse, unit_mean_frequencies};
use rusty_mea::data::categorize::construct_categorized_dataframe;
use rusty_mea::data::loader::load_file;
use rusty_mea::data::model::ConditionSet;
use rusty_mea::plot::distribution::render_frequency_distributions;
use rusty_mea::plot::timecourse::{render_average_timecourse, render_mean_frequency_traces};
use rusty_mea::plot::traces::render_unit_traces;
use rusty_mea::plot::PlotStyle;

fn sample_csv() -> String {
    let mut out = String::from("time,A1,A2,B1\n");
    for i in 0..8 {
        out.push_str(&format!(
            "2020-01-01T00:00:{i:02},{},{},{}\n",
            1.0 + i as f64,
            2.0 + i as f64,
            10.0 + i as f64,
        ));
    }
    out
}

#[test]
fn csv_to_plots() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("freqs.csv");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    file.write_all(sample_csv().as_bytes()).unwrap();

    let table = load_file(&csv_path).unwrap();
    assert_eq!(table.num_units(), 3);
    assert_eq!(table.num_rows(), 8);

    let mut conditions = ConditionSet::new();
    conditions.insert("control", |n: &str| n.starts_with('A'));
    conditions.insert("treated", |n: &str| n.starts_with('B'));
    let categorized = construct_categorized_dataframe(&table, &conditions).unwrap();

    // 2 matching units × 8 rows + 1 matching unit × 8 rows
    assert_eq!(categorized.len(), 2 * 8 + 8);
    assert_eq!(categorized.conditions(), ["control", "treated"]);

    let traces = mean_timecourse(&categorized);
    assert_eq!(traces.len(), 2);
    assert_eq!(traces[0].points.len(), 8);
    // control at t0: mean of {1, 2}
    assert!((traces[0].points[0].mean - 1.5).abs() < 1e-12);

    let means = unit_mean_frequencies(&categorized);
    assert_eq!(means.len(), 3);

    let style = PlotStyle::default();
    let out = |name: &str| dir.path().join(name);
    render_unit_traces(&table, &style, Some(3), &out("units.png")).unwrap();
    render_average_timecourse(&categorized, &style, &out("avg.png")).unwrap();
    render_mean_frequency_traces(&categorized, &style, &out("means.png")).unwrap();
    render_frequency_distributions(&categorized, &style, &out("dist.png")).unwrap();

    for name in ["units.png", "avg.png", "means.png", "dist.png"] {
        assert!(std::fs::metadata(out(name)).unwrap().len() > 0, "{name} empty");
    }
}

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (splitmix64 + Box-Muller).
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Synthetic firing-rate trace: well-specific baseline, one activity burst,
/// and gaussian noise, clipped at zero.
fn generate_unit(
    num_rows: usize,
    baseline: f64,
    burst_center: f64,
    burst_amp: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    (0..num_rows)
        .map(|i| {
            let t = i as f64;
            let rate = baseline
                + gaussian(t, burst_center, num_rows as f64 / 10.0, burst_amp)
                + rng.gauss(0.0, 0.1 * baseline.max(0.5));
            rate.max(0.0)
        })
        .collect()
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // 24 units on a 4×6 MEA layout; rows A/B are control wells, C/D treated.
    let wells = ["A", "B", "C", "D"];
    let electrodes_per_well = 6usize;
    let num_rows = 120usize;

    let start = NaiveDate::from_ymd_opt(2020, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid hard-coded start timestamp");
    let time: Vec<String> = (0..num_rows)
        .map(|i| {
            (start + Duration::seconds(i as i64))
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string()
        })
        .collect();

    let mut unit_names: Vec<String> = Vec::new();
    let mut unit_values: Vec<Vec<f64>> = Vec::new();
    for (w, well) in wells.iter().enumerate() {
        // Treated wells fire harder and burst later.
        let baseline = if w < 2 { 2.0 } else { 6.0 };
        let burst_amp = if w < 2 { 3.0 } else { 9.0 };
        for e in 1..=electrodes_per_well {
            let burst_center = (20 + w * 25) as f64 + rng.next_f64() * 10.0;
            unit_names.push(format!("{well}{e}"));
            unit_values.push(generate_unit(
                num_rows,
                baseline * (0.8 + 0.4 * rng.next_f64()),
                burst_center,
                burst_amp,
                &mut rng,
            ));
        }
    }

    write_csv("sample_data.csv", &time, &unit_names, &unit_values);
    write_parquet("sample_data.parquet", &time, &unit_names, &unit_values);

    println!(
        "Wrote {} units × {num_rows} time points to sample_data.csv / sample_data.parquet",
        unit_names.len()
    );
}

fn write_csv(path: &str, time: &[String], names: &[String], values: &[Vec<f64>]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");

    let mut header = vec!["time".to_string()];
    header.extend(names.iter().cloned());
    writer.write_record(&header).expect("Failed to write header");

    for (row, t) in time.iter().enumerate() {
        let mut record = vec![t.clone()];
        record.extend(values.iter().map(|col| format!("{:.4}", col[row])));
        writer.write_record(&record).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(path: &str, time: &[String], names: &[String], values: &[Vec<f64>]) {
    let mut fields = vec![Field::new("time", DataType::Utf8, false)];
    fields.extend(
        names
            .iter()
            .map(|n| Field::new(n.as_str(), DataType::Float64, false)),
    );
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        time.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    ))];
    for col in values {
        columns.push(Arc::new(Float64Array::from(col.clone())));
    }

    let batch =
        RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

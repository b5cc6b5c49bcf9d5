use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::model::CategorizedTable;

// ---------------------------------------------------------------------------
// Group-by aggregations over the categorized table
// ---------------------------------------------------------------------------

/// One aggregated point of a condition's mean timecourse.
#[derive(Debug, Clone, PartialEq)]
pub struct TracePoint {
    pub time: NaiveDateTime,
    pub mean: f64,
    /// Sample standard deviation across units; 0.0 for a single observation.
    pub std: f64,
}

/// Mean spike-frequency trace for one condition, points in first-seen
/// time order.
#[derive(Debug, Clone)]
pub struct ConditionTrace {
    pub condition: String,
    pub points: Vec<TracePoint>,
}

/// Mean firing rate of one unit under one condition.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitMeanFreq {
    pub condition: String,
    pub unit_name: String,
    pub mean_freq: f64,
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (mean, var.sqrt())
}

/// Group by `(condition, time)` and aggregate `spike_freq` into mean and
/// sample standard deviation. Conditions and times keep first-seen order,
/// which for categorizer output means insertion order and time order.
pub fn mean_timecourse(table: &CategorizedTable) -> Vec<ConditionTrace> {
    let mut traces: Vec<(String, Vec<(NaiveDateTime, Vec<f64>)>)> = Vec::new();
    let mut trace_index: HashMap<String, usize> = HashMap::new();

    for rec in table.records() {
        let ti = *trace_index.entry(rec.condition.clone()).or_insert_with(|| {
            traces.push((rec.condition.clone(), Vec::new()));
            traces.len() - 1
        });
        let buckets = &mut traces[ti].1;
        match buckets.iter_mut().find(|(t, _)| *t == rec.time) {
            Some((_, values)) => values.push(rec.spike_freq),
            None => buckets.push((rec.time, vec![rec.spike_freq])),
        }
    }

    traces
        .into_iter()
        .map(|(condition, buckets)| ConditionTrace {
            condition,
            points: buckets
                .into_iter()
                .map(|(time, values)| {
                    let (mean, std) = mean_and_std(&values);
                    TracePoint { time, mean, std }
                })
                .collect(),
        })
        .collect()
}

/// Group by `(condition, unit_name)` and aggregate `spike_freq` into the
/// unit's mean firing rate under that condition. First-seen order.
pub fn unit_mean_frequencies(table: &CategorizedTable) -> Vec<UnitMeanFreq> {
    let mut groups: Vec<((String, String), Vec<f64>)> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for rec in table.records() {
        let key = (rec.condition.clone(), rec.unit_name.clone());
        let gi = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[gi].1.push(rec.spike_freq);
    }

    groups
        .into_iter()
        .map(|((condition, unit_name), values)| {
            let (mean_freq, _) = mean_and_std(&values);
            UnitMeanFreq {
                condition,
                unit_name,
                mean_freq,
            }
        })
        .collect()
}

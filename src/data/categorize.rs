use super::filter::filter_unit_columns;
use super::model::{CategorizedRecord, CategorizedTable, ConditionSet, FrequencyTable};
use super::timeparse::{parse_timestamp, TimeParseError};

/// Reshape a wide frequency table into the long, condition-labelled format.
///
/// For every condition in `conditions` (in insertion order), every unit whose
/// name satisfies the condition's predicate contributes one block of rows:
/// one `(time, condition, spike_freq, unit_name)` record per time point, in
/// time order. Blocks are concatenated condition-major and never re-sorted.
///
/// A unit matching several predicates appears once per matching condition;
/// a unit matching none is silently excluded. An empty `conditions` yields an
/// empty table. The only failure is a malformed `time` value, which aborts
/// the whole call — no partial table is returned.
pub fn construct_categorized_dataframe(
    table: &FrequencyTable,
    conditions: &ConditionSet,
) -> Result<CategorizedTable, TimeParseError> {
    let time_vector: Vec<_> = table
        .time()
        .iter()
        .map(|raw| parse_timestamp(raw))
        .collect::<Result<_, _>>()?;

    let mut records: Vec<CategorizedRecord> = Vec::new();
    for (condition_name, predicate) in conditions.iter() {
        let mut matched = 0usize;
        for unit in filter_unit_columns(predicate, table.units()) {
            matched += 1;
            records.reserve(time_vector.len());
            for (time, &spike_freq) in time_vector.iter().zip(&unit.values) {
                records.push(CategorizedRecord {
                    time: *time,
                    condition: condition_name.to_string(),
                    spike_freq,
                    unit_name: unit.name.clone(),
                });
            }
        }
        log::debug!("condition '{condition_name}': {matched} matching units");
    }

    Ok(CategorizedTable::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::UnitSeries;

    fn sample_table() -> FrequencyTable {
        FrequencyTable::new(
            vec![
                "2020-01-01T00:00:00".to_string(),
                "2020-01-01T00:00:01".to_string(),
            ],
            vec![
                UnitSeries::new("A", vec![1.0, 2.0]),
                UnitSeries::new("B", vec![3.0, 4.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn single_condition_single_unit() {
        let mut conditions = ConditionSet::new();
        conditions.insert("even", |n: &str| n == "B");
        let out = construct_categorized_dataframe(&sample_table(), &conditions).unwrap();

        assert_eq!(out.len(), 2);
        let rows = out.records();
        assert_eq!(rows[0].condition, "even");
        assert_eq!(rows[0].unit_name, "B");
        assert_eq!(rows[0].spike_freq, 3.0);
        assert_eq!(rows[1].spike_freq, 4.0);
        assert!(rows[0].time < rows[1].time);
        // Column A matches nothing and contributes no rows.
        assert!(rows.iter().all(|r| r.unit_name == "B"));
    }

    #[test]
    fn row_count_law() {
        // rows = Σ over conditions of (matching units × time points)
        let mut conditions = ConditionSet::new();
        conditions.insert("all", |_: &str| true); // 2 units × 2 rows
        conditions.insert("just_a", |n: &str| n == "A"); // 1 unit × 2 rows
        conditions.insert("none", |_: &str| false); // 0
        let out = construct_categorized_dataframe(&sample_table(), &conditions).unwrap();
        assert_eq!(out.len(), 2 * 2 + 1 * 2);
    }

    #[test]
    fn multi_match_duplicates_per_condition() {
        let mut conditions = ConditionSet::new();
        conditions.insert("first", |n: &str| n == "A");
        conditions.insert("second", |n: &str| n == "A");
        let out = construct_categorized_dataframe(&sample_table(), &conditions).unwrap();

        assert_eq!(out.len(), 4);
        let (first, second) = out.records().split_at(2);
        for (a, b) in first.iter().zip(second) {
            assert_eq!(a.time, b.time);
            assert_eq!(a.spike_freq, b.spike_freq);
            assert_eq!(a.unit_name, b.unit_name);
            assert_eq!(a.condition, "first");
            assert_eq!(b.condition, "second");
        }
    }

    #[test]
    fn rows_are_condition_major_in_insertion_order() {
        let mut conditions = ConditionSet::new();
        conditions.insert("second_inserted_first", |n: &str| n == "B");
        conditions.insert("alpha", |n: &str| n == "A");
        let out = construct_categorized_dataframe(&sample_table(), &conditions).unwrap();
        assert_eq!(out.conditions(), ["second_inserted_first", "alpha"]);
    }

    #[test]
    fn empty_condition_set_yields_empty_table() {
        let out =
            construct_categorized_dataframe(&sample_table(), &ConditionSet::new()).unwrap();
        assert!(out.is_empty());
        assert_eq!(
            CategorizedTable::COLUMNS,
            ["time", "condition", "spike_freq", "unit_name"]
        );
    }

    #[test]
    fn idempotent_over_same_inputs() {
        let table = sample_table();
        let mut conditions = ConditionSet::new();
        conditions.insert("all", |_: &str| true);
        let a = construct_categorized_dataframe(&table, &conditions).unwrap();
        let b = construct_categorized_dataframe(&table, &conditions).unwrap();
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn malformed_time_fails_whole_call() {
        let table = FrequencyTable::new(
            vec!["2020-01-01T00:00:00".to_string(), "garbage".to_string()],
            vec![UnitSeries::new("A", vec![1.0, 2.0])],
        )
        .unwrap();
        let mut conditions = ConditionSet::new();
        conditions.insert("all", |_: &str| true);
        let err = construct_categorized_dataframe(&table, &conditions).unwrap_err();
        assert_eq!(err.value, "garbage");
    }
}

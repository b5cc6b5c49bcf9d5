use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// UnitSeries – one unit column of the wide table
// ---------------------------------------------------------------------------

/// A named spike-frequency time series for a single recorded unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSeries {
    /// Unit identifier (the source column name).
    pub name: String,
    /// Firing rate at each time point, positionally aligned with the table's
    /// `time` column.
    pub values: Vec<f64>,
}

impl UnitSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        UnitSeries {
            name: name.into(),
            values,
        }
    }

    /// Mean firing rate over the whole series (NaN when empty).
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Errors raised at table construction
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TableError {
    #[error("unit '{unit}' has {actual} values but the time column has {expected}")]
    LengthMismatch {
        unit: String,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate unit column '{0}'")]
    DuplicateUnit(String),
}

// ---------------------------------------------------------------------------
// FrequencyTable – the wide input table
// ---------------------------------------------------------------------------

/// The wide frequency table: a `time` column of string-encoded timestamps
/// plus one [`UnitSeries`] per recorded unit, kept in source column order.
///
/// Invariant: every unit series has exactly as many values as there are
/// entries in `time`; unit names are unique. Both are enforced by [`new`].
///
/// [`new`]: FrequencyTable::new
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    time: Vec<String>,
    units: Vec<UnitSeries>,
}

impl FrequencyTable {
    /// Build a table, validating row alignment and unit-name uniqueness.
    pub fn new(time: Vec<String>, units: Vec<UnitSeries>) -> Result<Self, TableError> {
        for unit in &units {
            if unit.values.len() != time.len() {
                return Err(TableError::LengthMismatch {
                    unit: unit.name.clone(),
                    expected: time.len(),
                    actual: unit.values.len(),
                });
            }
        }
        for (i, unit) in units.iter().enumerate() {
            if units[..i].iter().any(|u| u.name == unit.name) {
                return Err(TableError::DuplicateUnit(unit.name.clone()));
            }
        }
        Ok(FrequencyTable { time, units })
    }

    /// Raw string-encoded timestamps, one per row.
    pub fn time(&self) -> &[String] {
        &self.time
    }

    /// Unit columns in source order.
    pub fn units(&self) -> &[UnitSeries] {
        &self.units
    }

    /// Look up a unit column by name.
    pub fn unit(&self, name: &str) -> Option<&UnitSeries> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Unit names in source column order.
    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.name.as_str())
    }

    /// Number of time points (rows).
    pub fn num_rows(&self) -> usize {
        self.time.len()
    }

    /// Number of unit columns.
    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ConditionSet – ordered mapping condition name → unit-name predicate
// ---------------------------------------------------------------------------

/// A predicate over unit names selecting the members of one condition.
pub type Predicate = Box<dyn Fn(&str) -> bool>;

/// Ordered mapping from condition name to unit-name predicate.
///
/// Insertion order is iteration order, which in turn fixes the row order of
/// the categorized output. Re-inserting an existing name replaces its
/// predicate in place (map semantics, position preserved).
#[derive(Default)]
pub struct ConditionSet {
    conditions: Vec<(String, Predicate)>,
}

impl ConditionSet {
    pub fn new() -> Self {
        ConditionSet::default()
    }

    /// Add or replace a condition.
    pub fn insert(&mut self, name: impl Into<String>, predicate: impl Fn(&str) -> bool + 'static) {
        let name = name.into();
        let boxed: Predicate = Box::new(predicate);
        match self.conditions.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = boxed,
            None => self.conditions.push((name, boxed)),
        }
    }

    /// Conditions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.conditions.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl fmt::Debug for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.conditions.iter().map(|(n, _)| n))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// CategorizedRecord / CategorizedTable – the long-format output
// ---------------------------------------------------------------------------

/// One row of the long-format output: a single (time, unit) observation
/// labelled with the condition that selected the unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedRecord {
    pub time: NaiveDateTime,
    pub condition: String,
    pub spike_freq: f64,
    pub unit_name: String,
}

/// The long-format categorized table. Row order is the emission order of the
/// categorizer (condition-major, then unit, then time) and is never re-sorted.
///
/// A unit matching several conditions appears once per matching condition;
/// conditions are independent analytic groupings, not a partition.
#[derive(Debug, Clone, Default)]
pub struct CategorizedTable {
    records: Vec<CategorizedRecord>,
}

impl CategorizedTable {
    /// The fixed output schema.
    pub const COLUMNS: [&'static str; 4] = ["time", "condition", "spike_freq", "unit_name"];

    pub fn from_records(records: Vec<CategorizedRecord>) -> Self {
        CategorizedTable { records }
    }

    pub fn records(&self) -> &[CategorizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Condition names in first-seen row order.
    pub fn conditions(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for rec in &self.records {
            if !seen.iter().any(|c| *c == rec.condition) {
                seen.push(rec.condition.clone());
            }
        }
        seen
    }

    /// Append another table's rows, preserving both row orders.
    pub fn concat(&mut self, other: CategorizedTable) {
        self.records.extend(other.records);
    }

    /// Serialize as JSON records (the same orientation the loader accepts
    /// for wide tables), for handoff to downstream tooling.
    pub fn to_json_records(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn table_rejects_misaligned_unit() {
        let time = vec!["2020-01-01T00:00:00".to_string(), "2020-01-01T00:00:01".to_string()];
        let units = vec![UnitSeries::new("A1", vec![1.0])];
        let err = FrequencyTable::new(time, units).unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn table_rejects_duplicate_unit_names() {
        let time = vec!["2020-01-01T00:00:00".to_string()];
        let units = vec![
            UnitSeries::new("A1", vec![1.0]),
            UnitSeries::new("A1", vec![2.0]),
        ];
        assert!(matches!(
            FrequencyTable::new(time, units),
            Err(TableError::DuplicateUnit(name)) if name == "A1"
        ));
    }

    #[test]
    fn condition_set_preserves_insertion_order() {
        let mut set = ConditionSet::new();
        set.insert("zeta", |_: &str| true);
        set.insert("alpha", |_: &str| false);
        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn condition_set_reinsert_replaces_in_place() {
        let mut set = ConditionSet::new();
        set.insert("a", |_: &str| false);
        set.insert("b", |_: &str| false);
        set.insert("a", |n: &str| n == "yes");
        assert_eq!(set.len(), 2);
        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        let (_, pred) = set.iter().next().unwrap();
        assert!(pred("yes"));
        assert!(!pred("no"));
    }

    #[test]
    fn categorized_table_tracks_conditions_first_seen() {
        let mk = |cond: &str| CategorizedRecord {
            time: dt("2020-01-01T00:00:00"),
            condition: cond.to_string(),
            spike_freq: 0.0,
            unit_name: "A1".to_string(),
        };
        let table =
            CategorizedTable::from_records(vec![mk("late"), mk("early"), mk("late")]);
        assert_eq!(table.conditions(), ["late", "early"]);
    }

    #[test]
    fn json_records_carry_the_full_schema() {
        let table = CategorizedTable::from_records(vec![CategorizedRecord {
            time: dt("2020-01-01T00:00:00"),
            condition: "even".to_string(),
            spike_freq: 3.0,
            unit_name: "B".to_string(),
        }]);
        let json = table.to_json_records().unwrap();
        for column in CategorizedTable::COLUMNS {
            assert!(json.contains(column), "missing column '{column}' in {json}");
        }
    }

    #[test]
    fn unit_series_mean() {
        let u = UnitSeries::new("A1", vec![1.0, 2.0, 3.0]);
        assert!((u.mean() - 2.0).abs() < 1e-12);
        assert!(UnitSeries::new("B2", vec![]).mean().is_nan());
    }
}

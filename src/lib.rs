//! Categorization and plotting of MEA spike-frequency tables.
//!
//! The input is a wide frequency table produced by an upstream preprocessing
//! step: one `time` column of string-encoded timestamps plus one column of
//! firing rates per recorded unit. The crate reshapes that table into a
//! long-format, condition-labelled table (units are assigned to analytic
//! conditions via name predicates) and renders the usual views: per-unit
//! traces, mean timecourses with error bars, and frequency distributions.
//!
//! Typical flow:
//!
//! ```no_run
//! use rusty_mea::data::categorize::construct_categorized_dataframe;
//! use rusty_mea::data::loader::load_file;
//! use rusty_mea::data::model::ConditionSet;
//!
//! let table = load_file(std::path::Path::new("frequencies.csv"))?;
//! let mut conditions = ConditionSet::new();
//! conditions.insert("control", |name: &str| name.starts_with("A"));
//! conditions.insert("treated", |name: &str| name.starts_with("B"));
//! let categorized = construct_categorized_dataframe(&table, &conditions)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod color;
pub mod data;
pub mod plot;

pub use data::categorize::construct_categorized_dataframe;
pub use data::filter::filter_unit_columns;
pub use data::model::{
    CategorizedRecord, CategorizedTable, ConditionSet, FrequencyTable, UnitSeries,
};
pub use data::timeparse::{parse_timestamp, TimeParseError};

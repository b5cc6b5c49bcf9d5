use super::model::UnitSeries;

/// Yield the unit columns whose names satisfy `predicate`, lazily and in
/// source column order.
///
/// Matches the generator contract of the categorizer: the sequence is finite,
/// borrows `units` without mutating it, and is restartable only by calling
/// again with the same arguments. No match yields an empty sequence, not an
/// error.
pub fn filter_unit_columns<'a, P>(
    predicate: P,
    units: &'a [UnitSeries],
) -> impl Iterator<Item = &'a UnitSeries>
where
    P: Fn(&str) -> bool + 'a,
{
    units.iter().filter(move |unit| predicate(&unit.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> Vec<UnitSeries> {
        vec![
            UnitSeries::new("A1", vec![1.0]),
            UnitSeries::new("B2", vec![2.0]),
            UnitSeries::new("A3", vec![3.0]),
        ]
    }

    #[test]
    fn yields_matches_in_column_order() {
        let units = units();
        let names: Vec<&str> = filter_unit_columns(|n| n.starts_with('A'), &units)
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(names, ["A1", "A3"]);
    }

    #[test]
    fn no_match_yields_empty_sequence() {
        let units = units();
        assert_eq!(filter_unit_columns(|_| false, &units).count(), 0);
    }

    #[test]
    fn all_match_yields_everything() {
        let units = units();
        assert_eq!(filter_unit_columns(|_| true, &units).count(), 3);
    }

    #[test]
    fn is_lazy() {
        let units = units();
        let counter = std::cell::Cell::new(0usize);
        let iter = filter_unit_columns(
            |_| {
                counter.set(counter.get() + 1);
                true
            },
            &units,
        );
        // Nothing evaluated until the iterator is driven.
        assert_eq!(counter.get(), 0);
        assert_eq!(iter.take(1).count(), 1);
        assert_eq!(counter.get(), 1);
    }
}

use chrono::Datelike;
use std::collections::HashMap;

/// Running per-year / per-month / per-day counters of capture dates.
///
/// Buckets are keyed by the calendar date of the timestamp as given; no time
/// zone normalization happens here. Lookups for dates never added return 0.
#[derive(Debug, Clone, Default)]
pub struct DateIndexCollector {
    total: usize,
    by_year: HashMap<i32, usize>,
    by_month: HashMap<(i32, u32), usize>,
    by_day: HashMap<(i32, u32, u32), usize>,
}

impl DateIndexCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T: Datelike>(&mut self, timestamp: &T) {
        let (year, month, day) = (timestamp.year(), timestamp.month(), timestamp.day());
        self.total += 1;
        *self.by_year.entry(year).or_default() += 1;
        *self.by_month.entry((year, month)).or_default() += 1;
        *self.by_day.entry((year, month, day)).or_default() += 1;
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn index_by_year<T: Datelike>(&self, timestamp: &T) -> usize {
        self.by_year
            .get(&timestamp.year())
            .copied()
            .unwrap_or_default()
    }

    pub fn index_by_month<T: Datelike>(&self, timestamp: &T) -> usize {
        self.by_month
            .get(&(timestamp.year(), timestamp.month()))
            .copied()
            .unwrap_or_default()
    }

    pub fn index_by_day<T: Datelike>(&self, timestamp: &T) -> usize {
        self.by_day
            .get(&(timestamp.year(), timestamp.month(), timestamp.day()))
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::DateIndexCollector;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn filled() -> DateIndexCollector {
        let mut collector = DateIndexCollector::new();
        for d in [
            date(2015, 1, 1),
            date(2016, 1, 1),
            date(2016, 1, 2),
            date(2016, 1, 2),
            date(2016, 1, 3),
            date(2016, 1, 3),
            date(2016, 1, 3),
            date(2016, 2, 1),
        ] {
            collector.add(&d);
        }
        collector
    }

    #[test]
    fn counts_by_year_month_and_day() {
        let collector = filled();
        assert_eq!(collector.len(), 8);
        assert_eq!(collector.index_by_year(&date(2016, 1, 1)), 7);
        assert_eq!(collector.index_by_month(&date(2016, 1, 1)), 6);
        assert_eq!(collector.index_by_day(&date(2016, 1, 1)), 1);
        assert_eq!(collector.index_by_day(&date(2016, 1, 2)), 2);
        assert_eq!(collector.index_by_day(&date(2016, 1, 3)), 3);
        assert_eq!(collector.index_by_month(&date(2016, 2, 20)), 1);
        assert_eq!(collector.index_by_year(&date(2015, 6, 6)), 1);
    }

    #[test]
    fn unknown_dates_read_as_zero() {
        let collector = filled();
        assert_eq!(collector.index_by_year(&date(1999, 1, 1)), 0);
        assert_eq!(collector.index_by_month(&date(2016, 3, 1)), 0);
        assert_eq!(collector.index_by_day(&date(2016, 1, 4)), 0);

        let empty = DateIndexCollector::new();
        assert!(empty.is_empty());
        assert_eq!(empty.index_by_day(&date(2016, 1, 1)), 0);
    }

    #[test]
    fn year_index_tracks_each_addition_point() {
        let mut collector = DateIndexCollector::new();
        let dates = [date(2020, 5, 1), date(2021, 1, 1), date(2020, 7, 9)];
        let mut seen = Vec::new();
        for d in &dates {
            collector.add(d);
            seen.push(collector.index_by_year(d));
        }
        assert_eq!(seen, vec![1, 1, 2]);
        assert_eq!(collector.len(), dates.len());
    }

    #[test]
    fn sub_buckets_never_exceed_parent() {
        let collector = filled();
        let d = date(2016, 1, 3);
        assert!(collector.index_by_day(&d) <= collector.index_by_month(&d));
        assert!(collector.index_by_month(&d) <= collector.index_by_year(&d));
    }
}

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::calendar::WeekRange;
use crate::timesheet::Rows;

const FULL_DAY_HOURS: u32 = 8;

fn is_full_day(hours: &str) -> bool {
    match hours.parse::<Decimal>() {
        Ok(hours) => hours == Decimal::from(FULL_DAY_HOURS),
        Err(_) => false,
    }
}

/// Number of days in the week on which the row logged exactly a full day.
pub fn count<R: Rows + ?Sized>(rows: &R, row: usize, week: &WeekRange) -> u32 {
    week.days()
        .filter(|day| {
            let hours = rows.value(row, &day.to_string()).unwrap_or("");
            if !hours.is_empty() && hours.parse::<Decimal>().is_err() {
                debug!(row, day, hours, "Ignoring non-numeric hours");
            }
            is_full_day(hours)
        })
        .count() as u32
}

/// Workday counts of a single row, computed once per week.
pub struct Workdays<'a, R: Rows + ?Sized> {
    rows: &'a R,
    row: usize,
    cache: HashMap<WeekRange, u32>,
}

impl<'a, R: Rows + ?Sized> Workdays<'a, R> {
    pub fn new(rows: &'a R, row: usize) -> Self {
        Self {
            rows,
            row,
            cache: HashMap::new(),
        }
    }

    pub fn in_week(&mut self, week: &WeekRange) -> u32 {
        let (rows, row) = (self.rows, self.row);
        *self
            .cache
            .entry(*week)
            .or_insert_with(|| count(rows, row, week))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timesheet::tests::timesheet;
    use crate::timesheet::Timesheet;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn october(from: u32, until: u32) -> WeekRange {
        WeekRange::new(
            NaiveDate::from_ymd_opt(2023, 10, from).unwrap(),
            NaiveDate::from_ymd_opt(2023, 10, until).unwrap(),
        )
    }

    #[test]
    fn only_full_days_count() {
        let sheet = timesheet();
        assert_eq!(count(&sheet, 0, &october(1, 5)), 3);
        assert_eq!(count(&sheet, 1, &october(1, 5)), 3);
        assert_eq!(count(&sheet, 0, &october(1, 2)), 2);
    }

    #[test]
    fn four_full_days_then_a_day_off() {
        let sheet = Timesheet::from_reader(
            "1\t2\t3\t4\t5\n8\t8\t8\t8\t0\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(count(&sheet, 0, &october(1, 5)), 4);
    }

    #[test]
    fn missing_columns_are_days_off() {
        let sheet = timesheet();
        assert_eq!(count(&sheet, 0, &october(6, 12)), 0);
    }

    #[test]
    fn rows_are_counted_independently() {
        let sheet = timesheet();
        let mut alice = Workdays::new(&sheet, 0);
        let mut bob = Workdays::new(&sheet, 1);
        assert_eq!(alice.in_week(&october(1, 1)), 1);
        assert_eq!(bob.in_week(&october(1, 1)), 0);
    }

    #[test]
    fn cached_counts_match() {
        let sheet = timesheet();
        let mut workdays = Workdays::new(&sheet, 0);
        let week = october(1, 5);
        assert_eq!(workdays.in_week(&week), workdays.in_week(&week));
        assert_eq!(workdays.cache.len(), 1);
    }

    fn arb_hours() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("8".to_string()),
            Just("8.0".to_string()),
            Just("".to_string()),
            Just("off".to_string()),
            (0..24u32).prop_map(|h| h.to_string()),
        ]
    }

    proptest! {
        #[test]
        fn count_bounded_by_week_length(
            hours in prop::collection::vec(arb_hours(), 31),
            from in 1..=31u32,
            len in 0..7u32,
        ) {
            let until = (from + len).min(31);
            let header: Vec<String> = (1..=31).map(|d| d.to_string()).collect();
            let text = format!("{}\n{}\n", header.join("\t"), hours.join("\t"));
            let sheet = Timesheet::from_reader(text.as_bytes()).unwrap();
            let week = october(from, until);

            let expected = (from..=until)
                .filter(|d| {
                    let h = &hours[*d as usize - 1];
                    h == "8" || h == "8.0"
                })
                .count() as u32;
            let counted = count(&sheet, 0, &week);
            prop_assert!(counted <= week.num_days());
            prop_assert_eq!(counted, expected);
        }
    }
}

//! Shared SQL composition: date-range filtering, heating-season
//! exclusion, and interval grouping. Every metric query applies these
//! with the same semantics, varying only the table and aggregates.
//!
//! `column` arguments are compile-time constants (`"e.date"` and the
//! like); caller input never reaches the SQL text.

use sqlx::{Postgres, QueryBuilder};

use crate::filter::{DateRange, Interval};

/// Closed range when both bounds are present, half-open when one is,
/// no filter when neither is.
pub fn push_date_range(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    range: &DateRange,
) {
    match (range.start, range.end) {
        (Some(start), Some(end)) => {
            qb.push(format!(" AND {column} BETWEEN "));
            qb.push_bind(start);
            qb.push(" AND ");
            qb.push_bind(end);
        }
        (Some(start), None) => {
            qb.push(format!(" AND {column} >= "));
            qb.push_bind(start);
        }
        (None, Some(end)) => {
            qb.push(format!(" AND {column} < "));
            qb.push_bind(end);
        }
        (None, None) => {}
    }
}

/// Restrict to the heating season by dropping calendar months 5-9.
pub fn push_heating_season(qb: &mut QueryBuilder<'_, Postgres>, column: &str) {
    qb.push(format!(
        " AND (EXTRACT(MONTH FROM {column}) < 5 OR EXTRACT(MONTH FROM {column}) > 9)"
    ));
}

/// Group by the calendar truncation matching the interval, ordered by
/// the truncated timestamp ascending.
pub fn push_interval_group(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    interval: Interval,
) {
    let unit = interval.trunc_unit();
    qb.push(format!(
        " GROUP BY date_trunc('{unit}', {column}) ORDER BY date_trunc('{unit}', {column})"
    ));
}

/// Time-ordering without grouping, for raw row listings.
pub fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, column: &str) {
    qb.push(format!(" ORDER BY {column}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn builder() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new("SELECT 1 FROM t WHERE house_id = 0")
    }

    #[test]
    fn both_bounds_give_a_closed_range() {
        let mut qb = builder();
        let range = DateRange {
            start: Some(datetime!(2013-01-01 00:00)),
            end: Some(datetime!(2013-12-31 23:59)),
        };
        push_date_range(&mut qb, "t.date", &range);
        assert!(qb.sql().contains("t.date BETWEEN $1 AND $2"));
    }

    #[test]
    fn single_bounds_are_half_open() {
        let mut qb = builder();
        push_date_range(
            &mut qb,
            "t.date",
            &DateRange {
                start: Some(datetime!(2013-01-01 00:00)),
                end: None,
            },
        );
        assert!(qb.sql().contains("t.date >= $1"));
        assert!(!qb.sql().contains("BETWEEN"));

        let mut qb = builder();
        push_date_range(
            &mut qb,
            "t.date",
            &DateRange {
                start: None,
                end: Some(datetime!(2013-01-01 00:00)),
            },
        );
        assert!(qb.sql().contains("t.date < $1"));
    }

    #[test]
    fn open_range_adds_no_filter() {
        let mut qb = builder();
        let before = qb.sql().to_string();
        push_date_range(&mut qb, "t.date", &DateRange::default());
        assert_eq!(qb.sql(), before);
    }

    #[test]
    fn heating_season_drops_summer_months() {
        let mut qb = builder();
        push_heating_season(&mut qb, "t.date");
        assert!(qb
            .sql()
            .contains("EXTRACT(MONTH FROM t.date) < 5 OR EXTRACT(MONTH FROM t.date) > 9"));
    }

    #[test]
    fn grouping_truncates_per_interval_and_orders_ascending() {
        for (interval, unit) in [
            (Interval::Hour, "hour"),
            (Interval::Day, "day"),
            (Interval::Month, "month"),
            (Interval::Year, "year"),
        ] {
            let mut qb = builder();
            push_interval_group(&mut qb, "t.date", interval);
            let sql = qb.sql();
            assert!(sql.contains(&format!("GROUP BY date_trunc('{unit}', t.date)")));
            assert!(sql.contains(&format!("ORDER BY date_trunc('{unit}', t.date)")));
        }
    }
}

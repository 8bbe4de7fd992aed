//! Sales statistics
//!
//! Calendar-bucketed revenue figures for the admin sales screen,
//! computed locally from the fetched sale list. Dates arrive in a few
//! textual shapes depending on how the backend serialized them; a sale
//! whose date cannot be parsed still counts toward the overall totals.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use shared::models::Sale;

/// Revenue buckets shown in the stats panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesStats {
    pub today: f64,
    pub month: f64,
    pub year: f64,
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc).date_naive());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Bucket `sales` relative to `now`.
pub fn compute(sales: &[Sale], now: DateTime<Utc>) -> SalesStats {
    let today = now.date_naive();
    let mut stats = SalesStats {
        count: sales.len(),
        ..SalesStats::default()
    };

    for sale in sales {
        stats.total += sale.total;
        let Some(date) = sale.date.as_deref().and_then(parse_date) else {
            continue;
        };
        if date == today {
            stats.today += sale.total;
        }
        if date.year() == today.year() {
            stats.year += sale.total;
            if date.month() == today.month() {
                stats.month += sale.total;
            }
        }
    }

    if stats.count > 0 {
        stats.average = stats.total / stats.count as f64;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale(date: Option<&str>, total: f64) -> Sale {
        Sale {
            id: None,
            user_id: None,
            date: date.map(str::to_string),
            total,
            items: Vec::new(),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn buckets_by_day_month_and_year() {
        let sales = vec![
            sale(Some("2025-06-15T09:30:00"), 10.0),
            sale(Some("2025-06-01"), 20.0),
            sale(Some("2025-01-20T00:00:00Z"), 40.0),
            sale(Some("2024-12-31"), 80.0),
        ];
        let stats = compute(&sales, fixed_now());
        assert_eq!(stats.today, 10.0);
        assert_eq!(stats.month, 30.0);
        assert_eq!(stats.year, 70.0);
        assert_eq!(stats.total, 150.0);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.average, 37.5);
    }

    #[test]
    fn unparseable_dates_still_count_toward_total() {
        let sales = vec![sale(Some("ayer"), 5.0), sale(None, 3.0)];
        let stats = compute(&sales, fixed_now());
        assert_eq!(stats.total, 8.0);
        assert_eq!(stats.today, 0.0);
        assert_eq!(stats.year, 0.0);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average, 4.0);
    }

    #[test]
    fn fractional_second_timestamps_parse() {
        let sales = vec![sale(Some("2025-06-15T09:30:00.123456"), 2.0)];
        let stats = compute(&sales, fixed_now());
        assert_eq!(stats.today, 2.0);
    }

    #[test]
    fn empty_list_yields_zeroes() {
        assert_eq!(compute(&[], fixed_now()), SalesStats::default());
    }
}

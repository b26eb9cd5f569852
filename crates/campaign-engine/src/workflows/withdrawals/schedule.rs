use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

/// Settlement batch date for a request made on `today`: day 1-10 pays on the 15th, day 11-20 on
/// the 25th, later days on the 5th of the following month.
pub fn payout_date(today: NaiveDate) -> NaiveDate {
    let (year, month) = (today.year(), today.month());
    let scheduled = match today.day() {
        1..=10 => NaiveDate::from_ymd_opt(year, month, 15),
        11..=20 => NaiveDate::from_ymd_opt(year, month, 25),
        _ if month == 12 => NaiveDate::from_ymd_opt(year + 1, 1, 5),
        _ => NaiveDate::from_ymd_opt(year, month + 1, 5),
    };
    // days 5, 15 and 25 exist in every month
    scheduled.unwrap_or(today)
}

/// Payout date for an instant, evaluated on the business calendar.
pub fn payout_date_at(now: DateTime<Utc>, business_offset: FixedOffset) -> NaiveDate {
    payout_date(now.with_timezone(&business_offset).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn early_month_pays_on_the_fifteenth() {
        assert_eq!(payout_date(date(2025, 3, 1)), date(2025, 3, 15));
        assert_eq!(payout_date(date(2025, 3, 10)), date(2025, 3, 15));
    }

    #[test]
    fn mid_month_pays_on_the_twenty_fifth() {
        assert_eq!(payout_date(date(2025, 3, 11)), date(2025, 3, 25));
        assert_eq!(payout_date(date(2025, 3, 12)), date(2025, 3, 25));
        assert_eq!(payout_date(date(2025, 3, 20)), date(2025, 3, 25));
    }

    #[test]
    fn late_month_pays_on_the_fifth_of_next_month() {
        assert_eq!(payout_date(date(2025, 3, 21)), date(2025, 4, 5));
        assert_eq!(payout_date(date(2025, 3, 25)), date(2025, 4, 5));
        assert_eq!(payout_date(date(2025, 2, 28)), date(2025, 3, 5));
        assert_eq!(payout_date(date(2025, 12, 31)), date(2026, 1, 5));
    }

    #[test]
    fn business_calendar_decides_the_day() {
        let offset = FixedOffset::east_opt(9 * 3600).expect("offset");
        // 2025-03-10 16:00 UTC is already the 11th in UTC+9
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 16, 0, 0).unwrap();
        assert_eq!(payout_date_at(now, offset), date(2025, 3, 25));
    }
}

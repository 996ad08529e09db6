use crate::date::days_in_month;
use chrono::{prelude::*, Duration};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The inclusive date range a generated statement covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingPeriod {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl Display for ReportingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.from_date, self.to_date)
    }
}

fn clamp_hour(hour_utc: i32) -> i64 {
    i64::from(hour_utc.clamp(0, 23))
}

fn at_hour(date: NaiveDate, hour: i64) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default())) + Duration::hours(hour)
}

fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// The `day` of the month starting at `first`, clamped to the length of that month.
fn day_in_month(first: NaiveDate, day: u32, hour: i64) -> DateTime<Utc> {
    let day = day.min(days_in_month(first.year(), first.month()));
    at_hour(first + Duration::days(i64::from(day - 1)), hour)
}

/// The most recent occurrence of `target_day` at `hour_utc:00` that is not after `now`.
///
/// The result is always within `(now - 7 days, now]`.
pub fn most_recent_weekly_schedule(
    now: DateTime<Utc>,
    target_day: Weekday,
    hour_utc: i32,
) -> DateTime<Utc> {
    let hour = clamp_hour(hour_utc);
    let offset = i64::from(target_day.num_days_from_monday())
        - i64::from(now.weekday().num_days_from_monday());
    let candidate = at_hour(now.date_naive() + Duration::days(offset), hour);

    if candidate > now {
        candidate - Duration::days(7)
    } else {
        candidate
    }
}

/// The most recent `day_of_month` at `hour_utc:00` that is not after `now`.
///
/// Days past the end of a month map to the last day of that month, so
/// day 31 fires on Feb 28th (or 29th) and on the 30th of short months.
pub fn most_recent_monthly_schedule(
    now: DateTime<Utc>,
    day_of_month: i32,
    hour_utc: i32,
) -> DateTime<Utc> {
    let day = day_of_month.clamp(1, 31) as u32;
    let hour = clamp_hour(hour_utc);

    let this_month = first_day_of_month(now.date_naive());
    let candidate = day_in_month(this_month, day, hour);
    if candidate > now {
        let previous_month = first_day_of_month(this_month - Duration::days(1));
        day_in_month(previous_month, day, hour)
    } else {
        candidate
    }
}

/// The seven days ending the day before `schedule_point`.
pub fn weekly_period(schedule_point: DateTime<Utc>) -> ReportingPeriod {
    let to_date = schedule_point.date_naive() - Duration::days(1);
    ReportingPeriod {
        from_date: to_date - Duration::days(6),
        to_date,
    }
}

/// The whole calendar month before the month of `schedule_point`.
pub fn monthly_period(schedule_point: DateTime<Utc>) -> ReportingPeriod {
    let to_date = first_day_of_month(schedule_point.date_naive()) - Duration::days(1);
    ReportingPeriod {
        from_date: first_day_of_month(to_date),
        to_date,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    #[test]
    fn weekly_schedule_on_friday_points_back_to_monday() {
        let now = utc(2024, 3, 15, 8, 0);
        let point = most_recent_weekly_schedule(now, Weekday::Mon, 6);
        assert_eq!(point, utc(2024, 3, 11, 6, 0));

        let period = weekly_period(point);
        assert_eq!(period.from_date, date(2024, 3, 4));
        assert_eq!(period.to_date, date(2024, 3, 10));
    }

    #[test]
    fn weekly_schedule_steps_back_a_week_before_send_hour() {
        // Monday 05:59, the Monday 06:00 run is still in the future
        let now = utc(2024, 3, 11, 5, 59);
        let point = most_recent_weekly_schedule(now, Weekday::Mon, 6);
        assert_eq!(point, utc(2024, 3, 4, 6, 0));
    }

    #[test]
    fn weekly_schedule_includes_exact_instant() {
        let now = utc(2024, 3, 11, 6, 0);
        assert_eq!(most_recent_weekly_schedule(now, Weekday::Mon, 6), now);
    }

    #[test]
    fn weekly_schedule_for_later_weekday_uses_previous_week() {
        // Tuesday, targeting Sunday
        let now = utc(2024, 3, 12, 12, 0);
        let point = most_recent_weekly_schedule(now, Weekday::Sun, 6);
        assert_eq!(point, utc(2024, 3, 10, 6, 0));
    }

    #[test]
    fn weekly_schedule_clamps_hour() {
        let now = utc(2024, 3, 15, 8, 0);
        assert_eq!(
            most_recent_weekly_schedule(now, Weekday::Mon, 99),
            utc(2024, 3, 11, 23, 0)
        );
        assert_eq!(
            most_recent_weekly_schedule(now, Weekday::Mon, -4),
            utc(2024, 3, 11, 0, 0)
        );
    }

    #[test]
    fn weekly_schedule_is_within_last_seven_days() {
        let start = utc(2023, 12, 25, 0, 0);
        for step in 0..(24 * 21) {
            let now = start + Duration::minutes(step * 60 + 17);
            for target in WEEKDAYS.iter() {
                for hour in &[0, 6, 13, 23] {
                    let point = most_recent_weekly_schedule(now, *target, *hour);
                    assert!(point <= now);
                    assert!(point > now - Duration::days(7));
                    assert_eq!(point.weekday(), *target);
                    assert_eq!(point.hour(), *hour as u32);
                    assert_eq!(point.minute(), 0);
                }
            }
        }
    }

    #[test]
    fn monthly_schedule_clamps_to_short_month() {
        let now = utc(2024, 2, 29, 10, 0);
        let point = most_recent_monthly_schedule(now, 31, 6);
        assert_eq!(point, utc(2024, 2, 29, 6, 0));

        let period = monthly_period(point);
        assert_eq!(period.from_date, date(2024, 1, 1));
        assert_eq!(period.to_date, date(2024, 1, 31));
    }

    #[test]
    fn monthly_schedule_falls_back_to_previous_month() {
        let now = utc(2024, 3, 15, 8, 0);
        let point = most_recent_monthly_schedule(now, 31, 6);
        assert_eq!(point, utc(2024, 2, 29, 6, 0));

        let now = utc(2023, 3, 1, 5, 0);
        let point = most_recent_monthly_schedule(now, 1, 6);
        assert_eq!(point, utc(2023, 2, 1, 6, 0));
    }

    #[test]
    fn monthly_schedule_crosses_year_boundary() {
        let now = utc(2024, 1, 10, 0, 0);
        let point = most_recent_monthly_schedule(now, 15, 6);
        assert_eq!(point, utc(2023, 12, 15, 6, 0));

        let period = monthly_period(point);
        assert_eq!(period.from_date, date(2023, 11, 1));
        assert_eq!(period.to_date, date(2023, 11, 30));
    }

    #[test]
    fn monthly_schedule_clamps_day_and_hour() {
        let now = utc(2024, 4, 20, 12, 0);
        assert_eq!(
            most_recent_monthly_schedule(now, 0, 6),
            utc(2024, 4, 1, 6, 0)
        );
        assert_eq!(
            most_recent_monthly_schedule(now, 45, 30),
            utc(2024, 3, 31, 23, 0)
        );
    }

    #[test]
    fn monthly_schedule_is_not_after_now_and_on_clamped_day() {
        let start = utc(2023, 1, 1, 0, 0);
        for step in 0..(366 * 2) {
            let now = start + Duration::hours(step * 13);
            for day in &[1, 15, 28, 29, 30, 31] {
                for hour in &[0, 6, 23] {
                    let point = most_recent_monthly_schedule(now, *day, *hour);
                    assert!(point <= now);
                    let expected_day = (*day as u32).min(days_in_month(point.year(), point.month()));
                    assert_eq!(point.day(), expected_day);
                    assert_eq!(point.hour(), *hour as u32);
                    assert!(point > now - Duration::days(62));
                }
            }
        }
    }

    #[test]
    fn consecutive_weekly_periods_are_contiguous() {
        let mut point = utc(2024, 1, 1, 6, 0);
        for _ in 0..60 {
            let next = point + Duration::days(7);
            let period = weekly_period(point);
            let next_period = weekly_period(next);
            assert!(period.to_date < point.date_naive());
            assert_eq!(period.to_date + Duration::days(1), next_period.from_date);
            assert_eq!(next_period.to_date - next_period.from_date, Duration::days(6));
            point = next;
        }
    }

    #[test]
    fn consecutive_monthly_periods_are_contiguous() {
        let mut now = utc(2023, 1, 31, 12, 0);
        let mut previous: Option<ReportingPeriod> = None;
        for _ in 0..24 {
            let point = most_recent_monthly_schedule(now, 31, 6);
            let period = monthly_period(point);
            assert!(period.to_date < point.date_naive());
            assert_eq!(period.from_date.day(), 1);
            if let Some(previous) = previous {
                assert_eq!(previous.to_date + Duration::days(1), period.from_date);
            }
            previous = Some(period);
            // Jump into the next month, past its last possible send day
            now = at_hour(first_day_of_month(now.date_naive()) + Duration::days(45), 0);
            now = at_hour(
                first_day_of_month(now.date_naive())
                    + Duration::days(i64::from(days_in_month(now.year(), now.month())) - 1),
                12,
            );
        }
    }
}

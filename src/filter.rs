//! Week / month / all selection over the appointment list.
//!
//! Period boundaries:
//! - week: `[first weekday 00:00, +7 days)` in the display zone, the first
//!   weekday being configurable (Sunday by default)
//! - month: `[1st 00:00, 1st of next month 00:00)` in the display zone
//!
//! An appointment falls in a period when its start instant does.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::lookup::{AppointmentSource, LookupResult};
use crate::models::Appointment;
use crate::time;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter '{0}' (expected week, month or all)")]
    Unknown(String),
}

/// Which subset of appointments the view shows. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentFilter {
    Week,
    Month,
    #[default]
    All,
}

impl AppointmentFilter {
    /// In selector order.
    pub const ALL: [AppointmentFilter; 3] = [Self::All, Self::Week, Self::Month];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }

    /// Selector label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Month => "Month",
            Self::All => "All",
        }
    }

    /// Fetch the subset this filter selects.
    pub fn fetch<S: AppointmentSource + ?Sized>(&self, source: &S) -> LookupResult<Vec<Appointment>> {
        match self {
            Self::Week => source.appointments_for_current_week(),
            Self::Month => source.appointments_for_current_month(),
            Self::All => source.all_appointments(),
        }
    }
}

impl FromStr for AppointmentFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == wanted)
            .ok_or_else(|| FilterError::Unknown(s.to_string()))
    }
}

impl fmt::Display for AppointmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Half-open UTC range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant < self.end
    }

    /// The calendar week containing `now`, in `now`'s zone.
    pub fn week_of<Tz: TimeZone>(now: &DateTime<Tz>, week_start: Weekday) -> Self {
        let first = first_day_of_week(now.date_naive(), week_start);
        let zone = now.timezone();
        Self {
            start: start_of_day(first, &zone),
            end: start_of_day(first + Duration::days(7), &zone),
        }
    }

    /// The calendar month containing `now`, in `now`'s zone.
    pub fn month_of<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        let first = today.with_day(1).unwrap_or(today);
        let next = first_of_next_month(first);
        let zone = now.timezone();
        Self {
            start: start_of_day(first, &zone),
            end: start_of_day(next, &zone),
        }
    }
}

/// The date the week containing `date` starts on.
pub fn first_day_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = (date.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7;
    date - Duration::days(i64::from(back))
}

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first + Duration::days(31))
}

/// First instant of `date` in `zone`.
///
/// Some zones skip midnight on DST changes; the day then starts at the
/// first wall-clock hour that exists.
fn start_of_day<Tz: TimeZone>(date: NaiveDate, zone: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=3)
        .map(|h| midnight + Duration::hours(h))
        .find_map(|naive| time::zone_to_reference(&naive, zone).ok())
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::testing::FakeDirectory;
    use crate::models::AppointmentFields;
    use chrono::FixedOffset;
    use chrono_tz::America::Santiago;

    fn est() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn appointment(id: i32, start: DateTime<Utc>) -> Appointment {
        Appointment::with_fields(
            id,
            AppointmentFields {
                title: format!("Appointment {}", id),
                description: String::new(),
                location: String::new(),
                kind: "Planning Session".to_string(),
                start,
                end: start + Duration::hours(1),
                created_at: start,
                created_by: "test".to_string(),
                updated_at: start,
                updated_by: "test".to_string(),
                customer_id: 1,
                user_id: 1,
                contact_id: 1,
            },
        )
    }

    #[test]
    fn test_default_is_all() {
        assert_eq!(AppointmentFilter::default(), AppointmentFilter::All);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("Week".parse(), Ok(AppointmentFilter::Week));
        assert_eq!("month".parse(), Ok(AppointmentFilter::Month));
        assert_eq!(" ALL ".parse(), Ok(AppointmentFilter::All));
        assert_eq!(
            "Fortnight".parse::<AppointmentFilter>(),
            Err(FilterError::Unknown("Fortnight".to_string()))
        );
        for filter in AppointmentFilter::ALL {
            assert_eq!(filter.label().parse(), Ok(filter));
            assert_eq!(filter.as_str().parse(), Ok(filter));
        }
    }

    #[test]
    fn test_fetch_maps_to_one_call() {
        let now = Utc::now();
        let mut source = FakeDirectory::default();
        source.week = vec![appointment(1, now)];
        source.month = vec![appointment(1, now), appointment(2, now)];
        source.all = vec![appointment(1, now), appointment(2, now), appointment(3, now)];

        assert_eq!(AppointmentFilter::Week.fetch(&source).unwrap().len(), 1);
        assert_eq!(AppointmentFilter::Month.fetch(&source).unwrap().len(), 2);
        assert_eq!(AppointmentFilter::All.fetch(&source).unwrap().len(), 3);
        assert_eq!(source.fetches.get(), 3);
    }

    #[test]
    fn test_first_day_of_week() {
        // 2024-03-13 is a Wednesday.
        let wed = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        assert_eq!(
            first_day_of_week(wed, Weekday::Sun),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert_eq!(
            first_day_of_week(wed, Weekday::Mon),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
        assert_eq!(first_day_of_week(wed, Weekday::Wed), wed);

        let sun = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(first_day_of_week(sun, Weekday::Sun), sun);
        assert_eq!(
            first_day_of_week(sun, Weekday::Mon),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_week_period_in_zone() {
        let now = est().with_ymd_and_hms(2024, 3, 13, 15, 0, 0).unwrap();
        let week = Period::week_of(&now, Weekday::Sun);

        assert_eq!(week.start, Utc.with_ymd_and_hms(2024, 3, 10, 5, 0, 0).unwrap());
        assert_eq!(week.end, Utc.with_ymd_and_hms(2024, 3, 17, 5, 0, 0).unwrap());
        assert!(week.contains(&now.with_timezone(&Utc)));
        assert!(!week.contains(&week.end));
        assert!(week.contains(&week.start));
    }

    #[test]
    fn test_week_starting_on_skipped_midnight() {
        // Local midnight does not exist on Sunday 2024-09-08 in Santiago.
        let now = Santiago.with_ymd_and_hms(2024, 9, 10, 12, 0, 0).unwrap();
        let week = Period::week_of(&now, Weekday::Sun);

        assert_eq!(week.start, Utc.with_ymd_and_hms(2024, 9, 8, 4, 0, 0).unwrap());
        assert_eq!(
            week.start.with_timezone(&Santiago).naive_local(),
            NaiveDate::from_ymd_opt(2024, 9, 8).unwrap().and_hms_opt(1, 0, 0).unwrap()
        );
        assert_eq!(week.end, Utc.with_ymd_and_hms(2024, 9, 15, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_month_period_wraps_year() {
        let now = est().with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap();
        let month = Period::month_of(&now);
        assert_eq!(month.start, Utc.with_ymd_and_hms(2023, 12, 1, 5, 0, 0).unwrap());
        assert_eq!(month.end, Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap());

        let feb = Period::month_of(&Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap());
        assert_eq!(feb.end - feb.start, Duration::days(29));
    }

    #[test]
    fn test_contains_uses_start_instant() {
        let now = Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap();
        let week = Period::week_of(&now, Weekday::Sun);
        let list = vec![
            appointment(1, Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap()),
            appointment(2, Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()),
            appointment(3, Utc.with_ymd_and_hms(2024, 3, 16, 23, 0, 0).unwrap()),
            appointment(4, Utc.with_ymd_and_hms(2024, 3, 17, 0, 0, 0).unwrap()),
        ];

        let ids: Vec<i32> = list
            .iter()
            .filter(|a| week.contains(&a.start()))
            .map(|a| a.id())
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }
}

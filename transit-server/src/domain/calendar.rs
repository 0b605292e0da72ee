//! Service calendars and weekday resolution.
//!
//! A service calendar says which weekdays a service operates and over which
//! inclusive date window. The weekday selector is a fixed seven-value enum;
//! it is the only way a weekday is ever named, so no query or bucket key can
//! be built from externally influenced text.

use chrono::{Datelike, NaiveDate};

use super::ids::ServiceId;

/// Day of the week, in the fixed monday→sunday scan order used everywhere
/// weekdays are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in scan order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Lowercase name matching the source data's column names.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Position in scan order: monday = 0 … sunday = 6.
    pub fn index(self) -> usize {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }

    /// The weekday a calendar date falls on.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// A service calendar row: seven weekday activity flags plus an inclusive
/// validity window.
///
/// # Examples
///
/// ```
/// use transit_server::domain::{ServiceCalendar, ServiceId, Weekday};
/// use chrono::NaiveDate;
///
/// let cal = ServiceCalendar::new(
///     ServiceId::new("wk"),
///     NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 6, 27).unwrap(),
/// )
/// .with_day(Weekday::Wednesday);
///
/// // 2025-06-11 is a Wednesday inside the window, 06-12 a Thursday
/// assert!(cal.is_active_on(NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()));
/// assert!(!cal.is_active_on(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()));
/// assert_eq!(cal.primary_weekday(), Some(Weekday::Wednesday));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCalendar {
    pub service_id: ServiceId,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ServiceCalendar {
    /// A calendar with no weekday flags set.
    pub fn new(service_id: ServiceId, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            service_id,
            monday: false,
            tuesday: false,
            wednesday: false,
            thursday: false,
            friday: false,
            saturday: false,
            sunday: false,
            start_date,
            end_date,
        }
    }

    /// Set a weekday flag, builder-style.
    pub fn with_day(mut self, day: Weekday) -> Self {
        match day {
            Weekday::Monday => self.monday = true,
            Weekday::Tuesday => self.tuesday = true,
            Weekday::Wednesday => self.wednesday = true,
            Weekday::Thursday => self.thursday = true,
            Weekday::Friday => self.friday = true,
            Weekday::Saturday => self.saturday = true,
            Weekday::Sunday => self.sunday = true,
        }
        self
    }

    /// Whether the flag for `day` is set.
    pub fn runs_on(&self, day: Weekday) -> bool {
        match day {
            Weekday::Monday => self.monday,
            Weekday::Tuesday => self.tuesday,
            Weekday::Wednesday => self.wednesday,
            Weekday::Thursday => self.thursday,
            Weekday::Friday => self.friday,
            Weekday::Saturday => self.saturday,
            Weekday::Sunday => self.sunday,
        }
    }

    /// Whether the validity window contains `date` (both ends inclusive).
    pub fn window_contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether the service operates on `date`: the date must fall within
    /// the validity window AND the flag for its weekday must be set.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.window_contains(date) && self.runs_on(Weekday::from_date(date))
    }

    /// The first set weekday in monday→sunday scan order, or `None` when
    /// no flag is set.
    ///
    /// A service active on several weekdays is still assigned exactly one
    /// weekday here; callers wanting every active day use
    /// [`active_weekdays`](Self::active_weekdays) instead.
    pub fn primary_weekday(&self) -> Option<Weekday> {
        Weekday::ALL.into_iter().find(|&day| self.runs_on(day))
    }

    /// All set weekdays in scan order.
    pub fn active_weekdays(&self) -> Vec<Weekday> {
        Weekday::ALL
            .into_iter()
            .filter(|&day| self.runs_on(day))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekday_calendar() -> ServiceCalendar {
        // Mon-Fri service, June 2025
        ServiceCalendar::new(ServiceId::new("wk"), date(2025, 6, 2), date(2025, 6, 27))
            .with_day(Weekday::Monday)
            .with_day(Weekday::Tuesday)
            .with_day(Weekday::Wednesday)
            .with_day(Weekday::Thursday)
            .with_day(Weekday::Friday)
    }

    #[test]
    fn active_inside_window_on_flagged_day() {
        let cal = weekday_calendar();
        // 2025-06-11 is a Wednesday
        assert!(cal.is_active_on(date(2025, 6, 11)));
    }

    #[test]
    fn inactive_on_unflagged_day() {
        let cal = weekday_calendar();
        // 2025-06-14 is a Saturday
        assert!(!cal.is_active_on(date(2025, 6, 14)));
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let cal = weekday_calendar();
        // start date 2025-06-02 is a Monday, end date 2025-06-27 a Friday
        assert!(cal.is_active_on(date(2025, 6, 2)));
        assert!(cal.is_active_on(date(2025, 6, 27)));
    }

    #[test]
    fn inactive_outside_window() {
        let cal = weekday_calendar();
        // the Friday before the window and the Monday after it
        assert!(!cal.is_active_on(date(2025, 5, 30)));
        assert!(!cal.is_active_on(date(2025, 6, 30)));
    }

    #[test]
    fn primary_weekday_is_first_in_scan_order() {
        let cal = ServiceCalendar::new(ServiceId::new("s"), date(2025, 1, 1), date(2025, 12, 31))
            .with_day(Weekday::Saturday)
            .with_day(Weekday::Wednesday);
        assert_eq!(cal.primary_weekday(), Some(Weekday::Wednesday));
    }

    #[test]
    fn primary_weekday_none_when_no_flags() {
        let cal = ServiceCalendar::new(ServiceId::new("s"), date(2025, 1, 1), date(2025, 12, 31));
        assert_eq!(cal.primary_weekday(), None);
    }

    #[test]
    fn active_weekdays_in_scan_order() {
        let cal = ServiceCalendar::new(ServiceId::new("s"), date(2025, 1, 1), date(2025, 12, 31))
            .with_day(Weekday::Sunday)
            .with_day(Weekday::Tuesday);
        assert_eq!(
            cal.active_weekdays(),
            vec![Weekday::Tuesday, Weekday::Sunday]
        );
    }

    #[test]
    fn weekday_from_date() {
        // 2025-06-02 was a Monday
        assert_eq!(Weekday::from_date(date(2025, 6, 2)), Weekday::Monday);
        assert_eq!(Weekday::from_date(date(2025, 6, 8)), Weekday::Sunday);
    }

    #[test]
    fn weekday_names_and_indices() {
        assert_eq!(Weekday::Monday.name(), "monday");
        assert_eq!(Weekday::Sunday.name(), "sunday");
        for (i, day) in Weekday::ALL.into_iter().enumerate() {
            assert_eq!(day.index(), i);
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_date()(
            year in 2020i32..2035,
            month in 1u32..=12,
            day in 1u32..=28
        ) -> NaiveDate {
            NaiveDate::from_ymd_opt(year, month, day).unwrap()
        }
    }

    prop_compose! {
        fn calendar()(
            start in valid_date(),
            span_days in 0i64..400,
            flags in prop::array::uniform7(any::<bool>())
        ) -> ServiceCalendar {
            let mut cal = ServiceCalendar::new(
                ServiceId::new("p"),
                start,
                start + chrono::Duration::days(span_days),
            );
            for (day, set) in Weekday::ALL.into_iter().zip(flags) {
                if set {
                    cal = cal.with_day(day);
                }
            }
            cal
        }
    }

    proptest! {
        /// Activity implies window membership and a set weekday flag.
        #[test]
        fn active_implies_window_and_flag(cal in calendar(), date in valid_date()) {
            if cal.is_active_on(date) {
                prop_assert!(cal.window_contains(date));
                prop_assert!(cal.runs_on(Weekday::from_date(date)));
            }
        }

        /// The primary weekday, when present, is always a set flag and no
        /// earlier weekday in scan order is set.
        #[test]
        fn primary_weekday_is_first_set_flag(cal in calendar()) {
            match cal.primary_weekday() {
                Some(primary) => {
                    prop_assert!(cal.runs_on(primary));
                    for day in Weekday::ALL.into_iter().take(primary.index()) {
                        prop_assert!(!cal.runs_on(day));
                    }
                }
                None => {
                    for day in Weekday::ALL {
                        prop_assert!(!cal.runs_on(day));
                    }
                }
            }
        }

        /// A date outside the window is never active.
        #[test]
        fn outside_window_never_active(cal in calendar(), offset in 1i64..1000) {
            let before = cal.start_date - chrono::Duration::days(offset);
            let after = cal.end_date + chrono::Duration::days(offset);
            prop_assert!(!cal.is_active_on(before));
            prop_assert!(!cal.is_active_on(after));
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl CalendarDate {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    pub fn from_start() -> Self {
        Self::new(2026, 1, 1)
    }

    pub fn advance_days(&mut self, days: u64) {
        let mut remaining = days;
        while remaining > 0 {
            self.month = self.month.clamp(1, 12);
            let days_in_month = days_in_month(self.year, self.month);
            // Out-of-range days snap to the end of the month.
            self.day = self.day.min(days_in_month);
            if self.day as u64 + remaining <= days_in_month as u64 {
                self.day = (self.day as u64 + remaining) as u8;
                break;
            } else {
                remaining -= (days_in_month - self.day) as u64 + 1;
                self.day = 1;
                if self.month == 12 {
                    self.month = 1;
                    self.year += 1;
                } else {
                    self.month += 1;
                }
            }
        }
    }

    /// Moves the date forward by `weeks`, dropping any fractional day.
    pub fn advance_weeks(&mut self, weeks: f64) {
        let days = (weeks * 7.0).trunc();
        if days > 0.0 {
            self.advance_days(days as u64);
        }
    }

    pub fn week_of_month(&self) -> u8 {
        self.day.div_ceil(7)
    }

    pub fn month_abbreviation(&self) -> &'static str {
        MONTH_ABBREVIATIONS[month_index(self.month)]
    }

    /// Compact label used on history points, e.g. `Ene W1`.
    pub fn week_label(&self) -> String {
        format!("{} W{}", self.month_abbreviation(), self.week_of_month())
    }
}

impl Default for CalendarDate {
    fn default() -> Self {
        Self::from_start()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} de {} de {}",
            self.day,
            MONTH_NAMES[month_index(self.month)],
            self.year
        )
    }
}

#[inline]
fn month_index(month: u8) -> usize {
    (month.clamp(1, 12) - 1) as usize
}

#[inline]
fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

#[inline]
fn is_leap_year(year: u16) -> bool {
    (year as u32 % 4 == 0 && year as u32 % 100 != 0) || year as u32 % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_date_is_first_week_of_january() {
        let date = CalendarDate::from_start();
        assert_eq!(date.week_label(), "Ene W1");
        assert_eq!(date.to_string(), "1 de enero de 2026");
    }

    #[test]
    fn advancing_weeks_rolls_into_next_month() {
        let mut date = CalendarDate::from_start();
        date.advance_weeks(5.0);
        assert_eq!(date, CalendarDate::new(2026, 2, 5));
        assert_eq!(date.week_label(), "Feb W1");
    }

    #[test]
    fn half_week_drops_fractional_day() {
        let mut date = CalendarDate::from_start();
        date.advance_weeks(0.5);
        assert_eq!(date.day, 4);
        date.advance_weeks(0.5);
        assert_eq!(date.day, 7);
        assert_eq!(date.week_label(), "Ene W1");
    }

    #[test]
    fn february_respects_leap_years() {
        let mut date = CalendarDate::new(2028, 2, 28);
        date.advance_days(1);
        assert_eq!(date, CalendarDate::new(2028, 2, 29));
        let mut date = CalendarDate::new(2026, 2, 28);
        date.advance_days(1);
        assert_eq!(date, CalendarDate::new(2026, 3, 1));
    }

    #[test]
    fn overflowing_day_snaps_to_month_end() {
        let mut date = CalendarDate::new(2026, 2, 30);
        date.advance_days(5);
        assert_eq!(date, CalendarDate::new(2026, 3, 5));

        let mut date = CalendarDate::new(2026, 13, 40);
        date.advance_days(1);
        assert_eq!(date, CalendarDate::new(2027, 1, 1));
    }

    #[test]
    fn year_boundary_advances_year() {
        let mut date = CalendarDate::new(2026, 12, 30);
        date.advance_weeks(1.0);
        assert_eq!(date, CalendarDate::new(2027, 1, 6));
        assert_eq!(date.week_label(), "Ene W1");
    }
}

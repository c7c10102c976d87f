//! Gregorian to Solar Hijri (Shamsi) date conversion
//!
//! [`ShamsiDate`] is the converted calendar date and knows how to render
//! itself through a small format template. [`to_shamsi_string`] is the full
//! converter used by the front matter transform: convert, render, then
//! localize the digits.

use crate::core::digits::persianize_numbers;
use chrono::{Datelike, NaiveDate, Weekday};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

/// Template used when the site does not configure one.
pub const DEFAULT_DATE_FORMAT: &str = "dd MM yyyy";

/// Month names, Farvardin first.
pub const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Weekday names, Saturday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "شنبه",
    "یکشنبه",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنجشنبه",
    "جمعه",
];

// Cumulative day count before each Gregorian month in a common year.
const GREGORIAN_MONTH_OFFSETS: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

// Days in one 33-year Shamsi cycle.
const CYCLE_DAYS: i64 = 12_053;

/// A date in the Solar Hijri calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShamsiDate {
    year: i64,
    month: u32,
    day: u32,
    weekday: Weekday,
}

impl ShamsiDate {
    /// Convert a Gregorian date
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let (gy, gm, gd) = (i64::from(date.year()), date.month(), date.day());

        let gy2 = if gm > 2 { gy + 1 } else { gy };
        let mut days = 355_666 + 365 * gy + (gy2 + 3).div_euclid(4) - (gy2 + 99).div_euclid(100)
            + (gy2 + 399).div_euclid(400)
            + i64::from(gd)
            + GREGORIAN_MONTH_OFFSETS[gm as usize - 1];

        let mut year = -1595 + 33 * days.div_euclid(CYCLE_DAYS);
        days = days.rem_euclid(CYCLE_DAYS);
        year += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            year += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        // First six months have 31 days, the next five 30, Esfand 29 or 30.
        let (month, day) = if days < 186 {
            (1 + days / 31, 1 + days % 31)
        } else {
            (7 + (days - 186) / 30, 1 + (days - 186) % 30)
        };

        Self {
            year,
            month: month as u32,
            day: day as u32,
            weekday: date.weekday(),
        }
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    /// Month number, 1 (Farvardin) to 12 (Esfand)
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize - 1]
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[((self.weekday.num_days_from_sunday() + 1) % 7) as usize]
    }

    /// Render the date with ASCII digits.
    ///
    /// Recognised tokens are `yyyy`, `yy`, `MMM`, `MM`, `M`, `dd`, `d` and
    /// `E`; everything else in the template is copied through.
    pub fn format(&self, template: &str) -> String {
        token_pattern()
            .replace_all(template, |caps: &Captures<'_>| match &caps[0] {
                "yyyy" => format!("{:04}", self.year),
                "yy" => format!("{:02}", self.year.rem_euclid(100)),
                "MMM" => self.month_name().to_string(),
                "MM" => format!("{:02}", self.month),
                "M" => self.month.to_string(),
                "dd" => format!("{:02}", self.day),
                "d" => self.day.to_string(),
                "E" => self.weekday_name().to_string(),
                other => other.to_string(),
            })
            .into_owned()
    }
}

impl From<NaiveDate> for ShamsiDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_gregorian(date)
    }
}

impl fmt::Display for ShamsiDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Alternation is leftmost-first, so longer tokens must come first.
    PATTERN.get_or_init(|| Regex::new("yyyy|yy|MMM|MM|M|dd|d|E").expect("valid token pattern"))
}

/// Convert a Gregorian date and render it with Persian digits
pub fn to_shamsi_string(date: NaiveDate, template: &str) -> String {
    persianize_numbers(&ShamsiDate::from_gregorian(date).format(template))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_known_conversions() {
        let cases = [
            (ymd(2021, 3, 21), (1400, 1, 1)),
            (ymd(2021, 3, 20), (1399, 12, 30)),
            (ymd(2020, 3, 20), (1399, 1, 1)),
            (ymd(2024, 1, 1), (1402, 10, 11)),
            (ymd(1979, 2, 11), (1357, 11, 22)),
        ];

        for (gregorian, (y, m, d)) in cases {
            let shamsi = ShamsiDate::from_gregorian(gregorian);
            assert_eq!(
                (shamsi.year(), shamsi.month(), shamsi.day()),
                (y, m, d),
                "converting {gregorian}"
            );
        }
    }

    #[test]
    fn test_default_format() {
        assert_eq!(to_shamsi_string(ymd(2021, 3, 21), DEFAULT_DATE_FORMAT), "۰۱ ۰۱ ۱۴۰۰");
        assert_eq!(to_shamsi_string(ymd(2024, 1, 1), DEFAULT_DATE_FORMAT), "۱۱ ۱۰ ۱۴۰۲");
    }

    #[test]
    fn test_named_tokens() {
        let shamsi = ShamsiDate::from(ymd(2021, 3, 21));
        assert_eq!(shamsi.format("E d MMM yyyy"), "یکشنبه 1 فروردین 1400");
        assert_eq!(shamsi.format("yy/M/d"), "00/1/1");
        assert_eq!(shamsi.to_string(), "1400/01/01");
    }

    #[test]
    fn test_literal_text_is_localized() {
        // Digits typed into the template are localized along with the date.
        assert_eq!(to_shamsi_string(ymd(2021, 3, 21), "yyyy (v2)"), "۱۴۰۰ (v۲)");
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let date = ymd(1999, 12, 31);
        let first = to_shamsi_string(date, "E dd MMM yyyy");
        for _ in 0..10 {
            assert_eq!(to_shamsi_string(date, "E dd MMM yyyy"), first);
        }
    }

    #[test]
    fn test_consecutive_days_advance() {
        // Walk two full years and check the calendar never skips or repeats.
        let mut date = ymd(2022, 1, 1);
        let mut previous = ShamsiDate::from(date);
        for _ in 0..730 {
            date = date.succ_opt().unwrap();
            let current = ShamsiDate::from(date);
            let advanced = (current.year, current.month, current.day) > (previous.year, previous.month, previous.day);
            assert!(advanced, "{previous} -> {current}");
            assert!(current.day() == previous.day() + 1 || current.day() == 1);
            previous = current;
        }
    }

    #[test]
    fn test_extreme_dates_are_total() {
        let _ = ShamsiDate::from(NaiveDate::MIN).format(DEFAULT_DATE_FORMAT);
        let _ = ShamsiDate::from(NaiveDate::MAX).format(DEFAULT_DATE_FORMAT);
        let _ = ShamsiDate::from(ymd(1, 1, 1)).format("E MMM");
    }
}

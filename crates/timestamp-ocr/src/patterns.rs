//! Ordered catalog of date/time notations found in photo overlays
//!
//! Each entry pairs a text-matching rule with an ordered list of layout
//! templates and a named transform that reorders the captured groups into a
//! canonical parseable string. Catalog order is the priority among ambiguous
//! matches: day-month-year forms outrank the US month-first form, which in
//! turn outranks two-digit-year and localized forms. The order is fixed;
//! output reproducibility depends on it.
//!
//! Four-digit years are run through the Buddhist-era heuristic: a year more
//! than [`ERA_GUARD_YEARS`] past the current year is taken as Buddhist era
//! (543 ahead of Gregorian) and corrected.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::trace;

/// Years beyond the current year after which a 4-digit year is assumed to be
/// Buddhist era. Heuristic constant, kept as-is.
pub const ERA_GUARD_YEARS: i32 = 50;

/// Numeric offset between the Buddhist and Gregorian calendar years
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// A successfully parsed point in time and the catalog entry that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub datetime: NaiveDateTime,
    pub pattern: &'static str,
}

/// One entry of the notation catalog
pub struct DateTimePattern {
    name: &'static str,
    regex: Regex,
    layouts: &'static [&'static str],
    transform: fn(&Captures, NaiveDate) -> Option<String>,
}

impl DateTimePattern {
    /// Stable identifier used in logs and listings
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The text-matching rule
    pub fn matching_rule(&self) -> &str {
        self.regex.as_str()
    }

    /// The layout templates tried, in order, against the transformed text
    pub fn layouts(&self) -> &'static [&'static str] {
        self.layouts
    }

    /// Try this entry against raw recognized text.
    ///
    /// On a regex match the transform produces a canonical string, and the
    /// first layout template that parses it yields the Candidate; no further
    /// templates are tried after one succeeds.
    pub fn evaluate(&self, text: &str, today: NaiveDate) -> Option<Candidate> {
        let caps = self.regex.captures(text)?;
        let canonical = (self.transform)(&caps, today)?;
        let datetime = self
            .layouts
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(&canonical, layout).ok())?;
        trace!(pattern = self.name, %canonical, "pattern matched");
        Some(Candidate {
            datetime,
            pattern: self.name,
        })
    }
}

/// Convert a possibly Buddhist-era 4-digit year to Gregorian.
///
/// Subtracts 543 if and only if the year is strictly greater than the
/// current year plus [`ERA_GUARD_YEARS`]; anything else passes through, so
/// the correction is idempotent.
pub fn era_correct_year(year: i32, today: NaiveDate) -> i32 {
    if year > today.year() + ERA_GUARD_YEARS {
        year - BUDDHIST_ERA_OFFSET
    } else {
        year
    }
}

// --- transforms -----------------------------------------------------------
//
// Every transform is a pure function of (captures, today) returning the
// canonical string handed to the layout templates, or None when a captured
// field cannot be interpreted (the matcher then moves to the next entry).

/// `DD<s1>MM<s2>YYYY`, `HH:MM[:SS]` → `YYYY<s1>MM<s2>DD HH:MM[:SS]`,
/// era-correcting the year. Separators are kept as captured.
fn reorder_day_month_year(caps: &Captures, today: NaiveDate) -> Option<String> {
    let date = caps.get(1)?.as_str();
    let time = caps.get(2)?.as_str();
    canonical_from_day_first(date, time, today)
}

/// `HH:MM:SS`, `DD<s1>MM<s2>YYYY` → same canonical form as
/// [`reorder_day_month_year`], with the group roles swapped.
fn reorder_time_date(caps: &Captures, today: NaiveDate) -> Option<String> {
    let time = caps.get(1)?.as_str();
    let date = caps.get(2)?.as_str();
    canonical_from_day_first(date, time, today)
}

fn canonical_from_day_first(date: &str, time: &str, today: NaiveDate) -> Option<String> {
    // Fixed widths: DD at 0..2, separators+MM at 2..6, YYYY at 6..10
    let year: i32 = date.get(6..10)?.parse().ok()?;
    Some(format!(
        "{}{}{} {}",
        era_correct_year(year, today),
        date.get(2..6)?,
        date.get(0..2)?,
        time
    ))
}

/// `YYYY<s>MM<s>DD`, time → unchanged order, era-corrected year
fn correct_year_first(caps: &Captures, today: NaiveDate) -> Option<String> {
    let date = caps.get(1)?.as_str();
    let time = caps.get(2)?.as_str();
    let year: i32 = date.get(0..4)?.parse().ok()?;
    Some(format!(
        "{}{} {}",
        era_correct_year(year, today),
        date.get(4..)?,
        time
    ))
}

/// `MM/DD/YYYY`, time → unchanged order, era-corrected year
fn correct_month_day_year(caps: &Captures, today: NaiveDate) -> Option<String> {
    let date = caps.get(1)?.as_str();
    let time = caps.get(2)?.as_str();
    let year: i32 = date.get(6..10)?.parse().ok()?;
    Some(format!(
        "{}{} {}",
        date.get(0..6)?,
        era_correct_year(year, today),
        time
    ))
}

/// Two-digit-year forms: no era information to correct, just join the groups
fn join_date_time(caps: &Captures, _today: NaiveDate) -> Option<String> {
    Some(format!("{} {}", caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Single-group forms whose capture is already canonical
fn passthrough(caps: &Captures, _today: NaiveDate) -> Option<String> {
    Some(caps.get(1)?.as_str().to_string())
}

/// `D Mon YYYY HH:MM:SS` → same shape, single-spaced, era-corrected year
fn correct_named_month(caps: &Captures, today: NaiveDate) -> Option<String> {
    let tokens: Vec<&str> = caps.get(1)?.as_str().split_whitespace().collect();
    let [day, month, year, time] = tokens.as_slice() else {
        return None;
    };
    let year: i32 = year.parse().ok()?;
    Some(format!(
        "{day} {month} {} {time}",
        era_correct_year(year, today)
    ))
}

/// `YYYY-MM-DDTHH:MM:SS` → same shape, era-corrected year
fn correct_iso(caps: &Captures, today: NaiveDate) -> Option<String> {
    let text = caps.get(1)?.as_str();
    let year: i32 = text.get(0..4)?.parse().ok()?;
    Some(format!("{}{}", era_correct_year(year, today), text.get(4..)?))
}

/// `D <thai-month-abbr> YYYY HH:MM:SS` → `D Mon YYYY HH:MM:SS` with the
/// month token translated and the Buddhist-era year corrected
fn thai_month_to_gregorian(caps: &Captures, today: NaiveDate) -> Option<String> {
    let day = caps.get(1)?.as_str();
    let month = thai_month_abbr(caps.get(2)?.as_str())?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;
    let time = caps.get(4)?.as_str();
    Some(format!(
        "{day} {month} {} {time}",
        era_correct_year(year, today)
    ))
}

/// `D/M/YY(YY) เวลา H:MM[:SS] น.` → `D/M/Y H:MM[:SS]`, era-correcting a
/// 4-digit trailing year; the variable-width fields are split, not sliced.
fn thai_long_form(caps: &Captures, today: NaiveDate) -> Option<String> {
    let date = caps.get(1)?.as_str();
    let time = caps.get(2)?.as_str();
    let parts: Vec<&str> = date.split(['-', '.', '/']).collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };
    let year = if year.len() == 4 {
        let value: i32 = year.parse().ok()?;
        era_correct_year(value, today).to_string()
    } else {
        (*year).to_string()
    };
    Some(format!("{day}/{month}/{year} {time}"))
}

/// English month abbreviation for a Thai month abbreviation token
fn thai_month_abbr(token: &str) -> Option<&'static str> {
    Some(match token {
        "ม.ค." => "Jan",
        "ก.พ." => "Feb",
        "มี.ค." => "Mar",
        "เม.ย." => "Apr",
        "พ.ค." => "May",
        "มิ.ย." => "Jun",
        "ก.ค." => "Jul",
        "ส.ค." => "Aug",
        "ก.ย." => "Sep",
        "ต.ค." => "Oct",
        "พ.ย." => "Nov",
        "ธ.ค." => "Dec",
        _ => return None,
    })
}

// --- catalog --------------------------------------------------------------

fn pattern(
    name: &'static str,
    rule: &str,
    layouts: &'static [&'static str],
    transform: fn(&Captures, NaiveDate) -> Option<String>,
) -> DateTimePattern {
    DateTimePattern {
        name,
        regex: Regex::new(rule).expect("catalog regex must compile"),
        layouts,
        transform,
    }
}

static CATALOG: LazyLock<Vec<DateTimePattern>> = LazyLock::new(|| {
    vec![
        pattern(
            "day-month-year-seconds",
            r"(\d{2}[-./]\d{2}[-./]\d{4})\s+(\d{2}:\d{2}:\d{2})",
            &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y.%m.%d %H:%M:%S"],
            reorder_day_month_year,
        ),
        pattern(
            "day-month-year-minutes",
            r"(\d{2}[-./]\d{2}[-./]\d{4})\s+(\d{2}:\d{2})",
            &["%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M", "%Y.%m.%d %H:%M"],
            reorder_day_month_year,
        ),
        pattern(
            "year-first-seconds",
            r"(\d{4}[-./]\d{2}[-./]\d{2})\s+(\d{2}:\d{2}:\d{2})",
            &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y.%m.%d %H:%M:%S"],
            correct_year_first,
        ),
        pattern(
            "year-first-minutes",
            r"(\d{4}[-./]\d{2}[-./]\d{2})\s+(\d{2}:\d{2})",
            &["%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M", "%Y.%m.%d %H:%M"],
            correct_year_first,
        ),
        pattern(
            "month-day-year-us",
            r"(\d{2}/\d{2}/\d{4})\s+(\d{2}:\d{2}:\d{2})",
            &["%m/%d/%Y %H:%M:%S"],
            correct_month_day_year,
        ),
        pattern(
            "day-month-shortyear-seconds",
            r"(\d{2}[-./]\d{2}[-./]\d{2})\s+(\d{2}:\d{2}:\d{2})",
            &["%d-%m-%y %H:%M:%S", "%d/%m/%y %H:%M:%S", "%d.%m.%y %H:%M:%S"],
            join_date_time,
        ),
        pattern(
            "day-month-shortyear-minutes",
            r"(\d{2}[-./]\d{2}[-./]\d{2})\s+(\d{2}:\d{2})",
            &["%d-%m-%y %H:%M", "%d/%m/%y %H:%M", "%d.%m.%y %H:%M"],
            join_date_time,
        ),
        pattern(
            "time-before-date",
            r"(\d{2}:\d{2}:\d{2})\s+(\d{2}[-./]\d{2}[-./]\d{4})",
            &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y.%m.%d %H:%M:%S"],
            reorder_time_date,
        ),
        pattern(
            "named-month",
            r"(\d{1,2}\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{4}\s+\d{2}:\d{2}:\d{2})",
            &["%d %b %Y %H:%M:%S"],
            correct_named_month,
        ),
        pattern(
            "twelve-hour",
            r"(\d{2}[-./]\d{2}[-./]\d{2}\s+\d{1,2}:\d{2}(?::\d{2})?\s*[AP]M)",
            &[
                "%d/%m/%y %I:%M %p",
                "%d/%m/%y %I:%M:%S %p",
                "%d-%m-%y %I:%M %p",
                "%d-%m-%y %I:%M:%S %p",
            ],
            passthrough,
        ),
        pattern(
            "iso-8601",
            r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})",
            &["%Y-%m-%dT%H:%M:%S"],
            correct_iso,
        ),
        pattern(
            "thai-buddhist-month",
            r"(\d{1,2})\s+(ม\.ค\.|ก\.พ\.|มี\.ค\.|เม\.ย\.|พ\.ค\.|มิ\.ย\.|ก\.ค\.|ส\.ค\.|ก\.ย\.|ต\.ค\.|พ\.ย\.|ธ\.ค\.)\s+(\d{4})\s+(\d{2}:\d{2}:\d{2})",
            &["%d %b %Y %H:%M:%S"],
            thai_month_to_gregorian,
        ),
        pattern(
            "thai-long-form",
            r"(\d{1,2}[-./]\d{1,2}[-./]\d{2,4})\s+เวลา\s+(\d{1,2}:\d{2}(?::\d{2})?)\s*น\.",
            &[
                "%d/%m/%y %H:%M:%S",
                "%d/%m/%y %H:%M",
                "%d/%m/%Y %H:%M:%S",
                "%d/%m/%Y %H:%M",
            ],
            thai_long_form,
        ),
    ]
});

/// The fixed, ordered notation catalog.
pub fn catalog() -> &'static [DateTimePattern] {
    &CATALOG
}

/// Lazily yield Candidates for `text` in catalog priority order.
///
/// Each catalog entry contributes at most one Candidate (its first parsing
/// layout); entries that fail to match or parse are skipped. Callers apply
/// their acceptance predicate and stop at the first hit.
pub fn candidates<'a>(
    text: &'a str,
    today: NaiveDate,
) -> impl Iterator<Item = Candidate> + 'a {
    catalog()
        .iter()
        .filter_map(move |pattern| pattern.evaluate(text, today))
}

/// First Candidate for `text` in catalog priority order, if any.
pub fn match_text(text: &str, today: NaiveDate) -> Option<Candidate> {
    candidates(text, today).next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate};

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_era_correction_leaves_recent_years_alone() {
        let today = today();
        assert_eq!(era_correct_year(2024, today), 2024);
        assert_eq!(era_correct_year(today.year(), today), today.year());
        // Exactly at the guard boundary: not corrected
        assert_eq!(
            era_correct_year(today.year() + ERA_GUARD_YEARS, today),
            today.year() + ERA_GUARD_YEARS
        );
    }

    #[test]
    fn test_era_correction_applies_past_the_guard() {
        let today = today();
        let buddhist = today.year() + ERA_GUARD_YEARS + 1;
        assert_eq!(era_correct_year(buddhist, today), buddhist - BUDDHIST_ERA_OFFSET);
        assert_eq!(era_correct_year(2567, today), 2024);
    }

    #[test]
    fn test_era_correction_is_idempotent() {
        let today = today();
        let once = era_correct_year(2567, today);
        assert_eq!(era_correct_year(once, today), once);
    }

    #[test]
    fn test_day_month_year_with_seconds() {
        let c = match_text("15-03-2024 14:30:00", today()).unwrap();
        assert_eq!(c.pattern, "day-month-year-seconds");
        assert_eq!(c.datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_day_month_year_alternate_separators() {
        let slash = match_text("15/03/2024 14:30:00", today()).unwrap();
        assert_eq!(slash.datetime, dt(2024, 3, 15, 14, 30, 0));
        let dot = match_text("15.03.2024 14:30:00", today()).unwrap();
        assert_eq!(dot.datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_day_month_year_minutes_only() {
        let c = match_text("01-12-2023 08:05", today()).unwrap();
        assert_eq!(c.pattern, "day-month-year-minutes");
        assert_eq!(c.datetime, dt(2023, 12, 1, 8, 5, 0));
    }

    #[test]
    fn test_day_month_year_buddhist_era() {
        let c = match_text("20-05-2567 09:15:00", today()).unwrap();
        assert_eq!(c.datetime, dt(2024, 5, 20, 9, 15, 0));
    }

    #[test]
    fn test_year_first_with_seconds() {
        let c = match_text("2024-03-15 14:30:00", today()).unwrap();
        assert_eq!(c.pattern, "year-first-seconds");
        assert_eq!(c.datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_year_first_buddhist_era_minutes() {
        // Spec scenario: 2567 exceeds current_year + 50, so it is corrected
        let c = match_text("2567-05-20 09:15", today()).unwrap();
        assert_eq!(c.pattern, "year-first-minutes");
        assert_eq!(c.datetime, dt(2024, 5, 20, 9, 15, 0));
    }

    #[test]
    fn test_us_month_first_when_day_exceeds_twelve() {
        // 03/15 cannot be day-month, so the day-month entries fail to parse
        // and the US entry takes it
        let c = match_text("03/15/2024 14:30:00", today()).unwrap();
        assert_eq!(c.pattern, "month-day-year-us");
        assert_eq!(c.datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_ambiguous_day_month_prefers_day_first() {
        // Both readings are valid; catalog order decides
        let c = match_text("03/09/2024 14:30:00", today()).unwrap();
        assert_eq!(c.pattern, "day-month-year-seconds");
        assert_eq!(c.datetime, dt(2024, 9, 3, 14, 30, 0));
    }

    #[test]
    fn test_two_digit_year_forms() {
        let sec = match_text("15-03-24 14:30:00", today()).unwrap();
        assert_eq!(sec.pattern, "day-month-shortyear-seconds");
        assert_eq!(sec.datetime, dt(2024, 3, 15, 14, 30, 0));

        let min = match_text("15.03.24 14:30", today()).unwrap();
        assert_eq!(min.pattern, "day-month-shortyear-minutes");
        assert_eq!(min.datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_time_before_date() {
        let c = match_text("14:30:00 15-03-2024", today()).unwrap();
        assert_eq!(c.pattern, "time-before-date");
        assert_eq!(c.datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_time_before_date_buddhist_era() {
        let c = match_text("14:30:00 15/03/2567", today()).unwrap();
        assert_eq!(c.datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_named_month() {
        let c = match_text("5 Mar 2024 07:45:12", today()).unwrap();
        assert_eq!(c.pattern, "named-month");
        assert_eq!(c.datetime, dt(2024, 3, 5, 7, 45, 12));
    }

    #[test]
    fn test_named_month_buddhist_era() {
        let c = match_text("15 May 2567 10:00:00", today()).unwrap();
        assert_eq!(c.datetime, dt(2024, 5, 15, 10, 0, 0));
    }

    #[test]
    fn test_twelve_hour_pm() {
        // A one-digit hour keeps the two-digit-year entries from matching
        let c = match_text("15-03-24 2:30 PM", today()).unwrap();
        assert_eq!(c.pattern, "twelve-hour");
        assert_eq!(c.datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_twelve_hour_am_with_seconds() {
        let c = match_text("15-03-24 2:30:45 AM", today()).unwrap();
        assert_eq!(c.datetime, dt(2024, 3, 15, 2, 30, 45));
    }

    #[test]
    fn test_iso_8601() {
        let c = match_text("2024-03-15T14:30:00", today()).unwrap();
        assert_eq!(c.pattern, "iso-8601");
        assert_eq!(c.datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_iso_8601_buddhist_era() {
        let c = match_text("2567-05-20T09:15:00", today()).unwrap();
        assert_eq!(c.datetime, dt(2024, 5, 20, 9, 15, 0));
    }

    #[test]
    fn test_thai_buddhist_month() {
        let c = match_text("20 พ.ค. 2567 09:15:30", today()).unwrap();
        assert_eq!(c.pattern, "thai-buddhist-month");
        assert_eq!(c.datetime, dt(2024, 5, 20, 9, 15, 30));
    }

    #[test]
    fn test_thai_month_inventory() {
        let months = [
            ("ม.ค.", 1),
            ("ก.พ.", 2),
            ("มี.ค.", 3),
            ("เม.ย.", 4),
            ("พ.ค.", 5),
            ("มิ.ย.", 6),
            ("ก.ค.", 7),
            ("ส.ค.", 8),
            ("ก.ย.", 9),
            ("ต.ค.", 10),
            ("พ.ย.", 11),
            ("ธ.ค.", 12),
        ];
        for (token, month) in months {
            let text = format!("7 {token} 2567 08:00:00");
            let c = match_text(&text, today()).unwrap_or_else(|| panic!("no match for {token}"));
            assert_eq!(c.datetime, dt(2024, month, 7, 8, 0, 0), "month {token}");
        }
    }

    #[test]
    fn test_thai_long_form() {
        let c = match_text("15/3/2567 เวลา 14:30 น.", today()).unwrap();
        assert_eq!(c.pattern, "thai-long-form");
        assert_eq!(c.datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_thai_long_form_with_seconds_and_short_year() {
        let c = match_text("5-3-24 เวลา 9:05:30 น.", today()).unwrap();
        assert_eq!(c.datetime, dt(2024, 3, 5, 9, 5, 30));
    }

    #[test]
    fn test_no_match_yields_none() {
        assert!(match_text("no dates here", today()).is_none());
        assert!(match_text("1234567890", today()).is_none());
        assert!(match_text("", today()).is_none());
    }

    #[test]
    fn test_matcher_is_deterministic() {
        let today = today();
        let first = match_text("15-03-2024 14:30:00", today).unwrap();
        for _ in 0..10 {
            let again = match_text("15-03-2024 14:30:00", today).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_candidates_follow_catalog_order() {
        // Text embedding two notations: the earlier catalog entry wins
        let today = today();
        let text = "2024-03-15 14:30:00 and also 2024-03-15T16:00:00";
        let all: Vec<Candidate> = candidates(text, today).collect();
        assert!(all.len() >= 2);
        assert_eq!(all[0].pattern, "year-first-seconds");
        assert_eq!(all[0].datetime, dt(2024, 3, 15, 14, 30, 0));
    }

    #[test]
    fn test_round_trips_through_accepted_layouts() {
        let today = today();
        let known = dt(2024, 3, 15, 14, 30, 45);

        // (formatting layout, expected winning pattern) pairs chosen to be
        // unambiguous under catalog priority; the 12-hour entry is exempt
        // because any zero-padded hour re-enters via the two-digit-year form.
        let cases: &[(&str, &str)] = &[
            ("%Y-%m-%d %H:%M:%S", "year-first-seconds"),
            ("%Y/%m/%d %H:%M:%S", "year-first-seconds"),
            ("%Y.%m.%d %H:%M:%S", "year-first-seconds"),
            ("%d-%m-%Y %H:%M:%S", "day-month-year-seconds"),
            ("%d/%m/%Y %H:%M:%S", "day-month-year-seconds"),
            ("%d.%m.%Y %H:%M:%S", "day-month-year-seconds"),
            ("%m/%d/%Y %H:%M:%S", "month-day-year-us"),
            ("%d-%m-%y %H:%M:%S", "day-month-shortyear-seconds"),
            ("%H:%M:%S %d-%m-%Y", "time-before-date"),
            ("%d %b %Y %H:%M:%S", "named-month"),
            ("%Y-%m-%dT%H:%M:%S", "iso-8601"),
        ];

        for (layout, expected_pattern) in cases {
            let text = known.format(layout).to_string();
            let c = match_text(&text, today)
                .unwrap_or_else(|| panic!("no candidate for '{text}' ({layout})"));
            assert_eq!(c.pattern, *expected_pattern, "text '{text}'");
            assert_eq!(c.datetime, known, "text '{text}'");
        }
    }

    #[test]
    fn test_catalog_has_thirteen_entries_in_fixed_order() {
        let names: Vec<&str> = catalog().iter().map(DateTimePattern::name).collect();
        assert_eq!(
            names,
            [
                "day-month-year-seconds",
                "day-month-year-minutes",
                "year-first-seconds",
                "year-first-minutes",
                "month-day-year-us",
                "day-month-shortyear-seconds",
                "day-month-shortyear-minutes",
                "time-before-date",
                "named-month",
                "twelve-hour",
                "iso-8601",
                "thai-buddhist-month",
                "thai-long-form",
            ]
        );
    }
}

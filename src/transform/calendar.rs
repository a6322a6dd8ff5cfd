//! Thai month columns and Buddhist-era report years

use chrono::{Datelike, Local, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Thai abbreviated month names in calendar order
pub const THAI_MONTHS: [(&str, u32); 12] = [
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

/// Years between the Buddhist era and the Gregorian calendar
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

const YEAR_SHEET_PREFIX: &str = "data_";

pub fn amount_column(month_name: &str) -> String {
    format!("baht {month_name}")
}

pub fn quantity_column(month_name: &str) -> String {
    format!("unit {month_name}")
}

fn leading_integer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").expect("static regex"))
}

/// Gregorian report year for a sheet
///
/// `data_<BE year>` sheets map to `BE - 543`. Any other name, a suffix
/// without leading digits, or a result of 0 (or one outside `i32`) falls
/// back to `fallback_year`.
pub fn report_year(sheet_name: &str, fallback_year: i32) -> i32 {
    if !sheet_name.to_lowercase().starts_with(YEAR_SHEET_PREFIX) {
        return fallback_year;
    }

    let suffix = sheet_name.rsplit('_').next().unwrap_or_default();
    let parsed = leading_integer()
        .captures(suffix)
        .and_then(|caps| caps[1].parse::<i32>().ok());

    match parsed {
        Some(be_year) => match be_year.checked_sub(BUDDHIST_ERA_OFFSET) {
            Some(year) if year != 0 => year,
            _ => fallback_year,
        },
        None => {
            warn!(sheet = %sheet_name, "could not parse year from sheet name");
            fallback_year
        }
    }
}

/// Local calendar year, used when a sheet carries no year
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Today's date in UTC, used for output file name stamps
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// `YYYYMMDD` stamp for output file names
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

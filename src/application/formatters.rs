//! Display formatting for values coming back from the API.
//!
//! Missing or unparsable inputs render as [`EMPTY`] instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use strum::{AsRefStr, Display, EnumString};

use crate::application::validators::digits;

pub const EMPTY: &str = "-";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Locale {
    #[default]
    #[strum(to_string = "pt-BR", serialize = "pt_BR", serialize = "pt")]
    PtBr,
    #[strum(to_string = "en-US", serialize = "en_US", serialize = "en")]
    EnUs,
}

impl Locale {
    fn date_pattern(&self) -> &'static str {
        match self {
            Locale::PtBr => "%d/%m/%Y",
            Locale::EnUs => "%m/%d/%Y",
        }
    }

    fn datetime_pattern(&self) -> &'static str {
        match self {
            Locale::PtBr => "%d/%m/%Y %H:%M",
            Locale::EnUs => "%m/%d/%Y %I:%M %p",
        }
    }

    fn separators(&self) -> (char, char) {
        match self {
            Locale::PtBr => ('.', ','),
            Locale::EnUs => (',', '.'),
        }
    }
}

/// Parse the date shapes the API emits: RFC 3339 timestamps, naive
/// `YYYY-MM-DDTHH:MM:SS` and bare `YYYY-MM-DD` dates.
///
/// Timestamps keep the wall-clock time of the offset they were sent with.
pub fn parse_api_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn format_date(value: Option<&str>, locale: Locale) -> String {
    value
        .and_then(parse_api_date)
        .map(|dt| dt.format(locale.date_pattern()).to_string())
        .unwrap_or_else(|| EMPTY.to_string())
}

pub fn format_datetime(value: Option<&str>, locale: Locale) -> String {
    value
        .and_then(parse_api_date)
        .map(|dt| dt.format(locale.datetime_pattern()).to_string())
        .unwrap_or_else(|| EMPTY.to_string())
}

/// Brazilian real, rounded to cents: `R$ 1.234,56` (pt-BR) or `R$1,234.56` (en-US).
pub fn format_currency(amount: Option<f64>, locale: Locale) -> String {
    let Some(amount) = amount.filter(|a| a.is_finite()) else {
        return EMPTY.to_string();
    };

    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let (group, decimal) = locale.separators();
    let whole = group_thousands(cents / 100, group);
    let fraction = cents % 100;

    match locale {
        Locale::PtBr => format!("{sign}R$ {whole}{decimal}{fraction:02}"),
        Locale::EnUs => format!("{sign}R${whole}{decimal}{fraction:02}"),
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// `(11) 98765-4321` for mobiles, `(11) 3333-4444` for landlines.
/// Anything else is shown as typed.
pub fn format_phone(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return EMPTY.to_string();
    };
    let d = digits(value);
    match d.len() {
        11 => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
        10 => format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..]),
        _ => value.to_string(),
    }
}

/// CPF `000.000.000-00` or CNPJ `00.000.000/0000-00`, chosen by digit count.
pub fn format_document(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return EMPTY.to_string();
    };
    let d = digits(value);
    match d.len() {
        11 => format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &d[..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..]
        ),
        _ => value.to_string(),
    }
}

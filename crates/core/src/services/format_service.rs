use chrono::{Datelike, NaiveDate};

/// Abbreviate a magnitude: `1234` → `1.2K`, `5_600_000` → `5.6M`, `7e9` → `7B`.
///
/// Values up to 999 are printed as-is. Trailing zeros after rounding are
/// dropped (`1500` with two decimals is `1.5K`).
pub fn amount_format(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    let (scaled, suffix) = if abs > 999_999_999.0 {
        (abs / 1e9, "B")
    } else if abs > 999_999.0 {
        (abs / 1e6, "M")
    } else if abs > 999.0 {
        (abs / 1e3, "K")
    } else {
        (abs, "")
    };
    let rounded = trim_zeros(&format!("{scaled:.decimals$}"));
    if rounded == "0" {
        return rounded;
    }
    format!("{sign}{rounded}{suffix}")
}

/// US-dollar currency string with thousands separators: `$1,234,567.89`.
pub fn usd_format(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u128;
    let dollars = group_thousands(&(cents / 100).to_string());
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${dollars}.{:02}", cents % 100)
}

/// Compact month label for bar axes: 2021-09-13 → `9/21`.
pub fn month_label(date: NaiveDate) -> String {
    format!("{}/{:02}", date.month(), date.year().rem_euclid(100))
}

/// Line-chart x-axis tick: `MM/DD` on the first day of a month, empty otherwise.
pub fn axis_date_label(date: &str) -> String {
    let mut parts = date.splitn(3, '-');
    let (_, month, day) = (parts.next(), parts.next(), parts.next());
    match (month, day) {
        (Some(m), Some(d)) if d.parse::<u32>().ok() == Some(1) => format!("{m}/{d}"),
        _ => String::new(),
    }
}

/// Label of the most recent (partial) week: `"52 - 4 days"`, where `days`
/// counts the elapsed days of the week including today.
pub fn partial_week_label(label: &str, days: u32) -> String {
    format!("{label} - {days} days")
}

/// Label of the most recent (partial) month: `"10/21 (4 days)"`.
pub fn partial_month_label(label: &str, today: NaiveDate) -> String {
    format!("{label} ({} days)", today.day())
}

fn trim_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

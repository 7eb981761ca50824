use chrono::{Datelike, NaiveDate};

/// Display value standing in for "no date, task is completed".
pub const COMPLETED: &str = "Concluída";
/// Display label for the current day.
pub const TODAY: &str = "Hoje";
/// Marker recognized by the overdue heuristic.
pub const YESTERDAY: &str = "Ontem";
/// Display value for tasks without any scheduling information.
pub const NO_DATE: &str = "Sem data definida";

/// Abbreviated month names, Brazilian Portuguese convention.
const MONTHS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Formats a (date, time) pair for display, relative to `today`.
///
/// - Neither given: `"Sem data definida"`.
/// - Date resolving to `today`: `"Hoje"`, or `"Hoje, 10:00"` with a time.
/// - Anything else: `"25 dez"`, optionally suffixed with `", 10:00"`.
///
/// `today` is injected rather than read from the clock so callers and tests
/// get deterministic output. A missing date with a given time resolves to
/// today.
pub fn format_task_date(date: Option<NaiveDate>, time: Option<&str>, today: NaiveDate) -> String {
    if date.is_none() && time.is_none() {
        return NO_DATE.to_string();
    }
    let target = date.unwrap_or(today);
    if target == today {
        return match time {
            Some(t) => format!("{}, {}", TODAY, t),
            None => TODAY.to_string(),
        };
    }
    let formatted = format!("{} {}", target.day(), MONTHS[target.month0() as usize]);
    match time {
        Some(t) => format!("{}, {}", formatted, t),
        None => formatted,
    }
}

/// Identity of a calendar day, used only for equality comparison when gating
/// the once-per-day reset.
pub fn day_identity(date: NaiveDate) -> String {
    date.to_string()
}

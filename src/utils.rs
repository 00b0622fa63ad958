use chrono::{ Datelike, Months, NaiveDateTime, Utc };

const JUST_NOW: &str = "just now";

/// Source of "now" for relative phrases, as a naive UTC datetime.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Difference between two datetimes split into calendar units. Months and
/// years follow the calendar (Jan 31 + 1 month is Feb 29 in a leap year), so
/// this is not a fixed-length division. All fields share one sign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalendarDelta {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CalendarDelta {
    /// `now - then`; positive when `then` is in the past.
    ///
    /// Returns `None` only if stepping months leaves chrono's date range.
    pub fn between(now: NaiveDateTime, then: NaiveDateTime) -> Option<Self> {
        let mut months = i64::from(now.year() - then.year()) * 12
            + i64::from(now.month())
            - i64::from(then.month());

        // Walk the month count back toward `then` until the anchor no longer
        // overshoots `now`.
        let step = if now < then { 1 } else { -1 };
        let mut anchor = shift_months(then, months)?;
        while (step < 0 && now < anchor) || (step > 0 && now > anchor) {
            months += step;
            anchor = shift_months(then, months)?;
        }

        let rest = now - anchor;
        let mut seconds = rest.num_seconds();
        if rest.subsec_nanos() < 0 {
            seconds -= 1;
        }

        Some(Self {
            years: months / 12,
            months: months % 12,
            days: seconds / 86_400,
            hours: seconds / 3_600 % 24,
            minutes: seconds / 60 % 60,
            seconds: seconds % 60,
        })
    }

    /// Largest non-zero unit, years first.
    pub fn largest_unit(&self) -> Option<(i64, &'static str)> {
        [
            (self.years, "years"),
            (self.months, "months"),
            (self.days, "days"),
            (self.hours, "hours"),
            (self.minutes, "minutes"),
            (self.seconds, "seconds"),
        ]
        .into_iter()
        .find(|(value, _)| *value != 0)
    }
}

fn shift_months(base: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        base.checked_add_months(count)
    } else {
        base.checked_sub_months(count)
    }
}

/// Renders `then` relative to `now`: "3 months ago", "yesterday", "in 2 hours",
/// "just now".
pub fn humanize_at(then: NaiveDateTime, now: NaiveDateTime) -> String {
    CalendarDelta::between(now, then)
        .and_then(|delta| delta.largest_unit())
        .map(|(value, unit)| phrase(value, unit))
        .unwrap_or_else(|| JUST_NOW.to_string())
}

fn phrase(value: i64, unit: &str) -> String {
    if unit == "seconds" && value.abs() < 10 {
        return JUST_NOW.to_string();
    }
    if unit == "days" && value == 1 {
        return "yesterday".to_string();
    }
    if unit == "days" && value == -1 {
        return "tomorrow".to_string();
    }

    let unit = if value.abs() > 1 { unit } else { unit.strip_suffix('s').unwrap_or(unit) };
    if value > 0 {
        format!("{} {} ago", value, unit)
    } else {
        format!("in {} {}", value.abs(), unit)
    }
}

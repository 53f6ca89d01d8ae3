use chrono::{Datelike, NaiveDate};

/// Youngest reportable age in months; a just-born evaluee still needs a
/// positive quotient divisor.
pub const MIN_MONTH_AGE: f64 = 0.1;

/// Chronological age in fractional months between two calendar dates.
///
/// Whole years and months are counted on the calendar. A day-of-month
/// shortfall borrows one month and adds the day count of the calendar month
/// preceding the reference month; the day remainder converts at 30 days per
/// month. The result is rounded to one decimal and never drops below
/// [`MIN_MONTH_AGE`], including when `reference_date` precedes `birth_date`.
pub fn chronological_age_months(birth_date: NaiveDate, reference_date: NaiveDate) -> f64 {
    let mut years = reference_date.year() - birth_date.year();
    let mut months = reference_date.month() as i32 - birth_date.month() as i32;
    let mut days = reference_date.day() as i32 - birth_date.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_preceding_month(reference_date) as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    let total = f64::from(years) * 12.0 + f64::from(months) + f64::from(days) / 30.0;
    round_to_tenth(total.max(MIN_MONTH_AGE))
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn days_in_preceding_month(reference: NaiveDate) -> i64 {
    let (year, month) = if reference.month() == 1 {
        (reference.year() - 1, 12)
    } else {
        (reference.year(), reference.month() - 1)
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is a valid date");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("first of month is a valid date");
    (next - first).num_days()
}

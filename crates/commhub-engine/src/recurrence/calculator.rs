//! Pure next-occurrence computation for recurring notifications.

use chrono::{DateTime, Datelike, Days, Months, Utc, Weekday};

use commhub_entity::notification::recurrence::{RecurrenceRule, RepeatFrequency, RepeatPolicy};

/// Compute the next occurrence after `prior`, or `None` when the
/// recurrence terminates.
///
/// Termination covers three cases: the candidate falls past the rule's
/// end date; the rule cannot produce a candidate at all (empty or
/// non-matching weekday selection, missing custom frequency); or the
/// candidate fails to advance past `prior` (degenerate intervals such as
/// `repeat_for = 0`). The last guard is what bounds every recurrence to a
/// finite number of occurrences regardless of input.
pub fn next_occurrence(rule: &RecurrenceRule, prior: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let candidate = match rule.policy {
        RepeatPolicy::EveryWeekday => next_weekday(prior)?,
        RepeatPolicy::Daily => prior.checked_add_days(Days::new(1))?,
        RepeatPolicy::Weekly => prior.checked_add_days(Days::new(7))?,
        RepeatPolicy::Monthly => prior.checked_add_months(Months::new(1))?,
        RepeatPolicy::Yearly => prior.checked_add_months(Months::new(12))?,
        RepeatPolicy::Custom => custom_occurrence(rule, prior)?,
    };

    if candidate <= prior || candidate > rule.end_date {
        return None;
    }
    Some(candidate)
}

/// Next day, skipping over the weekend: a Saturday result moves to
/// Monday (+2), a Sunday result to Monday (+1). Prior dates are assumed
/// to be weekdays themselves.
fn next_weekday(prior: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let candidate = prior.checked_add_days(Days::new(1))?;
    match candidate.weekday() {
        Weekday::Sat => candidate.checked_add_days(Days::new(2)),
        Weekday::Sun => candidate.checked_add_days(Days::new(1)),
        _ => Some(candidate),
    }
}

fn custom_occurrence(rule: &RecurrenceRule, prior: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match rule.frequency? {
        RepeatFrequency::Day => {
            let days = u64::try_from(rule.repeat_for).ok()?;
            prior.checked_add_days(Days::new(days))
        }
        RepeatFrequency::Month => {
            let months = u32::try_from(rule.repeat_for).ok()?;
            prior.checked_add_months(Months::new(months))
        }
        RepeatFrequency::Week => custom_week_occurrence(rule, prior),
    }
}

/// Walk the ascending weekday selection (0 = Monday .. 6 = Sunday): from a
/// selected weekday, advance to the next selected one within the same
/// week; from the last selected weekday, wrap to the first one
/// `repeat_for` weeks later.
fn custom_week_occurrence(rule: &RecurrenceRule, prior: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let selection = &rule.week_selection;
    if selection.is_empty() {
        return None;
    }

    let current = prior.weekday().num_days_from_monday() as u8;
    let position = selection.iter().position(|day| *day == current)?;

    let delta = if position + 1 < selection.len() {
        i64::from(selection[position + 1]) - i64::from(current)
    } else {
        i64::from(rule.repeat_for) * 7 - i64::from(current) - i64::from(selection[0])
    };

    if delta <= 0 {
        return None;
    }
    prior.checked_add_days(Days::new(delta as u64))
}

// In crates/indicators/src/resample.rs

use chrono::{DateTime, NaiveDate};
use core_types::PricePoint;
use rust_decimal::Decimal;

/// Minimum number of daily closes required before a weekly series exists.
pub const MIN_DAILY_POINTS: usize = 30;

/// Step between sampled daily closes when decimating to a weekly series.
const WEEK_STEP: usize = 7;

/// Collapses a raw price series into one close per UTC calendar date.
///
/// The *last* sample of each date is that day's close. The input is expected
/// to be time-ordered already; if it is not, it is sorted first, so the
/// result is always chronological.
pub fn daily_closes(series: &[PricePoint]) -> Vec<Decimal> {
    let mut points: Vec<PricePoint> = series.to_vec();
    if !points.windows(2).all(|w| w[0].close_time <= w[1].close_time) {
        points.sort_by_key(|p| p.close_time);
    }

    let mut closes: Vec<Decimal> = Vec::new();
    let mut current: Option<(NaiveDate, Decimal)> = None;
    for point in points {
        // Samples with a timestamp chrono cannot represent are dropped.
        let Some(date) = DateTime::from_timestamp_millis(point.close_time).map(|t| t.date_naive())
        else {
            continue;
        };
        match current {
            Some((day, _)) if day == date => current = Some((day, point.price)),
            Some((_, close)) => {
                closes.push(close);
                current = Some((date, point.price));
            }
            None => current = Some((date, point.price)),
        }
    }
    if let Some((_, close)) = current {
        closes.push(close);
    }
    closes
}

/// Decimates a daily close series into a weekly one.
///
/// Walks backward from the newest close in steps of 7, then reverses into
/// chronological order, giving `ceil(n / 7)` points. This deliberately does
/// NOT align to ISO week boundaries; the sampled weekday drifts as history
/// grows.
///
/// Returns `None` when fewer than [`MIN_DAILY_POINTS`] daily closes exist.
pub fn weekly_closes(daily: &[Decimal]) -> Option<Vec<Decimal>> {
    if daily.len() < MIN_DAILY_POINTS {
        return None;
    }

    let mut weekly = Vec::with_capacity(daily.len().div_ceil(WEEK_STEP));
    let mut idx = daily.len() - 1;
    loop {
        weekly.push(daily[idx]);
        if idx < WEEK_STEP {
            break;
        }
        idx -= WEEK_STEP;
    }
    weekly.reverse();
    Some(weekly)
}

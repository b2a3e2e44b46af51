use chrono::{DateTime, TimeDelta, Utc};

/// Estimate a representative step (in seconds) from positive adjacent timestamp
/// deltas in the input series.
///
/// Prefer the mode (most frequent positive delta); if there is no unique mode,
/// return the lower median.
///
/// Examples
///
/// Unique mode (60s):
///
/// ```
/// use kronos_core::estimate_step_seconds;
/// use chrono::{DateTime, Utc};
///
/// fn t(sec: i64) -> DateTime<Utc> { DateTime::from_timestamp(sec, 0).unwrap() }
///
/// // Adjacent deltas: 60,60,60,120,180  => unique mode is 60
/// let ts = [t(0), t(60), t(120), t(180), t(300), t(480)];
/// assert_eq!(estimate_step_seconds(&ts), Some(60));
/// ```
///
/// No unique mode: fall back to lower median (60s):
///
/// ```
/// use kronos_core::estimate_step_seconds;
/// use chrono::{DateTime, Utc};
///
/// fn t(sec: i64) -> DateTime<Utc> { DateTime::from_timestamp(sec, 0).unwrap() }
///
/// // Adjacent deltas: 60,60,120,120  => lower median is 60
/// let ts = [t(0), t(60), t(120), t(240), t(360)];
/// assert_eq!(estimate_step_seconds(&ts), Some(60));
/// ```
///
/// The input order does not matter; duplicates are ignored. Returns `None` if
/// fewer than two distinct timestamps are present.
#[must_use]
pub fn estimate_step_seconds(timestamps: &[DateTime<Utc>]) -> Option<i64> {
    if timestamps.len() < 2 {
        return None;
    }
    let mut ts = timestamps.to_vec();
    ts.sort_unstable();

    let mut deltas: Vec<i64> = Vec::with_capacity(ts.len().saturating_sub(1));
    let mut last = ts[0];
    for &cur in ts.iter().skip(1) {
        let dt: TimeDelta = cur - last;
        if dt > TimeDelta::zero() {
            deltas.push(dt.num_seconds());
            last = cur;
        }
    }
    // Sub-second spacing truncates to zero and carries no usable step.
    deltas.retain(|&d| d > 0);
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();

    let mut best_delta: i64 = deltas[0];
    let mut best_count: usize = 0;
    let mut num_best_candidates: usize = 0;

    let mut cur_delta: i64 = deltas[0];
    let mut cur_count: usize = 1;
    for &d in deltas.iter().skip(1) {
        if d == cur_delta {
            cur_count += 1;
            continue;
        }
        if cur_count > best_count {
            best_count = cur_count;
            best_delta = cur_delta;
            num_best_candidates = 1;
        } else if cur_count == best_count {
            num_best_candidates = num_best_candidates.saturating_add(1);
        }
        cur_delta = d;
        cur_count = 1;
    }
    if cur_count > best_count {
        best_delta = cur_delta;
        num_best_candidates = 1;
    } else if cur_count == best_count {
        num_best_candidates = num_best_candidates.saturating_add(1);
    }

    if num_best_candidates == 1 {
        return Some(best_delta);
    }

    // Lower median
    let mid = deltas.len() / 2;
    if deltas.len() % 2 == 1 {
        Some(deltas[mid])
    } else {
        Some(deltas[mid - 1])
    }
}

/// Build `count` timestamps spaced `step_seconds` apart, starting one step
/// after `last`.
///
/// Returns `None` when `step_seconds` is not positive or a timestamp would
/// overflow the representable range.
#[must_use]
pub fn extend_timestamps(
    last: DateTime<Utc>,
    step_seconds: i64,
    count: usize,
) -> Option<Vec<DateTime<Utc>>> {
    if step_seconds <= 0 {
        return None;
    }
    let step = TimeDelta::try_seconds(step_seconds)?;
    let mut out = Vec::with_capacity(count);
    let mut cur = last;
    for _ in 0..count {
        cur = cur.checked_add_signed(step)?;
        out.push(cur);
    }
    Some(out)
}

/// Target timestamps for a forecast of `pred_len` rows.
///
/// Uses the known `horizon` timestamps first (truncated to `pred_len`) and
/// extrapolates the rest from the step estimated over `lookback`.
///
/// Returns `None` when extrapolation is needed but no step can be estimated.
#[must_use]
pub fn target_timestamps(
    lookback: &[DateTime<Utc>],
    horizon: &[DateTime<Utc>],
    pred_len: usize,
) -> Option<Vec<DateTime<Utc>>> {
    let mut out: Vec<DateTime<Utc>> = horizon.iter().copied().take(pred_len).collect();
    let missing = pred_len - out.len();
    if missing == 0 {
        return Some(out);
    }
    let step = estimate_step_seconds(lookback)?;
    let last = out.last().or_else(|| lookback.last()).copied()?;
    out.extend(extend_timestamps(last, step, missing)?);
    Some(out)
}

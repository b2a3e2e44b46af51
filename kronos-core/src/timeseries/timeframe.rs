use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Number of leading deltas averaged by [`detect_timeframe`].
pub const TIMEFRAME_SAMPLE: usize = 10;

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;

/// Human-readable sampling interval of a series.
///
/// Display-only; never used for computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    /// Average spacing below one minute.
    Seconds(i64),
    /// Average spacing below one hour.
    Minutes(i64),
    /// Average spacing below one day.
    Hours(i64),
    /// Average spacing of at least one day.
    Days(i64),
    /// Fewer than two rows.
    Unknown,
}

impl Timeframe {
    /// Bucket an average spacing given in nanoseconds.
    ///
    /// Sub-day buckets truncate toward zero; days floor.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_average_nanos(avg: i128) -> Self {
        if avg < NANOS_PER_MINUTE {
            Self::Seconds((avg / NANOS_PER_SECOND) as i64)
        } else if avg < NANOS_PER_HOUR {
            Self::Minutes((avg / NANOS_PER_MINUTE) as i64)
        } else if avg < NANOS_PER_DAY {
            Self::Hours((avg / NANOS_PER_HOUR) as i64)
        } else {
            Self::Days(avg.div_euclid(NANOS_PER_DAY) as i64)
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(n) => write!(f, "{n} seconds"),
            Self::Minutes(n) => write!(f, "{n} minutes"),
            Self::Hours(n) => write!(f, "{n} hours"),
            Self::Days(n) => write!(f, "{n} days"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

impl Serialize for Timeframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Label the sampling interval from the mean of the first
/// [`TIMEFRAME_SAMPLE`] adjacent deltas.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use kronos_core::detect_timeframe;
///
/// let ts: Vec<DateTime<Utc>> = (0..20)
///     .map(|i| DateTime::from_timestamp(i * 300, 0).unwrap())
///     .collect();
/// assert_eq!(detect_timeframe(&ts).to_string(), "5 minutes");
/// ```
#[must_use]
pub fn detect_timeframe(timestamps: &[DateTime<Utc>]) -> Timeframe {
    if timestamps.len() < 2 {
        return Timeframe::Unknown;
    }
    let mut total: i128 = 0;
    let mut count: i128 = 0;
    for pair in timestamps.windows(2).take(TIMEFRAME_SAMPLE) {
        let delta = pair[1] - pair[0];
        let nanos = delta.num_nanoseconds().map_or_else(
            || i128::from(delta.num_seconds()) * NANOS_PER_SECOND,
            i128::from,
        );
        total += nanos;
        count += 1;
    }
    Timeframe::from_average_nanos(total / count)
}

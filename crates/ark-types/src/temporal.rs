use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Creation timestamp of a stored asset, in whole seconds since the Unix
/// epoch.
///
/// The token wire format reserves exactly ten decimal digits for this
/// field, so values above [`CreatedAt::MAX_SECS`] (year 2286) are rejected
/// at construction rather than silently wrapped. The value must also be a
/// representable calendar instant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatedAt(u64);

impl CreatedAt {
    /// Largest encodable timestamp: ten decimal digits of Unix seconds.
    pub const MAX_SECS: u64 = 9_999_999_999;

    /// Validate and wrap a Unix-seconds timestamp.
    pub fn new(secs: u64) -> Result<Self, TypeError> {
        if secs > Self::MAX_SECS {
            return Err(TypeError::InvalidTimestamp { value: secs });
        }
        // Reject values chrono cannot place on the calendar.
        if DateTime::from_timestamp(secs as i64, 0).is_none() {
            return Err(TypeError::InvalidTimestamp { value: secs });
        }
        Ok(Self(secs))
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(secs.min(Self::MAX_SECS))
    }

    /// Seconds since the Unix epoch.
    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CreatedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CreatedAt({})", self.0)
    }
}

impl fmt::Display for CreatedAt {
    /// Renders as a UTC calendar instant, e.g. `2024-09-18 13:09:31 UTC`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp(self.0 as i64, 0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "{}s", self.0),
        }
    }
}

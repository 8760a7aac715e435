// src/application/ports/time.rs
use chrono::{DateTime, Duration, Utc};

use crate::application::error::{ApplicationError, ApplicationResult};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// `now + ttl`; a ttl past the representable range is an error, not a panic.
    fn expiry_after(&self, ttl: Duration) -> ApplicationResult<DateTime<Utc>> {
        self.now()
            .checked_add_signed(ttl)
            .ok_or_else(|| ApplicationError::infrastructure("expiry timestamp out of range"))
    }
}

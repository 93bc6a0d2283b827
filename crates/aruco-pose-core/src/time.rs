//! Timestamps, lookup-time queries and clock sources.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// A point in time, stored as nanoseconds since an arbitrary epoch.
///
/// The pipeline never interprets the epoch; stamps only need to be
/// comparable, copyable into published records, and convertible to seconds
/// for logging.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Stamp(i64);

impl Stamp {
    /// Build a stamp from raw nanoseconds.
    #[inline]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Raw nanoseconds since the epoch.
    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Build a stamp from fractional seconds.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs * 1e9) as i64)
    }

    /// Stamp as fractional seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 * 1e-9
    }
}

/// Query time for transform-directory lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeQuery {
    /// Most recent data available, regardless of age.
    Latest,
    /// Data at, or nearest to, the given stamp.
    At(Stamp),
}

/// Source of "now" for processing-time stamps.
///
/// Broadcast transforms are stamped at the moment of composition, not at
/// image capture time, so the pipeline takes its clock as an explicit
/// dependency instead of reaching for the system time directly.
pub trait Clock {
    fn now(&self) -> Stamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Stamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Stamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Stamp {
        (**self).now()
    }
}

/// Wall clock backed by `std::time::SystemTime`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Stamp {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Stamp::from_nanos(since_epoch.as_nanos() as i64)
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Share it as `Rc<ManualClock>` to keep a handle after handing the clock to
/// a pipeline.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    nanos: Cell<i64>,
}

impl ManualClock {
    pub fn new(start: Stamp) -> Self {
        Self {
            nanos: Cell::new(start.as_nanos()),
        }
    }

    /// Jump to an absolute stamp.
    pub fn set(&self, stamp: Stamp) {
        self.nanos.set(stamp.as_nanos());
    }

    /// Move the clock forward.
    pub fn advance_nanos(&self, nanos: i64) {
        self.nanos.set(self.nanos.get() + nanos);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Stamp {
        Stamp::from_nanos(self.nanos.get())
    }
}

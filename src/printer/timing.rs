//! # Busy-Window Timing Model
//!
//! The printer has no flow control line, so the driver has to guess when it
//! can accept more data. Every write charges a predicted busy duration and
//! the next write waits until that window has elapsed.
//!
//! ```text
//!  wait_until_ready()     charge_busy(d)      transmit
//!  ─────────────────► now ───────────► resume = now + d ───► bytes on the wire
//! ```
//!
//! The order matters: charging before transmitting means a failed or slow
//! write can never let the next caller slip in early.
//!
//! ## Clocks
//!
//! Time is read through the [`Clock`] trait. [`SystemClock`] uses the real
//! monotonic clock; [`ManualClock`] is a simulated clock whose `sleep`
//! advances time instantly, used for dry runs and tests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::trace;

/// Longest busy window a single charge can set
pub const MAX_BUSY: Duration = Duration::from_secs(3600);

/// Source of monotonic time for the timing model.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;

    /// Block the caller for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A simulated clock. Sleeping advances simulated time without blocking.
///
/// Clones share the same timeline, so a caller can keep a handle while the
/// session owns another.
///
/// ```
/// use std::time::Duration;
/// use thermalprinter::printer::timing::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.sleep(Duration::from_millis(250));
/// assert_eq!(clock.elapsed(), Duration::from_millis(250));
/// assert_eq!(clock.now() - start, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    /// Create a clock starting at the current real instant.
    pub fn new() -> Self {
        let origin = Instant::now();
        Self {
            origin,
            now: Rc::new(Cell::new(origin)),
        }
    }

    /// Move simulated time forward.
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    /// Simulated time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.now.get() - self.origin
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Instant {
        self.now.get()
    }

    #[inline]
    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Tracks the instant before which the printer is assumed busy.
#[derive(Debug)]
pub struct TimingModel<C: Clock = SystemClock> {
    clock: C,
    resume_time: Instant,
    byte_time: f64,
    poll_interval: Duration,
}

impl<C: Clock> TimingModel<C> {
    /// Create a model for a link taking `byte_time` seconds per byte
    /// (see [`PrinterConfig::byte_time`](super::PrinterConfig::byte_time)).
    ///
    /// The printer starts out ready.
    pub fn new(clock: C, byte_time: f64, poll_interval: Duration) -> Self {
        let resume_time = clock.now();
        Self {
            clock,
            resume_time,
            byte_time,
            poll_interval,
        }
    }

    /// Seconds to transmit one byte.
    #[inline]
    pub fn byte_time(&self) -> f64 {
        self.byte_time
    }

    /// Earliest instant the next byte may be sent.
    #[inline]
    pub fn resume_time(&self) -> Instant {
        self.resume_time
    }

    /// Time left until the printer is ready, zero if it already is.
    pub fn busy_remaining(&self) -> Duration {
        self.resume_time.saturating_duration_since(self.clock.now())
    }

    /// The clock this model reads.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mark the printer busy for `seconds` from now.
    ///
    /// The new deadline replaces the old one rather than extending it, but
    /// it never moves earlier than a deadline already set. Charges are
    /// capped at [`MAX_BUSY`]; negative or NaN charges count as zero.
    pub fn charge_busy(&mut self, seconds: f64) {
        let busy = Duration::try_from_secs_f64(seconds.max(0.0))
            .unwrap_or(MAX_BUSY)
            .min(MAX_BUSY);
        let deadline = self.clock.now() + busy;
        trace!(seconds, "charge busy");
        if deadline > self.resume_time {
            self.resume_time = deadline;
        }
    }

    /// Block until the busy window has elapsed.
    ///
    /// Sleeps in steps of at most the poll interval, and never longer than
    /// the time remaining.
    pub fn wait_until_ready(&self) {
        loop {
            let now = self.clock.now();
            if now >= self.resume_time {
                return;
            }
            let remaining = self.resume_time - now;
            let step = if self.poll_interval.is_zero() {
                remaining
            } else {
                remaining.min(self.poll_interval)
            };
            self.clock.sleep(step);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

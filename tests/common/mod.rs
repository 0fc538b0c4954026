//! Host simulation harness shared by the integration tests.
//!
//! Futures are polled against a [`ManualClock`]. Whenever nothing is left to
//! do at the current instant the clock jumps straight to the earliest pending
//! sleep, so minutes of light show run in microseconds and every write lands
//! on an exact millisecond.
#![allow(dead_code)]

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Wake, Waker};

use myrtio_lighthouse::{Clock, DEFAULT_DUTY_MAX, Duration, Instant, ManualClock, OutputSink};

pub const MAX: u16 = DEFAULT_DUTY_MAX;

struct WakeFlag(AtomicBool);

impl Wake for WakeFlag {
    fn wake(self: Arc<Self>) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Poll `future` until it completes or the clock would pass `end`.
///
/// Returns `None` if `end` was reached first, or if the future is stuck with
/// neither a wake nor a pending sleep.
pub fn run_until<F: Future>(clock: &ManualClock, future: F, end: Instant) -> Option<F::Output> {
    let mut future = pin!(future);
    let flag = Arc::new(WakeFlag(AtomicBool::new(false)));
    let waker = Waker::from(flag.clone());
    let mut cx = Context::from_waker(&waker);

    loop {
        clock.begin_poll();
        flag.0.store(false, Ordering::SeqCst);

        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return Some(output);
        }
        if flag.0.load(Ordering::SeqCst) {
            continue;
        }

        let deadline = clock.next_deadline()?;
        if deadline > end {
            clock.advance_to(end);
            return None;
        }
        clock.advance_to(deadline);
    }
}

pub fn ms(millis: u64) -> Instant {
    Instant::from_millis(millis)
}

/// Clock whose sleeps all end `lag` after their deadline, like a busy
/// executor.
pub struct LateClock<'c> {
    pub clock: &'c ManualClock,
    pub lag: Duration,
}

impl Clock for LateClock<'_> {
    fn now(&self) -> Instant {
        self.clock.now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.clock.sleep(duration + self.lag)
    }
}

/// Sink logging every write as `(milliseconds, duty)`
pub struct RecordingSink<'c> {
    clock: &'c ManualClock,
    duty_max: u16,
    write_cost: Duration,
    pub configured: Option<(usize, u32)>,
    pub writes: Vec<(u64, u16)>,
}

impl<'c> RecordingSink<'c> {
    pub fn new(clock: &'c ManualClock) -> Self {
        Self {
            clock,
            duty_max: MAX,
            write_cost: Duration::from_ticks(0),
            configured: None,
            writes: Vec::new(),
        }
    }

    pub fn with_duty_max(mut self, duty_max: u16) -> Self {
        self.duty_max = duty_max;
        self
    }

    /// Charge `cost` of wall-clock time to every write.
    pub fn with_write_cost(mut self, cost: Duration) -> Self {
        self.write_cost = cost;
        self
    }

    /// Duty value shown at `millis`.
    pub fn value_at(&self, millis: u64) -> Option<u16> {
        self.writes
            .iter()
            .rev()
            .find(|(at, _)| *at <= millis)
            .map(|(_, duty)| *duty)
    }

    /// Writes strictly between `from` and `to`.
    pub fn writes_between(&self, from: u64, to: u64) -> Vec<(u64, u16)> {
        self.writes
            .iter()
            .copied()
            .filter(|(at, _)| *at > from && *at < to)
            .collect()
    }

    pub fn writes_from(&self, from: u64) -> Vec<(u64, u16)> {
        self.writes
            .iter()
            .copied()
            .filter(|(at, _)| *at >= from)
            .collect()
    }

    pub fn last(&self) -> Option<(u64, u16)> {
        self.writes.last().copied()
    }
}

impl OutputSink for RecordingSink<'_> {
    fn configure(&mut self, channel: usize, carrier_hz: u32) {
        self.configured = Some((channel, carrier_hz));
    }

    fn max_duty(&self) -> u16 {
        self.duty_max
    }

    fn write(&mut self, duty: u16) {
        self.writes.push((self.clock.now().as_millis(), duty));
        if self.write_cost.as_ticks() > 0 {
            self.clock.advance(self.write_cost);
        }
    }
}

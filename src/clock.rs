//! Time sources
//!
//! The engine only needs "what time is it" and "wake me after this long".
//! [`EmbassyClock`] maps both onto `embassy-time`; [`ManualClock`] is a
//! clock that only moves when told to, for host simulation and tests.

use core::cell::Cell;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use critical_section::Mutex;
use embassy_time::{Duration, Instant, Timer};

/// Monotonic clock with a timed suspension primitive
pub trait Clock {
    /// Current monotonic time.
    fn now(&self) -> Instant;

    /// Suspend the calling task for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        (**self).sleep(duration)
    }
}

/// Clock backed by the `embassy-time` driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        Timer::after(duration)
    }
}

/// Clock that advances only through [`ManualClock::advance`] and
/// [`ManualClock::advance_to`].
///
/// Pending sleeps record their deadline each time they are polled. A driver
/// loop calls [`ManualClock::begin_poll`], polls its future, then jumps to
/// [`ManualClock::next_deadline`]:
///
/// ```ignore
/// loop {
///     clock.begin_poll();
///     if future.as_mut().poll(&mut cx).is_ready() {
///         break;
///     }
///     let Some(deadline) = clock.next_deadline() else { break };
///     clock.advance_to(deadline);
/// }
/// ```
pub struct ManualClock {
    now: Mutex<Cell<Instant>>,
    next_deadline: Mutex<Cell<Option<Instant>>>,
}

impl ManualClock {
    /// Clock starting at zero.
    pub const fn new() -> Self {
        Self::starting_at(Instant::from_ticks(0))
    }

    /// Clock starting at `now`.
    pub const fn starting_at(now: Instant) -> Self {
        Self {
            now: Mutex::new(Cell::new(now)),
            next_deadline: Mutex::new(Cell::new(None)),
        }
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        critical_section::with(|cs| {
            let now = self.now.borrow(cs);
            now.set(now.get() + duration);
        });
    }

    /// Move the clock to `instant`. Never moves backwards.
    pub fn advance_to(&self, instant: Instant) {
        critical_section::with(|cs| {
            let now = self.now.borrow(cs);
            if instant > now.get() {
                now.set(instant);
            }
        });
    }

    /// Forget deadlines recorded by previous polls.
    pub fn begin_poll(&self) {
        critical_section::with(|cs| self.next_deadline.borrow(cs).set(None));
    }

    /// Earliest deadline recorded since the last [`ManualClock::begin_poll`].
    pub fn next_deadline(&self) -> Option<Instant> {
        critical_section::with(|cs| self.next_deadline.borrow(cs).get())
    }

    fn register(&self, deadline: Instant) {
        critical_section::with(|cs| {
            let next = self.next_deadline.borrow(cs);
            match next.get() {
                Some(current) if current <= deadline => {}
                _ => next.set(Some(deadline)),
            }
        });
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        critical_section::with(|cs| self.now.borrow(cs).get())
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        ManualSleep {
            clock: self,
            deadline: self.now() + duration,
        }
    }
}

/// Sleep future of a [`ManualClock`]
#[must_use = "futures do nothing unless polled"]
pub struct ManualSleep<'a> {
    clock: &'a ManualClock,
    deadline: Instant,
}

impl Future for ManualSleep<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.clock.now() >= self.deadline {
            return Poll::Ready(());
        }
        self.clock.register(self.deadline);
        Poll::Pending
    }
}

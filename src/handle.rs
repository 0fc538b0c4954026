//! Per-light control block
//!
//! The only way to influence a running generator from outside is through its
//! [`LightHandle`]: request cancellation, observe its state, wait for it to
//! stop. Brightness itself is never touched from outside.

use core::cell::Cell;

use critical_section::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Lifecycle of a light generator.
///
/// Moves strictly forward: `Idle -> Running -> FadingOut -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeneratorState {
    #[default]
    Idle,
    Running,
    FadingOut,
    Stopped,
}

impl GeneratorState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::FadingOut => "fading_out",
            Self::Stopped => "stopped",
        }
    }
}

/// Cancellation token, state cell and completion signal of one light
pub struct LightHandle {
    state: Mutex<Cell<GeneratorState>>,
    cancel_requested: Mutex<Cell<bool>>,
    overruns: Mutex<Cell<u32>>,
    cancel: Signal<CriticalSectionRawMutex, ()>,
    stopped: Signal<CriticalSectionRawMutex, ()>,
}

impl LightHandle {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(GeneratorState::Idle)),
            cancel_requested: Mutex::new(Cell::new(false)),
            overruns: Mutex::new(Cell::new(0)),
            cancel: Signal::new(),
            stopped: Signal::new(),
        }
    }

    pub fn state(&self) -> GeneratorState {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    /// Number of phase groups that took longer than their period.
    pub fn overruns(&self) -> u32 {
        critical_section::with(|cs| self.overruns.borrow(cs).get())
    }

    pub fn is_cancel_requested(&self) -> bool {
        critical_section::with(|cs| self.cancel_requested.borrow(cs).get())
    }

    /// Ask the generator to fade out and stop.
    ///
    /// Observed at the generator's next suspension point. Repeated requests
    /// have no further effect.
    pub fn cancel(&self) {
        critical_section::with(|cs| self.cancel_requested.borrow(cs).set(true));
        self.cancel.signal(());
    }

    /// Wait until the generator has reached [`GeneratorState::Stopped`].
    pub async fn wait_stopped(&self) {
        while self.state() != GeneratorState::Stopped {
            self.stopped.wait().await;
        }
    }

    /// Completes once cancellation has been requested.
    pub(crate) async fn cancelled(&self) {
        while !self.is_cancel_requested() {
            self.cancel.wait().await;
        }
    }

    pub(crate) fn set_state(&self, state: GeneratorState) {
        critical_section::with(|cs| self.state.borrow(cs).set(state));
        if state == GeneratorState::Stopped {
            self.stopped.signal(());
        }
    }

    pub(crate) fn record_overrun(&self) {
        critical_section::with(|cs| {
            let overruns = self.overruns.borrow(cs);
            overruns.set(overruns.get().saturating_add(1));
        });
    }

    /// Prepare the handle for a new generator.
    pub(crate) fn reset(&self) {
        critical_section::with(|cs| {
            self.state.borrow(cs).set(GeneratorState::Idle);
            self.cancel_requested.borrow(cs).set(false);
        });
        self.cancel.reset();
        self.stopped.reset();
    }
}

impl Default for LightHandle {
    fn default() -> Self {
        Self::new()
    }
}

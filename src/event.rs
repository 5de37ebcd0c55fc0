//! The event and signal model: a signal identifying what happened, plus an
//! optional scalar payload.
//!
//! Signal and value widths are build-time choices selected through cargo
//! features, mirroring the fixed-width configuration style of small embedded
//! targets. The defaults are `i16` signals and `i32` values.

/// Identifies the meaning of an event.
///
/// Three sub-ranges exist by convention, not by type:
/// - negative signals are *private* (an object and its own children only),
/// - `0..signal::USER` is the *system* band reserved for the engine,
/// - `signal::USER..` is the *public* application range.
#[cfg(feature = "signal-8")]
pub type Signal = i8;
#[cfg(all(feature = "signal-32", not(feature = "signal-8")))]
pub type Signal = i32;
#[cfg(not(any(feature = "signal-8", feature = "signal-32")))]
pub type Signal = i16;

/// Scalar payload carried alongside a signal.
#[cfg(feature = "value-16")]
pub type Value = i16;
#[cfg(all(feature = "value-64", not(feature = "value-16")))]
pub type Value = i64;
#[cfg(not(any(feature = "value-16", feature = "value-64")))]
pub type Value = i32;

/// Reserved signal numbers and range classification helpers.
pub mod signal {
    use super::Signal;

    /// Superstate discovery probe. Engine internal, never delivered to
    /// application dispatch.
    pub const EMPTY: Signal = 0;
    /// Entry action trigger, fired when a state becomes active.
    pub const ENTRY: Signal = 1;
    /// Exit action trigger, fired when a state is left.
    pub const EXIT: Signal = 2;
    /// Initial-transition probe, fired after a composite state is entered.
    pub const INIT: Signal = 3;
    /// First signal number available to application code.
    pub const USER: Signal = 4;

    /// Whether `sig` belongs to the reserved system band.
    #[must_use]
    pub const fn is_system(sig: Signal) -> bool {
        sig >= EMPTY && sig < USER
    }

    /// Whether `sig` is private (exchanged only between an object and its
    /// own children, never published).
    #[must_use]
    pub const fn is_private(sig: Signal) -> bool {
        sig < 0
    }

    /// Whether `sig` is in the public application range.
    #[must_use]
    pub const fn is_public(sig: Signal) -> bool {
        sig >= USER
    }
}

/// The immutable message unit: a signal plus an optional payload value.
///
/// Construction never fails and equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    signal: Signal,
    value: Value,
}

impl Event {
    /// Creates an event carrying a payload value.
    #[must_use]
    pub const fn new(signal: Signal, value: Value) -> Self {
        Self { signal, value }
    }

    /// Creates a payload-free event (value zero).
    #[must_use]
    pub const fn from_signal(signal: Signal) -> Self {
        Self { signal, value: 0 }
    }

    #[must_use]
    pub const fn signal(&self) -> Signal {
        self.signal
    }

    #[must_use]
    pub const fn value(&self) -> Value {
        self.value
    }
}

impl From<Signal> for Event {
    fn from(signal: Signal) -> Self {
        Self::from_signal(signal)
    }
}

/// The reserved events the engine uses for every internal probe. Built once
/// so probing allocates nothing; reserved events never carry a payload.
pub(crate) const RESERVED: [Event; 4] = [
    Event::from_signal(signal::EMPTY),
    Event::from_signal(signal::ENTRY),
    Event::from_signal(signal::EXIT),
    Event::from_signal(signal::INIT),
];

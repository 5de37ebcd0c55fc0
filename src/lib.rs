// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg_attr(not(feature = "std"), no_std)]

//! # awsm-core
//! A run-to-completion hierarchical state machine engine for event-driven
//! active objects. `no_std` first, no allocation, suitable for targets
//! without a memory-management unit.
//!
//! States are plain functions; the nesting hierarchy is encoded in each
//! handler's fallback branch and discovered at runtime through reserved
//! probe signals, so no tree structure is ever built. One [`Machine`]
//! dispatch resolves the full exit path, least-common-ancestor search,
//! entry path, and any chain of initial transitions before returning.
//!
//! [`Awsm`] wraps a machine into an active object with a bounded FIFO
//! event queue and a bounded list of owned children; an external scheduler
//! drains the queue and drives dispatch.

#[cfg(feature = "debug-log")]
macro_rules! trace_log {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}
#[cfg(not(feature = "debug-log"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {{}};
}
pub(crate) use trace_log;

pub mod actor;
pub mod event;
pub mod machine;

pub use actor::{AdoptError, Awsm, EventSink, PostError};
pub use event::{Event, Signal, Value, signal};
pub use machine::{MAX_NEST_DEPTH, Machine, Response, State};

/// Common surface shared by [`Machine`] and [`Awsm`].
pub trait StateMachine {
    type Context;

    /// Dispatches one event to completion; returns whether a transition
    /// occurred.
    fn dispatch(&mut self, event: &Event) -> bool;
    fn context(&self) -> &Self::Context;
    fn context_mut(&mut self) -> &mut Self::Context;
}

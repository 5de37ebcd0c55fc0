//! The active-object envelope: a hierarchical state machine plus a bounded
//! FIFO event queue and a bounded list of owned children.
//!
//! The envelope does not drain its own queue. An external scheduler pops
//! events with [`Awsm::next_event`] and feeds them to [`Awsm::dispatch`];
//! the envelope only guarantees FIFO ordering and fixed capacity.

use core::fmt;

use crate::event::Event;
use crate::machine::{Machine, State};

/// Error returned when posting to a full event queue.
///
/// The rejected event is handed back and the queue contents are left
/// intact; nothing is dropped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostError {
    /// The queue is at capacity.
    Full(Event),
}

impl fmt::Display for PostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostError::Full(_) => write!(f, "event queue is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PostError {}

/// Anything that accepts posted events: the type-erased seam between a
/// parent object and its heterogeneous children.
pub trait EventSink {
    /// Appends an event to the sink's queue.
    ///
    /// # Errors
    /// Returns [`PostError::Full`] with the rejected event if the queue is
    /// at capacity.
    fn post(&mut self, event: Event) -> Result<(), PostError>;
}

/// Error returned when adopting a child beyond the child-list capacity.
/// The rejected child is handed back to the caller.
pub enum AdoptError {
    Full(&'static mut dyn EventSink),
}

impl fmt::Debug for AdoptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdoptError::Full(_) => f.write_str("Full(..)"),
        }
    }
}

impl fmt::Display for AdoptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdoptError::Full(_) => write!(f, "child list is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AdoptError {}

/// An active object: a [`Machine`] with an event queue of capacity `Q` and
/// room for `C` exclusively owned children.
///
/// Children are held as unique `&'static mut` borrows, so exactly one owner
/// can ever post to a child; private (negative) signals travel only along
/// these edges by convention.
pub struct Awsm<M, const Q: usize, const C: usize> {
    machine: Machine<M>,
    queue: heapless::Deque<Event, Q>,
    children: heapless::Vec<&'static mut dyn EventSink, C>,
}

impl<M, const Q: usize, const C: usize> Awsm<M, Q, C> {
    /// Creates an active object whose first [`init`](Awsm::init) call will
    /// invoke `initial` as the startup handler.
    #[must_use]
    pub fn new(context: M, initial: State<M>) -> Self {
        Self {
            machine: Machine::new(context, initial),
            queue: heapless::Deque::new(),
            children: heapless::Vec::new(),
        }
    }

    /// Executes the startup transition. See [`Machine::init`].
    ///
    /// # Panics
    /// Panics if the startup handler does not answer with a transition.
    pub fn init(&mut self) {
        self.machine.init();
    }

    /// Executes the startup transition with a caller-supplied event.
    ///
    /// # Panics
    /// Panics if the startup handler does not answer with a transition.
    pub fn init_with(&mut self, event: &Event) {
        self.machine.init_with(event);
    }

    /// Dispatches one event to completion. See [`Machine::dispatch`].
    pub fn dispatch(&mut self, event: &Event) -> bool {
        self.machine.dispatch(event)
    }

    /// Pops the oldest queued event, if any. Queue draining is the external
    /// scheduler's job; the envelope never dispatches queued events itself.
    pub fn next_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Number of events currently queued.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Fixed queue capacity chosen at construction.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Takes exclusive ownership of a child object.
    ///
    /// # Errors
    /// Returns [`AdoptError::Full`] with the child handed back if the child
    /// list is at capacity.
    pub fn adopt(
        &mut self,
        child: &'static mut dyn EventSink,
    ) -> Result<(), AdoptError> {
        self.children.push(child).map_err(AdoptError::Full)
    }

    /// The owned children, in adoption order.
    pub fn children(&mut self) -> &mut [&'static mut dyn EventSink] {
        &mut self.children
    }

    /// The currently active state handler.
    #[must_use]
    pub fn state(&self) -> State<M> {
        self.machine.state()
    }

    /// Whether `state` is the active state or one of its ancestors.
    pub fn is_in(&mut self, state: State<M>) -> bool {
        self.machine.is_in(state)
    }

    #[must_use]
    pub fn context(&self) -> &M {
        self.machine.context()
    }

    pub fn context_mut(&mut self) -> &mut M {
        self.machine.context_mut()
    }

    /// The underlying machine, for test instrumentation such as
    /// [`Machine::set_state`].
    pub fn machine_mut(&mut self) -> &mut Machine<M> {
        &mut self.machine
    }
}

impl<M, const Q: usize, const C: usize> EventSink for Awsm<M, Q, C> {
    fn post(&mut self, event: Event) -> Result<(), PostError> {
        self.queue.push_back(event).map_err(PostError::Full)
    }
}

impl<M, const Q: usize, const C: usize> crate::StateMachine for Awsm<M, Q, C> {
    type Context = M;

    fn dispatch(&mut self, event: &Event) -> bool {
        Awsm::dispatch(self, event)
    }

    fn context(&self) -> &M {
        Awsm::context(self)
    }

    fn context_mut(&mut self) -> &mut M {
        Awsm::context_mut(self)
    }
}

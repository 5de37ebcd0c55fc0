//! The hierarchical dispatch and transition engine.
//!
//! A state is a plain function of `(&mut M, &Event) -> Response<M>`. There is
//! no parent pointer and no tree structure: ancestry is discovered at runtime
//! by invoking a handler with the reserved `EMPTY` signal, which every
//! non-root handler answers with `Super(parent)` from its fallback branch.
//! The root answers `Ignored` and terminates every upward walk.
//!
//! Dispatch is strict run-to-completion: one call fully resolves the upward
//! event trace, the exit/entry sequences of any transition, and every chained
//! initial transition of the final target before returning.

use core::fmt;
use core::ptr;

use crate::event::{Event, RESERVED, signal};
use crate::trace_log;

/// Maximum depth of state nesting the engine supports. Exceeding it is a
/// configuration defect and halts dispatch with a panic.
pub const MAX_NEST_DEPTH: usize = 8;

/// A state handler: the atomic unit of behavior. A "state" is nothing but
/// one such function plus the superstate lookup convention.
pub type State<M> = fn(&mut M, &Event) -> Response<M>;

/// What a state handler did with an event.
pub enum Response<M> {
    /// Consumed, no state change.
    Handled,
    /// Explicitly consumed as a no-op. The root answers everything it does
    /// not recognize (including the `EMPTY` probe) with this.
    Ignored,
    /// Recognized but rejected (e.g. a failed guard); the event keeps
    /// climbing to the superstate.
    Unhandled,
    /// Acknowledges an `ENTRY` probe.
    Entered,
    /// Acknowledges an `EXIT` probe.
    Exited,
    /// Not handled here; carries the superstate to re-dispatch to. This is
    /// also how the `EMPTY` probe discovers ancestry.
    Super(State<M>),
    /// A transition to the carried target state.
    Transition(State<M>),
}

impl<M> Clone for Response<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Response<M> {}

impl<M> fmt::Debug for Response<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Handled => f.write_str("Handled"),
            Response::Ignored => f.write_str("Ignored"),
            Response::Unhandled => f.write_str("Unhandled"),
            Response::Entered => f.write_str("Entered"),
            Response::Exited => f.write_str("Exited"),
            Response::Super(_) => f.write_str("Super(..)"),
            Response::Transition(_) => f.write_str("Transition(..)"),
        }
    }
}

/// A hierarchical state machine: a context `M` plus the currently active
/// state handler.
///
/// Invariant: between dispatches the active state is a leaf — a state whose
/// chain of initial transitions has been fully resolved. The engine never
/// leaves the machine paused mid-hierarchy.
pub struct Machine<M> {
    state: State<M>,
    context: M,
}

impl<M> Machine<M> {
    /// Creates a machine whose first [`init`](Machine::init) call will invoke
    /// `initial` as the startup handler.
    #[must_use]
    pub const fn new(context: M, initial: State<M>) -> Self {
        Self {
            state: initial,
            context,
        }
    }

    /// Executes the startup transition with the reserved `INIT` event.
    ///
    /// # Panics
    /// Panics if the startup handler does not answer with a transition, or
    /// if the handler graph violates the nesting/lookup conventions.
    pub fn init(&mut self) {
        self.init_with(&RESERVED[signal::INIT as usize]);
    }

    /// Executes the startup transition with a caller-supplied event.
    ///
    /// The startup handler must answer `Transition`; the engine then enters
    /// every state from the root down to the target and resolves the
    /// target's chain of initial transitions.
    ///
    /// # Panics
    /// Panics if the startup handler does not answer with a transition, or
    /// if the handler graph violates the nesting/lookup conventions.
    pub fn init_with(&mut self, event: &Event) {
        let target = match (self.state)(&mut self.context, event) {
            Response::Transition(target) => target,
            other => panic!("startup handler must take a transition, answered {other:?}"),
        };
        trace_log!("init: startup transition taken");

        // Entry path spans the whole hierarchy above the target, root first.
        let mut path: heapless::Vec<State<M>, MAX_NEST_DEPTH> = heapless::Vec::new();
        let mut walk = Some(target);
        while let Some(state) = walk {
            assert!(
                path.push(state).is_ok(),
                "state nesting exceeds MAX_NEST_DEPTH"
            );
            walk = self.superstate(state);
        }
        for state in path.iter().rev() {
            self.enter(*state);
        }
        self.state = self.drill(target);
    }

    /// Dispatches one event to completion and returns whether a transition
    /// occurred.
    ///
    /// The event is offered to the active state and climbs the hierarchy
    /// until some ancestor consumes it or the root ignores it. If a handler
    /// answers with a transition, the full exit/entry sequence runs and the
    /// machine comes to rest on the target's resolved leaf before this call
    /// returns.
    ///
    /// Must not be re-entered for the same machine; run-to-completion is a
    /// precondition, not something the engine arbitrates.
    ///
    /// # Panics
    /// Panics on configuration defects: delegation chains or nesting deeper
    /// than [`MAX_NEST_DEPTH`], or handlers violating the probe convention.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        trace_log!("dispatch: signal {}", event.signal());
        let start = self.state;
        let mut current = start;
        let mut hops = 0;

        // Upward run-to-completion trace. Terminates at the root at worst,
        // since the root never answers Super or Unhandled.
        let (source, target) = loop {
            let answer = (current)(&mut self.context, event);
            let next = match answer {
                Response::Super(superstate) => Some(superstate),
                Response::Unhandled => self.superstate(current),
                Response::Transition(target) => break (current, target),
                Response::Handled
                | Response::Ignored
                | Response::Entered
                | Response::Exited => return false,
            };
            let Some(next) = next else {
                // Rejected at the root: a normal, silent no-op.
                return false;
            };
            current = next;
            hops += 1;
            assert!(
                hops <= MAX_NEST_DEPTH,
                "event delegation exceeds MAX_NEST_DEPTH"
            );
        };

        // The consumer may be an ancestor reached via delegation; the active
        // states below it are exited first, deepest first.
        let mut state = start;
        while !ptr::fn_addr_eq(state, source) {
            self.exit(state);
            state = self
                .superstate(state)
                .unwrap_or_else(|| panic!("transition source is not an ancestor of the active state"));
        }

        self.take_transition(source, target);
        true
    }

    /// The currently active state handler.
    #[must_use]
    pub fn state(&self) -> State<M> {
        self.state
    }

    /// Whether `state` is the active state or one of its ancestors.
    pub fn is_in(&mut self, state: State<M>) -> bool {
        let mut walk = self.state;
        loop {
            if ptr::fn_addr_eq(walk, state) {
                return true;
            }
            match self.superstate(walk) {
                Some(superstate) => walk = superstate,
                None => return false,
            }
        }
    }

    #[must_use]
    pub fn context(&self) -> &M {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut M {
        &mut self.context
    }

    /// Overrides the active state without firing any actions.
    ///
    /// Test instrumentation only: lets a test park the machine on an
    /// arbitrary (possibly composite) state before dispatching. Production
    /// code must let `init`/`dispatch` drive the state exclusively.
    pub fn set_state(&mut self, state: State<M>) {
        self.state = state;
    }

    /// Classifies and executes a transition from `source` (the handler that
    /// answered `Transition`) to `target`.
    fn take_transition(&mut self, source: State<M>, target: State<M>) {
        if ptr::fn_addr_eq(source, target) {
            // Self-transition: leave and re-enter.
            trace_log!("transition: self");
            self.exit(source);
            self.enter(target);
        } else if self
            .superstate(target)
            .is_some_and(|s| ptr::fn_addr_eq(s, source))
        {
            // Target is a direct substate: the source stays active.
            trace_log!("transition: to direct substate");
            self.enter(target);
        } else if self
            .superstate(source)
            .is_some_and(|s| ptr::fn_addr_eq(s, target))
        {
            // Target is the direct superstate: already active, no entry.
            trace_log!("transition: to direct superstate");
            self.exit(source);
        } else {
            trace_log!("transition: via least common ancestor");
            self.transition_via_lca(source, target);
        }
        self.state = self.drill(target);
    }

    /// General transition: exit bottom-up from `source` to (excluding) the
    /// least common ancestor, then enter top-down to `target`.
    fn transition_via_lca(&mut self, source: State<M>, target: State<M>) {
        // Record the target's ancestor chain, target first, root last.
        let mut chain: heapless::Vec<State<M>, MAX_NEST_DEPTH> = heapless::Vec::new();
        let mut walk = Some(target);
        while let Some(state) = walk {
            assert!(
                chain.push(state).is_ok(),
                "state nesting exceeds MAX_NEST_DEPTH"
            );
            walk = self.superstate(state);
        }

        // Walk the source chain upward, exiting as we go, until a state on
        // the target's chain is met. If the source itself is on the chain it
        // is the LCA and nothing is exited.
        let mut state = source;
        let lca = loop {
            if let Some(index) = chain.iter().position(|c| ptr::fn_addr_eq(*c, state)) {
                break index;
            }
            self.exit(state);
            match self.superstate(state) {
                Some(superstate) => state = superstate,
                // Disconnected hierarchy: degrade to entering the whole
                // recorded chain, root included.
                None => break chain.len(),
            }
        };

        // Entries replay the root-ward recording leaf-ward.
        for state in chain[..lca].iter().rev() {
            self.enter(*state);
        }
    }

    /// Follows the chain of initial transitions declared by `state`,
    /// entering each newly reached state root-to-leaf, and returns the
    /// final leaf.
    fn drill(&mut self, mut state: State<M>) -> State<M> {
        let init = &RESERVED[signal::INIT as usize];
        let mut depth = 0;
        loop {
            let target = match (state)(&mut self.context, init) {
                Response::Transition(target) => target,
                _ => return state,
            };
            depth += 1;
            assert!(
                depth <= MAX_NEST_DEPTH,
                "initial transition chain exceeds MAX_NEST_DEPTH"
            );
            trace_log!("init: descending into default substate");

            // Entry path from the target back up to (excluding) the source;
            // the source is already active and is never re-entered here.
            let mut path: heapless::Vec<State<M>, MAX_NEST_DEPTH> = heapless::Vec::new();
            let mut walk = target;
            while !ptr::fn_addr_eq(walk, state) {
                assert!(
                    path.push(walk).is_ok(),
                    "state nesting exceeds MAX_NEST_DEPTH"
                );
                walk = self.superstate(walk).unwrap_or_else(|| {
                    panic!("initial transition target is not a descendant of its source")
                });
            }
            for entered in path.iter().rev() {
                self.enter(*entered);
            }
            state = target;
        }
    }

    /// Discovers a handler's superstate with the reserved `EMPTY` probe.
    /// `None` means `state` is the root.
    fn superstate(&mut self, state: State<M>) -> Option<State<M>> {
        match state(&mut self.context, &RESERVED[signal::EMPTY as usize]) {
            Response::Super(superstate) => Some(superstate),
            Response::Ignored => None,
            other => panic!("superstate probe answered {other:?}"),
        }
    }

    fn enter(&mut self, state: State<M>) {
        let _ = state(&mut self.context, &RESERVED[signal::ENTRY as usize]);
    }

    fn exit(&mut self, state: State<M>) {
        let _ = state(&mut self.context, &RESERVED[signal::EXIT as usize]);
    }
}

impl<M> crate::StateMachine for Machine<M> {
    type Context = M;

    fn dispatch(&mut self, event: &Event) -> bool {
        Machine::dispatch(self, event)
    }

    fn context(&self) -> &M {
        Machine::context(self)
    }

    fn context_mut(&mut self) -> &mut M {
        Machine::context_mut(self)
    }
}

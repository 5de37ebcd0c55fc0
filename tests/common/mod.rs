//! Shared fixture: a three-level hierarchy exercising every transition kind.
//!
//! ```text
//!         s (root)
//!        /        \
//!      s1          s2
//!       |           |
//!      s11         s21
//!                   |
//!                  s211
//! ```
//!
//! Default chains: `s -> s1 -> s11`, `s2 -> s21 -> s211`. The context logs
//! every entry and exit action by state name and carries the `foo` flag
//! that guards the `D`/`I` signals, set deep in the hierarchy and cleared
//! by the root.
#![allow(dead_code)]

use awsm_core::{Event, Response, Signal, State, signal};

pub const SIG_A: Signal = signal::USER;
pub const SIG_B: Signal = signal::USER + 1;
pub const SIG_C: Signal = signal::USER + 2;
pub const SIG_D: Signal = signal::USER + 3;
pub const SIG_E: Signal = signal::USER + 4;
pub const SIG_F: Signal = signal::USER + 5;
pub const SIG_G: Signal = signal::USER + 6;
pub const SIG_H: Signal = signal::USER + 7;
pub const SIG_I: Signal = signal::USER + 8;
/// Recognized by no handler at any level.
pub const SIG_NOISE: Signal = signal::USER + 20;

#[derive(Debug, Default)]
pub struct Trace {
    pub entered: heapless::Vec<&'static str, 32>,
    pub exited: heapless::Vec<&'static str, 32>,
    pub foo: bool,
}

impl Trace {
    pub fn clear(&mut self) {
        self.entered.clear();
        self.exited.clear();
    }

    pub fn entry_count(&self) -> usize {
        self.entered.len()
    }

    pub fn exit_count(&self) -> usize {
        self.exited.len()
    }
}

/// Whether two handlers are the same state.
pub fn same(a: State<Trace>, b: State<Trace>) -> bool {
    core::ptr::fn_addr_eq(a, b)
}

/// Startup pseudostate: unconditionally transitions into the `s2` subtree.
pub fn boot(ctx: &mut Trace, _event: &Event) -> Response<Trace> {
    ctx.foo = false;
    Response::Transition(s2)
}

/// Root. Answers everything it does not recognize (including the `EMPTY`
/// probe) with `Ignored` and clears `foo` on `I`.
pub fn s(ctx: &mut Trace, event: &Event) -> Response<Trace> {
    match event.signal() {
        signal::ENTRY => {
            ctx.entered.push("s").unwrap();
            Response::Entered
        }
        signal::EXIT => {
            ctx.exited.push("s").unwrap();
            Response::Exited
        }
        signal::INIT => Response::Transition(s1),
        SIG_I => {
            if ctx.foo {
                ctx.foo = false;
                Response::Handled
            } else {
                Response::Unhandled
            }
        }
        _ => Response::Ignored,
    }
}

pub fn s1(ctx: &mut Trace, event: &Event) -> Response<Trace> {
    match event.signal() {
        signal::ENTRY => {
            ctx.entered.push("s1").unwrap();
            Response::Entered
        }
        signal::EXIT => {
            ctx.exited.push("s1").unwrap();
            Response::Exited
        }
        signal::INIT => Response::Transition(s11),
        SIG_A => Response::Transition(s1),
        SIG_B => Response::Transition(s11),
        SIG_C => Response::Transition(s2),
        SIG_D => {
            if ctx.foo {
                Response::Unhandled
            } else {
                ctx.foo = true;
                Response::Transition(s)
            }
        }
        SIG_F => Response::Transition(s211),
        _ => Response::Super(s),
    }
}

pub fn s11(ctx: &mut Trace, event: &Event) -> Response<Trace> {
    match event.signal() {
        signal::ENTRY => {
            ctx.entered.push("s11").unwrap();
            Response::Entered
        }
        signal::EXIT => {
            ctx.exited.push("s11").unwrap();
            Response::Exited
        }
        SIG_D => {
            if ctx.foo {
                ctx.foo = false;
                Response::Transition(s1)
            } else {
                Response::Unhandled
            }
        }
        SIG_G => Response::Transition(s211),
        _ => Response::Super(s1),
    }
}

pub fn s2(ctx: &mut Trace, event: &Event) -> Response<Trace> {
    match event.signal() {
        signal::ENTRY => {
            ctx.entered.push("s2").unwrap();
            Response::Entered
        }
        signal::EXIT => {
            ctx.exited.push("s2").unwrap();
            Response::Exited
        }
        signal::INIT => Response::Transition(s21),
        SIG_C => Response::Transition(s1),
        SIG_F => Response::Transition(s11),
        SIG_I => {
            if ctx.foo {
                Response::Unhandled
            } else {
                ctx.foo = true;
                Response::Handled
            }
        }
        _ => Response::Super(s),
    }
}

pub fn s21(ctx: &mut Trace, event: &Event) -> Response<Trace> {
    match event.signal() {
        signal::ENTRY => {
            ctx.entered.push("s21").unwrap();
            Response::Entered
        }
        signal::EXIT => {
            ctx.exited.push("s21").unwrap();
            Response::Exited
        }
        signal::INIT => Response::Transition(s211),
        SIG_A => Response::Transition(s21),
        SIG_B => Response::Transition(s211),
        SIG_G => Response::Transition(s11),
        _ => Response::Super(s2),
    }
}

pub fn s211(ctx: &mut Trace, event: &Event) -> Response<Trace> {
    match event.signal() {
        signal::ENTRY => {
            ctx.entered.push("s211").unwrap();
            Response::Entered
        }
        signal::EXIT => {
            ctx.exited.push("s211").unwrap();
            Response::Exited
        }
        SIG_D => Response::Transition(s21),
        SIG_H => Response::Transition(s),
        _ => Response::Super(s21),
    }
}

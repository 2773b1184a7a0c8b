//! # Parser execution tracing
//!
//! An opt-in diagnostic log of [`engine::eval`][crate::engine::eval]'s
//! recursive descent, gated behind the `debug` feature exactly the way
//! `winnow`'s own `trace` module gates its instrumentation — this crate's
//! equivalent of `winnow::trace::trace`, rebuilt around `ErrorValue`
//! instead of `ErrMode`.

#![cfg(feature = "debug")]

use crate::error::ErrorValue;
use std::sync::atomic::{AtomicUsize, Ordering};

static DEPTH: AtomicUsize = AtomicUsize::new(0);

/// An RAII depth token: increments on creation, decrements on drop, so
/// nested `eval` calls indent correctly even when a branch returns early
/// via `?`.
pub struct Depth(usize);

impl Depth {
    /// Enters one level deeper.
    pub fn enter() -> Self {
        Depth(DEPTH.fetch_add(1, Ordering::SeqCst))
    }
}

impl Drop for Depth {
    fn drop(&mut self) {
        DEPTH.fetch_sub(1, Ordering::SeqCst);
    }
}

fn gutter(depth: usize) -> String {
    "| ".repeat(depth)
}

/// Logs entry into a parser node, before it has consumed anything.
pub fn enter(depth: &Depth, name: &str, pos: usize) {
    let style = anstyle::Style::new().bold();
    eprintln!("{}{style}{name}{style:#} @ {pos}", gutter(depth.0));
}

/// Logs the outcome of a parser node: how far the cursor moved on
/// success, or the error on failure.
pub fn exit<V>(depth: &Depth, name: &str, pos_before: usize, pos_after: usize, result: &Result<V, ErrorValue>) {
    let ok_style = anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Green.into()));
    let err_style = anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Red.into()));
    match result {
        Ok(_) => eprintln!("{}{ok_style}+ {name} consumed {}{ok_style:#}", gutter(depth.0), pos_after - pos_before),
        Err(e) => eprintln!("{}{err_style}- {name}: {e}{err_style:#}", gutter(depth.0)),
    }
}

//! Host-side utilities for the `carousel` crate.
//!
//! The `carousel` crate is UI-agnostic and only advises: it never owns the scroll offset. This
//! crate provides small, framework-neutral pieces a host typically needs around it:
//!
//! - A [`Controller`] that owns the offset, applies wrap corrections and settles after a tween
//! - Tween-based settle animation helpers (adapter-driven)
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod controller;
mod tween;


pub use controller::{Controller, Frame};
pub use tween::{Easing, Tween};

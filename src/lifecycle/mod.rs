//! Lifecycle management for cancelable resources.
//!
//! This module provides the "subscribe, get a cancelable handle back"
//! building blocks used throughout the crate: [`Subscription`] for one-shot
//! cancelation, [`MutableSlot`] for a replaceable value whose predecessor is
//! dropped on replacement, and [`DisposableRef`] for pairing a value with
//! cleanup that runs when the reference goes away.

mod slot;
mod subscription;

pub use slot::{DisposableRef, MutableSlot};
pub use subscription::Subscription;

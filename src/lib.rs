//! # Chanbuf
//!
//! Host-side plumbing utilities for terminal and notebook frontends.
//!
//! The centerpiece is [`ChannelBufferer`], which sits between a source of
//! per-channel text chunks (for example a terminal process emitting output)
//! and a consumer callback, coalescing bursts of chunks on the same channel
//! into fewer callback invocations bounded by a per-channel idle timer.
//!
//! ## Features
//!
//! - Per-channel output coalescing with a configurable throttle window
//! - Cancelable subscriptions with guaranteed final flush (no data loss)
//! - Lifecycle helpers: replaceable slots and disposable references
//! - A callback event emitter with cancelable listener handles
//! - A status-bar item provider registry with cancellation-aware gathering
//! - A widget surface enforcing one attached widget per id
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use chanbuf::ChannelBufferer;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let bufferer = ChannelBufferer::new(|id, text| {
//!         println!("channel {id}: {text}");
//!     });
//!
//!     let (tx, rx) = mpsc::unbounded_channel::<String>();
//!     let sub = bufferer.start_buffering(1, rx, Duration::from_millis(5));
//!
//!     tx.send("a".to_string()).unwrap();
//!     tx.send("b".to_string()).unwrap();
//!     tx.send("c".to_string()).unwrap();
//!
//!     // ~5ms later the callback fires once with (1, "abc").
//!     tokio::time::sleep(Duration::from_millis(10)).await;
//!     drop(sub);
//! }
//! ```

pub mod buffering;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod statusbar;
pub mod widget;

// Re-export main types for convenience
pub use buffering::{ChannelBufferer, ChannelId, ProcessData, TextEvent, DEFAULT_THROTTLE};
pub use error::Error;
pub use event::Emitter;
pub use lifecycle::{DisposableRef, MutableSlot, Subscription};
pub use statusbar::{
    StatusBarAlignment, StatusBarItem, StatusBarItemList, StatusBarItemProvider, StatusBarService,
};
pub use widget::{Widget, WidgetSet};

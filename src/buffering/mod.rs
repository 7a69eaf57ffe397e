//! Per-channel output coalescing.
//!
//! This module reduces callback frequency for high-frequency, same-channel
//! text events by batching them into time-windowed flushes while preserving
//! arrival order within and across flushes for a given channel.

mod bufferer;
mod source;

pub use bufferer::{ChannelBufferer, ChannelId, DEFAULT_THROTTLE};
pub use source::{ProcessData, TextEvent};

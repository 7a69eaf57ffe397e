//! The channel bufferer: timer-bounded coalescing of output bursts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::trace;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use super::source::TextEvent;
use crate::lifecycle::Subscription;

/// Integer id of an independent output stream (e.g. one terminal session).
pub type ChannelId = u64;

/// Default coalescing window.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(5);

/// Pending state for one channel.
///
/// Exists only while unflushed data is pending: created on the first
/// fragment after a flush, removed from the registry on flush. At most one
/// buffer (and therefore one armed timer) exists per channel.
struct ChannelBuffer {
    /// Fragments in arrival order.
    data: Vec<String>,

    /// The one-shot flush timer armed when the buffer was created.
    timer: JoinHandle<()>,
}

struct Shared {
    /// Registry of pending buffers, keyed by channel id.
    buffers: Mutex<HashMap<ChannelId, ChannelBuffer>>,

    /// Invoked once per flush with the concatenated batch.
    callback: Box<dyn Fn(ChannelId, String) + Send + Sync>,
}

impl Shared {
    /// Append a fragment, arming the flush timer if this is the first
    /// fragment since the last flush.
    fn append(self: &Arc<Self>, id: ChannelId, text: String, throttle: Duration) {
        let mut buffers = self.buffers.lock().unwrap();
        if let Some(buffer) = buffers.get_mut(&id) {
            buffer.data.push(text);
            return;
        }

        trace!("channel {id}: buffering started, flush in {throttle:?}");
        let shared = Arc::clone(self);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(throttle).await;
            shared.flush(id);
        });
        buffers.insert(
            id,
            ChannelBuffer {
                data: vec![text],
                timer,
            },
        );
    }

    /// Flush the channel's pending batch, if any.
    ///
    /// Removing the registry entry before delivery makes the operation
    /// idempotent: a timer firing after an explicit flush finds nothing.
    /// The callback runs while the registry is locked, which serializes
    /// flushes and keeps batches in arrival order even when timers fire on
    /// different worker threads.
    fn flush(&self, id: ChannelId) {
        let mut buffers = self.buffers.lock().unwrap();
        if let Some(buffer) = buffers.remove(&id) {
            buffer.timer.abort();
            let text = buffer.data.concat();
            trace!("channel {id}: flushing {} bytes", text.len());
            (self.callback)(id, text);
        }
    }

    fn flush_all(&self) {
        let mut buffers = self.buffers.lock().unwrap();
        for (id, buffer) in buffers.drain() {
            buffer.timer.abort();
            let text = buffer.data.concat();
            trace!("channel {id}: flushing {} bytes on dispose", text.len());
            (self.callback)(id, text);
        }
    }
}

/// Coalesces bursts of same-channel text fragments into batched callback
/// invocations, bounded by a per-channel idle timer.
///
/// Fragments for one channel are delivered in exact arrival order, within
/// and across flushes; fragments from different channels never mix into a
/// single invocation.
///
/// The flush callback is invoked synchronously with the internal registry
/// locked, so it must not call back into the same bufferer.
///
/// # Example
///
/// ```rust,no_run
/// # use std::time::Duration;
/// # use chanbuf::ChannelBufferer;
/// # use tokio::sync::mpsc;
/// # async fn example() {
/// let bufferer = ChannelBufferer::new(|id, text| println!("{id}: {text}"));
/// let (tx, rx) = mpsc::unbounded_channel::<String>();
/// let sub = bufferer.start_buffering(1, rx, chanbuf::DEFAULT_THROTTLE);
/// tx.send("chunk".into()).unwrap();
/// # }
/// ```
pub struct ChannelBufferer {
    shared: Arc<Shared>,
}

impl ChannelBufferer {
    /// Create a bufferer delivering flushed batches to `callback`.
    pub fn new(callback: impl Fn(ChannelId, String) + Send + Sync + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                buffers: Mutex::new(HashMap::new()),
                callback: Box::new(callback),
            }),
        }
    }

    /// Begin buffering fragments from `source` under `id`.
    ///
    /// Each received event appends its text to the channel's pending buffer;
    /// the first fragment after a flush arms a one-shot timer that flushes
    /// the channel `throttle` later ([`DEFAULT_THROTTLE`] is the
    /// conventional window).
    ///
    /// Canceling (or dropping) the returned subscription stops listening to
    /// the source, cancels any pending timer for the channel, and performs a
    /// final flush of whatever is buffered. The final flush is at-most-once
    /// and idempotent with an explicit [`flush`](Self::flush). Call
    /// [`Subscription::detach`] to keep listening for as long as the source
    /// stays open.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_buffering<E: TextEvent>(
        &self,
        id: ChannelId,
        mut source: UnboundedReceiver<E>,
        throttle: Duration,
    ) -> Subscription {
        let shared = Arc::clone(&self.shared);
        let listener = tokio::spawn(async move {
            while let Some(event) = source.recv().await {
                shared.append(id, event.into_text(), throttle);
            }
            trace!("channel {id}: source closed");
        });

        let shared = Arc::clone(&self.shared);
        Subscription::new(move || {
            listener.abort();
            shared.flush(id);
        })
    }

    /// Cancel the channel's pending timer and flush immediately.
    ///
    /// No-op when the channel has nothing pending.
    pub fn stop_buffering(&self, id: ChannelId) {
        self.shared.flush(id);
    }

    /// Flush the channel's pending batch, invoking the callback with the
    /// fragments joined in arrival order with no separator.
    ///
    /// Idempotent: flushing a channel with no pending buffer is a no-op and
    /// never double-delivers.
    pub fn flush(&self, id: ChannelId) {
        self.shared.flush(id);
    }

    /// Flush and remove every outstanding buffer. Used for shutdown; also
    /// runs when the bufferer is dropped.
    pub fn dispose_all(&self) {
        self.shared.flush_all();
    }

    /// Whether the channel currently has unflushed fragments.
    pub fn has_pending(&self, id: ChannelId) -> bool {
        self.shared.buffers.lock().unwrap().contains_key(&id)
    }

    /// Number of channels with unflushed fragments.
    pub fn pending_channels(&self) -> usize {
        self.shared.buffers.lock().unwrap().len()
    }
}

impl Drop for ChannelBufferer {
    fn drop(&mut self) {
        self.shared.flush_all();
    }
}

impl std::fmt::Debug for ChannelBufferer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelBufferer")
            .field("pending_channels", &self.pending_channels())
            .finish()
    }
}

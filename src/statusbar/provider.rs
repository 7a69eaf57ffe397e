//! Status-bar item shapes and the provider trait.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::event::Emitter;

/// Which side of the status bar an item docks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBarAlignment {
    Left,
    Right,
}

/// A single contributed status-bar item.
///
/// Rendering is owned by the host; this is pure data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBarItem {
    /// Label shown in the status bar.
    pub text: String,

    /// Docking side.
    pub alignment: StatusBarAlignment,

    /// Hover tooltip.
    pub tooltip: Option<String>,

    /// Command id to run when the item is activated.
    pub command: Option<String>,

    /// Ordering hint among items on the same side (higher shows first).
    pub priority: Option<i32>,
}

impl StatusBarItem {
    /// Create an item with just a label and alignment.
    pub fn new(text: impl Into<String>, alignment: StatusBarAlignment) -> Self {
        Self {
            text: text.into(),
            alignment,
            tooltip: None,
            command: None,
            priority: None,
        }
    }

    /// Attach a hover tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Attach an activation command.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Attach an ordering priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// One provider's contribution for a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarItemList {
    /// The contributed items; empty when the provider had nothing to say
    /// (or failed and was swallowed by the service).
    pub items: Vec<StatusBarItem>,
}

/// Contributes status-bar items for cells of a given view type.
///
/// Register implementations on a [`StatusBarService`](super::StatusBarService).
#[async_trait]
pub trait StatusBarItemProvider: Send + Sync {
    /// The view type this provider targets; `"*"` matches every view type.
    fn view_type(&self) -> &str;

    /// Event fired when this provider's items become stale.
    ///
    /// The service re-broadcasts it as its items-changed event for as long
    /// as the provider stays registered. Providers with static items return
    /// `None`.
    fn changes(&self) -> Option<&Emitter<()>> {
        None
    }

    /// Compute the items for `cell_index` of the document identified by
    /// `doc`.
    ///
    /// The document id is opaque to this crate. Implementations should bail
    /// out early when `token` is canceled.
    async fn provide_items(
        &self,
        doc: &str,
        cell_index: usize,
        token: &CancellationToken,
    ) -> Result<Vec<StatusBarItem>>;
}

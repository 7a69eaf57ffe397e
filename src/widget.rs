//! Widget surface for host frontends.
//!
//! A widget is an attachable overlay identified by a stable id. Rendering
//! belongs to the host; this module only tracks attachment and enforces the
//! one-widget-per-id rule.

use std::collections::HashMap;

use log::debug;

/// An attachable overlay element with a stable id.
///
/// Only one widget of each id can be attached at once; attaching another
/// widget under the same id replaces the previous one.
pub trait Widget<C>: Send {
    /// Stable identifier; uniqueness is enforced per [`WidgetSet`].
    fn id(&self) -> &str;

    /// Attach to the host container.
    fn attach(&mut self, container: &mut C);

    /// Detach from the host container. Called before the widget is replaced
    /// or the set is disposed.
    fn detach(&mut self, container: &mut C);
}

/// Owns the attached widgets for one container, at most one per id.
pub struct WidgetSet<C> {
    widgets: HashMap<String, Box<dyn Widget<C>>>,
}

impl<C> WidgetSet<C> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            widgets: HashMap::new(),
        }
    }

    /// Attach a widget, replacing (and detaching) any widget already
    /// attached under the same id.
    pub fn attach(&mut self, mut widget: Box<dyn Widget<C>>, container: &mut C) {
        let id = widget.id().to_string();
        if let Some(mut previous) = self.widgets.remove(&id) {
            debug!("widget '{id}': replacing attached instance");
            previous.detach(container);
        }
        widget.attach(container);
        self.widgets.insert(id, widget);
    }

    /// Detach and drop the widget with `id`, if attached.
    pub fn detach(&mut self, id: &str, container: &mut C) {
        if let Some(mut widget) = self.widgets.remove(id) {
            widget.detach(container);
        }
    }

    /// Detach and drop every attached widget.
    pub fn dispose_all(&mut self, container: &mut C) {
        for (_, mut widget) in self.widgets.drain() {
            widget.detach(container);
        }
    }

    /// Whether a widget with `id` is attached.
    pub fn contains(&self, id: &str) -> bool {
        self.widgets.contains_key(id)
    }

    /// Number of attached widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether no widgets are attached.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl<C> Default for WidgetSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A container recording attach/detach calls.
    #[derive(Default)]
    struct FakeContainer {
        events: Vec<String>,
    }

    struct FakeWidget {
        id: String,
        tag: String,
    }

    impl Widget<FakeContainer> for FakeWidget {
        fn id(&self) -> &str {
            &self.id
        }

        fn attach(&mut self, container: &mut FakeContainer) {
            container.events.push(format!("attach {}", self.tag));
        }

        fn detach(&mut self, container: &mut FakeContainer) {
            container.events.push(format!("detach {}", self.tag));
        }
    }

    fn widget(id: &str, tag: &str) -> Box<dyn Widget<FakeContainer>> {
        Box::new(FakeWidget {
            id: id.into(),
            tag: tag.into(),
        })
    }

    #[test]
    fn test_attach_and_detach() {
        let mut container = FakeContainer::default();
        let mut set = WidgetSet::new();

        set.attach(widget("hover", "w1"), &mut container);
        assert!(set.contains("hover"));
        assert_eq!(set.len(), 1);

        set.detach("hover", &mut container);
        assert!(set.is_empty());
        assert_eq!(container.events, vec!["attach w1", "detach w1"]);
    }

    #[test]
    fn test_same_id_replaces_previous() {
        let mut container = FakeContainer::default();
        let mut set = WidgetSet::new();

        set.attach(widget("hover", "w1"), &mut container);
        set.attach(widget("hover", "w2"), &mut container);

        assert_eq!(set.len(), 1);
        assert_eq!(container.events, vec!["attach w1", "detach w1", "attach w2"]);
    }

    #[test]
    fn test_dispose_all_detaches_everything() {
        let mut container = FakeContainer::default();
        let mut set = WidgetSet::new();

        set.attach(widget("hover", "w1"), &mut container);
        set.attach(widget("find", "w2"), &mut container);
        set.dispose_all(&mut container);

        assert!(set.is_empty());
        assert_eq!(
            container
                .events
                .iter()
                .filter(|e| e.starts_with("detach"))
                .count(),
            2
        );
    }

    #[test]
    fn test_detach_missing_id_is_noop() {
        let mut container = FakeContainer::default();
        let mut set: WidgetSet<FakeContainer> = WidgetSet::new();
        set.detach("absent", &mut container);
        assert!(container.events.is_empty());
    }
}

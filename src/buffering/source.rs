//! Input event shapes accepted by the bufferer.

/// An event that carries a text fragment for one channel.
///
/// Sources either emit plain strings or structured events with a data
/// payload. Resolving the shape statically through this trait keeps the
/// bufferer free of runtime type branches: a source that emits neither
/// simply does not compile.
pub trait TextEvent: Send + 'static {
    /// Consume the event, yielding its text fragment.
    fn into_text(self) -> String;
}

impl TextEvent for String {
    fn into_text(self) -> String {
        self
    }
}

impl TextEvent for &'static str {
    fn into_text(self) -> String {
        self.to_string()
    }
}

/// A structured output event from a process-like source.
#[derive(Debug, Clone)]
pub struct ProcessData {
    /// The text payload.
    pub data: String,
}

impl ProcessData {
    /// Create a process data event from a text payload.
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

impl TextEvent for ProcessData {
    fn into_text(self) -> String {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_shapes_yield_text() {
        assert_eq!("plain".to_string().into_text(), "plain");
        assert_eq!("literal".into_text(), "literal");
        assert_eq!(ProcessData::new("structured").into_text(), "structured");
    }
}

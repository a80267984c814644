use chall_core::ComposeError;
use yaml_rust2::parser::{Event, EventReceiver, Parser};

#[derive(Default)]
struct EventCollector {
    events: Vec<Event>,
}

impl EventReceiver for EventCollector {
    fn on_event(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// Tokenizes the raw document into its structural event sequence. Scanner
/// failures surface as `ComposeError::Parse`; only the first document of a
/// multi-document stream is read.
pub fn scan_events(input: &str) -> Result<Vec<Event>, ComposeError> {
    let mut parser = Parser::new_from_str(input);
    let mut collector = EventCollector::default();
    parser
        .load(&mut collector, false)
        .map_err(|error| ComposeError::parse(error.to_string()))?;
    Ok(collector.events)
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;

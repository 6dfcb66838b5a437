//! In-memory capture of log events for test assertions

use insidertrack_core_types::schema::{FIELD_ENTITY_KEY, FIELD_EVENT, FIELD_OP};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

type EventBuffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// One recorded event, every field rendered as a string
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    pub entity_key: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn from_fields(level: Level, fields: HashMap<String, String>) -> Self {
        Self {
            level,
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            entity_key: fields.get(FIELD_ENTITY_KEY).cloned(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Strings are kept verbatim; everything else goes through `Debug`,
/// which renders integers and booleans plainly.
struct StringFields(HashMap<String, String>);

impl Visit for StringFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

struct CaptureLayer {
    buffer: EventBuffer,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = StringFields(HashMap::new());
        event.record(&mut fields);
        let captured = CapturedEvent::from_fields(*event.metadata().level(), fields.0);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(captured);
        }
    }
}

/// Shared view of everything captured so far
#[derive(Clone)]
pub struct TestCapture {
    buffer: EventBuffer,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Events for one operation on one entity, in emission order.
    ///
    /// Tests run in parallel against a shared global capture, so assertions
    /// should always filter by a key unique to the test.
    pub fn events_for(&self, op: &str, entity_key: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op.as_deref() == Some(op) && e.entity_key.as_deref() == Some(entity_key))
            .collect()
    }

    /// First event with the given `op` and `event` values
    pub fn find(&self, op: &str, event: &str) -> Option<CapturedEvent> {
        self.events()
            .into_iter()
            .find(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(event))
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber on first use and
/// return a handle to the shared buffer.
///
/// ```
/// use insidertrack_core::logging_facility::test_capture::init_test_capture;
/// use insidertrack_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_example_op");
/// assert!(capture.find("doc_example_op", "start").is_some());
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let buffer = EventBuffer::default();
            tracing_subscriber::registry()
                .with(CaptureLayer {
                    buffer: Arc::clone(&buffer),
                })
                .init();
            TestCapture { buffer }
        })
        .clone()
}

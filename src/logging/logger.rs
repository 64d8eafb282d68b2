use bitflags::bitflags;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

bitflags! {
    /// Selects which spans the console listener reports when
    /// [`crate::ParseOptions::debug`] is on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DebugLogsCategories: u32 {
        const NONE          = 0;
        const ITEMS         = 1 << 1;
        const PROPERTIES    = 1 << 2;
        const IMPLIED       = 1 << 3;
        const VALUE_CLASS   = 1 << 4;
        const RELATIONSHIPS = 1 << 5;
        const ALL           = u32::MAX;
    }
}

/// Observer interface for performance-span events.  Implement this trait
/// and wrap it in a [`Listener`] to receive timing data from the resolver.
///
/// All methods are called synchronously from the parsing code; keep
/// them lightweight.
pub trait PerfListener {
    /// Return whether this listener cares about the given span.  If `false`,
    /// none of the other callbacks will fire for that span.
    fn is_interested_in_span(&self, span_id: u64) -> bool;
    fn on_span_start(&self, span_id: u64, start_time: Instant);
    fn on_check_point(
        &self,
        span_id: u64,
        point_time: Instant,
        duration_since_last_checkpoint: Duration,
        label: &str,
    );
    fn on_annotate(&self, span_id: u64, annotation: &str);
    fn on_span_end(&self, span_id: u64, span_duration: Duration);
}

/// A clonable, reference-counted wrapper around a [`PerfListener`].
#[derive(Clone)]
pub struct Listener {
    inner_impl: Rc<dyn PerfListener>,
}

impl Listener {
    pub fn new(listener: Rc<dyn PerfListener>) -> Listener {
        Listener {
            inner_impl: listener,
        }
    }
}

impl Deref for Listener {
    type Target = dyn PerfListener;
    fn deref(&self) -> &Self::Target {
        &*self.inner_impl
    }
}

struct PerfEvent {
    start_time: Instant,
    last_point: Option<Instant>,
    // Item resolution recurses; a span re-entered while open only bumps the depth.
    depth: usize,
    listeners: Vec<Listener>,
}

/// Tracks in-flight performance spans and fans events out to registered
/// [`Listener`]s.
///
/// **Not `Send` or `Sync`**: the internal event map uses `RefCell`.  Each
/// [`crate::Resolver`] owns its own `PerfLogger`.
pub struct PerfLogger {
    events: RefCell<HashMap<u64, PerfEvent>>,
    listeners: Vec<Listener>,
}

impl PerfLogger {
    /// Create a new logger with the given set of listeners.  An empty `Vec`
    /// disables all perf logging.
    pub fn new(listeners: Vec<Listener>) -> PerfLogger {
        PerfLogger {
            events: RefCell::new(HashMap::new()),
            listeners,
        }
    }

    pub fn start(&self, span_id: u64) {
        if let Some(event) = self.events.borrow_mut().get_mut(&span_id) {
            event.depth += 1;
            return;
        }
        let event_listeners = self
            .listeners
            .iter()
            .filter(|l| l.is_interested_in_span(span_id))
            .cloned()
            .collect::<Vec<_>>();
        if event_listeners.is_empty() {
            return;
        }
        let start_time = Instant::now();
        event_listeners
            .iter()
            .for_each(|l| l.on_span_start(span_id, start_time));
        self.events.borrow_mut().insert(
            span_id,
            PerfEvent {
                start_time,
                last_point: None,
                depth: 1,
                listeners: event_listeners,
            },
        );
    }

    pub fn check_point(&self, span_id: u64, label: &str) {
        if let Some(event) = self.events.borrow_mut().get_mut(&span_id) {
            let now = Instant::now();
            let since = now.duration_since(event.last_point.unwrap_or(event.start_time));
            event
                .listeners
                .iter()
                .for_each(|l| l.on_check_point(span_id, now, since, label));
            event.last_point = Some(now);
        }
    }

    /// Whether some listener is currently receiving events for the span.
    pub fn is_tracking(&self, span_id: u64) -> bool {
        self.events.borrow().contains_key(&span_id)
    }

    pub fn annotate(&self, span_id: u64, annotation: String) {
        if let Some(event) = self.events.borrow().get(&span_id) {
            event
                .listeners
                .iter()
                .for_each(|l| l.on_annotate(span_id, annotation.as_str()));
        }
    }

    /// End the span.  Listeners hear about it once the outermost entry of a
    /// re-entered span closes.
    pub fn end(&self, span_id: u64) {
        let mut events = self.events.borrow_mut();
        let finished = match events.get_mut(&span_id) {
            Some(event) => {
                event.depth -= 1;
                event.depth == 0
            }
            None => false,
        };
        if finished {
            if let Some(event) = events.remove(&span_id) {
                let duration = event.start_time.elapsed();
                event
                    .listeners
                    .iter()
                    .for_each(|l| l.on_span_end(span_id, duration));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl PerfListener for Recorder {
        fn is_interested_in_span(&self, span_id: u64) -> bool {
            span_id == 1
        }
        fn on_span_start(&self, span_id: u64, _start_time: Instant) {
            self.events.borrow_mut().push(format!("start {span_id}"));
        }
        fn on_check_point(&self, _span_id: u64, _t: Instant, _d: Duration, label: &str) {
            self.events.borrow_mut().push(format!("point {label}"));
        }
        fn on_annotate(&self, _span_id: u64, annotation: &str) {
            self.events.borrow_mut().push(format!("note {annotation}"));
        }
        fn on_span_end(&self, span_id: u64, _span_duration: Duration) {
            self.events.borrow_mut().push(format!("end {span_id}"));
        }
    }

    #[test]
    fn reentered_span_ends_once() {
        let recorder = Rc::new(Recorder::default());
        let logger = PerfLogger::new(vec![Listener::new(recorder.clone())]);
        logger.start(1);
        assert!(logger.is_tracking(1));
        logger.start(1);
        logger.annotate(1, "nested".to_string());
        logger.end(1);
        logger.check_point(1, "after-inner");
        logger.end(1);
        assert!(!logger.is_tracking(1));
        logger.start(2);
        assert!(!logger.is_tracking(2));
        logger.end(2);
        assert_eq!(
            *recorder.events.borrow(),
            vec!["start 1", "note nested", "point after-inner", "end 1"]
        );
    }
}

//! Thin wrappers around [`super::logger::PerfLogger`] that compile to a no-op
//! in release builds (guarded by `cfg!(debug_assertions)`).
//!
//! | Macro | Forwards to |
//! |---|---|
//! | `start_span!` | `PerfLogger::start` |
//! | `end_span!` | `PerfLogger::end` |
//! | `add_point_to_span!` | `PerfLogger::check_point` |
//! | `annotate_span!` | `PerfLogger::annotate` (formatted only while a listener tracks the span) |

macro_rules! start_span {
    ($logger:expr, $span_id:ident) => {
        if cfg!(debug_assertions) {
            $logger.start($span_id);
        }
    };
}

macro_rules! add_point_to_span {
    ($logger:expr, $span_id:ident, $point:expr) => {
        if cfg!(debug_assertions) {
            $logger.check_point($span_id, $point);
        }
    };
}

macro_rules! annotate_span {
    ($logger:expr, $span_id:ident, $($arg:tt)+) => {
        if cfg!(debug_assertions) && $logger.is_tracking($span_id) {
            $logger.annotate($span_id, format!($($arg)+));
        }
    };
}

macro_rules! end_span {
    ($logger:expr, $span_id:ident) => {
        if cfg!(debug_assertions) {
            $logger.end($span_id);
        }
    };
}

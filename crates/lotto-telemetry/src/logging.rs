//! Structured log macros.
//!
//! Every event carries a `subsystem` field (`generation`, `api`,
//! `scheduler`, `notification`, ...) so JSON logs can be filtered per
//! component.

/// Log an event with a subsystem tag.
///
/// ```rust,ignore
/// log_event!(info, "scheduler", "Next run scheduled", at = %next);
/// ```
#[macro_export]
macro_rules! log_event {
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a batch-related event with the batch id and size.
#[macro_export]
macro_rules! log_batch_event {
    ($level:ident, $subsystem:expr, $msg:expr, $batch:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            batch_id = %$batch.id,
            size = $batch.combinations.len(),
            $($($field)*,)?
            $msg
        )
    };
}

//! Structured log macros with consistent fields.
//!
//! - `subsystem`: subsystem identifier (`pw-02`, `runtime`, ...)
//! - `block_height` / `producer`: block-scoped context

/// Log with a `subsystem` field.
#[macro_export]
macro_rules! log_event {
    ($level:ident, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a block-related event with standard fields.
#[macro_export]
macro_rules! log_block_event {
    ($level:ident, $subsystem:expr, $msg:expr, $block_height:expr, $producer:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            block_height = $block_height,
            producer = %$producer,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a skipped height range with standard fields.
#[macro_export]
macro_rules! log_range_event {
    ($level:ident, $subsystem:expr, $msg:expr, $from:expr, $to:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            from_height = $from,
            to_height = $to,
            $($($field)*,)?
            $msg
        )
    };
}

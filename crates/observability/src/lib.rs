//! Tracing and logging (shared setup).

/// Initialize process-wide observability with an explicit output format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;

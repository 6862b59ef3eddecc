// Worker constants (no magic values)

/// Thread name prefix; worker `i` runs on `workpool-worker-<i>`
pub const WORKER_THREAD_PREFIX: &str = "workpool-worker";

/// Panic message used when the payload is neither `&str` nor `String`
pub const UNKNOWN_PANIC_MESSAGE: &str = "Unknown panic";

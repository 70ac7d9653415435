/// Classification for retry policy.
///
/// Determines how the retry executor responds to a failed attempt.
///
/// | Class | Behavior |
/// |-------|----------|
/// | `WithBackoff` | Sleep (exponential + jitter), then retry |
/// | `Never` | Short-circuit without consuming remaining budget |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Transient failure - retry with exponential backoff.
    ///
    /// Covers connection errors, timeouts, rate limiting (429) and
    /// unexpected server statuses. Rate limits are logged distinctly
    /// but follow the same backoff schedule.
    WithBackoff,

    /// Terminal failure - never retry.
    ///
    /// The request is fundamentally unanswerable (404, unknown symbol,
    /// malformed payload). Callers that want a category switch or an
    /// alias attempt handle it at their own layer.
    Never,
}

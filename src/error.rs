use thiserror::Error;

/// Error taxonomy for one move decision. Fail-fast: no error is swallowed
/// and replaced by a fabricated move.
#[derive(Error, Debug)]
pub enum BotError {
    /// Engine process unreachable, crashed, or produced unusable output.
    /// Fatal for the session after one reconnect attempt.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Engine exceeded the per-call analysis budget. Retried once, then
    /// fatal for this move only.
    #[error("engine exceeded analysis time budget")]
    EngineTimeout,

    /// The position has no legal moves; evaluating it is a caller bug.
    #[error("position is terminal (no legal moves)")]
    TerminalPosition,

    /// Empty candidate list handed to the humanizer; contract violation
    /// between evaluator and caller.
    #[error("no candidates to select from")]
    NoCandidates,

    /// Caller abandoned an in-flight analysis via a cancel token.
    #[error("analysis cancelled by caller")]
    Cancelled,
}

//! Engine error taxonomy.

/// Errors surfaced by the game engine and riddle acquisition.
///
/// Failures from the riddle source and answer judge arrive as typed values
/// and never corrupt scores or round bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// The remote service could not be reached or refused the call.
    #[display("Service unavailable: {}", _0)]
    SourceUnavailable(String),

    /// A service response arrived but its shape could not be understood.
    #[display("Malformed service response: {}", _0)]
    MalformedResponse(String),

    /// Acquisition ran out of attempts without finding a fresh riddle.
    #[display("Could not obtain a unique riddle after {} attempts", _0)]
    DuplicateExhausted(u32),

    /// An intent was raised in a state that does not permit it.
    #[display("Invalid state transition: {}", _0)]
    InvalidStateTransition(String),
}

impl std::error::Error for GameError {}

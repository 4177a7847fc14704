//! Bounded-attempt riddle acquisition.

use crate::cache::{SeenRegistry, SessionSeen};
use crate::error::GameError;
use crate::riddle::Riddle;
use crate::source::{RiddleSource, ServiceError};
use tracing::{debug, info, instrument, warn};

/// How an acquisition attempt ended.
enum Attempt {
    /// A fresh, well-formed riddle.
    Accept(Riddle),
    /// The attempt is consumed and the loop should try again.
    Retry(Failure),
}

/// Why an attempt was consumed without producing a riddle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    /// The source could not be reached.
    Transport,
    /// The response arrived but did not look like a riddle.
    Malformed,
    /// The riddle resembles one already played.
    Duplicate,
}

/// Fetches a riddle the session has not seen before.
///
/// Makes up to `max_attempts` calls to the source. Malformed payloads,
/// duplicates, and transport failures each consume an attempt without
/// surfacing; the first fresh, well-formed riddle is recorded in both seen
/// scopes and returned. When every attempt is consumed the error reflects
/// the last failure: [`GameError::SourceUnavailable`] if the source itself
/// failed, otherwise [`GameError::DuplicateExhausted`].
#[instrument(skip(source, seen, registry), fields(session_id = %session_id))]
pub async fn acquire(
    source: &dyn RiddleSource,
    session_id: &str,
    seen: &mut SessionSeen,
    registry: &SeenRegistry,
    max_attempts: u32,
) -> Result<Riddle, GameError> {
    let mut last_failure = Failure::Duplicate;
    for attempt in 1..=max_attempts {
        debug!(attempt, max_attempts, "Requesting riddle");
        match classify(source.fetch(session_id).await, seen, registry) {
            Attempt::Accept(riddle) => {
                registry.record(&riddle, seen);
                info!(attempt, "Acquired fresh riddle");
                return Ok(riddle);
            }
            Attempt::Retry(failure) => {
                warn!(attempt, ?failure, "Attempt consumed");
                last_failure = failure;
            }
        }
    }

    warn!(max_attempts, ?last_failure, "Acquisition attempts exhausted");
    match last_failure {
        Failure::Transport => Err(GameError::SourceUnavailable(format!(
            "riddle source failed on all {} attempts",
            max_attempts
        ))),
        Failure::Malformed | Failure::Duplicate => {
            Err(GameError::DuplicateExhausted(max_attempts))
        }
    }
}

/// Sorts one source response into accept-or-retry.
fn classify(
    response: Result<crate::riddle::FetchedRiddle, ServiceError>,
    seen: &SessionSeen,
    registry: &SeenRegistry,
) -> Attempt {
    let fetched = match response {
        Ok(fetched) => fetched,
        Err(ServiceError::Unavailable(message)) => {
            debug!(%message, "Source unavailable");
            return Attempt::Retry(Failure::Transport);
        }
        Err(ServiceError::Malformed(message)) => {
            debug!(%message, "Source reply malformed");
            return Attempt::Retry(Failure::Malformed);
        }
    };

    let riddle = match fetched.validate() {
        Ok(riddle) => riddle,
        Err(problem) => {
            debug!(%problem, "Riddle payload failed shape check");
            return Attempt::Retry(Failure::Malformed);
        }
    };

    if registry.is_duplicate(&riddle, seen) {
        return Attempt::Retry(Failure::Duplicate);
    }
    Attempt::Accept(riddle)
}

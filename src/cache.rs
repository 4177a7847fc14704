//! Riddle uniqueness tracking within and across sessions.

use crate::riddle::Riddle;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

/// Normalized fingerprint of a riddle, used only for duplicate checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RiddleKey {
    /// Lowercased, trimmed answer.
    answer: String,
    /// Lowercased riddle text.
    text: String,
}

impl RiddleKey {
    /// Builds the fingerprint for a riddle.
    pub fn new(riddle: &Riddle) -> Self {
        Self {
            answer: riddle.answer().trim().to_lowercase(),
            text: riddle.text().trim().to_lowercase(),
        }
    }

    /// Whether two fingerprints are close enough to count as the same riddle.
    ///
    /// Matches equal answers, or riddle text contained in either direction.
    /// Deliberately permissive: a false positive costs one retry, a false
    /// negative shows a player a repeat.
    fn resembles(&self, other: &RiddleKey) -> bool {
        self.answer == other.answer
            || self.text.contains(&other.text)
            || other.text.contains(&self.text)
    }
}

/// Riddle fingerprints already played within a single session.
pub type SessionSeen = HashSet<RiddleKey>;

/// Process-wide registry of every riddle handed out since startup.
///
/// Shared across sessions and never evicted. Restarting a session keeps
/// the registry, so a new game still avoids riddles from earlier games.
#[derive(Debug, Clone)]
pub struct SeenRegistry {
    seen: Arc<Mutex<HashSet<RiddleKey>>>,
}

impl SeenRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Checks a candidate against the session set and the registry.
    ///
    /// The session set is matched exactly; registry entries are matched by
    /// [`RiddleKey::resembles`].
    #[instrument(skip(self, riddle, session))]
    pub fn is_duplicate(&self, riddle: &Riddle, session: &SessionSeen) -> bool {
        let key = RiddleKey::new(riddle);
        if session.contains(&key) {
            debug!("Riddle already played this session");
            return true;
        }
        let seen = self.seen.lock().unwrap();
        let duplicate = seen.iter().any(|prior| prior.resembles(&key));
        if duplicate {
            debug!("Riddle resembles an earlier one");
        }
        duplicate
    }

    /// Records a riddle in both the session set and the registry.
    #[instrument(skip(self, riddle, session))]
    pub fn record(&self, riddle: &Riddle, session: &mut SessionSeen) {
        let key = RiddleKey::new(riddle);
        session.insert(key.clone());
        let mut seen = self.seen.lock().unwrap();
        seen.insert(key);
        debug!(registry_size = seen.len(), "Recorded riddle fingerprint");
    }

    /// Number of riddles recorded since startup.
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Whether no riddle has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SeenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

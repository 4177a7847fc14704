//! Acquisition loop tests with a scripted riddle source.

use riddle_rally::{
    FetchedRiddle, GameError, Riddle, RiddleSource, SeenRegistry, ServiceError, SessionSeen,
    acquire,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Source replaying a fixed script of responses.
struct ScriptedSource {
    replies: Mutex<VecDeque<Result<FetchedRiddle, ServiceError>>>,
}

impl ScriptedSource {
    fn new(replies: Vec<Result<FetchedRiddle, ServiceError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    fn calls_remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RiddleSource for ScriptedSource {
    async fn fetch(&self, _session_id: &str) -> Result<FetchedRiddle, ServiceError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted")
    }
}

fn clues() -> Vec<String> {
    vec![
        "one".to_string(),
        "two".to_string(),
        "three".to_string(),
        "four".to_string(),
    ]
}

fn fetched(text: &str, answer: &str) -> FetchedRiddle {
    FetchedRiddle::new(text.to_string(), answer.to_string(), clues())
}

fn played(text: &str, answer: &str) -> Riddle {
    Riddle::new(
        text.to_string(),
        answer.to_string(),
        [
            "one".to_string(),
            "two".to_string(),
            "three".to_string(),
            "four".to_string(),
        ],
    )
}

#[tokio::test]
async fn test_fresh_riddle_accepted_first_try() {
    let source = ScriptedSource::new(vec![Ok(fetched("What runs but never walks?", "river"))]);
    let registry = SeenRegistry::new();
    let mut seen = SessionSeen::new();

    let riddle = acquire(&source, "s1", &mut seen, &registry, 3)
        .await
        .expect("acquisition succeeds");

    assert_eq!(riddle.answer(), "river");
    assert_eq!(seen.len(), 1, "recorded in the session set");
    assert_eq!(registry.len(), 1, "recorded in the registry");
}

#[tokio::test]
async fn test_duplicates_skipped_within_bound() {
    // History already holds riddle A; the source offers A twice before B.
    let registry = SeenRegistry::new();
    let mut seen = SessionSeen::new();
    registry.record(&played("A", "echo"), &mut seen);

    let source = ScriptedSource::new(vec![
        Ok(fetched("A", "echo")),
        Ok(fetched("A", "echo")),
        Ok(fetched("What has a bed but never sleeps?", "ocean")),
    ]);

    let riddle = acquire(&source, "s1", &mut seen, &registry, 3)
        .await
        .expect("third attempt succeeds");
    assert_eq!(riddle.answer(), "ocean");
    assert_eq!(source.calls_remaining(), 0, "all three attempts were used");
}

#[tokio::test]
async fn test_all_duplicates_exhausts_attempts() {
    let registry = SeenRegistry::new();
    let mut seen = SessionSeen::new();
    registry.record(&played("A", "echo"), &mut seen);

    let source = ScriptedSource::new(vec![
        Ok(fetched("A", "echo")),
        Ok(fetched("A", "echo")),
        Ok(fetched("A", "echo")),
    ]);

    let result = acquire(&source, "s1", &mut seen, &registry, 3).await;
    assert!(matches!(result, Err(GameError::DuplicateExhausted(3))));
    assert_eq!(registry.len(), 1, "nothing new recorded");
}

#[tokio::test]
async fn test_malformed_payload_consumes_attempt() {
    let mut short = clues();
    short.pop();
    let source = ScriptedSource::new(vec![
        Ok(FetchedRiddle::new("Missing a clue".to_string(), "gap".to_string(), short)),
        Ok(fetched("What gets wetter as it dries?", "towel")),
    ]);
    let registry = SeenRegistry::new();
    let mut seen = SessionSeen::new();

    let riddle = acquire(&source, "s1", &mut seen, &registry, 3)
        .await
        .expect("second attempt succeeds");
    assert_eq!(riddle.answer(), "towel");
    assert_eq!(source.calls_remaining(), 0);
}

#[tokio::test]
async fn test_transport_failure_consumes_attempt() {
    let source = ScriptedSource::new(vec![
        Err(ServiceError::Unavailable("timeout".to_string())),
        Ok(fetched("What gets wetter as it dries?", "towel")),
    ]);
    let registry = SeenRegistry::new();
    let mut seen = SessionSeen::new();

    let riddle = acquire(&source, "s1", &mut seen, &registry, 3)
        .await
        .expect("second attempt succeeds");
    assert_eq!(riddle.answer(), "towel");
}

#[tokio::test]
async fn test_terminal_transport_failure_reports_unavailable() {
    let registry = SeenRegistry::new();
    let mut seen = SessionSeen::new();
    registry.record(&played("A", "echo"), &mut seen);

    let source = ScriptedSource::new(vec![
        Ok(fetched("A", "echo")),
        Err(ServiceError::Unavailable("timeout".to_string())),
    ]);

    let result = acquire(&source, "s1", &mut seen, &registry, 2).await;
    assert!(matches!(result, Err(GameError::SourceUnavailable(_))));
}

#[tokio::test]
async fn test_terminal_duplicate_reports_exhausted_despite_earlier_transport_failure() {
    let registry = SeenRegistry::new();
    let mut seen = SessionSeen::new();
    registry.record(&played("A", "echo"), &mut seen);

    let source = ScriptedSource::new(vec![
        Err(ServiceError::Unavailable("timeout".to_string())),
        Ok(fetched("A", "echo")),
    ]);

    let result = acquire(&source, "s1", &mut seen, &registry, 2).await;
    assert!(matches!(result, Err(GameError::DuplicateExhausted(2))));
}

#[tokio::test]
async fn test_session_repeat_rejected_by_exact_key() {
    // Same riddle served again within one session is caught by the
    // session set even with an empty registry lookup path.
    let registry = SeenRegistry::new();
    let mut seen = SessionSeen::new();

    let first = acquire(
        &ScriptedSource::new(vec![Ok(fetched("What runs but never walks?", "river"))]),
        "s1",
        &mut seen,
        &registry,
        3,
    )
    .await
    .expect("first acquisition succeeds");
    assert_eq!(first.answer(), "river");

    let repeat = acquire(
        &ScriptedSource::new(vec![
            Ok(fetched("What runs but never walks?", "river")),
            Ok(fetched("What runs but never walks?", "river")),
            Ok(fetched("What runs but never walks?", "river")),
        ]),
        "s1",
        &mut seen,
        &registry,
        3,
    )
    .await;
    assert!(matches!(repeat, Err(GameError::DuplicateExhausted(3))));
}

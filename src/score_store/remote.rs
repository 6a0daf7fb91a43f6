//! HTTP score backend
//!
//! Wire format:
//! - `GET {url}?action=getScores` returns `{"scores": [{"name": .., "score": ..}, ..]}`
//! - `POST {url}` with `{"action": "saveScore", "name": .., "score": ..}` returns the same shape

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_GUEST_NAME;
use crate::highscores::{HighScores, ScoreEntry, player_name_or};
use crate::platform::HttpTransport;

use super::{ScoreStore, StoreError};

#[derive(Debug, Deserialize)]
struct ScoresResponse {
    #[serde(default)]
    scores: Vec<ScoreEntry>,
}

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    action: &'static str,
    name: &'a str,
    score: u32,
}

/// Leaderboard held by a remote web service
#[derive(Debug, Clone)]
pub struct RemoteScoreStore<T> {
    transport: T,
    url: String,
    guest_name: String,
}

impl<T: HttpTransport> RemoteScoreStore<T> {
    pub fn new(transport: T, url: &str) -> Self {
        Self::with_guest(transport, url, DEFAULT_GUEST_NAME)
    }

    pub fn with_guest(transport: T, url: &str, guest_name: &str) -> Self {
        Self {
            transport,
            url: url.to_string(),
            guest_name: guest_name.to_string(),
        }
    }

    fn scores_url(&self) -> String {
        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}action=getScores", self.url, sep)
    }

    fn parse(&self, body: &str) -> Result<Vec<ScoreEntry>, StoreError> {
        let response: ScoresResponse =
            serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(HighScores::from_stored(response.scores, &self.guest_name).into_entries())
    }

    async fn fetch(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        let body = self.transport.get(&self.scores_url()).await?;
        self.parse(&body)
    }

    async fn submit(&self, name: &str, score: u32) -> Result<Vec<ScoreEntry>, StoreError> {
        let request = SaveRequest {
            action: "saveScore",
            name,
            score,
        };
        let payload = serde_json::to_string(&request).map_err(|e| StoreError::Encode(e.to_string()))?;
        let body = self.transport.post(&self.url, &payload).await?;
        self.parse(&body)
    }
}

impl<T: HttpTransport> ScoreStore for RemoteScoreStore<T> {
    async fn get_high_scores(&self) -> Vec<ScoreEntry> {
        match self.fetch().await {
            Ok(scores) => {
                log::debug!("Fetched {} remote high scores", scores.len());
                scores
            }
            Err(e) => {
                log::error!("Could not fetch scores from {}: {}", self.url, e);
                Vec::new()
            }
        }
    }

    async fn save_score(&self, name: &str, score: u32) -> Vec<ScoreEntry> {
        let name = player_name_or(name, &self.guest_name);
        match self.submit(&name, score).await {
            Ok(scores) => {
                log::info!("Saved score {} for {} remotely", score, name);
                scores
            }
            Err(e) => {
                log::error!("Could not save score to {}: {}", self.url, e);
                self.get_high_scores().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct StubTransport {
        get_reply: Option<Result<String, StoreError>>,
        post_reply: Option<Result<String, StoreError>>,
        calls: RefCell<Vec<String>>,
    }

    impl StubTransport {
        fn reply(slot: &Option<Result<String, StoreError>>) -> Result<String, StoreError> {
            slot.clone()
                .unwrap_or_else(|| Err(StoreError::Transport("offline".to_string())))
        }
    }

    impl HttpTransport for StubTransport {
        async fn get(&self, url: &str) -> Result<String, StoreError> {
            self.calls.borrow_mut().push(format!("GET {}", url));
            Self::reply(&self.get_reply)
        }

        async fn post(&self, url: &str, body: &str) -> Result<String, StoreError> {
            self.calls.borrow_mut().push(format!("POST {} {}", url, body));
            Self::reply(&self.post_reply)
        }
    }

    const URL: &str = "https://scores.example/exec";

    #[test]
    fn test_fetch_ranks_and_truncates() {
        let transport = StubTransport {
            get_reply: Some(Ok(r#"{"scores":[
                {"name":"a","score":1},{"name":"b","score":9},{"name":"c","score":4},
                {"name":"d","score":7},{"name":"e","score":2},{"name":"f","score":8}]}"#
                .to_string())),
            ..Default::default()
        };
        let store = RemoteScoreStore::new(transport, URL);
        let scores: Vec<u32> = block_on(store.get_high_scores()).iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 8, 7, 4, 2]);
        assert_eq!(
            store.transport.calls.borrow().as_slice(),
            ["GET https://scores.example/exec?action=getScores"]
        );
    }

    #[test]
    fn test_fetch_failure_is_empty() {
        let store = RemoteScoreStore::new(StubTransport::default(), URL);
        assert!(block_on(store.get_high_scores()).is_empty());

        let transport = StubTransport {
            get_reply: Some(Ok("<html>oops</html>".to_string())),
            ..Default::default()
        };
        let store = RemoteScoreStore::new(transport, URL);
        assert!(block_on(store.get_high_scores()).is_empty());
    }

    #[test]
    fn test_missing_scores_field_is_empty() {
        let transport = StubTransport {
            get_reply: Some(Ok("{}".to_string())),
            ..Default::default()
        };
        let store = RemoteScoreStore::new(transport, URL);
        assert!(block_on(store.get_high_scores()).is_empty());
    }

    #[test]
    fn test_save_posts_payload() {
        let transport = StubTransport {
            post_reply: Some(Ok(r#"{"scores":[{"name":"Guest","score":3}]}"#.to_string())),
            ..Default::default()
        };
        let store = RemoteScoreStore::new(transport, URL);
        let scores = block_on(store.save_score("", 3));
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].name, "Guest");
        assert_eq!(
            store.transport.calls.borrow().as_slice(),
            [r#"POST https://scores.example/exec {"action":"saveScore","name":"Guest","score":3}"#]
        );
    }

    #[test]
    fn test_save_failure_falls_back_to_fetch() {
        let transport = StubTransport {
            get_reply: Some(Ok(r#"{"scores":[{"name":"Ada","score":5}]}"#.to_string())),
            post_reply: Some(Err(StoreError::Http { status: 500 })),
            ..Default::default()
        };
        let store = RemoteScoreStore::new(transport, URL);
        let scores = block_on(store.save_score("Bo", 2));
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].name, "Ada");
        assert_eq!(store.transport.calls.borrow().len(), 2);
    }

    #[test]
    fn test_blank_and_missing_names_use_guest_label() {
        let transport = StubTransport {
            get_reply: Some(Ok(
                r#"{"scores":[{"name":"Ada","score":9},{"name":"","score":7},{"score":4}]}"#.to_string(),
            )),
            ..Default::default()
        };
        let store = RemoteScoreStore::with_guest(transport, URL, "Anon");
        let scores: Vec<(String, u32)> = block_on(store.get_high_scores())
            .into_iter()
            .map(|e| (e.name, e.score))
            .collect();
        assert_eq!(
            scores,
            vec![
                ("Ada".to_string(), 9),
                ("Anon".to_string(), 7),
                ("Anon".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_url_with_existing_query() {
        let store = RemoteScoreStore::new(StubTransport::default(), "https://x.example/exec?v=2");
        assert_eq!(store.scores_url(), "https://x.example/exec?v=2&action=getScores");
    }
}

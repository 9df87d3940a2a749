#[cfg(test)]
pub mod test_utils {
    use crate::config::GameConfig;
    use crate::game::{Grid, PuzzleEngine, WordBank, WordEntry};
    use crate::http_api::{create_router, ApiState};
    use crate::session_store::SessionStore;
    use axum::Router;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    /// Distinct words, none the reverse of another, all fitting a 10x10 grid.
    pub const TEST_BANK_WORDS: [&str; 18] = [
        "Igreja", "Missa", "Terço", "Oração", "Batismo", "Capela", "Altar", "Sino",
        "Vela", "Cruz", "Bíblia", "Padre", "Hóstia", "Cálice", "Pastoral", "Novena",
        "Romaria", "Catedral",
    ];

    /// Builds a grid from uppercase row strings, e.g. `["SOL", "XUX", "XXA"]`.
    pub fn create_test_grid(rows: &[&str]) -> Grid {
        Grid::from_rows(rows.iter().map(|row| row.chars().collect()).collect()).unwrap()
    }

    pub fn create_test_words(words: &[&str]) -> Vec<WordEntry> {
        words.iter().map(|word| WordEntry::new(word).unwrap()).collect()
    }

    /// Creates a temporary word bank data file holding `TEST_BANK_WORDS`
    pub fn create_test_word_bank_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        let contents = serde_json::json!({ "words": TEST_BANK_WORDS });
        write!(file, "{}", contents).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_test_word_bank() -> WordBank {
        WordBank::from_words(&TEST_BANK_WORDS).unwrap()
    }

    pub fn create_test_engine() -> PuzzleEngine {
        PuzzleEngine::new(create_test_word_bank(), GameConfig::default())
    }

    pub fn create_test_app() -> (ApiState, Router) {
        let store = SessionStore::new(1_000, Duration::from_secs(600));
        let state = ApiState::new(create_test_engine(), store);
        let app = create_router(state.clone());
        (state, app)
    }

    /// Helper for creating test HTTP requests
    pub fn create_test_request(
        method: axum::http::Method,
        uri: &str,
        body: Option<&str>,
    ) -> axum::http::Request<axum::body::Body> {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);

        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }

        builder
            .body(axum::body::Body::from(body.unwrap_or("").to_string()))
            .unwrap()
    }

    pub async fn read_json<T: serde::de::DeserializeOwned>(
        response: axum::http::Response<axum::body::Body>,
    ) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Helper for asserting JSON responses
    pub fn assert_json_response(
        response: &axum::http::Response<axum::body::Body>,
        expected_status: axum::http::StatusCode,
    ) {
        assert_eq!(response.status(), expected_status);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    pub fn create_test_error_response(message: &str) -> serde_json::Value {
        serde_json::json!({
            "error": message
        })
    }
}

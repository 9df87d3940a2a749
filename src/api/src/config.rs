use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::game::{Difficulty, DifficultySettings};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub word_bank_path: PathBuf,
    pub allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    pub max_request_size: usize,
    pub session_ttl: Duration,
    pub max_sessions: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub easy: DifficultySettings,
    pub medium: DifficultySettings,
    pub hard: DifficultySettings,
    pub default_difficulty: Difficulty,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            word_bank_path: PathBuf::from("data/word-search.json"),
            allowed_origins: vec!["http://localhost:5173".to_string()],
            request_timeout: Duration::from_secs(30),
            max_request_size: 64 * 1024,
            session_ttl: Duration::from_secs(60 * 60),
            max_sessions: 10_000,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            easy: DifficultySettings::preset(Difficulty::Easy),
            medium: DifficultySettings::preset(Difficulty::Medium),
            hard: DifficultySettings::preset(Difficulty::Hard),
            default_difficulty: Difficulty::default(),
        }
    }
}

impl GameConfig {
    pub fn settings(&self, difficulty: Difficulty) -> DifficultySettings {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    fn settings_mut(&mut self, difficulty: Difficulty) -> &mut DifficultySettings {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by every variable `lookup` returns that parses.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut server = ServerConfig::default();
        let mut game = GameConfig::default();

        if let Some(host) = lookup("SERVER_HOST") {
            server.host = host;
        }

        if let Some(port) = lookup("HTTP_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                server.port = port;
            }
        }

        if let Some(path) = lookup("WORD_BANK_PATH") {
            server.word_bank_path = PathBuf::from(path);
        }

        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            server.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(timeout) = lookup("REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                server.request_timeout = Duration::from_secs(seconds);
            }
        }

        if let Some(size) = lookup("MAX_REQUEST_SIZE") {
            if let Ok(bytes) = size.parse::<usize>() {
                server.max_request_size = bytes;
            }
        }

        if let Some(ttl) = lookup("SESSION_TTL") {
            if let Ok(seconds) = ttl.parse::<u64>() {
                server.session_ttl = Duration::from_secs(seconds);
            }
        }

        if let Some(max) = lookup("MAX_SESSIONS") {
            if let Ok(value) = max.parse::<u64>() {
                server.max_sessions = value;
            }
        }

        if let Some(difficulty) = lookup("DEFAULT_DIFFICULTY") {
            if let Ok(difficulty) = difficulty.parse::<Difficulty>() {
                game.default_difficulty = difficulty;
            }
        }

        for difficulty in Difficulty::ALL {
            let prefix = difficulty.as_str().to_uppercase();
            let settings = game.settings_mut(difficulty);

            if let Some(size) = lookup(&format!("{}_GRID_SIZE", prefix)) {
                if let Ok(value) = size.parse::<usize>() {
                    if value > 0 {
                        settings.size = value;
                    }
                }
            }

            if let Some(count) = lookup(&format!("{}_WORD_COUNT", prefix)) {
                if let Ok(value) = count.parse::<usize>() {
                    if value > 0 {
                        settings.word_count = value;
                    }
                }
            }
        }

        Self { server, game }
    }
}

pub mod config;
pub mod game;
pub mod http_api;
pub mod session_store;

#[cfg(test)]
mod test_utils;

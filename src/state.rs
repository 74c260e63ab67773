// src/state.rs
use std::sync::Arc;

use crate::services::coze::CozeClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub coze: CozeClient,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            coze: CozeClient::new(),
        }
    }

    /// Build state around a preconfigured client (tests point it at a mock
    /// backend).
    pub fn with_client(coze: CozeClient) -> Self {
        Self { coze }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

//! Shared application state for the Axum API server.

use std::sync::Arc;

use synthd_common::config::AppConfig;
use synthd_engine::Engine;

use crate::sandbox::MemoryBank;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub bank: Arc<MemoryBank>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(engine: Arc<Engine>, bank: Arc<MemoryBank>, config: AppConfig) -> Self {
        Self {
            engine,
            bank,
            config,
        }
    }
}

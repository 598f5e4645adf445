pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod observer;
pub mod server;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub static_file: Arc<Path>,
}

impl AppState {
    pub fn new(static_file: impl Into<PathBuf>) -> Self {
        Self {
            static_file: Arc::from(static_file.into()),
        }
    }
}

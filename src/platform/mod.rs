//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time
//! - Key-value storage (LocalStorage on web, JSON files on native)
//! - HTTP (fetch on web, blocking client on native)

pub mod http;
pub mod once;
pub mod storage;
pub mod time;

#[cfg(target_arch = "wasm32")]
pub use http::FetchTransport;
#[cfg(not(target_arch = "wasm32"))]
pub use http::BlockingTransport;
pub use http::HttpTransport;
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use once::OneShot;
pub use storage::{KeyValueStore, MemoryStorage};
pub use time::{new_seed, now_ms};

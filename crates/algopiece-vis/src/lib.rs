//! AlgoPiece Control Surface
//!
//! HTTP and WebSocket front door for the playback engine.
//!
//! # Architecture
//!
//! - **REST API**: start, pause, resume, reset and speed, plus the catalog
//!   and the current model
//! - **WebSocket**: streams every snapshot of the current run, cleared boards
//!   and state changes, and accepts the same commands as tagged JSON messages
//!
//! The engine's observer feeds a tokio broadcast channel; each WebSocket
//! client holds its own receiver.
//!
//! # Usage
//!
//! ```ignore
//! let server = VisServer::new(EngineConfig::default());
//! server.serve(3000).await?;
//! ```

mod server;

pub use server::{ApiError, AppState, VisServer};

//! # EduMind Backend
//!
//! An HTTP backend for a study assistant that forwards questions, concepts
//! and uploaded files to Google Gemini and reshapes the replies for the
//! frontend.
//!
//! ## Features
//!
//! - **Virtual Professor**: explanations split into an explanation and a
//!   step-by-step solution (`/chat`, `/gemini`)
//! - **Concept Visualizer**: mind-map trees for a concept or a document
//!   (`/mindmap`), with a fallback tree when the model reply is unusable
//! - **Uploads**: images and PDFs sent inline, plain text decoded and
//!   embedded in the prompt
//!
//! ## Architecture
//!
//! ```text
//! Browser → axum router → services → Gemini (HTTP)
//!                            ↓
//!                      interpreter (split / mind-map extraction)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use edumind_backend::{Config, AppState};
//! use edumind_backend::gemini::GeminiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = GeminiClient::new(&config.gemini, config.request.clone())?;
//!     let state = Arc::new(AppState::new(config, Arc::new(client)));
//!     edumind_backend::server::serve(state).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration management for the backend.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Gemini API client and wire types.
pub mod gemini;
/// Reshaping of raw model replies.
pub mod interpreter;
/// Prompt templates sent to Gemini.
pub mod prompts;
/// HTTP server, routes and handlers.
pub mod server;
/// Request services for each feature.
pub mod services;

pub use config::Config;
pub use error::{ApiError, AppError, AppResult};
pub use interpreter::{
    extract_json_tree, split_explanation_and_solution, ExplanationSolution, MindMapNode,
    MindMapOutcome, ResponseInterpreter,
};
pub use server::{AppState, SharedState};

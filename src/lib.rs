//! Client library for the AI document insight service.
//!
//! The backend extracts text from uploaded PDFs and returns an AI summary (or a
//! keyword fallback). This crate turns those responses into something a
//! terminal can show, most notably by splitting the summary into sections.

pub mod error;
pub mod history;
pub mod insight;
pub mod models;
pub mod remote_client;
pub mod sections;
pub mod settings;
pub mod upload;
pub mod utils;

pub use models::{Document, WordCount};
pub use sections::{parse_sections, Section};

//! Chat proxy for the dental practice website.
//!
//! Accepts a patient question plus context instructions over HTTP, forwards a
//! composed prompt to Gemini and returns the model's text, or a canned reply
//! pointing the patient to the office phone when anything goes wrong.

pub mod ai;
pub mod credentials;
pub mod error;
pub mod models;
pub mod prompts;
pub mod proxy;
pub mod server;

pub use error::{Error, Result};

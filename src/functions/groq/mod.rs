//! Functions backed by the Groq API.

pub mod client;
pub mod completion;
pub mod messages;
pub mod transcription;

pub use client::{AudioUpload, GroqClient};
pub use completion::CompletionFunction;
pub use transcription::TranscriptionFunction;

//! Voice to module inference.
//!
//! A client-side composition of the transcription and completion functions:
//! audio in, transcript and selected module out.

pub mod client;
pub mod selection;
pub mod template;

pub use client::{InferenceOutcome, InferencePipeline, PipelineError, load_audio};
pub use selection::ModuleSelection;
pub use template::PromptTemplate;

//! Built-in Function Registrations
//!
//! Every function shipped with the gateway is submitted here so the registry
//! can index it by name at startup.
//!
//! - `exampleFunction`: demo greeting
//! - `groqTranscription`: speech-to-text
//! - `groqCompletion`: chat completion

use super::example::{self, ExampleFunction};
use super::groq::{CompletionFunction, TranscriptionFunction, completion, transcription};
use super::registry::FunctionConstructor;

inventory::submit! {
    FunctionConstructor::new(
        example::FUNCTION_NAME,
        "Greeting with the current timestamp",
        ExampleFunction::from_config,
    )
}

inventory::submit! {
    FunctionConstructor::new(
        transcription::FUNCTION_NAME,
        "Transcribe an uploaded audio file",
        TranscriptionFunction::from_config,
    )
}

inventory::submit! {
    FunctionConstructor::new(
        completion::FUNCTION_NAME,
        "Answer a prompt with a chat completion",
        CompletionFunction::from_config,
    )
}

// Interview preparation: question and answer generation.
// All model calls go through llm_client::CompletionModel.

pub mod answers;
pub mod handlers;
pub mod prompts;
pub mod questions;

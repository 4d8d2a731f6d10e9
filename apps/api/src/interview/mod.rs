// Interview sessions: question loading, timed answering, scoring and final verdict.
// All AI calls go through the service traits in `services`; the LLM-backed
// implementations live in `ai`.

pub mod ai;
pub mod controller;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod registry;
pub mod scoring;
pub mod services;
pub mod session;

#[cfg(test)]
pub mod testing;

pub use registry::SessionRegistry;
pub use services::InterviewServices;
pub use session::SessionError;

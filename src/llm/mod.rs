// LLM abstraction layer

pub mod provider;
pub mod openai_compat;
pub mod mistral;
pub mod openai;

pub use provider::*;

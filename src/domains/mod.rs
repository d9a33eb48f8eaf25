//! Domains module containing business logic organized by bounded contexts.
//!
//! - **prompts**: prompt lifecycle management against the remote hub
//! - **tools**: the uniform tool surface shared by every transport

pub mod prompts;
pub mod tools;

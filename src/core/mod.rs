//! Core domain models
//!
//! This module defines the data structures that represent pipelines, steps,
//! commands, and the conditional placeholders that guard them.

pub mod command;
pub mod conditional;
pub mod pipeline;
pub mod step;

pub use command::*;
pub use conditional::*;
pub use pipeline::*;
pub use step::*;

//! Built-in plugins, grouped by the phase they run in.

pub mod block;
pub mod cleanup;
pub mod prepare;
pub mod span;

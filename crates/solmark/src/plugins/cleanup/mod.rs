//! Cleanup plugins: run on the fully resolved output.

mod smartypants;

pub use smartypants::Smartypants;

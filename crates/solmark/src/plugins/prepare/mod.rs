//! Prepare plugins: whole-document rewrites that run before block parsing.

mod html_blocks;
mod link_defs;

pub use html_blocks::HtmlBlocks;
pub use link_defs::StripLinkDefs;

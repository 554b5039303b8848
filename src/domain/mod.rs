//! Domain layer: posts, tree building, classification and rendering
//!
//! Independent of external concerns — no network, no config loading, no
//! terminal output. The only I/O is writing to the sink handed to the
//! renderer.

pub mod builder;
pub mod classify;
pub mod entities;
pub mod render;

pub use builder::ConversationTree;
pub use classify::{classify, Category};
pub use entities::{text_value, ContentMap, ContentValue, Post, UNKNOWN_SIGNATURE};
pub use render::{render_conversation, render_tree};

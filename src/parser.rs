//! Parser for the material language
//!
//! The grammar recognises the token stream and reports the semantic actions
//! its rules fired; the parse context replays those actions to assemble the
//! [`File`](crate::ast::File) tree.

pub mod actions;
pub mod api;
pub mod context;
pub mod grammar;

pub use actions::{Action, SpannedAction};
pub use api::{compile, compile_file, compile_with_config};
pub use context::{ParseContext, Scope};
pub use grammar::ParserError;

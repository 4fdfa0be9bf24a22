pub mod config;
pub mod types;

pub use config::{Config, ThemeOptions, ThemeText, Supports, PostsNav, ContentArchive};
pub use types::{Entry, Author, Term, Comment, PostType, View, LoopState, AdjacentEntry};

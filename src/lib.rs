pub mod cli;
pub mod core;
pub mod models;
pub mod theme;
pub mod utils;

// Re-export commonly used types
pub use crate::models::{Config, Entry, LoopState};
pub use crate::theme::hooks::{Hook, Pipeline, PipelineBuilder, Step};
pub use crate::theme::pagination::{build_pagination_plan, PageLink, PaginationState};
pub use crate::theme::renderer::ThemeRenderer;

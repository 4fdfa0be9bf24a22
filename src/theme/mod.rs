//! 文章主题层：分页导航、渲染钩子与各个渲染步骤。

pub mod author_box;
pub mod entry_loop;
pub mod error;
pub mod hooks;
pub mod markup;
pub mod pagination;
pub mod post_class;
pub mod renderer;
pub mod shortcodes;
pub mod steps;

pub use error::ThemeError;

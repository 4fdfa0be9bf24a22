use thiserror::Error;

/// 主题错误类型
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("配置错误: {message}")]
    ConfigError {
        message: String,
    },

    #[error("前置元数据错误: {path} - {message}")]
    FrontMatterError {
        path: String,
        message: String,
    },

    #[error("布局错误: {message}")]
    LayoutError {
        message: String,
    },

    #[error("钩子配置错误: {hook} - {message}")]
    HookError {
        hook: String,
        message: String,
    },

    #[error("模板渲染失败: {0}")]
    Template(#[from] tera::Error),
}

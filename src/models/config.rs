use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};

use crate::models::types::{Author, PostType};
use crate::theme::error::ThemeError;
use crate::theme::hooks::HookOverrides;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub url: Option<String>,
    pub root: Option<String>,
    pub per_page: Option<usize>,
    pub pagination_dir: Option<String>,
    pub date_format: Option<String>,
    pub source_dir: Option<String>,
    pub public_dir: Option<String>,
    pub theme: Option<String>,
    #[serde(default)]
    pub theme_options: ThemeOptions,
    /// 作者表，键与前置元数据中的 `author` 对应
    #[serde(default)]
    pub authors: HashMap<String, Author>,
    /// 小工具区域 HTML
    #[serde(default)]
    pub widgets: HashMap<String, String>,
    #[serde(default)]
    pub hooks: HookOverrides,
}

/// 列表页分页导航样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PostsNav {
    #[default]
    Numeric,
    PrevNext,
}

/// 列表页内容显示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentArchive {
    #[default]
    Full,
    Excerpts,
}

/// 主题选项
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeOptions {
    pub html5: bool,
    pub posts_nav: PostsNav,
    pub content_archive: ContentArchive,
    /// 列表页内容截断字数，0 表示不截断
    pub content_archive_limit: usize,
    pub content_archive_thumbnail: bool,
    pub image_size: String,
    pub image_alignment: String,
    pub semantic_headings: bool,
    pub link_post_title: bool,
    pub title_wrap: Option<String>,
    pub post_formats: bool,
    pub post_format_images: bool,
    /// 子主题目录，用于查找文章格式图标
    pub child_dir: Option<PathBuf>,
    pub child_url: String,
    pub default_ping_status: String,
    pub edit_post_link: bool,
    pub gravatar_size: u32,
    pub a11y: A11yOptions,
    pub text: ThemeText,
    pub post_supports: Supports,
    pub page_supports: Supports,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            html5: true,
            posts_nav: PostsNav::Numeric,
            content_archive: ContentArchive::Full,
            content_archive_limit: 0,
            content_archive_thumbnail: false,
            image_size: "thumbnail".to_string(),
            image_alignment: String::new(),
            semantic_headings: false,
            link_post_title: true,
            title_wrap: None,
            post_formats: false,
            post_format_images: false,
            child_dir: None,
            child_url: String::new(),
            default_ping_status: "closed".to_string(),
            edit_post_link: true,
            gravatar_size: 70,
            a11y: A11yOptions::default(),
            text: ThemeText::default(),
            post_supports: Supports::for_posts(),
            page_supports: Supports::for_pages(),
        }
    }
}

impl ThemeOptions {
    pub fn supports(&self, post_type: PostType) -> &Supports {
        match post_type {
            PostType::Post => &self.post_supports,
            PostType::Page => &self.page_supports,
        }
    }
}

/// 无障碍选项
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct A11yOptions {
    pub screen_reader_text: bool,
    pub headings: bool,
}

impl Default for A11yOptions {
    fn default() -> Self {
        Self {
            screen_reader_text: true,
            headings: false,
        }
    }
}

/// 内容类型支持的特性
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Supports {
    pub entry_meta_before_content: bool,
    pub entry_meta_after_content: bool,
    pub author: bool,
    pub trackbacks: bool,
    pub comments: bool,
    pub adjacent_entry_nav: bool,
    pub after_entry_widget_area: bool,
}

impl Default for Supports {
    fn default() -> Self {
        Self::for_posts()
    }
}

impl Supports {
    pub fn for_posts() -> Self {
        Self {
            entry_meta_before_content: true,
            entry_meta_after_content: true,
            author: true,
            trackbacks: true,
            comments: true,
            adjacent_entry_nav: false,
            after_entry_widget_area: false,
        }
    }

    pub fn for_pages() -> Self {
        Self {
            entry_meta_before_content: false,
            entry_meta_after_content: false,
            author: true,
            trackbacks: false,
            comments: true,
            adjacent_entry_nav: false,
            after_entry_widget_area: false,
        }
    }
}

/// 主题输出的固定文案
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeText {
    pub post_info: String,
    pub post_meta: String,
    pub noposts: String,
    pub more: String,
    pub more_about: String,
    pub prev_link: String,
    pub next_link: String,
    pub page: String,
    pub pages: String,
    pub current_page: String,
    pub about: String,
    pub previous_post: String,
    pub next_post: String,
    pub filed_under: String,
    pub tagged_with: String,
    pub comments_zero: String,
    pub comments_one: String,
    /// `%` 会被替换为评论数
    pub comments_many: String,
    pub comments_title: String,
    pub says: String,
    pub edit: String,
}

impl Default for ThemeText {
    fn default() -> Self {
        Self {
            post_info: "[post_date] by [post_author_posts_link] [post_comments] [post_edit]".to_string(),
            post_meta: "[post_categories] [post_tags]".to_string(),
            noposts: "Sorry, no content matched your criteria.".to_string(),
            more: "[Read more...]".to_string(),
            more_about: "about ".to_string(),
            prev_link: "&#x000AB; Previous Page".to_string(),
            next_link: "Next Page &#x000BB;".to_string(),
            page: "Page ".to_string(),
            pages: "Pages:".to_string(),
            current_page: "Current page".to_string(),
            about: "About".to_string(),
            previous_post: "Previous Post:".to_string(),
            next_post: "Next Post:".to_string(),
            filed_under: "Filed Under: ".to_string(),
            tagged_with: "Tagged With: ".to_string(),
            comments_zero: "Leave a Comment".to_string(),
            comments_one: "1 Comment".to_string(),
            comments_many: "% Comments".to_string(),
            comments_title: "Comments".to_string(),
            says: "says".to_string(),
            edit: "(Edit)".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            subtitle: None,
            description: None,
            author: None,
            language: Some("en".to_string()),
            url: None,
            root: Some("/".to_string()),
            per_page: None,
            pagination_dir: None,
            date_format: None,
            source_dir: None,
            public_dir: None,
            theme: Some("default".to_string()),
            theme_options: ThemeOptions::default(),
            authors: HashMap::new(),
            widgets: HashMap::new(),
            hooks: HookOverrides::default(),
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置的别名
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_file(path)
    }

    fn validate(&self) -> Result<(), ThemeError> {
        if self.per_page == Some(0) {
            return Err(ThemeError::ConfigError {
                message: "per_page 必须大于 0".to_string(),
            });
        }
        if let Some(format) = &self.date_format {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(ThemeError::ConfigError {
                    message: format!("date_format 格式无效: {}", format),
                });
            }
        }
        Ok(())
    }

    pub fn root(&self) -> String {
        crate::utils::ensure_trailing_slash(&crate::utils::ensure_leading_slash(
            self.root.as_deref().unwrap_or("/"),
        ))
    }

    pub fn per_page(&self) -> usize {
        self.per_page.unwrap_or(10).max(1)
    }

    pub fn pagination_dir(&self) -> &str {
        self.pagination_dir.as_deref().unwrap_or("page")
    }

    pub fn date_format(&self) -> &str {
        self.date_format.as_deref().unwrap_or("%B %-d, %Y")
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or("en")
    }

    /// 按前置元数据中的名字查找作者，找不到时以名字本身构造
    pub fn resolve_author(&self, key: Option<&str>) -> Author {
        let key = key.or(self.author.as_deref());
        match key {
            Some(key) => self.authors.get(key).cloned().unwrap_or_else(|| Author {
                display_name: key.to_string(),
                ..Author::default()
            }),
            None => Author::default(),
        }
    }
}

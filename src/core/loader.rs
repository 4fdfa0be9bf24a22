//! 读取 `source/` 下的 Markdown 文章与页面。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use gray_matter::engine::YAML;
use gray_matter::{Matter, Pod};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::{Comment, Config, Entry, PostType, Term};
use crate::theme::error::ThemeError;
use crate::utils::{self, markdown};

/// 文章目录名
pub const POSTS_DIR: &str = "_posts";

/// 单个名字或名字列表
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    fn into_terms(self) -> Vec<Term> {
        let names = match self {
            OneOrMany::One(name) => vec![name],
            OneOrMany::Many(names) => names,
        };
        names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(Term::new)
            .collect()
    }
}

/// 前置元数据中的评论
#[derive(Debug, Clone, Deserialize)]
pub struct FrontMatterComment {
    pub author: String,
    pub date: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// 文章前置元数据
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub categories: OneOrMany,
    pub tags: OneOrMany,
    pub format: Option<String>,
    pub image: Option<String>,
    pub excerpt: Option<String>,
    pub post_class: Option<String>,
    pub comments_open: Option<bool>,
    pub comments: Vec<FrontMatterComment>,
    pub edit_url: Option<String>,
    pub slug: Option<String>,
}

/// 加载结果
#[derive(Debug, Clone, Default)]
pub struct SiteContent {
    /// 文章，按日期从新到旧
    pub posts: Vec<Entry>,
    /// 独立页面，按标题排序
    pub pages: Vec<Entry>,
}

/// 内容加载器
pub struct Loader<'a> {
    source_dir: PathBuf,
    config: &'a Config,
    matter: Matter<YAML>,
}

impl<'a> Loader<'a> {
    pub fn new(base_dir: &Path, config: &'a Config) -> Self {
        let source_dir = base_dir.join(config.source_dir.as_deref().unwrap_or("source"));
        Self {
            source_dir,
            config,
            matter: Matter::<YAML>::new(),
        }
    }

    /// 加载全部文章和页面
    pub fn load(&self) -> Result<SiteContent> {
        info!("加载文章和页面...");

        let mut content = SiteContent::default();
        if !self.source_dir.exists() {
            warn!("源文件目录不存在: {}", self.source_dir.display());
            return Ok(content);
        }

        for dir_entry in WalkDir::new(&self.source_dir).sort_by_file_name() {
            let dir_entry = dir_entry?;
            let path = dir_entry.path();
            if !path.is_file() || !utils::is_markdown_file(path) {
                continue;
            }

            let relative = path.strip_prefix(&self.source_dir)?;
            let post_type = match self.classify(relative) {
                Some(post_type) => post_type,
                None => {
                    debug!("跳过: {}", relative.display());
                    continue;
                }
            };

            let raw = fs::read_to_string(path)
                .with_context(|| format!("读取文件失败: {}", path.display()))?;

            if let Some(entry) = self.parse_entry(path, &raw, post_type)? {
                match post_type {
                    PostType::Post => content.posts.push(entry),
                    PostType::Page => content.pages.push(entry),
                }
            }
        }

        content.posts.sort_by(|a, b| b.date.cmp(&a.date));
        content.pages.sort_by(|a, b| a.title.cmp(&b.title));

        info!("加载了 {} 篇文章, {} 个页面", content.posts.len(), content.pages.len());
        Ok(content)
    }

    /// `_posts/` 下为文章，其余不以 `_` 开头的路径为页面
    fn classify(&self, relative: &Path) -> Option<PostType> {
        let mut components = relative.components().map(|c| c.as_os_str().to_string_lossy());
        let first = components.next()?;
        if first == POSTS_DIR {
            return Some(PostType::Post);
        }
        if relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('_'))
        {
            return None;
        }
        Some(PostType::Page)
    }

    /// 解析单个文件，没有前置元数据时返回 `None`
    pub fn parse_entry(&self, path: &Path, raw: &str, post_type: PostType) -> Result<Option<Entry>> {
        let result = self.matter.parse(raw);
        let data = match result.data {
            Some(data) => data,
            None => {
                warn!("缺少前置元数据，跳过: {}", path.display());
                return Ok(None);
            }
        };

        let front_matter: FrontMatter = serde_yaml::from_value(pod_to_value(data)).map_err(|e| {
            ThemeError::FrontMatterError {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();
        let slug = front_matter
            .slug
            .as_deref()
            .map(utils::slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| utils::slugify(&stem));

        let date = match front_matter.date.as_deref().and_then(parse_date) {
            Some(date) => date,
            None => {
                // 没有日期时使用文件的修改时间
                let modified = fs::metadata(path)
                    .and_then(|m| m.modified())
                    .with_context(|| format!("读取文件时间失败: {}", path.display()))?;
                modified.into()
            }
        };

        let comments = front_matter
            .comments
            .into_iter()
            .map(|c| Comment {
                date: c.date.as_deref().and_then(parse_date).unwrap_or(date),
                author: c.author,
                content: c.content,
            })
            .collect();

        let pages = markdown::render_pages(&result.content)
            .with_context(|| format!("渲染 Markdown 失败: {}", path.display()))?;

        Ok(Some(Entry {
            permalink: format!("{}{}/", self.config.root(), slug),
            title: front_matter.title.unwrap_or(stem),
            slug,
            date,
            post_type,
            format: front_matter.format,
            author: self.config.resolve_author(front_matter.author.as_deref()),
            categories: front_matter.categories.into_terms(),
            tags: front_matter.tags.into_terms(),
            excerpt: front_matter.excerpt,
            image: front_matter.image,
            custom_class: front_matter.post_class,
            comments_open: front_matter.comments_open.unwrap_or(true),
            comments,
            edit_url: front_matter.edit_url,
            pages,
        }))
    }
}

/// 支持 RFC 3339、`2024-03-05 10:00:00 +0800`、`2024-03-05 10:00:00` 与 `2024-03-05`
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

// 将 Pod 值转换为 serde_yaml::Value
fn pod_to_value(pod: Pod) -> Value {
    match pod {
        Pod::String(s) => Value::String(s),
        Pod::Integer(i) => Value::Number(serde_yaml::Number::from(i)),
        Pod::Float(f) => Value::Number(serde_yaml::Number::from(f)),
        Pod::Boolean(b) => Value::Bool(b),
        Pod::Array(arr) => Value::Sequence(arr.into_iter().map(pod_to_value).collect()),
        Pod::Hash(map) => {
            let mut mapping = Mapping::new();
            for (k, v) in map {
                mapping.insert(Value::String(k), pod_to_value(v));
            }
            Value::Mapping(mapping)
        }
        Pod::Null => Value::Null,
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 内容类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Post,
    Page,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Post => "post",
            PostType::Page => "page",
        }
    }
}

/// 作者信息
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Author {
    /// 显示名称
    pub display_name: String,
    /// 作者文章列表链接
    pub url: Option<String>,
    /// 头像地址
    pub avatar: Option<String>,
    /// 个人简介（纯文本，空行分段）
    pub description: String,
    /// 自定义标题
    pub headline: Option<String>,
    /// 是否在单篇文章后显示作者框
    pub box_single: bool,
}

/// 分类或标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub slug: String,
}

impl Term {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: crate::utils::slugify(name),
        }
    }
}

/// 评论
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub date: DateTime<Utc>,
    pub content: String,
}

/// 一篇文章或页面
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// 别名，同时用作输出目录
    pub slug: String,
    /// 标题
    pub title: String,
    /// 发布时间
    pub date: DateTime<Utc>,
    /// 内容类型
    pub post_type: PostType,
    /// 文章格式（aside、gallery 等）
    pub format: Option<String>,
    /// 作者
    pub author: Author,
    /// 分类
    pub categories: Vec<Term>,
    /// 标签
    pub tags: Vec<Term>,
    /// 手写摘要
    pub excerpt: Option<String>,
    /// 特色图片地址
    pub image: Option<String>,
    /// 自定义 class
    pub custom_class: Option<String>,
    /// 是否开放评论
    pub comments_open: bool,
    /// 已有评论
    pub comments: Vec<Comment>,
    /// 编辑链接
    pub edit_url: Option<String>,
    /// 永久链接
    pub permalink: String,
    /// 渲染后的内容分页，至少一页
    pub pages: Vec<String>,
}

impl Entry {
    /// 获取第 `page` 页内容（从 1 开始），越界时返回第一页
    pub fn content(&self, page: u32) -> &str {
        let index = page.saturating_sub(1) as usize;
        self.pages
            .get(index)
            .or_else(|| self.pages.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 全部内容拼接
    pub fn full_content(&self) -> String {
        self.pages.join("\n")
    }

    pub fn is_multipage(&self) -> bool {
        self.pages.len() > 1
    }

    /// 内容分页链接，第一页即永久链接
    pub fn page_link(&self, page: u32) -> String {
        if page <= 1 {
            self.permalink.clone()
        } else {
            format!("{}{}/", crate::utils::ensure_trailing_slash(&self.permalink), page)
        }
    }
}

/// 当前渲染的视图类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    /// 列表页
    Archive,
    /// 单篇文章
    Single,
    /// 独立页面
    Page,
}

/// 相邻文章
#[derive(Debug, Clone, Serialize)]
pub struct AdjacentEntry {
    pub title: String,
    pub permalink: String,
}

impl From<&Entry> for AdjacentEntry {
    fn from(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            permalink: entry.permalink.clone(),
        }
    }
}

/// 一次渲染的查询状态
#[derive(Debug, Clone, Serialize)]
pub struct LoopState {
    pub view: View,
    /// 当前列表页码
    pub paged: u32,
    /// 列表总页数
    pub max_pages: u32,
    /// 列表首页地址
    pub archive_base: String,
    /// 当前内容分页
    pub content_page: u32,
    pub previous_entry: Option<AdjacentEntry>,
    pub next_entry: Option<AdjacentEntry>,
}

impl LoopState {
    pub fn archive(paged: u32, max_pages: u32, archive_base: &str) -> Self {
        Self {
            view: View::Archive,
            paged,
            max_pages,
            archive_base: archive_base.to_string(),
            content_page: 1,
            previous_entry: None,
            next_entry: None,
        }
    }

    pub fn singular(view: View, archive_base: &str) -> Self {
        Self {
            view,
            paged: 1,
            max_pages: 1,
            archive_base: archive_base.to_string(),
            content_page: 1,
            previous_entry: None,
            next_entry: None,
        }
    }

    pub fn is_singular(&self) -> bool {
        matches!(self.view, View::Single | View::Page)
    }

    pub fn is_single(&self) -> bool {
        self.view == View::Single
    }

    pub fn is_page(&self) -> bool {
        self.view == View::Page
    }
}

//! 列表页数字分页。
//!
//! `build_pagination_plan` 只根据当前页和总页数给出要显示的链接序列，
//! 链接地址和 HTML 由 `render_numeric_nav` 等函数在之后生成。

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::models::{Config, LoopState, PostsNav};
use crate::theme::markup::{self, escape_url};

/// 当前页两侧各显示的页数
pub const NEIGHBOR_WINDOW: u32 = 2;

/// 分页导航中的一个位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageLink {
    FirstPage,
    WindowPage(u32),
    CurrentPage(u32),
    LastPage,
    Ellipsis,
    PreviousArrow,
    NextArrow,
}

/// 分页状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
}

impl PaginationState {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self { current_page, total_pages }
    }

    pub fn plan(&self) -> Vec<PageLink> {
        build_pagination_plan(self.current_page, self.total_pages)
    }
}

/// 计算当前页附近需要显示的页码（升序）
fn window(current_page: u32, total_pages: u32) -> Vec<u32> {
    let mut pages = vec![current_page];

    if current_page > NEIGHBOR_WINDOW {
        pages.push(current_page - 1);
        pages.push(current_page - 2);
    }

    if total_pages - current_page >= NEIGHBOR_WINDOW {
        pages.push(current_page + 2);
        pages.push(current_page + 1);
    }

    pages.sort_unstable();
    pages
}

/// 生成数字分页的链接序列。
///
/// 总页数不超过 1 时返回空序列。当前页为 0 或超过总页数时同样返回空序列，
/// 调用方应当传入合法的查询结果。
pub fn build_pagination_plan(current_page: u32, total_pages: u32) -> Vec<PageLink> {
    if total_pages <= 1 {
        return Vec::new();
    }

    if current_page == 0 || current_page > total_pages {
        debug!("分页参数越界: current={}, total={}", current_page, total_pages);
        return Vec::new();
    }

    let pages = window(current_page, total_pages);
    let mut plan = Vec::with_capacity(pages.len() + 6);

    if current_page > 1 {
        plan.push(PageLink::PreviousArrow);
    }

    if !pages.contains(&1) {
        plan.push(PageLink::FirstPage);
        if !pages.contains(&2) {
            plan.push(PageLink::Ellipsis);
        }
    }

    for &page in &pages {
        if page == current_page {
            plan.push(PageLink::CurrentPage(page));
        } else {
            plan.push(PageLink::WindowPage(page));
        }
    }

    if !pages.contains(&total_pages) {
        if !pages.contains(&(total_pages - 1)) {
            plan.push(PageLink::Ellipsis);
        }
        plan.push(PageLink::LastPage);
    }

    if current_page < total_pages {
        plan.push(PageLink::NextArrow);
    }

    plan
}

/// 列表页地址生成
#[derive(Debug, Clone)]
pub struct PageUrls {
    base: String,
    pagination_dir: String,
}

impl PageUrls {
    pub fn new(base: &str, pagination_dir: &str) -> Self {
        Self {
            base: crate::utils::ensure_trailing_slash(base),
            pagination_dir: pagination_dir.trim_matches('/').to_string(),
        }
    }

    pub fn for_state(config: &Config, state: &LoopState) -> Self {
        Self::new(&state.archive_base, config.pagination_dir())
    }

    /// 第 `page` 页的地址，第一页为列表首页
    pub fn page(&self, page: u32) -> String {
        if page <= 1 {
            self.base.clone()
        } else {
            format!("{}{}/{}/", self.base, self.pagination_dir, page)
        }
    }
}

/// 根据主题选项输出列表页分页导航
pub fn posts_nav(config: &Config, state: &LoopState, out: &mut String) -> Result<()> {
    match config.theme_options.posts_nav {
        PostsNav::Numeric => render_numeric_nav(config, state, out),
        PostsNav::PrevNext => render_prev_next_nav(config, state, out),
    }
}

fn previous_link(config: &Config, state: &LoopState, urls: &PageUrls) -> Option<String> {
    if state.is_singular() || state.paged <= 1 {
        return None;
    }
    Some(format!(
        "<a href=\"{}\">{}</a>",
        escape_url(&urls.page(state.paged - 1)),
        config.theme_options.text.prev_link
    ))
}

fn next_link(config: &Config, state: &LoopState, urls: &PageUrls) -> Option<String> {
    if state.is_singular() || state.paged >= state.max_pages {
        return None;
    }
    Some(format!(
        "<a href=\"{}\">{}</a>",
        escape_url(&urls.page(state.paged + 1)),
        config.theme_options.text.next_link
    ))
}

/// 「上一页 / 下一页」样式
pub fn render_prev_next_nav(config: &Config, state: &LoopState, out: &mut String) -> Result<()> {
    let urls = PageUrls::for_state(config, state);
    let prev = previous_link(config, state, &urls);
    let next = next_link(config, state, &urls);

    if prev.is_none() && next.is_none() {
        return Ok(());
    }

    let mut content = String::new();
    if let Some(link) = prev {
        write!(content, "<div class=\"pagination-previous alignleft\">{}</div>", link)?;
    }
    if let Some(link) = next {
        write!(content, "<div class=\"pagination-next alignright\">{}</div>", link)?;
    }

    markup::markup(out, "div", "archive-pagination", &[], Some(&content), true)?;
    Ok(())
}

/// 数字样式
pub fn render_numeric_nav(config: &Config, state: &LoopState, out: &mut String) -> Result<()> {
    if state.is_singular() {
        return Ok(());
    }

    let plan = build_pagination_plan(state.paged, state.max_pages);
    if plan.is_empty() {
        return Ok(());
    }

    let options = &config.theme_options;
    let urls = PageUrls::for_state(config, state);
    let before_number = if options.a11y.screen_reader_text {
        format!("<span class=\"screen-reader-text\">{}</span>", options.text.page)
    } else {
        String::new()
    };

    markup::open(out, "div", "archive-pagination", &[])?;
    out.push_str("<ul>");

    for link in plan {
        match link {
            PageLink::PreviousArrow => {
                if let Some(prev) = previous_link(config, state, &urls) {
                    writeln!(out, "<li class=\"pagination-previous\">{}</li>", prev)?;
                }
            }
            PageLink::FirstPage => {
                writeln!(out, "<li><a href=\"{}\">{}1</a></li>", escape_url(&urls.page(1)), before_number)?;
            }
            PageLink::Ellipsis => {
                writeln!(out, "<li class=\"pagination-omission\">&#x02026;</li>")?;
            }
            PageLink::WindowPage(page) => {
                writeln!(out, "<li><a href=\"{}\">{}{}</a></li>", escape_url(&urls.page(page)), before_number, page)?;
            }
            PageLink::CurrentPage(page) => {
                writeln!(
                    out,
                    "<li class=\"active\"><a href=\"{}\" aria-label=\"{}\" aria-current=\"page\">{}{}</a></li>",
                    escape_url(&urls.page(page)),
                    markup::escape_attr(&options.text.current_page),
                    before_number,
                    page
                )?;
            }
            PageLink::LastPage => {
                writeln!(
                    out,
                    "<li><a href=\"{}\">{}{}</a></li>",
                    escape_url(&urls.page(state.max_pages)),
                    before_number,
                    state.max_pages
                )?;
            }
            PageLink::NextArrow => {
                if let Some(next) = next_link(config, state, &urls) {
                    writeln!(out, "<li class=\"pagination-next\">{}</li>", next)?;
                }
            }
        }
    }

    out.push_str("</ul>");
    markup::close(out, "div")?;
    out.push('\n');
    Ok(())
}

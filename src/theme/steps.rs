//! 各个渲染步骤的实现。
//!
//! 每个步骤向 `out` 追加 HTML，条件不满足时什么也不输出。

use std::fmt::Write;

use anyhow::Result;
use tracing::debug;

use crate::models::{Config, ContentArchive, Entry, LoopState, Supports};
use crate::theme::author_box::author_box;
use crate::theme::hooks::Step;
use crate::theme::markup::{self, escape_attr, escape_html, escape_url, strip_p_tags, strip_tags, truncate_words};
use crate::theme::{pagination, shortcodes};

/// 摘要自动生成时保留的单词数
const EXCERPT_WORDS: usize = 55;
const MORE_MARKER: &str = "<!--more-->";

/// 步骤执行时可见的上下文
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub config: &'a Config,
    pub entry: Option<&'a Entry>,
    pub state: &'a LoopState,
}

impl<'a> StepContext<'a> {
    fn supports(&self, entry: &Entry) -> &'a Supports {
        self.config.theme_options.supports(entry.post_type)
    }
}

/// 执行单个步骤
pub fn run(step: Step, ctx: &StepContext<'_>, out: &mut String) -> Result<()> {
    if !step.needs_entry() {
        return match step {
            Step::NoPosts => no_posts(ctx, out),
            Step::PostsNav => pagination::posts_nav(ctx.config, ctx.state, out),
            _ => Ok(()),
        };
    }

    let entry = match ctx.entry {
        Some(entry) => entry,
        None => {
            debug!("步骤 {} 没有当前文章，跳过", step);
            return Ok(());
        }
    };

    match step {
        Step::PostFormatImage => post_format_image(ctx, entry, out),
        Step::EntryHeaderOpen => Ok(markup::open(out, "header", "entry-header", &[])?),
        Step::EntryHeaderClose => Ok(markup::close(out, "header")?),
        Step::PostTitle => post_title(ctx, entry, out),
        Step::PostInfo => post_info(ctx, entry, out),
        Step::PostImage => post_image(ctx, entry, out),
        Step::PostContent => post_content(ctx, entry, out),
        Step::PostContentNav => post_content_nav(ctx, entry, out),
        Step::PostPermalink => post_permalink(ctx, entry, out),
        Step::EntryFooterOpen => {
            if ctx.supports(entry).entry_meta_after_content {
                markup::open(out, "footer", "entry-footer", &[])?;
            }
            Ok(())
        }
        Step::EntryFooterClose => {
            if ctx.supports(entry).entry_meta_after_content {
                markup::close(out, "footer")?;
            }
            Ok(())
        }
        Step::PostMeta => post_meta(ctx, entry, out),
        Step::AuthorBoxSingle => author_box_single(ctx, entry, out),
        Step::AdjacentEntryNav => adjacent_entry_nav(ctx, entry, out),
        Step::CommentsTemplate => comments_template(ctx, entry, out),
        Step::AfterEntryWidgetArea => after_entry_widget_area(ctx, entry, out),
        Step::NoPosts | Step::PostsNav => Ok(()),
    }
}

fn post_format_image(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    let options = &ctx.config.theme_options;
    if !options.post_formats || !options.post_format_images {
        return Ok(());
    }

    let child_dir = match &options.child_dir {
        Some(dir) => dir,
        None => return Ok(()),
    };
    let images = child_dir.join("images").join("post-formats");

    let (file, alt) = match entry.format.as_deref() {
        Some(format) if images.join(format!("{}.png", format)).exists() => (format.to_string(), format.to_string()),
        _ if images.join("default.png").exists() => ("default".to_string(), "post".to_string()),
        _ => return Ok(()),
    };

    write!(
        out,
        "<a href=\"{}\" rel=\"bookmark\"><img src=\"{}/images/post-formats/{}.png\" class=\"post-format-image\" alt=\"{}\" /></a>",
        escape_url(&entry.permalink),
        escape_url(options.child_url.trim_end_matches('/')),
        escape_attr(&file),
        escape_attr(&alt)
    )?;
    Ok(())
}

fn post_title(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    let options = &ctx.config.theme_options;
    let text = escape_html(&entry.title);
    if text.trim().is_empty() {
        return Ok(());
    }

    let title = if !ctx.state.is_singular() && options.link_post_title {
        let mut link = String::new();
        markup::markup(
            &mut link,
            "a",
            "entry-title-link",
            &[("href", entry.permalink.as_str())],
            Some(&text),
            true,
        )?;
        link
    } else {
        text
    };

    let mut wrap = if ctx.state.is_singular() { "h1" } else { "h2" };
    if options.html5 && options.semantic_headings {
        wrap = "h1";
    }
    let wrap = options.title_wrap.as_deref().unwrap_or(wrap);

    markup::markup(out, wrap, "entry-title", &[], Some(&title), true)?;
    out.push('\n');
    Ok(())
}

/// 文章信息与文章元数据共用的输出逻辑
fn entry_meta(ctx: &StepContext<'_>, entry: &Entry, template: &str, context: &str, out: &mut String) -> Result<()> {
    let expanded = shortcodes::expand(template, ctx.config, entry)?;
    if expanded.trim().is_empty() {
        return Ok(());
    }

    let content = strip_p_tags(expanded.trim());
    markup::markup(out, "p", context, &[], Some(&content), true)?;
    Ok(())
}

fn post_info(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    if !ctx.supports(entry).entry_meta_before_content {
        return Ok(());
    }
    let template = &ctx.config.theme_options.text.post_info;
    entry_meta(ctx, entry, template, "entry-meta-before-content", out)
}

fn post_meta(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    if !ctx.supports(entry).entry_meta_after_content {
        return Ok(());
    }
    let template = &ctx.config.theme_options.text.post_meta;
    entry_meta(ctx, entry, template, "entry-meta-after-content", out)
}

fn post_image(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    let options = &ctx.config.theme_options;
    if ctx.state.is_singular() || !options.content_archive_thumbnail {
        return Ok(());
    }

    let src = match &entry.image {
        Some(src) if !src.is_empty() => src,
        _ => return Ok(()),
    };

    let class = format!("{} post-image entry-image size-{}", options.image_alignment, options.image_size);
    let img = format!(
        "<img src=\"{}\" class=\"{}\" alt=\"{}\" />",
        escape_url(src),
        escape_attr(class.trim()),
        escape_attr(&entry.title)
    );
    markup::markup(out, "a", "entry-image-link", &[("href", entry.permalink.as_str())], Some(&img), true)?;
    Ok(())
}

/// 「阅读更多」文字
fn more_text(ctx: &StepContext<'_>, entry: &Entry) -> String {
    let text = &ctx.config.theme_options.text;
    if ctx.config.theme_options.a11y.screen_reader_text {
        format!(
            "{}<span class=\"screen-reader-text\">{}{}</span>",
            text.more,
            text.more_about,
            escape_html(&entry.title)
        )
    } else {
        text.more.clone()
    }
}

fn more_link(ctx: &StepContext<'_>, entry: &Entry) -> String {
    format!(
        "<a href=\"{}\" class=\"more-link\">{}</a>",
        escape_url(&entry.permalink),
        more_text(ctx, entry)
    )
}

/// 没有手写摘要时，取正文前若干个单词
fn excerpt(entry: &Entry) -> String {
    if let Some(excerpt) = entry.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
        return escape_html(excerpt.trim());
    }

    let text = strip_tags(&entry.full_content());
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > EXCERPT_WORDS {
        format!("{} [&hellip;]", words[..EXCERPT_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

fn trackback_rdf(entry: &Entry) -> String {
    format!(
        "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:trackback=\"http://madskills.com/public/xml/rss/module/trackback/\">\n\
         <rdf:Description rdf:about=\"{permalink}\" dc:identifier=\"{permalink}\" dc:title=\"{title}\" \
         trackback:ping=\"{permalink}trackback/\" />\n</rdf:RDF>",
        permalink = escape_attr(&entry.permalink),
        title = escape_attr(&entry.title)
    )
}

fn post_content(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    let options = &ctx.config.theme_options;

    if ctx.state.is_singular() {
        out.push_str(&entry.content(ctx.state.content_page).replace(MORE_MARKER, ""));

        if ctx.state.is_single() && options.default_ping_status == "open" && ctx.supports(entry).trackbacks {
            writeln!(out, "<!--\n{}\n-->", trackback_rdf(entry))?;
        }

        if ctx.state.is_page() && options.edit_post_link {
            if let Some(url) = &entry.edit_url {
                write!(out, "<a class=\"post-edit-link\" href=\"{}\">{}</a>", escape_url(url), options.text.edit)?;
            }
        }
        return Ok(());
    }

    if options.content_archive == ContentArchive::Excerpts {
        writeln!(out, "<p>{}</p>", excerpt(entry))?;
        return Ok(());
    }

    if options.content_archive_limit > 0 {
        let text = strip_tags(&entry.full_content());
        let limited = truncate_words(&text, options.content_archive_limit);
        writeln!(out, "<p>{}&#x02026; {}</p>", limited, more_link(ctx, entry))?;
        return Ok(());
    }

    let content = entry.content(1);
    match content.find(MORE_MARKER) {
        Some(index) => {
            out.push_str(content[..index].trim_end());
            writeln!(out, " {}", more_link(ctx, entry))?;
        }
        None => out.push_str(content),
    }
    Ok(())
}

fn post_content_nav(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    if !entry.is_multipage() {
        return Ok(());
    }

    let options = &ctx.config.theme_options;
    let link_before = if options.a11y.screen_reader_text {
        format!("<span class=\"screen-reader-text\">{}</span>", options.text.page)
    } else {
        String::new()
    };
    let current = if ctx.state.is_singular() { ctx.state.content_page.max(1) } else { 1 };

    markup::open(out, "div", "entry-pagination", &[])?;
    out.push_str(&options.text.pages);
    for page in 1..=entry.pages.len() as u32 {
        if page == current {
            write!(
                out,
                " <span class=\"post-page-numbers current\" aria-current=\"page\">{}{}</span>",
                link_before, page
            )?;
        } else {
            write!(
                out,
                " <a href=\"{}\" class=\"post-page-numbers\">{}{}</a>",
                escape_url(&entry.page_link(page)),
                link_before,
                page
            )?;
        }
    }
    markup::close(out, "div")?;
    Ok(())
}

fn post_permalink(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    if ctx.state.is_singular() || !entry.title.is_empty() {
        return Ok(());
    }

    write!(
        out,
        "<p class=\"entry-permalink\"><a href=\"{}\" rel=\"bookmark\">{}</a></p>",
        escape_url(&entry.permalink),
        escape_html(&entry.permalink)
    )?;
    Ok(())
}

fn author_box_single(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    if !ctx.state.is_single() || !ctx.supports(entry).author {
        return Ok(());
    }

    if entry.author.box_single {
        out.push_str(&author_box(ctx.config, &entry.author, true));
    }
    Ok(())
}

fn adjacent_entry_nav(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    if !ctx.state.is_singular() || !ctx.supports(entry).adjacent_entry_nav {
        return Ok(());
    }

    let options = &ctx.config.theme_options;
    let label = |text: &str| {
        if options.a11y.screen_reader_text {
            format!("<span class=\"screen-reader-text\">{} </span>", escape_html(text))
        } else {
            String::new()
        }
    };

    let previous = ctx.state.previous_entry.as_ref().map(|adjacent| {
        format!(
            "<a href=\"{}\" rel=\"prev\">{}<span class=\"adjacent-post-link\">&#xAB; {}</span></a>",
            escape_url(&adjacent.permalink),
            label(&options.text.previous_post),
            escape_html(&adjacent.title)
        )
    });
    let next = ctx.state.next_entry.as_ref().map(|adjacent| {
        format!(
            "<a href=\"{}\" rel=\"next\">{}<span class=\"adjacent-post-link\">{} &#xBB;</span></a>",
            escape_url(&adjacent.permalink),
            label(&options.text.next_post),
            escape_html(&adjacent.title)
        )
    });

    markup::open(out, "div", "adjacent-entry-pagination", &[])?;
    markup::markup(out, "div", "pagination-previous", &[], previous.as_deref(), true)?;
    markup::markup(out, "div", "pagination-next", &[], next.as_deref(), true)?;
    markup::close(out, "div")?;
    Ok(())
}

fn comments_template(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    if !ctx.state.is_singular() || !ctx.supports(entry).comments || entry.comments.is_empty() {
        return Ok(());
    }

    let text = &ctx.config.theme_options.text;
    write!(out, "<div class=\"entry-comments\" id=\"comments\"><h3>{}</h3><ol class=\"comment-list\">", text.comments_title)?;
    for comment in &entry.comments {
        write!(
            out,
            "<li class=\"comment\"><article class=\"comment-body\"><header class=\"comment-header\">\
             <p class=\"comment-author\"><span class=\"comment-author-name\">{}</span> <span class=\"says\">{}</span></p>\
             <p class=\"comment-meta\"><time class=\"comment-time\" datetime=\"{}\">{}</time></p></header>\
             <div class=\"comment-content\">{}</div></article></li>",
            escape_html(&comment.author),
            text.says,
            comment.date.to_rfc3339(),
            comment.date.format(ctx.config.date_format()),
            markup::autop(&escape_html(&comment.content))
        )?;
    }
    out.push_str("</ol></div>");
    Ok(())
}

fn after_entry_widget_area(ctx: &StepContext<'_>, entry: &Entry, out: &mut String) -> Result<()> {
    if !ctx.state.is_singular() || !ctx.supports(entry).after_entry_widget_area {
        return Ok(());
    }

    match ctx.config.widgets.get("after-entry").filter(|html| !html.trim().is_empty()) {
        Some(html) => {
            write!(out, "<div class=\"after-entry widget-area\">{}</div>", html)?;
        }
        None => debug!("after-entry 小工具区域为空"),
    }
    Ok(())
}

fn no_posts(ctx: &StepContext<'_>, out: &mut String) -> Result<()> {
    write!(out, "<div class=\"entry\"><p>{}</p></div>", ctx.config.theme_options.text.noposts)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdjacentEntry, View};
    use crate::theme::test_support::{sample_comment, sample_entry};
    use pretty_assertions::assert_eq;

    fn render(step: Step, config: &Config, entry: Option<&Entry>, state: &LoopState) -> String {
        let ctx = StepContext { config, entry, state };
        let mut out = String::new();
        run(step, &ctx, &mut out).unwrap();
        out
    }

    fn archive() -> LoopState {
        LoopState::archive(1, 1, "/")
    }

    fn single() -> LoopState {
        LoopState::singular(View::Single, "/")
    }

    #[test]
    fn archive_title_is_linked_h2() {
        let config = Config::default();
        let entry = sample_entry();
        assert_eq!(
            render(Step::PostTitle, &config, Some(&entry), &archive()),
            "<h2 class=\"entry-title\" itemprop=\"headline\"><a class=\"entry-title-link\" rel=\"bookmark\" href=\"/hello-world/\">Hello World</a></h2>\n"
        );
    }

    #[test]
    fn single_title_is_plain_h1() {
        let config = Config::default();
        let entry = sample_entry();
        assert_eq!(
            render(Step::PostTitle, &config, Some(&entry), &single()),
            "<h1 class=\"entry-title\" itemprop=\"headline\">Hello World</h1>\n"
        );
    }

    #[test]
    fn title_wrap_rules() {
        let mut config = Config::default();
        config.theme_options.semantic_headings = true;
        config.theme_options.link_post_title = false;
        let entry = sample_entry();
        assert!(render(Step::PostTitle, &config, Some(&entry), &archive()).starts_with("<h1 class=\"entry-title\" itemprop=\"headline\">Hello World</h1>"));

        config.theme_options.title_wrap = Some("p".to_string());
        assert!(render(Step::PostTitle, &config, Some(&entry), &archive()).starts_with("<p class=\"entry-title\""));
    }

    #[test]
    fn untitled_entry_gets_permalink_instead() {
        let config = Config::default();
        let mut entry = sample_entry();
        entry.title = "  ".to_string();
        assert_eq!(render(Step::PostTitle, &config, Some(&entry), &archive()), "");

        entry.title.clear();
        assert_eq!(
            render(Step::PostPermalink, &config, Some(&entry), &archive()),
            "<p class=\"entry-permalink\"><a href=\"/hello-world/\" rel=\"bookmark\">/hello-world/</a></p>"
        );
        assert_eq!(render(Step::PostPermalink, &config, Some(&entry), &single()), "");
    }

    #[test]
    fn post_info_only_for_supported_types() {
        let config = Config::default();
        let mut entry = sample_entry();
        let html = render(Step::PostInfo, &config, Some(&entry), &archive());
        assert!(html.starts_with("<p class=\"entry-meta\"><time class=\"entry-time\""));
        assert!(html.ends_with("</p>"));

        entry.post_type = crate::models::PostType::Page;
        assert_eq!(render(Step::PostInfo, &config, Some(&entry), &archive()), "");
    }

    #[test]
    fn empty_meta_is_suppressed() {
        let config = Config::default();
        let mut entry = sample_entry();
        entry.categories.clear();
        entry.tags.clear();
        assert_eq!(render(Step::PostMeta, &config, Some(&entry), &archive()), "");
    }

    #[test]
    fn footer_wrapper_follows_support() {
        let config = Config::default();
        let mut entry = sample_entry();
        assert_eq!(render(Step::EntryFooterOpen, &config, Some(&entry), &archive()), "<footer class=\"entry-footer\">");
        assert_eq!(render(Step::EntryFooterClose, &config, Some(&entry), &archive()), "</footer>");

        entry.post_type = crate::models::PostType::Page;
        assert_eq!(render(Step::EntryFooterOpen, &config, Some(&entry), &archive()), "");
    }

    #[test]
    fn archive_content_stops_at_more() {
        let config = Config::default();
        let entry = sample_entry();
        assert_eq!(
            render(Step::PostContent, &config, Some(&entry), &archive()),
            "<p>Intro text here.</p> <a href=\"/hello-world/\" class=\"more-link\">[Read more...]<span class=\"screen-reader-text\">about Hello World</span></a>\n"
        );
    }

    #[test]
    fn single_content_is_complete() {
        let config = Config::default();
        let entry = sample_entry();
        let html = render(Step::PostContent, &config, Some(&entry), &single());
        assert!(html.contains("Intro text here."));
        assert!(html.contains("The rest."));
        assert!(!html.contains("more-link"));
        assert!(!html.contains("<!--more-->"));
    }

    #[test]
    fn trackback_when_pings_open() {
        let mut config = Config::default();
        config.theme_options.default_ping_status = "open".to_string();
        let entry = sample_entry();
        let html = render(Step::PostContent, &config, Some(&entry), &single());
        assert!(html.contains("<!--\n<rdf:RDF"));
        assert!(html.contains("trackback:ping=\"/hello-world/trackback/\""));
    }

    #[test]
    fn page_edit_link() {
        let config = Config::default();
        let mut entry = sample_entry();
        entry.post_type = crate::models::PostType::Page;
        entry.edit_url = Some("https://example.com/edit".to_string());
        let html = render(Step::PostContent, &config, Some(&entry), &LoopState::singular(View::Page, "/"));
        assert!(html.ends_with("<a class=\"post-edit-link\" href=\"https://example.com/edit\">(Edit)</a>"));
    }

    #[test]
    fn excerpt_mode() {
        let mut config = Config::default();
        config.theme_options.content_archive = ContentArchive::Excerpts;
        let mut entry = sample_entry();
        assert_eq!(
            render(Step::PostContent, &config, Some(&entry), &archive()),
            "<p>Intro text here. The rest.</p>\n"
        );

        entry.excerpt = Some("Hand written".to_string());
        assert_eq!(render(Step::PostContent, &config, Some(&entry), &archive()), "<p>Hand written</p>\n");

        entry.excerpt = None;
        entry.pages = vec![format!("<p>{}</p>", vec!["word"; 60].join(" "))];
        let html = render(Step::PostContent, &config, Some(&entry), &archive());
        assert!(html.ends_with("word [&hellip;]</p>\n"));
        assert_eq!(html.matches("word").count(), EXCERPT_WORDS);
    }

    #[test]
    fn limited_content_mode() {
        let mut config = Config::default();
        config.theme_options.content_archive_limit = 12;
        config.theme_options.a11y.screen_reader_text = false;
        let entry = sample_entry();
        assert_eq!(
            render(Step::PostContent, &config, Some(&entry), &archive()),
            "<p>Intro text&#x02026; <a href=\"/hello-world/\" class=\"more-link\">[Read more...]</a></p>\n"
        );
    }

    #[test]
    fn archive_image_needs_option() {
        let mut config = Config::default();
        let mut entry = sample_entry();
        entry.image = Some("/img/cover.png".to_string());
        assert_eq!(render(Step::PostImage, &config, Some(&entry), &archive()), "");

        config.theme_options.content_archive_thumbnail = true;
        config.theme_options.image_alignment = "alignleft".to_string();
        assert_eq!(
            render(Step::PostImage, &config, Some(&entry), &archive()),
            "<a class=\"entry-image-link\" aria-hidden=\"true\" tabindex=\"-1\" href=\"/hello-world/\">\
             <img src=\"/img/cover.png\" class=\"alignleft post-image entry-image size-thumbnail\" alt=\"Hello World\" /></a>"
        );
        assert_eq!(render(Step::PostImage, &config, Some(&entry), &single()), "");
    }

    #[test]
    fn content_nav_for_multipage_entries() {
        let mut config = Config::default();
        config.theme_options.a11y.screen_reader_text = false;
        let mut entry = sample_entry();
        assert_eq!(render(Step::PostContentNav, &config, Some(&entry), &single()), "");

        entry.pages.push("<p>Two</p>".to_string());
        let mut state = single();
        state.content_page = 2;
        assert_eq!(
            render(Step::PostContentNav, &config, Some(&entry), &state),
            "<div class=\"entry-pagination pagination\">Pages: \
             <a href=\"/hello-world/\" class=\"post-page-numbers\">1</a> \
             <span class=\"post-page-numbers current\" aria-current=\"page\">2</span></div>"
        );
    }

    #[test]
    fn author_box_only_on_single_posts() {
        let config = Config::default();
        let mut entry = sample_entry();
        assert_eq!(render(Step::AuthorBoxSingle, &config, Some(&entry), &single()), "");

        entry.author.box_single = true;
        assert!(render(Step::AuthorBoxSingle, &config, Some(&entry), &single()).starts_with("<section class=\"author-box\""));
        assert_eq!(render(Step::AuthorBoxSingle, &config, Some(&entry), &archive()), "");
    }

    #[test]
    fn adjacent_nav_requires_support() {
        let mut config = Config::default();
        let entry = sample_entry();
        let mut state = single();
        state.previous_entry = Some(AdjacentEntry {
            title: "Older".to_string(),
            permalink: "/older/".to_string(),
        });
        assert_eq!(render(Step::AdjacentEntryNav, &config, Some(&entry), &state), "");

        config.theme_options.post_supports.adjacent_entry_nav = true;
        assert_eq!(
            render(Step::AdjacentEntryNav, &config, Some(&entry), &state),
            "<div class=\"adjacent-entry-pagination pagination\">\
             <div class=\"pagination-previous alignleft\"><a href=\"/older/\" rel=\"prev\">\
             <span class=\"screen-reader-text\">Previous Post: </span><span class=\"adjacent-post-link\">&#xAB; Older</span></a></div>\
             <div class=\"pagination-next alignright\"></div></div>"
        );
    }

    #[test]
    fn comments_on_singular_views() {
        let config = Config::default();
        let mut entry = sample_entry();
        assert_eq!(render(Step::CommentsTemplate, &config, Some(&entry), &single()), "");

        entry.comments.push(sample_comment());
        let html = render(Step::CommentsTemplate, &config, Some(&entry), &single());
        assert!(html.starts_with("<div class=\"entry-comments\" id=\"comments\"><h3>Comments</h3>"));
        assert!(html.contains("<span class=\"comment-author-name\">Sam</span> <span class=\"says\">says</span>"));
        assert!(html.contains("<p>Nice &lt;post&gt;</p>"));
        assert_eq!(render(Step::CommentsTemplate, &config, Some(&entry), &archive()), "");
    }

    #[test]
    fn widget_area_needs_content() {
        let mut config = Config::default();
        config.theme_options.post_supports.after_entry_widget_area = true;
        let entry = sample_entry();
        assert_eq!(render(Step::AfterEntryWidgetArea, &config, Some(&entry), &single()), "");

        config.widgets.insert("after-entry".to_string(), "<p>Subscribe</p>".to_string());
        assert_eq!(
            render(Step::AfterEntryWidgetArea, &config, Some(&entry), &single()),
            "<div class=\"after-entry widget-area\"><p>Subscribe</p></div>"
        );
    }

    #[test]
    fn format_image_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images").join("post-formats");
        std::fs::create_dir_all(&images).unwrap();
        std::fs::write(images.join("default.png"), b"png").unwrap();

        let mut config = Config::default();
        config.theme_options.post_formats = true;
        config.theme_options.post_format_images = true;
        config.theme_options.child_dir = Some(dir.path().to_path_buf());
        config.theme_options.child_url = "/child/".to_string();

        let mut entry = sample_entry();
        entry.format = Some("aside".to_string());
        assert_eq!(
            render(Step::PostFormatImage, &config, Some(&entry), &archive()),
            "<a href=\"/hello-world/\" rel=\"bookmark\"><img src=\"/child/images/post-formats/default.png\" class=\"post-format-image\" alt=\"post\" /></a>"
        );

        std::fs::write(images.join("aside.png"), b"png").unwrap();
        assert!(render(Step::PostFormatImage, &config, Some(&entry), &archive()).contains("aside.png\" class=\"post-format-image\" alt=\"aside\""));
    }

    #[test]
    fn entry_steps_skip_without_entry() {
        let config = Config::default();
        assert_eq!(render(Step::PostTitle, &config, None, &archive()), "");
        assert_eq!(
            render(Step::NoPosts, &config, None, &archive()),
            "<div class=\"entry\"><p>Sorry, no content matched your criteria.</p></div>"
        );
    }
}

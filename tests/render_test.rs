// 钩子流水线与文章循环的集成测试

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use rust_hexo_theme::models::{Author, PostType, Term, View};
use rust_hexo_theme::theme::entry_loop::LoopRenderer;
use rust_hexo_theme::theme::hooks::HookOverrides;
use rust_hexo_theme::{Config, Entry, Hook, LoopState, Pipeline, Step};

fn entry(slug: &str, title: &str) -> Entry {
    Entry {
        slug: slug.to_string(),
        title: title.to_string(),
        date: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
        post_type: PostType::Post,
        format: None,
        author: Author {
            display_name: "Jane Doe".to_string(),
            ..Author::default()
        },
        categories: vec![Term::new("News")],
        tags: Vec::new(),
        excerpt: None,
        image: None,
        custom_class: None,
        comments_open: false,
        comments: Vec::new(),
        edit_url: None,
        permalink: format!("/{}/", slug),
        pages: vec![format!("<p>{} body</p>\n", title)],
    }
}

#[test]
fn defaults_are_fresh_values() {
    let a = Pipeline::defaults();
    let mut builder = a.to_builder();
    builder.clear(Hook::EntryHeader);
    let changed = builder.build();

    assert_eq!(Pipeline::defaults(), a);
    assert!(changed.steps(Hook::EntryHeader).next().is_none());
    assert!(a.contains(Hook::EntryHeader, Step::PostTitle));
}

#[test]
fn config_overrides_reorder_the_header() {
    let overrides: HookOverrides = serde_yaml::from_str(
        "remove:\n  - { hook: entry_header, step: post_info, priority: 12 }\nadd:\n  - { hook: entry_header, step: post_info, priority: 8 }\n",
    )
    .unwrap();
    let pipeline = Pipeline::from_config(&overrides).unwrap();
    assert_eq!(
        pipeline.steps(Hook::EntryHeader).collect::<Vec<_>>(),
        vec![
            Step::PostFormatImage,
            Step::EntryHeaderOpen,
            Step::PostInfo,
            Step::PostTitle,
            Step::EntryHeaderClose,
        ]
    );

    let config = Config::default();
    let html = LoopRenderer::new(&config, &pipeline)
        .render(&[entry("first", "First")], &LoopState::archive(1, 1, "/"))
        .unwrap();
    assert!(html.find("entry-time").unwrap() < html.find("entry-title").unwrap());
}

#[test]
fn archive_page_lists_entries_then_nav() {
    let config = Config::default();
    let pipeline = Pipeline::defaults();
    let entries = vec![entry("first", "First"), entry("second", "Second")];
    let html = LoopRenderer::new(&config, &pipeline)
        .render(&entries, &LoopState::archive(1, 3, "/"))
        .unwrap();

    assert_eq!(html.matches("<article ").count(), 2);
    assert!(html.find("First body").unwrap() < html.find("Second body").unwrap());
    assert!(html.contains("<li class=\"active\"><a href=\"/\" aria-label=\"Current page\" aria-current=\"page\">"));
    assert!(html.contains("<a href=\"/page/2/\">"));
    assert!(html.trim_end().ends_with("</ul></div>"));
}

#[test]
fn single_view_has_no_archive_nav() {
    let config = Config::default();
    let pipeline = Pipeline::defaults();
    let html = LoopRenderer::new(&config, &pipeline)
        .render(&[entry("first", "First")], &LoopState::singular(View::Single, "/"))
        .unwrap();

    assert!(html.contains("<h1 class=\"entry-title\" itemprop=\"headline\">First</h1>"));
    assert!(!html.contains("archive-pagination"));
}

//! 文章信息与元数据模板中的短代码。

use std::fmt::Write;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;

use crate::models::{Config, Entry, Term};
use crate::theme::markup::{escape_attr, escape_html, escape_url};

fn shortcode_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(\w+)\]").expect("valid shortcode pattern"))
}

/// 展开模板中的短代码，未知短代码原样保留
pub fn expand(template: &str, config: &Config, entry: &Entry) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in shortcode_regex().captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        match render(&caps[1], config, entry)? {
            Some(html) => out.push_str(&html),
            None => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

fn render(name: &str, config: &Config, entry: &Entry) -> Result<Option<String>> {
    let text = &config.theme_options.text;
    let html = match name {
        "post_date" => {
            let mut html = String::new();
            write!(
                html,
                "<time class=\"entry-time\" datetime=\"{}\">{}</time>",
                entry.date.to_rfc3339(),
                entry.date.format(config.date_format())
            )?;
            html
        }
        "post_author_posts_link" => post_author_posts_link(entry),
        "post_comments" => {
            if !entry.comments_open && entry.comments.is_empty() {
                String::new()
            } else {
                let label = match entry.comments.len() {
                    0 => text.comments_zero.clone(),
                    1 => text.comments_one.clone(),
                    n => text.comments_many.replace('%', &n.to_string()),
                };
                format!(
                    "<span class=\"entry-comments-link\"><a href=\"{}#comments\">{}</a></span>",
                    escape_url(&entry.permalink),
                    label
                )
            }
        }
        "post_edit" => match &entry.edit_url {
            Some(url) => format!(
                "<span class=\"entry-edit-link\"><a class=\"post-edit-link\" href=\"{}\">{}</a></span>",
                escape_url(url),
                text.edit
            ),
            None => String::new(),
        },
        "post_categories" => term_list(
            &entry.categories,
            "entry-categories",
            &text.filed_under,
            &format!("{}categories/", config.root()),
            "category tag",
        ),
        "post_tags" => term_list(
            &entry.tags,
            "entry-tags",
            &text.tagged_with,
            &format!("{}tags/", config.root()),
            "tag",
        ),
        _ => return Ok(None),
    };
    Ok(Some(html))
}

fn post_author_posts_link(entry: &Entry) -> String {
    let author = &entry.author;
    if author.display_name.is_empty() {
        return String::new();
    }

    let name = format!("<span class=\"entry-author-name\">{}</span>", escape_html(&author.display_name));
    match &author.url {
        Some(url) => format!(
            "<span class=\"entry-author\"><a href=\"{}\" class=\"entry-author-link\" rel=\"author\">{}</a></span>",
            escape_url(url),
            name
        ),
        None => format!("<span class=\"entry-author\">{}</span>", name),
    }
}

fn term_list(terms: &[Term], class: &str, label: &str, base: &str, rel: &str) -> String {
    if terms.is_empty() {
        return String::new();
    }

    let links = terms
        .iter()
        .map(|term| {
            format!(
                "<a href=\"{}{}/\" rel=\"{}\">{}</a>",
                escape_url(base),
                escape_attr(&term.slug),
                rel,
                escape_html(&term.name)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("<span class=\"{}\">{}{}</span>", class, label, links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::test_support::sample_entry;

    #[test]
    fn byline_expands_known_codes() {
        let config = Config::default();
        let entry = sample_entry();
        let byline = expand(&config.theme_options.text.post_info, &config, &entry).unwrap();

        assert!(byline.starts_with("<time class=\"entry-time\" datetime=\"2024-03-05T10:00:00+00:00\">March 5, 2024</time> by "));
        assert!(byline.contains("<span class=\"entry-author-name\">Jane Doe</span>"));
        assert!(byline.contains("<a href=\"/hello-world/#comments\">Leave a Comment</a>"));
        assert!(!byline.contains('['));
    }

    #[test]
    fn meta_lists_terms() {
        let config = Config::default();
        let entry = sample_entry();
        let meta = expand("[post_categories] [post_tags]", &config, &entry).unwrap();
        assert_eq!(
            meta,
            "<span class=\"entry-categories\">Filed Under: <a href=\"/categories/news/\" rel=\"category tag\">News</a></span> \
             <span class=\"entry-tags\">Tagged With: <a href=\"/tags/rust/\" rel=\"tag\">Rust</a>, <a href=\"/tags/web-dev/\" rel=\"tag\">Web Dev</a></span>"
        );
    }

    #[test]
    fn unknown_codes_are_kept() {
        let config = Config::default();
        let entry = sample_entry();
        assert_eq!(expand("[gallery] x", &config, &entry).unwrap(), "[gallery] x");
    }

    #[test]
    fn comment_counts() {
        let config = Config::default();
        let mut entry = sample_entry();
        entry.comments = vec![crate::theme::test_support::sample_comment(); 3];
        assert!(expand("[post_comments]", &config, &entry).unwrap().contains(">3 Comments</a>"));

        entry.comments.clear();
        entry.comments_open = false;
        assert_eq!(expand("[post_comments]", &config, &entry).unwrap(), "");
    }

    #[test]
    fn bad_date_format_is_an_error() {
        let config = Config {
            date_format: Some("%Q".to_string()),
            ..Config::default()
        };
        let entry = sample_entry();
        assert!(expand("[post_date]", &config, &entry).is_err());
        assert_eq!(expand("[gallery]", &config, &entry).unwrap(), "[gallery]");
    }
}

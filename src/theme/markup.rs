//! 结构化标记：按上下文生成属性、包裹内容，以及转义等小工具。

use std::fmt::{self, Write};
use std::sync::OnceLock;

use regex::Regex;

/// 上下文的默认属性
fn default_attributes(context: &str) -> Vec<(&'static str, String)> {
    let class = |value: &str| vec![("class", value.to_string())];
    match context {
        "archive-pagination" => class("archive-pagination pagination"),
        "entry-pagination" => class("entry-pagination pagination"),
        "adjacent-entry-pagination" => class("adjacent-entry-pagination pagination"),
        "pagination-previous" => class("pagination-previous alignleft"),
        "pagination-next" => class("pagination-next alignright"),
        "entry-meta-before-content" | "entry-meta-after-content" => class("entry-meta"),
        "entry-title" => vec![
            ("class", "entry-title".to_string()),
            ("itemprop", "headline".to_string()),
        ],
        "entry-content" => vec![
            ("class", "entry-content".to_string()),
            ("itemprop", "text".to_string()),
        ],
        "entry-title-link" => vec![
            ("class", "entry-title-link".to_string()),
            ("rel", "bookmark".to_string()),
        ],
        "entry-image-link" => vec![
            ("class", "entry-image-link".to_string()),
            ("aria-hidden", "true".to_string()),
            ("tabindex", "-1".to_string()),
        ],
        "author-box" => vec![
            ("class", "author-box".to_string()),
            ("itemprop", "author".to_string()),
            ("itemscope", String::new()),
            ("itemtype", "https://schema.org/Person".to_string()),
        ],
        other => class(other),
    }
}

/// 生成上下文的属性字符串，`extra` 中的同名属性覆盖默认值
pub fn attributes(context: &str, extra: &[(&str, &str)]) -> String {
    let mut attrs: Vec<(String, String)> = default_attributes(context)
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    for (key, value) in extra {
        match attrs.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => attrs.push((key.to_string(), value.to_string())),
        }
    }

    attrs
        .iter()
        .map(|(key, value)| {
            if value.is_empty() {
                key.clone()
            } else {
                format!("{}=\"{}\"", key, escape_attr(value))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn open(out: &mut String, tag: &str, context: &str, extra: &[(&str, &str)]) -> fmt::Result {
    write!(out, "<{} {}>", tag, attributes(context, extra))
}

pub fn close(out: &mut String, tag: &str) -> fmt::Result {
    write!(out, "</{}>", tag)
}

/// 打开标签、写入内容，并按需关闭
pub fn markup(
    out: &mut String,
    tag: &str,
    context: &str,
    extra: &[(&str, &str)],
    content: Option<&str>,
    close_tag: bool,
) -> fmt::Result {
    open(out, tag, context, extra)?;
    if let Some(content) = content {
        out.push_str(content);
    }
    if close_tag {
        close(out, tag)?;
    }
    Ok(())
}

pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

pub fn escape_attr(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// 链接地址只做属性转义，保留原始路径
pub fn escape_url(url: &str) -> String {
    escape_attr(url)
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"))
}

fn p_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?p(\s[^>]*)?>").expect("valid paragraph pattern"))
}

/// 去掉所有 HTML 标签
pub fn strip_tags(html: &str) -> String {
    tag_regex().replace_all(html, "").into_owned()
}

/// 去掉 `<p>` 标签，保留其他标记
pub fn strip_p_tags(html: &str) -> String {
    p_tag_regex().replace_all(html, "").into_owned()
}

/// 空行分段，单个换行变为 `<br />`
pub fn autop(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| format!("<p>{}</p>\n", block.replace('\n', "<br />\n")))
        .collect()
}

/// 按单词截断纯文本，不超过 `max_chars` 个字符
pub fn truncate_words(text: &str, max_chars: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }

    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(index) => cut[..index].to_string(),
        None => cut,
    }
}

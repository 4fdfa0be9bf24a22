use crate::models::{Author, Config};
use crate::theme::markup::{self, autop, escape_attr, escape_html};

fn avatar(author: &Author, size: u32) -> String {
    match &author.avatar {
        Some(src) => format!(
            "<img alt=\"\" src=\"{}\" class=\"avatar avatar-{size} photo\" height=\"{size}\" width=\"{size}\" />",
            escape_attr(src),
            size = size
        ),
        None => String::new(),
    }
}

fn heading_element(config: &Config, author: &Author, single: bool) -> &'static str {
    let options = &config.theme_options;
    if single && !options.semantic_headings {
        "h4"
    } else if options.a11y.headings || author.headline.is_some() {
        "h4"
    } else {
        "h1"
    }
}

/// 生成作者框，`single` 为 false 时按作者归档页的介绍输出
pub fn author_box(config: &Config, author: &Author, single: bool) -> String {
    let options = &config.theme_options;
    let gravatar = avatar(author, options.gravatar_size);
    let name = escape_html(&author.display_name);
    let description = autop(&escape_html(&author.description));

    if options.html5 {
        let title = format!("{} <span itemprop=\"name\">{}</span>", options.text.about, name);
        let heading = heading_element(config, author, single);
        return format!(
            "<section {}>{}<{h} class=\"author-box-title\">{}</{h}><div class=\"author-box-content\" itemprop=\"description\">{}</div></section>",
            markup::attributes("author-box", &[]),
            gravatar,
            title,
            description,
            h = heading
        );
    }

    let title = format!("<strong>{} {}</strong>", options.text.about, name);
    if single || author.headline.is_some() {
        format!(
            "<div class=\"author-box\"><div>{} {}<br />{}</div></div>",
            gravatar, title, description
        )
    } else {
        format!(
            "<div class=\"author-box\">{}<h1>{}</h1><div>{}</div></div>",
            gravatar, title, description
        )
    }
}

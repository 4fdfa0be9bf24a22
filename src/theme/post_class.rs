use crate::models::{Config, Entry, LoopState};

/// 基础 class，对应内容本身的类型、格式和分类
fn base_classes(entry: &Entry, state: &LoopState) -> Vec<String> {
    let post_type = entry.post_type.as_str();
    let mut classes = vec![
        format!("post-{}", entry.slug),
        post_type.to_string(),
        format!("type-{}", post_type),
        "status-publish".to_string(),
        format!("format-{}", entry.format.as_deref().unwrap_or("standard")),
    ];

    if entry.image.is_some() && state.is_singular() {
        classes.push("has-post-thumbnail".to_string());
    }

    classes.push("hentry".to_string());
    classes.extend(entry.categories.iter().map(|t| format!("category-{}", t.slug)));
    classes.extend(entry.tags.iter().map(|t| format!("tag-{}", t.slug)));
    classes
}

/// 文章外层元素的 class 列表
pub fn post_classes(config: &Config, entry: &Entry, state: &LoopState) -> Vec<String> {
    let options = &config.theme_options;
    let mut classes = base_classes(entry, state);

    classes.push("entry".to_string());
    if options.html5 {
        classes.retain(|c| c != "hentry");
    }

    if let Some(custom) = entry.custom_class.as_deref().filter(|c| !c.trim().is_empty()) {
        classes.push(custom.trim().to_string());
    }

    let thumbnail = "has-post-thumbnail";
    if entry.image.is_some()
        && !state.is_singular()
        && options.content_archive_thumbnail
        && !classes.iter().any(|c| c == thumbnail)
    {
        classes.push(thumbnail.to_string());
    }

    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::View;
    use crate::theme::test_support::sample_entry;
    use pretty_assertions::assert_eq;

    #[test]
    fn html5_drops_hentry() {
        let config = Config::default();
        let entry = sample_entry();
        let classes = post_classes(&config, &entry, &LoopState::archive(1, 1, "/"));
        assert_eq!(
            classes,
            vec![
                "post-hello-world",
                "post",
                "type-post",
                "status-publish",
                "format-standard",
                "category-news",
                "tag-rust",
                "tag-web-dev",
                "entry",
            ]
        );
    }

    #[test]
    fn xhtml_keeps_hentry_and_custom_class() {
        let mut config = Config::default();
        config.theme_options.html5 = false;
        let mut entry = sample_entry();
        entry.custom_class = Some("featured".to_string());

        let classes = post_classes(&config, &entry, &LoopState::archive(1, 1, "/"));
        assert!(classes.contains(&"hentry".to_string()));
        assert_eq!(classes.last().map(String::as_str), Some("featured"));
    }

    #[test]
    fn thumbnail_class_once() {
        let mut config = Config::default();
        config.theme_options.content_archive_thumbnail = true;
        let mut entry = sample_entry();
        entry.image = Some("/img/a.png".to_string());

        let archive = post_classes(&config, &entry, &LoopState::archive(1, 1, "/"));
        assert_eq!(archive.iter().filter(|c| *c == "has-post-thumbnail").count(), 1);

        let single = post_classes(&config, &entry, &LoopState::singular(View::Single, "/"));
        assert_eq!(single.iter().filter(|c| *c == "has-post-thumbnail").count(), 1);
    }
}

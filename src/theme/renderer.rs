use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tera::{Context as TeraContext, Tera};
use tracing::{debug, error, info};

use crate::models::config::Config;
use crate::theme::error::ThemeError;
use crate::theme::pagination::build_pagination_plan;

/// 页面布局模板名
pub const LAYOUT: &str = "layout.html";

/// 主题未提供布局时使用的内置布局
const BUILTIN_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="{{ site.language }}">
<head>
<meta charset="utf-8">
<title>{{ page_title }}</title>
</head>
<body class="{{ body_class }}">
<div class="site-container">
<header class="site-header"><p class="site-title"><a href="{{ site.root }}">{{ site.title }}</a></p>{% if site.description %}<p class="site-description">{{ site.description }}</p>{% endif %}</header>
<main class="content">
{{ content | safe }}
</main>
</div>
</body>
</html>
"#;

/// 模板中的站点信息
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub language: String,
    pub root: String,
}

impl From<&Config> for SiteContext {
    fn from(config: &Config) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            language: config.language().to_string(),
            root: config.root(),
        }
    }
}

/// 单个页面的模板变量
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub page_title: String,
    pub body_class: String,
    /// 文章循环输出的 HTML
    pub content: String,
    pub current_page: u32,
    pub total_pages: u32,
}

pub struct ThemeRenderer {
    /// 主题目录
    pub theme_dir: PathBuf,
    /// 模板引擎
    pub tera: Tera,
    site: SiteContext,
}

impl ThemeRenderer {
    /// 创建主题渲染器，主题没有 `layout.html` 时使用内置布局
    pub fn new(base_dir: &Path, config: &Config) -> Result<Self> {
        let theme = config.theme.as_deref().unwrap_or("default");
        let theme_dir = base_dir.join("themes").join(theme);
        let layout_dir = theme_dir.join("layout");

        let mut tera = if layout_dir.exists() {
            let pattern = format!("{}/**/*.html", layout_dir.display());
            Tera::new(&pattern)
                .map_err(ThemeError::from)
                .with_context(|| format!("加载主题模板失败: {}", layout_dir.display()))?
        } else {
            debug!("主题目录不存在，使用内置布局: {}", theme_dir.display());
            Tera::default()
        };

        if !tera.get_template_names().any(|name| name == LAYOUT) {
            info!("Using built-in layout");
            tera.add_raw_template(LAYOUT, BUILTIN_LAYOUT)
                .map_err(ThemeError::from)?;
        }

        Self::register_functions(&mut tera);

        Ok(ThemeRenderer {
            theme_dir,
            tera,
            site: SiteContext::from(config),
        })
    }

    /// 注册模板函数
    fn register_functions(tera: &mut Tera) {
        tera.register_function("pagination_plan", Self::pagination_plan_function);
    }

    /// 用布局包裹一页内容
    pub fn render_page(&self, page: &PageContext) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("site", &self.site);
        context.insert("page_title", &page.page_title);
        context.insert("body_class", &page.body_class);
        context.insert("content", &page.content);
        context.insert("current_page", &page.current_page);
        context.insert("total_pages", &page.total_pages);

        match self.tera.render(LAYOUT, &context) {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("模板渲染失败: {}", e);
                Err(ThemeError::LayoutError {
                    message: format!("{}: {}", page.page_title, e),
                }
                .into())
            }
        }
    }

    /// 检查布局是否存在
    pub fn has_layout(&self, layout: &str) -> bool {
        self.tera.get_template_names().any(|name| name == layout)
    }

    /// `pagination_plan(current=2, total=5)`，返回链接序列
    fn pagination_plan_function(args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
        let number = |key: &str| -> tera::Result<u32> {
            match args.get(key) {
                Some(val) => val
                    .as_u64()
                    .map(|n| n.min(u32::MAX as u64) as u32)
                    .ok_or_else(|| tera::Error::msg(format!("参数 {} 必须是非负整数", key))),
                None => Err(tera::Error::msg(format!("缺少必要的参数: {}", key))),
            }
        };

        let plan = build_pagination_plan(number("current")?, number("total")?);
        serde_json::to_value(plan).map_err(tera::Error::msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn page(content: &str) -> PageContext {
        PageContext {
            page_title: "My Blog".to_string(),
            body_class: "blog".to_string(),
            content: content.to_string(),
            current_page: 2,
            total_pages: 3,
        }
    }

    #[test]
    fn builtin_layout_keeps_content_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ThemeRenderer::new(dir.path(), &Config::default()).unwrap();
        assert!(renderer.has_layout(LAYOUT));

        let html = renderer.render_page(&page("<p>Hi & bye</p>")).unwrap();
        assert!(html.contains("<main class=\"content\">\n<p>Hi & bye</p>\n</main>"));
        assert!(html.contains(">My Blog</a></p>"));
        assert!(html.contains("<html lang=\"en\">"));
    }

    #[test]
    fn theme_layout_can_use_pagination_plan() {
        let dir = tempfile::tempdir().unwrap();
        let layout_dir = dir.path().join("themes").join("default").join("layout");
        fs::create_dir_all(&layout_dir).unwrap();
        fs::write(
            layout_dir.join(LAYOUT),
            "{% for link in pagination_plan(current=current_page, total=total_pages) %}{{ link.kind }}{% if link.page is defined %}:{{ link.page }}{% endif %} {% endfor %}",
        )
        .unwrap();

        let renderer = ThemeRenderer::new(dir.path(), &Config::default()).unwrap();
        let html = renderer.render_page(&page("")).unwrap();
        assert_eq!(
            html,
            "previous_arrow first_page current_page:2 last_page next_arrow "
        );
    }

    #[test]
    fn missing_arguments_fail() {
        let dir = tempfile::tempdir().unwrap();
        let layout_dir = dir.path().join("themes").join("default").join("layout");
        fs::create_dir_all(&layout_dir).unwrap();
        fs::write(layout_dir.join(LAYOUT), "{{ pagination_plan(current=1) }}").unwrap();

        let renderer = ThemeRenderer::new(dir.path(), &Config::default()).unwrap();
        assert!(renderer.render_page(&page("")).is_err());
    }
}

use anyhow::Result;
use pulldown_cmark::{html, Options, Parser};

/// 内容分页标记
pub const NEXTPAGE_MARKER: &str = "<!--nextpage-->";

/// 将Markdown渲染为HTML
pub fn render(markdown: &str) -> Result<String> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    Ok(html_output)
}

/// 按 `<!--nextpage-->` 拆分后逐页渲染
pub fn render_pages(markdown: &str) -> Result<Vec<String>> {
    let pages = markdown
        .split(NEXTPAGE_MARKER)
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .map(render)
        .collect::<Result<Vec<_>>>()?;

    if pages.is_empty() {
        return Ok(vec![String::new()]);
    }
    Ok(pages)
}

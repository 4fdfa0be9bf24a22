//! 文章循环：按 HTML5 或 XHTML 结构输出每篇文章，并在各钩子处执行流水线。

use anyhow::Result;
use tracing::debug;

use crate::models::{Config, Entry, LoopState};
use crate::theme::hooks::{Hook, Pipeline};
use crate::theme::markup;
use crate::theme::post_class::post_classes;
use crate::theme::steps::{self, StepContext};

/// 文章循环渲染器
pub struct LoopRenderer<'a> {
    config: &'a Config,
    pipeline: &'a Pipeline,
}

impl<'a> LoopRenderer<'a> {
    pub fn new(config: &'a Config, pipeline: &'a Pipeline) -> Self {
        Self { config, pipeline }
    }

    /// 执行某个钩子上的全部步骤
    pub fn run_hook(&self, hook: Hook, entry: Option<&Entry>, state: &LoopState, out: &mut String) -> Result<()> {
        let ctx = StepContext {
            config: self.config,
            entry,
            state,
        };
        for step in self.pipeline.steps(hook) {
            steps::run(step, &ctx, out)?;
        }
        Ok(())
    }

    /// 渲染整个循环
    pub fn render(&self, entries: &[Entry], state: &LoopState) -> Result<String> {
        let mut out = String::new();

        if entries.is_empty() {
            debug!("循环为空，输出 loop_else");
            self.run_hook(Hook::LoopElse, None, state, &mut out)?;
            return Ok(out);
        }

        for entry in entries {
            if self.config.theme_options.html5 {
                self.render_html5(entry, state, &mut out)?;
            } else {
                self.render_xhtml(entry, state, &mut out)?;
            }
            out.push('\n');
        }

        self.run_hook(Hook::AfterEndwhile, None, state, &mut out)?;
        Ok(out)
    }

    fn render_html5(&self, entry: &Entry, state: &LoopState, out: &mut String) -> Result<()> {
        let classes = post_classes(self.config, entry, state).join(" ");
        markup::open(
            out,
            "article",
            "entry",
            &[
                ("class", classes.as_str()),
                ("aria-label", entry.title.as_str()),
                ("itemscope", ""),
                ("itemtype", "https://schema.org/CreativeWork"),
            ],
        )?;

        self.run_hook(Hook::EntryHeader, Some(entry), state, out)?;
        markup::open(out, "div", "entry-content", &[])?;
        self.run_hook(Hook::EntryContent, Some(entry), state, out)?;
        markup::close(out, "div")?;
        self.run_hook(Hook::EntryFooter, Some(entry), state, out)?;
        markup::close(out, "article")?;

        self.run_hook(Hook::AfterEntry, Some(entry), state, out)?;
        Ok(())
    }

    fn render_xhtml(&self, entry: &Entry, state: &LoopState, out: &mut String) -> Result<()> {
        let classes = post_classes(self.config, entry, state).join(" ");
        markup::open(out, "div", "entry", &[("class", classes.as_str())])?;

        self.run_hook(Hook::BeforePostTitle, Some(entry), state, out)?;
        self.run_hook(Hook::PostTitle, Some(entry), state, out)?;
        self.run_hook(Hook::BeforePostContent, Some(entry), state, out)?;
        out.push_str("<div class=\"entry-content\">");
        self.run_hook(Hook::PostContent, Some(entry), state, out)?;
        out.push_str("</div>");
        self.run_hook(Hook::AfterPostContent, Some(entry), state, out)?;
        markup::close(out, "div")?;

        self.run_hook(Hook::AfterPost, Some(entry), state, out)?;
        Ok(())
    }
}

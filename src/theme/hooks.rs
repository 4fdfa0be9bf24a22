//! 渲染钩子与流水线。
//!
//! 每个钩子（模板中的插槽）对应一组按优先级排序的渲染步骤。`Pipeline` 构建后
//! 不可变，需要调整时通过 `to_builder` 得到新的 `PipelineBuilder`。

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::theme::error::ThemeError;

/// 未指定优先级时使用的默认值
pub const DEFAULT_PRIORITY: i32 = 10;

/// 模板中的插槽
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    /// 文章头部
    EntryHeader,
    /// 文章内容
    EntryContent,
    /// 文章尾部
    EntryFooter,
    /// 文章之后
    AfterEntry,
    /// 标题前（XHTML）
    BeforePostTitle,
    /// 标题（XHTML）
    PostTitle,
    /// 内容前（XHTML）
    BeforePostContent,
    /// 内容（XHTML）
    PostContent,
    /// 内容后（XHTML）
    AfterPostContent,
    /// 文章之后（XHTML）
    AfterPost,
    /// 没有文章时
    LoopElse,
    /// 文章循环结束后
    AfterEndwhile,
}

impl Hook {
    pub const ALL: [Hook; 12] = [
        Hook::EntryHeader,
        Hook::EntryContent,
        Hook::EntryFooter,
        Hook::AfterEntry,
        Hook::BeforePostTitle,
        Hook::PostTitle,
        Hook::BeforePostContent,
        Hook::PostContent,
        Hook::AfterPostContent,
        Hook::AfterPost,
        Hook::LoopElse,
        Hook::AfterEndwhile,
    ];

    /// 是否在单篇文章的上下文中执行
    pub fn is_entry_hook(&self) -> bool {
        !matches!(self, Hook::LoopElse | Hook::AfterEndwhile)
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", name)
    }
}

/// 渲染步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PostFormatImage,
    EntryHeaderOpen,
    EntryHeaderClose,
    PostTitle,
    PostInfo,
    PostImage,
    PostContent,
    PostContentNav,
    PostPermalink,
    EntryFooterOpen,
    EntryFooterClose,
    PostMeta,
    AuthorBoxSingle,
    AdjacentEntryNav,
    CommentsTemplate,
    AfterEntryWidgetArea,
    NoPosts,
    PostsNav,
}

impl Step {
    /// 需要当前文章才能渲染
    pub fn needs_entry(&self) -> bool {
        !matches!(self, Step::NoPosts | Step::PostsNav)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", name)
    }
}

/// 一次注册
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub step: Step,
    pub priority: i32,
}

/// `_config.yml` 中的单条钩子调整
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookRule {
    pub hook: Hook,
    pub step: Step,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

/// `_config.yml` 中的钩子调整，先移除再添加
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HookOverrides {
    pub remove: Vec<HookRule>,
    pub add: Vec<HookRule>,
}

/// 不可变的渲染流水线
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pipeline {
    slots: BTreeMap<Hook, Vec<Registration>>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// 默认流水线
    pub fn defaults() -> Self {
        let mut builder = PipelineBuilder::default();

        // HTML5
        builder
            .add(Hook::EntryHeader, Step::PostFormatImage, 4)
            .add(Hook::EntryHeader, Step::EntryHeaderOpen, 5)
            .add(Hook::EntryHeader, Step::EntryHeaderClose, 15)
            .add(Hook::EntryHeader, Step::PostTitle, DEFAULT_PRIORITY)
            .add(Hook::EntryHeader, Step::PostInfo, 12)
            .add(Hook::EntryContent, Step::PostImage, 8)
            .add(Hook::EntryContent, Step::PostContent, DEFAULT_PRIORITY)
            .add(Hook::EntryContent, Step::PostContentNav, 12)
            .add(Hook::EntryContent, Step::PostPermalink, 14)
            .add(Hook::EntryFooter, Step::EntryFooterOpen, 5)
            .add(Hook::EntryFooter, Step::EntryFooterClose, 15)
            .add(Hook::EntryFooter, Step::PostMeta, DEFAULT_PRIORITY)
            .add(Hook::AfterEntry, Step::AuthorBoxSingle, 8)
            .add(Hook::AfterEntry, Step::AdjacentEntryNav, DEFAULT_PRIORITY)
            .add(Hook::AfterEntry, Step::CommentsTemplate, DEFAULT_PRIORITY)
            .add(Hook::AfterEntry, Step::AfterEntryWidgetArea, DEFAULT_PRIORITY);

        // XHTML
        builder
            .add(Hook::BeforePostTitle, Step::PostFormatImage, DEFAULT_PRIORITY)
            .add(Hook::PostTitle, Step::PostTitle, DEFAULT_PRIORITY)
            .add(Hook::PostContent, Step::PostImage, DEFAULT_PRIORITY)
            .add(Hook::PostContent, Step::PostContent, DEFAULT_PRIORITY)
            .add(Hook::PostContent, Step::PostPermalink, DEFAULT_PRIORITY)
            .add(Hook::PostContent, Step::PostContentNav, DEFAULT_PRIORITY)
            .add(Hook::BeforePostContent, Step::PostInfo, DEFAULT_PRIORITY)
            .add(Hook::AfterPostContent, Step::PostMeta, DEFAULT_PRIORITY)
            .add(Hook::AfterPost, Step::AuthorBoxSingle, DEFAULT_PRIORITY);

        builder
            .add(Hook::LoopElse, Step::NoPosts, DEFAULT_PRIORITY)
            .add(Hook::AfterEndwhile, Step::PostsNav, DEFAULT_PRIORITY);

        builder.build()
    }

    /// 默认流水线加上配置中的调整
    pub fn from_config(overrides: &HookOverrides) -> Result<Self, ThemeError> {
        let mut builder = Self::defaults().to_builder();

        for rule in &overrides.remove {
            builder.remove(rule.hook, rule.step, rule.priority);
        }

        for rule in &overrides.add {
            if !rule.hook.is_entry_hook() && rule.step.needs_entry() {
                return Err(ThemeError::HookError {
                    hook: rule.hook.to_string(),
                    message: format!("步骤 {} 需要文章上下文", rule.step),
                });
            }
            builder.add(rule.hook, rule.step, rule.priority);
        }

        Ok(builder.build())
    }

    /// 按执行顺序返回钩子上的步骤
    pub fn steps(&self, hook: Hook) -> impl Iterator<Item = Step> + '_ {
        self.registrations(hook).iter().map(|r| r.step)
    }

    pub fn registrations(&self, hook: Hook) -> &[Registration] {
        self.slots.get(&hook).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, hook: Hook, step: Step) -> bool {
        self.steps(hook).any(|s| s == step)
    }

    pub fn to_builder(&self) -> PipelineBuilder {
        PipelineBuilder {
            slots: self.slots.clone(),
        }
    }
}

/// 流水线构建器，注册顺序在同优先级内保持不变
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    slots: BTreeMap<Hook, Vec<Registration>>,
}

impl PipelineBuilder {
    /// 注册步骤，相同的钩子、步骤和优先级只保留一次
    pub fn add(&mut self, hook: Hook, step: Step, priority: i32) -> &mut Self {
        let registration = Registration { step, priority };
        let slot = self.slots.entry(hook).or_default();
        if !slot.contains(&registration) {
            slot.push(registration);
        }
        self
    }

    pub fn remove(&mut self, hook: Hook, step: Step, priority: i32) -> &mut Self {
        let registration = Registration { step, priority };
        let removed = match self.slots.get_mut(&hook) {
            Some(slot) => {
                let before = slot.len();
                slot.retain(|r| *r != registration);
                before != slot.len()
            }
            None => false,
        };
        if !removed {
            debug!("钩子 {} 上没有优先级为 {} 的步骤 {}", hook, priority, step);
        }
        self
    }

    pub fn clear(&mut self, hook: Hook) -> &mut Self {
        self.slots.remove(&hook);
        self
    }

    pub fn build(&self) -> Pipeline {
        let slots = self
            .slots
            .iter()
            .filter(|(_, regs)| !regs.is_empty())
            .map(|(hook, regs)| {
                let mut regs = regs.clone();
                // 稳定排序，同优先级保持注册顺序
                regs.sort_by_key(|r| r.priority);
                (*hook, regs)
            })
            .collect();
        Pipeline { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn steps(pipeline: &Pipeline, hook: Hook) -> Vec<Step> {
        pipeline.steps(hook).collect()
    }

    #[test]
    fn default_header_order() {
        let pipeline = Pipeline::defaults();
        assert_eq!(
            steps(&pipeline, Hook::EntryHeader),
            vec![
                Step::PostFormatImage,
                Step::EntryHeaderOpen,
                Step::PostTitle,
                Step::PostInfo,
                Step::EntryHeaderClose,
            ]
        );
        assert_eq!(
            steps(&pipeline, Hook::EntryContent),
            vec![Step::PostImage, Step::PostContent, Step::PostContentNav, Step::PostPermalink]
        );
        assert_eq!(
            steps(&pipeline, Hook::EntryFooter),
            vec![Step::EntryFooterOpen, Step::PostMeta, Step::EntryFooterClose]
        );
        assert_eq!(
            steps(&pipeline, Hook::AfterEntry),
            vec![
                Step::AuthorBoxSingle,
                Step::AdjacentEntryNav,
                Step::CommentsTemplate,
                Step::AfterEntryWidgetArea,
            ]
        );
    }

    #[test]
    fn xhtml_content_keeps_registration_order() {
        let pipeline = Pipeline::defaults();
        assert_eq!(
            steps(&pipeline, Hook::PostContent),
            vec![Step::PostImage, Step::PostContent, Step::PostPermalink, Step::PostContentNav]
        );
        assert_eq!(steps(&pipeline, Hook::LoopElse), vec![Step::NoPosts]);
        assert_eq!(steps(&pipeline, Hook::AfterEndwhile), vec![Step::PostsNav]);
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut builder = Pipeline::builder();
        builder
            .add(Hook::EntryHeader, Step::PostTitle, 10)
            .add(Hook::EntryHeader, Step::PostTitle, 10)
            .add(Hook::EntryHeader, Step::PostTitle, 20);
        let pipeline = builder.build();
        assert_eq!(pipeline.registrations(Hook::EntryHeader).len(), 2);
    }

    #[test]
    fn remove_requires_matching_priority() {
        let mut builder = Pipeline::defaults().to_builder();
        builder.remove(Hook::EntryHeader, Step::PostInfo, 10);
        assert!(builder.build().contains(Hook::EntryHeader, Step::PostInfo));

        builder.remove(Hook::EntryHeader, Step::PostInfo, 12);
        assert!(!builder.build().contains(Hook::EntryHeader, Step::PostInfo));
    }

    #[test]
    fn derived_builders_leave_defaults_untouched() {
        let defaults = Pipeline::defaults();
        let mut builder = defaults.to_builder();
        builder.clear(Hook::EntryHeader);
        let trimmed = builder.build();

        assert!(steps(&trimmed, Hook::EntryHeader).is_empty());
        assert_eq!(steps(&defaults, Hook::EntryHeader).len(), 5);
        assert_eq!(defaults, Pipeline::defaults());
    }

    #[test]
    fn moving_a_step_by_priority() {
        let mut builder = Pipeline::defaults().to_builder();
        builder
            .remove(Hook::EntryHeader, Step::PostInfo, 12)
            .add(Hook::EntryHeader, Step::PostInfo, 6);
        assert_eq!(
            steps(&builder.build(), Hook::EntryHeader),
            vec![
                Step::PostFormatImage,
                Step::EntryHeaderOpen,
                Step::PostInfo,
                Step::PostTitle,
                Step::EntryHeaderClose,
            ]
        );
    }

    #[test]
    fn overrides_from_yaml() {
        let yaml = r#"
remove:
  - hook: entry_footer
    step: post_meta
add:
  - hook: entry_header
    step: post_meta
    priority: 13
"#;
        let overrides: HookOverrides = serde_yaml::from_str(yaml).unwrap();
        let pipeline = Pipeline::from_config(&overrides).unwrap();
        assert!(!pipeline.contains(Hook::EntryFooter, Step::PostMeta));
        let header = steps(&pipeline, Hook::EntryHeader);
        assert_eq!(
            header[3..].to_vec(),
            vec![Step::PostInfo, Step::PostMeta, Step::EntryHeaderClose]
        );
    }

    #[test]
    fn entry_steps_cannot_move_outside_the_loop() {
        let overrides = HookOverrides {
            remove: vec![],
            add: vec![HookRule {
                hook: Hook::LoopElse,
                step: Step::PostTitle,
                priority: DEFAULT_PRIORITY,
            }],
        };
        assert!(Pipeline::from_config(&overrides).is_err());
    }

    #[test]
    fn display_uses_config_names() {
        assert_eq!(Hook::AfterEndwhile.to_string(), "after_endwhile");
        assert_eq!(Step::AuthorBoxSingle.to_string(), "author_box_single");
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::loader::SiteContent;
use crate::models::{AdjacentEntry, Config, Entry, LoopState, View};
use crate::theme::entry_loop::LoopRenderer;
use crate::theme::hooks::Pipeline;
use crate::theme::renderer::{PageContext, ThemeRenderer};

/// HTML 生成器
pub struct HtmlGenerator {
    /// 输出目录
    pub output_dir: PathBuf,
    /// 站点配置
    pub config: Config,
    /// 渲染流水线
    pub pipeline: Pipeline,
    renderer: ThemeRenderer,
}

impl HtmlGenerator {
    /// 创建新的 HTML 生成器，流水线由配置中的钩子调整得到
    pub fn new(base_dir: &Path, output_dir: PathBuf, config: Config) -> Result<Self> {
        let pipeline = Pipeline::from_config(&config.hooks)?;
        let renderer = ThemeRenderer::new(base_dir, &config)?;
        Ok(Self {
            output_dir,
            config,
            pipeline,
            renderer,
        })
    }

    /// 生成所有页面，返回写入的文件数
    pub fn generate(&self, content: &SiteContent) -> Result<usize> {
        info!("开始生成静态网站...");

        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("创建输出目录失败: {}", self.output_dir.display()))?;

        self.copy_theme_assets()?;

        let mut written = 0;
        written += self.generate_paginated_index(&content.posts)?;
        written += self.generate_posts(&content.posts)?;
        written += self.generate_pages(&content.pages)?;

        info!("生成完成，共 {} 个文件", written);
        Ok(written)
    }

    /// 复制主题静态资源
    fn copy_theme_assets(&self) -> Result<()> {
        let theme_source = self.renderer.theme_dir.join("source");
        if !theme_source.exists() {
            return Ok(());
        }

        let theme_dest = self.output_dir.join("assets");
        for entry in WalkDir::new(&theme_source) {
            let entry = entry?;
            let src_path = entry.path();
            if !src_path.is_file() {
                continue;
            }

            let dest_path = theme_dest.join(src_path.strip_prefix(&theme_source)?);
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(src_path, &dest_path)?;
        }

        info!("主题资源已复制");
        Ok(())
    }

    /// 生成分页的首页列表
    fn generate_paginated_index(&self, posts: &[Entry]) -> Result<usize> {
        info!("Generating paginated index pages...");

        let per_page = self.config.per_page();
        let total_pages = posts.len().div_ceil(per_page).max(1);
        let root = self.config.root();

        for page_num in 1..=total_pages {
            let start = (page_num - 1) * per_page;
            let end = (start + per_page).min(posts.len());
            let state = LoopState::archive(page_num as u32, total_pages as u32, &root);

            let body = LoopRenderer::new(&self.config, &self.pipeline).render(&posts[start..end], &state)?;

            let (file_name, page_title, body_class) = if page_num == 1 {
                ("index.html".to_string(), self.config.title.clone(), "blog".to_string())
            } else {
                (
                    format!("{}/{}/index.html", self.config.pagination_dir(), page_num),
                    format!(
                        "{} - {}{}",
                        self.config.title, self.config.theme_options.text.page, page_num
                    ),
                    "blog paged".to_string(),
                )
            };

            let html = self.renderer.render_page(&PageContext {
                page_title,
                body_class,
                content: body,
                current_page: page_num as u32,
                total_pages: total_pages as u32,
            })?;
            self.write(&file_name, &html)?;
        }

        Ok(total_pages)
    }

    /// 生成文章页，相邻文章按日期排列
    fn generate_posts(&self, posts: &[Entry]) -> Result<usize> {
        info!("Generating post pages...");

        let mut written = 0;
        for (index, post) in posts.iter().enumerate() {
            let mut state = LoopState::singular(View::Single, &self.config.root());
            // 列表从新到旧，上一篇是更早的文章
            state.previous_entry = posts.get(index + 1).map(AdjacentEntry::from);
            state.next_entry = index
                .checked_sub(1)
                .and_then(|i| posts.get(i))
                .map(AdjacentEntry::from);

            written += self.generate_entry(post, state, "single")?;
        }
        Ok(written)
    }

    /// 生成独立页面
    fn generate_pages(&self, pages: &[Entry]) -> Result<usize> {
        info!("Generating pages...");

        let mut written = 0;
        for page in pages {
            let state = LoopState::singular(View::Page, &self.config.root());
            written += self.generate_entry(page, state, "page")?;
        }
        Ok(written)
    }

    /// 按内容分页输出单篇内容
    fn generate_entry(&self, entry: &Entry, mut state: LoopState, body_class: &str) -> Result<usize> {
        let total = entry.pages.len().max(1) as u32;
        for page in 1..=total {
            state.content_page = page;
            let body = LoopRenderer::new(&self.config, &self.pipeline)
                .render(std::slice::from_ref(entry), &state)?;

            let file_name = if page == 1 {
                format!("{}/index.html", entry.slug)
            } else {
                format!("{}/{}/index.html", entry.slug, page)
            };

            let html = self.renderer.render_page(&PageContext {
                page_title: format!("{} - {}", entry.title, self.config.title),
                body_class: format!("{} {}-{}", body_class, entry.post_type.as_str(), entry.slug),
                content: body,
                current_page: page,
                total_pages: total,
            })?;
            self.write(&file_name, &html)?;
        }

        debug!("已生成: {} ({} 页)", entry.slug, total);
        Ok(total as usize)
    }

    fn write(&self, file_name: &str, html: &str) -> Result<()> {
        let output_file = self.output_dir.join(file_name);
        if let Some(parent) = output_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_file, html)
            .with_context(|| format!("写入文件失败: {}", output_file.display()))?;
        Ok(())
    }
}

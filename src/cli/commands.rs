use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::{HtmlGenerator, Loader};
use crate::models::Config;
use crate::theme::hooks::{Hook, Pipeline};
use crate::theme::pagination::{build_pagination_plan, PageLink};

/// 站点配置文件名
pub const CONFIG_FILE: &str = "_config.yml";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 指定站点目录
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 生成静态文件
    Generate(GenArgs),

    /// 查看分页导航的链接序列
    Plan(PlanArgs),

    /// 列出各钩子上的渲染步骤
    Hooks,
}

#[derive(Args)]
pub struct GenArgs {
    /// 输出目录，默认为配置中的 public_dir
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct PlanArgs {
    /// 当前页
    #[arg(short, long)]
    pub current: u32,

    /// 总页数
    #[arg(short, long)]
    pub total: u32,

    /// 以 JSON 输出
    #[arg(long)]
    pub json: bool,
}

/// 读取站点配置，文件不存在时使用默认配置
fn load_config(site_path: &Path) -> Result<Config> {
    let config_path = site_path.join(CONFIG_FILE);
    if config_path.exists() {
        Config::load(&config_path)
    } else {
        warn!("未找到配置文件 {}，使用默认配置", config_path.display());
        Ok(Config::default())
    }
}

/// 分页链接的终端显示形式
fn describe(link: &PageLink, total_pages: u32) -> String {
    match link {
        PageLink::PreviousArrow => "«".to_string(),
        PageLink::FirstPage => "1".to_string(),
        PageLink::Ellipsis => "…".to_string(),
        PageLink::WindowPage(page) => page.to_string(),
        PageLink::CurrentPage(page) => format!("[{}]", page).bright_green().to_string(),
        PageLink::LastPage => total_pages.to_string(),
        PageLink::NextArrow => "»".to_string(),
    }
}

/// 执行命令
pub fn execute(cli: Cli) -> Result<()> {
    let site_path = cli.path.clone();

    match cli.command {
        Commands::Generate(args) => {
            let config = load_config(&site_path)?;
            let output_dir = args
                .output
                .unwrap_or_else(|| site_path.join(config.public_dir.as_deref().unwrap_or("public")));

            let content = Loader::new(&site_path, &config).load()?;
            let generator = HtmlGenerator::new(&site_path, output_dir.clone(), config)?;
            let written = generator.generate(&content)?;

            info!("Generated site at: {}", output_dir.display());
            println!(
                "{} {} files -> {}",
                "Generated".bright_green(),
                written,
                output_dir.display()
            );
        }
        Commands::Plan(args) => {
            let plan = build_pagination_plan(args.current, args.total);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else if plan.is_empty() {
                println!("{}", "没有分页导航".yellow());
            } else {
                let line = plan
                    .iter()
                    .map(|link| describe(link, args.total))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{}", line);
            }
        }
        Commands::Hooks => {
            let config = load_config(&site_path)?;
            let pipeline = Pipeline::from_config(&config.hooks)?;
            for hook in Hook::ALL {
                let registrations = pipeline.registrations(hook);
                if registrations.is_empty() {
                    continue;
                }
                println!("{}", hook.to_string().bright_cyan());
                for registration in registrations {
                    println!("  {:>3}  {}", registration.priority, registration.step);
                }
            }
        }
    }

    Ok(())
}

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use clap::Parser;

mod application;
mod domain;
mod infrastructure;
mod presentation;

use application::Config;
use domain::{parse_timespan, scan_directory, FileFilter};
use infrastructure::{ErrorLogger, Logger, LoggerTrait};
use presentation::{print_search_banner, SearchSummary};

/// 查找最近修改文件的命令行工具
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 修改时间范围 (例如 "5m", "1h", "3.2m", "10s", "2d")，未指定时不限制修改时间
    #[clap(short, long)]
    timespan: Option<String>,

    /// 要搜索的根目录，可重复指定 (默认使用配置中的目录，初始值为 "/")
    #[clap(short, long)]
    directory: Vec<PathBuf>,

    /// 要搜索的文件扩展名，可重复指定 ("txt" 与 ".txt" 等价)，未指定时搜索所有扩展名
    #[clap(short, long)]
    ext: Vec<String>,

    /// 排除包含指定内容的路径，可重复指定 (区分大小写)
    #[clap(short = 'x', long)]
    exclude: Vec<String>,

    /// 仅搜索包含指定内容的路径，可重复指定 (不区分大小写)
    #[clap(short, long)]
    include: Vec<String>,

    /// 遵循 .gitignore 规则，默认情况下会搜索所有文件
    #[clap(long)]
    respect_gitignore: bool,

    /// 启用详细日志记录，日志文件将保存到当前目录下
    #[clap(long)]
    log: bool,

    /// 配置文件路径，未指定时尝试加载程序同级目录下的 config.toml
    #[clap(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置: 指定路径时不存在则创建，默认路径仅在已存在时加载
    let config = match &args.config {
        Some(path) => Config::load_or_create(path)?,
        None => {
            let default_path = Config::default_config_path()?;
            if default_path.exists() {
                Config::load_from_file(&default_path)?
            } else {
                Config::default()
            }
        }
    };
    config.validate()?;

    // 初始化日志记录器
    let logger: Arc<dyn LoggerTrait> = Arc::new(Logger::new(args.log)?);
    let error_logger = Arc::new(ErrorLogger::new(args.log)?);

    // 解析时间范围，格式错误时在遍历开始前直接退出
    let max_age_secs = args.timespan.as_deref().map(parse_timespan).transpose()?;

    // 根目录: 命令行优先，否则使用配置的默认目录
    let roots = if args.directory.is_empty() {
        vec![PathBuf::from(&config.search.default_directory)]
    } else {
        args.directory.clone()
    };

    // 排除规则: 配置文件中的默认排除追加在命令行排除之后
    let mut excluded_paths = args.exclude.clone();
    excluded_paths.extend(config.exclude.default_paths.iter().cloned());

    let filter = FileFilter::new(
        args.ext.clone(),
        excluded_paths,
        args.include.clone(),
        max_age_secs,
    );

    let respect_gitignore = args.respect_gitignore || config.search.respect_gitignore;

    // 输出当前生效的过滤条件
    print_search_banner(&roots, &filter, args.timespan.as_deref());

    // 记录搜索参数到日志
    if logger.is_enabled() {
        for root in &roots {
            logger.log_message(&format!("搜索目录: {}", root.display()))?;
        }
        match args.timespan.as_deref() {
            Some(timespan) => logger.log_message(&format!("时间范围: {}", timespan))?,
            None => logger.log_message("时间范围: 不限制")?,
        }
        if !filter.extensions.is_empty() {
            let mut extensions: Vec<&str> = filter.extensions.iter().map(|s| s.as_str()).collect();
            extensions.sort();
            logger.log_message(&format!("扩展名过滤: {}", extensions.join(", ")))?;
        }
        if !filter.excluded_paths.is_empty() {
            logger.log_message(&format!("排除规则: {}", filter.excluded_paths.join(", ")))?;
        }
        if !filter.included_paths.is_empty() {
            logger.log_message(&format!("包含规则: {}", filter.included_paths.join(", ")))?;
        }
        logger.log_message(&format!("遵循 .gitignore 规则: {}", respect_gitignore))?;
    }

    // 设置 Ctrl+C 处理器，遍历循环在条目之间检查取消标志
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_clone = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        cancel_clone.store(true, Ordering::SeqCst);
    })
    .context("无法设置 Ctrl+C 处理器")?;

    let mut summary = SearchSummary::new();

    // 执行遍历，匹配的文件即时输出一行一个路径
    let now = SystemTime::now();
    let outcome = scan_directory(
        &roots,
        &filter,
        now,
        respect_gitignore,
        Arc::clone(&cancel),
        Arc::clone(&logger),
        Arc::clone(&error_logger),
        |path, _size| {
            println!("{}", path.display());
            Ok(())
        },
    )?;

    // 用户取消按正常结束处理，已输出的结果仍然有效
    if outcome.cancelled {
        println!("\n搜索已被用户取消，提前结束遍历。");
        if logger.is_enabled() {
            logger.log_message("搜索被用户取消")?;
        }
    }

    if outcome.skipped_errors > 0 && logger.is_enabled() {
        logger.log_message(&format!("因条目级错误跳过 {} 个条目", outcome.skipped_errors))?;
    }

    // 打印摘要
    summary.scanned_files = outcome.scanned_files;
    summary.matched_files = outcome.matched_files;
    summary.total_size = outcome.total_size;
    summary.print()?;

    // 完成日志记录
    error_logger.print_error_summary();
    error_logger.finalize()?;
    if logger.is_enabled() {
        logger.finalize(
            outcome.scanned_files,
            outcome.matched_files,
            outcome.total_size,
            summary.start_time.elapsed(),
        )?;
    }

    Ok(())
}

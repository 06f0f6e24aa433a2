use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Result;
use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};

use crate::infrastructure::{ErrorLogger, ErrorType, LoggerTrait};

/// 文件筛选条件
///
/// 在遍历开始前构建完毕，遍历过程中只读不改。
#[derive(Debug, Clone)]
pub struct FileFilter {
    /// 归一化后的扩展名集合，空集合表示匹配所有扩展名
    pub extensions: HashSet<String>,
    /// 排除规则，区分大小写的子串匹配
    pub excluded_paths: Vec<String>,
    /// 包含规则，不区分大小写的子串匹配，空列表表示不限制
    pub included_paths: Vec<String>,
    /// 修改时间上限（秒），None 表示不限制
    pub max_age_secs: Option<f64>,
}

impl FileFilter {
    /// 创建新的文件过滤器
    ///
    /// 扩展名统一转为小写并补全前导 '.'（"txt" 与 ".txt" 等价），
    /// 包含规则转为小写以便不区分大小写匹配。
    pub fn new(
        extensions: Vec<String>,
        excluded_paths: Vec<String>,
        included_paths: Vec<String>,
        max_age_secs: Option<f64>,
    ) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();

        let included_paths = included_paths
            .into_iter()
            .map(|pattern| pattern.to_lowercase())
            .collect();

        Self {
            extensions,
            excluded_paths,
            included_paths,
            max_age_secs,
        }
    }

    /// 检查路径是否命中排除规则
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excluded_paths
            .iter()
            .any(|excluded| path_str.contains(excluded.as_str()))
    }

    /// 检查路径是否满足包含规则
    pub fn matches_include(&self, path: &Path) -> bool {
        if self.included_paths.is_empty() {
            return true;
        }

        let path_str = path.to_string_lossy().to_lowercase();
        self.included_paths
            .iter()
            .any(|included| path_str.contains(included.as_str()))
    }

    /// 检查文件扩展名是否符合要求
    ///
    /// 比较时带前导 '.' 且不区分大小写，没有扩展名的文件在
    /// 配置了扩展名过滤时一律不匹配。
    pub fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        match path.extension() {
            Some(ext) => {
                let suffix = format!(".{}", ext.to_string_lossy().to_lowercase());
                self.extensions.contains(&suffix)
            }
            None => false,
        }
    }

    /// 检查修改时间是否落在时间范围内
    ///
    /// 修改时间晚于当前时间的文件（时间差为负）总是通过非负的时间上限。
    pub fn matches_age(&self, now: SystemTime, modified: SystemTime) -> bool {
        let max_age = match self.max_age_secs {
            Some(max_age) => max_age,
            None => return true,
        };

        let age_secs = match now.duration_since(modified) {
            Ok(age) => age.as_secs_f64(),
            Err(err) => -err.duration().as_secs_f64(),
        };

        age_secs <= max_age
    }
}

/// 单次扫描的统计结果
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanOutcome {
    /// 检查过的普通文件数
    pub scanned_files: u64,
    /// 通过全部过滤条件的文件数
    pub matched_files: u64,
    /// 匹配文件的总大小（字节）
    pub total_size: u64,
    /// 因条目级错误被跳过的数量
    pub skipped_errors: u64,
    /// 遍历是否被用户取消
    pub cancelled: bool,
}

/// 依次遍历所有根目录，对通过全部过滤条件的文件执行回调函数
///
/// 单线程串行遍历。每处理一个条目前检查一次取消标志，置位后停止
/// 枚举并在结果中标记 cancelled，已输出的匹配仍然有效。条目级的
/// 元数据或遍历错误记录后跳过，不中断整体遍历。
pub fn scan_directory<F>(
    roots: &[PathBuf],
    filter: &FileFilter,
    now: SystemTime,
    respect_gitignore: bool,
    cancel: Arc<AtomicBool>,
    logger: Arc<dyn LoggerTrait>,
    error_logger: Arc<ErrorLogger>,
    mut on_match: F,
) -> Result<ScanOutcome>
where
    F: FnMut(&Path, u64) -> Result<()>,
{
    let mut outcome = ScanOutcome::default();

    // 创建进度条
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("无效的进度条模板"),
    );
    progress.set_message("已检查 0 个文件");

    // 记录日志
    if logger.is_enabled() {
        for root in roots {
            logger.log_message(&format!("开始扫描目录: {}", root.display()))?;
        }
    }

    // 创建遍历器，多个根目录串联在同一次遍历中依次处理
    let (first_root, other_roots) = match roots.split_first() {
        Some(parts) => parts,
        None => anyhow::bail!("未指定搜索目录"),
    };

    let mut builder = WalkBuilder::new(first_root);
    for root in other_roots {
        builder.add(root);
    }
    builder
        .hidden(false) // 包含隐藏文件
        .follow_links(false) // 不跟随符号链接
        .git_global(respect_gitignore)
        .git_ignore(respect_gitignore)
        .git_exclude(respect_gitignore)
        .threads(1);

    for result in builder.build() {
        // 在条目之间响应取消请求
        if cancel.load(Ordering::SeqCst) {
            outcome.cancelled = true;
            break;
        }

        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                outcome.skipped_errors += 1;
                error_logger.log_error(
                    ErrorType::Traversal,
                    None,
                    "遍历目录失败",
                    Some(&err.to_string()),
                )?;
                continue;
            }
        };

        let path = entry.path();

        // 排除规则最先生效，优先于文件类型检查
        if filter.is_path_excluded(path) {
            if logger.is_enabled() {
                logger.log_file(path, 0, "已跳过(路径排除)")?;
            }
            continue;
        }

        // 包含规则
        if !filter.matches_include(path) {
            continue;
        }

        // 只处理普通文件
        if !entry.file_type().map_or(false, |ft| ft.is_file()) {
            continue;
        }

        outcome.scanned_files += 1;
        progress.set_message(format!("已检查 {} 个文件", outcome.scanned_files));
        progress.tick();

        // 扩展名过滤
        if !filter.matches_extension(path) {
            if logger.is_enabled() {
                logger.log_file(path, 0, "已跳过(扩展名过滤)")?;
            }
            continue;
        }

        // 读取文件元数据，失败时跳过该条目并继续遍历
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                outcome.skipped_errors += 1;
                error_logger.log_error(
                    ErrorType::Metadata,
                    Some(&path.to_string_lossy()),
                    "无法读取文件元数据",
                    Some(&err.to_string()),
                )?;
                continue;
            }
        };

        let size = metadata.len();

        // 修改时间过滤
        match metadata.modified() {
            Ok(modified) => {
                if !filter.matches_age(now, modified) {
                    if logger.is_enabled() {
                        logger.log_file(path, size, "已跳过(超出时间范围)")?;
                    }
                    continue;
                }
            }
            Err(err) => {
                outcome.skipped_errors += 1;
                error_logger.log_error(
                    ErrorType::Metadata,
                    Some(&path.to_string_lossy()),
                    "无法读取文件修改时间",
                    Some(&err.to_string()),
                )?;
                continue;
            }
        }

        // 通过全部过滤条件，即时输出
        outcome.matched_files += 1;
        outcome.total_size += size;

        if logger.is_enabled() {
            logger.log_file(path, size, "已匹配")?;
        }

        on_match(path, size)?;
    }

    if outcome.cancelled {
        progress.finish_and_clear();
    } else {
        progress.finish_with_message(format!("扫描完成! 共检查 {} 个文件", outcome.scanned_files));
    }

    Ok(outcome)
}

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use humansize::{format_size, BINARY};

use crate::domain::FileFilter;

/// 格式化文件大小
pub fn format_file_size(size: u64) -> String {
    format_size(size, BINARY)
}

/// 格式化持续时间
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 在遍历开始前输出当前生效的过滤条件
pub fn print_search_banner(roots: &[PathBuf], filter: &FileFilter, timespan: Option<&str>) {
    if filter.extensions.is_empty() {
        println!("未指定文件扩展名，将搜索所有文件。");
    } else {
        // HashSet 无序，排序后输出保持稳定
        let mut extensions: Vec<&str> = filter.extensions.iter().map(|s| s.as_str()).collect();
        extensions.sort();
        println!("搜索扩展名为 {} 的文件。", extensions.join(", "));
    }

    if !filter.excluded_paths.is_empty() {
        println!("排除包含以下内容的路径: {}", filter.excluded_paths.join(", "));
    }

    if !filter.included_paths.is_empty() {
        println!("仅搜索包含以下内容的路径: {}", filter.included_paths.join(", "));
    }

    match timespan {
        Some(timespan) => println!("搜索最近 {} 内修改的文件。", timespan),
        None => println!("未指定时间范围，搜索不限制修改时间。"),
    }

    for root in roots {
        println!("搜索目录: {}", root.display());
    }
    println!();
}

/// 搜索摘要
pub struct SearchSummary {
    pub start_time: Instant,
    pub scanned_files: u64,
    pub matched_files: u64,
    pub total_size: u64,
}

impl SearchSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            scanned_files: 0,
            matched_files: 0,
            total_size: 0,
        }
    }

    pub fn print(&self) -> Result<()> {
        let duration = self.start_time.elapsed();

        println!("\n搜索摘要:");
        println!("----------------------------");
        println!("总用时: {}", format_duration(duration));
        println!("检查文件: {}", self.scanned_files);
        println!("匹配文件: {}", self.matched_files);
        println!("匹配大小: {}", format_file_size(self.total_size));

        Ok(())
    }
}

impl Default for SearchSummary {
    fn default() -> Self {
        Self::new()
    }
}

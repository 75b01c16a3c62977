/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 `info`，`verbose` 时为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},chromiumoxide=warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(order_page_url: &str, max_attempts: Option<u32>) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 机器人自动下单");
    info!("🌐 下单页面: {}", order_page_url);
    match max_attempts {
        Some(max) => info!("🔁 单个订单最多提交 {} 次", max),
        None => info!("🔁 提交重试不设上限"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录订单加载信息
pub fn log_orders_loaded(total: usize, csv_path: &str) {
    info!("✓ 从 {} 读取到 {} 个订单", csv_path, total);
    info!("📋 将按文件顺序逐个处理\n");
}

/// 打印最终统计信息
pub fn print_final_stats(
    completed: usize,
    total: usize,
    submit_attempts: u32,
    archived: usize,
    elapsed: Duration,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 完成订单: {}/{}", completed, total);
    info!("🔁 提交总次数: {}", submit_attempts);
    info!("📦 归档收据: {}", archived);
    info!("⏱️ 用时: {:.1} 秒", elapsed.as_secs_f64());
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("地址很长很长", 3), "地址很...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}

//! 运行日志写入服务 - 业务能力层
//!
//! 只负责"写 run_log.txt"能力，不关心流程

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 运行日志写入服务
///
/// 职责：
/// - 每次运行写一个带时间的表头
/// - 每完成一个订单追加一行
pub struct RunLog {
    log_file_path: PathBuf,
}

impl RunLog {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_file_path
    }

    /// 写入表头（覆盖上一次运行的日志）
    pub async fn init(&self) -> Result<()> {
        let log_header = format!(
            "{}\n机器人订单处理日志 - {}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        if let Some(parent) = self.log_file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.log_file_path, log_header).await?;
        Ok(())
    }

    /// 追加一条订单完成记录
    pub async fn record(&self, order_number: &str, attempts: u32, receipt: &Path) -> Result<()> {
        debug!("写入运行日志: 订单 {} | 尝试 {} 次", order_number, attempts);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .await?;

        let line = format!(
            "{} | 订单 {} | 提交尝试 {} 次 | 收据: {}\n",
            chrono::Local::now().format("%H:%M:%S"),
            order_number,
            attempts,
            receipt.display()
        );
        file.write_all(line.as_bytes()).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_then_record_appends() {
        let tmp = tempfile::tempdir().unwrap();
        let log = RunLog::with_path(tmp.path().join("out").join("run_log.txt"));

        log.init().await.unwrap();
        log.record("1", 1, Path::new("output/receipts/receipt_1.pdf")).await.unwrap();
        log.record("2", 3, Path::new("output/receipts/receipt_2.pdf")).await.unwrap();

        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert!(content.contains("机器人订单处理日志"));
        let lines: Vec<_> = content.lines().filter(|l| l.contains("| 订单 ")).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("订单 1 | 提交尝试 1 次"));
        assert!(lines[1].contains("订单 2 | 提交尝试 3 次"));

        // 再次 init 会清空
        log.init().await.unwrap();
        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert!(!content.contains("| 订单 "));
    }
}

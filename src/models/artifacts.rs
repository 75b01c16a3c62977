//! 订单产物的文件命名
//!
//! `receipt_<订单号>.pdf` / `robot_<订单号>.png` 是唯一的持久化"格式"，
//! 归档和后续比对都依赖这个命名

use std::path::{Path, PathBuf};

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    receipts_dir: PathBuf,
    screenshots_dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new(receipts_dir: impl Into<PathBuf>, screenshots_dir: impl Into<PathBuf>) -> Self {
        Self {
            receipts_dir: receipts_dir.into(),
            screenshots_dir: screenshots_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.receipts_dir(), config.screenshots_dir())
    }

    pub fn receipts_dir(&self) -> &Path {
        &self.receipts_dir
    }

    pub fn screenshots_dir(&self) -> &Path {
        &self.screenshots_dir
    }

    pub fn receipt(&self, order_number: &str) -> PathBuf {
        self.receipts_dir.join(format!("receipt_{}.pdf", order_number))
    }

    pub fn screenshot(&self, order_number: &str) -> PathBuf {
        self.screenshots_dir.join(format!("robot_{}.png", order_number))
    }

    /// 创建输出目录（已存在时不报错）
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.receipts_dir).await?;
        tokio::fs::create_dir_all(&self.screenshots_dir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_named_by_order_number() {
        let paths = ArtifactPaths::new("output/receipts", "output/screenshots");
        assert_eq!(paths.receipt("17"), PathBuf::from("output/receipts/receipt_17.pdf"));
        assert_eq!(paths.screenshot("17"), PathBuf::from("output/screenshots/robot_17.png"));
        assert_ne!(paths.receipt("1"), paths.receipt("11"));
    }

    #[tokio::test]
    async fn test_ensure_dirs_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(tmp.path().join("r"), tmp.path().join("s"));
        paths.ensure_dirs().await.unwrap();
        paths.ensure_dirs().await.unwrap();
        assert!(paths.receipts_dir().is_dir());
        assert!(paths.screenshots_dir().is_dir());
    }
}

//! 订单来源 - 业务能力层
//!
//! 下载订单 CSV 到本地（覆盖旧文件）并解析，不做重试

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{load_orders_from_csv, OrderRecord};

pub struct OrderSource {
    client: reqwest::Client,
}

impl OrderSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// 下载 CSV 到 `target`，已有文件会被整体覆盖
    pub async fn download(&self, url: &str, target: &Path) -> Result<u64> {
        debug!("下载订单文件: {} -> {}", url, target.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::download_failed(url, e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::download_failed(url, e))?;

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(target, &bytes)
            .await
            .with_context(|| format!("无法写入订单文件: {}", target.display()))?;

        info!("✓ 订单文件已下载: {} ({} 字节)", target.display(), bytes.len());
        Ok(bytes.len() as u64)
    }

    /// 下载并解析，返回按文件顺序排列的订单
    pub async fn fetch_orders(&self, url: &str, target: &Path) -> Result<Vec<OrderRecord>> {
        self.download(url, target).await?;
        load_orders_from_csv(target).await
    }
}

impl Default for OrderSource {
    fn default() -> Self {
        Self::new()
    }
}

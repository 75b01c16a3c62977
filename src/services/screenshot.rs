//! 机器人截图 - 业务能力层

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::error::{AppError, OrderError};
use crate::infrastructure::PageDriver;
use crate::models::ArtifactPaths;
use crate::services::selectors::{self, css};

/// 等待预览图出现，只截取该元素，保存为 `robot_<订单号>.png`
pub async fn screenshot_robot<D: PageDriver + ?Sized>(
    driver: &D,
    order_number: &str,
    paths: &ArtifactPaths,
    timeout: Duration,
) -> Result<PathBuf> {
    let image = css(selectors::ROBOT_PREVIEW_IMAGE);

    if !driver.wait_for(&image, timeout).await? {
        return Err(AppError::Order(OrderError::PreviewNotRendered {
            order_number: order_number.to_string(),
        })
        .into());
    }

    let png = driver.screenshot(&image).await?;
    let screenshot_path = paths.screenshot(order_number);
    tokio::fs::write(&screenshot_path, &png)
        .await
        .map_err(|e| AppError::write_failed(screenshot_path.display().to_string(), e))?;

    debug!("截图已保存: {}", screenshot_path.display());
    Ok(screenshot_path)
}

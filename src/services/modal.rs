//! 弹窗处理 - 业务能力层

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::infrastructure::PageDriver;
use crate::services::selectors;

/// 尝试关闭导航后可能出现的弹窗
///
/// 在 `timeout` 内等待确认按钮；出现则点击并返回 `true`，
/// 超时未出现返回 `false`（不是错误）
pub async fn dismiss_interstitial<D: PageDriver + ?Sized>(driver: &D, timeout: Duration) -> Result<bool> {
    let ack = selectors::modal_ack();

    if !driver.wait_for(&ack, timeout).await? {
        debug!("弹窗未出现，继续");
        return Ok(false);
    }

    driver.click(&ack).await?;
    debug!("已关闭弹窗");
    Ok(true)
}

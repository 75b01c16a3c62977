//! 页面能力抽象 - 基础设施层
//!
//! 业务层只通过 `PageDriver` 操作页面，不直接接触 chromiumoxide 的 `Page`。
//! 生产环境由 `JsExecutor` 实现，测试中可替换为脚本化的假页面。

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use crate::infrastructure::Selector;

/// 等待元素时的轮询间隔
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 导航到指定 URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// 点击元素；元素不存在时返回错误
    async fn click(&self, target: &Selector) -> Result<()>;

    /// 元素当前是否存在且可见（不等待）
    async fn is_visible(&self, target: &Selector) -> Result<bool>;

    /// 选择下拉框中 value 匹配的选项
    async fn select_option(&self, target: &Selector, value: &str) -> Result<()>;

    /// 清空输入框
    async fn clear(&self, target: &Selector) -> Result<()>;

    /// 用给定值替换输入框内容
    async fn fill(&self, target: &Selector, value: &str) -> Result<()>;

    /// 读取元素的 innerHTML
    async fn inner_html(&self, target: &Selector) -> Result<String>;

    /// 只对该元素截图，返回 PNG 字节
    async fn screenshot(&self, target: &Selector) -> Result<Vec<u8>>;

    /// 当前页面的标题和 URL（用于诊断日志）
    async fn describe(&self) -> Result<String> {
        Ok(String::new())
    }

    /// 等待元素可见，超时返回 `Ok(false)` 而不是错误
    async fn wait_for(&self, target: &Selector, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_visible(target).await? {
                return Ok(true);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// 固定等待
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            sleep(duration).await;
        }
    }
}

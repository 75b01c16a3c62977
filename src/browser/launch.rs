use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{AppError, BrowserError};

/// 启动浏览器并导航到指定 URL
///
/// - `headless`: 是否无头
/// - `executable`: 浏览器可执行文件路径，`None` 时由 chromiumoxide 自动查找
pub async fn launch_browser(
    url: &str,
    headless: bool,
    executable: Option<&str>,
) -> Result<(Browser, Page)> {
    info!("🚀 启动浏览器 ({})...", if headless { "无头" } else { "有界面" });
    debug!("目标 URL: {}", url);

    let mut builder = BrowserConfig::builder();
    builder = if headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = executable {
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder
        .window_size(1280, 1024)
        .args(vec![
            "--disable-gpu",           // 无头模式下避免 GPU 相关崩溃
            "--no-sandbox",            // 容器内运行时需要
            "--disable-dev-shm-usage", // 防止共享内存不足
        ])
        .build()
        .map_err(|message| {
            error!("配置浏览器失败: {}", message);
            AppError::Browser(BrowserError::ConfigurationFailed { message })
        })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::Browser(BrowserError::LaunchFailed { source: Box::new(e) })
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page(url).await.map_err(|e| {
        error!("打开页面失败: {}", e);
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.to_string(),
            source: Box::new(e),
        })
    })?;

    info!("✅ 浏览器已导航到: {}", url);
    Ok((browser, page))
}

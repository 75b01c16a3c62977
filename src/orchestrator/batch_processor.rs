//! 订单批处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责整批订单的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建输出目录、初始化运行日志、启动/连接浏览器、创建 JsExecutor
//! 2. **订单加载**：下载并解析订单 CSV（`Vec<OrderRecord>`）
//! 3. **顺序处理**：按 CSV 顺序逐个交给 `OrderFlow`，任一订单失败即终止
//! 4. **归档**：全部完成后把收据目录打包成 ZIP
//! 5. **资源管理**：持有 Browser 和 JsExecutor，结束时关闭浏览器
//! 6. **全局统计**：汇总处理结果

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{JsExecutor, PageDriver};
use crate::models::{ArtifactPaths, OrderRecord};
use crate::services::{archive_folder_with_zip, OrderSource};
use crate::utils::logging::{log_orders_loaded, log_startup, print_final_stats};
use crate::workflow::{OrderCtx, OrderFlow, OrderOutcome};

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    executor: JsExecutor,
    /// 浏览器是否由本程序启动（决定结束时关闭还是只断开）
    launched: bool,
}

/// 一次完整运行的结果
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub orders: Vec<OrderOutcome>,
    pub archive_path: PathBuf,
    pub archived: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn submit_attempts(&self) -> u32 {
        self.orders.iter().map(|o| o.submit.attempts).sum()
    }
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config.order_page_url, config.submit_policy().max_attempts);

        // 创建输出目录
        ArtifactPaths::from_config(&config).ensure_dirs().await?;

        // 启动或连接浏览器
        let (browser, page, launched) = match config.browser_debug_port {
            Some(port) => {
                let (browser, page) =
                    browser::connect_to_browser_and_page(port, &config.order_page_url).await?;
                (browser, page, false)
            }
            None => {
                let (browser, page) = browser::launch_browser(
                    &config.order_page_url,
                    config.headless,
                    config.chrome_executable.as_deref(),
                )
                .await?;
                (browser, page, true)
            }
        };

        // 创建 JsExecutor（持有 page）
        let executor = JsExecutor::new(page).with_slowmo(config.slowmo());

        Ok(Self {
            config,
            browser,
            executor,
            launched,
        })
    }

    /// 运行应用主逻辑，无论成功与否都会关闭浏览器
    pub async fn run(mut self) -> Result<RunSummary> {
        let result = self.execute().await;
        self.shutdown().await;
        result
    }

    async fn execute(&self) -> Result<RunSummary> {
        let flow = OrderFlow::new(&self.config);
        if let Some(run_log) = flow.run_log() {
            run_log.init().await?;
        }

        // 加载所有订单
        let orders = self.load_orders().await?;
        if orders.is_empty() {
            warn!("⚠️ 订单文件中没有任何订单");
        }
        log_orders_loaded(orders.len(), &self.config.orders_csv_path);

        let summary = process_orders(
            &self.executor,
            &flow,
            &orders,
            &self.config.archive_path(),
        )
        .await?;

        // 输出最终统计
        let log_file = flow
            .run_log()
            .map(|l| l.path().display().to_string())
            .unwrap_or_default();
        print_final_stats(
            summary.orders.len(),
            orders.len(),
            summary.submit_attempts(),
            summary.archived,
            summary.elapsed,
            &log_file,
        );

        Ok(summary)
    }

    /// 下载并加载订单
    async fn load_orders(&self) -> Result<Vec<OrderRecord>> {
        info!("\n📁 正在下载订单文件...");
        OrderSource::new()
            .fetch_orders(
                &self.config.orders_csv_url,
                Path::new(&self.config.orders_csv_path),
            )
            .await
    }

    async fn shutdown(&mut self) {
        if self.launched {
            info!("正在关闭浏览器...");
            if let Err(e) = self.browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                warn!("等待浏览器退出失败: {}", e);
            }
        } else {
            info!("正在关闭下单标签页（浏览器保持运行）...");
            if let Err(e) = self.executor.page().clone().close().await {
                warn!("关闭标签页失败: {}", e);
            }
        }
    }
}

/// 按顺序处理全部订单，然后归档收据
///
/// 任一订单失败立即返回错误，已生成的文件保留在磁盘上
pub async fn process_orders<D: PageDriver + ?Sized>(
    driver: &D,
    flow: &OrderFlow,
    orders: &[OrderRecord],
    archive_path: &Path,
) -> Result<RunSummary> {
    let started = Instant::now();
    let total = orders.len();
    let mut outcomes = Vec::with_capacity(total);

    for (idx, order) in orders.iter().enumerate() {
        let ctx = OrderCtx::new(order.order_number.clone(), idx + 1, total);

        match flow.run(driver, order, &ctx).await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                error!("{} ❌ 处理过程中发生错误: {}", ctx, e);
                if let Ok(page_info) = driver.describe().await {
                    error!("{} 当前页面 {}", ctx, page_info);
                }
                return Err(e);
            }
        }
    }

    let archived = archive_folder_with_zip(flow.paths().receipts_dir(), archive_path)?;

    Ok(RunSummary {
        orders: outcomes,
        archive_path: archive_path.to_path_buf(),
        archived,
        elapsed: started.elapsed(),
    })
}

//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的完整处理流程
//!
//! 流程顺序：
//! 1. 关闭弹窗 → 填表 → 预览
//! 2. 提交（有界重试）
//! 3. 收据 PDF → 机器人截图 → 截图嵌入收据
//! 4. 再来一单（回到表单）

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::PageDriver;
use crate::models::{ArtifactPaths, OrderRecord};
use crate::services::{
    dismiss_interstitial, embed_screenshot_to_receipt, fill_the_form, go_to_order_another_robot,
    preview_the_robot, screenshot_robot, store_receipt_as_pdf, submit_the_order, RunLog,
    SubmitPolicy, SubmitReport,
};
use crate::utils::logging::truncate_text;
use crate::workflow::order_ctx::OrderCtx;

/// 单个订单的处理结果
#[derive(Debug, Clone)]
pub struct OrderOutcome {
    pub order_number: String,
    pub receipt: PathBuf,
    pub screenshot: PathBuf,
    pub submit: SubmitReport,
    pub modal_dismissed: bool,
}

/// 订单处理流程
///
/// - 编排完整的单订单流程
/// - 不持有任何资源（page），页面由调用方传入
/// - 只依赖业务能力（services）
pub struct OrderFlow {
    paths: ArtifactPaths,
    policy: SubmitPolicy,
    modal_timeout: Duration,
    element_timeout: Duration,
    run_log: Option<RunLog>,
}

impl OrderFlow {
    /// 创建新的订单处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            paths: ArtifactPaths::from_config(config),
            policy: config.submit_policy(),
            modal_timeout: config.modal_timeout(),
            element_timeout: config.element_timeout(),
            run_log: Some(RunLog::with_path(config.run_log_path())),
        }
    }

    pub fn with_settings(
        paths: ArtifactPaths,
        policy: SubmitPolicy,
        modal_timeout: Duration,
        element_timeout: Duration,
    ) -> Self {
        Self {
            paths,
            policy,
            modal_timeout,
            element_timeout,
            run_log: None,
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn run_log(&self) -> Option<&RunLog> {
        self.run_log.as_ref()
    }

    pub async fn run<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        order: &OrderRecord,
        ctx: &OrderCtx,
    ) -> Result<OrderOutcome> {
        info!(
            "{} 头部 {} | 机身 {} | 腿部 {} | 地址: {}",
            ctx,
            order.head,
            order.body,
            order.legs,
            truncate_text(&order.address, 40)
        );

        // ========== 流程 1: 填表并预览 ==========
        let modal_dismissed = dismiss_interstitial(driver, self.modal_timeout).await?;
        if modal_dismissed {
            debug!("{} 已关闭弹窗", ctx);
        }

        fill_the_form(driver, order).await?;
        preview_the_robot(driver, &order.order_number, self.element_timeout).await?;

        // ========== 流程 2: 提交 ==========
        let submit = submit_the_order(driver, &self.policy)
            .await
            .map_err(AppError::Submit)?;

        // ========== 流程 3: 保存订单文件 ==========
        let receipt =
            store_receipt_as_pdf(driver, &order.order_number, &self.paths, self.element_timeout)
                .await?;
        let screenshot =
            screenshot_robot(driver, &order.order_number, &self.paths, self.element_timeout)
                .await?;
        embed_screenshot_to_receipt(&screenshot, &receipt)?;

        // ========== 流程 4: 回到表单 ==========
        go_to_order_another_robot(driver).await?;

        if let Some(run_log) = &self.run_log {
            run_log
                .record(&order.order_number, submit.attempts, &receipt)
                .await?;
        }

        info!(
            "{} ✓ 下单完成 (提交 {} 次) → {}",
            ctx,
            submit.attempts,
            receipt.display()
        );

        Ok(OrderOutcome {
            order_number: order.order_number.clone(),
            receipt,
            screenshot,
            submit,
            modal_dismissed,
        })
    }
}

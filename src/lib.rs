//! # Robot Order
//!
//! 一个用于自动化机器人下单的 Rust 应用程序：
//! 下载 CSV 订单 → 浏览器逐单填表提交 → 收据转 PDF + 机器人截图 → 合并 → 打包 ZIP
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，实现 `PageDriver`
//! - `PageDriver` - 页面能力抽象（点击 / 填写 / 等待 / 截图），测试中可替换
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个订单
//! - `order_source` - 下载并解析订单 CSV
//! - `order_form` / `modal` - 填表、关闭弹窗
//! - `order_submitter` - 提交状态机（有界重试 + 退避）
//! - `receipt` / `screenshot` / `pdf_merge` - 产出订单文件
//! - `archiver` / `run_log` - 打包收据、写运行日志
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个订单"的完整处理流程
//! - `OrderCtx` - 上下文封装（订单号 + 序号）
//! - `OrderFlow` - 流程编排（弹窗 → 填表 → 预览 → 提交 → 收据 → 截图 → 合并 → 重置）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用生命周期、顺序处理全部订单、归档
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, SubmitError};
pub use infrastructure::{JsExecutor, PageDriver, Selector};
pub use models::{ArtifactPaths, OrderRecord};
pub use orchestrator::{App, RunSummary};
pub use workflow::{OrderCtx, OrderFlow, OrderOutcome};

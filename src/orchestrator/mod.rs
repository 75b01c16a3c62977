//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整批订单的调度，是整个系统的"指挥中心"。
//!
//! ### `batch_processor` - 订单批处理器
//! - 管理应用生命周期（初始化、运行、关闭浏览器）
//! - 下载订单（Vec<OrderRecord>）
//! - 按顺序调度 OrderFlow，失败即停
//! - 归档收据并输出全局统计
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<OrderRecord>)
//!     ↓
//! workflow::OrderFlow (处理单个订单)
//!     ↓
//! services (能力层：表单 / 提交 / 收据 / 截图 / 合并 / 归档)
//!     ↓
//! infrastructure (基础设施：JsExecutor / PageDriver)
//! ```

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::{process_orders, App, RunSummary};

//! 订单处理上下文
//!
//! 封装"我正在处理第几个订单、订单号是多少"这一信息

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct OrderCtx {
    /// 订单号（用于文件命名）
    pub order_number: String,

    /// 在本次运行中的序号（从1开始，仅用于日志显示）
    pub order_index: usize,

    /// 本次运行的订单总数
    pub total: usize,
}

impl OrderCtx {
    pub fn new(order_number: String, order_index: usize, total: usize) -> Self {
        Self {
            order_number,
            order_index,
            total,
        }
    }
}

impl Display for OrderCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[订单 {} ({}/{})]",
            self.order_number, self.order_index, self.total
        )
    }
}

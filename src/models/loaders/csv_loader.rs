use crate::error::{AppError, FileError, OrderError};
use crate::models::order::OrderRecord;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 CSV 文件加载订单列表（保持文件中的行顺序）
pub async fn load_orders_from_csv(csv_path: &Path) -> Result<Vec<OrderRecord>> {
    let content = fs::read(csv_path)
        .await
        .with_context(|| format!("无法读取CSV文件: {}", csv_path.display()))?;

    let orders = parse_orders(&content, &csv_path.display().to_string())?;
    tracing::info!("成功加载 {} 个订单", orders.len());

    Ok(orders)
}

/// 解析 CSV 内容，首行为表头
///
/// 需要 `Order number` / `Head` / `Body` / `Legs` / `Address` 五列，其他列忽略
pub fn parse_orders(content: &[u8], source: &str) -> Result<Vec<OrderRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let mut orders = Vec::new();
    for (idx, row) in reader.deserialize::<OrderRecord>().enumerate() {
        // 表头占第 1 行
        let line = idx + 2;
        let order = row.map_err(|e| {
            AppError::File(FileError::CsvParseFailed {
                path: format!("{}:{}", source, line),
                source: Box::new(e),
            })
        })?;

        if order.order_number.is_empty() {
            return Err(AppError::Order(OrderError::EmptyOrderNumber { row: line }).into());
        }
        // 订单号直接拼进文件名
        if order.order_number.contains(['/', '\\', '\0']) {
            return Err(AppError::Order(OrderError::InvalidOrderNumber {
                row: line,
                value: order.order_number,
            })
            .into());
        }
        orders.push(order);
    }

    Ok(orders)
}

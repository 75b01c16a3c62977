//! 下单表单 - 业务能力层
//!
//! 只负责把一条订单映射到表单控件上，不关心提交

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::error::{AppError, OrderError};
use crate::infrastructure::PageDriver;
use crate::models::OrderRecord;
use crate::services::selectors::{self, css};

/// 填写下单表单
///
/// - 头部：下拉框按 value 选择
/// - 机身：点击 `#id-body-{body}` 单选框
/// - 腿部：先清空再填写
/// - 地址：直接填写
///
/// 任何控件缺失都直接返回错误
pub async fn fill_the_form<D: PageDriver + ?Sized>(driver: &D, order: &OrderRecord) -> Result<()> {
    debug!("填写订单 {} 的表单", order.order_number);

    driver
        .select_option(&css(selectors::HEAD_SELECT), &order.head)
        .await?;

    driver.click(&selectors::body_radio(&order.body)).await?;

    let legs = css(selectors::LEGS_INPUT);
    driver.clear(&legs).await?;
    driver.fill(&legs, &order.legs).await?;

    driver
        .fill(&css(selectors::ADDRESS_INPUT), &order.address)
        .await?;

    Ok(())
}

/// 点击预览，等待机器人图片出现
pub async fn preview_the_robot<D: PageDriver + ?Sized>(
    driver: &D,
    order_number: &str,
    timeout: Duration,
) -> Result<()> {
    driver.click(&css(selectors::PREVIEW_BUTTON)).await?;

    if !driver
        .wait_for(&css(selectors::ROBOT_PREVIEW_IMAGE), timeout)
        .await?
    {
        return Err(AppError::Order(OrderError::PreviewNotRendered {
            order_number: order_number.to_string(),
        })
        .into());
    }
    Ok(())
}

/// 点击"再来一单"回到表单
pub async fn go_to_order_another_robot<D: PageDriver + ?Sized>(driver: &D) -> Result<()> {
    driver.click(&css(selectors::ORDER_ANOTHER_BUTTON)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrowserError;
    use crate::infrastructure::mock_page::MockPage;

    fn order() -> OrderRecord {
        OrderRecord {
            order_number: "4".to_string(),
            head: "2".to_string(),
            body: "5".to_string(),
            legs: "3".to_string(),
            address: "Address 4".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fields_mapped_in_order() {
        let page = MockPage::new();
        fill_the_form(&page, &order()).await.unwrap();

        assert_eq!(
            page.actions(),
            vec![
                "select #head=2".to_string(),
                "click #id-body-5".to_string(),
                format!("clear {}", selectors::LEGS_INPUT),
                format!("fill {}=3", selectors::LEGS_INPUT),
                "fill #address=Address 4".to_string(),
            ]
        );
        assert_eq!(page.value_of(&css(selectors::ADDRESS_INPUT)).as_deref(), Some("Address 4"));
    }

    #[tokio::test]
    async fn test_missing_control_is_fatal() {
        let page = MockPage::new().with_missing(selectors::body_radio("5"));
        let err = fill_the_form(&page, &order()).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::Browser(BrowserError::ElementNotFound { selector })) if selector == "#id-body-5"
        ));
        // 出错后不再继续填写
        assert!(!page.actions().iter().any(|a| a.starts_with("fill")));
    }

    #[tokio::test]
    async fn test_preview_waits_for_image() {
        let page = MockPage::new();
        preview_the_robot(&page, "4", Duration::from_millis(200)).await.unwrap();
        assert!(page.is_visible(&css(selectors::ROBOT_PREVIEW_IMAGE)).await.unwrap());
    }

    #[tokio::test]
    async fn test_order_another_resets_page() {
        let page = MockPage::new();
        preview_the_robot(&page, "4", Duration::from_millis(200)).await.unwrap();
        go_to_order_another_robot(&page).await.unwrap();

        assert_eq!(page.clicks_on(&css(selectors::ORDER_ANOTHER_BUTTON)), 1);
        assert!(!page.is_visible(&css(selectors::ROBOT_PREVIEW_IMAGE)).await.unwrap());
    }
}

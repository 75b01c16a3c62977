//! 订单提交 - 业务能力层
//!
//! 提交状态机：`Attempting → {Success, RetryableError, Timeout}`
//!
//! - 点击提交后收据可见 → `Success`（结束）
//! - 否则错误横幅可见 → `RetryableError`，按退避等待后重试
//! - 两者都不可见 → `Timeout`，等待期间收据出现即成功，否则重试
//!
//! 目标网站会随机返回错误，所以重试是常态；`max_attempts` 为 `None` 时不设上限。

use std::time::Duration;

use tracing::{info, warn};

use crate::error::SubmitError;
use crate::infrastructure::PageDriver;
use crate::services::selectors::{self, css};

/// 提交状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Attempting,
    Success,
    RetryableError,
    Timeout,
}

/// 提交重试策略
#[derive(Debug, Clone)]
pub struct SubmitPolicy {
    /// 最大点击次数；`None` 表示无限重试
    pub max_attempts: Option<u32>,
    /// 点击后既无收据也无错误时的固定等待
    pub timeout_delay: Duration,
    /// 连续第 k 次错误横幅后等待 `error_base_delay * 2^(k-1)`
    pub error_base_delay: Duration,
    /// 退避上限
    pub max_delay: Duration,
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(10),
            timeout_delay: Duration::from_millis(1000),
            error_base_delay: Duration::from_millis(250),
            max_delay: Duration::from_millis(4000),
        }
    }
}

impl SubmitPolicy {
    /// 原始行为：无上限，错误立即重试
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            error_base_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// 连续第 `consecutive_errors` 次错误后的等待时间
    pub fn error_delay(&self, consecutive_errors: u32) -> Duration {
        if consecutive_errors == 0 || self.error_base_delay.is_zero() {
            return Duration::ZERO;
        }
        let shift = (consecutive_errors - 1).min(16);
        self.error_base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// 一次成功提交的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitReport {
    pub attempts: u32,
    pub errors: u32,
    pub timeouts: u32,
}

/// 点击一次提交并判断结果
async fn attempt<D: PageDriver + ?Sized>(driver: &D) -> Result<SubmitState, SubmitError> {
    driver
        .click(&css(selectors::ORDER_BUTTON))
        .await
        .map_err(SubmitError::Page)?;

    if driver
        .is_visible(&css(selectors::RECEIPT))
        .await
        .map_err(SubmitError::Page)?
    {
        return Ok(SubmitState::Success);
    }

    if driver
        .is_visible(&css(selectors::ERROR_BANNER))
        .await
        .map_err(SubmitError::Page)?
    {
        return Ok(SubmitState::RetryableError);
    }

    Ok(SubmitState::Timeout)
}

/// 提交订单直到成功或重试耗尽
pub async fn submit_the_order<D: PageDriver + ?Sized>(
    driver: &D,
    policy: &SubmitPolicy,
) -> Result<SubmitReport, SubmitError> {
    let mut report = SubmitReport::default();
    let mut consecutive_errors = 0u32;
    let mut state = SubmitState::Attempting;

    loop {
        if policy.exhausted(report.attempts) {
            return Err(SubmitError::RetriesExhausted {
                attempts: report.attempts,
                last_state: state,
            });
        }

        report.attempts += 1;
        state = attempt(driver).await?;

        match state {
            SubmitState::Success => {
                info!("✓ 订单提交成功 (第 {} 次尝试)", report.attempts);
                return Ok(report);
            }
            SubmitState::RetryableError => {
                report.errors += 1;
                consecutive_errors += 1;
                let delay = policy.error_delay(consecutive_errors);
                warn!(
                    "提交出错，{:?} 后重试 (第 {} 次尝试)",
                    delay, report.attempts
                );
                driver.pause(delay).await;
            }
            SubmitState::Timeout | SubmitState::Attempting => {
                report.timeouts += 1;
                consecutive_errors = 0;
                warn!(
                    "提交后未出现收据或错误提示，{:?} 后重试 (第 {} 次尝试)",
                    policy.timeout_delay, report.attempts
                );
                // 收据晚到时表单已被替换，不能再点提交
                if driver
                    .wait_for(&css(selectors::RECEIPT), policy.timeout_delay)
                    .await
                    .map_err(SubmitError::Page)?
                {
                    info!("✓ 订单提交成功 (收据延迟出现, 第 {} 次尝试)", report.attempts);
                    return Ok(report);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock_page::{MockPage, SubmitResponse};

    fn fast_policy(max_attempts: Option<u32>) -> SubmitPolicy {
        SubmitPolicy {
            max_attempts,
            timeout_delay: Duration::from_millis(1),
            error_base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_n_errors_then_success_clicks_n_plus_one() {
        let n = 4;
        let page = MockPage::new().with_submit_responses(
            &vec![SubmitResponse::ErrorBanner; n],
            SubmitResponse::Receipt,
        );

        let report = submit_the_order(&page, &fast_policy(None)).await.unwrap();

        assert_eq!(page.clicks_on(&css(selectors::ORDER_BUTTON)), n + 1);
        assert_eq!(report.attempts, n as u32 + 1);
        assert_eq!(report.errors, n as u32);
        assert_eq!(report.timeouts, 0);
    }

    #[tokio::test]
    async fn test_timeouts_are_retried() {
        let page = MockPage::new().with_submit_responses(
            &[SubmitResponse::Nothing, SubmitResponse::ErrorBanner, SubmitResponse::Nothing],
            SubmitResponse::Receipt,
        );

        let report = submit_the_order(&page, &fast_policy(None)).await.unwrap();

        assert_eq!(report, SubmitReport { attempts: 4, errors: 1, timeouts: 2 });
    }

    #[tokio::test]
    async fn test_receipt_rendered_during_timeout_wait_is_success() {
        // 第一次检查时收据还没出现，之后出现且提交按钮消失
        let page = MockPage::new()
            .with_submit_responses(&[SubmitResponse::LateReceipt], SubmitResponse::ErrorBanner);

        let report = submit_the_order(&page, &fast_policy(Some(5))).await.unwrap();

        assert_eq!(report, SubmitReport { attempts: 1, errors: 0, timeouts: 1 });
        assert_eq!(page.clicks_on(&css(selectors::ORDER_BUTTON)), 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted_after_cap() {
        let page = MockPage::new().with_submit_responses(&[], SubmitResponse::ErrorBanner);

        let err = submit_the_order(&page, &fast_policy(Some(3))).await.unwrap_err();

        assert!(matches!(
            err,
            SubmitError::RetriesExhausted { attempts: 3, last_state: SubmitState::RetryableError }
        ));
        assert_eq!(page.clicks_on(&css(selectors::ORDER_BUTTON)), 3);
    }

    #[tokio::test]
    async fn test_missing_button_is_page_error() {
        let page = MockPage::new().with_missing(css(selectors::ORDER_BUTTON));

        let err = submit_the_order(&page, &fast_policy(None)).await.unwrap_err();

        assert!(matches!(err, SubmitError::Page(_)));
    }

    #[test]
    fn test_error_delay_escalates_and_caps() {
        let policy = SubmitPolicy::default();
        assert_eq!(policy.error_delay(0), Duration::ZERO);
        assert_eq!(policy.error_delay(1), Duration::from_millis(250));
        assert_eq!(policy.error_delay(2), Duration::from_millis(500));
        assert_eq!(policy.error_delay(3), Duration::from_millis(1000));
        assert_eq!(policy.error_delay(10), Duration::from_millis(4000));
        assert_eq!(SubmitPolicy::unbounded().error_delay(5), Duration::ZERO);
    }
}

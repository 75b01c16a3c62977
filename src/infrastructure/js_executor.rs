//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，通过执行 JS 暴露页面操作能力

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{AppError, BrowserError};
use crate::infrastructure::{PageDriver, Selector};

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力，并据此实现 `PageDriver`
/// - 不认识订单 / 收据
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
    slowmo: Duration,
}

/// 页面操作脚本的统一返回结构
#[derive(Debug, Deserialize)]
struct ActionOutcome {
    found: bool,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self {
            page,
            slowmo: Duration::ZERO,
        }
    }

    /// 每次修改页面的操作之后额外等待
    pub fn with_slowmo(mut self, slowmo: Duration) -> Self {
        self.slowmo = slowmo;
        self
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await.map_err(|e| {
            AppError::Browser(BrowserError::ScriptExecutionFailed {
                source: Box::new(e),
            })
        })?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 在元素上执行一段脚本，元素不存在或脚本报错时返回错误
    async fn act(&self, target: &Selector, body: &str) -> Result<Option<String>> {
        let script = action_script(target, body);
        let outcome: ActionOutcome = self.eval_as(script).await?;

        if !outcome.found {
            return Err(AppError::element_not_found(target.to_string()).into());
        }
        if let Some(message) = outcome.error {
            return Err(AppError::Browser(BrowserError::ActionFailed {
                selector: target.to_string(),
                message,
            })
            .into());
        }
        Ok(outcome.value)
    }

    async fn settle(&self) {
        if !self.slowmo.is_zero() {
            sleep(self.slowmo).await;
        }
    }
}

#[async_trait]
impl PageDriver for JsExecutor {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page.goto(url).await.map_err(|e| {
            AppError::Browser(BrowserError::NavigationFailed {
                url: url.to_string(),
                source: Box::new(e),
            })
        })?;
        self.settle().await;
        Ok(())
    }

    async fn click(&self, target: &Selector) -> Result<()> {
        debug!("点击: {}", target);
        self.act(
            target,
            "el.scrollIntoView({ block: 'center' }); el.click(); return { found: true };",
        )
        .await?;
        self.settle().await;
        Ok(())
    }

    async fn is_visible(&self, target: &Selector) -> Result<bool> {
        let script = format!(
            r#"(() => {{
                const el = {};
                if (!el) {{ return false; }}
                const style = window.getComputedStyle(el);
                if (style.visibility === 'hidden' || style.display === 'none') {{ return false; }}
                return !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
            }})()"#,
            target.js_query()
        );
        self.eval_as(script).await
    }

    async fn select_option(&self, target: &Selector, value: &str) -> Result<()> {
        debug!("选择 {} = {}", target, value);
        let body = format!(
            r#"const wanted = {value};
            const option = Array.from(el.options || []).find(o => o.value === wanted);
            if (!option) {{ return {{ found: true, error: 'no option with value ' + wanted }}; }}
            const setter = Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value').set;
            setter.call(el, option.value);
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return {{ found: true }};"#,
            value = serde_json::Value::String(value.to_string())
        );
        self.act(target, &body).await?;
        self.settle().await;
        Ok(())
    }

    async fn clear(&self, target: &Selector) -> Result<()> {
        self.act(target, &set_value_body("")).await?;
        self.settle().await;
        Ok(())
    }

    async fn fill(&self, target: &Selector, value: &str) -> Result<()> {
        debug!("填写 {} = {}", target, value);
        self.act(target, &set_value_body(value)).await?;
        self.settle().await;
        Ok(())
    }

    async fn inner_html(&self, target: &Selector) -> Result<String> {
        let html = self
            .act(target, "return { found: true, value: el.innerHTML };")
            .await?;
        Ok(html.unwrap_or_default())
    }

    async fn screenshot(&self, target: &Selector) -> Result<Vec<u8>> {
        let Selector::Css(css) = target else {
            return Err(AppError::Browser(BrowserError::ActionFailed {
                selector: target.to_string(),
                message: "元素截图只支持 CSS 选择器".to_string(),
            })
            .into());
        };

        let element = self
            .page
            .find_element(css.as_str())
            .await
            .map_err(|_| AppError::element_not_found(css.as_str()))?;
        let bytes = element.screenshot(CaptureScreenshotFormat::Png).await?;
        debug!("截图 {} 完成: {} 字节", target, bytes.len());
        Ok(bytes)
    }

    async fn describe(&self) -> Result<String> {
        let title = self.page.get_title().await?.unwrap_or_default();
        let url = self.page.url().await?.unwrap_or_default();
        Ok(format!("标题: {} | URL: {}", title, url))
    }
}

fn action_script(target: &Selector, body: &str) -> String {
    format!(
        r#"(() => {{
            const el = {};
            if (!el) {{ return {{ found: false }}; }}
            {}
        }})()"#,
        target.js_query(),
        body
    )
}

/// 通过原生 setter 写值并派发事件，保证前端框架能感知到变化
fn set_value_body(value: &str) -> String {
    format!(
        r#"const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
        const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
        el.focus();
        setter.call(el, {});
        el.dispatchEvent(new Event('input', {{ bubbles: true }}));
        el.dispatchEvent(new Event('change', {{ bubbles: true }}));
        return {{ found: true }};"#,
        serde_json::Value::String(value.to_string())
    )
}

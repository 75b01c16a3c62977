//! 页面元素定位
//!
//! 只负责把"找哪个元素"翻译成一段 JS 查询表达式

use std::fmt::{self, Display};

/// 页面元素定位方式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS 选择器，如 `#order`
    Css(String),
    /// 按钮文字完全匹配（去除首尾空白），如 `OK`
    Text(String),
}

impl Selector {
    pub fn css(selector: impl Into<String>) -> Self {
        Selector::Css(selector.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Selector::Text(text.into())
    }

    /// 生成返回元素（或 null）的 JS 表达式
    ///
    /// 字符串通过 JSON 编码嵌入，避免引号注入
    pub fn js_query(&self) -> String {
        match self {
            Selector::Css(css) => format!("document.querySelector({})", js_string(css)),
            Selector::Text(text) => format!(
                "(Array.from(document.querySelectorAll('button, a, [role=button], input[type=button], input[type=submit]'))\
                 .find(e => (e.innerText || e.value || '').trim() === {}) || null)",
                js_string(text)
            ),
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(css) => write!(f, "{}", css),
            Selector::Text(text) => write!(f, "text={}", text),
        }
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

//! 基础设施层
//!
//! 只有这一层接触 chromiumoxide 的 `Page`

pub mod js_executor;
pub mod page_driver;
pub mod selector;

pub use js_executor::JsExecutor;
pub use page_driver::PageDriver;
pub use selector::Selector;

#[cfg(test)]
pub mod mock_page;

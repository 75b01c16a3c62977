//! 下单页面的元素定位
//!
//! 这些标识由目标网站决定，网站改版时只需修改这里

use crate::infrastructure::Selector;

pub const HEAD_SELECT: &str = "#head";
pub const LEGS_INPUT: &str = "input[placeholder='Enter the part number for the legs']";
pub const ADDRESS_INPUT: &str = "#address";
pub const PREVIEW_BUTTON: &str = "#preview";
pub const ROBOT_PREVIEW_IMAGE: &str = "#robot-preview-image";
pub const ORDER_BUTTON: &str = "#order";
pub const RECEIPT: &str = "#receipt";
pub const ERROR_BANNER: &str = ".alert-danger";
pub const ORDER_ANOTHER_BUTTON: &str = "#order-another";
/// 弹窗确认按钮的文字
pub const MODAL_ACK_TEXT: &str = "OK";

/// 机身单选框：`#id-body-{body}`
pub fn body_radio(body: &str) -> Selector {
    Selector::css(format!("#id-body-{}", body))
}

pub fn modal_ack() -> Selector {
    Selector::text(MODAL_ACK_TEXT)
}

pub fn css(selector: &str) -> Selector {
    Selector::css(selector)
}

//! 测试用的脚本化页面
//!
//! 模拟下单网站的行为：预览后出现机器人图片，提交按队列返回收据 / 错误 / 无响应，
//! "再来一单"后回到表单。

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::Cursor;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};

use crate::error::AppError;
use crate::infrastructure::{PageDriver, Selector};
use crate::services::selectors::{self, css};

/// 点击提交按钮后页面的反应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResponse {
    Receipt,
    ErrorBanner,
    Nothing,
    /// 第一次检查收据时不可见，之后可见，同时提交按钮消失
    LateReceipt,
}

#[derive(Debug)]
pub struct MockState {
    pub visible: HashSet<Selector>,
    pub missing: HashSet<Selector>,
    pub submit_responses: VecDeque<SubmitResponse>,
    pub submit_fallback: SubmitResponse,
    pub modal_after_reset: bool,
    pub late_receipt: bool,
    pub actions: Vec<String>,
    pub values: HashMap<Selector, String>,
    pub receipt_html: String,
    pub screenshot_png: Vec<u8>,
}

pub struct MockPage {
    state: Mutex<MockState>,
}

impl MockPage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                visible: HashSet::new(),
                missing: HashSet::new(),
                submit_responses: VecDeque::new(),
                submit_fallback: SubmitResponse::Receipt,
                modal_after_reset: false,
                late_receipt: false,
                actions: Vec::new(),
                values: HashMap::new(),
                receipt_html: "<h3>Receipt</h3><p>Thank you for your order!</p>".to_string(),
                screenshot_png: sample_png(40, 30),
            }),
        }
    }

    /// 按顺序设置每次提交的结果，用完后使用 fallback
    pub fn with_submit_responses(self, responses: &[SubmitResponse], fallback: SubmitResponse) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.submit_responses = responses.iter().copied().collect();
            state.submit_fallback = fallback;
        }
        self
    }

    pub fn with_modal(self) -> Self {
        self.state.lock().unwrap().visible.insert(selectors::modal_ack());
        self
    }

    pub fn with_modal_after_reset(self) -> Self {
        self.state.lock().unwrap().modal_after_reset = true;
        self
    }

    pub fn with_missing(self, target: Selector) -> Self {
        self.state.lock().unwrap().missing.insert(target);
        self
    }

    pub fn actions(&self) -> Vec<String> {
        self.state.lock().unwrap().actions.clone()
    }

    pub fn clicks_on(&self, target: &Selector) -> usize {
        let needle = format!("click {}", target);
        self.actions().iter().filter(|a| **a == needle).count()
    }

    pub fn value_of(&self, target: &Selector) -> Option<String> {
        self.state.lock().unwrap().values.get(target).cloned()
    }

    fn check_exists(state: &MockState, target: &Selector) -> Result<()> {
        if state.missing.contains(target) {
            return Err(AppError::element_not_found(target.to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for MockPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.state.lock().unwrap().actions.push(format!("goto {}", url));
        Ok(())
    }

    async fn click(&self, target: &Selector) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_exists(&state, target)?;
        state.actions.push(format!("click {}", target));

        if *target == selectors::modal_ack() {
            state.visible.remove(target);
        } else if *target == css(selectors::PREVIEW_BUTTON) {
            state.visible.insert(css(selectors::ROBOT_PREVIEW_IMAGE));
        } else if *target == css(selectors::ORDER_BUTTON) {
            let fallback = state.submit_fallback;
            let response = state.submit_responses.pop_front().unwrap_or(fallback);
            state.visible.remove(&css(selectors::ERROR_BANNER));
            match response {
                SubmitResponse::Receipt => {
                    state.visible.insert(css(selectors::RECEIPT));
                }
                SubmitResponse::ErrorBanner => {
                    state.visible.insert(css(selectors::ERROR_BANNER));
                }
                SubmitResponse::Nothing => {}
                SubmitResponse::LateReceipt => {
                    state.late_receipt = true;
                }
            }
        } else if *target == css(selectors::ORDER_ANOTHER_BUTTON) {
            state.visible.remove(&css(selectors::RECEIPT));
            state.visible.remove(&css(selectors::ROBOT_PREVIEW_IMAGE));
            state.values.clear();
            state.missing.remove(&css(selectors::ORDER_BUTTON));
            if state.modal_after_reset {
                state.visible.insert(selectors::modal_ack());
            }
        }
        Ok(())
    }

    async fn is_visible(&self, target: &Selector) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.late_receipt && *target == css(selectors::RECEIPT) {
            state.late_receipt = false;
            state.visible.insert(css(selectors::RECEIPT));
            state.missing.insert(css(selectors::ORDER_BUTTON));
            return Ok(false);
        }
        Ok(state.visible.contains(target))
    }

    async fn select_option(&self, target: &Selector, value: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_exists(&state, target)?;
        state.actions.push(format!("select {}={}", target, value));
        state.values.insert(target.clone(), value.to_string());
        Ok(())
    }

    async fn clear(&self, target: &Selector) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_exists(&state, target)?;
        state.actions.push(format!("clear {}", target));
        state.values.insert(target.clone(), String::new());
        Ok(())
    }

    async fn fill(&self, target: &Selector, value: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_exists(&state, target)?;
        state.actions.push(format!("fill {}={}", target, value));
        state.values.insert(target.clone(), value.to_string());
        Ok(())
    }

    async fn inner_html(&self, target: &Selector) -> Result<String> {
        let state = self.state.lock().unwrap();
        if !state.visible.contains(target) {
            return Err(AppError::element_not_found(target.to_string()).into());
        }
        Ok(state.receipt_html.clone())
    }

    async fn screenshot(&self, target: &Selector) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        if !state.visible.contains(target) {
            return Err(AppError::element_not_found(target.to_string()).into());
        }
        Ok(state.screenshot_png.clone())
    }
}

/// 生成一张纯色 PNG
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

use std::path::PathBuf;
use std::time::Duration;

use crate::services::order_submitter::SubmitPolicy;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 下单页面 URL
    pub order_page_url: String,
    /// 订单 CSV 下载地址
    pub orders_csv_url: String,
    /// 订单 CSV 本地保存路径（每次运行覆盖）
    pub orders_csv_path: String,
    /// 输出根目录
    pub output_dir: String,
    /// 浏览器调试端口；设置后连接已运行的浏览器，否则自行启动
    pub browser_debug_port: Option<u16>,
    /// 启动模式下是否无头
    pub headless: bool,
    /// 浏览器可执行文件路径（可选，默认自动查找）
    pub chrome_executable: Option<String>,
    /// 每次页面操作后的额外等待（毫秒）
    pub slowmo_ms: u64,
    /// 等待弹窗出现的时长（毫秒）
    pub modal_timeout_ms: u64,
    /// 等待预览图 / 收据出现的时长（毫秒）
    pub element_timeout_ms: u64,
    // --- 提交重试配置 ---
    /// 最大提交次数，0 表示不设上限
    pub submit_max_attempts: u32,
    pub submit_timeout_delay_ms: u64,
    pub submit_error_base_delay_ms: u64,
    pub submit_max_delay_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order_page_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            orders_csv_path: "orders.csv".to_string(),
            output_dir: "output".to_string(),
            browser_debug_port: None,
            headless: false,
            chrome_executable: None,
            slowmo_ms: 100,
            modal_timeout_ms: 5000,
            element_timeout_ms: 10000,
            submit_max_attempts: 10,
            submit_timeout_delay_ms: 1000,
            submit_error_base_delay_ms: 250,
            submit_max_delay_ms: 4000,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            order_page_url: std::env::var("ORDER_PAGE_URL").unwrap_or(default.order_page_url),
            orders_csv_url: std::env::var("ORDERS_CSV_URL").unwrap_or(default.orders_csv_url),
            orders_csv_path: std::env::var("ORDERS_CSV_PATH").unwrap_or(default.orders_csv_path),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).or(default.browser_debug_port),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            slowmo_ms: std::env::var("SLOWMO_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.slowmo_ms),
            modal_timeout_ms: std::env::var("MODAL_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.modal_timeout_ms),
            element_timeout_ms: std::env::var("ELEMENT_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.element_timeout_ms),
            submit_max_attempts: std::env::var("SUBMIT_MAX_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_max_attempts),
            submit_timeout_delay_ms: std::env::var("SUBMIT_TIMEOUT_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_timeout_delay_ms),
            submit_error_base_delay_ms: std::env::var("SUBMIT_ERROR_BASE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_error_base_delay_ms),
            submit_max_delay_ms: std::env::var("SUBMIT_MAX_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_max_delay_ms),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    pub fn receipts_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("receipts")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("screenshots")
    }

    pub fn archive_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("receipts.zip")
    }

    pub fn run_log_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("run_log.txt")
    }

    pub fn slowmo(&self) -> Duration {
        Duration::from_millis(self.slowmo_ms)
    }

    pub fn modal_timeout(&self) -> Duration {
        Duration::from_millis(self.modal_timeout_ms)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    /// 由配置生成提交重试策略（`submit_max_attempts == 0` 表示无上限）
    pub fn submit_policy(&self) -> SubmitPolicy {
        SubmitPolicy {
            max_attempts: (self.submit_max_attempts > 0).then_some(self.submit_max_attempts),
            timeout_delay: Duration::from_millis(self.submit_timeout_delay_ms),
            error_base_delay: Duration::from_millis(self.submit_error_base_delay_ms),
            max_delay: Duration::from_millis(self.submit_max_delay_ms),
        }
    }
}

use thiserror::Error;

use crate::services::order_submitter::SubmitState;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 订单业务错误
    #[error("订单错误: {0}")]
    Order(#[from] OrderError),
    /// 提交重试耗尽等提交错误
    #[error("提交错误: {0}")]
    Submit(#[from] SubmitError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 页面元素不存在
    #[error("找不到页面元素: {selector}")]
    ElementNotFound { selector: String },
    /// 页面操作失败（脚本返回错误）
    #[error("页面操作失败 ({selector}): {message}")]
    ActionFailed { selector: String, message: String },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {message}")]
    ConfigurationFailed { message: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 下载失败
    #[error("下载失败 ({url}): {source}")]
    DownloadFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// CSV 解析失败
    #[error("CSV解析失败 ({path}): {source}")]
    CsvParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// PDF 处理失败
    #[error("PDF处理失败 ({path}): {message}")]
    PdfFailed { path: String, message: String },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 订单业务错误
#[derive(Debug, Error)]
pub enum OrderError {
    /// 订单号为空
    #[error("订单号不能为空 (第 {row} 行)")]
    EmptyOrderNumber { row: usize },
    /// 订单号含路径分隔符，不能用于文件名
    #[error("订单号 '{value}' 含有非法字符 (第 {row} 行)")]
    InvalidOrderNumber { row: usize, value: String },
    /// 预览图未在限定时间内出现
    #[error("订单 {order_number} 的预览图未出现")]
    PreviewNotRendered { order_number: String },
    /// 收据未在限定时间内出现
    #[error("订单 {order_number} 的收据未出现")]
    ReceiptNotRendered { order_number: String },
}

/// 提交状态机错误
#[derive(Debug, Error)]
pub enum SubmitError {
    /// 已达到最大提交次数仍未成功
    #[error("提交重试已耗尽: 共尝试 {attempts} 次, 最后状态 {last_state:?}")]
    RetriesExhausted { attempts: u32, last_state: SubmitState },
    /// 页面操作失败（点击 / 可见性检查）
    #[error("提交时页面操作失败: {0}")]
    Page(#[source] anyhow::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(port: u16, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建下载失败错误
    pub fn download_failed(url: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::File(FileError::DownloadFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 PDF 处理错误
    pub fn pdf_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::File(FileError::PdfFailed {
            path: path.into(),
            message: message.into(),
        })
    }

    /// 创建元素不存在错误
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        AppError::Browser(BrowserError::ElementNotFound {
            selector: selector.into(),
        })
    }
}

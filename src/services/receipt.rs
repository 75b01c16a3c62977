//! 收据保存 - 业务能力层
//!
//! 读取页面上的收据 HTML，排版成文字 PDF 写入 `receipt_<订单号>.pdf`

use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use regex::Regex;
use tracing::debug;

use crate::error::{AppError, OrderError};
use crate::infrastructure::PageDriver;
use crate::models::ArtifactPaths;
use crate::services::selectors::{self, css};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;
const LINE_HEIGHT: f32 = 5.5;
const FONT_SIZE: f32 = 10.0;
const WRAP_COLUMNS: usize = 90;

/// 等待收据出现并保存为 PDF，返回文件路径
pub async fn store_receipt_as_pdf<D: PageDriver + ?Sized>(
    driver: &D,
    order_number: &str,
    paths: &ArtifactPaths,
    timeout: Duration,
) -> Result<PathBuf> {
    let receipt = css(selectors::RECEIPT);

    if !driver.wait_for(&receipt, timeout).await? {
        return Err(AppError::Order(OrderError::ReceiptNotRendered {
            order_number: order_number.to_string(),
        })
        .into());
    }

    let html = driver.inner_html(&receipt).await?;
    let bytes = render_receipt_pdf(&format!("Receipt {}", order_number), &html)?;

    let pdf_path = paths.receipt(order_number);
    tokio::fs::write(&pdf_path, &bytes)
        .await
        .map_err(|e| AppError::write_failed(pdf_path.display().to_string(), e))?;

    debug!("收据已保存: {} ({} 字节)", pdf_path.display(), bytes.len());
    Ok(pdf_path)
}

/// 把 HTML 片段排版成 A4 文字 PDF，写满一页自动换页
pub fn render_receipt_pdf(title: &str, html: &str) -> Result<Vec<u8>> {
    let lines = html_to_lines(html)?;

    let (doc, page1, layer1) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::pdf_failed(title, format!("字体加载失败: {e}")))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = TOP;

    for line in lines.iter().flat_map(|l| wrap_line(l, WRAP_COLUMNS)) {
        if y < BOTTOM {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = TOP;
        }
        layer.use_text(line, FONT_SIZE, Mm(MARGIN_LEFT), Mm(y), &font);
        y -= LINE_HEIGHT;
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| AppError::pdf_failed(title, format!("保存失败: {e}")))?;
    buf.into_inner()
        .map_err(|e| AppError::pdf_failed(title, format!("缓冲区错误: {e}")).into())
}

/// HTML → 文本行：块级标签换行，其余标签去掉，解码常见实体，合并空白
pub fn html_to_lines(html: &str) -> Result<Vec<String>> {
    let hidden = Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>")?;
    let breaks = Regex::new(r"(?i)<br\s*/?>")?;
    let blocks = Regex::new(r"(?i)</?(p|div|h[1-6]|li|ul|ol|tr|table|section)(\s[^>]*)?>")?;
    let cells = Regex::new(r"(?i)</t[dh]>")?;
    let tags = Regex::new(r"(?s)<[^>]*>")?;
    let spaces = Regex::new(r"[ \t\r\u{a0}]+")?;

    let text = hidden.replace_all(html, "");
    let text = breaks.replace_all(&text, "\n");
    let text = blocks.replace_all(&text, "\n");
    let text = cells.replace_all(&text, " ");
    let text = tags.replace_all(&text, "");
    let text = decode_entities(&text);

    Ok(text
        .lines()
        .map(|l| spaces.replace_all(l, " ").trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// 按词换行，单词本身超长时硬切
fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in line.split(' ') {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max_chars {
            out.push(std::mem::take(&mut current));
        }

        if word_len > max_chars {
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                current = chunk.iter().collect();
            }
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

//! 截图嵌入收据 - 业务能力层
//!
//! 保留收据 PDF 的第一页，把截图作为新的一页追加在后面，原地覆盖

use std::path::Path;

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

use crate::error::AppError;

/// A4，单位 pt
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 36.0;
const IMAGE_NAME: &str = "RobotImg";

/// 把截图追加到收据第一页之后，覆盖原 PDF
pub fn embed_screenshot_to_receipt(screenshot_path: &Path, pdf_path: &Path) -> Result<()> {
    let mut doc = Document::load(pdf_path)
        .with_context(|| format!("无法读取PDF: {}", pdf_path.display()))?;
    let pdf_label = pdf_path.display().to_string();

    // 只保留第一页
    let page_count = doc.get_pages().len() as u32;
    if page_count == 0 {
        return Err(AppError::pdf_failed(&pdf_label, "PDF 没有任何页面").into());
    }
    if page_count > 1 {
        let extra: Vec<u32> = (2..=page_count).collect();
        doc.delete_pages(&extra);
    }

    let image = image::open(screenshot_path)
        .with_context(|| format!("无法读取截图: {}", screenshot_path.display()))?
        .to_rgb8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AppError::pdf_failed(&pdf_label, "截图尺寸为 0").into());
    }

    let mut image_stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        },
        image.into_raw(),
    );
    image_stream
        .compress()
        .map_err(|e| AppError::pdf_failed(&pdf_label, format!("图片压缩失败: {e}")))?;
    let image_id = doc.add_object(image_stream);

    // 等比缩放，放在页面顶部居中
    let avail_w = PAGE_WIDTH - 2.0 * MARGIN;
    let avail_h = PAGE_HEIGHT - 2.0 * MARGIN;
    let scale = (avail_w / width as f32).min(avail_h / height as f32);
    let draw_w = width as f32 * scale;
    let draw_h = height as f32 * scale;
    let x = MARGIN + (avail_w - draw_w) / 2.0;
    let y = PAGE_HEIGHT - MARGIN - draw_h;

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(draw_w),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(draw_h),
                    Object::Real(x),
                    Object::Real(y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| AppError::pdf_failed(&pdf_label, format!("页面内容编码失败: {e}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let pages_id = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| AppError::pdf_failed(&pdf_label, format!("找不到页面树: {e}")))?;

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(PAGE_WIDTH),
            Object::Real(PAGE_HEIGHT),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_NAME => image_id,
            },
        },
    });

    let kept = doc.get_pages().len() as i64;
    let pages = doc
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| AppError::pdf_failed(&pdf_label, format!("页面树无效: {e}")))?;
    pages
        .get_mut(b"Kids")
        .and_then(Object::as_array_mut)
        .map_err(|e| AppError::pdf_failed(&pdf_label, format!("页面树无效: {e}")))?
        .push(Object::Reference(page_id));
    pages.set("Count", kept + 1);

    doc.compress();
    doc.save(pdf_path)
        .map_err(|e| AppError::write_failed(pdf_label.clone(), e))?;

    debug!(
        "截图已嵌入收据: {} ({}x{})",
        pdf_path.display(),
        width,
        height
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock_page::sample_png;
    use crate::services::receipt::render_receipt_pdf;

    fn fixtures(dir: &Path, receipt_html: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let pdf = dir.join("receipt_1.pdf");
        let png = dir.join("robot_1.png");
        std::fs::write(&pdf, render_receipt_pdf("Receipt 1", receipt_html).unwrap()).unwrap();
        std::fs::write(&png, sample_png(64, 48)).unwrap();
        (pdf, png)
    }

    #[test]
    fn test_screenshot_appended_as_second_page() {
        let tmp = tempfile::tempdir().unwrap();
        let (pdf, png) = fixtures(tmp.path(), "<h3>Receipt</h3><p>Order 1</p>");

        embed_screenshot_to_receipt(&png, &pdf).unwrap();

        let doc = Document::load(&pdf).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);

        let page = doc.get_dictionary(pages[&2]).unwrap();
        let xobjects = page
            .get(b"Resources")
            .and_then(Object::as_dict)
            .and_then(|r| r.get(b"XObject"))
            .and_then(Object::as_dict)
            .unwrap();
        let image_id = xobjects
            .get(IMAGE_NAME.as_bytes())
            .and_then(Object::as_reference)
            .unwrap();
        let image = doc.get_object(image_id).and_then(Object::as_stream).unwrap();
        assert_eq!(image.dict.get(b"Width").and_then(Object::as_i64).unwrap(), 64);
        assert_eq!(image.dict.get(b"Height").and_then(Object::as_i64).unwrap(), 48);
    }

    #[test]
    fn test_only_first_page_is_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let (pdf, png) = fixtures(tmp.path(), &"<p>line</p>".repeat(120));
        assert!(Document::load(&pdf).unwrap().get_pages().len() > 1);

        embed_screenshot_to_receipt(&png, &pdf).unwrap();

        assert_eq!(Document::load(&pdf).unwrap().get_pages().len(), 2);
    }

    #[test]
    fn test_missing_screenshot_fails_without_touching_pdf() {
        let tmp = tempfile::tempdir().unwrap();
        let (pdf, _) = fixtures(tmp.path(), "<p>Order 1</p>");
        let before = std::fs::read(&pdf).unwrap();

        let result = embed_screenshot_to_receipt(&tmp.path().join("nope.png"), &pdf);

        assert!(result.is_err());
        assert_eq!(std::fs::read(&pdf).unwrap(), before);
    }
}

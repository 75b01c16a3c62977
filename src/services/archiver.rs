//! 收据归档 - 业务能力层
//!
//! 只负责把收据目录打包成 ZIP，不跟踪哪些订单已经完成

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AppError, FileError};

/// 把 `folder` 下的所有普通文件（不递归）按文件名排序打包到 `archive_path`
///
/// 已存在的压缩包会被替换；压缩包本身位于 `folder` 中时会被跳过。
/// 返回打包的文件数量
pub fn archive_folder_with_zip(folder: &Path, archive_path: &Path) -> Result<usize> {
    if !folder.is_dir() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder.display().to_string(),
        })
        .into());
    }

    let archive_abs = archive_path.canonicalize().ok();
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(folder)
        .with_context(|| format!("无法读取文件夹: {}", folder.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if archive_abs.is_some() && path.canonicalize().ok() == archive_abs {
            continue;
        }
        entries.push(path);
    }
    entries.sort();

    if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(archive_path)
        .with_context(|| format!("无法创建压缩包: {}", archive_path.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &entries {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let data = std::fs::read(path)
            .with_context(|| format!("无法读取文件: {}", path.display()))?;

        zip.start_file(name.as_str(), options)?;
        zip.write_all(&data)?;
        debug!("已加入压缩包: {} ({} 字节)", name, data.len());
    }

    zip.finish()?.flush()?;

    info!(
        "📦 Created ZIP archive: {} ({} 个文件)",
        archive_path.display(),
        entries.len()
    );
    Ok(entries.len())
}

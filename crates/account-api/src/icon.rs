//! Store icon normalization.
//!
//! The store expects a 256x256 icon. Icons already at that size are
//! uploaded byte-for-byte; anything else is rescaled with a Catmull-Rom
//! filter and re-encoded as PNG.

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, ImageReader};
use tracing::{debug, info};

use crate::error::ErrorKind;

/// Edge length of a store icon in pixels.
pub const ICON_SIZE: u32 = 256;

/// An icon ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreIcon {
    pub data: Vec<u8>,
    /// True if `data` was re-encoded as PNG.
    pub resized: bool,
}

/// Decodes `data` (PNG, JPEG or GIF) and brings it to 256x256.
pub fn normalize_icon(data: Vec<u8>) -> Result<StoreIcon, ErrorKind> {
    let img = ImageReader::new(Cursor::new(&data))
        .with_guessed_format()?
        .decode()?;
    let (width, height) = (img.width(), img.height());

    if width == ICON_SIZE && height == ICON_SIZE {
        debug!("store icon is already {ICON_SIZE}x{ICON_SIZE}, copying original file");
        return Ok(StoreIcon {
            data,
            resized: false,
        });
    }

    info!("resizing store icon from {width}x{height} to {ICON_SIZE}x{ICON_SIZE}");
    let scaled = imageops::resize(&img, ICON_SIZE, ICON_SIZE, FilterType::CatmullRom);

    let mut out = Cursor::new(Vec::new());
    scaled.write_to(&mut out, ImageFormat::Png)?;

    Ok(StoreIcon {
        data: out.into_inner(),
        resized: true,
    })
}

/// Reads and normalizes an icon file, returning the upload file name.
///
/// Decoding and resizing run on the blocking pool. Re-encoded icons get
/// a `.png` extension.
pub async fn load_icon(path: &Path) -> Result<(String, StoreIcon), ErrorKind> {
    let data = tokio::fs::read(path).await?;
    let icon = tokio::task::spawn_blocking(move || normalize_icon(data))
        .await
        .map_err(|e| ErrorKind::Io(std::io::Error::other(format!("task join error: {e}"))))??;

    let file_name = if icon.resized {
        path.with_extension("png")
    } else {
        path.to_path_buf()
    };
    let file_name = file_name
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "icon.png".into());

    Ok((file_name, icon))
}

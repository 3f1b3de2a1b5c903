//! 扫码通过后的拍照：全景 + 中心 ROI
//!
//! 两张照片互不影响，任意一张失败只是不展示。

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use log::{info, warn};

use super::error::CaptureError;
use super::frame::Frame;
use super::roi::{crop_rgba, Roi};

/// 高分辨率拍照服务（与预览流分离）
pub trait StillCapture: Send + Sync {
    /// 支持的最大照片尺寸
    fn max_photo_size(&self) -> Option<(u32, u32)>;

    /// 返回编码好的 JPEG；size 为 None 时由相机决定
    fn take_photo(&self, size: Option<(u32, u32)>) -> Result<Vec<u8>, CaptureError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    Full,
    Roi,
}

impl CaptureKind {
    pub fn file_prefix(&self) -> &'static str {
        match self {
            CaptureKind::Full => "scan_full",
            CaptureKind::Roi => "scan_roi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CaptureKind::Full => "全景照片",
            CaptureKind::Roi => "中心ROI",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub kind: CaptureKind,
    pub filename: String,
    pub jpeg_data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct CaptureSet {
    pub full: Option<CapturedImage>,
    pub roi: Option<CapturedImage>,
}

impl CaptureSet {
    pub fn get(&self, kind: CaptureKind) -> Option<&CapturedImage> {
        match kind {
            CaptureKind::Full => self.full.as_ref(),
            CaptureKind::Roi => self.roi.as_ref(),
        }
    }

    pub fn images(&self) -> impl Iterator<Item = &CapturedImage> {
        self.full.iter().chain(self.roi.iter())
    }
}

/// 本地时间戳，例如 20250101_093005
pub fn time_stamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub fn file_name(kind: CaptureKind, stamp: &str) -> String {
    format!("{}_{}.jpg", kind.file_prefix(), stamp)
}

pub struct CaptureService {
    quality: u8,
    still: Option<Arc<dyn StillCapture>>,
}

impl CaptureService {
    pub fn new(quality: u8, still: Option<Arc<dyn StillCapture>>) -> Self {
        Self { quality, still }
    }

    /// 两张照片并行拍摄，都结束后返回
    pub fn capture(&self, frame: &Frame, roi: &Roi, stamp: &str) -> CaptureSet {
        let (full, roi_shot) = rayon::join(|| self.full_photo(frame), || self.roi_photo(frame, roi));

        let full = match full {
            Ok(jpeg_data) => Some(CapturedImage {
                kind: CaptureKind::Full,
                filename: file_name(CaptureKind::Full, stamp),
                jpeg_data,
            }),
            Err(e) => {
                warn!("⚠️ Full photo failed: {}", e);
                None
            }
        };
        let roi = match roi_shot {
            Ok(jpeg_data) => Some(CapturedImage {
                kind: CaptureKind::Roi,
                filename: file_name(CaptureKind::Roi, stamp),
                jpeg_data,
            }),
            Err(e) => {
                warn!("⚠️ ROI snapshot failed: {}", e);
                None
            }
        };

        info!(
            "📸 Capture done: full={} roi={}",
            full.is_some(),
            roi.is_some()
        );
        CaptureSet { full, roi }
    }

    /// 优先用拍照服务的最大分辨率，其次默认参数，最后退回整帧截图
    pub fn full_photo(&self, frame: &Frame) -> Result<Vec<u8>, CaptureError> {
        if let Some(still) = &self.still {
            let attempt = match still.max_photo_size() {
                Some(size) => still.take_photo(Some(size)).or_else(|_| still.take_photo(None)),
                None => still.take_photo(None),
            };
            match attempt {
                Ok(jpeg) => return Ok(jpeg),
                Err(e) => warn!("⚠️ Still capture failed ({}), using frame copy", e),
            }
        }

        let image = frame.to_image().ok_or(CaptureError::InvalidFrame {
            width: frame.width,
            height: frame.height,
        })?;
        encode_jpeg(image, self.quality)
    }

    pub fn roi_photo(&self, frame: &Frame, roi: &Roi) -> Result<Vec<u8>, CaptureError> {
        let crop = crop_rgba(frame, roi).ok_or(CaptureError::EmptyRoi)?;
        encode_jpeg(crop, self.quality)
    }
}

pub fn encode_jpeg(image: RgbaImage, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb).write_to(&mut buffer, ImageOutputFormat::Jpeg(quality))?;
    Ok(buffer.into_inner())
}

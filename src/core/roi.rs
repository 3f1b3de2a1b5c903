//! 扫描框（ROI）投影与工作缓冲区采样
//!
//! 每个周期都按当前帧尺寸重新计算，旋转屏幕或分辨率变化时无需额外通知。

use image::RgbaImage;

use super::frame::Frame;

/// 扫描框在原始帧中的像素矩形（正方形，居中）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roi {
    pub sx: f64,
    pub sy: f64,
    pub sw: f64,
    pub sh: f64,
    pub roi_side: f64,
}

impl Roi {
    pub fn is_empty(&self) -> bool {
        self.sw < 1.0 || self.sh < 1.0
    }
}

/// 解码用的方形灰度缓冲区，只在一次解码期间存在
#[derive(Debug, Clone)]
pub struct WorkingBuffer {
    pub side: u32,
    pub luma: Vec<u8>,
}

impl WorkingBuffer {
    pub fn new(side: u32, luma: Vec<u8>) -> Self {
        debug_assert_eq!(luma.len(), side as usize * side as usize);
        Self { side, luma }
    }

    /// 探测用的 1×1 空帧
    pub fn blank() -> Self {
        Self {
            side: 1,
            luma: vec![0],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.luma[y * self.side as usize + x]
    }
}

#[derive(Debug, Clone)]
pub struct RoiProjector {
    roi_scale: f64,
    min_target: u32,
    sample: u32,
}

impl RoiProjector {
    pub fn new(roi_scale: f64, min_target: u32, sample: u32) -> Self {
        Self {
            roi_scale,
            min_target,
            sample,
        }
    }

    pub fn project(&self, width: u32, height: u32) -> Roi {
        let (w, h) = (width as f64, height as f64);
        let roi_side = w.min(h) * self.roi_scale;
        Roi {
            sx: (w - roi_side) / 2.0,
            sy: (h - roi_side) / 2.0,
            sw: roi_side,
            sh: roi_side,
            roi_side,
        }
    }

    /// target = clamp(floor(sw), min_target, sample)
    pub fn target_side(&self, sw: f64) -> u32 {
        let floored = sw.max(0.0).floor() as u32;
        floored.clamp(self.min_target, self.sample)
    }

    /// ROI 最近邻采样到 target×target 灰度缓冲区
    pub fn resample(&self, frame: &Frame, roi: &Roi, target: u32) -> WorkingBuffer {
        let t = target as usize;
        let scale = roi.sw / target as f64;
        let max_x = frame.width.saturating_sub(1);
        let max_y = frame.height.saturating_sub(1);

        let mut luma = Vec::with_capacity(t * t);
        for out_y in 0..t {
            let src_y = ((roi.sy + (out_y as f64 + 0.5) * scale) as u32).min(max_y);
            for out_x in 0..t {
                let src_x = ((roi.sx + (out_x as f64 + 0.5) * scale) as u32).min(max_x);
                luma.push(frame.luma_at(src_x, src_y));
            }
        }

        WorkingBuffer::new(target, luma)
    }
}

impl Default for RoiProjector {
    fn default() -> Self {
        Self::new(0.46, 320, 960)
    }
}

/// 按 ROI 原尺寸裁剪 RGBA（用于中心 ROI 照片）
pub fn crop_rgba(frame: &Frame, roi: &Roi) -> Option<RgbaImage> {
    if roi.is_empty() || !frame.is_valid() {
        return None;
    }
    let image = frame.to_image()?;
    let x = (roi.sx.max(0.0) as u32).min(frame.width - 1);
    let y = (roi.sy.max(0.0) as u32).min(frame.height - 1);
    let w = (roi.sw as u32).min(frame.width - x);
    let h = (roi.sh as u32).min(frame.height - y);
    if w == 0 || h == 0 {
        return None;
    }
    Some(image::imageops::crop_imm(&image, x, y, w, h).to_image())
}

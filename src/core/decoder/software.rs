use log::debug;
use rqrr::PreparedImage;

use crate::core::geometry::{Geometry, Point};
use crate::core::roi::WorkingBuffer;

use super::{DecodeOutcome, DecodeResult};

/// 纯软件解码（兼容引擎），正反两种极性都尝试
#[derive(Debug, Clone, Default)]
pub struct SoftwareDecoder;

impl SoftwareDecoder {
    pub fn new() -> Self {
        Self
    }

    /// 任一极性解出内容即返回；两次都只有几何信息时才返回无内容的结果
    pub fn decode(&self, buffer: &WorkingBuffer) -> DecodeOutcome {
        let normal = match Self::try_decode(buffer, false) {
            Some(result) if result.text.is_some() => return DecodeOutcome::Found(result),
            other => other,
        };
        let inverted = match Self::try_decode(buffer, true) {
            Some(result) if result.text.is_some() => return DecodeOutcome::Found(result),
            other => other,
        };
        match normal.or(inverted) {
            Some(result) => DecodeOutcome::Found(result),
            None => DecodeOutcome::NotFound,
        }
    }

    fn try_decode(buffer: &WorkingBuffer, inverted: bool) -> Option<DecodeResult> {
        let side = buffer.side as usize;
        if side < 21 {
            return None;
        }

        let mut img = PreparedImage::prepare_from_greyscale(side, side, |x, y| {
            let v = buffer.get(x, y);
            if inverted {
                255 - v
            } else {
                v
            }
        });
        let grids = img.detect_grids();
        let grid = grids.first()?;

        let corners: Vec<Point> = grid
            .bounds
            .iter()
            .map(|p| Point::new(p.x as f64, p.y as f64))
            .collect();
        let geometry = Geometry::from_corner_slice(&corners);

        // 找到定位图形但内容解不出来时，仍然返回几何信息
        let text = match grid.decode() {
            Ok((_meta, content)) => Some(content),
            Err(e) => {
                debug!("rqrr decode failed (inverted={}): {:?}", inverted, e);
                None
            }
        };

        Some(DecodeResult { text, geometry })
    }
}

/// 把二维码模块铺到方形灰度图上（白底黑码，invert 时反色）
#[cfg(test)]
pub(crate) fn render_qr(text: &str, module_px: usize, side: usize, invert: bool) -> WorkingBuffer {
    let (width, modules) = qr_modules(text);
    let offset = (side - width * module_px) / 2;
    let mut luma = vec![255u8; side * side];
    for (i, dark) in modules.iter().enumerate() {
        if !dark {
            continue;
        }
        let (mx, my) = (i % width, i / width);
        for dy in 0..module_px {
            for dx in 0..module_px {
                let x = offset + mx * module_px + dx;
                let y = offset + my * module_px + dy;
                luma[y * side + x] = 0;
            }
        }
    }
    if invert {
        luma.iter_mut().for_each(|v| *v = 255 - *v);
    }
    WorkingBuffer::new(side as u32, luma)
}

/// (每行模块数, 行优先的深色标记)
#[cfg(test)]
pub(crate) fn qr_modules(text: &str) -> (usize, Vec<bool>) {
    let code = qrcode::QrCode::new(text.as_bytes()).expect("encodable text");
    let modules = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();
    (code.width(), modules)
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;

use crate::core::error::DecodeError;
use crate::core::geometry::{Geometry, Point};
use crate::core::roi::WorkingBuffer;

use super::{DecodeOutcome, DecodeResult};

/// 平台条码检测器返回的单个结果
#[derive(Debug, Clone, Default)]
pub struct DetectedBarcode {
    pub raw_value: Option<String>,
    pub corner_points: Vec<Point>,
    pub bounding_box: Option<(f64, f64, f64, f64)>,
}

impl DetectedBarcode {
    /// 角点优先，其次包围盒
    pub fn geometry(&self) -> Option<Geometry> {
        Geometry::from_corner_slice(&self.corner_points).or_else(|| {
            self.bounding_box
                .map(|(x, y, width, height)| Geometry::BoundingBox {
                    x,
                    y,
                    width,
                    height,
                })
        })
    }
}

/// 宿主提供的原生（硬件加速）检测器
pub trait BarcodeDetector: Send + Sync {
    fn detect(&self, buffer: &WorkingBuffer) -> Result<Vec<DetectedBarcode>, DecodeError>;
}

impl<T: BarcodeDetector + ?Sized> BarcodeDetector for Arc<T> {
    fn detect(&self, buffer: &WorkingBuffer) -> Result<Vec<DetectedBarcode>, DecodeError> {
        (**self).detect(buffer)
    }
}

pub struct NativeDecoder {
    detector: Box<dyn BarcodeDetector>,
}

impl NativeDecoder {
    pub fn new(detector: Box<dyn BarcodeDetector>) -> Self {
        Self { detector }
    }

    /// 对 1×1 空帧做一次探测，判断检测器是否真正可用
    pub fn probe(&self) -> Result<(), DecodeError> {
        self.detector.detect(&WorkingBuffer::blank()).map(|_| ())
    }

    pub fn decode(&self, buffer: &WorkingBuffer) -> DecodeOutcome {
        match self.detector.detect(buffer) {
            Ok(results) => match results.into_iter().next() {
                Some(first) => DecodeOutcome::Found(DecodeResult {
                    geometry: first.geometry(),
                    text: first.raw_value,
                }),
                None => DecodeOutcome::NotFound,
            },
            Err(e) => {
                debug!("native detector failed: {}", e);
                DecodeOutcome::Failed(e.to_string())
            }
        }
    }
}

type Script = Box<dyn Fn(u64) -> Result<Vec<DetectedBarcode>, DecodeError> + Send + Sync>;

/// 按调用序号返回预设结果的检测器
pub struct MockBarcodeDetector {
    calls: AtomicU64,
    script: Script,
}

impl MockBarcodeDetector {
    pub fn with_pattern<F>(pattern: F) -> Self
    where
        F: Fn(u64) -> Result<Vec<DetectedBarcode>, DecodeError> + Send + Sync + 'static,
    {
        Self {
            calls: AtomicU64::new(0),
            script: Box::new(pattern),
        }
    }

    /// 每次都返回同一个正方形二维码
    pub fn with_fixed_square(text: &str, side: f64) -> Self {
        let text = text.to_string();
        Self::with_pattern(move |_| Ok(vec![square_barcode(&text, side)]))
    }

    pub fn always_failing(reason: &str) -> Self {
        let reason = reason.to_string();
        Self::with_pattern(move |_| Err(DecodeError::Unsupported(reason.clone())))
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BarcodeDetector for MockBarcodeDetector {
    fn detect(&self, _buffer: &WorkingBuffer) -> Result<Vec<DetectedBarcode>, DecodeError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        (self.script)(n)
    }
}

/// 左上角在 (10, 10) 的正方形条码
pub fn square_barcode(text: &str, side: f64) -> DetectedBarcode {
    let (x0, y0) = (10.0, 10.0);
    DetectedBarcode {
        raw_value: Some(text.to_string()),
        corner_points: vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
        ],
        bounding_box: Some((x0, y0, side, side)),
    }
}

//! 门控引擎：把解码几何换算成占比，分类，并做连续帧去抖
//!
//! 占比相对扫描框（固定的物理比例）计算，与采样缓冲区大小和设备分辨率无关。

use log::debug;

use super::decoder::DecodeOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotDetectedReason {
    NoCode,
    DecodeFailed,
    /// 检测到了图形，但拿不到可用的边框
    GeometryUnavailable,
    /// 有边框，但内容为空
    EmptyPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Accept(String),
    Qualifying,
    /// 占比 ≥ 上限：太大，请拉远
    TooLarge,
    /// 占比 < 下限：太小，请靠近
    TooSmall,
    NotDetected(NotDetectedReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tip {
    PlaceInBox,
    MoveAway,
    MoveCloser,
    HoldStill,
    Done,
}

impl Tip {
    pub fn message(&self) -> &'static str {
        match self {
            Tip::PlaceInBox => "请将二维码置于小框内",
            Tip::MoveAway => "二维码过大，请拉远",
            Tip::MoveCloser => "二维码过小，稍微靠近",
            Tip::HoldStill => "保持此距离…",
            Tip::Done => "扫码完成",
        }
    }
}

/// 启动或恢复扫描时的引导语，带上拍照门槛
pub fn ready_hint(thresh: f64) -> String {
    format!(
        "把实物放入小框内；检测到二维码会提示，满足门槛(<{:.0}%)才拍照",
        thresh * 100.0
    )
}

impl Classification {
    pub fn tip(&self) -> Tip {
        match self {
            Classification::Accept(_) => Tip::Done,
            Classification::Qualifying => Tip::HoldStill,
            Classification::TooLarge => Tip::MoveAway,
            Classification::TooSmall => Tip::MoveCloser,
            Classification::NotDetected(_) => Tip::PlaceInBox,
        }
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Classification::Accept(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub classification: Classification,
    /// 有几何信息时的占比
    pub ratio: Option<f64>,
    pub stable_count: u32,
}

impl Evaluation {
    /// 状态栏文字
    pub fn status_line(&self, thresh: f64) -> String {
        match (self.ratio, &self.classification) {
            (_, Classification::NotDetected(NotDetectedReason::GeometryUnavailable)) => {
                "已检测到二维码，但无法获取边框".to_string()
            }
            (Some(ratio), _) => format!(
                "已检测到二维码 · 占比 {:.1}%（阈值 < {:.0}%）",
                ratio * 100.0,
                thresh * 100.0
            ),
            (None, _) => "未检测到二维码".to_string(),
        }
    }

    /// 占比落在合格区间（绿色徽标）
    pub fn in_band(&self) -> bool {
        matches!(
            self.classification,
            Classification::Qualifying | Classification::Accept(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GatingState {
    pub stable_count: u32,
    pub paused: bool,
}

#[derive(Debug, Clone)]
pub struct GatingEngine {
    min_ok: f64,
    thresh: f64,
    stable_need: u32,
    stable_count: u32,
}

impl GatingEngine {
    pub fn new(min_ok: f64, thresh: f64, stable_need: u32) -> Self {
        Self {
            min_ok,
            thresh,
            stable_need,
            stable_count: 0,
        }
    }

    pub fn stable_count(&self) -> u32 {
        self.stable_count
    }

    pub fn reset(&mut self) {
        self.stable_count = 0;
    }

    /// 缓冲区上的边长换算回扫描框，再与扫描框边长比较
    pub fn ratio(size_on_target: f64, roi_side: f64, target: u32) -> f64 {
        if roi_side <= 0.0 || target == 0 {
            return 0.0;
        }
        let scale = roi_side / target as f64;
        let qr_side_on_roi = size_on_target * scale;
        qr_side_on_roi / roi_side
    }

    pub fn evaluate(&mut self, outcome: &DecodeOutcome, roi_side: f64, target: u32) -> Evaluation {
        let result = match outcome {
            DecodeOutcome::Found(result) => result,
            DecodeOutcome::NotFound => return self.not_detected(NotDetectedReason::NoCode, None),
            DecodeOutcome::Failed(_) => {
                return self.not_detected(NotDetectedReason::DecodeFailed, None)
            }
        };

        let Some(size) = result.geometry.as_ref().and_then(|g| g.box_size()) else {
            debug!("detected but ungeometrizable");
            return self.not_detected(NotDetectedReason::GeometryUnavailable, None);
        };

        let ratio = Self::ratio(size, roi_side, target);

        let text = match result.text.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => {
                debug!("geometry present but payload empty (ratio {:.3})", ratio);
                return self.not_detected(NotDetectedReason::EmptyPayload, Some(ratio));
            }
        };

        let classification = if ratio >= self.thresh {
            self.stable_count = 0;
            Classification::TooLarge
        } else if ratio < self.min_ok {
            self.stable_count = 0;
            Classification::TooSmall
        } else {
            self.stable_count += 1;
            if self.stable_count >= self.stable_need {
                Classification::Accept(text.to_string())
            } else {
                Classification::Qualifying
            }
        };

        debug!(
            "ratio {:.3} -> {:?} (stable {}/{})",
            ratio, classification, self.stable_count, self.stable_need
        );

        Evaluation {
            classification,
            ratio: Some(ratio),
            stable_count: self.stable_count,
        }
    }

    fn not_detected(&mut self, reason: NotDetectedReason, ratio: Option<f64>) -> Evaluation {
        self.stable_count = 0;
        Evaluation {
            classification: Classification::NotDetected(reason),
            ratio,
            stable_count: 0,
        }
    }
}

impl Default for GatingEngine {
    fn default() -> Self {
        Self::new(0.06, 0.30, 2)
    }
}

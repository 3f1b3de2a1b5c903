//! 相机边界：请求参数、能力、设备选择，以及最新帧的共享槽
//!
//! 真正的设备枚举和权限协商由宿主完成，这里只描述接口。

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use regex::Regex;

use super::capture::StillCapture;
use super::error::{AcquisitionError, CameraError};
use super::frame::Frame;

/// 超广角镜头的常见标签
static ULTRA_WIDE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ultra|wide|0\.5|uw|超广").expect("valid ultra-wide regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Environment,
    User,
}

impl Facing {
    pub fn toggled(self) -> Self {
        match self {
            Facing::Environment => Facing::User,
            Facing::User => Facing::Environment,
        }
    }

    /// 前置摄像头预览需要镜像
    pub fn is_mirrored(self) -> bool {
        self == Facing::User
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    /// 指定设备时忽略 facing
    pub device_id: Option<String>,
    pub facing: Option<Facing>,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub ideal_aspect_ratio: f64,
    pub continuous_focus: bool,
}

impl StreamRequest {
    pub fn for_facing(facing: Facing) -> Self {
        Self {
            device_id: None,
            facing: Some(facing),
            ..Self::base()
        }
    }

    pub fn for_device(device_id: &str) -> Self {
        Self {
            device_id: Some(device_id.to_string()),
            facing: None,
            ..Self::base()
        }
    }

    // 16:9 的较广画面，而不是方形
    fn base() -> Self {
        Self {
            device_id: None,
            facing: None,
            ideal_width: 1920,
            ideal_height: 1080,
            ideal_aspect_ratio: 16.0 / 9.0,
            continuous_focus: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackCapabilities {
    pub torch: bool,
    pub zoom: Option<ZoomRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackConstraints {
    pub torch: Option<bool>,
    pub zoom: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub device_id: String,
    pub label: String,
}

pub trait FrameSource: Send + Sync {
    /// 视频还没出帧时为 None
    fn latest_frame(&self) -> Option<Arc<Frame>>;
}

pub trait CameraSource: Send {
    fn open(&mut self, request: &StreamRequest) -> Result<Arc<dyn FrameSource>, AcquisitionError>;

    /// 停止所有轨道
    fn close(&mut self);

    fn capabilities(&self) -> TrackCapabilities;

    fn apply(&mut self, constraints: &TrackConstraints) -> Result<(), CameraError>;

    fn devices(&self) -> Vec<DeviceInfo>;

    fn current_device(&self) -> Option<String>;

    /// 轨道实际分辨率（不一定等于请求值）
    fn track_resolution(&self) -> Option<(u32, u32)>;

    /// 高分辨率拍照能力，不支持则为 None
    fn still_capture(&self) -> Option<Arc<dyn StillCapture>> {
        None
    }
}

/// 按标签挑选超广角；已经在用的设备不算
pub fn pick_ultra_wide<'a>(devices: &'a [DeviceInfo], current: Option<&str>) -> Option<&'a DeviceInfo> {
    devices
        .iter()
        .find(|d| ULTRA_WIDE_LABEL.is_match(&d.label))
        .filter(|d| Some(d.device_id.as_str()) != current)
}

/// 宿主不断写入、采样循环按需读取的最新帧
#[derive(Default)]
pub struct FrameSlot {
    latest: Mutex<Option<Arc<Frame>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, frame: Frame) {
        if let Ok(mut slot) = self.latest.lock() {
            *slot = Some(Arc::new(frame));
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.latest.lock() {
            *slot = None;
        }
    }
}

impl FrameSource for FrameSlot {
    fn latest_frame(&self) -> Option<Arc<Frame>> {
        self.latest.lock().ok().and_then(|slot| slot.clone())
    }
}

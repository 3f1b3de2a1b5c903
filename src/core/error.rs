use thiserror::Error;

/// 相机会话启动失败（对本次启动是致命的，需要提示用户）
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AcquisitionError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera available")]
    NoCamera,
    #[error("camera not supported on this platform: {0}")]
    Unsupported(String),
    #[error("camera stream failed: {0}")]
    Stream(String),
}

/// 单帧解码失败，只影响当前周期
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    #[error("detector unsupported: {0}")]
    Unsupported(String),
    #[error("detector rejected frame: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("still capture failed: {0}")]
    Still(String),
    #[error("ROI is empty")]
    EmptyRoi,
    #[error("invalid frame buffer {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },
    #[error("JPEG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{sink} failed: {message}")]
    Sink { sink: String, message: String },
    #[error("all export sinks failed: {}", .0.join("; "))]
    AllSinksFailed(Vec<String>),
}

/// 平台门禁：加载时即判定，不重试
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("HarmonyOS is not supported, only Android and iOS")]
    HarmonyOs,
    #[error("only Android and iOS are supported")]
    NotMobile,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] json5::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("torch not supported by the active track")]
    TorchUnsupported,
    #[error("no active stream")]
    NoStream,
    #[error("constraint rejected: {0}")]
    Constraint(String),
}

/// 控制器层的汇总错误
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("scanner is not running")]
    NotRunning,
    #[error("no capture available")]
    NoCapture,
}

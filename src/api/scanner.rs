//! 二维码扫描器 - 节流解码 + 尺寸门控 + 自动拍照

use std::sync::{Arc, Mutex, MutexGuard};

use flutter_rust_bridge::frb;
use base64::Engine as _;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::core::camera::{
    CameraSource, DeviceInfo, Facing, FrameSlot, FrameSource, StreamRequest, TrackCapabilities,
    TrackConstraints, ZoomRange,
};
use crate::core::capture::{CaptureKind, CapturedImage};
use crate::core::config::ScannerConfig;
use crate::core::error::{AcquisitionError, CameraError, PlatformError, ScanError};
use crate::core::export::{DirectorySink, ExportChain};
use crate::core::frame::{FrameInfo, RawFrame};
use crate::core::scheduler::ScanEvent;
use crate::core::session::PauseReason;
use crate::core::ScannerController;

/// 扫描器错误，FRB 友好的设计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanApiError {
    pub error_type: String,
    pub message: String,
}

impl ScanApiError {
    fn new(error_type: &str, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.to_string(),
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new("Internal", "扫描器状态异常")
    }
}

impl From<ScanError> for ScanApiError {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::Acquisition(AcquisitionError::PermissionDenied) => {
                Self::new("PermissionDenied", "未获得相机权限")
            }
            ScanError::Acquisition(AcquisitionError::NoCamera) => Self::new("NoCamera", "未找到可用相机"),
            ScanError::Acquisition(e @ AcquisitionError::Unsupported(_)) => {
                Self::new("CameraUnsupported", e.to_string())
            }
            ScanError::Acquisition(e @ AcquisitionError::Stream(_)) => Self::new("StreamFailed", e.to_string()),
            ScanError::Camera(CameraError::TorchUnsupported) => {
                Self::new("TorchUnsupported", "此设备/镜头不支持手电筒")
            }
            ScanError::Camera(e) => Self::new("Camera", e.to_string()),
            ScanError::Config(e) => Self::new("Config", e.to_string()),
            ScanError::Export(e) => Self::new("Export", e.to_string()),
            ScanError::Platform(e) => e.into(),
            ScanError::NotRunning => Self::new("NotRunning", "扫描器未启动"),
            ScanError::NoCapture => Self::new("NoCapture", "还没有可保存的照片"),
        }
    }
}

impl From<PlatformError> for ScanApiError {
    fn from(e: PlatformError) -> Self {
        match e {
            PlatformError::HarmonyOs => Self::new("HarmonyOs", "暂不支持鸿蒙系统，仅支持 Android 和 iOS"),
            PlatformError::NotMobile => Self::new("NotMobile", "仅支持 Android 和 iOS"),
        }
    }
}

impl std::fmt::Display for ScanApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.error_type, self.message)
    }
}

impl std::error::Error for ScanApiError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFacing {
    Back,
    Front,
}

impl From<ScanFacing> for Facing {
    fn from(f: ScanFacing) -> Self {
        match f {
            ScanFacing::Back => Facing::Environment,
            ScanFacing::Front => Facing::User,
        }
    }
}

impl From<Facing> for ScanFacing {
    fn from(f: Facing) -> Self {
        match f {
            Facing::Environment => ScanFacing::Back,
            Facing::User => ScanFacing::Front,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoKind {
    Full,
    Roi,
}

impl From<CaptureKind> for PhotoKind {
    fn from(k: CaptureKind) -> Self {
        match k {
            CaptureKind::Full => PhotoKind::Full,
            CaptureKind::Roi => PhotoKind::Roi,
        }
    }
}

impl From<PhotoKind> for CaptureKind {
    fn from(k: PhotoKind) -> Self {
        match k {
            PhotoKind::Full => CaptureKind::Full,
            PhotoKind::Roi => CaptureKind::Roi,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraDevice {
    pub device_id: String,
    pub label: String,
}

/// 需要 Dart 侧执行的相机操作
#[derive(Debug, Clone, PartialEq)]
pub enum CameraCommand {
    Open {
        device_id: Option<String>,
        facing: Option<ScanFacing>,
        ideal_width: u32,
        ideal_height: u32,
        ideal_aspect_ratio: f64,
        continuous_focus: bool,
        mirrored: bool,
    },
    Apply {
        torch: Option<bool>,
        zoom: Option<f64>,
    },
    Close,
}

/// 一次识别拍下的照片，`label` 用于界面标题
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPhoto {
    pub kind: PhotoKind,
    pub label: String,
    pub filename: String,
}

impl From<&CapturedImage> for CapturedPhoto {
    fn from(image: &CapturedImage) -> Self {
        Self {
            kind: image.kind.into(),
            label: image.kind.label().to_string(),
            filename: image.filename.clone(),
        }
    }
}

/// 推给 Dart 的扫描事件
#[derive(Debug, Clone, PartialEq)]
pub enum ScanUpdate {
    Status {
        line: String,
        tip: String,
        in_band: bool,
        ratio: Option<f64>,
        stable_count: u32,
    },
    /// `base64` 为 UTF-8 内容的标准 Base64
    Accepted {
        text: String,
        base64: String,
    },
    RevealStart,
    RevealEnd,
    /// 全景在前，ROI 在后；缺失的照片不出现
    Captured {
        photos: Vec<CapturedPhoto>,
    },
    Paused {
        reason: String,
    },
    Resumed {
        tip: String,
    },
    Stopped,
}

impl From<ScanEvent> for ScanUpdate {
    fn from(event: ScanEvent) -> Self {
        match event {
            ScanEvent::Cycle {
                status,
                tip,
                in_band,
                ratio,
                stable_count,
            } => ScanUpdate::Status {
                line: status,
                tip: tip.message().to_string(),
                in_band,
                ratio,
                stable_count,
            },
            ScanEvent::Accepted { text } => ScanUpdate::Accepted {
                base64: base64::engine::general_purpose::STANDARD.encode(text.as_bytes()),
                text,
            },
            ScanEvent::RevealStart => ScanUpdate::RevealStart,
            ScanEvent::RevealEnd => ScanUpdate::RevealEnd,
            ScanEvent::Captured(set) => ScanUpdate::Captured {
                photos: set.images().map(CapturedPhoto::from).collect(),
            },
            ScanEvent::Paused(reason) => ScanUpdate::Paused {
                reason: pause_label(reason).to_string(),
            },
            ScanEvent::Resumed { tip } => ScanUpdate::Resumed { tip },
            ScanEvent::Stopped => ScanUpdate::Stopped,
        }
    }
}

fn pause_label(reason: PauseReason) -> &'static str {
    match reason {
        PauseReason::Accepted => "accepted",
        PauseReason::Hidden => "hidden",
        PauseReason::SwitchingCamera => "switching",
        PauseReason::Stopped => "stopped",
    }
}

/// Dart 侧相机的镜像状态
#[derive(Default)]
struct HostCameraState {
    permission_denied: bool,
    capabilities: TrackCapabilities,
    devices: Vec<DeviceInfo>,
    current: Option<String>,
    resolution: Option<(u32, u32)>,
    commands: Vec<CameraCommand>,
}

/// 由 Dart 驱动的相机：打开/约束变成命令排队，帧通过 `submit_frame` 推进来
struct HostCamera {
    state: Arc<Mutex<HostCameraState>>,
    slot: Arc<FrameSlot>,
}

impl HostCamera {
    fn with_state<R>(&self, f: impl FnOnce(&mut HostCameraState) -> R) -> Option<R> {
        self.state.lock().ok().map(|mut s| f(&mut s))
    }
}

impl CameraSource for HostCamera {
    fn open(&mut self, request: &StreamRequest) -> Result<Arc<dyn FrameSource>, AcquisitionError> {
        let slot = self.slot.clone();
        self.with_state(|s| {
            if s.permission_denied {
                return Err(AcquisitionError::PermissionDenied);
            }
            // 指定了设备但宿主没有列出时，视为打不开
            if let Some(id) = &request.device_id {
                if !s.devices.iter().any(|d| &d.device_id == id) {
                    return Err(AcquisitionError::Stream(format!("unknown device {}", id)));
                }
                s.current = Some(id.clone());
            }
            s.commands.push(CameraCommand::Open {
                device_id: request.device_id.clone(),
                facing: request.facing.map(ScanFacing::from),
                ideal_width: request.ideal_width,
                ideal_height: request.ideal_height,
                ideal_aspect_ratio: request.ideal_aspect_ratio,
                continuous_focus: request.continuous_focus,
                mirrored: request.facing.map(|f| f.is_mirrored()).unwrap_or(false),
            });
            Ok(())
        })
        .unwrap_or(Err(AcquisitionError::Stream("camera state poisoned".into())))?;

        slot.clear();
        Ok(slot)
    }

    fn close(&mut self) {
        self.slot.clear();
        self.with_state(|s| {
            s.current = None;
            s.resolution = None;
            s.commands.push(CameraCommand::Close);
        });
    }

    fn capabilities(&self) -> TrackCapabilities {
        self.with_state(|s| s.capabilities).unwrap_or_default()
    }

    fn apply(&mut self, constraints: &TrackConstraints) -> Result<(), CameraError> {
        self.with_state(|s| {
            if constraints.torch == Some(true) && !s.capabilities.torch {
                return Err(CameraError::TorchUnsupported);
            }
            s.commands.push(CameraCommand::Apply {
                torch: constraints.torch,
                zoom: constraints.zoom,
            });
            Ok(())
        })
        .unwrap_or(Err(CameraError::NoStream))
    }

    fn devices(&self) -> Vec<DeviceInfo> {
        self.with_state(|s| s.devices.clone()).unwrap_or_default()
    }

    fn current_device(&self) -> Option<String> {
        self.with_state(|s| s.current.clone()).flatten()
    }

    fn track_resolution(&self) -> Option<(u32, u32)> {
        self.with_state(|s| s.resolution).flatten()
    }
}

/// 二维码扫描器
///
/// 相机由 Dart 持有：扫描器发出 [`CameraCommand`]，Dart 执行后把 YUV 帧推回来。
///
/// ```dart
/// final scanner = QrScanner.create();
/// scanner.reportDevices(devices: devices);
/// await scanner.start(facing: ScanFacing.back);
/// for (final cmd in scanner.takeCameraCommands()) { /* 打开相机 */ }
/// scanner.submitFrame(frame: yuv);
/// final updates = scanner.pollUpdates();
/// ```
#[frb(opaque)]
pub struct QrScanner {
    controller: Mutex<ScannerController>,
    camera: Arc<Mutex<HostCameraState>>,
    slot: Arc<FrameSlot>,
    last_frame: Mutex<Option<FrameInfo>>,
}

impl QrScanner {
    /// 创建扫描器，config_json 为可选的 JSON5 参数覆盖
    #[frb(sync)]
    pub fn create(config_json: Option<String>) -> Result<Self, ScanApiError> {
        crate::init_logging();
        let config = match config_json {
            Some(text) => ScannerConfig::from_json5(&text).map_err(ScanError::from)?,
            None => ScannerConfig::default(),
        };

        let camera = Arc::new(Mutex::new(HostCameraState::default()));
        let slot = Arc::new(FrameSlot::new());
        let host = HostCamera {
            state: camera.clone(),
            slot: slot.clone(),
        };

        info!("🔍 QrScanner: created ({:?})", config);
        Ok(Self {
            // 原生检测器在 Dart 侧无法同步调用，解码统一走 rqrr
            controller: Mutex::new(ScannerController::new(config, Box::new(host), None)),
            camera,
            slot,
            last_frame: Mutex::new(None),
        })
    }

    fn controller(&self) -> Result<MutexGuard<'_, ScannerController>, ScanApiError> {
        self.controller.lock().map_err(|_| ScanApiError::internal())
    }

    fn with_camera(&self, f: impl FnOnce(&mut HostCameraState)) {
        if let Ok(mut state) = self.camera.lock() {
            f(&mut state);
        }
    }

    /// 权限结果；拒绝后 start 直接报 PermissionDenied
    #[frb(sync)]
    pub fn report_permission(&self, granted: bool) {
        self.with_camera(|s| s.permission_denied = !granted);
    }

    /// 可用的视频输入设备（start 之前上报，才能挑选超广角）
    #[frb(sync)]
    pub fn report_devices(&self, devices: Vec<CameraDevice>) {
        self.with_camera(|s| {
            s.devices = devices
                .into_iter()
                .map(|d| DeviceInfo {
                    device_id: d.device_id,
                    label: d.label,
                })
                .collect();
        });
    }

    #[frb(sync)]
    pub fn report_capabilities(&self, torch: bool, zoom_min: Option<f64>, zoom_max: Option<f64>) {
        let zoom = match (zoom_min, zoom_max) {
            (Some(min), Some(max)) if min <= max => Some(ZoomRange { min, max }),
            _ => None,
        };
        self.with_camera(|s| s.capabilities = TrackCapabilities { torch, zoom });
    }

    /// 轨道实际生效的设备与分辨率
    #[frb(sync)]
    pub fn report_track(&self, device_id: Option<String>, width: u32, height: u32) {
        self.with_camera(|s| {
            if device_id.is_some() {
                s.current = device_id;
            }
            s.resolution = Some((width, height));
        });
    }

    /// 取走待执行的相机命令
    #[frb(sync)]
    pub fn take_camera_commands(&self) -> Vec<CameraCommand> {
        self.camera
            .lock()
            .map(|mut s| std::mem::take(&mut s.commands))
            .unwrap_or_default()
    }

    /// 启动扫描，返回所用解码器
    #[frb]
    pub fn start(&self, facing: ScanFacing) -> Result<String, ScanApiError> {
        let kind = self.controller()?.start_facing(facing.into())?;
        Ok(kind.label().to_string())
    }

    /// 推入最新的预览帧（YUV420）；格式不对时返回 false
    #[frb(sync)]
    pub fn submit_frame(&self, frame: RawFrame) -> bool {
        if !frame.is_well_formed() {
            warn!("⚠️ Dropping malformed frame {}x{}", frame.width, frame.height);
            return false;
        }
        let rgba = frame.to_rgba();
        if let Ok(mut last) = self.last_frame.lock() {
            *last = Some(FrameInfo::from_frame(&rgba));
        }
        self.slot.publish(rgba);
        true
    }

    #[frb]
    pub fn toggle_facing(&self) -> Result<ScanFacing, ScanApiError> {
        let mut controller = self.controller()?;
        controller.toggle_facing()?;
        Ok(controller.facing().into())
    }

    /// 切换手电筒，返回新的状态
    #[frb(sync)]
    pub fn toggle_torch(&self) -> Result<bool, ScanApiError> {
        let mut controller = self.controller()?;
        let on = !controller.torch_on();
        controller.set_torch(on)?;
        Ok(on)
    }

    #[frb(sync)]
    pub fn set_visible(&self, visible: bool) -> Result<(), ScanApiError> {
        self.controller()?.set_visible(visible);
        Ok(())
    }

    /// 继续扫描
    #[frb(sync)]
    pub fn resume(&self) -> Result<(), ScanApiError> {
        Ok(self.controller()?.resume()?)
    }

    #[frb]
    pub fn stop(&self) -> Result<(), ScanApiError> {
        self.controller()?.stop();
        Ok(())
    }

    #[frb(sync)]
    pub fn poll_updates(&self) -> Result<Vec<ScanUpdate>, ScanApiError> {
        let events = self.controller()?.poll_events();
        Ok(events.into_iter().map(ScanUpdate::from).collect())
    }

    /// 最近一次拍到的照片（JPEG）
    #[frb(sync)]
    pub fn photo(&self, kind: PhotoKind) -> Result<Option<Vec<u8>>, ScanApiError> {
        let controller = self.controller()?;
        Ok(controller
            .last_capture()
            .and_then(|set| set.get(kind.into()))
            .map(|img| img.jpeg_data.clone()))
    }

    /// 保存到目录，返回文件名
    #[frb]
    pub fn save_photo(&self, kind: PhotoKind, dir: String) -> Result<String, ScanApiError> {
        let controller = self.controller()?;
        let chain = ExportChain::new().with_sink(Box::new(DirectorySink::new(&dir)));
        controller.save_capture(kind.into(), &chain)?;
        let name = controller
            .last_capture()
            .and_then(|set| set.get(kind.into()))
            .map(|img| img.filename.clone())
            .unwrap_or_default();
        Ok(name)
    }

    #[frb(sync, getter)]
    pub fn decoder(&self) -> Option<String> {
        self.controller
            .lock()
            .ok()
            .and_then(|c| c.decoder_kind())
            .map(|k| k.label().to_string())
    }

    #[frb(sync, getter)]
    pub fn meta_line(&self) -> String {
        self.controller
            .lock()
            .map(|c| c.meta_line())
            .unwrap_or_default()
    }

    /// 当前生效的参数（JSON）
    #[frb(sync, getter)]
    pub fn config_json(&self) -> Result<String, ScanApiError> {
        let controller = self.controller()?;
        serde_json::to_string(controller.config())
            .map_err(|e| ScanApiError::new("Config", e.to_string()))
    }

    #[frb(sync, getter)]
    pub fn last_frame(&self) -> Option<FrameInfo> {
        self.last_frame.lock().ok().and_then(|f| *f)
    }
}

impl Drop for QrScanner {
    fn drop(&mut self) {
        info!("🗑️ QrScanner: released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capture::CaptureSet;
    use crate::core::gating::ready_hint;
    use std::thread;
    use std::time::{Duration, Instant};

    fn yuv_frame(width: u32, height: u32, luma: u8) -> RawFrame {
        let chroma = ((width / 2) * (height / 2)) as usize;
        RawFrame {
            width,
            height,
            y_plane: vec![luma; (width * height) as usize],
            u_plane: vec![128; chroma],
            v_plane: vec![128; chroma],
            timestamp_ms: 0,
            frame_number: 1,
        }
    }

    #[test]
    fn test_create_with_config_override() {
        let scanner = QrScanner::create(Some("{ stable_need: 3 }".into())).unwrap();
        let json: serde_json::Value = serde_json::from_str(&scanner.config_json().unwrap()).unwrap();
        assert_eq!(json["stable_need"], 3);
        assert_eq!(json["interval_ms"], 160);
        let err = QrScanner::create(Some("{ interval_ms: 0 }".into())).err().unwrap();
        assert_eq!(err.error_type, "Config");
        let err = QrScanner::create(Some("not json".into())).err().unwrap();
        assert_eq!(err.error_type, "Config");
    }

    #[test]
    fn test_permission_denied() {
        let scanner = QrScanner::create(None).unwrap();
        scanner.report_permission(false);
        let err = scanner.start(ScanFacing::Back).unwrap_err();
        assert_eq!(err.error_type, "PermissionDenied");
        assert_eq!(scanner.decoder(), None);
    }

    #[test]
    fn test_start_queues_camera_commands() {
        let scanner = QrScanner::create(None).unwrap();
        scanner.report_devices(vec![
            CameraDevice {
                device_id: "0".into(),
                label: "Back Camera".into(),
            },
            CameraDevice {
                device_id: "2".into(),
                label: "Back Ultra Wide Camera".into(),
            },
        ]);
        assert_eq!(scanner.start(ScanFacing::Back).unwrap(), "rqrr (compat)");

        let commands = scanner.take_camera_commands();
        let opens: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                CameraCommand::Open { device_id, .. } => Some(device_id.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(opens, vec![None, Some("2".to_string())]);
        assert!(commands.contains(&CameraCommand::Close));
        assert!(commands.contains(&CameraCommand::Apply {
            torch: Some(false),
            zoom: None
        }));
        assert!(scanner.take_camera_commands().is_empty());
    }

    #[test]
    fn test_front_camera_is_mirrored() {
        let scanner = QrScanner::create(None).unwrap();
        scanner.start(ScanFacing::Front).unwrap();
        let commands = scanner.take_camera_commands();
        assert!(commands.iter().any(|c| matches!(
            c,
            CameraCommand::Open {
                facing: Some(ScanFacing::Front),
                mirrored: true,
                ..
            }
        )));
        assert_eq!(scanner.toggle_facing().unwrap(), ScanFacing::Back);
    }

    #[test]
    fn test_torch_unsupported() {
        let scanner = QrScanner::create(None).unwrap();
        assert_eq!(scanner.toggle_torch().unwrap_err().error_type, "NotRunning");
        scanner.start(ScanFacing::Back).unwrap();
        assert_eq!(scanner.toggle_torch().unwrap_err().error_type, "TorchUnsupported");

        scanner.report_capabilities(true, None, None);
        assert!(scanner.toggle_torch().unwrap());
        assert!(!scanner.toggle_torch().unwrap());
    }

    #[test]
    fn test_submit_frame_and_status_updates() {
        let scanner = QrScanner::create(Some("{ interval_ms: 10 }".into())).unwrap();
        assert!(!scanner.submit_frame(RawFrame {
            y_plane: vec![],
            ..yuv_frame(64, 64, 0)
        }));

        scanner.start(ScanFacing::Back).unwrap();
        scanner.report_track(None, 640, 480);
        assert!(scanner.submit_frame(yuv_frame(640, 480, 200)));
        assert_eq!(scanner.last_frame().map(|f| f.width), Some(640));

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut status = None;
        while Instant::now() < deadline && status.is_none() {
            status = scanner.poll_updates().unwrap().into_iter().find_map(|u| match u {
                ScanUpdate::Status { tip, in_band, .. } => Some((tip, in_band)),
                _ => None,
            });
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(status, Some(("请将二维码置于小框内".to_string(), false)));
        assert!(scanner.meta_line().starts_with("video=640x480 • track=640x480"));

        assert_eq!(scanner.photo(PhotoKind::Full).unwrap(), None);
        let dir = tempfile::tempdir().unwrap();
        let err = scanner
            .save_photo(PhotoKind::Roi, dir.path().to_string_lossy().to_string())
            .unwrap_err();
        assert_eq!(err.error_type, "NoCapture");

        scanner.stop().unwrap();
        assert_eq!(scanner.resume().unwrap_err().error_type, "NotRunning");
    }

    #[test]
    fn test_accepted_update_carries_base64() {
        let update = ScanUpdate::from(ScanEvent::Accepted {
            text: "hello".into(),
        });
        assert_eq!(
            update,
            ScanUpdate::Accepted {
                text: "hello".into(),
                base64: "aGVsbG8=".into(),
            }
        );

        // 非 ASCII 按 UTF-8 字节编码
        match ScanUpdate::from(ScanEvent::Accepted { text: "扫码".into() }) {
            ScanUpdate::Accepted { base64, .. } => assert_eq!(base64, "5omr56CB"),
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[test]
    fn test_captured_update_lists_labelled_photos() {
        let image = |kind: CaptureKind, filename: &str| CapturedImage {
            kind,
            filename: filename.into(),
            jpeg_data: vec![0xFF, 0xD8],
        };
        let set = CaptureSet {
            full: Some(image(CaptureKind::Full, "scan_full_1.jpg")),
            roi: Some(image(CaptureKind::Roi, "scan_roi_1.jpg")),
        };
        let ScanUpdate::Captured { photos } = ScanUpdate::from(ScanEvent::Captured(set)) else {
            panic!("expected captured update");
        };
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].kind, PhotoKind::Full);
        assert_eq!(photos[0].label, "全景照片");
        assert_eq!(photos[1].label, "中心ROI");
        assert_eq!(photos[1].filename, "scan_roi_1.jpg");

        // 只有 ROI 时不补空位
        let set = CaptureSet {
            full: None,
            roi: Some(image(CaptureKind::Roi, "scan_roi_2.jpg")),
        };
        match ScanUpdate::from(ScanEvent::Captured(set)) {
            ScanUpdate::Captured { photos } => {
                assert_eq!(photos.len(), 1);
                assert_eq!(photos[0].kind, PhotoKind::Roi);
            }
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[test]
    fn test_resumed_update_carries_tip() {
        let update = ScanUpdate::from(ScanEvent::Resumed {
            tip: ready_hint(0.30),
        });
        match update {
            ScanUpdate::Resumed { tip } => assert!(tip.starts_with("把实物放入小框内")),
            other => panic!("unexpected update: {:?}", other),
        }
    }
}

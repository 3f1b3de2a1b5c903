//! 扫码控制器：相机生命周期 + 采样循环 + 照片
//!
//! 所有对外操作都从这里进入。启动前总是先停止旧会话，保证任何时刻只有一条循环在跑。

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use log::{info, warn};

use super::camera::{pick_ultra_wide, CameraSource, Facing, FrameSource, StreamRequest, TrackConstraints};
use super::capture::{CaptureKind, CaptureService, CaptureSet};
use super::config::ScannerConfig;
use super::decoder::{BarcodeDetector, Decoder, DecoderKind};
use super::error::{CameraError, ScanError};
use super::export::ExportChain;
use super::scheduler::{AcquisitionLoop, LoopContext, LoopHandle, ScanEvent};
use super::session::PauseReason;

pub struct ScannerController {
    config: ScannerConfig,
    camera: Box<dyn CameraSource>,
    native: Option<Arc<dyn BarcodeDetector>>,
    facing: Facing,
    torch_on: bool,
    source: Option<Arc<dyn FrameSource>>,
    running: Option<LoopHandle>,
    events_tx: Sender<ScanEvent>,
    events_rx: Receiver<ScanEvent>,
    last_capture: Option<CaptureSet>,
}

impl ScannerController {
    pub fn new(
        config: ScannerConfig,
        camera: Box<dyn CameraSource>,
        native: Option<Arc<dyn BarcodeDetector>>,
    ) -> Self {
        let (events_tx, events_rx) = channel();
        Self {
            config,
            camera,
            native,
            facing: Facing::default(),
            torch_on: false,
            source: None,
            running: None,
            events_tx,
            events_rx,
            last_capture: None,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn torch_on(&self) -> bool {
        self.torch_on
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn decoder_kind(&self) -> Option<DecoderKind> {
        self.running.as_ref().map(|h| h.decoder_kind())
    }

    pub fn last_capture(&self) -> Option<&CaptureSet> {
        self.last_capture.as_ref()
    }

    /// 按当前朝向启动；后置时优先切到超广角，否则把变焦拉到最小
    pub fn start(&mut self) -> Result<DecoderKind, ScanError> {
        let kind = self.start_stream(StreamRequest::for_facing(self.facing))?;
        if self.facing == Facing::Environment {
            return Ok(self.prefer_wide_view().unwrap_or(kind));
        }
        Ok(kind)
    }

    pub fn start_facing(&mut self, facing: Facing) -> Result<DecoderKind, ScanError> {
        self.facing = facing;
        self.start()
    }

    fn start_stream(&mut self, request: StreamRequest) -> Result<DecoderKind, ScanError> {
        self.stop();
        info!("📷 Opening camera {:?}", request);

        let source = self.camera.open(&request)?;
        let decoder = Decoder::select(
            self.native
                .as_ref()
                .map(|d| Box::new(d.clone()) as Box<dyn BarcodeDetector>),
        );
        let kind = decoder.kind();

        // 新会话手电筒一律关闭
        self.torch_on = false;
        let _ = self.camera.apply(&TrackConstraints {
            torch: Some(false),
            zoom: None,
        });

        let ctx = LoopContext {
            config: self.config.clone(),
            source: source.clone(),
            capture: CaptureService::new(self.config.jpeg_quality, self.camera.still_capture()),
            events: self.events_tx.clone(),
        };
        self.source = Some(source);
        self.running = Some(AcquisitionLoop::spawn(ctx, decoder));
        info!("🚀 Scanner started with {}", kind.label());
        Ok(kind)
    }

    /// 尽量扩大视野：先换超广角，再把当前轨道缩到最小变焦；失败不影响当前会话
    fn prefer_wide_view(&mut self) -> Option<DecoderKind> {
        let devices = self.camera.devices();
        let current = self.camera.current_device();
        let switched = match pick_ultra_wide(&devices, current.as_deref()) {
            Some(device) => {
                info!("🔭 Switching to ultra-wide: {}", device.label);
                match self.start_stream(StreamRequest::for_device(&device.device_id)) {
                    Ok(kind) => Some(kind),
                    Err(e) => {
                        warn!("⚠️ Ultra-wide failed ({}), reopening default camera", e);
                        return self.start_stream(StreamRequest::for_facing(self.facing)).ok();
                    }
                }
            }
            None => None,
        };

        // 超广角轨道同样可能支持 <1x 变焦
        if let Some(zoom) = self.camera.capabilities().zoom {
            if let Err(e) = self.camera.apply(&TrackConstraints {
                torch: None,
                zoom: Some(zoom.min),
            }) {
                warn!("⚠️ Min zoom rejected: {}", e);
            }
        }
        switched
    }

    /// 停止循环并释放相机；未运行时也可以调用
    pub fn stop(&mut self) {
        if let Some(mut handle) = self.running.take() {
            handle.stop();
            self.camera.close();
            info!("⏹️ Scanner stopped");
        }
        self.source = None;
        self.torch_on = false;
    }

    pub fn toggle_facing(&mut self) -> Result<DecoderKind, ScanError> {
        if let Some(handle) = &self.running {
            handle.pause(PauseReason::SwitchingCamera);
        }
        self.facing = self.facing.toggled();
        info!("🔄 Switching camera to {:?}", self.facing);
        self.start()
    }

    pub fn set_torch(&mut self, on: bool) -> Result<(), ScanError> {
        if self.running.is_none() {
            return Err(ScanError::NotRunning);
        }
        if !self.camera.capabilities().torch {
            return Err(CameraError::TorchUnsupported.into());
        }
        self.camera.apply(&TrackConstraints {
            torch: Some(on),
            zoom: None,
        })?;
        self.torch_on = on;
        Ok(())
    }

    pub fn set_visible(&mut self, visible: bool) {
        if let Some(handle) = &self.running {
            handle.set_visible(visible);
        }
    }

    /// 继续扫描（清空计数器），照片保留到下一次接受
    pub fn resume(&mut self) -> Result<(), ScanError> {
        let handle = self.running.as_ref().ok_or(ScanError::NotRunning)?;
        handle.resume();
        Ok(())
    }

    /// 取出所有待处理事件；照片顺手留一份用于保存
    pub fn poll_events(&mut self) -> Vec<ScanEvent> {
        let events: Vec<ScanEvent> = self.events_rx.try_iter().collect();
        for event in &events {
            if let ScanEvent::Captured(set) = event {
                self.last_capture = Some(set.clone());
            }
        }
        events
    }

    pub fn save_capture(&self, kind: CaptureKind, chain: &ExportChain) -> Result<String, ScanError> {
        let image = self
            .last_capture
            .as_ref()
            .and_then(|set| set.get(kind))
            .ok_or(ScanError::NoCapture)?;
        Ok(chain.export(&image.jpeg_data, &image.filename)?)
    }

    /// 调试信息行：视频尺寸、轨道设置、解码器
    pub fn meta_line(&self) -> String {
        let video = self
            .source
            .as_ref()
            .and_then(|s| s.latest_frame())
            .map(|f| format!("{}x{}", f.width, f.height))
            .unwrap_or_else(|| "-".to_string());
        let track = self
            .camera
            .track_resolution()
            .map(|(w, h)| format!("{}x{}", w, h))
            .unwrap_or_else(|| "-".to_string());
        let decoder = self.decoder_kind().map(|k| k.label()).unwrap_or("-");
        format!("video={} • track={} • decoder={}", video, track, decoder)
    }
}

impl Drop for ScannerController {
    fn drop(&mut self) {
        self.stop();
    }
}

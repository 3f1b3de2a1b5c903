//! 采样循环：节流、暂停/恢复、接受后拍照
//!
//! 独立线程运行。每个周期结束后等待 `interval` 再开始下一个周期（允许漂移，
//! 慢解码时自然背压）。控制命令只在周期之间生效；同一时刻最多一次解码。

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, info, warn};

use super::camera::FrameSource;
use super::capture::{time_stamp, CaptureService, CaptureSet};
use super::config::ScannerConfig;
use super::decoder::{DecodeOutcome, DecodeWorker, Decoder, DecoderKind, WorkerReply};
use super::gating::{ready_hint, Classification, Evaluation, Tip};
use super::session::{LoopState, PauseReason, ScanSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCommand {
    Pause(PauseReason),
    Resume,
    SetVisible(bool),
    Stop,
}

#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// 每个完成判定的周期都会发出
    Cycle {
        status: String,
        tip: Tip,
        in_band: bool,
        ratio: Option<f64>,
        stable_count: u32,
    },
    Accepted { text: String },
    /// 拍照窗口开始/结束（宿主做遮罩动画）
    RevealStart,
    RevealEnd,
    Captured(CaptureSet),
    Paused(PauseReason),
    /// 恢复扫描，附带初始引导语
    Resumed { tip: String },
    Stopped,
}

pub struct LoopContext {
    pub config: ScannerConfig,
    pub source: Arc<dyn FrameSource>,
    pub capture: CaptureService,
    pub events: Sender<ScanEvent>,
}

pub struct LoopHandle {
    control: Sender<LoopCommand>,
    handle: Option<JoinHandle<()>>,
    kind: DecoderKind,
}

impl LoopHandle {
    pub fn decoder_kind(&self) -> DecoderKind {
        self.kind
    }

    pub fn send(&self, command: LoopCommand) -> bool {
        self.control.send(command).is_ok()
    }

    pub fn pause(&self, reason: PauseReason) {
        self.send(LoopCommand::Pause(reason));
    }

    pub fn resume(&self) {
        self.send(LoopCommand::Resume);
    }

    pub fn set_visible(&self, visible: bool) {
        self.send(LoopCommand::SetVisible(visible));
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }

    /// 取消待执行的调度并等待循环退出
    pub fn stop(&mut self) {
        let _ = self.control.send(LoopCommand::Stop);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("⚠️ acquisition loop panicked");
            }
        }
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct AcquisitionLoop {
    ctx: LoopContext,
    session: ScanSession,
    worker: DecodeWorker,
    control: Receiver<LoopCommand>,
}

impl AcquisitionLoop {
    pub fn spawn(ctx: LoopContext, decoder: Decoder) -> LoopHandle {
        let kind = decoder.kind();
        let (control_tx, control_rx) = channel();

        let handle = thread::spawn(move || {
            let session = ScanSession::new(&ctx.config);
            let worker = DecodeWorker::spawn(decoder);
            let mut acquisition = AcquisitionLoop {
                ctx,
                session,
                worker,
                control: control_rx,
            };
            acquisition.run();
        });

        LoopHandle {
            control: control_tx,
            handle: Some(handle),
            kind,
        }
    }

    fn run(&mut self) {
        let interval = self.ctx.config.interval();
        info!("🎬 Acquisition loop started (interval {:?})", interval);
        let mut due = Instant::now() + interval;

        loop {
            let wait = due.saturating_duration_since(Instant::now());
            match self.control.recv_timeout(wait) {
                Ok(command) => {
                    if !self.apply(command, &mut due) {
                        break;
                    }
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if !self.cycle() {
                break;
            }
            due = Instant::now() + interval;
        }

        self.session.pause(PauseReason::Stopped);
        let _ = self.ctx.events.send(ScanEvent::Stopped);
        info!("🛑 Acquisition loop stopped after {} cycles", self.session.cycle_count());
    }

    /// 返回 false 表示退出循环
    fn apply(&mut self, command: LoopCommand, due: &mut Instant) -> bool {
        let was_paused = self.session.is_paused();
        match command {
            LoopCommand::Stop => return false,
            LoopCommand::Pause(reason) => self.session.pause(reason),
            LoopCommand::Resume => self.session.resume(),
            LoopCommand::SetVisible(visible) => self.session.set_visible(visible),
        }

        match (was_paused, self.session.state()) {
            (false, LoopState::Paused(reason)) => {
                let _ = self.ctx.events.send(ScanEvent::Paused(reason));
            }
            (true, LoopState::Running) => {
                *due = Instant::now() + self.ctx.config.interval();
                let _ = self.ctx.events.send(ScanEvent::Resumed {
                    tip: ready_hint(self.ctx.config.thresh),
                });
            }
            _ => {}
        }
        true
    }

    /// 周期间隙收到的命令；遇到 Stop 返回 false
    fn drain_commands(&mut self) -> bool {
        let mut due = Instant::now();
        loop {
            match self.control.try_recv() {
                Ok(command) => {
                    if !self.apply(command, &mut due) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn cycle(&mut self) -> bool {
        let Some(frame) = self.ctx.source.latest_frame() else {
            return true;
        };
        let Some(prepared) = self.session.prepare(&frame) else {
            return true;
        };

        let outcome = match self
            .worker
            .decode(prepared.buffer.clone(), self.ctx.config.decode_timeout())
        {
            WorkerReply::Ready(outcome) => outcome,
            WorkerReply::TimedOut => DecodeOutcome::Failed("decode timed out".into()),
            WorkerReply::Busy => {
                debug!("previous decode still running, skipping cycle");
                return true;
            }
        };

        // 解码期间到达的暂停/停止先生效，结果随之作废
        if !self.drain_commands() {
            return false;
        }

        let Some(evaluation) = self.session.complete(&prepared, &outcome) else {
            return true;
        };
        self.publish(&evaluation);

        if let Classification::Accept(text) = &evaluation.classification {
            info!("✅ Scan accepted ({} chars)", text.len());
            let _ = self.ctx.events.send(ScanEvent::Accepted { text: text.clone() });
            let _ = self.ctx.events.send(ScanEvent::RevealStart);
            let captures = self.ctx.capture.capture(&frame, &prepared.roi, &time_stamp());
            let _ = self.ctx.events.send(ScanEvent::Captured(captures));
            let _ = self.ctx.events.send(ScanEvent::RevealEnd);
            let _ = self.ctx.events.send(ScanEvent::Paused(PauseReason::Accepted));
        }
        true
    }

    fn publish(&self, evaluation: &Evaluation) {
        let _ = self.ctx.events.send(ScanEvent::Cycle {
            status: evaluation.status_line(self.ctx.config.thresh),
            tip: evaluation.classification.tip(),
            in_band: evaluation.in_band(),
            ratio: evaluation.ratio,
            stable_count: evaluation.stable_count,
        });
    }
}

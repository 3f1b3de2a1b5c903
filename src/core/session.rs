//! 扫码会话：显式持有计数器、暂停状态与最近一次的扫描框
//!
//! 一个周期分两步：`prepare` 投影并采样，`complete` 交给门控引擎。
//! 中间的解码可以同步做（`run_cycle`），也可以交给解码线程。

use log::{debug, info};

use super::config::ScannerConfig;
use super::decoder::{DecodeOutcome, Decoder};
use super::frame::Frame;
use super::gating::{Evaluation, GatingEngine, GatingState};
use super::roi::{Roi, RoiProjector, WorkingBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    Accepted,
    Hidden,
    SwitchingCamera,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused(PauseReason),
}

/// 已投影、已采样，等待解码的一个周期
#[derive(Debug, Clone)]
pub struct PreparedCycle {
    pub roi: Roi,
    pub target: u32,
    pub buffer: WorkingBuffer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// 暂停中或还没有有效帧，直接进入下一次调度
    Skipped,
    Evaluated(Evaluation),
}

pub struct ScanSession {
    projector: RoiProjector,
    gating: GatingEngine,
    state: LoopState,
    cycles: u64,
}

impl ScanSession {
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            projector: RoiProjector::new(config.roi_scale, config.min_target, config.sample),
            gating: GatingEngine::new(config.min_ok, config.thresh, config.stable_need),
            state: LoopState::Running,
            cycles: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, LoopState::Paused(_))
    }

    pub fn gating_state(&self) -> GatingState {
        GatingState {
            stable_count: self.gating.stable_count(),
            paused: self.is_paused(),
        }
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }

    pub fn pause(&mut self, reason: PauseReason) {
        if self.state != LoopState::Paused(reason) {
            debug!("⏸️ session paused: {:?}", reason);
        }
        self.state = LoopState::Paused(reason);
    }

    /// 恢复扫描；计数器清零。已在运行时不动计数器
    pub fn resume(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        info!("▶️ session resumed from {:?}", self.state);
        self.gating.reset();
        self.state = LoopState::Running;
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.resume();
        } else {
            self.pause(PauseReason::Hidden);
        }
    }

    pub fn prepare(&mut self, frame: &Frame) -> Option<PreparedCycle> {
        if self.is_paused() || !frame.is_valid() {
            return None;
        }
        let roi = self.projector.project(frame.width, frame.height);
        let target = self.projector.target_side(roi.sw);
        let buffer = self.projector.resample(frame, &roi, target);
        Some(PreparedCycle {
            roi,
            target,
            buffer,
        })
    }

    /// 门控判定；接受后立即暂停
    pub fn complete(&mut self, prepared: &PreparedCycle, outcome: &DecodeOutcome) -> Option<Evaluation> {
        // 解码期间被暂停（切换相机、切后台）时丢弃结果
        if self.is_paused() {
            return None;
        }
        self.cycles += 1;
        let evaluation = self
            .gating
            .evaluate(outcome, prepared.roi.roi_side, prepared.target);
        if evaluation.classification.is_accept() {
            self.pause(PauseReason::Accepted);
        }
        Some(evaluation)
    }

    pub fn run_cycle(&mut self, frame: &Frame, decoder: &Decoder) -> CycleOutcome {
        let Some(prepared) = self.prepare(frame) else {
            return CycleOutcome::Skipped;
        };
        let outcome = decoder.decode(&prepared.buffer);
        match self.complete(&prepared, &outcome) {
            Some(evaluation) => CycleOutcome::Evaluated(evaluation),
            None => CycleOutcome::Skipped,
        }
    }
}

//! 解码线程：保证同一时刻最多一次解码在进行，并支持单次超时
//!
//! 超时后该次解码视为失败；在它真正返回之前，后续周期不会再提交新的解码，
//! 迟到的结果直接丢弃。

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use crate::core::roi::WorkingBuffer;

use super::{DecodeOutcome, Decoder, DecoderKind};

struct DecodeJob {
    id: u64,
    buffer: WorkingBuffer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerReply {
    Ready(DecodeOutcome),
    TimedOut,
    /// 上一次超时的解码还没返回
    Busy,
}

pub struct DecodeWorker {
    jobs: Option<Sender<DecodeJob>>,
    replies: Receiver<(u64, DecodeOutcome)>,
    pending: Option<u64>,
    next_id: u64,
    kind: DecoderKind,
    handle: Option<JoinHandle<()>>,
}

impl DecodeWorker {
    pub fn spawn(decoder: Decoder) -> Self {
        let kind = decoder.kind();
        let (job_tx, job_rx) = channel::<DecodeJob>();
        let (reply_tx, reply_rx) = channel();

        let handle = thread::spawn(move || {
            while let Ok(job) = job_rx.recv() {
                let outcome = decoder.decode(&job.buffer);
                if reply_tx.send((job.id, outcome)).is_err() {
                    break;
                }
            }
            debug!("decode worker exiting");
        });

        info!("🧵 Decode worker started ({})", kind.label());
        Self {
            jobs: Some(job_tx),
            replies: reply_rx,
            pending: None,
            next_id: 0,
            kind,
            handle: Some(handle),
        }
    }

    pub fn kind(&self) -> DecoderKind {
        self.kind
    }

    /// 回收已超时任务的迟到结果，仍未返回则为 true
    pub fn is_busy(&mut self) -> bool {
        let Some(stale) = self.pending else {
            return false;
        };
        loop {
            match self.replies.try_recv() {
                Ok((id, _late)) if id == stale => {
                    debug!("discarding late decode result #{}", id);
                    self.pending = None;
                    return false;
                }
                Ok(_) => continue,
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => {
                    self.pending = None;
                    return false;
                }
            }
        }
    }

    pub fn decode(&mut self, buffer: WorkingBuffer, timeout: Option<Duration>) -> WorkerReply {
        if self.is_busy() {
            return WorkerReply::Busy;
        }

        let id = self.next_id;
        self.next_id += 1;

        let sent = self
            .jobs
            .as_ref()
            .map(|tx| tx.send(DecodeJob { id, buffer }).is_ok())
            .unwrap_or(false);
        if !sent {
            return WorkerReply::Ready(DecodeOutcome::Failed("decode worker stopped".into()));
        }
        self.pending = Some(id);

        let reply = match timeout {
            Some(limit) => self.replies.recv_timeout(limit),
            None => self.replies.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match reply {
            Ok((reply_id, outcome)) => {
                debug_assert_eq!(reply_id, id);
                self.pending = None;
                WorkerReply::Ready(outcome)
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("⏱️ Decode #{} exceeded {:?}", id, timeout);
                WorkerReply::TimedOut
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.pending = None;
                WorkerReply::Ready(DecodeOutcome::Failed("decode worker stopped".into()))
            }
        }
    }
}

impl Drop for DecodeWorker {
    fn drop(&mut self) {
        self.jobs.take();
        // 卡住的解码不等待，线程在其返回后自行退出
        if self.pending.is_none() {
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

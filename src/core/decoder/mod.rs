//! 解码引擎抽象
//!
//! 两个可互换的实现：宿主的原生检测器，以及纯软件的 rqrr。
//! 每次相机（重新）启动时选择一次，整个会话内不再切换。

pub mod native;
pub mod software;
pub mod worker;

use log::{info, warn};

use crate::core::geometry::Geometry;
use crate::core::roi::WorkingBuffer;

pub use native::{BarcodeDetector, DetectedBarcode, MockBarcodeDetector, NativeDecoder};
pub use software::SoftwareDecoder;
pub use worker::{DecodeWorker, WorkerReply};

/// 解码结果（工作缓冲区坐标）
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeResult {
    pub text: Option<String>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    Found(DecodeResult),
    NotFound,
    /// 本周期解码抛错/超时，不影响后续周期
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    Supported,
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderKind {
    Native,
    Software,
}

impl DecoderKind {
    pub fn label(&self) -> &'static str {
        match self {
            DecoderKind::Native => "BarcodeDetector (native)",
            DecoderKind::Software => "rqrr (compat)",
        }
    }
}

pub enum Decoder {
    Native(NativeDecoder),
    Software(SoftwareDecoder),
}

impl Decoder {
    /// 有原生检测器就先探测一次，失败则本次会话固定使用软件解码
    pub fn select(native: Option<Box<dyn BarcodeDetector>>) -> Decoder {
        let Some(detector) = native else {
            info!("🔧 No native detector offered, using software decoder");
            return Decoder::Software(SoftwareDecoder::new());
        };

        let candidate = NativeDecoder::new(detector);
        match Self::probe(&candidate) {
            ProbeResult::Supported => {
                info!("✅ Native detector probe ok");
                Decoder::Native(candidate)
            }
            ProbeResult::Unsupported(reason) => {
                warn!("⚠️ Native detector probe failed ({}), falling back to software", reason);
                Decoder::Software(SoftwareDecoder::new())
            }
        }
    }

    pub fn probe(candidate: &NativeDecoder) -> ProbeResult {
        match candidate.probe() {
            Ok(()) => ProbeResult::Supported,
            Err(e) => ProbeResult::Unsupported(e.to_string()),
        }
    }

    pub fn kind(&self) -> DecoderKind {
        match self {
            Decoder::Native(_) => DecoderKind::Native,
            Decoder::Software(_) => DecoderKind::Software,
        }
    }

    pub fn decode(&self, buffer: &WorkingBuffer) -> DecodeOutcome {
        match self {
            Decoder::Native(d) => d.decode(buffer),
            Decoder::Software(d) => d.decode(buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DecodeError;

    #[test]
    fn test_select_without_native_is_software() {
        assert_eq!(Decoder::select(None).kind(), DecoderKind::Software);
    }

    #[test]
    fn test_select_native_when_check_succeeds() {
        let detector = MockBarcodeDetector::with_pattern(|_| Ok(vec![]));
        let decoder = Decoder::select(Some(Box::new(detector)));
        assert_eq!(decoder.kind(), DecoderKind::Native);
    }

    #[test]
    fn test_select_falls_back_when_check_rejects() {
        let detector = MockBarcodeDetector::always_failing("no BarcodeDetector");
        let decoder = Decoder::select(Some(Box::new(detector)));
        assert_eq!(decoder.kind(), DecoderKind::Software);
    }

    #[test]
    fn test_only_first_call_fails() {
        // 探测失败后即使检测器之后恢复，也不会再切回原生
        let detector = MockBarcodeDetector::with_pattern(|n| {
            if n == 0 {
                Err(DecodeError::Rejected("probe".into()))
            } else {
                Ok(vec![])
            }
        });
        let decoder = Decoder::select(Some(Box::new(detector)));
        assert_eq!(decoder.kind(), DecoderKind::Software);
    }

    #[test]
    fn test_native_decode_through_enum() {
        let detector = MockBarcodeDetector::with_fixed_square("hello", 100.0);
        let decoder = Decoder::select(Some(Box::new(detector)));
        match decoder.decode(&WorkingBuffer::blank()) {
            DecodeOutcome::Found(result) => {
                assert_eq!(result.text.as_deref(), Some("hello"));
                assert_eq!(result.geometry.and_then(|g| g.box_size()), Some(100.0));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}

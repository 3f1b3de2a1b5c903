pub mod camera;
pub mod capture;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod error;
pub mod export;
pub mod frame;
pub mod gating;
pub mod geometry;
pub mod platform;
pub mod roi;
pub mod scheduler;
pub mod session;

pub use camera::{CameraSource, DeviceInfo, Facing, FrameSlot, FrameSource, StreamRequest};
pub use capture::{CaptureKind, CaptureService, CaptureSet, CapturedImage, StillCapture};
pub use config::ScannerConfig;
pub use controller::ScannerController;
pub use decoder::{BarcodeDetector, DecodeOutcome, Decoder, DecoderKind};
pub use error::ScanError;
pub use export::{DirectorySink, ExportChain, ExportSink};
pub use frame::{Frame, RawFrame};
pub use gating::{Classification, Evaluation, GatingEngine, Tip};
pub use scheduler::{LoopCommand, ScanEvent};
pub use session::{PauseReason, ScanSession};

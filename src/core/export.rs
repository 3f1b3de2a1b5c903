//! 照片导出：分享 → 保存对话框 → 普通下载，依次降级
//!
//! 全部失败才报错，内存中的图片仍然可以查看。

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use super::error::ExportError;

pub trait ExportSink: Send + Sync {
    fn name(&self) -> &str;

    /// 交出数据即可，不等待用户操作
    fn export(&self, data: &[u8], filename: &str) -> Result<(), ExportError>;
}

pub struct ExportChain {
    sinks: Vec<Box<dyn ExportSink>>,
}

impl ExportChain {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// 按调用顺序作为优先级
    pub fn with_sink(mut self, sink: Box<dyn ExportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// 返回成功的 sink 名称
    pub fn export(&self, data: &[u8], filename: &str) -> Result<String, ExportError> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            match sink.export(data, filename) {
                Ok(()) => {
                    info!("💾 Exported {} via {}", filename, sink.name());
                    return Ok(sink.name().to_string());
                }
                Err(e) => {
                    warn!("⚠️ Export via {} failed: {}", sink.name(), e);
                    failures.push(format!("{}: {}", sink.name(), e));
                }
            }
        }
        Err(ExportError::AllSinksFailed(failures))
    }
}

impl Default for ExportChain {
    fn default() -> Self {
        Self::new()
    }
}

/// 直接写入目录（“普通下载”）
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectorySink {
    fn name(&self) -> &str {
        "download"
    }

    fn export(&self, data: &[u8], filename: &str) -> Result<(), ExportError> {
        if filename.contains(['/', '\\']) || filename.is_empty() {
            return Err(ExportError::Sink {
                sink: self.name().to_string(),
                message: format!("invalid file name {:?}", filename),
            });
        }
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(filename), data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FailingSink {
        name: &'static str,
        calls: Arc<AtomicU32>,
    }

    impl ExportSink for FailingSink {
        fn name(&self) -> &str {
            self.name
        }

        fn export(&self, _data: &[u8], _filename: &str) -> Result<(), ExportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ExportError::Sink {
                sink: self.name.to_string(),
                message: "cancelled".into(),
            })
        }
    }

    #[test]
    fn test_falls_through_to_download() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicU32::new(0));
        let chain = ExportChain::new()
            .with_sink(Box::new(FailingSink {
                name: "share",
                calls: calls.clone(),
            }))
            .with_sink(Box::new(FailingSink {
                name: "save-dialog",
                calls: calls.clone(),
            }))
            .with_sink(Box::new(DirectorySink::new(dir.path())));

        let used = chain.export(b"jpeg", "scan_full_x.jpg").unwrap();
        assert_eq!(used, "download");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(fs::read(dir.path().join("scan_full_x.jpg")).unwrap(), b"jpeg");
    }

    #[test]
    fn test_first_success_stops_chain() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicU32::new(0));
        let chain = ExportChain::new()
            .with_sink(Box::new(DirectorySink::new(dir.path())))
            .with_sink(Box::new(FailingSink {
                name: "share",
                calls: calls.clone(),
            }));
        chain.export(b"x", "a.jpg").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_failed_reports_each_sink() {
        let calls = Arc::new(AtomicU32::new(0));
        let chain = ExportChain::new()
            .with_sink(Box::new(FailingSink {
                name: "share",
                calls: calls.clone(),
            }))
            .with_sink(Box::new(FailingSink {
                name: "save-dialog",
                calls,
            }));
        match chain.export(b"x", "a.jpg") {
            Err(ExportError::AllSinksFailed(reasons)) => assert_eq!(reasons.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            ExportChain::new().export(b"x", "a.jpg"),
            Err(ExportError::AllSinksFailed(_))
        ));
    }

    #[test]
    fn test_directory_sink_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        assert!(sink.export(b"x", "../evil.jpg").is_err());
        assert!(sink.export(b"x", "").is_err());
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// 扫码门控参数
///
/// 默认值即线上参数；宿主可以传 JSON5 字符串覆盖部分字段：
///
/// ```ignore
/// let config = ScannerConfig::from_json5("{ interval_ms: 200, stable_need: 3 }")?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 解码节流（毫秒），从上一周期结束开始计时
    pub interval_ms: u64,
    /// 工作缓冲区边长上限
    pub sample: u32,
    /// 工作缓冲区边长下限
    pub min_target: u32,
    /// 触发门槛：二维码边长 / 扫描框边长 < thresh
    pub thresh: f64,
    /// 太小（< min_ok）不稳定
    pub min_ok: f64,
    /// 连续合格帧数
    pub stable_need: u32,
    /// 扫描框边长 = min(宽, 高) × roi_scale
    pub roi_scale: f64,
    /// 单次解码超时，None 表示不限
    pub decode_timeout_ms: Option<u64>,
    /// 照片 JPEG 质量
    pub jpeg_quality: u8,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 160,
            sample: 960,
            min_target: 320,
            thresh: 0.30,
            min_ok: 0.06,
            stable_need: 2,
            roi_scale: 0.46,
            decode_timeout_ms: Some(1500),
            jpeg_quality: 92,
        }
    }
}

impl ScannerConfig {
    pub fn from_json5(text: &str) -> Result<Self, ConfigError> {
        let config: ScannerConfig = json5::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::Invalid("interval_ms must be > 0".into()));
        }
        if self.stable_need == 0 {
            return Err(ConfigError::Invalid("stable_need must be > 0".into()));
        }
        if !(self.roi_scale > 0.0 && self.roi_scale <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "roi_scale {} outside (0, 1]",
                self.roi_scale
            )));
        }
        if !(self.min_ok >= 0.0 && self.min_ok < self.thresh) {
            return Err(ConfigError::Invalid(format!(
                "min_ok {} must be in [0, thresh {})",
                self.min_ok, self.thresh
            )));
        }
        if self.min_target == 0 || self.min_target > self.sample {
            return Err(ConfigError::Invalid(format!(
                "min_target {} must be in 1..=sample {}",
                self.min_target, self.sample
            )));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(ConfigError::Invalid("jpeg_quality must be 1..=100".into()));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn decode_timeout(&self) -> Option<Duration> {
        self.decode_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let config = ScannerConfig::default();
        assert_eq!(config.interval_ms, 160);
        assert_eq!(config.sample, 960);
        assert_eq!(config.min_target, 320);
        assert_eq!(config.thresh, 0.30);
        assert_eq!(config.min_ok, 0.06);
        assert_eq!(config.stable_need, 2);
        assert_eq!(config.roi_scale, 0.46);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json5_partial_override() {
        let config = ScannerConfig::from_json5("{ interval_ms: 200, stable_need: 3, }")
            .expect("应该能解析 JSON5");
        assert_eq!(config.interval_ms, 200);
        assert_eq!(config.stable_need, 3);
        assert_eq!(config.sample, 960);
    }

    #[test]
    fn test_json5_disable_timeout() {
        let config = ScannerConfig::from_json5("{ decode_timeout_ms: null }").unwrap();
        assert!(config.decode_timeout().is_none());
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let result = ScannerConfig::from_json5("{ min_ok: 0.5, thresh: 0.3 }");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = ScannerConfig::from_json5("{ stable_need: 0 }");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = ScannerConfig::from_json5("{ roi_scale: 1.5 }");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json5_is_parse_error() {
        let result = ScannerConfig::from_json5("{ interval_ms: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}

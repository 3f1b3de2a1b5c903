//! 平台门禁

use crate::api::scanner::ScanApiError;
use crate::core::platform::{check_user_agent, MobileOs};

/// 根据 UA 判断是否支持扫码，返回 "android" / "ios"
///
/// # 示例
/// ```ignore
/// let os = check_platform("Mozilla/5.0 (Linux; Android 14; Pixel 8)".into())?;
/// assert_eq!(os, "android");
/// ```
#[flutter_rust_bridge::frb(sync)]
pub fn check_platform(user_agent: String) -> Result<String, ScanApiError> {
    let os = check_user_agent(&user_agent)?;
    Ok(match os {
        MobileOs::Android => "android",
        MobileOs::Ios => "ios",
    }
    .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_platform() {
        assert_eq!(
            check_platform("Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X)".into()).unwrap(),
            "ios"
        );
        let err = check_platform("Mozilla/5.0 (Linux; Android 12; HarmonyOS)".into()).unwrap_err();
        assert_eq!(err.error_type, "HarmonyOs");
        assert_eq!(err.message, "暂不支持鸿蒙系统，仅支持 Android 和 iOS");
        let err = check_platform("Mozilla/5.0 (Windows NT 10.0; Win64; x64)".into()).unwrap_err();
        assert_eq!(err.error_type, "NotMobile");
    }
}

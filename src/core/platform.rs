use once_cell::sync::Lazy;
use regex::Regex;

use super::error::PlatformError;

static ANDROID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Android").expect("valid regex"));
static IOS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)iPhone|iPad|iPod").expect("valid regex"));
static HARMONY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)HarmonyOS|OpenHarmony").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobileOs {
    Android,
    Ios,
}

/// 加载时的系统门禁：鸿蒙明确拒绝，其余非 Android/iOS 也拒绝
///
/// 鸿蒙的 UA 往往同时带 Android 字样，所以先判断鸿蒙。
pub fn check_user_agent(user_agent: &str) -> Result<MobileOs, PlatformError> {
    if HARMONY.is_match(user_agent) {
        return Err(PlatformError::HarmonyOs);
    }
    if ANDROID.is_match(user_agent) {
        return Ok(MobileOs::Android);
    }
    if IOS.is_match(user_agent) {
        return Ok(MobileOs::Ios);
    }
    Err(PlatformError::NotMobile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_android_allowed() {
        let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/125.0 Mobile";
        assert_eq!(check_user_agent(ua), Ok(MobileOs::Android));
    }

    #[test]
    fn test_ios_allowed() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15";
        assert_eq!(check_user_agent(ua), Ok(MobileOs::Ios));
        assert_eq!(check_user_agent("Mozilla/5.0 (iPad; CPU OS 16_0)"), Ok(MobileOs::Ios));
    }

    #[test]
    fn test_harmony_rejected_even_with_android_token() {
        let ua = "Mozilla/5.0 (Linux; Android 12; HarmonyOS; NOH-AN00) AppleWebKit/537.36";
        assert_eq!(check_user_agent(ua), Err(PlatformError::HarmonyOs));
        assert_eq!(check_user_agent("OpenHarmony 4.0"), Err(PlatformError::HarmonyOs));
    }

    #[test]
    fn test_desktop_rejected() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/125.0.0.0 Safari/537.36";
        assert_eq!(check_user_agent(ua), Err(PlatformError::NotMobile));
        assert_eq!(check_user_agent(""), Err(PlatformError::NotMobile));
    }
}

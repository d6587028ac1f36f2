//! SSID / 密码的引号规范化。
//!
//! 原生层（wpa_supplicant 的 `set_network`）期望 SSID 和 PSK 以带双引号的字面量传入，
//! 所以进入 bridge 的这些值都要包上一对 `"`。

use crate::traits::WifiConfig;

/// Wraps a value in a pair of double quotes.
///
/// Absent input is treated as the empty string. Surrounding whitespace is
/// trimmed, and a quote is added only on the side that lacks one, so an
/// already-quoted value comes back unchanged. Embedded quotes are not escaped.
pub fn format_wifi_string(value: Option<&str>) -> String {
    // 与脚本侧 trim 一致，BOM (U+FEFF) 也算空白
    let trimmed = value
        .unwrap_or("")
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

    let mut out = String::with_capacity(trimmed.len() + 2);
    if !trimmed.starts_with('"') {
        out.push('"');
    }
    out.push_str(trimmed);
    // 开头和结尾的引号必须是两个不同的字符
    if out.len() < 2 || !out.ends_with('"') {
        out.push('"');
    }
    out
}

/// Builds a [`WifiConfig`] ready for `add_network`.
pub fn format_wifi_config(
    ssid: Option<&str>,
    password: Option<&str>,
    algorithm: Option<&str>,
) -> WifiConfig {
    WifiConfig {
        ssid: Some(format_wifi_string(ssid)),
        password: Some(format_wifi_string(password)),
        auth_alg: algorithm.map(str::to_string),
    }
}

/// 去掉一对外层引号（nmcli 等需要原始字符串的后端使用）
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_plain_values_after_trimming() {
        assert_eq!(format_wifi_string(Some("home")), "\"home\"");
        assert_eq!(format_wifi_string(Some("  my net \t")), "\"my net\"");
    }

    #[test]
    fn byte_order_marks_are_trimmed() {
        assert_eq!(format_wifi_string(Some("\u{feff}home\u{feff}")), "\"home\"");
        assert_eq!(format_wifi_string(Some(" \u{feff} ")), "\"\"");
    }

    #[test]
    fn absent_and_empty_become_empty_quotes() {
        assert_eq!(format_wifi_string(None), "\"\"");
        assert_eq!(format_wifi_string(Some("")), "\"\"");
        assert_eq!(format_wifi_string(Some("   ")), "\"\"");
        assert_eq!(format_wifi_string(Some("\"")), "\"\"");
    }

    #[test]
    fn only_missing_side_is_added() {
        assert_eq!(format_wifi_string(Some("\"home")), "\"home\"");
        assert_eq!(format_wifi_string(Some("home\"")), "\"home\"");
    }

    #[test]
    fn idempotent_on_quoted_values() {
        for s in ["home", "\"cafe guest\"", "", "  x  ", "a b c"] {
            let once = format_wifi_string(Some(s));
            assert_eq!(format_wifi_string(Some(&once)), once);
        }
    }

    #[test]
    fn embedded_quotes_are_left_alone() {
        assert_eq!(format_wifi_string(Some("say \"hi\" now")), "\"say \"hi\" now\"");
    }

    #[test]
    fn config_quotes_ssid_and_password_only() {
        let cfg = format_wifi_config(Some("home"), Some("secret"), Some("WPA"));
        assert_eq!(cfg.ssid.as_deref(), Some("\"home\""));
        assert_eq!(cfg.password.as_deref(), Some("\"secret\""));
        assert_eq!(cfg.auth_alg.as_deref(), Some("WPA"));

        let open = format_wifi_config(Some("cafe"), None, None);
        assert_eq!(open.password.as_deref(), Some("\"\""));
        assert_eq!(open.auth_alg, None);
    }

    #[test]
    fn unquote_strips_one_pair() {
        assert_eq!(unquote("\"home\""), "home");
        assert_eq!(unquote("\"\""), "");
        assert_eq!(unquote("home"), "home");
        assert_eq!(unquote("\"half"), "\"half");
    }
}

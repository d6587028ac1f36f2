use crate::traits::ConfiguredNetwork;
use crate::{Error, Result};
use serde_json::Value;
use tokio::process::Command;

/// 运行一个外部命令并返回 stdout。非零退出码视为失败。
pub(crate) async fn run_command(program: &str, args: &[&str]) -> Result<String> {
    tracing::debug!(program, ?args, "Running command");
    let output = Command::new(program).args(args).output().await?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandFailed(format!(
            "{} {} failed: {}",
            program,
            args.join(" "),
            error_msg.trim()
        )));
    }

    Ok(String::from_utf8(output.stdout)?)
}

/// 添加网络时使用的密钥管理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyMgmt {
    WpaPsk,
    Open,
}

/// 在动到原生层之前校验认证算法。WPA/WPA2 且密码为空时按开放网络处理。
pub(crate) fn key_mgmt(auth_alg: &str, password: &str) -> Result<KeyMgmt> {
    let open = crate::format::unquote(password).is_empty();
    match auth_alg.to_ascii_uppercase().as_str() {
        "WPA" | "WPA2" if !open => Ok(KeyMgmt::WpaPsk),
        "WPA" | "WPA2" | "NONE" | "OPEN" => Ok(KeyMgmt::Open),
        other => Err(Error::Unsupported(format!("authentication algorithm {}", other))),
    }
}

/// 把已配置网络列表转换成交给成功回调的负载：带引号的 SSID 数组
pub(crate) fn networks_payload(networks: &[ConfiguredNetwork]) -> Value {
    Value::Array(
        networks
            .iter()
            .map(|n| Value::String(crate::format_wifi_string(Some(&n.ssid))))
            .collect(),
    )
}

/// 将 wpa_supplicant 输出中的 `\xHH` 转义序列反转义回原始字节。
/// 主要用于处理 SSID 字段中的汉字等非 ASCII 字符。
pub fn unescape_wpa_ssid(s: &str) -> Vec<u8> {
    fn hex_val(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(10 + b - b'a'),
            b'A'..=b'F' => Some(10 + b - b'A'),
            _ => None,
        }
    }

    let bs = s.as_bytes();
    let mut out = Vec::with_capacity(bs.len());
    let mut i = 0;
    while i < bs.len() {
        if bs[i] != b'\\' || i + 1 >= bs.len() {
            out.push(bs[i]);
            i += 1;
            continue;
        }

        match bs[i + 1] {
            b'x' | b'X' if i + 3 < bs.len() => {
                if let (Some(h), Some(l)) = (hex_val(bs[i + 2]), hex_val(bs[i + 3])) {
                    out.push((h << 4) | l);
                    i += 4;
                } else {
                    // 格式不正确，按字面量保留反斜杠
                    out.push(b'\\');
                    i += 1;
                }
            }
            b'\\' => {
                out.push(b'\\');
                i += 2;
            }
            b'"' => {
                out.push(b'"');
                i += 2;
            }
            _ => {
                out.push(b'\\');
                i += 1;
            }
        }
    }

    out
}

/// 解析 `wpa_cli list_networks` 的输出
/// 格式: network id / ssid / bssid / flags
pub fn parse_list_networks(output: &str) -> Vec<ConfiguredNetwork> {
    let mut networks = Vec::new();
    for line in output.lines().skip(1) {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 2 {
            continue;
        }

        let Ok(id) = parts[0].trim().parse::<u32>() else {
            continue;
        };
        let ssid = String::from_utf8_lossy(&unescape_wpa_ssid(parts[1])).to_string();
        let flags = parts.get(3).copied().unwrap_or("");

        networks.push(ConfiguredNetwork {
            id,
            ssid,
            current: flags.contains("[CURRENT]"),
            disabled: flags.contains("[DISABLED]"),
        });
    }
    networks
}

/// 解析 `nmcli -t -f NAME,TYPE,DEVICE connection show` 的输出，只保留 WiFi 连接。
/// nmcli 的 terse 模式用 `\:` 转义字段中的冒号。
pub fn parse_nmcli_connections(output: &str) -> Vec<ConfiguredNetwork> {
    let mut networks = Vec::new();
    for (idx, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_terse(line);
        let name = fields.first().cloned().unwrap_or_default();
        let kind = fields.get(1).map(String::as_str).unwrap_or("");
        if name.is_empty() || kind != "802-11-wireless" {
            continue;
        }
        let device = fields.get(2).map(String::as_str).unwrap_or("");

        networks.push(ConfiguredNetwork {
            id: idx as u32,
            ssid: name,
            current: !device.is_empty() && device != "--",
            disabled: false,
        });
    }
    networks
}

fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescapes_hex_sequences() {
        let raw = r"\xe4\xb8\xad\xe6\x96\x87-WiFi";
        assert_eq!(String::from_utf8(unescape_wpa_ssid(raw)).unwrap(), "中文-WiFi");
        assert_eq!(unescape_wpa_ssid(r"a\\b"), b"a\\b".to_vec());
        assert_eq!(unescape_wpa_ssid(r"bad\xZZ"), b"bad\\xZZ".to_vec());
        assert_eq!(unescape_wpa_ssid("tail\\"), b"tail\\".to_vec());
    }

    #[test]
    fn parses_wpa_cli_list_networks() {
        let output = "network id / ssid / bssid / flags\n\
                      0\thome\tany\t[CURRENT]\n\
                      1\tcafe guest\tany\t[DISABLED]\n\
                      2\toffice\tany\t\n\
                      garbage line\n";
        let networks = parse_list_networks(output);
        assert_eq!(networks.len(), 3);
        assert_eq!(networks[0].ssid, "home");
        assert!(networks[0].current);
        assert!(networks[1].disabled);
        assert_eq!(networks[2].id, 2);
        assert!(!networks[2].current && !networks[2].disabled);
    }

    #[test]
    fn parses_nmcli_wifi_connections_only() {
        let output = "home:802-11-wireless:wlan0\n\
                      Wired connection 1:802-3-ethernet:eth0\n\
                      a\\:b:802-11-wireless:--\n\
                      \n";
        let networks = parse_nmcli_connections(output);
        assert_eq!(networks.len(), 2);
        assert_eq!(networks[0].ssid, "home");
        assert!(networks[0].current);
        assert_eq!(networks[1].ssid, "a:b");
        assert!(!networks[1].current);
    }

    #[test]
    fn key_mgmt_follows_algorithm_and_password() {
        assert_eq!(key_mgmt("WPA", "\"pw\"").unwrap(), KeyMgmt::WpaPsk);
        assert_eq!(key_mgmt("wpa2", "pw").unwrap(), KeyMgmt::WpaPsk);
        assert_eq!(key_mgmt("WPA", "\"\"").unwrap(), KeyMgmt::Open);
        assert_eq!(key_mgmt("NONE", "\"pw\"").unwrap(), KeyMgmt::Open);
        assert_eq!(key_mgmt("open", "").unwrap(), KeyMgmt::Open);
        assert!(matches!(key_mgmt("WEP", "\"pw\""), Err(Error::Unsupported(_))));
    }

    #[test]
    fn payload_is_quoted_ssids() {
        let networks = parse_list_networks("header\n0\thome\tany\t\n");
        assert_eq!(networks_payload(&networks), serde_json::json!(["\"home\""]));
    }
}

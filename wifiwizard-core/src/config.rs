use crate::Result;
use serde::Deserialize;

/// 内置的默认配置（编译时嵌入）
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../configs/wifiwizard.toml");

/// 可选的 bridge 实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeKind {
    Mock,
    WpaCli,
    Nmcli,
}

/// 顶层应用配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WizardConfig {
    pub bridge: BridgeKind,

    /// 无线网卡名称
    #[serde(default = "default_interface")]
    pub interface: String,

    /// 增删网络后是否持久化到 wpa_supplicant.conf（仅 wpa_cli）
    #[serde(default = "default_save_config")]
    pub save_config: bool,
}

fn default_interface() -> String {
    "wlan0".to_string()
}

fn default_save_config() -> bool {
    true
}

pub fn load_config_from_toml_str(s: &str) -> Result<WizardConfig> {
    let config: WizardConfig = toml::from_str(s)?;
    Ok(config)
}

pub fn default_config() -> Result<WizardConfig> {
    load_config_from_toml_str(DEFAULT_CONFIG_TOML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg = load_config_from_toml_str(
            r#"
            bridge = "nmcli"
            interface = "wlp2s0"
            save_config = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bridge, BridgeKind::Nmcli);
        assert_eq!(cfg.interface, "wlp2s0");
        assert!(!cfg.save_config);
    }

    #[test]
    fn fills_defaults() {
        let cfg = load_config_from_toml_str(r#"bridge = "wpa_cli""#).unwrap();
        assert_eq!(cfg.bridge, BridgeKind::WpaCli);
        assert_eq!(cfg.interface, "wlan0");
        assert!(cfg.save_config);
    }

    #[test]
    fn rejects_unknown_bridge() {
        let err = load_config_from_toml_str(r#"bridge = "bluetooth""#).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn built_in_default_is_valid() {
        assert!(default_config().is_ok());
    }
}

// Bridge：通过 wpa_cli 命令行驱动 wpa_supplicant。
// wpa_supplicant 的 set_network 要求 SSID/PSK 以带引号的字面量传入，
// 所以 facade 送来的引号值可以原样转交。

use crate::bridges::utils::{key_mgmt, networks_payload, parse_list_networks, run_command, KeyMgmt};
use crate::format::unquote;
use crate::traits::{check_call, Action, Bridge, ConfiguredNetwork};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct WpaCliBridge {
    iface: String,
    save_config: bool,
}

impl WpaCliBridge {
    pub fn new(iface: impl Into<String>, save_config: bool) -> Self {
        Self {
            iface: iface.into(),
            save_config,
        }
    }

    /// 执行 `wpa_cli -i <iface> ...`；wpa_cli 即使命令失败也返回 0，
    /// 所以还要检查输出中的 FAIL。
    async fn wpa_cli(&self, args: &[&str]) -> Result<String> {
        let mut full = vec!["-i", self.iface.as_str()];
        full.extend_from_slice(args);
        let stdout = run_command("wpa_cli", &full).await?;
        if stdout.trim() == "FAIL" {
            return Err(Error::CommandFailed(format!("wpa_cli {} returned FAIL", args.join(" "))));
        }
        Ok(stdout)
    }

    async fn save(&self) -> Result<()> {
        if self.save_config {
            self.wpa_cli(&["save_config"]).await?;
        }
        Ok(())
    }

    async fn configured(&self) -> Result<Vec<ConfiguredNetwork>> {
        let stdout = self.wpa_cli(&["list_networks"]).await?;
        Ok(parse_list_networks(&stdout))
    }

    /// 按（带引号的）SSID 查找已配置的网络
    async fn lookup(&self, ssid: &str) -> Result<Option<ConfiguredNetwork>> {
        let raw = unquote(ssid);
        Ok(self.configured().await?.into_iter().find(|n| n.ssid == raw))
    }

    async fn find(&self, ssid: &str) -> Result<ConfiguredNetwork> {
        self.lookup(ssid)
            .await?
            .ok_or_else(|| Error::NetworkNotFound(ssid.to_string()))
    }

    async fn add(&self, ssid: &str, password: &str, auth_alg: &str) -> Result<Value> {
        // 先校验，再修改 wpa_supplicant
        let mgmt = key_mgmt(auth_alg, password)?;

        if let Some(existing) = self.lookup(ssid).await? {
            tracing::info!(ssid = %ssid, net_id = existing.id, "📡 [WpaCli] Network already configured");
            return Ok(Value::from(existing.id));
        }

        let net_id_str = self.wpa_cli(&["add_network"]).await?;
        let net_id: u32 = net_id_str.trim().parse().map_err(|_| {
            Error::CommandFailed(format!(
                "Failed to parse network ID from wpa_cli: {}",
                net_id_str.trim()
            ))
        })?;
        let id = net_id.to_string();
        tracing::debug!(net_id, "Configuring network...");

        for cmd in add_commands(&id, ssid, password, mgmt) {
            let argv: Vec<&str> = cmd.iter().map(String::as_str).collect();
            if let Err(e) = self.wpa_cli(&argv).await {
                // 清理半成品网络
                if let Err(cleanup) = self.wpa_cli(&["remove_network", id.as_str()]).await {
                    tracing::warn!(net_id, "Failed to remove half-configured network: {}", cleanup);
                }
                return Err(e);
            }
        }

        self.save().await?;
        tracing::info!(ssid = %ssid, net_id, "📡 [WpaCli] Network added");
        Ok(Value::from(net_id))
    }

    async fn remove(&self, ssid: &str) -> Result<Value> {
        let network = self.find(ssid).await?;
        let id = network.id.to_string();
        self.wpa_cli(&["remove_network", id.as_str()]).await?;
        self.save().await?;
        tracing::info!(ssid = %ssid, "📡 [WpaCli] Network removed");
        Ok(Value::String(format!("Network {} removed", ssid)))
    }

    async fn connect(&self, ssid: &str) -> Result<Value> {
        let network = self.find(ssid).await?;
        // select_network 会启用目标网络并禁用其余网络
        let id = network.id.to_string();
        self.wpa_cli(&["select_network", id.as_str()]).await?;
        tracing::info!(ssid = %ssid, "📡 [WpaCli] Connecting...");
        Ok(Value::String(format!("Network {} connected", ssid)))
    }

    async fn disconnect(&self, ssid: &str) -> Result<Value> {
        let network = self.find(ssid).await?;
        let id = network.id.to_string();
        self.wpa_cli(&["disable_network", id.as_str()]).await?;
        self.wpa_cli(&["disconnect"]).await?;
        tracing::info!(ssid = %ssid, "📡 [WpaCli] Disconnected");
        Ok(Value::String(format!("Network {} disconnected", ssid)))
    }
}

/// `add_network` 之后要执行的 wpa_cli 命令序列
fn add_commands(id: &str, ssid: &str, password: &str, mgmt: KeyMgmt) -> Vec<Vec<String>> {
    let set = |key: &str, value: String| {
        vec!["set_network".to_string(), id.to_string(), key.to_string(), value]
    };

    // 调用方通常已经加过引号，这里保证一次
    let mut cmds = vec![set("ssid", crate::format_wifi_string(Some(ssid)))];
    match mgmt {
        KeyMgmt::WpaPsk => {
            cmds.push(set("key_mgmt", "WPA-PSK".to_string()));
            cmds.push(set("psk", crate::format_wifi_string(Some(password))));
        }
        KeyMgmt::Open => cmds.push(set("key_mgmt", "NONE".to_string())),
    }
    cmds.push(vec!["enable_network".to_string(), id.to_string()]);
    cmds
}

#[async_trait]
impl Bridge for WpaCliBridge {
    async fn exec(&self, service: &str, action: Action, args: Vec<String>) -> Result<Value> {
        check_call(service, action, &args)?;
        match action {
            Action::AddNetwork => self.add(&args[0], &args[1], &args[2]).await,
            Action::RemoveNetwork => self.remove(&args[0]).await,
            Action::ConnectNetwork => self.connect(&args[0]).await,
            Action::DisconnectNetwork => self.disconnect(&args[0]).await,
            Action::ListNetworks => Ok(networks_payload(&self.configured().await?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SERVICE_NAME;

    #[tokio::test]
    async fn wrong_arity_is_rejected_before_running_wpa_cli() {
        let bridge = WpaCliBridge::new("wlan-test0", false);
        let err = bridge
            .exec(SERVICE_NAME, Action::ConnectNetwork, vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArguments { expected: 1, got: 0, .. }));
    }

    #[tokio::test]
    async fn unsupported_algorithm_is_rejected_before_running_wpa_cli() {
        // 接口不存在：只要调用了 wpa_cli 就会得到 Io / CommandFailed
        let bridge = WpaCliBridge::new("wlan-test0", false);
        let err = bridge
            .exec(
                SERVICE_NAME,
                Action::AddNetwork,
                vec!["\"x\"".into(), "\"pw\"".into(), "WEP".into()],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(ref m) if m.contains("WEP")));
    }

    fn argv(cmds: &[Vec<String>]) -> Vec<String> {
        cmds.iter().map(|c| c.join(" ")).collect()
    }

    #[test]
    fn wpa_network_sets_psk() {
        let cmds = add_commands("3", "\"home\"", "\"secret\"", KeyMgmt::WpaPsk);
        assert_eq!(
            argv(&cmds),
            vec![
                "set_network 3 ssid \"home\"",
                "set_network 3 key_mgmt WPA-PSK",
                "set_network 3 psk \"secret\"",
                "enable_network 3",
            ]
        );
    }

    #[test]
    fn open_network_uses_key_mgmt_none() {
        let cmds = add_commands("0", "cafe", "", KeyMgmt::Open);
        assert_eq!(
            argv(&cmds),
            vec![
                "set_network 0 ssid \"cafe\"",
                "set_network 0 key_mgmt NONE",
                "enable_network 0",
            ]
        );
    }

    #[test]
    fn empty_wpa_password_is_treated_as_open() {
        let mgmt = key_mgmt("WPA", "\"\"").unwrap();
        let cmds = add_commands("1", "\"guest\"", "\"\"", mgmt);
        assert!(argv(&cmds).contains(&"set_network 1 key_mgmt NONE".to_string()));
        assert!(!argv(&cmds).iter().any(|c| c.contains(" psk ")));
    }
}

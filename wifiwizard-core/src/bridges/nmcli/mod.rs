use crate::bridges::utils::{key_mgmt, networks_payload, parse_nmcli_connections, run_command, KeyMgmt};
use crate::format::unquote;
use crate::traits::{check_call, Action, Bridge};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

// 通过调用nmcli命令行工具实现的 bridge，适用于使用NetworkManager管理网络连接的Linux系统。
// nmcli 需要原始字符串，所以先去掉 facade 加上的引号。

#[derive(Debug, Clone)]
pub struct NmcliBridge {
    iface: String,
}

impl NmcliBridge {
    pub fn new(iface: impl Into<String>) -> Self {
        Self { iface: iface.into() }
    }

    async fn add(&self, ssid: &str, password: &str, auth_alg: &str) -> Result<Value> {
        // 先校验，再调用 nmcli
        let mgmt = key_mgmt(auth_alg, password)?;
        let raw = unquote(ssid);

        if self.configured().await?.iter().any(|n| n.ssid == raw) {
            tracing::info!(ssid = raw, "📡 [Nmcli] Network already configured");
            return Ok(Value::String(format!("Network \"{}\" already configured", raw)));
        }

        let args = add_args(&self.iface, ssid, password, mgmt);
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = run_command("nmcli", &argv).await?;
        tracing::info!(ssid = raw, "📡 [Nmcli] Network added: {}", output.trim());
        Ok(Value::String(format!("Network \"{}\" added", raw)))
    }

    async fn connection(&self, verb: &str, ssid: &str) -> Result<()> {
        let raw = unquote(ssid);
        let known = self.configured().await?.iter().any(|n| n.ssid == raw);
        if !known {
            return Err(Error::NetworkNotFound(ssid.to_string()));
        }
        run_command("nmcli", &["connection", verb, "id", raw]).await?;
        tracing::info!(ssid = raw, verb, "📡 [Nmcli] Connection updated");
        Ok(())
    }

    async fn configured(&self) -> Result<Vec<crate::traits::ConfiguredNetwork>> {
        let output = run_command("nmcli", &["-t", "-f", "NAME,TYPE,DEVICE", "connection", "show"]).await?;
        Ok(parse_nmcli_connections(&output))
    }
}

/// `nmcli connection add` 的参数；只有加密网络才带 wifi-sec.*
fn add_args(iface: &str, ssid: &str, password: &str, mgmt: KeyMgmt) -> Vec<String> {
    let ssid = unquote(ssid);
    let mut args: Vec<String> = [
        "connection", "add", "type", "wifi", "ifname", iface, "con-name", ssid, "ssid", ssid,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if mgmt == KeyMgmt::WpaPsk {
        for s in ["wifi-sec.key-mgmt", "wpa-psk", "wifi-sec.psk", unquote(password)] {
            args.push(s.to_string());
        }
    }
    args
}

#[async_trait]
impl Bridge for NmcliBridge {
    async fn exec(&self, service: &str, action: Action, args: Vec<String>) -> Result<Value> {
        check_call(service, action, &args)?;
        match action {
            Action::AddNetwork => self.add(&args[0], &args[1], &args[2]).await,
            Action::RemoveNetwork => {
                self.connection("delete", &args[0]).await?;
                Ok(Value::String(format!("Network {} removed", args[0])))
            }
            Action::ConnectNetwork => {
                self.connection("up", &args[0]).await?;
                Ok(Value::String(format!("Network {} connected", args[0])))
            }
            Action::DisconnectNetwork => {
                self.connection("down", &args[0]).await?;
                Ok(Value::String(format!("Network {} disconnected", args[0])))
            }
            Action::ListNetworks => Ok(networks_payload(&self.configured().await?)),
        }
    }
}

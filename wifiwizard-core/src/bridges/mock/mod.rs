use crate::bridges::utils::{key_mgmt, networks_payload, KeyMgmt};
use crate::format::unquote;
use crate::traits::{check_call, Action, Bridge, ConfiguredNetwork};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

/// 一次被记录下来的 bridge 调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeCall {
    pub service: String,
    pub action: Action,
    pub args: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    networks: Vec<ConfiguredNetwork>,
    next_id: u32,
}

/// A mock bridge for testing purposes.
/// It keeps configured networks in memory and records every call it receives.
#[derive(Debug, Default)]
pub struct MockBridge {
    state: Mutex<MockState>,
    calls: Mutex<Vec<BridgeCall>>,
}

impl MockBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回到目前为止收到的所有调用
    pub async fn calls(&self) -> Vec<BridgeCall> {
        self.calls.lock().await.clone()
    }

    async fn add(&self, ssid: &str, password: &str, auth_alg: &str) -> Result<Value> {
        let open = key_mgmt(auth_alg, password)? == KeyMgmt::Open;
        let ssid = unquote(ssid).to_string();
        let mut state = self.state.lock().await;
        if let Some(existing) = state.networks.iter().find(|n| n.ssid == ssid) {
            tracing::info!("🤖 [MockBridge] Network '{}' already configured.", ssid);
            return Ok(Value::from(existing.id));
        }

        let id = state.next_id;
        state.next_id += 1;
        tracing::info!(
            "🤖 [MockBridge] Adding network '{}' ({})",
            ssid,
            if open { "open" } else { "secured" }
        );
        state.networks.push(ConfiguredNetwork {
            id,
            ssid,
            current: false,
            disabled: false,
        });
        Ok(Value::from(id))
    }

    async fn remove(&self, ssid: &str) -> Result<Value> {
        let raw = unquote(ssid);
        let mut state = self.state.lock().await;
        let before = state.networks.len();
        state.networks.retain(|n| n.ssid != raw);
        if state.networks.len() == before {
            return Err(Error::NetworkNotFound(ssid.to_string()));
        }
        tracing::info!("🤖 [MockBridge] Removed network '{}'", raw);
        Ok(Value::String(format!("Network {} removed", ssid)))
    }

    async fn connect(&self, ssid: &str) -> Result<Value> {
        let raw = unquote(ssid);
        let mut state = self.state.lock().await;
        if !state.networks.iter().any(|n| n.ssid == raw) {
            return Err(Error::NetworkNotFound(ssid.to_string()));
        }

        // 模拟某个特定网络连接失败，便于测试错误路径
        if raw == "xfinitywifi" {
            tracing::info!("🤖 [MockBridge] Connection failed to '{}'", raw);
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionAborted,
                "Simulated connection failure",
            )));
        }

        for n in state.networks.iter_mut() {
            n.current = n.ssid == raw;
            n.disabled = n.ssid != raw;
        }
        tracing::info!("🤖 [MockBridge] Connection successful to '{}'", raw);
        Ok(Value::String(format!("Network {} connected", ssid)))
    }

    async fn disconnect(&self, ssid: &str) -> Result<Value> {
        let raw = unquote(ssid);
        let mut state = self.state.lock().await;
        let network = state
            .networks
            .iter_mut()
            .find(|n| n.ssid == raw)
            .ok_or_else(|| Error::NetworkNotFound(ssid.to_string()))?;
        network.current = false;
        network.disabled = true;
        tracing::info!("🤖 [MockBridge] Disconnected from '{}'", raw);
        Ok(Value::String(format!("Network {} disconnected", ssid)))
    }
}

#[async_trait]
impl Bridge for MockBridge {
    async fn exec(&self, service: &str, action: Action, args: Vec<String>) -> Result<Value> {
        self.calls.lock().await.push(BridgeCall {
            service: service.to_string(),
            action,
            args: args.clone(),
        });
        check_call(service, action, &args)?;

        match action {
            Action::AddNetwork => self.add(&args[0], &args[1], &args[2]).await,
            Action::RemoveNetwork => self.remove(&args[0]).await,
            Action::ConnectNetwork => self.connect(&args[0]).await,
            Action::DisconnectNetwork => self.disconnect(&args[0]).await,
            Action::ListNetworks => {
                let state = self.state.lock().await;
                tracing::info!("🤖 [MockBridge] Found {} networks.", state.networks.len());
                Ok(networks_payload(&state.networks))
            }
        }
    }
}

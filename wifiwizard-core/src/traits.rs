use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// 在这里定义 facade 与 bridge 之间共享的数据结构和 trait。

/// 所有 bridge 调用使用的固定服务名
pub const SERVICE_NAME: &str = "WifiWizard";

/// The set of actions a bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    AddNetwork,
    RemoveNetwork,
    ConnectNetwork,
    DisconnectNetwork,
    ListNetworks,
}

impl Action {
    /// 与原生层约定的动作名
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AddNetwork => "addNetwork",
            Action::RemoveNetwork => "removeNetwork",
            Action::ConnectNetwork => "connectNetwork",
            Action::DisconnectNetwork => "disconnectNetwork",
            Action::ListNetworks => "listNetworks",
        }
    }

    /// 每个动作期望的位置参数个数
    pub fn arity(&self) -> usize {
        match self {
            Action::AddNetwork => 3,
            Action::RemoveNetwork | Action::ConnectNetwork | Action::DisconnectNetwork => 1,
            Action::ListNetworks => 0,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network configuration record handed to `addNetwork`.
///
/// Every field is optional here; the facade checks the required ones
/// (`SSID`, `AuthAlg`) before anything reaches a bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiConfig {
    #[serde(rename = "SSID", default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(rename = "Password", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "AuthAlg", default, skip_serializing_if = "Option::is_none")]
    pub auth_alg: Option<String>,
}

/// 原生层中一个已配置（已保存）的网络
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredNetwork {
    pub id: u32,
    pub ssid: String, // 不带引号的原始 SSID
    pub current: bool,
    pub disabled: bool,
}

/// Bridge 接口：把一次调用转交给原生 WiFi 层。
#[async_trait]
pub trait Bridge: Send + Sync {
    /// Executes a single action.
    ///
    /// # Arguments
    /// * `service` - Always [`SERVICE_NAME`] when called by the facade.
    /// * `action` - The action to perform.
    /// * `args` - Positional string arguments, see [`Action::arity`].
    ///
    /// # Returns
    /// The payload for the caller's success handler, or the error for its
    /// failure handler.
    async fn exec(&self, service: &str, action: Action, args: Vec<String>) -> crate::Result<Value>;
}

/// Shared argument check used by every bridge.
pub(crate) fn check_call(service: &str, action: Action, args: &[String]) -> crate::Result<()> {
    if service != SERVICE_NAME {
        return Err(crate::Error::UnknownService(service.to_string()));
    }
    if args.len() != action.arity() {
        return Err(crate::Error::InvalidArguments {
            action,
            expected: action.arity(),
            got: args.len(),
        });
    }
    Ok(())
}

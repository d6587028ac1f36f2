//! WifiWizard facade.
//!
//! 每个操作要么在本地校验失败后立即返回（只记录日志），要么向 bridge 发出
//! 恰好一次调用后立即返回；结果稍后通过回调送达，且两个回调中只会调用一个。

use crate::traits::{Action, Bridge, SERVICE_NAME, WifiConfig};
use crate::{Error, Result};
use serde_json::Value;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Stateless front end over a [`Bridge`].
///
/// The facade keeps nothing between calls besides the bridge itself and the
/// runtime used to run bridge requests in the background.
pub struct WifiWizard<B: Bridge + ?Sized> {
    bridge: Arc<B>,
    runtime: Handle,
}

impl<B: Bridge + ?Sized> Clone for WifiWizard<B> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

impl<B: Bridge + ?Sized + 'static> WifiWizard<B> {
    /// Creates a facade that dispatches on the current tokio runtime.
    pub fn new(bridge: Arc<B>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self::with_handle(bridge, runtime))
    }

    pub fn with_handle(bridge: Arc<B>, runtime: Handle) -> Self {
        Self { bridge, runtime }
    }

    /// Adds a network to the list of configured networks.
    ///
    /// Only WPA authentication is documented as supported by the native
    /// layer; the facade itself passes `AuthAlg` through untouched.
    ///
    /// Returns `false` without calling the bridge when `SSID` or `AuthAlg` is
    /// missing or empty. A missing `Password` is sent as `""` (open network).
    pub fn add_network<S, F>(&self, wifi: &WifiConfig, on_success: S, on_failure: F) -> bool
    where
        S: FnOnce(Value) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        match network_information(wifi) {
            Ok(args) => {
                self.dispatch(Action::AddNetwork, args, on_success, on_failure);
                true
            }
            Err(e) => {
                tracing::warn!("WifiWizard: {}.", e);
                false
            }
        }
    }

    /// Removes a network from the list of configured networks.
    pub fn remove_network<S, F>(&self, ssid: Option<&str>, on_success: S, on_failure: F)
    where
        S: FnOnce(Value) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        self.dispatch_ssid(Action::RemoveNetwork, ssid, on_success, on_failure);
    }

    /// Connects a configured network.
    pub fn connect_network<S, F>(&self, ssid: Option<&str>, on_success: S, on_failure: F)
    where
        S: FnOnce(Value) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        self.dispatch_ssid(Action::ConnectNetwork, ssid, on_success, on_failure);
    }

    /// Disconnects a configured network.
    pub fn disconnect_network<S, F>(&self, ssid: Option<&str>, on_success: S, on_failure: F)
    where
        S: FnOnce(Value) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        self.dispatch_ssid(Action::DisconnectNetwork, ssid, on_success, on_failure);
    }

    /// Hands the list of configured networks to `on_success`.
    ///
    /// Without a success handler there is nowhere to deliver the list, so the
    /// call is logged and dropped before reaching the bridge.
    pub fn list_networks<S, F>(&self, on_success: Option<S>, on_failure: F) -> bool
    where
        S: FnOnce(Value) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        let Some(on_success) = on_success else {
            tracing::warn!("WifiWizard: {}.", Error::MissingSuccessHandler);
            return false;
        };
        self.dispatch(Action::ListNetworks, Vec::new(), on_success, on_failure);
        true
    }

    fn dispatch_ssid<S, F>(&self, action: Action, ssid: Option<&str>, on_success: S, on_failure: F)
    where
        S: FnOnce(Value) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        let args = vec![crate::format_wifi_string(ssid)];
        self.dispatch(action, args, on_success, on_failure);
    }

    /// 发出一次 bridge 调用，在后台任务中等待结果并调用对应回调
    fn dispatch<S, F>(&self, action: Action, args: Vec<String>, on_success: S, on_failure: F)
    where
        S: FnOnce(Value) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        tracing::debug!(%action, ?args, "Dispatching bridge call");
        let bridge = self.bridge.clone();
        self.runtime.spawn(async move {
            match bridge.exec(SERVICE_NAME, action, args).await {
                Ok(payload) => on_success(payload),
                Err(e) => {
                    tracing::debug!(%action, "Bridge call failed: {}", e);
                    on_failure(e)
                }
            }
        });
    }
}

/// 构建 addNetwork 的位置参数 `[SSID, Password, AuthAlg]`
fn network_information(wifi: &WifiConfig) -> Result<Vec<String>> {
    let ssid = match wifi.ssid.as_deref() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => return Err(Error::MissingSsid),
    };

    let password = match wifi.password.as_deref() {
        Some(p) => p.to_string(),
        None => {
            // 没有密码时按开放网络处理
            tracing::info!("WifiWizard: No password given.");
            String::new()
        }
    };

    let auth_alg = match wifi.auth_alg.as_deref() {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => return Err(Error::MissingAuthAlg),
    };

    Ok(vec![ssid, password, auth_alg])
}

use crate::bridges::{mock::MockBridge, nmcli::NmcliBridge, wpa_cli::WpaCliBridge};
use crate::config::{BridgeKind, WizardConfig};
use crate::traits::Bridge;
use std::sync::Arc;

/// 根据配置创建 bridge 实例
pub fn create_bridge(config: &WizardConfig) -> Arc<dyn Bridge> {
    match config.bridge {
        BridgeKind::Mock => {
            tracing::info!("🤖 Bridge: Mock selected (for local development)");
            Arc::new(MockBridge::new())
        }
        BridgeKind::WpaCli => {
            tracing::info!("📡 Bridge: wpa_cli on {}", config.interface);
            Arc::new(WpaCliBridge::new(&config.interface, config.save_config))
        }
        BridgeKind::Nmcli => {
            tracing::info!("📡 Bridge: nmcli on {}", config.interface);
            Arc::new(NmcliBridge::new(&config.interface))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Action, SERVICE_NAME};

    #[tokio::test]
    async fn mock_bridge_is_usable_through_trait_object() {
        let config = WizardConfig {
            bridge: BridgeKind::Mock,
            interface: "wlan0".into(),
            save_config: false,
        };
        let bridge = create_bridge(&config);
        let list = bridge.exec(SERVICE_NAME, Action::ListNetworks, vec![]).await.unwrap();
        assert_eq!(list, serde_json::json!([]));
    }
}

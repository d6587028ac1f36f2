use crate::Command;
use serde_json::Value;
use tokio::sync::oneshot;
use wifiwizard_core::config::WizardConfig;
use wifiwizard_core::factory::create_bridge;
use wifiwizard_core::{format_wifi_config, WifiWizard};

// 把一对回调接到 oneshot 上，等待 bridge 的结果
type Outcome = Result<Value, wifiwizard_core::Error>;

/// 执行一条命令并等待其回调结果
pub async fn run(config: &WizardConfig, command: Command) -> anyhow::Result<Value> {
    let wizard = WifiWizard::new(create_bridge(config))?;

    let (tx, rx) = oneshot::channel::<Outcome>();
    let tx_fail = std::sync::Arc::new(std::sync::Mutex::new(Some(tx)));
    let tx_win = tx_fail.clone();
    let on_success = move |payload: Value| {
        if let Some(tx) = tx_win.lock().ok().and_then(|mut g| g.take()) {
            let _ = tx.send(Ok(payload));
        }
    };
    let on_failure = move |e: wifiwizard_core::Error| {
        if let Some(tx) = tx_fail.lock().ok().and_then(|mut g| g.take()) {
            let _ = tx.send(Err(e));
        }
    };

    let dispatched = match command {
        Command::Add { ssid, password, auth } => {
            let wifi = format_wifi_config(Some(&ssid), password.as_deref(), Some(&auth));
            wizard.add_network(&wifi, on_success, on_failure)
        }
        Command::Remove { ssid } => {
            wizard.remove_network(Some(&ssid), on_success, on_failure);
            true
        }
        Command::Connect { ssid } => {
            wizard.connect_network(Some(&ssid), on_success, on_failure);
            true
        }
        Command::Disconnect { ssid } => {
            wizard.disconnect_network(Some(&ssid), on_success, on_failure);
            true
        }
        Command::List => wizard.list_networks(Some(on_success), on_failure),
    };

    if !dispatched {
        anyhow::bail!("invalid arguments, nothing was sent to the bridge");
    }

    let payload = rx.await??;
    Ok(payload)
}

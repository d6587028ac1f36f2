// Bridge 实现：mock 用于开发和测试，wpa_cli / nmcli 驱动真实的原生 WiFi 栈。

pub mod mock;
pub mod nmcli;
pub mod utils;
pub mod wpa_cli;

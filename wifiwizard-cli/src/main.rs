mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wifiwizard_core::config::{default_config, load_config_from_toml_str};

/// Manage configured WiFi networks through a WifiWizard bridge.
#[derive(Debug, Parser)]
#[command(name = "wifiwizard", version)]
struct Cli {
    /// TOML 配置文件路径；缺省时使用内置配置
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a network to the list of configured networks
    Add {
        #[arg(long)]
        ssid: String,
        /// 省略时按开放网络处理
        #[arg(long)]
        password: Option<String>,
        #[arg(long, default_value = "WPA")]
        auth: String,
    },
    /// Remove a configured network
    Remove { ssid: String },
    /// Connect a configured network
    Connect { ssid: String },
    /// Disconnect a configured network
    Disconnect { ssid: String },
    /// List configured networks
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 初始化日志（这是入口点的职责）
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from_toml_str(&std::fs::read_to_string(path)?)?,
        None => default_config()?,
    };
    tracing::debug!(?config, "Loaded configuration");

    // 2. 调用库的核心逻辑，3. 处理顶层错误
    match runner::run(&config, cli.command).await {
        Ok(payload) => {
            println!("{}", payload);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ WifiWizard failed: {}", e);
            std::process::exit(1);
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WalletConfig {
    pub node: NodeConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NodeConfig {
    pub rpc_port: u16,
    pub log_level: String,
    #[serde(default = "default_state_path")]
    pub state_path: String,
}

fn default_state_path() -> String {
    "wallet_state.json".to_string()
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig {
                rpc_port: 9600,
                log_level: "info".to_string(),
                state_path: default_state_path(),
            },
        }
    }
}

impl WalletConfig {
    pub fn load_or_default(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            match std::fs::read_to_string(path) {
                Ok(s) => match toml::from_str(&s) {
                    Ok(c) => {
                        println!("Config loaded from {}", path);
                        c
                    }
                    Err(e) => {
                        eprintln!("Error parsing config: {}. Using defaults.", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    eprintln!("Error reading config: {}. Using defaults.", e);
                    Self::default()
                }
            }
        } else {
            println!("Config file not found at '{}'. Creating default.", path);
            let config = Self::default();
            if let Ok(s) = toml::to_string_pretty(&config) {
                let _ = std::fs::write(path, s);
            }
            config
        }
    }
}

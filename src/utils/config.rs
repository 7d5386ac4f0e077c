//! 配置管理模块
//!
//! 默认购买力与初始货币对列表不做进程级全局量，而是在这里集中配置、
//! 构造时注入引擎，测试可以用不同配置实例化互相隔离的引擎。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ExchangeError;

/// 交易所配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// 新账户与重置使用的默认购买力
    #[serde(default = "default_buying_power")]
    pub default_buying_power: f64,

    /// 初始注册的货币对
    #[serde(default = "default_instruments")]
    pub instruments: Vec<String>,
}

fn default_buying_power() -> f64 {
    100.0
}

fn default_instruments() -> Vec<String> {
    ["EURUSD", "USDJPY", "GBPUSD", "AUDUSD", "USDCAD"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            default_buying_power: default_buying_power(),
            instruments: default_instruments(),
        }
    }
}

impl ExchangeConfig {
    /// 从 TOML 文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExchangeError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ExchangeError::IOError(format!("Failed to read config file: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| ExchangeError::ConfigError(format!("Failed to parse config file: {}", e)))
    }
}

//! 行情注册表
//!
//! 每个货币对一条报价快照，更新时整条替换，读者永远不会看到半更新的报价。
//! 未注册的货币对查询返回 None，由调用方映射为 InvalidMarket。

use std::str::FromStr;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::exchange::exchange_types::QuoteUpdate;
use crate::ExchangeError;

/// 价格类型选择器
///
/// 显式枚举代替按字段名的运行时分发。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Bid,
    Mid,
    Ask,
}

impl FromStr for PriceType {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bid" => Ok(PriceType::Bid),
            "mid" => Ok(PriceType::Mid),
            "ask" => Ok(PriceType::Ask),
            other => Err(ExchangeError::InvalidPriceType(other.to_string())),
        }
    }
}

/// 货币对报价快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    /// 货币对名称，如 "EURUSD"
    pub name: String,

    /// 买价
    pub bid: f64,

    /// 中间价（新开仓的即时成交价）
    pub mid: f64,

    /// 卖价
    pub ask: f64,

    /// 当日涨跌幅（百分比）
    pub daily_change_percent: f64,

    /// 基础货币
    pub base_currency: String,

    /// 计价货币：取名称后三位，JPY 计价对 (USDJPY) 取前三位
    pub quote_currency: String,
}

impl MarketQuote {
    /// 创建零价快照，价格由行情源首次推送时填入
    pub fn new(name: &str) -> Self {
        let (base, quote) = split_currencies(name);

        Self {
            name: name.to_string(),
            bid: 0.0,
            mid: 0.0,
            ask: 0.0,
            daily_change_percent: 0.0,
            base_currency: base,
            quote_currency: quote,
        }
    }

    /// 按类型取价
    pub fn price(&self, price_type: PriceType) -> f64 {
        match price_type {
            PriceType::Bid => self.bid,
            PriceType::Mid => self.mid,
            PriceType::Ask => self.ask,
        }
    }
}

/// 拆出基础/计价货币。USDJPY 是唯一的 JPY 计价对，两腿对调。
fn split_currencies(name: &str) -> (String, String) {
    if name == "USDJPY" {
        (name[3..].to_string(), name[..3].to_string())
    } else if name.len() >= 6 {
        (name[..3].to_string(), name[name.len() - 3..].to_string())
    } else {
        (name.to_string(), String::new())
    }
}

/// 行情注册表
pub struct MarketRegistry {
    quotes: DashMap<String, MarketQuote>,
}

impl MarketRegistry {
    pub fn new() -> Self {
        Self {
            quotes: DashMap::new(),
        }
    }

    /// 按配置的货币对列表初始化注册表
    pub fn with_instruments(instruments: &[String]) -> Self {
        let registry = Self::new();
        for name in instruments {
            registry
                .quotes
                .insert(name.clone(), MarketQuote::new(name));
        }
        registry
    }

    /// 注册或整体替换一条报价
    pub fn upsert(&self, name: &str, bid: f64, mid: f64, ask: f64, daily_change_percent: f64) {
        let mut quote = MarketQuote::new(name);
        quote.bid = bid;
        quote.mid = mid;
        quote.ask = ask;
        quote.daily_change_percent = daily_change_percent;

        self.quotes.insert(name.to_string(), quote);
    }

    /// 获取报价快照
    pub fn get(&self, name: &str) -> Option<MarketQuote> {
        self.quotes.get(name).map(|r| r.value().clone())
    }

    /// 按类型取价，未知货币对返回 InvalidMarket
    pub fn price(&self, name: &str, price_type: PriceType) -> Result<f64, ExchangeError> {
        self.quotes
            .get(name)
            .map(|r| r.value().price(price_type))
            .ok_or_else(|| ExchangeError::InvalidMarket(name.to_string()))
    }

    /// 批量推送报价（行情源协作者调用），只更新已注册的货币对
    pub fn update_batch(&self, updates: &[QuoteUpdate]) {
        for u in updates {
            if self.quotes.contains_key(&u.name) {
                self.upsert(&u.name, u.bid, u.mid, u.ask, u.daily_change_percent);
            } else {
                log::warn!("Ignoring quote for unregistered market: {}", u.name);
            }
        }
    }

    /// 列出所有报价
    pub fn list_all(&self) -> Vec<MarketQuote> {
        self.quotes.iter().map(|r| r.value().clone()).collect()
    }

    /// 已注册货币对数量
    pub fn market_count(&self) -> usize {
        self.quotes.len()
    }
}

impl Default for MarketRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! 交易所边界类型定义
//!
//! 引擎与外部请求层/行情源之间传递的快照与记录，全部可序列化。

use serde::{Deserialize, Serialize};

/// 账户快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub username: String,
    pub buying_power: f64,
    pub nav: f64,
    pub created_at: String,
}

/// 持仓快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSnapshot {
    pub trade_id: String,
    pub username: String,
    pub instrument_id: String,
    pub side: String,
    pub entry_price: f64,
    pub units: i64,
    pub reserved_units: i64,
    pub created_at: String,
}

/// 订单快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub order_id: String,
    pub trade_id: String,
    pub order_type: String,
    pub units: i64,
    /// 仅限价单携带
    pub limit_price: Option<f64>,
    pub created_at: String,
}

/// 排行榜条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub nav: f64,
}

/// 行情源推送的一条报价
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteUpdate {
    pub name: String,
    pub bid: f64,
    pub mid: f64,
    pub ask: f64,
    pub daily_change_percent: f64,
}

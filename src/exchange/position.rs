//! 持仓存储
//!
//! 持仓一经创建除 reserved_units 外不可变；reserved_units 只由订单的
//! 创建/撤销改写，且任意时刻 `0 <= reserved_units <= units`。
//! 同一持仓上的读改写在该持仓的写锁内串行化。

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::exchange::exchange_types::TradeSnapshot;
use crate::ExchangeError;

/// 持仓方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "long",
            Side::Short => "short",
        }
    }
}

impl FromStr for Side {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(Side::Long),
            "short" => Ok(Side::Short),
            other => Err(ExchangeError::InvalidSide(other.to_string())),
        }
    }
}

/// 持仓（一个账户在一个货币对上的开仓）
#[derive(Debug, Clone)]
pub struct Trade {
    /// 持仓ID (uuid v4)
    pub trade_id: String,

    /// 所属账户
    pub username: String,

    /// 货币对
    pub instrument_id: String,

    /// 方向
    pub side: Side,

    /// 开仓价（创建时的 mid 快照）
    pub entry_price: f64,

    /// 总单位数，恒为正
    pub units: i64,

    /// 被存活订单占用的单位数
    pub reserved_units: i64,

    /// 创建时间
    pub created_at: String,
}

impl Trade {
    pub fn new(username: &str, instrument_id: &str, side: Side, entry_price: f64, units: i64) -> Self {
        Self {
            trade_id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            instrument_id: instrument_id.to_string(),
            side,
            entry_price,
            units,
            reserved_units: 0,
            created_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// 尚未被订单占用的单位数
    pub fn available_units(&self) -> i64 {
        self.units - self.reserved_units
    }

    /// 预留单位（订单创建），容量不足时整体拒绝
    pub fn reserve(&mut self, units: i64) -> Result<(), ExchangeError> {
        if units > self.available_units() {
            return Err(ExchangeError::InsufficientAvailableUnits(format!(
                "trade {}: requested {}, available {}",
                self.trade_id,
                units,
                self.available_units()
            )));
        }

        self.reserved_units += units;
        Ok(())
    }

    /// 释放单位（撤单）。释放量超过当前预留说明账目已不一致，
    /// 必须上报而不是悄悄修正。
    pub fn release(&mut self, units: i64) -> Result<(), ExchangeError> {
        if units > self.reserved_units {
            return Err(ExchangeError::CannotCancel(format!(
                "trade {}: release {} exceeds reserved {}",
                self.trade_id, units, self.reserved_units
            )));
        }

        self.reserved_units -= units;
        Ok(())
    }

    pub fn snapshot(&self) -> TradeSnapshot {
        TradeSnapshot {
            trade_id: self.trade_id.clone(),
            username: self.username.clone(),
            instrument_id: self.instrument_id.clone(),
            side: self.side.as_str().to_string(),
            entry_price: self.entry_price,
            units: self.units,
            reserved_units: self.reserved_units,
            created_at: self.created_at.clone(),
        }
    }
}

/// 持仓存储
pub struct PositionStore {
    /// 持仓映射 (trade_id -> Trade)
    trades: DashMap<String, Arc<RwLock<Trade>>>,

    /// 用户持仓索引 (username -> Vec<trade_id>)
    user_trades: DashMap<String, Arc<RwLock<Vec<String>>>>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self {
            trades: DashMap::new(),
            user_trades: DashMap::new(),
        }
    }

    /// 插入新持仓并登记到用户索引
    pub fn insert(&self, trade: Trade) -> Arc<RwLock<Trade>> {
        let trade_id = trade.trade_id.clone();
        let username = trade.username.clone();

        let handle = Arc::new(RwLock::new(trade));
        self.trades.insert(trade_id.clone(), handle.clone());

        let index = self
            .user_trades
            .entry(username)
            .or_insert_with(|| Arc::new(RwLock::new(Vec::new())))
            .clone();
        index.write().push(trade_id);

        handle
    }

    /// 获取持仓句柄
    pub fn get(&self, trade_id: &str) -> Result<Arc<RwLock<Trade>>, ExchangeError> {
        self.trades
            .get(trade_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| ExchangeError::TradeNotFound(trade_id.to_string()))
    }

    /// 某用户的全部持仓句柄
    pub fn trades_of(&self, username: &str) -> Vec<Arc<RwLock<Trade>>> {
        let ids = match self.user_trades.get(username) {
            Some(index) => index.value().read().clone(),
            None => return Vec::new(),
        };

        ids.iter()
            .filter_map(|id| self.trades.get(id).map(|r| r.value().clone()))
            .collect()
    }

    /// 持仓总数
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}

//! 订单簿
//!
//! 订单存在性的唯一所有者：插入/删除只发生在账本引擎持有父持仓写锁时，
//! 因此「存活订单单位之和 == 持仓 reserved_units」在任何可观察时刻成立。

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::exchange::exchange_types::OrderSnapshot;
use crate::ExchangeError;

/// 订单类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
        }
    }
}

impl FromStr for OrderType {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            other => Err(ExchangeError::InvalidOrderType(other.to_string())),
        }
    }
}

/// 挂单（引用一个持仓，占用其一部分单位）
#[derive(Debug, Clone)]
pub struct Order {
    /// 订单ID (uuid v4)
    pub order_id: String,

    /// 父持仓ID
    pub trade_id: String,

    /// 订单类型
    pub order_type: OrderType,

    /// 占用的单位数，恒为正
    pub units: i64,

    /// 限价，仅限价单携带
    pub limit_price: Option<f64>,

    /// 创建时间
    pub created_at: String,
}

impl Order {
    pub fn new(trade_id: &str, order_type: OrderType, units: i64, limit_price: Option<f64>) -> Self {
        Self {
            order_id: uuid::Uuid::new_v4().to_string(),
            trade_id: trade_id.to_string(),
            order_type,
            units,
            limit_price,
            created_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            order_id: self.order_id.clone(),
            trade_id: self.trade_id.clone(),
            order_type: self.order_type.as_str().to_string(),
            units: self.units,
            limit_price: self.limit_price,
            created_at: self.created_at.clone(),
        }
    }
}

/// 订单簿
pub struct OrderBook {
    /// 订单映射 (order_id -> Order)
    orders: DashMap<String, Order>,

    /// 持仓订单索引 (trade_id -> Vec<order_id>)
    trade_orders: DashMap<String, Arc<RwLock<Vec<String>>>>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            trade_orders: DashMap::new(),
        }
    }

    /// 插入订单并登记到持仓索引
    pub fn insert(&self, order: Order) -> String {
        let order_id = order.order_id.clone();
        let trade_id = order.trade_id.clone();

        self.orders.insert(order_id.clone(), order);

        let index = self
            .trade_orders
            .entry(trade_id)
            .or_insert_with(|| Arc::new(RwLock::new(Vec::new())))
            .clone();
        index.write().push(order_id.clone());

        order_id
    }

    /// 读取订单快照
    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.orders.get(order_id).map(|r| r.value().clone())
    }

    /// 删除订单并返回它；并发的重复删除只有一方拿到订单
    pub fn remove(&self, order_id: &str) -> Option<Order> {
        let (_, order) = self.orders.remove(order_id)?;

        if let Some(index) = self.trade_orders.get(&order.trade_id) {
            index.value().write().retain(|id| id != order_id);
        }

        Some(order)
    }

    /// 某持仓上的全部存活订单，没有时返回空列表而非错误
    pub fn orders_of(&self, trade_id: &str) -> Vec<Order> {
        let ids = match self.trade_orders.get(trade_id) {
            Some(index) => index.value().read().clone(),
            None => return Vec::new(),
        };

        ids.iter()
            .filter_map(|id| self.orders.get(id).map(|r| r.value().clone()))
            .collect()
    }

    /// 存活订单总数
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

//! 账本引擎
//!
//! 账户/持仓/订单三个存储的唯一写入者，负责：
//!
//! - **开仓**: 按 mid 价即时成交，扣款与持仓创建在账户写锁内原子完成
//! - **订单预留**: 先占容量再建单，同一持仓上的并发订单不会超配
//! - **撤单释放**: 删单与释放在持仓写锁内原子完成，失败不留痕
//! - **NAV 重算**: 行情推送后的独立扫描，开仓时刻意不同步重算
//!
//! 所有失败对调用方都是终态，引擎不重试也不保证幂等。

use std::str::FromStr;
use std::sync::Arc;

use crate::exchange::exchange_types::{OrderSnapshot, QuoteUpdate, TradeSnapshot};
use crate::exchange::{AccountManager, Order, OrderBook, OrderType, PositionStore, Side, Trade};
use crate::market::{MarketRegistry, PriceType};
use crate::ExchangeError;

/// 账本引擎
pub struct LedgerEngine {
    /// 账户管理器
    account_mgr: Arc<AccountManager>,

    /// 行情注册表（开仓取 mid 价）
    registry: Arc<MarketRegistry>,

    /// 持仓存储
    positions: Arc<PositionStore>,

    /// 订单簿
    orders: Arc<OrderBook>,
}

impl LedgerEngine {
    pub fn new(account_mgr: Arc<AccountManager>, registry: Arc<MarketRegistry>) -> Self {
        Self {
            account_mgr,
            registry,
            positions: Arc::new(PositionStore::new()),
            orders: Arc::new(OrderBook::new()),
        }
    }

    /// 开仓
    ///
    /// 所有入场单都是市价单，按当前 mid 价即时成交（不建模滑点与点差）。
    /// 扣款与持仓插入在账户写锁内完成：要么都发生，要么都不发生。
    /// NAV 不在这里重算，由行情推送后的重算扫描统一处理。
    pub fn create_trade(
        &self,
        username: &str,
        instrument_id: &str,
        side: &str,
        units: i64,
    ) -> Result<String, ExchangeError> {
        if units <= 0 {
            return Err(ExchangeError::InvalidUnits(format!(
                "units must be positive, got {}",
                units
            )));
        }

        let side = Side::from_str(side)?;

        let quote = self
            .registry
            .get(instrument_id)
            .ok_or_else(|| ExchangeError::InvalidMarket(instrument_id.to_string()))?;

        let account = self.account_mgr.get_account(username)?;

        let entry_price = quote.mid;
        let trade_cost = entry_price * units as f64;

        let mut acc = account.write();
        if trade_cost > acc.buying_power {
            return Err(ExchangeError::InsufficientFunds(format!(
                "{}: cost {:.5} exceeds buying power {:.5}",
                username, trade_cost, acc.buying_power
            )));
        }

        acc.buying_power -= trade_cost;

        // 仍持有账户写锁：扣款与持仓创建对外不可分
        let trade = Trade::new(username, instrument_id, side, entry_price, units);
        let trade_id = trade.trade_id.clone();
        self.positions.insert(trade);

        log::info!(
            "Trade created: {} user={} market={} side={} units={} entry={}",
            trade_id,
            username,
            instrument_id,
            side.as_str(),
            units,
            entry_price
        );

        Ok(trade_id)
    }

    /// 创建订单（预留）
    ///
    /// 两阶段占用：先在父持仓上预留容量，订单随后才可能被执行。
    /// 预留与建单在持仓写锁内完成，并发订单合计不会超过可用单位。
    /// 订单不动用现金——现金只在开仓时扣过一次。
    pub fn create_order(
        &self,
        trade_id: &str,
        order_type: &str,
        units: i64,
        limit_price: Option<f64>,
    ) -> Result<String, ExchangeError> {
        if units <= 0 {
            return Err(ExchangeError::InvalidUnits(format!(
                "units must be positive, got {}",
                units
            )));
        }

        let order_type = OrderType::from_str(order_type)?;

        // 限价单必须带限价，市价单必须不带
        match (order_type, limit_price) {
            (OrderType::Limit, None) => {
                return Err(ExchangeError::InvalidOrderType(
                    "limit order requires limit_price".to_string(),
                ));
            }
            (OrderType::Market, Some(_)) => {
                return Err(ExchangeError::InvalidOrderType(
                    "market order must not carry limit_price".to_string(),
                ));
            }
            _ => {}
        }

        let trade = self.positions.get(trade_id)?;

        let mut t = trade.write();
        t.reserve(units)?;

        // 仍持有持仓写锁：预留与建单对外不可分
        let order = Order::new(trade_id, order_type, units, limit_price);
        let order_id = self.orders.insert(order);

        log::info!(
            "Order created: {} trade={} type={} units={} reserved={}/{}",
            order_id,
            trade_id,
            order_type.as_str(),
            units,
            t.reserved_units,
            t.units
        );

        Ok(order_id)
    }

    /// 撤单
    ///
    /// 释放与删单在持仓写锁内完成；释放量超过当前预留说明账目不一致，
    /// 上报 CannotCancel 而不是悄悄修正。没有资金返还——建单从未扣款。
    pub fn cancel_order(&self, order_id: &str) -> Result<(), ExchangeError> {
        let order = self
            .orders
            .get(order_id)
            .ok_or_else(|| ExchangeError::OrderNotFound(order_id.to_string()))?;

        let trade = match self.positions.get(&order.trade_id) {
            Ok(trade) => trade,
            Err(_) => {
                // 正常运行下不可达：订单引用的持仓消失属于程序缺陷
                log::error!(
                    "Integrity violation: order {} references missing trade {}",
                    order_id,
                    order.trade_id
                );
                return Err(ExchangeError::TradeNotFound(order.trade_id.clone()));
            }
        };

        let mut t = trade.write();

        // 锁内复核存在性：并发撤同一单时只有先到者看到订单
        let live = match self.orders.get(order_id) {
            Some(live) => live,
            None => return Err(ExchangeError::OrderNotFound(order_id.to_string())),
        };

        t.release(live.units)?;
        self.orders.remove(order_id);

        log::info!(
            "Order canceled: {} trade={} units={} reserved={}/{}",
            order_id,
            order.trade_id,
            live.units,
            t.reserved_units,
            t.units
        );

        Ok(())
    }

    /// 某持仓上的存活订单快照，没有时返回空列表而非错误
    pub fn retrieve_orders(&self, trade_id: &str) -> Vec<OrderSnapshot> {
        self.orders
            .orders_of(trade_id)
            .iter()
            .map(|o| o.snapshot())
            .collect()
    }

    /// 持仓快照
    pub fn get_trade(&self, trade_id: &str) -> Result<TradeSnapshot, ExchangeError> {
        let trade = self.positions.get(trade_id)?;
        let snap = trade.read().snapshot();
        Ok(snap)
    }

    /// 按类型取价
    pub fn get_price(&self, instrument_id: &str, price_type: &str) -> Result<f64, ExchangeError> {
        let quote = self
            .registry
            .get(instrument_id)
            .ok_or_else(|| ExchangeError::InvalidMarket(instrument_id.to_string()))?;

        let price_type = PriceType::from_str(price_type)?;
        Ok(quote.price(price_type))
    }

    /// 行情推送入口：整体替换报价后做一次 NAV 重算
    pub fn apply_quotes(&self, updates: &[QuoteUpdate]) {
        self.registry.update_batch(updates);
        self.recompute_nav();
    }

    /// NAV 重算扫描
    ///
    /// 对每个账户：nav = buying_power + Σ(units × entry_price)。
    /// 刻意使用开仓价而非现价——排行榜的可观察行为依赖这一简化。
    pub fn recompute_nav(&self) {
        for account in self.account_mgr.get_all_accounts() {
            let mut acc = account.write();

            let positions_value: f64 = self
                .positions
                .trades_of(&acc.username)
                .iter()
                .map(|t| {
                    let t = t.read();
                    t.units as f64 * t.entry_price
                })
                .sum();

            acc.nav = acc.buying_power + positions_value;
        }

        log::debug!(
            "NAV recomputed for {} accounts",
            self.account_mgr.account_count()
        );
    }

    /// 账户管理器（排行榜等只读投影使用）
    pub fn account_mgr(&self) -> &Arc<AccountManager> {
        &self.account_mgr
    }

    /// 持仓存储（只读访问）
    pub fn positions(&self) -> &Arc<PositionStore> {
        &self.positions
    }

    /// 订单簿（只读访问）
    pub fn order_book(&self) -> &Arc<OrderBook> {
        &self.orders
    }
}

//! 模拟行情源
//!
//! 代表外部行情协作者：推送一份五大货币对的硬编码快照，然后触发一次
//! NAV 重算。真实数据接入（如 OANDA）不在本 crate 范围内。

use crate::exchange::exchange_types::QuoteUpdate;
use crate::exchange::LedgerEngine;

/// 模拟行情源
pub struct MockPriceFeed;

impl MockPriceFeed {
    /// 五大货币对的固定报价快照
    pub fn snapshot() -> Vec<QuoteUpdate> {
        vec![
            QuoteUpdate {
                name: "EURUSD".to_string(),
                bid: 1.1234,
                mid: 1.1235,
                ask: 1.1236,
                daily_change_percent: 0.023,
            },
            QuoteUpdate {
                name: "USDJPY".to_string(),
                bid: 110.25,
                mid: 110.265,
                ask: 110.28,
                daily_change_percent: -0.25,
            },
            QuoteUpdate {
                name: "GBPUSD".to_string(),
                bid: 1.3012,
                mid: 1.30135,
                ask: 1.3015,
                daily_change_percent: 0.12,
            },
            QuoteUpdate {
                name: "AUDUSD".to_string(),
                bid: 0.7100,
                mid: 0.71015,
                ask: 0.7103,
                daily_change_percent: 0.03,
            },
            QuoteUpdate {
                name: "USDCAD".to_string(),
                bid: 1.2500,
                mid: 1.25015,
                ask: 1.2503,
                daily_change_percent: -0.07,
            },
        ]
    }

    /// 推送快照并触发 NAV 重算
    pub fn tick(engine: &LedgerEngine) {
        let updates = Self::snapshot();
        log::info!("Price feed tick: {} quotes", updates.len());
        engine.apply_quotes(&updates);
    }
}

//! FXSIM 模拟交易所演示服务
//!
//! 外部请求层（HTTP 等）不在本 crate 范围内；这个二进制演示引擎的
//! 完整生命周期：装配 → 行情推送 → 开户/开仓/订单 → 排行榜。
//!
//! 运行: cargo run --bin fxsim-server
//! 配置: FXSIM_CONFIG 指向 TOML 文件时从文件加载，否则用默认配置

use std::sync::Arc;

use fxsim::exchange::{AccountManager, LedgerEngine};
use fxsim::market::{MarketRegistry, MockPriceFeed};
use fxsim::query::Leaderboard;
use fxsim::utils::config::ExchangeConfig;
use fxsim::ExchangeError;

fn main() -> Result<(), ExchangeError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::var("FXSIM_CONFIG") {
        Ok(path) => ExchangeConfig::load_from_file(&path)?,
        Err(_) => ExchangeConfig::default(),
    };

    log::info!(
        "Starting fxsim: default_buying_power={}, {} instruments",
        config.default_buying_power,
        config.instruments.len()
    );

    // 装配
    let account_mgr = Arc::new(AccountManager::new(config.default_buying_power));
    let registry = Arc::new(MarketRegistry::with_instruments(&config.instruments));
    let engine = LedgerEngine::new(account_mgr.clone(), registry);
    let leaderboard = Leaderboard::new(account_mgr.clone());

    // 行情推送（外部协作者）
    MockPriceFeed::tick(&engine);

    // 演示会话
    account_mgr.open_account("alice")?;
    account_mgr.open_account("bob")?;

    let trade_id = engine.create_trade("alice", "EURUSD", "long", 50)?;
    log::info!(
        "alice after trade: {:?}",
        account_mgr.get_snapshot("alice")?
    );

    let order_id = engine.create_order(&trade_id, "limit", 30, Some(1.13))?;
    log::info!("open orders: {:?}", engine.retrieve_orders(&trade_id));

    engine.cancel_order(&order_id)?;
    log::info!("orders after cancel: {:?}", engine.retrieve_orders(&trade_id));

    // 第二次推送触发 NAV 重算，排行榜反映持仓名义价值
    MockPriceFeed::tick(&engine);

    for entry in leaderboard.rank(1, 10)? {
        log::info!("leaderboard: {} nav={:.5}", entry.username, entry.nav);
    }

    Ok(())
}

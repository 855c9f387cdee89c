//! Supported coins

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoinInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

pub const POPULAR_COINS: [CoinInfo; 5] = [
    CoinInfo { id: "bitcoin", name: "Bitcoin", symbol: "BTC" },
    CoinInfo { id: "ethereum", name: "Ethereum", symbol: "ETH" },
    CoinInfo { id: "binancecoin", name: "BNB", symbol: "BNB" },
    CoinInfo { id: "solana", name: "Solana", symbol: "SOL" },
    CoinInfo { id: "cardano", name: "Cardano", symbol: "ADA" },
];

pub fn find_coin(id: &str) -> Option<&'static CoinInfo> {
    POPULAR_COINS.iter().find(|coin| coin.id == id)
}

//! Per-coin baseline sentiment profiles

use super::types::AssetProfile;

const BITCOIN: AssetProfile = AssetProfile { base_positive: 55.0, base_negative: 25.0, volatility: 0.8 };
const ETHEREUM: AssetProfile = AssetProfile { base_positive: 50.0, base_negative: 30.0, volatility: 1.0 };
const BINANCECOIN: AssetProfile = AssetProfile { base_positive: 45.0, base_negative: 35.0, volatility: 1.2 };
const SOLANA: AssetProfile = AssetProfile { base_positive: 48.0, base_negative: 32.0, volatility: 1.5 };
const CARDANO: AssetProfile = AssetProfile { base_positive: 42.0, base_negative: 38.0, volatility: 1.1 };

/// Profile used for any coin without a hand-tuned entry
pub const DEFAULT_PROFILE: AssetProfile = BITCOIN;

/// Look up the baseline profile for a coin id
pub fn resolve_profile(coin_id: &str) -> AssetProfile {
    match coin_id {
        "bitcoin" => BITCOIN,
        "ethereum" => ETHEREUM,
        "binancecoin" => BINANCECOIN,
        "solana" => SOLANA,
        "cardano" => CARDANO,
        _ => DEFAULT_PROFILE,
    }
}

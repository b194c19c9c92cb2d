use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

/// Denominator of the fee rate: a numerator of `FEE_DENOM` means 100%.
pub const FEE_DENOM: u128 = 100_000_000;
/// Upper bound for the fee rate numerator (5%).
pub const MAX_FEE_RATE: u128 = 5_000_000;

#[cw_serde]
pub struct Config {
    /// cw20 contract the issued units are backed by
    pub reference_asset: Addr,
    /// reference asset base units per one issued unit
    pub exchange_rate: Uint128,
}

#[cw_serde]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const TOKEN_INFO: Item<TokenInfo> = Item::new("token_info");
pub const FEE_RATE: Item<Uint128> = Item::new("fee_rate");
pub const FEE_RECIPIENT: Item<Addr> = Item::new("fee_recipient");
/// Set once; may replace the fee recipient alongside the recipient itself.
pub const GOVERNANCE: Item<Option<Addr>> = Item::new("governance");
/// Fee being forwarded with a deposit hook, kept until the send settles.
pub const PENDING_FEE: Item<Uint128> = Item::new("pending_fee");
pub const TOTAL_ISSUED: Item<Uint128> = Item::new("total_issued");
pub const BALANCES: Map<&Addr, Uint128> = Map::new("balances");

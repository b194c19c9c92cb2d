use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

/// Sum of all beneficiary weights.
pub const TOTAL_WEIGHT: u64 = 1_000_000;

#[cw_serde]
pub struct Config {
    pub token: Addr,
    pub reference_asset: Addr,
}

pub const CONFIG: Item<Config> = Item::new("config");
/// Beneficiaries with their weights, in registration order.
pub const BENEFICIARIES: Item<Vec<(Addr, u64)>> = Item::new("beneficiaries");
pub const WEIGHTS: Map<&Addr, u64> = Map::new("weights");
/// Everything ever deposited, withdrawn amounts included.
pub const TOTAL_RECEIVED: Item<Uint128> = Item::new("total_received");
pub const WITHDRAWN: Map<&Addr, Uint128> = Map::new("withdrawn");
/// Standing candidate of each beneficiary.
pub const VOTES: Map<&Addr, Addr> = Map::new("votes");
/// Weight currently pointing at each candidate.
pub const TALLIES: Map<&Addr, u64> = Map::new("tallies");

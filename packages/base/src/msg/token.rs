use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

#[cw_serde]
pub struct InstantiateMsg {
    pub reference_asset: String,
    pub exchange_rate: Uint128,
    pub fee_rate: Uint128,
    /// defaults to the instantiator
    pub fee_recipient: Option<String>,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[cw_serde]
pub enum ExecuteMsg {
    Mint { receiver: String, amount: Uint128 },
    Burn { amount: Uint128 },
    Transfer { recipient: String, amount: Uint128 },
    UpdateFeeRate { fee_rate: Uint128 },
    UpdateReceiver { new_recipient: String },
    /// One-time hand-over of consensus authority, e.g. to a fee receiver.
    SetGovernance { governance: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(FeeRecipientResponse)]
    FeeRecipient {},
    #[returns(CollateralNeededResponse)]
    CollateralNeeded { amount: Uint128 },
    #[returns(cw20::BalanceResponse)]
    Balance { address: String },
    #[returns(cw20::TokenInfoResponse)]
    TokenInfo {},
}

#[cw_serde]
pub struct ConfigResponse {
    pub reference_asset: String,
    pub exchange_rate: Uint128,
    pub fee_rate: Uint128,
    pub fee_recipient: String,
    pub governance: Option<String>,
}

#[cw_serde]
pub struct FeeRecipientResponse {
    pub fee_recipient: String,
}

#[cw_serde]
pub struct CollateralNeededResponse {
    pub base_cost: Uint128,
    pub fee_cost: Uint128,
    pub total: Uint128,
}

#[cw_serde]
pub struct MigrateMsg {}

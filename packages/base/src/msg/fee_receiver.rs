use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use cw20::Cw20ReceiveMsg;

#[cw_serde]
pub struct InstantiateMsg {
    pub token: String,
    pub beneficiaries: Vec<String>,
    /// parallel to `beneficiaries`
    pub weights: Vec<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    Receive(Cw20ReceiveMsg),
    RedeemAll { account: String },
    ProposeToUpdateReceiver { candidate: String },
}

/// Payload expected inside a cw20 `Send` of the reference asset.
#[cw_serde]
pub enum ReceiveMsg {
    Deposit {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(Vec<BeneficiaryWeight>)]
    Beneficiaries {},
    #[returns(Uint128)]
    TotalReceived {},
    #[returns(Uint128)]
    Withdrawable { address: String },
    #[returns(BeneficiaryResponse)]
    Beneficiary { address: String },
    #[returns(Option<String>)]
    Vote { address: String },
    #[returns(u64)]
    Tally { candidate: String },
}

#[cw_serde]
pub struct ConfigResponse {
    pub token: String,
    pub reference_asset: String,
}

#[cw_serde]
pub struct BeneficiaryWeight {
    pub address: String,
    pub weight: u64,
}

#[cw_serde]
pub struct BeneficiaryResponse {
    pub address: String,
    pub weight: u64,
    pub entitlement: Uint128,
    pub withdrawn: Uint128,
    pub withdrawable: Uint128,
    pub vote: Option<String>,
}

#[cw_serde]
pub struct MigrateMsg {}

//! Thin wrappers around the cw20 contract that serves as the reference asset.

use cosmwasm_std::{
    to_json_binary, Addr, Binary, BlockInfo, CosmosMsg, CustomQuery, QuerierWrapper, StdResult,
    Uint128, WasmMsg,
};
use cw20::{AllowanceResponse, BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};

pub fn query_balance<C: CustomQuery>(
    querier: &QuerierWrapper<C>,
    asset: &Addr,
    address: impl Into<String>,
) -> StdResult<Uint128> {
    let response: BalanceResponse = querier.query_wasm_smart(
        asset,
        &Cw20QueryMsg::Balance {
            address: address.into(),
        },
    )?;
    Ok(response.balance)
}

/// Allowance granted by `owner` to `spender`, zero once it has expired.
pub fn query_allowance<C: CustomQuery>(
    querier: &QuerierWrapper<C>,
    block: &BlockInfo,
    asset: &Addr,
    owner: impl Into<String>,
    spender: impl Into<String>,
) -> StdResult<Uint128> {
    let response: AllowanceResponse = querier.query_wasm_smart(
        asset,
        &Cw20QueryMsg::Allowance {
            owner: owner.into(),
            spender: spender.into(),
        },
    )?;
    if response.expires.is_expired(block) {
        return Ok(Uint128::zero());
    }
    Ok(response.allowance)
}

/// Accounts without contract info are treated as plain wallets.
pub fn is_contract<C: CustomQuery>(querier: &QuerierWrapper<C>, address: &Addr) -> bool {
    querier.query_wasm_contract_info(address).is_ok()
}

pub fn transfer_msg<T>(
    asset: &Addr,
    recipient: impl Into<String>,
    amount: Uint128,
) -> StdResult<CosmosMsg<T>> {
    execute_msg(
        asset,
        &Cw20ExecuteMsg::Transfer {
            recipient: recipient.into(),
            amount,
        },
    )
}

pub fn transfer_from_msg<T>(
    asset: &Addr,
    owner: impl Into<String>,
    recipient: impl Into<String>,
    amount: Uint128,
) -> StdResult<CosmosMsg<T>> {
    execute_msg(
        asset,
        &Cw20ExecuteMsg::TransferFrom {
            owner: owner.into(),
            recipient: recipient.into(),
            amount,
        },
    )
}

pub fn send_msg<T>(
    asset: &Addr,
    contract: impl Into<String>,
    amount: Uint128,
    msg: Binary,
) -> StdResult<CosmosMsg<T>> {
    execute_msg(
        asset,
        &Cw20ExecuteMsg::Send {
            contract: contract.into(),
            amount,
            msg,
        },
    )
}

fn execute_msg<T>(asset: &Addr, msg: &Cw20ExecuteMsg) -> StdResult<CosmosMsg<T>> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: asset.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    }))
}

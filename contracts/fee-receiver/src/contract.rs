use std::collections::HashSet;

use backed_base::{
    error::fee_receiver::{ContractError, ContractResult},
    msg::{
        fee_receiver::{
            BeneficiaryResponse, BeneficiaryWeight, ConfigResponse, ExecuteMsg, InstantiateMsg,
            MigrateMsg, QueryMsg, ReceiveMsg,
        },
        token::{
            ConfigResponse as TokenConfigResponse, ExecuteMsg as TokenExecuteMsg,
            QueryMsg as TokenQueryMsg,
        },
    },
    state::fee_receiver::{
        Config, BENEFICIARIES, CONFIG, TALLIES, TOTAL_RECEIVED, TOTAL_WEIGHT, VOTES, WEIGHTS,
        WITHDRAWN,
    },
};
use backed_helpers::{
    answer::{attr_cw20, response},
    ledger,
};
use cosmwasm_std::{
    attr, ensure, ensure_eq, entry_point, from_json, to_json_binary, Addr, Binary, CosmosMsg,
    Deps, DepsMut, Env, MessageInfo, Response, StdError, Storage, Uint128, WasmMsg,
};
use cw20::Cw20ReceiveMsg;

pub const CONTRACT_NAME: &str = concat!("crates.io:backed__", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> ContractResult<Response> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let beneficiaries = verify_beneficiaries(deps.as_ref(), &msg.beneficiaries, &msg.weights)?;

    let token = deps.api.addr_validate(&msg.token)?;
    let token_config: TokenConfigResponse = deps
        .querier
        .query_wasm_smart(&token, &TokenQueryMsg::Config {})?;
    let reference_asset = deps.api.addr_validate(&token_config.reference_asset)?;

    CONFIG.save(
        deps.storage,
        &Config {
            token: token.clone(),
            reference_asset: reference_asset.clone(),
        },
    )?;
    for (beneficiary, weight) in beneficiaries.iter() {
        WEIGHTS.save(deps.storage, beneficiary, weight)?;
    }
    BENEFICIARIES.save(deps.storage, &beneficiaries)?;
    TOTAL_RECEIVED.save(deps.storage, &Uint128::zero())?;

    Ok(response(
        "instantiate",
        CONTRACT_NAME,
        [
            attr("token", token),
            attr("reference_asset", reference_asset),
            attr("beneficiaries", beneficiaries.len().to_string()),
        ],
    ))
}

fn verify_beneficiaries(
    deps: Deps,
    beneficiaries: &[String],
    weights: &[u64],
) -> ContractResult<Vec<(Addr, u64)>> {
    ensure!(
        !beneficiaries.is_empty() && beneficiaries.len() == weights.len(),
        invalid_weights()
    );

    let mut seen = HashSet::new();
    let mut total: u64 = 0;
    let mut verified = Vec::with_capacity(beneficiaries.len());
    for (beneficiary, weight) in beneficiaries.iter().zip(weights.iter().copied()) {
        let beneficiary = deps.api.addr_validate(beneficiary)?;
        ensure!(
            seen.insert(beneficiary.clone()),
            ContractError::DuplicateBeneficiary {
                address: beneficiary.into_string(),
            }
        );
        ensure!(weight > 0, invalid_weights());
        total = total.checked_add(weight).ok_or_else(invalid_weights)?;
        verified.push((beneficiary, weight));
    }
    ensure_eq!(total, TOTAL_WEIGHT, invalid_weights());
    Ok(verified)
}

fn invalid_weights() -> ContractError {
    ContractError::InvalidWeights {
        total_weight: TOTAL_WEIGHT,
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    match msg {
        QueryMsg::Config {} => {
            let config = CONFIG.load(deps.storage)?;
            Ok(to_json_binary(&ConfigResponse {
                token: config.token.into_string(),
                reference_asset: config.reference_asset.into_string(),
            })?)
        }
        QueryMsg::Beneficiaries {} => {
            let beneficiaries = BENEFICIARIES
                .load(deps.storage)?
                .into_iter()
                .map(|(address, weight)| BeneficiaryWeight {
                    address: address.into_string(),
                    weight,
                })
                .collect::<Vec<_>>();
            Ok(to_json_binary(&beneficiaries)?)
        }
        QueryMsg::TotalReceived {} => Ok(to_json_binary(&TOTAL_RECEIVED.load(deps.storage)?)?),
        QueryMsg::Withdrawable { address } => {
            let address = deps.api.addr_validate(&address)?;
            let weight = WEIGHTS
                .may_load(deps.storage, &address)?
                .unwrap_or_default();
            let payout = Payout::load(deps.storage, &address, weight)?;
            Ok(to_json_binary(&payout.withdrawable()?)?)
        }
        QueryMsg::Beneficiary { address } => {
            let address = deps.api.addr_validate(&address)?;
            let weight = beneficiary_weight(deps.storage, &address)?;
            let payout = Payout::load(deps.storage, &address, weight)?;
            let vote = VOTES.may_load(deps.storage, &address)?;
            Ok(to_json_binary(&BeneficiaryResponse {
                address: address.into_string(),
                weight,
                entitlement: payout.entitlement,
                withdrawn: payout.withdrawn,
                withdrawable: payout.withdrawable()?,
                vote: vote.map(Addr::into_string),
            })?)
        }
        QueryMsg::Vote { address } => {
            let address = deps.api.addr_validate(&address)?;
            let vote = VOTES.may_load(deps.storage, &address)?;
            Ok(to_json_binary(&vote.map(Addr::into_string))?)
        }
        QueryMsg::Tally { candidate } => {
            let candidate = deps.api.addr_validate(&candidate)?;
            let tally = TALLIES
                .may_load(deps.storage, &candidate)?
                .unwrap_or_default();
            Ok(to_json_binary(&tally)?)
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<Response> {
    cw_utils::nonpayable(&info)?;
    match msg {
        ExecuteMsg::Receive(cw20_msg) => execute_receive(deps, info, cw20_msg),
        ExecuteMsg::RedeemAll { account } => execute_redeem_all(deps, info, account),
        ExecuteMsg::ProposeToUpdateReceiver { candidate } => {
            execute_propose_to_update_receiver(deps, info, candidate)
        }
    }
}

/// Entitlement of one beneficiary against the running deposit total.
struct Payout {
    entitlement: Uint128,
    withdrawn: Uint128,
}

impl Payout {
    fn load(storage: &dyn Storage, address: &Addr, weight: u64) -> ContractResult<Self> {
        let total_received = TOTAL_RECEIVED.load(storage)?;
        Ok(Payout {
            entitlement: total_received.multiply_ratio(weight, TOTAL_WEIGHT),
            withdrawn: WITHDRAWN.may_load(storage, address)?.unwrap_or_default(),
        })
    }

    fn withdrawable(&self) -> ContractResult<Uint128> {
        Ok(self.entitlement.checked_sub(self.withdrawn)?)
    }
}

fn beneficiary_weight(storage: &dyn Storage, address: &Addr) -> ContractResult<u64> {
    WEIGHTS
        .may_load(storage, address)?
        .ok_or_else(|| ContractError::UnknownBeneficiary {
            address: address.to_string(),
        })
}

fn execute_receive(
    deps: DepsMut,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> ContractResult<Response> {
    let config = CONFIG.load(deps.storage)?;
    ensure_eq!(
        info.sender,
        config.reference_asset,
        ContractError::Unauthorized {}
    );

    match from_json(&cw20_msg.msg)? {
        ReceiveMsg::Deposit {} => {
            let total_received =
                TOTAL_RECEIVED.update(deps.storage, |total| -> ContractResult<_> {
                    Ok(total.checked_add(cw20_msg.amount)?)
                })?;
            Ok(response(
                "execute-deposit",
                CONTRACT_NAME,
                [
                    attr("from", cw20_msg.sender),
                    attr_cw20("amount", cw20_msg.amount, &config.reference_asset),
                    attr("total_received", total_received.to_string()),
                ],
            ))
        }
    }
}

fn execute_redeem_all(
    deps: DepsMut,
    info: MessageInfo,
    account: String,
) -> ContractResult<Response> {
    let account = deps.api.addr_validate(&account)?;
    ensure_eq!(info.sender, account, ContractError::Unauthorized {});
    let weight = beneficiary_weight(deps.storage, &account)?;

    let config = CONFIG.load(deps.storage)?;
    let payout = Payout::load(deps.storage, &account, weight)?;
    let amount = payout.withdrawable()?;

    let attrs = vec![
        attr("account", account.as_str()),
        attr_cw20("amount", amount, &config.reference_asset),
    ];
    if amount.is_zero() {
        return Ok(response("execute-redeem-all", CONTRACT_NAME, attrs));
    }

    WITHDRAWN.save(
        deps.storage,
        &account,
        &payout.withdrawn.checked_add(amount)?,
    )?;
    let transfer: CosmosMsg = ledger::transfer_msg(&config.reference_asset, &account, amount)?;

    Ok(response("execute-redeem-all", CONTRACT_NAME, attrs).add_message(transfer))
}

fn execute_propose_to_update_receiver(
    deps: DepsMut,
    info: MessageInfo,
    candidate: String,
) -> ContractResult<Response> {
    let weight = beneficiary_weight(deps.storage, &info.sender)?;
    let candidate = deps.api.addr_validate(&candidate)?;

    if let Some(previous) = VOTES.may_load(deps.storage, &info.sender)? {
        let tally = TALLIES
            .may_load(deps.storage, &previous)?
            .unwrap_or_default()
            .checked_sub(weight)
            .ok_or_else(|| StdError::generic_err("tally is below a standing vote weight"))?;
        if tally == 0 {
            TALLIES.remove(deps.storage, &previous);
        } else {
            TALLIES.save(deps.storage, &previous, &tally)?;
        }
    }
    VOTES.save(deps.storage, &info.sender, &candidate)?;
    let tally = TALLIES
        .may_load(deps.storage, &candidate)?
        .unwrap_or_default()
        + weight;
    TALLIES.save(deps.storage, &candidate, &tally)?;

    let mut attrs = vec![
        attr("voter", info.sender.as_str()),
        attr("candidate", candidate.as_str()),
        attr("tally", tally.to_string()),
    ];
    let mut messages: Vec<CosmosMsg> = vec![];
    if tally == TOTAL_WEIGHT {
        let config = CONFIG.load(deps.storage)?;
        messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: config.token.to_string(),
            msg: to_json_binary(&TokenExecuteMsg::UpdateReceiver {
                new_recipient: candidate.to_string(),
            })?,
            funds: vec![],
        }));
        attrs.push(attr("fee_recipient_update", candidate.as_str()));
    }

    Ok(response(
        "execute-propose-to-update-receiver",
        CONTRACT_NAME,
        attrs,
    )
    .add_messages(messages))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> ContractResult<Response> {
    let contract_version_metadata = cw2::get_contract_version(deps.storage)?;
    let storage_contract_name = contract_version_metadata.contract.as_str();
    if storage_contract_name != CONTRACT_NAME {
        return Err(ContractError::MigrationError {
            storage_contract_name: storage_contract_name.to_string(),
            contract_name: CONTRACT_NAME.to_string(),
        });
    }

    let storage_version: semver::Version = contract_version_metadata.version.parse()?;
    let version: semver::Version = CONTRACT_VERSION.parse()?;

    if storage_version < version {
        cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    }

    Ok(Response::new())
}

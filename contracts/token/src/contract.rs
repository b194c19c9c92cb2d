use backed_base::{
    error::token::{ContractError, ContractResult},
    msg::{
        fee_receiver::ReceiveMsg,
        token::{
            CollateralNeededResponse, ConfigResponse, ExecuteMsg, FeeRecipientResponse,
            InstantiateMsg, MigrateMsg, QueryMsg,
        },
    },
    state::token::{
        Config, TokenInfo, BALANCES, CONFIG, FEE_DENOM, FEE_RATE, FEE_RECIPIENT, GOVERNANCE,
        MAX_FEE_RATE, PENDING_FEE, TOKEN_INFO, TOTAL_ISSUED,
    },
};
use backed_helpers::{
    answer::{attr_cw20, response},
    ledger,
};
use cosmwasm_std::{
    attr, ensure, ensure_eq, ensure_ne, entry_point, to_json_binary, Addr, Binary, CosmosMsg,
    Deps, DepsMut, Env, MessageInfo, Reply, Response, SubMsg, SubMsgResult, Uint128,
};

pub const CONTRACT_NAME: &str = concat!("crates.io:backed__", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const FEE_FORWARD_REPLY_ID: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> ContractResult<Response> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    ensure_ne!(
        msg.exchange_rate,
        Uint128::zero(),
        ContractError::InvalidExchangeRate {}
    );
    ensure_fee_rate(msg.fee_rate)?;

    let reference_asset = deps.api.addr_validate(&msg.reference_asset)?;
    let fee_recipient = match msg.fee_recipient {
        Some(fee_recipient) => deps.api.addr_validate(&fee_recipient)?,
        None => info.sender,
    };

    CONFIG.save(
        deps.storage,
        &Config {
            reference_asset: reference_asset.clone(),
            exchange_rate: msg.exchange_rate,
        },
    )?;
    TOKEN_INFO.save(
        deps.storage,
        &TokenInfo {
            name: msg.name.clone(),
            symbol: msg.symbol.clone(),
            decimals: msg.decimals,
        },
    )?;
    FEE_RATE.save(deps.storage, &msg.fee_rate)?;
    FEE_RECIPIENT.save(deps.storage, &fee_recipient)?;
    GOVERNANCE.save(deps.storage, &None)?;
    TOTAL_ISSUED.save(deps.storage, &Uint128::zero())?;

    Ok(response(
        "instantiate",
        CONTRACT_NAME,
        [
            attr("reference_asset", reference_asset),
            attr("exchange_rate", msg.exchange_rate.to_string()),
            attr("fee_rate", msg.fee_rate.to_string()),
            attr("fee_recipient", fee_recipient),
            attr("symbol", msg.symbol),
        ],
    ))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    match msg {
        QueryMsg::Config {} => {
            let config = CONFIG.load(deps.storage)?;
            Ok(to_json_binary(&ConfigResponse {
                reference_asset: config.reference_asset.into_string(),
                exchange_rate: config.exchange_rate,
                fee_rate: FEE_RATE.load(deps.storage)?,
                fee_recipient: FEE_RECIPIENT.load(deps.storage)?.into_string(),
                governance: GOVERNANCE.load(deps.storage)?.map(Addr::into_string),
            })?)
        }
        QueryMsg::FeeRecipient {} => Ok(to_json_binary(&FeeRecipientResponse {
            fee_recipient: FEE_RECIPIENT.load(deps.storage)?.into_string(),
        })?),
        QueryMsg::CollateralNeeded { amount } => {
            let config = CONFIG.load(deps.storage)?;
            let fee_rate = FEE_RATE.load(deps.storage)?;
            Ok(to_json_binary(&quote_cost(
                amount,
                config.exchange_rate,
                fee_rate,
            )?)?)
        }
        QueryMsg::Balance { address } => {
            let address = deps.api.addr_validate(&address)?;
            let balance = BALANCES
                .may_load(deps.storage, &address)?
                .unwrap_or_default();
            Ok(to_json_binary(&cw20::BalanceResponse { balance })?)
        }
        QueryMsg::TokenInfo {} => {
            let info = TOKEN_INFO.load(deps.storage)?;
            Ok(to_json_binary(&cw20::TokenInfoResponse {
                name: info.name,
                symbol: info.symbol,
                decimals: info.decimals,
                total_supply: TOTAL_ISSUED.load(deps.storage)?,
            })?)
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<Response> {
    cw_utils::nonpayable(&info)?;
    match msg {
        ExecuteMsg::Mint { receiver, amount } => execute_mint(deps, env, info, receiver, amount),
        ExecuteMsg::Burn { amount } => execute_burn(deps, info, amount),
        ExecuteMsg::Transfer { recipient, amount } => {
            execute_transfer(deps, info, recipient, amount)
        }
        ExecuteMsg::UpdateFeeRate { fee_rate } => execute_update_fee_rate(deps, info, fee_rate),
        ExecuteMsg::UpdateReceiver { new_recipient } => {
            execute_update_receiver(deps, info, new_recipient)
        }
        ExecuteMsg::SetGovernance { governance } => {
            execute_set_governance(deps, info, governance)
        }
    }
}

/// Reference asset needed to mint `amount` units. Each step rounds down:
/// `base = amount * exchange_rate`, `fee = base * fee_rate / FEE_DENOM`.
pub fn quote_cost(
    amount: Uint128,
    exchange_rate: Uint128,
    fee_rate: Uint128,
) -> ContractResult<CollateralNeededResponse> {
    let base_cost = amount.checked_mul(exchange_rate)?;
    let fee_cost = base_cost.multiply_ratio(fee_rate, FEE_DENOM);
    Ok(CollateralNeededResponse {
        base_cost,
        fee_cost,
        total: base_cost.checked_add(fee_cost)?,
    })
}

fn ensure_fee_rate(fee_rate: Uint128) -> ContractResult<()> {
    ensure!(
        fee_rate <= Uint128::new(MAX_FEE_RATE),
        ContractError::FeeRateTooHigh {
            fee_rate,
            max_fee_rate: Uint128::new(MAX_FEE_RATE),
        }
    );
    Ok(())
}

fn ensure_fee_recipient(deps: Deps, sender: &Addr) -> ContractResult<()> {
    let fee_recipient = FEE_RECIPIENT.load(deps.storage)?;
    ensure_eq!(*sender, fee_recipient, ContractError::Unauthorized {});
    Ok(())
}

fn execute_mint(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    receiver: String,
    amount: Uint128,
) -> ContractResult<Response> {
    ensure_ne!(amount, Uint128::zero(), ContractError::NothingToMint {});
    let receiver = deps.api.addr_validate(&receiver)?;

    let config = CONFIG.load(deps.storage)?;
    let fee_recipient = FEE_RECIPIENT.load(deps.storage)?;
    let cost = quote_cost(amount, config.exchange_rate, FEE_RATE.load(deps.storage)?)?;
    let asset = &config.reference_asset;

    let allowance = ledger::query_allowance(
        &deps.querier,
        &env.block,
        asset,
        &info.sender,
        &env.contract.address,
    )?;
    ensure!(
        allowance >= cost.total,
        ContractError::InsufficientAllowance {
            required: cost.total,
            available: allowance,
        }
    );
    let balance = ledger::query_balance(&deps.querier, asset, &info.sender)?;
    ensure!(
        balance >= cost.total,
        ContractError::InsufficientBalance {
            required: cost.total,
            available: balance,
        }
    );

    let pull: CosmosMsg =
        ledger::transfer_from_msg(asset, &info.sender, &env.contract.address, cost.total)?;
    let mut messages = vec![SubMsg::new(pull)];
    if !cost.fee_cost.is_zero() {
        messages.push(fee_transfer_msg(
            deps.branch(),
            asset,
            &fee_recipient,
            cost.fee_cost,
        )?);
    }

    BALANCES.update(deps.storage, &receiver, |balance| -> ContractResult<_> {
        Ok(balance.unwrap_or_default().checked_add(amount)?)
    })?;
    TOTAL_ISSUED.update(deps.storage, |total| -> ContractResult<_> {
        Ok(total.checked_add(amount)?)
    })?;

    Ok(response(
        "execute-mint",
        CONTRACT_NAME,
        [
            attr("receiver", receiver),
            attr("amount", amount.to_string()),
            attr_cw20("base_cost", cost.base_cost, asset),
            attr_cw20("fee_cost", cost.fee_cost, asset),
            attr("fee_recipient", fee_recipient),
        ],
    )
    .add_submessages(messages))
}

/// Contract recipients get the fee through a cw20 `Send` so they can book the
/// deposit; plain accounts get a `Transfer`. A contract that rejects the hook
/// still gets the fee through the reply fallback.
fn fee_transfer_msg(
    deps: DepsMut,
    asset: &Addr,
    fee_recipient: &Addr,
    amount: Uint128,
) -> ContractResult<SubMsg> {
    if ledger::is_contract(&deps.querier, fee_recipient) {
        PENDING_FEE.save(deps.storage, &amount)?;
        let send: CosmosMsg = ledger::send_msg(
            asset,
            fee_recipient,
            amount,
            to_json_binary(&ReceiveMsg::Deposit {})?,
        )?;
        Ok(SubMsg::reply_always(send, FEE_FORWARD_REPLY_ID))
    } else {
        let transfer: CosmosMsg = ledger::transfer_msg(asset, fee_recipient, amount)?;
        Ok(SubMsg::new(transfer))
    }
}

fn execute_burn(deps: DepsMut, info: MessageInfo, amount: Uint128) -> ContractResult<Response> {
    ensure_ne!(amount, Uint128::zero(), ContractError::NothingToBurn {});

    let config = CONFIG.load(deps.storage)?;
    let balance = BALANCES
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    ensure!(
        balance >= amount,
        ContractError::InsufficientBalance {
            required: amount,
            available: balance,
        }
    );
    let payout = amount.checked_mul(config.exchange_rate)?;

    BALANCES.save(deps.storage, &info.sender, &(balance - amount))?;
    TOTAL_ISSUED.update(deps.storage, |total| -> ContractResult<_> {
        Ok(total.checked_sub(amount)?)
    })?;

    let transfer: CosmosMsg =
        ledger::transfer_msg(&config.reference_asset, &info.sender, payout)?;
    Ok(response(
        "execute-burn",
        CONTRACT_NAME,
        [
            attr("holder", info.sender),
            attr("amount", amount.to_string()),
            attr_cw20("payout", payout, config.reference_asset),
        ],
    )
    .add_message(transfer))
}

fn execute_transfer(
    deps: DepsMut,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> ContractResult<Response> {
    ensure_ne!(amount, Uint128::zero(), ContractError::NothingToTransfer {});
    let recipient = deps.api.addr_validate(&recipient)?;

    let balance = BALANCES
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    ensure!(
        balance >= amount,
        ContractError::InsufficientBalance {
            required: amount,
            available: balance,
        }
    );
    BALANCES.save(deps.storage, &info.sender, &(balance - amount))?;
    BALANCES.update(deps.storage, &recipient, |balance| -> ContractResult<_> {
        Ok(balance.unwrap_or_default().checked_add(amount)?)
    })?;

    Ok(response(
        "execute-transfer",
        CONTRACT_NAME,
        [
            attr("from", info.sender),
            attr("to", recipient),
            attr("amount", amount.to_string()),
        ],
    ))
}

fn execute_update_fee_rate(
    deps: DepsMut,
    info: MessageInfo,
    fee_rate: Uint128,
) -> ContractResult<Response> {
    ensure_fee_recipient(deps.as_ref(), &info.sender)?;
    ensure_fee_rate(fee_rate)?;
    FEE_RATE.save(deps.storage, &fee_rate)?;
    Ok(response(
        "execute-update-fee-rate",
        CONTRACT_NAME,
        [attr("fee_rate", fee_rate.to_string())],
    ))
}

fn execute_update_receiver(
    deps: DepsMut,
    info: MessageInfo,
    new_recipient: String,
) -> ContractResult<Response> {
    let previous_recipient = FEE_RECIPIENT.load(deps.storage)?;
    let governance = GOVERNANCE.load(deps.storage)?;
    ensure!(
        info.sender == previous_recipient || governance.as_ref() == Some(&info.sender),
        ContractError::Unauthorized {}
    );
    let new_recipient = deps.api.addr_validate(&new_recipient)?;
    FEE_RECIPIENT.save(deps.storage, &new_recipient)?;
    Ok(response(
        "execute-update-receiver",
        CONTRACT_NAME,
        [
            attr("sender", info.sender),
            attr("previous_recipient", previous_recipient),
            attr("fee_recipient", new_recipient),
        ],
    ))
}

fn execute_set_governance(
    deps: DepsMut,
    info: MessageInfo,
    governance: String,
) -> ContractResult<Response> {
    ensure_fee_recipient(deps.as_ref(), &info.sender)?;
    if let Some(current) = GOVERNANCE.load(deps.storage)? {
        return Err(ContractError::GovernanceAlreadySet {
            governance: current.into_string(),
        });
    }
    let governance = deps.api.addr_validate(&governance)?;
    GOVERNANCE.save(deps.storage, &Some(governance.clone()))?;
    Ok(response(
        "execute-set-governance",
        CONTRACT_NAME,
        [attr("governance", governance)],
    ))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> ContractResult<Response> {
    match msg.id {
        FEE_FORWARD_REPLY_ID => {
            let amount = PENDING_FEE.load(deps.storage)?;
            PENDING_FEE.remove(deps.storage);
            match msg.result {
                SubMsgResult::Ok(_) => Ok(Response::new()),
                SubMsgResult::Err(error) => {
                    let config = CONFIG.load(deps.storage)?;
                    let fee_recipient = FEE_RECIPIENT.load(deps.storage)?;
                    let transfer: CosmosMsg =
                        ledger::transfer_msg(&config.reference_asset, &fee_recipient, amount)?;
                    Ok(response(
                        "reply-fee-forward",
                        CONTRACT_NAME,
                        [
                            attr("fee_recipient", fee_recipient),
                            attr_cw20("amount", amount, config.reference_asset),
                            attr("deposit_hook_error", error),
                        ],
                    )
                    .add_message(transfer))
                }
            }
        }
        id => Err(ContractError::UnknownReplyId { id }),
    }
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

#![cfg(not(target_arch = "wasm32"))]

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::testing::{MockApi, MockQuerier, MockStorage};
use cosmwasm_std::{
    from_json, to_json_binary, Binary, ContractResult, Empty, OwnedDeps, Querier, QuerierResult,
    QueryRequest, SystemError, SystemResult, Uint128, WasmQuery,
};
use cw20::{AllowanceResponse, BalanceResponse, Cw20QueryMsg, Expiration};

pub const MOCK_CONTRACT_ADDR: &str = "cosmos2contract";

/// Shape of the wasm contract-info answer; only its presence matters.
#[cw_serde]
struct MockContractInfo {
    code_id: u64,
    creator: String,
    admin: Option<String>,
    pinned: bool,
    ibc_port: Option<String>,
}

/// Querier that answers cw20 balance/allowance queries from in-memory books
/// and canned smart-query responses for any other contract.
pub struct LedgerMockQuerier {
    base: MockQuerier,
    balances: HashMap<(String, String), Uint128>,
    allowances: HashMap<(String, String, String), (Uint128, Expiration)>,
    smart_responses: HashMap<String, Binary>,
    contracts: HashSet<String>,
}

impl Querier for LedgerMockQuerier {
    fn raw_query(&self, bin_request: &[u8]) -> QuerierResult {
        let request: QueryRequest<Empty> = match from_json(bin_request) {
            Ok(v) => v,
            Err(e) => {
                return QuerierResult::Err(SystemError::InvalidRequest {
                    error: format!("Parsing query request: {}", e),
                    request: bin_request.into(),
                });
            }
        };
        self.handle_query(&request)
    }
}

impl LedgerMockQuerier {
    pub fn new(base: MockQuerier) -> Self {
        LedgerMockQuerier {
            base,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            smart_responses: HashMap::new(),
            contracts: HashSet::from([MOCK_CONTRACT_ADDR.to_string()]),
        }
    }

    pub fn handle_query(&self, request: &QueryRequest<Empty>) -> QuerierResult {
        match request {
            QueryRequest::Wasm(WasmQuery::Smart { contract_addr, msg }) => {
                if let Some(response) = self.smart_responses.get(contract_addr) {
                    return SystemResult::Ok(ContractResult::Ok(response.clone()));
                }
                match from_json::<Cw20QueryMsg>(msg) {
                    Ok(query) => self.handle_cw20_query(contract_addr, query),
                    Err(_) => SystemResult::Err(SystemError::UnsupportedRequest {
                        kind: format!("Wasm contract {} query is not mocked", contract_addr),
                    }),
                }
            }
            QueryRequest::Wasm(WasmQuery::ContractInfo { contract_addr }) => {
                if !self.contracts.contains(contract_addr) {
                    return SystemResult::Err(SystemError::NoSuchContract {
                        addr: contract_addr.to_string(),
                    });
                }
                reply(&MockContractInfo {
                    code_id: 1,
                    creator: "creator".to_string(),
                    admin: None,
                    pinned: false,
                    ibc_port: None,
                })
            }
            _ => self.base.handle_query(request),
        }
    }

    fn handle_cw20_query(&self, asset: &str, query: Cw20QueryMsg) -> QuerierResult {
        match query {
            Cw20QueryMsg::Balance { address } => reply(&BalanceResponse {
                balance: self
                    .balances
                    .get(&(asset.to_string(), address))
                    .copied()
                    .unwrap_or_default(),
            }),
            Cw20QueryMsg::Allowance { owner, spender } => {
                let (allowance, expires) = self
                    .allowances
                    .get(&(asset.to_string(), owner, spender))
                    .cloned()
                    .unwrap_or((Uint128::zero(), Expiration::Never {}));
                reply(&AllowanceResponse { allowance, expires })
            }
            other => SystemResult::Err(SystemError::UnsupportedRequest {
                kind: format!("cw20 query is not mocked: {:?}", other),
            }),
        }
    }

    pub fn set_cw20_balance(&mut self, asset: &str, address: &str, amount: u128) {
        self.balances.insert(
            (asset.to_string(), address.to_string()),
            Uint128::new(amount),
        );
    }

    pub fn set_cw20_allowance(
        &mut self,
        asset: &str,
        owner: &str,
        spender: &str,
        amount: u128,
        expires: Expiration,
    ) {
        self.allowances.insert(
            (asset.to_string(), owner.to_string(), spender.to_string()),
            (Uint128::new(amount), expires),
        );
    }

    /// Answers every smart query to `contract_addr` with `response`.
    pub fn add_smart_response(&mut self, contract_addr: &str, response: Binary) {
        self.smart_responses
            .insert(contract_addr.to_string(), response);
        self.contracts.insert(contract_addr.to_string());
    }

    pub fn register_contract(&mut self, contract_addr: &str) {
        self.contracts.insert(contract_addr.to_string());
    }
}

fn reply<T: serde::Serialize>(value: &T) -> QuerierResult {
    match to_json_binary(value) {
        Ok(binary) => SystemResult::Ok(ContractResult::Ok(binary)),
        Err(e) => SystemResult::Err(SystemError::InvalidResponse {
            error: e.to_string(),
            response: Binary::default(),
        }),
    }
}

pub fn mock_dependencies() -> OwnedDeps<MockStorage, MockApi, LedgerMockQuerier> {
    OwnedDeps {
        storage: MockStorage::default(),
        api: MockApi::default(),
        querier: LedgerMockQuerier::new(MockQuerier::new(&[])),
        custom_query_type: PhantomData,
    }
}

use backed_base::{
    error::token::ContractError as TokenError,
    msg::{
        fee_receiver::{ExecuteMsg, InstantiateMsg, QueryMsg},
        token::{
            ExecuteMsg as TokenExecuteMsg, FeeRecipientResponse,
            InstantiateMsg as TokenInstantiateMsg, QueryMsg as TokenQueryMsg,
        },
    },
};
use cosmwasm_std::{Addr, Empty, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_multi_test::{App, Contract, ContractWrapper, Executor};

const DEPLOYER: &str = "deployer";
const MINTER: &str = "minter";
const ALICE: &str = "alice";
const BOB: &str = "bob";
const XAVIER: &str = "xavier";
const YVONNE: &str = "yvonne";

const EXCHANGE_RATE: u128 = 1_000_000_000_000_000;
const FEE_RATE: u128 = 1_000_000;
const MINTER_FUNDS: u128 = 1_000_000_000_000_000_000_000;

fn cw20_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

fn token_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        backed_token::contract::execute,
        backed_token::contract::instantiate,
        backed_token::contract::query,
    )
    .with_reply(backed_token::contract::reply);
    Box::new(contract)
}

fn fee_receiver_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        crate::contract::execute,
        crate::contract::instantiate,
        crate::contract::query,
    );
    Box::new(contract)
}

struct Suite {
    app: App,
    asset: Addr,
    token: Addr,
    fee_receiver: Addr,
}

impl Suite {
    /// Asset, token and fee receiver deployed; the token still pays fees to the deployer.
    fn new() -> Self {
        let mut app = App::default();

        let cw20_id = app.store_code(cw20_contract());
        let asset = app
            .instantiate_contract(
                cw20_id,
                Addr::unchecked(DEPLOYER),
                &cw20_base::msg::InstantiateMsg {
                    name: "Reference Asset".to_string(),
                    symbol: "REF".to_string(),
                    decimals: 18,
                    initial_balances: vec![Cw20Coin {
                        address: MINTER.to_string(),
                        amount: Uint128::new(MINTER_FUNDS),
                    }],
                    mint: None,
                    marketing: None,
                },
                &[],
                "reference asset",
                None,
            )
            .unwrap();

        let token_id = app.store_code(token_contract());
        let token = app
            .instantiate_contract(
                token_id,
                Addr::unchecked(DEPLOYER),
                &TokenInstantiateMsg {
                    reference_asset: asset.to_string(),
                    exchange_rate: Uint128::new(EXCHANGE_RATE),
                    fee_rate: Uint128::new(FEE_RATE),
                    fee_recipient: None,
                    name: "Backed Token".to_string(),
                    symbol: "BKD".to_string(),
                    decimals: 3,
                },
                &[],
                "backed token",
                None,
            )
            .unwrap();

        let fee_receiver_id = app.store_code(fee_receiver_contract());
        let fee_receiver = app
            .instantiate_contract(
                fee_receiver_id,
                Addr::unchecked(DEPLOYER),
                &InstantiateMsg {
                    token: token.to_string(),
                    beneficiaries: vec![ALICE.to_string(), BOB.to_string()],
                    weights: vec![200_000, 800_000],
                },
                &[],
                "fee receiver",
                None,
            )
            .unwrap();

        Suite {
            app,
            asset,
            token,
            fee_receiver,
        }
    }

    /// Deployment with the fee receiver installed as the token's fee recipient
    /// and governance.
    fn with_fee_receiver() -> Self {
        let mut suite = Suite::new();
        let fee_receiver = suite.fee_receiver.to_string();
        suite
            .app
            .execute_contract(
                Addr::unchecked(DEPLOYER),
                suite.token.clone(),
                &TokenExecuteMsg::SetGovernance {
                    governance: fee_receiver.clone(),
                },
                &[],
            )
            .unwrap();
        suite.set_fee_recipient(DEPLOYER, &fee_receiver);
        suite
    }

    fn set_fee_recipient(&mut self, sender: &str, new_recipient: &str) {
        self.app
            .execute_contract(
                Addr::unchecked(sender),
                self.token.clone(),
                &TokenExecuteMsg::UpdateReceiver {
                    new_recipient: new_recipient.to_string(),
                },
                &[],
            )
            .unwrap();
    }

    fn deploy_cw20(&mut self, symbol: &str) -> Addr {
        let cw20_id = self.app.store_code(cw20_contract());
        self.app
            .instantiate_contract(
                cw20_id,
                Addr::unchecked(DEPLOYER),
                &cw20_base::msg::InstantiateMsg {
                    name: format!("{} Asset", symbol),
                    symbol: symbol.to_string(),
                    decimals: 6,
                    initial_balances: vec![Cw20Coin {
                        address: MINTER.to_string(),
                        amount: Uint128::new(1_000),
                    }],
                    mint: None,
                    marketing: None,
                },
                &[],
                symbol,
                None,
            )
            .unwrap()
    }

    fn approve(&mut self, amount: u128) {
        self.app
            .execute_contract(
                Addr::unchecked(MINTER),
                self.asset.clone(),
                &Cw20ExecuteMsg::IncreaseAllowance {
                    spender: self.token.to_string(),
                    amount: Uint128::new(amount),
                    expires: None,
                },
                &[],
            )
            .unwrap();
    }

    fn mint(&mut self, amount: u128) -> anyhow::Result<()> {
        self.app
            .execute_contract(
                Addr::unchecked(MINTER),
                self.token.clone(),
                &TokenExecuteMsg::Mint {
                    receiver: MINTER.to_string(),
                    amount: Uint128::new(amount),
                },
                &[],
            )
            .map(|_| ())
    }

    fn redeem(&mut self, account: &str) {
        self.app
            .execute_contract(
                Addr::unchecked(account),
                self.fee_receiver.clone(),
                &ExecuteMsg::RedeemAll {
                    account: account.to_string(),
                },
                &[],
            )
            .unwrap();
    }

    fn propose(&mut self, voter: &str, candidate: &str) -> anyhow::Result<()> {
        self.app
            .execute_contract(
                Addr::unchecked(voter),
                self.fee_receiver.clone(),
                &ExecuteMsg::ProposeToUpdateReceiver {
                    candidate: candidate.to_string(),
                },
                &[],
            )
            .map(|_| ())
    }

    fn asset_balance(&self, address: &str) -> u128 {
        let response: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.asset,
                &Cw20QueryMsg::Balance {
                    address: address.to_string(),
                },
            )
            .unwrap();
        response.balance.u128()
    }

    fn token_balance(&self, address: &str) -> u128 {
        let response: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.token,
                &TokenQueryMsg::Balance {
                    address: address.to_string(),
                },
            )
            .unwrap();
        response.balance.u128()
    }

    fn fee_recipient(&self) -> String {
        let response: FeeRecipientResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.token, &TokenQueryMsg::FeeRecipient {})
            .unwrap();
        response.fee_recipient
    }

    fn total_received(&self) -> u128 {
        let total: Uint128 = self
            .app
            .wrap()
            .query_wasm_smart(&self.fee_receiver, &QueryMsg::TotalReceived {})
            .unwrap();
        total.u128()
    }
}

#[test]
fn mint_forwards_fee_into_receiver() {
    let mut suite = Suite::with_fee_receiver();
    let fee_receiver = suite.fee_receiver.to_string();
    assert_eq!(suite.fee_recipient(), fee_receiver);

    suite.approve(10_100_000_000_000_000_000);
    suite.mint(10_000).unwrap();

    assert_eq!(suite.token_balance(MINTER), 10_000);
    assert_eq!(
        suite.asset_balance(suite.token.as_str()),
        10_000_000_000_000_000_000
    );
    assert_eq!(suite.asset_balance(&fee_receiver), 100_000_000_000_000_000);
    assert_eq!(suite.total_received(), 100_000_000_000_000_000);
    assert_eq!(
        suite.asset_balance(MINTER),
        MINTER_FUNDS - 10_100_000_000_000_000_000
    );
}

#[test]
fn beneficiaries_redeem_their_shares() {
    let mut suite = Suite::with_fee_receiver();
    let fee_receiver = suite.fee_receiver.to_string();
    suite.approve(10_100_000_000_000_000_000);
    suite.mint(10_000).unwrap();

    suite.redeem(ALICE);
    assert_eq!(suite.asset_balance(ALICE), 20_000_000_000_000_000);
    suite.redeem(ALICE);
    assert_eq!(suite.asset_balance(ALICE), 20_000_000_000_000_000);

    suite.redeem(BOB);
    assert_eq!(suite.asset_balance(BOB), 80_000_000_000_000_000);
    assert_eq!(suite.asset_balance(&fee_receiver), 0);

    let err = suite
        .app
        .execute_contract(
            Addr::unchecked(DEPLOYER),
            suite.fee_receiver.clone(),
            &ExecuteMsg::RedeemAll {
                account: BOB.to_string(),
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "unauthorized");
}

#[test]
fn burn_returns_collateral_without_fee() {
    let mut suite = Suite::with_fee_receiver();
    suite.approve(10_100_000_000_000_000_000);
    suite.mint(10_000).unwrap();
    let before = suite.asset_balance(MINTER);

    suite
        .app
        .execute_contract(
            Addr::unchecked(MINTER),
            suite.token.clone(),
            &TokenExecuteMsg::Burn {
                amount: Uint128::new(4_000),
            },
            &[],
        )
        .unwrap();

    assert_eq!(suite.token_balance(MINTER), 6_000);
    assert_eq!(
        suite.asset_balance(MINTER),
        before + 4_000_000_000_000_000_000
    );
    assert_eq!(
        suite.asset_balance(suite.token.as_str()),
        6_000_000_000_000_000_000
    );
}

#[test]
fn mint_without_allowance_changes_nothing() {
    let mut suite = Suite::with_fee_receiver();
    let fee_receiver = suite.fee_receiver.to_string();
    suite.approve(10_099_999_999_999_999_999);

    let err = suite.mint(10_000).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        TokenError::InsufficientAllowance {
            required: Uint128::new(10_100_000_000_000_000_000),
            available: Uint128::new(10_099_999_999_999_999_999),
        }
        .to_string()
    );
    assert_eq!(suite.token_balance(MINTER), 0);
    assert_eq!(suite.asset_balance(MINTER), MINTER_FUNDS);
    assert_eq!(suite.asset_balance(&fee_receiver), 0);
    assert_eq!(suite.total_received(), 0);
}

#[test]
fn unanimous_vote_moves_fee_recipient() {
    let mut suite = Suite::with_fee_receiver();

    suite.propose(ALICE, XAVIER).unwrap();
    suite.propose(BOB, YVONNE).unwrap();
    assert_eq!(suite.fee_recipient(), suite.fee_receiver.to_string());

    suite.propose(BOB, XAVIER).unwrap();
    assert_eq!(suite.fee_recipient(), XAVIER);

    // fees now reach a wallet directly
    suite.approve(1_010_000_000_000_000_000);
    suite.mint(1_000).unwrap();
    assert_eq!(suite.asset_balance(XAVIER), 10_000_000_000_000_000);
    assert_eq!(suite.total_received(), 0);
}

#[test]
fn consecutive_votes_keep_moving_fee_recipient() {
    let mut suite = Suite::with_fee_receiver();

    suite.propose(ALICE, XAVIER).unwrap();
    suite.propose(BOB, XAVIER).unwrap();
    assert_eq!(suite.fee_recipient(), XAVIER);

    suite.propose(ALICE, YVONNE).unwrap();
    assert_eq!(suite.fee_recipient(), XAVIER);
    suite.propose(BOB, YVONNE).unwrap();
    assert_eq!(suite.fee_recipient(), YVONNE);

    // back to the fee receiver itself
    let fee_receiver = suite.fee_receiver.to_string();
    suite.propose(ALICE, &fee_receiver).unwrap();
    suite.propose(BOB, &fee_receiver).unwrap();
    assert_eq!(suite.fee_recipient(), fee_receiver);

    suite.approve(1_010_000_000_000_000_000);
    suite.mint(1_000).unwrap();
    assert_eq!(suite.total_received(), 10_000_000_000_000_000);
}

#[test]
fn contract_recipient_without_hook_still_gets_fee() {
    let mut suite = Suite::new();
    let vault = suite.deploy_cw20("VLT");
    suite.set_fee_recipient(DEPLOYER, vault.as_str());

    suite.approve(1_010_000_000_000_000_000);
    suite.mint(1_000).unwrap();

    assert_eq!(suite.token_balance(MINTER), 1_000);
    assert_eq!(suite.asset_balance(vault.as_str()), 10_000_000_000_000_000);
    assert_eq!(
        suite.asset_balance(suite.token.as_str()),
        1_000_000_000_000_000_000
    );
}

#[test]
fn unanimous_vote_without_authority_reverts() {
    let mut suite = Suite::new();
    assert_eq!(suite.fee_recipient(), DEPLOYER);

    suite.propose(ALICE, XAVIER).unwrap();
    let err = suite.propose(BOB, XAVIER).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        TokenError::Unauthorized {}.to_string()
    );

    let tally: u64 = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.fee_receiver,
            &QueryMsg::Tally {
                candidate: XAVIER.to_string(),
            },
        )
        .unwrap();
    assert_eq!(tally, 200_000);
    assert_eq!(suite.fee_recipient(), DEPLOYER);
}

#[test]
fn deposit_of_foreign_cw20_is_rejected() {
    let mut suite = Suite::with_fee_receiver();
    let foreign = suite.deploy_cw20("FRN");

    let err = suite
        .app
        .execute_contract(
            Addr::unchecked(MINTER),
            foreign,
            &Cw20ExecuteMsg::Send {
                contract: suite.fee_receiver.to_string(),
                amount: Uint128::new(1_000),
                msg: cosmwasm_std::to_json_binary(
                    &backed_base::msg::fee_receiver::ReceiveMsg::Deposit {},
                )
                .unwrap(),
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "unauthorized");
    assert_eq!(suite.total_received(), 0);
}

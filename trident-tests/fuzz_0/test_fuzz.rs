use std::collections::BTreeMap;

use fuzz_accounts::*;
use kipu_bank::{
    constants::{NATIVE_ASSET, NATIVE_DECIMALS},
    ledger::{stage_deposit, stage_withdraw, AssetPosition, Staged},
    math::usd_value,
    oracle::{PriceOracle, UsdPrice},
};
use trident_fuzz::fuzzing::*;
mod fuzz_accounts;

const USD: u64 = 1_000_000;
const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
const DEPOSITORS: u8 = 4;

/// Fixed-price oracle with 8 decimals, as most USD feeds quote
struct TrackedPrice(u64);

impl PriceOracle for TrackedPrice {
    fn read_price(&self, _asset: &anchor_lang::prelude::Pubkey) -> anchor_lang::Result<UsdPrice> {
        Ok(UsdPrice {
            answer: self.0,
            decimals: 8,
        })
    }
}

/// Bank state tracking for invariant checks
#[derive(Default, Clone)]
struct BankTracker {
    initialized: bool,
    bank_cap_usd: u64,
    total_usd_value: u64,
    position: AssetPosition,
    price: u64,
    balances: BTreeMap<u8, u64>,
}

impl BankTracker {
    fn apply(&mut self, depositor: u8, staged: Staged) {
        self.balances.insert(depositor, staged.balance);
        self.position = staged.position;
        self.total_usd_value = staged.total_usd_value;
    }

    fn balance(&self, depositor: u8) -> u64 {
        self.balances.get(&depositor).copied().unwrap_or_default()
    }
}

#[derive(FuzzTestMethods)]
struct FuzzTest {
    trident: Trident,
    fuzz_accounts: AccountAddresses,
    bank_tracker: BankTracker,
}

#[flow_executor]
impl FuzzTest {
    fn new() -> Self {
        Self {
            trident: Trident::default(),
            fuzz_accounts: AccountAddresses::default(),
            bank_tracker: BankTracker::default(),
        }
    }

    #[init]
    fn start(&mut self) {
        self.bank_tracker = BankTracker::default();
    }

    /// Initialize bank: $1M cap, native asset at $2,000
    #[flow]
    fn flow_initialize(&mut self) {
        if self.bank_tracker.initialized {
            return;
        }

        self.bank_tracker.initialized = true;
        self.bank_tracker.bank_cap_usd = 1_000_000 * USD;
        // $2,000 with 8 decimals
        self.bank_tracker.price = 200_000_000_000;
        self.bank_tracker.position = AssetPosition {
            decimals: NATIVE_DECIMALS,
            ..Default::default()
        };
    }

    /// Test deposit invariants with fuzzed values
    #[flow]
    fn flow_deposit(&mut self) {
        if !self.bank_tracker.initialized {
            return;
        }

        let depositor = rand::random::<u8>() % DEPOSITORS;
        let amount: u64 = rand::random::<u64>() % (200 * LAMPORTS_PER_SOL);

        let balance_before = self.bank_tracker.balance(depositor);

        let result = stage_deposit(
            self.bank_tracker.bank_cap_usd,
            self.bank_tracker.total_usd_value,
            &NATIVE_ASSET,
            self.bank_tracker.position,
            balance_before,
            amount,
            &TrackedPrice(self.bank_tracker.price),
        );

        match result {
            Ok(staged) => {
                assert!(amount > 0, "Invariant: zero deposits must be rejected");
                assert_eq!(
                    staged.balance,
                    balance_before + amount,
                    "Invariant: deposit credits exactly the amount"
                );
                assert!(
                    staged.total_usd_value <= self.bank_tracker.bank_cap_usd,
                    "Invariant: accepted deposit stays within the cap"
                );
                self.bank_tracker.apply(depositor, staged);
            }
            Err(_) => {
                let tracker = &self.bank_tracker;
                let other_assets_usd = tracker.total_usd_value - tracker.position.usd_value;
                let over_cap = usd_value(
                    tracker.position.total_holdings + amount,
                    tracker.price,
                    8,
                    NATIVE_DECIMALS,
                )
                .map_or(true, |value| {
                    value.saturating_add(other_assets_usd) > tracker.bank_cap_usd
                });

                assert!(
                    amount == 0 || over_cap,
                    "Invariant: deposits fail only when empty or over the cap"
                );
            }
        }
    }

    /// Test withdraw invariants with fuzzed values
    #[flow]
    fn flow_withdraw(&mut self) {
        if !self.bank_tracker.initialized {
            return;
        }

        let depositor = rand::random::<u8>() % DEPOSITORS;
        let balance_before = self.bank_tracker.balance(depositor);

        // Occasionally ask for more than the balance
        let amount = rand::random::<u64>() % (balance_before.saturating_add(2));

        let result = stage_withdraw(
            self.bank_tracker.total_usd_value,
            self.bank_tracker.position,
            balance_before,
            amount,
        );

        match result {
            Ok(staged) => {
                assert!(amount > 0 && amount <= balance_before);
                assert_eq!(staged.balance, balance_before - amount);
                assert!(
                    staged.total_usd_value <= self.bank_tracker.total_usd_value,
                    "Invariant: withdrawals never raise the bank valuation"
                );
                self.bank_tracker.apply(depositor, staged);
            }
            Err(_) => {
                assert!(amount == 0 || amount > balance_before);
            }
        }
    }

    /// Move the oracle price up or down by up to 50%
    #[flow]
    fn flow_price_change(&mut self) {
        if !self.bank_tracker.initialized {
            return;
        }

        let price = self.bank_tracker.price;
        let delta = rand::random::<u64>() % (price / 2 + 1);
        self.bank_tracker.price = if rand::random::<bool>() {
            price.saturating_add(delta)
        } else {
            price.saturating_sub(delta).max(1)
        };
    }

    #[end]
    fn end(&mut self) {
        if self.bank_tracker.initialized {
            let total_balances: u64 = self.bank_tracker.balances.values().sum();

            // Invariant: custody matches the sum of vault entries
            assert_eq!(
                self.bank_tracker.position.total_holdings, total_balances,
                "Invariant: holdings diverged from vault entries"
            );

            // Invariant: a single-asset bank's total is that asset's value
            assert_eq!(
                self.bank_tracker.total_usd_value, self.bank_tracker.position.usd_value,
                "Invariant: bank valuation diverged from asset valuation"
            );

            if total_balances == 0 {
                assert_eq!(self.bank_tracker.total_usd_value, 0);
            }
        }
    }
}

fn main() {
    // Run 1000 iterations with up to 100 flows per iteration
    FuzzTest::fuzz(1000, 100);
}

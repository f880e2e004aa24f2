//! Random operation sequences against a seeded deployment
//!
//! Increase cases: PROPTEST_CASES=1000 cargo test -p singularity-integration-tests
//!
//! After every step:
//! - a failed step left the deployment untouched
//! - reserved fees fit in assets and each pool holds exactly its assets
//! - price-per-share never went down

use proptest::prelude::*;
use singularity_common::{Address, U256};
use singularity_integration_tests::*;

#[derive(Debug, Clone)]
enum Action {
    Add { eth_pool: bool, amount: u64 },
    Remove { eth_pool: bool, percent: u64 },
    Swap { eth_in: bool, amount: u64 },
    CollectFees,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        1 => (any::<bool>(), 1u64..5_000).prop_map(|(eth_pool, amount)| Action::Add { eth_pool, amount }),
        1 => (any::<bool>(), 1u64..=50).prop_map(|(eth_pool, percent)| Action::Remove { eth_pool, percent }),
        3 => (any::<bool>(), 1u64..20_000).prop_map(|(eth_in, amount)| Action::Swap { eth_in, amount }),
        1 => Just(Action::CollectFees),
    ]
}

/// `dollars` worth of the pool's token, capped by what the trader holds
fn scaled(w: &World, eth_pool: bool, dollars: u64) -> U256 {
    let (token, amount) = if eth_pool {
        (w.weth, eth(dollars) / U256::from(2_000u64))
    } else {
        (w.usdc, usdc(dollars))
    };
    amount.min(w.balance(token, trader())).max(U256::from(1u64))
}

fn apply(w: &mut World, action: &Action) -> singularity_common::Result<()> {
    let (usdc_token, weth) = (w.usdc, w.weth);
    let token = |eth_pool: bool| if eth_pool { weth } else { usdc_token };
    match *action {
        Action::Add { eth_pool, amount } => {
            let amount = scaled(w, eth_pool, amount);
            w.add(trader(), token(eth_pool), amount).map(|_| ())
        }
        Action::Remove { eth_pool, percent } => {
            let shares = w.pool(token(eth_pool)).claim.balance_of(lp()) * U256::from(percent)
                / U256::from(100u64);
            w.remove(lp(), token(eth_pool), shares).map(|_| ())
        }
        Action::Swap { eth_in, amount } => {
            let amount = scaled(w, eth_in, amount);
            w.swap(trader(), token(eth_in), token(!eth_in), amount).map(|_| ())
        }
        Action::CollectFees => {
            let env = env(admin());
            w.d.transact(|d| d.factory.collect_fees(&env, &mut d.bank)).map(|_| ())
        }
    }
}

fn price_per_share(w: &World, token: Address) -> U256 {
    w.pool(token).price_per_share().unwrap()
}

fn world() -> World {
    let mut w = World::new();
    w.seed(usdc(20_000), eth(10));
    let (usdc_token, weth) = (w.usdc, w.weth);
    w.fund(trader(), usdc_token, usdc(1_000_000));
    w.fund(trader(), weth, eth(500));
    w
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_solvency_and_share_price(actions in prop::collection::vec(action_strategy(), 1..40)) {
        let mut w = world();
        let tokens = [w.usdc, w.weth];

        for action in &actions {
            let before = w.d.clone();
            let pps_before: Vec<U256> = tokens.iter().map(|t| price_per_share(&w, *t)).collect();

            if apply(&mut w, action).is_err() {
                prop_assert_eq!(&w.d, &before, "failed {:?} changed state", action);
            }

            w.assert_solvent();
            for (token, pps) in tokens.iter().zip(&pps_before) {
                prop_assert!(
                    price_per_share(&w, *token) >= *pps,
                    "price-per-share fell after {:?}",
                    action
                );
            }
        }
    }

    #[test]
    fn prop_failed_swaps_roll_back(amount in 1u64..1_000_000) {
        let mut w = world();
        let before = w.d.clone();
        // Large enough to hit the liquidity checks for most inputs
        let amount_in = eth(amount) / U256::from(1_000u64);
        let (usdc_token, weth) = (w.usdc, w.weth);
        match w.swap(trader(), weth, usdc_token, amount_in) {
            Ok(quote) => {
                prop_assert_eq!(w.balance(usdc_token, trader()), usdc(1_000_000) + quote.amount_out());
                w.assert_solvent();
            }
            Err(_) => prop_assert_eq!(w.d, before),
        }
    }
}

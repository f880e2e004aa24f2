//! Cross-pool swaps, quotes and fee collection

use singularity_common::math::WAD;
use singularity_common::{Address, AssetLedger, SingularityError, U256};
use singularity_integration_tests::*;

fn half_eth() -> U256 {
    eth(1) / U256::from(2u64)
}

fn seeded() -> World {
    let mut w = World::new();
    w.seed(usdc(20_000), eth(10));
    w
}

#[test]
fn test_eth_for_usdc_scenario() {
    let mut w = seeded();
    let (usdc_token, weth) = (w.usdc, w.weth);
    let router = w.d.router;
    w.d.bank.fund(trader(), half_eth()).unwrap();

    let pps_usdc = w.pool(usdc_token).price_per_share().unwrap();
    let pps_weth = w.pool(weth).price_per_share().unwrap();
    let quoted = router
        .quote(&w.d.factory, &w.d.oracle, NOW, half_eth(), weth, usdc_token)
        .unwrap();

    let env = env(trader()).with_value(half_eth());
    let executed = w
        .d
        .transact(|d| {
            router.swap_exact_eth_for_tokens(&mut d.accounts(), &env, weth, usdc_token, U256::ZERO, trader(), U256::MAX)
        })
        .unwrap();
    assert_eq!(executed, quoted);

    let out = executed.amount_out();
    assert_eq!(w.balance(usdc_token, trader()), out);
    assert_eq!(w.d.bank.native_balance(trader()), U256::ZERO);

    // 0.5 ETH at $2000, less 15 bps of fees and a little curve slippage
    let fee_free = usdc(1_000);
    let after_fees = fee_free - fee_free * bps(15) / WAD;
    assert!(out < fee_free);
    assert!(out <= after_fees);
    assert!(out > after_fees - usdc(1));

    assert!(w.pool(usdc_token).price_per_share().unwrap() > pps_usdc);
    assert!(w.pool(weth).price_per_share().unwrap() > pps_weth);
    w.assert_solvent();
}

#[test]
fn test_quote_breakdown_matches_legs() {
    let w = seeded();
    let q = w
        .d
        .router
        .quote(&w.d.factory, &w.d.oracle, NOW, usdc(1_000), w.usdc, w.weth)
        .unwrap();

    assert_eq!(q.amount_in(), usdc(1_000));
    assert_eq!(q.in_leg.fee.total(), usdc(1_000) * bps(15) / (WAD * U256::from(2u64)));
    assert_eq!(q.in_leg.rebate, U256::ZERO);
    assert_eq!(q.in_leg.amount_post, q.amount_in() - q.in_leg.fee.total());
    assert_eq!(q.usd_value, q.in_leg.amount_post * U256::from(1_000_000_000_000u64));
    assert_eq!(
        q.out_leg.amount_requested,
        q.usd_value / U256::from(2_000u64)
    );
    assert_eq!(
        q.amount_out(),
        q.out_leg.amount_requested - q.out_leg.slippage - q.out_leg.fee.total()
    );
    assert_eq!(
        w.d.router
            .get_amount_out(&w.d.factory, &w.d.oracle, NOW, usdc(1_000), w.usdc, w.weth)
            .unwrap(),
        q.amount_out()
    );
}

#[test]
fn test_swap_argument_errors() {
    let mut w = seeded();
    let (usdc_token, weth) = (w.usdc, w.weth);
    let router = w.d.router;
    w.fund(trader(), usdc_token, usdc(1_000));
    let before = w.d.clone();

    assert_eq!(
        w.swap(trader(), usdc_token, usdc_token, usdc(10)).map(|q| q.amount_out()),
        Err(SingularityError::IdenticalTokens)
    );
    assert_eq!(
        w.swap(trader(), usdc_token, weth, U256::ZERO).map(|q| q.amount_out()),
        Err(SingularityError::InsufficientInputAmount)
    );
    assert_eq!(
        w.swap(trader(), usdc_token, Address::repeat_byte(0x99), usdc(10)).map(|q| q.amount_out()),
        Err(SingularityError::PoolNotFound)
    );

    let env = env(trader());
    let expired = w.d.transact(|d| {
        router.swap_exact_tokens_for_tokens(
            &mut d.accounts(),
            &env,
            usdc_token,
            weth,
            usdc(10),
            U256::ZERO,
            trader(),
            U256::from(NOW - 1),
        )
    });
    assert_eq!(expired.map(|q| q.amount_out()), Err(SingularityError::Expired));

    let quoted = router
        .get_amount_out(&w.d.factory, &w.d.oracle, NOW, usdc(10), usdc_token, weth)
        .unwrap();
    let too_greedy = w.d.transact(|d| {
        router.swap_exact_tokens_for_tokens(
            &mut d.accounts(),
            &env,
            usdc_token,
            weth,
            usdc(10),
            quoted + U256::from(1u64),
            trader(),
            U256::MAX,
        )
    });
    assert_eq!(too_greedy.map(|q| q.amount_out()), Err(SingularityError::InsufficientOutputAmount));
    assert_eq!(w.d, before);

    let exact = w.d.transact(|d| {
        router.swap_exact_tokens_for_tokens(&mut d.accounts(), &env, usdc_token, weth, usdc(10), quoted, trader(), U256::MAX)
    });
    assert_eq!(exact.map(|q| q.amount_out()), Ok(quoted));
}

#[test]
fn test_eth_swap_variants() {
    let mut w = seeded();
    let (usdc_token, weth) = (w.usdc, w.weth);
    let router = w.d.router;
    w.fund(trader(), usdc_token, usdc(2_000));
    w.d.bank.fund(trader(), eth(1)).unwrap();

    let env_value = env(trader()).with_value(half_eth());
    assert_eq!(
        w.d.transact(|d| {
            router.swap_exact_eth_for_tokens(&mut d.accounts(), &env_value, usdc_token, weth, U256::ZERO, trader(), U256::MAX)
        })
        .map(|q| q.amount_out()),
        Err(SingularityError::InvalidInToken)
    );

    let env = env(trader());
    assert_eq!(
        w.d.transact(|d| {
            router.swap_exact_tokens_for_eth(
                &mut d.accounts(),
                &env,
                weth,
                usdc_token,
                usdc(1_000),
                U256::ZERO,
                trader(),
                U256::MAX,
            )
        })
        .map(|q| q.amount_out()),
        Err(SingularityError::InvalidOutToken)
    );

    let quote = w
        .d
        .transact(|d| {
            router.swap_exact_tokens_for_eth(
                &mut d.accounts(),
                &env,
                usdc_token,
                weth,
                usdc(1_000),
                U256::ZERO,
                trader(),
                U256::MAX,
            )
        })
        .unwrap();
    assert!(quote.amount_out() > U256::ZERO);
    assert!(quote.amount_out() < half_eth());
    assert_eq!(w.d.bank.native_balance(trader()), eth(1) + quote.amount_out());
    assert_eq!(w.balance(weth, router.address), U256::ZERO);
    assert_eq!(w.d.bank.native_balance(router.address), U256::ZERO);
    w.assert_solvent();
}

#[test]
fn test_swap_into_drained_pool_earns_rebate() {
    let mut w = seeded();
    let (usdc_token, weth) = (w.usdc, w.weth);
    w.fund(trader(), weth, eth(2));
    w.fund(trader(), usdc_token, usdc(1_000));

    // Drain USDC to about 80% coverage
    w.swap(trader(), weth, usdc_token, eth(2)).unwrap();
    let pool = w.pool(usdc_token);
    assert!(pool.collateralization_ratio().unwrap() < WAD);
    assert!(pool.locked_fees > U256::ZERO);
    let locked_before = pool.locked_fees;

    let quote = w.swap(trader(), usdc_token, weth, usdc(1_000)).unwrap();
    assert!(quote.in_leg.rebate > U256::ZERO);
    assert!(quote.in_leg.rebate <= quote.in_leg.fee.total());
    assert!(quote.in_leg.amount_post <= quote.amount_in());
    assert_eq!(
        w.pool(usdc_token).locked_fees,
        locked_before + quote.in_leg.fee.locked - quote.in_leg.rebate
    );
    w.assert_solvent();
}

#[test]
fn test_swap_out_respects_liquidity_and_floor() {
    let mut w = seeded();
    let (usdc_token, weth) = (w.usdc, w.weth);
    w.fund(trader(), weth, eth(20));

    // $40000 out of a $20000 pool
    assert_eq!(
        w.swap(trader(), weth, usdc_token, eth(20)).map(|q| q.amount_out()),
        Err(SingularityError::InsufficientLiquidity)
    );

    // Would leave the USDC pool near 80% coverage
    w.d.factory.set_coverage_floor(&env(admin()), WAD * U256::from(9u64) / U256::from(10u64)).unwrap();
    assert_eq!(
        w.swap(trader(), weth, usdc_token, eth(2)).map(|q| q.amount_out()),
        Err(SingularityError::InsufficientLiquidity)
    );
    w.d.factory.set_coverage_floor(&env(admin()), WAD / U256::from(10u64)).unwrap();
    w.swap(trader(), weth, usdc_token, eth(2)).unwrap();
    w.assert_solvent();
}

#[test]
fn test_stale_price_blocks_swaps() {
    let mut w = seeded();
    w.d.oracle.set_max_price_age(&env(admin()), 100).unwrap();
    let router = w.d.router;

    assert!(router.quote(&w.d.factory, &w.d.oracle, NOW + 100, usdc(10), w.usdc, w.weth).is_ok());
    assert_eq!(
        router
            .quote(&w.d.factory, &w.d.oracle, NOW + 101, usdc(10), w.usdc, w.weth)
            .map(|q| q.amount_out()),
        Err(SingularityError::InvalidOraclePrice)
    );

    w.d.oracle.push_prices(&env(admin()), &[w.usdc], &[U256::ZERO]).unwrap();
    assert_eq!(
        router
            .quote(&w.d.factory, &w.d.oracle, NOW, usdc(10), w.usdc, w.weth)
            .map(|q| q.amount_out()),
        Err(SingularityError::InvalidOraclePrice)
    );
}

#[test]
fn test_collect_fees_twice() {
    let mut w = seeded();
    let (usdc_token, weth) = (w.usdc, w.weth);
    w.fund(trader(), usdc_token, usdc(5_000));
    w.swap(trader(), usdc_token, weth, usdc(5_000)).unwrap();

    let fees_usdc = w.pool(usdc_token).admin_fees;
    let fees_weth = w.pool(weth).admin_fees;
    assert!(fees_usdc > U256::ZERO);
    assert!(fees_weth > U256::ZERO);
    let fee_to = w.d.factory.fee_to();
    let before = w.balance(usdc_token, fee_to);

    let admin_env = env(admin());
    assert_eq!(
        w.d.transact(|d| d.factory.collect_fees(&env(trader()), &mut d.bank)),
        Err(SingularityError::NotAdmin)
    );
    let first = w.d.transact(|d| d.factory.collect_fees(&admin_env, &mut d.bank)).unwrap();
    assert!(first.contains(&(usdc_token, fees_usdc)));
    assert!(first.contains(&(weth, fees_weth)));
    assert_eq!(w.balance(usdc_token, fee_to), before + fees_usdc);
    assert_eq!(w.pool(usdc_token).admin_fees, U256::ZERO);
    assert_eq!(w.pool(weth).admin_fees, U256::ZERO);
    w.assert_solvent();

    let second = w.d.transact(|d| d.factory.collect_fees(&admin_env, &mut d.bank)).unwrap();
    assert!(second.iter().all(|(_, amount)| amount.is_zero()));
    assert_eq!(second.len(), 2);
}

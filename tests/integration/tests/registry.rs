//! Factory registry and admin surface

use singularity_common::math::WAD;
use singularity_common::{Address, SingularityError, U256};
use singularity_integration_tests::*;
use singularity_router::{pool_code_hash, pool_for, DEFAULT_TRANCHE};

#[test]
fn test_view_values() {
    let w = World::new();
    let f = &w.d.factory;

    assert_eq!(f.tranche(), DEFAULT_TRANCHE);
    assert_eq!(f.admin(), admin());
    assert_eq!(f.oracle(), w.d.oracle.address());
    assert_eq!(f.fee_to(), admin());
    assert_eq!(f.router(), Some(w.d.router.address));
    assert_eq!(f.chain_id(), CHAIN_ID);
    assert_eq!(f.pool_code_hash(), pool_code_hash());
    assert_eq!(w.d.router.factory, f.address());
    assert_eq!(w.d.router.pool_code_hash(), f.pool_code_hash());

    assert_eq!(f.all_pools_length(), 2);
    assert_eq!(f.all_pools(0), f.get_pool(w.usdc));
    assert_eq!(f.all_pools(1), f.get_pool(w.weth));
    assert_eq!(f.all_pools(2), None);
    assert_eq!(f.get_pool(w.usdc), Some(pool_for(f.address(), w.usdc)));

    let pool = w.pool(w.usdc);
    assert_eq!(pool.claim.name, "Singularity USDC Pool (Tranche A)");
    assert_eq!(pool.claim.symbol, "SPT-USDC (Tranche A)");
    assert_eq!(pool.claim.decimals, 6);
    assert_eq!(pool.factory, f.address());
    assert!(pool.is_stablecoin);
    assert!(!w.pool(w.weth).is_stablecoin);
    assert_eq!(pool.base_fee, bps(15));
    assert_eq!(pool.price_per_share().unwrap(), WAD);
    assert_eq!(pool.collateralization_ratio().unwrap(), U256::MAX);

    let data = pool.get_oracle_data(&w.d.oracle, NOW).unwrap();
    assert_eq!(data.price, WAD);
    assert_eq!(pool.amount_to_usd(&w.d.oracle, NOW, usdc(1)).unwrap(), WAD);
    assert_eq!(pool.usd_to_amount(&w.d.oracle, NOW, WAD).unwrap(), usdc(1));
}

#[test]
fn test_create_pool_errors() {
    let mut w = World::new();
    let dai = w.d.bank.deploy_token("Dai Stablecoin", "DAI", 21);
    let unknown = Address::repeat_byte(0x99);

    let d = &mut w.d;
    assert_eq!(
        d.factory.create_pool(&env(trader()), &d.bank, dai, true, bps(15)),
        Err(SingularityError::NotAdmin)
    );
    assert_eq!(
        d.factory.create_pool(&env(admin()), &d.bank, Address::ZERO, true, bps(15)),
        Err(SingularityError::ZeroAddress)
    );
    assert_eq!(
        d.factory.create_pool(&env(admin()), &d.bank, w.usdc, true, bps(15)),
        Err(SingularityError::PoolExists)
    );
    assert_eq!(
        d.factory.create_pool(&env(admin()), &d.bank, dai, true, U256::ZERO),
        Err(SingularityError::BaseFeeIsZero)
    );
    assert_eq!(
        d.factory.create_pool(&env(admin()), &d.bank, unknown, true, bps(15)),
        Err(SingularityError::UnknownAsset)
    );

    let pool = d.factory.create_pool(&env(admin()), &d.bank, dai, true, bps(15)).unwrap();
    assert_eq!(pool, pool_for(d.factory.address(), dai));
    assert_eq!(d.factory.all_pools_length(), 3);
    assert_eq!(d.factory.pool(dai).unwrap().deposit_cap, U256::ZERO);
}

#[test]
fn test_set_base_fees_errors() {
    let mut w = World::new();
    let (usdc, weth) = (w.usdc, w.weth);
    let f = &mut w.d.factory;

    assert_eq!(
        f.set_base_fees(&env(trader()), &[usdc], &[bps(10)]),
        Err(SingularityError::NotAdmin)
    );
    assert_eq!(
        f.set_base_fees(&env(admin()), &[usdc, weth], &[bps(10)]),
        Err(SingularityError::NotSameLength)
    );
    assert_eq!(
        f.set_base_fees(&env(admin()), &[usdc], &[U256::ZERO]),
        Err(SingularityError::BaseFeeIsZero)
    );
    assert_eq!(
        f.set_base_fees(&env(admin()), &[Address::repeat_byte(0x99)], &[bps(10)]),
        Err(SingularityError::PoolNotFound)
    );

    f.set_base_fees(&env(admin()), &[usdc, weth], &[bps(10), bps(30)]).unwrap();
    assert_eq!(f.pool(usdc).unwrap().base_fee, bps(10));
    assert_eq!(f.pool(weth).unwrap().base_fee, bps(30));
}

#[test]
fn test_set_deposit_caps_errors() {
    let mut w = World::new();
    let usdc = w.usdc;
    let f = &mut w.d.factory;

    assert_eq!(
        f.set_deposit_caps(&env(trader()), &[usdc], &[usdc_cap()]),
        Err(SingularityError::NotAdmin)
    );
    assert_eq!(
        f.set_deposit_caps(&env(admin()), &[usdc], &[]),
        Err(SingularityError::NotSameLength)
    );
    f.set_deposit_caps(&env(admin()), &[usdc], &[usdc_cap()]).unwrap();
    assert_eq!(f.pool(usdc).unwrap().deposit_cap, usdc_cap());
}

fn usdc_cap() -> U256 {
    usdc(1_000)
}

#[test]
fn test_router_is_set_once() {
    let mut w = World::new();
    let router = w.d.router.address;
    let f = &mut w.d.factory;

    f.set_router(&env(admin()), router).unwrap();
    assert_eq!(
        f.set_router(&env(admin()), Address::repeat_byte(0x77)),
        Err(SingularityError::RouterAlreadySet)
    );
    assert_eq!(f.set_router(&env(admin()), Address::ZERO), Err(SingularityError::ZeroAddress));
    assert_eq!(f.set_router(&env(trader()), router), Err(SingularityError::NotAdmin));
    assert_eq!(f.router(), Some(router));
}

#[test]
fn test_admin_setters() {
    let mut w = World::new();
    let new_admin = Address::repeat_byte(0x55);
    let f = &mut w.d.factory;

    assert_eq!(f.set_fee_to(&env(admin()), Address::ZERO), Err(SingularityError::ZeroAddress));
    f.set_fee_to(&env(admin()), lp()).unwrap();
    assert_eq!(f.fee_to(), lp());

    assert_eq!(f.set_oracle(&env(admin()), Address::ZERO), Err(SingularityError::ZeroAddress));
    assert_eq!(f.set_coverage_floor(&env(trader()), WAD), Err(SingularityError::NotAdmin));
    f.set_coverage_floor(&env(admin()), WAD / U256::from(5u64)).unwrap();
    assert_eq!(f.config().coverage_floor, WAD / U256::from(5u64));

    f.set_admin(&env(admin()), new_admin).unwrap();
    assert_eq!(f.admin(), new_admin);
    assert_eq!(f.set_paused_for_all(&env(admin()), true), Err(SingularityError::NotAdmin));
    f.set_paused_for_all(&env(new_admin), true).unwrap();
    assert!(f.paused_for_all());
}

#[test]
fn test_pools_created_while_paused_start_paused() {
    let mut w = World::new();
    let dai = w.d.bank.deploy_token("Dai Stablecoin", "DAI", 21);
    let d = &mut w.d;

    d.factory.set_paused_for_all(&env(admin()), true).unwrap();
    d.factory.create_pool(&env(admin()), &d.bank, dai, true, bps(15)).unwrap();
    assert!(d.factory.pool(dai).unwrap().paused);

    d.factory.set_paused_for_all(&env(admin()), false).unwrap();
    assert!(d.factory.pools().all(|p| !p.paused));
}

#[test]
fn test_oracle_permissions() {
    let mut w = World::new();
    let oracle = &mut w.d.oracle;
    let usdc = w.usdc;

    assert_eq!(oracle.owner(), admin());
    assert!(oracle.is_pusher(admin()));
    assert_eq!(
        oracle.push_prices(&env(trader()), &[usdc], &[WAD]),
        Err(SingularityError::NotPusher)
    );
    assert_eq!(
        oracle.set_pusher(&env(trader()), trader(), true),
        Err(SingularityError::NotOwner)
    );
    oracle.set_pusher(&env(admin()), trader(), true).unwrap();
    assert_eq!(
        oracle.push_prices(&env(trader()), &[usdc], &[]),
        Err(SingularityError::NotSameLength)
    );
    oracle.push_prices(&env(trader()), &[usdc], &[WAD * U256::from(2u64)]).unwrap();
    assert_eq!(oracle.latest(usdc).unwrap().updated_at, NOW);

    oracle.set_pusher(&env(admin()), trader(), false).unwrap();
    assert!(!oracle.is_pusher(trader()));
}

//! End-to-end exchange scenarios: liquidity, pricing, swaps, and staking.
//!
//! Expected values are 18-decimal exact; `wad_str` keeps them readable
//! digit-for-digit.

use e2e::{wad, wad_str, Harness};
use types::{Address, SECONDS_PER_DAY};

mod add_liquidity {
    use super::*;

    #[test]
    fn can_add_liquidity_to_empty_reserves() {
        let mut h = Harness::new();
        h.dex
            .approve(h.owner, h.token, h.exchange, wad(200))
            .unwrap();
        h.dex
            .add_liquidity(h.owner, h.exchange, wad(200), wad(1))
            .unwrap();

        assert_eq!(h.dex.native_balance_of(h.exchange), wad(1));
        assert_eq!(h.dex.get_token_balance(h.exchange).unwrap(), wad(200));
    }

    #[test]
    fn allows_zero_amounts() {
        let mut h = Harness::new();
        h.dex.approve(h.owner, h.token, h.exchange, 0).unwrap();
        h.dex.add_liquidity(h.owner, h.exchange, 0, 0).unwrap();

        assert_eq!(h.dex.native_balance_of(h.exchange), 0);
        assert_eq!(h.dex.get_token_balance(h.exchange).unwrap(), 0);
    }

    #[test]
    fn preserves_the_reserve_ratio() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex
            .approve(h.owner, h.token, h.exchange, wad(15_000))
            .unwrap();
        h.dex
            .add_liquidity(h.owner, h.exchange, wad(15_000), wad(10))
            .unwrap();

        // Only the ratio-required 10000 tokens were taken.
        assert_eq!(h.dex.native_balance_of(h.exchange), wad(110));
        assert_eq!(h.dex.get_token_balance(h.exchange).unwrap(), wad(110_000));
    }

    #[test]
    fn mints_lp_tokens_proportionally() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex
            .transfer(h.owner, h.token, h.user, wad(5000))
            .unwrap();
        h.dex
            .approve(h.user, h.token, h.exchange, wad(5000))
            .unwrap();
        h.dex
            .add_liquidity(h.user, h.exchange, wad(5000), wad(5))
            .unwrap();

        assert_eq!(h.dex.balance_of(h.exchange, h.user).unwrap(), wad(5));
        assert_eq!(h.dex.balance_of(h.exchange, h.owner).unwrap(), wad(100));
        assert_eq!(h.dex.total_supply(h.exchange).unwrap(), wad(105));
    }

    #[test]
    fn fails_when_not_enough_input_amount() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex
            .approve(h.owner, h.token, h.exchange, wad(1000))
            .unwrap();
        let err = h
            .dex
            .add_liquidity(h.owner, h.exchange, wad(1000), wad(100))
            .unwrap_err();
        assert_eq!(err.to_string(), "not enough input amount!");
    }
}

mod remove_liquidity {
    use super::*;

    #[test]
    fn removes_some_liquidity() {
        let mut h = Harness::new();
        h.seed_pool();
        let native_before = h.dex.native_balance_of(h.owner);
        let tokens_before = h.dex.balance_of(h.token, h.owner).unwrap();

        h.dex
            .remove_liquidity(h.owner, h.exchange, wad(30))
            .unwrap();

        assert_eq!(h.dex.native_balance_of(h.owner), native_before + wad(30));
        assert_eq!(
            h.dex.balance_of(h.token, h.owner).unwrap(),
            tokens_before + wad(30_000)
        );
        assert_eq!(h.dex.total_supply(h.exchange).unwrap(), wad(70));
        assert_eq!(h.dex.get_token_balance(h.exchange).unwrap(), wad(70_000));
    }

    #[test]
    fn removes_all_liquidity() {
        let mut h = Harness::new();
        h.seed_pool();

        let (native_out, tokens_out) = h
            .dex
            .remove_liquidity(h.owner, h.exchange, wad(100))
            .unwrap();

        assert_eq!(native_out, wad(100));
        assert_eq!(tokens_out, wad(100_000));
        assert_eq!(h.dex.total_supply(h.exchange).unwrap(), 0);
        assert_eq!(h.dex.get_token_balance(h.exchange).unwrap(), 0);
    }

    #[test]
    fn pays_liquidity_providers_from_swap_fees() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex
            .swap_ether_to_token(h.user, h.exchange, wad(9000), wad(10))
            .unwrap();

        assert_eq!(
            h.dex.get_token_balance(h.exchange).unwrap(),
            wad_str("90933.891061198508684187")
        );
        assert_eq!(h.dex.native_balance_of(h.exchange), wad(110));
    }

    #[test]
    fn burns_lp_tokens() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex
            .remove_liquidity(h.owner, h.exchange, wad(25))
            .unwrap();

        assert_eq!(h.dex.balance_of(h.exchange, h.owner).unwrap(), wad(75));
        assert_eq!(h.dex.total_supply(h.exchange).unwrap(), wad(75));
    }

    #[test]
    fn fails_on_invalid_amount() {
        let mut h = Harness::new();
        h.seed_pool();

        let err = h
            .dex
            .remove_liquidity(h.owner, h.exchange, wad(101))
            .unwrap_err();
        assert_eq!(err.to_string(), "burn amount exceeds balance");
    }

    #[test]
    fn round_trip_never_returns_more_than_contributed() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex
            .transfer(h.owner, h.token, h.user, wad(7000))
            .unwrap();
        h.dex
            .approve(h.user, h.token, h.exchange, wad(7000))
            .unwrap();
        let native_before = h.dex.native_balance_of(h.user);
        let tokens_before = h.dex.balance_of(h.token, h.user).unwrap();

        let minted = h
            .dex
            .add_liquidity(h.user, h.exchange, wad(7000), wad(7))
            .unwrap();
        let (native_out, tokens_out) =
            h.dex.remove_liquidity(h.user, h.exchange, minted).unwrap();

        assert!(native_out <= wad(7));
        assert!(tokens_out <= wad(7000));
        assert!(h.dex.native_balance_of(h.user) <= native_before);
        assert!(h.dex.balance_of(h.token, h.user).unwrap() <= tokens_before);
    }
}

mod price_queries {
    use super::*;

    #[test]
    fn returns_correct_token_price() {
        let mut h = Harness::new();
        h.seed_pool();

        let cases = [
            (wad(1), "987.158034397061298850"),
            (wad(10), "9066.108938801491315813"),
            (wad(50), "33266.599933266599933266"),
            (wad(100), "49924.887330996494742113"),
            (wad(1000), "90884.229717411121239744"),
        ];
        for (native_in, expected) in cases {
            assert_eq!(
                h.dex.get_token_amount(h.exchange, native_in).unwrap(),
                wad_str(expected)
            );
        }
    }

    #[test]
    fn returns_correct_native_price() {
        let mut h = Harness::new();
        h.seed_pool();

        let cases = [
            (wad(100), "0.099600698103990321"),
            (wad(5000), "4.748297375815592703"),
            (wad(50_000), "33.266599933266599933"),
            (wad(100_000), "49.924887330996494742"),
            (wad(1_000_000), "90.884229717411121239"),
        ];
        for (tokens_in, expected) in cases {
            assert_eq!(
                h.dex.get_ether_amount(h.exchange, tokens_in).unwrap(),
                wad_str(expected)
            );
        }
    }

    #[test]
    fn queries_fail_without_liquidity() {
        let h = Harness::new();
        assert_eq!(
            h.dex.get_token_amount(h.exchange, wad(1)).unwrap_err().to_string(),
            "no liquidity!"
        );
        assert_eq!(
            h.dex.get_ether_amount(h.exchange, wad(1)).unwrap_err().to_string(),
            "no liquidity!"
        );
    }
}

mod swap_ether_to_token {
    use super::*;

    #[test]
    fn swaps_correctly() {
        let mut h = Harness::new();
        h.seed_pool();
        assert_eq!(h.dex.balance_of(h.token, h.user).unwrap(), 0);
        let native_before = h.dex.native_balance_of(h.user);

        h.dex
            .swap_ether_to_token(h.user, h.exchange, wad(9000), wad(10))
            .unwrap();

        assert_eq!(h.dex.native_balance_of(h.user), native_before - wad(10));
        assert_eq!(
            h.dex.balance_of(h.token, h.user).unwrap(),
            wad_str("9066.108938801491315813")
        );
        assert_eq!(h.dex.native_balance_of(h.exchange), wad(110));
        assert_eq!(
            h.dex.get_token_balance(h.exchange).unwrap(),
            wad_str("90933.891061198508684187")
        );
    }

    #[test]
    fn fails_when_slippage_bound_violated() {
        let mut h = Harness::new();
        h.seed_pool();

        let err = h
            .dex
            .swap_ether_to_token(h.user, h.exchange, wad(11_000), wad(10))
            .unwrap_err();
        assert_eq!(err.to_string(), "not enough input amount!");
    }

    #[test]
    fn fails_when_no_liquidity() {
        let mut h = Harness::new();
        h.seed_pool();
        h.dex
            .remove_liquidity(h.owner, h.exchange, wad(100))
            .unwrap();

        let err = h
            .dex
            .swap_ether_to_token(h.owner, h.exchange, wad(1000), wad(10))
            .unwrap_err();
        assert_eq!(err.to_string(), "no liquidity!");
    }

    #[test]
    fn allows_zero_swaps() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex
            .swap_ether_to_token(h.user, h.exchange, 0, 0)
            .unwrap();

        assert_eq!(h.dex.balance_of(h.token, h.user).unwrap(), 0);
        assert_eq!(h.dex.native_balance_of(h.exchange), wad(100));
        assert_eq!(h.dex.get_token_balance(h.exchange).unwrap(), wad(100_000));
    }
}

mod swap_token_to_ether {
    use super::*;

    fn setup() -> Harness {
        let mut h = Harness::new();
        h.dex
            .transfer(h.owner, h.token, h.user, wad(10_000))
            .unwrap();
        h.dex
            .approve(h.user, h.token, h.exchange, wad(10_000))
            .unwrap();
        h.seed_pool();
        h
    }

    #[test]
    fn swaps_correctly() {
        let mut h = setup();
        let native_before = h.dex.native_balance_of(h.user);

        h.dex
            .swap_token_to_ether(h.user, h.exchange, wad(10_000), wad(9))
            .unwrap();

        assert_eq!(h.dex.balance_of(h.token, h.user).unwrap(), 0);
        assert_eq!(
            h.dex.native_balance_of(h.user),
            native_before + wad_str("9.066108938801491315")
        );
        assert_eq!(
            h.dex.native_balance_of(h.exchange),
            wad_str("90.933891061198508685")
        );
        assert_eq!(h.dex.get_token_balance(h.exchange).unwrap(), wad(110_000));
    }

    #[test]
    fn fails_when_slippage_bound_violated() {
        let mut h = setup();
        let err = h
            .dex
            .swap_token_to_ether(h.user, h.exchange, wad(10_000), wad(11))
            .unwrap_err();
        assert_eq!(err.to_string(), "not enough input amount!");
    }

    #[test]
    fn fails_when_tokens_are_not_approved() {
        let mut h = Harness::new();
        h.seed_pool();

        // The owner never approved the exchange beyond the seeded amount.
        let err = h
            .dex
            .swap_token_to_ether(h.owner, h.exchange, wad(1000), wad_str("0.9"))
            .unwrap_err();
        assert_eq!(err.to_string(), "check allowance!");
    }

    #[test]
    fn fails_when_not_enough_funds() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex
            .approve(h.owner, h.token, h.exchange, wad(10_000_000))
            .unwrap();
        let err = h
            .dex
            .swap_token_to_ether(h.owner, h.exchange, wad(10_000_000), wad(90))
            .unwrap_err();
        assert_eq!(err.to_string(), "not enough tokens!");
    }

    #[test]
    fn fails_when_no_liquidity() {
        let mut h = setup();
        h.dex
            .remove_liquidity(h.owner, h.exchange, wad(100))
            .unwrap();

        let err = h
            .dex
            .swap_token_to_ether(h.user, h.exchange, wad(1000), wad_str("0.9"))
            .unwrap_err();
        assert_eq!(err.to_string(), "no liquidity!");
    }

    #[test]
    fn allows_zero_swaps() {
        let mut h = setup();

        h.dex
            .swap_token_to_ether(h.user, h.exchange, 0, 0)
            .unwrap();

        assert_eq!(h.dex.balance_of(h.token, h.user).unwrap(), wad(10_000));
        assert_eq!(h.dex.native_balance_of(h.exchange), wad(100));
        assert_eq!(h.dex.get_token_balance(h.exchange).unwrap(), wad(100_000));
    }
}

mod swap_token_to_token {
    use super::*;

    #[test]
    fn swaps_across_two_pools() {
        let mut h = Harness::new();
        let int_exchange = h.seed_reward_pool();
        let int = h.dex.registry_address();
        let int_before = h.dex.balance_of(int, h.owner).unwrap();

        h.dex
            .approve(h.owner, h.token, h.exchange, wad(200))
            .unwrap();
        h.dex
            .swap_token_to_token(h.owner, h.exchange, wad(200), wad(99), int)
            .unwrap();

        assert_eq!(
            h.dex.balance_of(int, h.owner).unwrap() - int_before,
            wad_str("99.006653722756217405")
        );
        // No native units strand on the hopping exchange.
        assert_eq!(
            h.dex.balance_of(int, int_exchange).unwrap(),
            wad(50_000) - wad_str("99.006653722756217405")
        );
    }

    #[test]
    fn swaps_in_reverse_across_two_pools() {
        let mut h = Harness::new();
        let int_exchange = h.seed_reward_pool();
        let int = h.dex.registry_address();
        let tokens_before = h.dex.balance_of(h.token, h.user).unwrap();

        h.dex
            .approve(h.user, int, int_exchange, wad(100))
            .unwrap();
        h.dex
            .swap_token_to_token(h.user, int_exchange, wad(100), wad(198), h.token)
            .unwrap();

        assert_eq!(
            h.dex.balance_of(h.token, h.user).unwrap() - tokens_before,
            wad_str("198.013307445512434811")
        );
    }

    #[test]
    fn hop_conserves_native_units() {
        let mut h = Harness::new();
        let int_exchange = h.seed_reward_pool();
        let int = h.dex.registry_address();
        let native_a = h.dex.native_balance_of(h.exchange);
        let native_b = h.dex.native_balance_of(int_exchange);

        h.dex
            .approve(h.owner, h.token, h.exchange, wad(200))
            .unwrap();
        h.dex
            .swap_token_to_token(h.owner, h.exchange, wad(200), wad(99), int)
            .unwrap();

        let intermediate = wad_str("0.199003187643838186");
        assert_eq!(h.dex.native_balance_of(h.exchange), native_a - intermediate);
        assert_eq!(
            h.dex.native_balance_of(int_exchange),
            native_b + intermediate
        );
    }

    #[test]
    fn fails_for_own_exchange_asset() {
        let mut h = Harness::new();
        h.seed_reward_pool();

        h.dex
            .approve(h.owner, h.token, h.exchange, wad(100))
            .unwrap();
        let err = h
            .dex
            .swap_token_to_token(h.owner, h.exchange, wad(100), wad(99), h.token)
            .unwrap_err();
        assert_eq!(err.to_string(), "exchange doesn't exist!");
    }

    #[test]
    fn fails_for_unregistered_asset() {
        let mut h = Harness::new();
        h.seed_reward_pool();

        h.dex
            .approve(h.owner, h.token, h.exchange, wad(100))
            .unwrap();
        let err = h
            .dex
            .swap_token_to_token(
                h.owner,
                h.exchange,
                wad(100),
                wad(99),
                Address::from_low_u64(0x0111_1111),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "exchange doesn't exist!");
    }

    #[test]
    fn fails_for_zero_address() {
        let mut h = Harness::new();
        h.seed_reward_pool();

        h.dex
            .approve(h.owner, h.token, h.exchange, wad(100))
            .unwrap();
        let err = h
            .dex
            .swap_token_to_token(h.owner, h.exchange, wad(100), wad(99), Address::ZERO)
            .unwrap_err();
        assert_eq!(err.to_string(), "exchange doesn't exist!");
    }

    #[test]
    fn fails_when_slippage_bound_violated() {
        let mut h = Harness::new();
        h.seed_reward_pool();
        let int = h.dex.registry_address();

        h.dex
            .approve(h.owner, h.token, h.exchange, wad(200))
            .unwrap();
        let err = h
            .dex
            .swap_token_to_token(h.owner, h.exchange, wad(200), wad(200), int)
            .unwrap_err();
        assert_eq!(err.to_string(), "not enough input amount!");
    }

    #[test]
    fn fails_when_sibling_has_no_liquidity() {
        let mut h = Harness::new();
        let int_exchange = h.seed_reward_pool();
        let int = h.dex.registry_address();

        h.dex
            .approve(h.owner, h.token, h.exchange, wad(200))
            .unwrap();
        h.dex
            .remove_liquidity(h.user, int_exchange, wad(100))
            .unwrap();

        let tokens_before = h.dex.balance_of(h.token, h.owner).unwrap();
        let err = h
            .dex
            .swap_token_to_token(h.owner, h.exchange, wad(200), wad(99), int)
            .unwrap_err();
        assert_eq!(err.to_string(), "no liquidity!");
        // The failed hop rolled back the first leg as well.
        assert_eq!(h.dex.balance_of(h.token, h.owner).unwrap(), tokens_before);
        assert_eq!(h.dex.get_token_balance(h.exchange).unwrap(), wad(100_000));
    }

    #[test]
    fn allows_zero_swaps() {
        let mut h = Harness::new();
        let int_exchange = h.seed_reward_pool();
        let int = h.dex.registry_address();
        let int_before = h.dex.balance_of(int, h.owner).unwrap();
        let pool_before = h.dex.balance_of(int, int_exchange).unwrap();

        h.dex
            .swap_token_to_token(h.owner, h.exchange, 0, 0, int)
            .unwrap();

        assert_eq!(h.dex.balance_of(int, h.owner).unwrap(), int_before);
        assert_eq!(h.dex.balance_of(int, int_exchange).unwrap(), pool_before);
    }
}

mod staking {
    use super::*;

    #[test]
    fn returns_staked_amount_after_one_day() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex.advance_time(SECONDS_PER_DAY);
        assert_eq!(
            h.dex.get_staked_amount(h.exchange, h.owner).unwrap(),
            wad(100)
        );
    }

    #[test]
    fn withdraws_staked_amount() {
        let mut h = Harness::new();
        h.seed_pool();
        let int = h.dex.registry_address();

        h.dex.advance_time(SECONDS_PER_DAY);
        let withdrawn = h
            .dex
            .withdraw_staked_tokens(h.owner, h.exchange)
            .unwrap();

        assert_eq!(withdrawn, wad(100));
        assert_eq!(h.dex.balance_of(int, h.owner).unwrap(), wad(100));
        assert_eq!(h.dex.get_staked_amount(h.exchange, h.owner).unwrap(), 0);
    }

    #[test]
    fn fails_when_withdrawing_zero() {
        let mut h = Harness::new();
        h.seed_pool();

        let err = h
            .dex
            .withdraw_staked_tokens(h.user, h.exchange)
            .unwrap_err();
        assert_eq!(err.to_string(), "0 INT to withdraw!");
    }

    #[test]
    fn receiver_of_lp_tokens_starts_accruing() {
        let mut h = Harness::new();
        h.seed_pool();

        // One second of solo holding, then hand everything over.
        h.dex.advance_time(1);
        h.dex
            .transfer(h.owner, h.exchange, h.user, wad(100))
            .unwrap();
        assert_eq!(h.dex.balance_of(h.exchange, h.owner).unwrap(), 0);
        assert_eq!(h.dex.balance_of(h.exchange, h.user).unwrap(), wad(100));

        h.dex.advance_time(SECONDS_PER_DAY);

        assert_eq!(
            h.dex.get_staked_amount(h.exchange, h.user).unwrap(),
            wad(100)
        );
        assert_eq!(
            h.dex.get_staked_amount(h.exchange, h.owner).unwrap(),
            wad_str("0.001157407407407407")
        );
    }

    #[test]
    fn accrual_survives_adding_liquidity_again() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex.advance_time(SECONDS_PER_DAY + 2);
        h.dex
            .approve(h.owner, h.token, h.exchange, wad(50_000))
            .unwrap();
        h.dex
            .add_liquidity(h.owner, h.exchange, wad(50_000), wad(50))
            .unwrap();

        assert_eq!(h.dex.total_supply(h.exchange).unwrap(), wad(150));
        assert_eq!(
            h.dex.get_staked_amount(h.exchange, h.owner).unwrap(),
            wad_str("100.002314814814814814")
        );
    }

    #[test]
    fn accrual_survives_removing_liquidity() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex.advance_time(SECONDS_PER_DAY);
        assert_eq!(
            h.dex.get_staked_amount(h.exchange, h.owner).unwrap(),
            wad(100)
        );

        h.dex.advance_time(1);
        h.dex
            .remove_liquidity(h.owner, h.exchange, wad(100))
            .unwrap();

        assert_eq!(h.dex.total_supply(h.exchange).unwrap(), 0);
        assert_eq!(
            h.dex.get_staked_amount(h.exchange, h.owner).unwrap(),
            wad_str("100.001157407407407407")
        );
    }

    #[test]
    fn accrual_survives_transferring_lp_tokens() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex.advance_time(SECONDS_PER_DAY + 1);
        h.dex
            .transfer(h.owner, h.exchange, h.user, wad(100))
            .unwrap();

        assert_eq!(
            h.dex.get_staked_amount(h.exchange, h.owner).unwrap(),
            wad_str("100.001157407407407407")
        );
    }

    #[test]
    fn accrual_survives_receiving_lp_tokens_back() {
        let mut h = Harness::new();
        h.seed_pool();

        h.dex.advance_time(SECONDS_PER_DAY + 1);
        h.dex
            .transfer(h.owner, h.exchange, h.user, wad(100))
            .unwrap();

        h.dex.advance_time(1);
        h.dex
            .transfer(h.user, h.exchange, h.owner, wad(100))
            .unwrap();

        assert_eq!(
            h.dex.get_staked_amount(h.exchange, h.user).unwrap(),
            wad_str("0.001157407407407407")
        );
        assert_eq!(
            h.dex.get_staked_amount(h.exchange, h.owner).unwrap(),
            wad_str("100.001157407407407407")
        );
    }
}

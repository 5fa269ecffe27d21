use bech32::{ToBase32, Variant};
use presale_types::{RawPresaleInputs, RawSchedule};

pub const BECH32_PREFIX: &str = "omniflix";

pub fn address(byte: u8) -> String {
    bech32::encode(BECH32_PREFIX, [byte; 20].to_base32(), Variant::Bech32).unwrap()
}

pub fn schedule(pairs: &[(i64, i64)]) -> RawSchedule {
    RawSchedule::from_pairs(pairs.iter().copied())
}

pub fn return_presale_inputs() -> RawPresaleInputs {
    RawPresaleInputs {
        sale_token: address(1),
        payment_token: address(2),
        start_offset_seconds: 360,
        duration_seconds: 3_599_640,
        price_tiers: schedule(&[(1000, 100), (5000, 90)]),
        bonus_schedule: schedule(&[
            (1000, 100),
            (3000, 300),
            (10000, 600),
            (25000, 900),
            (50000, 1200),
            (100000, 1600),
            (250000, 2000),
            (500000, 2500),
        ]),
        vesting_schedule: schedule(&[
            (6, 100),
            (8, 300),
            (10, 600),
            (12, 900),
            (15, 1200),
            (18, 1600),
            (21, 2000),
            (24, 2500),
        ]),
        vesting_mode: 3,
        claim_delay: 0,
    }
}

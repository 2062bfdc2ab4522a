//! Exact arithmetic guards for `Decimal` amounts.
//!
//! `Decimal` keeps a 96-bit mantissa. Adding two values whose aligned
//! mantissas no longer fit either overflows or silently drops fractional
//! digits, so netting code checks its inputs up front and then sums with
//! checked operations only.

use rust_decimal::Decimal;

use crate::error::{AppError, Result};

/// Largest mantissa a `Decimal` can carry (2^96 - 1).
pub const MAX_MANTISSA: i128 = 79_228_162_514_264_337_593_543_950_335;

/// Ensures `amounts` can be added and subtracted in any order without
/// overflow or rounding.
///
/// All amounts are aligned to the finest scale among them. Any partial sum is
/// bounded by `weight` times the sum of their magnitudes, so that bound must
/// fit in a single mantissa at that scale.
pub fn ensure_exact<I>(amounts: I, weight: i128) -> Result<()>
where
    I: IntoIterator<Item = Decimal>,
{
    let amounts: Vec<Decimal> = amounts.into_iter().collect();
    let scale = amounts.iter().map(Decimal::scale).max().unwrap_or(0);

    let mut units: i128 = 0;
    for amount in &amounts {
        units = aligned_units(amount, scale)
            .and_then(|u| units.checked_add(u))
            .ok_or_else(|| out_of_range(amount, scale))?;
    }

    match units.checked_mul(weight) {
        Some(bound) if bound <= MAX_MANTISSA => Ok(()),
        _ => Err(AppError::AmountOutOfRange(format!(
            "amounts totalling {} units at scale {} exceed the exact range of a decimal",
            units, scale
        ))),
    }
}

/// Sums amounts, failing instead of panicking on overflow.
pub fn checked_sum<I>(amounts: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount).ok_or_else(|| {
            AppError::AmountOutOfRange(format!("sum overflowed adding {} to {}", amount, acc))
        })
    })
}

/// Magnitude of `amount` expressed in units of `10^-scale`.
fn aligned_units(amount: &Decimal, scale: u32) -> Option<i128> {
    let factor = 10i128.checked_pow(scale.checked_sub(amount.scale())?)?;
    amount.mantissa().checked_abs()?.checked_mul(factor)
}

fn out_of_range(amount: &Decimal, scale: u32) -> AppError {
    AppError::AmountOutOfRange(format!(
        "amount {} cannot be aligned to scale {} without overflow",
        amount, scale
    ))
}

//! Decimal amount helpers shared by the balance and settlement math.

use rust_decimal::Decimal;

/// Currency amounts closer to zero than this are treated as settled.
pub const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Allowed drift of a percentage split total away from 100.
pub const PERCENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

pub const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Returns `true` when `amount` is within [`AMOUNT_TOLERANCE`] of zero.
pub fn is_negligible(amount: Decimal) -> bool {
    amount.abs() < AMOUNT_TOLERANCE
}

pub fn amounts_match(left: Decimal, right: Decimal) -> bool {
    (left - right).abs() <= AMOUNT_TOLERANCE
}

pub fn percent_of(amount: Decimal, percentage: Decimal) -> Decimal {
    amount * percentage / ONE_HUNDRED
}

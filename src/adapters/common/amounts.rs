//! Base-unit ↔ wire-unit amount conversion.
//!
//! Each gateway declares a table of [`CurrencyRule`]s; the free functions here
//! do the conversion and minimum checks for any table.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::json;

use crate::domain::payment::{Currency, Money, PaymentError, PaymentResult};

/// How a gateway expects amounts of one currency on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountUnit {
    /// Integer subunits: base × divisor (kobo, cents).
    Minor { divisor: u32 },

    /// Integer major units with no subunit multiplication (JPY on Stripe).
    ZeroDecimal,

    /// Major units rounded to `scale` decimal places.
    Major { scale: u32 },
}

/// One supported currency of one gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyRule {
    pub currency: Currency,
    pub unit: AmountUnit,

    /// Smallest accepted amount, in wire units.
    pub minimum: Decimal,
}

impl CurrencyRule {
    pub const fn minor(currency: Currency, divisor: u32, minimum: u32) -> Self {
        Self {
            currency,
            unit: AmountUnit::Minor { divisor },
            minimum: Decimal::from_parts(minimum, 0, 0, false, 0),
        }
    }

    pub const fn zero_decimal(currency: Currency, minimum: u32) -> Self {
        Self {
            currency,
            unit: AmountUnit::ZeroDecimal,
            minimum: Decimal::from_parts(minimum, 0, 0, false, 0),
        }
    }

    pub const fn major(currency: Currency, scale: u32, minimum: u32) -> Self {
        Self {
            currency,
            unit: AmountUnit::Major { scale },
            minimum: Decimal::from_parts(minimum, 0, 0, false, 0),
        }
    }

    /// Minimum as a base-unit amount.
    pub fn minimum_base(&self) -> Decimal {
        wire_to_base(self.unit, self.minimum)
    }

    /// Human-readable minimum, e.g. "50.00 NGN".
    pub fn minimum_display(&self) -> String {
        Money::new(self.minimum_base(), self.currency).to_string()
    }
}

/// Find the rule for `currency`, or fail with the list of supported codes.
pub fn rule_for(table: &[CurrencyRule], currency: Currency) -> PaymentResult<&CurrencyRule> {
    table
        .iter()
        .find(|rule| rule.currency == currency)
        .ok_or_else(|| PaymentError::unsupported_currency(currency, &supported_codes(table)))
}

pub fn supported_codes(table: &[CurrencyRule]) -> Vec<String> {
    table.iter().map(|rule| rule.currency.code().to_string()).collect()
}

/// Convert a base amount to wire units and enforce the gateway minimum.
pub fn to_wire_amount(table: &[CurrencyRule], money: &Money) -> PaymentResult<Decimal> {
    let rule = rule_for(table, money.currency)?;
    let wire = base_to_wire(rule.unit, money)?;

    if wire < rule.minimum {
        return Err(PaymentError::validation(format!(
            "Amount {} is below the minimum of {}",
            money,
            rule.minimum_display()
        ))
        .with_details(json!({
            "currency": money.currency.code(),
            "minimum": rule.minimum_display(),
            "minimumWireAmount": rule.minimum.to_string(),
            "wireAmount": wire.to_string(),
        })));
    }

    Ok(wire)
}

/// Convert a refund amount; minimums do not apply to refunds, but the amount
/// must still be at least one wire unit.
pub fn to_wire_amount_unchecked(table: &[CurrencyRule], money: &Money) -> PaymentResult<Decimal> {
    let rule = rule_for(table, money.currency)?;
    let wire = base_to_wire(rule.unit, money)?;

    if wire <= Decimal::ZERO {
        return Err(PaymentError::validation(format!(
            "Amount {} is smaller than the smallest {} unit",
            money, money.currency
        ))
        .with_details(json!({
            "currency": money.currency.code(),
            "wireAmount": wire.to_string(),
        })));
    }

    Ok(wire)
}

/// Convert a wire amount reported by the gateway back to base units.
pub fn from_wire_amount(
    table: &[CurrencyRule],
    currency: Currency,
    wire: Decimal,
) -> PaymentResult<Money> {
    let rule = rule_for(table, currency)?;
    Ok(Money::new(wire_to_base(rule.unit, wire), currency))
}

/// Integer form of a wire amount, for gateways that only accept integers.
pub fn wire_to_i64(wire: Decimal) -> PaymentResult<i64> {
    use rust_decimal::prelude::ToPrimitive;

    wire.trunc()
        .to_i64()
        .ok_or_else(|| PaymentError::validation(format!("Amount {} is out of range", wire)))
}

/// Check a partial refund against the payment it refunds.
pub fn check_refund_amount(requested: &Money, original: &Money) -> PaymentResult<()> {
    if requested.currency != original.currency {
        return Err(PaymentError::validation(format!(
            "Refund currency {} does not match payment currency {}",
            requested.currency, original.currency
        )));
    }
    if requested.amount > original.amount {
        return Err(PaymentError::invalid_refund_amount(format!(
            "Refund amount {} exceeds the original payment of {}",
            requested, original
        ))
        .with_details(json!({
            "requested": requested.amount.to_string(),
            "original": original.amount.to_string(),
            "currency": original.currency.code(),
        })));
    }
    Ok(())
}

fn base_to_wire(unit: AmountUnit, money: &Money) -> PaymentResult<Decimal> {
    let rounded = |value: Decimal, scale: u32| {
        value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
    };

    let wire = match unit {
        AmountUnit::Minor { divisor } => money
            .amount
            .checked_mul(Decimal::from(divisor))
            .map(|value| rounded(value, 0)),
        AmountUnit::ZeroDecimal => Some(rounded(money.amount, 0)),
        AmountUnit::Major { scale } => Some(rounded(money.amount, scale)),
    };

    wire.ok_or_else(|| {
        PaymentError::validation(format!("Amount {} is out of range", money))
            .with_details(json!({ "currency": money.currency.code() }))
    })
}

fn wire_to_base(unit: AmountUnit, wire: Decimal) -> Decimal {
    match unit {
        AmountUnit::Minor { divisor } => wire / Decimal::from(divisor),
        AmountUnit::ZeroDecimal | AmountUnit::Major { .. } => wire,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::flutterwave::FLUTTERWAVE_CURRENCIES;
    use crate::adapters::paystack::PAYSTACK_CURRENCIES;
    use crate::adapters::stripe::STRIPE_CURRENCIES;
    use crate::domain::payment::PaymentErrorKind;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    const TABLE: &[CurrencyRule] = &[
        CurrencyRule::minor(Currency::NGN, 100, 5000),
        CurrencyRule::zero_decimal(Currency::JPY, 50),
        CurrencyRule::major(Currency::UGX, 0, 500),
        CurrencyRule::major(Currency::KES, 2, 10),
    ];

    #[test]
    fn minor_units_multiply_by_divisor() {
        let wire = to_wire_amount(TABLE, &Money::new(dec!(50.00), Currency::NGN)).unwrap();
        assert_eq!(wire, dec!(5000));
        assert_eq!(wire_to_i64(wire).unwrap(), 5000);
    }

    #[test]
    fn minor_units_round_half_away_from_zero() {
        let wire = to_wire_amount(TABLE, &Money::new(dec!(100.005), Currency::NGN)).unwrap();
        assert_eq!(wire, dec!(10001));
    }

    #[test]
    fn zero_decimal_rounds_base_amount() {
        let wire = to_wire_amount(TABLE, &Money::new(dec!(1234.5), Currency::JPY)).unwrap();
        assert_eq!(wire, dec!(1235));
    }

    #[test]
    fn major_units_keep_scale() {
        let wire = to_wire_amount(TABLE, &Money::new(dec!(99.999), Currency::KES)).unwrap();
        assert_eq!(wire, dec!(100.00));
    }

    #[test]
    fn unsupported_currency_lists_supported() {
        let err = to_wire_amount(TABLE, &Money::new(dec!(10), Currency::EUR)).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::UnsupportedCurrency);
        assert_eq!(
            err.details.unwrap()["supportedCurrencies"],
            json!(["NGN", "JPY", "UGX", "KES"])
        );
    }

    #[test]
    fn one_unit_below_minimum_fails_citing_minimum() {
        let err = to_wire_amount(TABLE, &Money::new(dec!(49.99), Currency::NGN)).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::Validation);
        assert!(err.message.contains("50.00 NGN"), "{}", err.message);
        assert_eq!(err.details.unwrap()["minimum"], "50.00 NGN");
    }

    #[test]
    fn exactly_minimum_succeeds() {
        assert!(to_wire_amount(TABLE, &Money::new(dec!(50), Currency::NGN)).is_ok());
        assert!(to_wire_amount(TABLE, &Money::new(dec!(50), Currency::JPY)).is_ok());
        assert!(to_wire_amount(TABLE, &Money::new(dec!(500), Currency::UGX)).is_ok());

        assert!(to_wire_amount(TABLE, &Money::new(dec!(49), Currency::JPY)).is_err());
        assert!(to_wire_amount(TABLE, &Money::new(dec!(499), Currency::UGX)).is_err());
    }

    #[test]
    fn unchecked_conversion_ignores_minimum() {
        let wire =
            to_wire_amount_unchecked(TABLE, &Money::new(dec!(1.50), Currency::NGN)).unwrap();
        assert_eq!(wire, dec!(150));
    }

    #[test]
    fn wire_to_base_is_exact_inverse() {
        let money = from_wire_amount(TABLE, Currency::NGN, dec!(123456)).unwrap();
        assert_eq!(money, Money::new(dec!(1234.56), Currency::NGN));
    }

    #[test]
    fn minimum_display_for_zero_decimal() {
        assert_eq!(TABLE[1].minimum_display(), "50 JPY");
    }

    #[test]
    fn refund_larger_than_original_is_rejected() {
        let original = Money::new(dec!(100), Currency::NGN);

        assert!(check_refund_amount(&Money::new(dec!(100), Currency::NGN), &original).is_ok());

        let err = check_refund_amount(&Money::new(dec!(100.01), Currency::NGN), &original)
            .unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::InvalidRefundAmount);

        let err =
            check_refund_amount(&Money::new(dec!(10), Currency::USD), &original).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::Validation);
    }

    #[test]
    fn unchecked_conversion_rejects_sub_unit_amounts() {
        let err = to_wire_amount_unchecked(TABLE, &Money::new(dec!(0.001), Currency::NGN))
            .unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::Validation);

        let err = to_wire_amount_unchecked(TABLE, &Money::new(dec!(0.4), Currency::JPY))
            .unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::Validation);

        let wire =
            to_wire_amount_unchecked(TABLE, &Money::new(dec!(0.005), Currency::NGN)).unwrap();
        assert_eq!(wire, dec!(1));
    }

    #[test]
    fn overflowing_amount_is_validation_error() {
        let huge = Money::new(Decimal::MAX, Currency::NGN);

        let err = to_wire_amount(TABLE, &huge).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::Validation);
        assert!(err.message.contains("out of range"), "{}", err.message);

        let err = to_wire_amount_unchecked(TABLE, &huge).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::Validation);
    }

    #[test]
    fn oversized_zero_decimal_amount_fails_integer_conversion() {
        let wire = to_wire_amount(TABLE, &Money::new(Decimal::MAX, Currency::JPY)).unwrap();
        assert_eq!(wire_to_i64(wire).unwrap_err().kind, PaymentErrorKind::Validation);
    }

    /// Decimal places a base amount can carry without losing wire precision.
    fn wire_precision(rule: &CurrencyRule) -> u32 {
        match rule.unit {
            AmountUnit::Minor { divisor } => divisor.ilog10(),
            AmountUnit::ZeroDecimal => 0,
            AmountUnit::Major { scale } => scale,
        }
    }

    fn assert_round_trip(table: &[CurrencyRule], index: usize, steps: i64) {
        let rule = &table[index % table.len()];
        let base = rule.minimum_base() + Decimal::new(steps, wire_precision(rule));
        let money = Money::new(base, rule.currency);

        let wire = to_wire_amount(table, &money).unwrap();
        let back = from_wire_amount(table, rule.currency, wire).unwrap();
        assert_eq!(back, money, "{} via {:?}", money, rule.unit);
    }

    proptest! {
        #[test]
        fn paystack_amounts_round_trip(index in 0usize..64, steps in 0i64..1_000_000_000i64) {
            assert_round_trip(PAYSTACK_CURRENCIES, index, steps);
        }

        #[test]
        fn flutterwave_amounts_round_trip(index in 0usize..64, steps in 0i64..1_000_000_000i64) {
            assert_round_trip(FLUTTERWAVE_CURRENCIES, index, steps);
        }

        #[test]
        fn stripe_amounts_round_trip(index in 0usize..64, steps in 0i64..1_000_000_000i64) {
            assert_round_trip(STRIPE_CURRENCIES, index, steps);
        }
    }

    #[test]
    fn every_rule_accepts_its_own_minimum() {
        for table in [PAYSTACK_CURRENCIES, FLUTTERWAVE_CURRENCIES, STRIPE_CURRENCIES] {
            for (index, _) in table.iter().enumerate() {
                assert_round_trip(table, index, 0);
            }
        }
    }
}

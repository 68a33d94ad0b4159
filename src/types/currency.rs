use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::fmt::{Display, Formatter};

const CURRENCY_SYMBOL: &str = "€";
const GROUP_SIZE: usize = 3;

/// Presentation wrapper rendering an amount as whole euros with thousands separators.
///
/// Rounding is half-even so that `€2` is produced for both `1.5` and `2.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Euro(pub Decimal);

impl Display for Euro {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        let digits = rounded.abs().trunc().to_string();

        write!(formatter, "{}{}{}", CURRENCY_SYMBOL, sign, group_thousands(&digits))
    }
}

/// Presentation wrapper rendering a fraction (`0.05`) as a percentage (`5%`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percent {
    fraction: Decimal,
    decimal_places: u32
}

impl Percent {
    pub fn new(fraction: Decimal, decimal_places: u32) -> Self {
        Self { fraction, decimal_places }
    }

    /// Whole-number percentage, used for contractual reserve rates.
    pub fn whole(fraction: Decimal) -> Self {
        Self::new(fraction, 0)
    }

    /// Two decimal places, used for derived ratios.
    pub fn precise(fraction: Decimal) -> Self {
        Self::new(fraction, 2)
    }
}

impl Display for Percent {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let scaled = (self.fraction * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointNearestEven);
        let scaled = if scaled.is_zero() { Decimal::ZERO } else { scaled };

        write!(formatter, "{:.*}%", self.decimal_places as usize, scaled)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / GROUP_SIZE);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % GROUP_SIZE == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

//! Rounding configuration shared by every quantity and price computation.
//!
//! A single [`NumericConfig`] value is threaded through each operation that
//! produces a decimal, so that all quantity and money outputs carry the
//! same precision, scale and rounding mode.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{Constraint, InvalidArgument};

/// Environment variable holding the number of significant digits.
pub const NUMERIC_PRECISION_ENV: &str = "MENU_NUMERIC_PRECISION";
/// Environment variable holding the number of fractional digits.
pub const NUMERIC_SCALE_ENV: &str = "MENU_NUMERIC_SCALE";
/// Environment variable holding the rounding mode name.
pub const NUMERIC_ROUNDING_ENV: &str = "MENU_NUMERIC_ROUNDING";

/// Environment abstraction for numeric configuration lookups.
///
/// Tests supply maps instead of mutating the process environment.
pub trait NumericEnv {
    /// Fetch a string value by name.
    fn string(&self, name: &str) -> Option<String>;
}

/// Environment access backed by the real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultNumericEnv;

impl NumericEnv for DefaultNumericEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// How a value is rounded when digits are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Towards zero.
    Down,
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
    /// To nearest; ties away from zero.
    HalfUp,
    /// To nearest; ties towards zero.
    HalfDown,
    /// To nearest; ties to the even neighbour.
    HalfEven,
}

impl RoundingMode {
    const NAMES: &'static str = "up|down|ceiling|floor|half_up|half_down|half_even";

    fn strategy(self) -> RoundingStrategy {
        match self {
            Self::Up => RoundingStrategy::AwayFromZero,
            Self::Down => RoundingStrategy::ToZero,
            Self::Ceiling => RoundingStrategy::ToPositiveInfinity,
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfDown => RoundingStrategy::MidpointTowardZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Ceiling => "ceiling",
            Self::Floor => "floor",
            Self::HalfUp => "half_up",
            Self::HalfDown => "half_down",
            Self::HalfEven => "half_even",
        })
    }
}

impl FromStr for RoundingMode {
    type Err = InvalidArgument;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "ceiling" => Ok(Self::Ceiling),
            "floor" => Ok(Self::Floor),
            "half_up" => Ok(Self::HalfUp),
            "half_down" => Ok(Self::HalfDown),
            "half_even" => Ok(Self::HalfEven),
            _ => Err(InvalidArgument::unknown_value(
                "rounding",
                value,
                Self::NAMES,
            )),
        }
    }
}

/// Precision, scale and rounding mode applied by [`NumericConfig::round`].
///
/// # Examples
/// ```
/// use menu_planner::domain::NumericConfig;
/// use rust_decimal::Decimal;
///
/// let numeric = NumericConfig::default();
/// let value = numeric.round(Decimal::new(17, 0));
/// assert_eq!(value.to_string(), "17.000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericConfig {
    precision: u32,
    scale: u32,
    rounding: RoundingMode,
}

impl NumericConfig {
    /// Significant digits kept by default.
    pub const DEFAULT_PRECISION: u32 = 28;
    /// Fractional digits kept by default.
    pub const DEFAULT_SCALE: u32 = 6;
    /// Rounding mode used by default.
    pub const DEFAULT_ROUNDING: RoundingMode = RoundingMode::HalfUp;

    const MIN_PRECISION: u32 = 1;
    const MAX_PRECISION: u32 = 28;
    const MAX_SCALE: u32 = 28;

    /// Validate and build a configuration.
    pub fn try_new(
        precision: u32,
        scale: u32,
        rounding: RoundingMode,
    ) -> Result<Self, InvalidArgument> {
        if !(Self::MIN_PRECISION..=Self::MAX_PRECISION).contains(&precision) {
            return Err(InvalidArgument::new(
                "precision",
                Constraint::Between {
                    min: Self::MIN_PRECISION,
                    max: Self::MAX_PRECISION,
                    actual: precision,
                },
            ));
        }
        if scale > Self::MAX_SCALE {
            return Err(InvalidArgument::new(
                "scale",
                Constraint::Between {
                    min: 0,
                    max: Self::MAX_SCALE,
                    actual: scale,
                },
            ));
        }
        Ok(Self {
            precision,
            scale,
            rounding,
        })
    }

    /// Load configuration from the real process environment.
    ///
    /// Reads `MENU_NUMERIC_PRECISION` (default 28, clamped to 1..=28),
    /// `MENU_NUMERIC_SCALE` (default 6, clamped to 0..=28) and
    /// `MENU_NUMERIC_ROUNDING` (default `half_up`).
    pub fn from_env() -> Self {
        Self::from_env_with(&DefaultNumericEnv)
    }

    /// Load configuration from a custom environment source.
    pub fn from_env_with(env: &impl NumericEnv) -> Self {
        let precision = read_u32(env, NUMERIC_PRECISION_ENV, Self::DEFAULT_PRECISION)
            .clamp(Self::MIN_PRECISION, Self::MAX_PRECISION);
        let scale = read_u32(env, NUMERIC_SCALE_ENV, Self::DEFAULT_SCALE).min(Self::MAX_SCALE);
        let rounding = match env.string(NUMERIC_ROUNDING_ENV) {
            None => Self::DEFAULT_ROUNDING,
            Some(raw) => raw.parse().unwrap_or_else(|error| {
                warn!(%error, "invalid {NUMERIC_ROUNDING_ENV}; using default");
                Self::DEFAULT_ROUNDING
            }),
        };
        Self {
            precision,
            scale,
            rounding,
        }
    }

    /// Significant digits kept.
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Fractional digits in every rounded result.
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Rounding mode applied when digits are discarded.
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Round to the configured significant digits, then to the configured
    /// scale, and pad so the result carries exactly `scale` fractional
    /// digits.
    pub fn round(&self, value: Decimal) -> Decimal {
        let strategy = self.rounding.strategy();
        let significant = value
            .round_sf_with_strategy(self.precision, strategy)
            .unwrap_or(value);
        let mut rounded = significant.round_dp_with_strategy(self.scale, strategy);
        rounded.rescale(self.scale);
        rounded
    }

    /// Multiply two decimals and round the product.
    ///
    /// Products that overflow saturate at [`Decimal::MAX`] or
    /// [`Decimal::MIN`].
    pub fn mul(&self, lhs: Decimal, rhs: Decimal) -> Decimal {
        self.product([lhs, rhs])
    }

    /// Multiply every factor and round the result once.
    pub fn product<I>(&self, factors: I) -> Decimal
    where
        I: IntoIterator<Item = Decimal>,
    {
        let mut accumulated = Some(Decimal::ONE);
        let mut negative = false;
        for factor in factors {
            if factor.is_zero() {
                return self.round(Decimal::ZERO);
            }
            negative ^= factor.is_sign_negative();
            accumulated = accumulated.and_then(|value| value.checked_mul(factor));
        }
        let product = accumulated.unwrap_or(if negative { Decimal::MIN } else { Decimal::MAX });
        self.round(product)
    }

    /// Add every term and round the sum once, saturating on overflow.
    pub fn sum<I>(&self, terms: I) -> Decimal
    where
        I: IntoIterator<Item = Decimal>,
    {
        let total = terms
            .into_iter()
            .fold(Decimal::ZERO, |total, term| total.saturating_add(term));
        self.round(total)
    }
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            precision: Self::DEFAULT_PRECISION,
            scale: Self::DEFAULT_SCALE,
            rounding: Self::DEFAULT_ROUNDING,
        }
    }
}

fn read_u32(env: &impl NumericEnv, name: &str, default: u32) -> u32 {
    let Some(raw) = env.string(name) else {
        return default;
    };
    raw.trim().parse::<u32>().unwrap_or_else(|error| {
        warn!(value = %raw, %error, "invalid {name}; using default {default}");
        default
    })
}

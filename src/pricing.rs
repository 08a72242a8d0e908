//! Amount, slippage and gas arithmetic.
//!
//! Everything here is pure integer math so the values handed to the bridge
//! contract are exact: no float ever touches a wei amount.

use alloy::primitives::{utils::parse_ether, U256};

use crate::error::OrchestratorError;
use crate::types::GasPlan;

/// Decimal places kept when turning a slippage fraction into a ratio
const MAX_SLIPPAGE_DECIMALS: usize = 18;

/// Slippage tolerance as an exact decimal ratio `numerator / denominator`.
///
/// Built from the shortest decimal rendering of the fraction, so `0.95`
/// is exactly `95 / 100` rather than the nearest binary float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slippage {
    numerator: u128,
    denominator: u128,
}

impl Slippage {
    /// Validate `fraction` is within (0, 1] and convert it.
    pub fn from_fraction(fraction: f64) -> Result<Self, OrchestratorError> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(OrchestratorError::InvalidSlippage(fraction));
        }

        let rendered = fraction.to_string();
        let (whole, frac) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
        if frac.len() > MAX_SLIPPAGE_DECIMALS {
            return Err(OrchestratorError::InvalidSlippage(fraction));
        }

        let denominator = 10u128.pow(frac.len() as u32);
        let digits = format!("{}{}", whole, frac);
        let numerator: u128 = digits
            .parse()
            .map_err(|_| OrchestratorError::InvalidSlippage(fraction))?;
        if numerator == 0 {
            return Err(OrchestratorError::InvalidSlippage(fraction));
        }

        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u128 {
        self.numerator
    }

    pub fn denominator(&self) -> u128 {
        self.denominator
    }

    /// `floor(quoted * self)`; never exceeds `quoted`.
    pub fn min_amount_out(&self, quoted: U256) -> U256 {
        let num = U256::from(self.numerator);
        let den = U256::from(self.denominator);
        // split so the product cannot overflow for any quoted value
        (quoted / den) * num + (quoted % den) * num / den
    }
}

/// Parse a decimal native-unit amount into wei, rejecting zero and negatives.
pub fn parse_amount(amount: &str) -> Result<U256, OrchestratorError> {
    let trimmed = amount.trim();
    let invalid = |reason: String| OrchestratorError::InvalidAmount {
        amount: amount.to_string(),
        reason,
    };

    if trimmed.starts_with('-') {
        return Err(invalid("amount must be positive".to_string()));
    }

    let wei = parse_ether(trimmed).map_err(|e| invalid(e.to_string()))?;
    if wei.is_zero() {
        return Err(invalid("amount must be positive".to_string()));
    }
    Ok(wei)
}

impl GasPlan {
    /// `max_fee = base_fee + priority_fee`; `None` on overflow.
    pub fn from_base_fee(base_fee: u128, priority_fee: u128) -> Option<Self> {
        let max_fee = base_fee.checked_add(priority_fee)?;
        Some(Self {
            base_fee,
            priority_fee,
            max_fee,
        })
    }
}

/// Add `buffer_percent` on top of a gas estimate, saturating at `u64::MAX`.
pub fn buffered_gas_limit(estimate: u64, buffer_percent: u32) -> u64 {
    let buffered = estimate as u128 * (100 + buffer_percent as u128) / 100;
    buffered.min(u64::MAX as u128) as u64
}

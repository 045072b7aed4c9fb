//! Check digit algorithms
//!
//! Every format descriptor names one algorithm together with its parameters:
//!
//! ```yaml
//! checksum:
//!   name: mod10
//!   evens_multiplier: 1
//!   odds_multiplier: 2
//! ```
//!
//! All algorithms share the same contract: given the serial number and the
//! check digit captured from the tracking number, return whether they agree.
//! Malformed input (non-numeric digits, wrong length) never errors, it simply
//! fails validation.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Fixed UPU S10 weights, applied to the 8 serial digits.
const S10_WEIGHTS: [u64; 8] = [8, 6, 4, 2, 3, 5, 9, 7];

/// Check digit algorithm with its parameters.
///
/// An unknown `name` fails deserialization, which surfaces as a
/// configuration error from the definition loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum Checksum {
    /// Weighted mod 10. Letters are mapped to digits with `(code - 3) % 10`.
    #[serde(rename = "mod10")]
    Mod10 {
        evens_multiplier: u64,
        odds_multiplier: u64,
    },

    /// Serial number as an integer, mod 7.
    #[serde(rename = "mod7")]
    Mod7,

    /// UPU S10 international postal items.
    #[serde(rename = "s10")]
    S10,

    /// Weighted sum reduced by two successive moduli.
    #[serde(rename = "sum_product_with_weightings_and_modulo")]
    SumProductWithWeightingsAndModulo {
        weightings: Vec<u64>,
        modulo1: u64,
        modulo2: u64,
    },
}

impl Checksum {
    /// Validate a serial number against its check digit.
    pub fn validate(&self, serial_number: &str, check_digit: &str) -> bool {
        let Some(check_digit) = parse_check_digit(check_digit) else {
            return false;
        };

        match self {
            Checksum::Mod10 {
                evens_multiplier,
                odds_multiplier,
            } => mod10(serial_number, check_digit, *evens_multiplier, *odds_multiplier),
            Checksum::Mod7 => mod7(serial_number, check_digit),
            Checksum::S10 => s10(serial_number, check_digit),
            Checksum::SumProductWithWeightingsAndModulo {
                weightings,
                modulo1,
                modulo2,
            } => sum_product_with_weightings_and_modulo(
                serial_number,
                check_digit,
                weightings,
                *modulo1,
                *modulo2,
            ),
        }
    }

    /// Name of the algorithm as written in definition documents.
    pub fn name(&self) -> &'static str {
        match self {
            Checksum::Mod10 { .. } => "mod10",
            Checksum::Mod7 => "mod7",
            Checksum::S10 => "s10",
            Checksum::SumProductWithWeightingsAndModulo { .. } => {
                "sum_product_with_weightings_and_modulo"
            }
        }
    }

    /// Reject parameter sets that cannot be evaluated.
    pub(crate) fn check_parameters(&self) -> Result<()> {
        if let Checksum::SumProductWithWeightingsAndModulo {
            weightings,
            modulo1,
            modulo2,
        } = self
        {
            if weightings.is_empty() {
                return Err(EngineError::Configuration(format!(
                    "{} requires at least one weighting",
                    self.name()
                )));
            }
            if *modulo1 == 0 || *modulo2 == 0 {
                return Err(EngineError::Configuration(format!(
                    "{} moduli must be non-zero",
                    self.name()
                )));
            }
        }
        Ok(())
    }
}

fn parse_check_digit(check_digit: &str) -> Option<u64> {
    check_digit.parse().ok()
}

fn digits(sequence: &str) -> Option<Vec<u64>> {
    sequence
        .chars()
        .map(|c| c.to_digit(10).map(u64::from))
        .collect()
}

/// `10 - (sum % 10)` over the weighted characters.
///
/// The result lies in 1..=10, so a check digit of `0` never validates.
fn mod10(sequence: &str, check_digit: u64, evens_multiplier: u64, odds_multiplier: u64) -> bool {
    if sequence.is_empty() {
        return false;
    }

    let total = sequence.chars().enumerate().try_fold(0u64, |total, (i, c)| {
        let value = match c.to_digit(10) {
            Some(d) => u64::from(d),
            None => u64::from(c).saturating_sub(3) % 10,
        };
        let multiplier = if i % 2 == 1 {
            odds_multiplier
        } else {
            evens_multiplier
        };
        total.checked_add(value.checked_mul(multiplier)?)
    });

    // Overflow rejects the candidate
    let Some(total) = total else {
        return false;
    };

    10 - (total % 10) == check_digit
}

fn mod7(sequence: &str, check_digit: u64) -> bool {
    if sequence.is_empty() || !sequence.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match sequence.parse::<u128>() {
        Ok(value) => value % 7 == u128::from(check_digit),
        Err(_) => false,
    }
}

fn s10(sequence: &str, check_digit: u64) -> bool {
    let Some(values) = digits(sequence) else {
        return false;
    };
    if values.len() != S10_WEIGHTS.len() {
        return false;
    }

    let total: u64 = values.iter().zip(S10_WEIGHTS).map(|(d, w)| d * w).sum();

    let expected = match total % 11 {
        1 => 0,
        0 => 5,
        remainder => 11 - remainder,
    };

    expected == check_digit
}

fn sum_product_with_weightings_and_modulo(
    sequence: &str,
    check_digit: u64,
    weightings: &[u64],
    modulo1: u64,
    modulo2: u64,
) -> bool {
    if modulo1 == 0 || modulo2 == 0 {
        return false;
    }
    let Some(values) = digits(sequence) else {
        return false;
    };
    if values.is_empty() || values.len() != weightings.len() {
        return false;
    }

    let total = values
        .iter()
        .zip(weightings)
        .try_fold(0u64, |total, (d, w)| total.checked_add(d.checked_mul(*w)?));

    match total {
        Some(total) => (total % modulo1) % modulo2 == check_digit,
        None => false,
    }
}

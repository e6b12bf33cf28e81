#![forbid(unsafe_code)]

use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;

/// How a freshly allocated table is filled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Init {
    /// every value is `0.0`
    Zeros,
    /// every value is `value`
    Constant {
        /// fill value
        value: f32,
    },
    /// independent draws from `[low, high)`, reproducible per `seed`
    Uniform {
        /// inclusive lower bound
        low: f32,
        /// exclusive upper bound
        high: f32,
        /// ChaCha8 seed
        #[serde(default)]
        seed: u64,
    },
}

impl Default for Init {
    /// Uniform `[0, 1)` with seed 0.
    fn default() -> Self {
        Init::Uniform {
            low: 0.0,
            high: 1.0,
            seed: 0,
        }
    }
}

impl Init {
    /// Check the policy parameters without allocating.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        match *self {
            Init::Zeros => Ok(()),
            Init::Constant { value } if value.is_finite() => Ok(()),
            Init::Constant { value } => Err(EmbeddingError::InvalidInit(format!(
                "constant {value} is not finite"
            ))),
            Init::Uniform { low, high, .. } => {
                if !(low.is_finite() && high.is_finite() && (high - low).is_finite()) {
                    Err(EmbeddingError::InvalidInit(format!(
                        "uniform bounds [{low}, {high}) must be finite"
                    )))
                } else if low >= high {
                    Err(EmbeddingError::InvalidInit(format!(
                        "uniform bounds [{low}, {high}) are empty"
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Produce `len` values according to the policy.
    pub fn fill(&self, len: usize) -> Result<Vec<f32>, EmbeddingError> {
        self.validate()?;
        let values = match *self {
            Init::Zeros => vec![0.0; len],
            Init::Constant { value } => vec![value; len],
            Init::Uniform { low, high, seed } => {
                let dist = Uniform::new(low, high);
                let mut rng = make_rng(seed);
                dist.sample_iter(&mut rng).take(len).collect()
            }
        };
        Ok(values)
    }

    /// True when `value` is something this policy can produce.
    pub fn admits(&self, value: f32) -> bool {
        match *self {
            Init::Zeros => value == 0.0,
            Init::Constant { value: c } => value == c,
            Init::Uniform { low, high, .. } => (low..high).contains(&value),
        }
    }
}

/// Simple RNG wrapper returning a seeded ChaCha8Rng
pub fn make_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

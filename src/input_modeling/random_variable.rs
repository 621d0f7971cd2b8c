//! Random variables underpin the stochastic timing of stations, and a
//! deterministic time is simply a random variable with a single value of
//! probability 1.  Common continuous distributions, with their common
//! parameterizations, are wrapped in the `Continuous` enum.

use rand::distributions::Distribution;
use serde::{Deserialize, Serialize};
use rand_distr::{
    Beta, Exp, Gamma, LogNormal, Normal, NormalError, Triangular, Uniform, Weibull,
};

use super::dynamic_rng::DynRng;
use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Continuous {
    Beta { alpha: f64, beta: f64 },
    Constant { value: f64 },
    Exp { lambda: f64 },
    Gamma { shape: f64, scale: f64 },
    LogNormal { mu: f64, sigma: f64 },
    Normal { mean: f64, std_dev: f64 },
    Triangular { min: f64, max: f64, mode: f64 },
    Uniform { min: f64, max: f64 },
    Weibull { shape: f64, scale: f64 },
}

impl Continuous {
    /// An exponential distribution parameterized by its mean rather than its
    /// rate.
    pub fn exponential_with_mean(mean: f64) -> Self {
        Continuous::Exp {
            lambda: 1.0 / mean,
        }
    }

    /// Builds the underlying distribution without drawing from it, so bad
    /// parameters surface when a model is loaded or validated.
    pub fn check(&self) -> Result<(), SimulationError> {
        match self {
            Continuous::Beta { alpha, beta } => {
                Beta::new(*alpha, *beta)?;
            }
            Continuous::Constant { .. } => {}
            Continuous::Exp { lambda } => {
                Exp::new(*lambda)?;
            }
            Continuous::Gamma { shape, scale } => {
                Gamma::new(*shape, *scale)?;
            }
            // Both constructors accept a negative deviation.
            Continuous::LogNormal { mu, sigma } => {
                if *sigma < 0.0 {
                    return Err(NormalError::BadVariance.into());
                }
                LogNormal::new(*mu, *sigma)?;
            }
            Continuous::Normal { mean, std_dev } => {
                if *std_dev < 0.0 {
                    return Err(NormalError::BadVariance.into());
                }
                Normal::new(*mean, *std_dev)?;
            }
            Continuous::Triangular { min, max, mode } => {
                Triangular::new(*min, *max, *mode)?;
            }
            Continuous::Uniform { min, max } => {
                if !(min < max) {
                    return Err(SimulationError::UniformError {
                        min: *min,
                        max: *max,
                    });
                }
            }
            Continuous::Weibull { shape, scale } => {
                Weibull::new(*scale, *shape)?;
            }
        }
        Ok(())
    }

    /// The generation of random variates drives stochastic behaviors during
    /// simulation execution.  This function requires the random number
    /// generator of the simulation, and produces a f64 random variate.
    pub fn random_variate(&self, rng: &DynRng) -> Result<f64, SimulationError> {
        let mut rng = rng.borrow_mut();
        let rng = &mut *rng;
        match self {
            Continuous::Beta { alpha, beta } => Ok(Beta::new(*alpha, *beta)?.sample(rng)),
            Continuous::Constant { value } => Ok(*value),
            Continuous::Exp { lambda } => Ok(Exp::new(*lambda)?.sample(rng)),
            Continuous::Gamma { shape, scale } => Ok(Gamma::new(*shape, *scale)?.sample(rng)),
            Continuous::LogNormal { mu, sigma } => Ok(LogNormal::new(*mu, *sigma)?.sample(rng)),
            Continuous::Normal { mean, std_dev } => Ok(Normal::new(*mean, *std_dev)?.sample(rng)),
            Continuous::Triangular { min, max, mode } => {
                Ok(Triangular::new(*min, *max, *mode)?.sample(rng))
            }
            Continuous::Uniform { min, max } => {
                self.check()?;
                Ok(Uniform::new(*min, *max).sample(rng))
            }
            Continuous::Weibull { shape, scale } => {
                Ok(Weibull::new(*scale, *shape)?.sample(rng))
            }
        }
    }

    /// The expected value, where it has a closed form.  Used for display.
    pub fn mean(&self) -> Option<f64> {
        match self {
            Continuous::Beta { alpha, beta } => Some(alpha / (alpha + beta)),
            Continuous::Constant { value } => Some(*value),
            Continuous::Exp { lambda } => Some(1.0 / lambda),
            Continuous::Gamma { shape, scale } => Some(shape * scale),
            Continuous::LogNormal { mu, sigma } => Some((mu + sigma.powi(2) / 2.0).exp()),
            Continuous::Normal { mean, .. } => Some(*mean),
            Continuous::Triangular { min, max, mode } => Some((min + max + mode) / 3.0),
            Continuous::Uniform { min, max } => Some((min + max) / 2.0),
            Continuous::Weibull { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_modeling::dynamic_rng::default_rng;

    fn empirical_mean(variable: &Continuous, sample_size: usize) -> f64 {
        let rng = default_rng();
        (0..sample_size)
            .map(|_| variable.random_variate(&rng).unwrap())
            .sum::<f64>()
            / (sample_size as f64)
    }

    fn chi_square(
        variable: &Continuous,
        bin_mapping_fn: fn(f64) -> usize,
        expected_counts: &[usize],
    ) -> f64 {
        let mut class_counts = vec![0; expected_counts.len()];
        let rng = default_rng();
        let sample_size = expected_counts.iter().sum();
        (0..sample_size).for_each(|_| {
            let index = bin_mapping_fn(variable.random_variate(&rng).unwrap());
            class_counts[index] += 1
        });
        class_counts.iter().zip(expected_counts.iter()).fold(
            0.0,
            |acc, (class_count, expected_count)| {
                let f_class_count = *class_count as f64;
                let f_expected_count = *expected_count as f64;
                acc + (f_class_count - f_expected_count).powi(2) / f_expected_count
            },
        )
    }

    #[test]
    fn exponential_samples_match_expectation() {
        let variable = Continuous::exponential_with_mean(50.0);
        let mean = empirical_mean(&variable, 10000);
        assert!((mean - 50.0).abs() / 50.0 < 0.025);
    }

    #[test]
    fn gamma_samples_match_expectation() {
        let variable = Continuous::Gamma {
            shape: 7.0,
            scale: 11.0,
        };
        let mean = empirical_mean(&variable, 10000);
        let expected = variable.mean().unwrap();
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn normal_samples_chi_square() {
        fn bins_mapping(variate: f64) -> usize {
            let mean = 11.0;
            let std_dev = 3.0;
            if variate < mean - 3.0 * std_dev {
                0
            } else if variate < mean - 2.0 * std_dev {
                1
            } else if variate < mean - std_dev {
                2
            } else if variate < mean {
                3
            } else if variate < mean + std_dev {
                4
            } else if variate < mean + 2.0 * std_dev {
                5
            } else if variate < mean + 3.0 * std_dev {
                6
            } else {
                7
            }
        }
        let variable = Continuous::Normal {
            mean: 11.0,
            std_dev: 3.0,
        };
        // On each side: within 1 sigma, 1 sigma to 2 sigma, 2 sigma to 3 sigma, 3+ sigma
        let expected_counts: [usize; 8] = [20, 210, 1360, 3410, 3410, 1360, 210, 20];
        // Significance level 0.01, 7 degrees of freedom
        let chi_square_critical = 18.475;
        assert![chi_square(&variable, bins_mapping, &expected_counts) < chi_square_critical];
    }

    #[test]
    fn triangular_samples_chi_square() {
        fn bins_mapping(variate: f64) -> usize {
            ((variate - 5.0) / 5.0) as usize
        }
        let variable = Continuous::Triangular {
            min: 5.0,
            max: 25.0,
            mode: 15.0,
        };
        // 4 classes/bins - each of width 5
        let expected_counts: [usize; 4] = [125, 375, 375, 125];
        // Significance level 0.01, 3 degrees of freedom
        let chi_square_critical = 11.345;
        assert![chi_square(&variable, bins_mapping, &expected_counts) < chi_square_critical];
    }

    #[test]
    fn constant_is_deterministic() {
        let rng = default_rng();
        let variable = Continuous::Constant { value: 12.5 };
        assert!((0..10).all(|_| variable.random_variate(&rng).unwrap() == 12.5));
    }

    #[test]
    fn invalid_parameters_are_errors() {
        let rng = default_rng();
        assert!(Continuous::Exp { lambda: -1.0 }.random_variate(&rng).is_err());
        assert!(Continuous::Uniform { min: 3.0, max: 3.0 }
            .random_variate(&rng)
            .is_err());
    }

    #[test]
    fn parameters_are_checked_without_sampling() {
        assert!(Continuous::Uniform { min: 5.0, max: 1.0 }.check().is_err());
        assert!(Continuous::Exp { lambda: -1.0 }.check().is_err());
        assert!(Continuous::Normal {
            mean: 10.0,
            std_dev: -2.0
        }
        .check()
        .is_err());
        assert!(Continuous::Triangular {
            min: 5.0,
            max: 1.0,
            mode: 3.0
        }
        .check()
        .is_err());
        assert!(Continuous::Gamma {
            shape: 7.0,
            scale: 11.0
        }
        .check()
        .is_ok());
        assert!(Continuous::Constant { value: -3.0 }.check().is_ok());
    }
}

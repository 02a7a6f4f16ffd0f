use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use super::config::SimulatorConfig;
use super::error::Error;

/// Monte-Carlo estimate of how many of `participants` independent people,
/// each redeeming with `probability`, actually redeem.
#[derive(Debug, Clone)]
pub struct RedemptionSimulator {
    pub trials: usize,
    pub participants: usize,
    pub probability: f64,
    pub threshold: usize,
    seed: Option<u64>,
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub trials: usize,
    pub participants: usize,
    pub threshold: usize,
    /// `histogram[k]` = number of trials with exactly `k` redemptions.
    pub histogram: Vec<usize>,
}

impl RedemptionSimulator {
    pub fn new(config: &SimulatorConfig) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&config.probability) {
            return Err(Error::ConfigLoadError(format!(
                "simulator.probability must lie in [0, 1], got {}",
                config.probability
            )));
        }
        if config.threshold > config.participants {
            return Err(Error::ConfigLoadError(format!(
                "simulator.threshold ({}) exceeds simulator.participants ({})",
                config.threshold, config.participants
            )));
        }
        if config.trials == 0 {
            return Err(Error::ConfigLoadError(
                "simulator.trials must be at least 1".into(),
            ));
        }

        Ok(RedemptionSimulator {
            trials: config.trials,
            participants: config.participants,
            probability: config.probability,
            threshold: config.threshold,
            seed: config.seed,
        })
    }

    /// Runs with the configured seed, or OS entropy when none is set.
    pub fn run(&self) -> SimulationReport {
        let mut rng = match self.seed {
            Some(seed) => {
                debug!("Seeding simulator with {}.", seed);
                SmallRng::seed_from_u64(seed)
            }
            None => SmallRng::from_os_rng(),
        };
        self.run_with_rng(&mut rng)
    }

    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> SimulationReport {
        let mut histogram = vec![0; self.participants + 1];

        for _ in 0..self.trials {
            let redeemed = (0..self.participants)
                .filter(|_| rng.random_bool(self.probability))
                .count();
            histogram[redeemed] += 1;
        }

        info!(
            "Simulated {} trials of {} participants.",
            self.trials, self.participants
        );

        SimulationReport {
            trials: self.trials,
            participants: self.participants,
            threshold: self.threshold,
            histogram,
        }
    }
}

impl SimulationReport {
    fn fraction(&self, hits: usize) -> f64 {
        hits as f64 / self.trials as f64
    }

    pub fn exactly_threshold(&self) -> f64 {
        self.fraction(self.histogram[self.threshold])
    }

    pub fn all_redeemed(&self) -> f64 {
        self.fraction(self.histogram[self.participants])
    }

    pub fn at_least_threshold(&self) -> f64 {
        self.fraction(self.histogram[self.threshold..].iter().sum())
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "redeemed,trials")?;
        for (k, hits) in self.histogram.iter().enumerate() {
            writeln!(f, "{},{}", k, hits)?;
        }
        writeln!(
            f,
            "P(exactly {}) = {:.4}",
            self.threshold,
            self.exactly_threshold()
        )?;
        writeln!(
            f,
            "P(all {}) = {:.4}",
            self.participants,
            self.all_redeemed()
        )?;
        write!(
            f,
            "P(at least {}) = {:.4}",
            self.threshold,
            self.at_least_threshold()
        )
    }
}

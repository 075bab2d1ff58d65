//! Bounded variate generation.
//!
//! Produces samples spread over a `[min, max]` envelope and then pulled
//! toward the expected value by a normally distributed fraction of the gap:
//!
//! ```text
//! x' = x + N(pull_mean, pull_std_dev) * (expected - x)
//! ```
//!
//! With the default pull `N(0.5, 0.17)` a sample moves on average halfway
//! toward `expected`. The pull is unbounded, so a small share of outputs
//! land outside the envelope. Outputs are never clamped.

use crate::config::{DEFAULT_PULL_MEAN, DEFAULT_PULL_STD_DEV};
use crate::core::bounds::FactorBounds;
use crate::core::error::{ScenarioError, ScenarioResult};
use crate::core::risk_factor::RiskFactor;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Envelope widening applied by [`SamplingMethod::Uniform`].
pub const UNIFORM_ENVELOPE_WIDENING: f64 = 1.1;

/// How raw envelope points are laid out before the pull is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMethod {
    /// Evenly spaced grid over `[min, max)` with step `(max - min) / n`.
    #[default]
    Grid,
    /// Uniform draws over `[min, min + 1.1 * (max - min))`.
    Uniform,
}

impl std::str::FromStr for SamplingMethod {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(SamplingMethod::Grid),
            "uniform" => Ok(SamplingMethod::Uniform),
            other => Err(ScenarioError::config(format!(
                "unknown sampling method '{}', expected 'grid' or 'uniform'",
                other
            ))),
        }
    }
}

/// Generates samples biased toward an expected value.
///
/// One generator uses one [`SamplingMethod`] for every call.
///
/// # Examples
///
/// ```
/// use scenario_engine::core::bounds::FactorBounds;
/// use scenario_engine::simulation::variate::BoundedVariateGenerator;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let generator = BoundedVariateGenerator::default();
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let samples = generator
///     .sample(&mut rng, &FactorBounds::new(0.03, 0.045, 0.06), 500)
///     .unwrap();
/// assert_eq!(samples.len(), 500);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedVariateGenerator {
    method: SamplingMethod,
    pull: Normal<f64>,
}

impl Default for BoundedVariateGenerator {
    fn default() -> Self {
        Self {
            method: SamplingMethod::Grid,
            pull: default_pull(),
        }
    }
}

fn default_pull() -> Normal<f64> {
    match Normal::new(DEFAULT_PULL_MEAN, DEFAULT_PULL_STD_DEV) {
        Ok(normal) => normal,
        Err(_) => unreachable!("default pull parameters are finite"),
    }
}

impl BoundedVariateGenerator {
    /// Generator with the default `N(0.5, 0.17)` pull.
    pub fn new(method: SamplingMethod) -> Self {
        Self {
            method,
            pull: default_pull(),
        }
    }

    /// Generator with a custom pull distribution.
    pub fn with_pull(method: SamplingMethod, mean: f64, std_dev: f64) -> ScenarioResult<Self> {
        if !mean.is_finite() || !std_dev.is_finite() {
            return Err(ScenarioError::config(format!(
                "pull parameters must be finite, got N({}, {})",
                mean, std_dev
            )));
        }
        let pull = Normal::new(mean, std_dev).map_err(|e| {
            ScenarioError::config(format!("invalid pull std dev {}: {}", std_dev, e))
        })?;
        Ok(Self { method, pull })
    }

    pub fn method(&self) -> SamplingMethod {
        self.method
    }

    /// Draw `n` samples for `expected` within `[min, max]`.
    ///
    /// Fails with [`ScenarioError::DegenerateInput`] when `n == 0` and with
    /// [`ScenarioError::InvalidEnvelope`] unless `min < expected < max`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        expected: f64,
        min: f64,
        max: f64,
        n: usize,
    ) -> ScenarioResult<Vec<f64>> {
        self.sample(rng, &FactorBounds::new(min, expected, max), n)
    }

    /// Same as [`generate`](Self::generate), taking the bounds as a struct.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &FactorBounds,
        n: usize,
    ) -> ScenarioResult<Vec<f64>> {
        if !bounds.is_valid() {
            return Err(ScenarioError::InvalidEnvelope {
                min: bounds.min,
                expected: bounds.expected,
                max: bounds.max,
            });
        }
        self.draw(rng, bounds, n)
    }

    /// Draw `n` samples for `factor`, reporting bound violations against it.
    pub fn sample_factor<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        factor: RiskFactor,
        bounds: &FactorBounds,
        n: usize,
    ) -> ScenarioResult<Vec<f64>> {
        bounds.check(factor)?;
        let samples = self.draw(rng, bounds, n)?;
        log::debug!("generated {} {:?} samples for {}", samples.len(), self.method, factor);
        Ok(samples)
    }

    fn draw<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &FactorBounds,
        n: usize,
    ) -> ScenarioResult<Vec<f64>> {
        if n == 0 {
            return Err(ScenarioError::DegenerateInput);
        }

        let raw = match self.method {
            SamplingMethod::Grid => grid_points(bounds, n),
            SamplingMethod::Uniform => uniform_points(rng, bounds, n),
        };

        let expected = bounds.expected;
        Ok(raw
            .into_iter()
            .map(|x| x + self.pull.sample(rng) * (expected - x))
            .collect())
    }
}

/// Evenly spaced points over `[min, max)`, resized to exactly `n`.
///
/// Floating-point rounding can leave the grid one point short or long: it is
/// padded with `expected` at the back or trimmed from the front.
fn grid_points(bounds: &FactorBounds, n: usize) -> Vec<f64> {
    let step = bounds.width() / n as f64;
    let mut points: Vec<f64> = (0..=n)
        .map(|i| bounds.min + i as f64 * step)
        .take_while(|x| *x < bounds.max)
        .collect();

    if points.len() < n {
        points.resize(n, bounds.expected);
    } else if points.len() > n {
        let excess = points.len() - n;
        points.drain(..excess);
    }
    points
}

/// `n` uniform draws over the envelope widened by 10%.
fn uniform_points<R: Rng + ?Sized>(rng: &mut R, bounds: &FactorBounds, n: usize) -> Vec<f64> {
    let size = bounds.width() * UNIFORM_ENVELOPE_WIDENING;
    let upper = bounds.min + size;
    (0..n).map(|_| rng.gen_range(bounds.min..upper)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_grid_points_cover_half_open_envelope() {
        let points = grid_points(&FactorBounds::new(0.0, 5.0, 10.0), 10);
        assert_eq!(points.len(), 10);
        assert_abs_diff_eq!(points[0], 0.0);
        assert_abs_diff_eq!(points[9], 9.0, epsilon = 1e-12);
        assert!(points.iter().all(|x| *x < 10.0));
    }

    #[test]
    fn test_grid_points_single_sample() {
        let points = grid_points(&FactorBounds::new(1.0, 2.0, 3.0), 1);
        assert_eq!(points, vec![1.0]);
    }

    #[test]
    fn test_grid_points_exact_length_for_awkward_steps() {
        let bounds = FactorBounds::new(0.1, 0.2, 0.7);
        for n in 1..200 {
            assert_eq!(grid_points(&bounds, n).len(), n, "n = {}", n);
        }
    }

    #[test]
    fn test_generate_returns_n_values() {
        let generator = BoundedVariateGenerator::default();
        let out = generator.generate(&mut rng(1), 5.0, 1.0, 10.0, 137).unwrap();
        assert_eq!(out.len(), 137);
        assert!(out.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_uniform_returns_n_values() {
        let generator = BoundedVariateGenerator::new(SamplingMethod::Uniform);
        let out = generator.generate(&mut rng(2), 5.0, 1.0, 10.0, 64).unwrap();
        assert_eq!(out.len(), 64);
    }

    #[test]
    fn test_zero_samples_is_degenerate() {
        let generator = BoundedVariateGenerator::default();
        let err = generator.generate(&mut rng(3), 5.0, 1.0, 10.0, 0).unwrap_err();
        assert!(matches!(err, ScenarioError::DegenerateInput));
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let generator = BoundedVariateGenerator::default();
        let err = generator.generate(&mut rng(4), 3.0, 5.0, 10.0, 10).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidEnvelope { .. }));
    }

    #[test]
    fn test_non_finite_envelopes_rejected() {
        for method in [SamplingMethod::Grid, SamplingMethod::Uniform] {
            let generator = BoundedVariateGenerator::new(method);
            let err = generator
                .generate(&mut rng(4), 0.045, f64::NEG_INFINITY, 0.06, 10)
                .unwrap_err();
            assert!(matches!(err, ScenarioError::InvalidEnvelope { .. }));

            // Finite endpoints whose width overflows.
            let err = generator.generate(&mut rng(4), 0.0, -1e308, 1e308, 5).unwrap_err();
            assert!(matches!(err, ScenarioError::InvalidEnvelope { .. }));
        }
    }

    #[test]
    fn test_sample_factor_rejects_infinite_bounds() {
        let generator = BoundedVariateGenerator::new(SamplingMethod::Uniform);
        let bounds = FactorBounds::new(0.03, 0.045, f64::INFINITY);
        let err = generator
            .sample_factor(&mut rng(4), RiskFactor::Ipca, &bounds, 10)
            .unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidBounds { factor: RiskFactor::Ipca, .. }));
    }

    #[test]
    fn test_sample_factor_names_factor() {
        let generator = BoundedVariateGenerator::default();
        let bounds = FactorBounds::new(0.2, 0.1, 0.3);
        let err = generator
            .sample_factor(&mut rng(4), RiskFactor::Cambio, &bounds, 10)
            .unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidBounds { factor: RiskFactor::Cambio, .. }));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let generator = BoundedVariateGenerator::default();
        let a = generator.generate(&mut rng(42), 5.0, 1.0, 10.0, 100).unwrap();
        let b = generator.generate(&mut rng(42), 5.0, 1.0, 10.0, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let generator = BoundedVariateGenerator::default();
        let a = generator.generate(&mut rng(1), 5.0, 1.0, 10.0, 100).unwrap();
        let b = generator.generate(&mut rng(2), 5.0, 1.0, 10.0, 100).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_pull_variance_is_exact_midpoint() {
        // With a deterministic pull of 0.5 each grid point moves exactly halfway.
        let generator = BoundedVariateGenerator::with_pull(SamplingMethod::Grid, 0.5, 0.0).unwrap();
        let out = generator.generate(&mut rng(5), 6.0, 0.0, 10.0, 5).unwrap();
        let expected = [3.0, 4.0, 5.0, 6.0, 7.0];
        for (got, want) in out.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_grid_mean_is_pulled_toward_expected() {
        // Grid mean is (min + max - step) / 2; the pull moves it halfway to expected.
        let generator = BoundedVariateGenerator::default();
        let n = 20_000;
        let out = generator.generate(&mut rng(9), 8.0, 0.0, 10.0, n).unwrap();
        let mean = out.iter().sum::<f64>() / n as f64;
        let grid_mean = (10.0 - 10.0 / n as f64) / 2.0;
        let want = grid_mean + 0.5 * (8.0 - grid_mean);
        assert_abs_diff_eq!(mean, want, epsilon = 0.05);
    }

    #[test]
    fn test_uniform_mean_is_pulled_toward_expected() {
        let generator = BoundedVariateGenerator::new(SamplingMethod::Uniform);
        let n = 20_000;
        let out = generator.generate(&mut rng(10), 2.0, 0.0, 10.0, n).unwrap();
        let mean = out.iter().sum::<f64>() / n as f64;
        // Raw uniform mean over [0, 11) is 5.5.
        let want = 5.5 + 0.5 * (2.0 - 5.5);
        assert_abs_diff_eq!(mean, want, epsilon = 0.1);
    }

    #[test]
    fn test_outputs_are_not_clamped() {
        // A wide pull pushes some samples past the envelope.
        let generator = BoundedVariateGenerator::with_pull(SamplingMethod::Grid, 0.5, 2.0).unwrap();
        let out = generator.generate(&mut rng(11), 5.0, 0.0, 10.0, 2_000).unwrap();
        let bounds = FactorBounds::new(0.0, 5.0, 10.0);
        assert!(out.iter().any(|x| !bounds.contains(*x)));
    }

    #[test]
    fn test_with_pull_rejects_bad_parameters() {
        assert!(BoundedVariateGenerator::with_pull(SamplingMethod::Grid, 0.5, -1.0).is_err());
        assert!(BoundedVariateGenerator::with_pull(SamplingMethod::Grid, 0.5, f64::INFINITY).is_err());
        assert!(BoundedVariateGenerator::with_pull(SamplingMethod::Grid, f64::NAN, 0.1).is_err());
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("GRID".parse::<SamplingMethod>().unwrap(), SamplingMethod::Grid);
        assert_eq!("uniform".parse::<SamplingMethod>().unwrap(), SamplingMethod::Uniform);
        assert!("sobol".parse::<SamplingMethod>().is_err());
    }
}

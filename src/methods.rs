//! The noise methods a layer can be generated from.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Noise variant backing one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    /// Seeded lattice noise, output nominally in [-1,1].
    Perlin,
    /// `sin((x + y) * frequency)`, output in [-1,1]. Stateless; useful as a
    /// regression baseline since values are analytic.
    Sine,
    /// `cos((x + y) * frequency)`, output in [-1,1]. Stateless.
    Cosine,
    /// `1 - |perlin|`, output in [0,1]. Sharp ridges along noise zero crossings.
    Ridged,
    /// `|perlin|`, output in [0,1]. Rounded, bulging forms.
    Billow,
}

impl std::fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perlin => write!(f, "perlin"),
            Self::Sine => write!(f, "sine"),
            Self::Cosine => write!(f, "cosine"),
            Self::Ridged => write!(f, "ridged"),
            Self::Billow => write!(f, "billow"),
        }
    }
}

/// Point sampler for a single layer. Pure: the same (coordinate, frequency,
/// seed, method) always yields the same value.
pub struct NoiseEvaluator {
    method: GenerationMethod,
    perlin: Perlin,
}

impl NoiseEvaluator {
    pub fn new(method: GenerationMethod, seed: u32) -> Self {
        Self {
            method,
            perlin: Perlin::new(seed),
        }
    }

    /// Sample the noise at a grid coordinate normalized by the map side
    /// (x and y in [0,1)), scaled by `frequency`.
    pub fn evaluate(&self, x: f64, y: f64, frequency: f64) -> f64 {
        match self.method {
            GenerationMethod::Perlin => self.perlin.get([x * frequency, y * frequency]),
            GenerationMethod::Sine => ((x + y) * frequency).sin(),
            GenerationMethod::Cosine => ((x + y) * frequency).cos(),
            GenerationMethod::Ridged => 1.0 - self.perlin.get([x * frequency, y * frequency]).abs(),
            GenerationMethod::Billow => self.perlin.get([x * frequency, y * frequency]).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<(f64, f64)> {
        let mut points = Vec::new();
        for i in 0..16 {
            for j in 0..16 {
                points.push((i as f64 / 16.0, j as f64 / 16.0));
            }
        }
        points
    }

    #[test]
    fn test_sine_cosine_are_analytic() {
        let sine = NoiseEvaluator::new(GenerationMethod::Sine, 0);
        let cosine = NoiseEvaluator::new(GenerationMethod::Cosine, 0);

        assert_eq!(sine.evaluate(0.0, 0.0, 8.0), 0.0);
        assert_eq!(cosine.evaluate(0.0, 0.0, 8.0), 1.0);

        let expected = (0.75f64 * 4.0).sin();
        assert!((sine.evaluate(0.25, 0.5, 4.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ridged_and_billow_ranges() {
        let ridged = NoiseEvaluator::new(GenerationMethod::Ridged, 7);
        let billow = NoiseEvaluator::new(GenerationMethod::Billow, 7);

        for (x, y) in sample_points() {
            let r = ridged.evaluate(x, y, 5.0);
            let b = billow.evaluate(x, y, 5.0);
            assert!((0.0..=1.0).contains(&r), "ridged out of range: {}", r);
            assert!((0.0..=1.0).contains(&b), "billow out of range: {}", b);
        }
    }

    #[test]
    fn test_perlin_is_deterministic_per_seed() {
        let a = NoiseEvaluator::new(GenerationMethod::Perlin, 42);
        let b = NoiseEvaluator::new(GenerationMethod::Perlin, 42);

        for (x, y) in sample_points() {
            assert_eq!(a.evaluate(x, y, 3.0), b.evaluate(x, y, 3.0));
        }
    }
}

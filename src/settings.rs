//! Layer and run configuration, config-file loading, and the per-iteration
//! randomized settings producer.

use std::fs;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::methods::GenerationMethod;

// =============================================================================
// PARAMETER LIMITS
// =============================================================================

/// Upper bound on octave passes per layer.
pub const MAX_OCTAVES: u32 = 12;

/// Feature scale bounds (larger scale = broader features).
pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 1000.0;

/// Layer weight bounds applied during compositing.
pub const MIN_WEIGHT: f32 = 0.1;
pub const MAX_WEIGHT: f32 = 10.0;

/// Per-octave amplitude decay bounds.
pub const MIN_PERSISTENCE: f32 = 0.1;
pub const MAX_PERSISTENCE: f32 = 1.0;

/// High-octave damping bounds (1.0 keeps only the base octave).
pub const MIN_SMOOTHING: f32 = 0.1;
pub const MAX_SMOOTHING: f32 = 1.0;

// =============================================================================
// SETTINGS TYPES
// =============================================================================

/// Configuration of one noise layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSettings {
    /// Which noise variant samples this layer.
    pub method: GenerationMethod,
    /// Number of frequency/amplitude passes (0 yields a flat zero layer).
    pub octaves: u32,
    /// Feature scale; the base sampling frequency is `map_size / scale`.
    pub scale: f32,
    /// Multiplier applied to this layer's contribution during compositing.
    pub weight: f32,
    /// Amplitude decay per octave.
    pub persistence: f32,
    /// High-octave damping; higher values flatten the layer.
    pub smoothing: f32,
    /// Scale octaves past the first by the first octave's own sample.
    #[serde(default)]
    pub use_first_octave_as_mask: bool,
    /// Scale this layer's contribution by the reference layer's raw map.
    #[serde(default)]
    pub use_first_height_map_as_mask: bool,
    /// Use `1 - reference` instead of `reference` as the mask value.
    #[serde(default)]
    pub invert_first_height_map_mask: bool,
    /// Subtract this layer's contribution instead of adding it.
    #[serde(default)]
    pub subtract_from_map: bool,
    /// Inactive layers are skipped entirely during a run.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl LayerSettings {
    /// Clamp every numeric parameter into its documented range.
    pub fn clamp_to_limits(&mut self) {
        self.octaves = self.octaves.min(MAX_OCTAVES);
        self.scale = self.scale.clamp(MIN_SCALE, MAX_SCALE);
        self.weight = self.weight.clamp(MIN_WEIGHT, MAX_WEIGHT);
        self.persistence = self.persistence.clamp(MIN_PERSISTENCE, MAX_PERSISTENCE);
        self.smoothing = self.smoothing.clamp(MIN_SMOOTHING, MAX_SMOOTHING);
    }
}

/// Everything one generation pass needs. Layer order is significant: the
/// first layer is the mask reference for every layer that masks.
#[derive(Clone, Debug)]
pub struct RunSettings {
    /// Side length of the square map.
    pub map_size: usize,
    /// Seed for the layers' noise evaluators. Fixed settings (including this
    /// seed) always produce the same map.
    pub noise_seed: u32,
    pub layers: Vec<LayerSettings>,
}

// =============================================================================
// CONFIGURATION FILE
// =============================================================================

/// Per-parameter perturbation limits for the randomized settings producer.
/// A factor of zero leaves that parameter untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizationFactors {
    pub octaves: u32,
    pub scale: f32,
    pub weight: f32,
    pub persistence: f32,
    pub smoothing: f32,
}

/// The on-disk generator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Side length of the square map.
    pub map_size: usize,
    /// How many maps to generate in one invocation.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Re-roll every layer's mask/subtract flags each iteration.
    #[serde(default)]
    pub randomize_masks: bool,
    /// Randomly deactivate layers each iteration (3-in-10 chance per layer).
    #[serde(default)]
    pub randomize_active_layers: bool,
    #[serde(default)]
    pub randomization: RandomizationFactors,
    pub layers: Vec<LayerSettings>,
}

fn default_iterations() -> usize {
    1
}

/// Load and validate a configuration file.
pub fn load_config(path: &str) -> Result<GeneratorConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut config: GeneratorConfig =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;

    for layer in &mut config.layers {
        layer.clamp_to_limits();
    }
    Ok(config)
}

// =============================================================================
// RANDOMIZED SETTINGS PRODUCER
// =============================================================================

/// Build one iteration's run settings from the base configuration, perturbing
/// each numeric parameter by a quantized uniform offset within its
/// randomization factor and re-clamping. All randomness comes from the passed
/// generator; the core pipeline itself never sees one.
pub fn randomized_run_settings(config: &GeneratorConfig, rng: &mut impl Rng) -> RunSettings {
    let factors = &config.randomization;
    let mut layers = Vec::with_capacity(config.layers.len());

    for base in &config.layers {
        let mut layer = base.clone();

        let octave_shift = rand_step(rng, factors.octaves as f32, 1.0) as i32;
        layer.octaves = (base.octaves as i32 + octave_shift).clamp(0, MAX_OCTAVES as i32) as u32;
        layer.scale = base.scale + rand_step(rng, factors.scale, 0.01);
        layer.weight = base.weight + rand_step(rng, factors.weight, 0.01);
        layer.persistence = base.persistence + rand_step(rng, factors.persistence, 0.01);
        layer.smoothing = base.smoothing + rand_step(rng, factors.smoothing, 0.01);
        layer.clamp_to_limits();

        if config.randomize_active_layers && rng.gen_range(0..10) > 6 {
            layer.active = false;
        }
        if config.randomize_masks {
            layer.use_first_octave_as_mask = rng.gen_bool(0.5);
            layer.use_first_height_map_as_mask = rng.gen_bool(0.5);
            layer.invert_first_height_map_mask = rng.gen_bool(0.5);
            layer.subtract_from_map = rng.gen_bool(0.5);
        }

        layers.push(layer);
    }

    RunSettings {
        map_size: config.map_size,
        noise_seed: rng.gen(),
        layers,
    }
}

/// Uniform value in [-limit, limit) quantized to `precision` steps.
fn rand_step(rng: &mut impl Rng, limit: f32, precision: f32) -> f32 {
    let steps = (limit / precision) as i32;
    if steps == 0 {
        return 0.0;
    }
    rng.gen_range(-steps..steps) as f32 * precision
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn base_layer() -> LayerSettings {
        LayerSettings {
            method: GenerationMethod::Perlin,
            octaves: 4,
            scale: 100.0,
            weight: 1.0,
            persistence: 0.5,
            smoothing: 0.5,
            use_first_octave_as_mask: false,
            use_first_height_map_as_mask: false,
            invert_first_height_map_mask: false,
            subtract_from_map: false,
            active: true,
        }
    }

    #[test]
    fn test_clamp_to_limits() {
        let mut layer = base_layer();
        layer.octaves = 40;
        layer.scale = 0.0;
        layer.weight = 99.0;
        layer.persistence = -1.0;
        layer.smoothing = 2.0;
        layer.clamp_to_limits();

        assert_eq!(layer.octaves, MAX_OCTAVES);
        assert_eq!(layer.scale, MIN_SCALE);
        assert_eq!(layer.weight, MAX_WEIGHT);
        assert_eq!(layer.persistence, MIN_PERSISTENCE);
        assert_eq!(layer.smoothing, MAX_SMOOTHING);
    }

    #[test]
    fn test_config_defaults() {
        let json = r#"{
            "map_size": 64,
            "layers": [
                { "method": "sine", "octaves": 2, "scale": 50,
                  "weight": 1.0, "persistence": 0.5, "smoothing": 0.3 }
            ]
        }"#;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.iterations, 1);
        assert!(!config.randomize_masks);
        assert_eq!(config.randomization.octaves, 0);

        let layer = &config.layers[0];
        assert_eq!(layer.method, GenerationMethod::Sine);
        assert!(layer.active);
        assert!(!layer.use_first_height_map_as_mask);
        assert!(!layer.subtract_from_map);
    }

    #[test]
    fn test_randomized_settings_stay_in_range() {
        let config = GeneratorConfig {
            map_size: 32,
            iterations: 1,
            randomize_masks: true,
            randomize_active_layers: true,
            randomization: RandomizationFactors {
                octaves: 20,
                scale: 5000.0,
                weight: 50.0,
                persistence: 3.0,
                smoothing: 3.0,
            },
            layers: vec![base_layer(), base_layer(), base_layer()],
        };

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..50 {
            let run = randomized_run_settings(&config, &mut rng);
            assert_eq!(run.layers.len(), 3);
            for layer in &run.layers {
                assert!(layer.octaves <= MAX_OCTAVES);
                assert!((MIN_SCALE..=MAX_SCALE).contains(&layer.scale));
                assert!((MIN_WEIGHT..=MAX_WEIGHT).contains(&layer.weight));
                assert!((MIN_PERSISTENCE..=MAX_PERSISTENCE).contains(&layer.persistence));
                assert!((MIN_SMOOTHING..=MAX_SMOOTHING).contains(&layer.smoothing));
            }
        }
    }

    #[test]
    fn test_zero_factors_leave_parameters_untouched() {
        let config = GeneratorConfig {
            map_size: 32,
            iterations: 1,
            randomize_masks: false,
            randomize_active_layers: false,
            randomization: RandomizationFactors::default(),
            layers: vec![base_layer()],
        };

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let run = randomized_run_settings(&config, &mut rng);
        let expected = base_layer();
        assert_eq!(run.layers[0], expected);
    }
}

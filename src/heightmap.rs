//! The map generation pipeline: per-layer octave accumulation, weighted
//! compositing with masking, and normalization into [0,1].

use rayon::prelude::*;

use crate::error::GenerationError;
use crate::grid::HeightMap;
use crate::methods::NoiseEvaluator;
use crate::settings::{LayerSettings, RunSettings};

// =============================================================================
// OCTAVE ACCUMULATION
// =============================================================================

/// Build one layer's raw height map by sampling its evaluator across
/// `octaves` passes of doubling frequency and decaying amplitude.
///
/// Zero octaves yield a flat zero map without sampling the evaluator at all.
pub fn accumulate_octaves(
    evaluator: &NoiseEvaluator,
    layer: &LayerSettings,
    size: usize,
) -> HeightMap {
    let mut map = HeightMap::new_with(size, size, 0.0);
    if layer.octaves == 0 {
        return map;
    }

    // One noise period spans the map when scale equals the map size.
    let base_frequency = size as f64 / layer.scale as f64;
    // Damping per octave on top of persistence; at smoothing = 1 only the
    // base octave survives.
    let damping = 1.0 - layer.smoothing;

    for y in 0..size {
        for x in 0..size {
            let nx = x as f64 / size as f64;
            let ny = y as f64 / size as f64;

            let mut value = 0.0f32;
            let mut octave_mask = 1.0f32;
            let mut frequency = base_frequency;
            let mut amplitude = 1.0f32;

            for octave in 0..layer.octaves {
                let sample = evaluator.evaluate(nx, ny, frequency) as f32;
                if octave == 0 {
                    value += sample * amplitude;
                    if layer.use_first_octave_as_mask {
                        octave_mask = ((sample + 1.0) * 0.5).clamp(0.0, 1.0);
                    }
                } else {
                    value += sample * amplitude * octave_mask;
                }
                frequency *= 2.0;
                amplitude *= layer.persistence * damping;
            }

            map.set(x, y, value);
        }
    }

    map
}

// =============================================================================
// LAYER COMPOSITING
// =============================================================================

/// Merge the active layers' raw maps into one map and capture its extrema.
///
/// `raw_maps` and `layers` are index-aligned and hold active layers only, in
/// settings order; index 0 is the mask reference for every masking layer.
/// The returned min/max are taken over the final per-cell sums, which is what
/// lets normalization land exactly in [0,1].
pub fn merge_layer_maps(
    raw_maps: &[HeightMap],
    layers: &[LayerSettings],
    size: usize,
) -> (HeightMap, f32, f32) {
    assert_eq!(raw_maps.len(), layers.len());

    let mut merged = HeightMap::new_with(size, size, 0.0);
    if raw_maps.is_empty() {
        return (merged, 0.0, 0.0);
    }

    let mask_source = &raw_maps[0];
    let mut min_value = f32::MAX;
    let mut max_value = f32::MIN;

    for y in 0..size {
        for x in 0..size {
            let mut total = 0.0f32;
            for (map, layer) in raw_maps.iter().zip(layers) {
                let mut contribution = *map.get(x, y) * layer.weight;
                if layer.use_first_height_map_as_mask {
                    let reference = *mask_source.get(x, y);
                    contribution *= if layer.invert_first_height_map_mask {
                        1.0 - reference
                    } else {
                        reference
                    };
                }
                if layer.subtract_from_map {
                    contribution = -contribution;
                }
                total += contribution;
            }

            merged.set(x, y, total);
            if total > max_value {
                max_value = total;
            }
            if total < min_value {
                min_value = total;
            }
        }
    }

    (merged, min_value, max_value)
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Rescale a map into [0,1] by inverse linear interpolation against the
/// extrema captured during compositing. A flat input (max == min) has no
/// defined rescaling and falls back to the all-zero map.
pub fn normalize_map(map: &HeightMap, min: f32, max: f32) -> HeightMap {
    let mut normalized = HeightMap::new_with(map.width, map.height, 0.0);

    let range = max - min;
    if range.abs() < f32::EPSILON {
        return normalized;
    }

    for (x, y, &value) in map.iter() {
        normalized.set(x, y, (value - min) / range);
    }
    normalized
}

// =============================================================================
// GENERATION PIPELINE
// =============================================================================

/// Run one full generation pass: accumulate every active layer's octaves,
/// composite, normalize.
///
/// Layer accumulation is independent per layer and runs in parallel; the
/// collect is the barrier that guarantees the mask reference is complete
/// before compositing reads it.
pub fn generate(settings: &RunSettings) -> Result<HeightMap, GenerationError> {
    let size = settings.map_size;
    if size == 0 {
        return Err(GenerationError::InvalidMapSize);
    }

    let active: Vec<LayerSettings> = settings
        .layers
        .iter()
        .filter(|layer| layer.active)
        .cloned()
        .collect();
    if active.is_empty() {
        return Ok(HeightMap::new_with(size, size, 0.0));
    }

    // The first configured layer is the designated mask reference. If it was
    // deactivated while a dependent layer still masks, the run cannot produce
    // a meaningful map.
    let reference_active = settings.layers.first().is_some_and(|layer| layer.active);
    if !reference_active {
        if let Some(layer) = settings
            .layers
            .iter()
            .position(|layer| layer.active && layer.use_first_height_map_as_mask)
        {
            return Err(GenerationError::MissingMaskReference { layer });
        }
    }

    let raw_maps: Vec<HeightMap> = active
        .par_iter()
        .enumerate()
        .map(|(i, layer)| {
            let seed = settings.noise_seed.wrapping_add(i as u32 * 1111);
            let evaluator = NoiseEvaluator::new(layer.method, seed);
            accumulate_octaves(&evaluator, layer, size)
        })
        .collect();

    let (merged, min_value, max_value) = merge_layer_maps(&raw_maps, &active, size);
    Ok(normalize_map(&merged, min_value, max_value))
}

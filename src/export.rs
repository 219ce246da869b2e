//! Image serialization for generated height maps.

use image::{GrayImage, Luma};

use crate::grid::HeightMap;

/// Export a normalized height map as an 8-bit grayscale image.
///
/// Values are expected in [0,1]; anything outside (including NaN) is counted,
/// reported as a single warning, and clamped rather than rejected.
pub fn export_heightmap(map: &HeightMap, path: &str) -> Result<(), image::ImageError> {
    let mut img = GrayImage::new(map.width as u32, map.height as u32);

    let mut out_of_range = 0usize;
    for (x, y, &value) in map.iter() {
        if !(0.0..=1.0).contains(&value) {
            out_of_range += 1;
        }
        let level = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        img.put_pixel(x as u32, y as u32, Luma([level]));
    }

    if out_of_range > 0 {
        eprintln!(
            "Warning: {} map value(s) outside [0,1] were clamped during export",
            out_of_range
        );
    }

    img.save(path)
}

//! Spectrum summarisation and the byte-spectrum shaping WebAudio applies.
//!
//! `energy` is what the frame loop uses. `SpectrumShaper` reproduces
//! `AnalyserNode::getByteFrequencyData` (Blackman window, temporal smoothing,
//! dB range mapping) so the native FFT produces bytes on the same scale as
//! the browser analyser.

use crate::constants::ENERGY_SCALE_DIVISOR;

/// Arithmetic mean of the band magnitudes; 0 for an empty sample.
pub fn energy(sample: &[u8]) -> f32 {
    if sample.is_empty() {
        return 0.0;
    }
    let sum: u32 = sample.iter().map(|&b| b as u32).sum();
    sum as f32 / sample.len() as f32
}

/// `1 + energy / 500`: shared by the particle field pulse and the camera zoom.
#[inline]
pub fn energy_factor(energy: f32) -> f32 {
    1.0 + energy / ENERGY_SCALE_DIVISOR
}

/// Blackman window coefficient (alpha = 0.16) for sample `i` of `n`.
pub fn blackman(i: usize, n: usize) -> f32 {
    if n <= 1 {
        return 1.0;
    }
    let x = i as f32 / n as f32;
    let tau = std::f32::consts::TAU;
    0.42 - 0.5 * (tau * x).cos() + 0.08 * (2.0 * tau * x).cos()
}

pub const DEFAULT_MIN_DB: f32 = -100.0;
pub const DEFAULT_MAX_DB: f32 = -30.0;
pub const DEFAULT_SMOOTHING: f32 = 0.8;

/// Converts linear FFT magnitudes into smoothed 0..=255 bytes.
#[derive(Clone, Debug)]
pub struct SpectrumShaper {
    smoothing: f32,
    min_db: f32,
    max_db: f32,
    smoothed: Vec<f32>,
}

impl Default for SpectrumShaper {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING, DEFAULT_MIN_DB, DEFAULT_MAX_DB)
    }
}

impl SpectrumShaper {
    pub fn new(smoothing: f32, min_db: f32, max_db: f32) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            min_db,
            max_db: max_db.max(min_db + f32::EPSILON),
            smoothed: Vec::new(),
        }
    }

    /// `magnitudes` are already normalised by the FFT size.
    pub fn shape(&mut self, magnitudes: &[f32], out: &mut Vec<u8>) {
        if self.smoothed.len() != magnitudes.len() {
            self.smoothed = vec![0.0; magnitudes.len()];
        }
        out.clear();
        let span = self.max_db - self.min_db;
        for (prev, &m) in self.smoothed.iter_mut().zip(magnitudes) {
            let m = if m.is_finite() { m.abs() } else { 0.0 };
            *prev = self.smoothing * *prev + (1.0 - self.smoothing) * m;
            let db = if *prev > 0.0 {
                20.0 * prev.log10()
            } else {
                f32::NEG_INFINITY
            };
            let scaled = 255.0 * (db - self.min_db) / span;
            out.push(scaled.clamp(0.0, 255.0) as u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_is_mean_and_zero_when_empty() {
        assert_eq!(energy(&[]), 0.0);
        assert_eq!(energy(&[0, 255]), 127.5);
        assert_eq!(energy(&[10, 20, 30, 40]), 25.0);
        assert_eq!(energy(&[255; 128]), 255.0);
    }

    #[test]
    fn factor_spans_one_to_one_and_a_half() {
        assert_eq!(energy_factor(0.0), 1.0);
        assert!((energy_factor(255.0) - 1.51).abs() < 1e-6);
    }

    #[test]
    fn shaper_maps_db_range_to_bytes() {
        let mut shaper = SpectrumShaper::new(0.0, -100.0, -30.0);
        let mut out = Vec::new();
        // above -30 dB saturates, below -100 dB floors, silence is 0
        let db = |v: f32| 10f32.powf(v / 20.0);
        shaper.shape(&[db(-29.0), db(-101.0), 0.0, 1.0, db(-65.0)], &mut out);
        assert_eq!(&out[..4], &[255, 0, 0, 255]);
        assert!((126..=128).contains(&out[4]));
    }

    #[test]
    fn shaper_smooths_over_time() {
        let mut shaper = SpectrumShaper::default();
        let mut first = Vec::new();
        let mut second = Vec::new();
        let loud = [10f32.powf(-40.0 / 20.0)];
        shaper.shape(&loud, &mut first);
        shaper.shape(&loud, &mut second);
        assert!(second[0] > first[0]);
    }

    #[test]
    fn blackman_is_zero_at_edge_and_one_in_middle() {
        assert!(blackman(0, 256).abs() < 1e-6);
        assert!((blackman(128, 256) - 1.0).abs() < 1e-4);
    }
}

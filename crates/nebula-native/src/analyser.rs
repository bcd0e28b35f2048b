//! Byte spectrum from the samples the output stream just played.

use nebula_core::{blackman, FrequencySource, SpectrumShaper};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Ring of the most recent mono output samples, written by the audio callback.
pub struct Tap {
    samples: VecDeque<f32>,
    capacity: usize,
}

pub type SharedTap = Arc<Mutex<Tap>>;

impl Tap {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn shared(capacity: usize) -> SharedTap {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Copy the latest samples into `out`, right-aligned and zero-padded.
    pub fn copy_latest(&self, out: &mut [f32]) {
        let n = self.samples.len().min(out.len());
        let pad = out.len() - n;
        out[..pad].fill(0.0);
        let skip = self.samples.len() - n;
        for (dst, src) in out[pad..].iter_mut().zip(self.samples.iter().skip(skip)) {
            *dst = *src;
        }
    }
}

pub struct FftAnalyser {
    tap: SharedTap,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    frame: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
    shaper: SpectrumShaper,
}

impl FftAnalyser {
    /// `fft_size` is rounded up to a power of two; the spectrum has half as
    /// many bands.
    pub fn new(fft_size: usize, tap: SharedTap) -> Self {
        let size = fft_size.max(2).next_power_of_two();
        let fft = FftPlanner::new().plan_fft_forward(size);
        Self {
            tap,
            fft,
            window: (0..size).map(|i| blackman(i, size)).collect(),
            frame: vec![0.0; size],
            buffer: vec![Complex::new(0.0, 0.0); size],
            magnitudes: vec![0.0; size / 2],
            shaper: SpectrumShaper::default(),
        }
    }

    pub fn bands(&self) -> usize {
        self.magnitudes.len()
    }

    /// Window, transform and shape one block of `fft_size` samples.
    pub fn analyse(&mut self, samples: &[f32], out: &mut Vec<u8>) {
        let n = self.buffer.len();
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let s = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);
        let norm = 1.0 / n as f32;
        for (m, c) in self.magnitudes.iter_mut().zip(&self.buffer) {
            *m = c.norm() * norm;
        }
        self.shaper.shape(&self.magnitudes, out);
    }
}

impl FrequencySource for FftAnalyser {
    fn frequency_data(&mut self, out: &mut Vec<u8>) -> bool {
        {
            let Ok(tap) = self.tap.lock() else {
                return false;
            };
            if tap.is_empty() {
                return false;
            }
            tap.copy_latest(&mut self.frame);
        }
        let frame = std::mem::take(&mut self.frame);
        self.analyse(&frame, out);
        self.frame = frame;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(bin: usize, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (std::f32::consts::TAU * bin as f32 * i as f32 / n as f32).sin())
            .collect()
    }

    #[test]
    fn tap_keeps_only_latest_samples() {
        let mut tap = Tap::new(4);
        for i in 0..6 {
            tap.push(i as f32);
        }
        let mut out = [9.0; 4];
        tap.copy_latest(&mut out);
        assert_eq!(out, [2.0, 3.0, 4.0, 5.0]);

        let mut short = Tap::new(4);
        short.push(1.0);
        let mut out = [9.0; 3];
        short.copy_latest(&mut out);
        assert_eq!(out, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn sine_peaks_in_its_band() {
        let mut analyser = FftAnalyser::new(256, Tap::shared(256));
        assert_eq!(analyser.bands(), 128);
        let mut out = Vec::new();
        analyser.analyse(&sine(8, 256), &mut out);
        assert_eq!(out.len(), 128);
        assert_eq!(out[8], 255);
        assert!(out[64] < 128, "far band leaked: {}", out[64]);
    }

    #[test]
    fn silence_is_zero() {
        let mut analyser = FftAnalyser::new(256, Tap::shared(256));
        let mut out = Vec::new();
        analyser.analyse(&[0.0; 256], &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_tap_reports_no_data() {
        let tap = Tap::shared(256);
        let mut analyser = FftAnalyser::new(256, tap.clone());
        let mut out = vec![7u8; 3];
        assert!(!analyser.frequency_data(&mut out));
        assert_eq!(out, vec![7u8; 3]);

        {
            let mut t = tap.lock().unwrap();
            for s in sine(8, 256) {
                t.push(s);
            }
        }
        assert!(analyser.frequency_data(&mut out));
        assert_eq!(out.len(), 128);
        assert_eq!(out[8], 255);
    }
}

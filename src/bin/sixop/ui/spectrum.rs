//! FFT spectrum view with logarithmically spaced bins.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Displayed frequency bins, log-spaced from 20 Hz to Nyquist.
const BINS: usize = 64;

/// Display floor in dB; bins below this sit on the axis.
const FLOOR_DB: f64 = -90.0;

/// Frame-to-frame smoothing: keep this much of the previous magnitude.
const SMOOTHING: f64 = 0.5;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    window_gain: f32,
    scratch: Vec<Complex<f32>>,
    bin_indices: Vec<usize>,
    bins: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_len: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(fft_len);

        // Hann window against spectral leakage.
        let window: Vec<f32> = (0..fft_len)
            .map(|i| {
                let phase = std::f32::consts::TAU * i as f32 / fft_len as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect();
        let window_gain: f32 = window.iter().sum();

        // Pick one FFT bin per display bin, spaced logarithmically.
        let nyquist = (sample_rate / 2.0).max(1.0) as f64;
        let min_freq = 20.0f64.min(nyquist);
        let ratio = nyquist / min_freq;
        let half = (fft_len / 2).max(1);
        let bin_indices: Vec<usize> = (0..BINS)
            .map(|i| {
                let t = i as f64 / (BINS - 1) as f64;
                let freq = min_freq * ratio.powf(t);
                let index = (freq * fft_len as f64 / sample_rate as f64).round() as usize;
                index.clamp(1, half - 1)
            })
            .collect();

        let bins = (0..BINS).map(|i| (i as f64, FLOOR_DB)).collect();

        Self {
            fft,
            window,
            window_gain,
            scratch: vec![Complex::new(0.0, 0.0); fft_len],
            bin_indices,
            bins,
        }
    }

    /// Feed a fresh block of samples; ignored unless it matches the FFT
    /// length.
    pub fn update(&mut self, samples: &[f32]) {
        if samples.len() != self.window.len() {
            return;
        }

        for (slot, (sample, coef)) in self
            .scratch
            .iter_mut()
            .zip(samples.iter().zip(&self.window))
        {
            slot.re = sample * coef;
            slot.im = 0.0;
        }
        self.fft.process(&mut self.scratch);

        for (display, &index) in self.bins.iter_mut().zip(&self.bin_indices) {
            let bin = self.scratch[index];
            // Single-sided amplitude, corrected for the window gain.
            let amplitude = 2.0 * bin.norm() / self.window_gain;
            let db = (20.0 * (amplitude.max(1e-9) as f64).log10()).max(FLOOR_DB);
            display.1 = display.1 * SMOOTHING + db * (1.0 - SMOOTHING);
        }
    }

    pub fn bins(&self) -> &[(f64, f64)] {
        &self.bins
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, bins: &[(f64, f64)]) {
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Yellow))
        .data(bins);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(" Spectrum ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([0.0, (BINS - 1) as f64])
                .labels(vec!["20Hz", "630Hz", "20kHz"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-90", "-45", "0dB"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

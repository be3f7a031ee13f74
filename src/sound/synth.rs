//! Cue synthesis: short sine tones with exponential envelopes, rendered
//! to mono `f32` samples.

use std::f32::consts::TAU;

pub const SAMPLE_RATE: u32 = 48_000;

/// Level the envelopes decay to.
const FLOOR_GAIN: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Upward pop after a message is sent.
    Send,
    /// Two-note chime when someone else posts.
    Receive,
}

impl Cue {
    pub fn render(self) -> Vec<f32> {
        match self {
            Self::Send => sweep(400.0, 800.0, 0.1, 0.1),
            Self::Receive => {
                let mut samples = tone(880.0, 0.1, 0.05);
                mix_at(&mut samples, &tone(1174.66, 0.2, 0.05), seconds_to_samples(0.05));
                samples
            }
        }
    }
}

/// Sine whose frequency glides exponentially from `from_hz` to `to_hz`.
fn sweep(from_hz: f32, to_hz: f32, duration: f32, volume: f32) -> Vec<f32> {
    let len = seconds_to_samples(duration);
    let mut phase = 0.0_f32;

    (0..len)
        .map(|index| {
            let progress = index as f32 / len as f32;
            let frequency = exponential(from_hz, to_hz, progress);
            let sample = phase.sin() * exponential(volume, FLOOR_GAIN, progress);
            phase = (phase + TAU * frequency / SAMPLE_RATE as f32) % TAU;
            sample
        })
        .collect()
}

fn tone(frequency: f32, duration: f32, volume: f32) -> Vec<f32> {
    sweep(frequency, frequency, duration, volume)
}

fn mix_at(target: &mut Vec<f32>, source: &[f32], offset: usize) {
    if target.len() < offset + source.len() {
        target.resize(offset + source.len(), 0.0);
    }
    for (slot, sample) in target[offset..].iter_mut().zip(source) {
        *slot += sample;
    }
}

fn exponential(start: f32, end: f32, progress: f32) -> f32 {
    start * (end / start).powf(progress)
}

fn seconds_to_samples(seconds: f32) -> usize {
    (seconds * SAMPLE_RATE as f32).round() as usize
}

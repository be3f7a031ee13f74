use anyhow::Result;

/// Destination for rendered cue samples (mono, `synth::SAMPLE_RATE`).
pub trait AudioSink: Send {
    fn play(&mut self, samples: &[f32]) -> Result<()>;
}

/// Discards everything. Used when audio support is compiled out.
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _samples: &[f32]) -> Result<()> {
        Ok(())
    }
}

#[cfg(feature = "audio")]
pub use self::device::CpalSink;

#[cfg(feature = "audio")]
mod device {
    use std::{
        collections::VecDeque,
        sync::{mpsc, Arc, Mutex, PoisonError},
        thread,
        time::Duration,
    };

    use anyhow::{bail, Result};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

    use super::AudioSink;
    use crate::sound::synth::SAMPLE_RATE;

    const STARTUP_TIMEOUT: Duration = Duration::from_secs(1);

    type Ring = Arc<Mutex<VecDeque<f32>>>;

    /// Default output device. The cpal stream is not `Send`, so it lives on
    /// its own thread until the sink is dropped.
    pub struct CpalSink {
        ring: Ring,
        device_rate: u32,
        channels: usize,
        _keep_alive: mpsc::Sender<()>,
    }

    impl CpalSink {
        /// Opens the default output device, or `None` when there is none.
        pub fn open() -> Option<Self> {
            let ring: Ring = Arc::new(Mutex::new(VecDeque::new()));
            let (ready_tx, ready_rx) = mpsc::channel::<(u32, usize)>();
            let (keep_tx, keep_rx) = mpsc::channel::<()>();

            let stream_ring = Arc::clone(&ring);
            let spawned = thread::Builder::new()
                .name("codebluer-audio".to_owned())
                .spawn(move || {
                    let host = cpal::default_host();
                    let Some(device) = host.default_output_device() else {
                        tracing::warn!("no audio output device; sound cues disabled");
                        return;
                    };
                    let config = match device.default_output_config() {
                        Ok(config) => config.config(),
                        Err(error) => {
                            tracing::warn!(error = %error, "no usable audio output config");
                            return;
                        }
                    };
                    let channels = usize::from(config.channels);

                    let stream = match device.build_output_stream(
                        &config,
                        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                            let mut ring = stream_ring.lock().unwrap_or_else(PoisonError::into_inner);
                            for sample in data.iter_mut() {
                                *sample = ring.pop_front().unwrap_or(0.0);
                            }
                        },
                        |error| tracing::warn!(error = %error, "audio output stream error"),
                        None,
                    ) {
                        Ok(stream) => stream,
                        Err(error) => {
                            tracing::warn!(error = %error, "failed to build audio output stream");
                            return;
                        }
                    };

                    if let Err(error) = stream.play() {
                        tracing::warn!(error = %error, "failed to start audio output stream");
                        return;
                    }

                    if ready_tx.send((config.sample_rate.0, channels)).is_err() {
                        return;
                    }
                    let _ = keep_rx.recv();
                    drop(stream);
                });

            if let Err(error) = spawned {
                tracing::warn!(error = %error, "failed to start audio thread");
                return None;
            }

            let (device_rate, channels) = ready_rx.recv_timeout(STARTUP_TIMEOUT).ok()?;
            tracing::info!(device_rate, channels, "audio output ready");
            Some(Self {
                ring,
                device_rate,
                channels,
                _keep_alive: keep_tx,
            })
        }
    }

    impl AudioSink for CpalSink {
        fn play(&mut self, samples: &[f32]) -> Result<()> {
            if self.channels == 0 {
                bail!("audio device reports no channels");
            }
            let resampled = resample(samples, SAMPLE_RATE, self.device_rate);
            let mut ring = self.ring.lock().unwrap_or_else(PoisonError::into_inner);
            for sample in resampled {
                ring.extend(std::iter::repeat(sample).take(self.channels));
            }
            Ok(())
        }
    }

    /// Linear interpolation between sample rates.
    fn resample(samples: &[f32], from: u32, to: u32) -> Vec<f32> {
        if from == to || samples.is_empty() {
            return samples.to_vec();
        }
        let ratio = from as f64 / to as f64;
        let len = (samples.len() as f64 / ratio).round() as usize;
        (0..len)
            .map(|index| {
                let position = index as f64 * ratio;
                let base = position.floor() as usize;
                let next = (base + 1).min(samples.len() - 1);
                let fraction = (position - base as f64) as f32;
                let current = samples[base.min(samples.len() - 1)];
                current + (samples[next] - current) * fraction
            })
            .collect()
    }
}

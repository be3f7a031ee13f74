//! Audible feedback for sent and received messages.

mod sink;
mod synth;

pub use self::{
    sink::{AudioSink, NullSink},
    synth::Cue,
};

use crate::usecases::contracts::SoundCues;

const SOUND_PLAYBACK_FAILED: &str = "SOUND_PLAYBACK_FAILED";

type SinkFactory = Box<dyn FnMut() -> Option<Box<dyn AudioSink>> + Send>;

/// Owned cue player. The output device is opened on the first cue and
/// released by `dispose` or drop. A device that fails to open is not
/// retried.
pub struct SoundEngine {
    enabled: bool,
    open_sink: SinkFactory,
    sink: Option<Box<dyn AudioSink>>,
    unavailable: bool,
}

impl SoundEngine {
    pub fn new(enabled: bool) -> Self {
        Self::with_factory(enabled, Box::new(default_sink))
    }

    pub fn with_factory(enabled: bool, open_sink: SinkFactory) -> Self {
        Self {
            enabled,
            open_sink,
            sink: None,
            unavailable: false,
        }
    }

    pub fn play(&mut self, cue: Cue) {
        if !self.enabled {
            return;
        }
        let Some(sink) = self.sink() else {
            return;
        };
        if let Err(error) = sink.play(&cue.render()) {
            tracing::warn!(code = SOUND_PLAYBACK_FAILED, ?cue, error = %error, "sound cue failed");
        }
    }

    pub fn dispose(&mut self) {
        self.sink = None;
    }

    fn sink(&mut self) -> Option<&mut Box<dyn AudioSink>> {
        if self.sink.is_none() && !self.unavailable {
            self.sink = (self.open_sink)();
            if self.sink.is_none() {
                tracing::info!("audio output unavailable; sound cues muted");
                self.unavailable = true;
            }
        }
        self.sink.as_mut()
    }
}

impl SoundCues for SoundEngine {
    fn play_send(&mut self) {
        self.play(Cue::Send);
    }

    fn play_receive(&mut self) {
        self.play(Cue::Receive);
    }
}

impl Drop for SoundEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(feature = "audio")]
fn default_sink() -> Option<Box<dyn AudioSink>> {
    sink::CpalSink::open().map(|sink| Box::new(sink) as Box<dyn AudioSink>)
}

#[cfg(not(feature = "audio"))]
fn default_sink() -> Option<Box<dyn AudioSink>> {
    Some(Box::new(NullSink))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use super::*;

    struct RecordingSink {
        played: Arc<Mutex<Vec<usize>>>,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, samples: &[f32]) -> anyhow::Result<()> {
            self.played.lock().expect("played lock").push(samples.len());
            Ok(())
        }
    }

    fn recording_engine(
        enabled: bool,
    ) -> (SoundEngine, Arc<Mutex<Vec<usize>>>, Arc<AtomicUsize>) {
        let played = Arc::new(Mutex::new(Vec::new()));
        let opened = Arc::new(AtomicUsize::new(0));
        let (factory_played, factory_opened) = (Arc::clone(&played), Arc::clone(&opened));
        let engine = SoundEngine::with_factory(
            enabled,
            Box::new(move || {
                factory_opened.fetch_add(1, Ordering::SeqCst);
                Some(Box::new(RecordingSink {
                    played: Arc::clone(&factory_played),
                }) as Box<dyn AudioSink>)
            }),
        );
        (engine, played, opened)
    }

    #[test]
    fn opens_device_once_on_first_cue() {
        let (mut engine, played, opened) = recording_engine(true);
        assert_eq!(opened.load(Ordering::SeqCst), 0);

        engine.play_send();
        engine.play_receive();

        assert_eq!(opened.load(Ordering::SeqCst), 1);
        assert_eq!(*played.lock().expect("played lock"), vec![4_800, 12_000]);
    }

    #[test]
    fn disabled_engine_never_opens_device() {
        let (mut engine, played, opened) = recording_engine(false);

        engine.play_send();

        assert_eq!(opened.load(Ordering::SeqCst), 0);
        assert!(played.lock().expect("played lock").is_empty());
    }

    #[test]
    fn dispose_releases_device_and_next_cue_reopens() {
        let (mut engine, _played, opened) = recording_engine(true);

        engine.play_send();
        engine.dispose();
        engine.play_send();

        assert_eq!(opened.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_device_is_not_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let mut engine = SoundEngine::with_factory(
            true,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                None
            }),
        );

        engine.play_send();
        engine.play_receive();

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}

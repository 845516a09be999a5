//! Sound playback on an SDL audio device
//!
//! WAV files are decoded and converted to the device format once, at load
//! time. Playback only hands a shared clip to the [`Mixer`] under the device
//! lock, so `play` never blocks on audio I/O.

mod mixer;

pub use mixer::{samples_from_ne_bytes, Clip, Mixer, VoicePool, DEFAULT_VOICES_PER_SOUND};

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use sdl2::audio::{AudioCVT, AudioDevice, AudioSpec, AudioSpecDesired, AudioSpecWAV};
use sdl2::Sdl;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

const SAMPLE_RATE: i32 = 44_100;
const CHANNELS: u8 = 2;
const BUFFER_SAMPLES: u16 = 1024;

/// Named sounds plus a single looping music track
pub struct SoundManager {
    device: AudioDevice<Mixer>,
    sounds: HashMap<String, Clip>,
    music: Option<Clip>,
}

impl SoundManager {
    /// Open the default output device and start it (silent until something plays)
    pub fn new(sdl: &Sdl, voices_per_sound: usize) -> Result<Self> {
        let audio = sdl.audio().map_err(Error::BackendInit)?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(CHANNELS),
            samples: Some(BUFFER_SAMPLES),
        };
        let device = audio
            .open_playback(None, &desired, |_spec| Mixer::new(voices_per_sound))
            .map_err(Error::BackendInit)?;
        device.resume();

        let spec = device.spec();
        info!(
            freq = spec.freq,
            channels = spec.channels,
            samples = spec.samples,
            voices_per_sound,
            "audio device opened"
        );

        Ok(Self {
            device,
            sounds: HashMap::new(),
            music: None,
        })
    }

    /// Load a WAV file under its path string. Loading the same name twice is a no-op.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let name = path.to_string_lossy().into_owned();
        if self.sounds.contains_key(&name) {
            return Ok(());
        }
        let clip = load_clip(path, self.device.spec())?;
        debug!(name = %name, samples = clip.len(), "sound loaded");
        self.sounds.insert(name, clip);
        Ok(())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Start one more overlapping instance of `name`
    pub fn play(&mut self, name: &str) -> Result<()> {
        let clip = self
            .sounds
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownSound(name.to_string()))?;
        let voice = self.device.lock().play(name, clip);
        debug!(name, voice, "play");
        Ok(())
    }

    /// Cut off every playing instance of `name`
    pub fn stop(&mut self, name: &str) {
        self.device.lock().stop(name);
    }

    /// Stop `name` and release its samples
    pub fn unload(&mut self, name: &str) -> Result<()> {
        if self.sounds.remove(name).is_none() {
            return Err(Error::UnknownSound(name.to_string()));
        }
        self.device.lock().remove(name);
        debug!(name, "sound unloaded");
        Ok(())
    }

    /// Replace the music track. Does not start it.
    pub fn load_music(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.music = Some(load_clip(path, self.device.spec())?);
        debug!(path = %path.display(), "music loaded");
        Ok(())
    }

    /// Loop the loaded music track from the start
    pub fn play_music(&mut self) {
        match &self.music {
            Some(clip) => self.device.lock().play_music(clip.clone()),
            None => warn!("play_music called with no music loaded"),
        }
    }

    pub fn stop_music(&mut self) {
        self.device.lock().stop_music();
    }
}

/// Decode a WAV file and convert it to the device's sample format
fn load_clip(path: &Path, spec: &AudioSpec) -> Result<Clip> {
    let wav = AudioSpecWAV::load_wav(path).map_err(|e| Error::resource(path, e))?;
    let cvt = AudioCVT::new(
        wav.format,
        wav.channels,
        wav.freq,
        spec.format,
        spec.channels,
        spec.freq,
    )
    .map_err(|e| Error::resource(path, e))?;
    let converted = cvt.convert(wav.buffer().to_vec());
    Ok(Arc::from(samples_from_ne_bytes(&converted)))
}

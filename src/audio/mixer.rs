//! Software mixer run on SDL's audio thread
//!
//! Every loaded sound owns a [`VoicePool`]: a fixed ring of playback slots so
//! the same sound can overlap with itself. Slots are handed out round-robin;
//! when all are busy the oldest one is restarted, cutting off whatever it was
//! playing.

use std::collections::HashMap;
use std::sync::Arc;

use sdl2::audio::AudioCallback;

/// Interleaved samples already converted to the device's format
pub type Clip = Arc<[i16]>;

pub const DEFAULT_VOICES_PER_SOUND: usize = 32;

#[derive(Debug, Clone)]
struct Voice {
    clip: Clip,
    cursor: usize,
    looping: bool,
}

impl Voice {
    fn new(clip: Clip, looping: bool) -> Self {
        Self {
            clip,
            cursor: 0,
            looping,
        }
    }

    /// Add this voice into `acc`. Returns false once a one-shot voice is done.
    fn mix_into(&mut self, acc: &mut [i32]) -> bool {
        let len = self.clip.len();
        if len == 0 {
            return false;
        }
        for slot in acc.iter_mut() {
            if self.cursor >= len {
                if !self.looping {
                    return false;
                }
                self.cursor = 0;
            }
            *slot += self.clip[self.cursor] as i32;
            self.cursor += 1;
        }
        self.looping || self.cursor < len
    }
}

/// Bounded set of playback slots for one sound
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: Vec<Option<Voice>>,
    next: usize,
}

impl VoicePool {
    pub fn new(size: usize) -> Self {
        Self {
            voices: vec![None; size.max(1)],
            next: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    /// Number of voices still producing sound
    pub fn active(&self) -> usize {
        self.voices.iter().filter(|v| v.is_some()).count()
    }

    /// Start `clip` on the next slot in the ring and return that slot's index
    pub fn play(&mut self, clip: Clip, looping: bool) -> usize {
        let slot = self.next;
        self.voices[slot] = Some(Voice::new(clip, looping));
        self.next = (self.next + 1) % self.voices.len();
        slot
    }

    pub fn stop_all(&mut self) {
        self.voices.iter_mut().for_each(|v| *v = None);
    }

    fn mix_into(&mut self, acc: &mut [i32]) {
        for slot in &mut self.voices {
            if let Some(voice) = slot {
                if !voice.mix_into(acc) {
                    *slot = None;
                }
            }
        }
    }
}

/// The audio callback: named sound pools plus one music track
pub struct Mixer {
    pools: HashMap<String, VoicePool>,
    music: Option<Voice>,
    voices_per_sound: usize,
    scratch: Vec<i32>,
}

impl Mixer {
    pub fn new(voices_per_sound: usize) -> Self {
        Self {
            pools: HashMap::new(),
            music: None,
            voices_per_sound: voices_per_sound.max(1),
            scratch: Vec::new(),
        }
    }

    /// Fire-and-forget playback of `clip` under `name`
    pub fn play(&mut self, name: &str, clip: Clip) -> usize {
        let size = self.voices_per_sound;
        self.pools
            .entry(name.to_string())
            .or_insert_with(|| VoicePool::new(size))
            .play(clip, false)
    }

    /// Silence every voice of `name`, keeping its pool
    pub fn stop(&mut self, name: &str) {
        if let Some(pool) = self.pools.get_mut(name) {
            pool.stop_all();
        }
    }

    /// Silence and forget everything playing under `name`
    pub fn remove(&mut self, name: &str) -> bool {
        self.pools.remove(name).is_some()
    }

    /// Replace the music track; it loops until stopped
    pub fn play_music(&mut self, clip: Clip) {
        self.music = Some(Voice::new(clip, true));
    }

    pub fn stop_music(&mut self) {
        self.music = None;
    }

    pub fn music_playing(&self) -> bool {
        self.music.is_some()
    }

    pub fn active_voices(&self, name: &str) -> usize {
        self.pools.get(name).map_or(0, VoicePool::active)
    }

    /// Mix everything into `out`, saturating at the i16 range
    pub fn mix(&mut self, out: &mut [i16]) {
        self.scratch.clear();
        self.scratch.resize(out.len(), 0);

        if let Some(music) = &mut self.music {
            if !music.mix_into(&mut self.scratch) {
                self.music = None;
            }
        }
        for pool in self.pools.values_mut() {
            pool.mix_into(&mut self.scratch);
        }

        for (dst, &src) in out.iter_mut().zip(&self.scratch) {
            *dst = src.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        }
    }
}

impl AudioCallback for Mixer {
    type Channel = i16;

    fn callback(&mut self, out: &mut [i16]) {
        self.mix(out);
    }
}

/// Reinterpret native-endian 16-bit PCM bytes as samples
pub fn samples_from_ne_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_ne_bytes([b[0], b[1]]))
        .collect()
}

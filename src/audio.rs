//! Sound effects and music, synthesized at startup and played fire-and-forget.

use fundsp::prelude::{lowpass_hz, noise, saw, sine, square};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{info, warn};

use crate::config::AudioConfig;
use crate::error::AudioError;
use crate::game::Sfx;

pub const SAMPLE_RATE: u32 = 44_100;

// ── Synthesis ───────────────────────────────────────────────────────────────

fn samples(secs: f32) -> usize {
    (SAMPLE_RATE as f32 * secs) as usize
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Rendered mono clips at `SAMPLE_RATE`.
#[derive(Debug, Clone)]
pub struct Clips {
    pub hit: Vec<f32>,
    pub point: Vec<f32>,
    pub wing: Vec<f32>,
    pub music: Vec<f32>,
}

impl Clips {
    pub fn synthesize() -> Self {
        Self {
            hit: hit(),
            point: point(),
            wing: wing(),
            music: music(),
        }
    }

    fn get(&self, sfx: Sfx) -> &[f32] {
        match sfx {
            Sfx::Hit => &self.hit,
            Sfx::Point => &self.point,
            Sfx::Wing => &self.wing,
        }
    }
}

/// Saw sweeping 400Hz down to 80Hz over 0.4s, fading out over 0.5s.
fn hit() -> Vec<f32> {
    let mut osc = saw();
    (0..samples(0.5))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let freq = lerp(400.0, 80.0, t / 0.4);
            let gain = lerp(0.15, 0.0, t / 0.5);
            osc.filter_mono(freq) * gain
        })
        .collect()
}

/// Two rising sine tones.
fn point() -> Vec<f32> {
    let mut osc = sine::<f32>();
    let split = 0.07;
    (0..samples(0.22))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let (freq, local) = if t < split { (988.0, t) } else { (1319.0, t - split) };
            let gain = 0.25 * (-local * 18.0).exp();
            osc.filter_mono(freq) * gain
        })
        .collect()
}

/// Short burst of filtered noise.
fn wing() -> Vec<f32> {
    let mut swoosh = noise() >> lowpass_hz(1800.0, 0.8);
    (0..samples(0.12))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let gain = if t < 0.015 { t / 0.015 } else { lerp(1.0, 0.0, (t - 0.015) / 0.105) };
            swoosh.get_mono() * gain * 0.3
        })
        .collect()
}

/// One bar of a square-wave tune; looped by the player.
fn music() -> Vec<f32> {
    const NOTES: [f32; 16] = [
        523.3, 0.0, 659.3, 0.0, 784.0, 659.3, 523.3, 0.0, //
        587.3, 0.0, 698.5, 0.0, 880.0, 698.5, 587.3, 0.0,
    ];
    const NOTE_SECS: f32 = 0.15;
    let mut osc = square();
    let per_note = samples(NOTE_SECS);
    let mut out = Vec::with_capacity(per_note * NOTES.len());
    for &freq in &NOTES {
        for i in 0..per_note {
            let t = i as f32 / SAMPLE_RATE as f32;
            let s = if freq > 0.0 {
                osc.filter_mono(freq) * 0.05 * lerp(1.0, 0.2, t / NOTE_SECS)
            } else {
                0.0
            };
            out.push(s);
        }
    }
    out
}

// ── Playback ────────────────────────────────────────────────────────────────

pub struct Speaker {
    stream: OutputStream,
    clips: Clips,
    volume: f32,
    _music: Option<Sink>,
}

impl Speaker {
    pub fn open(config: &AudioConfig, clips: Clips) -> Result<Self, AudioError> {
        let mut stream =
            OutputStreamBuilder::open_default_stream().map_err(|e| AudioError::Output(e.to_string()))?;
        stream.log_on_drop(false);

        let music = config.music.then(|| {
            let sink = Sink::connect_new(stream.mixer());
            sink.set_volume(config.volume);
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, clips.music.clone()).repeat_infinite());
            sink
        });

        Ok(Self {
            stream,
            clips,
            volume: config.volume,
            _music: music,
        })
    }

    pub fn play(&self, sfx: Sfx) {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, self.clips.get(sfx).to_vec()));
        sink.detach();
    }
}

/// The game's sound output. A missing device is not an error: the game runs
/// muted.
pub enum Audio {
    Live(Speaker),
    Muted,
}

impl Audio {
    pub fn open(config: &AudioConfig) -> Self {
        if !config.enabled {
            info!("audio disabled by configuration");
            return Audio::Muted;
        }
        match Speaker::open(config, Clips::synthesize()) {
            Ok(speaker) => {
                info!(volume = config.volume, music = config.music, "audio output opened");
                Audio::Live(speaker)
            }
            Err(err) => {
                warn!(error = %err, "no audio output, running muted");
                Audio::Muted
            }
        }
    }

    pub fn play(&self, sfx: Sfx) {
        if let Audio::Live(speaker) = self {
            speaker.play(sfx);
        }
    }

    pub fn is_muted(&self) -> bool {
        matches!(self, Audio::Muted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(clip: &[f32]) -> f32 {
        clip.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn clips_have_expected_lengths() {
        let clips = Clips::synthesize();
        assert_eq!(clips.hit.len(), 22_050);
        assert_eq!(clips.wing.len(), samples(0.12));
        assert_eq!(clips.music.len(), samples(0.15) * 16);
    }

    #[test]
    fn clips_are_audible_and_never_clip() {
        let clips = Clips::synthesize();
        for clip in [&clips.hit, &clips.point, &clips.wing, &clips.music] {
            let p = peak(clip);
            assert!(p > 0.001);
            assert!(p <= 1.0);
        }
    }

    #[test]
    fn hit_fades_to_silence() {
        let hit = hit();
        assert!(peak(&hit[hit.len() - 200..]) < 0.002);
    }

    #[test]
    fn disabled_audio_is_muted() {
        let config = AudioConfig {
            enabled: false,
            ..AudioConfig::default()
        };
        let audio = Audio::open(&config);
        assert!(audio.is_muted());
        audio.play(Sfx::Hit);
    }
}

//! Built-in sound catalog

use reveille_api::{CatalogSound, SoundInfo, SoundRef};
use reveille_host_api::{PlayableSound, ToneSpec, Voice, Waveform};
use std::time::Duration;

const C5: f32 = 523.25;
const D5: f32 = 587.33;
const E5: f32 = 659.25;
const G5: f32 = 783.99;

/// One catalog entry
#[derive(Debug, Clone, Copy)]
pub struct SoundEntry {
    pub sound: CatalogSound,
    pub name: &'static str,
    pub description: &'static str,
    pub tone: ToneSpec,
}

impl SoundEntry {
    pub fn info(&self) -> SoundInfo {
        SoundInfo {
            id: self.sound.id().to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
        }
    }
}

static CATALOG: [SoundEntry; 6] = [
    SoundEntry {
        sound: CatalogSound::Classic,
        name: "Classic",
        description: "Traditional alarm tone",
        tone: ToneSpec {
            waveform: Waveform::Sine,
            voice: Voice::Steady(800.0),
            notes: 1,
            spacing: Duration::ZERO,
            note_length: Duration::from_secs(2),
            gain: 0.3,
        },
    },
    SoundEntry {
        sound: CatalogSound::Gentle,
        name: "Gentle",
        description: "Gradual, relaxing wake-up",
        tone: ToneSpec {
            waveform: Waveform::Sine,
            voice: Voice::Steady(400.0),
            notes: 1,
            spacing: Duration::ZERO,
            note_length: Duration::from_secs(3),
            gain: 0.3,
        },
    },
    SoundEntry {
        sound: CatalogSound::Urgent,
        name: "Urgent",
        description: "Intense alarm for a fast wake-up",
        tone: ToneSpec {
            waveform: Waveform::Square,
            voice: Voice::Steady(1000.0),
            notes: 6,
            spacing: Duration::from_millis(300),
            note_length: Duration::from_millis(200),
            gain: 0.4,
        },
    },
    SoundEntry {
        sound: CatalogSound::Melody,
        name: "Melody",
        description: "Pleasant musical sequence",
        tone: ToneSpec {
            waveform: Waveform::Sine,
            voice: Voice::Sequence(&[C5, D5, E5, G5]),
            notes: 4,
            spacing: Duration::from_millis(400),
            note_length: Duration::from_millis(350),
            gain: 0.3,
        },
    },
    SoundEntry {
        sound: CatalogSound::Birdsong,
        name: "Birdsong",
        description: "Sounds of nature",
        tone: ToneSpec {
            waveform: Waveform::Sine,
            voice: Voice::Chirp(&[1800.0, 2400.0, 2000.0]),
            notes: 4,
            spacing: Duration::from_millis(600),
            note_length: Duration::from_millis(300),
            gain: 0.2,
        },
    },
    SoundEntry {
        sound: CatalogSound::Chimes,
        name: "Chimes",
        description: "Soft bells",
        tone: ToneSpec {
            waveform: Waveform::Sine,
            voice: Voice::Sequence(&[C5, E5, G5]),
            notes: 3,
            spacing: Duration::from_millis(300),
            note_length: Duration::from_millis(1500),
            gain: 0.25,
        },
    },
];

/// Every catalog entry, in display order
pub fn catalog() -> &'static [SoundEntry] {
    &CATALOG
}

pub fn catalog_entry(sound: CatalogSound) -> &'static SoundEntry {
    // CATALOG lists the variants in declaration order
    &CATALOG[sound as usize]
}

/// Turn a stored sound reference into something a bridge can play
pub fn resolve(sound: &SoundRef) -> PlayableSound {
    match sound {
        SoundRef::Catalog(id) => PlayableSound::Tone {
            sound: *id,
            spec: catalog_entry(*id).tone,
        },
        SoundRef::Custom(token) => PlayableSound::Custom {
            token: token.clone(),
        },
    }
}

/// Catalog as shown to clients
pub fn sound_infos() -> Vec<SoundInfo> {
    catalog().iter().map(SoundEntry::info).collect()
}

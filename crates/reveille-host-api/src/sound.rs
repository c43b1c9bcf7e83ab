//! What a bridge is asked to play

use reveille_api::CatalogSound;
use std::time::Duration;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

/// How the pitch list of a [`ToneSpec`] is used
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Voice {
    /// One pitch held for every note
    Steady(f32),
    /// Each note takes the next pitch in turn
    Sequence(&'static [f32]),
    /// Every note glides through the same pitch contour
    Chirp(&'static [f32]),
}

/// Synthesis description of a catalog tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub voice: Voice,
    /// Notes struck; a sequence voice plays one note per pitch
    pub notes: u8,
    /// Onset to onset
    pub spacing: Duration,
    /// How long each note rings before it has decayed
    pub note_length: Duration,
    /// Peak amplitude, 0.0-1.0
    pub gain: f32,
}

impl ToneSpec {
    /// Wall time from the first onset to the end of the last note
    pub fn total_duration(&self) -> Duration {
        let notes = u32::from(self.notes.max(1));
        self.spacing * (notes - 1) + self.note_length
    }
}

/// A sound after catalog resolution
#[derive(Debug, Clone, PartialEq)]
pub enum PlayableSound {
    Tone { sound: CatalogSound, spec: ToneSpec },
    /// Opaque user-supplied token; only the bridge knows how to play it
    Custom { token: String },
}

impl PlayableSound {
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_duration_spans_all_notes() {
        let spec = ToneSpec {
            waveform: Waveform::Square,
            voice: Voice::Steady(1000.0),
            notes: 6,
            spacing: Duration::from_millis(300),
            note_length: Duration::from_millis(200),
            gain: 0.4,
        };
        assert_eq!(spec.total_duration(), Duration::from_millis(1700));
    }

    #[test]
    fn single_note_duration() {
        let spec = ToneSpec {
            waveform: Waveform::Sine,
            voice: Voice::Steady(800.0),
            notes: 1,
            spacing: Duration::ZERO,
            note_length: Duration::from_secs(2),
            gain: 0.3,
        };
        assert_eq!(spec.total_duration(), Duration::from_secs(2));
    }
}

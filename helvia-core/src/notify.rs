//! Notification cue played when the assistant replies.
//!
//! [`Notifier`] is output-agnostic; [`TerminalBell`] rings the terminal bell and [`SilentNotifier`] does nothing.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{HelviaError, Result};

/// Short sine tone with a linear attack and an exponential decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub peak_gain: f32,
    pub floor_gain: f32,
    pub attack: Duration,
    pub duration: Duration,
}

impl Default for ToneSpec {
    fn default() -> Self {
        Self {
            frequency_hz: 800.0,
            peak_gain: 0.3,
            floor_gain: 0.01,
            attack: Duration::from_millis(10),
            duration: Duration::from_millis(150),
        }
    }
}

impl ToneSpec {
    /// Envelope gain at `t` seconds after the tone starts; 0 outside `[0, duration]`.
    pub fn gain_at(&self, t: f32) -> f32 {
        let attack = self.attack.as_secs_f32();
        let end = self.duration.as_secs_f32();
        if !(0.0..=end).contains(&t) {
            return 0.0;
        }
        if t < attack {
            return self.peak_gain * (t / attack);
        }
        let progress = (t - attack) / (end - attack);
        self.peak_gain * (self.floor_gain / self.peak_gain).powf(progress)
    }
}

/// Emits the reply notification. Callers treat failures as non-fatal.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, tone: &ToneSpec) -> Result<()>;
}

/// Rings the terminal bell (BEL) on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

#[async_trait]
impl Notifier for TerminalBell {
    async fn notify(&self, _tone: &ToneSpec) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| HelviaError::Notification(e.to_string()))
    }
}

/// Notifier that never makes a sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify(&self, _tone: &ToneSpec) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_envelope_shape() {
        let tone = ToneSpec::default();
        assert_eq!(tone.gain_at(0.0), 0.0);
        assert!((tone.gain_at(0.005) - 0.15).abs() < 1e-4);
        assert!((tone.gain_at(0.01) - 0.3).abs() < 1e-4);
        assert!((tone.gain_at(0.15) - 0.01).abs() < 1e-4);
        assert!(tone.gain_at(0.08) < 0.3 && tone.gain_at(0.08) > 0.01);
    }

    #[test]
    fn test_tone_silent_outside_duration() {
        let tone = ToneSpec::default();
        assert_eq!(tone.gain_at(-0.01), 0.0);
        assert_eq!(tone.gain_at(0.2), 0.0);
    }

    #[tokio::test]
    async fn test_silent_notifier_succeeds() {
        assert!(SilentNotifier.notify(&ToneSpec::default()).await.is_ok());
    }
}

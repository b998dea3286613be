use crate::game::judgment::JudgmentSound;
use log::{debug, info};
use std::collections::HashMap;

/// Default length of a judgment sound, used only for "busy" bookkeeping.
pub const JUDGMENT_SOUND_MS: f64 = 200.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Perfect,
    Flick,
    Slide,
}

impl From<JudgmentSound> for Cue {
    fn from(sound: JudgmentSound) -> Self {
        match sound {
            JudgmentSound::Perfect => Cue::Perfect,
            JudgmentSound::Flick => Cue::Flick,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Channel {
    length_ms: f64,
    busy_until_ms: f64,
    plays: u32,
}

impl Channel {
    fn new(length_ms: f64) -> Self {
        Self { length_ms, busy_until_ms: f64::NEG_INFINITY, plays: 0 }
    }
}

/// One playback channel per cue, tracked against the playback clock.
///
/// Nothing is decoded or output here; the mixer only decides which cues
/// would start, so a real audio backend can mirror its decisions.
#[derive(Debug)]
pub struct CueMixer {
    channels: HashMap<Cue, Channel>,
    now_ms: f64,
}

impl CueMixer {
    pub fn new(judgment_ms: f64, slide_ms: f64) -> Self {
        let channels = HashMap::from_iter([
            (Cue::Perfect, Channel::new(judgment_ms)),
            (Cue::Flick, Channel::new(judgment_ms)),
            (Cue::Slide, Channel::new(slide_ms)),
        ]);
        info!(
            "Cue mixer ready ({} channels, slide cue {:.0} ms).",
            channels.len(),
            slide_ms
        );
        Self { channels, now_ms: 0.0 }
    }

    pub fn set_time(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    pub fn is_busy(&self, cue: Cue) -> bool {
        self.channels
            .get(&cue)
            .is_some_and(|c| self.now_ms < c.busy_until_ms)
    }

    /// Starts `cue`, cutting off whatever its channel was playing.
    pub fn play(&mut self, cue: Cue) {
        let now = self.now_ms;
        if let Some(channel) = self.channels.get_mut(&cue) {
            channel.busy_until_ms = now + channel.length_ms;
            channel.plays += 1;
            debug!("Cue {:?} at {:.0} ms.", cue, now);
        }
    }

    /// Starts `cue` only if its channel is idle. Returns whether it started.
    pub fn play_if_idle(&mut self, cue: Cue) -> bool {
        if self.is_busy(cue) {
            return false;
        }
        self.play(cue);
        true
    }

    pub fn plays(&self, cue: Cue) -> u32 {
        self.channels.get(&cue).map_or(0, |c| c.plays)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cue, CueMixer};
    use crate::game::judgment::JudgmentSound;

    #[test]
    fn slide_cue_waits_for_its_channel() {
        let mut mixer = CueMixer::new(200.0, 250.0);
        mixer.set_time(1000.0);
        assert!(mixer.play_if_idle(Cue::Slide));
        mixer.set_time(1100.0);
        assert!(!mixer.play_if_idle(Cue::Slide), "still playing");
        mixer.set_time(1250.0);
        assert!(mixer.play_if_idle(Cue::Slide));
        assert_eq!(mixer.plays(Cue::Slide), 2);
    }

    #[test]
    fn judgment_cues_always_restart() {
        let mut mixer = CueMixer::new(200.0, 250.0);
        mixer.set_time(0.0);
        mixer.play(JudgmentSound::Perfect.into());
        mixer.play(JudgmentSound::Perfect.into());
        mixer.play(JudgmentSound::Flick.into());
        assert_eq!(mixer.plays(Cue::Perfect), 2);
        assert_eq!(mixer.plays(Cue::Flick), 1);
        assert!(mixer.is_busy(Cue::Perfect));
        assert!(!mixer.is_busy(Cue::Slide));
    }
}

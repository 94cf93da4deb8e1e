//! Audio cue boundary
//!
//! Playback is an external collaborator: the game fires named cues and never
//! waits on or inspects the result. A sink that cannot play simply drops the
//! cue.

use crate::sim::FrameEvent;

/// Named sound cues the game can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Shoot,
    Explosion,
    Bomb,
    PowerUp,
    Hit,
    LevelUp,
    GameOver,
    Boss,
}

/// Fire-and-forget cue sink. Failures are silent by contract.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Discards every cue (audio disabled or unavailable)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Logs cues at debug level; the stand-in sink for the terminal build
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        log::debug!("audio cue: {cue:?}");
    }
}

/// The cues a frame event triggers, in play order. A boss defeat layers the
/// explosion with the level-up sting.
pub fn cues_for(event: FrameEvent) -> &'static [AudioCue] {
    match event {
        FrameEvent::ShotFired => &[AudioCue::Shoot],
        FrameEvent::EnemyDestroyed => &[AudioCue::Explosion],
        FrameEvent::EnemyLeaked => &[],
        FrameEvent::BossSpawned => &[AudioCue::Boss],
        FrameEvent::BossDefeated => &[AudioCue::Explosion, AudioCue::LevelUp],
        FrameEvent::PlayerHit => &[AudioCue::Hit],
        FrameEvent::PowerUpCollected(_) => &[AudioCue::PowerUp],
        FrameEvent::BombDetonated => &[AudioCue::Bomb],
        FrameEvent::LevelUp(_) => &[],
        FrameEvent::GameOver => &[AudioCue::GameOver],
    }
}

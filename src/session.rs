//! One game session
//!
//! Owns the simulation state, balance, preferences and audio. The platform
//! layer forwards the three triggers (tick timer, key press, music toggle)
//! and obeys the returned [`TimerCommand`]. Every handler runs to completion,
//! so no locking is needed around the shared state.

use crate::audio::{AudioController, AudioSink};
use crate::input::{InputAction, Key, handle_key};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Snapshot, TickOutcome, tick};
use crate::tuning::{Tuning, TuningError};

/// What the platform should do with the periodic tick timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Leave the timer as it is
    Keep,
    /// Arm the timer
    Start,
    /// Tear the timer down; no more ticks until `Start`
    Stop,
}

pub struct Session<A: AudioSink> {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    audio: AudioController,
    sink: A,
    timer_armed: bool,
}

impl<A: AudioSink> Session<A> {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        sink: A,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(seed),
            tuning,
            settings,
            audio: AudioController::new(),
            sink,
            timer_armed: false,
        })
    }

    /// Begin the first run: music on (if enabled) and the timer armed
    pub fn start(&mut self) -> TimerCommand {
        log::info!("Session started with seed {}", self.state.seed);
        self.sync_audio();
        self.arm()
    }

    /// Periodic tick
    pub fn on_timer(&mut self) -> TimerCommand {
        let outcome = tick(&mut self.state, &self.tuning);
        self.process_events();
        match outcome {
            TickOutcome::Running => TimerCommand::Keep,
            TickOutcome::Crashed { .. } | TickOutcome::Halted => {
                self.sync_audio();
                self.disarm()
            }
        }
    }

    /// Keyboard press
    pub fn on_key(&mut self, key: Key) -> TimerCommand {
        match handle_key(&mut self.state, key, self.settings.restart_keys) {
            InputAction::Restarted => self.after_restart(),
            InputAction::Moved { .. } | InputAction::Ignored => TimerCommand::Keep,
        }
    }

    /// Restart button on the game-over overlay
    pub fn restart(&mut self) -> TimerCommand {
        if !self.state.is_game_over() {
            return TimerCommand::Keep;
        }
        self.state.reset();
        self.after_restart()
    }

    /// Music toggle button; returns the new toggle value
    pub fn toggle_music(&mut self) -> bool {
        let enabled = self.settings.toggle_music();
        self.settings.save();
        log::info!("Music {}", if enabled { "on" } else { "off" });
        self.sync_audio();
        enabled
    }

    /// Page teardown
    pub fn shutdown(&mut self) -> TimerCommand {
        self.audio.shutdown(&mut self.sink);
        self.disarm()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(self.settings.music_enabled)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut A {
        &mut self.sink
    }

    pub fn timer_armed(&self) -> bool {
        self.timer_armed
    }

    fn after_restart(&mut self) -> TimerCommand {
        self.process_events();
        self.sync_audio();
        self.arm()
    }

    fn sync_audio(&mut self) {
        self.audio.sync(
            &mut self.sink,
            self.settings.music_enabled,
            self.state.is_game_over(),
        );
    }

    fn process_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Spawned { opponent_id } => {
                    log::debug!("Opponent {} entered the road", opponent_id);
                }
                GameEvent::Culled { opponent_id } => {
                    log::debug!("Opponent {} left the road", opponent_id);
                }
                GameEvent::Crash { opponent_id } => {
                    log::info!(
                        "Crashed into opponent {} with score {}",
                        opponent_id,
                        self.state.score
                    );
                    self.audio.crash(&mut self.sink);
                }
                GameEvent::Restarted => log::info!("Game restarted"),
            }
        }
    }

    fn arm(&mut self) -> TimerCommand {
        if self.timer_armed {
            return TimerCommand::Keep;
        }
        self.timer_armed = true;
        TimerCommand::Start
    }

    fn disarm(&mut self) -> TimerCommand {
        if !self.timer_armed {
            return TimerCommand::Keep;
        }
        self.timer_armed = false;
        TimerCommand::Stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioCue;

    #[derive(Default)]
    struct Recorder(Vec<AudioCue>);

    impl AudioSink for Recorder {
        fn start_music(&mut self) {
            self.0.push(AudioCue::StartMusic);
        }
        fn stop_music(&mut self) {
            self.0.push(AudioCue::StopMusic);
        }
        fn play_crash(&mut self) {
            self.0.push(AudioCue::Crash);
        }
    }

    fn session() -> Session<Recorder> {
        Session::new(42, Tuning::default(), Settings::default(), Recorder::default()).unwrap()
    }

    fn crash(session: &mut Session<Recorder>) -> TimerCommand {
        session.state.push_opponent(session.state.player, 560.0, 5.0);
        session.on_timer()
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            speed_min: -4.0,
            ..Default::default()
        };
        assert!(Session::new(1, tuning, Settings::default(), Recorder::default()).is_err());
    }

    #[test]
    fn test_cull_line_past_player_rejected() {
        let tuning = Tuning {
            cull_y: 800.0,
            ..Default::default()
        };
        let result = Session::new(1, tuning, Settings::default(), Recorder::default());
        assert!(matches!(result, Err(TuningError::CullBelowPlayer { .. })));
    }

    #[test]
    fn test_start_arms_timer_and_music() {
        let mut s = session();
        assert_eq!(s.start(), TimerCommand::Start);
        assert_eq!(s.start(), TimerCommand::Keep);
        assert!(s.timer_armed());
        assert_eq!(s.sink().0, vec![AudioCue::StartMusic]);
    }

    #[test]
    fn test_crash_stops_timer_and_music() {
        let mut s = session();
        s.start();

        assert_eq!(crash(&mut s), TimerCommand::Stop);

        assert!(!s.timer_armed());
        assert!(s.snapshot().game_over);
        assert_eq!(
            s.sink().0,
            vec![AudioCue::StartMusic, AudioCue::Crash, AudioCue::StopMusic]
        );
    }

    #[test]
    fn test_restart_key_rearms() {
        let mut s = session();
        s.start();
        crash(&mut s);

        assert_eq!(s.on_key(Key::Other), TimerCommand::Keep);
        assert_eq!(s.on_key(Key::Space), TimerCommand::Start);

        let snap = s.snapshot();
        assert!(!snap.game_over);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.player, 225);
        assert!(snap.opponents.is_empty());
        assert_eq!(s.sink().0.last(), Some(&AudioCue::StartMusic));
    }

    #[test]
    fn test_restart_button_only_after_crash() {
        let mut s = session();
        s.start();
        assert_eq!(s.restart(), TimerCommand::Keep);
        crash(&mut s);
        assert_eq!(s.restart(), TimerCommand::Start);
    }

    #[test]
    fn test_crash_cue_when_muted() {
        let mut s = session();
        s.toggle_music();
        s.start();
        crash(&mut s);
        assert_eq!(s.sink().0, vec![AudioCue::Crash]);
    }

    #[test]
    fn test_toggle_music_while_playing() {
        let mut s = session();
        s.start();
        assert!(!s.toggle_music());
        assert!(s.toggle_music());
        assert_eq!(
            s.sink().0,
            vec![AudioCue::StartMusic, AudioCue::StopMusic, AudioCue::StartMusic]
        );
        assert!(s.snapshot().music_enabled);
    }

    #[test]
    fn test_shutdown_silences() {
        let mut s = session();
        s.start();
        assert_eq!(s.shutdown(), TimerCommand::Stop);
        assert_eq!(s.sink().0.last(), Some(&AudioCue::StopMusic));
    }
}

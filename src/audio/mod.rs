//! Audio control
//!
//! [`AudioController`] decides when background music starts and stops and
//! when the crash cue fires. Backends implement [`AudioSink`]; the browser
//! one synthesizes everything with the Web Audio API.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Sound cues the game emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Start the looping background track from the beginning
    StartMusic,
    /// Stop the track and rewind it
    StopMusic,
    /// One-shot crash clip
    Crash,
}

/// Something that can actually make noise
pub trait AudioSink {
    fn start_music(&mut self);
    fn stop_music(&mut self);
    fn play_crash(&mut self);

    fn play(&mut self, cue: AudioCue) {
        match cue {
            AudioCue::StartMusic => self.start_music(),
            AudioCue::StopMusic => self.stop_music(),
            AudioCue::Crash => self.play_crash(),
        }
    }
}

/// Silent backend for headless runs; cues only show up in the log
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn start_music(&mut self) {
        log::debug!("music: start");
    }

    fn stop_music(&mut self) {
        log::debug!("music: stop");
    }

    fn play_crash(&mut self) {
        log::debug!("sfx: crash");
    }
}

/// Tracks whether the music loop is running and emits only real changes
#[derive(Debug, Default)]
pub struct AudioController {
    music_playing: bool,
}

impl AudioController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    /// Bring the music loop in line with the toggle and the game phase
    pub fn sync<S: AudioSink + ?Sized>(
        &mut self,
        sink: &mut S,
        music_enabled: bool,
        game_over: bool,
    ) {
        let wanted = music_enabled && !game_over;
        if wanted == self.music_playing {
            return;
        }
        self.music_playing = wanted;
        if wanted {
            sink.play(AudioCue::StartMusic);
        } else {
            sink.play(AudioCue::StopMusic);
        }
    }

    /// Crash cue ignores the music toggle
    pub fn crash<S: AudioSink + ?Sized>(&mut self, sink: &mut S) {
        sink.play(AudioCue::Crash);
    }

    /// Silence everything on teardown
    pub fn shutdown<S: AudioSink + ?Sized>(&mut self, sink: &mut S) {
        if self.music_playing {
            self.music_playing = false;
            sink.play(AudioCue::StopMusic);
        }
    }
}

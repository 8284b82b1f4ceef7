//! Fixed timestep frame driver
//!
//! Glue between the host's per-frame callback and the simulation. The host
//! records input between frames, then calls [`FrameDriver::frame`] once per
//! display refresh and replays the returned draw list.

use glam::Vec2;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::ProfileError;
use crate::profile::Profile;
use crate::render::{DrawCommand, RenderOptions, build};
use crate::settings::Settings;
use crate::sim::{BlockState, GameEvent, GamePhase, GameState, Hud, Summary, TickInput, tick};

/// Ticks the autopilot waits on the end screen before starting over
const DEMO_RESTART_TICKS: u64 = 180;
/// Length of the synthetic swipe the autopilot makes through a block
const DEMO_SWIPE: f32 = 24.0;

pub struct FrameDriver {
    state: GameState,
    settings: Settings,
    input: TickInput,
    accumulator: f32,
    draw_list: Vec<DrawCommand>,
    /// Events from every tick run during the latest frame
    frame_events: Vec<GameEvent>,
    last_phase: GamePhase,
    just_ended: Option<Summary>,
    ended_at: u64,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
    /// Autopilot plays the game (attract mode)
    demo: bool,
}

impl FrameDriver {
    /// Driver for the built-in profile named in `settings`
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ProfileError> {
        let profile = Profile::by_name(&settings.profile)?;
        Self::with_profile(profile, settings, seed)
    }

    /// Driver for an arbitrary (e.g. JSON-loaded) profile
    pub fn with_profile(profile: Profile, settings: Settings, seed: u64) -> Result<Self, ProfileError> {
        profile.validate()?;
        log::info!("Driver ready: profile {}, seed {}", profile.name, seed);

        let mut state = GameState::new(profile, seed);
        state.particles.set_cap(settings.max_particles());

        Ok(Self {
            last_phase: state.phase,
            state,
            settings,
            input: TickInput::default(),
            accumulator: 0.0,
            draw_list: Vec::new(),
            frame_events: Vec::new(),
            just_ended: None,
            ended_at: 0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            demo: false,
        })
    }

    /// Pointer position in arena coordinates
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.state.pointer_moved(Vec2::new(x, y));
    }

    pub fn start(&mut self) {
        self.input.start = true;
    }

    pub fn restart(&mut self) {
        self.input.restart = true;
    }

    /// Advance by `dt` seconds of wall time and rebuild the draw list.
    /// `time_ms` is the host's frame timestamp (drives animation and FPS).
    pub fn frame(&mut self, dt: f32, time_ms: f64) -> &[DrawCommand] {
        self.frame_events.clear();
        self.just_ended = None;

        if self.demo {
            self.autopilot();
        }

        // A bad host timestamp must not poison the accumulator
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs are consumed by the first tick
            self.input = TickInput::default();

            self.frame_events.extend(self.state.events.iter().cloned());
            self.track_phase();
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of trying to catch up next frame
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.track_fps(time_ms);

        let opts = RenderOptions::from_settings(&self.settings, time_ms / 1000.0, self.fps);
        build(&self.state, &opts, &mut self.draw_list);
        &self.draw_list
    }

    fn track_phase(&mut self) {
        let phase = self.state.phase;
        if phase == self.last_phase {
            return;
        }
        log::info!("Phase {:?} -> {:?}", self.last_phase, phase);

        if phase.is_ended() {
            self.just_ended = self.state.summary();
            self.ended_at = self.state.time_ticks;
        }
        self.last_phase = phase;
    }

    fn track_fps(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (self.frame_times.len() as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    /// Attract mode: start runs, and swipe through the nearest block that will
    /// be in its hit zone on the next tick, in its arrow direction if it has one.
    fn autopilot(&mut self) {
        match self.state.phase {
            GamePhase::Idle => {
                self.input.start = true;
                return;
            }
            GamePhase::GameOver | GamePhase::Won => {
                if self.state.time_ticks - self.ended_at >= DEMO_RESTART_TICKS {
                    self.input.restart = true;
                }
                return;
            }
            GamePhase::Playing => {}
        }

        let profile = &self.state.profile;
        let target = self
            .state
            .blocks
            .iter()
            .filter(|b| matches!(b.state, BlockState::Incoming))
            .filter(|b| profile.hit_zone.contains(b.z + b.speed))
            .max_by(|a, b| a.z.total_cmp(&b.z));

        let Some(block) = target else {
            return;
        };
        let at = profile
            .projection
            .project(block.target, block.z + block.speed, block.base_size, profile.arena());
        let dir = block.direction.map_or(Vec2::X, |d| d.vector());

        self.state.pointer_moved(at.pos - dir * DEMO_SWIPE);
        self.state.pointer_moved(at.pos);
    }

    pub fn set_demo(&mut self, on: bool) {
        if self.demo != on {
            log::info!("Demo mode: {}", on);
        }
        self.demo = on;
    }

    pub fn toggle_demo(&mut self) {
        self.set_demo(!self.demo);
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn hud(&self) -> Hud {
        self.state.hud()
    }

    /// Final result once the run has ended
    pub fn summary(&self) -> Option<Summary> {
        self.state.summary()
    }

    /// Summary of a run that ended during the latest frame (reported once)
    pub fn just_ended(&self) -> Option<Summary> {
        self.just_ended
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.frame_events
    }

    pub fn draw_list(&self) -> &[DrawCommand] {
        &self.draw_list
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn profile(&self) -> &Profile {
        &self.state.profile
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply new preferences. A different profile name swaps the profile,
    /// which is only allowed outside of an active run.
    pub fn set_settings(&mut self, mut settings: Settings) -> Result<(), ProfileError> {
        if settings.profile != self.settings.profile {
            if self.state.phase == GamePhase::Playing {
                log::warn!("Profile change to {} ignored during a run", settings.profile);
                settings.profile = self.settings.profile.clone();
            } else {
                let profile = Profile::by_name(&settings.profile)?;
                profile.validate()?;
                let seed = self.state.seed.wrapping_add(1);
                self.state = GameState::new(profile, seed);
                self.last_phase = self.state.phase;
                self.accumulator = 0.0;
                self.input = TickInput::default();
                log::info!("Switched to profile {}", self.state.profile.name);
            }
        }
        self.state.particles.set_cap(settings.max_particles());
        self.settings = settings;
        Ok(())
    }
}

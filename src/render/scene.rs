//! Scene builder: turns a `GameState` into draw commands
//!
//! Layer order: background, blocks, fragments, particles, saber, HUD text.

use glam::Vec2;

use super::color::Rgba;
use super::commands::{DrawCommand, Rect, TextAlign};
use crate::profile::Profile;
use crate::settings::Settings;
use crate::sim::block::{Block, BlockState};
use crate::sim::particle::ParticleField;
use crate::sim::pointer::Pointer;
use crate::sim::state::{GamePhase, GameState};

const BACKGROUND_TOP: Rgba = Rgba::rgb(0x0a, 0x00, 0x15);
const BACKGROUND_MID: Rgba = Rgba::rgb(0x1a, 0x00, 0x30);
const NEON_HORIZONTAL: Rgba = Rgba::rgba(100, 50, 200, 0.15);
const NEON_VERTICAL: Rgba = Rgba::rgba(200, 50, 200, 0.1);

/// Per-frame rendering knobs derived from settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Shadow blur multiplier, 0 disables glow
    pub glow: f32,
    /// Fraction of the trail drawn, 0 hides it
    pub trail_fraction: f32,
    pub pulse: bool,
    /// Seconds since start, drives the hit-zone pulse
    pub time: f64,
    pub fps: Option<u32>,
}

impl RenderOptions {
    pub fn from_settings(settings: &Settings, time: f64, fps: u32) -> Self {
        Self {
            glow: settings.glow_strength(),
            trail_fraction: settings.trail_fraction(),
            pulse: settings.pulse_enabled(),
            time,
            fps: settings.show_fps.then_some(fps),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            glow: 1.0,
            trail_fraction: 1.0,
            pulse: true,
            time: 0.0,
            fps: None,
        }
    }
}

/// Rebuild `out` with the commands for one frame
pub fn build(state: &GameState, opts: &RenderOptions, out: &mut Vec<DrawCommand>) {
    out.clear();
    let profile = &state.profile;
    let arena = profile.arena();

    // Fragments and sparks fly past the edges
    out.push(DrawCommand::Save);
    out.push(DrawCommand::ClipRect(Rect::new(0.0, 0.0, arena.x, arena.y)));

    background(out, arena);

    match state.phase {
        GamePhase::Idle => {
            saber(out, &state.pointer, profile, opts);
        }
        GamePhase::Playing => {
            for block in &state.blocks {
                draw_block(out, block, profile, opts);
            }
            particles(out, &state.particles, profile, opts);
            saber(out, &state.pointer, profile, opts);
            missed_counter(out, state.session.missed, profile);
        }
        GamePhase::GameOver | GamePhase::Won => {
            // Only what was already flying finishes on screen
            for block in state.blocks.iter().filter(|b| b.is_sliced()) {
                draw_block(out, block, profile, opts);
            }
            particles(out, &state.particles, profile, opts);
        }
    }
    out.push(DrawCommand::Restore);

    if let Some(fps) = opts.fps {
        out.push(DrawCommand::Text {
            pos: Vec2::new(20.0, 30.0),
            text: format!("{fps} FPS"),
            size: 14.0,
            bold: false,
            color: Rgba::WHITE.with_alpha(0.6),
            align: TextAlign::Left,
        });
    }
}

/// Neon gradient with depth lines
fn background(out: &mut Vec<DrawCommand>, arena: Vec2) {
    out.push(DrawCommand::GradientRect {
        rect: Rect::new(0.0, 0.0, arena.x, arena.y),
        from: Vec2::ZERO,
        to: Vec2::new(0.0, arena.y),
        stops: vec![
            (0.0, BACKGROUND_TOP),
            (0.5, BACKGROUND_MID),
            (1.0, BACKGROUND_TOP),
        ],
    });

    for i in 0..5 {
        let y = arena.y * (0.2 + i as f32 * 0.15);
        out.push(DrawCommand::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(arena.x, y),
            color: NEON_HORIZONTAL,
            width: 2.0,
        });
    }
    out.push(DrawCommand::Line {
        from: Vec2::new(arena.x / 2.0, 0.0),
        to: Vec2::new(arena.x / 2.0, arena.y),
        color: NEON_VERTICAL,
        width: 2.0,
    });
}

fn draw_block(out: &mut Vec<DrawCommand>, block: &Block, profile: &Profile, opts: &RenderOptions) {
    let color = profile.lane_color(block.lane);

    let fragments = match &block.state {
        BlockState::Sliced { fragments, .. } => fragments,
        BlockState::Incoming => {
            if block.is_visible(profile.visible_from) {
                incoming_block(out, block, color, profile, opts);
            }
            return;
        }
    };

    for fragment in fragments.iter().filter(|f| !f.is_faded()) {
        out.push(DrawCommand::Save);
        out.push(DrawCommand::SetAlpha(fragment.alpha));
        out.push(DrawCommand::Translate(fragment.pos));
        out.push(DrawCommand::Rotate(fragment.rotation));
        out.push(DrawCommand::SetShadow {
            blur: 15.0 * opts.glow,
            color,
        });
        out.push(DrawCommand::FillRect {
            rect: Rect::centered(Vec2::ZERO, fragment.size),
            color,
        });
        out.push(DrawCommand::Restore);
    }
}

/// Cube face with shading, hit-zone glow and a dot or arrow
fn incoming_block(
    out: &mut Vec<DrawCommand>,
    block: &Block,
    color: Rgba,
    profile: &Profile,
    opts: &RenderOptions,
) {
    let at = block.project(profile);
    let in_zone = block.in_hit_zone(&profile.hit_zone);
    let face = Rect::centered(Vec2::ZERO, at.size);

    out.push(DrawCommand::Save);
    out.push(DrawCommand::Translate(at.pos));
    out.push(DrawCommand::SetShadow {
        blur: (if in_zone { 35.0 } else { 20.0 }) * at.scale * opts.glow,
        color,
    });
    out.push(DrawCommand::FillRect { rect: face, color });
    out.push(DrawCommand::FillRect {
        rect: face.inflate(-4.0),
        color: Rgba::BLACK.with_alpha(0.3),
    });
    out.push(DrawCommand::FillRect {
        rect: Rect::new(face.x, face.y, at.size * 0.3, at.size * 0.3),
        color: Rgba::WHITE.with_alpha(0.4),
    });

    if in_zone && opts.pulse {
        let pulse = 0.5 + (opts.time * 10.0).sin() as f32 * 0.3;
        out.push(DrawCommand::StrokeRect {
            rect: face.inflate(2.0),
            color: Rgba::WHITE.with_alpha(pulse),
            width: 3.0,
        });
    }

    out.push(DrawCommand::SetShadow {
        blur: 8.0 * opts.glow,
        color: Rgba::WHITE,
    });
    match block.direction {
        Some(direction) => out.push(DrawCommand::Text {
            pos: Vec2::ZERO,
            text: direction.glyph().to_string(),
            size: at.size * 0.6,
            bold: true,
            color: Rgba::WHITE,
            align: TextAlign::Center,
        }),
        None => out.push(DrawCommand::FillCircle {
            center: Vec2::ZERO,
            radius: at.size * 0.2,
            color: Rgba::WHITE,
        }),
    }
    out.push(DrawCommand::Restore);
}

fn particles(out: &mut Vec<DrawCommand>, field: &ParticleField, profile: &Profile, opts: &RenderOptions) {
    for particle in field.iter() {
        let color = profile.lane_color(particle.lane);
        out.push(DrawCommand::Save);
        out.push(DrawCommand::SetAlpha(particle.alpha.max(0.0)));
        out.push(DrawCommand::SetShadow {
            blur: 10.0 * opts.glow,
            color,
        });
        out.push(DrawCommand::FillCircle {
            center: particle.pos,
            radius: particle.size,
            color,
        });
        out.push(DrawCommand::Restore);
    }
}

/// Glowing trail plus cursor, tinted by which half of the arena it is in
fn saber(out: &mut Vec<DrawCommand>, pointer: &Pointer, profile: &Profile, opts: &RenderOptions) {
    let trail = pointer.trail();
    let shown = (trail.len() as f32 * opts.trail_fraction).ceil() as usize;
    let skip = trail.len() - shown.min(trail.len());

    if shown > 1 {
        let points: Vec<Vec2> = trail.iter().skip(skip).map(|t| t.pos).collect();
        let n = points.len() as f32;
        for (i, pair) in points.windows(2).enumerate() {
            let alpha = (i + 1) as f32 / n;
            let mid_x = (pair[0].x + pair[1].x) / 2.0;
            let color = profile.lane_color(profile.lane_at(mid_x));

            out.push(DrawCommand::Save);
            out.push(DrawCommand::SetShadow {
                blur: 20.0 * alpha * opts.glow,
                color,
            });
            out.push(DrawCommand::SetAlpha(alpha * 0.9));
            out.push(DrawCommand::Line {
                from: pair[0],
                to: pair[1],
                color,
                width: 12.0 * alpha,
            });
            out.push(DrawCommand::Restore);
        }
    }

    let color = profile.lane_color(profile.lane_at(pointer.pos.x));
    out.push(DrawCommand::Save);
    out.push(DrawCommand::SetShadow {
        blur: 25.0 * opts.glow,
        color,
    });
    out.push(DrawCommand::FillCircle {
        center: pointer.pos,
        radius: 6.0,
        color,
    });
    out.push(DrawCommand::SetAlpha(0.6));
    out.push(DrawCommand::StrokeCircle {
        center: pointer.pos,
        radius: 12.0,
        color,
        width: 2.0,
    });
    out.push(DrawCommand::Restore);
}

fn missed_counter(out: &mut Vec<DrawCommand>, missed: u32, profile: &Profile) {
    // Turns red past 70% of the allowance
    let warn = missed * 10 > profile.max_missed * 7;
    out.push(DrawCommand::Save);
    out.push(DrawCommand::SetShadow {
        blur: 0.0,
        color: Rgba::BLACK,
    });
    out.push(DrawCommand::Text {
        pos: Vec2::new(profile.arena_width - 20.0, 30.0),
        text: format!("Missed: {}/{}", missed, profile.max_missed),
        size: 22.0,
        bold: true,
        color: if warn { Rgba::WARNING } else { Rgba::WHITE },
        align: TextAlign::Right,
    });
    out.push(DrawCommand::Restore);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::commands::stack_depth;
    use crate::sim::{TickInput, tick};

    fn count<F: Fn(&DrawCommand) -> bool>(cmds: &[DrawCommand], f: F) -> usize {
        cmds.iter().filter(|c| f(c)).count()
    }

    fn texts(cmds: &[DrawCommand]) -> Vec<String> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_idle_draws_background_and_saber_only() {
        let mut state = GameState::new(Profile::dot_notes(), 1);
        state.pointer_moved(Vec2::new(100.0, 100.0));
        state.pointer_moved(Vec2::new(120.0, 110.0));

        let mut out = Vec::new();
        build(&state, &RenderOptions::default(), &mut out);

        assert!(matches!(out[1], DrawCommand::ClipRect(_)));
        assert!(matches!(out[2], DrawCommand::GradientRect { .. }));
        assert_eq!(stack_depth(&out), 0);
        assert!(texts(&out).is_empty(), "no HUD text while idle");
        // cursor dot + ring
        assert_eq!(
            count(&out, |c| matches!(c, DrawCommand::StrokeCircle { radius, .. } if *radius == 12.0)),
            1
        );
    }

    #[test]
    fn test_playing_draws_blocks_and_missed_counter() {
        let mut state = GameState::new(Profile::dot_notes(), 2);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        assert!(!state.blocks.is_empty());

        let mut out = Vec::new();
        build(&state, &RenderOptions::default(), &mut out);
        assert_eq!(stack_depth(&out), 0);
        assert!(texts(&out).contains(&"Missed: 0/10".to_string()));
        // center dot of a visible dot-note block
        assert!(count(&out, |c| matches!(c, DrawCommand::FillCircle { center, .. } if *center == Vec2::ZERO)) >= 1);
    }

    #[test]
    fn test_arrow_blocks_draw_glyph() {
        let mut state = GameState::new(Profile::arrows(), 2);
        state.phase = GamePhase::Playing;
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        let mut out = Vec::new();
        build(&state, &RenderOptions::default(), &mut out);
        let glyphs: Vec<String> = texts(&out).into_iter().filter(|t| !t.starts_with("Missed")).collect();
        assert!(!glyphs.is_empty());
        assert!(glyphs.iter().all(|g| crate::sim::Direction::ALL.iter().any(|d| d.glyph() == g.as_str())));
    }

    #[test]
    fn test_missed_counter_warns_near_limit() {
        let mut out = Vec::new();
        let profile = Profile::dot_notes();
        missed_counter(&mut out, 8, &profile);
        assert!(out.iter().any(|c| matches!(c, DrawCommand::Text { color, .. } if *color == Rgba::WARNING)));
        out.clear();
        missed_counter(&mut out, 7, &profile);
        assert!(out.iter().any(|c| matches!(c, DrawCommand::Text { color, .. } if *color == Rgba::WHITE)));
    }

    #[test]
    fn test_trail_fraction_limits_segments() {
        let mut state = GameState::new(Profile::dot_notes(), 1);
        for i in 0..10 {
            state.pointer_moved(Vec2::new(100.0 + i as f32 * 10.0, 100.0));
        }
        let lines = |fraction: f32| {
            let mut out = Vec::new();
            let opts = RenderOptions {
                trail_fraction: fraction,
                ..Default::default()
            };
            saber(&mut out, &state.pointer, &state.profile, &opts);
            count(&out, |c| matches!(c, DrawCommand::Line { .. }))
        };
        assert_eq!(lines(1.0), 9);
        assert_eq!(lines(0.5), 4);
        assert_eq!(lines(0.0), 0);
    }

    #[test]
    fn test_no_glow_means_zero_blur() {
        let mut state = GameState::new(Profile::dot_notes(), 1);
        state.pointer_moved(Vec2::new(700.0, 300.0));
        let mut out = Vec::new();
        let opts = RenderOptions {
            glow: 0.0,
            ..Default::default()
        };
        build(&state, &opts, &mut out);
        assert!(out.iter().all(|c| match c {
            DrawCommand::SetShadow { blur, .. } => *blur == 0.0,
            _ => true,
        }));
    }
}

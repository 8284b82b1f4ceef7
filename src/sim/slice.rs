//! Slice detection
//!
//! A swipe cuts a block when the pointer is fast enough, close enough to the
//! projected block center, the block is inside its hit zone, and (for arrow
//! blocks) the swipe points the way the arrow does.

use super::block::{Block, Projected};
use super::pointer::Pointer;
use super::state::{GameEvent, GamePhase, GameState};
use crate::profile::{DirectionRule, Profile};
use crate::swipe_direction;

/// Result of testing one block against the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceCheck {
    Hit,
    AlreadySliced,
    OutsideHitZone,
    TooSlow,
    TooFar,
    /// Pointer did not move between samples, so there is no swipe direction
    NoSwipe,
    WrongDirection,
}

/// Test a single block. Pure; never mutates anything.
pub fn check_slice(block: &Block, at: &Projected, pointer: &Pointer, profile: &Profile) -> SliceCheck {
    if block.is_sliced() {
        return SliceCheck::AlreadySliced;
    }
    if !block.in_hit_zone(&profile.hit_zone) {
        return SliceCheck::OutsideHitZone;
    }
    if pointer.velocity <= profile.min_slice_speed {
        return SliceCheck::TooSlow;
    }
    if pointer.pos.distance(at.pos) >= at.size * profile.slice_radius_factor {
        return SliceCheck::TooFar;
    }

    if let (Some(arrow), DirectionRule::Required { alignment }) = (block.direction, profile.direction)
    {
        match arrow.alignment(pointer.displacement()) {
            None => return SliceCheck::NoSwipe,
            Some(dot) if dot < alignment => return SliceCheck::WrongDirection,
            Some(_) => {}
        }
    }

    SliceCheck::Hit
}

/// Run the slice test over every block and apply hits to the session.
/// Returns the number of blocks cut.
pub fn slice_pass(state: &mut GameState) -> usize {
    if state.pointer.velocity <= state.profile.min_slice_speed {
        return 0;
    }

    let swipe = swipe_direction(state.pointer.displacement());
    let mut hits = 0;

    for block in state.blocks.iter_mut() {
        let at = block.project(&state.profile);
        if check_slice(block, &at, &state.pointer, &state.profile) != SliceCheck::Hit {
            continue;
        }

        block.slice(at, swipe, &state.profile.fragment, &mut state.rng);
        state.particles.burst(
            at.pos,
            block.lane,
            state.profile.particle_burst,
            &mut state.rng,
        );

        let points = state.session.register_slice();
        hits += 1;
        log::debug!(
            "Sliced block {} (combo {}, +{})",
            block.id,
            state.session.combo,
            points
        );
        state.events.push(GameEvent::BlockSliced {
            id: block.id,
            combo: state.session.combo,
            points,
        });

        if let Some(interval) = state
            .spawner
            .on_slice(state.session.sliced_total, state.profile.ramp.as_ref())
        {
            log::info!("Difficulty up: spawning every {} ticks", interval);
            state.events.push(GameEvent::DifficultyIncreased { interval });
        }

        if state
            .profile
            .win_score
            .is_some_and(|win| state.session.score >= win)
        {
            state.phase = GamePhase::Won;
            state.events.push(GameEvent::Won);
            log::info!(
                "Won with {} points (max combo {})",
                state.session.score,
                state.session.max_combo
            );
            break;
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::block::{BlockState, Direction, Lane};
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing(profile: Profile) -> GameState {
        let mut state = GameState::new(profile, 9);
        state.phase = GamePhase::Playing;
        state
    }

    /// Block sitting at depth `z` aimed at the top-left grid cell
    fn place_block(state: &mut GameState, z: f32, direction: Option<Direction>) -> Vec2 {
        let id = state.next_entity_id();
        let target = state.profile.grid.cell_center(0, 0, state.profile.arena());
        let block = Block {
            id,
            lane: Lane::Left,
            column: 0,
            row: 0,
            target,
            z,
            speed: state.profile.block_speed,
            base_size: state.profile.block_size,
            direction,
            state: BlockState::Incoming,
        };
        let center = block.project(&state.profile).pos;
        state.blocks.push(block);
        center
    }

    /// Two samples ending at `end`, moving by `delta`
    fn swipe(state: &mut GameState, end: Vec2, delta: Vec2) {
        state.pointer_moved(end - delta);
        state.pointer_moved(end);
    }

    #[test]
    fn test_fast_swipe_through_block_hits() {
        let mut state = playing(Profile::dot_notes());
        let center = place_block(&mut state, 0.9, None);
        swipe(&mut state, center, Vec2::new(20.0, 0.0));

        assert_eq!(slice_pass(&mut state), 1);
        assert!(state.blocks[0].is_sliced());
        assert_eq!(state.session.combo, 1);
        assert_eq!(state.session.score, 10);
        assert_eq!(state.particles.len(), 25);
        assert!(matches!(
            state.events[0],
            GameEvent::BlockSliced { combo: 1, points: 10, .. }
        ));
    }

    #[test]
    fn test_slice_at_combo_three_adds_forty() {
        let mut state = playing(Profile::dot_notes());
        state.session.combo = 3;
        state.session.max_combo = 3;
        state.session.score = 60;
        let center = place_block(&mut state, 0.9, None);
        swipe(&mut state, center, Vec2::new(0.0, 15.0));

        slice_pass(&mut state);
        assert_eq!(state.session.combo, 4);
        assert_eq!(state.session.score, 100);
    }

    #[test]
    fn test_sliced_block_never_hit_again() {
        let mut state = playing(Profile::dot_notes());
        let center = place_block(&mut state, 0.9, None);
        swipe(&mut state, center, Vec2::new(20.0, 0.0));
        assert_eq!(slice_pass(&mut state), 1);

        swipe(&mut state, center, Vec2::new(-20.0, 0.0));
        assert_eq!(slice_pass(&mut state), 0);
        assert_eq!(state.session.combo, 1);
        let at = state.blocks[0].project(&state.profile);
        assert_eq!(
            check_slice(&state.blocks[0], &at, &state.pointer, &state.profile),
            SliceCheck::AlreadySliced
        );
    }

    #[test]
    fn test_outside_hit_zone_rejected() {
        let mut state = playing(Profile::dot_notes());
        let center = place_block(&mut state, 0.5, None);
        swipe(&mut state, center, Vec2::new(20.0, 0.0));
        assert_eq!(slice_pass(&mut state), 0);
        let at = state.blocks[0].project(&state.profile);
        assert_eq!(
            check_slice(&state.blocks[0], &at, &state.pointer, &state.profile),
            SliceCheck::OutsideHitZone
        );
    }

    #[test]
    fn test_far_pointer_rejected() {
        let mut state = playing(Profile::dot_notes());
        let center = place_block(&mut state, 0.9, None);
        swipe(&mut state, center + Vec2::new(200.0, 0.0), Vec2::new(20.0, 0.0));
        assert_eq!(slice_pass(&mut state), 0);
    }

    #[test]
    fn test_wrong_direction_rejected() {
        let mut state = playing(Profile::arrows());
        let center = place_block(&mut state, 0.9, Some(Direction::Down));
        // sideways swipe: dot product 0 < 0.7
        swipe(&mut state, center, Vec2::new(20.0, 0.0));
        assert_eq!(slice_pass(&mut state), 0);
        let at = state.blocks[0].project(&state.profile);
        assert_eq!(
            check_slice(&state.blocks[0], &at, &state.pointer, &state.profile),
            SliceCheck::WrongDirection
        );

        // matching swipe cuts it
        swipe(&mut state, center, Vec2::new(0.0, 20.0));
        assert_eq!(slice_pass(&mut state), 1);
    }

    #[test]
    fn test_diagonal_within_alignment_hits() {
        let mut state = playing(Profile::arrows());
        let center = place_block(&mut state, 0.9, Some(Direction::DownRight));
        // pure down swipe: cos(45°) ≈ 0.707 >= 0.7
        swipe(&mut state, center, Vec2::new(0.0, 20.0));
        assert_eq!(slice_pass(&mut state), 1);
    }

    #[test]
    fn test_zero_displacement_never_slices_arrow_block() {
        let mut state = playing(Profile::arrows());
        let center = place_block(&mut state, 0.9, Some(Direction::Right));
        // fast swipe elsewhere, then a stationary sample right on the block
        swipe(&mut state, center, Vec2::new(30.0, 0.0));
        state.pointer_moved(center);
        state.pointer.velocity = 50.0;

        assert_eq!(slice_pass(&mut state), 0);
        let at = state.blocks[0].project(&state.profile);
        assert_eq!(
            check_slice(&state.blocks[0], &at, &state.pointer, &state.profile),
            SliceCheck::NoSwipe
        );
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_win_stops_pass() {
        let mut profile = Profile::dot_notes();
        profile.win_score = Some(10);
        let mut state = playing(profile);
        let center = place_block(&mut state, 0.9, None);
        place_block(&mut state, 0.9, None);
        swipe(&mut state, center, Vec2::new(20.0, 0.0));

        assert_eq!(slice_pass(&mut state), 1);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(!state.blocks[1].is_sliced());
        assert!(state.events.contains(&GameEvent::Won));
    }

    #[test]
    fn test_ramp_triggers_on_tenth_slice() {
        let mut state = playing(Profile::dot_notes());
        state.session.sliced_total = 9;
        let center = place_block(&mut state, 0.9, None);
        swipe(&mut state, center, Vec2::new(20.0, 0.0));
        slice_pass(&mut state);
        assert_eq!(state.spawner.interval, 57);
        assert!(state
            .events
            .contains(&GameEvent::DifficultyIncreased { interval: 57 }));
    }

    proptest! {
        #[test]
        fn prop_slow_pointer_never_scores(
            x in 0.0f32..1000.0,
            y in 0.0f32..700.0,
            dx in -8.0f32..8.0,
            dy in -8.0f32..8.0,
            z in 0.0f32..1.2,
        ) {
            prop_assume!((dx * dx + dy * dy).sqrt() < 8.0);
            let mut state = playing(Profile::dot_notes());
            place_block(&mut state, z, None);
            let before = state.session.clone();
            swipe(&mut state, Vec2::new(x, y), Vec2::new(dx, dy));

            prop_assert_eq!(slice_pass(&mut state), 0);
            prop_assert_eq!(&state.session, &before);
        }

        #[test]
        fn prop_misaligned_swipe_never_hits(angle in 0.0f32..std::f32::consts::TAU, speed in 9.0f32..60.0) {
            let mut state = playing(Profile::arrows());
            let center = place_block(&mut state, 0.9, Some(Direction::Up));
            let delta = Vec2::new(angle.cos(), angle.sin()) * speed;
            prop_assume!(Direction::Up.alignment(delta).unwrap() < 0.7);
            swipe(&mut state, center, delta);

            prop_assert_eq!(slice_pass(&mut state), 0);
            prop_assert_eq!(state.session.score, 0);
        }
    }
}

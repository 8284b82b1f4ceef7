//! Fixed timestep simulation tick
//!
//! One call advances the game by one display-refresh worth of simulation:
//! spawner, block update and cull, slice pass, then particles.

use super::block::Expiry;
use super::slice::slice_pass;
use super::spawner::random_block;
use super::state::{GameEvent, GamePhase, GameState};

/// Control signals for a single tick (one-shot)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Leave the idle screen
    pub start: bool,
    /// Begin a new run after game over or a win
    pub restart: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    match state.phase {
        GamePhase::Idle if input.start => {
            state.reset_session();
            state.phase = GamePhase::Playing;
            log::info!("Run started ({} profile)", state.profile.name);
        }
        GamePhase::GameOver | GamePhase::Won if input.restart => {
            state.reset_session();
            state.phase = GamePhase::Playing;
            log::info!("Run restarted");
        }
        _ => {}
    }

    state.time_ticks += 1;

    if state.phase != GamePhase::Playing {
        settle(state);
        return;
    }

    if state.spawner.tick() {
        let id = state.next_entity_id();
        let block = random_block(id, &state.profile, &mut state.rng);
        log::debug!("Spawned block {} in lane {:?}", id, block.lane);
        state.blocks.push(block);
        state.events.push(GameEvent::BlockSpawned { id });
    }

    update_blocks(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    slice_pass(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    state.particles.update();
}

/// Move every block, cull the finished ones and count misses
fn update_blocks(state: &mut GameState) {
    let profile = &state.profile;
    let session = &mut state.session;
    let phase = &mut state.phase;
    let events = &mut state.events;

    for block in state.blocks.iter_mut() {
        block.advance(&profile.fragment);
    }

    state.blocks.retain(|block| match block.expiry(profile) {
        None => true,
        Some(Expiry::Finished) => false,
        Some(Expiry::Missed) => {
            // Misses after the run ended are not counted
            if *phase == GamePhase::Playing {
                session.register_miss();
                events.push(GameEvent::BlockMissed { id: block.id });
                log::debug!("Missed block {} ({}/{})", block.id, session.missed, profile.max_missed);

                if session.missed >= profile.max_missed {
                    *phase = GamePhase::GameOver;
                    events.push(GameEvent::GameOver);
                    log::info!(
                        "Game over: {} points, max combo {}",
                        session.score,
                        session.max_combo
                    );
                }
            }
            false
        }
    });
}

/// Outside of play, let sliced fragments and particles finish their animation
fn settle(state: &mut GameState) {
    let profile = &state.profile;
    for block in state.blocks.iter_mut().filter(|b| b.is_sliced()) {
        block.advance(&profile.fragment);
    }
    state
        .blocks
        .retain(|b| !(b.is_sliced() && b.expiry(profile).is_some()));
    state.particles.update();
}

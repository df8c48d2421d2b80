//! Phase resolvers.
//!
//! Each resolver consumes agent decisions for one phase and applies them to
//! `GameState` as a single transition:
//!
//! - [`NightResolver`]: seer check, wolf kill, witch potion, night deaths
//! - [`DayResolver`]: announcement, last words, discussion, vote, hunter shot
//! - [`MvpVote`]: post-game exhibition vote, read-only
//!
//! Decisions for one step are gathered before any of them is applied, and
//! an unusable answer is replaced by a deterministic default rather than
//! aborting the round.

mod day;
mod mvp;
mod night;

pub use day::{DayReport, DayResolver};
pub use mvp::{MvpResult, MvpVote};
pub use night::{NightReport, NightResolver};

use tracing::warn;

use crate::agent::{AgentTable, PlayerAgent};
use crate::core::{
    EventKind, EventOutcome, GameEvent, GameState, InconsistentStateError, InvalidAction, PlayerId,
};

/// Look up the agent for a seat.
fn agent_for(
    agents: &mut AgentTable,
    player: PlayerId,
) -> Result<&mut Box<dyn PlayerAgent>, InconsistentStateError> {
    agents
        .get_mut(player)
        .ok_or(InconsistentStateError::UnknownPlayer(player))
}

/// Record a substituted answer in the event log.
fn record_fallback(
    state: &mut GameState,
    kind: EventKind,
    actor: PlayerId,
    substitute: Option<PlayerId>,
    invalid: InvalidAction,
) {
    warn!(
        round = state.round(),
        phase = %state.phase(),
        player = %actor,
        error = %invalid,
        "invalid action, substituting default"
    );

    let mut event = GameEvent::new(state.round(), state.phase(), kind)
        .with_actor(actor)
        .with_outcome(EventOutcome::Fallback(invalid));
    if let Some(target) = substitute {
        event = event.with_target(target);
    }
    state.record_event(event);
}

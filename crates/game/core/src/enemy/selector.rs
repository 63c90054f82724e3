//! Enemy action selection.
//!
//! The candidate pool is drawn from with a fresh roll per attempt; a draw
//! that lands on an excluded action is redrawn. Each attempt is addressed
//! separately so a seeded combat always picks the same action.

use crate::error::ContentError;

use super::{BehaviorContext, BehaviorTable};

/// Redraws allowed before falling back to a draw over the non-excluded
/// candidates only.
pub const MAX_REDRAWS: u32 = 32;

/// Picks an action key from `table`.
///
/// `roll(total, attempt)` must return a value in `[0, total)`.
///
/// # Errors
///
/// - [`ContentError::NoViableBehavior`] when no predicate passes
/// - [`ContentError::AllCandidatesExcluded`] when every candidate is excluded
pub fn select_action(
    enemy: &str,
    table: &BehaviorTable,
    ctx: &BehaviorContext<'_>,
    exclude: &[&str],
    mut roll: impl FnMut(u32, u32) -> u32,
) -> Result<String, ContentError> {
    let pool = table
        .candidates(ctx)?
        .ok_or_else(|| ContentError::NoViableBehavior {
            enemy: enemy.to_string(),
            turn: ctx.turn,
        })?;

    let excluded = |key: &String| exclude.contains(&key.as_str());
    if pool.iter().all(excluded) {
        return Err(ContentError::AllCandidatesExcluded {
            enemy: enemy.to_string(),
            turn: ctx.turn,
        });
    }

    for attempt in 0..MAX_REDRAWS {
        let drawn = pool.draw(roll(pool.total_weight(), attempt));
        if !excluded(drawn) {
            return Ok(drawn.clone());
        }
    }

    let allowed = pool.filtered(|key| !excluded(key))?;
    Ok(allowed
        .draw(roll(allowed.total_weight(), MAX_REDRAWS))
        .clone())
}

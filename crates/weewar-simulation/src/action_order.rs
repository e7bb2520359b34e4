//! The per-unit action-progression state machine. `spec.md` §4.4.1.

use weewar_contracts::error::WeewarError;
use weewar_contracts::hex_grid::AxialCoord;
use weewar_contracts::unit::Unit;
use weewar_rules_engine::engine::RulesEngine;
use weewar_world::World;

/// Splits a step like `"move|attack"` into its tokens. A plain step
/// (`"move"`) yields a single-element slice.
#[must_use]
pub fn step_tokens(step: &str) -> Vec<&str> {
    step.split('|').collect()
}

/// Whether `action_order[k]` is an alternation (more than one token).
#[must_use]
pub fn is_alternation(step: &str) -> bool {
    step_tokens(step).len() > 1
}

/// Resource feasibility filter named in `spec.md` §4.4.1: `"move"` needs
/// remaining distance, `"attack"` needs a legal target, `"retreat"` needs
/// retreat points (modeled here as remaining distance, since the source
/// material defines no separate retreat-point pool).
#[must_use]
pub fn action_is_feasible(engine: &RulesEngine, world: &World, unit: &Unit, action: &str) -> bool {
    match action {
        "move" | "retreat" => unit.distance_left > 0.0,
        "attack" => !weewar_rules_engine::combat::attack_options(engine, world, unit).is_empty(),
        _ => true,
    }
}

/// The actions legal for `unit` right now: the current step's tokens
/// (narrowed to the chosen alternative once one is picked), filtered by
/// resource feasibility.
#[must_use]
pub fn allowed_actions(engine: &RulesEngine, world: &World, unit: &Unit, action_order: &[String]) -> Vec<String> {
    let Some(step) = action_order.get(unit.progression_step as usize) else {
        return Vec::new();
    };
    let tokens: Vec<String> = if is_alternation(step) && !unit.chosen_alternative.is_empty() {
        vec![unit.chosen_alternative.clone()]
    } else {
        step_tokens(step).into_iter().map(str::to_string).collect()
    };
    tokens
        .into_iter()
        .filter(|action| action_is_feasible(engine, world, unit, action))
        .collect()
}

/// # Errors
/// [`WeewarError::ActionNotAllowed`] if `action` is not currently legal
/// and `strict` is enforced.
pub fn check_action_allowed(
    engine: &RulesEngine,
    world: &World,
    unit: &Unit,
    action_order: &[String],
    action: &str,
    strict: bool,
) -> Result<(), WeewarError> {
    if !strict {
        return Ok(());
    }
    let allowed = allowed_actions(engine, world, unit, action_order);
    if allowed.iter().any(|a| a == action) {
        Ok(())
    } else {
        Err(WeewarError::ActionNotAllowed {
            action: action.to_string(),
            step: unit.progression_step,
        })
    }
}

/// Advances `unit`'s progression after `action` executes successfully.
/// `spec.md` §4.4.1 "Transitions on successful action".
pub fn advance_progression(unit: &mut Unit, action_order: &[String], action: &str) {
    let Some(step) = action_order.get(unit.progression_step as usize) else {
        return;
    };
    let alternation = is_alternation(step);
    if alternation && unit.chosen_alternative.is_empty() {
        unit.chosen_alternative = action.to_string();
    }

    let alternative_executed = alternation && unit.chosen_alternative == action;
    let resource_exhausted = (action == "move" || action == "retreat") && unit.distance_left <= 0.0;

    if !alternation || alternative_executed || resource_exhausted {
        unit.progression_step += 1;
        unit.chosen_alternative.clear();
    }
}

#[must_use]
pub fn is_terminal(unit: &Unit, action_order: &[String]) -> bool {
    unit.progression_step as usize >= action_order.len()
}

/// Resets progression state at the start of this unit's owner's turn.
/// `spec.md` §4.4.1 "Initial".
pub fn reset_progression(unit: &mut Unit) {
    unit.progression_step = 0;
    unit.chosen_alternative.clear();
}

#[must_use]
pub fn coord_of(unit: &Unit) -> AxialCoord {
    unit.coord
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_action_step_advances_unconditionally() {
        let mut unit = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        let order = vec!["capture".to_string(), "move".to_string()];
        advance_progression(&mut unit, &order, "capture");
        assert_eq!(unit.progression_step, 1);
    }

    #[test]
    fn alternation_step_sets_chosen_alternative_then_advances() {
        let mut unit = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        let order = vec!["move|attack".to_string()];
        advance_progression(&mut unit, &order, "attack");
        assert_eq!(unit.chosen_alternative, "");
        assert_eq!(unit.progression_step, 1);
    }

    #[test]
    fn move_step_advances_when_distance_is_exhausted() {
        let mut unit = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        unit.distance_left = 0.0;
        let order = vec!["move".to_string(), "attack".to_string()];
        advance_progression(&mut unit, &order, "move");
        assert_eq!(unit.progression_step, 1);
    }

    #[test]
    fn move_step_holds_when_distance_remains() {
        let mut unit = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        unit.distance_left = 1.0;
        let order = vec!["move".to_string(), "attack".to_string()];
        advance_progression(&mut unit, &order, "move");
        assert_eq!(unit.progression_step, 0);
    }

    #[test]
    fn terminal_progression_has_no_allowed_actions() {
        let order = vec!["move".to_string()];
        let mut unit = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        unit.progression_step = 1;
        assert!(is_terminal(&unit, &order));
    }

    #[test]
    fn reset_clears_step_and_alternative() {
        let mut unit = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        unit.progression_step = 2;
        unit.chosen_alternative = "attack".to_string();
        reset_progression(&mut unit);
        assert_eq!(unit.progression_step, 0);
        assert_eq!(unit.chosen_alternative, "");
    }
}

//! Attack enumeration, the deterministic combat formula, wound bonus,
//! splash damage, and repair. See `spec.md` §4.3.4-4.3.7.

use rand::Rng;
use weewar_contracts::error::WeewarError;
use weewar_contracts::hex_grid::{self, AxialCoord};
use weewar_contracts::rules_data::DamageDistribution;
use weewar_contracts::unit::{AttackRecord, Unit};
use weewar_contracts::unit::MAX_HEALTH;
use weewar_world::World;

use crate::engine::RulesEngine;

/// Everything the combat formula needs about one matchup. Built by the
/// caller (`weewar-simulation`) from a `World` + `RulesEngine` snapshot.
#[derive(Debug, Clone, Copy)]
pub struct CombatContext<'a> {
    pub attacker: &'a Unit,
    pub defender: &'a Unit,
    pub attacker_tile_type: i32,
    pub defender_tile_type: i32,
}

/// Coordinates within `unit`'s attack range that hold an enemy unit this
/// unit type can legally damage. `spec.md` §4.3.4.
#[must_use]
pub fn attack_options(engine: &RulesEngine, world: &World, unit: &Unit) -> Vec<AxialCoord> {
    let Some(unit_def) = engine.unit_def(unit.unit_type) else {
        return Vec::new();
    };
    let (min, max) = unit_def.attack_range;

    let mut candidates = Vec::new();
    for radius in min..=max {
        candidates.extend(hex_grid::ring(unit.coord, radius));
    }

    candidates
        .into_iter()
        .filter(|&coord| {
            world.unit_at(coord).is_some_and(|defender| {
                defender.player != unit.player
                    && engine
                        .index
                        .unit_unit_props
                        .contains_key(&(unit.unit_type, defender.unit_type))
            })
        })
        .collect()
}

/// Hit probability and per-attack damage bookkeeping, computed once so
/// `combat_prediction` and `simulate` share it. `spec.md` §4.3.5 steps 1-5.
fn hit_probability(
    engine: &RulesEngine,
    ctx: CombatContext<'_>,
    wound_bonus: f64,
) -> Result<f64, WeewarError> {
    let attacker_def = engine.require_unit_def(ctx.attacker.unit_type)?;
    let defender_def = engine.require_unit_def(ctx.defender.unit_type)?;

    let key = (defender_def.unit_class.clone(), defender_def.unit_terrain);
    let Some(&base_attack) = attacker_def.attack_vs_class.get(&key) else {
        return Err(WeewarError::CannotAttackTarget {
            attacker_type: ctx.attacker.unit_type,
            defender_type: ctx.defender.unit_type,
        });
    };

    let attack_bonus = engine
        .index
        .terrain_unit_props
        .get(&(ctx.attacker_tile_type, ctx.attacker.unit_type))
        .map_or(0.0, |p| p.attack_bonus);
    let defense_bonus = engine
        .index
        .terrain_unit_props
        .get(&(ctx.defender_tile_type, ctx.defender.unit_type))
        .map_or(0.0, |p| p.defense_bonus);

    let p = 0.05 * ((base_attack + attack_bonus) - (defender_def.defense + defense_bonus) + wound_bonus) + 0.5;
    Ok(p.clamp(0.0, 1.0))
}

/// Draws the combat formula's dice against the *live* engine RNG. Rolls
/// are drawn in a fixed order — six per attacker health unit, health
/// units ascending — so replays with the same seed reproduce identical
/// outcomes. `spec.md` §4.3.5 step 6 and §5 "Ordering guarantees".
///
/// # Errors
/// [`WeewarError::CannotAttackTarget`] if the attacker has no entry for
/// the defender's class/terrain.
pub fn simulate<R: Rng + ?Sized>(
    engine: &RulesEngine,
    ctx: CombatContext<'_>,
    wound_bonus: f64,
    rng: &mut R,
) -> Result<i32, WeewarError> {
    let p = hit_probability(engine, ctx, wound_bonus)?;
    let health_units = ctx.attacker.health_units();
    let hits: i32 = (0..6 * health_units).filter(|_| rng.random::<f64>() < p).count() as i32;
    let damage = (hits / 6).min(health_units);
    tracing::debug!(hit_probability = p, health_units, damage, "combat simulated");
    Ok(damage)
}

/// Analytical damage distribution for the matchup, no RNG involved.
/// `spec.md` §4.3.5 "`combat_prediction`".
///
/// # Errors
/// Same as [`simulate`].
pub fn combat_prediction(
    engine: &RulesEngine,
    ctx: CombatContext<'_>,
    wound_bonus: f64,
) -> Result<DamageDistribution, WeewarError> {
    let p = hit_probability(engine, ctx, wound_bonus)?;
    let health_units = ctx.attacker.health_units();
    let ranges = binomial_damage_ranges(health_units, p);
    let expected = binomial_damage_expectation(health_units, p);
    Ok(DamageDistribution {
        min: ranges.first().map_or(0, |r| r.min),
        max: ranges.last().map_or(0, |r| r.max),
        expected,
        ranges,
    })
}

fn binomial_pmf(n: i32, k: i32, p: f64) -> f64 {
    binomial_coefficient(n, k) * p.powi(k) * (1.0 - p).powi(n - k)
}

fn binomial_coefficient(n: i32, k: i32) -> f64 {
    let mut result = 1.0;
    for i in 0..k {
        result *= f64::from(n - i) / f64::from(i + 1);
    }
    result
}

/// Expected damage: total hits across all `6 * health_units` draws follow
/// `Binomial(6 * health_units, p)`; damage is `floor(hits / 6)`, capped at
/// `health_units` (automatic, since `hits` never exceeds `6 *
/// health_units`). `E[floor(hits / 6)]`.
fn binomial_damage_expectation(health_units: i32, p: f64) -> f64 {
    let n = 6 * health_units;
    (0..=n).map(|hits| binomial_pmf(n, hits, p) * f64::from(hits / 6)).sum()
}

/// One contiguous damage-range band per achievable raw-damage value. Raw
/// damage is `floor(hits / 6)` where `hits ~ Binomial(6 * health_units,
/// p)`, so this groups the binomial's `6 * health_units + 1` outcomes
/// into `health_units + 1` damage buckets.
fn binomial_damage_ranges(health_units: i32, p: f64) -> Vec<weewar_contracts::rules_data::DamageRange> {
    if health_units <= 0 {
        return Vec::new();
    }
    let n = 6 * health_units;
    let mut by_damage = vec![0.0; health_units as usize + 1];
    for hits in 0..=n {
        let damage = (hits / 6).min(health_units);
        by_damage[damage as usize] += binomial_pmf(n, hits, p);
    }

    by_damage
        .into_iter()
        .enumerate()
        .filter(|&(_, prob)| prob > 0.0)
        .map(|(damage, prob)| weewar_contracts::rules_data::DamageRange {
            min: damage as i32,
            max: damage as i32,
            prob,
        })
        .collect()
}

/// Monte-Carlo histogram over a *fixed* auxiliary RNG, independent of the
/// live game RNG, so UI previews are stable across calls. `spec.md`
/// §4.3.5 "`damage_simulation`".
///
/// # Errors
/// Same as [`simulate`].
pub fn damage_simulation(
    engine: &RulesEngine,
    ctx: CombatContext<'_>,
    wound_bonus: f64,
    trials: u32,
) -> Result<Vec<(i32, u32)>, WeewarError> {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0xC0FFEE);
    let mut histogram: std::collections::BTreeMap<i32, u32> = std::collections::BTreeMap::new();
    for _ in 0..trials {
        let damage = simulate(engine, ctx, wound_bonus, &mut rng)?;
        *histogram.entry(damage).or_insert(0) += 1;
    }
    Ok(histogram.into_iter().collect())
}

/// The wound bonus a fresh attack against `defender` receives, derived
/// from `defender.attack_history`. `spec.md` §4.3.6.
#[must_use]
pub fn wound_bonus(defender: &Unit, attacker_coord: AxialCoord) -> f64 {
    let current_is_ranged = Unit::is_ranged_attack_from(attacker_coord, defender.coord);
    let mut bonus = 0.0;
    for prior in &defender.attack_history {
        bonus += if current_is_ranged {
            1.0
        } else {
            prior_bonus_for_melee(prior, attacker_coord, defender.coord)
        };
    }
    bonus
}

fn prior_bonus_for_melee(prior: &AttackRecord, attacker_coord: AxialCoord, defender_coord: AxialCoord) -> f64 {
    if prior.is_ranged {
        return 1.0;
    }
    if hex_grid::distance(prior.attacker_coord, attacker_coord) == 1 {
        return 1.0;
    }
    if is_opposite_side(prior.attacker_coord, attacker_coord, defender_coord) {
        return 3.0;
    }
    2.0
}

/// Whether `a` and `b` sit on exactly opposite sides of `center`: their
/// direction vectors from `center` negate each other.
fn is_opposite_side(a: AxialCoord, b: AxialCoord, center: AxialCoord) -> bool {
    let da = (a.q - center.q, a.r - center.r);
    let db = (b.q - center.q, b.r - center.r);
    da.0 == -db.0 && da.1 == -db.1
}

/// Runs the combat formula with zero wound bonus against every non-air
/// adjacent enemy unit, `splash_damage` times; applies only if the total
/// exceeds 4 health units. `spec.md` §4.3.7 "Splash".
///
/// # Errors
/// Propagates [`simulate`] errors for the first adjacent target that
/// fails the attack-table lookup; callers should treat a target with no
/// attack-table entry as simply immune rather than aborting the whole
/// splash, so this is only returned for genuinely missing unit defs.
pub fn splash_targets<R: Rng + ?Sized>(
    engine: &RulesEngine,
    world: &World,
    center: &Unit,
    splash_damage: u32,
    rng: &mut R,
) -> Result<Vec<(AxialCoord, i32)>, WeewarError> {
    let mut results = Vec::new();
    for neighbor_coord in hex_grid::neighbors(center.coord) {
        let Some(neighbor) = world.unit_at(neighbor_coord) else {
            continue;
        };
        let Some(def) = engine.unit_def(neighbor.unit_type) else {
            continue;
        };
        if def.unit_terrain == weewar_contracts::rules_data::UnitTerrain::Air {
            continue;
        }
        let Some(tile) = world.tile_at(neighbor_coord) else {
            continue;
        };
        let attacker_tile = world.tile_at(center.coord).map_or(0, |t| t.tile_type);
        let ctx = CombatContext {
            attacker: center,
            defender: neighbor,
            attacker_tile_type: attacker_tile,
            defender_tile_type: tile.tile_type,
        };
        let mut total = 0;
        for _ in 0..splash_damage {
            match simulate(engine, ctx, 0.0, rng) {
                Ok(damage) => total += damage,
                Err(WeewarError::CannotAttackTarget { .. }) => {}
                Err(other) => return Err(other),
            }
        }
        if total > 4 {
            results.push((neighbor_coord, total));
        }
    }
    Ok(results)
}

/// The fraction of a fixer's repair draws that succeed. `spec.md` §4.3.7
/// "Repair (Fix)": `p_fix = clamp(0.05 * F, 0, 1)`, three rolls per fixer
/// health unit, `heal = successes / 3`.
#[must_use]
pub fn repair_amount<R: Rng + ?Sized>(fixer_health_units: i32, fix_value: f64, rng: &mut R) -> i32 {
    let p_fix = (0.05 * fix_value).clamp(0.0, 1.0);
    let mut healed = 0;
    for _ in 0..fixer_health_units {
        let successes = (0..3).filter(|_| rng.random::<f64>() < p_fix).count();
        healed += (successes as i32) / 3;
    }
    healed
}

/// Clamps a heal amount so it never pushes `available_health` above
/// [`MAX_HEALTH`].
#[must_use]
pub fn clamp_heal(current: i32, healed_units: i32) -> i32 {
    (current + healed_units * 10).min(MAX_HEALTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use weewar_contracts::rules_data::{
        RulesDocument, TerrainDefinition, TerrainType, UnitDefinition, UnitTerrain, UnitUnitProperties,
    };

    fn engine_with_one_matchup() -> RulesEngine {
        let mut attack_vs_class = HashMap::new();
        attack_vs_class.insert(("infantry".to_string(), UnitTerrain::Land), 8.0);
        let mut doc = RulesDocument {
            units: vec![
                UnitDefinition {
                    id: 1,
                    name: "Infantry".into(),
                    unit_class: "infantry".into(),
                    unit_terrain: UnitTerrain::Land,
                    health: 100,
                    movement_points: 3.0,
                    attack_range: (1, 1),
                    defense: 2.0,
                    attack_vs_class,
                    action_order: vec!["move|attack".into()],
                    splash_damage: 0,
                    fix_value: 5.0,
                    cost: 100,
                },
                UnitDefinition {
                    id: 2,
                    name: "Defender".into(),
                    unit_class: "infantry".into(),
                    unit_terrain: UnitTerrain::Land,
                    health: 100,
                    movement_points: 3.0,
                    attack_range: (1, 1),
                    defense: 2.0,
                    attack_vs_class: HashMap::new(),
                    action_order: vec!["move|attack".into()],
                    splash_damage: 0,
                    fix_value: 0.0,
                    cost: 100,
                },
            ],
            terrains: vec![TerrainDefinition {
                id: 1,
                name: "Grass".into(),
                terrain_type: TerrainType::Nature,
                base_move_cost: 1.0,
                defense_bonus: 0.0,
            }],
            terrain_unit_properties: HashMap::new(),
            unit_unit_properties: HashMap::new(),
        };
        doc.unit_unit_properties.insert(
            "1:2".to_string(),
            UnitUnitProperties {
                damage: weewar_contracts::rules_data::DamageDistribution::default(),
            },
        );
        RulesEngine::load(&doc).unwrap()
    }

    #[test]
    fn attack_not_possible_without_class_entry() {
        let engine = engine_with_one_matchup();
        let attacker = Unit::new(AxialCoord::new(0, 0), 1, 2, 3.0);
        let defender = Unit::new(AxialCoord::new(1, 0), 2, 1, 3.0);
        let ctx = CombatContext {
            attacker: &attacker,
            defender: &defender,
            attacker_tile_type: 1,
            defender_tile_type: 1,
        };
        assert!(matches!(
            hit_probability(&engine, ctx, 0.0),
            Err(WeewarError::CannotAttackTarget { .. })
        ));
    }

    #[test]
    fn hit_probability_reflects_attack_minus_defense() {
        let engine = engine_with_one_matchup();
        let attacker = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        let defender = Unit::new(AxialCoord::new(1, 0), 2, 2, 3.0);
        let ctx = CombatContext {
            attacker: &attacker,
            defender: &defender,
            attacker_tile_type: 1,
            defender_tile_type: 1,
        };
        let p = hit_probability(&engine, ctx, 0.0).unwrap();
        assert!((p - (0.05 * (8.0 - 2.0) + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn wound_bonus_is_zero_with_no_history() {
        let defender = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        assert_eq!(wound_bonus(&defender, AxialCoord::new(1, 0)), 0.0);
    }

    #[test]
    fn ranged_attack_adds_one_per_prior_attack() {
        let mut defender = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        defender.attack_history.push(AttackRecord {
            attacker_coord: AxialCoord::new(5, 5),
            is_ranged: false,
        });
        let bonus = wound_bonus(&defender, AxialCoord::new(3, -3));
        assert_eq!(bonus, 1.0);
    }

    #[test]
    fn opposite_side_melee_adds_three() {
        let center = AxialCoord::new(0, 0);
        let mut defender = Unit::new(center, 1, 1, 3.0);
        let left = hex_grid::neighbor(center, weewar_contracts::hex_grid::Direction::L);
        let right = hex_grid::neighbor(center, weewar_contracts::hex_grid::Direction::R);
        defender.attack_history.push(AttackRecord {
            attacker_coord: left,
            is_ranged: false,
        });
        let bonus = wound_bonus(&defender, right);
        assert_eq!(bonus, 3.0);
    }

    #[test]
    fn combat_prediction_ranges_sum_to_one() {
        let engine = engine_with_one_matchup();
        let attacker = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        let defender = Unit::new(AxialCoord::new(1, 0), 2, 2, 3.0);
        let ctx = CombatContext {
            attacker: &attacker,
            defender: &defender,
            attacker_tile_type: 1,
            defender_tile_type: 1,
        };
        let dist = combat_prediction(&engine, ctx, 0.0).unwrap();
        let total: f64 = dist.ranges.iter().map(|r| r.prob).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn simulate_deals_damage_with_high_hit_probability() {
        use rand::SeedableRng;
        let engine = engine_with_one_matchup();
        let attacker = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        let defender = Unit::new(AxialCoord::new(1, 0), 2, 2, 3.0);
        let ctx = CombatContext {
            attacker: &attacker,
            defender: &defender,
            attacker_tile_type: 1,
            defender_tile_type: 1,
        };
        // hit_probability here is 0.05 * (8.0 - 2.0) + 0.5 = 0.8, comfortably
        // above the near-zero damage a per-health-unit floor would produce.
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        let damage = simulate(&engine, ctx, 0.0, &mut rng).unwrap();
        assert!(damage > 0, "expected nonzero damage at p=0.8, got {damage}");
        assert!(damage <= attacker.health_units());
    }

    #[test]
    fn expected_damage_tracks_health_units_times_p() {
        let engine = engine_with_one_matchup();
        let attacker = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        let defender = Unit::new(AxialCoord::new(1, 0), 2, 2, 3.0);
        let ctx = CombatContext {
            attacker: &attacker,
            defender: &defender,
            attacker_tile_type: 1,
            defender_tile_type: 1,
        };
        let dist = combat_prediction(&engine, ctx, 0.0).unwrap();
        // p = 0.8, health_units = 10: expected damage should sit close to
        // health_units * p = 8.0, not near zero.
        assert!(dist.expected > 6.0, "expected high expected damage, got {}", dist.expected);
    }

    #[test]
    fn repair_heals_in_multiples_of_ten_up_to_max() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        use rand::SeedableRng;
        let healed = repair_amount(5, 20.0, &mut rng);
        assert_eq!(clamp_heal(100, healed), 100);
    }
}

//! Headless scenario runner.
//!
//! Drives a built scenario tick by tick, fires the mechs' auto-fire mounts
//! at the nearest enemy, and folds the event stream into per-faction totals.

use std::collections::HashMap;
use std::io::Write;

use combat_core::prelude::*;
use std::result::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scenario::{Scenario, ScenarioError, ScenarioHandles};

/// Error type for a headless run.
#[derive(Error, Debug)]
pub enum RunError {
    /// Scenario could not be loaded or built.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    /// A command was rejected by the simulation.
    #[error(transparent)]
    Combat(#[from] CombatError),
    /// Writing the event stream failed.
    #[error("Failed to write events: {0}")]
    Io(#[from] std::io::Error),
    /// Serializing an event failed.
    #[error("Failed to serialize events: {0}")]
    Json(#[from] serde_json::Error),
}

/// Run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum ticks to simulate.
    pub ticks: u64,
    /// Milliseconds per tick.
    pub tick_ms: u32,
    /// RNG seed.
    pub seed: u64,
    /// Write every non-empty tick as a JSON line.
    pub json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 3600,
            tick_ms: 16,
            seed: 0,
            json: false,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every enemy was destroyed.
    EnemiesCleared,
    /// The terminal was destroyed.
    TerminalDestroyed,
    /// The tick limit was reached first.
    TimeLimit,
}

/// Totals for one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionTotals {
    /// Projectiles fired.
    pub shots: u32,
    /// Attacks that missed.
    pub misses: u32,
    /// HP removed from the other side.
    pub damage_dealt: u64,
    /// Opposing combatants destroyed.
    pub kills: u32,
    /// Credits earned from kills.
    pub bounty: u32,
}

/// Result of one headless run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Scenario name.
    pub scenario: String,
    /// Seed used.
    pub seed: u64,
    /// Ticks actually simulated.
    pub ticks: u64,
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Player side totals.
    pub player: FactionTotals,
    /// Enemy side totals.
    pub enemy: FactionTotals,
    /// Terminal HP at the end, if the scenario has a terminal.
    pub terminal_hp: Option<u32>,
    /// Enemies still alive at the end.
    pub enemies_remaining: usize,
}

/// Build and run `scenario`, writing JSON lines to `out` if requested.
pub fn run_scenario(
    scenario: &Scenario,
    config: &RunConfig,
    out: &mut impl Write,
) -> Result<RunSummary, RunError> {
    let (mut sim, handles) = scenario.build(config.seed)?;

    let mut owners: HashMap<EntityId, Faction> = sim
        .combatants()
        .iter()
        .map(|c| (c.id(), c.faction()))
        .collect();
    owners.extend(sim.turrets().iter().map(|t| (t.id, t.faction)));

    let mut totals = [FactionTotals::default(); 2];
    let mut outcome = RunOutcome::TimeLimit;

    while sim.tick_count() < config.ticks {
        auto_fire(&mut sim, &handles)?;
        let events = sim.tick(config.tick_ms);
        tally(&events, &owners, &mut totals);

        if config.json && !events.is_empty() {
            serde_json::to_writer(&mut *out, &events)?;
            writeln!(out)?;
        }

        if let Some(terminal) = handles.terminal {
            if sim.combatant(terminal).is_none() {
                outcome = RunOutcome::TerminalDestroyed;
                break;
            }
        }
        if enemies_remaining(&sim) == 0 {
            outcome = RunOutcome::EnemiesCleared;
            break;
        }
    }

    let summary = RunSummary {
        scenario: scenario.name.clone(),
        seed: config.seed,
        ticks: sim.tick_count(),
        outcome,
        player: totals[Faction::Player.index()],
        enemy: totals[Faction::Enemy.index()],
        terminal_hp: handles
            .terminal
            .and_then(|id| sim.combatant(id))
            .and_then(Combatant::as_simple)
            .map(|t| t.health.current)
            .or(handles.terminal.map(|_| 0)),
        enemies_remaining: enemies_remaining(&sim),
    };

    tracing::info!(
        scenario = %summary.scenario,
        ticks = summary.ticks,
        outcome = ?summary.outcome,
        player_damage = summary.player.damage_dealt,
        enemy_damage = summary.enemy.damage_dealt,
        kills = summary.player.kills,
        bounty = summary.player.bounty,
        "Run complete"
    );
    Ok(summary)
}

fn enemies_remaining(sim: &Simulation) -> usize {
    sim.combatants()
        .iter()
        .filter(|c| c.faction() == Faction::Enemy)
        .count()
}

/// Fire every auto-fire mount at the nearest live enemy.
fn auto_fire(sim: &mut Simulation, handles: &ScenarioHandles) -> Result<(), RunError> {
    for (mech, mounts) in &handles.mechs {
        let Some(origin) = sim.combatant(*mech).map(Combatant::position) else {
            continue;
        };
        let Some(aim) = sim
            .combatants()
            .iter()
            .filter(|c| c.faction() == Faction::Enemy && !c.is_destroyed())
            .map(Combatant::position)
            .min_by_key(|p| origin.distance_squared(*p))
        else {
            return Ok(());
        };

        for &mount in mounts {
            if let FireOutcome::Rejected(reason) = sim.request_fire(*mech, mount, aim)? {
                tracing::trace!(mech, ?mount, ?reason, "Auto-fire held");
            }
        }
    }
    Ok(())
}

fn tally(events: &TickEvents, owners: &HashMap<EntityId, Faction>, totals: &mut [FactionTotals; 2]) {
    let owner = |id: &EntityId| owners.get(id).map(|f| f.index());

    for event in &events.events {
        match event {
            CombatEvent::ProjectileSpawned { faction, .. } => totals[faction.index()].shots += 1,
            CombatEvent::AttackMissed { source, .. } => {
                if let Some(side) = owner(source) {
                    totals[side].misses += 1;
                }
            }
            CombatEvent::DamageApplied { source, damage, .. } => {
                if let Some(side) = owner(source) {
                    totals[side].damage_dealt += u64::from(*damage);
                }
            }
            CombatEvent::Destroyed {
                bounty,
                credited_to,
                ..
            } => {
                let side = &mut totals[credited_to.index()];
                side.kills += 1;
                side.bounty += bounty;
            }
            CombatEvent::BurstAborted { .. } | CombatEvent::ShieldStateChanged { .. } => {}
        }
    }
}

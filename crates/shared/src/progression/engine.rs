use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{
    active_position, programme_for, read_position_history, rpe_schedule, volume_preserving_reps,
    PerformancePoint, ProgressionError, RpeSchedule, WorkoutStore,
};
use crate::{model::ProgressionPolicy, types::Uuid};

/// Under/overperformance must hold for this many consecutive sessions
pub const TREND_SESSIONS: usize = 2;

/// Which rule produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Initial,
    ManualJump,
    Underperformance,
    Overperformance,
    Failure,
    RepCap,
    Normal,
}

impl Classification {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Classification::Initial => "INITIAL",
            Classification::ManualJump => "MANUAL_JUMP",
            Classification::Underperformance => "UNDERPERFORMANCE",
            Classification::Overperformance => "OVERPERFORMANCE",
            Classification::Failure => "FAILURE",
            Classification::RepCap => "REP_CAP",
            Classification::Normal => "NORMAL",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the lifter should attempt next session for one exercise. Recomputed
/// on demand, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRecommendation {
    pub exercise_id: Uuid,
    pub load: f64,
    pub reps: u32,
    pub target_effort: u8,
    pub classification: Classification,
    pub rationale: String,
}

struct Context<'a> {
    history: &'a [PerformancePoint],
    policy: &'a ProgressionPolicy,
    set_count: u32,
}

impl Context<'_> {
    /// Most recent point. Only empty for the INITIAL rule, which doesn't read
    /// it
    fn latest(&self) -> PerformancePoint {
        self.history.last().copied().unwrap_or_default()
    }

    /// Most recent point where something was actually lifted
    fn last_loaded(&self) -> Option<&PerformancePoint> {
        self.history.iter().rev().find(|p| !p.is_placeholder())
    }

    fn previous(&self) -> Option<&PerformancePoint> {
        self.history.len().checked_sub(2).map(|i| &self.history[i])
    }

    /// The last [`TREND_SESSIONS`] points, `None` if there aren't enough
    fn trend(&self) -> Option<&[PerformancePoint]> {
        self.history
            .len()
            .checked_sub(TREND_SESSIONS)
            .map(|start| &self.history[start..])
    }

    fn volume_reps(&self, previous: &PerformancePoint, new_load: f64) -> u32 {
        volume_preserving_reps(previous.load, previous.actual_reps, new_load, self.set_count)
            .unwrap_or_else(|e| {
                debug!("Falling back to default reps: {e}");
                self.policy.default_reps
            })
    }
}

struct Decision {
    load: f64,
    reps: u32,
    rationale: String,
}

struct Rule {
    classification: Classification,
    applies: fn(&Context<'_>) -> bool,
    compute: fn(&Context<'_>) -> Decision,
}

/// Evaluated in order, the first rule that applies wins. NORMAL always
/// applies so the table never falls through
static RULES: [Rule; 7] = [
    Rule { classification: Classification::Initial, applies: no_history, compute: initial },
    Rule {
        classification: Classification::ManualJump,
        applies: manual_jump_applies,
        compute: manual_jump,
    },
    Rule {
        classification: Classification::Underperformance,
        applies: underperformance_applies,
        compute: underperformance,
    },
    Rule {
        classification: Classification::Overperformance,
        applies: overperformance_applies,
        compute: overperformance,
    },
    Rule { classification: Classification::Failure, applies: failure_applies, compute: failure },
    Rule { classification: Classification::RepCap, applies: rep_cap_applies, compute: rep_cap },
    Rule { classification: Classification::Normal, applies: always, compute: normal },
];

fn no_history(ctx: &Context<'_>) -> bool {
    ctx.history.is_empty()
}

fn always(_: &Context<'_>) -> bool {
    true
}

fn initial(ctx: &Context<'_>) -> Decision {
    Decision {
        load: ctx.policy.default_load,
        reps: ctx.policy.default_reps,
        rationale: "No logged history, starting conservatively at the default load".to_owned(),
    }
}

fn manual_jump_applies(ctx: &Context<'_>) -> bool {
    let latest = ctx.latest();
    // A placeholder session has no load to compare against
    ctx.previous()
        .filter(|p| p.load > 0.0)
        .is_some_and(|p| latest.load / p.load > ctx.policy.manual_jump_ratio)
}

fn manual_jump(ctx: &Context<'_>) -> Decision {
    let latest = ctx.latest();
    Decision {
        load: latest.load,
        reps: latest.target_reps,
        rationale: format!(
            "Load was raised to {} by the lifter, keeping it and the {} rep target",
            latest.load, latest.target_reps
        ),
    }
}

fn underperformance_applies(ctx: &Context<'_>) -> bool {
    ctx.trend().is_some_and(|t| t.iter().all(|p| p.actual_reps < p.target_reps))
}

fn underperformance(ctx: &Context<'_>) -> Decision {
    let latest = ctx.latest();
    let cut = f64::from(latest.target_reps) * (1.0 - ctx.policy.underperformance_rep_cut);
    // Nudge before flooring so 10 × 0.9 doesn't land on 8.999..
    let reps = ((cut + 1e-9).floor() as u32).max(1);
    Decision {
        load: ctx.policy.decreased(latest.load),
        reps,
        rationale: format!(
            "Missed the rep target in each of the last {TREND_SESSIONS} sessions, reducing load and reps"
        ),
    }
}

fn overperformance_applies(ctx: &Context<'_>) -> bool {
    let ratio = ctx.policy.overperformance_ratio;
    ctx.trend().is_some_and(|t| {
        t.iter().all(|p| f64::from(p.actual_reps) > ratio * f64::from(p.target_reps))
    })
}

fn overperformance(ctx: &Context<'_>) -> Decision {
    let latest = ctx.latest();
    let load = ctx.policy.round_load(ctx.policy.increased(latest.load));
    Decision {
        load,
        reps: ctx.volume_reps(&latest, load),
        rationale: format!(
            "Beat the rep target by more than {:.0}% in each of the last {TREND_SESSIONS} sessions, increasing load",
            (ctx.policy.overperformance_ratio - 1.0) * 100.0
        ),
    }
}

fn failure_applies(ctx: &Context<'_>) -> bool {
    ctx.latest().actual_reps < ctx.policy.failure_floor
}

fn failure(ctx: &Context<'_>) -> Decision {
    let latest = ctx.latest();
    // An empty session carries no load, back off from the last one that did
    let load =
        ctx.last_loaded().map_or(ctx.policy.default_load, |p| ctx.policy.decreased(p.load));
    Decision {
        load,
        reps: ctx.policy.failure_floor,
        rationale: format!(
            "Only {} reps last session, below the floor of {}, reducing load",
            latest.actual_reps, ctx.policy.failure_floor
        ),
    }
}

fn rep_cap_applies(ctx: &Context<'_>) -> bool {
    ctx.latest().actual_reps >= ctx.policy.rep_ceiling
}

fn rep_cap(ctx: &Context<'_>) -> Decision {
    let latest = ctx.latest();
    let load = ctx.policy.round_load(ctx.policy.increased(latest.load));
    Decision {
        load,
        reps: ctx.volume_reps(&latest, load),
        rationale: format!(
            "Reached {} reps, at or above the ceiling of {}, increasing load",
            latest.actual_reps, ctx.policy.rep_ceiling
        ),
    }
}

fn normal(ctx: &Context<'_>) -> Decision {
    let latest = ctx.latest();
    Decision {
        load: latest.load,
        reps: (latest.target_reps + 1).min(ctx.policy.rep_ceiling),
        rationale: "On track, keeping the load and adding a rep".to_owned(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressionEngine {
    pub policy: ProgressionPolicy,
}

impl ProgressionEngine {
    pub fn new(policy: ProgressionPolicy) -> Self {
        Self { policy }
    }

    /// Runs the rule table over `history` (oldest first) for one exercise.
    /// `week_index` is 0-based into `schedule`
    pub fn recommend(
        &self,
        exercise_id: Uuid,
        history: &[PerformancePoint],
        week_index: usize,
        schedule: &RpeSchedule,
        set_count: u32,
    ) -> ProgressionRecommendation {
        let ctx = Context { history, policy: &self.policy, set_count };

        // NORMAL is unconditional so a rule is always found
        let rule = RULES
            .iter()
            .find(|rule| (rule.applies)(&ctx))
            .unwrap_or(&RULES[RULES.len() - 1]);
        let decision = (rule.compute)(&ctx);

        let recommendation = ProgressionRecommendation {
            exercise_id,
            load: self.policy.round_load(decision.load),
            reps: decision.reps,
            target_effort: schedule.target_for_week(week_index),
            classification: rule.classification,
            rationale: format!("{}: {}", rule.classification, decision.rationale),
        };
        debug!(
            %exercise_id,
            classification = %recommendation.classification,
            load = recommendation.load,
            reps = recommendation.reps,
            "Recommendation"
        );

        recommendation
    }
}

/// One recommendation per requested exercise, in request order. An exercise
/// whose history can't be read falls back to INITIAL without affecting the
/// others. Errors only when the lifter's programme can't be resolved
#[instrument(skip(store))]
pub fn recommend_batch<S: WorkoutStore>(
    store: &S,
    lifter_id: &Uuid,
    exercise_ids: &[Uuid],
    set_count: u32,
    history_window: usize,
) -> Result<Vec<ProgressionRecommendation>, ProgressionError> {
    let position = active_position(store, lifter_id)?;
    let programme = programme_for(store, &position)?;
    let schedule = rpe_schedule(programme.duration_weeks)?;
    let engine = ProgressionEngine::new(programme.policy());

    let recommendations = exercise_ids
        .iter()
        .map(|exercise_id| {
            let history =
                match read_position_history(store, &position, exercise_id, history_window) {
                    Ok(history) => history,
                    Err(e) => {
                        warn!(%exercise_id, "History unavailable, falling back to initial: {e}");
                        Vec::new()
                    }
                };
            engine.recommend(*exercise_id, &history, position.week_index(), &schedule, set_count)
        })
        .collect();

    Ok(recommendations)
}

//! Weekly tick: seven scheduled days over the whole roster.
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::WeekConfig;
use crate::constants::{
    BENCH_DAILY_MENTAL, BENCH_DAILY_STAMINA, CONFESSION_AFFINITY, CONTRACT_WARNING_WEEKS,
    DAY_LABELS, DAYS_PER_WEEK, FAILURE_EARNINGS_FACTOR, FAILURE_GAIN_FACTOR,
    FAILURE_MENTAL_PENALTY, FAILURE_REPUTATION_PENALTY, FAN_EARNINGS_PER_FAN,
    HOSPITAL_DAILY_MENTAL, HOSPITAL_DAILY_STAMINA, HOSPITAL_RELEASE_STAMINA,
    STREAM_REPUTATION_PER_DAY, STREET_REPUTATION_PER_DAY, STYLIST_SENTIMENT_GAIN,
};
use crate::flavor::{FlavorCategory, FlavorText, render, render_random};
use crate::modifiers::{Modifiers, StaffBonuses};
use crate::numbers::{apply_signed, clamp_pct, floor_f64_to_i64, u64_to_f64};
use crate::performer::{Performer, Status};
use crate::relationship::{
    covert_partners, initialize_if_absent, pair_mut, resolve_interaction,
    try_expose_covert, try_promote_to_covert,
};
use crate::scandal::{
    apply_random_event, apply_scandal, roll_random_event, roll_scandal, roll_success,
};
use crate::schedule::{Activity, Schedule, TrainingTarget};

/// Log lines recorded for one day.
pub type DayEntries = SmallVec<[String; 8]>;

/// Host inputs for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeekContext {
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Members of the currently active group.
    #[serde(default)]
    pub active_members: BTreeSet<String>,
    /// Running reputation, read for multipliers only.
    #[serde(default)]
    pub reputation: f64,
    #[serde(default)]
    pub config: WeekConfig,
}

/// One day of the tick's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLog {
    pub day_index: usize,
    pub label: String,
    pub activity: Activity,
    #[serde(default)]
    pub entries: DayEntries,
}

/// Everything a tick hands back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekOutcome {
    pub roster: Vec<Performer>,
    pub days: Vec<DayLog>,
    /// Chronological log, each entry prefixed with its day label.
    pub log: Vec<String>,
    /// Net fund change including upkeep.
    pub fund_delta: i64,
    /// Unclamped reputation change; the host clamps against its running value.
    pub reputation_delta: f64,
    /// HQ maintenance plus staff salaries deducted this week.
    pub upkeep: i64,
}

/// Run one weekly tick over `roster`.
///
/// The roster is taken by value and returned updated inside the outcome.
/// Business-rule guards (active group selected, funds) are the caller's job;
/// this function always completes.
///
/// # Panics
///
/// Panics if any performer enters with a bounded field outside its range or
/// if two performers share an id. Both indicate upstream corruption.
pub fn run_week<F, R>(
    mut roster: Vec<Performer>,
    schedule: &Schedule,
    ctx: &WeekContext,
    flavor: &F,
    rng: &mut R,
) -> WeekOutcome
where
    F: FlavorText + ?Sized,
    R: Rng + ?Sized,
{
    assert_invariants(&roster);

    let mut config = ctx.config;
    config.sanitize();
    let upkeep = ctx.modifiers.weekly_upkeep();
    let index: BTreeMap<String, usize> = roster
        .iter()
        .enumerate()
        .map(|(idx, performer)| (performer.id.clone(), idx))
        .collect();
    introduce_active_members(&mut roster, &ctx.active_members, &index);

    let mut tick = Tick {
        ctx,
        config,
        bonuses: ctx.modifiers.staff.bonuses(),
        reputation_multiplier: 1.0 + clamp_pct(ctx.reputation) / 100.0,
        flavor,
        index,
        fund_delta: -upkeep,
        reputation_delta: 0.0,
    };

    let mut days = Vec::with_capacity(DAYS_PER_WEEK);
    let mut log = Vec::new();
    for (day, label) in DAY_LABELS.iter().enumerate() {
        let activity = schedule.day(day);
        match activity {
            Activity::StreetPerformance => tick.reputation_delta += STREET_REPUTATION_PER_DAY,
            Activity::LiveStream => tick.reputation_delta += STREAM_REPUTATION_PER_DAY,
            _ => {}
        }
        let efficiency = ctx
            .modifiers
            .facilities
            .efficiency(activity.effect().facility);
        let mut entries = DayEntries::new();
        for idx in 0..roster.len() {
            tick.performer_day(&mut roster, idx, day, activity, efficiency, &mut entries, rng);
        }
        log.extend(entries.iter().map(|entry| format!("[{label}] {entry}")));
        days.push(DayLog {
            day_index: day,
            label: (*label).to_string(),
            activity,
            entries,
        });
    }

    let summary = format!("[agency] weekly staff salaries and HQ upkeep paid: {upkeep}");
    if let (Some(last), Some(label)) = (days.last_mut(), DAY_LABELS.last()) {
        log.push(format!("[{label}] {summary}"));
        last.entries.push(summary);
    }

    log::info!(
        "week resolved: funds {:+}, reputation {:+.1}, {} log entries",
        tick.fund_delta,
        tick.reputation_delta,
        log.len()
    );
    WeekOutcome {
        roster,
        days,
        log,
        fund_delta: tick.fund_delta,
        reputation_delta: tick.reputation_delta,
        upkeep,
    }
}

/// Panic if the roster violates a clamp invariant.
///
/// # Panics
///
/// Panics on the first out-of-range field or duplicate id.
pub fn assert_invariants(roster: &[Performer]) {
    let mut seen = BTreeSet::new();
    for performer in roster {
        assert!(
            seen.insert(performer.id.as_str()),
            "duplicate performer id `{}` in roster",
            performer.id
        );
        if let Some(violation) = performer.invariant_violation() {
            panic!("roster invariant violated: {violation}");
        }
    }
}

/// First contact: every pair of active-group members gets a default edge.
fn introduce_active_members(
    roster: &mut [Performer],
    active: &BTreeSet<String>,
    index: &BTreeMap<String, usize>,
) {
    let members: Vec<usize> = active
        .iter()
        .filter_map(|id| index.get(id).copied())
        .filter(|idx| !roster[*idx].status.is_terminal())
        .collect();
    for (pos, &a) in members.iter().enumerate() {
        for &b in &members[pos + 1..] {
            if let Some((left, right)) = pair_mut(roster, a, b) {
                initialize_if_absent(left, right);
            }
        }
    }
}

struct Tick<'a, F: ?Sized> {
    ctx: &'a WeekContext,
    config: WeekConfig,
    bonuses: StaffBonuses,
    reputation_multiplier: f64,
    flavor: &'a F,
    index: BTreeMap<String, usize>,
    fund_delta: i64,
    reputation_delta: f64,
}

impl<F> Tick<'_, F>
where
    F: FlavorText + ?Sized,
{
    #[allow(clippy::too_many_arguments)]
    fn performer_day<R>(
        &mut self,
        roster: &mut [Performer],
        idx: usize,
        day: usize,
        activity: Activity,
        efficiency: f64,
        entries: &mut DayEntries,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        let performer = &mut roster[idx];
        if performer.status.is_terminal() {
            return;
        }
        if day == 0 && count_down_contract(performer, entries) {
            return;
        }
        if performer.status == Status::Hospitalized {
            let in_active = self.ctx.active_members.contains(&performer.id);
            recover_in_hospital(performer, in_active, entries);
            return;
        }
        if !self.ctx.active_members.contains(&performer.id) {
            performer.stamina = clamp_pct(performer.stamina + BENCH_DAILY_STAMINA);
            performer.mental = clamp_pct(performer.mental + BENCH_DAILY_MENTAL);
            return;
        }
        if performer.is_active() {
            self.train(roster, idx, activity, efficiency, entries, rng);
        }
    }

    fn train<R>(
        &mut self,
        roster: &mut [Performer],
        idx: usize,
        activity: Activity,
        efficiency: f64,
        entries: &mut DayEntries,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        let effect = activity.effect();
        let performer = &mut roster[idx];
        let entered_stamina = performer.stamina;
        let success = roll_success(performer, activity, rng);

        if effect.price > 0 {
            let base = u64_to_f64(effect.price.unsigned_abs())
                + u64_to_f64(performer.fans) * FAN_EARNINGS_PER_FAN;
            let mut earned = (base * self.reputation_multiplier * self.bonuses.fund_gain).floor();
            if !success {
                earned = (earned * FAILURE_EARNINGS_FACTOR).floor();
            }
            self.fund_delta = self.fund_delta.saturating_add(floor_f64_to_i64(earned));
        } else if effect.price < 0 {
            self.fund_delta = self.fund_delta.saturating_add(effect.price);
        }

        let remark = render_random(
            self.flavor,
            FlavorCategory::Routine(performer.archetype),
            &[performer.name.as_str()],
            rng,
        );
        let marker = if activity.is_rest() {
            "rest"
        } else if success {
            "success"
        } else {
            "fail"
        };
        entries.push(format!("{}: [{marker}] {remark}", performer.name));

        let gain_factor = if success { 1.0 } else { FAILURE_GAIN_FACTOR };
        for &(target, gain) in effect.gains {
            let scaled = gain * efficiency * gain_factor;
            match target {
                TrainingTarget::Skill(skill) => {
                    performer
                        .skills
                        .add(skill, scaled * self.bonuses.skill_gain(skill));
                }
                TrainingTarget::Endurance => {
                    performer.stamina = clamp_pct(performer.stamina + scaled);
                }
            }
        }

        let mut sentiment = 0.0;
        if self.bonuses.has_stylist && rng.gen_bool(self.config.stylist_sentiment_chance) {
            sentiment += STYLIST_SENTIMENT_GAIN;
        }

        let mut fans = 0.0;
        if rng.gen_bool(self.config.interaction_chance) {
            fans += self.interact(roster, idx, entries, rng);
        }
        self.confess(roster, idx, entries, rng);
        self.expose(roster, idx, entries, rng);

        let performer = &mut roster[idx];
        if success {
            if !activity.is_rest()
                && let Some(kind) = roll_random_event(&self.config, rng)
            {
                let (event_fans, event_funds) =
                    apply_random_event(performer, kind, self.reputation_multiplier, rng);
                fans += event_fans;
                self.fund_delta = self.fund_delta.saturating_add(event_funds);
                let line = render_random(
                    self.flavor,
                    FlavorCategory::RandomEvent(kind),
                    &[performer.name.as_str()],
                    rng,
                );
                entries.push(format!("[event] {line}"));
            }
            performer.stamina =
                clamp_pct(performer.stamina + self.bonuses.stamina_delta(effect.stamina));
            performer.mental = clamp_pct(performer.mental + effect.mental);
            performer.scandal_risk = (performer.scandal_risk + effect.risk).max(0.0);
        } else {
            self.reputation_delta -= FAILURE_REPUTATION_PENALTY;
            performer.stamina =
                clamp_pct(performer.stamina + self.bonuses.stamina_delta(effect.stamina));
            performer.mental = clamp_pct(performer.mental - FAILURE_MENTAL_PENALTY);
            if entered_stamina <= 0.0 && rng.gen_bool(self.config.hospitalization_chance) {
                performer.status = Status::Hospitalized;
                log::debug!("{} hospitalized from exhaustion", performer.id);
                entries.push(format!(
                    "[health] {} collapsed from exhaustion and was hospitalized",
                    performer.name
                ));
            }
        }

        let fan_delta = floor_f64_to_i64(self.bonuses.fan_delta(fans));
        performer.fans = apply_signed(performer.fans, fan_delta);
        performer.sentiment = clamp_pct(performer.sentiment + sentiment);

        if performer.is_active()
            && let Some(scandal) = roll_scandal(performer, &self.config, rng)
        {
            self.reputation_delta += apply_scandal(performer, scandal);
            let line = render_random(
                self.flavor,
                FlavorCategory::Scandal(scandal.severity),
                &[performer.name.as_str()],
                rng,
            );
            entries.push(format!("[scandal:{}] {line}", scandal.severity.as_str()));
            if scandal.removal {
                log::debug!("{} removed after a critical scandal", performer.id);
                entries.push(format!(
                    "[scandal] {} has been removed from the roster",
                    performer.name
                ));
            }
        }
        performer.clamp();
    }

    /// Returns the initiator's fan delta.
    fn interact<R>(
        &mut self,
        roster: &mut [Performer],
        idx: usize,
        entries: &mut DayEntries,
        rng: &mut R,
    ) -> f64
    where
        R: Rng + ?Sized,
    {
        let relations = roster[idx].relationships.len();
        if relations == 0 {
            return 0.0;
        }
        let pick = rng.gen_range(0..relations);
        let Some(target_id) = roster[idx].relationships.keys().nth(pick).cloned() else {
            return 0.0;
        };
        let Some(&target_idx) = self.index.get(&target_id) else {
            return 0.0;
        };
        let Some((actor, target)) = pair_mut(roster, idx, target_idx) else {
            return 0.0;
        };
        let Some(outcome) = resolve_interaction(actor, target, self.reputation_multiplier, rng)
        else {
            return 0.0;
        };
        self.reputation_delta += outcome.reputation;
        self.fund_delta = self.fund_delta.saturating_add(outcome.funds);
        let line = render(
            self.flavor,
            FlavorCategory::Relationship(outcome.tier),
            outcome.event_index,
            &[actor.name.as_str(), target.name.as_str()],
        );
        entries.push(format!("[relationship] {line}"));
        outcome.fans
    }

    fn confess<R>(
        &mut self,
        roster: &mut [Performer],
        idx: usize,
        entries: &mut DayEntries,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        let candidates: Vec<usize> = roster[idx]
            .relationships
            .iter()
            .filter(|(_, affinity)| **affinity >= CONFESSION_AFFINITY)
            .filter_map(|(id, _)| self.index.get(id).copied())
            .collect();
        for target_idx in candidates {
            let Some((actor, target)) = pair_mut(roster, idx, target_idx) else {
                continue;
            };
            if try_promote_to_covert(actor, target, self.config.confession_chance, rng) {
                let line = render(
                    self.flavor,
                    FlavorCategory::Confession,
                    0,
                    &[actor.name.as_str(), target.name.as_str()],
                );
                entries.push(format!("[relationship] {line}"));
                break;
            }
        }
    }

    fn expose<R>(
        &mut self,
        roster: &mut [Performer],
        idx: usize,
        entries: &mut DayEntries,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        let Some(partner_idx) = covert_partners(&roster[idx])
            .filter_map(|id| self.index.get(id).copied())
            .find(|&other| !roster[other].status.is_terminal())
        else {
            return;
        };
        let Some((actor, partner)) = pair_mut(roster, idx, partner_idx) else {
            return;
        };
        if let Some(reputation) =
            try_expose_covert(actor, partner, self.config.exposure_chance, rng)
        {
            self.reputation_delta += reputation;
            let line = render(
                self.flavor,
                FlavorCategory::Exposure,
                0,
                &[actor.name.as_str(), partner.name.as_str()],
            );
            entries.push(format!("[scandal] {line}"));
        }
    }
}

/// Day-zero contract bookkeeping. Returns true when the contract just expired.
fn count_down_contract(performer: &mut Performer, entries: &mut DayEntries) -> bool {
    performer.contract_weeks = performer.contract_weeks.saturating_sub(1);
    if performer.contract_weeks == 0 {
        performer.status = Status::ContractExpired;
        log::debug!("{} contract expired", performer.id);
        entries.push(format!("[contract] {}'s contract has expired", performer.name));
        return true;
    }
    if performer.contract_weeks == CONTRACT_WARNING_WEEKS {
        entries.push(format!(
            "[contract] {}'s contract expires in {CONTRACT_WARNING_WEEKS} weeks",
            performer.name
        ));
    }
    false
}

fn recover_in_hospital(performer: &mut Performer, in_active: bool, entries: &mut DayEntries) {
    performer.stamina = clamp_pct(performer.stamina + HOSPITAL_DAILY_STAMINA);
    performer.mental = clamp_pct(performer.mental + HOSPITAL_DAILY_MENTAL);
    if performer.stamina >= HOSPITAL_RELEASE_STAMINA {
        performer.status = Status::Active;
        log::debug!("{} discharged", performer.id);
        entries.push(format!(
            "[health] {} recovered and was discharged",
            performer.name
        ));
    } else if in_active {
        entries.push(format!(
            "[health] {} is still hospitalized (stamina {:.0})",
            performer.name, performer.stamina
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::flavor::KeyFlavor;
    use crate::performer::SpecialRelation;
    use crate::performer::fixtures::performer;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn context(ids: &[&str]) -> WeekContext {
        WeekContext {
            active_members: ids.iter().map(|id| (*id).to_string()).collect(),
            reputation: 10.0,
            ..WeekContext::default()
        }
    }

    #[test]
    fn produces_seven_days_and_a_summary() {
        let mut rng = SmallRng::seed_from_u64(1);
        let roster = vec![performer("a", Archetype::Intj)];
        let outcome = run_week(roster, &Schedule::default(), &context(&["a"]), &KeyFlavor, &mut rng);
        assert_eq!(outcome.days.len(), DAYS_PER_WEEK);
        let last = outcome.days.last().unwrap();
        assert!(last.entries.last().unwrap().contains("upkeep"));
        assert!(outcome.log.last().unwrap().starts_with("[Sun]"));
        assert_eq!(outcome.upkeep, 10_000);
    }

    #[test]
    fn bench_members_only_recover() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut p = performer("bench", Archetype::Isfp);
        p.stamina = 40.0;
        p.mental = 40.0;
        let skills = p.skills;
        let outcome = run_week(vec![p], &Schedule::default(), &context(&[]), &KeyFlavor, &mut rng);
        let p = &outcome.roster[0];
        assert!((p.stamina - 75.0).abs() < 1e-9);
        assert!((p.mental - 54.0).abs() < 1e-9);
        assert_eq!(p.skills, skills);
        assert_eq!(outcome.fund_delta, -10_000);
    }

    #[test]
    fn hospital_discharges_at_threshold() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut p = performer("h", Archetype::Estj);
        p.status = Status::Hospitalized;
        p.stamina = 10.0;
        let outcome = run_week(
            vec![p],
            &Schedule::uniform(Activity::Rest),
            &context(&["h"]),
            &KeyFlavor,
            &mut rng,
        );
        assert!(
            outcome
                .log
                .iter()
                .any(|line| line.contains("discharged"))
        );
        assert_eq!(outcome.roster[0].status, Status::Active);
    }

    #[test]
    fn contract_warning_fires_at_four_weeks() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut p = performer("c", Archetype::Enfj);
        p.contract_weeks = 5;
        let outcome = run_week(vec![p], &Schedule::uniform(Activity::Rest), &context(&["c"]), &KeyFlavor, &mut rng);
        assert_eq!(outcome.roster[0].contract_weeks, 4);
        assert!(outcome.days[0].entries.iter().any(|e| e.contains("expires in 4 weeks")));
    }

    #[test]
    fn active_members_are_introduced() {
        let mut rng = SmallRng::seed_from_u64(5);
        let roster = vec![
            performer("a", Archetype::Intj),
            performer("b", Archetype::Enfp),
            performer("c", Archetype::Istp),
        ];
        let outcome = run_week(
            roster,
            &Schedule::uniform(Activity::Rest),
            &context(&["a", "b"]),
            &KeyFlavor,
            &mut rng,
        );
        assert!(outcome.roster[0].affinity("b").is_some());
        assert!(outcome.roster[1].affinity("a").is_some());
        assert!(outcome.roster[2].relationships.is_empty());
    }

    #[test]
    fn exposure_skips_removed_partners() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut a = performer("a", Archetype::Infj);
        let mut b = performer("b", Archetype::Esfp);
        let mut c = performer("c", Archetype::Istp);
        for partner in ["b", "c"] {
            a.special_relations
                .insert(partner.to_string(), SpecialRelation::Covert);
        }
        b.special_relations.insert("a".into(), SpecialRelation::Covert);
        c.special_relations.insert("a".into(), SpecialRelation::Covert);
        b.status = Status::Removed;
        b.fans = 1_000;
        c.fans = 1_000;
        let removed = b.clone();
        let mut ctx = context(&["a"]);
        ctx.config.interaction_chance = 0.0;
        ctx.config.exposure_chance = 1.0;
        let outcome = run_week(
            vec![a, b, c],
            &Schedule::uniform(Activity::Rest),
            &ctx,
            &KeyFlavor,
            &mut rng,
        );
        assert_eq!(outcome.roster[1], removed);
        assert_eq!(outcome.roster[0].special_with("b"), Some(SpecialRelation::Covert));
        assert_eq!(outcome.roster[0].special_with("c"), Some(SpecialRelation::Public));
        assert_eq!(outcome.roster[2].fans, 800);
    }

    #[test]
    #[should_panic(expected = "roster invariant violated")]
    fn corrupted_input_panics() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut p = performer("x", Archetype::Intj);
        p.mental = 140.0;
        let _ = run_week(vec![p], &Schedule::default(), &context(&["x"]), &KeyFlavor, &mut rng);
    }

    #[test]
    fn psychotherapy_is_a_flat_cost() {
        let mut rng = SmallRng::seed_from_u64(7);
        let roster = vec![performer("a", Archetype::Infj)];
        let mut ctx = context(&["a"]);
        ctx.config.random_event_chance = 0.0;
        let outcome = run_week(
            roster,
            &Schedule::uniform(Activity::Psychotherapy),
            &ctx,
            &KeyFlavor,
            &mut rng,
        );
        assert_eq!(outcome.fund_delta, -10_000 - 7 * 30_000);
    }
}

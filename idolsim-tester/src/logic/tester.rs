use anyhow::{Context, Result, bail, ensure};
use colored::Colorize;
use idolsim_game::{
    Agency, Archetype, FlavorCatalog, Gender, Notice, PerformerProfile, Position, RngBundle,
    SpecialRelation, Status, WeekConfig, chart_run,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::logic::scenarios::{Expectation, SeasonPlan, TestScenario};

const STAGE_NAMES: [&str; 8] = [
    "Ara", "Bora", "Chae", "Dami", "Eun", "Haru", "Jin", "Seo",
];
const RENEWAL_WINDOW_WEEKS: u32 = 12;
const POSITIONS: [Position; 5] = [
    Position::Leader,
    Position::MainVocal,
    Position::MainDancer,
    Position::MainRapper,
    Position::Visual,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
    /// Summary of the last successful iteration.
    pub last_summary: Option<SeasonSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub weeks_played: u32,
    pub final_funds: i64,
    pub final_reputation: f64,
    pub best_rank: Option<u32>,
    pub albums: usize,
    pub renewals: usize,
    pub removals: usize,
    pub expirations: usize,
}

type RosterSnapshot = BTreeMap<String, (Status, BTreeMap<String, SpecialRelation>)>;

pub struct LogicTester {
    verbose: bool,
    config: WeekConfig,
}

impl LogicTester {
    pub const fn new(config: WeekConfig, verbose: bool) -> Self {
        Self { verbose, config }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (weeks: {} seed: {seed})",
                    scenario.name.bright_white(),
                    scenario.plan.weeks
                );
            }
            results.push(self.run_single_scenario(scenario, seed, iterations));
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let mut last_summary = None;

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            match play_season(&scenario.plan, self.config, iteration_seed) {
                Ok(summary) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) funds:{} reputation:{:.1} albums:{}",
                            i + 1,
                            iterations,
                            summary.final_funds,
                            summary.final_reputation,
                            summary.albums
                        );
                    }
                    last_summary = Some(summary);
                }
                Err(err) => {
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            format!("{err:#}").red()
                        );
                    }
                    failures.push(format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1));
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
            last_summary,
        }
    }
}

fn casting_profile<R: Rng + ?Sized>(slot: usize, rng: &mut R) -> PerformerProfile {
    PerformerProfile {
        name: STAGE_NAMES[slot % STAGE_NAMES.len()].to_string(),
        gender: if rng.gen_bool(0.5) {
            Gender::Female
        } else {
            Gender::Male
        },
        age: rng.gen_range(16..=22),
        archetype: Archetype::ALL[rng.gen_range(0..Archetype::ALL.len())],
        position: POSITIONS[slot % POSITIONS.len()],
        visual_token: format!("#{:06x}", rng.gen_range(0..0x0100_0000_u32)),
    }
}

fn snapshot(agency: &Agency) -> RosterSnapshot {
    agency
        .roster()
        .iter()
        .map(|performer| {
            (
                performer.id.clone(),
                (performer.status, performer.special_relations.clone()),
            )
        })
        .collect()
}

/// Roster-wide invariants checked after every simulated week.
fn check_invariants(agency: &Agency, previous: &RosterSnapshot) -> Result<()> {
    for performer in agency.roster() {
        if let Some(violation) = performer.invariant_violation() {
            bail!("clamp invariant broken: {violation}");
        }
        let Some((status_before, relations_before)) = previous.get(&performer.id) else {
            continue;
        };
        ensure!(
            !status_before.is_terminal() || performer.status == *status_before,
            "{} left terminal status {status_before:?} for {:?}",
            performer.id,
            performer.status
        );
        for (partner, before) in relations_before {
            let now = performer.special_relations.get(partner);
            ensure!(
                now.is_some_and(|state| state >= before),
                "{} -> {partner} special relation regressed from {before:?} to {now:?}",
                performer.id
            );
        }
    }
    Ok(())
}

/// Play one seeded season, returning its summary or the first broken check.
pub fn play_season(plan: &SeasonPlan, config: WeekConfig, seed: u64) -> Result<SeasonSummary> {
    let rngs = RngBundle::from_user_seed(seed);
    let flavor = FlavorCatalog::default_catalog();
    let mut agency = Agency::new(config);
    let mut summary = SeasonSummary::default();

    let mut member_ids = Vec::with_capacity(plan.members);
    for slot in 0..plan.members {
        let profile = casting_profile(slot, &mut *rngs.casting());
        let id = agency
            .recruit(plan.casting, profile, &mut *rngs.casting())
            .with_context(|| format!("recruiting member {}", slot + 1))?;
        member_ids.push(id);
    }
    let members: Vec<&str> = member_ids.iter().map(String::as_str).collect();
    let group = agency.form_group("Tester Unit", &members)?;
    agency.select_group(&group)?;
    agency.set_schedule(plan.schedule);

    let mut previous = snapshot(&agency);
    for _ in 0..plan.weeks {
        if let Some(event) = agency.pending_event() {
            let join = plan.attend_events && agency.funds() >= event.costs.funds;
            agency
                .decide_special_event(join)
                .with_context(|| format!("deciding on {}", event.name))?;
        }

        if let Some(release) = &plan.release
            && agency.week() >= release.first_week
        {
            let title = format!("Week {} Single", agency.week());
            let proposal = agency.propose_release(
                &title,
                release.concept,
                release.price,
                &mut *rngs.release(),
            );
            if let Ok(album) = proposal {
                let run = chart_run(&album, &mut *rngs.release());
                log::debug!("{title} chart run: {run:?}");
                agency.settle_release().context("settling release")?;
            }
        }

        let report = agency
            .advance_week(flavor, &mut *rngs.week())
            .with_context(|| format!("advancing week {}", agency.week()))?;
        summary.weeks_played += 1;
        summary.best_rank = match (summary.best_rank, report.player_rank) {
            (Some(best), Some(rank)) => Some(best.min(rank)),
            (best, rank) => best.or(rank),
        };

        check_invariants(&agency, &previous)
            .with_context(|| format!("after week {}", report.week))?;
        if plan.expectations.contains(&Expectation::UpkeepOnly) {
            ensure!(
                report.fund_delta == -report.upkeep,
                "week {}: fund delta {} but upkeep {}",
                report.week,
                report.fund_delta,
                report.upkeep
            );
        }

        if report
            .notices
            .iter()
            .any(|notice| matches!(notice, Notice::ContractExpiring { .. }))
        {
            summary.renewals += renew_expiring(&mut agency);
        }
        previous = snapshot(&agency);
    }

    if plan.expectations.contains(&Expectation::CompletesSeason) {
        ensure!(
            summary.weeks_played == plan.weeks,
            "{}: only {} of {} weeks played",
            Expectation::CompletesSeason.label(),
            summary.weeks_played,
            plan.weeks
        );
    }
    if let Some(release) = &plan.release
        && plan.weeks >= release.first_week
        && plan.expectations.contains(&Expectation::ReleasesAlbum)
    {
        ensure!(
            !agency.albums().is_empty(),
            "{}: no album settled in {} weeks",
            Expectation::ReleasesAlbum.label(),
            plan.weeks
        );
    }

    summary.final_funds = agency.funds();
    summary.final_reputation = agency.reputation();
    summary.albums = agency.albums().len();
    summary.removals = count_status(&agency, Status::Removed);
    summary.expirations = count_status(&agency, Status::ContractExpired);
    Ok(summary)
}

/// Renew every Active contract inside the notice window that funds allow.
fn renew_expiring(agency: &mut Agency) -> usize {
    let candidates: Vec<String> = agency
        .roster()
        .iter()
        .filter(|performer| {
            performer.status == Status::Active && performer.contract_weeks <= RENEWAL_WINDOW_WEEKS
        })
        .map(|performer| performer.id.clone())
        .collect();
    candidates
        .iter()
        .filter(|id| agency.renew_contract(id).is_ok())
        .count()
}

fn count_status(agency: &Agency, status: Status) -> usize {
    agency
        .roster()
        .iter()
        .filter(|performer| performer.status == status)
        .count()
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scenarios::get_scenario;

    #[test]
    fn rest_scenario_passes_for_fixed_seeds() {
        let scenario = get_scenario("rest", None).unwrap();
        let tester = LogicTester::new(WeekConfig::default(), false);
        let results = tester.run_scenario(&scenario, &[1, 2], 2);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
        assert!(results[0].last_summary.is_some());
    }

    #[test]
    fn seasons_replay_identically() {
        let scenario = get_scenario("smoke", None).unwrap();
        let first = play_season(&scenario.plan, WeekConfig::default(), 99).unwrap();
        let second = play_season(&scenario.plan, WeekConfig::default(), 99).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.weeks_played, 4);
    }

    #[test]
    fn regressed_relation_is_reported() {
        let scenario = get_scenario("smoke", Some(1)).unwrap();
        let mut agency = Agency::default();
        let rngs = RngBundle::from_user_seed(5);
        let profile = casting_profile(0, &mut *rngs.casting());
        agency
            .recruit(scenario.plan.casting, profile, &mut *rngs.casting())
            .unwrap();
        let mut previous = snapshot(&agency);
        let id = agency.roster()[0].id.clone();
        previous.get_mut(&id).unwrap().1.insert("ghost".into(), SpecialRelation::Covert);
        assert!(check_invariants(&agency, &previous).is_err());
    }
}

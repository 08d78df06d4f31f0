use idolsim_game::{
    Activity, Archetype, Gender, KeyFlavor, Performer, PerformerProfile, Position, Schedule,
    Skills, SpecialRelation, Status, WeekConfig, WeekContext, assert_invariants, run_week,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn trainee(id: &str, archetype: Archetype) -> Performer {
    Performer::new(
        id,
        PerformerProfile {
            name: format!("Trainee {id}"),
            gender: Gender::Female,
            age: 20,
            archetype,
            position: Position::Visual,
            visual_token: String::new(),
        },
        Skills {
            vocal: 50.0,
            dance: 50.0,
            rap: 30.0,
            visual: 60.0,
            leadership: 40.0,
        },
    )
}

fn roster() -> Vec<Performer> {
    vec![
        trainee("a", Archetype::Intj),
        trainee("b", Archetype::Esfj),
        trainee("c", Archetype::Enfp),
        trainee("d", Archetype::Istp),
    ]
}

fn context(roster: &[Performer]) -> WeekContext {
    WeekContext {
        active_members: roster.iter().map(|p| p.id.clone()).collect(),
        reputation: 40.0,
        ..WeekContext::default()
    }
}

fn random_schedule(rng: &mut SmallRng) -> Schedule {
    let mut schedule = Schedule::default();
    for day in 0..7 {
        schedule.set_day(day, Activity::ALL[rng.gen_range(0..Activity::ALL.len())]);
    }
    schedule
}

#[test]
fn stats_stay_clamped_across_seeded_seasons() {
    for seed in 0..40_u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut performers = roster();
        let mut ctx = context(&performers);
        // Hot config so every subsystem fires.
        ctx.config = WeekConfig {
            interaction_chance: 0.9,
            confession_chance: 0.5,
            exposure_chance: 0.3,
            random_event_chance: 0.5,
            ..WeekConfig::default()
        };
        for _ in 0..12 {
            let schedule = random_schedule(&mut rng);
            let outcome = run_week(performers, &schedule, &ctx, &KeyFlavor, &mut rng);
            performers = outcome.roster;
            for performer in &performers {
                assert!(
                    performer.invariant_violation().is_none(),
                    "seed {seed}: {:?}",
                    performer.invariant_violation()
                );
            }
            assert_invariants(&performers);
        }
    }
}

#[test]
fn terminal_performers_are_absorbing() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut performers = roster();
    performers[0].status = Status::Removed;
    performers[1].status = Status::ContractExpired;
    performers[1].contract_weeks = 0;
    let ctx = context(&performers);
    for _ in 0..10 {
        let schedule = random_schedule(&mut rng);
        let before_removed = performers[0].clone();
        let outcome = run_week(performers, &schedule, &ctx, &KeyFlavor, &mut rng);
        performers = outcome.roster;
        assert_eq!(performers[0].status, Status::Removed);
        assert_eq!(performers[1].status, Status::ContractExpired);
        assert_eq!(performers[0].skills, before_removed.skills);
        assert!((performers[0].stamina - before_removed.stamina).abs() < f64::EPSILON);
    }
}

#[test]
fn final_contract_week_expires() {
    let mut rng = SmallRng::seed_from_u64(8);
    let mut performers = roster();
    performers[2].contract_weeks = 1;
    let ctx = context(&performers);
    let outcome = run_week(
        performers,
        &Schedule::uniform(Activity::VocalTraining),
        &ctx,
        &KeyFlavor,
        &mut rng,
    );
    let expired = &outcome.roster[2];
    assert_eq!(expired.status, Status::ContractExpired);
    assert_eq!(expired.contract_weeks, 0);
    assert!(
        outcome
            .log
            .iter()
            .any(|line| line.contains("[contract]") && line.contains("Trainee c"))
    );
}

#[test]
fn special_relations_never_regress() {
    for seed in 0..30_u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut performers = roster();
        for performer in &mut performers {
            for other in ["a", "b", "c", "d"] {
                if other != performer.id {
                    performer.relationships.insert(other.to_string(), 95.0);
                }
            }
        }
        let mut ctx = context(&performers);
        ctx.config.confession_chance = 0.6;
        ctx.config.exposure_chance = 0.2;
        let mut seen: Vec<(String, String, SpecialRelation)> = Vec::new();
        for _ in 0..8 {
            let schedule = random_schedule(&mut rng);
            performers = run_week(performers, &schedule, &ctx, &KeyFlavor, &mut rng).roster;
            for (owner, partner, before) in &seen {
                let now = performers
                    .iter()
                    .find(|p| &p.id == owner)
                    .and_then(|p| p.special_with(partner));
                assert!(
                    now.is_some_and(|state| state >= *before),
                    "seed {seed}: {owner}->{partner} regressed from {before:?} to {now:?}"
                );
            }
            seen = performers
                .iter()
                .flat_map(|p| {
                    p.special_relations
                        .iter()
                        .map(|(partner, state)| (p.id.clone(), partner.clone(), *state))
                })
                .collect();
        }
    }
}

#[test]
#[should_panic(expected = "duplicate")]
fn duplicate_ids_are_rejected() {
    let performers = vec![trainee("a", Archetype::Intj), trainee("a", Archetype::Entp)];
    assert_invariants(&performers);
}

//! Pairwise affinity and the special relationship track.
//!
//! Affinity is stored per direction on each [`Performer`] but every event
//! moves both directions in lockstep, so the edge behaves symmetrically.
//! Special relations only ever move none → covert → public.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::archetype::is_complementary;
use crate::constants::{
    AFFINITY_DEFAULT, COMPLEMENTARY_AFFINITY_BONUS, CONFESSION_AFFINITY, CONFESSION_MENTAL_BONUS,
    CONFESSION_STAMINA_BONUS, EXPOSURE_FAN_RETENTION, EXPOSURE_MENTAL_PENALTY,
    EXPOSURE_REPUTATION_PENALTY, TIER_AWKWARD, TIER_BEST_FRIEND, TIER_ENEMY, TIER_FRIENDLY,
    TIER_NEMESIS, TIER_SOULMATE,
};
use crate::numbers::{clamp_pct, retain_fraction};
use crate::performer::{Performer, SpecialRelation};

/// Event pool selector for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationTier {
    Covert,
    Public,
    Soulmate,
    BestFriend,
    Friendly,
    Awkward,
    Enemy,
    Nemesis,
}

impl RelationTier {
    pub const ALL: [Self; 8] = [
        Self::Covert,
        Self::Public,
        Self::Soulmate,
        Self::BestFriend,
        Self::Friendly,
        Self::Awkward,
        Self::Enemy,
        Self::Nemesis,
    ];

    /// Pick the pool for a pair. Special state wins over the numeric bands.
    #[must_use]
    pub fn classify(affinity: f64, special: Option<SpecialRelation>) -> Self {
        match special {
            Some(SpecialRelation::Covert) => return Self::Covert,
            Some(SpecialRelation::Public) => return Self::Public,
            None => {}
        }
        if affinity >= TIER_SOULMATE {
            Self::Soulmate
        } else if affinity >= TIER_BEST_FRIEND {
            Self::BestFriend
        } else if affinity >= TIER_FRIENDLY {
            Self::Friendly
        } else if affinity <= TIER_NEMESIS {
            Self::Nemesis
        } else if affinity <= TIER_ENEMY {
            Self::Enemy
        } else if affinity <= TIER_AWKWARD {
            Self::Awkward
        } else {
            Self::Friendly
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Covert => "covert",
            Self::Public => "public",
            Self::Soulmate => "soulmate",
            Self::BestFriend => "best_friend",
            Self::Friendly => "friendly",
            Self::Awkward => "awkward",
            Self::Enemy => "enemy",
            Self::Nemesis => "nemesis",
        }
    }

    /// Fixed effect pool for this tier.
    #[must_use]
    pub const fn pool(self) -> &'static [InteractionEffect] {
        match self {
            Self::Covert => &COVERT_POOL,
            Self::Public => &PUBLIC_POOL,
            Self::Soulmate => &SOULMATE_POOL,
            Self::BestFriend => &BEST_FRIEND_POOL,
            Self::Friendly => &FRIENDLY_POOL,
            Self::Awkward => &AWKWARD_POOL,
            Self::Enemy => &ENEMY_POOL,
            Self::Nemesis => &NEMESIS_POOL,
        }
    }
}

/// Effect bundle of one relationship event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionEffect {
    pub affinity: f64,
    pub mental: f64,
    pub stamina: f64,
    /// Fan change for the initiating performer, before reputation scaling.
    pub fans: f64,
    pub reputation: f64,
    pub funds: i64,
}

const fn effect(affinity: f64, mental: f64, stamina: f64) -> InteractionEffect {
    InteractionEffect {
        affinity,
        mental,
        stamina,
        fans: 0.0,
        reputation: 0.0,
        funds: 0,
    }
}

const COVERT_POOL: [InteractionEffect; 3] = [
    effect(2.0, 10.0, 0.0),
    effect(1.0, 8.0, 0.0),
    effect(2.0, 12.0, -5.0),
];

const PUBLIC_POOL: [InteractionEffect; 3] = [
    InteractionEffect {
        fans: 300.0,
        ..effect(1.0, 5.0, -5.0)
    },
    InteractionEffect {
        fans: -150.0,
        reputation: -0.5,
        ..effect(0.0, -10.0, 0.0)
    },
    InteractionEffect {
        funds: 100_000,
        reputation: 0.5,
        ..effect(1.0, 5.0, -10.0)
    },
];

const SOULMATE_POOL: [InteractionEffect; 3] = [
    effect(2.0, 10.0, 0.0),
    effect(1.0, 5.0, 10.0),
    effect(2.0, 15.0, 0.0),
];

const BEST_FRIEND_POOL: [InteractionEffect; 3] = [
    effect(3.0, 8.0, 5.0),
    effect(4.0, 5.0, -5.0),
    effect(3.0, 10.0, 0.0),
];

const FRIENDLY_POOL: [InteractionEffect; 3] = [
    effect(3.0, 5.0, 0.0),
    effect(2.0, 3.0, 0.0),
    effect(4.0, 5.0, 0.0),
];

const AWKWARD_POOL: [InteractionEffect; 3] = [
    effect(-2.0, -3.0, 0.0),
    effect(3.0, -2.0, 0.0),
    effect(-1.0, -5.0, 0.0),
];

const ENEMY_POOL: [InteractionEffect; 3] = [
    effect(-5.0, -10.0, -5.0),
    effect(-3.0, -8.0, 0.0),
    InteractionEffect {
        reputation: -0.5,
        ..effect(-4.0, -10.0, 0.0)
    },
];

const NEMESIS_POOL: [InteractionEffect; 3] = [
    effect(-5.0, -15.0, -10.0),
    InteractionEffect {
        reputation: -1.0,
        ..effect(-3.0, -20.0, 0.0)
    },
    InteractionEffect {
        fans: -100.0,
        reputation: -1.0,
        ..effect(-5.0, -15.0, -5.0)
    },
];

/// What one resolved interaction produced, beyond the in-place updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionOutcome {
    pub tier: RelationTier,
    /// Index of the chosen event; doubles as the flavor line index.
    pub event_index: usize,
    /// Fan delta for the initiator, already scaled by reputation.
    pub fans: f64,
    pub reputation: f64,
    pub funds: i64,
}

/// Ensure both directions of the edge exist, defaulting to 50.
pub fn initialize_if_absent(a: &mut Performer, b: &mut Performer) {
    if a.id == b.id {
        return;
    }
    a.relationships
        .entry(b.id.clone())
        .or_insert(AFFINITY_DEFAULT);
    b.relationships
        .entry(a.id.clone())
        .or_insert(AFFINITY_DEFAULT);
}

/// Resolve one relationship event initiated by `actor` toward `target`.
///
/// Returns `None` without drawing when either side is not Active or the actor
/// has no recorded affinity toward the target. Mental, stamina and affinity
/// are applied to both performers in place; the fan change belongs to the
/// initiator and is returned for the caller to scale through staff bonuses.
pub fn resolve_interaction<R>(
    actor: &mut Performer,
    target: &mut Performer,
    reputation_multiplier: f64,
    rng: &mut R,
) -> Option<InteractionOutcome>
where
    R: Rng + ?Sized,
{
    if !actor.is_active() || !target.is_active() {
        return None;
    }
    let affinity = actor.affinity(&target.id)?;
    let tier = RelationTier::classify(affinity, actor.special_with(&target.id));
    let pool = tier.pool();
    let event_index = rng.gen_range(0..pool.len());
    let event = pool[event_index];

    for performer in [&mut *actor, &mut *target] {
        performer.mental = clamp_pct(performer.mental + event.mental);
        performer.stamina = clamp_pct(performer.stamina + event.stamina);
    }
    if event.affinity != 0.0 {
        let mut delta = event.affinity;
        if delta > 0.0 && is_complementary(actor.archetype, target.archetype) {
            delta += COMPLEMENTARY_AFFINITY_BONUS;
        }
        shift_affinity(actor, target, delta);
    }
    log::debug!(
        "interaction {} -> {} tier={} event={event_index}",
        actor.id,
        target.id,
        tier.as_str()
    );
    Some(InteractionOutcome {
        tier,
        event_index,
        fans: (event.fans * reputation_multiplier).floor(),
        reputation: event.reputation,
        funds: event.funds,
    })
}

fn shift_affinity(a: &mut Performer, b: &mut Performer, delta: f64) {
    let forward = a
        .relationships
        .entry(b.id.clone())
        .or_insert(AFFINITY_DEFAULT);
    *forward = clamp_pct(*forward + delta);
    let backward = b
        .relationships
        .entry(a.id.clone())
        .or_insert(AFFINITY_DEFAULT);
    *backward = clamp_pct(*backward + delta);
}

/// Whether the pair currently qualifies for a confession roll.
#[must_use]
pub fn can_confess(a: &Performer, b: &Performer) -> bool {
    a.is_active()
        && b.is_active()
        && a.special_with(&b.id).is_none()
        && b.special_with(&a.id).is_none()
        && a.affinity(&b.id).is_some_and(|affinity| affinity >= CONFESSION_AFFINITY)
}

/// Roll a covert promotion for a qualifying pair.
///
/// On success both sides become covert partners and receive the one-time
/// mental and stamina bonus. Non-qualifying pairs never draw.
pub fn try_promote_to_covert<R>(a: &mut Performer, b: &mut Performer, chance: f64, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    if !can_confess(a, b) || !rng.gen_bool(chance.clamp(0.0, 1.0)) {
        return false;
    }
    a.special_relations
        .insert(b.id.clone(), SpecialRelation::Covert);
    b.special_relations
        .insert(a.id.clone(), SpecialRelation::Covert);
    for performer in [&mut *a, &mut *b] {
        performer.mental = clamp_pct(performer.mental + CONFESSION_MENTAL_BONUS);
        performer.stamina = clamp_pct(performer.stamina + CONFESSION_STAMINA_BONUS);
    }
    log::debug!("covert relationship formed: {} & {}", a.id, b.id);
    true
}

/// Covert partner ids of `performer`, in id order.
pub fn covert_partners(performer: &Performer) -> impl Iterator<Item = &str> + '_ {
    performer
        .special_relations
        .iter()
        .filter(|(_, state)| **state == SpecialRelation::Covert)
        .map(|(id, _)| id.as_str())
}

/// Roll exposure of a covert pair.
///
/// On success the pair becomes public (irreversibly), both lose a fifth of
/// their fans and take the mental penalty. Returns the reputation delta, or
/// `None` when nothing happened. Pairs with a terminal side never draw.
pub fn try_expose_covert<R>(
    a: &mut Performer,
    partner: &mut Performer,
    chance: f64,
    rng: &mut R,
) -> Option<f64>
where
    R: Rng + ?Sized,
{
    if a.status.is_terminal()
        || partner.status.is_terminal()
        || a.special_with(&partner.id) != Some(SpecialRelation::Covert)
    {
        return None;
    }
    if !rng.gen_bool(chance.clamp(0.0, 1.0)) {
        return None;
    }
    a.special_relations
        .insert(partner.id.clone(), SpecialRelation::Public);
    partner
        .special_relations
        .insert(a.id.clone(), SpecialRelation::Public);
    for performer in [&mut *a, &mut *partner] {
        performer.fans = retain_fraction(performer.fans, EXPOSURE_FAN_RETENTION);
        performer.mental = clamp_pct(performer.mental - EXPOSURE_MENTAL_PENALTY);
    }
    log::debug!("covert relationship exposed: {} & {}", a.id, partner.id);
    Some(-EXPOSURE_REPUTATION_PENALTY)
}

/// Borrow two distinct roster slots mutably.
pub(crate) fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return None;
    }
    if a < b {
        let (left, right) = items.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = items.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::performer::Status;
    use crate::performer::fixtures::performer;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn tiers_follow_precedence() {
        assert_eq!(RelationTier::classify(95.0, None), RelationTier::Soulmate);
        assert_eq!(RelationTier::classify(85.0, None), RelationTier::BestFriend);
        assert_eq!(RelationTier::classify(60.0, None), RelationTier::Friendly);
        assert_eq!(RelationTier::classify(50.0, None), RelationTier::Friendly);
        assert_eq!(RelationTier::classify(40.0, None), RelationTier::Awkward);
        assert_eq!(RelationTier::classify(20.0, None), RelationTier::Enemy);
        assert_eq!(RelationTier::classify(10.0, None), RelationTier::Nemesis);
        assert_eq!(
            RelationTier::classify(5.0, Some(SpecialRelation::Covert)),
            RelationTier::Covert
        );
        assert_eq!(
            RelationTier::classify(99.0, Some(SpecialRelation::Public)),
            RelationTier::Public
        );
    }

    #[test]
    fn initialization_is_idempotent() {
        let mut a = performer("a", Archetype::Intj);
        let mut b = performer("b", Archetype::Intp);
        initialize_if_absent(&mut a, &mut b);
        a.relationships.insert("b".into(), 70.0);
        initialize_if_absent(&mut a, &mut b);
        assert_eq!(a.affinity("b"), Some(70.0));
        assert_eq!(b.affinity("a"), Some(50.0));
    }

    #[test]
    fn interaction_moves_both_directions() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut a = performer("a", Archetype::Intj);
        let mut b = performer("b", Archetype::Intp);
        initialize_if_absent(&mut a, &mut b);
        let outcome = resolve_interaction(&mut a, &mut b, 1.1, &mut rng).unwrap();
        assert_eq!(outcome.tier, RelationTier::Friendly);
        assert_eq!(a.affinity("b"), b.affinity("a"));
        assert!(a.affinity("b").unwrap() > 50.0);
    }

    #[test]
    fn interaction_skips_inactive_or_unknown() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut a = performer("a", Archetype::Enfp);
        let mut b = performer("b", Archetype::Istp);
        assert!(resolve_interaction(&mut a, &mut b, 1.0, &mut rng).is_none());
        initialize_if_absent(&mut a, &mut b);
        b.status = Status::Hospitalized;
        assert!(resolve_interaction(&mut a, &mut b, 1.0, &mut rng).is_none());
    }

    #[test]
    fn complementary_pairs_bond_faster() {
        let mut rng_plain = SmallRng::seed_from_u64(5);
        let mut rng_comp = SmallRng::seed_from_u64(5);
        let mut a = performer("a", Archetype::Intj);
        let mut b = performer("b", Archetype::Intp);
        let mut c = performer("c", Archetype::Intj);
        let mut d = performer("d", Archetype::Estj);
        initialize_if_absent(&mut a, &mut b);
        initialize_if_absent(&mut c, &mut d);
        resolve_interaction(&mut a, &mut b, 1.0, &mut rng_plain).unwrap();
        resolve_interaction(&mut c, &mut d, 1.0, &mut rng_comp).unwrap();
        let plain = a.affinity("b").unwrap();
        let comp = c.affinity("d").unwrap();
        assert!((comp - plain - COMPLEMENTARY_AFFINITY_BONUS).abs() < 1e-9);
    }

    #[test]
    fn promotion_then_exposure_is_one_way() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut a = performer("a", Archetype::Infj);
        let mut b = performer("b", Archetype::Esfp);
        a.fans = 1_000;
        b.fans = 500;
        a.mental = 50.0;
        initialize_if_absent(&mut a, &mut b);
        assert!(!try_promote_to_covert(&mut a, &mut b, 1.0, &mut rng));
        a.relationships.insert("b".into(), 95.0);
        assert!(try_promote_to_covert(&mut a, &mut b, 1.0, &mut rng));
        assert_eq!(b.special_with("a"), Some(SpecialRelation::Covert));
        assert!((a.mental - 80.0).abs() < f64::EPSILON);
        assert!(!try_promote_to_covert(&mut a, &mut b, 1.0, &mut rng));

        assert_eq!(covert_partners(&a).collect::<Vec<_>>(), vec!["b"]);
        let rep = try_expose_covert(&mut a, &mut b, 1.0, &mut rng).unwrap();
        assert!((rep + 5.0).abs() < f64::EPSILON);
        assert_eq!(a.special_with("b"), Some(SpecialRelation::Public));
        assert_eq!(b.special_with("a"), Some(SpecialRelation::Public));
        assert_eq!(a.fans, 800);
        assert_eq!(b.fans, 400);
        assert!(try_expose_covert(&mut a, &mut b, 1.0, &mut rng).is_none());
        assert_eq!(covert_partners(&a).count(), 0);
    }

    #[test]
    fn terminal_partner_is_never_exposed() {
        let mut rng = SmallRng::seed_from_u64(10);
        let mut a = performer("a", Archetype::Infj);
        let mut b = performer("b", Archetype::Esfp);
        a.special_relations.insert("b".into(), SpecialRelation::Covert);
        b.special_relations.insert("a".into(), SpecialRelation::Covert);
        b.fans = 1_000;
        b.status = Status::Removed;
        let before = b.clone();
        assert!(try_expose_covert(&mut a, &mut b, 1.0, &mut rng).is_none());
        assert_eq!(b, before);
        assert_eq!(a.special_with("b"), Some(SpecialRelation::Covert));
    }

    #[test]
    fn pair_mut_rejects_aliasing() {
        let mut items = [1, 2, 3];
        assert!(pair_mut(&mut items, 1, 1).is_none());
        assert!(pair_mut(&mut items, 0, 3).is_none());
        let (x, y) = pair_mut(&mut items, 2, 0).unwrap();
        std::mem::swap(x, y);
        assert_eq!(items, [3, 2, 1]);
    }
}

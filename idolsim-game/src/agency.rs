//! Host-side agency state and the guarded operations around the engine.
//!
//! [`Agency`] owns everything the weekly tick and the release model treat as
//! caller context: the running week, funds, reputation, upgrades, groups and
//! the single outstanding release proposal. Every operation checks its guards
//! first and returns a [`Rejection`] without touching state when one fails.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::calendar::{SpecialEvent, SPECIAL_EVENTS, event_for_week};
use crate::config::WeekConfig;
use crate::constants::{
    CONTRACT_NOTICE_WEEKS, DEFAULT_CONTRACT_WEEKS, EVENT_DECLINE_REPUTATION,
    FACILITY_UPGRADE_REPUTATION, MAX_FACILITY_LEVEL, RECRUIT_MAX_SCANDAL_RISK,
    RELEASE_COOLDOWN_WEEKS, RENEWAL_BASE_COST, RENEWAL_COST_PER_FAN,
    RENEWAL_COST_PER_SKILL_POINT, STARTING_FUNDS, STARTING_REPUTATION,
};
use crate::error::{Rejection, UnknownTag};
use crate::flavor::FlavorText;
use crate::group::Group;
use crate::modifiers::{FacilityTrack, HQ_LEVELS, Modifiers, StaffRole, facility_upgrade_cost};
use crate::numbers::{clamp_pct, floor_f64_to_i64, u64_to_f64};
use crate::performer::{Performer, PerformerProfile, Skill, Skills, Status};
use crate::ranking::{PlayerEntry, RIVALS, RankingEntry, compute_ranking, player_rank};
use crate::release::{self, Album, Concept, ReleaseProposal, ReleaseRequest, Settlement};
use crate::schedule::Schedule;
use crate::week::{DayLog, WeekContext, run_week};

/// How a new performer is found; better methods cost more and draw higher skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastingMethod {
    Street,
    Academy,
    Public,
    Global,
    Scout,
}

impl CastingMethod {
    pub const ALL: [Self; 5] = [
        Self::Street,
        Self::Academy,
        Self::Public,
        Self::Global,
        Self::Scout,
    ];

    #[must_use]
    pub const fn cost(self) -> i64 {
        match self {
            Self::Street => 0,
            Self::Academy => 50_000,
            Self::Public => 200_000,
            Self::Global => 1_000_000,
            Self::Scout => 5_000_000,
        }
    }

    /// Inclusive range each starting skill is drawn from.
    #[must_use]
    pub const fn skill_range(self) -> (f64, f64) {
        match self {
            Self::Street => (10.0, 40.0),
            Self::Academy => (30.0, 55.0),
            Self::Public => (50.0, 75.0),
            Self::Global => (70.0, 88.0),
            Self::Scout => (85.0, 96.0),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Street => "street",
            Self::Academy => "academy",
            Self::Public => "public",
            Self::Global => "global",
            Self::Scout => "scout",
        }
    }
}

impl fmt::Display for CastingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CastingMethod {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == key)
            .ok_or_else(|| UnknownTag::new("casting method", s))
    }
}

/// What the host learns from one `advance_week` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekReport {
    /// The week that was simulated.
    pub week: u32,
    pub days: Vec<DayLog>,
    pub log: Vec<String>,
    pub fund_delta: i64,
    /// Reputation change after clamping.
    pub reputation_delta: f64,
    pub upkeep: i64,
    pub player_rank: Option<u32>,
    /// Event opened for the coming week, awaiting `decide_special_event`.
    pub opened_event: Option<&'static SpecialEvent>,
    pub notices: Vec<Notice>,
}

/// Host-facing alerts raised at the end of a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    ContractExpiring { names: Vec<String> },
    NegativeFunds { funds: i64 },
    EventMissed { event: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContractExpiring { names } => write!(
                f,
                "contracts expire within {CONTRACT_NOTICE_WEEKS} weeks: {}",
                names.join(", ")
            ),
            Self::NegativeFunds { funds } => write!(f, "agency funds are negative ({funds})"),
            Self::EventMissed { event } => {
                write!(f, "reputation too low to be invited to {event}")
            }
        }
    }
}

/// Renewal price: `floor(50 000 + fans × 20 + average skill × 1 000)`.
#[must_use]
pub fn renewal_cost(performer: &Performer) -> i64 {
    floor_f64_to_i64(
        RENEWAL_BASE_COST
            + u64_to_f64(performer.fans) * RENEWAL_COST_PER_FAN
            + performer.skills.average() * RENEWAL_COST_PER_SKILL_POINT,
    )
}

fn reject<T>(rejection: Rejection) -> Result<T, Rejection> {
    log::warn!("operation rejected: {rejection}");
    Err(rejection)
}

fn require_funds(funds: i64, needed: i64) -> Result<(), Rejection> {
    if funds < needed {
        Err(Rejection::InsufficientFunds {
            needed,
            available: funds,
        })
    } else {
        Ok(())
    }
}

/// Complete agency state.
#[derive(Debug, Serialize, Deserialize)]
pub struct Agency {
    week: u32,
    funds: i64,
    reputation: f64,
    last_release_week: i64,
    modifiers: Modifiers,
    roster: Vec<Performer>,
    groups: Vec<Group>,
    active_group: Option<String>,
    schedule: Schedule,
    albums: Vec<Album>,
    ranking: Vec<RankingEntry>,
    history: Vec<String>,
    config: WeekConfig,
    next_id: u64,
    pending_event: Option<String>,
    #[serde(skip)]
    pending_release: Option<ReleaseProposal>,
}

impl Default for Agency {
    fn default() -> Self {
        Self::new(WeekConfig::default())
    }
}

impl Agency {
    #[must_use]
    pub fn new(config: WeekConfig) -> Self {
        Self {
            week: 1,
            funds: STARTING_FUNDS,
            reputation: STARTING_REPUTATION,
            last_release_week: -RELEASE_COOLDOWN_WEEKS,
            modifiers: Modifiers::default(),
            roster: Vec::new(),
            groups: Vec::new(),
            active_group: None,
            schedule: Schedule::default(),
            albums: Vec::new(),
            ranking: Vec::new(),
            history: Vec::new(),
            config,
            next_id: 1,
            pending_event: None,
            pending_release: None,
        }
    }

    #[must_use]
    pub const fn week(&self) -> u32 {
        self.week
    }

    #[must_use]
    pub const fn funds(&self) -> i64 {
        self.funds
    }

    #[must_use]
    pub const fn reputation(&self) -> f64 {
        self.reputation
    }

    #[must_use]
    pub const fn last_release_week(&self) -> i64 {
        self.last_release_week
    }

    #[must_use]
    pub const fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    #[must_use]
    pub fn roster(&self) -> &[Performer] {
        &self.roster
    }

    #[must_use]
    pub fn performer(&self, id: &str) -> Option<&Performer> {
        self.roster.iter().find(|performer| performer.id == id)
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub fn active_group(&self) -> Option<&Group> {
        let id = self.active_group.as_deref()?;
        self.groups.iter().find(|group| group.id == id)
    }

    #[must_use]
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
    }

    #[must_use]
    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    #[must_use]
    pub fn ranking(&self) -> &[RankingEntry] {
        &self.ranking
    }

    /// Chronological game log across all weeks.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[must_use]
    pub const fn config(&self) -> &WeekConfig {
        &self.config
    }

    /// Special event awaiting a participate/decline decision.
    #[must_use]
    pub fn pending_event(&self) -> Option<&'static SpecialEvent> {
        let id = self.pending_event.as_deref()?;
        SPECIAL_EVENTS.iter().find(|event| event.id == id)
    }

    #[must_use]
    pub const fn pending_release(&self) -> Option<&ReleaseProposal> {
        self.pending_release.as_ref()
    }

    fn allocate_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn find_index(&self, id: &str) -> Result<usize, Rejection> {
        self.roster
            .iter()
            .position(|performer| performer.id == id)
            .ok_or_else(|| Rejection::UnknownPerformer { id: id.to_string() })
    }

    fn adjust_reputation(&mut self, delta: f64) {
        self.reputation = clamp_pct(self.reputation + delta);
    }

    /// Sign a new performer found through `method`.
    ///
    /// # Errors
    ///
    /// [`Rejection::InsufficientFunds`] when the casting cost cannot be paid.
    pub fn recruit<R>(
        &mut self,
        method: CastingMethod,
        profile: PerformerProfile,
        rng: &mut R,
    ) -> Result<String, Rejection>
    where
        R: Rng + ?Sized,
    {
        if let Err(rejection) = require_funds(self.funds, method.cost()) {
            return reject(rejection);
        }
        let (low, high) = method.skill_range();
        let mut skills = Skills::default();
        for skill in Skill::ALL {
            *skills.get_mut(skill) = rng.gen_range(low..=high).floor();
        }
        let id = self.allocate_id("performer");
        let mut performer = Performer::new(id.clone(), profile, skills);
        performer.scandal_risk = rng.gen_range(0.0..RECRUIT_MAX_SCANDAL_RISK).floor();
        self.funds -= method.cost();
        self.history.push(format!(
            "[agency] signed {} via {method} casting for {}",
            performer.name,
            method.cost()
        ));
        log::debug!("recruited {} ({id}) via {method}", performer.name);
        self.roster.push(performer);
        Ok(id)
    }

    /// Form a group from existing, non-terminal performers.
    ///
    /// # Errors
    ///
    /// Rejects empty member lists, unknown ids and performers whose contract
    /// has ended.
    pub fn form_group(&mut self, name: &str, member_ids: &[&str]) -> Result<String, Rejection> {
        if member_ids.is_empty() {
            return reject(Rejection::EmptyGroup);
        }
        let mut seen = BTreeSet::new();
        let mut members = Vec::with_capacity(member_ids.len());
        for id in member_ids {
            let Some(performer) = self.performer(id) else {
                return reject(Rejection::UnknownPerformer { id: (*id).to_string() });
            };
            if performer.status.is_terminal() {
                return reject(Rejection::PerformerUnavailable { id: (*id).to_string() });
            }
            if seen.insert(*id) {
                members.push(performer);
            }
        }
        let group_id = format!("group-{}", self.next_id);
        let group = Group::form(group_id.clone(), name.to_string(), &members, self.week);
        self.next_id += 1;
        log::debug!("formed {name} ({:?})", group.category());
        self.groups.push(group);
        Ok(group_id)
    }

    /// Make `group_id` the group whose members train this week.
    ///
    /// # Errors
    ///
    /// [`Rejection::UnknownGroup`] for an id that was never formed.
    pub fn select_group(&mut self, group_id: &str) -> Result<(), Rejection> {
        if !self.groups.iter().any(|group| group.id == group_id) {
            return reject(Rejection::UnknownGroup {
                id: group_id.to_string(),
            });
        }
        self.active_group = Some(group_id.to_string());
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects when the HQ is at staff capacity or the signing fee is unaffordable.
    pub fn hire(&mut self, role: StaffRole) -> Result<(), Rejection> {
        let capacity = self.modifiers.staff_capacity();
        if self.modifiers.staff.total() >= capacity {
            return reject(Rejection::StaffCapacity { capacity });
        }
        if let Err(rejection) = require_funds(self.funds, role.signing_fee()) {
            return reject(rejection);
        }
        self.funds -= role.signing_fee();
        self.modifiers.staff.add(role);
        self.history
            .push(format!("[agency] hired a {role} for {}", role.signing_fee()));
        Ok(())
    }

    /// # Errors
    ///
    /// [`Rejection::NoStaffToDismiss`] when nobody holds `role`.
    pub fn dismiss(&mut self, role: StaffRole) -> Result<(), Rejection> {
        if !self.modifiers.staff.remove(role) {
            return reject(Rejection::NoStaffToDismiss {
                role: role.to_string(),
            });
        }
        self.history.push(format!("[agency] dismissed a {role}"));
        Ok(())
    }

    /// Raise one facility track by a level; each upgrade adds reputation.
    ///
    /// # Errors
    ///
    /// Rejects at the maximum level or when funds cannot cover the cost.
    pub fn upgrade_facility(&mut self, track: FacilityTrack) -> Result<(), Rejection> {
        let level = self.modifiers.facilities.level(track);
        let cost = match facility_upgrade_cost(level.saturating_add(1)) {
            Some(cost) if level < MAX_FACILITY_LEVEL => cost,
            _ => return reject(Rejection::MaxLevel { level }),
        };
        if let Err(rejection) = require_funds(self.funds, cost) {
            return reject(rejection);
        }
        self.funds -= cost;
        self.modifiers.facilities.set_level(track, level + 1);
        self.adjust_reputation(FACILITY_UPGRADE_REPUTATION);
        self.history
            .push(format!("[agency] {track} facility upgraded to level {}", level + 1));
        Ok(())
    }

    /// Move to the next headquarters tier.
    ///
    /// # Errors
    ///
    /// Rejects at the top tier or when funds cannot cover the move.
    pub fn upgrade_hq(&mut self) -> Result<(), Rejection> {
        let level = self.modifiers.hq_level;
        let Some(next) = HQ_LEVELS.iter().find(|tier| tier.level == level + 1) else {
            return reject(Rejection::MaxLevel { level });
        };
        if let Err(rejection) = require_funds(self.funds, next.cost) {
            return reject(rejection);
        }
        self.funds -= next.cost;
        self.modifiers.hq_level = next.level;
        self.history
            .push(format!("[agency] moved headquarters to the {}", next.name));
        Ok(())
    }

    /// Extend a contract by the standard term.
    ///
    /// # Errors
    ///
    /// Rejects unknown or terminal performers and unaffordable renewals.
    pub fn renew_contract(&mut self, id: &str) -> Result<i64, Rejection> {
        let idx = match self.find_index(id) {
            Ok(idx) => idx,
            Err(rejection) => return reject(rejection),
        };
        let performer = &self.roster[idx];
        if performer.status.is_terminal() {
            return reject(Rejection::PerformerUnavailable { id: id.to_string() });
        }
        let cost = renewal_cost(performer);
        if let Err(rejection) = require_funds(self.funds, cost) {
            return reject(rejection);
        }
        self.funds -= cost;
        let performer = &mut self.roster[idx];
        performer.contract_weeks = performer.contract_weeks.saturating_add(DEFAULT_CONTRACT_WEEKS);
        self.history.push(format!(
            "[agency] renewed {} for {DEFAULT_CONTRACT_WEEKS} weeks at {cost}",
            performer.name
        ));
        Ok(cost)
    }

    /// End a contract immediately.
    ///
    /// # Errors
    ///
    /// Rejects unknown performers and ones already in a terminal state.
    pub fn terminate_contract(&mut self, id: &str) -> Result<(), Rejection> {
        let idx = match self.find_index(id) {
            Ok(idx) => idx,
            Err(rejection) => return reject(rejection),
        };
        let performer = &mut self.roster[idx];
        if performer.status.is_terminal() {
            return reject(Rejection::PerformerUnavailable { id: id.to_string() });
        }
        performer.status = Status::ContractExpired;
        performer.contract_weeks = 0;
        self.history
            .push(format!("[agency] released {} from contract", performer.name));
        Ok(())
    }

    /// Simulate the current week for the whole roster.
    ///
    /// # Errors
    ///
    /// [`Rejection::DecisionPending`] while a special event awaits a decision,
    /// [`Rejection::NoActiveGroup`] before a group has been selected.
    pub fn advance_week<F, R>(&mut self, flavor: &F, rng: &mut R) -> Result<WeekReport, Rejection>
    where
        F: FlavorText + ?Sized,
        R: Rng + ?Sized,
    {
        if self.pending_event.is_some() {
            return reject(Rejection::DecisionPending);
        }
        let Some(group) = self.active_group().cloned() else {
            return reject(Rejection::NoActiveGroup);
        };

        let ctx = WeekContext {
            modifiers: self.modifiers,
            active_members: group.member_ids.iter().cloned().collect(),
            reputation: self.reputation,
            config: self.config,
        };
        let roster = std::mem::take(&mut self.roster);
        let outcome = run_week(roster, &self.schedule, &ctx, flavor, rng);
        self.roster = outcome.roster;

        let simulated = self.week;
        let before = self.reputation;
        self.funds = self.funds.saturating_add(outcome.fund_delta);
        self.adjust_reputation(outcome.reputation_delta);
        self.week += 1;
        self.history.extend(outcome.log.iter().cloned());

        let player = PlayerEntry {
            group_name: group.name.clone(),
            song_title: self
                .albums
                .last()
                .map_or_else(|| String::from("pre-debut"), |album| album.title.clone()),
            total_fans: self
                .roster
                .iter()
                .filter(|performer| group.contains(&performer.id))
                .map(|performer| performer.fans)
                .sum(),
        };
        self.ranking = compute_ranking(Some(&player), self.reputation, &RIVALS, &self.ranking, rng);

        let mut notices = Vec::new();
        let opened_event = match event_for_week(self.week) {
            Some(event) if event.is_eligible(self.reputation) => {
                self.pending_event = Some(event.id.to_string());
                self.history
                    .push(format!("[agency] invitation received: {}", event.name));
                Some(event)
            }
            Some(event) => {
                notices.push(Notice::EventMissed {
                    event: event.name.to_string(),
                });
                None
            }
            None => None,
        };
        let expiring: Vec<String> = self
            .roster
            .iter()
            .filter(|performer| {
                performer.status == Status::Active
                    && performer.contract_weeks > 0
                    && performer.contract_weeks <= CONTRACT_NOTICE_WEEKS
            })
            .map(|performer| performer.name.clone())
            .collect();
        if !expiring.is_empty() {
            notices.push(Notice::ContractExpiring { names: expiring });
        }
        if self.funds < 0 {
            notices.push(Notice::NegativeFunds { funds: self.funds });
        }

        let player_rank = player_rank(&self.ranking);
        log::info!(
            "agency week {simulated} closed: funds {}, reputation {:.1}, rank {player_rank:?}",
            self.funds,
            self.reputation
        );
        Ok(WeekReport {
            week: simulated,
            days: outcome.days,
            log: outcome.log,
            fund_delta: outcome.fund_delta,
            reputation_delta: self.reputation - before,
            upkeep: outcome.upkeep,
            player_rank,
            opened_event,
            notices,
        })
    }

    /// Accept or decline the pending special event. Stamina, mental and fan
    /// effects reach Active members of the active group only.
    ///
    /// # Errors
    ///
    /// [`Rejection::NoPendingDecision`] without an open event, and
    /// [`Rejection::InsufficientFunds`] when taking part is unaffordable (the
    /// event stays open so it can still be declined).
    pub fn decide_special_event(&mut self, participate: bool) -> Result<(), Rejection> {
        let Some(event) = self.pending_event() else {
            return reject(Rejection::NoPendingDecision);
        };
        if participate {
            if let Err(rejection) = require_funds(self.funds, event.costs.funds) {
                return reject(rejection);
            }
            self.funds = self.funds - event.costs.funds + event.rewards.funds;
            let members = self
                .active_group()
                .map(|group| group.member_ids.clone())
                .unwrap_or_default();
            for performer in self
                .roster
                .iter_mut()
                .filter(|p| p.status == Status::Active && members.contains(&p.id))
            {
                performer.stamina -= event.costs.stamina;
                performer.mental -= event.costs.mental;
                performer.fans = performer.fans.saturating_add(event.rewards.fans);
                performer.clamp();
            }
            self.adjust_reputation(event.rewards.reputation);
            self.history
                .push(format!("[agency] took part in {}", event.name));
        } else {
            self.adjust_reputation(-EVENT_DECLINE_REPUTATION);
            self.history.push(format!("[agency] declined {}", event.name));
        }
        self.pending_event = None;
        Ok(())
    }

    /// Produce an album with the active group. The production cost is paid
    /// and the cooldown starts now; revenue arrives with [`Self::settle_release`].
    ///
    /// # Errors
    ///
    /// Rejects while another proposal is outstanding, without an active
    /// group, and for every guard of [`release::propose_release`].
    pub fn propose_release<R>(
        &mut self,
        title: &str,
        concept: Concept,
        price: i64,
        rng: &mut R,
    ) -> Result<Album, Rejection>
    where
        R: Rng + ?Sized,
    {
        if self.pending_release.is_some() {
            return reject(Rejection::ReleasePending);
        }
        let Some(group) = self.active_group() else {
            return reject(Rejection::NoActiveGroup);
        };
        let members: Vec<Performer> = self
            .roster
            .iter()
            .filter(|performer| group.contains(&performer.id))
            .cloned()
            .collect();
        let album_id = format!("album-{}", self.albums.len() + 1);
        let request = ReleaseRequest {
            id: &album_id,
            title,
            concept,
            price,
            roster: &members,
            reputation: self.reputation,
            funds: self.funds,
            current_week: self.week,
            last_release_week: self.last_release_week,
        };
        let proposal = match release::propose_release(&request, rng) {
            Ok(proposal) => proposal,
            Err(rejection) => return reject(rejection),
        };
        self.funds -= proposal.production_cost();
        self.last_release_week = i64::from(self.week);
        let album = proposal.album().clone();
        self.history.push(format!(
            "[release] '{}' produced: quality {:.0}, projected sales {}",
            album.title, album.quality, album.sales
        ));
        self.pending_release = Some(proposal);
        Ok(album)
    }

    /// Settle the outstanding proposal at its projected revenue.
    ///
    /// # Errors
    ///
    /// [`Rejection::NoPendingRelease`] when nothing awaits settlement,
    /// including a second call for an already settled release.
    pub fn settle_release(&mut self) -> Result<Settlement, Rejection> {
        let Some(proposal) = self.pending_release.take() else {
            return reject(Rejection::NoPendingRelease);
        };
        let revenue = proposal.projected_revenue();
        let settlement = release::settle_release(proposal, revenue);
        self.funds = self.funds.saturating_add(settlement.fund_delta);
        self.adjust_reputation(settlement.reputation_delta);
        for (id, fans) in &settlement.member_fans {
            let Some(performer) = self
                .roster
                .iter_mut()
                .find(|performer| &performer.id == id && performer.status == Status::Active)
            else {
                continue;
            };
            performer.fans = performer.fans.saturating_add(*fans);
            performer.stamina -= settlement.stamina_cost;
            performer.mental -= settlement.mental_cost;
            performer.clamp();
        }
        self.history.push(format!(
            "[release] '{}' settled: revenue {revenue}",
            settlement.album.title
        ));
        self.albums.push(settlement.album.clone());
        Ok(settlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::flavor::KeyFlavor;
    use crate::performer::{Gender, Position};
    use crate::schedule::Activity;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn profile(name: &str, gender: Gender) -> PerformerProfile {
        PerformerProfile {
            name: name.to_string(),
            gender,
            age: 18,
            archetype: Archetype::Esfj,
            position: Position::MainVocal,
            visual_token: String::new(),
        }
    }

    fn agency_with_group(rng: &mut SmallRng) -> Agency {
        let mut agency = Agency::default();
        let a = agency
            .recruit(CastingMethod::Street, profile("Hana", Gender::Female), rng)
            .unwrap();
        let b = agency
            .recruit(CastingMethod::Street, profile("Yuri", Gender::Female), rng)
            .unwrap();
        let group = agency.form_group("Bloom", &[a.as_str(), b.as_str()]).unwrap();
        agency.select_group(&group).unwrap();
        agency
    }

    #[test]
    fn recruit_draws_skills_from_method_range() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut agency = Agency::default();
        let id = agency
            .recruit(CastingMethod::Academy, profile("Mina", Gender::Female), &mut rng)
            .unwrap();
        assert_eq!(agency.funds(), STARTING_FUNDS - 50_000);
        let performer = agency.performer(&id).unwrap();
        for skill in Skill::ALL {
            assert!((30.0..=55.0).contains(&performer.skills.get(skill)));
        }
        assert!(performer.scandal_risk < 30.0);
        assert_eq!(
            agency.recruit(CastingMethod::Scout, profile("X", Gender::Male), &mut rng),
            Err(Rejection::InsufficientFunds {
                needed: 5_000_000,
                available: STARTING_FUNDS - 50_000
            })
        );
        assert_eq!(agency.roster().len(), 1);
    }

    #[test]
    fn advance_requires_a_group() {
        let mut rng = SmallRng::seed_from_u64(12);
        let mut agency = Agency::default();
        assert_eq!(
            agency.advance_week(&KeyFlavor, &mut rng),
            Err(Rejection::NoActiveGroup)
        );
        assert_eq!(agency.week(), 1);
    }

    #[test]
    fn rest_week_costs_only_upkeep() {
        let mut rng = SmallRng::seed_from_u64(13);
        let mut agency = agency_with_group(&mut rng);
        agency.set_schedule(Schedule::uniform(Activity::Rest));
        let funds = agency.funds();
        let report = agency.advance_week(&KeyFlavor, &mut rng).unwrap();
        assert_eq!(report.week, 1);
        assert_eq!(report.fund_delta, -10_000);
        assert_eq!(agency.funds(), funds - 10_000);
        assert_eq!(agency.week(), 2);
        assert_eq!(agency.ranking().len(), RIVALS.len() + 1);
        assert!(report.player_rank.is_some());
    }

    #[test]
    fn staff_capacity_follows_hq() {
        let mut agency = Agency::default();
        agency.hire(StaffRole::Manager).unwrap();
        agency.hire(StaffRole::Stylist).unwrap();
        assert_eq!(
            agency.hire(StaffRole::Marketer),
            Err(Rejection::StaffCapacity { capacity: 2 })
        );
        agency.dismiss(StaffRole::Stylist).unwrap();
        assert_eq!(
            agency.dismiss(StaffRole::Stylist),
            Err(Rejection::NoStaffToDismiss {
                role: String::from("stylist")
            })
        );
    }

    #[test]
    fn facility_upgrade_adds_reputation() {
        let mut agency = Agency::default();
        agency.upgrade_facility(FacilityTrack::Vocal).unwrap();
        assert_eq!(agency.modifiers().facilities.level(FacilityTrack::Vocal), 2);
        assert!((agency.reputation() - (STARTING_REPUTATION + 1.0)).abs() < 1e-9);
        assert_eq!(agency.funds(), STARTING_FUNDS - 100_000);
    }

    #[test]
    fn release_settles_exactly_once() {
        let mut rng = SmallRng::seed_from_u64(14);
        let mut agency = agency_with_group(&mut rng);
        let funds = agency.funds();
        let album = agency
            .propose_release("Debut", Concept::Refreshing, 20_000, &mut rng)
            .unwrap();
        assert_eq!(agency.funds(), funds - 200_000);
        assert_eq!(agency.last_release_week(), 1);
        assert_eq!(
            agency.propose_release("Again", Concept::Dark, 20_000, &mut rng),
            Err(Rejection::ReleasePending)
        );
        let settlement = agency.settle_release().unwrap();
        assert_eq!(settlement.fund_delta, i64::try_from(album.sales).unwrap() * 20_000);
        assert_eq!(agency.settle_release(), Err(Rejection::NoPendingRelease));
        assert_eq!(agency.albums().len(), 1);
        assert_eq!(
            agency.propose_release("Again", Concept::Dark, 20_000, &mut rng),
            Err(Rejection::ReleaseCooldown { weeks_left: 13 })
        );
    }

    #[test]
    fn rookie_showcase_opens_and_blocks_the_week() {
        let mut rng = SmallRng::seed_from_u64(15);
        let mut agency = agency_with_group(&mut rng);
        agency.set_schedule(Schedule::uniform(Activity::Rest));
        for _ in 0..3 {
            agency.advance_week(&KeyFlavor, &mut rng).unwrap();
        }
        assert_eq!(agency.week(), 4);
        assert_eq!(agency.pending_event().map(|e| e.id), Some("rookie_showcase"));
        assert_eq!(
            agency.advance_week(&KeyFlavor, &mut rng),
            Err(Rejection::DecisionPending)
        );
        let reputation = agency.reputation();
        agency.decide_special_event(false).unwrap();
        assert!((agency.reputation() - (reputation - 1.0)).abs() < 1e-9);
        assert_eq!(
            agency.decide_special_event(true),
            Err(Rejection::NoPendingDecision)
        );
        agency.advance_week(&KeyFlavor, &mut rng).unwrap();
    }

    #[test]
    fn special_event_effects_reach_the_active_group_only() {
        let mut rng = SmallRng::seed_from_u64(17);
        let mut agency = agency_with_group(&mut rng);
        let benched = agency
            .recruit(CastingMethod::Street, profile("Sora", Gender::Male), &mut rng)
            .unwrap();
        agency.pending_event = Some(String::from("rookie_showcase"));
        let funds = agency.funds();
        agency.decide_special_event(true).unwrap();
        assert_eq!(agency.funds(), funds - 50_000);

        let bench = agency.performer(&benched).unwrap();
        assert!((bench.stamina - 100.0).abs() < f64::EPSILON);
        assert!((bench.mental - 100.0).abs() < f64::EPSILON);
        assert_eq!(bench.fans, 0);
        let members = agency.active_group().unwrap().member_ids.clone();
        assert_eq!(members.len(), 2);
        for id in &members {
            let member = agency.performer(id).unwrap();
            assert!((member.stamina - 80.0).abs() < f64::EPSILON);
            assert!((member.mental - 90.0).abs() < f64::EPSILON);
            assert_eq!(member.fans, 1_000);
        }
        assert!(agency.pending_event().is_none());
    }

    #[test]
    fn terminal_performers_cannot_renew() {
        let mut rng = SmallRng::seed_from_u64(16);
        let mut agency = agency_with_group(&mut rng);
        let id = agency.roster()[0].id.clone();
        let cost = agency.renew_contract(&id).unwrap();
        assert!(cost >= 50_000);
        assert_eq!(agency.performer(&id).unwrap().contract_weeks, 96);
        agency.terminate_contract(&id).unwrap();
        assert_eq!(
            agency.renew_contract(&id),
            Err(Rejection::PerformerUnavailable { id: id.clone() })
        );
        assert_eq!(agency.performer(&id).unwrap().contract_weeks, 0);
    }
}

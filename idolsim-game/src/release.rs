//! Release economics: a two-phase propose/settle contract.
//!
//! [`propose_release`] computes quality, sales and chart position and hands
//! back a [`ReleaseProposal`]. The host deducts the production cost and stamps
//! the cooldown at that point. [`settle_release`] consumes the proposal, so a
//! host that drops it after settling cannot apply the same release twice; the
//! engine itself keeps no record of settled proposals.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    ALBUM_PRODUCTION_COST, BREAKOUT_ELASTICITY, BREAKOUT_QUALITY, BREAKOUT_REPUTATION,
    CHART_NOISE_SPAN, CHART_RUN_SALES_SHARE, DAYS_PER_WEEK, ELASTICITY_EXPONENT,
    OVERPRICE_FAME_MULT, OVERPRICE_REPUTATION_PENALTY, PRICE_PRAISE_RATIO,
    PRICE_RESISTANCE_RATIO, PROMOTION_MENTAL_COST, PROMOTION_STAMINA_COST,
    QUALITY_FACTOR_MIN, QUALITY_FACTOR_SPAN, REFERENCE_ALBUM_PRICE, RELEASE_COOLDOWN_WEEKS,
    SALES_NOISE_PER_REPUTATION, SALES_PER_NEW_FAN, SALES_REPUTATION_EXPONENT, SALES_SCALE,
    SETTLE_QUALITY_DIVISOR, UNDERPRICE_FAME_MULT, UNDERPRICE_REPUTATION_BONUS,
};
use crate::error::{Rejection, UnknownTag};
use crate::numbers::{
    clamp_pct, floor_f64_to_rank, floor_f64_to_u64, i64_to_f64, retain_fraction, u64_to_f64,
};
use crate::performer::{Performer, Skill};

/// Creative direction of a release, weighting the skill dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concept {
    Refreshing,
    Dark,
    HighTeen,
    GirlCrush,
    Retro,
}

impl Concept {
    pub const ALL: [Self; 5] = [
        Self::Refreshing,
        Self::Dark,
        Self::HighTeen,
        Self::GirlCrush,
        Self::Retro,
    ];

    /// Skill weights for this concept; each set sums to 1.
    #[must_use]
    pub const fn weights(self) -> &'static [(Skill, f64)] {
        match self {
            Self::Refreshing => &[
                (Skill::Vocal, 0.5),
                (Skill::Visual, 0.4),
                (Skill::Leadership, 0.1),
            ],
            Self::Dark => &[(Skill::Rap, 0.4), (Skill::Dance, 0.4), (Skill::Vocal, 0.2)],
            Self::HighTeen => &[
                (Skill::Visual, 0.5),
                (Skill::Leadership, 0.3),
                (Skill::Dance, 0.2),
            ],
            Self::GirlCrush => &[(Skill::Dance, 0.5), (Skill::Rap, 0.3), (Skill::Visual, 0.2)],
            Self::Retro => &[(Skill::Vocal, 0.6), (Skill::Dance, 0.2), (Skill::Rap, 0.2)],
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Refreshing => "refreshing",
            Self::Dark => "dark",
            Self::HighTeen => "high_teen",
            Self::GirlCrush => "girl_crush",
            Self::Retro => "retro",
        }
    }

    /// Weighted score of one performer under this concept.
    #[must_use]
    pub fn score(self, performer: &Performer) -> f64 {
        self.weights()
            .iter()
            .map(|(skill, weight)| performer.skills.get(*skill) * weight)
            .sum()
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Concept {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|concept| concept.as_str() == key)
            .ok_or_else(|| UnknownTag::new("concept", s))
    }
}

/// A released (or provisional) album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub concept: Concept,
    pub release_week: u32,
    pub quality: f64,
    pub price: i64,
    pub sales: u64,
    pub peak_chart: u32,
    pub breakout: bool,
}

/// Host-side inputs to a release proposal.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseRequest<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub concept: Concept,
    pub price: i64,
    /// The active group's members; only Active ones take part.
    pub roster: &'a [Performer],
    pub reputation: f64,
    pub funds: i64,
    pub current_week: u32,
    pub last_release_week: i64,
}

/// Provisional release result awaiting settlement. Deliberately not `Clone`.
#[derive(Debug, PartialEq)]
pub struct ReleaseProposal {
    album: Album,
    elasticity: f64,
    member_ids: Vec<String>,
}

impl ReleaseProposal {
    #[must_use]
    pub const fn album(&self) -> &Album {
        &self.album
    }

    #[must_use]
    pub const fn elasticity(&self) -> f64 {
        self.elasticity
    }

    /// Performers credited with the release.
    #[must_use]
    pub fn member_ids(&self) -> &[String] {
        &self.member_ids
    }

    /// Cost the host deducts when it accepts the proposal.
    #[must_use]
    pub const fn production_cost(&self) -> i64 {
        ALBUM_PRODUCTION_COST
    }

    /// Sales multiplied by price.
    #[must_use]
    pub fn projected_revenue(&self) -> i64 {
        i64::try_from(self.album.sales)
            .unwrap_or(i64::MAX)
            .saturating_mul(self.album.price)
    }
}

/// `(reference / price)^2`; prices above reference dampen sales.
#[must_use]
pub fn price_elasticity(price: i64) -> f64 {
    (i64_to_f64(REFERENCE_ALBUM_PRICE) / i64_to_f64(price)).powf(ELASTICITY_EXPONENT)
}

/// Weeks until the cooldown clears, or `None` when a release is allowed.
#[must_use]
pub const fn cooldown_remaining(current_week: u32, last_release_week: i64) -> Option<i64> {
    let since = current_week as i64 - last_release_week;
    if since < RELEASE_COOLDOWN_WEEKS {
        Some(RELEASE_COOLDOWN_WEEKS - since)
    } else {
        None
    }
}

/// Compute a provisional release.
///
/// # Errors
///
/// Rejects, without touching any state, when the cooldown has not elapsed, no
/// Active member is available, the price is not positive, or funds cannot
/// cover the production cost.
pub fn propose_release<R>(request: &ReleaseRequest<'_>, rng: &mut R) -> Result<ReleaseProposal, Rejection>
where
    R: Rng + ?Sized,
{
    if let Some(weeks_left) = cooldown_remaining(request.current_week, request.last_release_week) {
        return Err(Rejection::ReleaseCooldown { weeks_left });
    }
    let members: Vec<&Performer> = request
        .roster
        .iter()
        .filter(|performer| performer.is_active())
        .collect();
    if members.is_empty() {
        return Err(Rejection::EmptyRoster);
    }
    if request.price <= 0 {
        return Err(Rejection::InvalidPrice {
            price: request.price,
        });
    }
    if request.funds < ALBUM_PRODUCTION_COST {
        return Err(Rejection::InsufficientFunds {
            needed: ALBUM_PRODUCTION_COST,
            available: request.funds,
        });
    }

    let reputation = clamp_pct(request.reputation);
    let total: f64 = members
        .iter()
        .map(|performer| request.concept.score(performer))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let base_quality = total / members.len() as f64;
    let factor = QUALITY_FACTOR_MIN + rng.r#gen::<f64>() * QUALITY_FACTOR_SPAN;
    let quality = clamp_pct((base_quality * factor).floor());

    let elasticity = price_elasticity(request.price);
    let base_sales =
        (quality / 10.0) * reputation.powf(SALES_REPUTATION_EXPONENT) * SALES_SCALE;
    let noise = rng.r#gen::<f64>() * reputation * SALES_NOISE_PER_REPUTATION;
    let sales = floor_f64_to_u64(base_sales * elasticity + noise);

    let chart_noise = rng.r#gen::<f64>() * CHART_NOISE_SPAN;
    let chart_score = (quality * (reputation / 100.0) * elasticity.min(1.0) + chart_noise).floor();
    let peak_chart = floor_f64_to_rank(101.0 - chart_score, 1, 100);

    let breakout = quality > BREAKOUT_QUALITY
        && reputation > BREAKOUT_REPUTATION
        && elasticity >= BREAKOUT_ELASTICITY;

    log::debug!(
        "release proposal `{}`: quality {quality:.0}, sales {sales}, peak #{peak_chart}, elasticity {elasticity:.2}",
        request.title
    );
    Ok(ReleaseProposal {
        album: Album {
            id: request.id.to_string(),
            title: request.title.to_string(),
            concept: request.concept,
            release_week: request.current_week,
            quality,
            price: request.price,
            sales,
            peak_chart,
            breakout,
        },
        elasticity,
        member_ids: members.iter().map(|performer| performer.id.clone()).collect(),
    })
}

/// Public reaction to the chosen price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSentiment {
    Resistance,
    Neutral,
    Praise,
}

impl PriceSentiment {
    #[must_use]
    pub fn from_price(price: i64) -> Self {
        let ratio = i64_to_f64(price) / i64_to_f64(REFERENCE_ALBUM_PRICE);
        if ratio > PRICE_RESISTANCE_RATIO {
            Self::Resistance
        } else if ratio < PRICE_PRAISE_RATIO {
            Self::Praise
        } else {
            Self::Neutral
        }
    }
}

/// Deltas the host applies once per settled release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub album: Album,
    pub fund_delta: i64,
    /// Unclamped; the host clamps against its running reputation.
    pub reputation_delta: f64,
    /// New fans per credited member.
    pub member_fans: Vec<(String, u64)>,
    /// Promotion fatigue applied to each credited member.
    pub stamina_cost: f64,
    pub mental_cost: f64,
    pub price_sentiment: PriceSentiment,
}

/// Settle a proposal, consuming it.
#[must_use]
pub fn settle_release(proposal: ReleaseProposal, total_revenue: i64) -> Settlement {
    let ReleaseProposal {
        album, member_ids, ..
    } = proposal;
    let reference = i64_to_f64(REFERENCE_ALBUM_PRICE);
    let ratio = i64_to_f64(album.price) / reference;

    let mut reputation_delta = album.quality / SETTLE_QUALITY_DIVISOR;
    let fame_multiplier = if album.price > REFERENCE_ALBUM_PRICE {
        reputation_delta -= OVERPRICE_REPUTATION_PENALTY * (ratio - 1.0);
        OVERPRICE_FAME_MULT
    } else if album.price < REFERENCE_ALBUM_PRICE {
        reputation_delta += UNDERPRICE_REPUTATION_BONUS * (1.0 - ratio);
        UNDERPRICE_FAME_MULT
    } else {
        1.0
    };

    let fans_each = retain_fraction(album.sales, fame_multiplier / SALES_PER_NEW_FAN);
    let member_fans = member_ids.into_iter().map(|id| (id, fans_each)).collect();
    log::debug!(
        "settled `{}`: revenue {total_revenue}, reputation {reputation_delta:+.2}, {fans_each} fans each",
        album.title
    );
    Settlement {
        price_sentiment: PriceSentiment::from_price(album.price),
        album,
        fund_delta: total_revenue,
        reputation_delta,
        member_fans,
        stamina_cost: PROMOTION_STAMINA_COST,
        mental_cost: PROMOTION_MENTAL_COST,
    }
}

/// One day of an album's first chart week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDay {
    pub day: u8,
    pub rank: u32,
    pub sales: u64,
    pub cumulative_sales: u64,
}

/// Simulate the first chart week: a climb to the peak on day 3, then a slide.
pub fn chart_run<R>(album: &Album, rng: &mut R) -> [ChartDay; DAYS_PER_WEEK]
where
    R: Rng + ?Sized,
{
    let peak = f64::from(album.peak_chart.clamp(1, 100));
    let mut days = [ChartDay {
        day: 0,
        rank: album.peak_chart,
        sales: 0,
        cumulative_sales: 0,
    }; DAYS_PER_WEEK];
    let mut cumulative = 0_u64;
    for (idx, slot) in days.iter_mut().enumerate() {
        let day_number = idx + 1;
        let rank = match day_number {
            1 => peak + 40.0 + rng.r#gen::<f64>() * 20.0,
            2 => peak + 15.0 + rng.r#gen::<f64>() * 15.0,
            3 => peak,
            later => {
                #[allow(clippy::cast_precision_loss)]
                let slide = (later - 3) as f64;
                peak + slide * (4.0 + rng.r#gen::<f64>() * 6.0)
            }
        };
        let sales = floor_f64_to_u64(u64_to_f64(album.sales) * CHART_RUN_SALES_SHARE[idx]);
        cumulative = cumulative.saturating_add(sales);
        *slot = ChartDay {
            day: u8::try_from(day_number).unwrap_or(u8::MAX),
            rank: floor_f64_to_rank(rank, 1, 100),
            sales,
            cumulative_sales: cumulative,
        };
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::performer::fixtures::performer;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn request<'a>(roster: &'a [Performer], price: i64) -> ReleaseRequest<'a> {
        ReleaseRequest {
            id: "album-1",
            title: "First Light",
            concept: Concept::Refreshing,
            price,
            roster,
            reputation: 50.0,
            funds: 1_000_000,
            current_week: 20,
            last_release_week: -13,
        }
    }

    #[test]
    fn concept_weights_sum_to_one() {
        for concept in Concept::ALL {
            let total: f64 = concept.weights().iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-9, "{concept}");
        }
        assert_eq!("girl crush".parse::<Concept>().unwrap(), Concept::GirlCrush);
        assert!("polka".parse::<Concept>().is_err());
    }

    #[test]
    fn guards_reject_in_order() {
        let roster = vec![performer("a", Archetype::Enfj)];
        let mut rng = SmallRng::seed_from_u64(1);

        let mut early = request(&roster, 20_000);
        early.last_release_week = 15;
        assert_eq!(
            propose_release(&early, &mut rng),
            Err(Rejection::ReleaseCooldown { weeks_left: 8 })
        );

        let empty = request(&[], 20_000);
        assert_eq!(propose_release(&empty, &mut rng), Err(Rejection::EmptyRoster));

        assert_eq!(
            propose_release(&request(&roster, 0), &mut rng),
            Err(Rejection::InvalidPrice { price: 0 })
        );

        let mut poor = request(&roster, 20_000);
        poor.funds = 10;
        assert_eq!(
            propose_release(&poor, &mut rng),
            Err(Rejection::InsufficientFunds {
                needed: 200_000,
                available: 10
            })
        );
    }

    #[test]
    fn proposal_fields_stay_in_range() {
        let roster = vec![performer("a", Archetype::Enfj), performer("b", Archetype::Intj)];
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..200 {
            let proposal = propose_release(&request(&roster, 18_000), &mut rng).unwrap();
            let album = proposal.album();
            assert!((0.0..=100.0).contains(&album.quality));
            assert!((1..=100).contains(&album.peak_chart));
            assert!(!album.breakout);
            assert_eq!(proposal.member_ids().len(), 2);
        }
    }

    #[test]
    fn top_quality_at_a_fair_price_breaks_out() {
        let mut star = performer("star", Archetype::Enfp);
        for skill in Skill::ALL {
            *star.skills.get_mut(skill) = 100.0;
        }
        let roster = vec![star];
        let mut rng = SmallRng::seed_from_u64(5);
        let mut hit = request(&roster, 20_000);
        hit.reputation = 95.0;

        let mut breakouts = 0;
        for _ in 0..100 {
            let proposal = propose_release(&hit, &mut rng).unwrap();
            let quality = proposal.album().quality;
            assert_eq!(proposal.album().breakout, quality > 92.0);
            if !proposal.album().breakout {
                continue;
            }
            breakouts += 1;
            let sales = proposal.album().sales;
            let settled = settle_release(proposal, 0);
            assert!(settled.album.breakout);
            assert!(settled.reputation_delta > 92.0 / 40.0);
            assert!((settled.reputation_delta - quality / 40.0).abs() < 1e-9);
            assert_eq!(settled.price_sentiment, PriceSentiment::Neutral);
            assert_eq!(
                settled.member_fans,
                vec![(String::from("star"), retain_fraction(sales, 1.0 / 120.0))]
            );
        }
        assert!(breakouts > 0);

        // Reputation must exceed the bar, and 21k drops elasticity below 0.95.
        let mut at_bar = hit;
        at_bar.reputation = 88.0;
        let mut pricey = hit;
        pricey.price = 21_000;
        for _ in 0..50 {
            assert!(!propose_release(&at_bar, &mut rng).unwrap().album().breakout);
            assert!(!propose_release(&pricey, &mut rng).unwrap().album().breakout);
        }
    }

    #[test]
    fn settlement_rewards_fair_prices() {
        let roster = vec![performer("a", Archetype::Enfj)];
        let mut rng = SmallRng::seed_from_u64(3);
        let cheap = propose_release(&request(&roster, 10_000), &mut rng).unwrap();
        let quality = cheap.album().quality;
        let sales = cheap.album().sales;
        let settled = settle_release(cheap, 123);
        assert_eq!(settled.fund_delta, 123);
        assert!((settled.reputation_delta - (quality / 40.0 + 3.0)).abs() < 1e-9);
        assert_eq!(settled.price_sentiment, PriceSentiment::Praise);
        assert_eq!(
            settled.member_fans,
            vec![(String::from("a"), retain_fraction(sales, 1.4 / 120.0))]
        );

        let pricey = propose_release(&request(&roster, 40_000), &mut rng).unwrap();
        let quality = pricey.album().quality;
        let settled = settle_release(pricey, 0);
        assert!((settled.reputation_delta - (quality / 40.0 - 12.0)).abs() < 1e-9);
        assert_eq!(settled.price_sentiment, PriceSentiment::Resistance);
    }

    #[test]
    fn chart_run_peaks_on_day_three() {
        let mut rng = SmallRng::seed_from_u64(4);
        let album = Album {
            id: "x".into(),
            title: "x".into(),
            concept: Concept::Dark,
            release_week: 1,
            quality: 80.0,
            price: 20_000,
            sales: 10_000,
            peak_chart: 12,
            breakout: false,
        };
        let run = chart_run(&album, &mut rng);
        assert_eq!(run[2].rank, 12);
        assert!(run.iter().all(|day| day.rank >= 12));
        assert!(run[0].rank >= 52);
        assert_eq!(run[0].sales, 4_500);
        assert_eq!(run[6].cumulative_sales, run.iter().map(|d| d.sales).sum::<u64>());
        assert!(run[6].rank >= run[3].rank);
    }
}

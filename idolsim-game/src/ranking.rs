//! Weekly chart of the player's active group against a fixed field of rivals.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{RANKING_FAN_WEIGHT, RANKING_REPUTATION_WEIGHT, RIVAL_NOISE_SPAN};
use crate::numbers::{clamp_pct, floor_f64_to_i64, u64_to_f64};

/// Competing act with a fixed base score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rival {
    pub name: &'static str,
    pub song_title: &'static str,
    pub base_power: f64,
}

const fn rival(name: &'static str, song_title: &'static str, base_power: f64) -> Rival {
    Rival {
        name,
        song_title,
        base_power,
    }
}

/// Bundled rival field.
pub const RIVALS: [Rival; 10] = [
    rival("NEO JEANS", "Hype Girl", 8_500.0),
    rival("BLACK VEIL", "Shut It Down", 9_200.0),
    rival("IVE-RY", "Love Dive In", 8_800.0),
    rival("AESPA-RE", "Next Level Up", 8_200.0),
    rival("LE SSERAFIM-X", "Fearless Again", 8_000.0),
    rival("TWICE-AGAIN", "Fancy You", 7_500.0),
    rival("STAY-C", "Poppy Pop", 6_800.0),
    rival("N-MIX", "Dice Roll", 6_500.0),
    rival("BABY-MON", "Sheesh Wave", 7_200.0),
    rival("KISS OF LIFE-R", "Midas Step", 6_000.0),
];

/// Movement relative to the previous snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Same,
    #[default]
    New,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub group_name: String,
    pub song_title: String,
    pub score: i64,
    pub is_player: bool,
    pub trend: Trend,
}

/// The player's side of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub group_name: String,
    /// Latest album title, or `pre-debut`.
    pub song_title: String,
    /// Summed fans of the group's members.
    pub total_fans: u64,
}

/// `floor(0.5 × fans + 150 × reputation)`.
#[must_use]
pub fn player_score(total_fans: u64, reputation: f64) -> i64 {
    floor_f64_to_i64(
        u64_to_f64(total_fans) * RANKING_FAN_WEIGHT + clamp_pct(reputation) * RANKING_REPUTATION_WEIGHT,
    )
}

/// Build this week's chart.
///
/// Returns an empty chart when there is no player entry. Rival scores draw
/// one uniform each, in table order. Ties keep insertion order (player
/// first). Trends compare against `previous` by group name.
pub fn compute_ranking<R>(
    player: Option<&PlayerEntry>,
    reputation: f64,
    rivals: &[Rival],
    previous: &[RankingEntry],
    rng: &mut R,
) -> Vec<RankingEntry>
where
    R: Rng + ?Sized,
{
    let Some(player) = player else {
        return Vec::new();
    };
    let mut entries = Vec::with_capacity(rivals.len() + 1);
    entries.push(RankingEntry {
        rank: 0,
        group_name: player.group_name.clone(),
        song_title: player.song_title.clone(),
        score: player_score(player.total_fans, reputation),
        is_player: true,
        trend: Trend::New,
    });
    for rival in rivals {
        let noise = (rng.r#gen::<f64>() - 0.5) * RIVAL_NOISE_SPAN;
        entries.push(RankingEntry {
            rank: 0,
            group_name: rival.name.to_string(),
            song_title: rival.song_title.to_string(),
            score: floor_f64_to_i64(rival.base_power + noise),
            is_player: false,
            trend: Trend::New,
        });
    }
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    for (rank, entry) in (1_u32..).zip(entries.iter_mut()) {
        entry.rank = rank;
        entry.trend = previous
            .iter()
            .find(|prior| prior.group_name == entry.group_name)
            .map_or(Trend::New, |prior| match rank.cmp(&prior.rank) {
                std::cmp::Ordering::Less => Trend::Up,
                std::cmp::Ordering::Greater => Trend::Down,
                std::cmp::Ordering::Equal => Trend::Same,
            });
    }
    entries
}

/// Rank of the player's group, if charted.
#[must_use]
pub fn player_rank(entries: &[RankingEntry]) -> Option<u32> {
    entries.iter().find(|entry| entry.is_player).map(|entry| entry.rank)
}

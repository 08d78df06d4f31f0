//! Roster groups.
use serde::{Deserialize, Serialize};

use crate::performer::{Gender, Performer};

/// Fixed at formation from member genders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupCategory {
    Boy,
    Girl,
    CoEd,
}

impl GroupCategory {
    /// All male → Boy, all female → Girl, otherwise (or empty) CoEd.
    #[must_use]
    pub fn classify<'a>(members: impl IntoIterator<Item = &'a Performer>) -> Self {
        let mut male = false;
        let mut female = false;
        for performer in members {
            match performer.gender {
                Gender::Male => male = true,
                Gender::Female => female = true,
            }
        }
        match (male, female) {
            (true, false) => Self::Boy,
            (false, true) => Self::Girl,
            _ => Self::CoEd,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boy => "boy",
            Self::Girl => "girl",
            Self::CoEd => "co_ed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub member_ids: Vec<String>,
    pub formed_week: u32,
    category: GroupCategory,
}

impl Group {
    /// Form a group; the category is derived here and never changes.
    #[must_use]
    pub fn form(id: String, name: String, members: &[&Performer], formed_week: u32) -> Self {
        Self {
            id,
            name,
            member_ids: members.iter().map(|performer| performer.id.clone()).collect(),
            formed_week,
            category: GroupCategory::classify(members.iter().copied()),
        }
    }

    #[must_use]
    pub const fn category(&self) -> GroupCategory {
        self.category
    }

    #[must_use]
    pub fn contains(&self, performer_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == performer_id)
    }
}

//! Grouped leaderboard hierarchy built from flat run records.
//!
//! The builder is a pure function from an ordered record sequence to a
//! game → section → category → run tree. Nodes are deduplicated by exact
//! display name; run leaves are never deduplicated.

use serde::{Deserialize, Serialize};

use crate::models::RunRecord;

/// Derive a display identifier from a name: lowercase, with each run of
/// whitespace collapsed to a single hyphen. Leading and trailing whitespace
/// also become hyphens. Distinct names may collapse to the same slug; there
/// is no collision detection.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch.is_whitespace() {
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }
            slug.push('-');
        } else {
            slug.extend(ch.to_lowercase());
        }
    }
    slug
}

/// A single run entry under a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub runner: String,
    pub time: String,
    pub video: Option<String>,
}

/// A category within a section, holding runs in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub runs: Vec<Run>,
}

/// A section within a game (e.g. "Any%", "100%").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub categories: Vec<Category>,
}

/// A game at the top of the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub sections: Vec<Section>,
}

/// The complete grouped tree. Built once per data load and never mutated
/// in place; a refresh rebuilds the whole tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub games: Vec<Game>,
}

impl Leaderboard {
    /// Group flat records into the game → section → category → run tree.
    ///
    /// Records are processed in input order: each level is found by exact
    /// name match over already-created siblings, or created at the end of
    /// the sibling list. Ordering at every level is therefore order of
    /// first appearance, and runs within a category keep their relative
    /// input order. An empty input yields an empty game list.
    ///
    /// Lookups are linear scans; fine at the expected scale of tens to low
    /// hundreds of distinct (game, section, category) combinations.
    pub fn build(records: &[RunRecord]) -> Self {
        let mut games: Vec<Game> = Vec::new();

        for record in records {
            let game_idx = match games.iter().position(|g| g.name == record.game) {
                Some(idx) => idx,
                None => {
                    games.push(Game {
                        id: slugify(&record.game),
                        name: record.game.clone(),
                        sections: Vec::new(),
                    });
                    games.len() - 1
                }
            };

            let sections = &mut games[game_idx].sections;
            let section_idx = match sections.iter().position(|s| s.name == record.section) {
                Some(idx) => idx,
                None => {
                    sections.push(Section {
                        id: slugify(&record.section),
                        name: record.section.clone(),
                        categories: Vec::new(),
                    });
                    sections.len() - 1
                }
            };

            let categories = &mut sections[section_idx].categories;
            let category_idx = match categories.iter().position(|c| c.name == record.category) {
                Some(idx) => idx,
                None => {
                    categories.push(Category {
                        id: slugify(&record.category),
                        name: record.category.clone(),
                        runs: Vec::new(),
                    });
                    categories.len() - 1
                }
            };

            categories[category_idx].runs.push(Run {
                runner: record.runner.clone(),
                time: record.time.clone(),
                video: record.video.clone(),
            });
        }

        Self { games }
    }

    /// Total number of run leaves across the tree.
    pub fn run_count(&self) -> usize {
        self.games
            .iter()
            .flat_map(|g| &g.sections)
            .flat_map(|s| &s.categories)
            .map(|c| c.runs.len())
            .sum()
    }
}

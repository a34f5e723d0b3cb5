// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One person tracked on the board.
///
/// Names are chosen by the user and are not required to be unique.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Person {
    pub name: String,
    pub category: String,
    pub votes: u64,
    /// Either a URL or an inline `data:` image. The two are interchangeable
    /// and neither is validated.
    pub image: Option<String>,
}

impl Person {
    pub fn new(name: &str, category: &str, votes: u64) -> Person {
        Person {
            name: name.to_string(),
            category: category.to_string(),
            votes,
            image: None,
        }
    }

    pub fn with_image(self, image: Option<String>) -> Person {
        Person {
            image: image.filter(|s| !s.is_empty()),
            ..self
        }
    }
}

// ******** Output data structures *********

/// Render geometry for one bubble, in a normalized [0,1]x[0,1] space.
///
/// The size is a marker size, in the same unit as the configured maximum.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// The sum of the votes of all the people sharing a category.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CategoryTotal {
    pub category: String,
    pub votes: u64,
}

/// Reasons for rejecting an operation on a record collection.
///
/// None of them leaves the collection modified.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyError {
    /// The name of a new person is blank.
    EmptyName,
    /// The category is not part of the category table.
    UnknownCategory { category: String },
    /// No person matches the update request.
    NotFound {
        name: String,
        category: Option<String>,
    },
    /// Several people match and the update policy requires a single one.
    AmbiguousName { name: String, matches: usize },
}

impl Error for TallyError {}

impl Display for TallyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyError::EmptyName => write!(f, "the name of the person is required"),
            TallyError::UnknownCategory { category } => {
                write!(f, "unknown category {:?}", category)
            }
            TallyError::NotFound {
                name,
                category: Some(c),
            } => write!(f, "nobody named {:?} in category {:?}", name, c),
            TallyError::NotFound {
                name,
                category: None,
            } => write!(f, "nobody named {:?}", name),
            TallyError::AmbiguousName { name, matches } => write!(
                f,
                "{} people are named {:?}, a category is needed to choose one",
                matches, name
            ),
        }
    }
}

// ********* Configuration **********

/// The generic labels used when no category table is configured.
pub const GENERIC_CATEGORIES: [&str; 5] = [
    "Categoria 1",
    "Categoria 2",
    "Categoria 3",
    "Categoria 4",
    "Categoria 5",
];

/// Default qualitative palette, applied cyclically to categories without an
/// explicit color.
pub const DEFAULT_PALETTE: [&str; 5] = ["#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A"];

pub fn palette_color(idx: usize) -> &'static str {
    DEFAULT_PALETTE[idx % DEFAULT_PALETTE.len()]
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CategorySpec {
    pub name: String,
    pub color: String,
}

/// The fixed set of categories, in display order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<CategorySpec>,
}

impl CategoryTable {
    /// Builds a table from (name, optional color) pairs.
    /// Missing colors are taken from the default palette, by position.
    /// Duplicate names keep their first position.
    pub fn new(entries: &[(String, Option<String>)]) -> CategoryTable {
        let mut categories: Vec<CategorySpec> = Vec::new();
        for (idx, (name, color)) in entries.iter().enumerate() {
            if categories.iter().any(|c| c.name == *name) {
                continue;
            }
            categories.push(CategorySpec {
                name: name.clone(),
                color: color
                    .clone()
                    .unwrap_or_else(|| palette_color(idx).to_string()),
            });
        }
        CategoryTable { categories }
    }

    pub fn generic() -> CategoryTable {
        let entries: Vec<(String, Option<String>)> = GENERIC_CATEGORIES
            .iter()
            .map(|name| (name.to_string(), None))
            .collect();
        CategoryTable::new(&entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategorySpec> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.color.as_str())
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        CategoryTable::generic()
    }
}

/// What to do when a vote update matches several people with the same name.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DuplicateNameMode {
    /// Every matching row receives the new count.
    UpdateAll,
    /// The update is rejected unless exactly one row matches.
    RequireUnique,
}

/// Settings for the seeded random scatter.
///
/// Positions only depend on the seed and on the number of bubbles, so adding
/// one bubble redraws all of them.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ScatterSettings {
    pub seed: u64,
    pub max_size: f64,
}

impl ScatterSettings {
    pub const CATEGORY_DEFAULT: ScatterSettings = ScatterSettings {
        seed: 42,
        max_size: 100.0,
    };

    pub const PERSON_DEFAULT: ScatterSettings = ScatterSettings {
        seed: 42,
        max_size: 60.0,
    };
}

/// Settings for the radial packing of the people of one category.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct RadialSettings {
    pub min_size: f64,
    pub max_size: f64,
}

impl RadialSettings {
    pub const DEFAULT: RadialSettings = RadialSettings {
        min_size: 30.0,
        max_size: 90.0,
    };
}

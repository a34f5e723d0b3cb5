use log::{debug, info};

use std::cell::RefCell;
use std::convert::Infallible;

use crate::config::*;

/// An ordered collection of people. Insertion order is preserved.
///
/// There is no identity beyond the (name, category) pair: updates target
/// people by name, and optionally by category.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RecordCollection {
    people: Vec<Person>,
}

impl RecordCollection {
    pub fn new() -> RecordCollection {
        RecordCollection { people: Vec::new() }
    }

    pub fn from_people(people: Vec<Person>) -> RecordCollection {
        RecordCollection { people }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn into_people(self) -> Vec<Person> {
        self.people
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Appends a person at the end of the collection.
    ///
    /// Rejected without modification if the name is blank or if the
    /// category is not part of the table.
    pub fn add(&mut self, person: Person, categories: &CategoryTable) -> Result<(), TallyError> {
        if person.name.trim().is_empty() {
            return Err(TallyError::EmptyName);
        }
        if !categories.contains(&person.category) {
            return Err(TallyError::UnknownCategory {
                category: person.category,
            });
        }
        info!(
            "add: {:?} in {:?} with {} votes",
            person.name, person.category, person.votes
        );
        self.people.push(person);
        Ok(())
    }

    /// Overwrites the votes of the people matching the name, and the
    /// category if one is given.
    ///
    /// Returns the number of rows that were updated. With
    /// `DuplicateNameMode::UpdateAll`, all the matching rows receive the same
    /// count.
    pub fn update_votes(
        &mut self,
        name: &str,
        category: Option<&str>,
        votes: u64,
        mode: DuplicateNameMode,
    ) -> Result<usize, TallyError> {
        let matches: Vec<usize> = self
            .people
            .iter()
            .enumerate()
            .filter(|(_, p)| p.name == name && category.map_or(true, |c| p.category == c))
            .map(|(idx, _)| idx)
            .collect();
        debug!(
            "update_votes: name: {:?} category: {:?} matching rows: {:?}",
            name, category, matches
        );

        match (matches.len(), mode) {
            (0, _) => {
                return Err(TallyError::NotFound {
                    name: name.to_string(),
                    category: category.map(|c| c.to_string()),
                })
            }
            (n, DuplicateNameMode::RequireUnique) if n > 1 => {
                return Err(TallyError::AmbiguousName {
                    name: name.to_string(),
                    matches: n,
                })
            }
            _ => {}
        }

        for idx in matches.iter() {
            self.people[*idx].votes = votes;
        }
        info!(
            "update_votes: {:?} now has {} votes ({} rows)",
            name,
            votes,
            matches.len()
        );
        Ok(matches.len())
    }

    /// The distinct names, in the order they first appear.
    pub fn distinct_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for p in self.people.iter() {
            if !names.contains(&p.name.as_str()) {
                names.push(p.name.as_str());
            }
        }
        names
    }
}

/// A backing store for a record collection.
///
/// Every interaction loads the whole collection and every mutation saves it
/// back in full. There is no locking: with concurrent writers, the last
/// one wins.
pub trait RecordStore {
    type Error;

    /// Reads the collection. An absent store is an empty collection.
    fn load(&self) -> Result<RecordCollection, Self::Error>;

    /// Replaces the stored collection.
    fn save(&self, coll: &RecordCollection) -> Result<(), Self::Error>;

    /// Discards every record and persists the empty collection.
    fn reset(&self) -> Result<RecordCollection, Self::Error> {
        let empty = RecordCollection::new();
        self.save(&empty)?;
        Ok(empty)
    }
}

/// A store kept in memory, mostly useful for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<Option<RecordCollection>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Whether anything was ever saved. A reset counts as a save.
    pub fn is_persisted(&self) -> bool {
        self.saved.borrow().is_some()
    }
}

impl RecordStore for MemoryStore {
    type Error = Infallible;

    fn load(&self) -> Result<RecordCollection, Infallible> {
        Ok(self.saved.borrow().clone().unwrap_or_default())
    }

    fn save(&self, coll: &RecordCollection) -> Result<(), Infallible> {
        *self.saved.borrow_mut() = Some(coll.clone());
        Ok(())
    }
}

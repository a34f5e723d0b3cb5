//! Record collection, aggregation and bubble layout for a vote-tracking board.
//!
//! People are recorded with a category and a vote count. The collection is
//! kept in a [`RecordStore`], summed per category and laid out as bubbles.
//!
//! ```
//! use bubble_tally::*;
//!
//! let table = CategoryTable::generic();
//! let store = MemoryStore::new();
//!
//! let mut coll = store.load()?;
//! coll.add(Person::new("Ana", "Categoria 1", 3), &table)?;
//! coll.add(Person::new("Luis", "Categoria 1", 5), &table)?;
//! coll.update_votes("Ana", None, 7, DuplicateNameMode::UpdateAll)?;
//! store.save(&coll)?;
//!
//! let totals = sum_by_category(&store.load()?, &table);
//! assert_eq!(totals[0].votes, 12);
//!
//! let members = filter_by_category(&coll, "Categoria 1");
//! let votes: Vec<u64> = members.iter().map(|p| p.votes).collect();
//! let bubbles = radial(&votes, &RadialSettings::DEFAULT);
//! assert_eq!(bubbles.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod aggregate;
mod config;
mod layout;
pub mod manual;
mod store;

pub use crate::aggregate::*;
pub use crate::config::*;
pub use crate::layout::*;
pub use crate::store::*;

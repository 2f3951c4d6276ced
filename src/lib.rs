//! An ordered map on a probabilistic skip list.
//!
//! [`SkipList`] keeps its entries sorted by key and offers expected O(log n)
//! lookup, insert and remove without any rebalancing. Besides the usual map
//! operations it hands out [`Cursor`]s that walk the entries in either
//! direction.
//!
//! ```
//! use skiplist::{Config, SkipList};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let config = Config::default().with_max_level(8).with_skip_probability(0.25);
//! let mut list = SkipList::with_rng(config, StdRng::seed_from_u64(7))?;
//! list.insert("b", 2);
//! list.insert("a", 1);
//! assert_eq!(list.find(&"b").value(), Some(&2));
//! assert_eq!(list.iter().collect::<Vec<_>>(), vec![(&"a", &1), (&"b", &2)]);
//! # Ok::<(), skiplist::ConfigError>(())
//! ```
//!
//! The list is single threaded: every mutation takes `&mut self`, so sharing
//! one between threads needs an outer lock.

mod config;
mod cursor;
mod error;
mod level;
mod skiplist;

pub use crate::config::Config;
pub use crate::cursor::{Cursor, CursorMut};
pub use crate::error::ConfigError;
pub use crate::skiplist::{IntoIter, Iter, Keys, SkipList, Values};

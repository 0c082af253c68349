//! Spy Party library - terminal front end for the spy party game
//!
//! The game rules live in [`spy_core`]; this crate wires a session to
//! persistent storage, configuration and a line-oriented console.
//!
//! # Architecture
//!
//! - **Config**: TOML configuration with defaults for every field
//! - **Store**: key-value snapshot storage (files or memory)
//! - **Party**: the authoritative session, saved after every accepted event
//! - **Console**: renders views and maps typed input to core events
//!
//! # Example
//!
//! ```
//! use spy_core::{Dealer, Event, ScriptedEntropy, View, WordBank, STORAGE_KEY};
//! use spy_party::{MemoryStore, Party};
//!
//! let dealer = Dealer::new(WordBank::default(), ScriptedEntropy::new(vec![0]));
//! let mut party = Party::open(MemoryStore::new(), STORAGE_KEY, dealer);
//! let state = party
//!     .dispatch(Event::SubmitRoster { names: "Ana, Luis, Sofía".into() })
//!     .unwrap();
//! assert_eq!(*state.view(), View::PlayerPreview);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod console;
mod party;
mod render;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, PartyConfig};

// Crate-level exports - Console front end
pub use console::Console;
pub use render::{QUIT_COMMAND, render, scoreboard};

// Crate-level exports - Session wiring
pub use party::Party;

// Crate-level exports - Storage
pub use store::{FileStore, MemoryStore, SnapshotStore, StoreError};

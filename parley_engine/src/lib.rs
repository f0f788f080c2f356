#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const PARLEY_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod config;
pub mod demo;
pub mod immutable;
pub mod interaction;
pub mod lookup;
pub mod markup;
pub mod output;
pub mod repl;
pub mod resolver;
pub mod room;
pub mod store;
pub mod style;
pub mod thing;
pub mod validate;
pub mod value;
pub mod verbs;
pub mod world;

// Re-exports for convenience
pub use config::{EngineConfig, FallbackMessages, load_config};
pub use interaction::Interaction;
pub use lookup::{find_candidates, normalize_key};
pub use output::{Derive, Output, merge, process_output};
pub use parley_data::{Action, ActionResult, Sentence, Session, SessionDiff, VerbName};
pub use repl::run_repl;
pub use resolver::Resolver;
pub use room::{Phrase, Room};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
pub use thing::{Handler, Keyed, Reaction, Thing};
pub use validate::{ValidationError, ensure_valid, validate_world};
pub use value::Value;
pub use verbs::{VerbHandler, VerbTable};
pub use world::{Effect, World};

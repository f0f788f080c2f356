//! Shared wire and session model for Parley.
//!
//! Endpoint adapters only need this crate to speak to the engine: an inbound [`Action`],
//! the outbound [`ActionResult`], and the persisted [`Session`] with its [`SessionDiff`].

pub mod action;
pub mod session;

pub use action::{Action, ActionResult, Sentence, VerbName};
pub use session::{Flags, IdSet, Session, SessionDiff};

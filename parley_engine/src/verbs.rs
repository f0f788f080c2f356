//! Built-in verbs and the verb table.
//!
//! Every [`VerbName`] maps to one [`VerbHandler`]. Movement, inventory and the system verbs
//! have handlers of their own; the rest are [`Interaction`]s that differ only in wording and
//! in the custom fallback they use.

pub mod inventory;
pub mod look;
pub mod movement;
pub mod system;

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parley_data::{Sentence, Session, VerbName};

use crate::config::EngineConfig;
use crate::interaction::Interaction;
use crate::output::Output;
use crate::world::World;

pub use inventory::{ExitList, Inventory, exits_listing, inventory_listing, join_list};
pub use look::look_around;
pub use movement::{Movement, MoveToward, go};
pub use system::{Fallback, Idle, Restart};

/// Turns a sentence into an output tree for one verb.
pub trait VerbHandler: Send + Sync {
    /// `None` means the verb had nothing at all to say; the resolver apologizes.
    fn handle(&self, session: &Session, world: &World, sentence: &Sentence) -> Option<Output>;
}

impl<F> VerbHandler for F
where
    F: Fn(&Session, &World, &Sentence) -> Option<Output> + Send + Sync,
{
    fn handle(&self, session: &Session, world: &World, sentence: &Sentence) -> Option<Output> {
        self(session, world, sentence)
    }
}

/// The fixed verb-name to handler table, built once at startup.
#[derive(Clone, Default)]
pub struct VerbTable {
    handlers: HashMap<VerbName, Arc<dyn VerbHandler>>,
}

impl VerbTable {
    pub fn new() -> VerbTable {
        VerbTable::default()
    }

    /// Every verb with its stock handler and wording.
    pub fn standard(config: &EngineConfig) -> VerbTable {
        let table = VerbTable::new()
            .with(VerbName::Move, Movement)
            .with(VerbName::MoveTo, MoveToward)
            .with(VerbName::Inventory, Inventory)
            .with(VerbName::Exits, ExitList)
            .with(VerbName::Restart, Restart)
            .with(VerbName::Idle, Idle::default())
            .with(VerbName::Fallback, Fallback::new(config.fallback.clone()))
            .with(
                VerbName::Attack,
                Interaction::new(VerbName::Attack)
                    .failing("Violence won't help with the {subject}.")
                    .failing_together("Hitting the {subject} with the {object} gets you nowhere."),
            )
            .with(
                VerbName::Give,
                Interaction::new(VerbName::Give)
                    .failing("Who would you give the {subject} to?")
                    .failing_together("The {object} doesn't want the {subject}."),
            )
            .with(VerbName::Open, Interaction::new(VerbName::Open).failing("The {subject} won't open."))
            .with(VerbName::Close, Interaction::new(VerbName::Close).failing("The {subject} won't close."))
            .with(VerbName::Take, Interaction::new(VerbName::Take).failing("You can't take the {subject}."))
            .with(VerbName::Eat, Interaction::new(VerbName::Eat).failing("The {subject} doesn't look edible."))
            .with(
                VerbName::Talk,
                Interaction::new(VerbName::Talk)
                    .failing("The {subject} has nothing to say.")
                    .failing_together("The {subject} has nothing to say about the {object}."),
            )
            .with(
                VerbName::Use,
                Interaction::new(VerbName::Use)
                    .failing("You can't think of a way to use the {subject}.")
                    .failing_together("You can't use the {subject} with the {object}.")
                    .with_exits(),
            )
            .with(
                VerbName::Tie,
                Interaction::new(VerbName::Tie)
                    .failing("What do you want to tie the {subject} to?")
                    .failing_together("You can't tie those together."),
            )
            .with(VerbName::Untie, Interaction::new(VerbName::Untie).failing("The {subject} isn't tied to anything."))
            .with(VerbName::Light, Interaction::new(VerbName::Light).failing("The {subject} won't light."))
            .with(
                VerbName::Look,
                Interaction::new(VerbName::Look)
                    .failing("You see nothing special about the {subject}.")
                    .fallback(look_around),
            );
        debug!("standard verb table built with {} verbs", table.handlers.len());
        table
    }

    /// Register (or replace) the handler for `verb`.
    #[must_use]
    pub fn with(mut self, verb: VerbName, handler: impl VerbHandler + 'static) -> VerbTable {
        self.handlers.insert(verb, Arc::new(handler));
        self
    }

    pub fn get(&self, verb: VerbName) -> Option<&dyn VerbHandler> {
        self.handlers.get(&verb).map(|handler| handler.as_ref())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

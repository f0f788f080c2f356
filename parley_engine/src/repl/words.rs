//! Word splitter for the terminal.
//!
//! Turning free text into a sentence is not the engine's job; voice front ends get that from
//! their intent extractor. For the REPL a much cruder splitter is enough: the first word picks
//! the verb, a preposition splits the rest into subject and object.

use parley_data::{Sentence, VerbName};

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Act(VerbName, Sentence),
    Help,
    Quit,
}

const DIRECTIONS: &[&str] = &[
    "north", "south", "east", "west", "northeast", "northwest", "southeast", "southwest", "up", "down", "n", "s", "e",
    "w", "ne", "nw", "se", "sw", "u", "d", "back",
];

const SPLITTERS: &[&str] = &["to", "with", "on", "at", "from", "into", "onto", "using"];

const LEADING_FILLER: &[&str] = &["at", "to", "up", "with", "around"];

fn verb_for(word: &str) -> Option<VerbName> {
    let verb = match word {
        "go" | "walk" | "move" | "head" | "run" => VerbName::Move,
        "enter" | "goto" => VerbName::MoveTo,
        "i" | "inv" | "inventory" => VerbName::Inventory,
        "exits" => VerbName::Exits,
        "restart" => VerbName::Restart,
        "wait" | "z" => VerbName::Idle,
        "attack" | "hit" | "kick" | "punch" => VerbName::Attack,
        "give" | "hand" | "offer" => VerbName::Give,
        "open" => VerbName::Open,
        "close" | "shut" => VerbName::Close,
        "take" | "get" | "grab" | "pick" => VerbName::Take,
        "eat" | "taste" => VerbName::Eat,
        "talk" | "speak" | "chat" | "ask" => VerbName::Talk,
        "use" => VerbName::Use,
        "tie" | "attach" => VerbName::Tie,
        "untie" | "detach" => VerbName::Untie,
        "light" | "ignite" => VerbName::Light,
        "look" | "l" | "examine" | "x" | "inspect" | "read" => VerbName::Look,
        _ => return None,
    };
    Some(verb)
}

/// Split a typed line into a verb and sentence.
pub fn parse_line(line: &str) -> Input {
    let lowered = line.trim().to_lowercase();
    let words = lowered.split_whitespace().collect::<Vec<_>>();
    match words.as_slice() {
        ["quit" | "q"] => Input::Quit,
        ["help" | "?"] => Input::Help,
        [] => Input::Act(VerbName::Idle, Sentence::new()),
        [direction] if DIRECTIONS.contains(direction) => Input::Act(VerbName::Move, Sentence::about(*direction)),
        ["go" | "walk" | "head", "to" | "into", rest @ ..] if !rest.is_empty() => {
            Input::Act(VerbName::MoveTo, Sentence::about(rest.join(" ")).spoken_as("go"))
        },
        [first, rest @ ..] => {
            let sentence = split_rest(rest).spoken_as(*first);
            match verb_for(first) {
                Some(verb) => Input::Act(verb, sentence),
                None => Input::Act(VerbName::Fallback, sentence),
            }
        },
    }
}

fn split_rest(rest: &[&str]) -> Sentence {
    let mut rest = rest;
    while let [first, tail @ ..] = rest
        && LEADING_FILLER.contains(first)
    {
        rest = tail;
    }
    if rest.is_empty() {
        return Sentence::new();
    }

    match rest.iter().position(|word| SPLITTERS.contains(word)) {
        Some(at) if at > 0 && at + 1 < rest.len() => Sentence::pair(rest[..at].join(" "), rest[at + 1..].join(" ")),
        _ => Sentence::about(rest.join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act(line: &str) -> (VerbName, Sentence) {
        match parse_line(line) {
            Input::Act(verb, sentence) => (verb, sentence),
            other => panic!("expected an action, got {other:?}"),
        }
    }

    #[test]
    fn directions_alone_move() {
        let (verb, sentence) = act("N");
        assert_eq!(verb, VerbName::Move);
        assert_eq!(sentence.subject.as_deref(), Some("n"));
    }

    #[test]
    fn prepositions_split_subject_and_object() {
        let (verb, sentence) = act("give the salted fish to the cat");
        assert_eq!(verb, VerbName::Give);
        assert_eq!(sentence.subject.as_deref(), Some("the salted fish"));
        assert_eq!(sentence.object.as_deref(), Some("the cat"));
        assert_eq!(sentence.verb.as_deref(), Some("give"));
    }

    #[test]
    fn filler_words_are_dropped() {
        assert_eq!(act("look at the lamp").1, Sentence::about("the lamp").spoken_as("look"));
        assert_eq!(act("pick up lamp").1, Sentence::about("lamp").spoken_as("pick"));
        assert_eq!(act("talk to cat").1, Sentence::about("cat").spoken_as("talk"));
        assert_eq!(act("look around").1, Sentence::new().spoken_as("look"));
    }

    #[test]
    fn go_to_means_move_to() {
        let (verb, sentence) = act("go to the kitchen");
        assert_eq!(verb, VerbName::MoveTo);
        assert_eq!(sentence.subject.as_deref(), Some("the kitchen"));
    }

    #[test]
    fn unknown_verbs_fall_back() {
        let (verb, sentence) = act("climb down");
        assert_eq!(verb, VerbName::Fallback);
        assert_eq!(sentence.verb.as_deref(), Some("climb"));
        assert_eq!(sentence.subject.as_deref(), Some("down"));
    }

    #[test]
    fn control_words() {
        assert_eq!(parse_line("quit"), Input::Quit);
        assert_eq!(parse_line(" ? "), Input::Help);
        assert_eq!(parse_line("   "), Input::Act(VerbName::Idle, Sentence::new()));
    }
}

use parley_engine::demo::{DEMO_WORLD, demo_world};
use parley_engine::{
    Action, ActionResult, EngineConfig, FileStore, MemoryStore, Output, Resolver, Sentence, Session, SessionStore,
    VerbName, VerbTable, World,
};

fn resolver() -> Resolver<MemoryStore> {
    let config = EngineConfig::default();
    Resolver::new(MemoryStore::new().with_world(demo_world()), VerbTable::standard(&config), config)
}

fn act<S: SessionStore>(resolver: &Resolver<S>, kind: VerbName, sentence: Sentence) -> ActionResult {
    resolver.resolve_action(&Action::new("player", kind, sentence)).unwrap()
}

fn session<S: SessionStore>(resolver: &Resolver<S>) -> Session {
    resolver.store().get_session("player").unwrap().unwrap()
}

fn speak(text: &str) -> String {
    format!("<speak>{text}</speak>")
}

#[test]
fn fallback_escalates_to_a_hint() {
    let resolver = resolver();
    let expected = [
        ("You can't do that", "1"),
        ("You can't do that", "2"),
        ("I don't understand that", "3"),
        ("Try simple sentences with verbs like move, take, look, talk, and use.", "3"),
    ];
    for (message, tries) in expected {
        let result = act(&resolver, VerbName::Fallback, Sentence::new());
        assert_eq!(result.message, speak(message));
        assert_eq!(session(&resolver).flag("tries"), Some(tries));
    }
    assert_eq!(session(&resolver).failures, 4);
}

#[test]
fn handler_markup_is_not_doubled() {
    let resolver = resolver().with_idle_handler(|_: &Session, _: &World, _: &Sentence| {
        Some(Output::say("<speak>Still <speak>here</speak>?</speak>"))
    });
    let result = act(&resolver, VerbName::Idle, Sentence::new());
    assert_eq!(result.message, speak("Still here?"));
}

#[test]
fn moving_north_and_back() {
    let resolver = resolver();
    let result = act(&resolver, VerbName::Move, Sentence::about("north"));
    assert!(result.message.starts_with("<speak>A warm kitchen."));
    assert!(result.message.contains("The cat opens one eye and watches you."));

    let state = session(&resolver);
    assert_eq!(state.room, "kitchen");
    assert!(state.has_seen("pantry") && state.has_seen("kitchen"));
    assert_eq!(state.came_from.as_deref(), Some("south"));

    let result = act(&resolver, VerbName::Move, Sentence::about("back"));
    assert_eq!(result.message, speak("You're back in the pantry."));
    assert_eq!(session(&resolver).room, "pantry");
}

#[test]
fn moving_without_a_direction_from_a_single_exit() {
    let explicit = act(&resolver(), VerbName::Move, Sentence::about("north"));
    let implicit = act(&resolver(), VerbName::Move, Sentence::new());
    assert_eq!(explicit, implicit);
}

#[test]
fn cellar_is_locked_without_a_lit_lamp() {
    let resolver = resolver();
    act(&resolver, VerbName::Move, Sentence::about("north"));
    let result = act(&resolver, VerbName::Move, Sentence::about("down"));
    assert_eq!(result.message, speak("It's too dark to go down there without a light."));
    assert!(result.update.is_none());
    assert_eq!(session(&resolver).room, "kitchen");
}

#[test]
fn canned_phrases_move_the_player() {
    let resolver = resolver();
    act(&resolver, VerbName::Move, Sentence::about("north"));
    let result = act(&resolver, VerbName::Fallback, Sentence::about("down").spoken_as("climb"));
    assert_eq!(result.message, speak("It's too dark to go down there without a light."));
    assert_eq!(session(&resolver).flag("tries"), None);
}

#[test]
fn any_key_answers_what_no_specific_key_covers() {
    let resolver = resolver();
    act(&resolver, VerbName::Take, Sentence::about("the lamp"));
    act(&resolver, VerbName::Move, Sentence::about("north"));
    let result = act(&resolver, VerbName::Give, Sentence::pair("lamp", "cat"));
    assert_eq!(result.message, speak("The cat sniffs it and looks away."));
}

#[test]
fn restart_puts_everything_back() {
    let resolver = resolver();
    act(&resolver, VerbName::Take, Sentence::about("lamp"));
    act(&resolver, VerbName::Move, Sentence::about("north"));
    act(&resolver, VerbName::Fallback, Sentence::new());

    let result = act(&resolver, VerbName::Restart, Sentence::new());
    assert!(result.message.contains("cramped pantry"));
    assert_eq!(session(&resolver), Session::new("player", DEMO_WORLD, "pantry"));
}

#[test]
fn full_playthrough_ends_the_conversation() {
    let resolver = resolver();

    let take = act(&resolver, VerbName::Take, Sentence::about("the lamp"));
    assert_eq!(take.message, speak("You pick up the brass lamp."));
    let light = act(&resolver, VerbName::Use, Sentence::about("it"));
    assert_eq!(light.message, speak("The wick catches and the lamp glows warmly."));
    assert!(session(&resolver).has_effect("lamplight"));

    let kitchen = act(&resolver, VerbName::Move, Sentence::about("n"));
    assert!(kitchen.message.ends_with("Your lamp throws long shadows.</speak>"));

    let cellar = act(&resolver, VerbName::MoveTo, Sentence::about("the trapdoor"));
    assert!(cellar.message.contains("<audio src=\"https://sounds.parley.invalid/drip.mp3\"/>"));
    assert_eq!(session(&resolver).room, "cellar");

    act(&resolver, VerbName::Take, Sentence::about("fish"));
    act(&resolver, VerbName::Move, Sentence::about("up"));
    let inventory = act(&resolver, VerbName::Inventory, Sentence::new());
    assert_eq!(inventory.message, speak("You're carrying a salted fish and a brass lamp."));

    let give = act(&resolver, VerbName::Give, Sentence::pair("the fish", "the cat"));
    assert_eq!(give.message, speak("The cat devours the fish and starts to purr."));
    assert!(!session(&resolver).carries("fish"));

    let talk = act(&resolver, VerbName::Talk, Sentence::about("cat"));
    assert!(talk.close);
    assert_eq!(
        talk.message,
        speak("The cat purrs and settles down to sleep. Thanks for playing!")
    );
}

#[test]
fn file_store_keeps_sessions_between_resolvers() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::default();

    let first = Resolver::new(
        FileStore::new(dir.path()).with_world(demo_world()),
        VerbTable::standard(&config),
        config.clone(),
    );
    act(&first, VerbName::Take, Sentence::about("lamp"));
    act(&first, VerbName::Move, Sentence::about("north"));

    let second = Resolver::new(
        FileStore::new(dir.path()).with_world(demo_world()),
        VerbTable::standard(&config),
        config,
    );
    let restored = session(&second);
    assert_eq!(restored.room, "kitchen");
    assert!(restored.carries("lamp"));

    let result = act(&second, VerbName::Move, Sentence::about("south"));
    assert_eq!(result.message, speak("You're back in the pantry."));
}

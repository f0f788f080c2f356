#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Parley **
//! Conversational interactive fiction engine

use parley_engine::config::config_path;
use parley_engine::demo::demo_world;
use parley_engine::repl::run_json_lines;
use parley_engine::style::GameStyle;
use parley_engine::{
    EngineConfig, FileStore, MemoryStore, PARLEY_VERSION, Resolver, SessionStore, VerbTable, ensure_valid,
    load_config, run_repl,
};

use anyhow::{Context, Result, bail};
use log::info;
use uuid::Uuid;

const USAGE: &str = "usage: parley [--json] [--session <id>]

  --json            read Action JSON lines on stdin, write ActionResult JSON lines on stdout
  --session <id>    play as this session id (default: a fresh random id)

Settings are read from parley.toml, or from the file named by $PARLEY_CONFIG.";

struct Options {
    json: bool,
    session: Option<String>,
}

fn parse_args() -> Result<Option<Options>> {
    let mut options = Options {
        json: false,
        session: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--session" => {
                let id = args.next().context("--session needs an id")?;
                options.session = Some(id);
            },
            "--help" | "-h" => {
                println!("{USAGE}");
                return Ok(None);
            },
            "--version" | "-V" => {
                println!("parley {PARLEY_VERSION}");
                return Ok(None);
            },
            other => bail!("unknown argument '{other}'\n\n{USAGE}"),
        }
    }
    Ok(Some(options))
}

fn run<S: SessionStore>(resolver: &Resolver<S>, options: &Options) -> Result<()> {
    if options.json {
        info!("answering JSON lines on stdin");
        let stdin = std::io::stdin();
        return run_json_lines(resolver, stdin.lock(), std::io::stdout().lock());
    }

    let session_id = options.session.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    println!("{}", format!("PARLEY {PARLEY_VERSION}: THE COTTAGE").title_style());
    println!("{}", "Type \"help\" for a few pointers.".hint_style());
    run_repl(resolver, &session_id)
}

fn main() -> Result<()> {
    env_logger::init();
    let Some(options) = parse_args()? else {
        return Ok(());
    };

    let config: EngineConfig = load_config(&config_path());
    let world = demo_world();
    ensure_valid(&world).context("while checking the demo world")?;
    info!("demo world '{}' ready", world.id);

    let verbs = VerbTable::standard(&config);
    match config.session_dir.clone() {
        Some(dir) => {
            info!("saving sessions under '{}'", dir.display());
            let store = FileStore::new(dir).with_world(world);
            run(&Resolver::new(store, verbs, config), &options)
        },
        None => {
            let store = MemoryStore::new().with_world(world);
            run(&Resolver::new(store, verbs, config), &options)
        },
    }
}

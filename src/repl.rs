use anyhow::{Result, anyhow};
use std::io::{BufRead, Write};
use tracing::{info, warn};

use crate::catalog::ModelCatalog;
use crate::console::Console;
use crate::credential::{self, Credential};
use crate::model_gateway::ModelGateway;
use crate::selection::{EXIT_COMMAND, choose_model};
use crate::session::Session;

const CHANGE_MODEL_COMMAND: &str = "/change";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Empty,
    Exit,
    ChangeModel,
    Prompt(&'a str),
}

pub fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        Command::Empty
    } else if line.eq_ignore_ascii_case(EXIT_COMMAND) {
        Command::Exit
    } else if line.eq_ignore_ascii_case(CHANGE_MODEL_COMMAND) {
        Command::ChangeModel
    } else {
        Command::Prompt(line)
    }
}

fn say_goodbye<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<()> {
    console.say("Exiting... Goodbye!")
}

/// Fetches the catalog once. Failures are reported on the console and
/// resolve to an empty catalog.
async fn fetch_catalog<G, R, W>(
    gateway: &G,
    credential: &Credential,
    console: &mut Console<R, W>,
) -> Result<ModelCatalog>
where
    G: ModelGateway + ?Sized,
    R: BufRead,
    W: Write,
{
    match gateway.list_models(credential).await {
        Ok(catalog) => {
            info!(model_count = catalog.len(), "fetched model catalog");
            Ok(catalog)
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "model catalog fetch failed");
            console.say(format!("Error fetching models: {err:#}"))?;
            Ok(ModelCatalog::default())
        }
    }
}

pub async fn run_repl<G, R, W>(gateway: &G, console: &mut Console<R, W>) -> Result<()>
where
    G: ModelGateway + ?Sized,
    R: BufRead,
    W: Write,
{
    console.say("Groq AI CLI\n")?;

    let Some(credential) = credential::acquire(console)? else {
        return say_goodbye(console);
    };

    let catalog = fetch_catalog(gateway, &credential, console).await?;
    if catalog.is_empty() {
        console.say("No models found or failed to fetch models.")?;
        return Ok(());
    }

    let Some(model_id) = choose_model(console, &catalog)? else {
        return say_goodbye(console);
    };
    let mut session = Session::start(credential, catalog, model_id)
        .ok_or_else(|| anyhow!("selected model is missing from the catalog"))?;

    console.say("\nType your prompt and press Enter to get a response.")?;
    console.say("Type '/change' to change AI model, or '/exit' to quit.\n")?;

    loop {
        let Some(line) = console.prompt("> ")? else {
            break;
        };

        match parse_command(&line) {
            Command::Empty => continue,
            Command::Exit => break,
            Command::ChangeModel => {
                let switched = choose_model(console, session.catalog())?
                    .is_some_and(|model_id| session.switch_model(model_id));
                let outcome = if switched { "Switched to" } else { "Keeping" };
                console.say(format!("{outcome} model: {}\n", session.current_model()))?;
            }
            Command::Prompt(prompt) => {
                console.say("\n⏳ Generating response...\n")?;
                let reply = gateway
                    .generate(session.credential(), session.current_model(), prompt)
                    .await;
                console.say("✅ Response:\n")?;
                console.say(&reply)?;
                console.say("\n---\n")?;
            }
        }
    }

    say_goodbye(console)
}

//! Terminal front end for generating and editing AI slide decks.

mod deck_view;
mod prompt_view;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deck_core::render::render_slide_body;
use deck_core::{DeckStore, FileStore};
use deck_generator::GenerationClient;
use deck_view::{show_empty_state, DeckExit, DeckView};
use prompt_view::PromptView;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate a slide deck from a prompt, then browse and edit it.
#[derive(Parser, Debug)]
#[command(name = "deck-builder")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the saved deck
    #[arg(long, global = true, env = "DECK_BUILDER_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe a deck and generate it
    Prompt {
        /// Prompt text; reads prompts interactively when omitted
        text: Option<String>,

        /// Open the deck view after a deck is generated
        #[arg(short, long)]
        open: bool,
    },

    /// Browse and edit the saved deck
    Deck,

    /// Print the saved deck
    Show {
        /// Only print this slide (1-based)
        #[arg(short, long)]
        slide: Option<usize>,

        /// Print the stored JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// The two views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Prompt,
    Deck,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let store_dir = store_dir(args.store_dir);
    log::debug!("Using store directory {}", store_dir.display());
    let store = DeckStore::new(FileStore::new(store_dir));

    match args.command {
        Command::Prompt { text, open } => {
            // Missing endpoint or key fails here, before any request is made.
            let client = match GenerationClient::from_env() {
                Ok(client) => client,
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
            };

            match text {
                Some(text) => {
                    let view = PromptView::new(&client, &store);
                    let generated = view
                        .report(view.submit(&text), &mut io::stdout().lock())
                        .context("Failed to write output")?;

                    match generated {
                        Some(_) if open => navigate(Route::Deck, &store, Some(client)),
                        Some(_) => Ok(ExitCode::SUCCESS),
                        None => Ok(ExitCode::FAILURE),
                    }
                }
                None if open => navigate(Route::Prompt, &store, Some(client)),
                None => {
                    let view = PromptView::new(&client, &store);
                    view.run(io::stdin().lock(), io::stdout().lock())
                        .context("Prompt view failed")?;
                    Ok(ExitCode::SUCCESS)
                }
            }
        }
        Command::Deck => navigate(Route::Deck, &store, None),
        Command::Show { slide, json } => show(&store, slide, json),
    }
}

/// Move between the prompt and deck views until the user quits.
///
/// Without a client, one is built from the environment the first time the
/// prompt view is entered; a missing endpoint or key is reported there.
fn navigate(
    mut route: Route,
    store: &DeckStore<FileStore>,
    mut client: Option<GenerationClient>,
) -> Result<ExitCode> {
    loop {
        route = match route {
            Route::Prompt => {
                let client = match ensure_client(&mut client, GenerationClient::from_env) {
                    Ok(client) => client,
                    Err(e) => {
                        eprintln!("{}", e);
                        return Ok(ExitCode::FAILURE);
                    }
                };
                let view = PromptView::new(client, store);
                match view
                    .run(io::stdin().lock(), io::stdout().lock())
                    .context("Prompt view failed")?
                {
                    Some(_) => Route::Deck,
                    None => return Ok(ExitCode::SUCCESS),
                }
            }
            Route::Deck => {
                let Some(mut view) = DeckView::open(store.clone()) else {
                    show_empty_state(io::stdout().lock())?;
                    return Ok(ExitCode::FAILURE);
                };
                match view
                    .run(io::stdin().lock(), io::stdout().lock())
                    .context("Deck view failed")?
                {
                    DeckExit::Quit => return Ok(ExitCode::SUCCESS),
                    DeckExit::BackToPrompt => Route::Prompt,
                }
            }
        };
    }
}

/// Return the client in `slot`, building it with `make` if there is none yet.
fn ensure_client<F>(
    slot: &mut Option<GenerationClient>,
    make: F,
) -> deck_core::Result<&GenerationClient>
where
    F: FnOnce() -> deck_core::Result<GenerationClient>,
{
    if let Some(client) = slot.take() {
        return Ok(slot.insert(client));
    }
    Ok(slot.insert(make()?))
}

/// Print the stored deck without entering the interactive view.
fn show(store: &DeckStore<FileStore>, slide: Option<usize>, json: bool) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();

    let Some(deck) = store.load().filter(|d| !d.is_empty()) else {
        show_empty_state(&mut stdout)?;
        return Ok(ExitCode::FAILURE);
    };

    if json {
        let text = serde_json::to_string_pretty(&deck).context("Failed to serialize deck")?;
        writeln!(stdout, "{}", text)?;
        return Ok(ExitCode::SUCCESS);
    }

    match slide {
        Some(number) => {
            let Some(s) = number.checked_sub(1).and_then(|idx| deck.slide(idx)) else {
                eprintln!("Slide {} does not exist (deck has {} slides)", number, deck.len());
                return Ok(ExitCode::FAILURE);
            };
            write!(stdout, "{}", render_slide_body(s))?;
        }
        None => {
            writeln!(stdout, "{}\n", deck.title)?;
            for (idx, s) in deck.slides.iter().enumerate() {
                writeln!(stdout, "--- Slide {} of {} ---", idx + 1, deck.len())?;
                writeln!(stdout, "{}", render_slide_body(s))?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolve the store directory: flag or env, else the platform data dir.
fn store_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| dirs::data_dir().map(|d| d.join("deck-builder")))
        .unwrap_or_else(|| PathBuf::from(".deck-builder"))
}

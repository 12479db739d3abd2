//! Deck view: show one slide at a time, navigate and edit in place.

use deck_core::render::{render_empty_state, render_slide, render_strip};
use deck_core::{DeckSession, DeckStore, EditField, KeyValueStore};
use std::io::{self, BufRead, Lines, Write};

/// Line that ends a multi-line content block.
const BLOCK_TERMINATOR: &str = ".";

const HELP: &str = "\
Commands:
  n, next          next slide          (also: l, right)
  p, prev          previous slide      (also: h, left)
  <N>, g <N>       jump to slide N
  e, edit          toggle edit mode
  t <text>         set slide title     (edit mode)
  c [text]         set slide content   (edit mode; without text, read lines until '.')
  d <text>         set deck title      (edit mode)
  s, slides        show all slides
  b, back          back to the prompt
  q, quit          quit
  ?, help          show this help";

/// How the user left the deck view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckExit {
    /// Quit or end of input.
    Quit,
    /// Asked to return to the prompt view.
    BackToPrompt,
}

/// A parsed deck view command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Next,
    Previous,
    JumpTo(usize),
    ToggleEdit,
    SlideTitle(String),
    SlideContent(Option<String>),
    DeckTitle(String),
    Strip,
    Back,
    Quit,
    Help,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        if let Ok(n) = word.parse::<usize>() {
            return Some(jump(n));
        }

        let command = match word.to_lowercase().as_str() {
            "n" | "next" | "l" | "right" => Self::Next,
            "p" | "prev" | "previous" | "h" | "left" => Self::Previous,
            "g" | "go" => match rest.parse::<usize>() {
                Ok(n) => jump(n),
                Err(_) => Self::Unknown(line.to_string()),
            },
            "e" | "edit" => Self::ToggleEdit,
            "t" | "title" => Self::SlideTitle(rest.to_string()),
            "c" | "content" if rest.is_empty() => Self::SlideContent(None),
            "c" | "content" => Self::SlideContent(Some(rest.to_string())),
            "d" | "deck" => Self::DeckTitle(rest.to_string()),
            "s" | "slides" => Self::Strip,
            "b" | "back" => Self::Back,
            "q" | "quit" | "exit" => Self::Quit,
            "?" | "help" => Self::Help,
            _ => Self::Unknown(line.to_string()),
        };
        Some(command)
    }
}

/// Slide numbers are 1-based on screen; 0 maps to an index past the end.
fn jump(n: usize) -> Command {
    Command::JumpTo(n.checked_sub(1).unwrap_or(usize::MAX))
}

/// The deck view over a loaded session.
pub struct DeckView<S> {
    session: DeckSession<S>,
}

impl<S: KeyValueStore> DeckView<S> {
    /// Load the stored deck. `None` means the empty state should be shown.
    pub fn open(store: DeckStore<S>) -> Option<Self> {
        DeckSession::load(store).map(|session| Self { session })
    }

    /// The underlying session.
    pub fn session(&self) -> &DeckSession<S> {
        &self.session
    }

    /// Process commands until the user quits, goes back, or input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<DeckExit> {
        let mut lines = input.lines();
        self.show(&mut output)?;

        loop {
            write!(output, "> ")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                return Ok(DeckExit::Quit);
            };
            let Some(command) = Command::parse(&line?) else {
                continue;
            };

            match command {
                Command::Quit => return Ok(DeckExit::Quit),
                Command::Back => return Ok(DeckExit::BackToPrompt),
                Command::Help => writeln!(output, "{}", HELP)?,
                Command::Strip => {
                    let cursor = self.session.navigator().cursor();
                    writeln!(output, "{}", render_strip(self.session.deck(), cursor))?;
                }
                Command::Unknown(text) => {
                    writeln!(output, "Unknown command: {} (type ? for help)", text)?;
                }
                Command::Next => {
                    self.session.navigator_mut().next();
                    self.show(&mut output)?;
                }
                Command::Previous => {
                    self.session.navigator_mut().previous();
                    self.show(&mut output)?;
                }
                Command::JumpTo(index) => {
                    self.session.navigator_mut().jump_to(index);
                    self.show(&mut output)?;
                }
                Command::ToggleEdit => {
                    self.session.navigator_mut().toggle_edit();
                    self.show(&mut output)?;
                }
                Command::SlideTitle(text) => {
                    self.edit(EditField::SlideTitle, text, &mut output)?;
                }
                Command::DeckTitle(text) => {
                    self.edit(EditField::DeckTitle, text, &mut output)?;
                }
                Command::SlideContent(Some(text)) => {
                    self.edit(EditField::SlideContent, text, &mut output)?;
                }
                Command::SlideContent(None) => {
                    if !self.session.navigator().is_editing() {
                        writeln!(output, "Press e to edit the slide first.")?;
                        continue;
                    }
                    writeln!(output, "Enter content, end with a line containing only '.'")?;
                    output.flush()?;
                    let text = read_block(&mut lines)?;
                    self.edit(EditField::SlideContent, text, &mut output)?;
                }
            }
        }
    }

    fn edit<W: Write>(&mut self, field: EditField, text: String, output: &mut W) -> io::Result<()> {
        match self.session.edit(field, text) {
            Ok(()) => self.show(output),
            Err(deck_core::Error::NotEditing) => {
                writeln!(output, "Press e to edit the slide first.")
            }
            Err(e) => writeln!(output, "Could not save edit: {}", e),
        }
    }

    fn show<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let navigator = self.session.navigator();
        writeln!(output)?;
        write!(output, "{}", render_slide(self.session.deck(), navigator))?;
        writeln!(output)?;

        let mut hints = Vec::new();
        if !navigator.is_first() {
            hints.push("p: previous");
        }
        if !navigator.is_last() {
            hints.push("n: next");
        }
        hints.push(if navigator.is_editing() { "e: done editing" } else { "e: edit slide" });
        hints.push("?: help");
        writeln!(output, "{}", hints.join("  "))
    }
}

/// Read lines up to the block terminator (or end of input), joined with `\n`.
fn read_block<B: BufRead>(lines: &mut Lines<B>) -> io::Result<String> {
    let mut block = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim_end() == BLOCK_TERMINATOR {
            break;
        }
        block.push(line);
    }
    Ok(block.join("\n"))
}

/// Print the empty state shown when no deck is stored.
pub fn show_empty_state<W: Write>(mut output: W) -> io::Result<()> {
    write!(output, "{}", render_empty_state())?;
    writeln!(output, "Run `deck-builder prompt` to generate one.")
}

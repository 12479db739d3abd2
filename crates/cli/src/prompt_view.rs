//! Prompt view: collect a prompt, generate, normalize and persist a deck.

use deck_core::{Deck, DeckStore, Error, KeyValueStore, ResponseNormalizer, ResponseShape, Result};
use deck_generator::DeckGenerator;
use std::io::{self, BufRead, Write};

/// Message shown when a response yields no slides.
pub const NO_SLIDES_MESSAGE: &str = "No slides were generated. Please try a different prompt.";

/// Result of one prompt submission.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome {
    /// A deck was generated and saved.
    Generated(Deck),
    /// The response held no slides; nothing was saved.
    NoSlides {
        /// Error reported by the endpoint, if any.
        reason: Option<String>,
    },
}

/// The prompt entry view.
pub struct PromptView<'a, G, S> {
    generator: &'a G,
    store: &'a DeckStore<S>,
    normalizer: ResponseNormalizer,
}

impl<'a, G: DeckGenerator, S: KeyValueStore> PromptView<'a, G, S> {
    /// Create a view sending prompts through `generator` and saving into `store`.
    pub fn new(generator: &'a G, store: &'a DeckStore<S>) -> Self {
        Self {
            generator,
            store,
            normalizer: ResponseNormalizer::new(),
        }
    }

    /// Submit one prompt.
    ///
    /// Only a deck with at least one slide is saved; a miss leaves the
    /// stored deck untouched.
    pub fn submit(&self, prompt: &str) -> Result<PromptOutcome> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::EmptyPrompt);
        }

        let response = self.generator.generate(prompt)?;
        let deck = self.normalizer.normalize(&response);

        if deck.is_empty() {
            let reason = ResponseShape::classify(&response)
                .error_message()
                .map(str::to_string);
            log::debug!("No slides in response (reason={:?})", reason);
            return Ok(PromptOutcome::NoSlides { reason });
        }

        self.store.save(&deck)?;
        log::debug!("Saved deck {:?} with {} slides", deck.title, deck.len());
        Ok(PromptOutcome::Generated(deck))
    }

    /// Read prompts line by line until one produces a deck or input ends.
    ///
    /// Every failure is reported to `output` and the user may try again.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<Option<Deck>> {
        writeln!(output, "AI Deck Builder")?;
        writeln!(output, "Describe your deck idea and let AI help you build it.")?;

        let mut lines = input.lines();
        loop {
            write!(output, "\nDeck Prompt> ")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                return Ok(None);
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            writeln!(output, "Generating...")?;
            if let Some(deck) = self.report(self.submit(&line), &mut output)? {
                return Ok(Some(deck));
            }
        }
    }

    /// Print the outcome of a submission, returning the deck on success.
    pub fn report<W: Write>(
        &self,
        outcome: Result<PromptOutcome>,
        output: &mut W,
    ) -> io::Result<Option<Deck>> {
        match outcome {
            Ok(PromptOutcome::Generated(deck)) => {
                writeln!(
                    output,
                    "Generated \"{}\" with {} slide{}.",
                    deck.title,
                    deck.len(),
                    if deck.len() == 1 { "" } else { "s" }
                )?;
                Ok(Some(deck))
            }
            Ok(PromptOutcome::NoSlides { reason }) => {
                writeln!(output, "{}", NO_SLIDES_MESSAGE)?;
                if let Some(reason) = reason {
                    writeln!(output, "({})", reason)?;
                }
                Ok(None)
            }
            Err(e) => {
                writeln!(output, "Error generating deck: {}", e)?;
                Ok(None)
            }
        }
    }
}

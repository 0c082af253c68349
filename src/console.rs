//! Line-oriented terminal front end.
//!
//! Renders the current view, reads one line, and turns it into a core
//! [`Event`]. Rejected events print the error and leave the state alone.

use std::io::{self, BufRead, Write};

use derive_new::new;
use spy_core::{Entropy, Event, RevealCard, SessionState, Verdict, View};
use tracing::{debug, info, instrument};

use crate::render::{QUIT_COMMAND, render};
use crate::{Party, SnapshotStore};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Whether the loop keeps going after handling a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Drives a [`Party`] from text input.
#[derive(Debug, new)]
pub struct Console<R, W> {
    input: R,
    output: W,
    #[new(value = "false")]
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Clears the terminal whenever a card is hidden.
    pub fn with_clear_screen(self, clear_screen: bool) -> Self {
        Self {
            clear_screen,
            ..self
        }
    }

    /// Consumes the console, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user quits or input ends.
    #[instrument(skip(self, party))]
    pub fn run<S: SnapshotStore, E: Entropy>(&mut self, party: &mut Party<S, E>) -> io::Result<()> {
        info!("Console started");
        loop {
            write!(self.output, "{}", render(party.state(), party.words()))?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                debug!("Input closed");
                break;
            };
            if line == QUIT_COMMAND {
                break;
            }
            if self.handle(party, &line)? == Flow::Quit {
                break;
            }
        }
        writeln!(self.output, "\nSee you next time.")?;
        info!("Console stopped");
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{} ", prompt)?;
        self.output.flush()?;
        self.read_line()
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Ok(self
            .ask(&format!("{} [y/n]", prompt))?
            .is_some_and(|answer| is_yes(&answer)))
    }

    fn handle<S: SnapshotStore, E: Entropy>(
        &mut self,
        party: &mut Party<S, E>,
        line: &str,
    ) -> io::Result<Flow> {
        let view = *party.state().view();
        let event = match view {
            View::Setup => Some(Event::SubmitRoster {
                names: line.to_string(),
            }),
            View::PlayerPreview => match line {
                "y" | "Y" | "" => Some(Event::ConfirmRoster),
                "e" | "E" => Some(Event::EditRoster),
                _ => None,
            },
            View::WordSelect => Some(Event::SelectWord {
                word: line.to_string(),
            }),
            View::Reveal => Some(Event::RevealNext),
            View::InProgress => Some(Event::EndRound),
            View::Results => self.collect_verdict(party.state(), line)?,
            View::Leaderboard => match line {
                "n" | "N" => Some(Event::NewRound),
                "e" | "E" => {
                    let reset = self.confirm("Edit players. Reset all scores to 0?")?;
                    Some(Event::EditWithResetChoice { reset })
                }
                "r" | "R" => {
                    if !self.confirm("Erase all history and scores?")? {
                        return Ok(Flow::Continue);
                    }
                    Some(Event::FullReset)
                }
                "q" | "Q" => return Ok(Flow::Quit),
                _ => None,
            },
        };

        let Some(event) = event else {
            writeln!(self.output, "Unrecognized choice: {:?}", line)?;
            return Ok(Flow::Continue);
        };

        let hides_card = view == View::Reveal
            && party
                .state()
                .reveal_card()
                .is_some_and(|card| !matches!(card, RevealCard::FaceDown { .. }));

        match party.dispatch(event) {
            Ok(_) if hides_card && self.clear_screen => write!(self.output, "{}", CLEAR_SCREEN)?,
            Ok(_) => {}
            Err(e) => writeln!(self.output, "! {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn collect_verdict(&mut self, state: &SessionState, line: &str) -> io::Result<Option<Event>> {
        let verdict = match line.parse::<usize>() {
            Ok(0) => Some(Verdict::Nobody),
            Ok(n) => state
                .players()
                .get(n - 1)
                .map(|p| Verdict::Accused(*p.id())),
            Err(_) => None,
        };
        // Without a verdict the core rejects the settlement anyway.
        let spy_guessed = match verdict {
            Some(_) => self.confirm("2. Did the spy guess the word?")?,
            None => false,
        };

        Ok(Some(Event::SettleRound {
            verdict,
            spy_guessed,
        }))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí")
}

//! The interactive query loop.

use std::io::{BufRead, Write};

use crate::cli::output::ResultRenderer;
use crate::error::Result;
use crate::index::SearchIndex;
use crate::planner::QueryPlanner;

/// Input line that ends the session.
pub const EXIT_TOKEN: &str = "exit";

/// Printed once before the first prompt.
pub const INTRO: &str = "Type searchstring and press ENTER (ex: '+ gender:female + age:>=45')";

/// Printed before each read.
pub const PROMPT: &str = "-> ";

/// Printed when the operator types the exit token.
pub const FAREWELL: &str = "Goodbye!";

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next line.
    Reading,
    /// Finished; no further input is read.
    Done,
}

/// Reads queries line by line and prints a result table for each.
pub struct Session<'a, I: SearchIndex> {
    index: &'a I,
    planner: QueryPlanner,
    renderer: ResultRenderer,
    state: SessionState,
}

impl<'a, I: SearchIndex> Session<'a, I> {
    pub fn new(index: &'a I, planner: QueryPlanner, renderer: ResultRenderer) -> Self {
        Session {
            index,
            planner,
            renderer,
            state: SessionState::Reading,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run until the exit token or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{INTRO}")?;

        let mut buf = Vec::new();
        while self.state == SessionState::Reading {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                log::debug!("End of input");
                self.state = SessionState::Done;
                break;
            }

            // Undecodable bytes become U+FFFD instead of ending the session.
            let line = String::from_utf8_lossy(&buf);
            self.step(&line, out)?;
        }

        Ok(())
    }

    /// Handle one input line and return the resulting state.
    ///
    /// Query and search failures are reported on `out` and keep the session
    /// reading; output and contract errors are returned.
    pub fn step<W: Write>(&mut self, line: &str, out: &mut W) -> Result<SessionState> {
        let line = strip_line_ending(line);

        if line == EXIT_TOKEN {
            writeln!(out, "{FAREWELL}")?;
            self.state = SessionState::Done;
            return Ok(self.state);
        }

        let result = self
            .planner
            .plan(line)
            .and_then(|request| self.index.search(&request));

        match result {
            Ok(result) => {
                log::info!(
                    "Query {line:?} matched {} documents in {:?}",
                    result.total_hits,
                    result.took
                );
                self.renderer.render(&result, out)?;
            }
            Err(e) => {
                log::debug!("Query {line:?} failed: {e}");
                writeln!(out, "Error while searching: {e}")?;
            }
        }

        Ok(self.state)
    }
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

//! Search and command prompts, `n`/`N`, and Ex command execution.
//!
//! `/` and `?` open a search prompt, `:` a command prompt. Both edit the
//! same [`CommandLine`](crate::command::CommandLine): printable keys
//! append, Backspace deletes (and cancels on an empty line), Escape
//! cancels, Enter submits.

use dojo_input::{KeyCode, KeyEvent};
use tracing::{debug, info};

use super::Session;
use crate::command::{CommandOutcome, ExCommand, Substitution, parse_command};
use crate::mode::Mode;
use crate::search::{self, SearchDirection};

/// What a key did to a prompt.
enum PromptKey {
    Edited,
    Cancel,
    Submit,
}

impl Session {
    pub(super) fn open_prompt(&mut self, mode: Mode) {
        self.prompt.clear();
        self.mode = mode;
    }

    fn close_prompt(&mut self) {
        self.prompt.clear();
        self.mode = Mode::Normal;
    }

    fn edit_prompt(&mut self, key: KeyEvent) -> PromptKey {
        if key.is_escape() {
            return PromptKey::Cancel;
        }
        match key.code {
            KeyCode::Enter => return PromptKey::Submit,
            KeyCode::Backspace => {
                if self.prompt.is_empty() {
                    return PromptKey::Cancel;
                }
                self.prompt.backspace();
            }
            KeyCode::Delete => {
                self.prompt.delete();
            }
            KeyCode::Left => self.prompt.move_left(),
            KeyCode::Right => self.prompt.move_right(),
            KeyCode::Home => self.prompt.move_home(),
            KeyCode::End => self.prompt.move_end(),
            _ => match key.printable() {
                Some(ch) => self.prompt.insert_char(ch),
                None => debug!(%key, "unmapped key in prompt"),
            },
        }
        PromptKey::Edited
    }

    // -- Search -------------------------------------------------------------

    pub(super) fn handle_search(&mut self, key: KeyEvent, direction: SearchDirection) {
        match self.edit_prompt(key) {
            PromptKey::Edited => {}
            PromptKey::Cancel => self.close_prompt(),
            PromptKey::Submit => {
                let typed = self.prompt.take();
                self.mode = Mode::Normal;
                self.confirm_search(typed, direction);
            }
        }
    }

    /// Enter on a search: set the query, recompile, jump to the first match
    /// from the cursor. An empty query reuses the last one.
    fn confirm_search(&mut self, typed: String, direction: SearchDirection) {
        let query = if typed.is_empty() {
            match self.search.last_query.clone() {
                Some(last) => last,
                None => {
                    debug!("empty search with no previous query");
                    self.set_error("E35: No previous regular expression");
                    return;
                }
            }
        } else {
            typed
        };

        self.search.last_query = Some(query.clone());
        self.search.direction = direction;
        self.search
            .recompile(&self.buffer, self.options.ignorecase);
        self.usage.confirm_search(&query, direction);
        self.usage.practice(match direction {
            SearchDirection::Forward => "search_forward",
            SearchDirection::Backward => "search_backward",
        });

        let here = self.cursor.position();
        let Some(idx) = search::navigate(&self.search.matches, here, direction, false) else {
            debug!(%query, "pattern not found");
            self.set_error(format!("E486: Pattern not found: {query}"));
            return;
        };
        let target = self.search.matches[idx].position();
        let wrapped = match direction {
            SearchDirection::Forward => target < here,
            SearchDirection::Backward => target > here,
        };
        self.jump_to_match(idx, direction, wrapped);
    }

    /// `n` (`reverse = false`) and `N`.
    pub(super) fn search_next(&mut self, reverse: bool, count: usize) {
        if self.search.matches.is_empty() {
            match &self.search.last_query {
                Some(query) => {
                    debug!(%query, "no matches");
                    self.set_error(format!("E486: Pattern not found: {query}"));
                }
                None => debug!("no previous search"),
            }
            return;
        }
        let direction = if reverse {
            self.search.direction.opposite()
        } else {
            self.search.direction
        };
        let len = self.search.matches.len();

        for _ in 0..count {
            let (idx, wrapped) = match self.search.current {
                Some(current) => {
                    let next = search::step(current, len, direction);
                    let wrapped = match direction {
                        SearchDirection::Forward => next <= current,
                        SearchDirection::Backward => next >= current,
                    };
                    (next, wrapped)
                }
                None => {
                    let here = self.cursor.position();
                    let Some(idx) = search::navigate(&self.search.matches, here, direction, true)
                    else {
                        return;
                    };
                    let target = self.search.matches[idx].position();
                    let wrapped = match direction {
                        SearchDirection::Forward => target <= here,
                        SearchDirection::Backward => target >= here,
                    };
                    (idx, wrapped)
                }
            };
            if !self.jump_to_match(idx, direction, wrapped) {
                break;
            }
        }

        self.usage.navigations_since_search += 1;
        self.usage.practice(if reverse {
            "search_previous"
        } else {
            "search_next"
        });
    }

    /// Move to match `idx`. Refuses to wrap when `wrapscan` is off.
    fn jump_to_match(&mut self, idx: usize, direction: SearchDirection, wrapped: bool) -> bool {
        let Some(target) = self.search.matches.get(idx).map(|m| m.position()) else {
            return false;
        };
        let (edge, other) = match direction {
            SearchDirection::Forward => ("BOTTOM", "TOP"),
            SearchDirection::Backward => ("TOP", "BOTTOM"),
        };
        if wrapped {
            if !self.options.wrapscan {
                let query = self.search.last_query.clone().unwrap_or_default();
                self.set_error(format!("search hit {edge} without match for: {query}"));
                return false;
            }
            self.set_message(format!("search hit {edge}, continuing at {other}"));
        }
        self.jump_to(target);
        self.search.current = Some(idx);
        true
    }

    // -- Command line -------------------------------------------------------

    pub(super) fn handle_command(&mut self, key: KeyEvent) {
        match self.edit_prompt(key) {
            PromptKey::Edited => {}
            PromptKey::Cancel => self.close_prompt(),
            PromptKey::Submit => {
                let input = self.prompt.take();
                self.mode = Mode::Normal;
                self.execute_ex(&input);
            }
        }
    }

    /// Run one Ex command line (without the leading `:`).
    ///
    /// The text is recorded as the last Ex command whatever it is. The
    /// outcome's message, if any, becomes the status message.
    pub fn execute_ex(&mut self, input: &str) -> CommandOutcome {
        let text = input.trim();
        self.usage.last_ex_command = Some(text.to_owned());

        let outcome = match parse_command(text) {
            Err(err) => CommandOutcome::Failed(err.to_string()),
            Ok(ExCommand::Write) => {
                self.buffer.mark_saved();
                self.usage.practice("w_write");
                CommandOutcome::Done(Some(format!(
                    "{}L written",
                    self.buffer.line_count()
                )))
            }
            Ok(ExCommand::Quit) => {
                self.usage.practice("q_quit");
                self.quit_requested = true;
                CommandOutcome::Quit
            }
            Ok(ExCommand::WriteQuit) => {
                self.buffer.mark_saved();
                self.usage.practice("wq_write_quit");
                self.quit_requested = true;
                CommandOutcome::Quit
            }
            Ok(ExCommand::Substitute(sub)) => self.substitute(&sub),
            Ok(ExCommand::Unknown(cmd)) => {
                debug!(%cmd, "ignored ex command");
                CommandOutcome::Done(None)
            }
        };

        match &outcome {
            CommandOutcome::Done(Some(msg)) => self.set_message(msg.clone()),
            CommandOutcome::Failed(msg) => self.set_error(msg.clone()),
            CommandOutcome::Done(None) | CommandOutcome::Quit => {}
        }
        outcome
    }

    /// `:s`. One undo step; the buffer is untouched on failure.
    fn substitute(&mut self, sub: &Substitution) -> CommandOutcome {
        let before = self.snapshot();
        match sub.apply(&mut self.buffer) {
            Ok(report) => {
                self.history.push(before);
                self.usage.substitutions.insert(sub.pattern.clone());
                self.usage.practice("substitute_regex");
                info!(
                    pattern = %sub.pattern,
                    replacements = report.replacements,
                    "substitution"
                );
                CommandOutcome::Done(Some(format!(
                    "{} substitutions on {} lines",
                    report.replacements, report.lines
                )))
            }
            Err(err) => CommandOutcome::Failed(err.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

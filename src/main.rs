// SPDX-License-Identifier: MIT
//
// vimdojo — a trainer for vim's command language.
//
// This binary is a thin driver over the workspace crates:
//
//   dojo-input  → key events and key-notation scripts
//   dojo-editor → the modal interpreter (Session)
//   dojo-lesson → lessons, timed challenges, progress codes
//
// It does not read the terminal. A run is a key-notation script fed
// through a session, one key at a time, exactly as live input would be:
//
//   --keys "ci\"new<Esc>" → parse_keys → LessonRun::feed → Session::feed
//   render → gutter + text + marker rows + status line → stdout
//
// Exit status: 0 when the lesson or challenge was completed (or nothing
// was asked of the run), 1 when it was not, 2 on a usage error.

use std::env;
use std::fmt::Write as _;
use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use dojo_editor::mode::CursorShape;
use dojo_editor::{Mode, OptionError, Options, Position, Session};
use dojo_input::{KeyNotationError, parse_keys};
use dojo_lesson::progress::ProgressSnapshot;
use dojo_lesson::{ChallengeRun, ChallengeState, LessonRun, ProgressError, catalog};
use thiserror::Error;
use tracing::{debug, info};
use unicode_width::UnicodeWidthChar;

/// Display columns per tab stop.
const TAB_WIDTH: usize = 4;

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum CliError {
    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("{0} needs a value")]
    MissingValue(&'static str),

    #[error("{flag}: not a number: {value}")]
    BadNumber { flag: &'static str, value: String },

    #[error("no lesson {0} (see --list)")]
    NoSuchLesson(usize),

    #[error("no challenge {0} (see --list)")]
    NoSuchChallenge(usize),

    #[error("--lesson and --challenge are exclusive")]
    Conflict,

    #[error("bad key script: {0}")]
    Keys(#[from] KeyNotationError),

    #[error("bad --set: {0}")]
    Option(#[from] OptionError),

    #[error("progress code: {0}")]
    Progress(#[from] ProgressError),

    #[error("initialize tracing subscriber failed")]
    Logging {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// ─── Arguments ──────────────────────────────────────────────────────────────

const USAGE: &str = "\
usage: vimdojo [options]

  --list              list built-in lessons and challenges
  --lesson N          run lesson N (from 1)
  --challenge N       run challenge N (from 1)
  --text TEXT         free practice on TEXT (\\n separates lines)
  --keys SCRIPT       keys to feed, in vim notation: d2w, ci\"x<Esc>, <C-v>
  --set OPT[=VAL]     set an option (undolevels, shiftwidth, ignorecase,
                      wrapscan, maxmacrodepth); repeatable
  --export            print a progress code for the run
  --import CODE       check a progress code and print what it holds
  -h, --help          show this help";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    list: bool,
    help: bool,
    lesson: Option<usize>,
    challenge: Option<usize>,
    text: Option<String>,
    keys: String,
    sets: Vec<String>,
    export: bool,
    import: Option<String>,
}

impl Args {
    fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut out = Self::default();
        let mut it = args.into_iter();
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--list" => out.list = true,
                "-h" | "--help" => out.help = true,
                "--export" => out.export = true,
                "--lesson" => out.lesson = Some(number("--lesson", it.next())?),
                "--challenge" => out.challenge = Some(number("--challenge", it.next())?),
                "--text" => out.text = Some(value("--text", it.next())?.replace("\\n", "\n")),
                "--keys" => out.keys = value("--keys", it.next())?,
                "--set" => out.sets.push(value("--set", it.next())?),
                "--import" => out.import = Some(value("--import", it.next())?),
                _ => return Err(CliError::UnknownArgument(arg)),
            }
        }
        if out.lesson.is_some() && out.challenge.is_some() {
            return Err(CliError::Conflict);
        }
        Ok(out)
    }

    fn options(&self) -> Result<Options, CliError> {
        let mut options = Options::default();
        for set in &self.sets {
            options.apply_set_arg(set)?;
        }
        Ok(options)
    }
}

fn value(flag: &'static str, next: Option<String>) -> Result<String, CliError> {
    next.ok_or(CliError::MissingValue(flag))
}

fn number(flag: &'static str, next: Option<String>) -> Result<usize, CliError> {
    let raw = value(flag, next)?;
    raw.parse()
        .map_err(|_| CliError::BadNumber { flag, value: raw })
}

// ─── Rendering ──────────────────────────────────────────────────────────────

/// Display column of char column `col`, expanding tabs and counting wide
/// characters as two.
fn display_col(line: &str, col: usize) -> usize {
    line.chars().take(col).fold(0, |dc, ch| match ch {
        '\t' => (dc / TAB_WIDTH + 1) * TAB_WIDTH,
        _ => dc + ch.width().unwrap_or(0),
    })
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut dc = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let next = (dc / TAB_WIDTH + 1) * TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', next - dc));
            dc = next;
        } else {
            out.push(ch);
            dc += ch.width().unwrap_or(0);
        }
    }
    out
}

/// The marker row under a text row: `^` (or `|` between characters in
/// insert-like modes) at the cursor, `~` under selected cells. `None` when
/// the row has neither.
fn marker_row(session: &Session, row: usize, line: &str) -> Option<String> {
    let cursor = session.cursor();
    let selected: Vec<usize> = session
        .selection()
        .iter()
        .filter(|p| p.row == row)
        .map(|p| p.col)
        .collect();
    let show_cursor = cursor.row == row && !session.mode().is_prompt();
    if !show_cursor && selected.is_empty() {
        return None;
    }

    let width = display_col(line, line.chars().count()) + 1;
    let mut cells = vec![' '; width];
    for col in selected {
        let start = display_col(line, col);
        let end = display_col(line, col + 1).max(start + 1);
        for cell in cells.iter_mut().take(end).skip(start) {
            *cell = '~';
        }
    }
    if show_cursor {
        let dc = display_col(line, cursor.col);
        let mark = match session.mode().cursor_shape() {
            CursorShape::Block => '^',
            CursorShape::Bar => '|',
        };
        if let Some(cell) = cells.get_mut(dc) {
            *cell = mark;
        }
    }
    Some(cells.into_iter().collect::<String>().trim_end().to_owned())
}

fn status_line(session: &Session) -> String {
    let mode = session.mode();
    let mut status = match mode {
        Mode::Search(dir) => format!("{}{}", dir.prefix(), session.prompt().input()),
        Mode::Command => format!(":{}", session.prompt().input()),
        Mode::Normal => String::new(),
        _ => format!("-- {mode} --"),
    };
    if let Some(recording) = session.macros().recording() {
        let _ = write!(status, " recording @{recording}");
    }
    let pending = session.pending_keys();
    if !pending.is_empty() {
        let _ = write!(status, " [{pending}]");
    }
    let Position { row, col } = session.cursor();
    let _ = write!(status, "  {},{}", row + 1, col + 1);
    if let Some(msg) = session.message() {
        let tag = if session.message_is_error() { "E" } else { "" };
        let _ = write!(status, "  {tag}> {msg}");
    }
    status.trim_start().to_owned()
}

/// The buffer with a line-number gutter, marker rows, and a status line.
fn render(session: &Session) -> String {
    let lines = session.lines();
    let gutter = lines.len().to_string().len().max(3);
    let mut out = String::new();
    for (row, line) in lines.iter().enumerate() {
        let _ = writeln!(out, "{:>gutter$} │ {}", row + 1, expand_tabs(line));
        if let Some(marks) = marker_row(session, row, line) {
            let _ = writeln!(out, "{:>gutter$} │ {marks}", "");
        }
    }
    let _ = write!(out, "{}", status_line(session));
    out
}

// ─── Runs ───────────────────────────────────────────────────────────────────

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

fn list() {
    println!("lessons:");
    for (i, lesson) in catalog::lessons().iter().enumerate() {
        println!("  {:>2}  {}", i + 1, lesson.name);
    }
    println!("challenges:");
    for (i, challenge) in catalog::challenges().iter().enumerate() {
        println!(
            "  {:>2}  {} ({}s, {} tasks)",
            i + 1,
            challenge.name,
            challenge.time_limit.as_secs(),
            challenge.tasks.len()
        );
    }
}

/// What a run produced, for the exit status and `--export`.
struct Outcome {
    session: Session,
    completed: bool,
    level: usize,
    points: u64,
}

fn run_lesson(n: usize, args: &Args, options: Options) -> Result<Outcome, CliError> {
    let lesson = n
        .checked_sub(1)
        .and_then(|i| catalog::lessons().into_iter().nth(i))
        .ok_or(CliError::NoSuchLesson(n))?;
    println!("{}\n{}\n", lesson.name, lesson.instructions);

    let mut run = LessonRun::with_options(lesson, options);
    run.feed_notation(&args.keys)?;
    println!("{}", render(run.session()));
    if run.is_complete() {
        println!("\nlesson complete in {} keys", run.keys_fed());
    } else {
        println!("\nnot yet");
    }
    Ok(Outcome {
        completed: run.is_complete(),
        session: run.session().clone(),
        level: n - 1,
        points: 0,
    })
}

fn run_challenge(n: usize, args: &Args, options: Options) -> Result<Outcome, CliError> {
    let challenge = n
        .checked_sub(1)
        .and_then(|i| catalog::challenges().into_iter().nth(i))
        .ok_or(CliError::NoSuchChallenge(n))?;
    println!("{}: {}\n", challenge.name, challenge.description);

    let keys = parse_keys(&args.keys)?;
    let mut run = ChallengeRun::start(challenge, options, Instant::now());
    for key in keys {
        let event = run.feed(key, Instant::now());
        debug!(%key, ?event, "challenge key");
    }

    println!("{}", render(run.session()));
    let (done, total) = run.progress();
    if let Some(task) = run.current_task() {
        println!("\nnext task: {} (hint: {})", task.instruction, task.hint);
    }
    let result = run.result(Instant::now());
    println!(
        "\n{done}/{total} tasks, {} points, {:.1}s",
        result.score,
        result.elapsed.as_secs_f64()
    );
    Ok(Outcome {
        completed: run.state() == ChallengeState::Completed,
        session: run.session().clone(),
        level: 0,
        points: result.score,
    })
}

fn run_free(args: &Args, options: Options) -> Result<Outcome, CliError> {
    let text = args.text.as_deref().unwrap_or_default();
    let mut session = Session::with_options(text, options);
    session.feed_notation(&args.keys)?;
    println!("{}", render(&session));
    Ok(Outcome {
        completed: true,
        session,
        level: 0,
        points: 0,
    })
}

fn run(args: &Args) -> Result<bool, CliError> {
    if args.help {
        println!("{USAGE}");
        return Ok(true);
    }
    if args.list {
        list();
        return Ok(true);
    }
    if let Some(code) = &args.import {
        let snapshot = ProgressSnapshot::import_code(code, epoch_millis())?;
        println!("{}", snapshot.summary());
        return Ok(true);
    }

    let options = args.options()?;
    let outcome = match (args.lesson, args.challenge) {
        (Some(n), _) => run_lesson(n, args, options)?,
        (_, Some(n)) => run_challenge(n, args, options)?,
        (None, None) => run_free(args, options)?,
    };

    if args.export {
        let mut snapshot = ProgressSnapshot::new(epoch_millis());
        snapshot.record_usage(outcome.session.usage());
        snapshot.current_level = outcome.level;
        snapshot.challenge_mode = args.challenge.is_some();
        snapshot.challenge_points = outcome.points;
        println!("\n{}", snapshot.export_code()?);
    }
    info!(completed = outcome.completed, "run finished");
    Ok(outcome.completed)
}

fn init_logging() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|source| CliError::Logging { source })
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("vimdojo: {e}");
    }

    let result = Args::parse(env::args().skip(1)).and_then(|args| run(&args));
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("vimdojo: {e}");
            if matches!(
                e,
                CliError::UnknownArgument(_) | CliError::MissingValue(_) | CliError::Conflict
            ) {
                eprintln!("{USAGE}");
            }
            ExitCode::from(2)
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Result<Args, CliError> {
        Args::parse(list.iter().map(|&s| s.to_owned()))
    }

    fn session(text: &str, keys: &str) -> Session {
        let mut s = Session::new(text);
        s.feed_notation(keys).unwrap();
        s
    }

    // ── Arguments ─────────────────────────────────────────────────────────

    #[test]
    fn parses_a_lesson_run() {
        let a = args(&["--lesson", "3", "--keys", "jdd", "--set", "noic", "--export"]).unwrap();
        assert_eq!(a.lesson, Some(3));
        assert_eq!(a.keys, "jdd");
        assert_eq!(a.sets, vec!["noic"]);
        assert!(a.export);
        assert!(!a.options().unwrap().ignorecase);
    }

    #[test]
    fn text_takes_escaped_newlines() {
        let a = args(&["--text", "one\\ntwo"]).unwrap();
        assert_eq!(a.text.as_deref(), Some("one\ntwo"));
    }

    #[test]
    fn argument_errors() {
        assert!(matches!(args(&["--bogus"]), Err(CliError::UnknownArgument(_))));
        assert!(matches!(args(&["--keys"]), Err(CliError::MissingValue("--keys"))));
        assert!(matches!(
            args(&["--lesson", "two"]),
            Err(CliError::BadNumber { flag: "--lesson", .. })
        ));
        assert!(matches!(
            args(&["--lesson", "1", "--challenge", "1"]),
            Err(CliError::Conflict)
        ));
        let a = args(&["--set", "bogus=1"]).unwrap();
        assert!(matches!(a.options(), Err(CliError::Option(_))));
    }

    #[test]
    fn lesson_zero_does_not_exist() {
        let a = args(&["--lesson", "0"]).unwrap();
        assert!(matches!(
            run_lesson(0, &a, Options::default()),
            Err(CliError::NoSuchLesson(0))
        ));
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    #[test]
    fn tabs_and_wide_chars() {
        assert_eq!(display_col("\tab", 1), 4);
        assert_eq!(display_col("a\tb", 2), 4);
        assert_eq!(display_col("日本x", 2), 4);
        assert_eq!(expand_tabs("a\tb"), "a   b");
    }

    #[test]
    fn normal_mode_render() {
        let s = session("one two\nthree", "w");
        assert_eq!(
            render(&s),
            "  1 │ one two\n    │     ^\n  2 │ three\n1,5"
        );
    }

    #[test]
    fn insert_mode_uses_bar() {
        let s = session("ab", "A");
        assert_eq!(render(&s), "  1 │ ab\n    │   |\n-- INSERT --  1,3");
    }

    #[test]
    fn visual_selection_marks_cells() {
        let s = session("abcd", "lvl");
        assert_eq!(
            render(&s),
            "  1 │ abcd\n    │  ~^\n-- VISUAL --  1,3"
        );
    }

    #[test]
    fn prompt_and_pending_in_status() {
        assert_eq!(status_line(&session("foo", "/fo")), "/fo  1,1");
        assert_eq!(status_line(&session("foo", "2d")), "[2d]  1,1");
        assert_eq!(
            status_line(&session("foo", "qa")),
            "recording @a  1,1  > recording @a"
        );
        assert_eq!(
            status_line(&session("foo", "/zzz<CR>")),
            "1,1  E> E486: Pattern not found: zzz"
        );
    }
}

//! Session options and the `name=value` grammar that sets them.
//!
//! Options live on [`Options`], which the session owns. Callers (the CLI's
//! `--set`, a lesson fixture) change them through [`Options::apply_set_arg`],
//! which understands the usual `:set` argument forms:
//!
//! | Syntax          | Effect                     |
//! |-----------------|----------------------------|
//! | `option`        | Enable a boolean option    |
//! | `nooption`      | Disable a boolean option   |
//! | `option!`       | Toggle a boolean option    |
//! | `option=N`      | Assign a numeric option    |
//!
//! # Option names
//!
//! | Full name       | Abbrev | Type    | Default |
//! |-----------------|--------|---------|---------|
//! | `undolevels`    | `ul`   | integer | 200     |
//! | `shiftwidth`    | `sw`   | integer | 4       |
//! | `ignorecase`    | `ic`   | bool    | true    |
//! | `wrapscan`      | `ws`   | bool    | true    |
//! | `maxmacrodepth` | `mmd`  | integer | 32      |

use thiserror::Error;

use crate::history::DEFAULT_UNDO_LEVELS;

/// Default playback nesting limit for `@a` inside `@a`.
pub const DEFAULT_MAX_MACRO_DEPTH: usize = 32;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Undo steps kept before the oldest is evicted.
    pub undo_levels: usize,
    /// Columns added or removed by `>` and `<`.
    pub shiftwidth: usize,
    /// Search ignores case.
    pub ignorecase: bool,
    /// Search wraps around the ends of the buffer.
    pub wrapscan: bool,
    /// Nested macro playback stops at this depth.
    pub max_macro_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            undo_levels: DEFAULT_UNDO_LEVELS,
            shiftwidth: 4,
            ignorecase: true,
            wrapscan: true,
            max_macro_depth: DEFAULT_MAX_MACRO_DEPTH,
        }
    }
}

/// Why a `--set` argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("invalid argument: {name}={value}")]
    InvalidValue { name: String, value: String },

    #[error("option {0} takes no value")]
    NotNumeric(String),

    #[error("option {0} needs a value")]
    NeedsValue(String),
}

impl Options {
    /// Apply one `name`, `noname`, `name!` or `name=value` argument.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionError`] for unknown names, non-numeric values, or
    /// a value given to a boolean option (and the reverse).
    pub fn apply_set_arg(&mut self, arg: &str) -> Result<(), OptionError> {
        match parse_set_arg(arg) {
            SetDirective::On(name) => *self.flag(&name)? = true,
            SetDirective::Off(name) => *self.flag(&name)? = false,
            SetDirective::Toggle(name) => {
                let flag = self.flag(&name)?;
                *flag = !*flag;
            }
            SetDirective::Assign(name, value) => {
                let slot = self.number(&name)?;
                *slot = value
                    .parse()
                    .map_err(|_| OptionError::InvalidValue { name, value })?;
            }
        }
        Ok(())
    }

    /// Apply several space-separated arguments, stopping at the first
    /// error.
    ///
    /// # Errors
    ///
    /// See [`apply_set_arg`](Self::apply_set_arg).
    pub fn apply_set(&mut self, args: &str) -> Result<(), OptionError> {
        args.split_whitespace()
            .try_for_each(|arg| self.apply_set_arg(arg))
    }

    fn flag(&mut self, name: &str) -> Result<&mut bool, OptionError> {
        match canonical(name) {
            Some("ignorecase") => Ok(&mut self.ignorecase),
            Some("wrapscan") => Ok(&mut self.wrapscan),
            Some(_) => Err(OptionError::NeedsValue(name.to_owned())),
            None => Err(OptionError::Unknown(name.to_owned())),
        }
    }

    fn number(&mut self, name: &str) -> Result<&mut usize, OptionError> {
        match canonical(name) {
            Some("undolevels") => Ok(&mut self.undo_levels),
            Some("shiftwidth") => Ok(&mut self.shiftwidth),
            Some("maxmacrodepth") => Ok(&mut self.max_macro_depth),
            Some(_) => Err(OptionError::NotNumeric(name.to_owned())),
            None => Err(OptionError::Unknown(name.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// One parsed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    On(String),
    Off(String),
    Toggle(String),
    Assign(String, String),
}

/// Full name for a known option or abbreviation.
#[must_use]
pub fn canonical(name: &str) -> Option<&'static str> {
    Some(match name {
        "undolevels" | "ul" => "undolevels",
        "shiftwidth" | "sw" => "shiftwidth",
        "ignorecase" | "ic" => "ignorecase",
        "wrapscan" | "ws" => "wrapscan",
        "maxmacrodepth" | "mmd" => "maxmacrodepth",
        _ => return None,
    })
}

fn is_bool_option(name: &str) -> bool {
    matches!(canonical(name), Some("ignorecase" | "wrapscan"))
}

/// Parse a single argument.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_owned(), value.to_owned());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_owned());
    }
    // Only strip `no` off a boolean name.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_owned());
        }
    }
    SetDirective::On(arg.to_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

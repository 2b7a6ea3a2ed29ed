//! Find-style argument parsing
//!
//! The flag list is a flat token stream: a recognized flag opens a new
//! collection, every other token becomes a parameter of the open flag. When
//! the next flag (or the end of input) closes a collection, its parameter
//! count is checked against the flag's arity and the parameters are folded
//! into the filter and action configuration.

use regex::Regex;

use crate::actions::ActionTemplate;
use crate::error::ConfigError;
use crate::filters::{FilterConfig, TypeSelector};
use crate::shared::Wildcard;

/// Recognized flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Name,
    Match,
    Regex,
    Exclude,
    Exec,
    Delete,
    Type,
    Debug,
}

impl Flag {
    const ALL: [Flag; 8] = [
        Flag::Name,
        Flag::Match,
        Flag::Regex,
        Flag::Exclude,
        Flag::Exec,
        Flag::Delete,
        Flag::Type,
        Flag::Debug,
    ];

    pub fn from_token(token: &str) -> Option<Flag> {
        Self::ALL.into_iter().find(|flag| flag.token() == token)
    }

    pub fn token(self) -> &'static str {
        match self {
            Flag::Name => "-name",
            Flag::Match => "-match",
            Flag::Regex => "-regex",
            Flag::Exclude => "-exclude",
            Flag::Exec => "-exec",
            Flag::Delete => "-delete",
            Flag::Type => "-type",
            Flag::Debug => "-debug",
        }
    }

    /// `[min, max]` parameter count
    pub fn arity(self) -> (usize, usize) {
        match self {
            Flag::Name | Flag::Match | Flag::Regex | Flag::Exclude | Flag::Type => (1, 1),
            Flag::Exec => (1, 100),
            Flag::Delete | Flag::Debug => (0, 0),
        }
    }
}

/// Result of parsing the flag list
#[derive(Debug, Clone, Default)]
pub struct ParsedArgs {
    pub filters: FilterConfig,
    pub actions: Vec<ActionTemplate>,
    pub delete: bool,
    pub debug: bool,
}

/// A flag whose parameters are still being collected
#[derive(Debug)]
struct Pending {
    flag: Flag,
    params: Vec<String>,
}

/// Accumulator threaded through the fold
#[derive(Debug, Default)]
struct ArgsBuilder {
    parsed: ParsedArgs,
    kinds: TypeSelector,
}

impl ArgsBuilder {
    fn apply(mut self, pending: Pending) -> Result<Self, ConfigError> {
        let Pending { flag, mut params } = pending;
        let (min, max) = flag.arity();
        if params.len() < min || params.len() > max {
            return Err(ConfigError::ArgumentCount {
                flag: flag.token(),
                min,
                max,
                found: params.len(),
            });
        }

        let filters = &mut self.parsed.filters;
        match flag {
            Flag::Name => {
                for pattern in &params {
                    filters.names.push(Wildcard::compile(pattern)?);
                }
            }
            Flag::Exclude => {
                for pattern in &params {
                    filters.excludes.push(Wildcard::compile(pattern)?);
                }
            }
            Flag::Match => {
                for text in params {
                    filters.content.add_substring(text);
                }
            }
            Flag::Regex => {
                for pattern in params {
                    let regex = Regex::new(&pattern)
                        .map_err(|source| ConfigError::InvalidRegex { pattern, source })?;
                    filters.content.add_regex(regex);
                }
            }
            Flag::Exec => {
                let name = params.remove(0);
                self.parsed.actions.push(ActionTemplate::new(name, params));
            }
            Flag::Delete => self.parsed.delete = true,
            Flag::Debug => self.parsed.debug = true,
            Flag::Type => match params[0].as_str() {
                "file" => self.kinds.enable_files(),
                "dir" => self.kinds.enable_dirs(),
                "both" => {
                    self.kinds.enable_files();
                    self.kinds.enable_dirs();
                }
                other => return Err(ConfigError::InvalidTypeValue(other.to_string())),
            },
        }

        Ok(self)
    }

    fn finish(mut self) -> ParsedArgs {
        self.parsed.filters.kinds = self.kinds.resolved();
        self.parsed
    }
}

type FoldState = (ArgsBuilder, Option<Pending>);

/// One step of the state machine: open a new flag or extend the open one
fn step(
    (builder, pending): FoldState,
    (index, token): (usize, String),
) -> Result<FoldState, ConfigError> {
    match (Flag::from_token(&token), pending) {
        (Some(flag), pending) => {
            let builder = match pending {
                Some(done) => builder.apply(done)?,
                None => builder,
            };
            Ok((builder, Some(Pending { flag, params: Vec::new() })))
        }
        (None, Some(mut open)) => {
            open.params.push(token);
            Ok((builder, Some(open)))
        }
        (None, None) => Err(ConfigError::InvalidArgument { index, token }),
    }
}

/// Parse the flags that follow the search path
pub fn parse<I, S>(tokens: I) -> Result<ParsedArgs, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let (builder, pending) = tokens
        .into_iter()
        .map(Into::<String>::into)
        .enumerate()
        .try_fold((ArgsBuilder::default(), None), step)?;

    let builder = match pending {
        Some(done) => builder.apply(done)?,
        None => builder,
    };

    let parsed = builder.finish();
    tracing::debug!(
        "Parsed {} name globs, {} excludes, {} actions (delete: {}, debug: {})",
        parsed.filters.names.len(),
        parsed.filters.excludes.len(),
        parsed.actions.len(),
        parsed.delete,
        parsed.debug
    );
    Ok(parsed)
}

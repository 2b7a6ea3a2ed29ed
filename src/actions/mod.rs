//! Action templates and their dispatch
//!
//! An `-exec` flag registers an [`ActionTemplate`]: an action name plus
//! parameter tokens. The action is resolved once, at parse time, into either a
//! built-in reporting action or an external command. At dispatch time the
//! placeholders are substituted to produce an [`Invocation`].

pub mod dispatcher;
pub mod finalize;
pub mod state;

pub use dispatcher::Dispatcher;
pub use state::{Counters, TraversalState};

use std::ffi::OsString;
use std::path::Path;

use crate::exec::shell;

/// Replaced by the path of the matched entry
pub const FILE_PLACEHOLDER: &str = "{}";
/// Replaced by the entry's containing directory; fires once per directory
pub const DIR_PLACEHOLDER: &str = "[]";

/// Reporting actions implemented by xfind itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinAction {
    /// Print the parameters joined by spaces
    Print,
    /// Print `<line>: <text>` for every line matching `-match`/`-regex`
    PrintMatch,
    /// Count matched entries
    Count,
    /// Count all lines of matched files
    CountLines,
    /// Count lines matching `-match`/`-regex`
    CountMatch,
}

impl BuiltinAction {
    const ALL: [BuiltinAction; 5] = [
        BuiltinAction::Print,
        BuiltinAction::PrintMatch,
        BuiltinAction::Count,
        BuiltinAction::CountLines,
        BuiltinAction::CountMatch,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinAction::Print => "print",
            BuiltinAction::PrintMatch => "printmatch",
            BuiltinAction::Count => "count",
            BuiltinAction::CountLines => "countlines",
            BuiltinAction::CountMatch => "countmatch",
        }
    }
}

/// What an action template runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Builtin(BuiltinAction),
    External(String),
}

impl Action {
    /// Built-in when the name is one, external command otherwise
    pub fn resolve(name: &str) -> Self {
        match BuiltinAction::from_name(name) {
            Some(builtin) => Action::Builtin(builtin),
            None => Action::External(name.to_string()),
        }
    }
}

/// A registered `-exec` action with unexpanded parameters
#[derive(Debug, Clone)]
pub struct ActionTemplate {
    action: Action,
    name: String,
    params: Vec<String>,
}

impl ActionTemplate {
    pub fn new(name: String, params: Vec<String>) -> Self {
        Self {
            action: Action::resolve(&name),
            name,
            params,
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Uses `[]`, so it runs at most once per directory
    pub fn is_directory_scoped(&self) -> bool {
        self.params.iter().any(|p| p == DIR_PLACEHOLDER)
    }

    pub fn is_builtin(&self, builtin: BuiltinAction) -> bool {
        self.action == Action::Builtin(builtin)
    }

    /// Substitute `{}` and `[]`; every other token passes through unchanged.
    /// Paths keep their OS representation.
    pub fn expand(&self, entry_path: &Path, dir_path: &Path) -> Invocation {
        let params = self
            .params
            .iter()
            .map(|param| match param.as_str() {
                FILE_PLACEHOLDER => entry_path.as_os_str().to_os_string(),
                DIR_PLACEHOLDER => dir_path.as_os_str().to_os_string(),
                _ => OsString::from(param),
            })
            .collect();

        Invocation {
            action: self.action.clone(),
            name: self.name.clone(),
            params,
        }
    }
}

/// A template expanded for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub action: Action,
    pub name: String,
    pub params: Vec<OsString>,
}

impl Invocation {
    /// The command line, whitespace-bearing tokens quoted
    pub fn command_line(&self) -> OsString {
        shell::make_command_line(&self.name, &self.params)
    }
}

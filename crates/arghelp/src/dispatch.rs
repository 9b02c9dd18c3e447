//! Command dispatch logic.
//!
//! Deciding what to run is a pure function of three facts: whether any
//! subcommand was ever registered, whether a root command exists, and which
//! subcommand (if any) the parse selected.

use clap::ArgMatches;
use thiserror::Error;

/// What a run dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The root command ran.
    Root,
    /// The named subcommand ran.
    Subcommand(String),
    /// Nothing could run; top-level help was printed.
    Usage,
}

impl Dispatch {
    /// Returns true if the root command ran.
    pub fn is_root(&self) -> bool {
        matches!(self, Dispatch::Root)
    }

    /// Returns true if help was printed instead of running a command.
    pub fn is_usage(&self) -> bool {
        matches!(self, Dispatch::Usage)
    }

    /// Returns the subcommand name if a subcommand ran.
    pub fn subcommand(&self) -> Option<&str> {
        match self {
            Dispatch::Subcommand(name) => Some(name),
            _ => None,
        }
    }
}

/// Error returned by [`Application::try_run_from`](crate::Application::try_run_from).
#[derive(Debug, Error)]
pub enum RunError {
    /// The command line was rejected by the parser, or help was requested.
    #[error(transparent)]
    Parse(#[from] clap::Error),
    /// The handler failed.
    #[error(transparent)]
    Handler(anyhow::Error),
    /// Help could not be written to standard output.
    #[error("failed to print help: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns the name of the selected subcommand, if any.
pub fn selected_subcommand(matches: &ArgMatches) -> Option<&str> {
    matches.subcommand_name()
}

/// Decides what to run for a parsed command line.
///
/// - No subcommand support: the root command, or help if there is none.
/// - A subcommand was selected: that subcommand.
/// - No subcommand was selected: the root command, or help.
pub fn resolve(has_registry: bool, has_root: bool, selected: Option<&str>) -> Dispatch {
    match (has_registry, selected) {
        (true, Some(name)) => Dispatch::Subcommand(name.to_string()),
        _ if has_root => Dispatch::Root,
        _ => Dispatch::Usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    #[test]
    fn test_selected_subcommand() {
        let cmd = Command::new("app").subcommand(Command::new("list"));

        let matches = cmd.clone().try_get_matches_from(["app", "list"]).unwrap();
        assert_eq!(selected_subcommand(&matches), Some("list"));

        let matches = cmd.try_get_matches_from(["app"]).unwrap();
        assert_eq!(selected_subcommand(&matches), None);
    }

    #[test]
    fn test_resolve_without_registry() {
        assert_eq!(resolve(false, true, None), Dispatch::Root);
        assert_eq!(resolve(false, false, None), Dispatch::Usage);
    }

    #[test]
    fn test_resolve_with_registry() {
        assert_eq!(
            resolve(true, true, Some("one")),
            Dispatch::Subcommand("one".into())
        );
        assert_eq!(
            resolve(true, false, Some("one")),
            Dispatch::Subcommand("one".into())
        );
        assert_eq!(resolve(true, true, None), Dispatch::Root);
        assert_eq!(resolve(true, false, None), Dispatch::Usage);
    }

    #[test]
    fn test_dispatch_accessors() {
        assert!(Dispatch::Root.is_root());
        assert!(Dispatch::Usage.is_usage());
        assert_eq!(Dispatch::Subcommand("two".into()).subcommand(), Some("two"));
        assert_eq!(Dispatch::Root.subcommand(), None);
    }
}

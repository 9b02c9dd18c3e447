//! Error types for setup operations.

use thiserror::Error;

/// Error raised while declaring arguments or registering commands.
///
/// All of these surface from the call that caused them. Nothing is deferred
/// to parse time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// A root command was registered while one already exists.
    #[error("only one root command can be defined")]
    MultipleRootCommands,
    /// A subcommand with the same name is already registered.
    #[error("duplicate subcommand: {0}")]
    DuplicateSubcommand(String),
    /// The subcommand name cannot be used on the command line.
    #[error("invalid subcommand name: {0:?}")]
    InvalidSubcommandName(String),
    /// A destination name or flag is already taken on the target parser.
    #[error("duplicate argument `{name}` on {parser}")]
    DuplicateArgument {
        /// The parser the argument was applied to.
        parser: String,
        /// The colliding destination name or flag.
        name: String,
    },
    /// The declaration's names or options are unknown, malformed or
    /// contradictory.
    #[error("invalid argument {arg}: {reason}")]
    InvalidArgumentSpec {
        /// The declaration's name tokens, joined with `/`.
        arg: String,
        /// What is wrong with it.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::MultipleRootCommands;
        assert_eq!(err.to_string(), "only one root command can be defined");

        let err = SetupError::DuplicateSubcommand("hello".into());
        assert_eq!(err.to_string(), "duplicate subcommand: hello");

        let err = SetupError::DuplicateArgument {
            parser: "subcommand `sub1`".into(),
            name: "-x".into(),
        };
        assert_eq!(err.to_string(), "duplicate argument `-x` on subcommand `sub1`");

        let err = SetupError::InvalidArgumentSpec {
            arg: "--list/-l".into(),
            reason: "unknown option `kind`".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid argument --list/-l: unknown option `kind`"
        );
    }
}

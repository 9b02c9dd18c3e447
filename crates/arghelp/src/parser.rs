//! Accumulated declarations for one parser.
//!
//! A [`ParserSpec`] holds everything that has been validated for either the
//! top-level parser or one subcommand. The clap [`Command`] itself is only
//! assembled when arguments are parsed, so a parser can keep growing after
//! construction (root command declarations land on the top-level parser).

use clap::{ArgGroup, Command};
use std::collections::BTreeSet;
use tracing::debug;

use crate::declare::{Argument, Declaration, Group};
use crate::setup::SetupError;
use crate::translate::{compile, CompiledArg, Slot};

/// Flags clap adds to every parser.
const RESERVED_FLAGS: &[&str] = &["-h", "--help"];

#[derive(Debug, Clone, Copy, Default)]
struct PositionalState {
    seen_optional: bool,
    seen_list: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct ParserSpec {
    label: String,
    about: Option<String>,
    args: Vec<CompiledArg>,
    groups: Vec<ArgGroup>,
    /// Destination names and group ids; clap shares one id space for both.
    ids: BTreeSet<String>,
    flags: BTreeSet<String>,
    positionals: PositionalState,
}

impl ParserSpec {
    /// Creates an empty spec. `label` names the parser in error messages.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            about: None,
            args: Vec::new(),
            groups: Vec::new(),
            ids: BTreeSet::new(),
            flags: RESERVED_FLAGS.iter().map(|flag| flag.to_string()).collect(),
            positionals: PositionalState::default(),
        }
    }

    pub fn set_about(&mut self, about: Option<String>) {
        self.about = about;
    }

    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Value slots in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.args.iter().map(|compiled| &compiled.slot)
    }

    /// Applies every declaration, or none of them if any is rejected.
    pub fn add_declarations(&mut self, declarations: &[Declaration]) -> Result<(), SetupError> {
        let mut staged = self.clone();
        for declaration in declarations {
            match declaration {
                Declaration::Single(argument) => {
                    staged.add_argument(argument)?;
                }
                Declaration::Mutex(group) => staged.add_group(group)?,
            }
        }
        *self = staged;
        Ok(())
    }

    fn add_argument(&mut self, argument: &Argument) -> Result<String, SetupError> {
        let compiled = compile(argument)?;

        if self.ids.contains(&compiled.slot.dest) {
            return Err(self.duplicate(&compiled.slot.dest));
        }
        if let Some(flag) = compiled.flags.iter().find(|flag| self.flags.contains(*flag)) {
            return Err(self.duplicate(flag));
        }
        if compiled.is_positional() {
            self.check_positional_order(argument, &compiled)?;
        }

        debug!(parser = %self.label, dest = %compiled.slot.dest, "declared argument");

        let dest = compiled.slot.dest.clone();
        self.ids.insert(dest.clone());
        self.flags.extend(compiled.flags.iter().cloned());
        self.args.push(compiled);
        Ok(dest)
    }

    fn add_group(&mut self, group: &Group) -> Result<(), SetupError> {
        if group.args().is_empty() {
            return Err(SetupError::InvalidArgumentSpec {
                arg: "mutually exclusive group".into(),
                reason: "a group needs at least one argument".into(),
            });
        }

        let mut members = Vec::with_capacity(group.args().len());
        for argument in group.args() {
            if argument.names().first().is_some_and(|name| !name.starts_with('-')) {
                return Err(SetupError::InvalidArgumentSpec {
                    arg: argument.label(),
                    reason: "mutually exclusive arguments must be flags".into(),
                });
            }
            if argument.get("required").and_then(|value| value.as_bool()) == Some(true) {
                return Err(SetupError::InvalidArgumentSpec {
                    arg: argument.label(),
                    reason: "mutually exclusive arguments must not be required".into(),
                });
            }
            members.push(self.add_argument(argument)?);
        }

        let id = self.next_group_id();
        debug!(
            parser = %self.label,
            group = %id,
            required = group.is_required(),
            "declared exclusive group"
        );
        self.ids.insert(id.clone());
        self.groups.push(
            ArgGroup::new(id)
                .args(members)
                .multiple(false)
                .required(group.is_required()),
        );
        Ok(())
    }

    fn check_positional_order(
        &mut self,
        argument: &Argument,
        compiled: &CompiledArg,
    ) -> Result<(), SetupError> {
        let invalid = |reason: &str| SetupError::InvalidArgumentSpec {
            arg: argument.label(),
            reason: reason.to_string(),
        };
        if self.positionals.seen_list {
            return Err(invalid(
                "only the last positional argument may take a variable number of values",
            ));
        }
        if compiled.required && self.positionals.seen_optional {
            return Err(invalid(
                "a required positional argument cannot follow an optional one",
            ));
        }
        self.positionals.seen_optional |= !compiled.required;
        self.positionals.seen_list |= compiled.is_list();
        Ok(())
    }

    fn next_group_id(&self) -> String {
        (self.groups.len()..)
            .map(|n| format!("__group_{n}"))
            .find(|id| !self.ids.contains(id))
            .unwrap_or_default()
    }

    fn duplicate(&self, name: &str) -> SetupError {
        SetupError::DuplicateArgument {
            parser: self.label.clone(),
            name: name.to_string(),
        }
    }

    /// Adds the declared arguments and groups to `cmd`.
    pub fn apply(&self, mut cmd: Command) -> Command {
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        cmd = cmd.args(self.args.iter().map(|compiled| compiled.arg.clone()));
        cmd.groups(self.groups.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arg, Group};

    fn spec_with(declarations: Vec<Declaration>) -> Result<ParserSpec, SetupError> {
        let mut spec = ParserSpec::new("the top-level parser");
        spec.add_declarations(&declarations)?;
        Ok(spec)
    }

    #[test]
    fn test_slots_follow_declaration_order() {
        let spec = spec_with(vec![
            arg!("--verbose", "-v"; action = "store_true").into(),
            arg!("name").into(),
        ])
        .unwrap();
        let dests: Vec<&str> = spec.slots().map(|slot| slot.dest.as_str()).collect();
        assert_eq!(dests, ["verbose", "name"]);
    }

    #[test]
    fn test_duplicate_dest_is_rejected() {
        let err = spec_with(vec![arg!("-x").into(), arg!("--other"; dest = "x").into()])
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::DuplicateArgument {
                parser: "the top-level parser".into(),
                name: "x".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_flag_is_rejected() {
        let err = spec_with(vec![
            arg!("--verbose", "-v").into(),
            arg!("--version", "-v").into(),
        ])
        .unwrap_err();
        assert!(matches!(err, SetupError::DuplicateArgument { name, .. } if name == "-v"));
    }

    #[test]
    fn test_help_flags_are_reserved() {
        let err = spec_with(vec![arg!("-h", "--host").into()]).unwrap_err();
        assert!(matches!(err, SetupError::DuplicateArgument { name, .. } if name == "-h"));
    }

    #[test]
    fn test_failed_batch_leaves_spec_untouched() {
        let mut spec = ParserSpec::new("the top-level parser");
        spec.add_declarations(&[arg!("-a").into()]).unwrap();

        let result = spec.add_declarations(&[arg!("-b").into(), arg!("-a").into()]);
        assert!(result.is_err());

        let dests: Vec<&str> = spec.slots().map(|slot| slot.dest.as_str()).collect();
        assert_eq!(dests, ["a"]);
        // `-b` was rolled back, so it can still be declared.
        spec.add_declarations(&[arg!("-b").into()]).unwrap();
    }

    #[test]
    fn test_group_members_must_be_flags() {
        let err = spec_with(vec![Group::new([arg!("-x"), arg!("name")]).into()]).unwrap_err();
        assert!(matches!(err, SetupError::InvalidArgumentSpec { arg, .. } if arg == "name"));
    }

    #[test]
    fn test_group_members_must_not_be_required() {
        let err = spec_with(vec![
            Group::new([arg!("-x"; required = true), arg!("-y")]).into(),
        ])
        .unwrap_err();
        assert!(matches!(err, SetupError::InvalidArgumentSpec { .. }));
    }

    #[test]
    fn test_empty_group_is_rejected() {
        for required in [false, true] {
            let group = Group::new(Vec::<Argument>::new()).required(required);
            let err = spec_with(vec![group.into()]).unwrap_err();
            assert!(matches!(
                err,
                SetupError::InvalidArgumentSpec { reason, .. } if reason.contains("at least one")
            ));
        }
    }

    #[test]
    fn test_group_ids_do_not_collide() {
        let spec = spec_with(vec![
            Group::new([arg!("-a"), arg!("-b")]).into(),
            Group::new([arg!("-c"), arg!("-d")]).required(true).into(),
        ])
        .unwrap();
        let cmd = spec.apply(Command::new("app"));
        let ids: Vec<&str> = cmd.get_groups().map(|g| g.get_id().as_str()).collect();
        assert_eq!(ids, ["__group_0", "__group_1"]);
    }

    #[test]
    fn test_positional_ordering_rules() {
        let err = spec_with(vec![arg!("files"; nargs = "+").into(), arg!("target").into()])
            .unwrap_err();
        assert!(matches!(err, SetupError::InvalidArgumentSpec { arg, .. } if arg == "target"));

        let err = spec_with(vec![arg!("first"; nargs = "?").into(), arg!("second").into()])
            .unwrap_err();
        assert!(matches!(err, SetupError::InvalidArgumentSpec { arg, .. } if arg == "second"));

        assert!(spec_with(vec![arg!("source").into(), arg!("rest"; nargs = "*").into()]).is_ok());
    }

    #[test]
    fn test_apply_sets_about() {
        let mut spec = ParserSpec::new("subcommand `hello`");
        spec.set_about(Some("Say hello.".into()));
        assert_eq!(spec.about(), Some("Say hello."));

        let cmd = spec.apply(Command::new("hello"));
        assert_eq!(cmd.get_about().map(|about| about.to_string()), Some("Say hello.".into()));
    }
}

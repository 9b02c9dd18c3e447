//! Argument and group declarations.
//!
//! Declarations are plain data: they record the names and options of a
//! command-line argument so they can be replayed against a parser later.
//! Nothing is validated here. Unknown or contradictory options are reported
//! when the declaration is applied, either by [`Application::args`] or by
//! subcommand and root command registration.
//!
//! ```rust
//! use arghelp::{arg, Argument, Group};
//!
//! let verbose = arg!("--verbose", "-v"; action = "store_true");
//! assert_eq!(verbose.names(), ["--verbose", "-v"]);
//!
//! let mode = Group::new([
//!     Argument::new(["-x"]).action("store_true").help("x mode"),
//!     Argument::new(["-y"]).action("store_true").help("y mode"),
//! ])
//! .required(true);
//! assert!(mode.is_required());
//! ```
//!
//! [`Application::args`]: crate::Application::args

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Option name to value mapping carried by an [`Argument`].
///
/// Keys follow argparse's keyword names (`action`, `type`, `help`, ...).
pub type Options = BTreeMap<String, Value>;

/// A single command-line argument: its name tokens plus options.
///
/// Name tokens are either flags (`-v`, `--verbose`) or exactly one
/// positional name (`file`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    names: Vec<String>,
    options: Options,
}

impl Argument {
    /// Creates an argument with the given name tokens and no options.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_options(names, Options::new())
    }

    /// Creates an argument with the given name tokens and options.
    pub fn with_options<I, S>(names: I, options: Options) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            options,
        }
    }

    /// The name tokens, in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The option mapping.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Looks up a single option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Returns the argument with `key` set to `value`.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Sets the `help` option.
    pub fn help(self, text: impl Into<String>) -> Self {
        self.option("help", text.into())
    }

    /// Sets the `action` option (`store`, `store_true`, `store_false`,
    /// `append` or `count`).
    pub fn action(self, action: &str) -> Self {
        self.option("action", action)
    }

    /// Sets the `type` option (`str`, `int` or `float`).
    pub fn value_type(self, ty: &str) -> Self {
        self.option("type", ty)
    }

    /// Sets the `default` option.
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.option("default", value)
    }

    /// Sets the `required` option.
    pub fn required(self, required: bool) -> Self {
        self.option("required", required)
    }

    /// Sets the `choices` option.
    pub fn choices<I, V>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let choices: Vec<Value> = choices.into_iter().map(Into::into).collect();
        self.option("choices", choices)
    }

    /// Sets the `nargs` option (`"?"`, `"*"`, `"+"` or a count).
    pub fn nargs(self, nargs: impl Into<Value>) -> Self {
        self.option("nargs", nargs)
    }

    /// Sets the `metavar` option.
    pub fn metavar(self, metavar: impl Into<String>) -> Self {
        self.option("metavar", metavar.into())
    }

    /// Sets the `dest` option.
    pub fn dest(self, dest: impl Into<String>) -> Self {
        self.option("dest", dest.into())
    }

    /// The name tokens joined with `/`, used to identify the argument in
    /// error messages.
    pub fn label(&self) -> String {
        self.names.join("/")
    }

    /// Splits the argument into its name tokens and options.
    pub fn into_parts(self) -> (Vec<String>, Options) {
        (self.names, self.options)
    }
}

/// Pairs name tokens with options.
///
/// Names keep their order and options are taken as given, without any
/// validation.
///
/// ```rust
/// use arghelp::{argument, Options};
///
/// let mut options = Options::new();
/// options.insert("action".into(), "store_true".into());
///
/// let list = argument(["--list", "-l"], options.clone());
/// assert_eq!(list.names(), ["--list", "-l"]);
/// assert_eq!(list.options(), &options);
/// ```
pub fn argument<I, S>(names: I, options: Options) -> Argument
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Argument::with_options(names, options)
}

/// A set of mutually exclusive arguments.
///
/// When `required` is set, exactly one member must be given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    args: Vec<Argument>,
    required: bool,
}

impl Group {
    /// Creates an optional group from the given arguments.
    pub fn new<I>(args: I) -> Self
    where
        I: IntoIterator<Item = Argument>,
    {
        Self {
            args: args.into_iter().collect(),
            required: false,
        }
    }

    /// Returns the group with its `required` flag set.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The member arguments.
    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    /// Whether one of the members must be given.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// One entry of a declaration list: a plain argument or an exclusive group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Declaration {
    /// Applied to the parser as-is.
    Single(Argument),
    /// Applied as a mutually exclusive group.
    Mutex(Group),
}

impl From<Argument> for Declaration {
    fn from(arg: Argument) -> Self {
        Declaration::Single(arg)
    }
}

impl From<Group> for Declaration {
    fn from(group: Group) -> Self {
        Declaration::Mutex(group)
    }
}

//! The command-line application builder.

use clap::{ArgMatches, Command};
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

use crate::declare::Declaration;
use crate::dispatch::{resolve, Dispatch, RunError};
use crate::handler::{FnHandler, Handler, HandlerResult};
use crate::namespace::Namespace;
use crate::parser::ParserSpec;
use crate::setup::SetupError;

/// Derives a subcommand name from a function identifier.
///
/// Underscores become hyphens, so `say_hello` is invoked as `say-hello`.
///
/// ```rust
/// assert_eq!(arghelp::subcommand_name("say_hello"), "say-hello");
/// ```
pub fn subcommand_name(ident: &str) -> String {
    ident.replace('_', "-")
}

struct SubcommandEntry {
    name: String,
    parser: ParserSpec,
    handler: Box<dyn Handler>,
}

/// A command-line application builder.
///
/// The application owns the top-level parser, a registry of subcommands and
/// at most one root command. The registry is created lazily by the first
/// call to [`subcommand`](Self::subcommand); until then the application has
/// no subcommand support and only the root command can run.
///
/// # Example
///
/// ```rust
/// use arghelp::{arg, Application, Dispatch};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let squared = Rc::new(Cell::new(0));
/// let out = squared.clone();
///
/// let mut app = Application::named("demo");
/// app.subcommand(vec![arg!("number"; type = "int").into()])
///     .about("Square a number.")
///     .register("square", move |args| {
///         let n = args.get_i64("number").unwrap_or_default();
///         out.set(n * n);
///         Ok(())
///     })
///     .unwrap();
///
/// let dispatch = app.run_from(["square", "7"]).unwrap();
/// assert_eq!(dispatch, Dispatch::Subcommand("square".into()));
/// assert_eq!(squared.get(), 49);
/// ```
pub struct Application {
    name: String,
    about: Option<String>,
    epilog: Option<String>,
    root: ParserSpec,
    subcommands: Option<Vec<SubcommandEntry>>,
    root_handler: Option<Box<dyn Handler>>,
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl Application {
    /// Creates an application named after the running program.
    pub fn new() -> Self {
        Self::named(program_name())
    }

    /// Creates an application with an explicit program name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            epilog: None,
            root: ParserSpec::new("the top-level parser"),
            subcommands: None,
            root_handler: None,
        }
    }

    /// Creates an application with common top-level arguments.
    pub fn with_args(declarations: Vec<Declaration>) -> Result<Self, SetupError> {
        Self::new().args(declarations)
    }

    /// Sets the description shown at the top of the help text.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Sets text shown after the help text.
    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = Some(epilog.into());
        self
    }

    /// Adds top-level arguments shared by every command.
    pub fn args(mut self, declarations: Vec<Declaration>) -> Result<Self, SetupError> {
        self.root.add_declarations(&declarations)?;
        Ok(self)
    }

    /// The program name used in usage and help text.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of registered subcommands.
    pub fn subcommand_count(&self) -> usize {
        self.subcommands.as_ref().map_or(0, Vec::len)
    }

    /// Returns subcommand names and descriptions in registration order.
    pub fn subcommands(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.subcommands
            .iter()
            .flatten()
            .map(|entry| (entry.name.as_str(), entry.parser.about()))
    }

    /// Returns true if a root command is registered.
    pub fn has_root_command(&self) -> bool {
        self.root_handler.is_some()
    }

    /// Starts registering a subcommand with the given arguments.
    ///
    /// Calling this enables subcommand support, even if the registration is
    /// never completed.
    ///
    /// ```rust
    /// use arghelp::{arg, Application, Group};
    ///
    /// let mut app = Application::named("demo");
    /// app.subcommand(vec![
    ///     arg!("--verbose", "-v"; action = "store_true").into(),
    ///     Group::new([
    ///         arg!("-x"; action = "store_true", help = "x mode"),
    ///         arg!("-y"; action = "store_true", help = "y mode"),
    ///     ])
    ///     .required(true)
    ///     .into(),
    /// ])
    /// .register("required", |args| {
    ///     println!("{args:?}");
    ///     Ok(())
    /// })
    /// .unwrap();
    ///
    /// assert!(app.try_parse_args_from(["required"]).is_err());
    /// assert!(app.try_parse_args_from(["required", "-x"]).is_ok());
    /// ```
    pub fn subcommand(&mut self, declarations: Vec<Declaration>) -> SubcommandRegistration<'_> {
        self.subcommands.get_or_insert_with(Vec::new);
        SubcommandRegistration {
            app: self,
            declarations,
            about: None,
        }
    }

    /// Starts registering the root command, which runs when no subcommand
    /// is given.
    ///
    /// The declarations are added to the top-level parser alongside the
    /// arguments given at construction.
    pub fn root_command(&mut self, declarations: Vec<Declaration>) -> RootRegistration<'_> {
        RootRegistration {
            app: self,
            declarations,
        }
    }

    /// Assembles the clap command from everything declared so far.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.name.clone()).disable_help_subcommand(true);
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        if let Some(epilog) = &self.epilog {
            cmd = cmd.after_help(epilog.clone());
        }
        cmd = self.root.apply(cmd);
        for entry in self.subcommands.iter().flatten() {
            cmd = cmd.subcommand(entry.parser.apply(Command::new(entry.name.clone())));
        }
        cmd
    }

    /// Parses the process arguments, exiting on a usage error.
    pub fn parse_args(&self) -> Namespace {
        self.parse_args_from(std::env::args_os().skip(1))
    }

    /// Parses `argv` (without the program name), exiting on a usage error.
    ///
    /// Usage errors go to standard error with exit code 2; `--help` prints
    /// to standard output and exits with 0.
    pub fn parse_args_from<I, T>(&self, argv: I) -> Namespace
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match self.try_parse_args_from(argv) {
            Ok(args) => args,
            Err(err) => err.exit(),
        }
    }

    /// Parses `argv` (without the program name).
    pub fn try_parse_args_from<I, T>(&self, argv: I) -> Result<Namespace, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.try_get_matches_from(argv)?;
        Ok(self.namespace(&matches))
    }

    /// Parses the process arguments and runs the selected command.
    pub fn run(&mut self) -> anyhow::Result<Dispatch> {
        self.run_from(std::env::args_os().skip(1))
    }

    /// Parses `argv` (without the program name) and runs the selected
    /// command.
    ///
    /// Exits on a usage error like [`parse_args_from`](Self::parse_args_from).
    /// Handler errors are returned as-is.
    pub fn run_from<I, T>(&mut self, argv: I) -> anyhow::Result<Dispatch>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match self.try_run_from(argv) {
            Ok(dispatch) => Ok(dispatch),
            Err(RunError::Parse(err)) => err.exit(),
            Err(RunError::Handler(err)) => Err(err),
            Err(RunError::Io(err)) => Err(err.into()),
        }
    }

    /// Parses `argv` (without the program name) and runs the selected
    /// command, returning parse errors instead of exiting.
    ///
    /// With neither a matching subcommand nor a root command, top-level
    /// help is printed to standard output and [`Dispatch::Usage`] is
    /// returned.
    pub fn try_run_from<I, T>(&mut self, argv: I) -> Result<Dispatch, RunError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.try_get_matches_from(argv)?;
        let args = self.namespace(&matches);
        let dispatch = resolve(
            self.subcommands.is_some(),
            self.root_handler.is_some(),
            args.subcommand(),
        );
        debug!(?dispatch, "dispatching");

        let handler = match &dispatch {
            Dispatch::Root => self.root_handler.as_deref_mut(),
            Dispatch::Subcommand(name) => self
                .subcommands
                .iter_mut()
                .flatten()
                .find(|entry| entry.name == *name)
                .map(|entry| entry.handler.as_mut()),
            Dispatch::Usage => None,
        };

        match handler {
            Some(handler) => {
                handler.handle(&args).map_err(RunError::Handler)?;
                Ok(dispatch)
            }
            None => {
                if !dispatch.is_usage() {
                    warn!(?dispatch, "no handler registered; printing help");
                }
                self.print_help()?;
                Ok(Dispatch::Usage)
            }
        }
    }

    /// Renders the full help text.
    pub fn render_help(&self) -> String {
        self.command().render_help().to_string()
    }

    /// Prints the full help text to standard output.
    pub fn print_help(&self) -> std::io::Result<()> {
        self.command().print_help()
    }

    /// Renders the one-line usage summary.
    pub fn render_usage(&self) -> String {
        self.command().render_usage().to_string()
    }

    /// Prints the usage summary to standard output.
    pub fn print_usage(&self) {
        println!("{}", self.render_usage());
    }

    fn try_get_matches_from<I, T>(&self, argv: I) -> Result<ArgMatches, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let program = OsString::from(self.name.clone());
        self.command()
            .try_get_matches_from(std::iter::once(program).chain(argv.into_iter().map(Into::into)))
    }

    fn namespace(&self, matches: &ArgMatches) -> Namespace {
        let mut args = Namespace::new();
        args.read(matches, self.root.slots());
        if let Some((name, sub_matches)) = matches.subcommand() {
            if let Some(entry) = self.find_subcommand(name) {
                args.read(sub_matches, entry.parser.slots());
            }
            args.set_subcommand(name);
        }
        args
    }

    fn find_subcommand(&self, name: &str) -> Option<&SubcommandEntry> {
        self.subcommands
            .iter()
            .flatten()
            .find(|entry| entry.name == name)
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subcommands: Option<Vec<&str>> = self
            .subcommands
            .as_ref()
            .map(|entries| entries.iter().map(|entry| entry.name.as_str()).collect());
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("about", &self.about)
            .field("subcommands", &subcommands)
            .field("has_root_command", &self.has_root_command())
            .finish_non_exhaustive()
    }
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "app".to_string())
}

/// A pending subcommand registration, completed by
/// [`register`](Self::register).
#[must_use = "the subcommand is not registered until `register` is called"]
pub struct SubcommandRegistration<'a> {
    app: &'a mut Application,
    declarations: Vec<Declaration>,
    about: Option<String>,
}

impl SubcommandRegistration<'_> {
    /// Sets the description shown in the subcommand's help.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Registers `handler` under `name`.
    pub fn register<F>(self, name: impl Into<String>, handler: F) -> Result<(), SetupError>
    where
        F: FnMut(&Namespace) -> HandlerResult + 'static,
    {
        self.register_handler(name, FnHandler::new(handler))
    }

    /// Registers a [`Handler`] implementation under `name`.
    pub fn register_handler<H>(self, name: impl Into<String>, handler: H) -> Result<(), SetupError>
    where
        H: Handler + 'static,
    {
        let name = name.into();
        if name.is_empty() || name.starts_with('-') || name.chars().any(char::is_whitespace) {
            return Err(SetupError::InvalidSubcommandName(name));
        }

        let registry = self.app.subcommands.get_or_insert_with(Vec::new);
        if registry.iter().any(|entry| entry.name == name) {
            return Err(SetupError::DuplicateSubcommand(name));
        }

        let mut parser = ParserSpec::new(format!("subcommand `{name}`"));
        parser.set_about(self.about);
        parser.add_declarations(&self.declarations)?;

        debug!(subcommand = %name, declarations = self.declarations.len(), "registered subcommand");
        registry.push(SubcommandEntry {
            name,
            parser,
            handler: Box::new(handler),
        });
        Ok(())
    }
}

/// A pending root command registration, completed by
/// [`register`](Self::register).
#[must_use = "the root command is not registered until `register` is called"]
pub struct RootRegistration<'a> {
    app: &'a mut Application,
    declarations: Vec<Declaration>,
}

impl RootRegistration<'_> {
    /// Registers `handler` as the root command.
    pub fn register<F>(self, handler: F) -> Result<(), SetupError>
    where
        F: FnMut(&Namespace) -> HandlerResult + 'static,
    {
        self.register_handler(FnHandler::new(handler))
    }

    /// Registers a [`Handler`] implementation as the root command.
    pub fn register_handler<H>(self, handler: H) -> Result<(), SetupError>
    where
        H: Handler + 'static,
    {
        if self.app.root_handler.is_some() {
            return Err(SetupError::MultipleRootCommands);
        }
        self.app.root.add_declarations(&self.declarations)?;

        debug!(declarations = self.declarations.len(), "registered root command");
        self.app.root_handler = Some(Box::new(handler));
        Ok(())
    }
}

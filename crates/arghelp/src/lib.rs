//! Declarative subcommand registration and dispatch for clap-based CLIs.
//!
//! `arghelp` lets you describe a command line as lists of argument
//! declarations, each list paired with the function that handles it. It
//! records the declarations, replays them against a [`clap::Command`], and
//! dispatches the parsed result to the matching handler.
//!
//! Parsing itself (tokenizing, type conversion, help and usage text, exit
//! codes) is entirely clap's.
//!
//! # Quick Start
//!
//! ```rust
//! use arghelp::{arg, Application};
//!
//! let mut app = Application::with_args(vec![
//!     arg!("--verbose", "-v"; action = "store_true").into(),
//! ])
//! .unwrap();
//!
//! app.subcommand(vec![arg!("name").into()])
//!     .about("Say hello.")
//!     .register("hello", |args| {
//!         let greeting = if args.get_bool("verbose") == Some(true) { "Hello" } else { "Hi" };
//!         println!("{greeting}, {}!", args.get_str("name").unwrap_or_default());
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! app.root_command(vec![])
//!     .register(|_| {
//!         println!("Nothing to see here. Move along!");
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! app.run_from(["-v", "hello", "world"]).unwrap();
//! ```
//!
//! # Dispatch Rules
//!
//! - A selected subcommand runs its handler.
//! - With no subcommand on the command line, the root command runs.
//! - With neither, top-level help is printed to standard output.
//!
//! Handler errors are returned to the caller unchanged. Usage errors end
//! the process through clap (`run_from`, `parse_args_from`) or come back as
//! [`clap::Error`] (`try_run_from`, `try_parse_args_from`).
//!
//! # Key Types
//!
//! - [`Application`]: the builder that owns parsers and handlers
//! - [`Argument`] / [`Group`] / [`Declaration`]: what a command accepts
//! - [`Namespace`]: the parsed values handed to handlers
//! - [`Handler`] / [`FnHandler`]: command implementations
//! - [`Dispatch`]: what a run ended up doing
//! - [`SetupError`] / [`RunError`]: registration and run failures

mod app;
mod declare;
mod dispatch;
mod handler;
mod macros;
mod namespace;
mod parser;
mod setup;
mod translate;

pub use app::{subcommand_name, Application, RootRegistration, SubcommandRegistration};

pub use declare::{argument, argument as arg, Argument, Declaration, Group, Options};

pub use dispatch::{resolve, selected_subcommand, Dispatch, RunError};

pub use handler::{FnHandler, Handler, HandlerResult};

pub use namespace::Namespace;

pub use setup::SetupError;

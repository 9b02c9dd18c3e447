//! Mutually exclusive groups on subcommands and on the root command.

use std::cell::RefCell;
use std::rc::Rc;

use arghelp::{arg, Application, Declaration, Group, HandlerResult, Namespace};
use tracing::debug;

fn modes(required: bool) -> Vec<Declaration> {
    vec![
        arg!("--verbose", "-v"; action = "store_true").into(),
        Group::new([
            arg!("-x"; action = "store_true", help = "x mode"),
            arg!("-y"; action = "store_true", help = "y mode"),
        ])
        .required(required)
        .into(),
    ]
}

fn show(args: &Namespace) -> HandlerResult {
    debug!(subcommand = ?args.subcommand(), "showing parsed arguments");
    println!("{}", serde_json::to_string(args)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    arghelp_demos::init_logging();

    let mut app = Application::new();

    app.subcommand(modes(true)).register("required", show)?;
    app.subcommand(modes(false)).register("optional", show)?;

    // The root handler prints usage, which only exists once registration is done.
    let usage = Rc::new(RefCell::new(String::new()));
    let root_usage = Rc::clone(&usage);
    app.root_command(vec![
        arg!("--flag", "-f"; action = "store_true").into(),
        Group::new([
            arg!("-u"; action = "store_true", help = "x mode"),
            arg!("-v"; action = "store_true", help = "y mode"),
        ])
        .into(),
    ])
    .register(move |args| {
        debug!(flag = ?args.get_bool("flag"), "root command");
        println!("{}", root_usage.borrow());
        Ok(())
    })?;
    usage.replace(app.render_usage());

    app.run()?;
    Ok(())
}

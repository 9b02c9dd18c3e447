//! Two subcommands sharing a top-level `--verbose` flag.

use arghelp::{arg, subcommand, Application, HandlerResult, Namespace};
use tracing::debug;

fn verbose(args: &Namespace) -> bool {
    debug!(subcommand = ?args.subcommand(), name = ?args.get_str("name"), "greeting");
    args.get_bool("verbose") == Some(true)
}

fn hello(args: &Namespace) -> HandlerResult {
    let mut output = format!("Hello, {}!", args.get_str("name").unwrap_or_default());
    if verbose(args) {
        output.push_str(" How are you today?");
    }
    println!("{output}");
    Ok(())
}

fn goodbye(args: &Namespace) -> HandlerResult {
    let mut output = format!("Goodbye, {}!", args.get_str("name").unwrap_or_default());
    if verbose(args) {
        output.push_str(" See you soon!");
    }
    println!("{output}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    arghelp_demos::init_logging();

    let mut app = Application::with_args(vec![
        arg!("--verbose", "-v"; action = "store_true", help = "Say a little more").into(),
    ])?
    .about("Greets people.");

    subcommand!(app, hello, [arg!("name"; help = "Who to greet")], about = "Say hello.")?;
    subcommand!(app, goodbye, [arg!("name"; help = "Who to see off")], about = "Say goodbye.")?;

    app.run()?;
    Ok(())
}

//! Subcommands next to a root command that runs when none is given.

use arghelp::{arg, subcommand, Application, HandlerResult, Namespace};
use tracing::debug;

fn droids(_: &Namespace) -> HandlerResult {
    println!("These aren't the droids you're looking for.");
    Ok(())
}

fn square(args: &Namespace) -> HandlerResult {
    let number = args
        .get_i64("number")
        .ok_or_else(|| anyhow::anyhow!("number is required"))?;
    debug!(number, "squaring");
    let squared = number
        .checked_mul(number)
        .ok_or_else(|| anyhow::anyhow!("{number} squared does not fit in 64 bits"))?;
    println!("{squared}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    arghelp_demos::init_logging();

    let mut app = Application::new();

    app.root_command(vec![]).register(|_| {
        println!("Nothing to see here. Move along!");
        Ok(())
    })?;

    subcommand!(app, droids)?;
    subcommand!(app, square, [arg!("number"; type = "int")])?;

    app.run()?;
    Ok(())
}

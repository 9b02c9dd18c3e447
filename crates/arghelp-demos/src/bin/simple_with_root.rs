//! Top-level arguments handled by a root command.

use arghelp::{arg, Application};
use tracing::debug;

fn main() -> anyhow::Result<()> {
    arghelp_demos::init_logging();

    let mut app = Application::with_args(vec![
        arg!("-v", "--verbose"; action = "store_true").into(),
        arg!("name").into(),
    ])?;

    app.root_command(vec![]).register(|args| {
        debug!(?args, "root command");
        let greeting = if args.get_bool("verbose") == Some(true) {
            "hello"
        } else {
            "hi"
        };
        println!("{greeting}, {}", args.get_str("name").unwrap_or_default());
        Ok(())
    })?;

    app.run()?;
    Ok(())
}

//! Top-level arguments only: parse and use the result directly.

use arghelp::{arg, Application};
use tracing::debug;

fn main() -> anyhow::Result<()> {
    arghelp_demos::init_logging();

    let app = Application::with_args(vec![
        arg!("-v", "--verbose"; action = "store_true").into(),
        arg!("name").into(),
    ])?;

    let args = app.parse_args();
    debug!(?args, "parsed arguments");
    let greeting = if args.get_bool("verbose") == Some(true) {
        "hello"
    } else {
        "hi"
    };
    println!("{greeting}, {}", args.get_str("name").unwrap_or_default());
    Ok(())
}

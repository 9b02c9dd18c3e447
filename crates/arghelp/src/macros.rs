//! Declaration and registration macros.

/// Builds an [`Argument`](crate::Argument) from name tokens and keyword
/// options.
///
/// Keywords are stringified, so argparse's spelling works unchanged,
/// including `type`.
///
/// ```rust
/// use arghelp::arg;
/// use serde_json::json;
///
/// let list = arg!("--list", "-l"; action = "store_true", help = "List everything");
/// assert_eq!(list.names(), ["--list", "-l"]);
/// assert_eq!(list.get("action"), Some(&json!("store_true")));
///
/// let number = arg!("number"; type = "int");
/// assert_eq!(number.get("type"), Some(&json!("int")));
///
/// let name = arg!("name");
/// assert!(name.options().is_empty());
/// ```
#[macro_export]
macro_rules! arg {
    ($($name:expr),+ ; $($key:tt = $value:expr),* $(,)?) => {
        $crate::Argument::new(::std::vec![$(::std::string::String::from($name)),+])
            $(.option(stringify!($key), $value))*
    };
    ($($name:expr),+ $(,)?) => {
        $crate::Argument::new(::std::vec![$(::std::string::String::from($name)),+])
    };
}

/// Registers a function as a subcommand named after its identifier.
///
/// Underscores in the identifier become hyphens (see
/// [`subcommand_name`](crate::subcommand_name)). Expands to the same
/// registration chain as [`Application::subcommand`], so it evaluates to
/// `Result<(), SetupError>`.
///
/// ```rust
/// use arghelp::{arg, subcommand, Application, HandlerResult, Namespace};
///
/// fn say_hello(args: &Namespace) -> HandlerResult {
///     println!("Hello, {}!", args.get_str("name").unwrap_or_default());
///     Ok(())
/// }
///
/// fn ping(_: &Namespace) -> HandlerResult {
///     Ok(())
/// }
///
/// let mut app = Application::named("demo");
/// subcommand!(app, say_hello, [arg!("name")], about = "Say hello.").unwrap();
/// subcommand!(app, ping).unwrap();
///
/// let names: Vec<&str> = app.subcommands().map(|(name, _)| name).collect();
/// assert_eq!(names, ["say-hello", "ping"]);
/// ```
///
/// [`Application::subcommand`]: crate::Application::subcommand
#[macro_export]
macro_rules! subcommand {
    ($app:expr, $handler:ident $(,)?) => {
        $crate::subcommand!($app, $handler, [])
    };
    ($app:expr, $handler:ident, [$($decl:expr),* $(,)?] $(,)?) => {{
        let declarations: ::std::vec::Vec<$crate::Declaration> =
            ::std::vec![$($crate::Declaration::from($decl)),*];
        $app.subcommand(declarations)
            .register($crate::subcommand_name(stringify!($handler)), $handler)
    }};
    ($app:expr, $handler:ident, [$($decl:expr),* $(,)?], about = $about:expr $(,)?) => {{
        let declarations: ::std::vec::Vec<$crate::Declaration> =
            ::std::vec![$($crate::Declaration::from($decl)),*];
        $app.subcommand(declarations)
            .about($about)
            .register($crate::subcommand_name(stringify!($handler)), $handler)
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Application, Group, HandlerResult, Namespace};
    use serde_json::json;

    #[test]
    fn test_arg_macro_without_options() {
        let arg = arg!("--verbose", "-v");
        assert_eq!(arg.names(), ["--verbose", "-v"]);
        assert!(arg.options().is_empty());
    }

    #[test]
    fn test_arg_macro_with_options() {
        let arg = arg!("--count"; type = "int", default = 3, choices = vec![1, 2, 3],);
        assert_eq!(arg.get("type"), Some(&json!("int")));
        assert_eq!(arg.get("default"), Some(&json!(3)));
        assert_eq!(arg.get("choices"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn test_arg_macro_accepts_owned_names() {
        let flag = String::from("--name");
        let arg = arg!(flag, "-n");
        assert_eq!(arg.names(), ["--name", "-n"]);
    }

    #[test]
    fn test_subcommand_macro_with_group() {
        fn pick_one(_: &Namespace) -> HandlerResult {
            Ok(())
        }

        let mut app = Application::named("app");
        subcommand!(
            app,
            pick_one,
            [Group::new([arg!("-x"), arg!("-y")]).required(true)],
        )
        .unwrap();

        let args = app.try_parse_args_from(["pick-one", "-y", "2"]).unwrap();
        assert_eq!(args.subcommand(), Some("pick-one"));
        assert_eq!(args["y"], "2");
    }
}

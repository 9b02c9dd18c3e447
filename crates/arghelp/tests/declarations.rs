use arghelp::{arg, argument, Argument, Options};
use proptest::prelude::*;
use serde_json::Value;

fn option_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z_ ]{0,12}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn argument_keeps_names_and_options(
        names in prop::collection::vec("-{0,2}[a-z][a-z0-9-]{0,10}", 0..5),
        options in prop::collection::btree_map("[a-z_]{1,10}", option_value(), 0..6),
    ) {
        let options: Options = options;
        let built = argument(names.clone(), options.clone());
        prop_assert_eq!(built.names(), names.as_slice());
        prop_assert_eq!(built.options(), &options);

        let aliased = arghelp::arg(names.clone(), options.clone());
        prop_assert_eq!(aliased, built);
    }

    #[test]
    fn into_parts_returns_what_went_in(
        names in prop::collection::vec("[a-z]{1,8}", 1..4),
        help in "[a-zA-Z ]{0,20}",
    ) {
        let (out_names, out_options) = Argument::new(names.clone()).help(help.clone()).into_parts();
        prop_assert_eq!(out_names, names);
        prop_assert_eq!(out_options.get("help"), Some(&Value::from(help)));
    }
}

#[test]
fn test_macro_matches_function() {
    let mut options = Options::new();
    options.insert("action".into(), "store_true".into());
    options.insert("help".into(), "List everything".into());

    assert_eq!(
        arg!("--list", "-l"; action = "store_true", help = "List everything"),
        argument(["--list", "-l"], options)
    );
}

#[test]
fn test_positional_names_are_kept_verbatim() {
    let arg = arg!("1", "2", "3"; name = "name");
    assert_eq!(arg.names(), ["1", "2", "3"]);
    assert_eq!(arg.get("name"), Some(&Value::from("name")));
}

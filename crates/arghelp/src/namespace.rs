//! The parsed result handed to handlers.

use clap::ArgMatches;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::Index;

use crate::translate::{Slot, ValueShape, ValueType};

static NULL: Value = Value::Null;

/// Parsed command-line values, keyed by destination name.
///
/// Values from the top-level parser and from the selected subcommand live in
/// one flat mapping; a subcommand value shadows a top-level value with the
/// same name. Arguments that were not given and have no default read as
/// [`Value::Null`]. Indexing with a missing name also yields `Null`.
///
/// ```rust
/// use arghelp::{arg, Application};
///
/// let app = Application::with_args(vec![
///     arg!("--verbose", "-v"; action = "store_true").into(),
///     arg!("name").into(),
/// ])
/// .unwrap();
///
/// let args = app.try_parse_args_from(["-v", "world"]).unwrap();
/// assert_eq!(args["name"], "world");
/// assert_eq!(args.get_bool("verbose"), Some(true));
/// assert!(args["missing"].is_null());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Namespace {
    subcommand: Option<String>,
    values: BTreeMap<String, Value>,
}

impl Namespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected subcommand, if any.
    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    /// Returns the namespace with `subcommand` recorded as selected.
    pub fn with_subcommand(mut self, subcommand: impl Into<String>) -> Self {
        self.subcommand = Some(subcommand.into());
        self
    }

    /// Looks up a value by destination name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Looks up a string value.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Looks up a boolean value.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Looks up an integer value (`type = "int"` or `action = "count"`).
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// Looks up a float value.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// Looks up a list value (`append` or a multi-valued `nargs`).
    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// Returns true if `name` is a known destination, even when its value is
    /// `Null`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Sets a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Iterates over destination names and values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The number of destinations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no destinations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn set_subcommand(&mut self, name: &str) {
        self.subcommand = Some(name.to_string());
    }

    /// Reads every slot's value out of `matches`.
    pub(crate) fn read<'a>(&mut self, matches: &ArgMatches, slots: impl Iterator<Item = &'a Slot>) {
        for slot in slots {
            self.values.insert(slot.dest.clone(), read_slot(matches, slot));
        }
    }
}

impl Index<&str> for Namespace {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&NULL)
    }
}

fn read_slot(matches: &ArgMatches, slot: &Slot) -> Value {
    let id = slot.dest.as_str();
    match slot.shape {
        ValueShape::Flag => read_one::<bool>(matches, id),
        ValueShape::Count => read_one::<u8>(matches, id),
        ValueShape::Single(ValueType::Str) => read_one::<String>(matches, id),
        ValueShape::Single(ValueType::Int) => read_one::<i64>(matches, id),
        ValueShape::Single(ValueType::Float) => read_one::<f64>(matches, id),
        ValueShape::List(ValueType::Str) => read_many::<String>(matches, id),
        ValueShape::List(ValueType::Int) => read_many::<i64>(matches, id),
        ValueShape::List(ValueType::Float) => read_many::<f64>(matches, id),
    }
}

fn read_one<T>(matches: &ArgMatches, id: &str) -> Value
where
    T: Clone + Send + Sync + Into<Value> + 'static,
{
    match matches.try_get_one::<T>(id) {
        Ok(Some(value)) => value.clone().into(),
        _ => Value::Null,
    }
}

fn read_many<T>(matches: &ArgMatches, id: &str) -> Value
where
    T: Clone + Send + Sync + Into<Value> + 'static,
{
    match matches.try_get_many::<T>(id) {
        Ok(Some(values)) => Value::Array(values.cloned().map(Into::into).collect()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserSpec;
    use crate::{arg, Declaration};
    use clap::Command;
    use serde_json::json;

    fn parse(declarations: Vec<Declaration>, argv: &[&str]) -> Namespace {
        let mut spec = ParserSpec::new("the top-level parser");
        spec.add_declarations(&declarations).unwrap();
        let matches = spec
            .apply(Command::new("app"))
            .try_get_matches_from(std::iter::once("app").chain(argv.iter().copied()))
            .unwrap();
        let mut ns = Namespace::new();
        ns.read(&matches, spec.slots());
        ns
    }

    #[test]
    fn test_flags_default_to_their_resting_value() {
        let ns = parse(
            vec![
                arg!("--yes"; action = "store_true").into(),
                arg!("--no-color"; action = "store_false").into(),
                arg!("-v"; action = "count").into(),
            ],
            &[],
        );
        assert_eq!(ns["yes"], json!(false));
        assert_eq!(ns["no_color"], json!(true));
        assert_eq!(ns["v"], json!(0));
    }

    #[test]
    fn test_flags_when_given() {
        let ns = parse(
            vec![
                arg!("--yes"; action = "store_true").into(),
                arg!("--no-color"; action = "store_false").into(),
                arg!("-v"; action = "count").into(),
            ],
            &["--yes", "--no-color", "-vvv"],
        );
        assert_eq!(ns.get_bool("yes"), Some(true));
        assert_eq!(ns.get_bool("no_color"), Some(false));
        assert_eq!(ns.get_i64("v"), Some(3));
    }

    #[test]
    fn test_missing_values_are_null() {
        let ns = parse(vec![arg!("-x").into(), arg!("--count"; type = "int").into()], &[]);
        assert!(ns.contains("x"));
        assert!(ns["x"].is_null());
        assert!(ns["count"].is_null());
    }

    #[test]
    fn test_typed_values() {
        let ns = parse(
            vec![
                arg!("number"; type = "int").into(),
                arg!("--ratio"; type = "float").into(),
            ],
            &["7", "--ratio", "0.5"],
        );
        assert_eq!(ns.get_i64("number"), Some(7));
        assert_eq!(ns.get_f64("ratio"), Some(0.5));
    }

    #[test]
    fn test_defaults_are_typed() {
        let ns = parse(
            vec![
                arg!("--retries"; type = "int", default = "3").into(),
                arg!("--name"; default = "anon").into(),
            ],
            &[],
        );
        assert_eq!(ns["retries"], json!(3));
        assert_eq!(ns["name"], json!("anon"));
    }

    #[test]
    fn test_lists() {
        let ns = parse(
            vec![
                arg!("--tag"; action = "append").into(),
                arg!("--point"; type = "int", nargs = 2).into(),
                arg!("files"; nargs = "*").into(),
            ],
            &["--tag", "a", "--tag", "b", "--point", "1", "2", "x.txt", "y.txt"],
        );
        assert_eq!(ns["tag"], json!(["a", "b"]));
        assert_eq!(ns["point"], json!([1, 2]));
        assert_eq!(ns.get_list("files").map(<[Value]>::len), Some(2));
    }

    #[test]
    fn test_index_missing_is_null() {
        let ns = Namespace::new();
        assert!(ns["anything"].is_null());
        assert!(ns.is_empty());
    }

    #[test]
    fn test_insert_and_iter() {
        let mut ns = Namespace::new().with_subcommand("hello");
        ns.insert("name", "world");
        ns.insert("verbose", true);

        assert_eq!(ns.subcommand(), Some("hello"));
        assert_eq!(ns.len(), 2);
        let names: Vec<&str> = ns.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["name", "verbose"]);
    }

    #[test]
    fn test_serializes_as_json() {
        let mut ns = Namespace::new().with_subcommand("sub1");
        ns.insert("x", "1");
        assert_eq!(
            serde_json::to_value(&ns).unwrap(),
            json!({"subcommand": "sub1", "values": {"x": "1"}})
        );
    }
}

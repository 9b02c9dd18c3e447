//! Translation of [`Argument`] declarations into clap arguments.
//!
//! This is the only place where declaration options are interpreted. Each
//! argument becomes a [`clap::Arg`] plus a [`Slot`] that says how to read
//! its value back out of the parse result.
//!
//! Supported options mirror argparse's keywords:
//!
//! | key | accepted values |
//! |-----|-----------------|
//! | `action` | `store` (default), `store_true`, `store_false`, `append`, `count` |
//! | `type` | `str` (default), `int`, `float` |
//! | `help`, `metavar`, `dest` | strings |
//! | `default` | string, number or bool |
//! | `required` | bool, flags only |
//! | `choices` | array of strings or numbers |
//! | `nargs` | `"?"`, `"*"`, `"+"` or a count of at least one |

use clap::builder::{PossibleValuesParser, ValueParser};
use clap::{Arg, ArgAction};
use serde_json::Value;
use std::fmt;

use crate::declare::Argument;
use crate::setup::SetupError;

const KNOWN_OPTIONS: &[&str] = &[
    "action", "type", "help", "default", "required", "choices", "nargs", "metavar", "dest",
];

/// Options that only make sense for arguments that take a value.
const VALUE_OPTIONS: &[&str] = &["type", "choices", "nargs", "metavar", "default"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Store,
    StoreTrue,
    StoreFalse,
    Append,
    Count,
}

impl Action {
    fn takes_value(self) -> bool {
        matches!(self, Action::Store | Action::Append)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Store => "store",
            Action::StoreTrue => "store_true",
            Action::StoreFalse => "store_false",
            Action::Append => "append",
            Action::Count => "count",
        };
        f.write_str(name)
    }
}

/// The type a value is parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueType {
    Str,
    Int,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nargs {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
    Exactly(usize),
}

impl Nargs {
    fn is_list(self) -> bool {
        match self {
            Nargs::ZeroOrMore | Nargs::OneOrMore => true,
            Nargs::Exactly(n) => n > 1,
            Nargs::One | Nargs::Optional => false,
        }
    }

    fn allows_none(self) -> bool {
        matches!(self, Nargs::Optional | Nargs::ZeroOrMore)
    }
}

/// How a parsed value is read back out of clap's matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueShape {
    Flag,
    Count,
    Single(ValueType),
    List(ValueType),
}

/// A destination in the parsed namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Slot {
    pub dest: String,
    pub shape: ValueShape,
}

/// A validated argument, ready to be added to a clap command.
#[derive(Debug, Clone)]
pub(crate) struct CompiledArg {
    pub arg: Arg,
    pub slot: Slot,
    /// Flag strings as declared; empty for positionals.
    pub flags: Vec<String>,
    pub required: bool,
}

impl CompiledArg {
    pub fn is_positional(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn is_list(&self) -> bool {
        matches!(self.slot.shape, ValueShape::List(_))
    }
}

enum Names {
    Flags {
        shorts: Vec<char>,
        longs: Vec<String>,
        raw: Vec<String>,
    },
    Positional(String),
}

/// Validates `argument` and turns it into a clap argument.
pub(crate) fn compile(argument: &Argument) -> Result<CompiledArg, SetupError> {
    let invalid = |reason: String| SetupError::InvalidArgumentSpec {
        arg: argument.label(),
        reason,
    };

    if let Some(key) = argument
        .options()
        .keys()
        .find(|key| !KNOWN_OPTIONS.contains(&key.as_str()))
    {
        return Err(invalid(format!("unknown option `{key}`")));
    }

    let names = parse_names(argument.names()).map_err(&invalid)?;
    let action = parse_action(argument).map_err(&invalid)?;
    let value_type = parse_type(argument).map_err(&invalid)?;
    let nargs = parse_nargs(argument).map_err(&invalid)?;
    let dest = match string_option(argument, "dest").map_err(&invalid)? {
        Some(dest) if dest.is_empty() => return Err(invalid("`dest` must not be empty".into())),
        Some(dest) => dest.to_string(),
        None => default_dest(&names),
    };

    if !action.takes_value() {
        if let Some(key) = VALUE_OPTIONS
            .iter()
            .find(|key| argument.options().contains_key(**key))
        {
            return Err(invalid(format!(
                "`{key}` cannot be combined with action=\"{action}\""
            )));
        }
    }
    if action == Action::Append && nargs != Nargs::One {
        return Err(invalid(
            "`nargs` cannot be combined with action=\"append\"".into(),
        ));
    }

    let mut arg = Arg::new(dest.clone());
    let flags = match &names {
        Names::Flags { shorts, longs, raw } => {
            if let Some((first, rest)) = shorts.split_first() {
                arg = arg.short(*first).visible_short_aliases(rest.to_vec());
            }
            if let Some((first, rest)) = longs.split_first() {
                arg = arg.long(first.clone()).visible_aliases(rest.to_vec());
            }
            raw.clone()
        }
        Names::Positional(_) => {
            if argument.options().contains_key("required") {
                return Err(invalid(
                    "`required` is not allowed for positional arguments".into(),
                ));
            }
            if !matches!(action, Action::Store) {
                return Err(invalid(format!(
                    "action=\"{action}\" requires a flag, not a positional name"
                )));
            }
            Vec::new()
        }
    };

    let required = match &names {
        Names::Flags { .. } => bool_option(argument, "required")
            .map_err(&invalid)?
            .unwrap_or(false),
        Names::Positional(_) => !nargs.allows_none(),
    };
    arg = arg.required(required);

    if let Some(help) = string_option(argument, "help").map_err(&invalid)? {
        arg = arg.help(help.to_string());
    }

    let shape = match action {
        Action::StoreTrue => {
            arg = arg.action(ArgAction::SetTrue);
            ValueShape::Flag
        }
        Action::StoreFalse => {
            arg = arg.action(ArgAction::SetFalse);
            ValueShape::Flag
        }
        Action::Count => {
            arg = arg.action(ArgAction::Count);
            ValueShape::Count
        }
        Action::Store | Action::Append => {
            let choices = parse_choices(argument, value_type).map_err(&invalid)?;
            if let Some(default) = argument.get("default") {
                let default = default_string(default, value_type, choices.as_ref())
                    .map_err(&invalid)?;
                arg = arg.default_value(default);
            }
            if let Some(metavar) = string_option(argument, "metavar").map_err(&invalid)? {
                arg = arg.value_name(metavar.to_string());
            }
            arg = arg.value_parser(value_parser(value_type, choices));
            arg = apply_nargs(arg, nargs, matches!(names, Names::Positional(_)));

            if action == Action::Append {
                arg = arg.action(ArgAction::Append);
                ValueShape::List(value_type)
            } else {
                arg = arg.action(ArgAction::Set);
                if nargs.is_list() {
                    ValueShape::List(value_type)
                } else {
                    ValueShape::Single(value_type)
                }
            }
        }
    };

    Ok(CompiledArg {
        arg,
        slot: Slot { dest, shape },
        flags,
        required,
    })
}

fn parse_names(names: &[String]) -> Result<Names, String> {
    let Some(first) = names.first() else {
        return Err("at least one name or flag is required".into());
    };

    if !first.starts_with('-') {
        if names.len() > 1 {
            return Err("a positional argument takes exactly one name".into());
        }
        if first.is_empty() {
            return Err("argument names must not be empty".into());
        }
        return Ok(Names::Positional(first.clone()));
    }

    let mut shorts = Vec::new();
    let mut longs = Vec::new();
    for name in names {
        if let Some(long) = name.strip_prefix("--") {
            if long.is_empty()
                || long.starts_with('-')
                || long.contains('=')
                || long.contains(char::is_whitespace)
            {
                return Err(format!("`{name}` is not a valid long flag"));
            }
            longs.push(long.to_string());
        } else if let Some(short) = name.strip_prefix('-') {
            let mut chars = short.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => shorts.push(c),
                _ => {
                    return Err(format!(
                        "`{name}` is not a valid flag; use `-x` or `--name`"
                    ))
                }
            }
        } else {
            return Err(format!(
                "cannot mix flags with the positional name `{name}`"
            ));
        }
    }

    Ok(Names::Flags {
        shorts,
        longs,
        raw: names.to_vec(),
    })
}

fn default_dest(names: &Names) -> String {
    match names {
        Names::Positional(name) => name.clone(),
        Names::Flags { shorts, longs, .. } => match longs.first() {
            Some(long) => long.replace('-', "_"),
            None => shorts.first().map(|c| c.to_string()).unwrap_or_default(),
        },
    }
}

fn string_option<'a>(argument: &'a Argument, key: &str) -> Result<Option<&'a str>, String> {
    match argument.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(format!("`{key}` must be a string, got {other}")),
    }
}

fn bool_option(argument: &Argument, key: &str) -> Result<Option<bool>, String> {
    match argument.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(format!("`{key}` must be a bool, got {other}")),
    }
}

fn parse_action(argument: &Argument) -> Result<Action, String> {
    match string_option(argument, "action")? {
        None | Some("store") => Ok(Action::Store),
        Some("store_true") => Ok(Action::StoreTrue),
        Some("store_false") => Ok(Action::StoreFalse),
        Some("append") => Ok(Action::Append),
        Some("count") => Ok(Action::Count),
        Some(other) => Err(format!("unknown action \"{other}\"")),
    }
}

fn parse_type(argument: &Argument) -> Result<ValueType, String> {
    match string_option(argument, "type")? {
        None | Some("str") => Ok(ValueType::Str),
        Some("int") => Ok(ValueType::Int),
        Some("float") => Ok(ValueType::Float),
        Some(other) => Err(format!("unknown type \"{other}\"")),
    }
}

fn parse_nargs(argument: &Argument) -> Result<Nargs, String> {
    match argument.get("nargs") {
        None => Ok(Nargs::One),
        Some(Value::String(s)) => match s.as_str() {
            "?" => Ok(Nargs::Optional),
            "*" => Ok(Nargs::ZeroOrMore),
            "+" => Ok(Nargs::OneOrMore),
            other => Err(format!("unknown nargs \"{other}\"")),
        },
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => Err("`nargs` must be at least 1".into()),
            Some(1) => Ok(Nargs::One),
            Some(n) => usize::try_from(n)
                .map(Nargs::Exactly)
                .map_err(|_| format!("`nargs` is too large: {n}")),
            None => Err(format!("`nargs` must be a positive count, got {n}")),
        },
        Some(other) => Err(format!("`nargs` must be a string or a count, got {other}")),
    }
}

/// Allowed values, already converted to the argument's type.
#[derive(Debug, Clone, PartialEq)]
enum Choices {
    Str(Vec<String>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

fn parse_choices(argument: &Argument, ty: ValueType) -> Result<Option<Choices>, String> {
    let Some(value) = argument.get("choices") else {
        return Ok(None);
    };
    let Value::Array(items) = value else {
        return Err(format!("`choices` must be an array, got {value}"));
    };
    if items.is_empty() {
        return Err("`choices` must not be empty".into());
    }

    let bad_choice = |item: &Value| format!("choice {item} does not match type {ty:?}");
    let choices = match ty {
        ValueType::Str => Choices::Str(
            items
                .iter()
                .map(|item| item.as_str().map(String::from).ok_or_else(|| bad_choice(item)))
                .collect::<Result<_, _>>()?,
        ),
        ValueType::Int => Choices::Int(
            items
                .iter()
                .map(|item| item.as_i64().ok_or_else(|| bad_choice(item)))
                .collect::<Result<_, _>>()?,
        ),
        ValueType::Float => Choices::Float(
            items
                .iter()
                .map(|item| item.as_f64().ok_or_else(|| bad_choice(item)))
                .collect::<Result<_, _>>()?,
        ),
    };
    Ok(Some(choices))
}

/// Renders a default as the string clap will parse, checking that it parses.
fn default_string(
    default: &Value,
    ty: ValueType,
    choices: Option<&Choices>,
) -> Result<String, String> {
    let text = match default {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => return Err(format!("`default` must be a string, number or bool, got {other}")),
    };

    let accepted = match (ty, choices) {
        (ValueType::Str, None) => true,
        (ValueType::Int, None) => text.parse::<i64>().is_ok(),
        (ValueType::Float, None) => text.parse::<f64>().is_ok(),
        (_, Some(Choices::Str(allowed))) => allowed.contains(&text),
        (_, Some(Choices::Int(allowed))) => text
            .parse::<i64>()
            .is_ok_and(|value| allowed.contains(&value)),
        (_, Some(Choices::Float(allowed))) => text
            .parse::<f64>()
            .is_ok_and(|value| allowed.contains(&value)),
    };
    if accepted {
        Ok(text)
    } else {
        Err(format!("default {default} is not a valid {ty:?} value"))
    }
}

fn value_parser(ty: ValueType, choices: Option<Choices>) -> ValueParser {
    match (ty, choices) {
        (_, Some(Choices::Str(allowed))) => PossibleValuesParser::new(allowed).into(),
        (_, Some(Choices::Int(allowed))) => ValueParser::new(move |s: &str| {
            let value: i64 = s
                .parse()
                .map_err(|_| format!("invalid int value: '{s}'"))?;
            if allowed.contains(&value) {
                Ok(value)
            } else {
                Err(format!("invalid choice: {value} (choose from {})", join(&allowed)))
            }
        }),
        (_, Some(Choices::Float(allowed))) => ValueParser::new(move |s: &str| {
            let value: f64 = s
                .parse()
                .map_err(|_| format!("invalid float value: '{s}'"))?;
            if allowed.contains(&value) {
                Ok(value)
            } else {
                Err(format!("invalid choice: {value} (choose from {})", join(&allowed)))
            }
        }),
        (ValueType::Str, None) => ValueParser::string(),
        (ValueType::Int, None) => clap::value_parser!(i64).into(),
        (ValueType::Float, None) => clap::value_parser!(f64).into(),
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn apply_nargs(arg: Arg, nargs: Nargs, positional: bool) -> Arg {
    match nargs {
        Nargs::One => arg,
        Nargs::Optional if positional => arg.num_args(1),
        Nargs::Optional => arg.num_args(0..=1),
        Nargs::ZeroOrMore => arg.num_args(0..),
        Nargs::OneOrMore => arg.num_args(1..),
        Nargs::Exactly(n) => arg.num_args(n),
    }
}

//! Command handler types.
//!
//! A handler receives the parsed [`Namespace`] and does the work of one
//! command. Its return value carries success or failure only; errors are
//! handed back to the caller of [`Application::run_from`] untouched.
//!
//! Handlers take `&mut self`, so closures registered as handlers are
//! `FnMut` and may mutate captured state across runs. CLI applications are
//! single-threaded, so nothing here requires `Send` or `Sync`.
//!
//! [`Application::run_from`]: crate::Application::run_from

use crate::namespace::Namespace;

/// The result type for command handlers.
pub type HandlerResult = Result<(), anyhow::Error>;

/// Trait for command handlers.
///
/// # Example
///
/// ```rust
/// use arghelp::{Handler, HandlerResult, Namespace};
///
/// struct Counter {
///     runs: u32,
/// }
///
/// impl Handler for Counter {
///     fn handle(&mut self, _args: &Namespace) -> HandlerResult {
///         self.runs += 1;
///         Ok(())
///     }
/// }
///
/// let mut counter = Counter { runs: 0 };
/// counter.handle(&Namespace::new()).unwrap();
/// assert_eq!(counter.runs, 1);
/// ```
pub trait Handler {
    /// Runs the command with the parsed arguments.
    fn handle(&mut self, args: &Namespace) -> HandlerResult;
}

/// Adapts an `FnMut` closure or function to [`Handler`].
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F>
where
    F: FnMut(&Namespace) -> HandlerResult,
{
    /// Wraps the given closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: FnMut(&Namespace) -> HandlerResult,
{
    fn handle(&mut self, args: &Namespace) -> HandlerResult {
        (self.f)(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_handler_mutates_captured_state() {
        let mut seen = Vec::new();
        {
            let mut handler = FnHandler::new(|args: &Namespace| {
                seen.push(args.get_str("name").unwrap_or_default().to_string());
                Ok(())
            });

            let mut args = Namespace::new();
            args.insert("name", "first");
            handler.handle(&args).unwrap();
            args.insert("name", "second");
            handler.handle(&args).unwrap();
        }
        assert_eq!(seen, ["first", "second"]);
    }

    #[test]
    fn test_fn_handler_propagates_errors() {
        let mut handler = FnHandler::new(|_: &Namespace| Err(anyhow::anyhow!("boom")));
        let err = handler.handle(&Namespace::new()).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_plain_function_as_handler() {
        fn greet(args: &Namespace) -> HandlerResult {
            anyhow::ensure!(args.contains("name"), "name is required");
            Ok(())
        }

        let mut handler = FnHandler::new(greet);
        assert!(handler.handle(&Namespace::new()).is_err());
    }
}

//! Router
//!
//! An ordered, append-only registry of (compiled grammar, handler)
//! entries. Routing tokenizes the command, tries each registered grammar
//! in registration order, and invokes the handler of the first grammar
//! whose match concludes. Registering several grammars for one handler
//! stacks alternative acceptance paths; the earliest registered wins.
//!
//! Handlers are plain closures taking the `RouteMatch` and a mutable
//! caller context, and returning the router's result type. The registry
//! is single-writer during setup and read-only during routing, so a fully
//! registered `Router` can serve `route_to` calls from many threads.

use crate::route::error::{GrammarError, RouteError};
use crate::route::grammar::Grammar;
use crate::route::matcher::{match_tokens, RouteMatch};
use crate::route::tokenizer;
use std::sync::Arc;

/// Handler signature: the match result plus a caller-supplied context.
pub type Handler<C, R> = Arc<dyn Fn(RouteMatch, &mut C) -> R + Send + Sync>;

/// One registry entry. The Vec position inside the router is its
/// registration order.
pub struct Route<C, R> {
    grammar: Arc<Grammar>,
    handler: Handler<C, R>,
}

impl<C, R> Route<C, R> {
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

/// Ordered first-match-wins command router.
pub struct Router<C = (), R = ()> {
    routes: Vec<Route<C, R>>,
}

impl<C, R> Router<C, R> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Compile `grammar_text` and register it with `handler`. A compile
    /// error is fatal to this registration only; earlier registrations
    /// stay in place.
    pub fn register<F>(&mut self, grammar_text: &str, handler: F) -> Result<&mut Self, GrammarError>
    where
        F: Fn(RouteMatch, &mut C) -> R + Send + Sync + 'static,
    {
        let grammar = Grammar::compile(grammar_text)?;
        Ok(self.register_grammar(grammar, handler))
    }

    /// Register an already compiled grammar.
    pub fn register_grammar<F>(&mut self, grammar: Grammar, handler: F) -> &mut Self
    where
        F: Fn(RouteMatch, &mut C) -> R + Send + Sync + 'static,
    {
        self.routes.push(Route {
            grammar: Arc::new(grammar),
            handler: Arc::new(handler),
        });
        self
    }

    /// Register a grammar built from raw (regex fragment, quantifier
    /// suffix) pairs — the escape hatch for patterns the textual grammar
    /// cannot express.
    pub fn register_fragments<F>(
        &mut self,
        pairs: &[(&str, &str)],
        handler: F,
    ) -> Result<&mut Self, GrammarError>
    where
        F: Fn(RouteMatch, &mut C) -> R + Send + Sync + 'static,
    {
        let grammar = Grammar::from_fragments(pairs)?;
        Ok(self.register_grammar(grammar, handler))
    }

    /// Register several alternative grammars for one handler. Resolution
    /// order among them is their order here.
    pub fn register_all<F>(
        &mut self,
        grammar_texts: &[&str],
        handler: F,
    ) -> Result<&mut Self, GrammarError>
    where
        F: Fn(RouteMatch, &mut C) -> R + Send + Sync + 'static,
    {
        let handler: Handler<C, R> = Arc::new(handler);
        for text in grammar_texts {
            let grammar = Grammar::compile(text)?;
            self.routes.push(Route {
                grammar: Arc::new(grammar),
                handler: Arc::clone(&handler),
            });
        }
        Ok(self)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve a command to its match without invoking the handler.
    pub fn match_command(&self, command: &str) -> Result<RouteMatch, RouteError> {
        self.resolve(command).map(|(_, m)| m)
    }

    /// Resolve a command and invoke the winning handler with the match
    /// and the caller context. Whatever the handler returns (or panics
    /// with) propagates unmodified.
    pub fn route_to(&self, command: &str, context: &mut C) -> Result<R, RouteError> {
        let (route, m) = self.resolve(command)?;
        Ok((route.handler)(m, context))
    }

    fn resolve(&self, command: &str) -> Result<(&Route<C, R>, RouteMatch), RouteError> {
        let tokens = tokenizer::tokenize(command).map_err(|e| RouteError::InvalidCommand {
            command: command.to_string(),
            reason: e.to_string(),
        })?;
        for route in &self.routes {
            let m = match_tokens(&route.grammar, &tokens);
            if m.conclusion() {
                return Ok((route, m));
            }
        }
        Err(RouteError::NoMatch {
            command: command.to_string(),
            considered: self
                .routes
                .iter()
                .map(|r| r.grammar.source_text().to_string())
                .collect(),
        })
    }
}

impl<C, R> Default for Router<C, R> {
    fn default() -> Self {
        Self::new()
    }
}

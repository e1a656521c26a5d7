//! # Validating Handler Wrapper
//!
//! Puts an [`InputValidator`] in front of an existing resolver. The
//! wrapped handler keeps its own contract and only ever sees arguments
//! that passed validation; a rejected payload never reaches it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use modelgraph_core::{InputObject, RequestContext};

use crate::error::ValidationError;
use crate::validator::InputValidator;

/// Arguments of a resolver invocation.
#[derive(Debug, Clone)]
pub struct ResolverArgs {
    /// The object the resolver runs on.
    pub parent: Value,
    /// Caller-supplied arguments. Raw on the way in, validated on the way
    /// to the wrapped handler.
    pub args: Value,
    pub context: RequestContext,
}

/// A handler that validates its arguments before running.
#[derive(Clone)]
pub struct ValidatedHandler<H> {
    validator: InputValidator,
    entity: Arc<InputObject>,
    handler: H,
}

impl InputValidator {
    /// Wrap `handler` so its `args` are validated against `entity` first.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownEntity`] when `entity` is not an input
    /// object of this validator's schema.
    pub fn wrap<H>(&self, entity: &str, handler: H) -> Result<ValidatedHandler<H>, ValidationError> {
        let entity = Arc::clone(self.object(entity)?);
        Ok(ValidatedHandler {
            validator: self.clone(),
            entity,
            handler,
        })
    }
}

impl<H> ValidatedHandler<H> {
    /// The input object arguments are validated against.
    pub fn entity(&self) -> &InputObject {
        &self.entity
    }

    /// Validate `args.args`, then invoke the handler with the result.
    pub async fn call<Fut, T, E>(&self, args: ResolverArgs) -> Result<T, E>
    where
        H: Fn(ResolverArgs) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<ValidationError>,
    {
        let validated = self
            .validator
            .validate(&self.entity, &args.args, &args.context)
            .await?;
        (self.handler)(ResolverArgs {
            parent: args.parent,
            args: validated,
            context: args.context,
        })
        .await
    }
}

impl<H> fmt::Debug for ValidatedHandler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedHandler")
            .field("entity", &self.entity.escaped_name)
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

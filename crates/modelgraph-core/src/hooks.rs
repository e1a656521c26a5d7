//! # Field Hooks
//!
//! Runtime behaviour attached to input fields and list types:
//!
//! - [`AssertHook`]: synchronous check that may reject a value.
//! - [`TransformHook`]: asynchronous rewrite of a value, given the parent
//!   payload and the ambient [`RequestContext`].
//!
//! Hooks are `Arc`-backed closures. Cloning a hook shares the closure, and
//! equality is pointer identity, so a normalized schema compares equal to
//! another normalization of the same graph.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;

// ─── Request Context ─────────────────────────────────────────────────

/// Type-erased ambient request data forwarded to every transform hook.
///
/// The validator never inspects the context; it exists so hooks can reach
/// per-request state (caller identity, database handles) without globals.
#[derive(Clone, Default)]
pub struct RequestContext {
    data: Option<Arc<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Wrap request data of any shareable type.
    pub fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self {
            data: Some(Arc::new(data)),
        }
    }

    /// A context carrying no data.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Borrow the request data if it is a `T`.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.data.as_deref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("has_data", &self.data.is_some())
            .finish()
    }
}

// ─── Assertion Hook ──────────────────────────────────────────────────

type AssertFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// Synchronous value check. `Err(reason)` rejects the whole validation call.
#[derive(Clone)]
pub struct AssertHook(Arc<AssertFn>);

impl AssertHook {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    /// Run the check against `value`.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        (self.0)(value)
    }
}

impl PartialEq for AssertHook {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for AssertHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AssertHook(..)")
    }
}

// ─── Transform Hook ──────────────────────────────────────────────────

/// Arguments handed to a [`TransformHook`].
#[derive(Debug, Clone)]
pub struct TransformInput {
    /// The payload that contains the value (object or array).
    pub parent: Value,
    /// The raw value being transformed.
    pub value: Value,
    /// Ambient request data.
    pub context: RequestContext,
}

type TransformFn = dyn Fn(TransformInput) -> BoxFuture<'static, Result<Value, String>> + Send + Sync;

/// Asynchronous value rewrite. The returned value replaces the raw value
/// for the remaining validation steps; `Err(reason)` rejects the call.
#[derive(Clone)]
pub struct TransformHook(Arc<TransformFn>);

impl TransformHook {
    pub fn new<F, Fut>(transform: F) -> Self
    where
        F: Fn(TransformInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, String>> + Send + 'static,
    {
        Self(Arc::new(move |input| transform(input).boxed()))
    }

    /// Build a hook from a synchronous function.
    pub fn from_fn<F>(transform: F) -> Self
    where
        F: Fn(TransformInput) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::new(move |input| futures_util::future::ready(transform(input)))
    }

    /// Start the transform.
    pub fn apply(&self, input: TransformInput) -> BoxFuture<'static, Result<Value, String>> {
        (self.0)(input)
    }
}

impl PartialEq for TransformHook {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for TransformHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransformHook(..)")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_downcast() {
        let ctx = RequestContext::new(42u32);
        assert_eq!(ctx.get::<u32>(), Some(&42));
        assert!(ctx.get::<String>().is_none());
        assert!(RequestContext::empty().get::<u32>().is_none());
    }

    #[test]
    fn test_assert_hook_equality_is_identity() {
        let a = AssertHook::new(|_| Ok(()));
        let b = AssertHook::new(|_| Ok(()));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_assert_hook_rejects() {
        let hook = AssertHook::new(|v| {
            if v.as_str().is_some_and(|s| !s.is_empty()) {
                Ok(())
            } else {
                Err("must not be empty".to_string())
            }
        });
        assert!(hook.check(&json!("Al")).is_ok());
        assert_eq!(hook.check(&json!("")), Err("must not be empty".to_string()));
    }

    #[tokio::test]
    async fn test_transform_hook_sees_parent_and_context() {
        let hook = TransformHook::new(|input: TransformInput| async move {
            let suffix = input.context.get::<String>().cloned().unwrap_or_default();
            let base = input.value.as_str().unwrap_or_default().to_string();
            let n = input.parent.as_object().map(|m| m.len()).unwrap_or(0);
            Ok(json!(format!("{base}{suffix}{n}")))
        });
        let out = hook
            .apply(TransformInput {
                parent: json!({"a": 1, "b": 2}),
                value: json!("x"),
                context: RequestContext::new("-".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(out, json!("x-2"));
    }

    #[tokio::test]
    async fn test_sync_transform_hook() {
        let hook = TransformHook::from_fn(|input| Ok(json!(input.value.to_string().len())));
        let out = hook
            .apply(TransformInput {
                parent: Value::Null,
                value: json!("abc"),
                context: RequestContext::empty(),
            })
            .await
            .unwrap();
        assert_eq!(out, json!(5));
    }
}

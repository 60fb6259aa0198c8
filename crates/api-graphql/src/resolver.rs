//! Field Resolver Factory
//!
//! Two resolver shapes exist: bridge resolvers forward a root field to the
//! external script, property resolvers read a key out of the parent JSON
//! object produced by a bridge resolver.

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use async_graphql::{Error, Value};
use scriptgate_core::application::ScriptBridge;
use std::sync::Arc;

use crate::scalars::LeafCodec;

/// Resolver for a root field bound to the script pipeline.
///
/// On invocation it converts the GraphQL arguments to plain JSON, runs the
/// bridge (one subprocess call), and returns the decoded value. Bridge
/// failures surface as a single GraphQL error entry.
pub fn bridge_resolver(
    field_name: String,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static {
    move |ctx: ResolverContext| {
        let field_name = field_name.clone();
        FieldFuture::new(async move {
            let bridge = ctx.data::<Arc<ScriptBridge>>()?;

            let mut arguments = serde_json::Map::new();
            for (name, value) in ctx.args.as_index_map() {
                let json = value
                    .clone()
                    .into_json()
                    .map_err(|e| Error::new(e.to_string()))?;
                arguments.insert(name.to_string(), json);
            }

            let result = bridge
                .resolve_field(&field_name, arguments)
                .await
                .map_err(|e| Error::new(e.to_string()))?;

            let value = Value::from_json(result).map_err(|e| Error::new(e.to_string()))?;
            Ok(Some(FieldValue::value(value)))
        })
    }
}

/// Resolver for a plain object field: looks up the field name in the parent
/// JSON object, applying the scalar codec for date-typed leaves. Missing or
/// null keys resolve to null.
pub fn property_resolver(
    field_name: String,
    codec: LeafCodec,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static {
    move |ctx: ResolverContext| {
        let field_name = field_name.clone();
        FieldFuture::new(async move {
            let inner = match ctx.parent_value.as_value() {
                Some(Value::Object(map)) => map.get(field_name.as_str()).cloned(),
                _ => None,
            };

            Ok(inner
                .filter(|value| !matches!(value, Value::Null))
                .map(|value| FieldValue::value(codec.apply(value))))
        })
    }
}

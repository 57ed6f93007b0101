//! CMDB request paths and response envelopes.

use forti_compat_core::escape_filter;
use serde_json::Value;

use crate::schema::ResourceSchema;
use crate::state::State;

const CMDB_PREFIX: &str = "/api/v2/cmdb";

/// Build the request path for a resource.
///
/// The mkey is appended for table objects only; singletons are addressed by
/// their path alone. `filter` is a compact filter expression and is
/// translated into `filter=` parameters.
pub fn request_path(
    schema: &ResourceSchema,
    mkey: Option<&str>,
    vdom: Option<&str>,
    filter: Option<&str>,
) -> String {
    let mut path = format!("{CMDB_PREFIX}/{}", schema.path);
    if let Some(key) = mkey.filter(|k| !k.is_empty() && !schema.singleton) {
        path.push('/');
        path.push_str(&urlencoding::encode(key));
    }

    let mut query = Vec::new();
    if let Some(vdom) = vdom.filter(|v| !v.is_empty()) {
        query.push(format!("vdom={}", urlencoding::encode(vdom)));
    }
    if let Some(filter) = filter.filter(|f| !f.is_empty()) {
        query.push(escape_filter(filter));
    }

    if !query.is_empty() {
        path.push('?');
        path.push_str(&query.join("&"));
    }
    path
}

/// Pull the object out of a CMDB response body.
///
/// Accepts `{"results": [obj, ...]}`, `{"results": obj}` or a bare object.
/// Returns `None` when the body holds no object, which callers treat as
/// "resource not found".
pub fn response_object(body: &Value) -> Option<State> {
    let obj = body.as_object()?;
    match obj.get("results") {
        Some(Value::Array(items)) => items.first().and_then(Value::as_object).cloned(),
        Some(Value::Object(inner)) => Some(inner.clone()),
        Some(_) => None,
        None => Some(obj.clone()),
    }
}

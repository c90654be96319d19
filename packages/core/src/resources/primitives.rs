//! CRUD primitives
//!
//! Thin request helpers for the write path (`POST /{index}`,
//! `PUT /{index}/{id}`, `DELETE /{index}/{id}`) plus the loading/error
//! wrapper every tracked operation runs inside.
//!
//! Form payloads are sent as multipart. Updates with a form body go out as
//! `POST` with an extra `_method=PUT` field because multipart `PUT` bodies are
//! not parsed server-side.

use super::tracker::InteractionTracker;
use crate::error::{ResourceError, ResourceResult};
use crate::http::{FormData, HttpRequest, HttpTransport, MULTIPART_CONTENT_TYPE};
use crate::models::Id;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Tracked write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Destroy,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{operation}_{index}` or `{operation}_{index}_{id}`
pub fn loading_key(operation: Operation, index: &str, id: Option<&Id>) -> String {
    match id {
        Some(id) => format!("{}_{}_{}", operation, index, id),
        None => format!("{}_{}", operation, index),
    }
}

/// Per-call options for write operations
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOptions {
    /// Patch the local cache after the server confirms (default `true`)
    pub sync: bool,
    /// On create, insert at the front instead of the back (default `false`)
    pub add_first: bool,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl Default for OperationOptions {
    fn default() -> Self {
        Self {
            sync: true,
            add_first: false,
            headers: Vec::new(),
        }
    }
}

impl OperationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave the local cache alone
    pub fn without_sync(mut self) -> Self {
        self.sync = false;
        self
    }

    pub fn add_first(mut self) -> Self {
        self.add_first = true;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Body of a create/update request
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Form(FormData),
}

impl Payload {
    /// JSON payload from any serializable value
    pub fn json<S: Serialize + ?Sized>(data: &S) -> ResourceResult<Self> {
        serde_json::to_value(data)
            .map(Payload::Json)
            .map_err(|e| ResourceError::serialization(e.to_string()))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<FormData> for Payload {
    fn from(form: FormData) -> Self {
        Payload::Form(form)
    }
}

/// Take the record out of a `{data: ...}` envelope. Bodies without the
/// envelope are decoded as the record itself.
pub fn unwrap_record<T: DeserializeOwned>(body: Value, context: &str) -> ResourceResult<T> {
    let record = match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(record).map_err(|e| ResourceError::decode(context, e))
}

/// Shallow-merge a JSON object `patch` over `current` and decode the result
pub fn merge_record<T>(current: Option<&T>, patch: &Value) -> ResourceResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(patch) = patch else {
        return Err(ResourceError::serialization(
            "record patch must be a JSON object",
        ));
    };

    let mut merged = match current {
        Some(current) => serde_json::to_value(current)
            .map_err(|e| ResourceError::serialization(e.to_string()))?,
        None => Value::Object(Default::default()),
    };
    if let Value::Object(target) = &mut merged {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }

    serde_json::from_value(merged).map_err(|e| ResourceError::decode("merged record", e))
}

fn with_body(request: HttpRequest, payload: Payload) -> HttpRequest {
    match payload {
        Payload::Json(body) => request.json(body),
        Payload::Form(form) => request
            .header("Content-Type", MULTIPART_CONTENT_TYPE)
            .multipart(form),
    }
}

/// `POST /{index}`
pub async fn create_primitive<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    index: &str,
    payload: Payload,
    options: &OperationOptions,
) -> ResourceResult<T> {
    let request = with_body(HttpRequest::post(format!("/{}", index)), payload)
        .headers(options.headers.iter().cloned());

    let response = transport.send(request).await?;
    unwrap_record(response.body, &format!("created {} record", index))
}

/// `PUT /{index}/{id}`, or `POST` + `_method=PUT` for form payloads
pub async fn update_primitive<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    index: &str,
    id: &Id,
    payload: Payload,
    options: &OperationOptions,
) -> ResourceResult<T> {
    let path = format!("/{}/{}", index, id);
    let request = match payload {
        Payload::Form(mut form) => {
            form.append("_method", "PUT");
            with_body(HttpRequest::post(path), Payload::Form(form))
        }
        json => with_body(HttpRequest::put(path), json),
    }
    .headers(options.headers.iter().cloned());

    let response = transport.send(request).await?;
    unwrap_record(response.body, &format!("updated {} record", index))
}

/// `DELETE /{index}/{id}`; returns whatever the server answered (usually
/// the deleted identifier)
pub async fn destroy_primitive(
    transport: &dyn HttpTransport,
    index: &str,
    id: &Id,
    options: &OperationOptions,
) -> ResourceResult<Value> {
    let request = HttpRequest::delete(format!("/{}/{}", index, id))
        .headers(options.headers.iter().cloned());

    let response = transport.send(request).await?;
    Ok(response.body)
}

/// Run `operation` under loading key `key`: mark it in flight, clear its old
/// error, then mark it done. A failure is recorded against the key and
/// returned unchanged.
pub async fn with_loading_and_errors<T, F>(
    tracker: &InteractionTracker,
    key: &str,
    operation: F,
) -> ResourceResult<T>
where
    F: Future<Output = ResourceResult<T>>,
{
    tracker.start(key).await;
    let result = operation.await;
    tracker.stop(key).await;

    if let Err(err) = &result {
        tracker.catch_error(key, err).await;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{InMemoryTransport, RequestBody, TransportError};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i64,
        name: String,
    }

    #[test]
    fn test_loading_key_format() {
        assert_eq!(loading_key(Operation::Create, "expenses", None), "create_expenses");
        assert_eq!(
            loading_key(Operation::Update, "expenses", Some(&Id::from(12))),
            "update_expenses_12"
        );
        assert_eq!(
            loading_key(Operation::Destroy, "users", Some(&Id::from("u-1"))),
            "destroy_users_u-1"
        );
    }

    #[test]
    fn test_options_defaults() {
        let options = OperationOptions::default();
        assert!(options.sync);
        assert!(!options.add_first);

        let options = OperationOptions::new().without_sync().add_first();
        assert!(!options.sync);
        assert!(options.add_first);
    }

    #[test]
    fn test_unwrap_record_with_and_without_envelope() {
        let row: Row = unwrap_record(json!({"data": {"id": 1, "name": "a"}}), "row").unwrap();
        assert_eq!(row.id, 1);

        let row: Row = unwrap_record(json!({"id": 2, "name": "b"}), "row").unwrap();
        assert_eq!(row.id, 2);

        let err = unwrap_record::<Row>(json!({"data": null}), "row").unwrap_err();
        assert!(matches!(err, ResourceError::Decode { .. }));
    }

    #[test]
    fn test_merge_record() {
        let current = Row {
            id: 1,
            name: "old".into(),
        };
        let merged: Row = merge_record(Some(&current), &json!({"name": "new"})).unwrap();
        assert_eq!(merged, Row { id: 1, name: "new".into() });

        let fresh: Row = merge_record(None, &json!({"id": 5, "name": "x"})).unwrap();
        assert_eq!(fresh.id, 5);

        assert!(merge_record::<Row>(None, &json!({"name": "no id"})).is_err());
        assert!(merge_record(Some(&current), &json!([1])).is_err());
    }

    #[tokio::test]
    async fn test_update_with_json_uses_put() {
        let transport = InMemoryTransport::new();
        transport.push_json(json!({"data": {"id": 3, "name": "b"}})).await;

        let row: Row = update_primitive(
            &transport,
            "categories",
            &Id::from(3),
            Payload::Json(json!({"name": "b"})),
            &OperationOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(row.name, "b");
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.method, crate::http::HttpMethod::Put);
        assert_eq!(request.path, "/categories/3");
    }

    #[tokio::test]
    async fn test_update_with_form_uses_method_override() {
        let transport = InMemoryTransport::new();
        transport.push_json(json!({"data": {"id": 3, "name": "b"}})).await;

        let form = FormData::new().text("name", "b");
        let _: Row = update_primitive(
            &transport,
            "categories",
            &Id::from(3),
            Payload::Form(form),
            &OperationOptions::default(),
        )
        .await
        .unwrap();

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.method, crate::http::HttpMethod::Post);
        assert_eq!(request.path, "/categories/3");
        assert_eq!(request.header_value("Content-Type"), Some("multipart/form-data"));
        let RequestBody::Multipart(sent) = request.body else {
            panic!("form payload must be sent as multipart");
        };
        assert_eq!(sent.get("_method").and_then(|v| v.as_text()), Some("PUT"));
        assert_eq!(sent.get("name").and_then(|v| v.as_text()), Some("b"));
    }

    #[tokio::test]
    async fn test_create_forwards_headers() {
        let transport = InMemoryTransport::new();
        transport.push_json(json!({"data": {"id": 9, "name": "c"}})).await;

        let options = OperationOptions::new().header("X-Request-Id", "abc");
        let _: Row = create_primitive(&transport, "categories", json!({"name": "c"}).into(), &options)
            .await
            .unwrap();

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.path, "/categories");
        assert_eq!(request.header_value("x-request-id"), Some("abc"));
    }

    #[tokio::test]
    async fn test_with_loading_and_errors_records_failure() {
        let tracker = InteractionTracker::new();

        let result: ResourceResult<()> = with_loading_and_errors(&tracker, "create_x", async {
            Err(TransportError::status(500, "boom").into())
        })
        .await;

        assert!(result.is_err());
        assert!(!tracker.is_loading("create_x").await);
        assert_eq!(tracker.error("create_x").await.as_deref(), Some("HTTP 500: boom"));
    }

    #[tokio::test]
    async fn test_with_loading_and_errors_success() {
        let tracker = InteractionTracker::new();
        tracker.set_error("create_x", "stale").await;

        let value = with_loading_and_errors(&tracker, "create_x", async {
            assert!(tracker.is_loading("create_x").await);
            Ok(7)
        })
        .await
        .unwrap();

        assert_eq!(value, 7);
        assert!(!tracker.is_loading("create_x").await);
        assert!(tracker.error("create_x").await.is_none());
    }
}

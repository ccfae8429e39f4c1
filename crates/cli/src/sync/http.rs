// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! REST remote over HTTP.
//!
//! | Operation | Request                          |
//! |-----------|----------------------------------|
//! | create    | `POST   {base}/{collection}`      |
//! | update    | `PATCH  {base}/{collection}/{id}` |
//! | delete    | `DELETE {base}/{collection}/{id}` |
//! | fetch     | `GET    {base}/{collection}/{id}` |
//!
//! Every write carries `Idempotency-Key: <operation id>`. Forced writes
//! (conflict resolutions) add `If-Match: *`. A `409` is a version conflict.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use resync_core::{EntityType, Operation, OperationKind};
use serde_json::Value;

use super::remote::{Remote, RemoteAck, RemoteError, RemoteFuture, RemoteResult};

/// Longest error body kept in a [`RemoteError::Status`] message.
const MAX_MESSAGE_LEN: usize = 200;

const STATUS_CONFLICT: u16 = 409;

/// Method and path segments for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub collection: String,
    pub entity_id: Option<String>,
}

/// Maps an operation to its REST route.
pub fn route(op: &Operation) -> Route {
    let collection = op.entity_type.collection();
    match op.kind {
        OperationKind::Create => Route {
            method: Method::POST,
            collection,
            entity_id: None,
        },
        OperationKind::Update => Route {
            method: Method::PATCH,
            collection,
            entity_id: Some(op.entity_id.clone()),
        },
        OperationKind::Delete => Route {
            method: Method::DELETE,
            collection,
            entity_id: Some(op.entity_id.clone()),
        },
    }
}

/// Appends `collection[/id]` to `base`, percent-encoding each segment.
pub fn endpoint(base: &Url, collection: &str, entity_id: Option<&str>) -> RemoteResult<Url> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| RemoteError::Network(format!("invalid base url: {base}")))?;
        segments.pop_if_empty().push(collection);
        if let Some(id) = entity_id {
            segments.push(id);
        }
    }
    Ok(url)
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_MESSAGE_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

/// Interprets the response to a write.
pub fn interpret(status: u16, body: &str) -> RemoteResult<RemoteAck> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if (200..300).contains(&status) {
        let entity_id = parsed.as_ref().and_then(|v| match v.get("id") {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        });
        let data = parsed.filter(|v| v.is_object());
        return Ok(RemoteAck { entity_id, data });
    }

    if status == STATUS_CONFLICT {
        let remote = match parsed {
            Some(Value::Object(mut fields)) => match fields.remove("remote") {
                Some(remote) => Some(remote),
                None => Some(Value::Object(fields)),
            },
            _ => None,
        };
        return Err(RemoteError::Conflict { remote });
    }

    Err(RemoteError::Status {
        code: status,
        message: truncate(body),
    })
}

/// Interprets the response to a fetch. `404`/`410` mean the entity is gone.
pub fn interpret_fetch(status: u16, body: &str) -> RemoteResult<Option<Value>> {
    match status {
        404 | 410 => Ok(None),
        200..=299 => {
            let value: Value =
                serde_json::from_str(body).map_err(|e| RemoteError::Decode(e.to_string()))?;
            Ok(Some(value).filter(|v| !v.is_null()))
        }
        code => Err(RemoteError::Status {
            code,
            message: truncate(body),
        }),
    }
}

fn network_error(e: reqwest::Error) -> RemoteError {
    RemoteError::Network(e.to_string())
}

/// [`Remote`] backed by a REST API.
pub struct HttpRemote {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpRemote {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> RemoteResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| RemoteError::Network(format!("invalid base url {base_url}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(network_error)?;
        Ok(HttpRemote {
            client,
            base,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, op: &Operation) -> RemoteResult<RemoteAck> {
        let route = route(op);
        let url = endpoint(&self.base, &route.collection, route.entity_id.as_deref())?;
        tracing::debug!(op_id = %op.id, method = %route.method, %url, "applying operation");

        let mut builder = self
            .request(route.method, url)
            .header("Idempotency-Key", &op.id);
        if op.force {
            builder = builder.header(reqwest::header::IF_MATCH, "*");
        }
        if op.kind != OperationKind::Delete {
            builder = builder.json(&op.data);
        }

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(network_error)?;
        interpret(status, &body)
    }

    async fn get(&self, entity_type: &EntityType, entity_id: &str) -> RemoteResult<Option<Value>> {
        let url = endpoint(&self.base, &entity_type.collection(), Some(entity_id))?;
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(network_error)?;
        interpret_fetch(status, &body)
    }
}

impl Remote for HttpRemote {
    fn apply<'a>(&'a self, op: &'a Operation) -> RemoteFuture<'a, RemoteAck> {
        Box::pin(self.send(op))
    }

    fn fetch<'a>(
        &'a self,
        entity_type: &'a EntityType,
        entity_id: &'a str,
    ) -> RemoteFuture<'a, Option<Value>> {
        Box::pin(self.get(entity_type, entity_id))
    }
}

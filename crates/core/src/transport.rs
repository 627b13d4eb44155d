//! The seam between request descriptors and the host's HTTP client.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::request::ApiRequest;

/// A failed call, as reported by the host's HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFailure {
    /// The server answered with an error status.
    Response {
        status: u16,
        /// `Authorization` header the request was sent with.
        authorization: Option<String>,
        body: Option<Value>,
    },
    /// The HTTP client gave up before a response arrived.
    Transport(String),
    /// Anything that did not come from the HTTP client.
    Other(String),
}

impl ApiFailure {
    /// Error response to `request`, carrying the header it was sent with.
    pub fn response(request: &ApiRequest, status: u16, body: Option<Value>) -> Self {
        ApiFailure::Response {
            status,
            authorization: request.authorization(),
            body,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiFailure::Response { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Executes [`ApiRequest`]s.
///
/// Implemented by the host over its HTTP client of choice. A successful call
/// yields the decoded JSON body (`Value::Null` for an empty body).
pub trait Transport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Value, ApiFailure>> + Send;
}

#[derive(Debug, Clone)]
enum Scripted {
    Body(Value),
    Status(u16, Option<Value>),
    Failure(ApiFailure),
}

/// In-memory [`Transport`] that replays scripted outcomes in order and
/// records every request it receives.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next request with `body`.
    pub fn respond(self, body: Value) -> Self {
        lock(&self.script).push_back(Scripted::Body(body));
        self
    }

    /// Answer the next request with an error status.
    pub fn reject(self, status: u16, body: Option<Value>) -> Self {
        lock(&self.script).push_back(Scripted::Status(status, body));
        self
    }

    /// Fail the next request without a response.
    pub fn fail(self, failure: ApiFailure) -> Self {
        lock(&self.script).push_back(Scripted::Failure(failure));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Value, ApiFailure>> + Send {
        let outcome = match lock(&self.script).pop_front() {
            Some(Scripted::Body(body)) => Ok(body),
            Some(Scripted::Status(status, body)) => {
                Err(ApiFailure::response(&request, status, body))
            }
            Some(Scripted::Failure(failure)) => Err(failure),
            None => Err(ApiFailure::Other(format!(
                "no scripted response for {} {}",
                request.method, request.path
            ))),
        };
        lock(&self.requests).push(request);
        std::future::ready(outcome)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Testing utilities for the Docgate workspace
//!
//! Shared test doubles: a recording transport with a call counter and
//! scripted upstream responses.

#![allow(missing_docs)]

use async_trait::async_trait;
use bytes::Bytes;
use docgate_transport::{Transport, TransportError, UpstreamResponse};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// One call the gateway made through the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Scripted outcome for the next transport call.
pub enum ScriptedOutcome {
    Respond(UpstreamResponse),
    ConnectError(String),
    RequestError(String),
}

/// Transport double that records every call and replays scripted
/// outcomes in order. When the script runs dry it answers 200 with an
/// empty JSON object.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    script: Mutex<VecDeque<ScriptedOutcome>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary response.
    pub fn respond(&self, response: UpstreamResponse) {
        self.script.lock().push_back(ScriptedOutcome::Respond(response));
    }

    /// Queue a JSON response.
    pub fn respond_json(&self, status: u16, body: serde_json::Value) {
        self.script
            .lock()
            .push_back(ScriptedOutcome::Respond(json_response(status, &body)));
    }

    /// Queue a raw response with explicit headers.
    pub fn respond_raw(&self, status: u16, headers: Vec<(String, String)>, body: Bytes) {
        self.script
            .lock()
            .push_back(ScriptedOutcome::Respond(UpstreamResponse {
                status,
                headers,
                body,
            }));
    }

    /// Queue a connection-level failure.
    pub fn fail_connect(&self, message: &str) {
        self.script
            .lock()
            .push_back(ScriptedOutcome::ConnectError(message.to_string()));
    }

    /// Queue a request-level failure.
    pub fn fail_request(&self, message: &str) {
        self.script
            .lock()
            .push_back(ScriptedOutcome::RequestError(message.to_string()));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    fn record_and_answer(
        &self,
        call: RecordedCall,
    ) -> Result<UpstreamResponse, TransportError> {
        self.calls.lock().push(call);
        match self.script.lock().pop_front() {
            Some(ScriptedOutcome::Respond(response)) => Ok(response),
            Some(ScriptedOutcome::ConnectError(message)) => Err(TransportError::Connect(message)),
            Some(ScriptedOutcome::RequestError(message)) => Err(TransportError::Request(message)),
            None => Ok(json_response(200, &serde_json::json!({}))),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get(&self, path: &str) -> Result<UpstreamResponse, TransportError> {
        self.record_and_answer(RecordedCall {
            method: "GET",
            path: path.to_string(),
            content_type: None,
            body: Bytes::new(),
        })
    }

    async fn delete(&self, path: &str) -> Result<UpstreamResponse, TransportError> {
        self.record_and_answer(RecordedCall {
            method: "DELETE",
            path: path.to_string(),
            content_type: None,
            body: Bytes::new(),
        })
    }

    async fn post(
        &self,
        path: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<UpstreamResponse, TransportError> {
        self.record_and_answer(RecordedCall {
            method: "POST",
            path: path.to_string(),
            content_type: content_type.map(str::to_string),
            body,
        })
    }
}

/// Build a JSON [`UpstreamResponse`].
pub fn json_response(status: u16, body: &serde_json::Value) -> UpstreamResponse {
    UpstreamResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Bytes::from(body.to_string()),
    }
}

/// Build a PDF-ish binary [`UpstreamResponse`].
pub fn pdf_response(body: &'static [u8]) -> UpstreamResponse {
    UpstreamResponse {
        status: 200,
        headers: vec![
            ("content-type".to_string(), "application/pdf".to_string()),
            ("x-upstream-tag".to_string(), "generated".to_string()),
        ],
        body: Bytes::from_static(body),
    }
}

// Test doubles: a transport that records every call and a prompt that
// replays a fixed script of operator answers.

use crate::api::{ApiRequest, ApiResponse, Credentials, Transport};
use crate::error::{Error, Result};
use crate::session::{Session, DEFAULT_GROUP};
use crate::ui::Prompt;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

pub const BASE_URL: &str = "https://acme.jfrog.io/artifactory/api/";

#[derive(Default)]
pub struct FakeTransport {
    bearer: Option<String>,
    denied: RefCell<HashSet<String>>,
    scopes: RefCell<Vec<String>>,
    requests: RefCell<Vec<ApiRequest>>,
    responses: RefCell<HashMap<String, ApiResponse>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the token endpoint refuse `group`.
    pub fn deny_group(&self, group: &str) {
        self.denied.borrow_mut().insert(group.to_string());
    }

    /// Canned answer for `endpoint`; unknown endpoints answer `200 OK`.
    pub fn respond(&self, endpoint: &str, response: ApiResponse) {
        self.responses
            .borrow_mut()
            .insert(endpoint.to_string(), response);
    }

    pub fn bearer(&self) -> Option<String> {
        self.bearer.clone()
    }

    /// Groups passed to every `issue_token` call, in order.
    pub fn token_scopes(&self) -> Vec<String> {
        self.scopes.borrow().clone()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    fn issue_token(&self, _credentials: &Credentials, group: &str) -> Result<String> {
        self.scopes.borrow_mut().push(group.to_string());
        if self.denied.borrow().contains(group) {
            return Err(Error::Auth(format!("401 Unauthorized - not a member of {}", group)));
        }
        Ok(format!("token-for-{}", group))
    }

    fn set_bearer(&mut self, token: &str) -> Result<()> {
        self.bearer = Some(token.to_string());
        Ok(())
    }

    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self
            .responses
            .borrow()
            .get(&request.endpoint)
            .cloned()
            .unwrap_or_else(|| ApiResponse::new(200, "OK")))
    }
}

pub fn session() -> Session<FakeTransport> {
    Session::open(
        Credentials::new("alice", "secret"),
        DEFAULT_GROUP,
        FakeTransport::new(),
    )
    .expect("fake transport always issues a token")
}

/// Replays answers in order; running out behaves like end of input.
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        ScriptedPrompt {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }

    fn next(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "script exhausted",
            ))
        })
    }
}

impl Prompt for ScriptedPrompt {
    fn line(&mut self, prompt: &str) -> Result<String> {
        self.next(prompt)
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        self.next(prompt)
    }
}

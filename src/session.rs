// Session state: who we are, which group our token is scoped to, and the
// transport that carries the token. The token is only ever replaced by
// `change_group`, and only after the new one has been issued.

use crate::api::{ApiRequest, ApiResponse, Credentials, Transport};
use crate::error::{Error, Result};
use tracing::info;

pub const DEFAULT_GROUP: &str = "administrators";

pub struct Session<T: Transport> {
    credentials: Credentials,
    group: String,
    token: String,
    transport: T,
}

impl<T: Transport> Session<T> {
    /// Fetch the first token for `group` and attach it to `transport`.
    /// Failure here means no session can exist.
    pub fn open(credentials: Credentials, group: &str, mut transport: T) -> Result<Self> {
        let token = transport.issue_token(&credentials, group)?;
        transport.set_bearer(&token)?;
        info!(user = credentials.username(), group, "session opened");
        Ok(Session {
            credentials,
            group: group.to_string(),
            token,
            transport,
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Server root shown by ping, i.e. the base URL without the
    /// `artifactory/api/` suffix.
    pub fn server_root(&self) -> &str {
        let base = self.base_url();
        match base.find("artifactory") {
            Some(idx) => &base[..idx],
            None => base,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.transport.send(request)
    }

    /// Re-scope the session to `group`. On any failure the previous group
    /// and token stay in place.
    pub fn change_group(&mut self, group: &str) -> Result<()> {
        let group = group.trim();
        if group.is_empty() {
            return Err(Error::validation("group name cannot be empty"));
        }
        let token = self.transport.issue_token(&self.credentials, group)?;
        self.transport.set_bearer(&token)?;
        info!(from = %self.group, to = group, "group changed");
        self.group = group.to_string();
        self.token = token;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;

    #[test]
    fn open_fetches_token_for_initial_group() {
        let session = Session::open(
            Credentials::new("alice", "secret"),
            DEFAULT_GROUP,
            FakeTransport::new(),
        )
        .unwrap();
        assert_eq!(session.group(), "administrators");
        assert_eq!(session.token(), "token-for-administrators");
        assert_eq!(
            session.transport().bearer().as_deref(),
            Some("token-for-administrators")
        );
    }

    #[test]
    fn open_fails_when_token_cannot_be_issued() {
        let transport = FakeTransport::new();
        transport.deny_group("administrators");
        let result = Session::open(Credentials::new("alice", "secret"), DEFAULT_GROUP, transport);
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[test]
    fn change_group_replaces_token_and_header() {
        let mut session = crate::testing::session();
        session.change_group("readers").unwrap();
        assert_eq!(session.group(), "readers");
        assert_eq!(session.token(), "token-for-readers");
        assert_eq!(
            session.transport().bearer().as_deref(),
            Some("token-for-readers")
        );
        assert_eq!(
            session.transport().token_scopes(),
            vec!["administrators".to_string(), "readers".to_string()]
        );
    }

    #[test]
    fn failed_group_change_keeps_previous_token() {
        let mut session = crate::testing::session();
        session.transport().deny_group("ghosts");
        let err = session.change_group("ghosts").unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert_eq!(session.group(), "administrators");
        assert_eq!(session.token(), "token-for-administrators");
        assert_eq!(
            session.transport().bearer().as_deref(),
            Some("token-for-administrators")
        );
    }

    #[test]
    fn empty_group_is_rejected_without_token_call() {
        let mut session = crate::testing::session();
        let err = session.change_group("   ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(session.transport().token_scopes().len(), 1);
    }

    #[test]
    fn server_root_strips_api_path() {
        let session = crate::testing::session();
        assert_eq!(session.server_root(), "https://acme.jfrog.io/");
    }
}

// Operation set: one function per menu command. Each reads what it needs
// from the operator, builds its request (validation happens here, before
// anything touches the network), sends it and turns the answer into an
// `Outcome` for the loop to print.

use crate::api::{
    ApiRequest, NewGroup, NewUser, RemoteRepository, RepositoryUpdate, Transport, VersionInfo,
    PING_ENDPOINT, REPOSITORIES_ENDPOINT, STORAGE_INFO_ENDPOINT, VERSION_ENDPOINT,
};
use crate::error::{Error, Result};
use crate::menu::Command;
use crate::session::Session;
use crate::ui::Prompt;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Plain `local-part@domain.tld` address check.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// What a successful operation hands back to the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Message(String),
    Json(serde_json::Value),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Message(text) => f.write_str(text),
            Outcome::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => f.write_str(&pretty),
                Err(_) => write!(f, "{}", value),
            },
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// A non-empty name that is used as exactly one URL path segment.
fn path_segment<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("{} cannot be empty", what)));
    }
    if value == "." || value == ".." || value.contains(['/', '\\', '?', '#', '%']) {
        return Err(Error::validation(format!(
            "{} '{}' may not contain '/', '\\', '?', '#', '%' or be a dot segment",
            what, value
        )));
    }
    Ok(value)
}

pub fn create_user_request(username: &str, email: &str, password: &str) -> Result<ApiRequest> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(Error::validation(
            "missing one or more values (username, email, password)",
        ));
    }
    let username = path_segment(username, "username")?;
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(Error::validation(format!("'{}' is not a valid email address", email)));
    }
    let user = NewUser {
        name: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };
    ApiRequest::put_json(format!("security/users/{}", username), &user)
}

pub fn delete_user_request(username: &str) -> Result<ApiRequest> {
    let username = path_segment(username, "username")?;
    Ok(ApiRequest::delete(format!("security/users/{}", username)))
}

/// `remote_url` falls back to `default_url` when left blank.
pub fn create_repository_request(
    key: &str,
    remote_url: &str,
    default_url: &str,
) -> Result<ApiRequest> {
    let key = path_segment(key, "repository name")?;
    let url = match remote_url.trim() {
        "" => default_url,
        url => url,
    };
    let repo = RemoteRepository {
        rclass: "remote".into(),
        url: url.to_string(),
        external_dependencies_enabled: false,
    };
    ApiRequest::put_json(format!("{}/{}", REPOSITORIES_ENDPOINT, key), &repo)
}

pub fn update_repository_request(key: &str, description: &str) -> Result<ApiRequest> {
    let key = path_segment(key, "repository name")?;
    let update = RepositoryUpdate {
        description: description.trim().to_string(),
    };
    ApiRequest::post_json(format!("{}/{}", REPOSITORIES_ENDPOINT, key), &update)
}

pub fn create_group_request(name: &str, description: &str) -> Result<ApiRequest> {
    let name = path_segment(name, "group name")?;
    let group = NewGroup {
        name: name.to_string(),
        description: description.trim().to_string(),
        auto_join: false,
    };
    ApiRequest::put_json(format!("security/groups/{}", name), &group)
}

/// Run `command` against the session. `Exit` is handled by the loop and
/// yields an empty message here.
pub fn execute<T: Transport>(
    command: Command,
    session: &mut Session<T>,
    prompt: &mut dyn Prompt,
) -> Result<Outcome> {
    let result = match command {
        Command::Ping => ping(session),
        Command::Version => version(session),
        Command::CreateUser => create_user(session, prompt),
        Command::DeleteUser => delete_user(session, prompt),
        Command::StorageInfo => fetch_json(session, STORAGE_INFO_ENDPOINT),
        Command::CreateRepository => create_repository(session, prompt),
        Command::UpdateRepository => update_repository(session, prompt),
        Command::ListRepositories => fetch_json(session, REPOSITORIES_ENDPOINT),
        Command::ChangeGroup => change_group(session, prompt),
        Command::CreateGroup => create_group(session, prompt),
        Command::PrintToken => Ok(Outcome::Message(session.token().to_string())),
        Command::Exit => Ok(Outcome::Message(String::new())),
    };
    if let Err(e) = &result {
        debug!(?command, error = %e, "operation failed");
    }
    result
}

fn ping<T: Transport>(session: &Session<T>) -> Result<Outcome> {
    let res = session.send(&ApiRequest::get(PING_ENDPOINT))?;
    Ok(Outcome::Message(format!(
        "ping {} - Status: {}",
        session.server_root(),
        res.body.trim()
    )))
}

fn version<T: Transport>(session: &Session<T>) -> Result<Outcome> {
    let res = session
        .send(&ApiRequest::get(VERSION_ENDPOINT))?
        .ensure_success()?;
    let info: VersionInfo = res.json()?;
    let version = info
        .version
        .ok_or_else(|| Error::Response("no 'version' field in response".into()))?;
    Ok(Outcome::Message(format!("Artifactory version {}", version)))
}

fn fetch_json<T: Transport>(session: &Session<T>, endpoint: &str) -> Result<Outcome> {
    let res = session.send(&ApiRequest::get(endpoint))?.ensure_success()?;
    Ok(Outcome::Json(res.json()?))
}

/// Send and require exactly 200 OK.
fn send_expecting_ok<T: Transport>(session: &Session<T>, request: &ApiRequest) -> Result<()> {
    let res = session.send(request)?;
    if res.status == 200 {
        Ok(())
    } else {
        Err(Error::Http {
            status: res.status,
            body: res.body,
        })
    }
}

fn create_user<T: Transport>(session: &Session<T>, prompt: &mut dyn Prompt) -> Result<Outcome> {
    let username = prompt.line("Enter username")?;
    let email = prompt.line("Enter email")?;
    let password = prompt.secret("Enter password")?;
    let request = create_user_request(&username, &email, &password)?;
    send_expecting_ok(session, &request)?;
    Ok(Outcome::Message("User created successfully".into()))
}

fn delete_user<T: Transport>(session: &Session<T>, prompt: &mut dyn Prompt) -> Result<Outcome> {
    let username = prompt.line("Enter username to delete")?;
    let request = delete_user_request(&username)?;
    send_expecting_ok(session, &request)?;
    Ok(Outcome::Message(format!(
        "User '{}' deleted successfully",
        username.trim()
    )))
}

fn create_repository<T: Transport>(
    session: &Session<T>,
    prompt: &mut dyn Prompt,
) -> Result<Outcome> {
    let key = prompt.line("Enter repository name")?;
    path_segment(&key, "repository name")?;
    let remote_url = prompt.line("Enter remote URL (empty for this server)")?;
    let request = create_repository_request(&key, &remote_url, session.base_url())?;
    send_expecting_ok(session, &request)?;
    Ok(Outcome::Message("Repository created successfully!".into()))
}

fn update_repository<T: Transport>(
    session: &Session<T>,
    prompt: &mut dyn Prompt,
) -> Result<Outcome> {
    let key = prompt.line("Enter repository name")?;
    path_segment(&key, "repository name")?;
    let description = prompt.line("Enter new description")?;
    let request = update_repository_request(&key, &description)?;
    send_expecting_ok(session, &request)?;
    Ok(Outcome::Message("Repository updated successfully!".into()))
}

fn create_group<T: Transport>(session: &Session<T>, prompt: &mut dyn Prompt) -> Result<Outcome> {
    let name = prompt.line("Enter group name")?;
    path_segment(&name, "group name")?;
    let description = prompt.line("Enter group description")?;
    let request = create_group_request(&name, &description)?;
    let res = session.send(&request)?;
    if res.status == 200 || res.status == 201 {
        Ok(Outcome::Message(format!("Group '{}' created successfully", name.trim())))
    } else {
        Err(Error::Http {
            status: res.status,
            body: res.body,
        })
    }
}

fn change_group<T: Transport>(
    session: &mut Session<T>,
    prompt: &mut dyn Prompt,
) -> Result<Outcome> {
    let group = prompt.line("Enter user's group name")?;
    session.change_group(&group)?;
    Ok(Outcome::Message(format!(
        "Token refreshed for group '{}'",
        session.group()
    )))
}

// Command-line flags. Anything not given here falls back to the
// environment and then the config file (see `config`).

use clap::Parser;

/// Interactive client for the Artifactory REST API.
///
/// There is no password flag: the password is always read from a hidden
/// prompt so it never lands in shell history or the process list.
#[derive(Parser, Debug)]
#[command(name = "arty", version, about = "Interactive CLI for the Artifactory REST API")]
pub struct Cli {
    /// Username used to obtain access tokens
    #[arg(short, long)]
    pub username: String,

    /// Server host name, e.g. acme.jfrog.io
    #[arg(long, env = "ARTIFACTORY_SERVER")]
    pub server: Option<String>,

    /// Full API base URL; overrides --server
    #[arg(long, env = "ARTIFACTORY_URL")]
    pub url: Option<String>,

    /// Group the first token is scoped to
    #[arg(short, long, env = "ARTIFACTORY_GROUP")]
    pub group: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_required() {
        assert!(Cli::try_parse_from(["arty"]).is_err());
    }

    #[test]
    fn password_flag_does_not_exist() {
        assert!(Cli::try_parse_from(["arty", "-u", "alice", "-p", "secret"]).is_err());
        assert!(Cli::try_parse_from(["arty", "-u", "alice", "--password", "secret"]).is_err());
    }

    #[test]
    fn parses_server_and_group() {
        let cli = Cli::try_parse_from([
            "arty", "--username", "alice", "--server", "acme.jfrog.io", "-g", "readers",
        ])
        .unwrap();
        assert_eq!(cli.username, "alice");
        assert_eq!(cli.server.as_deref(), Some("acme.jfrog.io"));
        assert_eq!(cli.group.as_deref(), Some("readers"));
    }
}

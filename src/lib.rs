// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive CLI.
//
// - `api`: blocking HTTP client for the Artifactory REST API and the
//   `Transport` trait the rest of the crate talks to.
// - `session`: credentials, current group and bearer token.
// - `menu`: the fixed numbered command registry.
// - `ops`: one operation per menu command (validation, request, result).
// - `ui`: prompts and the menu loop.
// - `cli` / `config`: command-line flags and the optional config file.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod menu;
pub mod ops;
pub mod session;
pub mod ui;

#[cfg(test)]
mod testing;

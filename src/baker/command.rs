// src/baker/command.rs

//! Baker command-line construction.
//!
//! The token order is dictated by the baker's own CLI grammar:
//!
//! ```text
//! <executable> -base-dir <base_dir> -endpoint http://127.0.0.1:<port>
//!     [params...] run with local node <node_dir> <account> [run_params...]
//! ```
//!
//! Building is a pure function of [`BakerParams`]; nothing here touches the
//! filesystem or spawns anything.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::params::BakerParams;

/// Characters that never need quoting in a POSIX shell word.
static SHELL_SAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_@%+=:,./-]+$").expect("static regex is valid"));

/// Fully assembled baker invocation. The first token is the executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakerCommand {
    argv: Vec<OsString>,
}

impl BakerCommand {
    pub fn build(params: &BakerParams) -> Self {
        let mut argv: Vec<OsString> = vec![
            params.executable.clone().into_os_string(),
            "-base-dir".into(),
            params.base_dir.clone().into_os_string(),
            "-endpoint".into(),
            params.endpoint().into(),
        ];
        argv.extend(params.params.iter().map(OsString::from));
        argv.extend(["run", "with", "local", "node"].map(OsString::from));
        argv.push(params.node_dir.clone().into_os_string());
        argv.push(params.account.clone().into());
        argv.extend(params.run_params.iter().map(OsString::from));

        Self { argv }
    }

    pub fn program(&self) -> &OsStr {
        &self.argv[0]
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[OsString] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }

    /// Shell-quoted, copy-pasteable rendering of the command.
    pub fn render(&self) -> String {
        self.argv
            .iter()
            .map(|arg| shell_quote(&arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for BakerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Quote one word for a POSIX shell.
///
/// Safe words are returned unchanged, the empty word becomes `''`, anything
/// else is wrapped in single quotes with embedded quotes spelled `'"'"'`.
pub fn shell_quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    if SHELL_SAFE.is_match(word) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r#"'"'"'"#))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BakerParams {
        BakerParams::new(
            "/bin/octez-baker-alpha",
            18730,
            "/tmp/client",
            "/tmp/node",
            "bootstrap1",
        )
    }

    #[test]
    fn minimal_command_matches_cli_grammar() {
        let cmd = BakerCommand::build(&sample());
        assert_eq!(
            cmd.render(),
            "/bin/octez-baker-alpha -base-dir /tmp/client -endpoint http://127.0.0.1:18730 \
             run with local node /tmp/node bootstrap1"
        );
    }

    #[test]
    fn extra_params_surround_the_verb_sequence() {
        let params = sample()
            .with_params(["--media-type", "json"])
            .with_run_params(["--liquidity-baking-toggle-vote", "pass"]);
        let cmd = BakerCommand::build(&params);

        let tokens: Vec<String> = cmd
            .argv()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            tokens,
            vec![
                "/bin/octez-baker-alpha",
                "-base-dir",
                "/tmp/client",
                "-endpoint",
                "http://127.0.0.1:18730",
                "--media-type",
                "json",
                "run",
                "with",
                "local",
                "node",
                "/tmp/node",
                "bootstrap1",
                "--liquidity-baking-toggle-vote",
                "pass",
            ]
        );
        assert_eq!(cmd.program(), OsStr::new("/bin/octez-baker-alpha"));
        assert_eq!(cmd.args().len(), tokens.len() - 1);
    }

    #[test]
    fn quoting_follows_posix_rules() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("plain-word_1.2:3,4@5%6+7=8/"), "plain-word_1.2:3,4@5%6+7=8/");
        assert_eq!(shell_quote("two words"), "'two words'");
        assert_eq!(shell_quote("it's"), r#"'it'"'"'s'"#);
        assert_eq!(shell_quote("$HOME"), "'$HOME'");
    }

    #[test]
    fn render_quotes_paths_with_spaces() {
        let params = BakerParams::new("/opt/my baker", 1, "/tmp/c", "/tmp/n", "acc");
        let rendered = BakerCommand::build(&params).render();
        assert!(rendered.starts_with("'/opt/my baker' -base-dir"));
        assert_eq!(rendered, BakerCommand::build(&params).to_string());
    }
}

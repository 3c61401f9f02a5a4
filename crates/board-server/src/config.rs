//! Command-line arguments and startup configuration.
//!
//! The signing secret is the one required piece of configuration: it comes
//! from `--secret-file` or the `BOARD_SECRET` environment variable, and its
//! absence is startup-fatal. The value is wrapped in [`SecretString`] as soon
//! as it is read and never logged.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use secrecy::SecretString;

/// Bulletin board server.
#[derive(Debug, Parser)]
#[command(name = "board-server", version, about)]
pub struct Args {
    /// Address to listen on.
    #[arg(long, env = "BOARD_LISTEN", default_value = "127.0.0.1:8000")]
    pub listen: SocketAddr,

    /// Path to the SQLite database.
    #[arg(long, env = "BOARD_DB", default_value = "board.db")]
    pub db_path: PathBuf,

    /// File containing the cookie-signing secret.
    #[arg(long, env = "BOARD_SECRET_FILE")]
    pub secret_file: Option<PathBuf>,

    /// Cookie-signing secret (prefer --secret-file in production).
    #[arg(long, env = "BOARD_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// File of `user:password` lines overriding the built-in users.
    #[arg(long, env = "BOARD_USERS_FILE")]
    pub users_file: Option<PathBuf>,

    /// Log filter (tracing `EnvFilter` syntax).
    #[arg(long, env = "BOARD_LOG", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Loads the signing secret, preferring the file over the inline value.
    ///
    /// # Errors
    ///
    /// Fails if neither source is configured or the file cannot be read.
    /// This error is startup-fatal by design: the server must never run
    /// with an absent or empty secret.
    pub fn load_secret(&self) -> anyhow::Result<SecretString> {
        if let Some(path) = &self.secret_file {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read secret file {}", path.display()))?;
            let trimmed = raw.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                bail!("secret file {} is empty", path.display());
            }
            return Ok(SecretString::from(trimmed.to_string()));
        }
        if let Some(secret) = &self.secret {
            return Ok(SecretString::from(secret.clone()));
        }
        bail!("no signing secret configured: set --secret-file or BOARD_SECRET")
    }

    /// Loads the user table: `users_file` if given, built-in defaults
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or a line is not `user:password`.
    pub fn load_users(&self) -> anyhow::Result<HashMap<String, String>> {
        let Some(path) = &self.users_file else {
            return Ok(default_users());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read users file {}", path.display()))?;
        let mut users = HashMap::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((user, password)) = line.split_once(':') else {
                bail!("malformed users file line (expected user:password)");
            };
            users.insert(user.to_string(), password.to_string());
        }
        if users.is_empty() {
            bail!("users file {} defines no users", path.display());
        }
        Ok(users)
    }
}

/// The built-in user table.
fn default_users() -> HashMap<String, String> {
    HashMap::from([
        ("guest1".to_string(), "1234".to_string()),
        ("guest2".to_string(), "5678".to_string()),
        ("admin".to_string(), "admin".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;

    fn args_from(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("board-server").chain(argv.iter().copied()))
    }

    #[test]
    fn missing_secret_is_an_error() {
        let args = args_from(&[]);
        assert!(args.load_secret().is_err());
    }

    #[test]
    fn inline_secret_is_accepted() {
        let args = args_from(&["--secret", "an-adequately-long-test-secret-0123456789"]);
        assert!(args.load_secret().is_ok());
    }

    #[test]
    fn secret_file_wins_over_inline_secret() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file-secret-that-is-long-enough-0123456789").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let args = args_from(&["--secret", "inline", "--secret-file", &path]);

        use secrecy::ExposeSecret;
        let secret = args.load_secret().unwrap();
        assert_eq!(
            secret.expose_secret(),
            "file-secret-that-is-long-enough-0123456789"
        );
    }

    #[test]
    fn empty_secret_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let args = args_from(&["--secret-file", &path]);
        assert!(args.load_secret().is_err());
    }

    #[test]
    fn default_users_match_the_fixture_accounts() {
        let users = args_from(&[]).load_users().unwrap();
        assert_eq!(users.get("guest1").map(String::as_str), Some("1234"));
        assert_eq!(users.get("admin").map(String::as_str), Some("admin"));
    }

    #[test]
    fn users_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# accounts").unwrap();
        writeln!(file, "alice:wonderland").unwrap();
        writeln!(file, "admin:hunter2").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let users = args_from(&["--users-file", &path]).load_users().unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users.get("alice").map(String::as_str), Some("wonderland"));
        assert!(!users.contains_key("guest1"));
    }

    #[test]
    fn malformed_users_line_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "no-colon-here").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        assert!(args_from(&["--users-file", &path]).load_users().is_err());
    }
}

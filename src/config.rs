//   Copyright (c) 2024-2026 Anton Kundenko <singaraiona@gmail.com>
//   All rights reserved.
//
//   Permission is hereby granted, free of charge, to any person obtaining a copy
//   of this software and associated documentation files (the "Software"), to deal
//   in the Software without restriction, including without limitation the rights
//   to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//   copies of the Software, and to permit persons to whom the Software is
//   furnished to do so, subject to the following conditions:
//
//   The above copyright notice and this permission notice shall be included in all
//   copies or substantial portions of the Software.
//
//   THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//   IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//   FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//   AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//   LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//   OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//   SOFTWARE.

//! Connection parameters and client-side settings.
//!
//! [`ConnectConfig`] is rendered into a keyword/value connection string that
//! the driver parses as-is; server-side settings (timeouts, compression and
//! any extra parameters) travel in its `options` value as `-c key=value`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
/// ClickHouse's PostgreSQL-compatible interface.
pub const DEFAULT_PORT: u16 = 9005;
pub const DEFAULT_USER: &str = "default";
pub const DEFAULT_DATABASE: &str = "default";

pub const DEFAULT_MAX_ROWS: usize = 1000;
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(60);

const APPLICATION_NAME: &str = "chq";

/// Client-side limits applied to every statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Maximum number of rows rendered per result set.
    pub max_rows: usize,
    /// Upper bound on a single driver round trip.
    pub query_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_rows: DEFAULT_MAX_ROWS,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

/// Network compression requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Lz4,
    Zstd,
}

impl Compression {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Lz4 => "lz4",
            Compression::Zstd => "zstd",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Compression::None),
            "lz4" => Ok(Compression::Lz4),
            "zstd" => Ok(Compression::Zstd),
            other => Err(Error::Config(format!(
                "unknown compression '{other}' (expected none, lz4 or zstd)"
            ))),
        }
    }
}

/// Everything needed to open a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Use TLS for the connection.
    pub secure: bool,
    /// Accept any server certificate.
    pub skip_verify: bool,
    pub dial_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub max_open_conns: usize,
    pub max_idle_conns: usize,
    /// Connections older than this are reopened before the next statement.
    pub conn_max_lifetime: Duration,
    pub compression: Compression,
    /// Extra server settings, passed through verbatim.
    pub params: BTreeMap<String, String>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        ConnectConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            secure: false,
            skip_verify: false,
            dial_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(30),
            max_open_conns: 10,
            max_idle_conns: 5,
            conn_max_lifetime: Duration::from_secs(3600),
            compression: Compression::None,
            params: BTreeMap::new(),
        }
    }
}

impl ConnectConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        ConnectConfig {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            ..ConnectConfig::default()
        }
    }

    /// `host:port`, as shown in the banner and in connect errors.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(Error::Config("port must be non-zero".into()));
        }
        if self.max_open_conns == 0 {
            return Err(Error::Config("max open connections must be at least 1".into()));
        }
        if self.max_idle_conns > self.max_open_conns {
            return Err(Error::Config(format!(
                "max idle connections ({}) exceeds max open connections ({})",
                self.max_idle_conns, self.max_open_conns
            )));
        }
        if let Some(key) = self.params.keys().find(|k| !is_setting_name(k)) {
            return Err(Error::Config(format!("invalid parameter name '{key}'")));
        }
        Ok(())
    }

    /// Server settings sent with the startup packet.
    pub fn server_settings(&self) -> Vec<(String, String)> {
        let mut settings = Vec::new();
        if !self.read_timeout.is_zero() {
            settings.push((
                "receive_timeout".to_string(),
                self.read_timeout.as_secs().max(1).to_string(),
            ));
        }
        if !self.write_timeout.is_zero() {
            settings.push((
                "send_timeout".to_string(),
                self.write_timeout.as_secs().max(1).to_string(),
            ));
        }
        if self.compression != Compression::None {
            settings.push((
                "network_compression_method".to_string(),
                self.compression.as_str().to_string(),
            ));
        }
        for (key, value) in &self.params {
            settings.push((key.clone(), value.clone()));
        }
        settings
    }

    /// Keyword/value connection string understood by the driver.
    pub fn dsn(&self) -> String {
        let mut pairs: Vec<(&str, String)> = vec![
            ("host", self.host.clone()),
            ("port", self.port.to_string()),
            ("user", self.user.clone()),
        ];
        if !self.password.is_empty() {
            pairs.push(("password", self.password.clone()));
        }
        if !self.database.is_empty() {
            pairs.push(("dbname", self.database.clone()));
        }
        let sslmode = if self.secure { "require" } else { "disable" };
        pairs.push(("sslmode", sslmode.to_string()));
        if !self.dial_timeout.is_zero() {
            pairs.push((
                "connect_timeout",
                self.dial_timeout.as_secs().max(1).to_string(),
            ));
        }
        pairs.push(("application_name", APPLICATION_NAME.to_string()));

        let options: Vec<String> = self
            .server_settings()
            .iter()
            .map(|(k, v)| format!("-c {k}={}", v.replace('\\', "\\\\").replace(' ', "\\ ")))
            .collect();
        if !options.is_empty() {
            pairs.push(("options", options.join(" ")));
        }

        pairs
            .iter()
            .map(|(k, v)| format!("{k}={}", quote_value(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn is_setting_name(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn quote_value(value: &str) -> String {
    let plain = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if plain {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

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

mod editor;
mod highlighter;
mod prompt;
mod theme;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use chq::config::{self, Compression, ConnectConfig, Settings};
use chq::driver::PgDriver;
use chq::{Client, ScriptReader, Session};

use editor::EditorReader;

#[derive(Parser)]
#[command(name = "chq", version, about = "Interactive SQL client for ClickHouse")]
struct Args {
    /// Server host
    #[arg(long, default_value = config::DEFAULT_HOST)]
    host: String,
    /// Port of the PostgreSQL-compatible interface
    #[arg(long, default_value_t = config::DEFAULT_PORT)]
    port: u16,
    #[arg(short, long, default_value = config::DEFAULT_USER)]
    user: String,
    #[arg(long, default_value = "")]
    password: String,
    /// Database selected at connect time
    #[arg(short, long, default_value = config::DEFAULT_DATABASE)]
    database: String,
    /// Connect over TLS
    #[arg(long)]
    secure: bool,
    /// Accept any TLS certificate (insecure)
    #[arg(long)]
    skip_verify: bool,
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    dial_timeout: u64,
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    read_timeout: u64,
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    write_timeout: u64,
    #[arg(long, default_value_t = 10)]
    max_open_conns: usize,
    #[arg(long, default_value_t = 5)]
    max_idle_conns: usize,
    /// Reopen the connection after this many seconds
    #[arg(long, value_name = "SECS", default_value_t = 3600)]
    conn_max_lifetime: u64,
    /// Network compression: none, lz4 or zstd
    #[arg(long, default_value = "none")]
    compression: Compression,
    /// Extra server setting (KEY=VALUE, repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,
    /// Maximum number of rows rendered per result
    #[arg(long, default_value_t = config::DEFAULT_MAX_ROWS)]
    max_rows: usize,
    /// Statement timeout
    #[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_QUERY_TIMEOUT.as_secs())]
    query_timeout: u64,
    /// Start with timing enabled
    #[arg(short, long)]
    timing: bool,
    /// Start in vertical output mode
    #[arg(long)]
    vertical: bool,
    /// Execute a single statement and exit
    #[arg(short, long)]
    query: Option<String>,
    /// Execute statements from a file and exit
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    std::process::exit(run(&args));
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> i32 {
    let config = match connect_config(args) {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };
    let settings = Settings {
        max_rows: args.max_rows.max(1),
        query_timeout: Duration::from_secs(args.query_timeout.max(1)),
    };

    let driver = match PgDriver::connect(&config) {
        Ok(driver) => driver,
        Err(e) => return fail(&e),
    };

    let mut session = Session::new(config.database.clone(), settings);
    session.timing = args.timing;
    session.vertical = args.vertical;

    let mut client = Client::new(driver, session);
    client.fetch_server_info();

    let mut out = io::stdout();
    let result = if let Some(ref sql) = args.query {
        let sql = sql.trim();
        let sql = sql.strip_suffix(';').unwrap_or(sql);
        client.handle(sql, &mut out).map(|_| ()).map_err(chq::Error::from)
    } else if let Some(ref path) = args.file {
        run_file(&mut client, path, &mut out)
    } else {
        print_banner(&config, client.session());
        let mut reader = EditorReader::new();
        client.run(&mut reader, &mut out)
    };

    // Close the connection before reporting.
    drop(client);
    match result {
        Ok(()) => 0,
        Err(e) => fail(&e),
    }
}

fn connect_config(args: &Args) -> chq::Result<ConnectConfig> {
    let mut config = ConnectConfig::new(
        args.host.clone(),
        args.port,
        args.user.clone(),
        args.password.clone(),
        args.database.clone(),
    );
    config.secure = args.secure || args.skip_verify;
    config.skip_verify = args.skip_verify;
    config.dial_timeout = Duration::from_secs(args.dial_timeout);
    config.read_timeout = Duration::from_secs(args.read_timeout);
    config.write_timeout = Duration::from_secs(args.write_timeout);
    config.max_open_conns = args.max_open_conns;
    config.max_idle_conns = args.max_idle_conns;
    config.conn_max_lifetime = Duration::from_secs(args.conn_max_lifetime);
    config.compression = args.compression;

    for spec in &args.params {
        let Some((key, value)) = spec.split_once('=') else {
            return Err(chq::Error::Config(format!(
                "--param expects KEY=VALUE, got: {spec}"
            )));
        };
        config
            .params
            .insert(key.trim().to_string(), value.trim().to_string());
    }

    config.validate()?;
    Ok(config)
}

fn run_file(client: &mut Client<PgDriver>, path: &Path, out: &mut io::Stdout) -> chq::Result<()> {
    let file = File::open(path).map_err(|e| {
        chq::Error::Config(format!("cannot open {}: {e}", path.display()))
    })?;
    let mut reader = ScriptReader::new(BufReader::new(file));
    client.run(&mut reader, out)
}

fn fail(err: &chq::Error) -> i32 {
    use theme::*;
    eprintln!("{ERROR}Error: {err}{R}");
    1
}

// ---------------------------------------------------------------------------
// Banner
// ---------------------------------------------------------------------------

fn print_banner(config: &ConnectConfig, session: &Session) {
    use theme::*;

    let server_version = if session.server.version.is_empty() {
        "unknown"
    } else {
        session.server.version.as_str()
    };
    let lines = [
        format!(
            "client v{} ({})  \u{b7}  {}",
            env!("CARGO_PKG_VERSION"),
            env!("CHQ_GIT_REVISION"),
            env!("CHQ_BUILD_TARGET")
        ),
        format!("connected to {}", config.address()),
        format!(
            "server {server_version}  \u{b7}  up {}",
            format_uptime(session.server.uptime)
        ),
    ];
    let help = "type help for commands, end SQL with ;";

    let w = lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(help.chars().count()))
        .max()
        .unwrap_or(0);
    let fill = w.saturating_sub(12);
    println!(
        "{BAN_BORDER}\u{256d}\u{2500} {BOLD}{BAN_TITLE}ClickHouse{R}{BAN_BORDER} \u{2500}{}\u{256e}{R}",
        "\u{2500}".repeat(fill)
    );
    for line in &lines {
        println!(
            "{BAN_BORDER}\u{2502}{R} {BAN_INFO}{line}{}{R} {BAN_BORDER}\u{2502}{R}",
            " ".repeat(w - line.chars().count())
        );
    }
    println!(
        "{BAN_BORDER}\u{2502}{R} {BAN_HELP}{help}{}{R} {BAN_BORDER}\u{2502}{R}",
        " ".repeat(w - help.chars().count())
    );
    println!(
        "{BAN_BORDER}\u{2570}{}\u{256f}{R}",
        "\u{2500}".repeat(w + 2)
    );
    println!();
}

fn format_uptime(secs: i64) -> String {
    let secs = secs.max(0);
    let (days, rem) = (secs / 86_400, secs % 86_400);
    let (hours, rem) = (rem / 3600, rem % 3600);
    let mins = rem / 60;
    if days > 0 {
        format!("{days}d {hours}h {mins}m")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m {}s", rem % 60)
    }
}

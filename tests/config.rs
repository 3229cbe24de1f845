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

//! Connection configuration, connection strings and cell values.

use std::time::Duration;

use chq::config::{self, Compression, ConnectConfig, Settings};
use chq::{Error, Value};

fn config() -> ConnectConfig {
    ConnectConfig::new("ch.internal", 9005, "reader", "", "default")
}

// ---------------------------------------------------------------------------
// ConnectConfig
// ---------------------------------------------------------------------------

#[test]
fn defaults() {
    let c = ConnectConfig::default();
    assert_eq!(c.address(), "127.0.0.1:9005");
    assert_eq!(c.user, "default");
    assert_eq!(c.database, "default");
    assert_eq!(c.dial_timeout, Duration::from_secs(10));
    assert_eq!(c.read_timeout, Duration::from_secs(30));
    assert_eq!(c.write_timeout, Duration::from_secs(30));
    assert_eq!(c.max_open_conns, 10);
    assert_eq!(c.max_idle_conns, 5);
    assert_eq!(c.conn_max_lifetime, Duration::from_secs(3600));
    assert_eq!(c.compression, Compression::None);
    assert!(c.validate().is_ok());

    let s = Settings::default();
    assert_eq!(s.max_rows, config::DEFAULT_MAX_ROWS);
    assert_eq!(s.query_timeout, Duration::from_secs(60));
}

#[test]
fn default_dsn() {
    assert_eq!(
        ConnectConfig::default().dsn(),
        "host=127.0.0.1 port=9005 user=default dbname=default sslmode=disable \
         connect_timeout=10 application_name=chq \
         options='-c receive_timeout=30 -c send_timeout=30'"
    );
}

#[test]
fn dsn_quotes_and_secure() {
    let mut c = config();
    c.password = "p w'd".into();
    c.secure = true;
    c.dial_timeout = Duration::ZERO;
    c.read_timeout = Duration::ZERO;
    c.write_timeout = Duration::ZERO;
    assert_eq!(
        c.dsn(),
        "host=ch.internal port=9005 user=reader password='p w\\'d' dbname=default \
         sslmode=require application_name=chq"
    );
}

#[test]
fn dsn_parses_with_driver() {
    let mut c = config();
    c.password = "s3cret pass".into();
    c.compression = Compression::Zstd;
    c.params.insert("log_comment".into(), "hello world".into());

    let parsed: tokio_postgres::Config = c.dsn().parse().expect("valid dsn");
    assert_eq!(parsed.get_user(), Some("reader"));
    assert_eq!(parsed.get_dbname(), Some("default"));
    assert_eq!(parsed.get_password(), Some(&b"s3cret pass"[..]));
    assert_eq!(parsed.get_ports(), &[9005]);
    assert_eq!(parsed.get_application_name(), Some("chq"));
    assert_eq!(parsed.get_connect_timeout(), Some(&Duration::from_secs(10)));
    assert_eq!(
        parsed.get_options(),
        Some(
            "-c receive_timeout=30 -c send_timeout=30 \
             -c network_compression_method=zstd -c log_comment=hello\\ world"
        )
    );
}

#[test]
fn sub_second_timeouts_round_up() {
    let mut c = config();
    c.dial_timeout = Duration::from_millis(200);
    c.read_timeout = Duration::from_millis(1);
    c.write_timeout = Duration::ZERO;
    let dsn = c.dsn();
    assert!(dsn.contains("connect_timeout=1 "), "{dsn}");
    assert!(dsn.ends_with("options='-c receive_timeout=1'"), "{dsn}");
}

#[test]
fn server_settings_order() {
    let mut c = config();
    c.compression = Compression::Lz4;
    c.params.insert("max_threads".into(), "4".into());
    c.params.insert("join_use_nulls".into(), "1".into());
    let keys: Vec<String> = c.server_settings().into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec![
            "receive_timeout",
            "send_timeout",
            "network_compression_method",
            "join_use_nulls",
            "max_threads",
        ]
    );
}

#[test]
fn validate_rejects_bad_values() {
    let cases: [(&str, fn(&mut ConnectConfig)); 5] = [
        ("empty host", |c: &mut ConnectConfig| c.host = "  ".into()),
        ("zero port", |c: &mut ConnectConfig| c.port = 0),
        ("zero open", |c: &mut ConnectConfig| c.max_open_conns = 0),
        ("idle over open", |c: &mut ConnectConfig| {
            c.max_idle_conns = c.max_open_conns + 1
        }),
        ("bad param", |c: &mut ConnectConfig| {
            c.params.insert("max threads".into(), "4".into());
        }),
    ];
    for (name, mutate) in cases {
        let mut c = config();
        mutate(&mut c);
        assert!(matches!(c.validate(), Err(Error::Config(_))), "{name}");
    }
}

#[test]
fn compression_parse() {
    assert_eq!("LZ4".parse::<Compression>().unwrap(), Compression::Lz4);
    assert_eq!("zstd".parse::<Compression>().unwrap(), Compression::Zstd);
    assert_eq!("none".parse::<Compression>().unwrap(), Compression::None);
    assert_eq!(Compression::Zstd.to_string(), "zstd");
    assert!(matches!("gzip".parse::<Compression>(), Err(Error::Config(_))));
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

#[test]
fn value_display() {
    assert_eq!(Value::Null.to_string(), "");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Int(-12).to_string(), "-12");
    assert_eq!(Value::Float(1.5).to_string(), "1.5");
    assert_eq!(Value::from("text").to_string(), "text");
    assert_eq!(Value::from(String::from("2024-03-09 07:05:00")).to_string(), "2024-03-09 07:05:00");
}

#[test]
fn value_from_option() {
    assert!(Value::from(None::<i64>).is_null());
    assert_eq!(Value::from(Some(3i64)), Value::Int(3));
}

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

//! PostgreSQL wire protocol driver built on `tokio-postgres`.
//!
//! The async client runs on a private runtime with one worker thread; each
//! call blocks the caller until the response arrives or the deadline passes.
//!
//! Every statement goes through the simple query protocol, so cells arrive
//! in the server's own text form and no per-type decoding happens here.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio_postgres::tls::MakeTlsConnect;
use tokio_postgres::{NoTls, SimpleQueryMessage, SimpleQueryRow, SimpleQueryStream, Socket};
use tokio_postgres_rustls::MakeRustlsConnect;

use crate::config::ConnectConfig;
use crate::driver::{Column, Driver, Row, Rowset};
use crate::error::{Error, Result};
use crate::value::Value;

const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(10);

struct Connection {
    client: tokio_postgres::Client,
    task: JoinHandle<()>,
    opened_at: Instant,
}

pub struct PgDriver {
    config: ConnectConfig,
    conn: Option<Connection>,
    runtime: Runtime,
}

impl PgDriver {
    /// Open a connection and ping it. A failed ping closes the connection.
    pub fn connect(config: &ConnectConfig) -> Result<Self> {
        config.validate()?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("chq-driver")
            .enable_all()
            .build()?;

        let mut driver = PgDriver {
            config: config.clone(),
            conn: None,
            runtime,
        };
        driver.open()?;

        let deadline = Instant::now() + driver.dial_timeout();
        driver
            .ping(deadline)
            .map_err(|e| driver.connect_error(e.to_string()))?;

        tracing::info!(
            addr = %config.address(),
            database = %config.database,
            secure = config.secure,
            max_open_conns = config.max_open_conns,
            max_idle_conns = config.max_idle_conns,
            "connected"
        );
        Ok(driver)
    }

    fn dial_timeout(&self) -> Duration {
        if self.config.dial_timeout.is_zero() {
            DEFAULT_DIAL_TIMEOUT
        } else {
            self.config.dial_timeout
        }
    }

    fn connect_error(&self, reason: String) -> Error {
        Error::Connect {
            addr: self.config.address(),
            reason,
        }
    }

    fn open(&mut self) -> Result<()> {
        self.close();

        let pg_config: tokio_postgres::Config = self
            .config
            .dsn()
            .parse()
            .map_err(|e: tokio_postgres::Error| Error::Config(e.to_string()))?;
        let dial = self.dial_timeout();

        let opened = if self.config.secure {
            let tls = make_tls(self.config.skip_verify)?;
            spawn_connection(&self.runtime, &pg_config, tls, dial)
        } else {
            spawn_connection(&self.runtime, &pg_config, NoTls, dial)
        };
        let (client, task) = opened.map_err(|e| self.connect_error(e.to_string()))?;

        self.conn = Some(Connection {
            client,
            task,
            opened_at: Instant::now(),
        });
        Ok(())
    }

    fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            drop(conn.client);
            conn.task.abort();
            tracing::debug!(addr = %self.config.address(), "connection closed");
        }
    }

    /// Reopen the connection when it is missing or past its lifetime.
    fn ensure_connection(&mut self) -> Result<()> {
        let expired = match &self.conn {
            Some(conn) => {
                !self.config.conn_max_lifetime.is_zero()
                    && conn.opened_at.elapsed() >= self.config.conn_max_lifetime
            }
            None => true,
        };
        if expired {
            tracing::debug!(addr = %self.config.address(), "reopening connection");
            self.open()?;
        }
        Ok(())
    }

    fn client(&self) -> Result<&tokio_postgres::Client> {
        match &self.conn {
            Some(conn) => Ok(&conn.client),
            None => Err(self.connect_error("connection is not open".into())),
        }
    }
}

impl Drop for PgDriver {
    fn drop(&mut self) {
        self.close();
    }
}

impl Driver for PgDriver {
    fn ping(&mut self, deadline: Instant) -> Result<()> {
        self.ensure_connection()?;
        let client = self.client()?;
        self.runtime
            .block_on(with_deadline(deadline, client.simple_query("SELECT 1")))?;
        Ok(())
    }

    fn query(&mut self, sql: &str, deadline: Instant) -> Result<Box<dyn Rowset + '_>> {
        self.ensure_connection()?;
        let client = self.client()?;
        let stream = self
            .runtime
            .block_on(with_deadline(deadline, client.simple_query_raw(sql)))?;

        let mut rowset = PgRowset {
            runtime: &self.runtime,
            stream: Box::pin(stream),
            columns: Vec::new(),
            pending: None,
            done: false,
            deadline,
        };
        rowset.read_header()?;
        Ok(Box::new(rowset))
    }

    fn exec(&mut self, sql: &str, deadline: Instant) -> Result<u64> {
        self.ensure_connection()?;
        let client = self.client()?;
        let messages = self
            .runtime
            .block_on(with_deadline(deadline, client.simple_query(sql)))?;
        Ok(messages
            .iter()
            .map(|m| match m {
                SimpleQueryMessage::CommandComplete(n) => *n,
                _ => 0,
            })
            .sum())
    }
}

struct PgRowset<'a> {
    runtime: &'a Runtime,
    stream: Pin<Box<SimpleQueryStream>>,
    columns: Vec<Column>,
    /// Row read ahead while looking for the header.
    pending: Option<SimpleQueryRow>,
    done: bool,
    deadline: Instant,
}

impl PgRowset<'_> {
    fn next_message(&mut self) -> Result<Option<SimpleQueryMessage>> {
        if self.done {
            return Ok(None);
        }
        let runtime = self.runtime;
        let deadline = tokio::time::Instant::from_std(self.deadline);
        let stream = &mut self.stream;
        let next = runtime
            .block_on(async move { tokio::time::timeout_at(deadline, stream.next()).await });

        match next {
            Err(_) => Err(Error::Timeout),
            Ok(None) => {
                self.done = true;
                Ok(None)
            }
            Ok(Some(message)) => Ok(Some(message?)),
        }
    }

    /// Read up to the column header so zero-row results keep their columns.
    fn read_header(&mut self) -> Result<()> {
        while let Some(message) = self.next_message()? {
            match message {
                SimpleQueryMessage::RowDescription(columns) => {
                    self.columns = columns.iter().map(|c| Column::new(c.name())).collect();
                    return Ok(());
                }
                SimpleQueryMessage::Row(row) => {
                    self.columns = row.columns().iter().map(|c| Column::new(c.name())).collect();
                    self.pending = Some(row);
                    return Ok(());
                }
                SimpleQueryMessage::CommandComplete(_) => {
                    self.done = true;
                    return Ok(());
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl Rowset for PgRowset<'_> {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        if let Some(row) = self.pending.take() {
            return decode_row(&row, &self.columns).map(Some);
        }
        while let Some(message) = self.next_message()? {
            match message {
                SimpleQueryMessage::Row(row) => return decode_row(&row, &self.columns).map(Some),
                // Only the first result set of the statement is read.
                SimpleQueryMessage::CommandComplete(_) => {
                    self.done = true;
                    break;
                }
                _ => {}
            }
        }
        Ok(None)
    }
}

fn decode_row(row: &SimpleQueryRow, columns: &[Column]) -> Result<Row> {
    (0..row.len())
        .map(|idx| decode_cell(columns, idx, row.try_get(idx)))
        .collect()
}

/// One text-protocol cell: SQL NULL or the server's rendering of the value.
fn decode_cell<E: fmt::Display>(
    columns: &[Column],
    idx: usize,
    cell: std::result::Result<Option<&str>, E>,
) -> Result<Value> {
    match cell {
        Ok(Some(text)) => Ok(Value::Text(text.to_string())),
        Ok(None) => Ok(Value::Null),
        Err(e) => Err(Error::Scan {
            column: columns
                .get(idx)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| idx.to_string()),
            reason: e.to_string(),
        }),
    }
}

async fn with_deadline<F, T>(deadline: Instant, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, tokio_postgres::Error>>,
{
    match tokio::time::timeout_at(tokio::time::Instant::from_std(deadline), fut).await {
        Ok(res) => res.map_err(Error::from),
        Err(_) => Err(Error::Timeout),
    }
}

fn spawn_connection<T>(
    runtime: &Runtime,
    config: &tokio_postgres::Config,
    tls: T,
    dial: Duration,
) -> Result<(tokio_postgres::Client, JoinHandle<()>)>
where
    T: MakeTlsConnect<Socket> + 'static,
    T::Stream: Send + 'static,
{
    let (client, connection) = runtime
        .block_on(async { tokio::time::timeout(dial, config.connect(tls)).await })
        .map_err(|_| Error::Timeout)??;

    let task = runtime.spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!(error = %e, "connection terminated");
        }
    });
    Ok((client, task))
}

fn make_tls(skip_verify: bool) -> Result<MakeRustlsConnect> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = rustls::ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Tls(e.to_string()))?;

    let config = if skip_verify {
        tracing::warn!("TLS certificate verification is disabled");
        let schemes = provider
            .signature_verification_algorithms
            .supported_schemes();
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCert(schemes)))
            .with_no_client_auth()
    } else {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        builder.with_root_certificates(roots).with_no_client_auth()
    };

    Ok(MakeRustlsConnect::new(config))
}

/// Certificate verifier that accepts any certificate.
#[derive(Debug)]
struct AcceptAnyCert(Vec<SignatureScheme>);

impl ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![Column::new("amount"), Column::new("id")]
    }

    fn cell(text: Option<&str>) -> std::result::Result<Option<&str>, String> {
        Ok(text)
    }

    #[test]
    fn null_cell() {
        assert_eq!(decode_cell(&columns(), 0, cell(None)).unwrap(), Value::Null);
    }

    #[test]
    fn cells_keep_server_text() {
        // Decimal, UUID, array, map, and interval values all arrive as text.
        for text in [
            "1.50",
            "61f0c404-5cb3-11e7-907b-a6006ad3dba0",
            "[1,2,3]",
            "{'a':1}",
            "2024-03-09 07:05:00",
            "true",
        ] {
            assert_eq!(
                decode_cell(&columns(), 0, cell(Some(text))).unwrap(),
                Value::Text(text.to_string())
            );
        }
    }

    #[test]
    fn empty_string_is_not_null() {
        let value = decode_cell(&columns(), 1, cell(Some(""))).unwrap();
        assert_eq!(value, Value::Text(String::new()));
        assert!(!value.is_null());
    }

    #[test]
    fn bad_payload_is_scan_error() {
        let err = decode_cell(&columns(), 1, Err("invalid UTF-8 sequence")).unwrap_err();
        match err {
            Error::Scan { column, reason } => {
                assert_eq!(column, "id");
                assert_eq!(reason, "invalid UTF-8 sequence");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn scan_error_past_header_names_index() {
        let err = decode_cell(&columns(), 5, Err("bad")).unwrap_err();
        assert!(matches!(err, Error::Scan { ref column, .. } if column == "5"), "{err:?}");
    }

    #[test]
    fn tls_configs_build() {
        assert!(make_tls(false).is_ok());
        assert!(make_tls(true).is_ok());
    }
}

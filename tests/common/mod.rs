#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::error::{DatabaseError, ErrorKind};
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use project_exporter::database::{Connector, ProjectSource};
use project_exporter::ProjectRecord;

/// Counters shared between a fake connector and the test observing it
#[derive(Debug, Clone, Default)]
pub struct ConnectionLog {
    attempts: Arc<AtomicU32>,
    opened: Arc<AtomicU32>,
    closed: Arc<AtomicU32>,
}

impl ConnectionLog {
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> u32 {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> u32 {
        self.closed.load(Ordering::SeqCst)
    }
}

/// How the fake server rejects the licensed-projects query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFailure {
    /// Server error packet, surfaced as `sqlx::Error::Database`
    Syntax,
    /// Malformed reply on the wire, surfaced as `sqlx::Error::Protocol`
    Protocol,
}

/// MySQL error 1064 as the server reports it
#[derive(Debug)]
pub struct SyntaxError;

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl StdError for SyntaxError {}

impl DatabaseError for SyntaxError {
    fn message(&self) -> &str {
        "You have an error in your SQL syntax; check the manual near 'FORM Projects'"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("42000"))
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// In-memory stand-in for a MySQL server
#[derive(Debug, Clone)]
pub struct FakeConnector {
    fail_first: u32,
    fail_query: Option<QueryFailure>,
    records: Arc<Mutex<Vec<ProjectRecord>>>,
    log: ConnectionLog,
}

impl FakeConnector {
    pub fn with_records(records: Vec<ProjectRecord>) -> Self {
        Self {
            fail_first: 0,
            fail_query: None,
            records: Arc::new(Mutex::new(records)),
            log: ConnectionLog::default(),
        }
    }

    pub fn always_failing() -> Self {
        Self::failing_first(u32::MAX)
    }

    /// Refuse the first `attempts` connections, then accept
    pub fn failing_first(attempts: u32) -> Self {
        Self {
            fail_first: attempts,
            ..Self::with_records(Vec::new())
        }
    }

    /// Accept connections but reject the query
    pub fn failing_query(failure: QueryFailure) -> Self {
        Self {
            fail_query: Some(failure),
            ..Self::with_records(Vec::new())
        }
    }

    pub fn set_records(&self, records: Vec<ProjectRecord>) {
        *self.records.lock().expect("records lock") = records;
    }

    pub fn log(&self) -> ConnectionLog {
        self.log.clone()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Connection = FakeConnection;

    async fn connect(&self) -> Result<FakeConnection, sqlx::Error> {
        let attempt = self.log.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.fail_first {
            return Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }

        self.log.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakeConnection {
            records: self.records.lock().expect("records lock").clone(),
            fail_query: self.fail_query,
            log: self.log.clone(),
        })
    }

    fn target(&self) -> String {
        "fake://projects".to_string()
    }
}

pub struct FakeConnection {
    records: Vec<ProjectRecord>,
    fail_query: Option<QueryFailure>,
    log: ConnectionLog,
}

#[async_trait]
impl ProjectSource for FakeConnection {
    async fn fetch_licensed_projects(&mut self) -> Result<Vec<ProjectRecord>, sqlx::Error> {
        match self.fail_query {
            Some(QueryFailure::Syntax) => Err(sqlx::Error::Database(Box::new(SyntaxError))),
            Some(QueryFailure::Protocol) => Err(sqlx::Error::Protocol(
                "unexpected packet while reading result set".to_string(),
            )),
            None => Ok(self.records.clone()),
        }
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        self.log.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn project(code: &str, name: &str) -> ProjectRecord {
    ProjectRecord {
        project_code: code.to_string(),
        name: Some(name.to_string()),
        product_type: Some("APM".to_string()),
        api_token: Some(format!("token-{code}")),
        platform: Some("linux".to_string()),
        license_key: format!("LIC-{code}"),
    }
}

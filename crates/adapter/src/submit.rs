//! Best-effort score submission.
//!
//! Bridges the sync game loop with an async TCP client. The game loop calls
//! [`Submitter::submit`] and later polls [`Submitter::try_recv_outcome`]; it
//! never waits on the network.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::protocol::{AckMessage, ScoreReport};

/// Submission configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for connect, write and the optional reply together
    pub timeout_ms: u64,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7788,
            timeout_ms: 3000,
        }
    }
}

impl SubmitConfig {
    /// Create from environment variables
    ///
    /// - `TENMATCH_SUBMIT_HOST` (default: "127.0.0.1")
    /// - `TENMATCH_SUBMIT_PORT` (default: 7788)
    /// - `TENMATCH_SUBMIT_TIMEOUT_MS` (default: 3000)
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("TENMATCH_SUBMIT_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("TENMATCH_SUBMIT_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let timeout_ms = env::var("TENMATCH_SUBMIT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.timeout_ms);

        Self {
            host,
            port,
            timeout_ms,
        }
    }

    /// `TENMATCH_SUBMIT_DISABLED` set to "1" or "true"
    pub fn is_disabled() -> bool {
        std::env::var("TENMATCH_SUBMIT_DISABLED")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid submit address {}:{}", self.host, self.port))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Result of one submission, reported back to the game loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Delivered { seq: u64, ack: Option<AckMessage> },
    Failed { seq: u64, error: String },
}

impl SubmitOutcome {
    pub fn seq(&self) -> u64 {
        match self {
            SubmitOutcome::Delivered { seq, .. } | SubmitOutcome::Failed { seq, .. } => *seq,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, SubmitOutcome::Delivered { .. })
    }
}

/// Send one report and read the optional one-line reply
pub async fn submit_report(config: &SubmitConfig, report: &ScoreReport) -> Result<Option<AckMessage>> {
    let addr = config.socket_addr()?;
    let line = report.to_line()?;

    let exchange = async {
        let mut stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("connect {addr}"))?;
        stream.write_all(&line).await?;
        stream.flush().await?;

        let (reader, _writer) = stream.split();
        let mut reader = BufReader::new(reader);
        let mut reply = String::new();
        let n = reader.read_line(&mut reply).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok::<_, anyhow::Error>(serde_json::from_str::<AckMessage>(reply.trim()).ok())
    };

    tokio::time::timeout(config.timeout(), exchange)
        .await
        .map_err(|_| anyhow!("submission timed out after {}ms", config.timeout_ms))?
}

/// Running submission client.
pub struct Submitter {
    rt: Runtime,
    config: SubmitConfig,
    outcome_tx: mpsc::UnboundedSender<SubmitOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<SubmitOutcome>,
    next_seq: u64,
}

impl Submitter {
    /// Start from environment variables.
    ///
    /// Returns `Ok(None)` if `TENMATCH_SUBMIT_DISABLED` is set.
    pub fn start_from_env() -> Result<Option<Self>> {
        if SubmitConfig::is_disabled() {
            return Ok(None);
        }
        Self::start(SubmitConfig::from_env()).map(Some)
    }

    pub fn start(config: SubmitConfig) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("failed to create tokio runtime")?;
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Ok(Self {
            rt,
            config,
            outcome_tx,
            outcome_rx,
            next_seq: 1,
        })
    }

    pub fn config(&self) -> &SubmitConfig {
        &self.config
    }

    /// Queue a report; returns the sequence number it was sent with
    pub fn submit(&mut self, ts: u64, score: u32, remaining_time: u32) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        let report = ScoreReport::new(seq, ts, score, remaining_time);
        let config = self.config.clone();
        let tx = self.outcome_tx.clone();
        self.rt.spawn(async move {
            let outcome = match submit_report(&config, &report).await {
                Ok(ack) => {
                    info!(seq, score = report.score, acked = ack.is_some(), "score submitted");
                    SubmitOutcome::Delivered { seq, ack }
                }
                Err(err) => {
                    warn!(seq, error = %err, "score submission failed");
                    SubmitOutcome::Failed {
                        seq,
                        error: err.to_string(),
                    }
                }
            };
            let _ = tx.send(outcome);
        });
        seq
    }

    pub fn try_recv_outcome(&mut self) -> Option<SubmitOutcome> {
        self.outcome_rx.try_recv().ok()
    }
}

//! Protocol module - JSON messages for score submission
//!
//! Line-delimited JSON over TCP. Every message carries `type`, `seq` (sequence
//! number) and `ts` (timestamp in ms).
//!
//! ```text
//! Game -> Server: {"type":"scoreReport","seq":1,"ts":1700000000000,"score":42,"remaining_time":17}
//! Server -> Game: {"type":"ack","seq":1,"status":"ok"}
//! ```
//!
//! The reply is optional; a server that closes the connection after reading
//! the report still counts as a delivery.

use serde::{Deserialize, Serialize};

use crate::types::{EndReason, SessionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "scoreReport")]
    ScoreReport,
}

impl Default for ReportType {
    fn default() -> Self {
        Self::ScoreReport
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

impl Default for AckType {
    fn default() -> Self {
        Self::Ack
    }
}

/// Final score sent at session end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ReportType,
    pub seq: u64,
    pub ts: u64,
    pub score: u32,
    /// Seconds left on the clock
    pub remaining_time: u32,
}

impl ScoreReport {
    pub fn new(seq: u64, ts: u64, score: u32, remaining_time: u32) -> Self {
        Self {
            msg_type: ReportType::ScoreReport,
            seq,
            ts,
            score,
            remaining_time,
        }
    }

    /// Encode as one newline-terminated JSON line
    pub fn to_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

/// Optional server reply to a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: AckType,
    pub seq: u64,
    pub status: String,
}

impl AckMessage {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// One row of the record table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub score: u32,
    pub bonus: u32,
    pub total: u32,
    pub cleared: bool,
    /// Unix timestamp in ms
    pub ts: u64,
}

impl RecordEntry {
    pub fn new(result: SessionResult, reason: EndReason, ts: u64) -> Self {
        Self {
            score: result.score,
            bonus: result.bonus,
            total: result.total,
            cleared: reason.is_win(),
            ts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_wire_format() {
        let report = ScoreReport::new(1, 1_700_000_000_000, 42, 17);
        let line = report.to_line().unwrap();
        assert_eq!(line.last(), Some(&b'\n'));

        let v: serde_json::Value = serde_json::from_slice(&line).unwrap();
        assert_eq!(v["type"], "scoreReport");
        assert_eq!(v["score"], 42);
        assert_eq!(v["remaining_time"], 17);
    }

    #[test]
    fn test_ack_parse() {
        let ack: AckMessage = serde_json::from_str(r#"{"type":"ack","seq":3,"status":"ok"}"#).unwrap();
        assert!(ack.is_ok());
        assert_eq!(ack.seq, 3);

        let ack: AckMessage = serde_json::from_str(r#"{"seq":3,"status":"busy"}"#).unwrap();
        assert!(!ack.is_ok());
    }

    #[test]
    fn test_record_entry_from_result() {
        let result = SessionResult::from_final(100, 20);
        let entry = RecordEntry::new(result, EndReason::Cleared, 5);
        assert_eq!(entry.total, 100 + 300 + 100);
        assert!(entry.cleared);
    }
}

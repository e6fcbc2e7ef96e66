//! Adapter module - collaborators that live outside the game core
//!
//! - [`submit`]: best-effort network score submission at session end
//! - [`records`]: in-memory top-10 record table
//! - [`protocol`]: the JSON messages both of them use
//!
//! # Score Submission
//!
//! A finished session sends a single **line-delimited JSON** report over TCP:
//!
//! 1. **Connect** to the configured host (default: 127.0.0.1:7788)
//! 2. **Report**: send one `scoreReport` line with score and remaining time
//! 3. **Reply**: optionally read one `ack` line; closing without a reply is fine
//!
//! Submission runs on its own tokio runtime. Failures are logged and reported
//! through [`Submitter::try_recv_outcome`]; they never affect the session.
//!
//! # Environment Variables
//!
//! - `TENMATCH_SUBMIT_HOST`: Server address (default: "127.0.0.1")
//! - `TENMATCH_SUBMIT_PORT`: Port number (default: 7788)
//! - `TENMATCH_SUBMIT_TIMEOUT_MS`: Give up after this long (default: 3000)
//! - `TENMATCH_SUBMIT_DISABLED`: Set to "1" or "true" to disable submission
//!
//! # Testing
//!
//! Listen with netcat to see what a session sends:
//!
//! ```bash
//! nc -l 127.0.0.1 7788
//! {"type":"scoreReport","seq":1,"ts":1700000000000,"score":42,"remaining_time":17}
//! ```

pub mod protocol;
pub mod records;
pub mod submit;

pub use tenmatch_types as types;

pub use protocol::{AckMessage, RecordEntry, ScoreReport};
pub use records::RecordTable;
pub use submit::{submit_report, SubmitConfig, SubmitOutcome, Submitter};

use std::io::{BufRead, BufReader as StdBufReader, Write};
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use tenmatch::adapter::{
    submit_report, RecordTable, ScoreReport, SubmitConfig, SubmitOutcome, Submitter,
};
use tenmatch::types::{EndReason, SessionResult};

fn local_config(port: u16) -> SubmitConfig {
    SubmitConfig {
        host: "127.0.0.1".to_string(),
        port,
        timeout_ms: 2000,
    }
}

#[tokio::test]
async fn submit_sends_one_line_and_reads_ack() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();
        let line = lines.next_line().await.unwrap().expect("expected a report line");
        write_half
            .write_all(b"{\"type\":\"ack\",\"seq\":7,\"status\":\"ok\"}\n")
            .await
            .unwrap();
        line
    });

    let report = ScoreReport::new(7, 1_700_000_000_000, 123, 45);
    let ack = submit_report(&local_config(port), &report)
        .await
        .unwrap()
        .expect("expected an ack");
    assert!(ack.is_ok());
    assert_eq!(ack.seq, 7);

    let line = tokio::time::timeout(Duration::from_secs(2), server)
        .await
        .unwrap()
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(v["type"], "scoreReport");
    assert_eq!(v["seq"], 7);
    assert_eq!(v["score"], 123);
    assert_eq!(v["remaining_time"], 45);
}

#[tokio::test]
async fn submit_without_reply_still_delivers() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        let _ = lines.next_line().await;
        // Dropping the stream closes the connection without an ack.
    });

    let report = ScoreReport::new(1, 0, 10, 0);
    let ack = submit_report(&local_config(port), &report).await.unwrap();
    assert!(ack.is_none());
}

#[tokio::test]
async fn submit_to_closed_port_fails() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let report = ScoreReport::new(1, 0, 10, 0);
    assert!(submit_report(&local_config(port), &report).await.is_err());
}

#[test]
fn submitter_reports_outcome_to_sync_loop() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = StdBufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let mut stream = stream;
        stream
            .write_all(b"{\"type\":\"ack\",\"seq\":1,\"status\":\"ok\"}\n")
            .unwrap();
        line
    });

    let mut submitter = Submitter::start(local_config(port)).unwrap();
    let seq = submitter.submit(42, 88, 3);
    assert_eq!(seq, 1);

    let deadline = Instant::now() + Duration::from_secs(3);
    let outcome = loop {
        if let Some(outcome) = submitter.try_recv_outcome() {
            break outcome;
        }
        assert!(Instant::now() < deadline, "no submission outcome");
        std::thread::sleep(Duration::from_millis(10));
    };

    match outcome {
        SubmitOutcome::Delivered { seq, ack } => {
            assert_eq!(seq, 1);
            assert!(ack.is_some_and(|a| a.is_ok()));
        }
        SubmitOutcome::Failed { error, .. } => panic!("submission failed: {error}"),
    }

    let line = server.join().unwrap();
    let v: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(v["score"], 88);
    assert_eq!(v["ts"], 42);
}

#[test]
fn records_rank_finished_sessions() {
    let mut table = RecordTable::new();
    let first = table.record(SessionResult::from_final(50, 10), EndReason::Cleared);
    let second = table.record(SessionResult::from_final(10, 0), EndReason::TimeExpired);
    let third = table.record(SessionResult::from_final(20, 40), EndReason::Cleared);

    assert_eq!(first, Some(1));
    assert_eq!(second, Some(2));
    assert_eq!(third, Some(1));
    let totals: Vec<u32> = table.entries().iter().map(|e| e.total).collect();
    assert_eq!(totals, vec![520, 400, 310]);
    assert!(table.best().is_some_and(|e| e.cleared));
}

use std::io::Write;
use std::sync::{Arc, Mutex};

use fixture_block_sync::log_subscriber;

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn capture(timestamps: bool) -> serde_json::Value {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    tracing::subscriber::with_default(log_subscriber(timestamps, move || writer.clone()), || {
        tracing::info!(fixture_id = "436181", "Created block");
    });
    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    let line = output.lines().next().expect("no log line written");
    serde_json::from_str(line).expect("log line is not JSON")
}

#[test]
fn lambda_logs_leave_timestamps_to_the_host() {
    let line = capture(false);
    assert!(line.get("timestamp").is_none(), "line was: {}", line);
    assert_eq!(line["fields"]["message"], "Created block");
    assert_eq!(line["fields"]["fixture_id"], "436181");
}

#[test]
fn cron_logs_carry_timestamps() {
    let line = capture(true);
    assert!(line.get("timestamp").is_some(), "line was: {}", line);
}

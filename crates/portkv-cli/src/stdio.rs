use std::io::{BufRead, Write};

use portkv_bridge::Dispatcher;
use portkv_protocol::{LineCodec, PortMessage};
use portkv_store::StorageBackend;

/// Counts from one stdio session.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub handled: usize,
    pub responses: usize,
    pub failed: usize,
}

/// Read port messages line by line from `input`, dispatch each one, and
/// write every response as a line on `output`.
///
/// Blank lines are skipped. A line that fails to decode or dispatch, or whose
/// response cannot be framed, gets no response; it is logged and skipped, or
/// ends the session when `fail_fast` is set.
pub fn run_ports<S, R, W>(
    dispatcher: &Dispatcher<S>,
    mut input: R,
    mut output: W,
    fail_fast: bool,
) -> anyhow::Result<RunStats>
where
    S: StorageBackend,
    R: BufRead,
    W: Write,
{
    let mut stats = RunStats::default();
    let mut line = Vec::new();
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match answer_line(dispatcher, &line) {
            Ok(frames) => {
                stats.handled += 1;
                for frame in &frames {
                    output.write_all(frame)?;
                    stats.responses += 1;
                }
                output.flush()?;
            }
            Err(e) if fail_fast => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "port command failed");
                stats.failed += 1;
            }
        }
    }
    Ok(stats)
}

/// Decode and dispatch one line, returning the framed responses.
fn answer_line<S: StorageBackend>(
    dispatcher: &Dispatcher<S>,
    line: &[u8],
) -> anyhow::Result<Vec<Vec<u8>>> {
    let message = LineCodec::decode(line)?;
    let mut outbox: Vec<PortMessage> = Vec::with_capacity(1);
    dispatcher.dispatch(message, &mut outbox)?;
    let frames = outbox
        .iter()
        .map(LineCodec::encode)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use portkv_bridge::Bridge;
    use portkv_store::InMemoryStorage;
    use serde_json::{json, Value};
    use std::io::Cursor;

    fn dispatcher(quota: Option<usize>) -> Dispatcher<InMemoryStorage> {
        Dispatcher::register(Bridge::new(InMemoryStorage::with_quota(quota)))
    }

    fn lines(out: &[u8]) -> Vec<Value> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn answers_each_line_in_order() {
        let input = concat!(
            r#"{"port":"storageSetItem","payload":["a",1]}"#, "\n",
            "\n",
            r#"{"port":"storageGetItem","payload":"a"}"#, "\n",
            r#"{"port":"storageEnumKeys"}"#, "\n",
        );
        let mut out = Vec::new();
        let stats = run_ports(&dispatcher(None), Cursor::new(input), &mut out, false).unwrap();
        assert_eq!(stats, RunStats { handled: 3, responses: 3, failed: 0 });
        assert_eq!(
            lines(&out),
            vec![
                json!({"port": "storageSetItemResponse", "payload": null}),
                json!({"port": "storageGetItemResponse", "payload": ["a", 1]}),
                json!({"port": "storageEnumKeysResponse", "payload": ["a"]}),
            ]
        );
    }

    #[test]
    fn silent_abort_writes_nothing() {
        let input = concat!(
            r#"{"port":"storageSetItem","payload":["s",5]}"#, "\n",
            r#"{"port":"storageRemoveFromSet","payload":["s",5]}"#, "\n",
        );
        let mut out = Vec::new();
        let stats = run_ports(&dispatcher(None), Cursor::new(input), &mut out, false).unwrap();
        assert_eq!(stats, RunStats { handled: 2, responses: 1, failed: 0 });
    }

    #[test]
    fn bad_lines_are_skipped() {
        let input = concat!(
            "garbage\n",
            r#"{"port":"storageNope"}"#, "\n",
            r#"{"port":"storageClear"}"#, "\n",
        );
        let mut out = Vec::new();
        let stats = run_ports(&dispatcher(None), Cursor::new(input), &mut out, false).unwrap();
        assert_eq!(stats, RunStats { handled: 1, responses: 1, failed: 2 });
    }

    #[test]
    fn fail_fast_stops_on_backend_error() {
        let input = concat!(
            r#"{"port":"storageSetItem","payload":["key","far too long"]}"#, "\n",
            r#"{"port":"storageClear"}"#, "\n",
        );
        let mut out = Vec::new();
        assert!(run_ports(&dispatcher(Some(4)), Cursor::new(input), &mut out, true).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let mut input = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(br#"{"port":"storageClear"}"#);
        input.push(b'\n');
        let mut out = Vec::new();
        let stats = run_ports(&dispatcher(None), Cursor::new(input), &mut out, false).unwrap();
        assert_eq!(stats, RunStats { handled: 1, responses: 1, failed: 1 });
        assert_eq!(lines(&out), vec![json!({"port": "storageClearResponse", "payload": null})]);
    }

    #[test]
    fn oversized_response_fails_only_its_line() {
        let big = "x".repeat(700 * 1024);
        let mut input = String::new();
        for key in ["a", "b"] {
            let msg = json!({"port": "storageSetItems", "payload": [[key, big.clone()]]});
            input.push_str(&format!("{msg}\n"));
        }
        input.push_str(r#"{"port":"storageGetItems","payload":["a","b"]}"#);
        input.push('\n');
        input.push_str(r#"{"port":"storageClear"}"#);
        input.push('\n');

        let mut out = Vec::new();
        let stats = run_ports(&dispatcher(None), Cursor::new(input.clone()), &mut out, false).unwrap();
        assert_eq!(stats, RunStats { handled: 3, responses: 3, failed: 1 });
        let answered: Vec<Value> = lines(&out).into_iter().map(|m| m["port"].clone()).collect();
        assert_eq!(
            answered,
            vec![
                json!("storageSetItemsResponse"),
                json!("storageSetItemsResponse"),
                json!("storageClearResponse"),
            ]
        );

        let mut out = Vec::new();
        assert!(run_ports(&dispatcher(None), Cursor::new(input), &mut out, true).is_err());
    }
}

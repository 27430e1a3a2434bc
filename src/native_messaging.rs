// Framing: 32-bit little-endian length prefix, then a UTF-8 JSON payload.

use std::io::{ErrorKind, Read, Write};

use anyhow::{bail, Context};
use serde::Serialize;

use crate::{config, protocol::Request};

/// Read one framed request. `Ok(None)` means the peer closed the stream cleanly.
pub fn read_message(input: &mut dyn Read) -> anyhow::Result<Option<Request>> {
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        match input.read(&mut len_buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => bail!("incomplete length prefix (expected 4 bytes, got {filled})"),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("failed reading message length"),
        }
    }

    let msg_len = u32::from_le_bytes(len_buf);
    if msg_len > config::native_messaging::MAX_MESSAGE_SIZE_BYTES {
        bail!("message too large: {msg_len} bytes");
    }

    let mut payload = vec![0u8; msg_len as usize];
    input
        .read_exact(&mut payload)
        .with_context(|| format!("failed reading message payload ({msg_len} bytes)"))?;

    let req: Request = serde_json::from_slice(&payload).context("invalid JSON request")?;
    Ok(Some(req))
}

pub fn write_message<T: Serialize>(output: &mut dyn Write, v: &T) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec(v).context("failed serializing JSON response")?;
    let len: u32 = bytes
        .len()
        .try_into()
        .context("response too large for u32 length")?;
    output.write_all(&len.to_le_bytes())?;
    output.write_all(&bytes)?;
    output.flush().context("failed flushing output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn frame(json: &str) -> Vec<u8> {
        let mut out = (json.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(json.as_bytes());
        out
    }

    #[test]
    fn test_read_two_messages_then_eof() {
        let mut bytes = frame(r#"{"id":"1","method":"hello"}"#);
        bytes.extend(frame(r#"{"id":"2","method":"rank","params":{"tag":"python"}}"#));
        let mut input = Cursor::new(bytes);

        let first = read_message(&mut input).unwrap().unwrap();
        assert_eq!(first.method, "hello");
        assert!(first.params.is_null());

        let second = read_message(&mut input).unwrap().unwrap();
        assert_eq!(second.id, "2");
        assert_eq!(second.params["tag"], "python");

        assert!(read_message(&mut input).unwrap().is_none());
    }

    #[test]
    fn test_truncated_prefix_is_error() {
        let mut input = Cursor::new(vec![3u8, 0]);
        let err = read_message(&mut input).unwrap_err();
        assert!(err.to_string().contains("incomplete length prefix"));
    }

    #[test]
    fn test_oversized_message_is_rejected() {
        let mut input = Cursor::new(u32::MAX.to_le_bytes().to_vec());
        assert!(read_message(&mut input).unwrap_err().to_string().contains("too large"));
    }

    #[test]
    fn test_write_message_frames_payload() {
        let mut out = Vec::new();
        write_message(&mut out, &serde_json::json!({ "id": "7", "result": 1 })).unwrap();
        let len = u32::from_le_bytes(out[..4].try_into().unwrap()) as usize;
        assert_eq!(len, out.len() - 4);
        let v: serde_json::Value = serde_json::from_slice(&out[4..]).unwrap();
        assert_eq!(v["id"], "7");
    }
}

use std::io::{self, BufRead};

/// Read one line, keeping at most `max_len` bytes of it.
///
/// Everything past the bound up to the newline is discarded. Returns `None`
/// once the reader is exhausted.
pub fn read_bounded_line<R: BufRead>(reader: &mut R, max_len: usize) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    let mut seen = 0usize;
    let mut newline = false;
    while !newline {
        let available = match reader.fill_buf() {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            break;
        }
        let (chunk, used) = match available.iter().position(|&b| b == b'\n') {
            Some(at) => {
                newline = true;
                (&available[..at], at + 1)
            }
            None => (available, available.len()),
        };
        let room = max_len.saturating_sub(buf.len());
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
        seen += chunk.len();
        reader.consume(used);
    }

    if seen == 0 && !newline {
        return Ok(None);
    }
    if seen > max_len {
        log::debug!("discarding {} bytes past the line limit", seen - max_len);
    } else if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

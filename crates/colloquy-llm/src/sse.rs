use anyhow::Result;
use std::collections::VecDeque;

/// Default SSE event type: applies until an `event:` line overrides it,
/// and is restored on every blank line.
pub const DEFAULT_EVENT: &str = "message";

/// Literal data payload that terminates the stream.
pub const DONE_MARKER: &str = "[DONE]";

/// One `(eventType, data)` pair extracted from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// Circular buffer for efficient line-based parsing
/// Uses VecDeque for zero-copy line extraction
pub struct LineBuffer {
    buffer: VecDeque<u8>,
}

impl LineBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// Add bytes to the buffer
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract next line (up to \n) from buffer.
    /// Returns None if no complete line is available.
    pub fn next_line(&mut self) -> Option<Result<String>> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;

        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();

        match std::str::from_utf8(&line_bytes) {
            Ok(line_str) => Some(Ok(line_str.trim().to_string())),
            Err(e) => Some(Err(anyhow::anyhow!("Invalid UTF-8: {}", e))),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Incremental SSE frame reader. Feed it raw bytes as they arrive off the
/// transport and drain complete frames; a frame is yielded per `data:` line
/// (the upstream protocol sends one JSON object per line).
///
/// A malformed line surfaces as an `Err` item for that frame only; parsing
/// continues with the next line.
pub struct SseFrameReader {
    buffer: LineBuffer,
    event_type: String,
    done: bool,
}

impl SseFrameReader {
    pub fn new() -> Self {
        Self {
            buffer: LineBuffer::with_capacity(4096),
            event_type: DEFAULT_EVENT.to_string(),
            done: false,
        }
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// True once the `[DONE]` sentinel has been seen; no further frames
    /// will be produced.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Next complete frame, if one is buffered.
    pub fn next_frame(&mut self) -> Option<Result<SseFrame>> {
        if self.done {
            return None;
        }

        while let Some(line_result) = self.buffer.next_line() {
            let line = match line_result {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };

            if line.is_empty() {
                // Blank line ends the event; pending type resets to default.
                self.event_type = DEFAULT_EVENT.to_string();
                continue;
            }

            if let Some(event) = line.strip_prefix("event: ") {
                self.event_type = event.to_string();
                continue;
            }

            if let Some(data) = line.strip_prefix("data: ") {
                if data == DONE_MARKER {
                    self.done = true;
                    return None;
                }

                return Some(Ok(SseFrame {
                    event: self.event_type.clone(),
                    data: data.to_string(),
                }));
            }

            // Comments and unknown fields are ignored.
        }

        None
    }
}

impl Default for SseFrameReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_buffer_basic() {
        let mut buffer = LineBuffer::with_capacity(64);

        buffer.extend(b"line1\nline2\n");

        assert_eq!(buffer.next_line().unwrap().unwrap(), "line1");
        assert_eq!(buffer.next_line().unwrap().unwrap(), "line2");
        assert!(buffer.next_line().is_none());
    }

    #[test]
    fn test_partial_line() {
        let mut buffer = LineBuffer::with_capacity(64);

        buffer.extend(b"partial");
        assert!(buffer.next_line().is_none());

        buffer.extend(b" line\n");
        assert_eq!(buffer.next_line().unwrap().unwrap(), "partial line");
    }

    #[test]
    fn test_frame_reader_default_event() {
        let mut reader = SseFrameReader::new();
        reader.push_bytes(b"data: {\"a\":1}\n");

        let frame = reader.next_frame().unwrap().unwrap();
        assert_eq!(frame.event, "message");
        assert_eq!(frame.data, "{\"a\":1}");
    }

    #[test]
    fn test_frame_reader_done_marker() {
        let mut reader = SseFrameReader::new();
        reader.push_bytes(b"data: [DONE]\n");

        assert!(reader.next_frame().is_none());
        assert!(reader.is_done());

        reader.push_bytes(b"data: after\n");
        assert!(reader.next_frame().is_none());
    }
}

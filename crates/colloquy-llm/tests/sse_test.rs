use colloquy_llm::{SseFrame, SseFrameReader};

fn drain(reader: &mut SseFrameReader) -> Vec<SseFrame> {
    let mut frames = Vec::new();
    while let Some(frame) = reader.next_frame() {
        frames.push(frame.expect("frame should parse"));
    }
    frames
}

#[test]
fn test_data_line_yields_frame_with_default_event() {
    let mut reader = SseFrameReader::new();
    reader.push_bytes(b"data: {\"n\":1}\n");

    let frames = drain(&mut reader);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event, "message");
    assert_eq!(frames[0].data, "{\"n\":1}");
}

#[test]
fn test_event_line_sets_type_for_following_data() {
    let mut reader = SseFrameReader::new();
    reader.push_bytes(b"event: delta\ndata: one\ndata: two\n");

    let frames = drain(&mut reader);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].event, "delta");
    assert_eq!(frames[1].event, "delta");
}

#[test]
fn test_blank_line_resets_event_type() {
    let mut reader = SseFrameReader::new();
    reader.push_bytes(b"event: delta\ndata: one\n\ndata: two\n");

    let frames = drain(&mut reader);
    assert_eq!(frames[0].event, "delta");
    assert_eq!(frames[1].event, "message");
}

#[test]
fn test_unknown_lines_ignored() {
    let mut reader = SseFrameReader::new();
    reader.push_bytes(b": keep-alive comment\nid: 42\ndata: payload\n");

    let frames = drain(&mut reader);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].data, "payload");
}

#[test]
fn test_done_marker_terminates() {
    let mut reader = SseFrameReader::new();
    reader.push_bytes(b"data: first\ndata: [DONE]\ndata: never\n");

    let frames = drain(&mut reader);
    assert_eq!(frames.len(), 1);
    assert!(reader.is_done());
}

#[test]
fn test_frames_across_partial_byte_chunks() {
    let mut reader = SseFrameReader::new();

    reader.push_bytes(b"data: {\"content\":");
    assert!(reader.next_frame().is_none());

    reader.push_bytes(b"\"hi\"}\n");
    let frame = reader.next_frame().unwrap().unwrap();
    assert_eq!(frame.data, "{\"content\":\"hi\"}");
}

#[test]
fn test_invalid_utf8_is_per_frame_error() {
    let mut reader = SseFrameReader::new();
    reader.push_bytes(b"data: \xff\xfe\ndata: ok\n");

    assert!(reader.next_frame().unwrap().is_err());

    // Parsing continues after the bad line.
    let frame = reader.next_frame().unwrap().unwrap();
    assert_eq!(frame.data, "ok");
}

#[test]
fn test_crlf_line_endings() {
    let mut reader = SseFrameReader::new();
    reader.push_bytes(b"data: payload\r\n");

    let frame = reader.next_frame().unwrap().unwrap();
    assert_eq!(frame.data, "payload");
}

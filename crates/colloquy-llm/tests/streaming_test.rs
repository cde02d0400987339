use colloquy_llm::{ChatStreamChunk, StreamEvent};

fn chunk(json: &str) -> ChatStreamChunk {
    serde_json::from_str(json).expect("chunk should parse")
}

#[test]
fn test_content_delta_decodes_to_message_event() {
    let chunk = chunk(
        r#"{"id":"c1","object":"chat.completion.chunk","created":1,"model":"gpt-4o",
            "choices":[{"index":0,"delta":{"role":null,"content":"Hel","tool_calls":null},"finish_reason":null}]}"#,
    );

    let events = chunk.to_stream_events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::Message { content } => assert_eq!(content, "Hel"),
        other => panic!("Expected Message, got {:?}", other),
    }
}

#[test]
fn test_role_delta_decodes_to_role_event() {
    let chunk = chunk(
        r#"{"id":"c1","object":"chat.completion.chunk","created":1,"model":"gpt-4o",
            "choices":[{"index":0,"delta":{"role":"assistant","content":null,"tool_calls":null},"finish_reason":null}]}"#,
    );

    let events = chunk.to_stream_events();
    match &events[0] {
        StreamEvent::Role { role } => assert_eq!(role, "assistant"),
        other => panic!("Expected Role, got {:?}", other),
    }
}

#[test]
fn test_tool_call_deltas_preserve_index_and_fragments() {
    let chunk = chunk(
        r#"{"id":"c1","object":"chat.completion.chunk","created":1,"model":"gpt-4o",
            "choices":[{"index":0,"delta":{"role":null,"content":null,"tool_calls":[
                {"index":0,"id":"call_1","type":"function","function":{"name":"get_weather","arguments":""}},
                {"index":1,"id":"call_2","type":"function","function":{"name":"get_time","arguments":"{\"tz\""}}
            ]},"finish_reason":null}]}"#,
    );

    let events = chunk.to_stream_events();
    assert_eq!(events.len(), 2);
    match &events[1] {
        StreamEvent::ToolCall {
            index,
            id,
            name,
            arguments,
        } => {
            assert_eq!(*index, 1);
            assert_eq!(id.as_deref(), Some("call_2"));
            assert_eq!(name.as_deref(), Some("get_time"));
            assert_eq!(arguments.as_deref(), Some("{\"tz\""));
        }
        other => panic!("Expected ToolCall, got {:?}", other),
    }
}

#[test]
fn test_finish_reason_decodes_to_done() {
    let chunk = chunk(
        r#"{"id":"c1","object":"chat.completion.chunk","created":1,"model":"gpt-4o",
            "choices":[{"index":0,"delta":{"role":null,"content":null,"tool_calls":null},"finish_reason":"tool_calls"}]}"#,
    );

    assert!(chunk.is_done());
    let events = chunk.to_stream_events();
    match &events[0] {
        StreamEvent::Done { finish_reason } => {
            assert_eq!(finish_reason.as_deref(), Some("tool_calls"))
        }
        other => panic!("Expected Done, got {:?}", other),
    }
}

#[test]
fn test_empty_content_emits_no_event() {
    let chunk = chunk(
        r#"{"id":"c1","object":"chat.completion.chunk","created":1,"model":"gpt-4o",
            "choices":[{"index":0,"delta":{"role":null,"content":"","tool_calls":null},"finish_reason":null}]}"#,
    );

    assert!(chunk.to_stream_events().is_empty());
}

#[test]
fn test_malformed_payload_is_an_error() {
    let result = serde_json::from_str::<ChatStreamChunk>("{\"id\":true}");
    assert!(result.is_err());
}

#[test]
fn test_stream_event_serde_tagging() {
    let event = StreamEvent::Message {
        content: "Test".to_string(),
    };

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"message\""));

    let parsed: StreamEvent =
        serde_json::from_str(r#"{"type":"tool_call","index":0,"id":"call_1","name":"t","arguments":"{}"}"#)
            .unwrap();
    match parsed {
        StreamEvent::ToolCall { index, .. } => assert_eq!(index, 0),
        other => panic!("Expected ToolCall, got {:?}", other),
    }
}

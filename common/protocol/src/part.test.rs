use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_text_part() {
    let part = Part::text("hello");
    assert_eq!(part.text.as_deref(), Some("hello"));
    assert!(!part.is_empty());
    assert_eq!(part.binary_mime_type(), None);
}

#[test]
fn test_binary_mime_type() {
    let inline = Part::inline_data("image/png", "aGk=");
    assert_eq!(inline.binary_mime_type(), Some("image/png"));

    let file = Part::file_data("application/pdf", "file:///tmp/doc.pdf");
    assert_eq!(file.binary_mime_type(), Some("application/pdf"));
}

#[test]
fn test_empty_part() {
    assert!(Part::default().is_empty());
    assert!(!Part::text("").is_empty());
}

#[test]
fn test_function_response_wire_format() {
    let part = Part::function_response("read_file", "call-1", "contents");
    let json = serde_json::to_value(&part).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "functionResponse": {
                "name": "read_file",
                "id": "call-1",
                "response": {"output": "contents"}
            }
        })
    );
}

#[test]
fn test_inline_data_wire_format_is_camel_case() {
    let part = Part::inline_data("image/png", "aGk=");
    let json = serde_json::to_value(&part).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "inlineData": {"mimeType": "image/png", "data": "aGk="}
        })
    );
}

#[test]
fn test_llm_content_from_impls() {
    assert_eq!(
        LlmContent::from("text"),
        LlmContent::Text("text".to_string())
    );
    assert_eq!(
        LlmContent::from(Part::text("p")),
        LlmContent::Part(Part::text("p"))
    );
    assert_eq!(
        LlmContent::from(vec![Part::text("a")]),
        LlmContent::Parts(vec![Part::text("a")])
    );
}

#[test]
fn test_llm_content_default_is_empty_text() {
    assert_eq!(LlmContent::default(), LlmContent::Text(String::new()));
}

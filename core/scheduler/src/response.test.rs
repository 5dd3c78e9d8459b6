use super::*;
use pretty_assertions::assert_eq;

fn output_of(part: &Part) -> &str {
    &part
        .function_response
        .as_ref()
        .expect("first part is an envelope")
        .response
        .output
}

#[test]
fn test_string_payload() {
    let parts =
        convert_to_function_response("testTool", "c1", &LlmContent::Text("hello".to_string()));
    assert_eq!(parts.len(), 1);
    assert_eq!(output_of(&parts[0]), "hello");
    let envelope = parts[0].function_response.as_ref().unwrap();
    assert_eq!(envelope.name, "testTool");
    assert_eq!(envelope.id, "c1");
}

#[test]
fn test_empty_string_preserved_literally() {
    let parts = convert_to_function_response("testTool", "c1", &LlmContent::Text(String::new()));
    assert_eq!(parts.len(), 1);
    assert_eq!(output_of(&parts[0]), "");
}

#[test]
fn test_single_text_part() {
    let parts =
        convert_to_function_response("t", "c1", &LlmContent::Part(Part::text("some text")));
    assert_eq!(parts.len(), 1);
    assert_eq!(output_of(&parts[0]), "some text");
}

#[test]
fn test_list_of_one_text_part() {
    let parts =
        convert_to_function_response("t", "c1", &LlmContent::Parts(vec![Part::text("inner")]));
    assert_eq!(parts.len(), 1);
    assert_eq!(output_of(&parts[0]), "inner");
}

#[test]
fn test_single_inline_data_part() {
    let binary = Part::inline_data("image/png", "aGk=");
    let parts = convert_to_function_response("t", "c1", &LlmContent::Part(binary.clone()));
    assert_eq!(parts.len(), 2);
    assert_eq!(
        output_of(&parts[0]),
        "Binary content of type image/png was processed."
    );
    assert_eq!(parts[1], binary);
}

#[test]
fn test_single_file_data_part() {
    let binary = Part::file_data("application/pdf", "file:///tmp/a.pdf");
    let parts = convert_to_function_response("t", "c1", &LlmContent::Part(binary.clone()));
    assert_eq!(parts.len(), 2);
    assert_eq!(
        output_of(&parts[0]),
        "Binary content of type application/pdf was processed."
    );
    assert_eq!(parts[1], binary);
}

#[test]
fn test_list_of_one_binary_part() {
    let binary = Part::inline_data("audio/wav", "UklGRg==");
    let parts = convert_to_function_response("t", "c1", &LlmContent::Parts(vec![binary.clone()]));
    assert_eq!(parts.len(), 2);
    assert_eq!(
        output_of(&parts[0]),
        "Binary content of type audio/wav was processed."
    );
    assert_eq!(parts[1], binary);
}

#[test]
fn test_multiple_parts_appended_after_generic_envelope() {
    let list = vec![Part::text("a"), Part::text("b")];
    let parts = convert_to_function_response("t", "c1", &LlmContent::Parts(list.clone()));
    assert_eq!(parts.len(), 3);
    assert_eq!(output_of(&parts[0]), "Tool execution succeeded.");
    assert_eq!(&parts[1..], list.as_slice());
}

#[test]
fn test_empty_list() {
    let parts = convert_to_function_response("t", "c1", &LlmContent::Parts(vec![]));
    assert_eq!(parts.len(), 1);
    assert_eq!(output_of(&parts[0]), "Tool execution succeeded.");
}

#[test]
fn test_generic_part_not_appended() {
    // A single non-list part that is neither text nor binary produces
    // just the generic envelope.
    let parts = convert_to_function_response("t", "c1", &LlmContent::Part(Part::default()));
    assert_eq!(parts.len(), 1);
    assert_eq!(output_of(&parts[0]), "Tool execution succeeded.");
}

#[test]
fn test_empty_object_part_in_list_is_appended() {
    let parts =
        convert_to_function_response("t", "c1", &LlmContent::Parts(vec![Part::default()]));
    assert_eq!(parts.len(), 2);
    assert_eq!(output_of(&parts[0]), "Tool execution succeeded.");
    assert_eq!(parts[1], Part::default());
}

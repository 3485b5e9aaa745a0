use std::io::Read;

use crate::types::TranscriptItem;

/// Parse a JSON array of transcript items, as exported by the transcript
/// editor (`[{"start":0,"end":2,"transcript":"…"}]`).
///
/// Only the shape is checked here; interval validity is enforced by
/// [`crate::Merger::merge`].
pub fn parse_items(json: &str) -> crate::Result<Vec<TranscriptItem>> {
    Ok(serde_json::from_str(json)?)
}

pub fn read_items(mut reader: impl Read) -> crate::Result<Vec<TranscriptItem>> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    parse_items(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_editor_export() {
        let items = parse_items(
            r#"[
                {"start": 0, "end": 2, "transcript": "I went"},
                {"start": 2, "end": 4.5, "transcript": "to the store", "userInput": "to store"}
            ]"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].end, 4.5);
        assert_eq!(items[1].user_input.as_deref(), Some("to store"));
    }

    #[test]
    fn missing_field_is_a_json_error() {
        let err = parse_items(r#"[{"start": 0, "transcript": "no end"}]"#).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
        assert!(err.to_string().contains("end"));
    }

    #[test]
    fn non_numeric_time_is_a_json_error() {
        let err = parse_items(r#"[{"start": "0", "end": 1, "transcript": ""}]"#).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }

    #[test]
    fn reads_from_any_reader() {
        let json = br#"[{"start": 1, "end": 2, "transcript": "hi"}]"#;
        let items = read_items(&json[..]).unwrap();
        assert_eq!(items[0].transcript, "hi");
    }
}

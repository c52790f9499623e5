//! Decoding of concatenated JSON documents.

use serde_json::{Deserializer, Value};

use crate::error::Result;

/// Decode back-to-back JSON documents separated only by whitespace.
///
/// Container engines stream progress this way, one object after another
/// without a surrounding array.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if any document is malformed.
///
/// # Examples
///
/// ```
/// use kard::util::decode_concatenated_json;
/// use serde_json::json;
///
/// let docs = decode_concatenated_json(r#"{"status":"pull"} {"status":"done"}"#).unwrap();
/// assert_eq!(docs, vec![json!({"status": "pull"}), json!({"status": "done"})]);
/// ```
pub fn decode_concatenated_json(input: &str) -> Result<Vec<Value>> {
    let mut documents = Vec::new();
    for document in Deserializer::from_str(input).into_iter::<Value>() {
        documents.push(document?);
    }
    Ok(documents)
}

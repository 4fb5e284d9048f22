//! JSON wire codec for envelopes.
//!
//! One JSON object per record, field names as on `Envelope`, instants as
//! RFC 3339 strings. An absent or empty record decodes to no envelope, which
//! mirrors tombstones and keep-alive records on the stream.

use crate::constants::DECODE_PREVIEW_BYTES;
use crate::envelope::Envelope;
use crate::error::CodecError;

/// Encode an envelope for `topic`. An absent envelope encodes to no bytes.
pub fn encode(topic: &str, envelope: Option<&Envelope>) -> Result<Option<Vec<u8>>, CodecError> {
    let Some(envelope) = envelope else {
        tracing::debug!(topic, "Null envelope received for encoding");
        return Ok(None);
    };

    let bytes = serde_json::to_vec(envelope).map_err(|source| {
        tracing::error!(id = %envelope.id, topic, error = %source, "Failed to serialize envelope");
        CodecError::Serialize {
            id: envelope.id.clone(),
            topic: topic.to_string(),
            source,
        }
    })?;

    tracing::debug!(id = %envelope.id, topic, bytes = bytes.len(), "Serialized envelope");
    Ok(Some(bytes))
}

/// Decode a record received on `topic`.
///
/// Absent or empty data yields `Ok(None)`. Malformed data yields
/// `CodecError::Deserialize`; the first bytes are logged at debug level only.
pub fn decode(topic: &str, data: Option<&[u8]>) -> Result<Option<Envelope>, CodecError> {
    let data = match data {
        Some(data) if !data.is_empty() => data,
        _ => {
            tracing::debug!(topic, "Null or empty data received for decoding");
            return Ok(None);
        }
    };

    match serde_json::from_slice::<Envelope>(data) {
        Ok(envelope) => {
            tracing::debug!(id = %envelope.id, topic, "Deserialized envelope");
            Ok(Some(envelope))
        }
        Err(source) => {
            tracing::error!(
                topic,
                length = data.len(),
                error = %source,
                "Failed to deserialize envelope"
            );
            tracing::debug!(
                topic,
                preview = %String::from_utf8_lossy(preview(data)),
                "Raw data (first {} bytes)",
                DECODE_PREVIEW_BYTES
            );
            Err(CodecError::Deserialize {
                topic: topic.to_string(),
                length: data.len(),
                source,
            })
        }
    }
}

fn preview(data: &[u8]) -> &[u8] {
    &data[..data.len().min(DECODE_PREVIEW_BYTES)]
}

/// DNS wire-format names
///
/// Resolution requests carry the queried name as a sequence of
/// length-prefixed labels terminated by a zero-length label:
/// `[len][label]...[0x00]`.
use crate::error::GatewayError;
use thiserror::Error;

/// Maximum length of a single label in wire format
pub const MAX_LABEL_LEN: usize = 255;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("label length {len} at offset {offset} runs past end of buffer")]
    Truncated { offset: usize, len: usize },

    #[error("name is missing its terminating zero-length label")]
    MissingTerminator,

    #[error("{0} trailing byte(s) after terminator")]
    TrailingBytes(usize),

    #[error("label at offset {0} is not valid UTF-8")]
    InvalidUtf8(usize),

    #[error("label at offset {0} contains a '.'")]
    DotInLabel(usize),

    #[error("empty label in {0:?}")]
    EmptyLabel(String),

    #[error("label {0:?} exceeds 255 bytes")]
    LabelTooLong(String),
}

impl From<NameError> for GatewayError {
    fn from(e: NameError) -> Self {
        GatewayError::MalformedRequest(format!("MalformedName: {}", e))
    }
}

/// Decode a wire-format name into its dotted form
pub fn decode(bytes: &[u8]) -> Result<String, NameError> {
    let mut labels: Vec<&str> = Vec::new();
    let mut offset = 0;

    loop {
        let Some(&len) = bytes.get(offset) else {
            return Err(NameError::MissingTerminator);
        };
        let len = len as usize;

        if len == 0 {
            let rest = bytes.len() - offset - 1;
            if rest != 0 {
                return Err(NameError::TrailingBytes(rest));
            }
            break;
        }

        let start = offset + 1;
        let end = start + len;
        if end > bytes.len() {
            return Err(NameError::Truncated { offset, len });
        }

        let raw = &bytes[start..end];
        // A dotted label would read back as two labels
        if raw.contains(&b'.') {
            return Err(NameError::DotInLabel(offset));
        }
        let label = std::str::from_utf8(raw).map_err(|_| NameError::InvalidUtf8(offset))?;
        labels.push(label);
        offset = end;
    }

    Ok(labels.join("."))
}

/// Encode a dotted name into wire format
///
/// The empty string encodes to a single terminator byte.
pub fn encode(name: &str) -> Result<Vec<u8>, NameError> {
    let mut out = Vec::with_capacity(name.len() + 2);

    if !name.is_empty() {
        for label in name.split('.') {
            if label.is_empty() {
                return Err(NameError::EmptyLabel(name.to_string()));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(NameError::LabelTooLong(label.to_string()));
            }
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
    }

    out.push(0);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple_name() {
        let bytes = b"\x04nova\x05arena\x03eth\x00";
        assert_eq!(decode(bytes).unwrap(), "nova.arena.eth");
    }

    #[test]
    fn test_decode_root() {
        assert_eq!(decode(&[0]).unwrap(), "");
    }

    #[test]
    fn test_encode_root() {
        assert_eq!(encode("").unwrap(), vec![0]);
    }

    #[test]
    fn test_round_trip_names() {
        let names = [
            "nova.arena.eth",
            "sub.nova.arena.eth",
            "team-42.arena.eth",
            "a.b.c.d.e",
            "x",
            "0x1234-abc",
        ];

        for name in names {
            let encoded = encode(name).unwrap();
            assert_eq!(decode(&encoded).unwrap(), name);
            assert_eq!(encode(&decode(&encoded).unwrap()).unwrap(), encoded);
        }
    }

    #[test]
    fn test_max_label_length() {
        let label = "a".repeat(MAX_LABEL_LEN);
        let encoded = encode(&label).unwrap();
        assert_eq!(encoded[0], 255);
        assert_eq!(decode(&encoded).unwrap(), label);

        let too_long = "a".repeat(MAX_LABEL_LEN + 1);
        assert!(matches!(encode(&too_long), Err(NameError::LabelTooLong(_))));
    }

    #[test]
    fn test_truncated_label_fails() {
        // Claims 10 bytes but only 4 follow
        let bytes = b"\x0anova";
        assert_eq!(
            decode(bytes),
            Err(NameError::Truncated { offset: 0, len: 10 })
        );

        let bytes = b"\x04nova\x09arena\x00";
        assert!(matches!(decode(bytes), Err(NameError::Truncated { offset: 5, .. })));
    }

    #[test]
    fn test_missing_terminator_fails() {
        assert_eq!(decode(b"\x04nova"), Err(NameError::MissingTerminator));
        assert_eq!(decode(&[]), Err(NameError::MissingTerminator));
    }

    #[test]
    fn test_trailing_bytes_fail() {
        assert_eq!(decode(b"\x04nova\x00\x00"), Err(NameError::TrailingBytes(1)));
    }

    #[test]
    fn test_invalid_utf8_fails() {
        assert_eq!(decode(b"\x02\xff\xfe\x00"), Err(NameError::InvalidUtf8(0)));
    }

    #[test]
    fn test_dotted_label_fails() {
        let wire = b"\x08sub.nova\x05arena\x03eth\x00";
        assert_eq!(decode(wire), Err(NameError::DotInLabel(0)));

        let wire = b"\x04nova\x06are.na\x00";
        assert_eq!(decode(wire), Err(NameError::DotInLabel(5)));

        let err: GatewayError = NameError::DotInLabel(0).into();
        assert!(matches!(err, GatewayError::MalformedRequest(_)));
    }

    #[test]
    fn test_decoded_names_re_encode_to_same_bytes() {
        let wires: [&[u8]; 4] = [
            b"\x00",
            b"\x04nova\x05arena\x03eth\x00",
            b"\x03sub\x04nova\x05arena\x03eth\x00",
            b"\x0ateam-42_x!\x00",
        ];

        for wire in wires {
            let name = decode(wire).unwrap();
            assert_eq!(encode(&name).unwrap(), wire);
        }
    }

    #[test]
    fn test_empty_inner_label_rejected() {
        assert!(matches!(encode("a..b"), Err(NameError::EmptyLabel(_))));
        assert!(matches!(encode("nova."), Err(NameError::EmptyLabel(_))));
    }

    #[test]
    fn test_name_error_maps_to_malformed_request() {
        let err: GatewayError = NameError::MissingTerminator.into();
        assert!(matches!(err, GatewayError::MalformedRequest(ref m) if m.starts_with("MalformedName")));
    }
}

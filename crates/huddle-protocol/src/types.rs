//! Frame types for the Huddle wire format.
//!
//! Every message on the wire is one JSON object with a `type` tag — an
//! envelope. [`Frame`] is the tagged union over all envelopes the client
//! sends or understands.
//!
//! Two invariants hold for every frame that crosses the wire:
//!
//! - `name`/`message` fields are non-empty strings
//! - numeric fields are finite (JSON has no NaN, but a permissive parser
//!   can still produce infinities from overlong literals)
//!
//! [`Frame::validate`] checks both; [`Frame::encode`]/[`Frame::decode`]
//! apply the check on each side of the wire.

use serde::{Deserialize, Serialize};

use crate::{Codec, ProtocolError};

/// One discrete protocol message exchanged with the server.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON, so
/// `Frame::Broadcast { message }` becomes
/// `{ "type": "broadcast", "message": "..." }` — the exact envelope the
/// server speaks. `rename_all = "camelCase"` keeps the tags in the wire's
/// casing (`setVariable`, `authResult`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Frame {
    /// A text message relayed to every connected peer.
    Broadcast { message: String },

    /// Overwrite a server-authoritative shared variable.
    ///
    /// Sent by the client as a request; received back as the server's
    /// authoritative echo, which is the only thing that mutates the local
    /// mirror.
    SetVariable {
        #[serde(rename = "variable")]
        name: String,
        value: f64,
    },

    /// Add a delta to a server-authoritative shared variable.
    ChangeVariable {
        #[serde(rename = "variable")]
        name: String,
        #[serde(rename = "value")]
        delta: f64,
    },

    /// Client → Server: credentials for the login flow.
    Auth { username: String, password: String },

    /// Server → Client: outcome of a login attempt.
    AuthResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },

    /// Server → Client: the full list of connected peer usernames.
    /// Replaces the previous roster wholesale.
    Roster { entries: Vec<String> },

    /// An application-defined message with an opaque payload.
    Custom {
        name: String,
        payload: serde_json::Value,
    },
}

impl Frame {
    /// Checks the frame invariants: non-empty names/messages, finite
    /// numbers.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidFrame`] naming the violated field.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        match self {
            Frame::Broadcast { message } => {
                require_non_empty("message", message)
            }
            Frame::SetVariable { name, value } => {
                require_non_empty("variable", name)?;
                require_finite("value", *value)
            }
            Frame::ChangeVariable { name, delta } => {
                require_non_empty("variable", name)?;
                require_finite("value", *delta)
            }
            Frame::Custom { name, .. } => require_non_empty("name", name),
            Frame::Auth { .. }
            | Frame::AuthResult { .. }
            | Frame::Roster { .. } => Ok(()),
        }
    }

    /// Validates and serializes the frame to wire text.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidFrame`] if the frame violates an
    /// invariant, or [`ProtocolError::Encode`] if serialization fails.
    pub fn encode(&self, codec: &impl Codec) -> Result<String, ProtocolError> {
        self.validate()?;
        codec.encode(self)
    }

    /// Deserializes and validates one frame from wire text.
    ///
    /// # Errors
    /// Returns [`ProtocolError::MalformedFrame`] for anything wrong with
    /// the input — unknown tag, missing field, wrong kind, or an invariant
    /// violation — so callers have a single non-fatal error to drop on.
    pub fn decode(
        codec: &impl Codec,
        text: &str,
    ) -> Result<Self, ProtocolError> {
        let frame: Frame = codec.decode(text)?;
        frame.validate().map_err(|e| match e {
            ProtocolError::InvalidFrame(msg) => {
                ProtocolError::MalformedFrame(msg)
            }
            other => other,
        })?;
        Ok(frame)
    }
}

fn require_non_empty(
    field: &str,
    value: &str,
) -> Result<(), ProtocolError> {
    if value.is_empty() {
        return Err(ProtocolError::InvalidFrame(format!(
            "{field} must be a non-empty string"
        )));
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> Result<(), ProtocolError> {
    if !value.is_finite() {
        return Err(ProtocolError::InvalidFrame(format!(
            "{field} must be a finite number"
        )));
    }
    Ok(())
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire envelopes have exact JSON shapes the server depends on.
    //! These tests pin the serde attributes to those shapes, plus the
    //! round-trip and rejection laws for the codec path.

    use super::*;
    use crate::JsonCodec;

    // =====================================================================
    // JSON shape — one test per envelope
    // =====================================================================

    #[test]
    fn test_broadcast_json_format() {
        let frame = Frame::Broadcast {
            message: "hi".into(),
        };
        let json: serde_json::Value =
            serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "broadcast");
        assert_eq!(json["message"], "hi");
    }

    #[test]
    fn test_set_variable_json_format() {
        // The wire field is "variable", not "name".
        let frame = Frame::SetVariable {
            name: "score".into(),
            value: 5.0,
        };
        let json: serde_json::Value =
            serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "setVariable");
        assert_eq!(json["variable"], "score");
        assert_eq!(json["value"], 5.0);
    }

    #[test]
    fn test_change_variable_json_format() {
        // The delta travels under "value", same as setVariable.
        let frame = Frame::ChangeVariable {
            name: "score".into(),
            delta: -2.5,
        };
        let json: serde_json::Value =
            serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "changeVariable");
        assert_eq!(json["variable"], "score");
        assert_eq!(json["value"], -2.5);
    }

    #[test]
    fn test_auth_json_format() {
        let frame = Frame::Auth {
            username: "alice".into(),
            password: "secret".into(),
        };
        let json: serde_json::Value =
            serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "auth");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["password"], "secret");
    }

    #[test]
    fn test_auth_result_json_format() {
        let frame = Frame::AuthResult {
            success: true,
            username: Some("alice".into()),
        };
        let json: serde_json::Value =
            serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "authResult");
        assert_eq!(json["success"], true);
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_auth_result_omits_absent_username() {
        // `username` is optional on the wire; `None` must not serialize
        // as `"username": null`.
        let frame = Frame::AuthResult {
            success: false,
            username: None,
        };
        let json: serde_json::Value =
            serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "authResult");
        assert!(json.get("username").is_none());
    }

    #[test]
    fn test_roster_json_format() {
        let frame = Frame::Roster {
            entries: vec!["alice".into(), "bob".into()],
        };
        let json: serde_json::Value =
            serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "roster");
        assert_eq!(json["entries"], serde_json::json!(["alice", "bob"]));
    }

    #[test]
    fn test_custom_json_format() {
        let frame = Frame::Custom {
            name: "ping".into(),
            payload: serde_json::json!({ "n": 3 }),
        };
        let json: serde_json::Value =
            serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "custom");
        assert_eq!(json["name"], "ping");
        assert_eq!(json["payload"]["n"], 3);
    }

    // =====================================================================
    // Round trips
    // =====================================================================

    #[test]
    fn test_every_frame_variant_round_trips() {
        let frames = vec![
            Frame::Broadcast {
                message: "hello".into(),
            },
            Frame::SetVariable {
                name: "score".into(),
                value: 5.0,
            },
            Frame::ChangeVariable {
                name: "score".into(),
                delta: 3.0,
            },
            Frame::Auth {
                username: "alice".into(),
                password: "secret".into(),
            },
            Frame::AuthResult {
                success: true,
                username: Some("alice".into()),
            },
            Frame::Roster {
                entries: vec!["alice".into()],
            },
            Frame::Custom {
                name: "ping".into(),
                payload: serde_json::json!([1, 2, 3]),
            },
        ];

        for frame in frames {
            let text = frame.encode(&JsonCodec).expect("should encode");
            let decoded =
                Frame::decode(&JsonCodec, &text).expect("should decode");
            assert_eq!(frame, decoded);
        }
    }

    // =====================================================================
    // Rejection — malformed input must never panic or pass through
    // =====================================================================

    #[test]
    fn test_decode_garbage_returns_malformed() {
        let result = Frame::decode(&JsonCodec, "not json at all");
        assert!(matches!(
            result,
            Err(ProtocolError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_decode_unknown_type_tag_returns_malformed() {
        let result = Frame::decode(
            &JsonCodec,
            r#"{"type":"flyToMoon","speed":9000}"#,
        );
        assert!(matches!(
            result,
            Err(ProtocolError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_decode_missing_field_returns_malformed() {
        let result =
            Frame::decode(&JsonCodec, r#"{"type":"broadcast"}"#);
        assert!(matches!(
            result,
            Err(ProtocolError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_decode_wrong_field_kind_returns_malformed() {
        let result = Frame::decode(
            &JsonCodec,
            r#"{"type":"setVariable","variable":"score","value":"five"}"#,
        );
        assert!(matches!(
            result,
            Err(ProtocolError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_decode_empty_variable_name_returns_malformed() {
        let result = Frame::decode(
            &JsonCodec,
            r#"{"type":"setVariable","variable":"","value":1}"#,
        );
        assert!(matches!(
            result,
            Err(ProtocolError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_decode_overflowing_number_returns_malformed() {
        // 1e999 overflows f64; whether the parser rejects the literal or
        // produces an infinity, the frame must not get through.
        let result = Frame::decode(
            &JsonCodec,
            r#"{"type":"setVariable","variable":"score","value":1e999}"#,
        );
        assert!(matches!(
            result,
            Err(ProtocolError::MalformedFrame(_))
        ));
    }

    // =====================================================================
    // Encode-side validation
    // =====================================================================

    #[test]
    fn test_encode_non_finite_value_returns_invalid() {
        let frame = Frame::SetVariable {
            name: "score".into(),
            value: f64::NAN,
        };
        let result = frame.encode(&JsonCodec);
        assert!(matches!(result, Err(ProtocolError::InvalidFrame(_))));
    }

    #[test]
    fn test_encode_empty_message_returns_invalid() {
        let frame = Frame::Broadcast {
            message: String::new(),
        };
        let result = frame.encode(&JsonCodec);
        assert!(matches!(result, Err(ProtocolError::InvalidFrame(_))));
    }

    #[test]
    fn test_encode_empty_custom_name_returns_invalid() {
        let frame = Frame::Custom {
            name: String::new(),
            payload: serde_json::Value::Null,
        };
        let result = frame.encode(&JsonCodec);
        assert!(matches!(result, Err(ProtocolError::InvalidFrame(_))));
    }
}

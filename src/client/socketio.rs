/// Engine.IO v4 / Socket.IO v5 text framing, the wire format the game server
/// speaks over its websocket.
///
/// An Engine.IO frame is a one-digit packet type followed by its data. A
/// message frame (`4`) carries a Socket.IO packet: another type digit, an
/// optional `/namespace,`, an optional numeric ack id, then a JSON body.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_NAMESPACE: &str = "/";
const SOCKET_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,
    #[error("unknown engine.io packet type `{0}`")]
    UnknownEngineType(char),
    #[error("unknown socket.io packet type `{0}`")]
    UnknownSocketType(char),
    #[error("event packet must be a non-empty array starting with a name")]
    BadEvent,
    #[error("ack packet has no id")]
    MissingAckId,
    #[error("invalid json body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Open handshake the server sends first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        id: Option<u64>,
        name: String,
        payload: Value,
    },
    Ack {
        namespace: String,
        id: u64,
        data: Value,
    },
    ConnectError {
        namespace: String,
        data: Value,
    },
}

impl EnginePacket {
    pub fn decode(frame: &str) -> Result<Self, FrameError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(FrameError::Empty)?;
        let body = chars.as_str();

        Ok(match kind {
            '0' => EnginePacket::Open(serde_json::from_str(body)?),
            '1' => EnginePacket::Close,
            '2' => EnginePacket::Ping(body.to_string()),
            '3' => EnginePacket::Pong(body.to_string()),
            '4' => EnginePacket::Message(SocketPacket::decode(body)?),
            '5' => EnginePacket::Upgrade,
            '6' => EnginePacket::Noop,
            other => return Err(FrameError::UnknownEngineType(other)),
        })
    }

    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(handshake) => {
                format!("0{}", serde_json::to_string(handshake).unwrap_or_default())
            }
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(data) => format!("2{data}"),
            EnginePacket::Pong(data) => format!("3{data}"),
            EnginePacket::Message(packet) => format!("4{}", packet.encode()),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }
}

impl SocketPacket {
    /// An event on the default namespace, no ack requested
    pub fn event(name: &str, payload: Value) -> Self {
        SocketPacket::Event {
            namespace: DEFAULT_NAMESPACE.to_string(),
            id: None,
            name: name.to_string(),
            payload,
        }
    }

    pub fn connect() -> Self {
        SocketPacket::Connect {
            namespace: DEFAULT_NAMESPACE.to_string(),
            data: None,
        }
    }

    pub fn decode(input: &str) -> Result<Self, FrameError> {
        let mut chars = input.chars();
        let kind = chars.next().ok_or(FrameError::Empty)?;
        let mut rest = chars.as_str();

        let namespace = if rest.starts_with('/') {
            match rest.find(',') {
                Some(comma) => {
                    let ns = &rest[..comma];
                    rest = &rest[comma + 1..];
                    ns.to_string()
                }
                None => {
                    let ns = rest.to_string();
                    rest = "";
                    ns
                }
            }
        } else {
            DEFAULT_NAMESPACE.to_string()
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let id = if digits > 0 {
            // Absurdly long ids overflow; treat them as absent rather than fail
            let id = rest[..digits].parse().ok();
            rest = &rest[digits..];
            id
        } else {
            None
        };

        let body = if rest.is_empty() {
            None
        } else {
            Some(serde_json::from_str::<Value>(rest)?)
        };

        Ok(match kind {
            '0' => SocketPacket::Connect { namespace, data: body },
            '1' => SocketPacket::Disconnect { namespace },
            '2' => {
                let Some(Value::Array(mut items)) = body else {
                    return Err(FrameError::BadEvent);
                };
                if items.is_empty() {
                    return Err(FrameError::BadEvent);
                }
                let Value::String(name) = items.remove(0) else {
                    return Err(FrameError::BadEvent);
                };
                let payload = if items.is_empty() {
                    Value::Null
                } else {
                    items.remove(0)
                };
                SocketPacket::Event {
                    namespace,
                    id,
                    name,
                    payload,
                }
            }
            '3' => SocketPacket::Ack {
                namespace,
                id: id.ok_or(FrameError::MissingAckId)?,
                data: body.unwrap_or(Value::Null),
            },
            '4' => SocketPacket::ConnectError {
                namespace,
                data: body.unwrap_or(Value::Null),
            },
            other => return Err(FrameError::UnknownSocketType(other)),
        })
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        let (kind, namespace) = match self {
            SocketPacket::Connect { namespace, .. } => ('0', namespace),
            SocketPacket::Disconnect { namespace } => ('1', namespace),
            SocketPacket::Event { namespace, .. } => ('2', namespace),
            SocketPacket::Ack { namespace, .. } => ('3', namespace),
            SocketPacket::ConnectError { namespace, .. } => ('4', namespace),
        };
        out.push(kind);
        if namespace != DEFAULT_NAMESPACE {
            out.push_str(namespace);
            out.push(',');
        }

        match self {
            SocketPacket::Connect { data, .. } => {
                if let Some(data) = data {
                    out.push_str(&data.to_string());
                }
            }
            SocketPacket::Disconnect { .. } => {}
            SocketPacket::Event { id, name, payload, .. } => {
                if let Some(id) = id {
                    out.push_str(&id.to_string());
                }
                let body = Value::Array(vec![Value::String(name.clone()), payload.clone()]);
                out.push_str(&body.to_string());
            }
            SocketPacket::Ack { id, data, .. } => {
                out.push_str(&id.to_string());
                out.push_str(&data.to_string());
            }
            SocketPacket::ConnectError { data, .. } => out.push_str(&data.to_string()),
        }
        out
    }
}

/// Websocket endpoint for a server base URL.
///
/// `http(s)://` maps to `ws(s)://`, a bare host is taken as `http://`, and the
/// Engine.IO path is appended unless the URL already names `/socket.io`.
pub fn socket_url(base: &str) -> String {
    let base = base.trim();
    let (scheme, rest) = match base.split_once("://") {
        Some(("https", rest)) | Some(("wss", rest)) => ("wss", rest),
        Some((_, rest)) => ("ws", rest),
        None => ("ws", base),
    };

    if rest.contains("/socket.io") {
        return format!("{scheme}://{rest}");
    }
    format!("{scheme}://{}{SOCKET_PATH}", rest.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_open_handshake() {
        let frame = r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        let packet = EnginePacket::decode(frame).unwrap();
        assert_eq!(
            packet,
            EnginePacket::Open(Handshake {
                sid: "abc".into(),
                upgrades: vec![],
                ping_interval: 25000,
                ping_timeout: 20000,
                max_payload: Some(1_000_000),
            })
        );
    }

    #[test]
    fn ping_answers_with_matching_pong() {
        assert_eq!(EnginePacket::decode("2").unwrap(), EnginePacket::Ping(String::new()));
        assert_eq!(EnginePacket::Pong(String::new()).encode(), "3");
        assert_eq!(EnginePacket::Pong("probe".into()).encode(), "3probe");
    }

    #[test]
    fn connect_frame_is_forty() {
        assert_eq!(EnginePacket::Message(SocketPacket::connect()).encode(), "40");
    }

    #[test]
    fn event_frame_carries_name_and_payload() {
        let frame = EnginePacket::Message(SocketPacket::event("join", json!({ "player_id": "p" }))).encode();
        assert_eq!(frame, r#"42["join",{"player_id":"p"}]"#);
    }

    #[test]
    fn decodes_namespaced_event_with_ack_id() {
        let packet = EnginePacket::decode(r#"42/admin,13["play",{"move":[1,2]}]"#).unwrap();
        assert_eq!(
            packet,
            EnginePacket::Message(SocketPacket::Event {
                namespace: "/admin".into(),
                id: Some(13),
                name: "play".into(),
                payload: json!({ "move": [1, 2] }),
            })
        );
    }

    #[test]
    fn event_without_payload_is_null() {
        let packet = SocketPacket::decode(r#"2["win"]"#).unwrap();
        assert!(matches!(packet, SocketPacket::Event { payload: Value::Null, .. }));
    }

    #[test]
    fn connect_ack_with_sid() {
        let packet = SocketPacket::decode(r#"0{"sid":"xyz"}"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Connect {
                namespace: "/".into(),
                data: Some(json!({ "sid": "xyz" })),
            }
        );
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(matches!(EnginePacket::decode(""), Err(FrameError::Empty)));
        assert!(matches!(EnginePacket::decode("9"), Err(FrameError::UnknownEngineType('9'))));
        assert!(matches!(SocketPacket::decode("7"), Err(FrameError::UnknownSocketType('7'))));
        assert!(matches!(SocketPacket::decode(r#"2{"a":1}"#), Err(FrameError::BadEvent)));
        assert!(matches!(SocketPacket::decode("2[]"), Err(FrameError::BadEvent)));
        assert!(matches!(SocketPacket::decode("2[1]"), Err(FrameError::BadEvent)));
        assert!(matches!(SocketPacket::decode("2[oops"), Err(FrameError::Json(_))));
        assert!(matches!(SocketPacket::decode("3[]"), Err(FrameError::MissingAckId)));
    }

    #[test]
    fn socket_url_maps_schemes() {
        assert_eq!(
            socket_url("http://localhost:5000"),
            "ws://localhost:5000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            socket_url("https://lineup.example/"),
            "wss://lineup.example/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            socket_url("127.0.0.1:5000"),
            "ws://127.0.0.1:5000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            socket_url("ws://h/socket.io/?EIO=4&transport=websocket"),
            "ws://h/socket.io/?EIO=4&transport=websocket"
        );
    }
}

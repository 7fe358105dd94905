//! Discord Gateway wire types

use serde::{Deserialize, Serialize};

/// Gateway opcodes the worker reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum GatewayOp {
    Dispatch = 0,
    Heartbeat = 1,
    Identify = 2,
    PresenceUpdate = 3,
    Reconnect = 7,
    InvalidSession = 9,
    Hello = 10,
    HeartbeatAck = 11,
}

impl GatewayOp {
    pub fn from_u8(op: u8) -> Option<Self> {
        match op {
            0 => Some(GatewayOp::Dispatch),
            1 => Some(GatewayOp::Heartbeat),
            2 => Some(GatewayOp::Identify),
            3 => Some(GatewayOp::PresenceUpdate),
            7 => Some(GatewayOp::Reconnect),
            9 => Some(GatewayOp::InvalidSession),
            10 => Some(GatewayOp::Hello),
            11 => Some(GatewayOp::HeartbeatAck),
            _ => None,
        }
    }
}

/// Gateway payload envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayload {
    pub op: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

/// Message author
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl Author {
    /// Display name shown in relayed chat lines.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// MESSAGE_CREATE dispatch body, reduced to the fields the relay needs
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
    pub author: Author,
    /// 0 is a normal user message; everything else (joins, pins, replies,
    /// system notices) is filtered out.
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub guild_id: Option<String>,
}

pub fn identify(token: &str, intents: u64) -> String {
    serde_json::json!({
        "op": GatewayOp::Identify as u8,
        "d": {
            "token": token,
            "intents": intents,
            "properties": {
                "os": "tickcord",
                "browser": "tickcord",
                "device": "tickcord"
            }
        }
    })
    .to_string()
}

pub fn heartbeat(seq: Option<u64>) -> String {
    serde_json::json!({
        "op": GatewayOp::Heartbeat as u8,
        "d": seq
    })
    .to_string()
}

/// Presence update with a "playing" activity.
pub fn presence(activity: &str) -> String {
    serde_json::json!({
        "op": GatewayOp::PresenceUpdate as u8,
        "d": {
            "since": null,
            "activities": [{"name": activity, "type": 0}],
            "status": "online",
            "afk": false
        }
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_op_from_u8() {
        assert_eq!(GatewayOp::from_u8(0), Some(GatewayOp::Dispatch));
        assert_eq!(GatewayOp::from_u8(10), Some(GatewayOp::Hello));
        assert_eq!(GatewayOp::from_u8(255), None);
    }

    #[test]
    fn test_display_name_prefers_global_name() {
        let author = Author {
            username: "player_x".to_string(),
            global_name: Some("PlayerX".to_string()),
            bot: false,
        };
        assert_eq!(author.display_name(), "PlayerX");

        let plain = Author {
            username: "player_y".to_string(),
            global_name: None,
            bot: false,
        };
        assert_eq!(plain.display_name(), "player_y");
    }

    #[test]
    fn test_message_event_parses_with_defaults() {
        let raw = serde_json::json!({
            "channel_id": "c1",
            "author": {"id": "1", "username": "u"}
        });
        let msg: MessageEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(msg.kind, 0);
        assert!(msg.content.is_empty());
        assert!(!msg.author.bot);
    }

    #[test]
    fn test_identify_carries_token_and_intents() {
        let payload: GatewayPayload = serde_json::from_str(&identify("tok", 33283)).unwrap();
        assert_eq!(payload.op, GatewayOp::Identify as u8);
        let d = payload.d.unwrap();
        assert_eq!(d["token"], "tok");
        assert_eq!(d["intents"], 33283);
    }
}

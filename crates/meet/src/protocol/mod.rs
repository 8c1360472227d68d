//! JSON-RPC 2.0 framing shared by the authority and its replicas.
//!
//! Actions travel as requests whose method is the action's type tag. Two
//! methods are reserved: [`GET_STATE`] fetches the whole snapshot, and
//! [`STATE_UPDATE`] is the authority's push after every applied action.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::Action;
use crate::error::{MeetError, Result};
use crate::models::{GlobalState, StateUpdate};

pub const JSONRPC_VERSION: &str = "2.0";
pub const GET_STATE: &str = "GET_STATE";
pub const STATE_UPDATE: &str = "STATE_UPDATE";

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    /// The action was well formed but does not fit the current snapshot.
    pub const ACTION_REJECTED: i64 = -32000;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<&MeetError> for RpcError {
    fn from(err: &MeetError) -> Self {
        let code = match err {
            MeetError::UnknownMethod(_) => RpcError::METHOD_NOT_FOUND,
            MeetError::InvalidParams { .. }
            | MeetError::Validation(_)
            | MeetError::InvalidSnapshot(_) => RpcError::INVALID_PARAMS,
            MeetError::MalformedMessage(_) => RpcError::INVALID_REQUEST,
            MeetError::Json(_) => RpcError::PARSE_ERROR,
            e if e.is_domain_violation() => RpcError::ACTION_REJECTED,
            _ => RpcError::INTERNAL_ERROR,
        };
        RpcError::new(code, err.to_string())
    }
}

/// Wire shape of every frame before it is classified.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawMessage {
    jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Request {
        id: RequestId,
        method: String,
        params: Value,
    },
    Notification {
        method: String,
        params: Value,
    },
    /// `id` is absent only when the request could not be parsed.
    Response {
        id: Option<RequestId>,
        result: std::result::Result<Value, RpcError>,
    },
}

impl Message {
    pub fn request(id: RequestId, method: impl Into<String>, params: Value) -> Self {
        Self::Request {
            id,
            method: method.into(),
            params,
        }
    }

    pub fn notification(method: impl Into<String>, params: Value) -> Self {
        Self::Notification {
            method: method.into(),
            params,
        }
    }

    pub fn success(id: RequestId, result: Value) -> Self {
        Self::Response {
            id: Some(id),
            result: Ok(result),
        }
    }

    pub fn failure(id: Option<RequestId>, error: RpcError) -> Self {
        Self::Response {
            id,
            result: Err(error),
        }
    }

    pub fn encode(&self) -> Result<String> {
        let mut raw = RawMessage {
            jsonrpc: JSONRPC_VERSION.to_string(),
            ..Default::default()
        };
        match self {
            Self::Request { id, method, params } => {
                raw.id = Some(*id);
                raw.method = Some(method.clone());
                raw.params = Some(params.clone());
            }
            Self::Notification { method, params } => {
                raw.method = Some(method.clone());
                raw.params = Some(params.clone());
            }
            Self::Response { id, result } => {
                raw.id = *id;
                match result {
                    Ok(value) => raw.result = Some(value.clone()),
                    Err(error) => raw.error = Some(error.clone()),
                }
            }
        }
        Ok(serde_json::to_string(&raw)?)
    }

    pub fn decode(text: &str) -> Result<Self> {
        let raw: RawMessage = serde_json::from_str(text)?;
        if raw.jsonrpc != JSONRPC_VERSION {
            return Err(MeetError::MalformedMessage(format!(
                "unsupported jsonrpc version '{}'",
                raw.jsonrpc
            )));
        }

        match (raw.method, raw.id) {
            (Some(method), Some(id)) => Ok(Self::Request {
                id,
                method,
                params: raw.params.unwrap_or(Value::Null),
            }),
            (Some(method), None) => Ok(Self::Notification {
                method,
                params: raw.params.unwrap_or(Value::Null),
            }),
            (None, id) => match (raw.result, raw.error) {
                (Some(_), Some(_)) => Err(MeetError::MalformedMessage(
                    "response carries both result and error".to_string(),
                )),
                (_, Some(error)) => Ok(Self::Response {
                    id,
                    result: Err(error),
                }),
                (result, None) => Ok(Self::Response {
                    id,
                    result: Ok(result.unwrap_or(Value::Null)),
                }),
            },
        }
    }
}

/// Result of [`GET_STATE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEnvelope {
    pub state: GlobalState,
}

/// Params of [`STATE_UPDATE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdateParams {
    pub state: StateUpdate,
}

pub fn action_request(id: RequestId, action: &Action) -> Result<Message> {
    let (method, params) = action.to_call()?;
    Ok(Message::request(id, method, params))
}

pub fn get_state_request(id: RequestId) -> Message {
    Message::request(id, GET_STATE, Value::Object(Default::default()))
}

pub fn get_state_response(id: RequestId, state: &GlobalState) -> Result<Message> {
    let result = serde_json::to_value(StateEnvelope {
        state: state.clone(),
    })?;
    Ok(Message::success(id, result))
}

pub fn state_update_notification(state: &GlobalState) -> Result<Message> {
    let params = serde_json::to_value(StateUpdateParams {
        state: StateUpdate::from(state),
    })?;
    Ok(Message::notification(STATE_UPDATE, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::SetMeetName;
    use serde_json::json;

    #[test]
    fn test_decode_request() {
        let text = r#"{"jsonrpc":"2.0","id":7,"method":"SET_MEET_NAME","params":{"name":"Open"}}"#;
        let message = Message::decode(text).unwrap();

        let Message::Request { id, method, params } = message else {
            panic!("expected request");
        };
        assert_eq!(id, 7);
        let action = Action::from_call(&method, params).unwrap();
        assert_eq!(
            action,
            Action::SetMeetName(SetMeetName {
                name: "Open".to_string()
            })
        );
    }

    #[test]
    fn test_action_request_encodes_tag_as_method() {
        let action = Action::SetMeetName(SetMeetName {
            name: "Open".to_string(),
        });
        let text = action_request(3, &action).unwrap().encode().unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 3);
        assert_eq!(value["method"], "SET_MEET_NAME");
        assert_eq!(value["params"], json!({"name": "Open"}));
    }

    #[test]
    fn test_null_result_survives_encoding() {
        let text = Message::success(4, Value::Null).encode().unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("result").is_some());

        let decoded = Message::decode(&text).unwrap();
        assert_eq!(decoded, Message::success(4, Value::Null));
    }

    #[test]
    fn test_error_response() {
        let err = MeetError::EntryNotFound(12);
        let text = Message::failure(Some(2), RpcError::from(&err))
            .encode()
            .unwrap();
        let Message::Response { id, result } = Message::decode(&text).unwrap() else {
            panic!("expected response");
        };
        assert_eq!(id, Some(2));
        let error = result.unwrap_err();
        assert_eq!(error.code, RpcError::ACTION_REJECTED);
        assert!(error.message.contains("12"));
    }

    #[test]
    fn test_state_update_is_notification() {
        let mut state = GlobalState::default();
        state.meet.name = "Pushed".to_string();
        let message = state_update_notification(&state).unwrap();

        let Message::Notification { method, params } = message else {
            panic!("expected notification");
        };
        assert_eq!(method, STATE_UPDATE);
        let params: StateUpdateParams = serde_json::from_value(params).unwrap();
        let mut local = GlobalState::default();
        assert!(local.merge_update(params.state));
        assert_eq!(local.meet.name, "Pushed");
    }

    #[test]
    fn test_rejects_wrong_version_and_ambiguous_response() {
        assert!(matches!(
            Message::decode(r#"{"jsonrpc":"1.0","id":1,"method":"GET_STATE"}"#),
            Err(MeetError::MalformedMessage(_))
        ));
        assert!(matches!(
            Message::decode(r#"{"jsonrpc":"2.0","id":1,"result":1,"error":{"code":1,"message":"x"}}"#),
            Err(MeetError::MalformedMessage(_))
        ));
        assert!(matches!(Message::decode("not json"), Err(MeetError::Json(_))));
    }

    #[test]
    fn test_unknown_method_maps_to_rpc_code() {
        let err = Action::from_call("NOPE", json!({})).unwrap_err();
        assert_eq!(RpcError::from(&err).code, RpcError::METHOD_NOT_FOUND);
    }
}

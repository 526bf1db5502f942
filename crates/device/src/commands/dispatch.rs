use std::collections::HashMap;

use serde_json::Value;

use crate::telemetry::Thermostat;

#[derive(Debug, Clone, PartialEq)]
pub struct CommandRequest {
    pub name: String,
    pub request_id: String,
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandResponse {
    pub status: u16,
    pub body: Value,
}

impl CommandResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: Value::Object(Default::default()),
        }
    }
}

pub trait CommandHandler: Send + Sync {
    fn handle(&self, thermostat: &Thermostat, payload: Option<&Value>) -> CommandResponse;
}

#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Box<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    pub fn dispatch(&self, request: &CommandRequest, thermostat: &Thermostat) -> CommandResponse {
        match self.handlers.get(&request.name) {
            Some(handler) => {
                let payload = request.payload.as_ref().filter(|v| !v.is_null());
                handler.handle(thermostat, payload)
            }
            None => {
                tracing::warn!(command = %request.name, "no handler registered");
                CommandResponse::not_found()
            }
        }
    }
}

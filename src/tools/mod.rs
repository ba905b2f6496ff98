//! Tool catalogues, argument validation and dispatch.
//!
//! Tools are declared with a typed parameter schema. Raw argument text from
//! the model is validated once, at dispatch time, before any adapter is
//! invoked; validation failures map to specific `DispatchError` variants.

mod arxiv;
mod booking;

pub use arxiv::ArxivTools;
pub use booking::BookingTools;

pub use crate::error::DispatchError;

use async_openai::types::{
    AssistantTools, AssistantToolsFunction, ChatCompletionTool, ChatCompletionToolType,
    FunctionObject,
};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

/// Parameter type in a tool schema.
#[derive(Debug, Clone)]
pub enum ParamKind {
    String,
    Integer,
    /// Closed set of allowed string values.
    Enum(Vec<String>),
}

/// A single named parameter of a tool.
#[derive(Debug, Clone)]
pub struct ToolParam {
    pub name: String,
    pub description: String,
    pub kind: ParamKind,
    pub required: bool,
}

impl ToolParam {
    pub fn string(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: ParamKind::String,
            required: true,
        }
    }

    pub fn integer(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: ParamKind::Integer,
            required: true,
        }
    }

    pub fn enumeration(name: &str, description: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: ParamKind::Enum(values.iter().map(|v| v.to_string()).collect()),
            required: true,
        }
    }

    fn validate(&self, value: &Value) -> Result<(), DispatchError> {
        match &self.kind {
            ParamKind::String => value.as_str().map(|_| ()).ok_or_else(|| {
                DispatchError::MalformedArguments(format!(
                    "parameter '{}' must be a string",
                    self.name
                ))
            }),
            ParamKind::Integer => value.as_i64().map(|_| ()).ok_or_else(|| {
                DispatchError::MalformedArguments(format!(
                    "parameter '{}' must be an integer",
                    self.name
                ))
            }),
            ParamKind::Enum(allowed) => match value.as_str() {
                Some(s) if allowed.iter().any(|a| a == s) => Ok(()),
                Some(s) => Err(DispatchError::InvalidEnumValue {
                    param: self.name.clone(),
                    value: s.to_string(),
                }),
                None => Err(DispatchError::InvalidEnumValue {
                    param: self.name.clone(),
                    value: value.to_string(),
                }),
            },
        }
    }
}

/// A declared, model-callable operation.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub params: Vec<ToolParam>,
}

impl ToolSpec {
    pub fn new(name: &str, description: &str, params: Vec<ToolParam>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            params,
        }
    }

    /// JSON schema for the parameter object.
    fn parameter_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.params {
            let property = match &param.kind {
                ParamKind::String => json!({
                    "type": "string",
                    "description": param.description,
                }),
                ParamKind::Integer => json!({
                    "type": "integer",
                    "description": param.description,
                }),
                ParamKind::Enum(values) => json!({
                    "type": "string",
                    "description": param.description,
                    "enum": values,
                }),
            };
            properties.insert(param.name.clone(), property);
        }

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    fn function_object(&self) -> FunctionObject {
        FunctionObject {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            parameters: Some(self.parameter_schema()),
            strict: None,
        }
    }

    /// Declaration form for chat completion requests.
    pub fn to_chat_tool(&self) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: self.function_object(),
        }
    }

    /// Declaration form for the Assistants API.
    pub fn to_assistant_tool(&self) -> AssistantTools {
        AssistantTools::Function(AssistantToolsFunction {
            function: self.function_object(),
        })
    }

    /// Parse and validate raw argument text against this schema.
    ///
    /// The buffer is only meaningful once the stream that produced it has
    /// ended; callers must not pass partially accumulated text.
    pub fn parse_arguments(&self, raw: &str) -> Result<ToolArguments, DispatchError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| DispatchError::MalformedArguments(e.to_string()))?;

        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(DispatchError::MalformedArguments(format!(
                    "expected an object, got {}",
                    other
                )))
            }
        };

        for param in &self.params {
            match object.get(&param.name) {
                None => {
                    if param.required {
                        return Err(DispatchError::MissingRequiredParameter(param.name.clone()));
                    }
                }
                Some(value) => param.validate(value)?,
            }
        }

        Ok(ToolArguments(object))
    }
}

/// Validated argument bundle with typed accessors.
#[derive(Debug)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    pub fn str(&self, name: &str) -> Result<&str, DispatchError> {
        self.0
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| DispatchError::MissingRequiredParameter(name.to_string()))
    }

    pub fn integer(&self, name: &str) -> Result<i64, DispatchError> {
        self.0
            .get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| DispatchError::MissingRequiredParameter(name.to_string()))
    }
}

/// A catalogue of callable operations bound to a backing adapter.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// The tool catalogue. Immutable after construction.
    fn catalogue(&self) -> &[ToolSpec];

    /// Resolve a (name, raw-argument-text) pair against the catalogue and
    /// execute it, returning a display-ready string.
    async fn dispatch(&self, name: &str, raw_arguments: &str) -> Result<String, DispatchError>;

    /// Chat-API declarations for every tool in the catalogue.
    fn chat_tools(&self) -> Vec<ChatCompletionTool> {
        self.catalogue().iter().map(ToolSpec::to_chat_tool).collect()
    }

    /// Assistants-API declarations for every tool in the catalogue.
    fn assistant_tools(&self) -> Vec<AssistantTools> {
        self.catalogue().iter().map(ToolSpec::to_assistant_tool).collect()
    }
}

/// Look up a tool spec by name, failing with `UnknownTool`.
fn find_spec<'a>(catalogue: &'a [ToolSpec], name: &str) -> Result<&'a ToolSpec, DispatchError> {
    catalogue
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))
}

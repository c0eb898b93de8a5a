use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One attempted tool call: the tool's name and its input fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(tool_name: impl Into<String>, tool_input: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_input,
        }
    }

    /// Build an invocation from a JSON object literal. Non-object input yields
    /// an empty input map.
    pub fn from_json(tool_name: impl Into<String>, tool_input: Value) -> Self {
        let tool_input = match tool_input {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(tool_name, tool_input)
    }

    /// A string-valued input field, if present and non-empty.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.tool_input
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Every input value in string form.
    ///
    /// Strings are taken verbatim; everything else (numbers, booleans, null,
    /// arrays, objects) is rendered as compact JSON.
    pub fn input_values(&self) -> Vec<String> {
        self.tool_input
            .values()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }

    /// The field a human would recognize the call by, for logs.
    pub fn subject(&self) -> String {
        ["command", "url", "query", "file_path", "pattern"]
            .iter()
            .find_map(|f| self.text(f))
            .map(String::from)
            .unwrap_or_else(|| Value::Object(self.tool_input.clone()).to_string())
    }
}

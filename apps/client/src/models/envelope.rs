use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw response body returned by the generation endpoints.
///
/// The backend wraps the resume under `data` and may add a `think` field with
/// the model's reasoning. Older deployments return the resume unwrapped. The
/// accessor handles both; this type only carries the JSON around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeEnvelope(pub Value);

impl ResumeEnvelope {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The error the backend reports when it could not parse the model output,
    /// e.g. `{"data": {"error": "Could not parse the AI response as valid JSON..."}}`.
    pub fn backend_error(&self) -> Option<&str> {
        let payload = match self.0.get("data") {
            Some(inner @ Value::Object(_)) => inner,
            _ => &self.0,
        };
        payload
            .get("error")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl From<Value> for ResumeEnvelope {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

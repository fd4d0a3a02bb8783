use serde_json::Result;

/// A notification sent through the broker.
///
/// Encoded as a JSON object with the keys `From`, `Subject` and `Body`, in that order.
/// Empty strings are valid for every field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    /// Identity of the sender.
    pub from: String,
    pub subject: String,
    /// Free-form content.
    pub body: String,
}

impl Message {
    pub fn new(
        from: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Encodes the message into the bytes carried as the publish body.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
    }
}

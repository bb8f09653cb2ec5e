use serde::Serialize;

pub const SAVED_MESSAGE: &str = "Data saved successfully";

/// The `{success, message}` pair reported for every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    #[must_use]
    pub fn saved() -> Self {
        Self { success: true, message: SAVED_MESSAGE.to_owned() }
    }
}

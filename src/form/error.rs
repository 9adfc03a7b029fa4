#[derive(Debug, Clone)]
pub struct IntentParseError {
    pub raw: String,
}

impl std::fmt::Display for IntentParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: missing ':' between control and value", self.raw)
    }
}

impl std::error::Error for IntentParseError {}

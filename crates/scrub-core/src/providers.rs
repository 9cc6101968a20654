use strum::{Display, EnumString};

/// Known provider classes plus a passthrough for names this build has never
/// heard of. Parsing canonicalizes: `"local"` is an accepted alias for the
/// ollama class, and matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, EnumString, Display)]
pub enum ProviderKind {
    #[strum(ascii_case_insensitive, to_string = "anthropic")]
    Anthropic,

    #[strum(ascii_case_insensitive, to_string = "openai")]
    OpenAi,

    #[strum(ascii_case_insensitive, serialize = "local", to_string = "ollama")]
    Ollama,

    #[strum(default)]
    Other(String),
}

impl Default for ProviderKind {
    fn default() -> Self {
        ProviderKind::Anthropic
    }
}

impl ProviderKind {
    /// Human-readable label for selection lists.
    pub fn display_label(&self) -> &str {
        match self {
            ProviderKind::Anthropic => "Anthropic Claude",
            ProviderKind::OpenAi => "OpenAI GPT",
            ProviderKind::Ollama => "Ollama (local)",
            ProviderKind::Other(name) => name.as_str(),
        }
    }

    /// Whether the `context_length` parameter means anything to this
    /// provider class. Only local models take it.
    pub fn supports_context_length(&self) -> bool {
        matches!(self, ProviderKind::Ollama)
    }

    /// Canonical name as sent on the wire.
    pub fn wire_name(&self) -> String {
        self.to_string()
    }
}

//! Tipos de dados para requisições e respostas da API de chat da Groq.
//!
//! Todas as structs derivam `Serialize` e `Deserialize` para conversão JSON
//! conforme o formato OpenAI-compatível do endpoint `chat/completions` da Groq.

use serde::{Deserialize, Serialize};

/// Corpo da requisição para o endpoint `chat/completions` da Groq.
///
/// Contém o modelo desejado, a lista de mensagens da conversa, a temperatura
/// de amostragem e o limite de tokens da resposta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Identificador do modelo a ser usado (ex.: "llama-3.3-70b-versatile").
    pub model: String,
    /// Lista de mensagens compondo a conversa (system, user e assistant).
    pub messages: Vec<ChatMessage>,
    /// Temperatura de amostragem; valores baixos deixam a saída determinística.
    pub temperature: f32,
    /// Número máximo de tokens na resposta gerada pelo modelo.
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Monta uma requisição com os padrões do pipeline: temperatura baixa
    /// (0.1) para saída determinística e limite de 4096 tokens.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.1,
            max_tokens: 4096,
        }
    }

    /// Substitui o limite de tokens da resposta.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Uma única mensagem em uma conversa de chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Papel do remetente: "system", "user" ou "assistant".
    pub role: String,
    /// Conteúdo textual da mensagem.
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Resposta retornada pelo endpoint `chat/completions` da Groq.
///
/// Contém o identificador único, as alternativas geradas (normalmente uma),
/// o modelo utilizado e estatísticas de uso de tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Identificador único da resposta (gerado pela API).
    pub id: String,
    /// Modelo que gerou a resposta.
    pub model: String,
    /// Alternativas geradas; a primeira carrega a resposta principal.
    pub choices: Vec<ChatChoice>,
    /// Estatísticas de uso de tokens (entrada e saída).
    pub usage: ChatUsage,
}

impl ChatResponse {
    /// Texto da primeira alternativa, se houver.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Uma alternativa de resposta dentro de [`ChatResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    /// Posição desta alternativa na lista.
    pub index: u32,
    /// Mensagem gerada pelo modelo.
    pub message: ChatMessage,
    /// Motivo da parada da geração (ex.: "stop", "length").
    /// `None` se ainda em progresso.
    pub finish_reason: Option<String>,
}

/// Estatísticas de consumo de tokens para uma chamada à API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatUsage {
    /// Número de tokens consumidos na entrada (prompt).
    pub prompt_tokens: u32,
    /// Número de tokens gerados na saída (resposta).
    pub completion_tokens: u32,
    /// Soma de entrada e saída.
    pub total_tokens: u32,
}

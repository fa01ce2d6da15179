//! Tipos de erro para o cliente da API Groq.
//!
//! Define [`OracleError`] com variantes para rate limiting, erros da API,
//! timeouts e erros de rede. Usa `thiserror` para derivar `Display` e `Error`
//! automaticamente a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao interagir com a API da Groq.
///
/// As variantes cobrem os cenários de falha que o fluxo de triagem precisa
/// distinguir:
/// - [`RateLimited`](OracleError::RateLimited) — o servidor retornou HTTP 429
/// - [`Api`](OracleError::Api) — qualquer outro erro HTTP (4xx/5xx)
/// - [`Timeout`](OracleError::Timeout) — a requisição excedeu o tempo limite
/// - [`EmptyCompletion`](OracleError::EmptyCompletion) — resposta sem texto
/// - [`Network`](OracleError::Network) — falha na camada de rede
#[derive(Debug, Error)]
pub enum OracleError {
    /// O servidor retornou HTTP 429 (rate limit).
    /// O campo `retry_after_ms` indica quantos milissegundos esperar antes de retentar.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Erro retornado pela API (ex.: 401 chave inválida, 500 erro interno).
    /// Contém o código de status HTTP e a mensagem de erro do corpo da resposta.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A requisição excedeu o tempo limite configurado no cliente.
    #[error("request timed out")]
    Timeout,

    /// A API respondeu com sucesso mas sem nenhum texto utilizável.
    #[error("empty completion from the model")]
    EmptyCompletion,

    /// Falha de rede subjacente (DNS, conexão recusada).
    /// Encapsula o erro original do `reqwest` via `#[from]`.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

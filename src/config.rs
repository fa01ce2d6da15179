//! Configuração do sift carregada a partir de `sift.toml`.
//!
//! A struct [`SiftConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `GROQ_API_KEY` tem precedência sobre o arquivo.

use serde::Deserialize;
use std::path::Path;

use crate::error::SiftError;
use crate::workflow::RunLimits;

/// Configuração de nível superior carregada de `sift.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SiftConfig {
    /// Chave da API Groq.
    #[serde(default)]
    pub api_key: String,

    /// Modelo padrão quando não especificado via CLI.
    #[serde(default = "default_model")]
    pub model: String,

    /// Pontuação mínima (exclusiva) para qualificar um candidato (0-100).
    #[serde(default = "default_qualify_threshold")]
    pub qualify_threshold: u8,

    /// Máximo de decisões de roteamento por execução.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Tamanho máximo de um perfil, em caracteres, embutido em um prompt.
    #[serde(default = "default_max_profile_chars")]
    pub max_profile_chars: usize,

    /// Retentativas da chamada de pontuação antes da execução degradar.
    #[serde(default = "default_eval_retries")]
    pub eval_retries: u32,

    /// Atraso base em milissegundos para backoff exponencial.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Tempo limite em segundos para cada requisição à API.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Consulta o modelo por uma dica de roteamento a cada decisão.
    /// A tabela de regras sempre tem a palavra final.
    #[serde(default)]
    pub llm_routing: bool,
}

// Valor padrão para o modelo: "llama-3.3-70b-versatile".
fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

// Valor padrão para o limiar de qualificação: 85.
fn default_qualify_threshold() -> u8 {
    85
}

// Valor padrão para o teto de decisões: 10.
fn default_max_steps() -> u32 {
    10
}

// Valor padrão para o tamanho de perfil: 8000 caracteres.
fn default_max_profile_chars() -> usize {
    8000
}

// Valor padrão para retentativas de pontuação: 1.
fn default_eval_retries() -> u32 {
    1
}

// Valor padrão para o atraso base: 1000ms.
fn default_retry_base_delay_ms() -> u64 {
    1000
}

// Valor padrão para o tempo limite de requisição: 60s.
fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            qualify_threshold: default_qualify_threshold(),
            max_steps: default_max_steps(),
            max_profile_chars: default_max_profile_chars(),
            eval_retries: default_eval_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            llm_routing: false,
        }
    }
}

impl SiftConfig {
    /// Carrega a configuração de `sift.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self, SiftError> {
        Self::load_from(Path::new("sift.toml"))
    }

    /// Carrega a configuração do caminho indicado, aplicando a precedência
    /// da variável de ambiente e validando os valores resultantes.
    pub fn load_from(path: &Path) -> Result<Self, SiftError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<SiftConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo de configuração para a chave API.
        if let Ok(key) = std::env::var("GROQ_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SiftError> {
        if self.qualify_threshold > 100 {
            return Err(SiftError::Config(format!(
                "qualify_threshold must be between 0 and 100, got {}",
                self.qualify_threshold
            )));
        }
        if self.max_steps == 0 {
            return Err(SiftError::Config("max_steps must be at least 1".into()));
        }
        Ok(())
    }

    /// Limites por execução derivados desta configuração.
    pub fn limits(&self) -> RunLimits {
        RunLimits {
            qualify_threshold: self.qualify_threshold,
            max_steps: self.max_steps,
            max_profile_chars: self.max_profile_chars,
            eval_retries: self.eval_retries,
            retry_base_delay_ms: self.retry_base_delay_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = SiftConfig::default();
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.qualify_threshold, 85);
        assert_eq!(config.max_steps, 10);
        assert_eq!(config.max_profile_chars, 8000);
        assert_eq!(config.eval_retries, 1);
        assert_eq!(config.retry_base_delay_ms, 1000);
        assert_eq!(config.request_timeout_secs, 60);
        assert!(!config.llm_routing);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "gsk-test-123"
            qualify_threshold = 70
            llm_routing = true
        "#;
        let config: SiftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "gsk-test-123");
        assert_eq!(config.qualify_threshold, 70);
        assert!(config.llm_routing);
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.max_steps, 10);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiftConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.max_steps, 10);
        assert_eq!(config.qualify_threshold, 85);
    }

    #[test]
    fn load_from_reads_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sift.toml");
        std::fs::write(&path, "max_steps = 6\nretry_base_delay_ms = 250\n").unwrap();

        let config = SiftConfig::load_from(&path).unwrap();
        assert_eq!(config.max_steps, 6);
        assert_eq!(config.retry_base_delay_ms, 250);
    }

    #[test]
    fn threshold_above_scale_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sift.toml");
        std::fs::write(&path, "qualify_threshold = 130\n").unwrap();

        let err = SiftConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("qualify_threshold"));
    }

    #[test]
    fn zero_step_ceiling_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sift.toml");
        std::fs::write(&path, "max_steps = 0\n").unwrap();

        let err = SiftConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("max_steps"));
    }

    #[test]
    fn limits_mirror_config() {
        let config = SiftConfig {
            qualify_threshold: 60,
            max_steps: 4,
            max_profile_chars: 500,
            eval_retries: 2,
            retry_base_delay_ms: 10,
            ..Default::default()
        };
        let limits = config.limits();
        assert_eq!(limits.qualify_threshold, 60);
        assert_eq!(limits.max_steps, 4);
        assert_eq!(limits.max_profile_chars, 500);
        assert_eq!(limits.eval_retries, 2);
        assert_eq!(limits.retry_base_delay_ms, 10);
    }
}

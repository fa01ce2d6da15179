//! Interface de linha de comando do sift baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (screen, demo)
//! e flags globais (--model, --threshold, --max-steps, --llm-routing, --verbose).

use clap::{Parser, Subcommand, ValueEnum};

use crate::workflow::ApprovalDecision;

/// sift — Triagem de currículos com supervisor e envio aprovado por humanos.
#[derive(Debug, Parser)]
#[command(name = "sift", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Modelo Groq a usar nesta sessão.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Pontuação mínima (exclusiva) para qualificar um candidato (0-100).
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(..=100))]
    pub threshold: Option<u8>,

    /// Máximo de decisões de roteamento por execução.
    #[arg(long, global = true)]
    pub max_steps: Option<u32>,

    /// Consulta o modelo por uma dica de roteamento a cada decisão.
    #[arg(long, global = true, default_value_t = false)]
    pub llm_routing: bool,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Decisão do revisor aceita pela CLI, mapeada para
/// [`ApprovalDecision`](crate::workflow::ApprovalDecision) internamente.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DecisionArg {
    /// Aprova o rascunho e libera o envio.
    Approve,
    /// Rejeita o rascunho e encerra a execução sem enviar.
    Reject,
}

impl From<DecisionArg> for ApprovalDecision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Approve => ApprovalDecision::Approved,
            DecisionArg::Reject => ApprovalDecision::Rejected,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Executa a triagem de um lote de currículos contra uma vaga.
    Screen {
        /// Caminho para o arquivo com a descrição da vaga.
        #[arg(long)]
        jd: String,

        /// Caminhos para os arquivos de currículo, um candidato por arquivo.
        #[arg(required = true)]
        resumes: Vec<String>,

        /// Decide o rascunho sem o prompt interativo.
        #[arg(long)]
        decision: Option<DecisionArg>,
    },

    /// Executa a demonstração embutida do fluxo de triagem.
    Demo {
        /// Gera currículos sintéticos a partir desta descrição em vez de
        /// usar o lote embutido (requer chave de API).
        #[arg(long)]
        generate: Option<String>,

        /// Quantos currículos sintéticos gerar.
        #[arg(long, default_value_t = 3)]
        count: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_screen_subcommand() {
        let cli = Cli::parse_from(["sift", "screen", "--jd", "jd.md", "a.md", "b.md"]);
        match cli.command {
            Command::Screen {
                jd,
                resumes,
                decision,
            } => {
                assert_eq!(jd, "jd.md");
                assert_eq!(resumes, vec!["a.md".to_string(), "b.md".to_string()]);
                assert!(decision.is_none());
            }
            _ => panic!("expected Screen command"),
        }
    }

    #[test]
    fn cli_screen_requires_resumes() {
        let result = Cli::try_parse_from(["sift", "screen", "--jd", "jd.md"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_decision_flag() {
        let cli = Cli::parse_from([
            "sift", "screen", "--jd", "jd.md", "--decision", "approve", "a.md",
        ]);
        match cli.command {
            Command::Screen { decision, .. } => {
                assert!(matches!(decision, Some(DecisionArg::Approve)));
            }
            _ => panic!("expected Screen command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "sift",
            "--model",
            "llama-3.1-8b-instant",
            "--threshold",
            "70",
            "--max-steps",
            "6",
            "--llm-routing",
            "--verbose",
            "demo",
        ]);
        assert!(cli.verbose);
        assert!(cli.llm_routing);
        assert_eq!(cli.model.as_deref(), Some("llama-3.1-8b-instant"));
        assert_eq!(cli.threshold, Some(70));
        assert_eq!(cli.max_steps, Some(6));
    }

    #[test]
    fn cli_parses_demo_generate() {
        let cli = Cli::parse_from(["sift", "demo", "--generate", "fintech backend", "--count", "5"]);
        match cli.command {
            Command::Demo { generate, count } => {
                assert_eq!(generate.as_deref(), Some("fintech backend"));
                assert_eq!(count, 5);
            }
            _ => panic!("expected Demo command"),
        }
    }

    #[test]
    fn decision_arg_maps_to_domain() {
        assert_eq!(
            ApprovalDecision::from(DecisionArg::Approve),
            ApprovalDecision::Approved
        );
        assert_eq!(
            ApprovalDecision::from(DecisionArg::Reject),
            ApprovalDecision::Rejected
        );
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}

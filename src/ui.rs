//! Interface de terminal do sift — spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`RunProgress`] acompanha visualmente
//! uma execução de triagem no terminal.

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::workflow::{ApprovalDecision, OutreachDraft, Phase, RunReport, RunStatus};

/// Indicador visual de progresso para uma execução de triagem no terminal.
///
/// Exibe um spinner animado durante o processamento e mensagens
/// coloridas para conclusão (verde), aborto (vermelho) e suspensão (amarelo).
pub struct RunProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para mensagens de conclusão.
    green: Style,
    // Estilo vermelho para mensagens de aborto.
    red: Style,
    // Estilo amarelo para suspensão e avisos.
    yellow: Style,
}

impl RunProgress {
    /// Inicia o spinner com a descrição da execução e retorna a instância.
    pub fn start(description: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("START: {description}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Atualiza a mensagem do spinner para refletir a fase atual.
    #[allow(dead_code)]
    pub fn update_phase(&self, phase: Phase) {
        self.pb.set_message(format!("{phase}"));
    }

    /// Finaliza o spinner e exibe o desfecho da execução.
    ///
    /// Conclusão em verde com checkmark; aborto em vermelho com X;
    /// suspensão no portão de aprovação em amarelo.
    pub fn complete(&self, report: &RunReport) {
        self.pb.finish_and_clear();
        match report.status {
            RunStatus::Done => {
                println!("  {} Run finished: {}", self.green.apply_to("✓"), report.reason);
            }
            RunStatus::Aborted => {
                println!("  {} Run {}", self.red.apply_to("✗"), report.reason);
            }
            RunStatus::Suspended => {
                println!("  {} Run suspended: {}", self.yellow.apply_to("⏸"), report.reason);
            }
            _ => {
                println!("  {} Run status: {}", self.yellow.apply_to("•"), report.status);
            }
        }
    }

    /// Imprime o rascunho de contato parado no portão de aprovação.
    pub fn print_draft(&self, draft: &OutreachDraft) {
        println!();
        println!("{}", self.yellow.apply_to("─── Outreach Draft ───"));
        if let Some(to) = &draft.to {
            println!("To: {to}");
        }
        println!("Subject: {}", draft.subject);
        println!();
        println!("{}", draft.body);
        println!("{}", self.yellow.apply_to("──────────────────────"));
    }

    /// Imprime o relatório da execução formatado em JSON com estilo colorido.
    pub fn print_report(&self, report: &RunReport) {
        let status_style = match report.status {
            RunStatus::Done => &self.green,
            RunStatus::Aborted => &self.red,
            _ => &self.yellow,
        };
        println!();
        println!("{}", status_style.apply_to("─── Run Report ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
    }
}

/// Pergunta ao revisor, no terminal, o que fazer com o rascunho parado.
///
/// Aceita `a`/`approve`/`y` para aprovar e `r`/`reject`/`n` para rejeitar,
/// repetindo a pergunta para qualquer outra resposta.
pub fn prompt_decision() -> std::io::Result<ApprovalDecision> {
    let term = Term::stdout();
    loop {
        term.write_str("Approve this draft for sending? [a]pprove / [r]eject: ")?;
        let answer = term.read_line()?;
        match answer.trim().to_lowercase().as_str() {
            "a" | "approve" | "y" | "yes" => return Ok(ApprovalDecision::Approved),
            "r" | "reject" | "n" | "no" => return Ok(ApprovalDecision::Rejected),
            _ => term.write_line("Please answer 'a' to approve or 'r' to reject.")?,
        }
    }
}

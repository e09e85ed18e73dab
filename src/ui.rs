//! Interface de terminal do hashcrack: barra de progresso e saída colorida.
//!
//! Usa as crates `indicatif` para a barra de progresso e `console` para
//! estilização com cores. O [`JobProgress`] acompanha visualmente
//! a execução de um job no terminal a partir dos eventos `job_update`.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use hashcrack::hashing::{Detection, GeneratedHashes, HashInfo};
use hashcrack::state_machine::{Job, JobStatus};
use hashcrack::strength::StrengthReport;

/// Indicador visual de progresso para a execução de um job no terminal.
///
/// A barra mede tentativas; a mensagem mostra a velocidade atual.
/// O resultado final é colorido: verde quando a senha é encontrada,
/// amarelo quando o espaço se esgota ou o job é cancelado, vermelho em falha.
pub struct JobProgress {
    // Barra do indicatif; o tamanho é definido no primeiro evento RUNNING.
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
    dim: Style,
}

impl JobProgress {
    /// Inicia a barra com o cabeçalho do job.
    pub fn start(job: &Job) -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let ui = Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        };
        ui.pb.println(format!(
            "  {} job {} ({} / {})",
            ui.dim.apply_to("▸"),
            job.job_id,
            job.hash_type,
            job.attack.mode()
        ));
        ui
    }

    /// Atualiza a barra a partir de um snapshot recebido.
    pub fn update(&self, job: &Job) {
        if job.total_attempts > 0 && self.pb.length() != Some(job.total_attempts) {
            self.pb.set_length(job.total_attempts);
        }
        self.pb.set_position(job.current_attempt);
        self.pb.set_message(format!("{:.1}% · {}", job.progress, format_speed(job.speed)));
    }

    /// Finaliza a barra e exibe o resultado final do job.
    pub fn complete(&self, job: &Job) {
        self.update(job);
        self.pb.finish_and_clear();
        match (job.status, &job.cracked_password) {
            (JobStatus::Completed, Some(password)) => println!(
                "  {} Password found: {}",
                self.green.apply_to("✓"),
                self.green.apply_to(password)
            ),
            (JobStatus::Completed, None) => println!(
                "  {} Password not found: {}",
                self.yellow.apply_to("∅"),
                job.error_message.as_deref().unwrap_or("search space exhausted")
            ),
            (JobStatus::Cancelled, _) => {
                println!("  {} Job cancelled", self.yellow.apply_to("■"))
            }
            (JobStatus::Failed, _) => println!(
                "  {} Job failed: {}",
                self.red.apply_to("✗"),
                job.error_message.as_deref().unwrap_or("unknown error")
            ),
            (status, _) => println!("  {} Job is still {status}", self.dim.apply_to("…")),
        }
        println!(
            "  {}",
            self.dim.apply_to(format!(
                "{} attempts in {:.2}s ({})",
                job.current_attempt,
                job.time_elapsed,
                format_speed(job.speed)
            ))
        );
    }
}

/// Formata a velocidade em tentativas por segundo.
pub fn format_speed(speed: f64) -> String {
    if speed >= 1_000_000.0 {
        format!("{:.2}M/s", speed / 1_000_000.0)
    } else if speed >= 1_000.0 {
        format!("{:.1}K/s", speed / 1_000.0)
    } else {
        format!("{speed:.0}/s")
    }
}

/// Imprime o snapshot final em JSON.
pub fn print_job_json(job: &Job) {
    println!("{}", serde_json::to_string_pretty(job).unwrap_or_default());
}

/// Imprime o resultado da detecção com a ficha do tipo.
pub fn print_detection(detection: &Detection, info: &HashInfo) {
    let label = Style::new().bold();
    let style = if detection.hash_type.is_some() {
        Style::new().green().bold()
    } else {
        Style::new().red().bold()
    };
    println!("  {} {}", label.apply_to("Type:"), style.apply_to(detection.type_tag()));
    println!("  {} {}", label.apply_to("Confidence:"), detection.confidence);
    println!("  {} {}", label.apply_to("Length:"), detection.hash_length);
    println!("  {} {}", label.apply_to("Description:"), detection.description);
    println!("  {} {}", label.apply_to("Security:"), info.security);
    println!("  {} {}", label.apply_to("Recommended:"), info.recommended_attack);
    println!("  {} {}", label.apply_to("Typical uses:"), info.typical_uses);
    println!("  {} {}", label.apply_to("Est. speed:"), info.est_speed);
}

pub fn print_hashes(hashes: &GeneratedHashes) {
    let label = Style::new().cyan();
    for (name, value) in [
        ("md5", &hashes.md5),
        ("sha1", &hashes.sha1),
        ("sha256", &hashes.sha256),
        ("sha512", &hashes.sha512),
        ("ntlm", &hashes.ntlm),
    ] {
        println!("  {:>7}  {value}", label.apply_to(name));
    }
}

pub fn print_verification(matched: bool) {
    if matched {
        println!("  {} Password matches", Style::new().green().bold().apply_to("✓"));
    } else {
        println!("  {} Password does not match", Style::new().red().bold().apply_to("✗"));
    }
}

pub fn print_strength(report: &StrengthReport) {
    let style = match report.score {
        1 | 2 => Style::new().red().bold(),
        3 | 4 => Style::new().yellow().bold(),
        _ => Style::new().green().bold(),
    };
    println!(
        "  {} ({}/6)",
        style.apply_to(report.strength),
        report.score
    );
    println!(
        "  length {} · charset {} · {:.3e} combinations",
        report.length, report.charset_size, report.combinations
    );
    println!("  time to crack at 1e9 guesses/s: {}", report.time_to_crack);
}

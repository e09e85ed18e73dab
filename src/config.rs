//! Configuração do hashcrack carregada a partir de `hashcrack.toml`.
//!
//! A struct [`CrackerConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis de ambiente `WORDLIST_DIR`, `HASHCRACK_WORKERS` e
//! `HASHCRACK_MAX_ATTEMPTS` têm precedência sobre o arquivo.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::attack::AttackLimits;

pub const DEFAULT_CONFIG_FILE: &str = "hashcrack.toml";

/// Configuração de nível superior carregada de `hashcrack.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrackerConfig {
    /// Comprimento máximo aceito para ataques de força bruta.
    #[serde(default = "default_max_bruteforce_length")]
    pub max_bruteforce_length: usize,

    /// Teto de tentativas por job de força bruta.
    #[serde(default = "default_max_attempts_per_job")]
    pub max_attempts_per_job: u64,

    /// Diretório onde as wordlists são procuradas.
    #[serde(default = "default_wordlist_dir")]
    pub wordlist_dir: PathBuf,

    /// Número de jobs executados em paralelo.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Tentativas entre checkpoints no modo dicionário.
    #[serde(default = "default_dictionary_checkpoint")]
    pub dictionary_checkpoint: u64,

    /// Tentativas entre checkpoints no modo força bruta.
    #[serde(default = "default_bruteforce_checkpoint")]
    pub bruteforce_checkpoint: u64,

    /// Capacidade do canal de progresso de cada job.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_max_bruteforce_length() -> usize {
    6
}

fn default_max_attempts_per_job() -> u64 {
    10_000_000
}

fn default_wordlist_dir() -> PathBuf {
    PathBuf::from("./wordlists")
}

fn default_workers() -> usize {
    4
}

fn default_dictionary_checkpoint() -> u64 {
    1000
}

fn default_bruteforce_checkpoint() -> u64 {
    5000
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for CrackerConfig {
    fn default() -> Self {
        Self {
            max_bruteforce_length: default_max_bruteforce_length(),
            max_attempts_per_job: default_max_attempts_per_job(),
            wordlist_dir: default_wordlist_dir(),
            workers: default_workers(),
            dictionary_checkpoint: default_dictionary_checkpoint(),
            bruteforce_checkpoint: default_bruteforce_checkpoint(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl CrackerConfig {
    /// Carrega a configuração de `path`, ou de `hashcrack.toml` no diretório atual.
    ///
    /// Um caminho explícito precisa existir; o arquivo padrão é opcional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config.normalized())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str::<CrackerConfig>(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Aplica as sobrescritas de ambiente; `lookup` devolve o valor de uma variável.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup("WORDLIST_DIR")
            && !dir.is_empty()
        {
            self.wordlist_dir = PathBuf::from(dir);
        }
        if let Some(workers) = lookup("HASHCRACK_WORKERS") {
            self.workers = parse_number("HASHCRACK_WORKERS", &workers)?;
        }
        if let Some(max) = lookup("HASHCRACK_MAX_ATTEMPTS") {
            self.max_attempts_per_job = parse_number("HASHCRACK_MAX_ATTEMPTS", &max)?;
        }
        Ok(())
    }

    /// Aplica as flags da CLI, que vencem arquivo e ambiente.
    pub fn with_overrides(mut self, workers: Option<usize>, max_attempts: Option<u64>) -> Self {
        if let Some(workers) = workers {
            self.workers = workers;
        }
        if let Some(max) = max_attempts {
            self.max_attempts_per_job = max;
        }
        self.normalized()
    }

    /// Limites repassados às estratégias de ataque.
    pub fn limits(&self) -> AttackLimits {
        AttackLimits {
            max_attempts: self.max_attempts_per_job,
            dictionary_checkpoint: self.dictionary_checkpoint,
            bruteforce_checkpoint: self.bruteforce_checkpoint,
        }
    }

    // Zeros não fazem sentido para nenhum destes campos.
    fn normalized(mut self) -> Self {
        self.workers = self.workers.max(1);
        self.max_attempts_per_job = self.max_attempts_per_job.max(1);
        self.dictionary_checkpoint = self.dictionary_checkpoint.max(1);
        self.bruteforce_checkpoint = self.bruteforce_checkpoint.max(1);
        self.channel_capacity = self.channel_capacity.max(1);
        self
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    match value.trim().parse() {
        Ok(n) => Ok(n),
        Err(_) => bail!("{key} must be a positive integer, got {value:?}"),
    }
}

//! Interface de linha de comando do hashcrack baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (crack, detect, hash,
//! verify, strength) e flags globais (--config, --workers, --max-attempts,
//! --verbose).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use hashcrack::attack::AttackMode;
use hashcrack::request::JobRequest;

/// hashcrack: recuperação de senhas por dicionário ou força bruta.
#[derive(Debug, Parser)]
#[command(name = "hashcrack", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho para um arquivo de configuração TOML (padrão: ./hashcrack.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Número de jobs executados em paralelo.
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Teto de tentativas por job de força bruta.
    #[arg(long, global = true)]
    pub max_attempts: Option<u64>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Modo de ataque aceito pela CLI, mapeado para [`AttackMode`] internamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Testa cada entrada de uma wordlist, em ordem.
    Dictionary,
    /// Enumera todas as strings do charset até o comprimento máximo.
    Bruteforce,
}

impl From<ModeArg> for AttackMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Dictionary => AttackMode::Dictionary,
            ModeArg::Bruteforce => AttackMode::Bruteforce,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submete um job de quebra e acompanha o progresso até o fim.
    Crack(CrackArgs),

    /// Identifica o tipo provável de um hash.
    Detect {
        /// O hash a analisar.
        hash: String,
    },

    /// Gera os digests md5, sha1, sha256, sha512 e ntlm de uma senha.
    Hash {
        password: String,
    },

    /// Confere se uma senha corresponde a um hash.
    Verify {
        password: String,
        hash: String,

        /// Tipo do hash (md5, sha1, sha256, sha512, ntlm, bcrypt, ...).
        #[arg(long)]
        hash_type: String,
    },

    /// Estima a resistência de uma senha a força bruta.
    Strength {
        password: String,

        /// Imprime o relatório em JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct CrackArgs {
    /// O hash alvo.
    pub hash: String,

    /// Tipo do hash; opcional com --auto-detect.
    #[arg(long)]
    pub hash_type: Option<String>,

    /// Modo de ataque.
    #[arg(long, value_enum, default_value_t = ModeArg::Dictionary)]
    pub mode: ModeArg,

    /// Wordlist do modo dicionário (nome relativo ao diretório de wordlists ou caminho).
    #[arg(long, default_value = "wordlist.txt")]
    pub wordlist: String,

    /// Comprimento máximo no modo força bruta.
    #[arg(long, default_value_t = 4)]
    pub max_length: usize,

    /// Charset da força bruta: 1 = a-z0-9, 2 = a-z, 3 = a-zA-Z0-9, 4 = imprimíveis.
    #[arg(long, default_value = "1")]
    pub charset: String,

    /// Detecta o tipo do hash pelo formato.
    #[arg(long)]
    pub auto_detect: bool,

    /// Imprime o snapshot final em JSON em vez da barra de progresso.
    #[arg(long)]
    pub json: bool,
}

impl CrackArgs {
    /// Converte os argumentos em uma requisição de job.
    pub fn to_request(&self) -> JobRequest {
        let mode = AttackMode::from(self.mode);
        let (wordlist, max_length, charset) = match mode {
            AttackMode::Dictionary => (Some(self.wordlist.clone()), None, None),
            AttackMode::Bruteforce => (None, Some(self.max_length), Some(self.charset.clone())),
        };
        JobRequest {
            hash: self.hash.clone(),
            hash_type: self.hash_type.clone(),
            attack_mode: Some(mode.to_string()),
            wordlist,
            max_length,
            charset,
            auto_detect: self.auto_detect,
        }
    }
}

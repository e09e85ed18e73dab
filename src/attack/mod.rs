//! Attack strategies: lazy, ordered candidate sequences.
//!
//! An [`AttackConfig`] is what a caller asks for; an [`AttackStrategy`] is that
//! configuration resolved against its inputs (wordlist loaded, search space
//! sized) and ready to hand candidates to the executor.

mod bruteforce;
mod dictionary;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CrackError, Result};
use crate::wordlist::WordlistSource;

pub use bruteforce::{BruteforceAttack, Candidates};
pub use dictionary::DictionaryAttack;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackMode {
    Dictionary,
    Bruteforce,
}

impl fmt::Display for AttackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackMode::Dictionary => write!(f, "dictionary"),
            AttackMode::Bruteforce => write!(f, "bruteforce"),
        }
    }
}

impl FromStr for AttackMode {
    type Err = CrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dictionary" => Ok(AttackMode::Dictionary),
            "bruteforce" => Ok(AttackMode::Bruteforce),
            other => Err(CrackError::Validation(format!("unknown attack mode `{other}`"))),
        }
    }
}

/// The four brute-force alphabets, selected by `"1"`..`"4"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charset {
    #[serde(rename = "1")]
    LowerDigits,
    #[serde(rename = "2")]
    Lower,
    #[serde(rename = "3")]
    MixedDigits,
    #[serde(rename = "4")]
    Printable,
}

const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

impl Charset {
    pub fn selector(&self) -> &'static str {
        match self {
            Charset::LowerDigits => "1",
            Charset::Lower => "2",
            Charset::MixedDigits => "3",
            Charset::Printable => "4",
        }
    }

    /// Characters in enumeration order.
    pub fn chars(&self) -> Vec<char> {
        let parts: &[&str] = match self {
            Charset::LowerDigits => &[LOWER, DIGITS],
            Charset::Lower => &[LOWER],
            Charset::MixedDigits => &[LOWER, UPPER, DIGITS],
            Charset::Printable => &[LOWER, UPPER, DIGITS, PUNCTUATION],
        };
        parts.iter().flat_map(|p| p.chars()).collect()
    }
}

impl FromStr for Charset {
    type Err = CrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(Charset::LowerDigits),
            "2" => Ok(Charset::Lower),
            "3" => Ok(Charset::MixedDigits),
            "4" => Ok(Charset::Printable),
            other => Err(CrackError::Validation(format!(
                "charset must be one of 1, 2, 3, 4 (got `{other}`)"
            ))),
        }
    }
}

/// Mode-specific job configuration. On the wire a job spells it out as
/// `attack_mode` plus nullable `wordlist_name`, `max_length` and `charset_option`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "attack_mode", rename_all = "lowercase")]
pub enum AttackConfig {
    Dictionary {
        wordlist_name: String,
    },
    Bruteforce {
        max_length: usize,
        charset_option: Charset,
    },
}

impl AttackConfig {
    pub fn mode(&self) -> AttackMode {
        match self {
            AttackConfig::Dictionary { .. } => AttackMode::Dictionary,
            AttackConfig::Bruteforce { .. } => AttackMode::Bruteforce,
        }
    }
}

/// Limits applied when turning a configuration into a runnable strategy.
#[derive(Debug, Clone, Copy)]
pub struct AttackLimits {
    pub max_attempts: u64,
    pub dictionary_checkpoint: u64,
    pub bruteforce_checkpoint: u64,
}

impl Default for AttackLimits {
    fn default() -> Self {
        Self {
            max_attempts: 10_000_000,
            dictionary_checkpoint: 1000,
            bruteforce_checkpoint: 5000,
        }
    }
}

pub enum AttackStrategy {
    Dictionary(DictionaryAttack),
    Bruteforce(BruteforceAttack),
}

impl AttackStrategy {
    /// Resolves `config` into a strategy. Fails with `ResourceUnavailable` when
    /// the wordlist cannot be loaded.
    pub fn prepare(
        config: &AttackConfig,
        wordlists: &dyn WordlistSource,
        limits: AttackLimits,
    ) -> Result<Self> {
        match config {
            AttackConfig::Dictionary { wordlist_name } => {
                let words = wordlists.load(wordlist_name)?;
                Ok(AttackStrategy::Dictionary(DictionaryAttack::new(
                    words,
                    limits.dictionary_checkpoint,
                )))
            }
            AttackConfig::Bruteforce {
                max_length,
                charset_option,
            } => Ok(AttackStrategy::Bruteforce(BruteforceAttack::new(
                charset_option.chars(),
                *max_length,
                limits.max_attempts,
                limits.bruteforce_checkpoint,
            )?)),
        }
    }

    /// Number of candidates this run will try at most (already clamped to the cap).
    pub fn total_attempts(&self) -> u64 {
        match self {
            AttackStrategy::Dictionary(d) => d.len() as u64,
            AttackStrategy::Bruteforce(b) => b.total_attempts(),
        }
    }

    /// True when the full search space is larger than the attempts we will make.
    pub fn is_capped(&self) -> bool {
        match self {
            AttackStrategy::Dictionary(_) => false,
            AttackStrategy::Bruteforce(b) => b.is_capped(),
        }
    }

    pub fn attempt_cap(&self) -> Option<u64> {
        match self {
            AttackStrategy::Dictionary(_) => None,
            AttackStrategy::Bruteforce(b) => Some(b.cap()),
        }
    }

    pub fn checkpoint_every(&self) -> u64 {
        match self {
            AttackStrategy::Dictionary(d) => d.checkpoint_every(),
            AttackStrategy::Bruteforce(b) => b.checkpoint_every(),
        }
    }

    /// Candidates in attack order, limited to [`total_attempts`](Self::total_attempts).
    pub fn candidates(&self) -> Box<dyn Iterator<Item = Cow<'_, str>> + '_> {
        let limit = self.total_attempts() as usize;
        match self {
            AttackStrategy::Dictionary(d) => Box::new(d.candidates().map(Cow::Borrowed)),
            AttackStrategy::Bruteforce(b) => Box::new(b.candidates().take(limit).map(Cow::Owned)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordlist::StaticWordlists;

    #[test]
    fn charset_sizes() {
        assert_eq!(Charset::LowerDigits.chars().len(), 36);
        assert_eq!(Charset::Lower.chars().len(), 26);
        assert_eq!(Charset::MixedDigits.chars().len(), 62);
        assert_eq!(Charset::Printable.chars().len(), 94);
        assert_eq!(Charset::LowerDigits.chars()[26], '0');
    }

    #[test]
    fn charset_selectors_parse() {
        assert_eq!("3".parse::<Charset>().unwrap(), Charset::MixedDigits);
        assert!(matches!("5".parse::<Charset>(), Err(CrackError::Validation(_))));
        for c in [Charset::LowerDigits, Charset::Lower, Charset::MixedDigits, Charset::Printable] {
            assert_eq!(c.selector().parse::<Charset>().unwrap(), c);
        }
    }

    #[test]
    fn attack_mode_parse() {
        assert_eq!("Dictionary".parse::<AttackMode>().unwrap(), AttackMode::Dictionary);
        assert_eq!("bruteforce".parse::<AttackMode>().unwrap(), AttackMode::Bruteforce);
        assert!(matches!("smart".parse::<AttackMode>(), Err(CrackError::Validation(_))));
    }

    #[test]
    fn attack_config_serializes_flat_tag() {
        let cfg = AttackConfig::Bruteforce {
            max_length: 3,
            charset_option: Charset::Lower,
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["attack_mode"], "bruteforce");
        assert_eq!(json["charset_option"], "2");
        assert_eq!(json["max_length"], 3);
    }

    #[test]
    fn prepare_dictionary_from_source() {
        let source = StaticWordlists::default().with("tiny", ["one", "two"]);
        let strategy = AttackStrategy::prepare(
            &AttackConfig::Dictionary {
                wordlist_name: "tiny".into(),
            },
            &source,
            AttackLimits::default(),
        )
        .unwrap();
        assert_eq!(strategy.total_attempts(), 2);
        assert_eq!(strategy.checkpoint_every(), 1000);
        assert!(!strategy.is_capped());
        let words: Vec<_> = strategy.candidates().collect();
        assert_eq!(words, vec!["one", "two"]);
    }

    #[test]
    fn prepare_missing_wordlist_is_resource_error() {
        let source = StaticWordlists::default();
        let err = AttackStrategy::prepare(
            &AttackConfig::Dictionary {
                wordlist_name: "missing".into(),
            },
            &source,
            AttackLimits::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, CrackError::ResourceUnavailable(_)));
    }

    #[test]
    fn prepare_bruteforce_clamps_candidates() {
        let limits = AttackLimits {
            max_attempts: 10,
            ..Default::default()
        };
        let strategy = AttackStrategy::prepare(
            &AttackConfig::Bruteforce {
                max_length: 2,
                charset_option: Charset::Lower,
            },
            &StaticWordlists::default(),
            limits,
        )
        .unwrap();
        assert_eq!(strategy.total_attempts(), 10);
        assert!(strategy.is_capped());
        assert_eq!(strategy.candidates().count(), 10);
        assert_eq!(strategy.checkpoint_every(), 5000);
    }
}

/// First-match search over a loaded wordlist, in file order.
#[derive(Debug, Clone)]
pub struct DictionaryAttack {
    words: Vec<String>,
    checkpoint_every: u64,
}

impl DictionaryAttack {
    pub fn new(words: Vec<String>, checkpoint_every: u64) -> Self {
        Self {
            words,
            checkpoint_every: checkpoint_every.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn checkpoint_every(&self) -> u64 {
        self.checkpoint_every
    }

    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_source_order() {
        let attack = DictionaryAttack::new(vec!["zeta".into(), "alpha".into(), "mid".into()], 1000);
        assert_eq!(attack.len(), 3);
        assert_eq!(
            attack.candidates().collect::<Vec<_>>(),
            vec!["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn zero_checkpoint_interval_is_clamped() {
        let attack = DictionaryAttack::new(vec![], 0);
        assert!(attack.is_empty());
        assert_eq!(attack.checkpoint_every(), 1);
    }
}

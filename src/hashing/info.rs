use serde::Serialize;

use super::HashType;

/// Human-oriented facts about a hash type, shown next to a detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashInfo {
    pub name: &'static str,
    pub speed: &'static str,
    pub security: &'static str,
    pub crackable: &'static str,
    pub recommended_attack: &'static str,
    pub typical_uses: &'static str,
    pub est_speed: &'static str,
}

const UNKNOWN: HashInfo = HashInfo {
    name: "Unknown",
    speed: "N/A",
    security: "N/A",
    crackable: "N/A",
    recommended_attack: "Manual selection required",
    typical_uses: "N/A",
    est_speed: "N/A",
};

pub fn hash_info(hash_type: Option<HashType>) -> HashInfo {
    let Some(hash_type) = hash_type else {
        return UNKNOWN;
    };
    match hash_type {
        HashType::Md5 => HashInfo {
            name: "MD5",
            speed: "Very Fast",
            security: "Weak",
            crackable: "Easy",
            recommended_attack: "Dictionary or Brute force",
            typical_uses: "Legacy systems, file checksums",
            est_speed: "500K-1M passwords/sec",
        },
        HashType::Sha1 => HashInfo {
            name: "SHA-1",
            speed: "Very Fast",
            security: "Weak",
            crackable: "Easy",
            recommended_attack: "Dictionary or Brute force",
            typical_uses: "Git, legacy applications",
            est_speed: "300K-800K passwords/sec",
        },
        HashType::Sha256 => HashInfo {
            name: "SHA-256",
            speed: "Fast",
            security: "Medium",
            crackable: "Moderate",
            recommended_attack: "Dictionary first",
            typical_uses: "Bitcoin, modern applications",
            est_speed: "200K-500K passwords/sec",
        },
        HashType::Sha512 => HashInfo {
            name: "SHA-512",
            speed: "Fast",
            security: "Medium",
            crackable: "Moderate",
            recommended_attack: "Dictionary only",
            typical_uses: "High security applications",
            est_speed: "100K-300K passwords/sec",
        },
        HashType::Ntlm => HashInfo {
            name: "NTLM",
            speed: "Very Fast",
            security: "Weak",
            crackable: "Easy",
            recommended_attack: "Dictionary or Brute force",
            typical_uses: "Windows authentication",
            est_speed: "500K-1M passwords/sec",
        },
        HashType::Bcrypt => HashInfo {
            name: "Bcrypt",
            speed: "Very Slow",
            security: "Very Strong",
            crackable: "Very Hard",
            recommended_attack: "Dictionary only (brute force impractical)",
            typical_uses: "Modern web applications, password storage",
            est_speed: "50-200 passwords/sec",
        },
        HashType::Sha256Crypt => HashInfo {
            name: "SHA-256 Crypt",
            speed: "Slow",
            security: "Strong",
            crackable: "Hard",
            recommended_attack: "Dictionary only",
            typical_uses: "Unix/Linux systems",
            est_speed: "1K-5K passwords/sec",
        },
        HashType::Sha512Crypt => HashInfo {
            name: "SHA-512 Crypt",
            speed: "Slow",
            security: "Strong",
            crackable: "Hard",
            recommended_attack: "Dictionary only",
            typical_uses: "Unix/Linux systems",
            est_speed: "500-2K passwords/sec",
        },
        HashType::Md5Crypt => HashInfo {
            name: "MD5 Crypt",
            speed: "Moderate",
            security: "Moderate",
            crackable: "Moderate",
            recommended_attack: "Dictionary first",
            typical_uses: "Legacy Unix systems",
            est_speed: "10K-50K passwords/sec",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_requires_manual_selection() {
        assert_eq!(hash_info(None).recommended_attack, "Manual selection required");
    }

    #[test]
    fn every_type_has_a_named_entry() {
        for t in HashType::ALL {
            assert_ne!(hash_info(Some(t)).name, "Unknown");
        }
    }
}

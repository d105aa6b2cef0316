//! French stopword list used by the text analyzer.

use lazy_static::lazy_static;
use std::collections::HashSet;

const STOPWORDS_FR: &[&str] = &[
    "a", "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "et", "eux",
    "il", "je", "la", "le", "les", "leur", "lui", "ma", "mais", "me", "meme", "mes", "moi", "mon",
    "ne", "nos", "notre", "nous", "on", "ou", "par", "pas", "pour", "qu", "que", "qui", "sa", "se",
    "ses", "son", "sur", "ta", "te", "tes", "toi", "ton", "tu", "un", "une", "vos", "votre",
    "vous", "c", "d", "j", "l", "n", "s", "t", "y", "ete", "etre", "fait", "ca", "ici", "est",
    "sont", "etait", "etaient", "ai", "as", "avons", "avez", "ont", "avais", "avait", "avions",
    "aviez", "avaient", "aurai", "auras", "aura", "aurons", "aurez", "auront", "suis", "es",
    "sommes", "etes", "serai", "seras", "sera", "serons", "serez", "seront", "ceci", "cela",
    "cet", "cette", "celui", "celle", "ceux", "celles", "plus", "moins", "tres", "comme", "donc",
    "ainsi", "alors", "car",
];

lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = STOPWORDS_FR.iter().copied().collect();
}

/// Whether a normalized (lowercase, diacritics-free) token is a stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_stopwords() {
        assert!(is_stopword("le"));
        assert!(is_stopword("et"));
        assert!(is_stopword("tres"));
        assert!(!is_stopword("chat"));
        assert!(!is_stopword("peinture"));
    }
}

use crate::game::error::PuzzleError;

/// A puzzle word: the form shown to the player and the form hidden in the grid.
///
/// The canonical form keeps letters only, uppercased, with Portuguese accents
/// folded away so every grid cell stays within `A..=Z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub display: String,
    pub canonical: String,
}

impl WordEntry {
    pub fn new(raw: &str) -> Result<Self, PuzzleError> {
        let display = raw.trim();
        let mut canonical = String::with_capacity(display.len());
        for c in display.chars().filter(|c| c.is_alphabetic()) {
            for upper in c.to_uppercase() {
                let folded = fold_accent(upper);
                if !folded.is_ascii_uppercase() {
                    return Err(PuzzleError::InvalidWord(raw.to_string()));
                }
                canonical.push(folded);
            }
        }

        if canonical.is_empty() {
            return Err(PuzzleError::InvalidWord(raw.to_string()));
        }

        Ok(Self {
            display: display.to_string(),
            canonical,
        })
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.canonical.eq_ignore_ascii_case(candidate)
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        'Ñ' => 'N',
        other => other,
    }
}

/// Drops later entries whose canonical form repeats an earlier one.
pub fn dedup_words(words: Vec<WordEntry>) -> Vec<WordEntry> {
    let mut seen = std::collections::HashSet::new();
    words
        .into_iter()
        .filter(|word| seen.insert(word.canonical.clone()))
        .collect()
}

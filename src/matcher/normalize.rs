use crate::matcher::types::IngredientSet;

/// Characters that always separate two ingredients: the ASCII comma and
/// the Arabic-script comma used in Persian text.
const SEPARATORS: &[char] = &[',', '\u{060C}'];

/// Connective words that separate ingredients when they stand alone
/// between whitespace ("egg and salt", "تخم مرغ و نمک").
const CONNECTIVES: &[&str] = &["and", "\u{0648}"];

/// Turn free-text user input into a canonical ingredient set.
///
/// - Splits on commas (`,` and `،`) and on standalone connectives (`and`, `و`)
/// - Trims each piece, collapses inner whitespace, lower-cases it
/// - Drops empty pieces and duplicates
///
/// Never fails: empty or garbage input yields an empty set.
pub fn normalize(text: &str) -> IngredientSet {
    let mut set = IngredientSet::new();

    for piece in text.split(SEPARATORS) {
        for token in split_connectives(piece) {
            set.insert(&token);
        }
    }

    set
}

/// Canonical form of a single ingredient token, or `None` if it is blank.
///
/// Recipe ingredients go through the same function, so "equal" means the
/// same thing on both sides of an overlap.
pub fn canonical_token(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.to_lowercase())
    }
}

/// Split a comma-free piece on standalone connective words.
fn split_connectives(piece: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in piece.split_whitespace() {
        if is_connective(word) {
            if !current.is_empty() {
                tokens.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(word);
        }
    }

    if !current.is_empty() {
        tokens.push(current.join(" "));
    }

    tokens
}

fn is_connective(word: &str) -> bool {
    CONNECTIVES.iter().any(|c| word.eq_ignore_ascii_case(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        normalize(text).iter().map(str::to_owned).collect()
    }

    #[test]
    fn normalize_splits_commas_and_connective() {
        let set = normalize("Egg, Tomato and  Salt ");
        assert_eq!(set.len(), 3);
        assert!(set.contains("egg"));
        assert!(set.contains("tomato"));
        assert!(set.contains("salt"));
    }

    #[test]
    fn normalize_empty_input_is_empty() {
        assert!(normalize("").is_empty());
        assert!(normalize("   ").is_empty());
        assert!(normalize(", ,,").is_empty());
    }

    #[test]
    fn normalize_deduplicates_case_variants() {
        assert_eq!(tokens("salt, SALT, Salt and salt"), vec!["salt"]);
    }

    #[test]
    fn normalize_keeps_multi_word_ingredients() {
        assert_eq!(
            tokens("green   pepper, olive oil"),
            vec!["green pepper", "olive oil"]
        );
    }

    #[test]
    fn normalize_connective_is_case_insensitive() {
        assert_eq!(tokens("rice AND beans"), vec!["beans", "rice"]);
    }

    #[test]
    fn normalize_does_not_split_inside_words() {
        // "and" only separates when it stands alone.
        assert_eq!(tokens("candy, sandwich bread"), vec!["candy", "sandwich bread"]);
    }

    #[test]
    fn normalize_handles_persian_separators() {
        let set = normalize("تخم مرغ، گوجه و نمک");
        assert_eq!(set.len(), 3);
        assert!(set.contains("تخم مرغ"));
        assert!(set.contains("گوجه"));
        assert!(set.contains("نمک"));
    }

    #[test]
    fn normalize_drops_dangling_connectives() {
        assert_eq!(tokens("and egg and"), vec!["egg"]);
    }

    #[test]
    fn normalize_is_idempotent_on_its_text_form() {
        let inputs = [
            "Egg, Tomato and  Salt ",
            "olive oil،  Garlic و lemon",
            "",
            "a, b and c, C",
        ];
        for input in inputs {
            let once = normalize(input);
            let twice = normalize(&once.to_text());
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn canonical_token_collapses_and_lowercases() {
        assert_eq!(canonical_token("  Olive \t Oil "), Some("olive oil".into()));
        assert_eq!(canonical_token(" \n "), None);
    }
}

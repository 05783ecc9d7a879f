use crate::error::AppError;

pub const MAX_CHIRP_LENGTH: usize = 140;

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const CENSOR: &str = "****";

/// Enforces the length limit and masks profane words.
///
/// Only whitespace-separated words are matched, so `Sharbert!` survives
/// while `Sharbert` does not.
pub fn clean_body(body: &str) -> Result<String, AppError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(AppError::ValidationError("Chirp is too long".into()));
    }

    let mut cleaned = String::with_capacity(body.len());
    for piece in body.split_inclusive(char::is_whitespace) {
        let word = piece.trim_end_matches(char::is_whitespace);
        if PROFANE_WORDS.contains(&word.to_lowercase().as_str()) {
            cleaned.push_str(CENSOR);
        } else {
            cleaned.push_str(word);
        }
        cleaned.push_str(&piece[word.len()..]);
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profanity_is_masked() {
        assert_eq!(
            clean_body("I had something interesting for breakfast kerfuffle").unwrap(),
            "I had something interesting for breakfast ****"
        );
        assert_eq!(clean_body("Fornax and SHARBERT").unwrap(), "**** and ****");
    }

    #[test]
    fn test_any_whitespace_separates_words() {
        assert_eq!(
            clean_body("kerfuffle\tsharbert\nfornax  done").unwrap(),
            "****\t****\n****  done"
        );
        assert_eq!(clean_body(" leading and trailing fornax ").unwrap(), " leading and trailing **** ");
    }

    #[test]
    fn test_punctuation_is_not_a_match() {
        assert_eq!(clean_body("I hear Mastodon is better than Chirpy. sharbert!").unwrap(),
            "I hear Mastodon is better than Chirpy. sharbert!");
    }

    #[test]
    fn test_length_limit() {
        assert!(clean_body(&"a".repeat(MAX_CHIRP_LENGTH)).is_ok());
        assert!(matches!(
            clean_body(&"a".repeat(MAX_CHIRP_LENGTH + 1)),
            Err(AppError::ValidationError(_))
        ));
    }
}

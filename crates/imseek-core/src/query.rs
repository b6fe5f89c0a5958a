//! Query buffer editing

/// Append a term to the query buffer, inserting a separating space only
/// when the buffer does not already end in whitespace. Existing content is
/// never dropped.
pub fn append_term(buffer: &str, term: &str) -> String {
    let needs_space = !buffer.is_empty() && !buffer.ends_with(char::is_whitespace);
    if needs_space {
        format!("{buffer} {term}")
    } else {
        format!("{buffer}{term}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_with_separating_space() {
        assert_eq!(append_term("memory", "attention"), "memory attention");
    }

    #[test]
    fn no_extra_space_after_trailing_whitespace() {
        assert_eq!(append_term("memory ", "attention"), "memory attention");
    }

    #[test]
    fn empty_buffer_takes_term_verbatim() {
        assert_eq!(append_term("", "memory consolidation"), "memory consolidation");
    }
}

//! Content normalization pipeline.
//!
//! The export interleaves markdown with HTML fragments and doubled LaTeX
//! escapes. [`normalize`] rewrites all of that in a fixed order; the order
//! matters because later steps rely on earlier ones having already collapsed
//! certain patterns (stray-backslash removal must run after doubled
//! backslashes were folded, or genuine commands would be destroyed).

use regex::Regex;

/// HTML entities replaced by their literal characters.
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&nbsp;", " "),
];

/// Simple inline tags removed by literal substitution.
const INLINE_TAGS: &[&str] = &[
    "<b>", "</b>", "<strong>", "</strong>", "<i>", "</i>", "<em>", "</em>",
    "<u>", "</u>", "<s>", "</s>", "<strike>", "</strike>", "<del>", "</del>",
    "<code>", "</code>", "<mark>", "</mark>", "<br>", "<br/>", "<br />",
];

/// LaTeX control sequences removed outright (matched case-insensitively).
const LATEX_REMOVALS: &[&str] = &[r"\\newpage", r"\\pagebreak"];

/// Normalize note content for the target format.
///
/// Deterministic and total: unrecognized input passes through unchanged,
/// and `normalize(normalize(x)) == normalize(x)` for note texts.
pub fn normalize(text: &str) -> String {
    let mut text = text.to_string();

    // 1. HTML entities
    for (entity, literal) in ENTITIES {
        text = text.replace(entity, literal);
    }

    // 2. Simple inline tags, tag by tag
    for tag in INLINE_TAGS {
        text = text.replace(tag, "");
    }

    // 3. Anything else still shaped like a tag
    let tag_re = Regex::new(r"(?i)<[^>]+>").unwrap();
    text = tag_re.replace_all(&text, "").to_string();

    // 4. LaTeX control sequences
    for pattern in LATEX_REMOVALS {
        let re = Regex::new(&format!("(?i){}", pattern)).unwrap();
        text = re.replace_all(&text, "").to_string();
    }

    // 5. Doubled backslashes
    text = text.replace("\\\\", "\\");

    // 6. Doubled dollar signs
    text = text.replace("$$", "$");

    // 7. Trim whitespace inside closed inline math spans
    text = trim_math_spans(&text);

    // 8. Drop any remaining backslash not starting a command.
    //    Runs last so that commands surviving step 5 are kept.
    let stray_re = Regex::new(r"\\($|[^A-Za-z%=])").unwrap();
    text = stray_re.replace_all(&text, "$1").to_string();

    text
}

/// Trim leading/trailing whitespace inside every `$...$` span.
///
/// Spans alternate with surrounding text when splitting on `$`; an
/// unterminated trailing span (odd number of dollar signs) is left as-is.
fn trim_math_spans(text: &str) -> String {
    let parts: Vec<&str> = text.split('$').collect();
    if parts.len() < 3 {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push('$');
        }
        if i % 2 == 1 && i + 1 < parts.len() {
            out.push_str(part.trim());
        } else {
            out.push_str(part);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities() {
        assert_eq!(normalize("5 &lt; 7 &amp; x"), "5 < 7 & x");
        assert_eq!(normalize("d&nbsp;e"), "d e");
    }

    #[test]
    fn test_inline_tags_removed() {
        let text = "<strong>c</strong> d&nbsp;e<br>f";
        assert_eq!(normalize(text), "c d ef");
    }

    #[test]
    fn test_decoded_entities_feed_tag_removal() {
        // &lt;b&gt; decodes to a literal <b>, which the tag passes then drop
        assert_eq!(normalize("a &lt;b&gt; c"), "a  c");
    }

    #[test]
    fn test_generic_tag_strip() {
        assert_eq!(normalize("x <SPAN class=\"y\">z</SPAN>"), "x z");
    }

    #[test]
    fn test_br_variants_removed() {
        let text = "a<br>b<br/>c<br />d";
        let out = normalize(text);
        assert!(!out.contains("<br>"));
        assert!(!out.contains("<br/>"));
        assert!(!out.contains("<br />"));
    }

    #[test]
    fn test_latex_removals_case_insensitive() {
        assert_eq!(normalize("a \\newpage b \\NewPage c"), "a  b  c");
    }

    #[test]
    fn test_math_span_collapse() {
        assert_eq!(normalize("Energy $$ E=mc^2 $$ rest"), "Energy $E=mc^2$ rest");
    }

    #[test]
    fn test_unterminated_span_untouched() {
        assert_eq!(normalize("cost: $ 5 and more"), "cost: $ 5 and more");
    }

    #[test]
    fn test_doubled_backslash_before_letter_kept() {
        assert_eq!(normalize("value\\\\to 5"), "value\\to 5");
    }

    #[test]
    fn test_stray_backslash_removed() {
        assert_eq!(normalize("end.\\\\ "), "end. ");
        assert_eq!(normalize("50\\% kept"), "50\\% kept");
        assert_eq!(normalize("a\\=b kept"), "a\\=b kept");
        assert_eq!(normalize("trailing\\"), "trailing");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Energy $$ E=mc^2 $$ rest",
            "a &lt;b&gt; <em>c</em>",
            "value\\\\to 5 end.\\\\ ",
            "plain text, nothing special",
            "$a$ mid $ b $ tail",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}

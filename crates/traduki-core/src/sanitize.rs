//! Model-output sanitization.

use regex::Regex;

/// Strip a single optional code-fence block wrapping the whole input.
///
/// Contract: when the trimmed input starts with a ```` ``` ```` line
/// (optionally carrying an info string such as `python`) and ends with a
/// closing ```` ``` ````, the inner content is returned. Otherwise the input
/// comes back unchanged apart from surrounding whitespace. Fences in the
/// middle of the content are never touched.
pub fn strip_code_fence(content: &str) -> String {
    let trimmed = content.trim();

    let re = Regex::new(r"^```[A-Za-z0-9_+#.-]*\r?\n([\s\S]*?)\r?\n?```$").unwrap();
    if let Some(captures) = re.captures(trimmed) {
        if let Some(inner) = captures.get(1) {
            return inner.as_str().trim().to_string();
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(strip_code_fence("print('hi')"), "print('hi')");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(strip_code_fence("  print('hi')\n"), "print('hi')");
    }

    #[test]
    fn test_bare_fence_is_stripped() {
        assert_eq!(strip_code_fence("```\nprint('hi')\n```"), "print('hi')");
    }

    #[test]
    fn test_fence_with_language_tag_is_stripped() {
        assert_eq!(
            strip_code_fence("```python\nimport pandas as pd\n```"),
            "import pandas as pd"
        );
    }

    #[test]
    fn test_multiline_body_is_preserved() {
        let input = "```python\nimport pandas as pd\n\ndf = pd.read_csv('data.csv')\n```";
        assert_eq!(
            strip_code_fence(input),
            "import pandas as pd\n\ndf = pd.read_csv('data.csv')"
        );
    }

    #[test]
    fn test_inner_fences_survive() {
        let input = "```markdown\nUse a block:\n```python\nx = 1\n```\n```";
        // Outer fence goes, the embedded one stays intact.
        let stripped = strip_code_fence(input);
        assert!(stripped.starts_with("Use a block:"));
        assert!(stripped.contains("```python"));
    }

    #[test]
    fn test_prose_around_fence_is_not_extracted() {
        // Only a fence spanning the whole payload is stripped.
        let input = "Here is the code:\n```python\nx = 1\n```";
        assert_eq!(strip_code_fence(input), input);
    }

    #[test]
    fn test_unterminated_fence_is_left_alone() {
        let input = "```python\nx = 1";
        assert_eq!(strip_code_fence(input), input);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(strip_code_fence(""), "");
    }

    #[test]
    fn test_json_fence() {
        assert_eq!(
            strip_code_fence("```json\n{\"valid\": true}\n```"),
            "{\"valid\": true}"
        );
    }
}

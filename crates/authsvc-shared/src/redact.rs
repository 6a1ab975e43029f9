//! PII redaction for log messages.
//!
//! Messages are expected in the `key=value<sep>key=value<sep>` shape. A
//! field only matches at the start of the message, right after a
//! separator or after whitespace, so `old_password=` is not touched by a
//! `password` rule.

use regex::Regex;

/// Pre-compiled redaction rule for a fixed set of field names.
#[derive(Debug, Clone)]
pub struct Redactor {
    pattern: Option<Regex>,
    replacement: String,
    separator: String,
}

impl Redactor {
    pub fn new<S: AsRef<str>>(
        fields: &[S],
        replacement: &str,
        separator: &str,
    ) -> Result<Self, regex::Error> {
        let alternation = fields
            .iter()
            .map(AsRef::as_ref)
            .filter(|f| !f.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        let pattern = if alternation.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("(?:{})=", alternation))?)
        };

        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
            separator: separator.to_string(),
        })
    }

    /// Replaces every configured field value with the replacement string.
    pub fn redact(&self, message: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return message.to_string();
        };

        let mut out = String::with_capacity(message.len());
        let mut cursor = 0;

        for m in pattern.find_iter(message) {
            if m.start() < cursor || !self.at_boundary(message, m.start()) {
                continue;
            }
            let value_start = m.end();
            let value_end = self.value_end(message, value_start);

            out.push_str(&message[cursor..value_start]);
            out.push_str(&self.replacement);
            cursor = value_end;
        }

        out.push_str(&message[cursor..]);
        out
    }

    fn at_boundary(&self, message: &str, pos: usize) -> bool {
        let before = &message[..pos];
        pos == 0
            || before.ends_with(self.separator.as_str())
            || before.ends_with(char::is_whitespace)
    }

    fn value_end(&self, message: &str, value_start: usize) -> usize {
        if self.separator.is_empty() {
            return message.len();
        }
        message[value_start..]
            .find(self.separator.as_str())
            .map_or(message.len(), |offset| value_start + offset)
    }
}

/// Obfuscates the values of `fields` in `message`.
///
/// If the field set cannot be compiled the whole message is replaced, so
/// a bad rule never leaks the original text.
pub fn redact<S: AsRef<str>>(
    fields: &[S],
    replacement: &str,
    message: &str,
    separator: &str,
) -> String {
    match Redactor::new(fields, replacement, separator) {
        Ok(redactor) => redactor.redact(message),
        Err(e) => {
            tracing::warn!("Redaction pattern rejected, masking whole message: {}", e);
            replacement.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_canonical_sample() {
        let fields = ["password", "date_of_birth"];
        let message = "name=egg;email=eggmin@eggsample.com;password=eggcellent;date_of_birth=12/12/1986;";

        assert_eq!(
            redact(&fields, "xxx", message, ";"),
            "name=egg;email=eggmin@eggsample.com;password=xxx;date_of_birth=xxx;"
        );
    }

    #[test]
    fn test_redact_last_field_without_trailing_separator() {
        let out = redact(&["password"], "***", "name=bob;password=bobbycool", ";");
        assert_eq!(out, "name=bob;password=***");
    }

    #[test]
    fn test_redact_honours_separator() {
        let out = redact(&["email", "ssn"], "***", "email=a@b.c|ssn=123-45|ip=1.2.3.4", "|");
        assert_eq!(out, "email=***|ssn=***|ip=1.2.3.4");
    }

    #[test]
    fn test_redact_ignores_fields_not_at_boundary() {
        let out = redact(&["password"], "***", "old_password=keep;password=drop;", ";");
        assert_eq!(out, "old_password=keep;password=***;");
    }

    #[test]
    fn test_redact_after_whitespace() {
        let out = redact(&["email"], "***", "INFO user_data: name=a; email=a@b.c; ip=1", ";");
        assert_eq!(out, "INFO user_data: name=a; email=***; ip=1");
    }

    #[test]
    fn test_redact_repeated_field() {
        let out = redact(&["name"], "x", "name=a;name=b;", ";");
        assert_eq!(out, "name=x;name=x;");
    }

    #[test]
    fn test_redact_escapes_field_names() {
        let out = redact(&["a.b"], "x", "a.b=1;azb=2;", ";");
        assert_eq!(out, "a.b=x;azb=2;");
    }

    #[test]
    fn test_redact_no_fields_is_identity() {
        let fields: [&str; 0] = [];
        assert_eq!(redact(&fields, "x", "password=1;", ";"), "password=1;");
    }

    #[test]
    fn test_overlapping_field_names() {
        let redactor = Redactor::new(&["pass", "password"], "x", ";").unwrap();
        assert_eq!(redactor.redact("password=1;pass=2;"), "password=x;pass=x;");
    }
}

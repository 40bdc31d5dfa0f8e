use std::sync::OnceLock;

use regex::Regex;

use super::message::{MailMessage, MessageKey, OutboundEmail};

/// Conventional plain-text mail width, leaving room for the soft-break space.
pub const MAIL_LINE_WIDTH: usize = 77;

fn line_break_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<br\s*/?>\n?").expect("line break pattern compiles"))
}

fn block_end_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)</(p|div|li|h[1-6]|tr)\s*>").expect("block pattern compiles")
    })
}

fn any_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)</?(a|abbr|b|blockquote|br|code|div|em|h[1-6]|hr|i|li|ol|p|pre|small|span|strong|sub|sup|table|tbody|td|th|thead|tr|u|ul)\b[^>]*>",
        )
        .expect("tag pattern compiles")
    })
}

/// Joins body lines with a blank line between each, flattens markup for the
/// submission flow, and soft-wraps the result.
pub fn format_message(message: &MailMessage) -> OutboundEmail {
    let joined = message.body.join("\n\n");
    let text = match message.key {
        MessageKey::JobApplication => html_to_text(&joined),
        MessageKey::QueuedNotification => joined,
    };

    OutboundEmail {
        from: message.from.clone(),
        to: message.to.clone(),
        subject: message.subject.clone(),
        body: wrap_mail(&text, MAIL_LINE_WIDTH),
    }
}

/// Converts line-break and block markup to newlines, drops other HTML element
/// tags, and decodes the common entities. Angle-bracketed text that is not an
/// element name is left alone.
pub fn html_to_text(html: &str) -> String {
    let text = line_break_tag().replace_all(html, "\n");
    let text = block_end_tag().replace_all(&text, "\n");
    let text = any_tag().replace_all(&text, "");
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Greedy word wrap that keeps the original spacing. The space a line is broken
/// at stays at its end so readers can reflow the text; words longer than `width`
/// are left intact on their own line.
pub fn wrap_mail(text: &str, width: usize) -> String {
    let mut wrapped = Vec::new();
    for line in text.split('\n') {
        let mut rest: Vec<char> = line.chars().collect();
        while rest.len() > width {
            let within = rest[1..=width]
                .iter()
                .rposition(|c| *c == ' ')
                .map(|index| index + 1);
            let beyond = || {
                rest[width + 1..]
                    .iter()
                    .position(|c| *c == ' ')
                    .map(|index| index + width + 1)
            };
            let Some(at) = within.or_else(beyond) else {
                break;
            };
            wrapped.push(rest.drain(..=at).collect::<String>());
        }
        wrapped.push(rest.into_iter().collect());
    }
    wrapped.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(key: MessageKey, body: Vec<&str>) -> MailMessage {
        MailMessage {
            key,
            from: "applicant@example.com".to_string(),
            to: "admin@example.com".to_string(),
            subject: "Job Application".to_string(),
            body: body.into_iter().map(str::to_string).collect(),
        }
    }

    #[test]
    fn body_lines_are_separated_by_blank_lines() {
        let email = format_message(&message(
            MessageKey::JobApplication,
            vec!["Name: Ada", "Email: ada@example.com"],
        ));
        assert_eq!(email.body, "Name: Ada\n\nEmail: ada@example.com");
        assert_eq!(email.subject, "Job Application");
        assert_eq!(email.to, "admin@example.com");
    }

    #[test]
    fn markup_is_flattened_for_submissions() {
        let email = format_message(&message(
            MessageKey::JobApplication,
            vec!["Message: first<br />\nsecond <b>bold</b> &amp; x < y"],
        ));
        assert_eq!(email.body, "Message: first\nsecond bold & x < y");
    }

    #[test]
    fn queued_notifications_keep_their_text() {
        let email = format_message(&message(MessageKey::QueuedNotification, vec!["<kept>"]));
        assert_eq!(email.body, "<kept>");
    }

    #[test]
    fn long_lines_are_soft_wrapped() {
        let line = "word ".repeat(40);
        let wrapped = wrap_mail(line.trim_end(), MAIL_LINE_WIDTH);
        let lines: Vec<&str> = wrapped.lines().collect();
        assert!(lines.len() > 1);
        for broken in &lines[..lines.len() - 1] {
            assert!(broken.ends_with(' '));
            assert!(broken.chars().count() <= MAIL_LINE_WIDTH + 1);
        }
        assert_eq!(wrapped.replace(" \n", " "), line.trim_end());
    }

    #[test]
    fn existing_line_breaks_survive_wrapping() {
        assert_eq!(wrap_mail("line1\nline2", MAIL_LINE_WIDTH), "line1\nline2");
        let long_word = "x".repeat(90);
        assert_eq!(wrap_mail(&long_word, MAIL_LINE_WIDTH), long_word);
    }

    #[test]
    fn wrapping_keeps_indentation_and_inner_spacing() {
        let line = format!("    indented  code   {}", "word ".repeat(20));
        let wrapped = wrap_mail(&line, MAIL_LINE_WIDTH);

        assert!(wrapped.starts_with("    indented  code   word word"));
        assert!(wrapped.lines().count() > 1);
        assert_eq!(wrapped.replace(" \n", " "), line);
    }

    #[test]
    fn angle_brackets_that_are_not_markup_survive() {
        let email = format_message(&message(
            MessageKey::JobApplication,
            vec!["Name: Tom & <Jerry>", "Message: a <b>bold</b> claim"],
        ));
        assert_eq!(email.body, "Name: Tom & <Jerry>\n\nMessage: a bold claim");
    }
}

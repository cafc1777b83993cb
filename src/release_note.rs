// ABOUTME: Release notes attached to builds.
// ABOUTME: Notes come from repeated -m flags or from an editor buffer.

/// Line separating the note from the editor instructions.
pub const RELEASE_NOTE_MARKER: &str = "# Add release note:";

/// Initial editor buffer.
pub fn editor_template() -> String {
    format!("\n{RELEASE_NOTE_MARKER}\n")
}

/// Note from an editor buffer: the text above the marker, right-trimmed.
///
/// An aborted edit (`None`) or a whitespace-only note yields `""`.
pub fn from_editor(buffer: Option<&str>) -> String {
    let Some(buffer) = buffer else {
        return String::new();
    };
    let note = match buffer.find(RELEASE_NOTE_MARKER) {
        Some(index) => &buffer[..index],
        None => buffer,
    };
    normalize(note)
}

/// Note from `-m` values, one line each.
pub fn from_messages(messages: &[String]) -> String {
    normalize(&messages.join("\n"))
}

fn normalize(note: &str) -> String {
    let note = note.trim_end();
    if note.trim().is_empty() {
        String::new()
    } else {
        note.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_text_above_marker_is_kept() {
        let buffer = format!("Fix login\nBump deps\n\n{RELEASE_NOTE_MARKER}\n");
        assert_eq!(from_editor(Some(&buffer)), "Fix login\nBump deps");
    }

    #[test]
    fn untouched_template_gives_empty_note() {
        assert_eq!(from_editor(Some(&editor_template())), "");
        assert_eq!(from_editor(None), "");
    }

    #[test]
    fn buffer_without_marker_is_used_whole() {
        assert_eq!(from_editor(Some("  hotfix  \n")), "  hotfix");
    }

    #[test]
    fn messages_are_joined_by_newline() {
        let messages = vec!["first".to_string(), "second".to_string()];
        assert_eq!(from_messages(&messages), "first\nsecond");
        assert_eq!(from_messages(&["   ".to_string()]), "");
    }
}

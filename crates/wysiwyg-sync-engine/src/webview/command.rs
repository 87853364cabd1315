use super::escape::script_string;

/// Formatting and insertion commands a toolbar sends to the editor page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// Remove formatting from the selection.
    Clear,
    Undo,
    Redo,
    Bold,
    Italic,
    Underline,
    Subscript,
    Superscript,
    Strikethrough,
    /// CSS color, e.g. `#ff0000`.
    TextColor(String),
    TextBackgroundColor(String),
    /// Heading level 1 to 6.
    Header(u8),
    Indent,
    Outdent,
    OrderedList,
    UnorderedList,
    AlignLeft,
    AlignCenter,
    AlignRight,
    InsertImage { url: String, alt: String },
    InsertVideo { url: String },
    InsertLink { href: String, title: String },
    InsertTable { rows: u32, columns: u32 },
    /// Ask the page to report `action/<name>` back to the host.
    Custom(String),
}

impl EditorCommand {
    /// The script that runs this command in the page.
    pub fn script(&self) -> String {
        match self {
            EditorCommand::Clear => "RE.removeFormat();".to_string(),
            EditorCommand::Undo => "RE.undo();".to_string(),
            EditorCommand::Redo => "RE.redo();".to_string(),
            EditorCommand::Bold => "RE.setBold();".to_string(),
            EditorCommand::Italic => "RE.setItalic();".to_string(),
            EditorCommand::Underline => "RE.setUnderline();".to_string(),
            EditorCommand::Subscript => "RE.setSubscript();".to_string(),
            EditorCommand::Superscript => "RE.setSuperscript();".to_string(),
            EditorCommand::Strikethrough => "RE.setStrikeThrough();".to_string(),
            EditorCommand::TextColor(color) => {
                format!("RE.prepareInsert(); RE.setTextColor('{}');", script_string(color))
            }
            EditorCommand::TextBackgroundColor(color) => format!(
                "RE.prepareInsert(); RE.setTextBackgroundColor('{}');",
                script_string(color)
            ),
            EditorCommand::Header(level) => format!("RE.setHeading('{}');", (*level).clamp(1, 6)),
            EditorCommand::Indent => "RE.setIndent();".to_string(),
            EditorCommand::Outdent => "RE.setOutdent();".to_string(),
            EditorCommand::OrderedList => "RE.setOrderedList();".to_string(),
            EditorCommand::UnorderedList => "RE.setUnorderedList();".to_string(),
            EditorCommand::AlignLeft => "RE.setJustifyLeft();".to_string(),
            EditorCommand::AlignCenter => "RE.setJustifyCenter();".to_string(),
            EditorCommand::AlignRight => "RE.setJustifyRight();".to_string(),
            EditorCommand::InsertImage { url, alt } => format!(
                "RE.prepareInsert(); RE.insertImage('{}', '{}');",
                script_string(url),
                script_string(alt)
            ),
            EditorCommand::InsertVideo { url } => format!(
                "RE.prepareInsert(); RE.insertVideo('{}');",
                script_string(url)
            ),
            EditorCommand::InsertLink { href, title } => format!(
                "RE.prepareInsert(); RE.insertLink('{}', '{}');",
                script_string(href),
                script_string(title)
            ),
            EditorCommand::InsertTable { rows, columns } => {
                format!("RE.prepareInsert(); RE.insertTable({rows}, {columns});")
            }
            EditorCommand::Custom(name) => {
                format!("RE.customAction('{}');", script_string(name))
            }
        }
    }
}

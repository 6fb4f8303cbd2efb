use retro_core::Key;

/// Keys named inside angle brackets, e.g. `<up>` or `<C-x>`.
fn named_key(name: &str) -> Option<Key> {
    let key = match name.to_ascii_lowercase().as_str() {
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "enter" | "cr" => Key::Enter,
        "esc" => Key::Escape,
        "tab" => Key::Tab,
        "bs" => Key::Backspace,
        other => {
            let letter = other.strip_prefix("c-")?;
            let mut chars = letter.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => Key::Ctrl(c),
                _ => return None,
            }
        },
    };
    Some(key)
}

/// Parse one line of key notation. Unknown `<...>` groups are typed
/// literally.
pub fn parse_keys(line: &str) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut rest = line;
    while let Some(c) = rest.chars().next() {
        if c == '<'
            && let Some(end) = rest.find('>')
            && let Some(key) = named_key(&rest[1..end])
        {
            keys.push(key);
            rest = &rest[end + 1..];
            continue;
        }
        keys.push(Key::Char(c));
        rest = &rest[c.len_utf8()..];
    }
    keys
}

/// Keys for a line typed while the editor is open. Enter follows unless
/// the line ends in a named key.
pub fn editor_keys(line: &str) -> Vec<Key> {
    let mut keys = parse_keys(line);
    if !line.ends_with('>') {
        keys.push(Key::Enter);
    }
    keys
}

/// What a line at the shell prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction<'a> {
    Submit(&'a str),
    /// Tab completion of the text before the tab.
    Complete(&'a str),
    /// Raw keys, for sequences such as the konami code.
    Keys(Vec<Key>),
}

pub fn classify(line: &str) -> LineAction<'_> {
    if let Some(partial) = line.strip_suffix('\t') {
        LineAction::Complete(partial)
    } else if line.starts_with('<') {
        LineAction::Keys(parse_keys(line))
    } else {
        LineAction::Submit(line)
    }
}

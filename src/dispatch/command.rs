use crate::filters::{Filter, DEFAULT_BLUR_LEVEL};

/// What a photo caption asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run these filters in order on the attached photo.
    Transform(&'static [Filter]),
    /// Keep the photo as the left half of a concatenation; the next photo
    /// sent without a caption becomes the right half.
    ConcatFirst,
}

#[derive(Clone, Copy, Debug)]
pub struct CommandSpec {
    pub caption: &'static str,
    pub command: Command,
}

/// Caption → command table. Captions are matched after trimming and
/// lower-casing.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        caption: "blur",
        command: Command::Transform(&[Filter::Blur { level: DEFAULT_BLUR_LEVEL }]),
    },
    CommandSpec {
        caption: "contour",
        command: Command::Transform(&[Filter::Contour]),
    },
    CommandSpec {
        caption: "rotate",
        command: Command::Transform(&[Filter::Rotate]),
    },
    CommandSpec {
        caption: "rotate2",
        command: Command::Transform(&[Filter::Rotate, Filter::Rotate]),
    },
    CommandSpec {
        caption: "segment",
        command: Command::Transform(&[Filter::Segment]),
    },
    CommandSpec {
        caption: "salt and pepper",
        command: Command::Transform(&[Filter::SaltAndPepper]),
    },
    CommandSpec {
        caption: "flip horizontal",
        command: Command::Transform(&[Filter::FlipHorizontal]),
    },
    CommandSpec {
        caption: "concat",
        command: Command::ConcatFirst,
    },
];

pub fn parse_caption(caption: &str) -> Option<Command> {
    let normalized = caption.trim().to_lowercase();
    COMMANDS
        .iter()
        .find(|spec| spec.caption == normalized)
        .map(|spec| spec.command)
}

/// Reply sent for an unrecognized caption.
pub fn unknown_command_text() -> String {
    let names: Vec<String> = COMMANDS.iter().map(|spec| capitalize(spec.caption)).collect();
    format!("Unknown command. Please use one of the following: {}", names.join(", "))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captions_are_case_insensitive() {
        assert_eq!(parse_caption("Blur"), parse_caption("blur"));
        assert_eq!(parse_caption(" SALT AND PEPPER "), Some(Command::Transform(&[Filter::SaltAndPepper])));
    }

    #[test]
    fn rotate2_is_two_quarter_turns() {
        assert_eq!(
            parse_caption("rotate2"),
            Some(Command::Transform(&[Filter::Rotate, Filter::Rotate]))
        );
    }

    #[test]
    fn concat_defers() {
        assert_eq!(parse_caption("concat"), Some(Command::ConcatFirst));
    }

    #[test]
    fn unknown_caption() {
        assert_eq!(parse_caption("sharpen"), None);
    }

    #[test]
    fn help_lists_every_caption() {
        let text = unknown_command_text();
        assert!(text.starts_with("Unknown command."));
        assert!(text.contains("Salt and pepper"));
        assert!(text.contains("Flip horizontal"));
        assert!(text.ends_with("Concat"));
    }
}

use std::str::FromStr;
use thiserror::Error;

/// A command typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Search(String),
    Play(u32),
    Previous,
    Home,
    Pause,
    Resume,
    /// Seek the clock to an absolute position in seconds
    Seek(f64),
    /// Jump to a lyric line, numbered from 1 as displayed
    Line(usize),
    Lyrics,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (type `help` for a list)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: String },
}

pub const HELP: &str = "\
Commands:
  list              show all songs
  search <query>    find songs by title or artist
  play <id>         play a song
  prev              go back to the previous song
  home              stop and clear the current song
  pause | resume    control playback
  seek <seconds>    move playback to a position
  line <n>          jump to lyric line n
  lyrics            show the full lyrics
  status            show what is playing
  quit              exit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let (name, rest) = input
            .split_once(char::is_whitespace)
            .map_or((input, ""), |(name, rest)| (name, rest.trim()));

        match name.to_lowercase().as_str() {
            "list" | "ls" => Ok(Self::List),
            "search" | "find" => Ok(Self::Search(rest.to_string())),
            "play" | "p" => parse_arg(rest, "song id", "play <id>").map(Self::Play),
            "prev" | "back" => Ok(Self::Previous),
            "home" | "stop" => Ok(Self::Home),
            "pause" => Ok(Self::Pause),
            "resume" | "unpause" => Ok(Self::Resume),
            "seek" => {
                let seconds: f64 = parse_arg(rest, "position", "seek <seconds>")?;
                if seconds.is_finite() && seconds >= 0.0 {
                    Ok(Self::Seek(seconds))
                } else {
                    Err(CommandError::InvalidArgument {
                        what: "position",
                        value: rest.to_string(),
                    })
                }
            }
            "line" | "l" => {
                let number: usize = parse_arg(rest, "line number", "line <n>")?;
                if number == 0 {
                    return Err(CommandError::InvalidArgument {
                        what: "line number",
                        value: rest.to_string(),
                    });
                }
                Ok(Self::Line(number))
            }
            "lyrics" => Ok(Self::Lyrics),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}

fn parse_arg<T: FromStr>(
    value: &str,
    what: &'static str,
    usage: &'static str,
) -> Result<T, CommandError> {
    if value.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    value.parse().map_err(|_| CommandError::InvalidArgument {
        what,
        value: value.to_string(),
    })
}

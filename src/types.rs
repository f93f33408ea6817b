#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Column separator of the manifest. Never sniffed from the file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Delimiter {
    Comma,
    Tab,
    Semicolon,
    Pipe,
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Semicolon => b';',
            Delimiter::Pipe => b'|',
        }
    }
}

/// Who can see an uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Visibility {
    Public,
    Private,
    Friends,
    Family,
    #[value(name = "friends-and-family")]
    FriendsAndFamily,
}

impl Visibility {
    /// The `(is_public, is_friend, is_family)` flags sent with an upload.
    pub fn flags(&self) -> (bool, bool, bool) {
        match self {
            Visibility::Public => (true, false, false),
            Visibility::Private => (false, false, false),
            Visibility::Friends => (false, true, false),
            Visibility::Family => (false, false, true),
            Visibility::FriendsAndFamily => (false, true, true),
        }
    }
}

use std::convert::From;
use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidInput,
    DateParse,
    Json,
    Config,
    Network,
    Http(u16),
    Render,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(parse_error: chrono::ParseError) -> Error {
        Error::new(
            ErrorKind::DateParse,
            format!("Could not parse date: {}", parse_error).as_str(),
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(json_error: serde_json::Error) -> Error {
        Error::new(ErrorKind::Json, &json_error.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(ErrorKind::Config, &toml_error.to_string())
    }
}

impl From<ureq::Error> for Error {
    fn from(ureq_error: ureq::Error) -> Error {
        match ureq_error {
            ureq::Error::Status(code, response) => Error::new(
                ErrorKind::Http(code),
                &format!("{} returned {}", response.get_url(), response.status_text()),
            ),
            ureq::Error::Transport(transport) => {
                Error::new(ErrorKind::Network, &transport.to_string())
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidInput => "invalid input".to_owned(),
            ErrorKind::DateParse => "invalid date format".to_owned(),
            ErrorKind::Json => "invalid json".to_owned(),
            ErrorKind::Config => "invalid configuration".to_owned(),
            ErrorKind::Network => "network error".to_owned(),
            ErrorKind::Http(code) => format!("HTTP {}", code),
            ErrorKind::Render => "rendering failed".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

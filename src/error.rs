use std::{string, time::SystemTimeError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid params: {0}")]
    Params(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    FromUtf8(#[from] string::FromUtf8Error),
    #[error(transparent)]
    Hex(#[from] hex::FromHexError),
    #[error(transparent)]
    Time(#[from] SystemTimeError),
    #[error(transparent)]
    TimeParse(#[from] time::error::Parse),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 是否为无法抵达服务端的错误（网络、逾时、非 2xx）
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, resp) => {
                let body = resp.into_string().unwrap_or_default();
                Error::Transport(format!("http status {}: {}", code, body))
            }
            ureq::Error::Transport(t) => Error::Transport(t.to_string()),
        }
    }
}

pub type EzpayResult<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn display_prefixes() {
        assert_eq!(
            Error::Transport("timed out".to_owned()).to_string(),
            "transport error: timed out"
        );
        assert_eq!(
            Error::Config("key must be 32 bytes".to_owned()).to_string(),
            "configuration error: key must be 32 bytes"
        );
        assert!(Error::Transport(String::new()).is_transport());
        assert!(!Error::Params(String::new()).is_transport());
    }
}

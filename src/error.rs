use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("unsupported encoding label `{0}`")]
    UnsupportedEncoding(String),

    #[error("invalid value for option `{0}`")]
    InvalidOption(&'static str),

    #[error("malformed {encoding} sequence at byte {offset}")]
    Malformed {
        encoding: &'static str,
        offset: usize,
    },

    #[error(transparent)]
    IOError(#[from] futures_io::Error),
}

pub mod builder;
pub mod codec;
pub mod types;

use std::error::Error;

pub use bytes::{Bytes, BytesMut};
use derive_more::{Constructor, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolErrorKind {
    Types,
    Codec,
    Builder,
    Signing,
    Validation,
}

#[derive(Debug, Constructor, Display)]
#[display(fmt = "[ProtocolError] Kind: {:?} Error: {:?}", kind, error)]
pub struct ProtocolError {
    kind:  ProtocolErrorKind,
    error: Box<dyn Error + Send>,
}

impl ProtocolError {
    pub fn kind(&self) -> ProtocolErrorKind {
        self.kind
    }
}

impl From<ProtocolError> for Box<dyn Error + Send> {
    fn from(error: ProtocolError) -> Self {
        Box::new(error) as Box<dyn Error + Send>
    }
}

impl Error for ProtocolError {}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

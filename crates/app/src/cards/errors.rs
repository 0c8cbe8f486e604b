//! Card rendering errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("payload cannot be encoded as a QR code: {0}")]
    Encode(String),

    #[error("no QR code found in image")]
    NoCode,

    #[error("QR code could not be decoded: {0}")]
    Decode(String),

    #[error("image error")]
    Image(#[from] image::ImageError),

    #[error("failed to build print document: {0}")]
    Pdf(String),

    #[error("nothing to print")]
    Empty,
}

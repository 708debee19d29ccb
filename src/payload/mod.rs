/*! HTTP payload extraction

Turns `response` records into [HttpMessage]s with a decoded text body.
Decoding never fails, see [encoding::decode] for the order in which encodings are tried.
!*/
pub mod encoding;
mod http;

pub use self::encoding::{decode, DecodeQuality, Decoded};
pub use http::HttpMessage;

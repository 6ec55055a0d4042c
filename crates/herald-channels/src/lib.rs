//! # Herald Channels
//! Outbound notification channel implementations.

pub mod kakao;
pub mod slack;
pub mod token;

pub use kakao::KakaoChannel;
pub use slack::SlackChannel;
pub use token::{TokenPair, TokenStore};

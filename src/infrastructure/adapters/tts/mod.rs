//! TTS Adapter - 外部 HTTP TTS 客户端与离线 Fake 实现

mod fake_tts_client;
mod http_tts_client;

pub use fake_tts_client::FakeTtsClient;
pub use http_tts_client::*;

//! 音频负载工具：格式识别与静音 WAV

use serde::{Deserialize, Serialize};

/// 音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Unknown,
}

impl AudioFormat {
    /// 根据文件头识别格式
    pub fn sniff(data: &[u8]) -> Self {
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE" {
            AudioFormat::Wav
        } else if data.starts_with(b"ID3") || (data.len() >= 2 && data[0] == 0xFF && data[1] & 0xE0 == 0xE0) {
            AudioFormat::Mp3
        } else if data.starts_with(b"OggS") {
            AudioFormat::Ogg
        } else {
            AudioFormat::Unknown
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Unknown => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioFormat::Wav => write!(f, "wav"),
            AudioFormat::Mp3 => write!(f, "mp3"),
            AudioFormat::Ogg => write!(f, "ogg"),
            AudioFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// 生成 16-bit 单声道静音 WAV
pub fn silent_wav(duration_ms: u32, sample_rate: u32) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let num_channels: u16 = 1;
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = num_channels * (bits_per_sample / 8);

    let num_samples = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
    let data_size = num_samples * block_align as usize;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());
    wav.resize(44 + data_size, 0);

    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_wav_layout() {
        let wav = silent_wav(1000, 8000);
        assert_eq!(wav.len(), 44 + 16000);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[36..40], b"data");
        assert!(wav[44..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sniff() {
        assert_eq!(AudioFormat::sniff(&silent_wav(10, 8000)), AudioFormat::Wav);
        assert_eq!(AudioFormat::sniff(b"ID3\x04\x00"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::sniff(&[0xFF, 0xFB, 0x90]), AudioFormat::Mp3);
        assert_eq!(AudioFormat::sniff(b"OggS\x00"), AudioFormat::Ogg);
        assert_eq!(AudioFormat::sniff(b"hello"), AudioFormat::Unknown);
        assert_eq!(AudioFormat::Mp3.content_type(), "audio/mpeg");
    }
}

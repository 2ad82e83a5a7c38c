//! VP8 keyframe extraction from WebP files

use crate::riff::{parse_chunks, ChunkMap, ChunkValue};
use crate::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

/// Start code that follows the frame tag of every VP8 keyframe
pub const VP8_START_CODE: [u8; 3] = [0x9D, 0x01, 0x2A];

const DIMENSION_MASK: u16 = 0x3FFF;

/// A VP8 keyframe and the geometry from its header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vp8Keyframe {
    /// Width in pixels (14 bits)
    pub width: u32,
    /// Height in pixels (14 bits)
    pub height: u32,
    /// Horizontal upscaling hint, not applied
    pub horizontal_scale: u8,
    /// Vertical upscaling hint, not applied
    pub vertical_scale: u8,
    /// The VP8 bitstream, without any RIFF framing
    pub payload: Vec<u8>,
}

/// Extracts the lossy bitstream from a parsed WebP file.
///
/// Looks up `RIFF` / `WEBP` / `VP8 `, locates the keyframe start code and
/// reads the two little-endian dimension fields that follow it. The top two
/// bits of each field are a scaling hint and are reported separately.
pub fn decode_geometry(parsed: &ChunkMap) -> Result<Vp8Keyframe> {
    let webp = parsed
        .first(b"RIFF")
        .and_then(ChunkValue::as_list)
        .and_then(|riff| riff.first(b"WEBP"))
        .and_then(ChunkValue::as_list)
        .ok_or(Error::NotVp8Keyframe("missing RIFF/WEBP container"))?;

    let bitstream = match webp.first(b"VP8 ") {
        Some(ChunkValue::Bytes(bytes)) => bytes,
        _ if webp.first(b"VP8L").is_some() => {
            return Err(Error::NotVp8Keyframe("lossless VP8L image"));
        }
        _ => return Err(Error::NotVp8Keyframe("missing VP8 chunk")),
    };

    let start = bitstream
        .windows(VP8_START_CODE.len())
        .position(|w| w == VP8_START_CODE)
        .ok_or(Error::NotVp8Keyframe("start code not found"))?;

    let dims_at = start + VP8_START_CODE.len();
    let dims = bitstream
        .get(dims_at..dims_at + 4)
        .ok_or(Error::NotVp8Keyframe("truncated frame header"))?;

    let horizontal = LittleEndian::read_u16(&dims[0..2]);
    let vertical = LittleEndian::read_u16(&dims[2..4]);

    let frame = Vp8Keyframe {
        width: u32::from(horizontal & DIMENSION_MASK),
        height: u32::from(vertical & DIMENSION_MASK),
        horizontal_scale: (horizontal >> 14) as u8,
        vertical_scale: (vertical >> 14) as u8,
        payload: bitstream.clone(),
    };
    debug!(
        width = frame.width,
        height = frame.height,
        bytes = frame.payload.len(),
        "decoded VP8 keyframe"
    );
    Ok(frame)
}

/// Parses a WebP file and extracts its VP8 keyframe
pub fn decode_webp(data: &[u8]) -> Result<Vp8Keyframe> {
    decode_geometry(&parse_chunks(data)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a minimal lossy WebP around a synthetic VP8 keyframe header
    pub(crate) fn lossy_webp(width: u16, height: u16, scale_bits: u16) -> Vec<u8> {
        let mut vp8 = vec![0x10, 0x02, 0x00];
        vp8.extend_from_slice(&VP8_START_CODE);
        vp8.extend_from_slice(&(width | (scale_bits << 14)).to_le_bytes());
        vp8.extend_from_slice(&(height | (scale_bits << 14)).to_le_bytes());
        vp8.extend_from_slice(&[0xAA; 7]);
        wrap(b"VP8 ", &vp8)
    }

    fn wrap(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut inner = b"WEBP".to_vec();
        inner.extend_from_slice(id);
        inner.extend_from_slice(&(body.len() as u32).to_le_bytes());
        inner.extend_from_slice(body);
        if body.len() % 2 == 1 {
            inner.push(0);
        }
        let mut out = b"RIFF".to_vec();
        out.extend_from_slice(&(inner.len() as u32).to_le_bytes());
        out.extend(inner);
        out
    }

    #[test]
    fn test_geometry_ignores_scale_bits() {
        for (w, h) in [(200, 100), (1, 1), (16383, 16383), (640, 480)] {
            for scale in 0..4 {
                let frame = decode_webp(&lossy_webp(w, h, scale)).unwrap();
                assert_eq!((frame.width, frame.height), (u32::from(w), u32::from(h)));
                assert_eq!(frame.horizontal_scale, scale as u8);
                assert_eq!(frame.vertical_scale, scale as u8);
            }
        }
    }

    #[test]
    fn test_payload_is_bare_bitstream() {
        let frame = decode_webp(&lossy_webp(200, 100, 0)).unwrap();
        assert_eq!(&frame.payload[..6], &[0x10, 0x02, 0x00, 0x9D, 0x01, 0x2A]);
        assert_eq!(frame.payload.len(), 3 + 3 + 4 + 7);
    }

    #[test]
    fn test_missing_start_code() {
        let data = wrap(b"VP8 ", &[0x10, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01, 0x02]);
        assert!(matches!(
            decode_webp(&data),
            Err(Error::NotVp8Keyframe("start code not found"))
        ));
    }

    #[test]
    fn test_truncated_dimensions() {
        let data = wrap(b"VP8 ", &[0x10, 0x02, 0x00, 0x9D, 0x01, 0x2A, 0x10]);
        assert!(matches!(
            decode_webp(&data),
            Err(Error::NotVp8Keyframe("truncated frame header"))
        ));
    }

    #[test]
    fn test_lossless_rejected() {
        let data = wrap(b"VP8L", &[0x2F, 0, 0, 0, 0]);
        assert!(matches!(
            decode_webp(&data),
            Err(Error::NotVp8Keyframe("lossless VP8L image"))
        ));
    }

    #[test]
    fn test_not_riff() {
        let mut data = b"abcd".to_vec();
        data.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            decode_webp(&data),
            Err(Error::NotVp8Keyframe("missing RIFF/WEBP container"))
        ));
    }

    #[test]
    fn test_extended_format_with_vp8x() {
        let vp8 = lossy_webp(32, 24, 0);
        // splice a VP8X chunk in front of the VP8 chunk
        let mut inner = b"WEBP".to_vec();
        inner.extend_from_slice(b"VP8X");
        inner.extend_from_slice(&10u32.to_le_bytes());
        inner.extend_from_slice(&[0; 10]);
        inner.extend_from_slice(&vp8[12..]);
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(&(inner.len() as u32).to_le_bytes());
        data.extend(inner);

        let frame = decode_webp(&data).unwrap();
        assert_eq!((frame.width, frame.height), (32, 24));
    }
}

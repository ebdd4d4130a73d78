//! Property-based tests for the frame codec.

use std::io::Cursor;

use ipcwire_transport::prelude::*;
use ipcwire_transport::{FrameHeader, validate_name};
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

fn encode_all(codec: &FrameCodec, payloads: &[Vec<u8>]) -> Result<Vec<u8>, TestCaseError> {
    let mut wire = Vec::new();
    for payload in payloads {
        codec
            .write_frame(&mut wire, payload)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
    }
    Ok(wire)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_frames_read_back_in_order(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..2048), 0..16)
    ) {
        let codec = FrameCodec::default();
        let wire = encode_all(&codec, &payloads)?;
        let mut cursor = Cursor::new(wire);
        for expected in &payloads {
            let received = codec
                .read_frame(&mut cursor)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(&received, expected);
        }
        let at_end = matches!(codec.read_frame(&mut cursor), Err(IpcError::PeerClosed));
        prop_assert!(at_end);
    }

    #[test]
    fn prop_cut_stream_never_yields_short_message(
        payload in prop::collection::vec(any::<u8>(), 1..512),
        cut in 1usize..515,
    ) {
        let codec = FrameCodec::default();
        let wire = encode_all(&codec, std::slice::from_ref(&payload))?;
        let cut = cut.min(wire.len() - 1);
        let result = codec.read_frame(&mut Cursor::new(&wire[..cut]));
        let truncated = matches!(result, Err(IpcError::Truncated { .. }));
        prop_assert!(truncated);
    }

    #[test]
    fn prop_decode_agrees_with_read_frame(
        payload in prop::collection::vec(any::<u8>(), 0..1024),
        trailing in prop::collection::vec(any::<u8>(), 0..8),
    ) {
        let codec = FrameCodec::default();
        let mut wire = codec.encode(&payload).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let frame_len = wire.len();
        wire.extend_from_slice(&trailing);

        let decoded = codec.decode(&wire).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(decoded, Some((payload.as_slice(), frame_len)));
    }

    #[test]
    fn prop_declared_length_over_limit_rejected(max in 0usize..1024, excess in 1u32..1024) {
        let codec = FrameCodec::with_max_size(max);
        let declared = max as u32 + excess;
        let wire = FrameHeader::new(declared).encode();
        let rejected = matches!(
            codec.read_frame(&mut Cursor::new(wire)),
            Err(IpcError::MessageTooLarge { .. })
        );
        prop_assert!(rejected);
    }
}

#[quickcheck]
fn prop_header_is_little_endian(len: u32) -> bool {
    let bytes = FrameHeader::new(len).encode();
    bytes == len.to_le_bytes()
        && FrameHeader::decode(&bytes).is_ok_and(|h| h.payload_len == len)
}

#[quickcheck]
fn prop_names_with_separators_rejected(prefix: String, suffix: String) -> bool {
    let name = format!("{prefix}/{suffix}");
    validate_name(&name).is_err()
}

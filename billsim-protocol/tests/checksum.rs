//! Property tests for frame construction

use billsim_protocol::frame::verify_checksum;
use billsim_protocol::{checksum, EventBits, ExtBits, HostPoll, StateBits, StatusMessage};
use proptest::prelude::*;

fn any_message() -> impl Strategy<Value = StatusMessage> {
    (
        0u8..2,
        any::<u8>(),
        0u8..0x20,
        0u8..8,
        0u8..8,
        0u8..0x80,
        0u8..0x80,
    )
        .prop_map(|(ack, state, event, ext, value, model, revision)| StatusMessage {
            ack,
            state: StateBits::from_bits_retain(state),
            event: EventBits::from_bits_retain(event),
            ext: ExtBits::from_bits_retain(ext),
            value,
            model,
            revision,
        })
}

proptest! {
    #[test]
    fn constructed_frames_carry_valid_checksum(msg in any_message()) {
        let frame = msg.encode();
        prop_assert_eq!(checksum(&frame), frame[10]);
        prop_assert!(verify_checksum(&frame));
    }

    #[test]
    fn constructed_frames_are_framed(msg in any_message()) {
        let frame = msg.encode();
        prop_assert_eq!(frame[0], 0x02);
        prop_assert_eq!(frame[1], 0x0B);
        prop_assert_eq!(frame[6], 0x00);
        prop_assert_eq!(frame[9], 0x03);
        prop_assert_eq!(frame[2] & 0x01, msg.ack);
        prop_assert_eq!(frame[5] >> 3, msg.value);
    }

    #[test]
    fn any_corrupted_body_byte_breaks_checksum(msg in any_message(), index in 1usize..9, flip in 1u8..=255) {
        let mut frame = msg.encode();
        frame[index] ^= flip;
        prop_assert!(!verify_checksum(&frame));
    }

    #[test]
    fn poll_parse_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
        let parsed = HostPoll::parse(&bytes);
        prop_assert_eq!(parsed.is_ok(), bytes.len() >= 5);
    }
}

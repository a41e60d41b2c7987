use crate::crypto::elliptic_curve::SCALAR_SIZE;

/// Numeric outcomes are signed as 256-bit values.
pub const MESSAGE_SIZE: usize = SCALAR_SIZE;

const VALUE_OFFSET: usize = MESSAGE_SIZE - std::mem::size_of::<u64>();

/// Encodes a numeric outcome as 24 zero bytes followed by the value in big-endian order.
///
/// No hashing is involved; [`decode_numeric_message`] recovers the value.
pub fn encode_numeric_message(value: u64) -> [u8; MESSAGE_SIZE] {
    let mut message = [0u8; MESSAGE_SIZE];
    message[VALUE_OFFSET..].copy_from_slice(&value.to_be_bytes());
    message
}

/// Inverse of [`encode_numeric_message`]. `None` if `message` is not 32 bytes or its high 24
/// bytes are not all zero.
pub fn decode_numeric_message(message: &[u8]) -> Option<u64> {
    if message.len() != MESSAGE_SIZE || message[..VALUE_OFFSET].iter().any(|byte| *byte != 0) {
        return None;
    }
    let value: [u8; 8] = message[VALUE_OFFSET..].try_into().ok()?;
    Some(u64::from_be_bytes(value))
}

use core::convert::TryInto;

#[inline]
pub fn read_u32(slice: &[u8]) -> u32 {
    u32::from_le_bytes(slice[..4].try_into().expect("fixed size slice"))
}

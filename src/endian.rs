//! Conversion of 16-bit values between host byte order and a fixed wire byte order.
//!
//! `StreamBuffer` stores fixed-width values in host order. A value converted with
//! [`host_to_wire16`] and then appended with `StreamBuffer::add_u16` lands in memory in the wire
//! order `O`; reading it back with `StreamBuffer::get_u16` and converting with
//! [`wire_to_host16`] recovers the original value.

use zerocopy::byteorder::{ByteOrder, U16};

/// Converts a host-order value so that its in-memory representation is in wire order `O`.
#[inline(always)]
pub fn host_to_wire16<O: ByteOrder>(value: u16) -> u16 {
    u16::from_ne_bytes(U16::<O>::new(value).to_bytes())
}

/// Converts a value whose in-memory representation is in wire order `O` to host order.
#[inline(always)]
pub fn wire_to_host16<O: ByteOrder>(value: u16) -> u16 {
    U16::<O>::from_bytes(value.to_ne_bytes()).get()
}

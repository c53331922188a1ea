//! Encodes and decodes lists of Type-Length-Value "information elements" (IEs) inside
//! fixed-capacity byte buffers.
//!
//! The crate has two layers:
//!
//! * [`StreamBuffer`] is a cursor over a region of bytes that the caller owns. It appends and
//!   reads fixed-width values and byte arrays, checks every access against the capacity of the
//!   region, and never allocates or grows.
//! * [`IeList`] encodes and decodes a flat list of IEs in a `StreamBuffer`. Each IE is one byte
//!   of type, two bytes of length (in a wire byte order, network order by default) and then the
//!   data. [`IeReader`] decodes the same format from a plain slice.
//!
//! Decoded IEs borrow their data from the buffer; nothing is copied.
//!
//! ```
//! use ie_codec::{IeList, IeReader};
//!
//! let mut storage = [0u8; 32];
//! let mut list = IeList::new(&mut storage[..]);
//! list.add_ie(1, b"a").unwrap();
//! list.add_ie(2, b"bb").unwrap();
//! assert_eq!(list.find_ie_by_type(2).unwrap().data, b"bb");
//!
//! let types: Vec<u8> = IeReader::new(list.data())
//!     .map(|ie| ie.unwrap().ie_type)
//!     .collect();
//! assert_eq!(types, [1, 2]);
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod buffer;
pub mod endian;
mod ie;
mod ie_list;


pub use buffer::{BufferState, StreamBuffer, StreamError};
#[cfg(feature = "alloc")]
pub use ie::OwnedIe;
pub use ie::{Ie, IeError, IeReader, IE_HEADER_SIZE};
pub use ie_list::{list_data, list_total_size, IeList};
pub use zerocopy::byteorder::{BigEndian, ByteOrder, LittleEndian, NetworkEndian};

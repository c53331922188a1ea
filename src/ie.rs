use core::iter::FusedIterator;
use core::marker::PhantomData;

use zerocopy::byteorder::{ByteOrder, NetworkEndian};

use crate::buffer::{StreamBuffer, StreamError};
use crate::endian::wire_to_host16;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Size of the header of every encoded IE: one byte of type, two bytes of length.
pub const IE_HEADER_SIZE: usize = 3;

/// A single information element (IE), as a view of its encoded bytes.
///
/// When an `Ie` is returned by a decoder, `data` points into the buffer it was decoded from and
/// is only valid for as long as that buffer is borrowed. Use [`Ie::into_owned`] to keep a copy.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Ie<'a> {
    /// The type of the element. Its meaning is up to the caller.
    pub ie_type: u8,
    /// The contents of the element. Empty if the encoded length is zero.
    pub data: &'a [u8],
}

impl<'a> Ie<'a> {
    /// Constructor
    pub fn new(ie_type: u8, data: &'a [u8]) -> Self {
        Self { ie_type, data }
    }

    /// The length of `data`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the element has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The number of bytes the element occupies when encoded, including the header.
    pub fn encoded_len(&self) -> usize {
        IE_HEADER_SIZE + self.data.len()
    }

    /// Returns the contents of the element as a `bstr::BStr`.
    #[cfg(feature = "bstr")]
    pub fn data_bstr(&self) -> &'a bstr::BStr {
        bstr::BStr::new(self.data)
    }

    /// Copies the element out of the buffer it was decoded from.
    #[cfg(feature = "alloc")]
    pub fn into_owned(self) -> OwnedIe {
        OwnedIe {
            ie_type: self.ie_type,
            data: self.data.to_vec(),
        }
    }
}

/// An information element that owns its data.
#[cfg(feature = "alloc")]
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct OwnedIe {
    /// The type of the element
    pub ie_type: u8,
    /// The contents of the element
    pub data: Vec<u8>,
}

#[cfg(feature = "alloc")]
impl OwnedIe {
    /// Borrows the element as an `Ie`, e.g. to append it to another list.
    pub fn as_ie(&self) -> Ie<'_> {
        Ie::new(self.ie_type, &self.data)
    }
}

/// Error type for IE encoding and decoding
#[derive(thiserror::Error, Copy, Clone, Eq, PartialEq, Debug)]
pub enum IeError {
    /// There are no more elements. Every committed byte has been read.
    #[error("end of IE list")]
    EndOfList,

    /// Some bytes remain, but not enough for an IE header.
    #[error("truncated IE header: {remaining} bytes remain, need {}", IE_HEADER_SIZE)]
    TruncatedHeader {
        /// Unread bytes
        remaining: usize,
    },

    /// The header of an element declares more data than the list contains. The header has
    /// been consumed, so the list cannot be decoded any further.
    #[error("truncated IE of type {ie_type}: declared {declared} bytes, but only {available} remain")]
    Truncated {
        /// Type of the truncated element
        ie_type: u8,
        /// Length from the element header
        declared: u16,
        /// Unread bytes following the header
        available: usize,
    },

    /// The data is too long for the 16-bit length field.
    #[error("IE data of {len} bytes does not fit in a 16-bit length")]
    TooLong {
        /// Length of the rejected data
        len: usize,
    },

    /// No element of the requested type exists in the list.
    #[error("no IE of type {ie_type} in list")]
    NotFound {
        /// The type that was searched for
        ie_type: u8,
    },

    /// The underlying buffer rejected a read or write.
    #[error(transparent)]
    Buffer(#[from] StreamError),
}

/// Location of a decoded element within the committed bytes of a buffer.
#[derive(Copy, Clone, Debug)]
pub(crate) struct IeSpan {
    pub(crate) ie_type: u8,
    start: usize,
    len: usize,
}

impl IeSpan {
    pub(crate) fn resolve<'a>(&self, committed: &'a [u8]) -> Ie<'a> {
        if self.len == 0 {
            return Ie::new(self.ie_type, &[]);
        }
        Ie::new(self.ie_type, &committed[self.start..self.start + self.len])
    }
}

/// Decodes the element at the cursor of `buffer` and moves the cursor past it.
///
/// On `IeError::Truncated` the cursor is left just past the header.
pub(crate) fn read_span<S: AsRef<[u8]>, O: ByteOrder>(
    buffer: &mut StreamBuffer<S>,
) -> Result<IeSpan, IeError> {
    let remaining = buffer.data_size();
    if remaining == 0 {
        return Err(IeError::EndOfList);
    }
    if remaining < IE_HEADER_SIZE {
        return Err(IeError::TruncatedHeader { remaining });
    }

    let ie_type = buffer.get_u8()?;
    let declared = wire_to_host16::<O>(buffer.get_u16()?);
    let start = buffer.cursor();
    let len = usize::from(declared);

    let available = buffer.data_size();
    if len > available {
        tracing::warn!(ie_type, declared, available, "truncated IE");
        return Err(IeError::Truncated {
            ie_type,
            declared,
            available,
        });
    }
    buffer.skip(len)?;

    Ok(IeSpan {
        ie_type,
        start,
        len,
    })
}

/// Iterates the elements of an encoded IE list without copying them.
///
/// The elements returned borrow the payload, not the reader, so any number of them can be held
/// at once. A reader obtained from [`crate::IeList::reader`] borrows the list, which prevents
/// appending to the list while the reader or any of its elements is alive.
///
/// Iteration stops after the last element, or after the first error.
#[derive(Clone, Debug)]
pub struct IeReader<'r, O = NetworkEndian> {
    buffer: StreamBuffer<&'r [u8]>,
    done: bool,
    _order: PhantomData<O>,
}

impl<'r> IeReader<'r> {
    /// Creates a reader over `payload`, with lengths in network byte order.
    pub fn new(payload: &'r [u8]) -> Self {
        Self::from_payload(payload)
    }
}

impl<'r, O: ByteOrder> IeReader<'r, O> {
    /// Creates a reader over `payload`, with lengths in byte order `O`.
    pub fn from_payload(payload: &'r [u8]) -> Self {
        Self {
            buffer: StreamBuffer::filled(payload),
            done: false,
            _order: PhantomData,
        }
    }

    /// Decodes the next element.
    pub fn next_ie(&mut self) -> Result<Ie<'r>, IeError> {
        let span = read_span::<_, O>(&mut self.buffer)?;
        let payload: &'r [u8] = *self.buffer.storage();
        Ok(span.resolve(payload))
    }

    /// The number of bytes that have not been decoded yet.
    pub fn remaining(&self) -> usize {
        self.buffer.data_size()
    }
}

impl<'r, O: ByteOrder> Iterator for IeReader<'r, O> {
    type Item = Result<Ie<'r>, IeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_ie() {
            Ok(ie) => Some(Ok(ie)),
            Err(IeError::EndOfList) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<O: ByteOrder> FusedIterator for IeReader<'_, O> {}

use core::marker::PhantomData;

use zerocopy::byteorder::{ByteOrder, NetworkEndian};

use crate::buffer::{BufferState, StreamBuffer};
use crate::endian::host_to_wire16;
use crate::ie::{read_span, Ie, IeError, IeReader};

/// A list of information elements (IEs), encoded in a `StreamBuffer`.
///
/// Each element is encoded as:
///
/// ```text
/// byte 0      type
/// bytes 1..3  length of data, in byte order `O`
/// bytes 3..   data
/// ```
///
/// Elements are stored back to back. There is no padding, terminator or count; the list ends
/// where the committed data of the buffer ends.
///
/// The list has a single read cursor, shared by [`get_first_ie`](Self::get_first_ie),
/// [`get_next_ie`](Self::get_next_ie) and [`find_ie_by_type`](Self::find_ie_by_type). To
/// hold several decoded elements at once, use [`reader`](Self::reader) instead.
#[derive(Clone, Debug)]
pub struct IeList<S, O = NetworkEndian> {
    buffer: StreamBuffer<S>,
    _order: PhantomData<O>,
}

impl<S: AsRef<[u8]>> IeList<S> {
    /// Creates an empty list, with lengths in network byte order.
    pub fn new(storage: S) -> Self {
        Self::from_buffer(StreamBuffer::new(storage))
    }

    /// Creates a list over an existing payload, with lengths in network byte order. The whole
    /// storage is the payload, so nothing can be appended.
    pub fn with_payload(payload: S) -> Self {
        Self::from_buffer(StreamBuffer::filled(payload))
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> IeList<S> {
    /// Creates a list whose first `payload_size` bytes of `storage` are an existing payload,
    /// with lengths in network byte order. New elements are appended after the payload.
    pub fn appendable(storage: S, payload_size: usize) -> Result<Self, IeError> {
        Ok(Self::from_buffer(StreamBuffer::with_payload(
            storage,
            payload_size,
        )?))
    }
}

impl<S: AsRef<[u8]>, O: ByteOrder> IeList<S, O> {
    /// Creates a list from a buffer, with lengths in byte order `O`. The committed data of the
    /// buffer is the payload.
    pub fn from_buffer(buffer: StreamBuffer<S>) -> Self {
        Self {
            buffer,
            _order: PhantomData,
        }
    }

    /// Moves the read cursor back to the first element.
    pub fn reset_to_first_ie(&mut self) {
        self.buffer.reset();
    }

    /// Moves the read cursor to the first element and decodes it.
    pub fn get_first_ie(&mut self) -> Result<Ie<'_>, IeError> {
        self.buffer.reset();
        self.get_next_ie()
    }

    /// Decodes the element at the read cursor.
    ///
    /// Returns `IeError::EndOfList` once every element has been read. If an element is
    /// truncated (`IeError::Truncated`), its header has already been consumed and the rest of
    /// the list cannot be decoded; call [`reset_to_first_ie`](Self::reset_to_first_ie) before
    /// decoding again.
    pub fn get_next_ie(&mut self) -> Result<Ie<'_>, IeError> {
        let span = read_span::<S, O>(&mut self.buffer)?;
        Ok(span.resolve(self.buffer.committed()))
    }

    /// Finds the first element whose type is `ie_type`.
    ///
    /// The search always starts from the first element, and the read cursor is moved back to
    /// the first element afterward, whether or not the search succeeds.
    pub fn find_ie_by_type(&mut self, ie_type: u8) -> Result<Ie<'_>, IeError> {
        self.buffer.reset();
        let found = loop {
            match read_span::<S, O>(&mut self.buffer) {
                Ok(span) if span.ie_type == ie_type => break Ok(span),
                Ok(_) => {}
                Err(IeError::EndOfList) => break Err(IeError::NotFound { ie_type }),
                Err(e) => break Err(e),
            }
        };
        self.buffer.reset();
        found.map(|span| span.resolve(self.buffer.committed()))
    }

    /// Returns a reader over every element committed so far.
    ///
    /// The reader does not use or move the read cursor of the list.
    pub fn reader(&self) -> IeReader<'_, O> {
        IeReader::from_payload(self.buffer.committed())
    }

    /// The number of bytes after the read cursor. This is the size of the whole list only when
    /// the cursor is at the first element.
    pub fn list_size(&self) -> usize {
        self.buffer.data_size()
    }

    /// The encoded list, regardless of the read cursor.
    pub fn data(&self) -> &[u8] {
        self.buffer.committed()
    }

    /// The size of the encoded list, regardless of the read cursor.
    pub fn total_size(&self) -> usize {
        self.buffer.size()
    }

    /// The number of bytes that can still be appended.
    pub fn free_space(&self) -> usize {
        self.buffer.free_space()
    }

    /// Returns `true` if an append has failed for lack of space since the last reset.
    pub fn check_overrun(&self) -> bool {
        self.buffer.check_overrun()
    }

    /// Returns `true` if a read has failed for lack of data since the last reset.
    pub fn check_underrun(&self) -> bool {
        self.buffer.check_underrun()
    }

    /// Both sticky flags of the underlying buffer.
    pub fn state(&self) -> BufferState {
        self.buffer.state()
    }

    /// Accesses the underlying buffer
    pub fn buffer(&self) -> &StreamBuffer<S> {
        &self.buffer
    }

    /// Extracts the underlying buffer
    pub fn into_buffer(self) -> StreamBuffer<S> {
        self.buffer
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>, O: ByteOrder> IeList<S, O> {
    /// Appends an element.
    ///
    /// The header and the data are appended one after the other, and nothing is undone if one
    /// of them fails. If there is room for the header but not for the data, the header stays in
    /// the list and the list ends with a truncated element. Use
    /// [`add_ie_atomic`](Self::add_ie_atomic) to avoid this.
    pub fn add_ie(&mut self, ie_type: u8, data: &[u8]) -> Result<(), IeError> {
        let len = u16::try_from(data.len()).map_err(|_| IeError::TooLong { len: data.len() })?;

        self.buffer.add_u8(ie_type)?;
        self.buffer.add_u16(host_to_wire16::<O>(len))?;
        if len != 0 {
            self.buffer.add_bytes(data)?;
        }
        Ok(())
    }

    /// Appends an element given as an `Ie`. Same as [`add_ie`](Self::add_ie).
    pub fn add_record(&mut self, ie: &Ie<'_>) -> Result<(), IeError> {
        self.add_ie(ie.ie_type, ie.data)
    }

    /// Appends an element, or nothing at all. The overrun flag is still set on failure.
    pub fn add_ie_atomic(&mut self, ie_type: u8, data: &[u8]) -> Result<(), IeError> {
        let mark = self.buffer.size();
        let result = self.add_ie(ie_type, data);
        if result.is_err() {
            self.buffer.rewind_size(mark);
        }
        result
    }
}

/// The encoded bytes of `list`, or an empty slice if there is no list.
pub fn list_data<S: AsRef<[u8]>, O: ByteOrder>(list: Option<&IeList<S, O>>) -> &[u8] {
    list.map(|list| list.data()).unwrap_or(&[])
}

/// The encoded size of `list`, or 0 if there is no list.
pub fn list_total_size<S: AsRef<[u8]>, O: ByteOrder>(list: Option<&IeList<S, O>>) -> usize {
    list.map_or(0, |list| list.total_size())
}

use zerocopy::IntoBytes;

/// Result type for `StreamBuffer` operations
pub type Result<T> = core::result::Result<T, StreamError>;

/// Reads and writes values inside a fixed-capacity region of bytes.
///
/// The buffer tracks two positions. `size` is the number of bytes that have been committed to
/// the region, either by appending them or because the region already contained a payload when
/// the buffer was created. `cursor` is the position of the next read. The invariant
/// `cursor <= size <= capacity` holds after every call, including calls that fail.
///
/// The capacity is the length of the storage and never changes. Any `S: AsRef<[u8]>` can be
/// read from; appending additionally requires `S: AsMut<[u8]>`. In practice `S` is usually a
/// borrowed slice (`&[u8]` for a strict read view, `&mut [u8]` for a region that can be
/// appended to), but arrays and vectors work just as well.
///
/// Fixed-width values are stored in host byte order. Callers that need a particular wire order
/// must convert before `add_*` and after `get_*`; see [`crate::endian`].
///
/// Every failed operation reports its error directly, and also sets a "sticky" flag
/// ([`check_overrun`](Self::check_overrun), [`check_underrun`](Self::check_underrun)) that
/// stays set until [`reset`](Self::reset). This lets a caller run a batch of operations and
/// check the outcome once at the end.
#[derive(Clone, Debug)]
pub struct StreamBuffer<S> {
    storage: S,
    size: usize,
    cursor: usize,
    state: BufferState,
}

impl<S: AsRef<[u8]>> StreamBuffer<S> {
    /// Creates an empty buffer. Nothing is committed and the whole storage is free space.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            size: 0,
            cursor: 0,
            state: BufferState::default(),
        }
    }

    /// Creates a buffer whose first `size` bytes are an existing payload.
    ///
    /// If `size` is less than the length of the storage, then the remaining space can be used
    /// to append more data (provided that `S` is writable).
    ///
    /// Fails with `StreamError::Overrun` if `size` exceeds the length of the storage.
    pub fn with_payload(storage: S, size: usize) -> Result<Self> {
        let capacity = storage.as_ref().len();
        if size > capacity {
            return Err(StreamError::Overrun {
                needed: size,
                free: capacity,
            });
        }
        let mut buffer = Self::new(storage);
        buffer.size = size;
        Ok(buffer)
    }

    /// Creates a buffer where the entire storage is an existing payload. The buffer has no free
    /// space.
    pub fn filled(storage: S) -> Self {
        let size = storage.as_ref().len();
        let mut buffer = Self::new(storage);
        buffer.size = size;
        buffer
    }

    /// Moves the read cursor back to the start and clears both sticky flags.
    ///
    /// Committed data is not affected.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.state = BufferState::default();
    }

    /// The number of committed bytes that have not been read yet.
    pub fn data_size(&self) -> usize {
        self.size - self.cursor
    }

    /// The number of bytes that can still be appended.
    pub fn free_space(&self) -> usize {
        self.capacity() - self.size
    }

    /// Returns `true` if every committed byte has been read.
    pub fn is_empty(&self) -> bool {
        self.cursor >= self.size
    }

    /// The fixed capacity of the buffer, which is the length of the storage.
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().len()
    }

    /// The number of committed bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The position of the next read.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The unread part of the committed data, starting at the cursor.
    pub fn pointer(&self) -> &[u8] {
        &self.storage.as_ref()[self.cursor..self.size]
    }

    /// All committed data, regardless of the cursor position.
    pub fn committed(&self) -> &[u8] {
        &self.storage.as_ref()[..self.size]
    }

    /// Returns `true` if a write has failed for lack of space since the last reset.
    pub fn check_overrun(&self) -> bool {
        self.state.overrun
    }

    /// Returns `true` if a read or skip has failed for lack of data since the last reset.
    pub fn check_underrun(&self) -> bool {
        self.state.underrun
    }

    /// Both sticky flags.
    pub fn state(&self) -> BufferState {
        self.state
    }

    /// Accesses the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Extracts the underlying storage
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Claims `len` bytes for reading and returns the offset where they start.
    fn claim_read(&mut self, len: usize) -> Result<usize> {
        match self.cursor.checked_add(len) {
            Some(end) if end <= self.size => {
                let start = self.cursor;
                self.cursor = end;
                Ok(start)
            }
            _ => {
                let remaining = self.data_size();
                self.state.underrun = true;
                tracing::debug!(needed = len, remaining, "stream buffer underrun");
                Err(StreamError::Underrun {
                    needed: len,
                    remaining,
                })
            }
        }
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn get_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let start = self.claim_read(N)?;
        let mut value = [0u8; N];
        value.copy_from_slice(&self.storage.as_ref()[start..start + N]);
        Ok(value)
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn get_u8(&mut self) -> Result<u8> {
        Ok(u8::from_ne_bytes(self.get_cbytes()?))
    }

    /// Reads a `u16` in host byte order.
    #[inline(always)]
    pub fn get_u16(&mut self) -> Result<u16> {
        Ok(u16::from_ne_bytes(self.get_cbytes()?))
    }

    /// Reads a `u32` in host byte order.
    #[inline(always)]
    pub fn get_u32(&mut self) -> Result<u32> {
        Ok(u32::from_ne_bytes(self.get_cbytes()?))
    }

    /// Copies `dst.len()` bytes into `dst`. Either all of the bytes are copied, or (on failure)
    /// none are and the cursor does not move.
    pub fn get_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        let start = self.claim_read(dst.len())?;
        dst.copy_from_slice(&self.storage.as_ref()[start..start + dst.len()]);
        Ok(())
    }

    /// Advances the cursor by `len` bytes without reading them.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.claim_read(len).map(|_| ())
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> StreamBuffer<S> {
    /// Claims `len` bytes of free space and returns the offset where they start.
    fn claim_write(&mut self, len: usize) -> Result<usize> {
        let free = self.free_space();
        if len > free {
            self.state.overrun = true;
            tracing::debug!(needed = len, free, "stream buffer overrun");
            return Err(StreamError::Overrun { needed: len, free });
        }
        let start = self.size;
        self.size += len;
        Ok(start)
    }

    /// Appends `bytes`. Either all of the bytes are appended, or (on failure) none are.
    pub fn add_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let start = self.claim_write(bytes.len())?;
        self.storage.as_mut()[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Appends a small, fixed-size array of bytes.
    pub fn add_cbytes<const N: usize>(&mut self, value: [u8; N]) -> Result<()> {
        self.add_bytes(&value)
    }

    /// Appends a single `u8` value
    pub fn add_u8(&mut self, value: u8) -> Result<()> {
        self.add_bytes(value.as_bytes())
    }

    /// Appends a `u16` in host byte order
    pub fn add_u16(&mut self, value: u16) -> Result<()> {
        self.add_bytes(value.as_bytes())
    }

    /// Appends a `u32` in host byte order
    pub fn add_u32(&mut self, value: u32) -> Result<()> {
        self.add_bytes(value.as_bytes())
    }

    /// Drops committed bytes past `size`. Used to undo a partially appended record.
    pub(crate) fn rewind_size(&mut self, size: usize) {
        debug_assert!(self.cursor <= size && size <= self.size);
        self.size = size;
    }
}

impl<'a> StreamBuffer<&'a [u8]> {
    /// Reads a slice of bytes whose length is `len`. This function returns a slice reference
    /// into the storage; it does not copy the bytes, and the slice outlives the buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let start = self.claim_read(len)?;
        let storage: &'a [u8] = self.storage;
        Ok(&storage[start..start + len])
    }
}

/// The sticky error flags of a `StreamBuffer`.
///
/// Flags are only ever set by failing operations. They are cleared together by
/// `StreamBuffer::reset`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct BufferState {
    /// A write needed more space than was free.
    pub overrun: bool,
    /// A read or skip needed more data than was committed.
    pub underrun: bool,
}

impl BufferState {
    /// Returns `true` if neither flag is set.
    pub fn is_clean(&self) -> bool {
        !self.overrun && !self.underrun
    }
}

/// Error type for `StreamBuffer`
#[derive(thiserror::Error, Copy, Clone, Eq, PartialEq, Debug)]
pub enum StreamError {
    /// A write would have gone past the capacity of the buffer. Nothing was written.
    #[error("buffer overrun: needed {needed} bytes, but only {free} are free")]
    Overrun {
        /// Number of bytes the write needed
        needed: usize,
        /// Free space at the time of the write
        free: usize,
    },

    /// A read or skip would have gone past the committed data. The cursor did not move.
    #[error("buffer underrun: needed {needed} bytes, but only {remaining} remain")]
    Underrun {
        /// Number of bytes the read needed
        needed: usize,
        /// Unread bytes at the time of the read
        remaining: usize,
    },
}

//! Fixed-capacity FIFO queue.
//!
//! Provides [`RingBuffer`], a circular queue whose storage is reserved once at
//! construction and never grows. Producers learn about back-pressure through
//! [`Full`]; consumers learn about an exhausted queue through [`Empty`].

use heapless::Vec;

/// Returned by [`RingBuffer::push`] when the buffer is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Full;

/// Returned by [`RingBuffer::pop`] when no elements are queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Empty;

impl core::fmt::Display for Full {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ring buffer is full")
    }
}

impl core::fmt::Display for Empty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ring buffer is empty")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Full {}

#[cfg(feature = "std")]
impl std::error::Error for Empty {}

/// Errors that can occur while creating a ring buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RingBufferError {
    /// A capacity of zero was requested.
    ZeroCapacity,

    /// The requested capacity exceeds the storage reserved for this buffer.
    AllocationError {
        /// Number of slots requested
        requested: usize,
        /// Number of slots the storage can hold
        available: usize,
    },
}

impl core::fmt::Display for RingBufferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RingBufferError::ZeroCapacity => {
                write!(f, "ring buffer capacity must be at least 1")
            }
            RingBufferError::AllocationError {
                requested,
                available,
            } => {
                write!(
                    f,
                    "cannot reserve {} slots, storage holds {}",
                    requested, available
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RingBufferError {}

/// A circular FIFO queue with a capacity fixed at construction.
///
/// `N` is the size of the backing storage; the runtime capacity chosen in
/// [`with_capacity`](Self::with_capacity) may be anything in `1..=N`.
///
/// The read and write cursors are equal both when the buffer is empty and when
/// it is full; the `full` flag tells the two apart.
///
/// # Type Parameters
/// * `T` - Element type (the reference element type is `i32`)
/// * `N` - Storage bound in elements
#[derive(Debug, Clone)]
pub struct RingBuffer<T: Copy, const N: usize> {
    slots: Vec<T, N>,
    capacity: usize,
    idx_read: usize,
    idx_write: usize,
    full: bool,
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// Creates a buffer using the whole storage bound as capacity.
    ///
    /// # Errors
    /// * `ZeroCapacity` - `N` is 0
    pub fn new() -> Result<Self, RingBufferError> {
        Self::with_capacity(N)
    }

    /// Creates an empty buffer holding at most `capacity` elements.
    ///
    /// # Errors
    /// * `ZeroCapacity` - `capacity` is 0
    /// * `AllocationError` - `capacity` is larger than the storage bound `N`
    pub fn with_capacity(capacity: usize) -> Result<Self, RingBufferError> {
        if capacity == 0 {
            return Err(RingBufferError::ZeroCapacity);
        }
        if capacity > N {
            return Err(RingBufferError::AllocationError {
                requested: capacity,
                available: N,
            });
        }

        Ok(Self {
            slots: Vec::new(),
            capacity,
            idx_read: 0,
            idx_write: 0,
            full: false,
        })
    }

    /// Releases the buffer and its storage.
    ///
    /// Dropping the buffer does the same; this spells out the end of its life.
    pub fn destroy(self) {
        drop(self);
    }

    /// Returns true if no further element can be pushed.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Returns true if no element is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx_read == self.idx_write && !self.full
    }

    /// Returns the number of elements the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of queued elements.
    pub fn len(&self) -> usize {
        if self.full {
            self.capacity
        } else if self.idx_write >= self.idx_read {
            self.idx_write - self.idx_read
        } else {
            self.capacity - self.idx_read + self.idx_write
        }
    }

    /// Appends an element at the back of the queue.
    ///
    /// # Errors
    /// * `Full` - The buffer is at capacity; nothing is changed
    pub fn push(&mut self, value: T) -> Result<(), Full> {
        if self.full {
            return Err(Full);
        }

        // Slots are filled in order until the write cursor first wraps, so an
        // unfilled slot is always the next one at the end of the storage.
        if self.idx_write == self.slots.len() {
            self.slots.push(value).map_err(|_| Full)?;
        } else {
            self.slots[self.idx_write] = value;
        }

        self.idx_write = (self.idx_write + 1) % self.capacity;
        self.full = self.idx_write == self.idx_read;
        Ok(())
    }

    /// Removes and returns the oldest element.
    ///
    /// # Errors
    /// * `Empty` - Nothing is queued; cursors are left untouched
    pub fn pop(&mut self) -> Result<T, Empty> {
        let value = self.peek().ok_or(Empty)?;
        self.idx_read = (self.idx_read + 1) % self.capacity;
        self.full = false;
        Ok(value)
    }

    /// Returns the oldest element without removing it.
    pub fn peek(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.slots.get(self.idx_read).copied()
    }

    /// Discards all queued elements. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.idx_read = 0;
        self.idx_write = 0;
        self.full = false;
    }

    /// Returns an iterator that pops elements in FIFO order until empty.
    pub fn drain(&mut self) -> Drain<'_, T, N> {
        Drain { buffer: self }
    }
}

/// Draining iterator returned by [`RingBuffer::drain`].
pub struct Drain<'a, T: Copy, const N: usize> {
    buffer: &'a mut RingBuffer<T, N>,
}

impl<T: Copy, const N: usize> Iterator for Drain<'_, T, N> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.buffer.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.buffer.len();
        (len, Some(len))
    }
}

/// A fixed-capacity ringbuffer
///
/// Grows up to `capacity` elements, then wraps around and overwrites the
/// oldest element on each subsequent push.
#[derive(Debug, Default, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    ix: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            ix: 0,
            capacity,
        }
    }

    /// Returns the number of elements currently held
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert an element, overwriting the oldest one if the buffer is full
    pub fn push(&mut self, item: T) {
        if self.ix >= self.len() {
            self.buffer.push(item);
        } else {
            self.buffer[self.ix] = item;
        }
        self.ix = (self.ix + 1) % self.capacity;
    }

    /// Get a slice view of the internal buffer
    pub fn view(&self) -> &[T] {
        &self.buffer
    }
}

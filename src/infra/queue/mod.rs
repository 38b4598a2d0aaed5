//! Bounded single-producer/single-consumer ring buffer.
//!
//! `head` is the next slot to read and is written only by the consumer; `tail`
//! is the next slot to write and is written only by the producer. The ring is
//! full when `(tail + 1) % N == head`, so one slot always stays free and the
//! usable capacity is `N - 1`. There is no shared element counter: each side
//! publishes progress through the index it owns, which is what makes an
//! interrupt-context producer and a task-context consumer safe without a lock.
//!
//! [`BoundedQueue::split`] hands out the two ends. The consumer can also wait
//! asynchronously for the next item; the producer wakes it after each enqueue.
use core::cell::UnsafeCell;
use core::future::poll_fn;
use core::mem::MaybeUninit;
use core::task::Poll;

use embassy_sync::waitqueue::AtomicWaker;
use portable_atomic::{AtomicUsize, Ordering};

use crate::error::QueueError;

//==================================================================================BOUNDED_QUEUE
/// Fixed-capacity FIFO of `N - 1` items. Never allocates, never blocks, never
/// overwrites: a full queue rejects the new item and stays unchanged.
pub struct BoundedQueue<T, const N: usize> {
    head: AtomicUsize,
    tail: AtomicUsize,
    slots: UnsafeCell<[MaybeUninit<T>; N]>,
    waker: AtomicWaker,
}

// Safety: slots are only touched through the unique producer/consumer ends (or
// through `&mut self`), and index publication uses release/acquire ordering.
unsafe impl<T: Send, const N: usize> Sync for BoundedQueue<T, N> {}

impl<T, const N: usize> Default for BoundedQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BoundedQueue<T, N> {
    const CAPACITY_CHECK: () = assert!(N >= 2, "a BoundedQueue needs at least 2 slots");

    /// Empty queue with `N` slots. `N < 2` fails to compile.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_CHECK;
        Self::empty()
    }

    /// Empty queue with `N` slots, reporting an unusable `N` as an error instead
    /// of failing the build.
    pub fn try_new() -> Result<Self, QueueError> {
        if N < 2 {
            return Err(QueueError::InvalidCapacity { capacity: N });
        }
        Ok(Self::empty())
    }

    const fn empty() -> Self {
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            // Safety: an array of `MaybeUninit` needs no initialization.
            slots: UnsafeCell::new(unsafe { MaybeUninit::uninit().assume_init() }),
            waker: AtomicWaker::new(),
        }
    }

    /// Number of items the queue can hold at once (`N - 1`).
    #[inline]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Items currently stored. A snapshot when the other end is running.
    #[inline]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (tail + N - head) % N
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        Self::advance(self.tail.load(Ordering::Acquire)) == self.head.load(Ordering::Acquire)
    }

    /// Append `item` at the tail. Fails with [`QueueError::Full`] without touching
    /// the queue when no slot is free.
    pub fn enqueue(&mut self, item: T) -> Result<(), QueueError> {
        // Safety: `&mut self` excludes every other producer and consumer.
        unsafe { self.push(item) }
    }

    /// Remove the item at the head. Fails with [`QueueError::Empty`] when there is none.
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        // Safety: `&mut self` excludes every other producer and consumer.
        unsafe { self.pop() }
    }

    /// Split into the producer and consumer ends. Each end may live in a
    /// different execution context (interrupt handler, task, thread).
    pub fn split(&mut self) -> (Producer<'_, T, N>, Consumer<'_, T, N>) {
        let queue: &Self = self;
        (Producer { queue }, Consumer { queue })
    }

    #[inline]
    const fn advance(index: usize) -> usize {
        (index + 1) % N
    }

    /// Safety: at most one caller may be in `push` at any time.
    unsafe fn push(&self, item: T) -> Result<(), QueueError> {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = Self::advance(tail);
        if next == self.head.load(Ordering::Acquire) {
            return Err(QueueError::Full);
        }

        // The consumer never reads `tail` before it is published below.
        let slot = (self.slots.get() as *mut MaybeUninit<T>).add(tail);
        slot.write(MaybeUninit::new(item));
        self.tail.store(next, Ordering::Release);

        self.waker.wake();
        Ok(())
    }

    /// Safety: at most one caller may be in `pop` at any time.
    unsafe fn pop(&self) -> Result<T, QueueError> {
        let head = self.head.load(Ordering::Relaxed);
        if head == self.tail.load(Ordering::Acquire) {
            return Err(QueueError::Empty);
        }

        // Slots between head and tail were initialized by `push`.
        let slot = (self.slots.get() as *const MaybeUninit<T>).add(head);
        let item = slot.read().assume_init();
        self.head.store(Self::advance(head), Ordering::Release);

        Ok(item)
    }
}

impl<T, const N: usize> Drop for BoundedQueue<T, N> {
    fn drop(&mut self) {
        while self.dequeue().is_ok() {}
    }
}

//==================================================================================PRODUCER
/// Writing end. Usable from interrupt context: constant time, no allocation.
pub struct Producer<'a, T, const N: usize> {
    queue: &'a BoundedQueue<T, N>,
}

impl<'a, T, const N: usize> Producer<'a, T, N> {
    /// See [`BoundedQueue::enqueue`]. Wakes a consumer waiting in [`Consumer::next`].
    pub fn enqueue(&mut self, item: T) -> Result<(), QueueError> {
        // Safety: this is the only producer of the split queue.
        unsafe { self.queue.push(item) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

//==================================================================================CONSUMER
/// Reading end.
pub struct Consumer<'a, T, const N: usize> {
    queue: &'a BoundedQueue<T, N>,
}

impl<'a, T, const N: usize> Consumer<'a, T, N> {
    /// See [`BoundedQueue::dequeue`].
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        // Safety: this is the only consumer of the split queue.
        unsafe { self.queue.pop() }
    }

    /// Wait until an item is available and take it. Cooperative: yields while
    /// the queue is empty and is woken by the producer.
    pub async fn next(&mut self) -> T {
        let queue = self.queue;
        poll_fn(|cx| {
            // Safety: this is the only consumer of the split queue.
            if let Ok(item) = unsafe { queue.pop() } {
                return Poll::Ready(item);
            }
            queue.waker.register(cx.waker());
            // Re-check: an item may have landed between the pop and the registration.
            match unsafe { queue.pop() } {
                Ok(item) => Poll::Ready(item),
                Err(_) => Poll::Pending,
            }
        })
        .await
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

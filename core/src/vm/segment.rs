use super::fault::{Fault, Segment};
use super::value::Value;

/// Stack with a hard capacity fixed at construction. Backs both the operand
/// stack and the dump.
#[derive(Debug)]
pub struct BoundedStack<T> {
    items: Vec<T>,
    capacity: usize,
    peak: usize,
    segment: Segment,
}

impl<T> BoundedStack<T> {
    pub fn with_capacity(segment: Segment, capacity: usize) -> Result<Self, Fault> {
        let mut items = Vec::new();
        items
            .try_reserve_exact(capacity)
            .map_err(|_| Fault::Reserve { segment, capacity })?;
        Ok(Self {
            items,
            capacity,
            peak: 0,
            segment,
        })
    }

    /// Push `item`. The depth must stay below `capacity` once the push is done.
    pub fn push(&mut self, item: T) -> Result<(), Fault> {
        if self.items.len() + 1 >= self.capacity {
            return Err(Fault::Exhausted {
                segment: self.segment,
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        self.peak = self.peak.max(self.items.len());
        Ok(())
    }

    pub fn pop(&mut self) -> Result<T, Fault> {
        self.items.pop().ok_or(Fault::Underflow { segment: self.segment })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Highest depth reached so far.
    #[inline]
    pub fn peak(&self) -> usize {
        self.peak
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
}

impl BoundedStack<Value> {
    pub fn pop_int(&mut self) -> Result<i64, Fault> {
        self.pop()?.expect_int()
    }
}

/// The code segment: loaded words plus the capacity they must fit in.
#[derive(Debug, Clone)]
pub struct CodeSegment {
    words: Vec<i64>,
    capacity: usize,
}

impl CodeSegment {
    pub fn with_capacity(capacity: usize) -> Result<Self, Fault> {
        let mut words = Vec::new();
        words.try_reserve_exact(capacity).map_err(|_| Fault::Reserve {
            segment: Segment::Code,
            capacity,
        })?;
        Ok(Self { words, capacity })
    }

    /// Build a segment holding `words`; fails if they do not fit in `capacity`.
    pub fn from_words(words: &[i64], capacity: usize) -> Result<Self, Fault> {
        if words.len() > capacity {
            return Err(Fault::Exhausted {
                segment: Segment::Code,
                capacity,
            });
        }
        let mut code = Self::with_capacity(capacity)?;
        code.words.extend_from_slice(words);
        Ok(code)
    }

    pub fn push(&mut self, word: i64) -> Result<(), Fault> {
        if self.is_full() {
            return Err(Fault::Exhausted {
                segment: Segment::Code,
                capacity: self.capacity,
            });
        }
        self.words.push(word);
        Ok(())
    }

    #[inline]
    pub fn fetch(&self, pc: usize) -> Option<i64> {
        self.words.get(pc).copied()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.words.len() >= self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn words(&self) -> &[i64] {
        &self.words
    }
}

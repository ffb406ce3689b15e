use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::marker::PhantomData;

/// Slot index plus generation; a freed slot bumps its generation so stale ids stop resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GenerationalId {
    pub index: usize,
    pub generation: u32,
}

impl GenerationalId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Typed key handed out by an [`Arena`].
pub trait ArenaKey: Copy {
    fn from_raw(raw: GenerationalId) -> Self;
    fn raw(&self) -> GenerationalId;
}

/// Identifier of a simulated object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EntityId(pub GenerationalId);

impl EntityId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self(GenerationalId::new(index, generation))
    }

    pub fn from_index(index: u32) -> Self {
        Self::new(index as usize, 0)
    }

    pub fn index(&self) -> usize {
        self.0.index
    }

    pub fn generation(&self) -> u32 {
        self.0.generation
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self(GenerationalId::new(usize::MAX, 0))
    }
}

impl ArenaKey for EntityId {
    fn from_raw(raw: GenerationalId) -> Self {
        Self(raw)
    }

    fn raw(&self) -> GenerationalId {
        self.0
    }
}

/// Generational arena with stable slots. Removal never shifts other entries.
pub struct Arena<K: ArenaKey, T> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
    len: usize,
    _key: PhantomData<fn() -> K>,
}

impl<K: ArenaKey, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ArenaKey, T> Arena<K, T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
            len: 0,
            _key: PhantomData,
        }
    }

    pub fn insert(&mut self, item: T) -> K {
        self.len += 1;
        if let Some(index) = self.free_list.pop_front() {
            let generation = self.generations[index];
            self.items[index] = Some(item);
            return K::from_raw(GenerationalId::new(index, generation));
        }

        let index = self.items.len();
        self.items.push(Some(item));
        self.generations.push(0);
        K::from_raw(GenerationalId::new(index, 0))
    }

    pub fn get(&self, id: K) -> Option<&T> {
        if self.is_valid(id) {
            self.items.get(id.raw().index).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: K) -> Option<&mut T> {
        if self.is_valid(id) {
            self.items.get_mut(id.raw().index).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    pub fn contains(&self, id: K) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: K) -> Option<T> {
        if !self.is_valid(id) {
            return None;
        }
        let index = id.raw().index;
        let taken = self.items[index].take();
        if taken.is_some() {
            self.generations[index] = self.generations[index].wrapping_add(1);
            self.free_list.push_back(index);
            self.len -= 1;
        }
        taken
    }

    /// Drops every item. Generations survive so ids issued before the clear stay stale.
    pub fn clear(&mut self) {
        for (index, slot) in self.items.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.generations[index] = self.generations[index].wrapping_add(1);
                self.free_list.push_back(index);
            }
        }
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.items.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref().map(|item| {
                (
                    K::from_raw(GenerationalId::new(index, self.generations[index])),
                    item,
                )
            })
        })
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.items.iter_mut().filter_map(|slot| slot.as_mut())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn is_valid(&self, id: K) -> bool {
        let raw = id.raw();
        self.generations
            .get(raw.index)
            .copied()
            .map(|gen| gen == raw.generation)
            .unwrap_or(false)
    }
}

#[cfg(feature = "parallel")]
impl<K: ArenaKey, T: Send> Arena<K, T> {
    pub fn par_values_mut(&mut self) -> impl rayon::iter::ParallelIterator<Item = &mut T> + '_ {
        use rayon::prelude::*;
        self.items.par_iter_mut().filter_map(|slot| slot.as_mut())
    }
}

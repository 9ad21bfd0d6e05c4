use jbridge_api::CallbackHandle;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot map handing out generational handles.
///
/// Removing a value bumps its slot's generation before the slot is reused,
/// so a handle outliving its value resolves to nothing instead of to the
/// slot's next occupant. Generation `0` is never issued.
pub struct HandleRegistry<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }
}

impl<T> HandleRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> CallbackHandle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return CallbackHandle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        CallbackHandle::new(index, 1)
    }

    pub fn get(&self, handle: CallbackHandle) -> Option<&T> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn contains(&self, handle: CallbackHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Takes the value out; `None` if the handle is stale or was never issued.
    pub fn remove(&mut self, handle: CallbackHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let value = slot.value.take()?;

        slot.generation = match slot.generation.wrapping_add(1) {
            0 => 1,
            next => next,
        };
        self.free.push(handle.index());
        self.live -= 1;
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Typed value storage used to connect independent simulation modules.
///
/// Values are keyed by their concrete type, so a solver module can publish a
/// per-tick sample and a recorder can pick it up without the two knowing about
/// each other.
#[derive(Default)]
pub struct Bus {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the stored value of type `T`.
    pub fn put<T: 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Gets a reference to the stored value of type `T`, if present.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Gets a mutable reference to the stored value of type `T`, if present.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut::<T>())
    }

    /// Removes and returns the stored value of type `T`, if present.
    pub fn take<T: 'static>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|b| *b)
    }

    /// Whether a value of type `T` is currently stored.
    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Probe(f64);

    #[test]
    fn test_put_get_take() {
        let mut bus = Bus::new();
        assert!(!bus.contains::<Probe>());

        bus.put(Probe(21.5));
        assert_eq!(bus.get::<Probe>(), Some(&Probe(21.5)));

        bus.get_mut::<Probe>().unwrap().0 = 22.0;
        assert_eq!(bus.take::<Probe>(), Some(Probe(22.0)));
        assert!(bus.get::<Probe>().is_none());
    }

    #[test]
    fn test_put_replaces() {
        let mut bus = Bus::new();
        bus.put(Probe(1.0));
        bus.put(Probe(2.0));
        assert_eq!(bus.get::<Probe>(), Some(&Probe(2.0)));
    }
}

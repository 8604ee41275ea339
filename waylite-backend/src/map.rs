//! Wayland objects map

use std::cmp::Ordering;

/// Limit separating server-created from client-created objects IDs in the namespace
pub const SERVER_ID_LIMIT: u32 = 0xFF00_0000;

/// A holder for the object store of a connection
///
/// Keeps track of which object id is associated to which entry, keeping the
/// client-allocated range `[1, 0xff000000)` and the server-allocated range
/// `[0xff000000, 2^32)` disjoint. Freed ids become allocatable again only
/// once [`remove`][Self::remove] has been called for them, which the client
/// does upon `wl_display.delete_id`.
#[derive(Debug)]
pub struct ObjectMap<Data> {
    client_objects: Vec<Option<Data>>,
    server_objects: Vec<Option<Data>>,
}

impl<Data: Clone> Default for ObjectMap<Data> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Data: Clone> ObjectMap<Data> {
    /// Create a new empty object map
    pub fn new() -> Self {
        Self { client_objects: Vec::new(), server_objects: Vec::new() }
    }

    /// Find an object in the store
    pub fn find(&self, id: u32) -> Option<Data> {
        if id == 0 {
            None
        } else if id >= SERVER_ID_LIMIT {
            self.server_objects.get((id - SERVER_ID_LIMIT) as usize).and_then(Clone::clone)
        } else {
            self.client_objects.get((id - 1) as usize).and_then(Clone::clone)
        }
    }

    /// Remove an object from the store
    ///
    /// Does nothing if the object didn't previously exist
    pub fn remove(&mut self, id: u32) {
        if id == 0 {
            // nothing
        } else if id >= SERVER_ID_LIMIT {
            if let Some(place) = self.server_objects.get_mut((id - SERVER_ID_LIMIT) as usize) {
                *place = None;
            }
        } else if let Some(place) = self.client_objects.get_mut((id - 1) as usize) {
            *place = None;
        }
    }

    /// Insert given object for given id
    ///
    /// Can fail if the requested id is not the next free id of its store,
    /// in which case this is a protocol error.
    pub fn insert_at(&mut self, id: u32, data: Data) -> Result<(), ()> {
        if id == 0 {
            Err(())
        } else if id >= SERVER_ID_LIMIT {
            insert_in_at(&mut self.server_objects, (id - SERVER_ID_LIMIT) as usize, data)
        } else {
            insert_in_at(&mut self.client_objects, (id - 1) as usize, data)
        }
    }

    /// Allocate the next free id in the client namespace and store the entry
    /// built from it
    ///
    /// The constructor receives the allocated id, so the stored value can
    /// carry its own identifier.
    pub fn client_insert_with(&mut self, f: impl FnOnce(u32) -> Data) -> u32 {
        let store = &mut self.client_objects;
        match store.iter().position(Option::is_none) {
            Some(idx) => {
                store[idx] = Some(f(idx as u32 + 1));
                idx as u32 + 1
            }
            None => {
                let id = store.len() as u32 + 1;
                store.push(Some(f(id)));
                id
            }
        }
    }
}

// insert an object at a given place in a store
fn insert_in_at<Data>(store: &mut Vec<Option<Data>>, id: usize, data: Data) -> Result<(), ()> {
    match id.cmp(&store.len()) {
        Ordering::Greater => Err(()),
        Ordering::Equal => {
            store.push(Some(data));
            Ok(())
        }
        Ordering::Less => {
            let previous = &mut store[id];
            if previous.is_some() {
                return Err(());
            }
            *previous = Some(data);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ids_start_after_display() {
        let mut map = ObjectMap::new();
        map.insert_at(1, "display").unwrap();
        assert_eq!(map.client_insert_with(|_| "a"), 2);
        assert_eq!(map.client_insert_with(|_| "b"), 3);
        assert_eq!(map.find(1), Some("display"));
        assert_eq!(map.find(3), Some("b"));
    }

    #[test]
    fn constructor_sees_its_id() {
        let mut map: ObjectMap<u32> = ObjectMap::new();
        let id = map.client_insert_with(|id| id * 10);
        assert_eq!(map.find(id), Some(id * 10));
    }

    #[test]
    fn id_ranges_are_disjoint() {
        let mut map = ObjectMap::new();
        map.insert_at(SERVER_ID_LIMIT, "server").unwrap();
        let client_id = map.client_insert_with(|_| "client");
        assert!(client_id < SERVER_ID_LIMIT);
        assert_eq!(map.find(SERVER_ID_LIMIT), Some("server"));
        assert_eq!(map.find(client_id), Some("client"));
    }

    #[test]
    fn removed_ids_are_gone_then_reused() {
        let mut map = ObjectMap::new();
        let a = map.client_insert_with(|_| "a");
        let b = map.client_insert_with(|_| "b");
        map.remove(a);
        assert_eq!(map.find(a), None);
        assert_eq!(map.find(b), Some("b"));
        // the freed slot is allocatable again
        assert_eq!(map.client_insert_with(|_| "c"), a);
    }

    #[test]
    fn null_and_gap_inserts_are_rejected() {
        let mut map = ObjectMap::new();
        assert!(map.insert_at(0, "null").is_err());
        assert!(map.insert_at(5, "gap").is_err());
        map.insert_at(1, "one").unwrap();
        assert!(map.insert_at(1, "dup").is_err());
        assert!(map.insert_at(SERVER_ID_LIMIT + 1, "gap").is_err());
    }
}

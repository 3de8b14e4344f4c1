/// Generates a module handing out unique, reusable ids.
///
/// Ids are never zero, so zero can be used by callers as a "no object" sentinel.
macro_rules! id_gen {
    ($mod_name:ident) => {
        mod $mod_name {
            use once_cell::sync::Lazy;
            use std::{collections::HashSet, sync::Mutex};

            static ID_DATA: Lazy<Mutex<(HashSet<u32>, u32)>> =
                Lazy::new(|| Mutex::new((HashSet::new(), 1)));

            pub(crate) fn next() -> u32 {
                let mut guard = ID_DATA.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                let (id_set, counter) = &mut *guard;

                if id_set.len() == (u32::MAX - 1) as usize {
                    panic!("Out of ids");
                }

                while *counter == 0 || !id_set.insert(*counter) {
                    *counter = counter.wrapping_add(1);
                }

                let new_id = *counter;
                *counter = counter.wrapping_add(1);

                new_id
            }

            pub(crate) fn remove(id: u32) -> bool {
                ID_DATA
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .0
                    .remove(&id)
            }
        }
    };
}

pub(crate) use id_gen;

/// Declares an opaque handle to an object owned by the embedding compositor.
///
/// The crate never interprets the wrapped value, it only compares and hashes it.
macro_rules! foreign_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            #[inline]
            fn from(id: u64) -> Self {
                $name(id)
            }
        }
    };
}

pub(crate) use foreign_id;

#[cfg(test)]
mod tests {
    crate::utils::ids::id_gen!(test_ids);

    #[test]
    fn ids_are_unique_and_reusable() {
        let a = test_ids::next();
        let b = test_ids::next();
        assert_ne!(a, b);
        assert_ne!(0, a);
        assert!(test_ids::remove(a));
        assert!(!test_ids::remove(a));
    }
}

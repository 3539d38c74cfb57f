//! Dense index handles into the registry.

use std::fmt;

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

index_id!(
    /// Index of a course in the registry
    CourseId,
    "course#"
);
index_id!(
    /// Index of a lecturer in the registry
    LecturerId,
    "lecturer#"
);
index_id!(
    /// Index of a curriculum in the registry
    CurriculumId,
    "curriculum#"
);
index_id!(
    /// Index of a site in the registry
    SiteId,
    "site#"
);
index_id!(
    /// Index of a classroom in the registry
    RoomId,
    "room#"
);

/// Identity of one course event. Unique per [`EventFactory`](super::EventFactory).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub(crate) u64);

impl EventId {
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

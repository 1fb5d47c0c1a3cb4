//! Server-side id generation.

use uuid::Uuid;

use crate::store::Namespace;

pub trait IdGenerator: Send {
    /// A fresh id for a record in `namespace`. Never reused.
    fn next_id(&mut self, namespace: Namespace) -> String;
}

pub(crate) fn prefix(namespace: Namespace) -> &'static str {
    match namespace {
        Namespace::Users => "usr",
        Namespace::Pets => "pet",
        Namespace::Shelters => "shl",
        Namespace::Adoptions => "adp",
    }
}

/// `<prefix>-<uuid v4>` ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, namespace: Namespace) -> String {
        format!("{}-{}", prefix(namespace), Uuid::new_v4())
    }
}

/// `<prefix>-<n>` ids from one shared counter; deterministic fixtures.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, namespace: Namespace) -> String {
        self.next += 1;
        format!("{}-{}", prefix(namespace), self.next)
    }
}

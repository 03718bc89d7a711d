//! Access policy
//!
//! A static policy table evaluated by a single `authorize` function taking
//! (caller, resource, action). Order ownership is a separate check because
//! it needs the loaded record.

use once_cell::sync::Lazy;

use super::DomainError;

/// Caller identity as seen by the policy layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User { id: i32 },
    Staff { id: i32 },
}

impl Caller {
    pub fn user_id(&self) -> Option<i32> {
        match self {
            Caller::Anonymous => None,
            Caller::User { id } | Caller::Staff { id } => Some(*id),
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Caller::Staff { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Book,
    Author,
    Order,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
    Create,
    List,
    Retrieve,
    UpdateStatus,
}

/// Minimum privilege required for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Privilege {
    /// Anyone, including anonymous callers
    Public,
    /// Any authenticated caller
    Authenticated,
    /// Staff only
    Staff,
}

static POLICY: Lazy<Vec<(Resource, Action, Privilege)>> = Lazy::new(|| {
    vec![
        (Resource::Book, Action::Read, Privilege::Public),
        (Resource::Book, Action::Write, Privilege::Staff),
        (Resource::Author, Action::Read, Privilege::Public),
        (Resource::Author, Action::Write, Privilege::Staff),
        (Resource::Order, Action::Create, Privilege::Authenticated),
        // List is implicitly scoped to the caller's own orders
        (Resource::Order, Action::List, Privilege::Authenticated),
        // Retrieve additionally requires ownership, checked via
        // `authorize_order_access` once the record is loaded
        (Resource::Order, Action::Retrieve, Privilege::Authenticated),
        (Resource::Order, Action::UpdateStatus, Privilege::Staff),
    ]
});

/// Evaluate the policy table for one operation.
pub fn authorize(caller: &Caller, resource: Resource, action: Action) -> Result<(), DomainError> {
    let privilege = POLICY
        .iter()
        .find(|(r, a, _)| *r == resource && *a == action)
        .map(|(_, _, p)| *p)
        // No rule means the operation is not open to anyone but staff
        .unwrap_or(Privilege::Staff);

    match privilege {
        Privilege::Public => Ok(()),
        Privilege::Authenticated => match caller {
            Caller::Anonymous => Err(DomainError::Authentication(
                "Authentication credentials were not provided.".to_string(),
            )),
            _ => Ok(()),
        },
        Privilege::Staff => match caller {
            Caller::Anonymous => Err(DomainError::Authentication(
                "Authentication credentials were not provided.".to_string(),
            )),
            Caller::Staff { .. } => Ok(()),
            Caller::User { .. } => Err(DomainError::Authorization(
                "You do not have permission to perform this action.".to_string(),
            )),
        },
    }
}

/// Ownership check for a loaded order: the owner or staff may see it.
pub fn authorize_order_access(caller: &Caller, owner_id: i32) -> Result<(), DomainError> {
    if caller.is_staff() || caller.user_id() == Some(owner_id) {
        Ok(())
    } else {
        Err(DomainError::Authorization(
            "You do not have permission to perform this action.".to_string(),
        ))
    }
}

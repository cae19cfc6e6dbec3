//! Owner / member checks shared by every canvas operation.

use super::models::Canvas;

/// What a resolved user may do with one canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Access {
    pub is_owner: bool,
    pub is_member: bool,
}

impl Access {
    pub fn of(user_id: &str, canvas: &Canvas) -> Self {
        Self {
            is_owner: canvas.owner == user_id,
            is_member: canvas.shared.iter().any(|id| id == user_id),
        }
    }

    /// Read and overwrite `elements`.
    pub fn can_edit(&self) -> bool {
        self.is_owner || self.is_member
    }

    /// Share or delete.
    pub fn can_manage(&self) -> bool {
        self.is_owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new("Board1", "alice");
        canvas.shared.push("bob".to_string());
        canvas
    }

    #[test]
    fn test_owner() {
        let access = Access::of("alice", &canvas());
        assert!(access.is_owner);
        assert!(!access.is_member);
        assert!(access.can_edit());
        assert!(access.can_manage());
    }

    #[test]
    fn test_member_can_edit_but_not_manage() {
        let access = Access::of("bob", &canvas());
        assert!(!access.is_owner);
        assert!(access.is_member);
        assert!(access.can_edit());
        assert!(!access.can_manage());
    }

    #[test]
    fn test_stranger_has_no_access() {
        let access = Access::of("carol", &canvas());
        assert_eq!(access, Access::default());
        assert!(!access.can_edit());
        assert!(!access.can_manage());
    }
}

use crate::mapping::IdentityMapping;

/// Resolves source email addresses to destination user ids.
///
/// Never fails: an absent, empty or unmapped email resolves to the default user.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    mapping: IdentityMapping,
    default_user_id: i64,
}

impl IdentityResolver {
    pub fn new(mapping: IdentityMapping, default_user_id: i64) -> Self {
        Self {
            mapping,
            default_user_id,
        }
    }

    pub fn resolve(&self, email: Option<&str>) -> i64 {
        match email {
            Some(email) if !email.is_empty() => {
                self.mapping.lookup(email).unwrap_or(self.default_user_id)
            }
            _ => self.default_user_id,
        }
    }

    pub fn default_user_id(&self) -> i64 {
        self.default_user_id
    }
}

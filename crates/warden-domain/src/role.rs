//! Role names, the role hierarchy and route-level role requirements.

/// Stable role name: full administrative access.
pub const ADMIN: &str = "admin";

/// Stable role name: service provider area access.
pub const SERVICE_PROVIDER: &str = "service_provider";

/// Stable role name: default role assigned at registration.
pub const CUSTOMER: &str = "customer";

/// Role held by every newly registered account.
pub const DEFAULT_ROLE: &str = CUSTOMER;

/// Roles implied by holding another role.
///
/// `admin` is accepted wherever `service_provider` is required; the reverse
/// does not hold.
const IMPLIED: &[(&str, &[&str])] = &[(ADMIN, &[SERVICE_PROVIDER])];

/// Returns `true` if a holder of `held` satisfies a check for `required`.
///
/// ```
/// use warden_domain::role::{grants, ADMIN, SERVICE_PROVIDER};
///
/// assert!(grants(ADMIN, SERVICE_PROVIDER));
/// assert!(!grants(SERVICE_PROVIDER, ADMIN));
/// ```
pub fn grants(held: &str, required: &str) -> bool {
    if held == required {
        return true;
    }
    IMPLIED
        .iter()
        .any(|(role, implied)| *role == held && implied.contains(&required))
}

/// Returns `true` if any role in `held` satisfies a check for `required`.
pub fn holds<S: AsRef<str>>(held: &[S], required: &str) -> bool {
    held.iter().any(|r| grants(r.as_ref(), required))
}

/// A route-level role requirement: the caller must hold any of `any_of`.
///
/// `capability` names the class of caller the route is for and is used in
/// the 403 message ("access denied: must be an administrator").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirement {
    pub any_of: &'static [&'static str],
    pub capability: &'static str,
}

impl RoleRequirement {
    pub const ADMIN: Self = Self {
        any_of: &[ADMIN],
        capability: "an administrator",
    };

    pub const SERVICE_PROVIDER: Self = Self {
        any_of: &[SERVICE_PROVIDER],
        capability: "a service provider",
    };

    /// Returns `true` if the given role set satisfies this requirement.
    pub fn is_satisfied_by<S: AsRef<str>>(&self, held: &[S]) -> bool {
        self.any_of.iter().any(|required| holds(held, required))
    }

    /// Message returned to a caller who is authenticated but lacks the role.
    pub fn denial_message(&self) -> String {
        format!("access denied: must be {}", self.capability)
    }
}

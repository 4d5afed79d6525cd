//! Directory server route table

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
}

pub mod users {
    pub const COLLECTION: &str = "/users/";
    pub const ITEM: &str = "/users/{id}";
    pub const SALARY: &str = "/users/{id}/salary";
}

pub mod utils {
    /// Substitute a `{param}` placeholder in a route template
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        route.replace(param, value.as_ref())
    }

    /// Route for a single user record
    pub fn user_item(id: impl std::fmt::Display) -> String {
        replace_param(super::users::ITEM, "{id}", id.to_string())
    }

    pub fn user_salary(id: impl std::fmt::Display) -> String {
        replace_param(super::users::SALARY, "{id}", id.to_string())
    }
}

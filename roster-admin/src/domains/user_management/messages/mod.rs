use roster_model::prelude::{Role, UserId};

use crate::domains::user_management::form::FormField;

#[derive(Clone, Debug)]
pub enum Message {
    // Directory
    LoadUsers,

    // Form lifecycle
    CreateUser,
    EditUser(UserId),
    EditUserRole(UserId),
    UpdateFormField(FormField, String),
    UpdateFormRole(Role),
    SubmitForm,
    CancelForm,

    // User deletion
    DeleteUser(UserId),
    DeleteUserConfirm,
    DeleteUserCancel,

    // Salary; raw input, parsed on dispatch
    SetSalary(UserId, String),
}

impl Message {
    /// Returns a sanitized display string that hides sensitive credential data
    pub fn sanitized_display(&self) -> String {
        match self {
            Self::UpdateFormField(FormField::Password, _) => {
                "UpdateFormField(Password, ***)".to_string()
            }
            _ => format!("{:?}", self),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadUsers => "UserManagement::LoadUsers",

            Self::CreateUser => "UserManagement::CreateUser",
            Self::EditUser(_) => "UserManagement::EditUser",
            Self::EditUserRole(_) => "UserManagement::EditUserRole",
            Self::UpdateFormField(_, _) => "UserManagement::UpdateFormField",
            Self::UpdateFormRole(_) => "UserManagement::UpdateFormRole",
            Self::SubmitForm => "UserManagement::SubmitForm",
            Self::CancelForm => "UserManagement::CancelForm",

            Self::DeleteUser(_) => "UserManagement::DeleteUser",
            Self::DeleteUserConfirm => "UserManagement::DeleteUserConfirm",
            Self::DeleteUserCancel => "UserManagement::DeleteUserCancel",

            Self::SetSalary(_, _) => "UserManagement::SetSalary",
        }
    }
}

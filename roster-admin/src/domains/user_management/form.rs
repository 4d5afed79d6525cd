//! User form lifecycle
//!
//! One form at a time, in one of three modes. The mode decides which fields
//! are editable and what [`FormState::submit_payload`] produces.

use roster_model::prelude::{
    CreateUserRequest, Role, UpdateUserRequest, UserId, UserRecord,
};

use crate::domains::auth::security::SecureCredential;
use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(UserId),
    /// Only the role is editable
    Role(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Surname,
    Email,
    Phone,
    Password,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Surname => "Surname",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
            FormField::Password => "Password",
        }
    }
}

/// Field values; `Default` is the empty template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    /// Present only in create mode
    pub password: Option<SecureCredential>,
    pub role: Role,
}

impl FormFields {
    fn from_record(record: &UserRecord, role: Role) -> Self {
        Self {
            name: record.name.clone(),
            surname: record.surname.clone(),
            email: record.email.clone(),
            phone: record.phone.clone().unwrap_or_default(),
            password: None,
            role,
        }
    }

    fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Surname => &self.surname,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Password => {
                self.password.as_ref().map_or("", SecureCredential::as_str)
            }
        }
    }
}

/// Payload for the remote call a submit performs
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitPayload {
    Create(CreateUserRequest),
    Update(UserId, UpdateUserRequest),
}

/// Form lifecycle: closed when `mode` is `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    mode: Option<FormMode>,
    fields: FormFields,
}

impl FormState {
    pub fn mode(&self) -> Option<FormMode> {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Open an empty create form, replacing any open form
    pub fn open_create(&mut self) {
        self.mode = Some(FormMode::Create);
        self.fields = FormFields {
            password: Some(SecureCredential::default()),
            ..FormFields::default()
        };
    }

    /// Prefill from `record`; an unset role becomes `user`
    pub fn open_edit(&mut self, record: &UserRecord) {
        self.mode = Some(FormMode::Edit(record.id));
        self.fields = FormFields::from_record(record, record.role.unwrap_or_default());
    }

    /// Prefill from `record`; an unset role becomes the first role option
    pub fn open_role(&mut self, record: &UserRecord) {
        self.mode = Some(FormMode::Role(record.id));
        self.fields = FormFields::from_record(
            record,
            record.role.unwrap_or_else(Role::first_option),
        );
    }

    /// Close and reset to the empty template
    pub fn close(&mut self) {
        self.mode = None;
        self.fields = FormFields::default();
    }

    pub fn is_editable(&self, field: FormField) -> bool {
        match (self.mode, field) {
            (None, _) | (Some(FormMode::Role(_)), _) => false,
            (Some(FormMode::Create), _) => true,
            (Some(FormMode::Edit(_)), FormField::Password) => false,
            (Some(FormMode::Edit(_)), _) => true,
        }
    }

    /// Update a text field. Returns false when the edit was ignored.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> bool {
        if !self.is_editable(field) {
            log::debug!(
                "[Form] Ignoring edit to read-only field {:?} in {:?}",
                field,
                self.mode
            );
            return false;
        }
        let value = value.into();
        match field {
            FormField::Name => self.fields.name = value,
            FormField::Surname => self.fields.surname = value,
            FormField::Email => self.fields.email = value,
            FormField::Phone => self.fields.phone = value,
            FormField::Password => {
                self.fields.password = Some(SecureCredential::new(value))
            }
        }
        true
    }

    /// Role is editable in every open mode
    pub fn set_role(&mut self, role: Role) -> bool {
        if self.mode.is_none() {
            return false;
        }
        self.fields.role = role;
        true
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let required: &[FormField] = match self.mode {
            None | Some(FormMode::Role(_)) => &[],
            Some(FormMode::Edit(_)) => {
                &[FormField::Name, FormField::Surname, FormField::Email]
            }
            Some(FormMode::Create) => &[
                FormField::Name,
                FormField::Surname,
                FormField::Email,
                FormField::Password,
            ],
        };
        match required
            .iter()
            .find(|field| self.fields.get(**field).trim().is_empty())
        {
            Some(field) => Err(ValidationError::MissingField(field.label())),
            None => Ok(()),
        }
    }

    /// Exact payload for the current mode; `Ok(None)` when closed
    pub fn submit_payload(&self) -> Result<Option<SubmitPayload>, ValidationError> {
        let Some(mode) = self.mode else {
            return Ok(None);
        };
        self.validate()?;

        let fields = &self.fields;
        let payload = match mode {
            FormMode::Create => SubmitPayload::Create(CreateUserRequest {
                name: fields.name.clone(),
                surname: fields.surname.clone(),
                email: fields.email.clone(),
                phone: Some(fields.phone.clone()).filter(|phone| !phone.is_empty()),
                password: fields
                    .password
                    .as_ref()
                    .map(|password| password.as_str().to_string())
                    .unwrap_or_default(),
                role: fields.role,
            }),
            FormMode::Edit(id) => SubmitPayload::Update(
                id,
                UpdateUserRequest {
                    name: Some(fields.name.clone()),
                    surname: Some(fields.surname.clone()),
                    email: Some(fields.email.clone()),
                    phone: Some(fields.phone.clone()),
                    role: Some(fields.role),
                },
            ),
            FormMode::Role(id) => {
                SubmitPayload::Update(id, UpdateUserRequest::role_only(fields.role))
            }
        };
        Ok(Some(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: Option<Role>, phone: Option<&str>) -> UserRecord {
        UserRecord {
            id: UserId(7),
            name: "Ali".into(),
            surname: "Kaya".into(),
            email: "ali@x.io".into(),
            phone: phone.map(str::to_string),
            role,
            salary: None,
            is_active: Some(true),
        }
    }

    #[test]
    fn closed_form_never_submits() {
        let form = FormState::default();
        assert!(!form.is_open());
        assert_eq!(form.submit_payload(), Ok(None));
    }

    #[test]
    fn create_starts_from_the_empty_template() {
        let mut form = FormState::default();
        form.open_create();

        let fields = form.fields();
        assert_eq!(form.mode(), Some(FormMode::Create));
        assert!(fields.name.is_empty() && fields.email.is_empty());
        assert_eq!(fields.role, Role::User);
        assert_eq!(fields.password, Some(SecureCredential::default()));
    }

    #[test]
    fn edit_prefills_and_defaults_unset_values() {
        let mut form = FormState::default();
        form.open_edit(&record(None, None));

        assert_eq!(form.mode(), Some(FormMode::Edit(UserId(7))));
        assert_eq!(form.fields().phone, "");
        assert_eq!(form.fields().role, Role::User);
        assert_eq!(form.fields().password, None);
    }

    #[test]
    fn role_mode_defaults_to_first_option_and_locks_other_fields() {
        let mut form = FormState::default();
        form.open_role(&record(None, Some("555")));

        assert_eq!(form.fields().role, Role::Admin);
        assert!(!form.set_field(FormField::Name, "Changed"));
        assert_eq!(form.fields().name, "Ali");

        assert!(form.set_role(Role::User));
        assert_eq!(form.fields().role, Role::User);
    }

    #[test]
    fn password_is_ignored_outside_create_mode() {
        let mut form = FormState::default();
        form.open_edit(&record(Some(Role::Admin), None));

        assert!(!form.set_field(FormField::Password, "secret"));
        assert_eq!(form.fields().password, None);
        assert!(form.set_field(FormField::Phone, "555 0101"));
        assert_eq!(form.fields().phone, "555 0101");
    }

    #[test]
    fn role_mode_payload_contains_only_the_role() {
        let mut form = FormState::default();
        form.open_role(&record(Some(Role::User), None));
        form.set_role(Role::Admin);

        assert_eq!(
            form.submit_payload(),
            Ok(Some(SubmitPayload::Update(
                UserId(7),
                UpdateUserRequest::role_only(Role::Admin)
            )))
        );
    }

    #[test]
    fn edit_payload_sends_the_full_field_set() {
        let mut form = FormState::default();
        form.open_edit(&record(Some(Role::User), None));
        form.set_field(FormField::Email, "ali.kaya@x.io");

        let Ok(Some(SubmitPayload::Update(id, request))) = form.submit_payload() else {
            panic!("expected an update payload");
        };
        assert_eq!(id, UserId(7));
        assert_eq!(request.name.as_deref(), Some("Ali"));
        assert_eq!(request.email.as_deref(), Some("ali.kaya@x.io"));
        assert_eq!(request.phone.as_deref(), Some(""));
        assert_eq!(request.role, Some(Role::User));
    }

    #[test]
    fn create_requires_password_and_omits_blank_phone() {
        let mut form = FormState::default();
        form.open_create();
        form.set_field(FormField::Name, "Zeynep");
        form.set_field(FormField::Surname, "Demir");
        form.set_field(FormField::Email, "zeynep@x.io");

        assert_eq!(
            form.submit_payload(),
            Err(ValidationError::MissingField("Password"))
        );

        form.set_field(FormField::Password, "pw");
        let Ok(Some(SubmitPayload::Create(request))) = form.submit_payload() else {
            panic!("expected a create payload");
        };
        assert_eq!(request.phone, None);
        assert_eq!(request.password, "pw");
        assert_eq!(request.role, Role::User);
    }

    #[test]
    fn edit_rejects_blank_required_fields() {
        let mut form = FormState::default();
        form.open_edit(&record(Some(Role::User), None));
        form.set_field(FormField::Surname, "   ");

        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingField("Surname"))
        );
    }

    #[test]
    fn close_resets_to_template_and_reopen_replaces() {
        let mut form = FormState::default();
        form.open_edit(&record(Some(Role::Admin), Some("1")));
        form.open_create();
        assert_eq!(form.mode(), Some(FormMode::Create));
        assert!(form.fields().name.is_empty());

        form.close();
        assert_eq!(form, FormState::default());
    }
}

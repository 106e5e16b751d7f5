//! Resource descriptors for the generic list view.
//!
//! Partners and listeners are both rendered by `resource_list.html`; what
//! differs between them (columns, search fields, row rendering, form fields
//! and validator) is captured in a [`ResourceDescriptor`].

use tunenest_core::PartnerId;

use crate::api::{EndUser, Partner, PartnerInput};
use crate::components::badge::Badge;
use crate::components::data_table::{
    DataTableConfig, RowAction, TableCell, TableRow, listeners_table_config,
    partners_table_config,
};
use crate::components::modal::Modal;

use super::filter::{Searchable, filter_records};
use super::state::LoadState;
use super::validation::{FormValues, ValidationError, partner_input};

/// Input control of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Tel,
    Number,
    TextArea,
    /// `(value, label)` pairs; the first entry is the placeholder option.
    Select(&'static [(&'static str, &'static str)]),
}

/// One field of a resource form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub required: bool,
    pub placeholder: &'static str,
}

impl FormField {
    const fn new(name: &'static str, label: &'static str, input: InputKind) -> Self {
        Self {
            name,
            label,
            input,
            required: false,
            placeholder: "",
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    #[must_use]
    pub const fn is_textarea(&self) -> bool {
        matches!(self.input, InputKind::TextArea)
    }

    /// Options of a select field.
    #[must_use]
    pub const fn options(&self) -> &'static [(&'static str, &'static str)] {
        match self.input {
            InputKind::Select(options) => options,
            _ => &[],
        }
    }

    /// HTML `type` attribute of an `<input>`.
    #[must_use]
    pub const fn html_type(&self) -> &'static str {
        match self.input {
            InputKind::Email => "email",
            InputKind::Tel => "tel",
            InputKind::Number => "number",
            InputKind::Text | InputKind::TextArea | InputKind::Select(_) => "text",
        }
    }
}

/// Create/edit form of a resource.
#[derive(Debug, Clone)]
pub struct ResourceForm<I> {
    pub create_label: &'static str,
    pub fields: Vec<FormField>,
    pub validate: fn(&FormValues) -> Result<I, ValidationError>,
}

/// Everything the generic list view needs to know about one resource.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor<T, I = ()> {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Dashboard route of the list.
    pub route: &'static str,
    /// Backend collection endpoint.
    pub endpoint: &'static str,
    /// Labels of the fields the search box matches.
    pub search_fields: &'static [&'static str],
    pub table: DataTableConfig,
    pub row: fn(&T) -> TableRow,
    pub form: Option<ResourceForm<I>>,
}

/// A field with its current value, ready for the template.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub field: FormField,
    pub value: String,
}

impl FieldView {
    /// Whether a select option matches the current value.
    #[must_use]
    pub fn is_selected(&self, option: &str) -> bool {
        self.value == option
    }
}

/// A rendered create or edit form.
#[derive(Debug, Clone)]
pub struct FormView {
    pub modal: Modal,
    pub action: String,
    pub submit_label: &'static str,
    pub fields: Vec<FieldView>,
}

/// Tab linking between sibling list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTab {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// The rendered list view.
#[derive(Debug, Clone)]
pub struct ListView {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub route: &'static str,
    pub table: DataTableConfig,
    pub rows: Vec<TableRow>,
    pub search: String,
    pub search_hint: String,
    /// Rows shown after filtering.
    pub shown: usize,
    /// Rows fetched.
    pub total: usize,
    pub error: Option<String>,
    pub create_label: Option<&'static str>,
}

impl<T: Searchable, I> ResourceDescriptor<T, I> {
    /// Apply the search term to the fetched records and build the rows.
    #[must_use]
    pub fn list_view(&self, state: &LoadState<Vec<T>>, search: &str) -> ListView {
        let (rows, total) = match state.loaded() {
            Some(records) => {
                let rows = filter_records(records, search)
                    .into_iter()
                    .map(self.row)
                    .collect::<Vec<_>>();
                (rows, records.len())
            }
            None => (vec![], 0),
        };

        ListView {
            key: self.key,
            title: self.title,
            description: self.description,
            route: self.route,
            table: self.table.clone(),
            shown: rows.len(),
            rows,
            search: search.to_string(),
            search_hint: format!("Matches {}", self.search_fields.join(", ")),
            total,
            error: state.error().map(String::from),
            create_label: self.form.as_ref().map(|form| form.create_label),
        }
    }

    /// Build a form with the given values.
    #[must_use]
    pub fn form_view(
        &self,
        modal: Modal,
        action: String,
        submit_label: &'static str,
        values: &FormValues,
    ) -> Option<FormView> {
        let form = self.form.as_ref()?;
        Some(FormView {
            modal,
            action,
            submit_label,
            fields: form
                .fields
                .iter()
                .map(|field| FieldView {
                    field: *field,
                    value: values.get(field.name).to_string(),
                })
                .collect(),
        })
    }

    /// Run the form's validator.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; also fails for resources without a
    /// form.
    pub fn validate(&self, values: &FormValues) -> Result<I, ValidationError> {
        match &self.form {
            Some(form) => (form.validate)(values),
            None => Err(ValidationError(format!("{} are read-only", self.title))),
        }
    }
}

/// A partner with the outcome of its email status lookup.
#[derive(Debug, Clone)]
pub struct PartnerRow {
    pub partner: Partner,
    /// `None` when the status lookup failed.
    pub email_sent: Option<bool>,
}

impl Searchable for PartnerRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.partner.name.as_str(),
            self.partner.email.as_str(),
            self.partner.service_name.as_str(),
        ]
    }
}

impl Searchable for EndUser {
    fn search_fields(&self) -> Vec<&str> {
        self.name
            .as_deref()
            .into_iter()
            .chain(self.email.as_deref())
            .collect()
    }
}

/// Service types offered in the partner form.
pub const SERVICE_TYPES: &[(&str, &str)] = &[
    ("", "Select service type"),
    ("Electrician", "Electrician"),
    ("Plumber", "Plumber"),
    ("Ac Technician", "AC Technician"),
    ("Painter", "Painter"),
    ("Other", "Other"),
];

fn partner_row(row: &PartnerRow) -> TableRow {
    let partner = &row.partner;
    let id = partner.id.as_str();
    let base = format!("/users/{}", urlencoding::encode(id));

    TableRow {
        id: id.to_string(),
        cells: vec![
            TableCell::Stacked {
                primary: partner.name.clone(),
                secondary: partner.email.clone(),
            },
            TableCell::text(partner.phone.as_str()),
            TableCell::text(partner.service_name.as_str()),
            TableCell::Badge(Badge::service_type(&partner.service_type)),
            partner
                .experience
                .map_or(TableCell::Empty, |years| TableCell::text(format!("{years} yrs"))),
            partner
                .charges
                .map_or(TableCell::Empty, |charges| TableCell::text(format!("₹{charges}"))),
            TableCell::Badge(Badge::email_status(row.email_sent)),
        ],
        actions: vec![
            RowAction::link(
                "View",
                "ph-eye",
                format!("/users?view={}", urlencoding::encode(id)),
            ),
            RowAction::link(
                "Edit",
                "ph-pencil-simple",
                format!("/users?edit={}", urlencoding::encode(id)),
            ),
            RowAction::post("Resend email", "ph-envelope", format!("{base}/resend-email")).confirm(
                format!(
                    "Resend welcome email to {}? They will receive new login credentials.",
                    partner.name
                ),
            ),
            RowAction::post("Reset password", "ph-key", format!("{base}/reset-password")).confirm(
                format!(
                    "Reset password for {}? They will receive new credentials via email.",
                    partner.name
                ),
            ),
            RowAction::post("Delete", "ph-trash", format!("{base}/delete"))
                .confirm(format!(
                    "Are you sure you want to delete partner \"{}\"? This action cannot be undone.",
                    partner.name
                ))
                .destructive(),
        ],
    }
}

fn listener_row(user: &EndUser) -> TableRow {
    TableRow {
        id: user.id.as_str().to_string(),
        cells: vec![
            TableCell::text(user.display_name()),
            TableCell::optional(user.email.as_deref()),
            TableCell::optional(user.created_at.as_deref().map(|d| d.get(..10).unwrap_or(d))),
        ],
        actions: vec![],
    }
}

/// Service partners (the `/users` screen).
#[must_use]
pub fn partners() -> ResourceDescriptor<PartnerRow, PartnerInput> {
    ResourceDescriptor {
        key: "partners",
        title: "Partners",
        description: "Registered service providers and their credential emails",
        route: "/users",
        endpoint: "/partner",
        search_fields: &["name", "email", "service name"],
        table: partners_table_config(),
        row: partner_row,
        form: Some(ResourceForm {
            create_label: "Register Partner",
            fields: vec![
                FormField::new("name", "Full name", InputKind::Text).required(),
                FormField::new("email", "Email", InputKind::Email).required(),
                FormField::new("phone", "Phone", InputKind::Tel)
                    .required()
                    .placeholder("10-digit mobile number"),
                FormField::new("serviceName", "Service / business name", InputKind::Text)
                    .required(),
                FormField::new("serviceType", "Service type", InputKind::Select(SERVICE_TYPES))
                    .required(),
                FormField::new("experience", "Experience (years)", InputKind::Number),
                FormField::new("charges", "Charges (₹)", InputKind::Number),
                FormField::new("serviceArea", "Service areas", InputKind::Text)
                    .placeholder("Comma separated, e.g. Pune, Mumbai"),
                FormField::new("panNumber", "PAN number", InputKind::Text),
                FormField::new("aadharNumber", "Aadhaar number", InputKind::Text),
                FormField::new("address", "Address", InputKind::TextArea),
                FormField::new("notes", "Notes", InputKind::TextArea),
            ],
            validate: partner_input,
        }),
    }
}

/// Platform end users (read-only).
#[must_use]
pub fn listeners() -> ResourceDescriptor<EndUser> {
    ResourceDescriptor {
        key: "listeners",
        title: "Listeners",
        description: "Accounts registered on the TuneNest app",
        route: "/users/listeners",
        endpoint: "/user",
        search_fields: &["name", "email"],
        table: listeners_table_config(),
        row: listener_row,
        form: None,
    }
}

/// Tabs shared by the partners and listeners views.
#[must_use]
pub fn user_tabs(active: &str) -> Vec<ViewTab> {
    [("Partners", "/users"), ("Listeners", "/users/listeners")]
        .into_iter()
        .map(|(label, href)| ViewTab {
            label,
            href,
            active: href == active,
        })
        .collect()
}

/// Locate a partner by id in a loaded list.
#[must_use]
pub fn find_partner<'a>(rows: &'a [PartnerRow], id: &PartnerId) -> Option<&'a PartnerRow> {
    rows.iter().find(|row| &row.partner.id == id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn partner(id: &str, name: &str, service: &str) -> PartnerRow {
        let partner: Partner = serde_json::from_value(serde_json::json!({
            "_id": id,
            "name": name,
            "email": format!("{}@fixit.in", name.to_lowercase()),
            "phone": "9876543210",
            "serviceName": service,
            "serviceType": "Plumber",
        }))
        .unwrap();
        PartnerRow {
            partner,
            email_sent: Some(true),
        }
    }

    #[test]
    fn test_list_view_filters_and_counts() {
        let descriptor = partners();
        let state = LoadState::Loaded(vec![
            partner("p1", "Ravi", "Ravi Plumbing"),
            partner("p2", "Meena", "Spark Electricals"),
        ]);

        let view = descriptor.list_view(&state, "spark");
        assert_eq!(view.total, 2);
        assert_eq!(view.shown, 1);
        assert_eq!(view.rows[0].id, "p2");
        assert_eq!(view.create_label, Some("Register Partner"));
    }

    #[test]
    fn test_failed_state_renders_no_rows() {
        let descriptor = listeners();
        let view = descriptor.list_view(&LoadState::Failed("Failed to fetch users".into()), "");
        assert!(view.rows.is_empty());
        assert_eq!(view.error.as_deref(), Some("Failed to fetch users"));
        assert!(view.create_label.is_none());
        assert!(descriptor.validate(&FormValues::default()).is_err());
    }

    #[test]
    fn test_partner_row_actions() {
        let row = partner_row(&partner("p 1", "Ravi", "Ravi Plumbing"));
        assert_eq!(row.cells.len(), partners_table_config().columns.len());
        let delete = row.actions.last().unwrap();
        assert!(delete.destructive && delete.is_post());
        assert_eq!(delete.href, "/users/p%201/delete");
    }

    #[test]
    fn test_form_view_keeps_values() {
        let values = FormValues::from([("name", "Ravi"), ("phone", "98765")]);
        let form = partners()
            .form_view(
                Modal::new("partner-form", "Register Partner"),
                "/users".to_string(),
                "Register",
                &values,
            )
            .unwrap();
        assert_eq!(form.fields[0].value, "Ravi");
        assert_eq!(form.fields[2].value, "98765");
        assert_eq!(form.fields[4].field.options().len(), SERVICE_TYPES.len());
    }
}

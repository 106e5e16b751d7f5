//! Data table component types.
//!
//! These types define the configuration and rows of the reusable data table
//! rendered by the `data_table` macro in `partials/ui.html`.

use serde::Serialize;

use super::badge::Badge;

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Right-align (amounts, counts).
    pub numeric: bool,
    /// Whether the column is shown on narrow screens.
    pub default_visible: bool,
}

impl TableColumn {
    /// Create a new text column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            numeric: false,
            default_visible: true,
        }
    }

    /// Create a right-aligned column.
    #[must_use]
    pub fn numeric(key: &str, label: &str) -> Self {
        Self {
            numeric: true,
            ..Self::new(key, label)
        }
    }

    /// Set whether the column is visible on narrow screens.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// Select filter shown next to the search box.
#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    /// Query parameter key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Available options.
    pub options: Vec<FilterOption>,
}

/// Option for select filters.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

impl TableFilter {
    /// Create a select filter. The first option should be the "All" choice.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            options,
        }
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Filter definitions (besides the search box).
    pub filters: Vec<TableFilter>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Icon for empty state.
    pub empty_icon: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
    /// Whether rows carry an actions column.
    pub has_actions: bool,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            filters: vec![],
            search_placeholder: "Search...".to_string(),
            empty_icon: "ph-list".to_string(),
            empty_title: "No items found".to_string(),
            empty_description: None,
            has_actions: false,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Enable the trailing actions column.
    #[must_use]
    pub const fn with_actions(mut self) -> Self {
        self.has_actions = true;
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, icon: &str, title: &str, description: Option<&str>) -> Self {
        self.empty_icon = icon.to_string();
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }
}

/// Content of one table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCell {
    Text(String),
    /// Secondary text under a primary line.
    Stacked { primary: String, secondary: String },
    Badge(Badge),
    Empty,
}

impl TableCell {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Text, or an empty cell when the value is blank.
    #[must_use]
    pub fn optional(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Self::Text(v.to_string()),
            _ => Self::Empty,
        }
    }

    /// Main line of a text cell; `None` for badges.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Stacked { primary: text, .. } => Some(text),
            Self::Empty => Some("—"),
            Self::Badge(_) => None,
        }
    }

    /// Second line of a stacked cell, when not blank.
    #[must_use]
    pub fn secondary(&self) -> Option<&str> {
        match self {
            Self::Stacked { secondary, .. } if !secondary.is_empty() => Some(secondary),
            _ => None,
        }
    }

    #[must_use]
    pub const fn badge(&self) -> Option<&Badge> {
        match self {
            Self::Badge(badge) => Some(badge),
            _ => None,
        }
    }
}

/// How a row action is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMethod {
    /// Plain link (opens a modal via query string).
    Get,
    /// Form post, optionally behind a confirmation prompt.
    Post,
}

/// A per-row action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub label: String,
    pub icon: &'static str,
    pub href: String,
    pub method: ActionMethod,
    /// Browser confirmation text.
    pub confirm: Option<String>,
    pub destructive: bool,
}

impl RowAction {
    #[must_use]
    pub fn link(label: &str, icon: &'static str, href: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            icon,
            href: href.into(),
            method: ActionMethod::Get,
            confirm: None,
            destructive: false,
        }
    }

    #[must_use]
    pub fn post(label: &str, icon: &'static str, href: impl Into<String>) -> Self {
        Self {
            method: ActionMethod::Post,
            ..Self::link(label, icon, href)
        }
    }

    #[must_use]
    pub fn confirm(mut self, prompt: impl Into<String>) -> Self {
        self.confirm = Some(prompt.into());
        self
    }

    #[must_use]
    pub const fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    #[must_use]
    pub fn is_post(&self) -> bool {
        self.method == ActionMethod::Post
    }
}

/// A rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<TableCell>,
    pub actions: Vec<RowAction>,
}

/// Build the partners table configuration.
#[must_use]
pub fn partners_table_config() -> DataTableConfig {
    DataTableConfig::new("partners")
        .column(TableColumn::new("name", "Partner"))
        .column(TableColumn::new("phone", "Phone").visible(false))
        .column(TableColumn::new("service", "Service"))
        .column(TableColumn::new("service_type", "Type"))
        .column(TableColumn::numeric("experience", "Experience").visible(false))
        .column(TableColumn::numeric("charges", "Charges"))
        .column(TableColumn::new("email_status", "Email"))
        .with_actions()
        .search_placeholder("Search partners by name, email or service...")
        .empty_state(
            "ph-wrench",
            "No partners found",
            Some("Try adjusting your search or register a new partner"),
        )
}

/// Build the listeners (end users) table configuration.
#[must_use]
pub fn listeners_table_config() -> DataTableConfig {
    DataTableConfig::new("listeners")
        .column(TableColumn::new("name", "Listener"))
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::new("joined", "Joined").visible(false))
        .search_placeholder("Search listeners by name or email...")
        .empty_state(
            "ph-users",
            "No listeners found",
            Some("Try adjusting your search"),
        )
}

/// Build the subscription plans table configuration.
#[must_use]
pub fn plans_table_config() -> DataTableConfig {
    DataTableConfig::new("plans")
        .column(TableColumn::new("name", "Plan"))
        .column(TableColumn::numeric("price", "Price"))
        .column(TableColumn::new("interval", "Billing"))
        .column(TableColumn::new("type", "Type"))
        .column(TableColumn::new("trial", "Trial").visible(false))
        .column(TableColumn::new("status", "Status"))
        .with_actions()
        .empty_state(
            "ph-crown",
            "No plans yet",
            Some("Create a plan to start selling subscriptions"),
        )
}

/// Build the tips table configuration.
#[must_use]
pub fn tips_table_config() -> DataTableConfig {
    DataTableConfig::new("tips")
        .column(TableColumn::new("user", "User"))
        .column(TableColumn::new("artist", "Artist"))
        .column(TableColumn::numeric("amount", "Amount"))
        .column(TableColumn::new("date", "Date").visible(false))
        .column(TableColumn::new("payment", "Payment"))
        .search_placeholder("Search by user, artist or amount...")
        .empty_state("ph-gift", "No tips found", None)
}

/// Build the reports table configuration.
#[must_use]
pub fn reports_table_config() -> DataTableConfig {
    let mut status_options = vec![FilterOption::new("All", "All Statuses")];
    status_options.extend(
        tunenest_core::ReportStatus::ALL
            .iter()
            .map(|s| FilterOption::new(s.label(), s.label())),
    );
    let mut type_options = vec![FilterOption::new("All", "All Types")];
    type_options.extend(
        tunenest_core::ReportKind::ALL
            .iter()
            .map(|k| FilterOption::new(k.label(), k.label())),
    );

    DataTableConfig::new("reports")
        .column(TableColumn::new("type", "Type"))
        .column(TableColumn::new("content", "Content"))
        .column(TableColumn::new("reported_by", "Reported By").visible(false))
        .column(TableColumn::new("reason", "Reason"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("date", "Date").visible(false))
        .filter(TableFilter::select("status", "Status", status_options))
        .filter(TableFilter::select("type", "Type", type_options))
        .with_actions()
        .search_placeholder("Search by title, reporter or artist...")
        .empty_state(
            "ph-flag",
            "No reports found",
            Some("Try adjusting your search or filters"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_filters_start_with_all() {
        let config = reports_table_config();
        assert_eq!(config.filters.len(), 2);
        for filter in &config.filters {
            assert_eq!(filter.options[0].value, "All");
        }
    }

    #[test]
    fn test_optional_cell() {
        assert_eq!(TableCell::optional(Some("  ")), TableCell::Empty);
        assert_eq!(TableCell::optional(None), TableCell::Empty);
        assert_eq!(TableCell::optional(Some("Pune")), TableCell::text("Pune"));
    }
}

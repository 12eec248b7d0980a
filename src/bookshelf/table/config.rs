use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Invalid sort direction: {}", other)),
        }
    }
}

/// Caller-supplied table configuration.
///
/// Every field is optional: a missing value means "use the engine default",
/// never "disabled".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub show_edit_button: Option<bool>,
    pub show_delete_button: Option<bool>,
    pub edit_label: Option<String>,
    pub delete_label: Option<String>,
    pub edit_icon: Option<String>,
    pub delete_icon: Option<String>,
    pub page_size_options: Option<Vec<usize>>,
    pub page_size: Option<usize>,
    pub sortable: Option<bool>,
    pub sort_column: Option<String>,
    pub sort_direction: Option<SortDirection>,
    /// Key of the column whose value identifies an item for selection.
    pub item_id_key: Option<String>,
    pub empty_message: Option<String>,
    pub no_search_results_message: Option<String>,
}

impl TableConfig {
    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig::merge(self)
    }
}

/// A complete configuration: engine defaults with the caller's values on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub show_edit_button: bool,
    pub show_delete_button: bool,
    pub edit_label: String,
    pub delete_label: String,
    pub edit_icon: String,
    pub delete_icon: String,
    pub page_size_options: Vec<usize>,
    pub page_size: usize,
    pub sortable: bool,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
    pub item_id_key: Option<String>,
    pub empty_message: String,
    pub no_search_results_message: String,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            show_edit_button: false,
            show_delete_button: false,
            edit_label: "Edit".to_string(),
            delete_label: "Delete".to_string(),
            edit_icon: "edit".to_string(),
            delete_icon: "delete".to_string(),
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            page_size: DEFAULT_PAGE_SIZE,
            sortable: true,
            sort_column: Some("name".to_string()),
            sort_direction: SortDirection::Asc,
            item_id_key: None,
            empty_message: "No data available".to_string(),
            no_search_results_message: "No results found".to_string(),
        }
    }
}

impl EffectiveConfig {
    pub fn merge(partial: &TableConfig) -> Self {
        let defaults = Self::default();

        // Zero-sized pages and empty option lists cannot be rendered
        let mut page_size_options = partial
            .page_size_options
            .clone()
            .filter(|opts| !opts.is_empty() && opts.iter().all(|n| *n > 0))
            .unwrap_or(defaults.page_size_options);
        let page_size = partial
            .page_size
            .filter(|n| *n > 0)
            .unwrap_or(defaults.page_size);
        // The current size is always one of the offered sizes
        if !page_size_options.contains(&page_size) {
            page_size_options.push(page_size);
            page_size_options.sort_unstable();
        }

        Self {
            show_edit_button: partial.show_edit_button.unwrap_or(defaults.show_edit_button),
            show_delete_button: partial
                .show_delete_button
                .unwrap_or(defaults.show_delete_button),
            edit_label: partial.edit_label.clone().unwrap_or(defaults.edit_label),
            delete_label: partial.delete_label.clone().unwrap_or(defaults.delete_label),
            edit_icon: partial.edit_icon.clone().unwrap_or(defaults.edit_icon),
            delete_icon: partial.delete_icon.clone().unwrap_or(defaults.delete_icon),
            page_size_options,
            page_size,
            sortable: partial.sortable.unwrap_or(defaults.sortable),
            sort_column: partial.sort_column.clone().or(defaults.sort_column),
            sort_direction: partial.sort_direction.unwrap_or(defaults.sort_direction),
            item_id_key: partial.item_id_key.clone().or(defaults.item_id_key),
            empty_message: partial
                .empty_message
                .clone()
                .unwrap_or(defaults.empty_message),
            no_search_results_message: partial
                .no_search_results_message
                .clone()
                .unwrap_or(defaults.no_search_results_message),
        }
    }

    /// Whether the trailing actions column is shown.
    pub fn shows_actions(&self) -> bool {
        self.show_edit_button || self.show_delete_button
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_defaults() {
        let effective = TableConfig::default().effective();
        assert_eq!(effective, EffectiveConfig::default());
        assert!(!effective.shows_actions());
        assert_eq!(effective.page_size_options, vec![5, 10, 20, 50]);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = TableConfig {
            show_delete_button: Some(true),
            delete_label: Some("Remove".into()),
            sortable: Some(false),
            sort_direction: Some(SortDirection::Desc),
            ..Default::default()
        };
        let effective = config.effective();
        assert!(effective.show_delete_button);
        assert!(!effective.show_edit_button);
        assert_eq!(effective.delete_label, "Remove");
        assert_eq!(effective.edit_label, "Edit");
        assert!(!effective.sortable);
        assert_eq!(effective.sort_direction, SortDirection::Desc);
        assert!(effective.shows_actions());
    }

    #[test]
    fn unusable_page_sizes_fall_back() {
        let config = TableConfig {
            page_size: Some(0),
            page_size_options: Some(vec![]),
            ..Default::default()
        };
        let effective = config.effective();
        assert_eq!(effective.page_size, 10);
        assert_eq!(effective.page_size_options, vec![5, 10, 20, 50]);
    }

    #[test]
    fn page_size_joins_the_offered_sizes() {
        let config = TableConfig {
            page_size: Some(2),
            page_size_options: Some(vec![10, 5]),
            ..Default::default()
        };
        let effective = config.effective();
        assert_eq!(effective.page_size, 2);
        assert_eq!(effective.page_size_options, vec![2, 5, 10]);
    }

    #[test]
    fn deserializes_partial_camel_case_json() {
        let config: TableConfig =
            serde_json::from_str(r#"{"showEditButton": true, "sortDirection": "desc"}"#).unwrap();
        assert_eq!(config.show_edit_button, Some(true));
        assert_eq!(config.sort_direction, Some(SortDirection::Desc));
        assert_eq!(config.page_size, None);
    }
}

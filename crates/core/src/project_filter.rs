//! Filter predicates and sort orders for the project listing.

use serde::Deserialize;

use crate::types::{Date, DbId};

/// Optional predicates applied to the project listing. All bounds are
/// inclusive; unset fields do not filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub start_date_from: Option<Date>,
    pub start_date_to: Option<Date>,
    pub end_date_from: Option<Date>,
    pub end_date_to: Option<Date>,
    pub priority: Option<i32>,
    pub customer_company_id: Option<DbId>,
    pub executor_company_id: Option<DbId>,
    pub sort_order: Option<String>,
}

impl ProjectFilter {
    pub fn sort(&self) -> ProjectSortOrder {
        ProjectSortOrder::parse(self.sort_order.as_deref())
    }
}

/// Supported listing orders. Unknown or missing values sort by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectSortOrder {
    #[default]
    Name,
    NameDesc,
    StartDate,
    StartDateDesc,
    EndDate,
    EndDateDesc,
    Priority,
    PriorityDesc,
}

impl ProjectSortOrder {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("name_desc") => Self::NameDesc,
            Some("start_date") => Self::StartDate,
            Some("start_date_desc") => Self::StartDateDesc,
            Some("end_date") => Self::EndDate,
            Some("end_date_desc") => Self::EndDateDesc,
            Some("priority") => Self::Priority,
            Some("priority_desc") => Self::PriorityDesc,
            _ => Self::Name,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::NameDesc => "name_desc",
            Self::StartDate => "start_date",
            Self::StartDateDesc => "start_date_desc",
            Self::EndDate => "end_date",
            Self::EndDateDesc => "end_date_desc",
            Self::Priority => "priority",
            Self::PriorityDesc => "priority_desc",
        }
    }

    /// SQL `ORDER BY` body. `id` breaks ties so paging is stable.
    pub fn order_by(self) -> &'static str {
        match self {
            Self::Name => "name ASC, id ASC",
            Self::NameDesc => "name DESC, id DESC",
            Self::StartDate => "start_date ASC, id ASC",
            Self::StartDateDesc => "start_date DESC, id DESC",
            Self::EndDate => "end_date ASC, id ASC",
            Self::EndDateDesc => "end_date DESC, id DESC",
            Self::Priority => "priority ASC, id ASC",
            Self::PriorityDesc => "priority DESC, id DESC",
        }
    }
}

//! Task filtering by category, status, priority, and due-date bucket.
//!
//! All criteria are combined with AND. Filtering never reorders: feed it the
//! due-date ordered output of `TaskStore::list` to get an ordered view.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Priority, Status, Task};

/// Value used by every criterion to mean "no constraint"
pub const ALL: &str = "all";

/// Relative due-date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBucket {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            DateBucket::All => "all",
            DateBucket::Today => "today",
            DateBucket::Week => "week",
            DateBucket::Month => "month",
        }
    }

    /// Whether `date` falls in this bucket relative to `today`.
    ///
    /// Weeks run Monday through Sunday. A week bound past the representable
    /// calendar leaves that side of the window open.
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateBucket::All => true,
            DateBucket::Today => date == today,
            DateBucket::Week => {
                let offset = u64::from(today.weekday().num_days_from_monday());
                let start = today.checked_sub_days(Days::new(offset));
                let end = today.checked_add_days(Days::new(6 - offset));
                start.map_or(true, |start| start <= date) && end.map_or(true, |end| date <= end)
            }
            DateBucket::Month => date.year() == today.year() && date.month() == today.month(),
        }
    }
}

impl FromStr for DateBucket {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "all" => Ok(DateBucket::All),
            "today" => Ok(DateBucket::Today),
            "week" => Ok(DateBucket::Week),
            "month" => Ok(DateBucket::Month),
            other => Err(Error::InvalidArgument(format!(
                "unknown date bucket '{other}' (expected all|today|week|month)"
            ))),
        }
    }
}

impl fmt::Display for DateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conjunctive filter over tasks; `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskFilter {
    pub category_id: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub due: DateBucket,
}

impl TaskFilter {
    /// Build a filter from raw criteria where `"all"` (or absence) disables a criterion.
    pub fn from_params(
        category: Option<&str>,
        status: Option<&str>,
        priority: Option<&str>,
        due: Option<&str>,
    ) -> Result<Self> {
        let category_id = constrained(category).map(str::to_string);
        let status = constrained(status)
            .map(|raw| raw.parse::<Status>().map_err(Error::InvalidArgument))
            .transpose()?;
        let priority = constrained(priority)
            .map(|raw| raw.parse::<Priority>().map_err(Error::InvalidArgument))
            .transpose()?;
        let due = constrained(due)
            .map(str::parse::<DateBucket>)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            category_id,
            status,
            priority,
            due,
        })
    }

    pub fn is_unconstrained(&self) -> bool {
        self == &TaskFilter::default()
    }

    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        self.category_id
            .as_deref()
            .map_or(true, |id| task.category_id == id)
            && self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
            && self.due.contains(task.due_date, today)
    }
}

fn constrained(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|raw| !raw.is_empty() && *raw != ALL)
}

/// Tasks matching `filter`, in input order.
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter, today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task, today))
        .cloned()
        .collect()
}

//! Batch presentation: paging, sorting, and per-field filtering for the
//! process and executor list views.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::executor::Executor;
use crate::filter::{FieldFilter, FieldValue};
use crate::process::WfProcess;

/// Default page size for list views.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound on requested page sizes.
pub const MAX_PAGE_SIZE: usize = 100;

/// Field indexes of the process list view.
pub mod process_fields {
    pub const ID: usize = 0;
    pub const DEFINITION_NAME: usize = 1;
    pub const DEFINITION_VERSION: usize = 2;
    pub const STATUS: usize = 3;
    pub const START_DATE: usize = 4;
    pub const END_DATE: usize = 5;
    pub const COUNT: usize = 6;
}

/// Field indexes of the executor list view.
pub mod executor_fields {
    pub const ID: usize = 0;
    pub const NAME: usize = 1;
    pub const FULL_NAME: usize = 2;
    pub const COUNT: usize = 3;
}

/// Errors raised when a presentation is misconfigured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum PresentationError {
    /// Sort field-index and order sequences must be parallel.
    #[error("Sort configuration mismatch: {field_ids} field ids, {orders} orders")]
    SortLengthMismatch { field_ids: usize, orders: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Paging, sorting, and filtering configuration for a list request.
///
/// Filters are keyed by field index of the view the presentation targets
/// (see [`process_fields`] / [`executor_fields`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPresentation {
    /// 1-based page number; ignored for non-paged presentations.
    page_number: usize,
    /// `None` means the whole result set.
    page_size: Option<usize>,
    sort_field_ids: Vec<usize>,
    sort_orders: Vec<SortOrder>,
    filters: BTreeMap<usize, FieldFilter>,
}

impl BatchPresentation {
    /// Paged presentation; page number floors at 1 and the size is clamped
    /// to `1..=MAX_PAGE_SIZE`.
    pub fn paged(page_number: usize, page_size: usize) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: Some(page_size.clamp(1, MAX_PAGE_SIZE)),
            sort_field_ids: Vec::new(),
            sort_orders: Vec::new(),
            filters: BTreeMap::new(),
        }
    }

    /// Presentation returning the whole result set.
    pub fn non_paged() -> Self {
        Self {
            page_number: 1,
            page_size: None,
            sort_field_ids: Vec::new(),
            sort_orders: Vec::new(),
            filters: BTreeMap::new(),
        }
    }

    pub fn page_number(&self) -> usize {
        self.page_number.max(1)
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    /// Configure sorting. The two sequences are parallel: `field_ids[i]`
    /// is sorted with `orders[i]`, earlier entries take precedence.
    pub fn set_fields_to_sort(
        &mut self,
        field_ids: Vec<usize>,
        orders: Vec<SortOrder>,
    ) -> Result<(), PresentationError> {
        if field_ids.len() != orders.len() {
            return Err(PresentationError::SortLengthMismatch {
                field_ids: field_ids.len(),
                orders: orders.len(),
            });
        }
        self.sort_field_ids = field_ids;
        self.sort_orders = orders;
        Ok(())
    }

    pub fn set_filter(&mut self, field_id: usize, filter: FieldFilter) {
        self.filters.insert(field_id, filter);
    }

    pub fn filters(&self) -> &BTreeMap<usize, FieldFilter> {
        &self.filters
    }

    /// Test an item (given as a field-index lookup) against every filter.
    /// A filter on a field the item has no value for rejects the item.
    pub fn accepts<F>(&self, field_value: F) -> bool
    where
        F: Fn(usize) -> Option<FieldValue>,
    {
        self.filters.iter().all(|(field_id, filter)| {
            field_value(*field_id)
                .map(|value| filter.matches(&value))
                .unwrap_or(false)
        })
    }

    /// Sort items in place by the configured fields.
    pub fn sort<T, F>(&self, items: &mut [T], field_value: F)
    where
        F: Fn(&T, usize) -> Option<FieldValue>,
    {
        items.sort_by(|a, b| {
            for (field_id, order) in self.sort_field_ids.iter().zip(&self.sort_orders) {
                let ordering = compare_values(
                    field_value(a, *field_id).as_ref(),
                    field_value(b, *field_id).as_ref(),
                );
                let ordering = match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// Cut the current page out of a sorted result set.
    pub fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        match self.page_size {
            None => items,
            Some(size) => {
                let offset = self.page_number().saturating_sub(1).saturating_mul(size);
                items.into_iter().skip(offset).take(size).collect()
            }
        }
    }
}

impl Default for BatchPresentation {
    fn default() -> Self {
        Self::paged(1, DEFAULT_PAGE_SIZE)
    }
}

/// Compare two optional field values; absent values sort first, values of
/// different types compare equal (kept stable by the surrounding sort).
fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (FieldValue::Text(a), FieldValue::Text(b)) => {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
            (FieldValue::Long(a), FieldValue::Long(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        },
    }
}

/// Field-index lookup for the process list view.
pub fn process_field_value(process: &WfProcess, field_id: usize) -> Option<FieldValue> {
    match field_id {
        process_fields::ID => Some(FieldValue::Long(process.id)),
        process_fields::DEFINITION_NAME => {
            Some(FieldValue::Text(process.definition_name.clone()))
        }
        process_fields::DEFINITION_VERSION => {
            Some(FieldValue::Long(process.definition_version))
        }
        process_fields::STATUS => Some(FieldValue::Text(process.status.as_str().to_string())),
        process_fields::START_DATE => Some(FieldValue::Date(process.start_date)),
        process_fields::END_DATE => process.end_date.map(FieldValue::Date),
        _ => None,
    }
}

/// Field-index lookup for the executor list view.
pub fn executor_field_value(executor: &Executor, field_id: usize) -> Option<FieldValue> {
    match field_id {
        executor_fields::ID => Some(FieldValue::Long(executor.id())),
        executor_fields::NAME => Some(FieldValue::Text(executor.name().to_string())),
        executor_fields::FULL_NAME => {
            Some(FieldValue::Text(executor.display_name().to_string()))
        }
        _ => None,
    }
}

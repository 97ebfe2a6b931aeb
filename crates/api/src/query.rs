//! Shared query parameter types for API handlers.
//!
//! List endpoints accept flat query parameters and translate them into a
//! [`BatchPresentation`] here, so handlers stay one-line delegations.

use serde::Deserialize;

use flowgate_core::filter::{
    DateRangeFilterCriteria, FieldFilter, StringFilterCriteria,
};
use flowgate_core::presentation::{
    executor_fields, process_fields, BatchPresentation, SortOrder, DEFAULT_PAGE_SIZE,
};
use flowgate_core::types::Timestamp;

use crate::error::AppError;

/// Query parameters for list endpoints that support a `recursive` flag
/// (subprocesses, jobs).
#[derive(Debug, Deserialize)]
pub struct RecursiveParams {
    #[serde(default)]
    pub recursive: bool,
}

/// Query parameters of the process list endpoints.
///
/// `sort` is a comma-separated list of field names, each optionally
/// prefixed with `-` for descending order, e.g. `-start_date,id`.
/// `definition` accepts `*`/`?` wildcards.
#[derive(Debug, Deserialize)]
pub struct ProcessListParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub sort: Option<String>,
    pub definition: Option<String>,
    pub status: Option<String>,
    pub started_from: Option<Timestamp>,
    pub started_to: Option<Timestamp>,
    pub ended_from: Option<Timestamp>,
    pub ended_to: Option<Timestamp>,
}

impl ProcessListParams {
    /// Build the presentation, with paging when `paged`.
    pub fn into_presentation(self, paged: bool) -> Result<BatchPresentation, AppError> {
        let mut presentation = if paged {
            BatchPresentation::paged(
                self.page.unwrap_or(1),
                self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            )
        } else {
            BatchPresentation::non_paged()
        };

        if let Some(sort) = &self.sort {
            let (fields, orders) = parse_sort(sort, process_sort_field)?;
            presentation
                .set_fields_to_sort(fields, orders)
                .map_err(flowgate_core::error::CoreError::from)?;
        }

        if let Some(definition) = self.definition {
            presentation.set_filter(
                process_fields::DEFINITION_NAME,
                FieldFilter::Text(StringFilterCriteria::new(definition)),
            );
        }
        if let Some(status) = self.status {
            presentation.set_filter(
                process_fields::STATUS,
                FieldFilter::Text(StringFilterCriteria::new(status)),
            );
        }
        if self.started_from.is_some() || self.started_to.is_some() {
            presentation.set_filter(
                process_fields::START_DATE,
                FieldFilter::DateRange(DateRangeFilterCriteria::new(
                    self.started_from,
                    self.started_to,
                )),
            );
        }
        if self.ended_from.is_some() || self.ended_to.is_some() {
            presentation.set_filter(
                process_fields::END_DATE,
                FieldFilter::DateRange(DateRangeFilterCriteria::new(
                    self.ended_from,
                    self.ended_to,
                )),
            );
        }

        Ok(presentation)
    }
}

/// Query parameters of the executor list endpoint. `name` accepts
/// `*`/`?` wildcards.
#[derive(Debug, Deserialize)]
pub struct ExecutorListParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub sort: Option<String>,
    pub name: Option<String>,
}

impl ExecutorListParams {
    pub fn into_presentation(self) -> Result<BatchPresentation, AppError> {
        let mut presentation = BatchPresentation::paged(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        );

        if let Some(sort) = &self.sort {
            let (fields, orders) = parse_sort(sort, executor_sort_field)?;
            presentation
                .set_fields_to_sort(fields, orders)
                .map_err(flowgate_core::error::CoreError::from)?;
        }

        if let Some(name) = self.name {
            presentation.set_filter(
                executor_fields::NAME,
                FieldFilter::Text(StringFilterCriteria::new(name)),
            );
        }

        Ok(presentation)
    }
}

fn parse_sort(
    sort: &str,
    field_index: impl Fn(&str) -> Option<usize>,
) -> Result<(Vec<usize>, Vec<SortOrder>), AppError> {
    let mut fields = Vec::new();
    let mut orders = Vec::new();
    for entry in sort.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, order) = match entry.strip_prefix('-') {
            Some(name) => (name, SortOrder::Desc),
            None => (entry, SortOrder::Asc),
        };
        let index = field_index(name)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown sort field '{name}'")))?;
        fields.push(index);
        orders.push(order);
    }
    Ok((fields, orders))
}

fn process_sort_field(name: &str) -> Option<usize> {
    match name {
        "id" => Some(process_fields::ID),
        "definition" | "definition_name" => Some(process_fields::DEFINITION_NAME),
        "version" | "definition_version" => Some(process_fields::DEFINITION_VERSION),
        "status" => Some(process_fields::STATUS),
        "start_date" => Some(process_fields::START_DATE),
        "end_date" => Some(process_fields::END_DATE),
        _ => None,
    }
}

fn executor_sort_field(name: &str) -> Option<usize> {
    match name {
        "id" => Some(executor_fields::ID),
        "name" => Some(executor_fields::NAME),
        "full_name" => Some(executor_fields::FULL_NAME),
        _ => None,
    }
}

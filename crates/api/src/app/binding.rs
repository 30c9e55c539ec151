//! Lenient request binding.
//!
//! Raw request data (query string, path segment, JSON body) is bound into typed
//! values without rejecting the request up front. A value that does not parse
//! falls back to its default and leaves an error in the [`ValidationState`];
//! an empty, `null` or unparseable body binds as absent. The flows then decide
//! which status to answer with, in the order the resource contract requires.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use catalog_core::{DomainError, PageRequest, ProductId};
use catalog_products::Product;

/// Field errors collected while binding a request.
///
/// Serializes as `{ "errors": { "<field>": ["<message>", ...] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationState {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    pub fn add_domain_error(&mut self, err: &DomainError) {
        match err {
            DomainError::Validation { field, message } => self.add_error(field.as_str(), message.as_str()),
            other => self.add_error("", other.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// This state plus every error recorded in `other`.
    pub fn merged(mut self, other: &ValidationState) -> Self {
        for (field, messages) in &other.errors {
            self.errors
                .entry(field.clone())
                .or_default()
                .extend(messages.iter().cloned());
        }
        self
    }
}

/// A bound value plus the validation state produced while binding it.
///
/// `value` is `None` only when nothing usable was supplied (e.g. a missing body).
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<T> {
    value: Option<T>,
    state: ValidationState,
}

impl<T> Bound<T> {
    pub fn new(value: Option<T>, state: ValidationState) -> Self {
        Self { value, state }
    }

    pub fn valid(value: T) -> Self {
        Self::new(Some(value), ValidationState::new())
    }

    pub fn absent(state: ValidationState) -> Self {
        Self::new(None, state)
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn state(&self) -> &ValidationState {
        &self.state
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    pub fn into_parts(self) -> (Option<T>, ValidationState) {
        (self.value, self.state)
    }
}

fn invalid_value_message(raw: &str) -> String {
    format!("The value '{raw}' is not valid.")
}

fn bind_i32(state: &mut ValidationState, field: &str, raw: Option<&str>, default: i32) -> i32 {
    match raw {
        None => default,
        Some(raw) => match raw.trim().parse::<i32>() {
            Ok(v) => v,
            Err(_) => {
                state.add_error(field, invalid_value_message(raw));
                default
            }
        },
    }
}

/// Bind `pageNumber`/`pageSize` (names matched case-insensitively).
///
/// `query` is `Err` when the query string itself could not be decoded.
pub fn bind_page_query<E: std::fmt::Display>(query: Result<HashMap<String, String>, E>) -> Bound<PageRequest> {
    let mut state = ValidationState::new();
    let params = match query {
        Ok(params) => params,
        Err(e) => {
            state.add_error("query", e.to_string());
            HashMap::new()
        }
    };
    let lookup = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    };

    let page_number = bind_i32(
        &mut state,
        "pageNumber",
        lookup("pageNumber"),
        PageRequest::DEFAULT_PAGE_NUMBER,
    );
    let page_size = bind_i32(
        &mut state,
        "pageSize",
        lookup("pageSize"),
        PageRequest::DEFAULT_PAGE_SIZE,
    );

    match PageRequest::new(page_number, page_size) {
        Ok(page) => Bound::new(Some(page), state),
        Err(e) => {
            state.add_domain_error(&e);
            Bound::absent(state)
        }
    }
}

/// Bind the `{id}` path segment. A malformed id binds as `0` with an error.
pub fn bind_product_id(raw: &str) -> Bound<ProductId> {
    let mut state = ValidationState::new();
    let id = match raw.parse::<ProductId>() {
        Ok(id) => id,
        Err(_) => {
            state.add_error("id", invalid_value_message(raw));
            ProductId::UNASSIGNED
        }
    };
    Bound::new(Some(id), state)
}

/// Bind a JSON product body and apply the product field rules.
pub fn bind_product_body(body: &[u8]) -> Bound<Product> {
    let mut state = ValidationState::new();

    if body.iter().all(u8::is_ascii_whitespace) {
        state.add_error("body", "A non-empty request body is required.");
        return Bound::absent(state);
    }

    match serde_json::from_slice::<Option<Product>>(body) {
        Ok(Some(product)) => {
            for err in product.validation_errors() {
                state.add_domain_error(&err);
            }
            Bound::new(Some(product), state)
        }
        Ok(None) => {
            state.add_error("body", "A non-empty request body is required.");
            Bound::absent(state)
        }
        Err(e) => {
            state.add_error("body", e.to_string());
            Bound::absent(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> Result<HashMap<String, String>, String> {
        Ok(pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect())
    }

    #[test]
    fn missing_page_params_take_defaults() {
        let bound = bind_page_query(query(&[]));
        assert!(bound.is_valid());
        assert_eq!(bound.value(), Some(&PageRequest::default()));
    }

    #[test]
    fn page_params_match_case_insensitively() {
        let bound = bind_page_query(query(&[("PageNumber", "3"), ("pagesize", "5")]));
        assert!(bound.is_valid());
        let page = bound.value().unwrap();
        assert_eq!((page.page_number(), page.page_size()), (3, 5));
    }

    #[test]
    fn malformed_page_number_is_a_binding_error() {
        let bound = bind_page_query(query(&[("pageNumber", "abc")]));
        assert!(!bound.is_valid());
        assert_eq!(
            bound.state().errors()["pageNumber"],
            vec!["The value 'abc' is not valid.".to_string()]
        );
        assert_eq!(bound.value().map(|p| p.page_number()), Some(1));
    }

    #[test]
    fn zero_page_size_binds_as_absent() {
        let bound = bind_page_query(query(&[("pageSize", "0")]));
        assert!(!bound.is_valid());
        assert!(bound.value().is_none());
        assert!(bound.state().errors().contains_key("pageSize"));
    }

    #[test]
    fn undecodable_query_string_is_a_binding_error() {
        let bound = bind_page_query::<String>(Err("bad escape".to_string()));
        assert!(!bound.is_valid());
        assert!(bound.state().errors().contains_key("query"));
    }

    #[test]
    fn numeric_path_id_binds() {
        let bound = bind_product_id("12");
        assert!(bound.is_valid());
        assert_eq!(bound.value(), Some(&ProductId::new(12)));
    }

    #[test]
    fn malformed_path_id_binds_as_zero_with_error() {
        let bound = bind_product_id("twelve");
        assert!(!bound.is_valid());
        assert_eq!(bound.value(), Some(&ProductId::UNASSIGNED));
    }

    #[test]
    fn valid_body_binds_product() {
        let bound = bind_product_body(br#"{ "id": 1, "name": "Dune", "price": 12.5 }"#);
        assert!(bound.is_valid());
        assert_eq!(bound.value(), Some(&Product::new(1, "Dune", 12.5)));
    }

    #[test]
    fn empty_and_null_bodies_bind_as_absent() {
        let bodies: [&[u8]; 3] = [b"", b"  \n", b"null"];
        for body in bodies {
            let bound = bind_product_body(body);
            assert!(bound.value().is_none());
            assert!(bound.state().errors().contains_key("body"));
        }
    }

    #[test]
    fn malformed_json_binds_as_absent() {
        let bound = bind_product_body(br#"{ "name": "Dune", "price": "#);
        assert!(bound.value().is_none());
        assert!(!bound.is_valid());
    }

    #[test]
    fn body_without_price_binds_with_zero_price() {
        let bound = bind_product_body(br#"{ "name": "Gift" }"#);
        assert!(bound.is_valid());
        assert_eq!(bound.value(), Some(&Product::new(0, "Gift", 0.0)));
    }

    #[test]
    fn blank_name_binds_value_with_error() {
        let bound = bind_product_body(br#"{ "id": 1, "name": "", "price": 1 }"#);
        assert!(bound.value().is_some());
        assert!(bound.state().errors().contains_key("name"));
    }

    #[test]
    fn merged_state_collects_both_sides() {
        let mut a = ValidationState::new();
        a.add_error("id", "bad id");
        let mut b = ValidationState::new();
        b.add_error("id", "still bad");
        b.add_error("name", "missing");

        let merged = a.merged(&b);
        assert_eq!(merged.errors()["id"].len(), 2);
        assert_eq!(merged.errors()["name"], vec!["missing".to_string()]);
    }

    #[test]
    fn state_serializes_under_errors_key() {
        let mut state = ValidationState::new();
        state.add_error("body", "required");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, serde_json::json!({ "errors": { "body": ["required"] } }));
    }
}

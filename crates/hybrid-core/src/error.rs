//! Input validation errors raised at the form boundary.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} is missing")]
    Missing { field: &'static str },

    #[error("{field} `{value}` is not a number")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field} {value} is out of range")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("delivery {}: {source}", .index + 1)]
    Delivery {
        index: usize,
        #[source]
        source: Box<InputError>,
    },

    #[error("at least one delivery is required")]
    NoDeliveries,
}

impl InputError {
    pub(crate) fn at(self, index: usize) -> InputError {
        InputError::Delivery {
            index,
            source: Box::new(self),
        }
    }
}

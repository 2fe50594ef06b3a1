//! Views: persisted sort/filter specifications and their wire format.

pub mod codec;
pub mod model;

pub use codec::{
    FilterOperator, FilterSpec, SortDirection, SortSpec, ViewCodecError, encode_filter,
    encode_sort, parse_filter, parse_sort, query_params,
};
pub use model::{View, ViewConfig};

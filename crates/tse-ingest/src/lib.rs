pub mod archive;
pub mod csv_frame;
pub mod encoding;
pub mod error;
pub mod polars_utils;
pub mod store;

pub use archive::{candidate_member_name, member_names, read_member};
pub use csv_frame::{CsvOptions, NA_TOKENS, read_text_frame, write_csv};
pub use encoding::{LATIN_1, decode, encode};
pub use error::{IngestError, Result};
pub use polars_utils::{any_to_csv_field, format_float};
pub use store::{
    LocalStore, candidates_key, clean_candidates_key, normalize_bucket_name, resolve_year_csv,
};

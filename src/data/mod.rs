pub mod df_all;

pub use df_all::{read_df_all, read_df_rows, DF_ALL_REQUIRED_COLUMNS};

//! Table format implementations.

mod csv_table;
#[cfg(feature = "hdf5")]
mod hdf_table;
mod npz_table;

#[cfg(test)]
mod tests;

pub use csv_table::CsvFormat;
#[cfg(feature = "hdf5")]
pub use hdf_table::{HDF_NODE, HdfFormat};
pub use npz_table::NpzFormat;
